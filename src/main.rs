use gotowebinar_models::Config;
use std::env;
use std::process;

fn main() {
    let config = Config::build(env::args()).unwrap_or_else(|err| {
        eprintln!("Problem parsing arguments: {err}");
        eprintln!("Usage: webinar_json <webinar|create|update|email-settings|time-range> [path]");
        process::exit(1);
    });

    if let Err(e) = gotowebinar_models::init_logging() {
        eprintln!("{e}");
    }

    match gotowebinar_models::run(config) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            tracing::error!(error = %e, "normalization failed");
            eprintln!("Application error: {e}");
            process::exit(1);
        }
    }
}
