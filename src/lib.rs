use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::fs;
use std::io::{self, Read};
use std::str::FromStr;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod error;
pub mod iso8601;
pub mod models;

pub use error::{Error, Result};
pub use models::{
    AttendeeFollowUpEmailSetting, CreateWebinar, DateTimeRange, EmailSettings, UpdateWebinar,
    Webinar, WebinarEmailSettings,
};

/// A record that travels to or from the webinar API as JSON.
///
/// Unknown fields are ignored on decode, missing optional fields take their
/// documented defaults and missing required fields fail with
/// [`Error::Decode`].
pub trait Resource: Serialize + DeserializeOwned {
    /// Used in error messages and logs.
    const NAME: &'static str;

    fn decode(value: serde_json::Value) -> Result<Self> {
        serde_json::from_value(value).map_err(decode_error::<Self>)
    }

    fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(decode_error::<Self>)
    }

    fn encode(&self) -> Result<serde_json::Value> {
        serde_json::to_value(self).map_err(|source| Error::Encode {
            resource: Self::NAME,
            source,
        })
    }

    fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|source| Error::Encode {
            resource: Self::NAME,
            source,
        })
    }
}

fn decode_error<T: Resource>(source: serde_json::Error) -> Error {
    debug!(resource = T::NAME, error = %source, "decode failed");
    Error::Decode {
        resource: T::NAME,
        source,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Webinar,
    Create,
    Update,
    EmailSettings,
    TimeRange,
}

impl FromStr for ResourceKind {
    type Err = &'static str;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "webinar" => Ok(ResourceKind::Webinar),
            "create" => Ok(ResourceKind::Create),
            "update" => Ok(ResourceKind::Update),
            "email-settings" => Ok(ResourceKind::EmailSettings),
            "time-range" => Ok(ResourceKind::TimeRange),
            _ => Err("Unknown kind, expected webinar, create, update, email-settings or time-range"),
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResourceKind::Webinar => "webinar",
            ResourceKind::Create => "create",
            ResourceKind::Update => "update",
            ResourceKind::EmailSettings => "email-settings",
            ResourceKind::TimeRange => "time-range",
        };
        f.write_str(name)
    }
}

pub struct Config {
    pub kind: ResourceKind,
    /// `-` reads stdin.
    pub path: String,
}

impl Config {
    pub fn build(mut args: impl Iterator<Item = String>) -> std::result::Result<Config, &'static str> {
        args.next();

        let kind = match args.next() {
            Some(arg) => arg.parse()?,
            None => return Err("Didn't get a resource kind"),
        };

        let path = match args.next() {
            Some(arg) => arg,
            None => String::from("-"),
        };

        Ok(Config { kind, path })
    }
}

/// Sets up `tracing` output on stderr, filtered by `RUST_LOG` (default `info`).
pub fn init_logging() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| Error::Config(format!("Failed to set up logging: {e}")))
}

fn read_input(path: &str) -> Result<String> {
    if path == "-" {
        let mut input = String::new();
        io::stdin().read_to_string(&mut input)?;
        Ok(input)
    } else {
        Ok(fs::read_to_string(path)?)
    }
}

/// Decodes `json` as `kind` and renders it back in normalized form.
pub fn normalize(kind: ResourceKind, json: &str) -> Result<String> {
    fn round_trip<T: Resource>(json: &str) -> Result<String> {
        T::from_json(json)?.to_json()
    }

    match kind {
        ResourceKind::Webinar => round_trip::<Webinar>(json),
        ResourceKind::Create => round_trip::<CreateWebinar>(json),
        ResourceKind::Update => round_trip::<UpdateWebinar>(json),
        ResourceKind::EmailSettings => round_trip::<WebinarEmailSettings>(json),
        ResourceKind::TimeRange => round_trip::<DateTimeRange>(json),
    }
}

pub fn run(config: Config) -> Result<String> {
    let input = read_input(&config.path)?;
    info!(kind = %config.kind, path = %config.path, bytes = input.len(), "decoding input");
    normalize(config.kind, &input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn test_config_build_success() {
        let args = vec![
            "program_name".to_string(),
            "webinar".to_string(),
            "path/to/webinar.json".to_string(),
        ];
        let config = Config::build(args.into_iter()).unwrap();
        assert_eq!(config.kind, ResourceKind::Webinar);
        assert_eq!(config.path, "path/to/webinar.json");
    }

    #[test]
    fn test_config_build_defaults_to_stdin() {
        let args = vec!["program_name".to_string(), "email-settings".to_string()];
        let config = Config::build(args.into_iter()).unwrap();
        assert_eq!(config.kind, ResourceKind::EmailSettings);
        assert_eq!(config.path, "-");
    }

    #[test]
    fn test_config_build_missing_kind() {
        let args = vec!["program_name".to_string()];
        assert!(Config::build(args.into_iter()).is_err());
    }

    #[test]
    fn test_config_build_unknown_kind() {
        let args = vec!["program_name".to_string(), "meeting".to_string()];
        assert!(Config::build(args.into_iter()).is_err());
    }

    #[test]
    fn test_resource_kind_display_parses_back() {
        for kind in [
            ResourceKind::Webinar,
            ResourceKind::Create,
            ResourceKind::Update,
            ResourceKind::EmailSettings,
            ResourceKind::TimeRange,
        ] {
            assert_eq!(kind.to_string().parse::<ResourceKind>(), Ok(kind));
        }
    }

    #[test]
    fn test_normalize_fills_defaults() {
        let output = normalize(ResourceKind::EmailSettings, "{}").unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(
            value,
            json!({
                "confirmationEmail": { "enabled": true },
                "reminderEmail": { "enabled": true },
                "absenteeFollowUpEmail": { "enabled": true },
                "attendeeFollowUpEmail": { "enabled": true, "includeCertificate": true }
            })
        );
    }

    #[test]
    fn test_normalize_rewrites_offsets() {
        let output = normalize(
            ResourceKind::TimeRange,
            r#"{"startTime": "2015-07-13T10:00:00+00:00", "endTime": "2015-07-13T22:00:00"}"#,
        )
        .unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["startTime"], "2015-07-13T10:00:00Z");
        assert_eq!(value["endTime"], "2015-07-13T22:00:00Z");
    }

    #[test]
    fn test_normalize_reports_resource() {
        let error = normalize(ResourceKind::Create, r#"{"subject": "Launch"}"#).unwrap_err();
        assert!(error.to_string().starts_with("failed to decode create webinar request"));
    }

    #[test]
    fn test_from_json_rejects_malformed_input() {
        assert!(matches!(
            Webinar::from_json("{not json"),
            Err(Error::Decode { resource: "webinar", .. })
        ));
    }

    #[test]
    fn test_run_normalizes_webinar_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "name": "From Name",
                "times": [{{"startTime": "2015-07-13T10:00:00+00:00", "endTime": "2015-07-13T11:00"}}],
                "webinarKey": "1235813213455",
                "webinarId": 123456789,
                "description": "Numbers",
                "organizerKey": "200000000000123",
                "organizerEmail": "host@example.com",
                "organizerName": "Host Person",
                "accountKey": "300000000000456",
                "registrationUrl": "https://attendee.example.com/register/123",
                "timeZone": "Europe/Berlin",
                "locale": "de_DE",
                "pendingRegistrants": 3
            }}"#
        )
        .unwrap();

        let config = Config {
            kind: ResourceKind::Webinar,
            path: file.path().to_string_lossy().into_owned(),
        };
        let output = run(config).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["subject"], "From Name");
        assert_eq!(value["webinarId"], "123456789");
        assert_eq!(value["registrationLimit"], 250);
        assert_eq!(value["type"], "single_session");
        assert_eq!(value["times"][0]["startTime"], "2015-07-13T10:00:00Z");
        assert_eq!(value["times"][0]["endTime"], "2015-07-13T11:00:00Z");
        assert!(value.get("name").is_none());
        assert!(value.get("pendingRegistrants").is_none());
    }

    #[test]
    fn test_run_missing_file() {
        let config = Config {
            kind: ResourceKind::Webinar,
            path: "does/not/exist.json".to_string(),
        };
        assert!(matches!(run(config), Err(Error::Io(_))));
    }
}
