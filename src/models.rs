use chrono::{DateTime, FixedOffset};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer, Serialize};

use crate::Resource;

/// Known `locale` values. The field itself accepts any string.
pub mod locale {
    pub const EN_US: &str = "en_US";
    pub const DE_DE: &str = "de_DE";
    pub const ES_ES: &str = "es_ES";
    pub const FR_FR: &str = "fr_FR";
    pub const IT_IT: &str = "it_IT";
    pub const ZH_CN: &str = "zh_CN";
}

/// Known values of the `type` field (recurrence type).
pub mod webinar_type {
    pub const SINGLE_SESSION: &str = "single_session";
    pub const SERIES: &str = "series";
    pub const SEQUENCE: &str = "sequence";
}

/// Documented as the recurrence types, but the API answers `NEVER` for
/// single sessions.
pub mod recurrence_period {
    pub const NEVER: &str = "NEVER";
}

/// Documented in lower case; the API answers `CLASSIC` in upper case.
pub mod experience_type {
    pub const CLASSIC: &str = "CLASSIC";
    pub const BROADCAST: &str = "broadcast";
    pub const SIMULIVE: &str = "simulive";
}

/// A start and an end time, e.g. `2015-07-13T10:00:00Z` to `2015-07-13T22:00:00Z`.
///
/// The API expects `start_time <= end_time`; that is not checked here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateTimeRange {
    #[serde(with = "crate::iso8601")]
    pub start_time: DateTime<FixedOffset>,
    #[serde(with = "crate::iso8601")]
    pub end_time: DateTime<FixedOffset>,
}

impl DateTimeRange {
    pub fn new(start_time: DateTime<FixedOffset>, end_time: DateTime<FixedOffset>) -> Self {
        DateTimeRange {
            start_time,
            end_time,
        }
    }
}

/// Confirmation, reminder and absentee follow-up email settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailSettings {
    pub enabled: bool,
}

impl EmailSettings {
    pub fn new(enabled: bool) -> Self {
        EmailSettings { enabled }
    }
}

impl Default for EmailSettings {
    fn default() -> Self {
        EmailSettings { enabled: true }
    }
}

/// Attendee follow-up email settings: the shared `enabled` flag plus the
/// certificate toggle, flattened into one JSON object on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AttendeeFollowUpEmailSetting {
    #[serde(flatten)]
    pub email: EmailSettings,
    pub include_certificate: bool,
}

impl AttendeeFollowUpEmailSetting {
    pub fn new(enabled: bool, include_certificate: bool) -> Self {
        AttendeeFollowUpEmailSetting {
            email: EmailSettings::new(enabled),
            include_certificate,
        }
    }

    pub fn enabled(&self) -> bool {
        self.email.enabled
    }
}

impl Default for AttendeeFollowUpEmailSetting {
    fn default() -> Self {
        AttendeeFollowUpEmailSetting {
            email: EmailSettings::default(),
            include_certificate: true,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WebinarEmailSettings {
    pub confirmation_email: EmailSettings,
    pub reminder_email: EmailSettings,
    pub absentee_follow_up_email: EmailSettings,
    pub attendee_follow_up_email: AttendeeFollowUpEmailSetting,
}

/// A webinar as returned by the API.
///
/// Left out on purpose: `pendingRegistrants`, `deniedRegistrants`,
/// `hasDisclaimer`, `isMainOrganizerActive` and `broadcast` are undocumented,
/// `recordingAssetKey` is write only. They are ignored when decoding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "WebinarRecord")]
pub struct Webinar {
    /// 128 characters maximum.
    pub subject: String,
    /// May hold a single interval.
    pub times: Vec<DateTimeRange>,
    pub webinar_key: String,
    /// The 9-digit webinar ID.
    pub webinar_id: String,
    pub description: String,
    /// Documented as an integer, answered as either.
    pub organizer_key: String,
    pub organizer_email: String,
    pub organizer_name: String,
    pub account_key: String,
    pub registration_url: String,
    /// IANA name, e.g. `Europe/Berlin`.
    pub time_zone: String,
    /// See [`locale`].
    pub locale: String,
    pub in_session: bool,
    pub impromptu: bool,
    /// See [`webinar_type`].
    #[serde(rename = "type")]
    pub webinar_type: String,
    pub number_of_registrants: u32,
    pub registration_limit: u32,
    /// See [`recurrence_period`].
    pub recurrence_period: String,
    pub is_ondemand: bool,
    /// See [`experience_type`].
    pub experience_type: String,
    pub is_password_protected: bool,
}

impl Webinar {
    /// Picks the subject for a webinar read back from the API. Responses have
    /// been seen carrying the title as `name` instead of `subject`, so a
    /// missing or blank subject is replaced by the name when one was sent.
    pub fn normalize_subject(subject: Option<String>, name: Option<String>) -> Option<String> {
        match subject {
            Some(subject) if !subject.trim().is_empty() => Some(subject),
            subject => name.or(subject),
        }
    }

    /// The time zone, if `time_zone` names one chrono-tz knows.
    pub fn tz(&self) -> Option<Tz> {
        self.time_zone.parse().ok()
    }
}

impl Resource for Webinar {
    const NAME: &'static str = "webinar";
}

/// Wire shape of [`Webinar`]; only exists until the subject is settled.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WebinarRecord {
    subject: Option<String>,
    name: Option<String>,
    times: Vec<DateTimeRange>,
    #[serde(deserialize_with = "string_or_integer")]
    webinar_key: String,
    #[serde(deserialize_with = "string_or_integer")]
    webinar_id: String,
    description: String,
    #[serde(deserialize_with = "string_or_integer")]
    organizer_key: String,
    organizer_email: String,
    organizer_name: String,
    #[serde(deserialize_with = "string_or_integer")]
    account_key: String,
    registration_url: String,
    time_zone: String,
    locale: String,
    #[serde(default)]
    in_session: bool,
    #[serde(default)]
    impromptu: bool,
    #[serde(rename = "type", default = "default_webinar_type")]
    webinar_type: String,
    #[serde(default)]
    number_of_registrants: u32,
    #[serde(default = "default_registration_limit")]
    registration_limit: u32,
    #[serde(default = "default_recurrence_period")]
    recurrence_period: String,
    #[serde(default)]
    is_ondemand: bool,
    #[serde(default = "default_experience_type")]
    experience_type: String,
    #[serde(default)]
    is_password_protected: bool,
}

impl TryFrom<WebinarRecord> for Webinar {
    type Error = &'static str;

    fn try_from(record: WebinarRecord) -> Result<Self, Self::Error> {
        let subject = Webinar::normalize_subject(record.subject, record.name)
            .ok_or("missing field `subject`")?;

        Ok(Webinar {
            subject,
            times: record.times,
            webinar_key: record.webinar_key,
            webinar_id: record.webinar_id,
            description: record.description,
            organizer_key: record.organizer_key,
            organizer_email: record.organizer_email,
            organizer_name: record.organizer_name,
            account_key: record.account_key,
            registration_url: record.registration_url,
            time_zone: record.time_zone,
            locale: record.locale,
            in_session: record.in_session,
            impromptu: record.impromptu,
            webinar_type: record.webinar_type,
            number_of_registrants: record.number_of_registrants,
            registration_limit: record.registration_limit,
            recurrence_period: record.recurrence_period,
            is_ondemand: record.is_ondemand,
            experience_type: record.experience_type,
            is_password_protected: record.is_password_protected,
        })
    }
}

/// Body of a create request. Keys are assigned by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateWebinar {
    pub subject: String,
    pub description: String,
    pub time_zone: String,
    pub locale: String,
    pub times: Vec<DateTimeRange>,
    #[serde(rename = "type", default = "default_webinar_type")]
    pub webinar_type: String,
    #[serde(default)]
    pub email_settings: WebinarEmailSettings,
    #[serde(default)]
    pub is_ondemand: bool,
    #[serde(default = "default_experience_type")]
    pub experience_type: String,
}

impl CreateWebinar {
    pub fn new(
        subject: impl Into<String>,
        description: impl Into<String>,
        time_zone: impl Into<String>,
        locale: impl Into<String>,
        times: Vec<DateTimeRange>,
    ) -> Self {
        CreateWebinar {
            subject: subject.into(),
            description: description.into(),
            time_zone: time_zone.into(),
            locale: locale.into(),
            times,
            webinar_type: default_webinar_type(),
            email_settings: WebinarEmailSettings::default(),
            is_ondemand: false,
            experience_type: default_experience_type(),
        }
    }

    pub fn tz(&self) -> Option<Tz> {
        self.time_zone.parse().ok()
    }
}

impl Resource for CreateWebinar {
    const NAME: &'static str = "create webinar request";
}

/// Body of an update request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateWebinar {
    pub subject: String,
    pub description: String,
    pub time_zone: String,
    pub locale: String,
    pub times: Vec<DateTimeRange>,
    #[serde(default)]
    pub email_settings: WebinarEmailSettings,
}

impl UpdateWebinar {
    pub fn new(
        subject: impl Into<String>,
        description: impl Into<String>,
        time_zone: impl Into<String>,
        locale: impl Into<String>,
        times: Vec<DateTimeRange>,
    ) -> Self {
        UpdateWebinar {
            subject: subject.into(),
            description: description.into(),
            time_zone: time_zone.into(),
            locale: locale.into(),
            times,
            email_settings: WebinarEmailSettings::default(),
        }
    }
}

/// The read shape carries no email settings, so they start from defaults.
impl From<&Webinar> for UpdateWebinar {
    fn from(webinar: &Webinar) -> Self {
        UpdateWebinar::new(
            webinar.subject.clone(),
            webinar.description.clone(),
            webinar.time_zone.clone(),
            webinar.locale.clone(),
            webinar.times.clone(),
        )
    }
}

impl Resource for UpdateWebinar {
    const NAME: &'static str = "update webinar request";
}

impl Resource for DateTimeRange {
    const NAME: &'static str = "time range";
}

impl Resource for EmailSettings {
    const NAME: &'static str = "email settings";
}

impl Resource for AttendeeFollowUpEmailSetting {
    const NAME: &'static str = "attendee follow-up email settings";
}

impl Resource for WebinarEmailSettings {
    const NAME: &'static str = "webinar email settings";
}

fn default_webinar_type() -> String {
    webinar_type::SINGLE_SESSION.to_string()
}

fn default_registration_limit() -> u32 {
    250
}

fn default_recurrence_period() -> String {
    recurrence_period::NEVER.to_string()
}

fn default_experience_type() -> String {
    experience_type::CLASSIC.to_string()
}

fn string_or_integer<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Key {
        Text(String),
        Integer(u64),
    }

    Ok(match Key::deserialize(deserializer)? {
        Key::Text(text) => text,
        Key::Integer(number) => number.to_string(),
    })
}
