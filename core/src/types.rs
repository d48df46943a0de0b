//! Domain DTOs for the checks API.
//!
//! # Design
//! Field names and omission rules follow the remote schema. Every struct
//! decodes leniently: missing fields fall back to their defaults and a `null`
//! in any non-optional field decodes to that field's default, so a server that
//! adds or nulls fields does not break the client. Optional fields are skipped on encode
//! when absent. The mock-server crate keeps its own untyped view of these
//! objects; integration tests catch schema drift between the two.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Decode `null` as the type's default value.
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Kind of check the service runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CheckType {
    Browser,
    #[default]
    Api,
    MultiStep,
    Heartbeat,
    /// A type this client does not know yet. Encodes as `UNKNOWN`, so such a
    /// check can be read and deleted but not sent back in an update.
    #[serde(other)]
    Unknown,
}

/// How a failing check escalates to an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EscalationType {
    /// Alert after a number of consecutive failed runs.
    RunBased,
    /// Alert after the check has been failing for some minutes.
    TimeBased,
}

/// Part of the API response an assertion inspects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssertionSource {
    #[default]
    StatusCode,
    JsonBody,
    TextBody,
    Headers,
    ResponseTime,
}

/// Comparison applied between the assertion source and its target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssertionComparison {
    #[default]
    Equals,
    NotEquals,
    IsEmpty,
    NotEmpty,
    GreaterThan,
    LessThan,
    Contains,
    NotContains,
}

/// A monitoring check.
///
/// `id`, `created_at` and `updated_at` are assigned by the server; leave them
/// empty when creating a check.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Check {
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "nullable")]
    pub id: String,
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    #[serde(deserialize_with = "nullable")]
    pub check_type: CheckType,
    #[serde(deserialize_with = "nullable")]
    pub frequency: u32,
    #[serde(deserialize_with = "nullable")]
    pub activated: bool,
    #[serde(deserialize_with = "nullable")]
    pub muted: bool,
    #[serde(deserialize_with = "nullable")]
    pub should_fail: bool,
    #[serde(deserialize_with = "nullable")]
    pub locations: Vec<String>,
    #[serde(deserialize_with = "nullable")]
    pub degraded_response_time: u32,
    #[serde(deserialize_with = "nullable")]
    pub max_response_time: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub script: Option<String>,
    #[serde(rename = "created_at", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "updated_at", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "nullable")]
    pub environment_variables: Vec<EnvironmentVariable>,
    #[serde(deserialize_with = "nullable")]
    pub double_check: bool,
    #[serde(skip_serializing_if = "Vec::is_empty", deserialize_with = "nullable")]
    pub tags: Vec<String>,
    #[serde(deserialize_with = "nullable")]
    pub ssl_check: bool,
    #[serde(deserialize_with = "nullable")]
    pub ssl_check_domain: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub setup_snippet_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tear_down_snippet_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_setup_script: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_tear_down_script: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alert_settings: Option<AlertSettings>,
    #[serde(deserialize_with = "nullable")]
    pub use_global_alert_settings: bool,
    #[serde(deserialize_with = "nullable")]
    pub request: Request,
    #[serde(deserialize_with = "nullable")]
    pub alert_channel_subscriptions: Vec<Subscription>,
}

/// The HTTP request an API check performs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Request {
    #[serde(deserialize_with = "nullable")]
    pub method: String,
    #[serde(deserialize_with = "nullable")]
    pub url: String,
    #[serde(deserialize_with = "nullable")]
    pub follow_redirects: bool,
    #[serde(deserialize_with = "nullable")]
    pub body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_type: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub headers: Vec<KeyValue>,
    #[serde(deserialize_with = "nullable")]
    pub query_parameters: Vec<KeyValue>,
    #[serde(deserialize_with = "nullable")]
    pub assertions: Vec<Assertion>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub basic_auth: Option<BasicAuth>,
}

impl Default for Request {
    fn default() -> Self {
        Self {
            method: "GET".to_string(),
            url: String::new(),
            follow_redirects: false,
            body: String::new(),
            body_type: None,
            headers: Vec::new(),
            query_parameters: Vec::new(),
            assertions: Vec::new(),
            basic_auth: None,
        }
    }
}

/// A rule evaluated against the check's API response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Assertion {
    #[serde(deserialize_with = "nullable")]
    pub edit: bool,
    #[serde(deserialize_with = "nullable")]
    pub order: i32,
    #[serde(deserialize_with = "nullable")]
    pub array_index: i32,
    #[serde(deserialize_with = "nullable")]
    pub array_selector: i32,
    #[serde(deserialize_with = "nullable")]
    pub source: AssertionSource,
    #[serde(deserialize_with = "nullable")]
    pub property: String,
    #[serde(deserialize_with = "nullable")]
    pub comparison: AssertionComparison,
    #[serde(deserialize_with = "nullable")]
    pub target: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BasicAuth {
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "nullable")]
    pub username: String,
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "nullable")]
    pub password: String,
}

/// A request header or query parameter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyValue {
    #[serde(deserialize_with = "nullable")]
    pub key: String,
    #[serde(deserialize_with = "nullable")]
    pub value: String,
    #[serde(deserialize_with = "nullable")]
    pub locked: bool,
}

/// A variable exposed to the check while it runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentVariable {
    #[serde(deserialize_with = "nullable")]
    pub key: String,
    #[serde(deserialize_with = "nullable")]
    pub value: String,
    #[serde(deserialize_with = "nullable")]
    pub locked: bool,
}

/// Escalation policy for a check's alerts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AlertSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub escalation_type: Option<EscalationType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_based_escalation: Option<RunBasedEscalation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_based_escalation: Option<TimeBasedEscalation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reminders: Option<Reminders>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssl_certificates: Option<SslCertificates>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RunBasedEscalation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_run_threshold: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TimeBasedEscalation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minutes_failing_threshold: Option<u32>,
}

/// Follow-up notifications sent after the first alert.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Reminders {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<u32>,
    /// Minutes between reminders.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval: Option<u32>,
}

/// Alerting on SSL certificates that are about to expire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SslCertificates {
    #[serde(deserialize_with = "nullable")]
    pub enabled: bool,
    /// Days before expiry at which to alert.
    #[serde(deserialize_with = "nullable")]
    pub alert_threshold: u32,
}

/// A notification channel. Read-only on the API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertChannel {
    #[serde(deserialize_with = "nullable")]
    pub id: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub channel_type: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty", deserialize_with = "nullable")]
    pub config: BTreeMap<String, ConfigValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// One value in an alert channel's free-form configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Bool(bool),
    Number(serde_json::Number),
    String(String),
    Map(BTreeMap<String, ConfigValue>),
}

/// Binding between a check and an alert channel. Read-only on the API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Subscription {
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "nullable")]
    pub id: String,
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "nullable")]
    pub check_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alert_channel_id: Option<i64>,
    #[serde(deserialize_with = "nullable")]
    pub activated: bool,
}
