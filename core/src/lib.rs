//! Blocking client for the checks API of a remote monitoring service.
//!
//! # Overview
//! Create, read, update and delete checks over JSON/HTTPS. Every call is a
//! single request/response exchange: no retries, no pagination, no caching.
//!
//! # Design
//! - `ChecklyClient` holds an explicit `ClientConfig`, a shared `Transport`
//!   and an optional `TraceSink`; nothing is global.
//! - Each operation is split into `build_*` (produces request) and
//!   `parse_*` (consumes response), so the HTTP mapping is testable without
//!   a network. `create_check` and friends run the pair through the transport.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.
//!
//! ```no_run
//! use checkly_core::{Check, CheckType, ChecklyClient, ClientConfig};
//!
//! let client = ChecklyClient::new(ClientConfig::new("api-key"));
//! let check = Check {
//!     name: "homepage".to_string(),
//!     check_type: CheckType::Browser,
//!     activated: true,
//!     ..Check::default()
//! };
//! let id = client.create_check(&check)?;
//! client.delete_check(&id)?;
//! # Ok::<(), checkly_core::ApiError>(())
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod trace;
pub mod types;

pub use client::ChecklyClient;
pub use config::{ClientConfig, API_KEY_ENV, BASE_URL_ENV, DEFAULT_BASE_URL};
pub use error::{ApiError, ConfigError, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport, UreqTransport};
pub use trace::TraceSink;
pub use types::{
    AlertChannel, AlertSettings, Assertion, AssertionComparison, AssertionSource, BasicAuth, Check,
    CheckType, ConfigValue, EnvironmentVariable, EscalationType, KeyValue, Reminders, Request,
    RunBasedEscalation, SslCertificates, Subscription, TimeBasedEscalation,
};
