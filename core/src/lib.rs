//! Blocking client for the cloud print HTTP API.
//!
//! # Overview
//! Lists printers and submits print jobs from a file, a URL or in-memory
//! bytes. Authentication is a `GoogleLogin` bearer token supplied by the
//! caller; acquiring or refreshing it is out of scope.
//!
//! # Design
//! - `CloudPrintApi` builds `HttpRequest` values and parses `HttpResponse`
//!   values without touching the network, so the I/O boundary is explicit
//!   and a foreign host can drive it (see the FFI crate).
//! - `PrintClient` runs those requests through an injected `Transport`
//!   (`UreqTransport` by default) and routes every failure through one
//!   `ErrorPolicy`: `Raise` returns `Err`, `Report` logs a warning and the
//!   operation returns `Ok(false)` / `Ok(None)`.
//! - Response bodies decode into `Envelope::Success` / `Envelope::Failure`;
//!   a missing `success` flag counts as failure.

pub mod api;
pub mod client;
pub mod config;
pub mod envelope;
pub mod error;
pub mod http;
pub mod policy;
pub mod transport;
pub mod types;

pub use api::{CloudPrintApi, Resource, DEFAULT_BASE_URL};
pub use client::PrintClient;
pub use config::ClientConfig;
pub use envelope::Envelope;
pub use error::{ErrorCode, PrintError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use policy::{ErrorPolicy, Raise, Report};
pub use transport::{Transport, UreqTransport};
pub use types::{JobContent, PrintJob, Printer, SubmitPayload};
