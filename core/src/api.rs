//! Request builder and response parser for the cloud print service.
//!
//! # Design
//! `CloudPrintApi` holds the auth token and base URL and nothing else. Each
//! operation is split into a `build_*` method that produces an `HttpRequest`
//! and a `parse_*` method that consumes an `HttpResponse`, so the I/O
//! boundary stays explicit. `PrintClient` glues the two halves together
//! through a `Transport`; the FFI crate hands them to a foreign host instead.

use std::fmt;

use serde_json::{Map, Value};

use crate::envelope::{is_truthy, Envelope};
use crate::error::PrintError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{PrintJob, Printer};

pub const DEFAULT_BASE_URL: &str = "https://www.google.com/cloudprint/";
pub const GDATA_VERSION: &str = "3.0";

/// Path segment identifying a service operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Search,
    Submit,
}

impl Resource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Resource::Search => "search",
            Resource::Submit => "submit",
        }
    }
}

impl AsRef<str> for Resource {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone)]
pub struct CloudPrintApi {
    auth_token: String,
    base_url: String,
}

impl fmt::Debug for CloudPrintApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CloudPrintApi")
            .field("auth_token", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl CloudPrintApi {
    pub fn new(auth_token: impl Into<String>) -> Self {
        Self {
            auth_token: auth_token.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn auth_token(&self) -> &str {
        &self.auth_token
    }

    pub fn set_auth_token(&mut self, auth_token: impl Into<String>) {
        self.auth_token = auth_token.into();
    }

    pub fn has_token(&self) -> bool {
        !self.auth_token.is_empty()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn set_base_url(&mut self, base_url: impl Into<String>) {
        self.base_url = base_url.into();
    }

    /// Full URL of `resource`. A missing trailing slash on the base URL is
    /// filled in.
    pub fn url_for(&self, resource: &str) -> String {
        if self.base_url.ends_with('/') || self.base_url.is_empty() {
            format!("{}{resource}", self.base_url)
        } else {
            format!("{}/{resource}", self.base_url)
        }
    }

    /// Build a request for any resource of the service.
    ///
    /// `data` is attached as a JSON body only when it is truthy; `None`,
    /// `null` and `{}` all produce a request without a body.
    pub fn build_request(
        &self,
        resource: &str,
        method: HttpMethod,
        data: Option<&Value>,
    ) -> Result<HttpRequest, PrintError> {
        if !self.has_token() {
            return Err(PrintError::missing_token());
        }

        let mut headers = vec![
            (
                "Authorization".to_string(),
                format!("GoogleLogin auth={}", self.auth_token),
            ),
            ("GData-Version".to_string(), GDATA_VERSION.to_string()),
        ];
        let body = match data.filter(|d| is_truthy(d)) {
            Some(data) => {
                let body = serde_json::to_string(data)
                    .map_err(|e| PrintError::Serialization(e.to_string()))?;
                headers.push(("Content-Type".to_string(), "application/json".to_string()));
                Some(body)
            }
            None => None,
        };

        Ok(HttpRequest {
            method,
            url: self.url_for(resource),
            headers,
            body,
        })
    }

    pub fn build_list_printers(&self) -> Result<HttpRequest, PrintError> {
        self.build_request(Resource::Search.as_str(), HttpMethod::Get, None)
    }

    pub fn build_submit(&self, job: &PrintJob) -> Result<HttpRequest, PrintError> {
        job.validate()?;
        let data = serde_json::to_value(job.to_payload())
            .map_err(|e| PrintError::Serialization(e.to_string()))?;
        self.build_request(Resource::Submit.as_str(), HttpMethod::Post, Some(&data))
    }

    /// Shared interpretation of every response: status first, then envelope.
    pub fn parse_response(&self, response: HttpResponse) -> Result<Map<String, Value>, PrintError> {
        if response.is_status_error() {
            return Err(PrintError::Transport {
                status: response.status,
                body: response.body,
            });
        }
        Envelope::decode(&response.body)?.into_result()
    }

    /// The `printers` field of a successful `search`. Absent means empty.
    pub fn parse_list_printers(&self, response: HttpResponse) -> Result<Vec<Printer>, PrintError> {
        let mut body = self.parse_response(response)?;
        match body.remove("printers") {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(printers) => serde_json::from_value(printers)
                .map_err(|e| PrintError::Decode(format!("printers: {e}"))),
        }
    }

    pub fn parse_submit(&self, response: HttpResponse) -> Result<(), PrintError> {
        self.parse_response(response).map(|_| ())
    }
}
