//! Print job descriptions and the `submit` wire payload.
//!
//! # Design
//! `JobContent` makes the "exactly one content representation" rule a type:
//! a job carries either a URL or a byte buffer, never both. The byte variant
//! is always sent base64-encoded with `contentTransferEncoding: "base64"`;
//! the URL variant is sent verbatim under `contentType: "url"`.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::PrintError;

/// A printer record as returned by `search`. Fields are passed through as-is.
pub type Printer = Map<String, Value>;

pub const DEFAULT_CONTENT_TYPE: &str = "application/pdf";
pub const URL_CONTENT_TYPE: &str = "url";
pub const BASE64_TRANSFER_ENCODING: &str = "base64";

/// What gets printed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobContent {
    /// The service fetches the document itself.
    Url(String),
    /// Document bytes, sent base64-encoded.
    Encoded { data: Vec<u8>, content_type: String },
}

/// A single print job submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintJob {
    pub printer_id: String,
    pub title: String,
    pub content: JobContent,
    pub ticket: Option<String>,
}

impl PrintJob {
    pub fn url(printer_id: impl Into<String>, title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            printer_id: printer_id.into(),
            title: title.into(),
            content: JobContent::Url(url.into()),
            ticket: None,
        }
    }

    /// `content_type` of `None` means `application/pdf`.
    pub fn bytes(
        printer_id: impl Into<String>,
        title: impl Into<String>,
        data: Vec<u8>,
        content_type: Option<&str>,
    ) -> Self {
        Self {
            printer_id: printer_id.into(),
            title: title.into(),
            content: JobContent::Encoded {
                data,
                content_type: content_type.unwrap_or(DEFAULT_CONTENT_TYPE).to_string(),
            },
            ticket: None,
        }
    }

    /// Attach an opaque ticket. Empty tickets are dropped.
    pub fn with_ticket(mut self, ticket: Option<&str>) -> Self {
        self.ticket = ticket.filter(|t| !t.is_empty()).map(str::to_string);
        self
    }

    /// Printer id first, then content.
    pub fn validate(&self) -> Result<(), PrintError> {
        if self.printer_id.is_empty() {
            return Err(PrintError::missing_printer_id());
        }
        if let JobContent::Encoded { data, .. } = &self.content {
            if data.is_empty() {
                return Err(PrintError::empty_content());
            }
        }
        Ok(())
    }

    pub fn to_payload(&self) -> SubmitPayload {
        let (content, content_type, content_transfer_encoding) = match &self.content {
            JobContent::Url(url) => (url.clone(), URL_CONTENT_TYPE.to_string(), None),
            JobContent::Encoded { data, content_type } => (
                STANDARD.encode(data),
                content_type.clone(),
                Some(BASE64_TRANSFER_ENCODING.to_string()),
            ),
        };
        SubmitPayload {
            printer_id: self.printer_id.clone(),
            title: self.title.clone(),
            content,
            content_type,
            content_transfer_encoding,
            ticket: self.ticket.clone(),
        }
    }
}

/// JSON body of a `submit` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitPayload {
    #[serde(rename = "printerid")]
    pub printer_id: String,
    pub title: String,
    pub content: String,
    pub content_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_transfer_encoding: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticket: Option<String>,
}
