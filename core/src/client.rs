//! `PrintClient`: the blocking, policy-aware front end.
//!
//! # Design
//! Each operation builds a request with `CloudPrintApi`, runs it through the
//! injected `Transport` and parses the response. Whatever fails along the way
//! goes through the client's `ErrorPolicy` exactly once, so the same call
//! either returns `Err` (raising policy) or a sentinel (`Ok(false)` /
//! `Ok(None)`) after the failure has been logged (reporting policy).

use std::fmt;
use std::path::Path;

use serde_json::{Map, Value};
use tracing::debug;

use crate::api::CloudPrintApi;
use crate::config::ClientConfig;
use crate::error::PrintError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::policy::{self, ErrorPolicy};
use crate::transport::{Transport, UreqTransport};
use crate::types::{PrintJob, Printer};

pub struct PrintClient<T = UreqTransport> {
    api: CloudPrintApi,
    transport: T,
    policy: Box<dyn ErrorPolicy>,
}

impl<T> fmt::Debug for PrintClient<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrintClient").field("api", &self.api).finish_non_exhaustive()
    }
}

impl PrintClient<UreqTransport> {
    /// Client talking to the real service over `ureq`.
    pub fn with_ureq(
        auth_token: impl Into<String>,
        throw_on_error: bool,
    ) -> Result<Self, PrintError> {
        Self::new(auth_token, UreqTransport::new(), policy::from_flag(throw_on_error))
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, PrintError> {
        let mut client = Self::with_ureq(config.auth_token.clone(), config.throw_on_error)?;
        client.set_base_url(config.base_url.clone());
        Ok(client)
    }
}

impl<T: Transport> PrintClient<T> {
    /// An empty token is a configuration failure. Under a reporting policy
    /// the client is still returned, but every operation on it fails the
    /// same way until a token is set.
    pub fn new(
        auth_token: impl Into<String>,
        transport: T,
        policy: Box<dyn ErrorPolicy>,
    ) -> Result<Self, PrintError> {
        let client = Self {
            api: CloudPrintApi::new(auth_token),
            transport,
            policy,
        };
        if !client.api.has_token() {
            client.policy.handle(PrintError::missing_token())?;
        }
        Ok(client)
    }

    pub fn auth_token(&self) -> &str {
        self.api.auth_token()
    }

    pub fn set_auth_token(&mut self, auth_token: impl Into<String>) {
        self.api.set_auth_token(auth_token);
    }

    pub fn base_url(&self) -> &str {
        self.api.base_url()
    }

    pub fn set_base_url(&mut self, base_url: impl Into<String>) {
        self.api.set_base_url(base_url);
    }

    pub fn set_throw_on_error(&mut self, throw_on_error: bool) {
        self.policy = policy::from_flag(throw_on_error);
    }

    pub fn set_error_policy(&mut self, policy: Box<dyn ErrorPolicy>) {
        self.policy = policy;
    }

    /// Printers visible to the token, in the order the service sent them.
    pub fn list_printers(&self) -> Result<Option<Vec<Printer>>, PrintError> {
        let outcome = self
            .api
            .build_list_printers()
            .and_then(|req| self.dispatch(req))
            .and_then(|resp| self.api.parse_list_printers(resp));
        self.settle(outcome)
    }

    /// Read `path` fully and submit it base64-encoded.
    pub fn submit_from_file(
        &self,
        printer_id: &str,
        title: &str,
        path: impl AsRef<Path>,
        content_type: Option<&str>,
        ticket: Option<&str>,
    ) -> Result<bool, PrintError> {
        let outcome = read_job_file(printer_id, path.as_ref()).and_then(|data| {
            self.submit(PrintJob::bytes(printer_id, title, data, content_type).with_ticket(ticket))
        });
        self.settle_submit(outcome)
    }

    /// Let the service fetch `url` itself.
    pub fn submit_from_url(
        &self,
        printer_id: &str,
        title: &str,
        url: &str,
        ticket: Option<&str>,
    ) -> Result<bool, PrintError> {
        let outcome = self.submit(PrintJob::url(printer_id, title, url).with_ticket(ticket));
        self.settle_submit(outcome)
    }

    pub fn submit_from_content(
        &self,
        printer_id: &str,
        title: &str,
        content: &[u8],
        content_type: Option<&str>,
        ticket: Option<&str>,
    ) -> Result<bool, PrintError> {
        let job = PrintJob::bytes(printer_id, title, content.to_vec(), content_type).with_ticket(ticket);
        let outcome = self.submit(job);
        self.settle_submit(outcome)
    }

    /// Submit a prepared job.
    pub fn submit_job(&self, job: &PrintJob) -> Result<bool, PrintError> {
        let outcome = self.submit_ref(job);
        self.settle_submit(outcome)
    }

    /// Raw access to any resource of the service. Returns the decoded
    /// envelope body, `success` included.
    pub fn send_api_request(
        &self,
        resource: impl AsRef<str>,
        method: HttpMethod,
        data: Option<&Value>,
    ) -> Result<Option<Map<String, Value>>, PrintError> {
        let outcome = self
            .api
            .build_request(resource.as_ref(), method, data)
            .and_then(|req| self.dispatch(req))
            .and_then(|resp| self.api.parse_response(resp));
        self.settle(outcome)
    }

    fn submit(&self, job: PrintJob) -> Result<(), PrintError> {
        self.submit_ref(&job)
    }

    fn submit_ref(&self, job: &PrintJob) -> Result<(), PrintError> {
        let req = self.api.build_submit(job)?;
        let resp = self.dispatch(req)?;
        self.api.parse_submit(resp)
    }

    fn dispatch(&self, request: HttpRequest) -> Result<HttpResponse, PrintError> {
        debug!(
            method = %request.method,
            url = %request.url,
            has_body = request.body.is_some(),
            "dispatching cloud print request"
        );
        let response = self.transport.execute(request)?;
        debug!(status = response.status, "cloud print response received");
        Ok(response)
    }

    /// The single place failures meet the policy.
    fn settle<V>(&self, outcome: Result<V, PrintError>) -> Result<Option<V>, PrintError> {
        match outcome {
            Ok(value) => Ok(Some(value)),
            Err(error) => {
                self.policy.handle(error)?;
                Ok(None)
            }
        }
    }

    fn settle_submit(&self, outcome: Result<(), PrintError>) -> Result<bool, PrintError> {
        Ok(self.settle(outcome)?.is_some())
    }
}

/// Printer id is checked before the file is touched.
fn read_job_file(printer_id: &str, path: &Path) -> Result<Vec<u8>, PrintError> {
    if printer_id.is_empty() {
        return Err(PrintError::missing_printer_id());
    }
    match std::fs::read(path) {
        Ok(data) if !data.is_empty() => Ok(data),
        Ok(_) => Err(PrintError::unreadable_file(None)),
        Err(e) => Err(PrintError::unreadable_file(Some(e))),
    }
}
