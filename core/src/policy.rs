//! What happens to a failure once an operation has produced one.
//!
//! # Design
//! A client is built with exactly one `ErrorPolicy`. Every failure passes
//! through `ErrorPolicy::handle`: returning `Err` hands the error back to the
//! caller, returning `Ok(())` swallows it and the operation returns its
//! failure sentinel (`Ok(false)` for submits, `Ok(None)` otherwise).

use tracing::warn;

use crate::error::PrintError;

pub trait ErrorPolicy: Send + Sync {
    fn handle(&self, error: PrintError) -> Result<(), PrintError>;
}

/// Return every failure to the caller as `Err`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Raise;

impl ErrorPolicy for Raise {
    fn handle(&self, error: PrintError) -> Result<(), PrintError> {
        Err(error)
    }
}

/// Log every failure as a warning and let the caller see the sentinel.
#[derive(Debug, Clone, Copy, Default)]
pub struct Report;

impl ErrorPolicy for Report {
    fn handle(&self, error: PrintError) -> Result<(), PrintError> {
        let code = error.code();
        warn!(target: "cloudprint", code = %code, "{}", report_line(&error));
        Ok(())
    }
}

/// `Raise` when `throw_on_error`, `Report` otherwise.
pub fn from_flag(throw_on_error: bool) -> Box<dyn ErrorPolicy> {
    if throw_on_error {
        Box::new(Raise)
    } else {
        Box::new(Report)
    }
}

/// `"<code>: <message>"`, or just the message when the code is empty.
pub fn report_line(error: &PrintError) -> String {
    let code = error.code();
    if code.is_empty() {
        error.message()
    } else {
        format!("{code}: {}", error.message())
    }
}
