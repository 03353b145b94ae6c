//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core type but uses C-compatible representations:
//! `*mut c_char` instead of `String`, raw pointers instead of `Vec`, and
//! enums with explicit discriminants. Printer lists cross the boundary as a
//! JSON string since their records are opaque to this library anyway.
//! Conversion functions live here to keep `lib.rs` focused on the
//! `extern "C"` surface.

use std::ffi::CString;
use std::os::raw::c_char;

use cloudprint_core::{HttpMethod, PrintError, Printer};

/// Opaque handle to a `CloudPrintApi`. C callers receive a pointer to this
/// and pass it back into every FFI function.
pub struct FfiCloudPrintApi {
    pub(crate) inner: cloudprint_core::CloudPrintApi,
}

/// Build a C string, replacing interior NULs so conversion cannot fail.
pub(crate) fn c_string(s: impl Into<String>) -> *mut c_char {
    let s: String = s.into();
    let cleaned = if s.contains('\0') { s.replace('\0', "\u{fffd}") } else { s };
    CString::new(cleaned).unwrap_or_default().into_raw()
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// HTTP method as a C enum.
#[repr(C)]
pub enum FfiHttpMethod {
    Get = 0,
    Post = 1,
    Put = 2,
    Delete = 3,
}

impl From<HttpMethod> for FfiHttpMethod {
    fn from(m: HttpMethod) -> Self {
        match m {
            HttpMethod::Get => FfiHttpMethod::Get,
            HttpMethod::Post => FfiHttpMethod::Post,
            HttpMethod::Put => FfiHttpMethod::Put,
            HttpMethod::Delete => FfiHttpMethod::Delete,
        }
    }
}

/// A single HTTP header as a key-value pair of C strings.
#[repr(C)]
pub struct FfiHeader {
    pub key: *mut c_char,
    pub value: *mut c_char,
}

/// An HTTP request described as C-compatible plain data.
///
/// Built by `cloudprint_build_*` functions. The C caller executes the request
/// and passes the response back through `cloudprint_parse_*`.
#[repr(C)]
pub struct FfiHttpRequest {
    pub method: FfiHttpMethod,
    pub url: *mut c_char,
    pub headers: *mut FfiHeader,
    pub headers_len: u32,
    pub body: *mut c_char,
}

impl FfiHttpRequest {
    /// Convert a core `HttpRequest` into a heap-allocated `FfiHttpRequest`.
    pub(crate) fn from_core(req: cloudprint_core::HttpRequest) -> *mut Self {
        let url = c_string(req.url);
        let body = match req.body {
            Some(b) => c_string(b),
            None => std::ptr::null_mut(),
        };

        let headers_len = req.headers.len() as u32;
        let headers = if req.headers.is_empty() {
            std::ptr::null_mut()
        } else {
            let ffi_headers: Box<[FfiHeader]> = req
                .headers
                .into_iter()
                .map(|(k, v)| FfiHeader {
                    key: c_string(k),
                    value: c_string(v),
                })
                .collect();
            Box::into_raw(ffi_headers) as *mut FfiHeader
        };

        Box::into_raw(Box::new(FfiHttpRequest {
            method: req.method.into(),
            url,
            headers,
            headers_len,
            body,
        }))
    }
}

// ---------------------------------------------------------------------------
// Response input (caller-provided, not heap-allocated by us)
// ---------------------------------------------------------------------------

/// An HTTP response described as C-compatible plain data.
///
/// The C caller constructs this on the stack after executing an HTTP request,
/// then passes a pointer to a `cloudprint_parse_*` function. The FFI layer
/// reads but does not free these fields.
#[repr(C)]
pub struct FfiHttpResponse {
    pub status: u16,
    pub body: *const c_char,
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Failure category returned in `FfiPrintResult`.
#[repr(C)]
#[derive(Debug, PartialEq, Eq)]
pub enum FfiErrorKind {
    Ok = 0,
    Configuration = 1,
    Validation = 2,
    Io = 3,
    Transport = 4,
    Application = 5,
    Connection = 6,
    Decode = 7,
    Serialization = 8,
    Panic = 9,
    NullArg = 10,
}

/// Result envelope for all parse operations.
///
/// On success `kind` is `Ok`, `error_message` is null and `data` holds the
/// payload (a JSON array of printers for list, null for submit).
/// On failure `error_message` is the bare message, `error_code` the numeric
/// code (HTTP status or service `errorCode`, 0 when not numeric) and `data`
/// is null.
#[repr(C)]
pub struct FfiPrintResult {
    pub kind: FfiErrorKind,
    pub error_message: *mut c_char,
    pub error_code: i64,
    pub data: *mut c_char,
}

impl FfiPrintResult {
    fn boxed(kind: FfiErrorKind, error_message: *mut c_char, error_code: i64, data: *mut c_char) -> *mut Self {
        Box::into_raw(Box::new(FfiPrintResult {
            kind,
            error_message,
            error_code,
            data,
        }))
    }

    /// Success carrying the printer list as JSON.
    pub(crate) fn ok_printers(printers: Vec<Printer>) -> *mut Self {
        match serde_json::to_string(&printers) {
            Ok(json) => Self::boxed(FfiErrorKind::Ok, std::ptr::null_mut(), 0, c_string(json)),
            Err(e) => Self::from_error(PrintError::Serialization(e.to_string())),
        }
    }

    /// Success with no payload (submit).
    pub(crate) fn ok_empty() -> *mut Self {
        Self::boxed(FfiErrorKind::Ok, std::ptr::null_mut(), 0, std::ptr::null_mut())
    }

    pub(crate) fn from_error(err: PrintError) -> *mut Self {
        let kind = match &err {
            PrintError::Configuration(_) => FfiErrorKind::Configuration,
            PrintError::Validation(_) => FfiErrorKind::Validation,
            PrintError::Io { .. } => FfiErrorKind::Io,
            PrintError::Transport { .. } => FfiErrorKind::Transport,
            PrintError::Application { .. } => FfiErrorKind::Application,
            PrintError::Connection(_) => FfiErrorKind::Connection,
            PrintError::Decode(_) => FfiErrorKind::Decode,
            PrintError::Serialization(_) => FfiErrorKind::Serialization,
        };
        let code = err.code().as_i64().unwrap_or(0);
        Self::boxed(kind, c_string(err.message()), code, std::ptr::null_mut())
    }

    pub(crate) fn null_arg(name: &str) -> *mut Self {
        Self::boxed(
            FfiErrorKind::NullArg,
            c_string(format!("null argument: {name}")),
            0,
            std::ptr::null_mut(),
        )
    }

    pub(crate) fn panic(msg: &str) -> *mut Self {
        Self::boxed(FfiErrorKind::Panic, c_string(msg), 0, std::ptr::null_mut())
    }
}
