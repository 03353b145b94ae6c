//! C-ABI wrapper around `cloudprint-core`.
//!
//! # Overview
//! Exposes request building and response parsing for the cloud print API
//! through `extern "C"` functions. The C host performs the HTTP round-trip
//! itself; this library never touches the network.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - `cloudprint_build_*` return null on invalid input (null pointers, empty
//!   printer id, empty content). `cloudprint_parse_*` always return an
//!   `FfiPrintResult` describing the outcome.
//! - File submission is not exposed: the host reads its own files and uses
//!   `cloudprint_build_submit_content`.
//! - The C caller owns all returned pointers and must call the matching
//!   `cloudprint_free_*` function to release them.

pub mod types;

use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::panic::catch_unwind;

use cloudprint_core::{CloudPrintApi, HttpResponse, PrintJob};

use types::*;

/// Borrow a nullable C string. Null and invalid UTF-8 both yield `None`.
///
/// # Safety
/// `ptr` must be null or point to a NUL-terminated string that outlives `'a`.
unsafe fn opt_str<'a>(ptr: *const c_char) -> Option<&'a str> {
    if ptr.is_null() {
        return None;
    }
    CStr::from_ptr(ptr).to_str().ok()
}

// ---------------------------------------------------------------------------
// Handle lifecycle
// ---------------------------------------------------------------------------

/// Create an API handle for `auth_token`. A null `base_url` selects the
/// public service endpoint.
///
/// Returns null if `auth_token` is null or empty, or if an internal panic
/// occurs. The caller must free the returned pointer with `cloudprint_api_free`.
#[unsafe(no_mangle)]
pub extern "C" fn cloudprint_api_new(
    auth_token: *const c_char,
    base_url: *const c_char,
) -> *mut FfiCloudPrintApi {
    catch_unwind(|| {
        let token = match unsafe { opt_str(auth_token) } {
            Some(t) if !t.is_empty() => t,
            _ => return std::ptr::null_mut(),
        };
        let mut api = CloudPrintApi::new(token);
        if let Some(url) = unsafe { opt_str(base_url) } {
            api.set_base_url(url);
        }
        Box::into_raw(Box::new(FfiCloudPrintApi { inner: api }))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free a handle created by `cloudprint_api_new`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn cloudprint_api_free(api: *mut FfiCloudPrintApi) {
    if !api.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { Box::from_raw(api) });
        });
    }
}

// ---------------------------------------------------------------------------
// Build request functions
// ---------------------------------------------------------------------------

/// Build the `search` request that lists printers.
///
/// Returns null if `api` is null.
/// The caller must free the returned pointer with `cloudprint_free_request`.
#[unsafe(no_mangle)]
pub extern "C" fn cloudprint_build_list_printers(api: *const FfiCloudPrintApi) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if api.is_null() {
            return std::ptr::null_mut();
        }
        let api = unsafe { &*api };
        match api.inner.build_list_printers() {
            Ok(req) => FfiHttpRequest::from_core(req),
            Err(_) => std::ptr::null_mut(),
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Build a `submit` request that lets the service fetch `url`.
///
/// `ticket` may be null. Returns null if `api`, `printer_id`, `title` or
/// `url` is null, or if `printer_id` is empty.
#[unsafe(no_mangle)]
pub extern "C" fn cloudprint_build_submit_url(
    api: *const FfiCloudPrintApi,
    printer_id: *const c_char,
    title: *const c_char,
    url: *const c_char,
    ticket: *const c_char,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if api.is_null() {
            return std::ptr::null_mut();
        }
        let api = unsafe { &*api };
        let (Some(printer_id), Some(title), Some(url)) =
            (unsafe { opt_str(printer_id) }, unsafe { opt_str(title) }, unsafe { opt_str(url) })
        else {
            return std::ptr::null_mut();
        };
        let job = PrintJob::url(printer_id, title, url).with_ticket(unsafe { opt_str(ticket) });
        match api.inner.build_submit(&job) {
            Ok(req) => FfiHttpRequest::from_core(req),
            Err(_) => std::ptr::null_mut(),
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Build a `submit` request carrying `content_len` bytes from `content`,
/// sent base64-encoded.
///
/// `content_type` (default `application/pdf`) and `ticket` may be null.
/// Returns null if a required pointer is null, `printer_id` is empty or
/// `content_len` is zero.
#[unsafe(no_mangle)]
pub extern "C" fn cloudprint_build_submit_content(
    api: *const FfiCloudPrintApi,
    printer_id: *const c_char,
    title: *const c_char,
    content: *const u8,
    content_len: usize,
    content_type: *const c_char,
    ticket: *const c_char,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if api.is_null() || content.is_null() {
            return std::ptr::null_mut();
        }
        let api = unsafe { &*api };
        let (Some(printer_id), Some(title)) = (unsafe { opt_str(printer_id) }, unsafe { opt_str(title) })
        else {
            return std::ptr::null_mut();
        };
        let data = unsafe { std::slice::from_raw_parts(content, content_len) }.to_vec();
        let job = PrintJob::bytes(printer_id, title, data, unsafe { opt_str(content_type) })
            .with_ticket(unsafe { opt_str(ticket) });
        match api.inner.build_submit(&job) {
            Ok(req) => FfiHttpRequest::from_core(req),
            Err(_) => std::ptr::null_mut(),
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Parse response functions
// ---------------------------------------------------------------------------

/// Convert an `FfiHttpResponse` to a core `HttpResponse`. A null body is
/// treated as empty.
fn ffi_response_to_core(resp: &FfiHttpResponse) -> HttpResponse {
    let body = unsafe { opt_str(resp.body) }.unwrap_or("");
    HttpResponse::new(resp.status, body)
}

/// Parse the response to a `search` request.
///
/// On success `data` is a JSON array of printer objects.
#[unsafe(no_mangle)]
pub extern "C" fn cloudprint_parse_list_printers(
    api: *const FfiCloudPrintApi,
    response: *const FfiHttpResponse,
) -> *mut FfiPrintResult {
    catch_unwind(|| {
        if api.is_null() {
            return FfiPrintResult::null_arg("api");
        }
        if response.is_null() {
            return FfiPrintResult::null_arg("response");
        }
        let api = unsafe { &*api };
        let resp = unsafe { &*response };
        match api.inner.parse_list_printers(ffi_response_to_core(resp)) {
            Ok(printers) => FfiPrintResult::ok_printers(printers),
            Err(e) => FfiPrintResult::from_error(e),
        }
    })
    .unwrap_or_else(|_| FfiPrintResult::panic("panic in cloudprint_parse_list_printers"))
}

/// Parse the response to a `submit` request. `data` is always null.
#[unsafe(no_mangle)]
pub extern "C" fn cloudprint_parse_submit(
    api: *const FfiCloudPrintApi,
    response: *const FfiHttpResponse,
) -> *mut FfiPrintResult {
    catch_unwind(|| {
        if api.is_null() {
            return FfiPrintResult::null_arg("api");
        }
        if response.is_null() {
            return FfiPrintResult::null_arg("response");
        }
        let api = unsafe { &*api };
        let resp = unsafe { &*response };
        match api.inner.parse_submit(ffi_response_to_core(resp)) {
            Ok(()) => FfiPrintResult::ok_empty(),
            Err(e) => FfiPrintResult::from_error(e),
        }
    })
    .unwrap_or_else(|_| FfiPrintResult::panic("panic in cloudprint_parse_submit"))
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free an `FfiHttpRequest` returned by any `cloudprint_build_*` function.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn cloudprint_free_request(req: *mut FfiHttpRequest) {
    if req.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let req = unsafe { Box::from_raw(req) };
        free_c_string(req.url);
        free_c_string(req.body);
        if !req.headers.is_null() && req.headers_len > 0 {
            let headers: Box<[FfiHeader]> = unsafe {
                Box::from_raw(std::ptr::slice_from_raw_parts_mut(
                    req.headers,
                    req.headers_len as usize,
                ))
            };
            for h in headers.iter() {
                free_c_string(h.key);
                free_c_string(h.value);
            }
        }
    });
}

/// Free an `FfiPrintResult` returned by any `cloudprint_parse_*` function.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn cloudprint_free_result(result: *mut FfiPrintResult) {
    if result.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let result = unsafe { Box::from_raw(result) };
        free_c_string(result.error_message);
        free_c_string(result.data);
    });
}

fn free_c_string(s: *mut c_char) {
    if !s.is_null() {
        drop(unsafe { CString::from_raw(s) });
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CString;

    const BASE_URL: &str = "http://localhost:3000/";

    fn new_api() -> *mut FfiCloudPrintApi {
        let token = CString::new("ffi-token").unwrap();
        let url = CString::new(BASE_URL).unwrap();
        cloudprint_api_new(token.as_ptr(), url.as_ptr())
    }

    fn c_str_at(ptr: *const c_char) -> String {
        unsafe { CStr::from_ptr(ptr) }.to_str().unwrap().to_string()
    }

    fn headers_of(req: &FfiHttpRequest) -> Vec<(String, String)> {
        let headers = unsafe { std::slice::from_raw_parts(req.headers, req.headers_len as usize) };
        headers.iter().map(|h| (c_str_at(h.key), c_str_at(h.value))).collect()
    }

    #[test]
    fn api_new_and_free() {
        let api = new_api();
        assert!(!api.is_null());
        cloudprint_api_free(api);
    }

    #[test]
    fn api_new_null_or_empty_token_returns_null() {
        assert!(cloudprint_api_new(std::ptr::null(), std::ptr::null()).is_null());
        let empty = CString::new("").unwrap();
        assert!(cloudprint_api_new(empty.as_ptr(), std::ptr::null()).is_null());
    }

    #[test]
    fn api_new_null_base_url_uses_service_endpoint() {
        let token = CString::new("ffi-token").unwrap();
        let api = cloudprint_api_new(token.as_ptr(), std::ptr::null());
        let req = cloudprint_build_list_printers(api);
        let url = c_str_at(unsafe { &*req }.url);
        assert_eq!(url, "https://www.google.com/cloudprint/search");
        cloudprint_free_request(req);
        cloudprint_api_free(api);
    }

    #[test]
    fn api_free_null_is_safe() {
        cloudprint_api_free(std::ptr::null_mut());
    }

    #[test]
    fn build_list_printers_returns_correct_request() {
        let api = new_api();
        let req = cloudprint_build_list_printers(api);
        assert!(!req.is_null());

        let req_ref = unsafe { &*req };
        assert!(matches!(req_ref.method, FfiHttpMethod::Get));
        assert_eq!(c_str_at(req_ref.url), "http://localhost:3000/search");
        assert!(req_ref.body.is_null());
        assert_eq!(
            headers_of(req_ref),
            vec![
                ("Authorization".to_string(), "GoogleLogin auth=ffi-token".to_string()),
                ("GData-Version".to_string(), "3.0".to_string()),
            ]
        );

        cloudprint_free_request(req);
        cloudprint_api_free(api);
    }

    #[test]
    fn build_list_printers_null_api_returns_null() {
        assert!(cloudprint_build_list_printers(std::ptr::null()).is_null());
    }

    #[test]
    fn build_submit_url_produces_post_with_json_body() {
        let api = new_api();
        let printer = CString::new("p1").unwrap();
        let title = CString::new("Page").unwrap();
        let url = CString::new("https://example.com/doc.pdf").unwrap();
        let req = cloudprint_build_submit_url(api, printer.as_ptr(), title.as_ptr(), url.as_ptr(), std::ptr::null());
        assert!(!req.is_null());

        let req_ref = unsafe { &*req };
        assert!(matches!(req_ref.method, FfiHttpMethod::Post));
        assert_eq!(c_str_at(req_ref.url), "http://localhost:3000/submit");
        assert_eq!(req_ref.headers_len, 3);
        let body: serde_json::Value = serde_json::from_str(&c_str_at(req_ref.body)).unwrap();
        assert_eq!(body["content"], "https://example.com/doc.pdf");
        assert_eq!(body["contentType"], "url");
        assert!(body.get("contentTransferEncoding").is_none());

        cloudprint_free_request(req);
        cloudprint_api_free(api);
    }

    #[test]
    fn build_submit_url_empty_printer_returns_null() {
        let api = new_api();
        let printer = CString::new("").unwrap();
        let title = CString::new("Page").unwrap();
        let url = CString::new("https://example.com").unwrap();
        let req = cloudprint_build_submit_url(api, printer.as_ptr(), title.as_ptr(), url.as_ptr(), std::ptr::null());
        assert!(req.is_null());
        cloudprint_api_free(api);
    }

    #[test]
    fn build_submit_content_encodes_base64() {
        let api = new_api();
        let printer = CString::new("p1").unwrap();
        let title = CString::new("Bytes").unwrap();
        let ticket = CString::new(r#"{"version":"1.0"}"#).unwrap();
        let data = b"hello world";
        let req = cloudprint_build_submit_content(
            api,
            printer.as_ptr(),
            title.as_ptr(),
            data.as_ptr(),
            data.len(),
            std::ptr::null(),
            ticket.as_ptr(),
        );
        assert!(!req.is_null());

        let body: serde_json::Value = serde_json::from_str(&c_str_at(unsafe { &*req }.body)).unwrap();
        assert_eq!(body["content"], "aGVsbG8gd29ybGQ=");
        assert_eq!(body["contentType"], "application/pdf");
        assert_eq!(body["contentTransferEncoding"], "base64");
        assert_eq!(body["ticket"], r#"{"version":"1.0"}"#);

        cloudprint_free_request(req);
        cloudprint_api_free(api);
    }

    #[test]
    fn build_submit_content_empty_returns_null() {
        let api = new_api();
        let printer = CString::new("p1").unwrap();
        let title = CString::new("Bytes").unwrap();
        let data = b"";
        let req = cloudprint_build_submit_content(
            api,
            printer.as_ptr(),
            title.as_ptr(),
            data.as_ptr(),
            0,
            std::ptr::null(),
            std::ptr::null(),
        );
        assert!(req.is_null());
        cloudprint_api_free(api);
    }

    #[test]
    fn parse_list_printers_returns_json() {
        let api = new_api();
        let body = CString::new(r#"{"success":true,"printers":[{"id":"p1"}]}"#).unwrap();
        let resp = FfiHttpResponse {
            status: 200,
            body: body.as_ptr(),
        };
        let result = cloudprint_parse_list_printers(api, &resp);
        let r = unsafe { &*result };
        assert_eq!(r.kind, FfiErrorKind::Ok);
        assert!(r.error_message.is_null());

        let printers: serde_json::Value = serde_json::from_str(&c_str_at(r.data)).unwrap();
        assert_eq!(printers, serde_json::json!([{"id": "p1"}]));

        cloudprint_free_result(result);
        cloudprint_api_free(api);
    }

    #[test]
    fn parse_list_printers_server_error() {
        let api = new_api();
        let body = CString::new("server error").unwrap();
        let resp = FfiHttpResponse {
            status: 500,
            body: body.as_ptr(),
        };
        let result = cloudprint_parse_list_printers(api, &resp);
        let r = unsafe { &*result };
        assert_eq!(r.kind, FfiErrorKind::Transport);
        assert_eq!(r.error_code, 500);
        assert_eq!(c_str_at(r.error_message), "server error");
        assert!(r.data.is_null());

        cloudprint_free_result(result);
        cloudprint_api_free(api);
    }

    #[test]
    fn parse_submit_application_failure() {
        let api = new_api();
        let body =
            CString::new(r#"{"success":false,"message":"Invalid printer","errorCode":413}"#).unwrap();
        let resp = FfiHttpResponse {
            status: 200,
            body: body.as_ptr(),
        };
        let result = cloudprint_parse_submit(api, &resp);
        let r = unsafe { &*result };
        assert_eq!(r.kind, FfiErrorKind::Application);
        assert_eq!(r.error_code, 413);
        assert_eq!(c_str_at(r.error_message), "Invalid printer");

        cloudprint_free_result(result);
        cloudprint_api_free(api);
    }

    #[test]
    fn parse_submit_success() {
        let api = new_api();
        let body = CString::new(r#"{"success":true}"#).unwrap();
        let resp = FfiHttpResponse {
            status: 200,
            body: body.as_ptr(),
        };
        let result = cloudprint_parse_submit(api, &resp);
        let r = unsafe { &*result };
        assert_eq!(r.kind, FfiErrorKind::Ok);
        assert!(r.data.is_null());

        cloudprint_free_result(result);
        cloudprint_api_free(api);
    }

    #[test]
    fn parse_null_body_is_decode_error() {
        let api = new_api();
        let resp = FfiHttpResponse {
            status: 200,
            body: std::ptr::null(),
        };
        let result = cloudprint_parse_submit(api, &resp);
        assert_eq!(unsafe { &*result }.kind, FfiErrorKind::Decode);
        cloudprint_free_result(result);
        cloudprint_api_free(api);
    }

    #[test]
    fn parse_null_api_returns_null_arg() {
        let body = CString::new("{}").unwrap();
        let resp = FfiHttpResponse {
            status: 200,
            body: body.as_ptr(),
        };
        let result = cloudprint_parse_list_printers(std::ptr::null(), &resp);
        assert_eq!(unsafe { &*result }.kind, FfiErrorKind::NullArg);
        cloudprint_free_result(result);
    }

    #[test]
    fn parse_null_response_returns_null_arg() {
        let api = new_api();
        let result = cloudprint_parse_submit(api, std::ptr::null());
        assert_eq!(unsafe { &*result }.kind, FfiErrorKind::NullArg);
        cloudprint_free_result(result);
        cloudprint_api_free(api);
    }

    #[test]
    fn free_request_null_is_safe() {
        cloudprint_free_request(std::ptr::null_mut());
    }

    #[test]
    fn free_result_null_is_safe() {
        cloudprint_free_result(std::ptr::null_mut());
    }
}
