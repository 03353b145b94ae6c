//! Verify build/parse methods against JSON test vectors stored in `test-vectors/`.
//!
//! Each vector file describes inputs, expected requests, simulated responses,
//! and expected parse results. Comparing parsed JSON (not raw strings) avoids
//! false negatives from field-ordering differences.

use cloudprint_core::{CloudPrintApi, HttpMethod, HttpRequest, HttpResponse, PrintError, PrintJob};
use serde_json::Value;

const BASE_URL: &str = "http://localhost:3000/cloudprint/";

fn api() -> CloudPrintApi {
    CloudPrintApi::new("vector-token").with_base_url(BASE_URL)
}

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "PUT" => HttpMethod::Put,
        "DELETE" => HttpMethod::Delete,
        other => panic!("unknown method: {other}"),
    }
}

fn parse_headers(value: &Value) -> Vec<(String, String)> {
    value
        .as_array()
        .unwrap()
        .iter()
        .map(|h| {
            let arr = h.as_array().unwrap();
            (arr[0].as_str().unwrap().to_string(), arr[1].as_str().unwrap().to_string())
        })
        .collect()
}

fn simulated(case: &Value) -> HttpResponse {
    let sim = &case["simulated_response"];
    HttpResponse::new(
        sim["status"].as_u64().unwrap() as u16,
        sim["body"].as_str().unwrap(),
    )
}

fn check_request(name: &str, req: &HttpRequest, expected: &Value) {
    assert_eq!(req.method, parse_method(expected["method"].as_str().unwrap()), "{name}: method");
    assert_eq!(req.url, format!("{BASE_URL}{}", expected["path"].as_str().unwrap()), "{name}: url");
    assert_eq!(req.headers, parse_headers(&expected["headers"]), "{name}: headers");
    match expected.get("body") {
        Some(expected_body) => {
            let body: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
            assert_eq!(&body, expected_body, "{name}: body");
        }
        None => assert!(req.body.is_none(), "{name}: body should be None"),
    }
}

fn check_error(name: &str, err: &PrintError, expected: &Value) {
    let kind_matches = match expected["kind"].as_str().unwrap() {
        "Validation" => matches!(err, PrintError::Validation(_)),
        "Transport" => matches!(err, PrintError::Transport { .. }),
        "Application" => matches!(err, PrintError::Application { .. }),
        other => panic!("{name}: unknown error kind: {other}"),
    };
    assert!(kind_matches, "{name}: unexpected error {err:?}");
    assert_eq!(err.message(), expected["message"].as_str().unwrap(), "{name}: message");
    assert_eq!(err.code().as_i64(), expected["code"].as_i64(), "{name}: code");
}

fn job_from(input: &Value) -> PrintJob {
    let printer_id = input["printer_id"].as_str().unwrap();
    let title = input["title"].as_str().unwrap();
    let content = input["content"].as_str().unwrap();
    let job = match input["kind"].as_str().unwrap() {
        "url" => PrintJob::url(printer_id, title, content),
        "content" => PrintJob::bytes(
            printer_id,
            title,
            content.as_bytes().to_vec(),
            input.get("content_type").and_then(Value::as_str),
        ),
        other => panic!("unknown input kind: {other}"),
    };
    job.with_ticket(input.get("ticket").and_then(Value::as_str))
}

// ---------------------------------------------------------------------------
// List printers
// ---------------------------------------------------------------------------

#[test]
fn list_printers_test_vectors() {
    let raw = include_str!("../../test-vectors/list_printers.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    let a = api();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();

        let req = a.build_list_printers().unwrap();
        check_request(name, &req, &case["expected_request"]);

        let result = a.parse_list_printers(simulated(case));
        if let Some(expected_error) = case.get("expected_error") {
            check_error(name, &result.unwrap_err(), expected_error);
        } else {
            let printers = serde_json::to_value(result.unwrap()).unwrap();
            assert_eq!(printers, case["expected_result"], "{name}: parsed result");
        }
    }
}

// ---------------------------------------------------------------------------
// Submit
// ---------------------------------------------------------------------------

#[test]
fn submit_test_vectors() {
    let raw = include_str!("../../test-vectors/submit.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    let a = api();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let job = job_from(&case["input"]);

        let built = a.build_submit(&job);
        if let Some(expected_error) = case.get("expected_build_error") {
            check_error(name, &built.unwrap_err(), expected_error);
            continue;
        }
        let req = built.unwrap();
        check_request(name, &req, &case["expected_request"]);

        let result = a.parse_submit(simulated(case));
        match case.get("expected_error") {
            Some(expected_error) => check_error(name, &result.unwrap_err(), expected_error),
            None => assert!(result.is_ok(), "{name}: expected success"),
        }
    }
}
