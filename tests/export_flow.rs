// Copyright (c) 2026 REMS contributors.
// Licensed under the MIT license.

//! End-to-end export tests against a local mock server

use std::path::PathBuf;

use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use rems_print::{export, Error, ExportParams};

const USER: &str = "alice";
const API_KEY: &str = "deadbeef-cafe";

fn page_html() -> String {
    r#"<html>
        <head>
            <title>Monthly Report</title>
            <link rel="stylesheet" href="/style.css">
        </head>
        <body>
            <h1>Monthly Report</h1>
            <p>Everything is fine.</p>
            <img src="/logo.png">
            <script src="/app.js"></script>
            <script>console.log("report rendered");</script>
        </body>
    </html>"#
        .to_string()
}

/// Mount a mock that only matches when both credential headers are present
/// with the right values. A request missing them falls through to
/// wiremock's default 404, which fails the export.
async fn mount_with_credentials(
    server: &MockServer,
    route: &str,
    response: ResponseTemplate,
) {
    Mock::given(method("GET"))
        .and(path(route))
        .and(header("x-rems-api-key", API_KEY))
        .and(header("x-rems-user-id", USER))
        .respond_with(response)
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn export_injects_credentials_on_every_request() {
    let server = MockServer::start().await;

    mount_with_credentials(
        &server,
        "/report",
        ResponseTemplate::new(200).set_body_raw(page_html(), "text/html; charset=utf-8"),
    )
    .await;
    mount_with_credentials(
        &server,
        "/style.css",
        ResponseTemplate::new(200).set_body_raw("h1 { color: black; }", "text/css"),
    )
    .await;
    mount_with_credentials(
        &server,
        "/app.js",
        ResponseTemplate::new(200).set_body_raw("var loaded = true;", "application/javascript"),
    )
    .await;
    mount_with_credentials(
        &server,
        "/logo.png",
        ResponseTemplate::new(200).set_body_raw(vec![0x89, 0x50, 0x4e, 0x47], "image/png"),
    )
    .await;

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("report.pdf");

    let params = ExportParams {
        user: USER.to_string(),
        api_key: API_KEY.to_string(),
        url: format!("{}/report", server.uri()),
        output_file: output.clone(),
    };

    let summary = export(&params).await.unwrap();

    // Document plus three subresources
    assert_eq!(summary.requests, 4);
    assert_eq!(summary.console_messages, 1);
    assert_eq!(summary.page_errors, 0);

    let bytes = std::fs::read(&output).unwrap();
    assert!(bytes.starts_with(b"%PDF"));
    assert_eq!(bytes.len(), summary.pdf_bytes);

    // Dropping the server verifies the .expect(1) on each mock, so a
    // request that skipped credential injection fails the test here
}

#[tokio::test]
async fn export_tolerates_broken_page_scripts() {
    let server = MockServer::start().await;

    let html = r#"<html><head><title>Broken</title></head><body>
        <p>content</p>
        <script>console.log("before"); thisDoesNotExist();</script>
    </body></html>"#;

    mount_with_credentials(
        &server,
        "/report",
        ResponseTemplate::new(200).set_body_raw(html, "text/html"),
    )
    .await;

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("broken.pdf");

    let params = ExportParams {
        user: USER.to_string(),
        api_key: API_KEY.to_string(),
        url: format!("{}/report", server.uri()),
        output_file: output.clone(),
    };

    // A throwing page script must not fail the export
    let summary = export(&params).await.unwrap();
    assert_eq!(summary.console_messages, 1);
    assert_eq!(summary.page_errors, 1);
    assert!(output.exists());
}

#[tokio::test]
async fn export_fetches_subresources_despite_slow_inline_script() {
    let server = MockServer::start().await;

    // The inline script burns well past the idle quiet window before the
    // image fetch task gets to run; the export must still wait for the
    // image instead of declaring the network idle early
    let html = r#"<html><head><title>Slow</title></head><body>
        <img src="/logo.png">
        <script>
            let acc = 0;
            for (let i = 0; i < 2000000; i++) { acc += i; }
        </script>
    </body></html>"#;

    mount_with_credentials(
        &server,
        "/report",
        ResponseTemplate::new(200).set_body_raw(html, "text/html; charset=utf-8"),
    )
    .await;
    mount_with_credentials(
        &server,
        "/logo.png",
        ResponseTemplate::new(200).set_body_raw(vec![0x89, 0x50, 0x4e, 0x47], "image/png"),
    )
    .await;

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("slow.pdf");

    let params = ExportParams {
        user: USER.to_string(),
        api_key: API_KEY.to_string(),
        url: format!("{}/report", server.uri()),
        output_file: output.clone(),
    };

    let summary = export(&params).await.unwrap();

    // Document plus the image; the .expect(1) on the image mock is
    // verified when the server drops
    assert_eq!(summary.requests, 2);
    assert!(output.exists());
}

/// First MediaBox in the PDF as (width, height) in points
fn first_media_box(bytes: &[u8]) -> Option<(f64, f64)> {
    let needle = b"/MediaBox";
    let start = bytes.windows(needle.len()).position(|w| w == needle)? + needle.len();
    let end = start + bytes[start..].iter().position(|&b| b == b']')?;
    let slice = std::str::from_utf8(&bytes[start..end]).ok()?;
    let nums: Vec<f64> = slice
        .chars()
        .map(|c| {
            if c.is_ascii_digit() || c == '.' || c == '-' {
                c
            } else {
                ' '
            }
        })
        .collect::<String>()
        .split_whitespace()
        .filter_map(|t| t.parse().ok())
        .collect();
    if nums.len() == 4 {
        Some((nums[2] - nums[0], nums[3] - nums[1]))
    } else {
        None
    }
}

#[tokio::test]
async fn export_is_repeatable_and_a4_sized() {
    let server = MockServer::start().await;

    let html = r#"<html><head><title>Static</title></head><body>
        <h1>Static Report</h1>
        <p>Same input, same output.</p>
    </body></html>"#;

    Mock::given(method("GET"))
        .and(path("/report"))
        .and(header("x-rems-api-key", API_KEY))
        .and(header("x-rems-user-id", USER))
        .respond_with(ResponseTemplate::new(200).set_body_raw(html, "text/html; charset=utf-8"))
        .expect(2)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("first.pdf");
    let second = dir.path().join("second.pdf");

    for output in [&first, &second] {
        let params = ExportParams {
            user: USER.to_string(),
            api_key: API_KEY.to_string(),
            url: format!("{}/report", server.uri()),
            output_file: (*output).clone(),
        };
        export(&params).await.unwrap();
    }

    // Same page content lays out identically run to run
    let first_bytes = std::fs::read(&first).unwrap();
    let second_bytes = std::fs::read(&second).unwrap();
    assert_eq!(first_bytes.len(), second_bytes.len());

    // A4 media box: 595 x 842 points, height/width ratio sqrt(2)
    let (width, height) = first_media_box(&first_bytes).unwrap();
    assert!((width - 595.0).abs() < 3.0, "width was {}", width);
    assert!((height - 842.0).abs() < 3.0, "height was {}", height);
    assert!((height / width - std::f64::consts::SQRT_2).abs() < 0.01);
}

#[tokio::test]
async fn export_fails_on_http_error_and_writes_nothing() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("never.pdf");

    let params = ExportParams {
        user: USER.to_string(),
        api_key: API_KEY.to_string(),
        url: format!("{}/missing", server.uri()),
        output_file: output.clone(),
    };

    let err = export(&params).await.unwrap_err();
    assert!(matches!(err, Error::NavigationFailed { .. }));
    assert!(!output.exists());
}

#[tokio::test]
async fn export_leaves_stale_output_untouched_on_failure() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("stale.pdf");
    std::fs::write(&output, b"previous run").unwrap();

    let params = ExportParams {
        user: USER.to_string(),
        api_key: API_KEY.to_string(),
        // Unparseable URL, fails before any request is made
        url: "not a url".to_string(),
        output_file: output.clone(),
    };

    assert!(export(&params).await.is_err());
    assert_eq!(std::fs::read(&output).unwrap(), b"previous run");
}

#[tokio::test]
async fn export_args_parse_failure() {
    let args: Vec<String> = vec!["alice".into(), "key".into()];
    assert!(matches!(
        ExportParams::from_args(&args),
        Err(Error::Arguments(_))
    ));

    let output = PathBuf::from("out.pdf");
    let ok = ExportParams::from_args(&[
        "alice".to_string(),
        "key".to_string(),
        "https://example.com".to_string(),
        "out.pdf".to_string(),
    ])
    .unwrap();
    assert_eq!(ok.output_file, output);
}
