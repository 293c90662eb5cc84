//! Integration tests for the document service.

use pdf_template_service::engine::mock::MockPrintEngine;
use pdf_template_service::prelude::*;
use pdf_template_service::{BrowserError, TemplateError, ValidationError};
use serde_json::json;
use std::time::Duration;
use tokio_test::{assert_err, assert_ok};

fn test_config() -> DocumentServiceConfig {
    DocumentServiceConfigBuilder::new()
        .render_timeout(Duration::from_secs(5))
        .build()
        .unwrap()
}

/// Test the basic template-to-PDF flow.
#[tokio::test]
async fn test_name_template_produces_pdf() {
    let engine = Arc::new(MockPrintEngine::new());
    let service = DocumentService::new(
        TemplateRenderer::default(),
        engine.clone(),
        Duration::from_secs(5),
    );

    let request = DocumentRequest::new(
        "<html><body>{{Name}}</body></html>",
        json!({ "Name": "John Doe" }).as_object().cloned(),
    );

    let pdf = service.generate_pdf(request).await.unwrap();

    assert!(pdf.starts_with(b"%PDF"), "Output must carry a PDF signature");
    let printed = engine.printed_documents();
    assert_eq!(printed.len(), 1);
    assert!(printed[0].contains("John Doe"));
    assert!(!printed[0].contains("{{"));
}

/// Test that a valid template with empty data still renders.
#[tokio::test]
async fn test_static_template_with_empty_data() {
    let service = DocumentService::with_engine(MockPrintEngine::new(), &test_config());

    let request = DocumentRequest::with_data("<html><body>static</body></html>", Default::default());
    let pdf = service.generate_pdf(request).await.unwrap();

    assert!(pdf.starts_with(b"%PDF"));
}

/// Test validation order and messages.
#[tokio::test]
async fn test_validation_errors() {
    let service = DocumentService::with_engine(MockPrintEngine::new(), &test_config());

    // Empty template is reported even when data is also missing
    let result = service.generate_pdf(DocumentRequest::new("", None)).await;
    let err = result.unwrap_err();
    assert_eq!(err, DocumentError::Validation(ValidationError::EmptyTemplate));
    assert_eq!(err.to_string(), "HTML template cannot be empty");
    assert_eq!(err.status_code(), 400);

    let result = service
        .generate_pdf(DocumentRequest::new("<p>{{Name}}</p>", None))
        .await;
    let err = result.unwrap_err();
    assert_eq!(err, DocumentError::Validation(ValidationError::NilData));
    assert_eq!(err.to_string(), "Data cannot be nil");
}

/// Test that malformed templates never reach the browser.
#[tokio::test]
async fn test_malformed_template_does_not_launch_browser() {
    let engine = MockPrintEngine::new();
    let counter = engine.counter();
    let service = DocumentService::with_engine(engine, &test_config());

    let request = DocumentRequest::new(
        "<html><body>{{Name</body></html>",
        json!({ "Name": "John Doe" }).as_object().cloned(),
    );

    let result = service.generate_pdf(request).await;

    assert!(matches!(
        result,
        Err(DocumentError::Template(TemplateError::Syntax(_)))
    ));
    assert_eq!(counter.load(std::sync::atomic::Ordering::SeqCst), 0);
}

/// Test that a missing browser is a launch failure, not a hang.
#[tokio::test]
async fn test_missing_browser_is_launch_error() {
    let config = DocumentServiceConfigBuilder::new()
        .chrome_path("/nonexistent/path/to/chrome")
        .render_timeout(Duration::from_secs(10))
        .build()
        .unwrap();
    let service = DocumentService::from_config(&config);

    let request = DocumentRequest::with_data("<p>x</p>", Default::default());
    let err = service.generate_pdf(request).await.unwrap_err();

    assert!(
        matches!(err, DocumentError::Browser(BrowserError::Launch(_))),
        "Expected Launch error, got {:?}",
        err
    );
    assert_eq!(err.status_code(), 500);
}

/// Test that a stuck engine is bounded by the render timeout.
#[tokio::test]
async fn test_render_timeout() {
    let config = DocumentServiceConfigBuilder::new()
        .render_timeout(Duration::from_millis(200))
        .build()
        .unwrap();
    let service = DocumentService::with_engine(MockPrintEngine::hangs(), &config);

    let started = std::time::Instant::now();
    let request = DocumentRequest::with_data("<p>x</p>", Default::default());
    let err = service.generate_pdf(request).await.unwrap_err();

    assert!(matches!(
        err,
        DocumentError::Browser(BrowserError::RenderTimeout(_))
    ));
    assert!(started.elapsed() < Duration::from_secs(5));
}

/// Test that dropping the call stops the engine.
#[tokio::test]
async fn test_dropped_call_cancels_engine() {
    let config = DocumentServiceConfigBuilder::new()
        .render_timeout(Duration::from_secs(60))
        .build()
        .unwrap();
    let service = Arc::new(DocumentService::with_engine(MockPrintEngine::hangs(), &config));

    let task_service = Arc::clone(&service);
    let call = tokio::spawn(async move {
        let request = DocumentRequest::with_data("<p>x</p>", Default::default());
        task_service.generate_pdf(request).await
    });

    tokio::time::sleep(Duration::from_millis(100)).await;
    call.abort();
    assert!(call.await.unwrap_err().is_cancelled());

    // Runtime shutdown joins the blocking thread, so this test only
    // finishes if the hung print saw the cancellation.
}

/// Test configuration validation.
#[test]
fn test_config_validation() {
    // Zero timeout should fail
    let result = DocumentServiceConfigBuilder::new()
        .render_timeout(Duration::ZERO)
        .build();
    assert_err!(result);

    // Zero concurrency should fail
    let result = DocumentServiceConfigBuilder::new()
        .max_concurrent_renders(0)
        .build();
    assert_err!(result);

    // Valid config should succeed
    let config = assert_ok!(
        DocumentServiceConfigBuilder::new()
            .render_timeout(Duration::from_secs(30))
            .max_concurrent_renders(2)
            .build()
    );
    assert_eq!(config.max_concurrent_renders, 2);
}

/// End-to-end conversion with a real browser.
///
/// Run with `cargo test -- --ignored` on a machine with Chrome or Chromium.
#[tokio::test]
#[ignore = "requires Chrome or Chromium"]
async fn test_real_browser_conversion() {
    let config = DocumentServiceConfigBuilder::new()
        .render_timeout(Duration::from_secs(60))
        .build()
        .unwrap();
    let service = DocumentService::from_config(&config);

    let request = DocumentRequest::new(
        "<html><body><h1>{{Name}}</h1></body></html>",
        json!({ "Name": "John Doe" }).as_object().cloned(),
    );

    let pdf = service.generate_pdf(request).await.unwrap();
    assert!(pdf.starts_with(b"%PDF"));
    assert!(pdf.len() > 100);
}
