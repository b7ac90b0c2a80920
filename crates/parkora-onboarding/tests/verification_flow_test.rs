mod helpers;

use helpers::{
    batch_json, client, descriptor_json, fresh_token, pdf, png, Exchange, MockTransport,
};
use parkora_api_client::{ProgressEvent, RequestBody};
use parkora_core::ClientError;
use parkora_onboarding::{SlotId, SlotStatus, SubmissionOutcome, VerificationForm, VerificationStatus};
use std::sync::{Arc, Mutex};

#[tokio::test]
async fn test_oversized_tax_document_blocks_submit_without_network() {
    let transport = MockTransport::new(vec![]);
    let client = client(Arc::clone(&transport));
    let mut form = VerificationForm::default();

    form.select_file(SlotId::BusinessLicense, pdf("license.pdf", 5 * 1024 * 1024))
        .unwrap();
    assert!(form
        .select_file(SlotId::TaxDocument, png("tax.png", 11 * 1024 * 1024))
        .is_err());

    let outcome = form.submit(&client).await;
    let SubmissionOutcome::Blocked { errors } = outcome else {
        panic!("expected a blocked submission, got {:?}", outcome);
    };
    assert_eq!(
        errors.get("taxDocument").map(String::as_str),
        Some("File size must be less than 10MB")
    );
    assert!(!errors.contains_key("businessLicense"));
    assert_eq!(transport.request_count(), 0);
    assert_eq!(form.slot(SlotId::BusinessLicense).status, SlotStatus::Selected);
}

#[tokio::test]
async fn test_successful_batch_marks_slots_success() {
    let body = batch_json(
        vec![
            descriptor_json("BUSINESS_REGISTRATION", Some("partners/7/license.pdf"), "Uploaded"),
            descriptor_json("TAX_IDENTIFICATION", Some("partners/7/tax.pdf"), "Uploaded"),
        ],
        2,
        2,
        0,
    );
    let transport = MockTransport::new(vec![Exchange::ok(body).with_progress(vec![
        ProgressEvent::computable(512, 1024),
        ProgressEvent::computable(1024, 1024),
    ])]);
    let client = client(Arc::clone(&transport));
    client.session().login(&fresh_token(&["partners"])).unwrap();

    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let mut form = VerificationForm::default();
    form.on_progress(move |p| sink.lock().unwrap().push(p));
    form.select_file(SlotId::BusinessLicense, pdf("license.pdf", 512)).unwrap();
    form.select_file(SlotId::TaxDocument, pdf("tax.pdf", 512)).unwrap();

    let outcome = form.submit(&client).await;
    assert_eq!(
        outcome,
        SubmissionOutcome::Submitted {
            message: "Verification submitted successfully! Your documents are under review."
                .to_string()
        }
    );
    for slot in [SlotId::BusinessLicense, SlotId::TaxDocument] {
        let state = form.slot(slot);
        assert_eq!(state.status, SlotStatus::Success);
        assert_eq!(state.progress, 100);
        assert!(state.remote.is_some());
        assert!(state.file.is_none());
    }
    assert_eq!(form.status(), VerificationStatus::Pending);
    assert_eq!(*seen.lock().unwrap(), vec![50, 100]);

    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].url, "http://api.test/api/v1/storage/upload");
    assert!(requests[0].bearer_token.is_some());
    let RequestBody::Multipart(body) = &requests[0].body else {
        panic!("expected multipart body");
    };
    assert!(body.file_named("businessLicense").is_some());
    assert!(body.file_named("taxDocument").is_some());
    assert!(body.file_named("additionalDocument").is_none());
}

#[tokio::test]
async fn test_partial_failure_marks_only_failed_slot() {
    let body = batch_json(
        vec![
            descriptor_json("BUSINESS_LICENSE", Some("partners/7/license.pdf"), "Uploaded"),
            descriptor_json("TAX_IDENTIFICATION", None, "Upload failed: storage unavailable"),
        ],
        2,
        1,
        1,
    );
    let transport = MockTransport::new(vec![Exchange::ok(body)]);
    let client = client(Arc::clone(&transport));
    let mut form = VerificationForm::default();
    form.select_file(SlotId::BusinessLicense, pdf("license.pdf", 100)).unwrap();
    form.select_file(SlotId::TaxDocument, pdf("tax.pdf", 100)).unwrap();

    let outcome = form.submit(&client).await;
    let SubmissionOutcome::PartialFailure { failed, .. } = &outcome else {
        panic!("expected a partial failure, got {:?}", outcome);
    };
    assert_eq!(failed, &vec![SlotId::TaxDocument]);

    let license = form.slot(SlotId::BusinessLicense);
    assert_eq!(license.status, SlotStatus::Success);

    let tax = form.slot(SlotId::TaxDocument);
    assert_eq!(tax.status, SlotStatus::Error);
    assert_eq!(tax.error.as_deref(), Some("Upload failed: storage unavailable"));
    assert!(tax.file.is_some(), "failed slot keeps its file for retry");
    assert_eq!(
        form.field_errors().get("taxDocument").map(String::as_str),
        Some("Upload failed: storage unavailable")
    );
}

#[tokio::test]
async fn test_retry_resends_only_failed_slot() {
    let batch = batch_json(
        vec![
            descriptor_json("BUSINESS_REGISTRATION", Some("partners/7/license.pdf"), "Uploaded"),
            descriptor_json("TAX_IDENTIFICATION", None, "failed"),
        ],
        2,
        1,
        1,
    );
    let single = serde_json::json!({
        "data": descriptor_json("TAX_IDENTIFICATION", Some("partners/7/tax.pdf"), "Uploaded"),
        "errorCode": 0,
        "message": "File uploaded",
        "status": "success",
    })
    .to_string();
    let transport = MockTransport::new(vec![Exchange::ok(batch), Exchange::ok(single)]);
    let client = client(Arc::clone(&transport));
    let mut form = VerificationForm::default();
    form.select_file(SlotId::BusinessLicense, pdf("license.pdf", 100)).unwrap();
    form.select_file(SlotId::TaxDocument, pdf("tax.pdf", 100)).unwrap();
    assert!(!form.submit(&client).await.is_success());

    let descriptor = form.retry_slot(&client, SlotId::TaxDocument).await.unwrap();
    assert_eq!(descriptor.path.as_deref(), Some("partners/7/tax.pdf"));
    assert_eq!(form.slot(SlotId::TaxDocument).status, SlotStatus::Success);
    assert!(form.field_errors().is_empty());

    let requests = transport.requests();
    assert_eq!(requests.len(), 2);
    let RequestBody::Multipart(body) = &requests[1].body else {
        panic!("expected multipart body");
    };
    assert_eq!(body.field_names(), vec!["file", "documentType"]);
    assert_eq!(body.text_value("documentType"), Some("TAX_IDENTIFICATION"));
}

#[tokio::test]
async fn test_retry_rejected_by_server_keeps_slot_in_error() {
    let batch = batch_json(
        vec![
            descriptor_json("BUSINESS_REGISTRATION", Some("partners/7/license.pdf"), "Uploaded"),
            descriptor_json("TAX_IDENTIFICATION", None, "failed"),
        ],
        2,
        1,
        1,
    );
    let single = serde_json::json!({
        "data": descriptor_json("TAX_IDENTIFICATION", None, "Upload failed: virus detected"),
        "errorCode": 0,
        "message": "File uploaded",
        "status": "success",
    })
    .to_string();
    let transport = MockTransport::new(vec![Exchange::ok(batch), Exchange::ok(single)]);
    let client = client(Arc::clone(&transport));
    let mut form = VerificationForm::default();
    form.select_file(SlotId::BusinessLicense, pdf("license.pdf", 100)).unwrap();
    form.select_file(SlotId::TaxDocument, pdf("tax.pdf", 100)).unwrap();
    assert!(!form.submit(&client).await.is_success());

    let err = form.retry_slot(&client, SlotId::TaxDocument).await.unwrap_err();
    assert!(matches!(err, ClientError::UploadRejected(_)));
    assert_eq!(err.status(), None);
    assert_eq!(err.to_string(), "Upload failed: virus detected");

    let tax = form.slot(SlotId::TaxDocument);
    assert_eq!(tax.status, SlotStatus::Error);
    assert!(tax.file.is_some());
    assert_eq!(
        form.field_errors().get("taxDocument").map(String::as_str),
        Some("Upload failed: virus detected")
    );
}

#[tokio::test]
async fn test_failure_reported_for_unsent_slot_is_not_full_success() {
    let docs = serde_json::json!([
        {"path": "p/l.pdf", "fileName": "l.pdf", "fileSize": 1, "contentType": "application/pdf",
         "documentType": "BUSINESS_REGISTRATION", "verificationStatus": "PENDING"},
        {"path": "p/t.pdf", "fileName": "t.pdf", "fileSize": 1, "contentType": "application/pdf",
         "documentType": "TAX_IDENTIFICATION", "verificationStatus": "PENDING"},
    ])
    .to_string();
    let body = batch_json(
        vec![
            descriptor_json("ADDITIONAL_DOCUMENT", Some("partners/7/extra.pdf"), "Uploaded"),
            descriptor_json("BUSINESS_REGISTRATION", None, "Upload failed: stale entry"),
        ],
        1,
        1,
        0,
    );
    let transport = MockTransport::new(vec![Exchange::ok(docs), Exchange::ok(body)]);
    let client = client(Arc::clone(&transport));
    let mut form = VerificationForm::default();
    form.load_existing(&client).await;
    form.select_file(SlotId::AdditionalDocument, pdf("extra.pdf", 100)).unwrap();

    let outcome = form.submit(&client).await;
    let SubmissionOutcome::PartialFailure { failed, .. } = &outcome else {
        panic!("expected a partial failure, got {:?}", outcome);
    };
    assert!(failed.is_empty());
    assert_eq!(form.slot(SlotId::AdditionalDocument).status, SlotStatus::Success);
    assert_eq!(form.slot(SlotId::BusinessLicense).status, SlotStatus::Success);
    assert_eq!(transport.request_count(), 2);
}

#[tokio::test]
async fn test_retry_requires_failed_slot() {
    let transport = MockTransport::new(vec![]);
    let client = client(Arc::clone(&transport));
    let mut form = VerificationForm::default();
    form.select_file(SlotId::TaxDocument, pdf("tax.pdf", 100)).unwrap();
    assert!(form.retry_slot(&client, SlotId::TaxDocument).await.is_err());
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn test_transport_failure_marks_sent_slots_for_retry() {
    let transport = MockTransport::new(vec![Exchange::status(400, r#"{"message":"Invalid file type"}"#)]);
    let client = client(Arc::clone(&transport));
    let mut form = VerificationForm::default();
    form.select_file(SlotId::BusinessLicense, pdf("license.pdf", 100)).unwrap();
    form.select_file(SlotId::TaxDocument, pdf("tax.pdf", 100)).unwrap();

    let outcome = form.submit(&client).await;
    assert_eq!(
        outcome,
        SubmissionOutcome::Failed {
            message: "Invalid file type".to_string()
        }
    );
    for slot in [SlotId::BusinessLicense, SlotId::TaxDocument] {
        let state = form.slot(slot);
        assert_eq!(state.status, SlotStatus::Error);
        assert_eq!(state.error.as_deref(), Some("Invalid file type"));
        assert!(state.file.is_some());
    }
}

#[tokio::test]
async fn test_abort_is_reported_like_any_failure() {
    let transport = MockTransport::new(vec![]);
    let client = client(Arc::clone(&transport));
    let mut form = VerificationForm::default();
    form.select_file(SlotId::BusinessLicense, pdf("license.pdf", 100)).unwrap();
    form.select_file(SlotId::TaxDocument, pdf("tax.pdf", 100)).unwrap();

    form.abort_handle().cancel();
    let outcome = form.submit(&client).await;
    assert_eq!(
        outcome,
        SubmissionOutcome::Failed {
            message: "File upload was aborted".to_string()
        }
    );
    assert_eq!(form.slot(SlotId::TaxDocument).status, SlotStatus::Error);
    assert!(!form.abort_handle().is_cancelled());
}

#[tokio::test]
async fn test_counts_mismatch_is_partial_failure() {
    let body = batch_json(
        vec![
            descriptor_json("BUSINESS_REGISTRATION", Some("a"), "ok"),
            descriptor_json("TAX_IDENTIFICATION", Some("b"), "ok"),
        ],
        3,
        2,
        0,
    );
    let transport = MockTransport::new(vec![Exchange::ok(body)]);
    let client = client(transport);
    let mut form = VerificationForm::default();
    form.select_file(SlotId::BusinessLicense, pdf("license.pdf", 100)).unwrap();
    form.select_file(SlotId::TaxDocument, pdf("tax.pdf", 100)).unwrap();

    let outcome = form.submit(&client).await;
    assert!(matches!(outcome, SubmissionOutcome::PartialFailure { ref failed, .. } if failed.is_empty()));
}

#[tokio::test]
async fn test_load_existing_runs_once_and_sets_status() {
    let docs = serde_json::json!([
        {"path": "p/l.pdf", "fileName": "l.pdf", "fileSize": 1, "contentType": "application/pdf",
         "documentType": "BUSINESS_LICENSE", "verificationStatus": "VERIFIED"},
        {"path": "p/t.pdf", "fileName": "t.pdf", "fileSize": 1, "contentType": "application/pdf",
         "documentType": "TAX_IDENTIFICATION", "verificationStatus": "VERIFIED"},
    ])
    .to_string();
    let transport = MockTransport::new(vec![Exchange::ok(docs)]);
    let client = client(Arc::clone(&transport));
    let mut form = VerificationForm::default();

    form.load_existing(&client).await;
    form.load_existing(&client).await;

    assert_eq!(transport.request_count(), 1);
    assert_eq!(form.status(), VerificationStatus::Approved);
    assert_eq!(form.slot(SlotId::BusinessLicense).status, SlotStatus::Success);
    assert_eq!(form.slot(SlotId::TaxDocument).status, SlotStatus::Success);
    assert_eq!(form.slot(SlotId::AdditionalDocument).status, SlotStatus::Empty);
}

#[tokio::test]
async fn test_load_existing_failure_is_swallowed() {
    let transport = MockTransport::new(vec![Exchange::network_error()]);
    let client = client(Arc::clone(&transport));
    let mut form = VerificationForm::default();

    form.load_existing(&client).await;
    assert!(form.documents_loaded());
    assert_eq!(form.status(), VerificationStatus::Pending);

    form.select_file(SlotId::BusinessLicense, pdf("license.pdf", 100)).unwrap();
    assert_eq!(form.slot(SlotId::BusinessLicense).status, SlotStatus::Selected);
}

#[tokio::test]
async fn test_resubmit_without_changes_skips_upload_and_refreshes() {
    let docs = serde_json::json!({"data": [
        {"path": "p/l.pdf", "fileName": "l.pdf", "fileSize": 1, "contentType": "application/pdf",
         "documentType": "BUSINESS_REGISTRATION", "verificationStatus": "PENDING"},
        {"path": "p/t.pdf", "fileName": "t.pdf", "fileSize": 1, "contentType": "application/pdf",
         "documentType": "TAX_IDENTIFICATION", "verificationStatus": "PENDING"},
    ]})
    .to_string();
    let transport = MockTransport::new(vec![Exchange::ok(docs.clone()), Exchange::ok(docs)]);
    let client = client(Arc::clone(&transport));
    let mut form = VerificationForm::default();
    form.load_existing(&client).await;

    let outcome = form.submit(&client).await;
    assert!(outcome.is_success());

    let requests = transport.requests();
    assert_eq!(requests.len(), 2);
    assert!(requests
        .iter()
        .all(|r| r.url == "http://api.test/api/v1/storage/documents"));
}

#[tokio::test]
async fn test_rejected_document_can_be_replaced_and_resubmitted() {
    let docs = serde_json::json!([
        {"path": "p/l.pdf", "fileName": "l.pdf", "fileSize": 1, "contentType": "application/pdf",
         "documentType": "BUSINESS_REGISTRATION", "verificationStatus": "REJECTED",
         "rejectionReason": "Blurry scan"},
        {"path": "p/t.pdf", "fileName": "t.pdf", "fileSize": 1, "contentType": "application/pdf",
         "documentType": "TAX_IDENTIFICATION", "verificationStatus": "PENDING"},
    ])
    .to_string();
    let batch = batch_json(
        vec![descriptor_json("BUSINESS_REGISTRATION", Some("p/l2.pdf"), "Uploaded")],
        1,
        1,
        0,
    );
    let transport = MockTransport::new(vec![Exchange::ok(docs), Exchange::ok(batch)]);
    let client = client(Arc::clone(&transport));
    let mut form = VerificationForm::default();

    form.load_existing(&client).await;
    assert_eq!(form.status(), VerificationStatus::Rejected);
    assert!(form.select_file(SlotId::TaxDocument, pdf("tax.pdf", 10)).is_err());

    form.select_file(SlotId::BusinessLicense, pdf("license-v2.pdf", 10)).unwrap();
    assert_eq!(form.status(), VerificationStatus::Pending);

    let outcome = form.submit(&client).await;
    assert!(outcome.is_success());
    let RequestBody::Multipart(body) = &transport.requests()[1].body else {
        panic!("expected multipart body");
    };
    assert_eq!(
        body.field_names(),
        vec!["businessLicense", "businessLicenseDocumentType"]
    );
}
