use super::*;
use crate::gateway::ApiConfig;
use crate::models::Prediction;
use crate::transport::{HttpBody, HttpMethod, MockFile, MockHttpClient};
use serde_json::json;

const PDF: &str = "application/pdf";

fn filled_wizard() -> ClaimWizard<MockFile> {
    let mut wizard = ClaimWizard::new();
    wizard.set_disaster_type(Some(DisasterType::Flood));
    wizard.set_property_type(Some(PropertyType::House));
    assert!(wizard.advance());
    wizard.set_description("Water damage in the basement");
    wizard.set_estimated_loss("12500.50");
    assert!(wizard.advance());
    wizard
}

fn api() -> ClaimsApi<MockHttpClient> {
    ClaimsApi::new(ApiConfig::new("https://api.test"), MockHttpClient::new())
        .with_token(Some("tok".into()))
}

#[test]
fn test_step_numbers() {
    let numbers: Vec<_> = ClaimStep::ALL.iter().map(ClaimStep::number).collect();
    assert_eq!(numbers, vec![1, 2, 3]);
}

#[test]
fn test_cannot_leave_step_one_without_selections() {
    let mut wizard = ClaimWizard::<MockFile>::new();
    assert!(!wizard.advance());
    assert_eq!(wizard.step(), ClaimStep::BasicInfo);
    assert!(wizard.errors().contains(FIELD_DISASTER_TYPE));
    assert!(wizard.errors().contains(FIELD_PROPERTY_TYPE));

    wizard.set_disaster_type(Some(DisasterType::Wildfire));
    assert!(!wizard.errors().contains(FIELD_DISASTER_TYPE));
    assert!(!wizard.advance());
    assert_eq!(wizard.step(), ClaimStep::BasicInfo);
}

#[test]
fn test_details_requires_positive_loss() {
    let mut wizard = ClaimWizard::<MockFile>::new();
    wizard.set_disaster_type(Some(DisasterType::Earthquake));
    wizard.set_property_type(Some(PropertyType::Business));
    assert!(wizard.advance());

    wizard.set_description("Cracked foundation");
    wizard.set_estimated_loss("-10");
    assert!(!wizard.advance());
    assert_eq!(wizard.step(), ClaimStep::Details);
    assert_eq!(
        wizard.errors().first(FIELD_ESTIMATED_LOSS).as_deref(),
        Some("Estimated loss must be a positive number.")
    );

    wizard.set_estimated_loss("1,200");
    assert!(wizard.advance());
    assert_eq!(wizard.step(), ClaimStep::Documents);
}

#[test]
fn test_back_keeps_entered_values() {
    let mut wizard = filled_wizard();
    assert!(wizard.back());
    assert!(wizard.back());
    assert!(!wizard.back());
    assert_eq!(wizard.step(), ClaimStep::BasicInfo);
    assert_eq!(wizard.draft().description, "Water damage in the basement");
}

#[test]
fn test_go_to_only_moves_backwards() {
    let mut wizard = ClaimWizard::<MockFile>::new();
    assert!(!wizard.go_to(ClaimStep::Documents));

    let mut wizard = filled_wizard();
    assert!(wizard.go_to(ClaimStep::BasicInfo));
    assert!(!wizard.go_to(ClaimStep::Details));
}

#[test]
fn test_rejects_disallowed_type() {
    let mut wizard = filled_wizard();
    let rejected = wizard.add_files([MockFile::new("setup.exe", "application/x-msdownload", 10)]);

    assert_eq!(rejected.len(), 1);
    assert_eq!(rejected[0].reason, IntakeError::UnsupportedType);
    assert!(wizard.draft().attachments.is_empty());
    assert!(wizard.file_errors().contains("setup.exe"));
}

#[test]
fn test_rejects_oversized_file() {
    let mut wizard = filled_wizard();
    let rejected = wizard.add_files([MockFile::new("scan.pdf", PDF, 6 * 1024 * 1024)]);

    assert_eq!(rejected[0].reason, IntakeError::TooLarge);
    assert_eq!(
        wizard.file_errors().first("scan.pdf").as_deref(),
        Some("File is larger than 5 MB.")
    );
    assert!(wizard.draft().attachments.is_empty());
}

#[test]
fn test_size_limit_is_inclusive() {
    let file = MockFile::new("exact.png", "image/png", MAX_ATTACHMENT_BYTES);
    assert_eq!(check_attachment(&file), Ok(()));
}

#[test]
fn test_mixed_batch_keeps_valid_files() {
    let mut wizard = filled_wizard();
    let rejected = wizard.add_files([
        MockFile::new("photo.jpg", "image/jpeg", 2048),
        MockFile::new("notes.txt", "text/plain", 100),
        MockFile::new(
            "estimate.docx",
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
            4096,
        ),
    ]);

    assert_eq!(rejected.len(), 1);
    let names: Vec<_> = wizard.draft().attachments.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["photo.jpg", "estimate.docx"]);

    assert_eq!(wizard.remove_attachment(0).map(|f| f.name), Some("photo.jpg".into()));
    assert_eq!(wizard.remove_attachment(5), None);
    assert_eq!(wizard.draft().attachments.len(), 1);
}

#[test]
fn test_prepare_jumps_to_first_invalid_step() {
    let mut wizard = filled_wizard();
    wizard.set_description("   ");
    assert!(wizard.prepare_submission().is_none());
    assert_eq!(wizard.step(), ClaimStep::Details);
    assert!(wizard.errors().contains(FIELD_DESCRIPTION));
    assert_eq!(*wizard.status(), SubmissionStatus::Idle);
}

#[test]
fn test_prepare_blocks_double_submit() {
    let mut wizard = filled_wizard();
    let submission = wizard.prepare_submission().unwrap();
    assert_eq!(submission.estimated_loss, 12500.5);
    assert!(wizard.is_submitting());
    assert!(wizard.prepare_submission().is_none());
}

#[test]
fn test_server_validation_returns_to_field_step() {
    let mut wizard = filled_wizard();
    wizard.prepare_submission().unwrap();

    let mut errors = FieldErrors::new();
    errors.add(FIELD_ESTIMATED_LOSS, "Ensure this value is less than 10000000.");
    wizard.apply_result(Err(ApiError::Validation(errors)));

    assert_eq!(wizard.step(), ClaimStep::Details);
    assert!(wizard.errors().contains(FIELD_ESTIMATED_LOSS));
    assert!(matches!(wizard.status(), SubmissionStatus::Failed(_)));
    // 草稿保留，可以修改后重试
    assert_eq!(wizard.draft().estimated_loss, "12500.50");
}

#[test]
fn test_server_errors_on_two_steps_land_on_earliest() {
    let mut wizard = filled_wizard();
    wizard.prepare_submission().unwrap();

    // "description" 按字母序排在 "disaster_type" 之前
    let mut errors = FieldErrors::new();
    errors.add(FIELD_DESCRIPTION, "This field may not be blank.");
    errors.add(FIELD_DISASTER_TYPE, "\"fire\" is not a valid choice.");
    wizard.apply_result(Err(ApiError::Validation(errors)));

    assert_eq!(wizard.step(), ClaimStep::BasicInfo);
    assert!(wizard.errors().contains(FIELD_DISASTER_TYPE));
    assert!(wizard.errors().contains(FIELD_DESCRIPTION));
}

#[tokio::test]
async fn test_successful_submit_resets_wizard() {
    let api = api();
    api.client().mock_response(
        HttpMethod::Post,
        "https://api.test/claims/",
        201,
        json!({
            "id": 17,
            "status": "pending",
            "predicted_approval": true,
            "predicted_limit": "9800.00"
        }),
    );

    let mut wizard = filled_wizard();
    wizard.add_files([MockFile::new("photo.png", "image/png", 512)]);
    let status = wizard.submit(&api).await.clone();

    match status {
        SubmissionStatus::Succeeded(outcome) => {
            assert_eq!(outcome.predicted_approval, Some(Prediction::Flag(true)));
            assert_eq!(outcome.predicted_limit, Some(9800.0));
        }
        other => panic!("unexpected status: {other:?}"),
    }
    assert_eq!(wizard.step(), ClaimStep::BasicInfo);
    assert!(wizard.draft().is_empty());

    let sent = api.client().last_request().unwrap();
    let HttpBody::Multipart(parts) = sent.body else {
        panic!("expected multipart body");
    };
    assert_eq!(parts.len(), 5);
    assert!(matches!(
        &parts[3],
        FormPart::Text { name, value } if name == FIELD_ESTIMATED_LOSS && value == "12500.50"
    ));
}

#[tokio::test]
async fn test_created_claim_with_unreadable_body_still_resets() {
    let api = api();
    api.client().mock_response(
        HttpMethod::Post,
        "https://api.test/claims/",
        201,
        json!({ "predicted_approval": "likely", "predicted_limit": ["80.00"] }),
    );

    let mut wizard = filled_wizard();
    let status = wizard.submit(&api).await.clone();

    assert_eq!(status, SubmissionStatus::Succeeded(SubmittedClaim::default()));
    assert_eq!(wizard.step(), ClaimStep::BasicInfo);
    assert!(wizard.draft().is_empty());
}

#[tokio::test]
async fn test_decimal_prediction_is_surfaced() {
    let api = api();
    api.client().mock_response(
        HttpMethod::Post,
        "https://api.test/claims/",
        201,
        json!({
            "id": 18,
            "claim_number": "CLM-2024-4821",
            "disaster_type": "wildfire",
            "property_type": "house",
            "status": "pending",
            "predicted_approval": "0.85",
            "predicted_limit": "80.00"
        }),
    );

    let mut wizard = filled_wizard();
    match wizard.submit(&api).await.clone() {
        SubmissionStatus::Succeeded(outcome) => {
            let approval = outcome.predicted_approval.unwrap();
            assert!(approval.is_likely());
            assert_eq!(approval.percent(), Some(85.0));
            assert_eq!(outcome.predicted_limit, Some(80.0));
        }
        other => panic!("unexpected status: {other:?}"),
    }
}

#[tokio::test]
async fn test_network_failure_keeps_draft() {
    let api = api();
    api.client().go_offline();

    let mut wizard = filled_wizard();
    let status = wizard.submit(&api).await.clone();

    assert_eq!(
        status,
        SubmissionStatus::Failed("Failed to submit claim. Please try again.".into())
    );
    assert_eq!(wizard.step(), ClaimStep::Documents);
    assert!(!wizard.draft().is_empty());

    wizard.dismiss_status();
    assert_eq!(*wizard.status(), SubmissionStatus::Idle);
}

#[tokio::test]
async fn test_incomplete_draft_sends_nothing() {
    let api = api();
    let mut wizard = ClaimWizard::<MockFile>::new();
    wizard.submit(&api).await;
    assert_eq!(api.client().request_count(), 0);
}
