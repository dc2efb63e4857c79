use crate::helpers::{filled_form, spawn_app, spawn_app_with_opener, RecordingOpener};
use coleta::domain::{CollectionForm, TIMESTAMP_FORMAT};
use coleta::submission::SubmissionError;
use std::sync::Arc;

#[tokio::test]
async fn a_valid_request_is_recorded_with_a_driver_snapshot() {
    // Arrange
    let test_app = spawn_app().await;
    test_app.register_driver("Ana", "11988887777").await;

    // Act
    let receipt = test_app
        .app
        .dispatcher()
        .submit(&mut filled_form())
        .await
        .expect("Failed to submit the request.");

    // Assert
    let recorded = test_app.app.requests().list_all().await.unwrap();
    assert_eq!(recorded.len(), 1);
    let saved = &recorded[0];
    assert_eq!(saved.id, receipt.request_id);
    assert_eq!(saved.request, receipt.request);
    assert_eq!(saved.request.requester_name, "Loja X");
    assert_eq!(saved.request.driver_name, "Ana");
    assert_eq!(saved.request.driver_phone, "11988887777");
    assert!(!saved.request.submitted_at.is_empty());

    for expected in ["Loja X", "Rua A, 10", "2", "5", "150", "Rua B, 20", "João"] {
        assert!(
            receipt.message.contains(expected),
            "The notification does not mention `{}`:\n{}",
            expected,
            receipt.message
        );
    }
}

#[tokio::test]
async fn the_timestamp_is_taken_at_submission_time() {
    // Arrange
    let test_app = spawn_app().await;
    test_app.register_driver("Ana", "11988887777").await;

    // Act
    let before = chrono::Local::now().format(TIMESTAMP_FORMAT).to_string();
    test_app
        .app
        .dispatcher()
        .submit(&mut filled_form())
        .await
        .expect("Failed to submit the request.");
    let after = chrono::Local::now().format(TIMESTAMP_FORMAT).to_string();

    // Assert
    let recorded = test_app.app.requests().list_all().await.unwrap();
    let submitted_at = &recorded[0].request.submitted_at;
    assert!(before.as_str() <= submitted_at.as_str());
    assert!(submitted_at.as_str() <= after.as_str());
    assert!(chrono::NaiveDateTime::parse_from_str(submitted_at, TIMESTAMP_FORMAT).is_ok());
}

#[tokio::test]
async fn a_request_with_a_blank_field_is_never_recorded() {
    // Arrange
    let test_app = spawn_app().await;
    test_app.register_driver("Ana", "11988887777").await;

    for index in 0..CollectionForm::LABELS.len() {
        for blank in ["", "   "] {
            let mut form = filled_form();
            *form.fields_mut()[index] = blank.into();

            // Act
            let outcome = test_app.app.dispatcher().submit(&mut form).await;

            // Assert
            assert!(
                matches!(outcome, Err(SubmissionError::ValidationError(_))),
                "The request was not rejected when `{}` was {:?}.",
                CollectionForm::LABELS[index],
                blank
            );
        }
    }
    assert_eq!(test_app.recorded_requests().await, 0);
    assert!(test_app.opener.opened().is_empty());
}

#[tokio::test]
async fn a_request_without_a_driver_is_rejected() {
    let test_app = spawn_app().await;
    test_app.register_driver("Ana", "11988887777").await;
    let mut form = CollectionForm {
        driver: None,
        ..filled_form()
    };

    let outcome = test_app.app.dispatcher().submit(&mut form).await;

    assert!(matches!(outcome, Err(SubmissionError::ValidationError(_))));
    assert_eq!(test_app.recorded_requests().await, 0);
}

#[tokio::test]
async fn a_request_for_an_unknown_driver_is_rejected() {
    // Arrange
    let test_app = spawn_app().await;
    test_app.register_driver("Carlos", "+5511999990000").await;

    // Act
    let outcome = test_app.app.dispatcher().submit(&mut filled_form()).await;

    // Assert
    assert!(matches!(outcome, Err(SubmissionError::UnknownDriver(name)) if name == "Ana"));
    assert_eq!(test_app.recorded_requests().await, 0);
    assert!(test_app.opener.opened().is_empty());
}

#[tokio::test]
async fn a_driver_removed_after_selection_cannot_be_assigned() {
    let test_app = spawn_app().await;
    test_app.register_driver("Ana", "11988887777").await;
    let mut form = filled_form();

    test_app.app.drivers().remove("Ana").await.unwrap();
    let outcome = test_app.app.dispatcher().submit(&mut form).await;

    assert!(matches!(outcome, Err(SubmissionError::UnknownDriver(_))));
    assert_eq!(test_app.recorded_requests().await, 0);
}

#[tokio::test]
async fn the_driver_is_notified_through_the_messaging_link() {
    // Arrange
    let test_app = spawn_app().await;
    test_app.register_driver("Ana", "11988887777").await;

    // Act
    let receipt = test_app
        .app
        .dispatcher()
        .submit(&mut filled_form())
        .await
        .unwrap();

    // Assert
    assert!(receipt.notified);
    let opened = test_app.opener.opened();
    assert_eq!(opened.len(), 1);
    let expected = format!(
        "https://wa.me/5511988887777?text={}",
        urlencoding::encode(&receipt.message)
    );
    assert_eq!(opened[0], expected);
}

#[tokio::test]
async fn a_failed_notification_does_not_undo_the_request() {
    // Arrange
    let test_app = spawn_app_with_opener(Arc::new(RecordingOpener::broken())).await;
    test_app.register_driver("Ana", "11988887777").await;

    // Act
    let receipt = test_app
        .app
        .dispatcher()
        .submit(&mut filled_form())
        .await
        .expect("A notification failure must not fail the submission.");

    // Assert
    assert!(!receipt.notified);
    assert_eq!(test_app.recorded_requests().await, 1);
}

#[tokio::test]
async fn the_form_is_cleared_only_after_a_successful_submission() {
    // Arrange
    let test_app = spawn_app().await;
    let mut form = filled_form();

    // Act - nobody is registered yet
    let outcome = test_app.app.dispatcher().submit(&mut form).await;

    // Assert
    assert!(outcome.is_err());
    assert_eq!(form, filled_form());

    // Act - same form, now with a registered driver
    test_app.register_driver("Ana", "11988887777").await;
    test_app.app.dispatcher().submit(&mut form).await.unwrap();

    // Assert
    assert_eq!(form, CollectionForm::default());
}

#[tokio::test]
async fn submitted_values_are_stored_trimmed() {
    let test_app = spawn_app().await;
    test_app.register_driver("Ana", "11988887777").await;
    let mut form = CollectionForm {
        pickup_address: "  Rua A, 10  ".into(),
        driver: Some(" Ana ".into()),
        ..filled_form()
    };

    test_app.app.dispatcher().submit(&mut form).await.unwrap();

    let recorded = test_app.app.requests().list_all().await.unwrap();
    assert_eq!(recorded[0].request.pickup_address, "Rua A, 10");
    assert_eq!(recorded[0].request.driver_name, "Ana");
}

#[tokio::test]
async fn every_submission_appends_a_new_entry() {
    let test_app = spawn_app().await;
    test_app.register_driver("Ana", "11988887777").await;

    let first = test_app.app.dispatcher().submit(&mut filled_form()).await.unwrap();
    let second = test_app.app.dispatcher().submit(&mut filled_form()).await.unwrap();

    assert!(second.request_id > first.request_id);
    let ids: Vec<i64> = test_app
        .app
        .requests()
        .list_all()
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.id)
        .collect();
    assert_eq!(ids, [first.request_id, second.request_id]);
}

#[tokio::test]
async fn a_driver_phone_without_digits_is_recorded_but_not_notified() {
    // Arrange
    let test_app = spawn_app().await;
    test_app.register_driver("Ana", "ligar depois das 18h").await;

    // Act
    let receipt = test_app
        .app
        .dispatcher()
        .submit(&mut filled_form())
        .await
        .expect("A notification failure must not fail the submission.");

    // Assert
    assert!(!receipt.notified);
    assert_eq!(receipt.request.driver_phone, "ligar depois das 18h");
    assert_eq!(test_app.recorded_requests().await, 1);
    assert!(test_app.opener.opened().is_empty());
}
