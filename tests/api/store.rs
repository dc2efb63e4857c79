use crate::helpers::{filled_form, spawn_app, test_settings};
use claims::assert_err;
use coleta::configuration::DatabaseSettings;
use coleta::console::Console;
use coleta::driver_registry::RegistryError;
use coleta::store::Store;
use coleta::submission::SubmissionError;

#[tokio::test]
async fn initialising_the_schema_twice_keeps_existing_rows() {
    // Arrange
    let test_app = spawn_app().await;
    test_app.register_driver("Ana", "11988887777").await;
    test_app
        .app
        .dispatcher()
        .submit(&mut filled_form())
        .await
        .expect("Failed to submit the request.");

    // Act
    for _ in 0..2 {
        test_app
            .app
            .store()
            .init_schema()
            .await
            .expect("Failed to initialise the schema again.");
    }

    // Assert
    let drivers = test_app.app.drivers().list_drivers().await.unwrap();
    assert_eq!(drivers.len(), 1);
    assert_eq!(test_app.recorded_requests().await, 1);
}

#[tokio::test]
async fn a_fresh_store_has_no_drivers_and_no_requests() {
    let test_app = spawn_app().await;

    assert!(test_app.app.drivers().list_drivers().await.unwrap().is_empty());
    assert_eq!(test_app.recorded_requests().await, 0);
}

#[tokio::test]
async fn a_store_in_a_missing_directory_is_unavailable() {
    let (settings, directory) = test_settings();
    let store = Store::new(&DatabaseSettings {
        path: directory
            .join("does-not-exist")
            .join("coletas.db")
            .to_string_lossy()
            .into_owned(),
        ..settings.database
    });

    assert_err!(store.init_schema().await);

    let _ = std::fs::remove_dir_all(directory);
}

#[tokio::test]
async fn a_store_that_must_already_exist_is_not_created() {
    let (settings, directory) = test_settings();
    let store = Store::new(&DatabaseSettings {
        create_if_missing: false,
        ..settings.database
    });

    assert_err!(store.init_schema().await);
    assert!(!directory.join("coletas.db").exists());

    let _ = std::fs::remove_dir_all(directory);
}

#[tokio::test]
async fn operations_fail_without_stopping_the_app_when_the_store_is_lost() {
    // Arrange
    let mut test_app = spawn_app().await;
    test_app.register_driver("Ana", "11988887777").await;
    std::fs::remove_file(&test_app.settings.database.path)
        .expect("Failed to delete the database file.");

    // Act
    let submitted = test_app
        .app
        .dispatcher()
        .submit(&mut filled_form())
        .await;
    let registered = test_app
        .app
        .drivers()
        .register("Carlos".into(), "+5511999990000".into())
        .await;

    // Assert
    assert!(matches!(
        submitted,
        Err(SubmissionError::StorageUnavailable(_))
    ));
    assert!(matches!(
        registered,
        Err(RegistryError::StorageUnavailable(_))
    ));
    assert_err!(test_app.app.drivers().list_drivers().await);

    let mut output = Vec::new();
    Console::new("drivers\ntheme light\n".as_bytes(), &mut output)
        .run(&mut test_app.app)
        .await
        .expect("The console failed.");
    let output = String::from_utf8(output).unwrap();
    assert!(output.contains("Error: Failed to fetch the registered drivers."), "{output}");
    assert!(output.contains("Appearance mode set to light."), "{output}");
}
