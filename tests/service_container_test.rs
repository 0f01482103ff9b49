//! End-to-end tests through the service container with injected boundaries

use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use tempfile::TempDir;

use partyguests::application::services::ExportFormat;
use partyguests::config::Settings;
use partyguests::domain::State;
use partyguests::infrastructure::di::ServiceContainer;
use partyguests::infrastructure::traits::{Clock, FileStore, RealFileSystem};

struct FixedClock(NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

fn container(temp: &TempDir, strict: bool) -> ServiceContainer {
    let mut settings = Settings::default();
    settings.data_dir = temp.path().join("data");
    settings.export.dir = temp.path().join("exports");
    settings.validation.strict = strict;
    let fs = Arc::new(RealFileSystem);
    let store = Arc::new(FileStore::new(settings.data_dir.clone(), fs.clone()));
    let at = NaiveDate::from_ymd_opt(2024, 12, 24)
        .and_then(|d| d.and_hms_opt(9, 0, 0))
        .unwrap();
    ServiceContainer::with_deps(settings, fs, store, Arc::new(FixedClock(at)))
}

#[test]
fn given_edited_list_when_exporting_and_importing_elsewhere_then_same_list() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let source = container(&temp, false);
    let (mut session, _) = source.open_session();
    session
        .edit(|doc| {
            let s = doc.add_student(Some("Alice".into()), None);
            doc.add_friend(s, Some("Bob".into()), Some(State::Paid))?;
            Ok(())
        })
        .unwrap();

    // Act
    let path = source
        .exchange()
        .export(session.document(), ExportFormat::Json, &source.settings.export.dir)
        .unwrap();
    let other = TempDir::new().unwrap();
    let target = container(&other, true);
    let imported = target.exchange().import(Some(&path)).unwrap();
    let (mut target_session, _) = target.open_session();
    target_session.replace(imported).unwrap();

    // Assert
    assert!(path.ends_with("partyguests-2024-12-24 09:00:00.json"));
    assert_eq!(target.persistence().load().unwrap(), *session.document());
}

#[test]
fn given_custom_storage_key_when_saving_then_uses_that_slot() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let mut settings = Settings::default();
    settings.data_dir = temp.path().to_path_buf();
    settings.storage_key = "summer".into();
    let container = ServiceContainer::new(settings);
    let (mut session, warning) = container.open_session();
    assert!(warning.is_none());

    // Act
    session
        .edit(|doc| {
            doc.add_teacher(Some("Carol".into()), Some(State::Delivered));
            Ok(())
        })
        .unwrap();

    // Assert
    assert!(temp.path().join("summer.json").is_file());
    assert!(!temp.path().join("formData.json").exists());
}
