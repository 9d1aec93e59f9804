//! Load/save against real files on disk.

use padbind::codes::canonical;
use padbind::{
    BindingProfile, BindingRegistry, DiagnosticLog, LoadError, PhysicalCode, RegistryState,
    SaveError, SaveOptions, Severity, VirtualCode,
};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn registry() -> (BindingRegistry, DiagnosticLog) {
    let log = DiagnosticLog::new();
    (BindingRegistry::with_diagnostics(log.clone()), log)
}

fn write(dir: &TempDir, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join("gamepad_bindings.json");
    fs::write(&path, contents).expect("write store");
    path
}

#[test]
fn missing_store_loads_empty_with_one_warning() {
    let dir = TempDir::new().unwrap();
    let (mut registry, log) = registry();

    let report = registry.load(&dir.path().join("does-not-exist.json"));

    assert_eq!(report.loaded, 0);
    assert!(registry.is_empty());
    assert_eq!(registry.state(), RegistryState::Loaded);
    let entries = log.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].severity, Severity::Warning);
    assert!(entries[0].detail.as_deref().unwrap().contains("does-not-exist.json"));
}

#[test]
fn try_load_reports_store_errors() {
    let dir = TempDir::new().unwrap();
    let (mut registry, log) = registry();

    let err = registry.try_load(&dir.path().join("nope.json")).unwrap_err();
    assert!(matches!(err, LoadError::StoreUnavailable { .. }));

    let path = write(&dir, "not json at all");
    let err = registry.try_load(&path).unwrap_err();
    assert!(err.is_malformed());

    assert!(log.entries().is_empty());
}

#[test]
fn partially_broken_store_keeps_good_profiles_in_order() {
    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        r#"[
            {
                "name": "one",
                "binds": [ { "in": 5, "out": 42, "is_axis": true } ],
                "devices": ["dev-1"]
            },
            42,
            { "name": "three", "binds": [], "devices": ["dev-3"] }
        ]"#,
    );
    let (mut registry, log) = registry();

    let report = registry.load(&path);

    assert_eq!((report.loaded, report.skipped), (2, 1));
    assert_eq!(registry.get(0).unwrap().name(), "one");
    assert_eq!(registry.get(1).unwrap().name(), "three");
    assert_eq!(
        registry.resolve("dev-1").unwrap().translate(PhysicalCode(5)),
        VirtualCode(42)
    );
    assert_eq!(log.count(Severity::Warning), 1);
}

#[test]
fn element_missing_required_fields_is_skipped() {
    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        r#"[
            { "name": "one", "binds": [], "devices": ["dev-1"] },
            { "unexpected": true },
            { "name": "three", "binds": [], "devices": ["dev-3"] }
        ]"#,
    );
    let (mut registry, log) = registry();

    let report = registry.load(&path);

    assert_eq!((report.loaded, report.skipped), (2, 1));
    let names: Vec<&str> = registry.iter().map(BindingProfile::name).collect();
    assert_eq!(names, ["one", "three"]);
    assert_eq!(log.count(Severity::Warning), 1);
}

#[test]
fn wrongly_typed_elements_are_skipped() {
    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        r#"[
            { "name": "one", "binds": [], "devices": ["dev-1"] },
            { "name": "two", "binds": 17, "devices": [] },
            { "name": "three", "binds": [], "devices": ["dev-3"] }
        ]"#,
    );
    let (mut registry, _log) = registry();

    let report = registry.load(&path);

    assert_eq!((report.loaded, report.skipped), (2, 1));
    assert_eq!(registry.get(1).unwrap().name(), "three");
    assert!(registry.resolve("dev-3").is_some());
}

#[test]
fn load_replaces_previous_profiles() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, r#"[ { "name": "only", "binds": [], "devices": [] } ]"#);
    let (mut registry, _log) = registry();

    registry.load(&path);
    registry.load(&path);

    assert_eq!(registry.len(), 1);
}

#[test]
fn save_then_load_round_trips() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("gamepad_bindings.json");
    let (mut registry, log) = registry();

    let mut pad = BindingProfile::new();
    pad.set_name("Arcade stick");
    pad.bind(PhysicalCode(5), VirtualCode(42), true);
    pad.bind(PhysicalCode(288), VirtualCode::PAD_START, false);
    pad.add_device("dev-X");
    pad.add_device("dev-Y");
    registry.add(pad.clone());
    registry.add(BindingProfile::new());

    let report = registry.save(&path).unwrap();
    assert!(report.is_complete());
    assert_eq!(report.profiles, 2);
    assert!(!dir.path().join("nested").join("gamepad_bindings.json.tmp").exists());

    let (mut reloaded, _) = self::registry();
    reloaded.load(&path);

    assert_eq!(reloaded.len(), 2);
    let copy = reloaded.resolve("dev-Y").unwrap();
    assert_eq!(copy, &pad);
    for c in canonical() {
        assert_eq!(
            reloaded.get(1).unwrap().translate(c.default_physical),
            c.virtual_code
        );
    }
    assert!(log.entries().is_empty());
}

#[test]
fn stored_file_uses_documented_keys() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("gamepad_bindings.json");
    let (mut registry, _log) = registry();
    let mut pad = BindingProfile::new();
    pad.set_name("pad");
    pad.add_device("dev-1");
    registry.add(pad);

    registry.save(&path).unwrap();

    let value: serde_json::Value = serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
    let first = &value.as_array().unwrap()[0];
    assert_eq!(first["name"], "pad");
    assert_eq!(first["devices"], serde_json::json!(["dev-1"]));
    let bind = &first["binds"][0];
    assert!(bind["in"].is_u64());
    assert!(bind["out"].is_u64());
    assert!(bind["is_axis"].is_boolean());
}

#[test]
fn unloaded_registry_saves_empty_array() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("gamepad_bindings.json");
    let (registry, _log) = registry();

    registry.save(&path).unwrap();

    let value: serde_json::Value = serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
    assert_eq!(value, serde_json::json!([]));
}

fn unwritable_target(dir: &TempDir) -> std::path::PathBuf {
    // A regular file where a directory is expected can't be opened for writing.
    let blocker = dir.path().join("blocker");
    fs::write(&blocker, "x").unwrap();
    blocker.join("gamepad_bindings.json")
}

#[test]
fn unwritable_store_warns_and_fails() {
    for options in [SaveOptions::default(), SaveOptions::best_effort()] {
        let dir = TempDir::new().unwrap();
        let log = DiagnosticLog::new();
        let registry = BindingRegistry::with_diagnostics(log.clone()).with_save_options(options);

        let err = registry.save(&unwritable_target(&dir)).unwrap_err();

        assert!(matches!(err, SaveError::StoreUnavailable { .. }));
        assert_eq!(log.count(Severity::Warning), 1);
        assert_eq!(log.count(Severity::Error), 0);
    }
}

#[test]
fn best_effort_save_overwrites_in_place() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "old contents that are longer than an empty array");
    let (registry, _log) = registry();
    let registry = registry.with_save_options(SaveOptions::best_effort());

    registry.save(&path).unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "[]");
    assert!(!Path::new(&format!("{}.tmp", path.display())).exists());
}
