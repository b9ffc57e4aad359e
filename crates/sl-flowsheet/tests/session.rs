//! Session lifecycle against the in-memory application.

mod common;

use common::{approx, demo_case, demo_path, open_demo};
use sl_automation::case::{load_yaml, save_yaml};
use sl_automation::{Application, AutomationError, MemoryApplication};
use sl_flowsheet::{CaseSource, FlowsheetError, Setpoint, Simulation};

#[test]
fn summary_display() {
    let sim = open_demo();
    assert_eq!(
        sim.to_string(),
        "File: Gas plant\nThermodynamical package: Peng-Robinson\nComponent list: [Methane, Ethane, Propane]"
    );
    assert_eq!(sim.components(), ["Methane", "Ethane", "Propane"]);
}

#[test]
fn open_from_file() {
    let sim = Simulation::open(MemoryApplication::new(), CaseSource::File(&demo_path())).unwrap();
    assert_eq!(sim.file_name(), "Gas plant");
    assert_eq!(sim.property_package(), "Peng-Robinson");
    assert_eq!(sim.material_streams().len(), 7);
}

#[test]
fn open_without_active_case_fails() {
    let err = Simulation::open(MemoryApplication::new(), CaseSource::Active).unwrap_err();
    assert!(matches!(
        err,
        FlowsheetError::Automation(AutomationError::NoActiveDocument)
    ));
}

#[test]
fn visibility_and_solver_flags() {
    let sim = open_demo();
    sim.set_visible(true).unwrap();
    sim.set_solver_active(false).unwrap();

    let case = sim.application().snapshot().unwrap();
    assert!(case.visible);
    assert!(!case.solver_active);
}

#[test]
fn save_writes_back_to_the_case_file() {
    let dir = std::env::temp_dir().join("sl_flowsheet_session_save");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("gas_plant.yaml");
    save_yaml(&path, &demo_case()).unwrap();

    let sim = Simulation::open(MemoryApplication::new(), CaseSource::File(&path)).unwrap();
    sim.material_stream("Feed")
        .unwrap()
        .set_pressure(Setpoint::Value(42.0), "bar")
        .unwrap();
    sim.save().unwrap();

    let saved = load_yaml(&path).unwrap();
    let feed = saved
        .material_streams
        .iter()
        .find(|s| s.name == "Feed")
        .unwrap();
    assert!(approx(feed.properties["Pressure"].value, 42.0));

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn save_needs_a_backing_file() {
    let sim = open_demo();
    assert!(matches!(
        sim.save(),
        Err(FlowsheetError::Automation(AutomationError::NoBackingFile))
    ));
}

#[test]
fn close_quits_the_application() {
    let sim = open_demo();
    let app = sim.close().unwrap();

    assert!(app.has_quit());
    assert!(matches!(
        app.active_document(),
        Err(AutomationError::ApplicationQuit)
    ));
}
