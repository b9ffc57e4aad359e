#![allow(dead_code)]

use std::path::PathBuf;

use sl_automation::MemoryApplication;
use sl_automation::case::{CaseDef, load_yaml};
use sl_core::Tolerance;
use sl_flowsheet::{CaseSource, Simulation};

pub fn demo_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../demos/gas_plant.yaml")
}

pub fn demo_case() -> CaseDef {
    load_yaml(&demo_path()).unwrap_or_else(|e| panic!("Failed to load demo case: {}", e))
}

/// Session attached to the demo case, as if the user had opened it by hand.
pub fn open_demo() -> Simulation<MemoryApplication> {
    let app = MemoryApplication::with_active_case(&demo_case()).unwrap();
    Simulation::open(app, CaseSource::Active).unwrap()
}

pub fn approx(actual: Option<f64>, expected: f64) -> bool {
    actual.is_some_and(|a| Tolerance::READBACK.matches(a, expected))
}
