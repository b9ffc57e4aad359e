//! Single-property accessors of streams and operations.

mod common;

use std::collections::BTreeMap;

use common::{approx, open_demo};
use sl_automation::{CallKind, PropertyState};
use sl_flowsheet::{ComponentProperty, FlowsheetError, Setpoint};

fn values(pairs: &[(&str, f64)]) -> BTreeMap<String, Setpoint> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), Setpoint::Value(*v)))
        .collect()
}

#[test]
fn component_mass_flow_by_name() {
    let sim = open_demo();
    let feed = sim.material_stream("Feed").unwrap();

    let flows = feed.component_mass_flow("kg/h").unwrap();
    assert_eq!(flows.len(), 3);
    assert!(approx(flows["Methane"], 600.0));
    assert!(approx(flows["Propane"], 100.0));

    let fractions = feed.component_mass_fraction().unwrap();
    assert!(approx(fractions["Ethane"], 0.3));
}

#[test]
fn unmentioned_components_are_zeroed() {
    let sim = open_demo();
    let feed = sim.material_stream("Feed").unwrap();

    feed.set_component_mass_flow(&values(&[("Methane", 700.0)]), "kg/h")
        .unwrap();

    let flows = feed.component_mass_flow("kg/h").unwrap();
    assert!(approx(flows["Methane"], 700.0));
    assert_eq!(flows["Ethane"], Some(0.0));
    assert_eq!(flows["Propane"], Some(0.0));
}

#[test]
fn empty_component_entry_clears_that_component() {
    let sim = open_demo();
    let feed = sim.material_stream("Feed").unwrap();

    let mut flows = values(&[("Methane", 650.0), ("Propane", 50.0)]);
    flows.insert("Ethane".to_string(), Setpoint::Empty);
    feed.set_component_mass_flow(&flows, "kg/h").unwrap();

    let read = feed.component_mass_flow("kg/h").unwrap();
    assert!(approx(read["Methane"], 650.0));
    assert_eq!(read["Ethane"], None);
    assert!(approx(read["Propane"], 50.0));
}

#[test]
fn non_finite_component_value_is_not_written() {
    let sim = open_demo();
    let feed = sim.material_stream("Feed").unwrap();
    sim.application().clear_journal().unwrap();

    let err = feed
        .set_component_mass_flow(&values(&[("Methane", f64::NAN)]), "kg/h")
        .unwrap_err();

    assert!(matches!(err, FlowsheetError::InvalidInput(_)));
    let journal = sim.application().journal().unwrap();
    assert!(journal.iter().all(|c| c.kind != CallKind::SetValues));
}

#[test]
fn unknown_component_is_rejected_before_any_remote_call() {
    let sim = open_demo();
    let feed = sim.material_stream("Feed").unwrap();
    sim.application().clear_journal().unwrap();

    let err = feed
        .set_component_mass_fraction(&values(&[("Butane", 1.0)]))
        .unwrap_err();

    assert!(matches!(err, FlowsheetError::UnknownComponent { ref component, .. } if component == "Butane"));
    assert!(sim.application().journal().unwrap().is_empty());
}

#[test]
fn every_component_state_is_checked() {
    let sim = open_demo();
    let feed = sim.material_stream("Feed").unwrap();
    sim.application().clear_journal().unwrap();

    // Methane and Propane are free, Ethane is calculated.
    let err = feed
        .set_component_molar_fraction(&values(&[("Methane", 0.9), ("Propane", 0.1)]))
        .unwrap_err();

    match err {
        FlowsheetError::NotFree { property, state, .. } => {
            assert_eq!(property, "ComponentMolarFraction[Ethane]");
            assert_eq!(state, PropertyState::Calculated);
        }
        other => panic!("unexpected error: {other}"),
    }

    let journal = sim.application().journal().unwrap();
    assert!(journal.iter().all(|c| c.kind != CallKind::SetValues));
    let fractions = feed.component_molar_fraction().unwrap();
    assert!(approx(fractions["Methane"], 0.75));
}

#[test]
fn calculated_component_vector_is_not_written() {
    let sim = open_demo();
    let feed = sim.material_stream("Feed").unwrap();

    let err = feed
        .set_component_values(ComponentProperty::MolarFlow, &values(&[("Methane", 1.0)]), "kgmole/h")
        .unwrap_err();
    assert!(matches!(err, FlowsheetError::NotFree { .. }));
}

#[test]
fn stream_scalars_in_requested_units() {
    let sim = open_demo();
    let feed = sim.material_stream("Feed").unwrap();

    assert!(approx(feed.pressure("kPa").unwrap(), 5000.0));
    assert!(approx(feed.molar_flow("kgmole/h").unwrap(), 52.1));
    assert!(approx(feed.volume_flow("m3/h").unwrap(), 21.4));
    assert!(approx(feed.vapour_fraction("").unwrap(), 1.0));
    assert!(approx(feed.mass_density("kg/m3").unwrap(), 46.7));

    let makeup = sim.material_stream("Makeup").unwrap();
    assert_eq!(makeup.temperature("C").unwrap(), None);
    makeup.set_temperature(Setpoint::Value(15.0), "C").unwrap();
    assert!(approx(makeup.temperature("C").unwrap(), 15.0));
}

#[test]
fn wrong_unit_dimension_surfaces_as_remote_error() {
    let sim = open_demo();
    let feed = sim.material_stream("Feed").unwrap();
    let err = feed.pressure("kg/h").unwrap_err();
    assert!(matches!(err, FlowsheetError::Automation(_)));
}

#[test]
fn energy_stream_heat_flow() {
    let sim = open_demo();
    let q = sim.energy_stream("Q-100").unwrap();

    assert!(approx(q.heat_flow("kW").unwrap(), 250.0));
    q.set_heat_flow(Setpoint::Value(0.3), "MW").unwrap();
    assert!(approx(q.heat_flow("kW").unwrap(), 300.0));

    let calculated = sim.energy_stream("Q-101").unwrap();
    assert!(matches!(
        calculated.set_heat_flow(Setpoint::Value(1.0), "kW"),
        Err(FlowsheetError::NotFree { .. })
    ));
}

#[test]
fn exchanger_and_heater_accessors() {
    let sim = open_demo();

    let exchanger = sim.operation("E-100").unwrap().as_heat_exchanger().unwrap();
    assert!(approx(exchanger.duty("kW").unwrap(), 120.0));
    assert!(matches!(
        exchanger.set_duty(Setpoint::Value(100.0), "kW"),
        Err(FlowsheetError::NotFree { .. })
    ));
    exchanger
        .set_tube_pressure_drop(Setpoint::Value(70.0), "kPa")
        .unwrap();
    assert!(approx(exchanger.tube_pressure_drop("bar").unwrap(), 0.7));
    assert!(approx(exchanger.shell_pressure_drop("bar").unwrap(), 0.3));

    let cooler = sim.operation("E-101").unwrap().as_heater().unwrap();
    cooler.set_duty(Setpoint::Empty, "kW").unwrap();
    assert_eq!(cooler.duty("kW").unwrap(), None);
    assert!(approx(cooler.pressure_drop("bar").unwrap(), 0.2));
}

#[test]
fn reactor_accessors() {
    let sim = open_demo();
    let pfr = sim.operation("PFR-100").unwrap().as_reactor().unwrap();

    assert!(approx(pfr.diameter("mm").unwrap(), 50.0));
    assert!(approx(pfr.duty("kW").unwrap(), 250.0));
    pfr.set_length(Setpoint::Value(8.0), "m").unwrap();
    pfr.set_number_of_tubes(Setpoint::Value(150.0), "").unwrap();
    assert!(approx(pfr.length("m").unwrap(), 8.0));
    assert!(approx(pfr.number_of_tubes("").unwrap(), 150.0));
    assert!(matches!(
        pfr.set_duty(Setpoint::Value(1.0), "kW"),
        Err(FlowsheetError::NotFree { .. })
    ));
}
