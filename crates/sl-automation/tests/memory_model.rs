//! Behaviour of the in-memory automation backend.

use sl_automation::case::{
    CaseDef, ColumnDef, FluidPackageDef, OperationDef, PropertyDef, StreamDef, VectorDef,
    load_yaml,
};
use sl_automation::{
    Application, AutomationError, CallKind, MemoryApplication, ObjectHandle, PropertyState, names,
};
use sl_core::{EMPTY_VALUE, Tolerance};

fn sample_case() -> CaseDef {
    CaseDef {
        title: "Cooler test".to_string(),
        fluid_package: FluidPackageDef {
            property_package: "Peng-Robinson".to_string(),
            components: vec!["Methane".to_string(), "Ethane".to_string()],
        },
        solver_active: true,
        visible: false,
        material_streams: vec![
            StreamDef::new("Feed")
                .with_property("Pressure", PropertyDef::free(20.0, "bar"))
                .with_property("Temperature", PropertyDef::free(40.0, "C"))
                .with_vector(
                    "ComponentMassFlow",
                    VectorDef {
                        values: vec![Some(800.0), Some(200.0)],
                        unit: "kg/h".to_string(),
                        state: Default::default(),
                        states: None,
                    },
                ),
            StreamDef::new("Product")
                .with_property("Temperature", PropertyDef::calculated(15.0, "C")),
        ],
        energy_streams: vec![
            StreamDef::new("Q-100").with_property("HeatFlow", PropertyDef::calculated(50.0, "kW")),
        ],
        operations: vec![
            OperationDef::new("E-100", "coolerop")
                .with_feeds(["Feed"])
                .with_products(["Product", "Q-100"])
                .with_property("Duty", PropertyDef::calculated(50.0, "kW")),
            OperationDef::new("T-100", "distillation").with_column(ColumnDef {
                operations: vec![OperationDef::new("Main TS", "traysection")],
            }),
        ],
    }
}

fn flowsheet(app: &MemoryApplication) -> Box<dyn ObjectHandle> {
    app.active_document()
        .unwrap()
        .child(names::FLOWSHEET)
        .unwrap()
}

fn close(a: f64, b: f64) -> bool {
    Tolerance::READBACK.matches(a, b)
}

#[test]
fn reads_convert_units() {
    let app = MemoryApplication::with_active_case(&sample_case()).unwrap();
    let feed = flowsheet(&app).item(names::MATERIAL_STREAMS, "Feed").unwrap();

    assert!(close(feed.get_value("Pressure", "bar").unwrap(), 20.0));
    assert!(close(feed.get_value("Pressure", "kPa").unwrap(), 2000.0));
    assert!(close(feed.get_value("Temperature", "K").unwrap(), 313.15));

    let flows = feed.get_values("ComponentMassFlow", "t/h").unwrap();
    assert!(close(flows[0], 0.8));
    assert!(close(flows[1], 0.2));
}

#[test]
fn wrong_dimension_is_an_error() {
    let app = MemoryApplication::with_active_case(&sample_case()).unwrap();
    let feed = flowsheet(&app).item(names::MATERIAL_STREAMS, "Feed").unwrap();
    let err = feed.get_value("Pressure", "C").unwrap_err();
    assert!(matches!(err, AutomationError::Unit(_)));
}

#[test]
fn calculated_property_rejects_writes() {
    let app = MemoryApplication::with_active_case(&sample_case()).unwrap();
    let product = flowsheet(&app)
        .item(names::MATERIAL_STREAMS, "Product")
        .unwrap();

    assert_eq!(
        product.property_state("Temperature").unwrap(),
        PropertyState::Calculated
    );
    let err = product.set_value("Temperature", 10.0, "C").unwrap_err();
    assert!(matches!(err, AutomationError::NotAssignable { .. }));
    assert!(close(product.get_value("Temperature", "C").unwrap(), 15.0));
}

#[test]
fn sentinel_clears_value() {
    let app = MemoryApplication::with_active_case(&sample_case()).unwrap();
    let feed = flowsheet(&app).item(names::MATERIAL_STREAMS, "Feed").unwrap();

    feed.set_value("Pressure", EMPTY_VALUE, "bar").unwrap();
    assert_eq!(feed.get_value("Pressure", "kPa").unwrap(), EMPTY_VALUE);

    let snapshot = app.snapshot().unwrap();
    assert_eq!(snapshot.material_streams[0].properties["Pressure"].value, None);
}

#[test]
fn connections_follow_operations() {
    let app = MemoryApplication::with_active_case(&sample_case()).unwrap();
    let fs = flowsheet(&app);
    let feed = fs.item(names::MATERIAL_STREAMS, "Feed").unwrap();
    let product = fs.item(names::MATERIAL_STREAMS, "Product").unwrap();

    assert!(feed.names(names::UPSTREAM_OPERS).unwrap().is_empty());
    assert_eq!(feed.names(names::DOWNSTREAM_OPERS).unwrap(), vec!["E-100"]);
    assert_eq!(product.names(names::UPSTREAM_OPERS).unwrap(), vec!["E-100"]);
}

#[test]
fn column_has_sub_flowsheet() {
    let app = MemoryApplication::with_active_case(&sample_case()).unwrap();
    let column = flowsheet(&app).item(names::OPERATIONS, "T-100").unwrap();
    assert_eq!(column.type_name().unwrap(), "distillation");

    let tower = column
        .child(names::COLUMN_FLOWSHEET)
        .unwrap()
        .item(names::OPERATIONS, "Main TS")
        .unwrap();
    assert_eq!(tower.type_name().unwrap(), "traysection");

    let cooler = flowsheet(&app).item(names::OPERATIONS, "E-100").unwrap();
    assert!(matches!(
        cooler.child(names::COLUMN_FLOWSHEET),
        Err(AutomationError::NoSuchObject { .. })
    ));
}

#[test]
fn journal_records_call_order() {
    let app = MemoryApplication::with_active_case(&sample_case()).unwrap();
    let feed = flowsheet(&app).item(names::MATERIAL_STREAMS, "Feed").unwrap();
    app.clear_journal().unwrap();

    feed.get_value("Temperature", "C").unwrap();
    feed.state("Pressure").unwrap();
    feed.set_value("Pressure", 5.0, "bar").unwrap();

    let kinds: Vec<(CallKind, String)> = app
        .journal()
        .unwrap()
        .into_iter()
        .map(|c| (c.kind, c.member))
        .collect();
    assert_eq!(
        kinds,
        vec![
            (CallKind::Get, "Temperature".to_string()),
            (CallKind::State, "Pressure".to_string()),
            (CallKind::Set, "Pressure".to_string()),
        ]
    );
}

#[test]
fn close_invalidates_handles() {
    let app = MemoryApplication::with_active_case(&sample_case()).unwrap();
    let doc = app.active_document().unwrap();
    let feed = flowsheet(&app).item(names::MATERIAL_STREAMS, "Feed").unwrap();

    doc.invoke(names::CLOSE).unwrap();
    assert!(matches!(
        feed.get_value("Pressure", "bar"),
        Err(AutomationError::CaseClosed)
    ));
    assert!(matches!(
        app.active_document(),
        Err(AutomationError::NoActiveDocument)
    ));

    app.quit().unwrap();
    assert!(app.has_quit());
    assert!(matches!(app.quit(), Err(AutomationError::ApplicationQuit)));
}

#[test]
fn save_round_trip_through_yaml() {
    let dir = std::env::temp_dir().join("sl_automation_save_round_trip");
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("case.yaml");
    sl_automation::case::save_yaml(&path, &sample_case()).unwrap();

    let app = MemoryApplication::new();
    let doc = app.open_case(&path).unwrap();
    assert_eq!(doc.text(names::TITLE).unwrap(), "Cooler test");

    let feed = doc
        .child(names::FLOWSHEET)
        .unwrap()
        .item(names::MATERIAL_STREAMS, "Feed")
        .unwrap();
    feed.set_value("Pressure", 12.5, "bar").unwrap();
    doc.invoke(names::SAVE).unwrap();

    let reloaded = load_yaml(&path).unwrap();
    let pressure = reloaded.material_streams[0].properties["Pressure"]
        .value
        .unwrap();
    assert!(close(pressure, 12.5));
    assert_eq!(reloaded.operations.len(), 2);
    assert!(reloaded.operations[1].column.is_some());
}

#[test]
fn save_without_backing_file_fails() {
    let app = MemoryApplication::with_active_case(&sample_case()).unwrap();
    let doc = app.active_document().unwrap();
    assert!(matches!(
        doc.invoke(names::SAVE),
        Err(AutomationError::NoBackingFile)
    ));
}
