//! The simulation session: one open case and the wrappers built from it.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::path::Path;
use std::rc::Rc;

use sl_automation::{Application, ObjectHandle, names};
use tracing::info;

use crate::entity::{Entity, EntitySnapshot};
use crate::error::{FlowsheetError, FlowsheetResult};
use crate::operation::{OperationKind, UnitOperation};
use crate::stream::{EnergyStream, MaterialStream};

/// Which case a session attaches to.
#[derive(Debug, Clone, Copy)]
pub enum CaseSource<'a> {
    /// The case already open in the application.
    Active,
    /// Open this file. The path is passed to the application unchanged.
    File(&'a Path),
}

/// Named wrapper collections, replaced together on every refresh.
#[derive(Debug, Default)]
struct Collections {
    operations: HashMap<String, UnitOperation>,
    material_streams: HashMap<String, MaterialStream>,
    energy_streams: HashMap<String, EnergyStream>,
    inlet_streams: BTreeSet<String>,
    outlet_streams: BTreeSet<String>,
}

impl Collections {
    fn build(flowsheet: &dyn ObjectHandle, components: &Rc<[String]>) -> FlowsheetResult<Self> {
        let mut operations = HashMap::new();
        for handle in flowsheet.collection(names::OPERATIONS)? {
            let op = UnitOperation::from_handle(handle)?;
            operations.insert(op.name().to_string(), op);
        }

        let mut material_streams = HashMap::new();
        for handle in flowsheet.collection(names::MATERIAL_STREAMS)? {
            let stream = MaterialStream::new(handle, Rc::clone(components))?;
            material_streams.insert(stream.name().to_string(), stream);
        }

        let mut energy_streams = HashMap::new();
        for handle in flowsheet.collection(names::ENERGY_STREAMS)? {
            let stream = EnergyStream::new(handle)?;
            energy_streams.insert(stream.name().to_string(), stream);
        }

        let inlet_streams = material_streams
            .values()
            .filter(|s| s.connections().is_inlet())
            .map(|s| s.name().to_string())
            .collect();
        let outlet_streams = material_streams
            .values()
            .filter(|s| s.connections().is_outlet())
            .map(|s| s.name().to_string())
            .collect();

        Ok(Self {
            operations,
            material_streams,
            energy_streams,
            inlet_streams,
            outlet_streams,
        })
    }
}

/// Cached state of every wrapper in a session, comparable across refreshes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowsheetSnapshot {
    pub operations: BTreeMap<String, (OperationKind, EntitySnapshot)>,
    pub material_streams: BTreeMap<String, EntitySnapshot>,
    pub energy_streams: BTreeMap<String, EntitySnapshot>,
    pub inlet_streams: BTreeSet<String>,
    pub outlet_streams: BTreeSet<String>,
}

/// An open simulation case.
///
/// Owns the application connection. Wrappers are built on [`open`](Self::open) and rebuilt
/// wholesale by [`refresh`](Self::refresh); they are never patched individually.
#[derive(Debug)]
pub struct Simulation<A: Application> {
    app: A,
    case: Box<dyn ObjectHandle>,
    solver: Box<dyn ObjectHandle>,
    flowsheet: Box<dyn ObjectHandle>,
    file_name: String,
    property_package: String,
    components: Rc<[String]>,
    collections: Collections,
}

impl<A: Application> Simulation<A> {
    /// Attach to a case and build every collection.
    pub fn open(app: A, source: CaseSource<'_>) -> FlowsheetResult<Self> {
        let case = match source {
            CaseSource::Active => app.active_document()?,
            CaseSource::File(path) => app.open_case(path)?,
        };
        let file_name = case.text(names::TITLE)?;
        let solver = case.child(names::SOLVER)?;
        let flowsheet = case.child(names::FLOWSHEET)?;

        let property_package = flowsheet
            .child(names::FLUID_PACKAGE)?
            .text(names::PROPERTY_PACKAGE_NAME)?;
        let components = read_components(flowsheet.as_ref())?;

        let collections = Collections::build(flowsheet.as_ref(), &components)?;
        info!(
            case = %file_name,
            package = %property_package,
            components = components.len(),
            operations = collections.operations.len(),
            material_streams = collections.material_streams.len(),
            energy_streams = collections.energy_streams.len(),
            "simulation opened"
        );

        Ok(Self {
            app,
            case,
            solver,
            flowsheet,
            file_name,
            property_package,
            components,
            collections,
        })
    }

    /// Re-read the component list, then rebuild operations, streams and the inlet/outlet
    /// subsets from the live case.
    ///
    /// On error the previous components and collections are kept.
    pub fn refresh(&mut self) -> FlowsheetResult<()> {
        let components = read_components(self.flowsheet.as_ref())?;
        let collections = Collections::build(self.flowsheet.as_ref(), &components)?;
        self.components = components;
        self.collections = collections;
        info!(
            components = self.components.len(),
            operations = self.collections.operations.len(),
            material_streams = self.collections.material_streams.len(),
            energy_streams = self.collections.energy_streams.len(),
            "flowsheet refreshed"
        );
        Ok(())
    }

    pub fn set_visible(&self, visible: bool) -> FlowsheetResult<()> {
        self.case.set_flag(names::VISIBLE, visible)?;
        Ok(())
    }

    /// Enable or suspend the application's solver.
    pub fn set_solver_active(&self, active: bool) -> FlowsheetResult<()> {
        self.solver.set_flag(names::CAN_SOLVE, active)?;
        info!(active, "solver state changed");
        Ok(())
    }

    pub fn save(&self) -> FlowsheetResult<()> {
        self.case.invoke(names::SAVE)?;
        info!(case = %self.file_name, "case saved");
        Ok(())
    }

    /// Close the case and quit the application. Returns the application handle.
    pub fn close(self) -> FlowsheetResult<A> {
        self.case.invoke(names::CLOSE)?;
        self.app.quit()?;
        info!(case = %self.file_name, "simulation closed");
        Ok(self.app)
    }

    pub fn application(&self) -> &A {
        &self.app
    }

    /// Case title.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Thermodynamic property package of the fluid package.
    pub fn property_package(&self) -> &str {
        &self.property_package
    }

    pub fn components(&self) -> &[String] {
        &self.components
    }

    pub fn operations(&self) -> &HashMap<String, UnitOperation> {
        &self.collections.operations
    }

    pub fn material_streams(&self) -> &HashMap<String, MaterialStream> {
        &self.collections.material_streams
    }

    pub fn energy_streams(&self) -> &HashMap<String, EnergyStream> {
        &self.collections.energy_streams
    }

    pub fn operation(&self, name: &str) -> FlowsheetResult<&UnitOperation> {
        self.collections
            .operations
            .get(name)
            .ok_or_else(|| not_found("operation", name))
    }

    pub fn material_stream(&self, name: &str) -> FlowsheetResult<&MaterialStream> {
        self.collections
            .material_streams
            .get(name)
            .ok_or_else(|| not_found("material stream", name))
    }

    pub fn energy_stream(&self, name: &str) -> FlowsheetResult<&EnergyStream> {
        self.collections
            .energy_streams
            .get(name)
            .ok_or_else(|| not_found("energy stream", name))
    }

    /// Names of material streams fed from outside the flowsheet, sorted.
    pub fn inlet_stream_names(&self) -> &BTreeSet<String> {
        &self.collections.inlet_streams
    }

    /// Names of material streams leaving the flowsheet, sorted.
    pub fn outlet_stream_names(&self) -> &BTreeSet<String> {
        &self.collections.outlet_streams
    }

    pub fn inlet_streams(&self) -> impl Iterator<Item = &MaterialStream> + '_ {
        self.subset(&self.collections.inlet_streams)
    }

    pub fn outlet_streams(&self) -> impl Iterator<Item = &MaterialStream> + '_ {
        self.subset(&self.collections.outlet_streams)
    }

    pub fn snapshot(&self) -> FlowsheetSnapshot {
        let c = &self.collections;
        FlowsheetSnapshot {
            operations: c
                .operations
                .iter()
                .map(|(name, op)| (name.clone(), (op.kind(), op.snapshot())))
                .collect(),
            material_streams: c
                .material_streams
                .iter()
                .map(|(name, s)| (name.clone(), s.snapshot()))
                .collect(),
            energy_streams: c
                .energy_streams
                .iter()
                .map(|(name, s)| (name.clone(), s.snapshot()))
                .collect(),
            inlet_streams: c.inlet_streams.clone(),
            outlet_streams: c.outlet_streams.clone(),
        }
    }

    fn subset<'a>(&'a self, set: &'a BTreeSet<String>) -> impl Iterator<Item = &'a MaterialStream> + 'a {
        set.iter()
            .filter_map(|name| self.collections.material_streams.get(name))
    }
}

impl<A: Application> fmt::Display for Simulation<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "File: {}", self.file_name)?;
        writeln!(f, "Thermodynamical package: {}", self.property_package)?;
        write!(f, "Component list: [{}]", self.components.join(", "))
    }
}

fn read_components(flowsheet: &dyn ObjectHandle) -> FlowsheetResult<Rc<[String]>> {
    let components = flowsheet
        .child(names::FLUID_PACKAGE)?
        .names(names::COMPONENTS)?;
    Ok(components.into())
}

fn not_found(kind: &'static str, name: &str) -> FlowsheetError {
    FlowsheetError::EntityNotFound {
        kind,
        name: name.to_string(),
    }
}
