//! Arena-backed object graph built from a [`CaseDef`].

use std::collections::BTreeMap;
use std::path::PathBuf;

use sl_core::{ObjectId, Quantity, parse_unit};

use crate::case::{
    CaseDef, ColumnDef, FluidPackageDef, OperationDef, PropertyDef, StateDef, StreamDef, VectorDef,
    validate_case,
};
use crate::error::AutomationResult;
use crate::handle::PropertyState;
use crate::names;

/// Kind of remote call recorded in the journal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    Get,
    Set,
    GetValues,
    SetValues,
    State,
    Invoke,
}

/// One remote call, as seen by the in-memory application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub object: String,
    pub kind: CallKind,
    pub member: String,
}

/// Numeric property storage. Values are canonical SI; `None` is empty.
#[derive(Debug, Clone)]
pub(crate) struct Slot {
    pub quantity: Quantity,
    /// Unit the case file used; exports convert back to it.
    pub display_unit: String,
    pub values: Vec<Option<f64>>,
    pub states: Vec<PropertyState>,
    pub vector: bool,
}

#[derive(Debug, Default)]
pub(crate) struct ObjectNode {
    pub name: String,
    pub type_name: String,
    pub slots: BTreeMap<String, Slot>,
    pub texts: BTreeMap<String, String>,
    pub lists: BTreeMap<String, Vec<String>>,
    pub flags: BTreeMap<String, bool>,
    pub children: BTreeMap<String, ObjectId>,
    pub collections: BTreeMap<String, Vec<ObjectId>>,
}

#[derive(Debug)]
pub struct MemoryModel {
    pub(crate) nodes: Vec<ObjectNode>,
    pub(crate) root: ObjectId,
    pub(crate) source: Option<PathBuf>,
    pub(crate) closed: bool,
    pub(crate) journal: Vec<Call>,
}

impl MemoryModel {
    /// Build the object graph for a case.
    pub fn from_case(case: &CaseDef, source: Option<PathBuf>) -> AutomationResult<Self> {
        validate_case(case)?;

        let mut model = Self {
            nodes: Vec::new(),
            root: ObjectId::at(0),
            source,
            closed: false,
            journal: Vec::new(),
        };

        let root = model.push(&case.title, names::CASE_TYPE);
        model.root = root;
        let node = model.node_mut(root);
        node.texts.insert(names::TITLE.to_string(), case.title.clone());
        node.flags.insert(names::VISIBLE.to_string(), case.visible);

        let solver = model.push("Solver", names::SOLVER_TYPE);
        model
            .node_mut(solver)
            .flags
            .insert(names::CAN_SOLVE.to_string(), case.solver_active);
        model.attach_child(root, names::SOLVER, solver);

        let flowsheet = model.push("Case", names::FLOWSHEET_TYPE);
        model.attach_child(root, names::FLOWSHEET, flowsheet);

        let package = model.push(
            &case.fluid_package.property_package,
            names::FLUID_PACKAGE_TYPE,
        );
        let node = model.node_mut(package);
        node.texts.insert(
            names::PROPERTY_PACKAGE_NAME.to_string(),
            case.fluid_package.property_package.clone(),
        );
        node.lists.insert(
            names::COMPONENTS.to_string(),
            case.fluid_package.components.clone(),
        );
        model.attach_child(flowsheet, names::FLUID_PACKAGE, package);

        for stream in &case.material_streams {
            let id = model.add_stream(stream, names::MATERIAL_STREAM_TYPE, &case.operations)?;
            model.attach_item(flowsheet, names::MATERIAL_STREAMS, id);
        }
        for stream in &case.energy_streams {
            let id = model.add_stream(stream, names::ENERGY_STREAM_TYPE, &case.operations)?;
            model.attach_item(flowsheet, names::ENERGY_STREAMS, id);
        }
        model.ensure_collection(flowsheet, names::MATERIAL_STREAMS);
        model.ensure_collection(flowsheet, names::ENERGY_STREAMS);

        model.add_operations(flowsheet, &case.operations)?;

        Ok(model)
    }

    /// Snapshot the current object graph back into a case description.
    pub fn to_case(&self) -> CaseDef {
        let root = self.node(self.root);
        let flowsheet = self.node(root.children[names::FLOWSHEET]);
        let package = self.node(flowsheet.children[names::FLUID_PACKAGE]);
        let solver = self.node(root.children[names::SOLVER]);

        CaseDef {
            title: root.texts.get(names::TITLE).cloned().unwrap_or_default(),
            fluid_package: FluidPackageDef {
                property_package: package
                    .texts
                    .get(names::PROPERTY_PACKAGE_NAME)
                    .cloned()
                    .unwrap_or_default(),
                components: package
                    .lists
                    .get(names::COMPONENTS)
                    .cloned()
                    .unwrap_or_default(),
            },
            solver_active: solver.flags.get(names::CAN_SOLVE).copied().unwrap_or(true),
            visible: root.flags.get(names::VISIBLE).copied().unwrap_or(false),
            material_streams: self.export_streams(flowsheet, names::MATERIAL_STREAMS),
            energy_streams: self.export_streams(flowsheet, names::ENERGY_STREAMS),
            operations: self.export_operations(flowsheet),
        }
    }

    /// Replace the fluid package component list. Stream vectors keep their length.
    pub fn set_components(&mut self, components: Vec<String>) {
        let flowsheet = self.node(self.root).children[names::FLOWSHEET];
        let package = self.node(flowsheet).children[names::FLUID_PACKAGE];
        self.node_mut(package)
            .lists
            .insert(names::COMPONENTS.to_string(), components);
    }

    pub fn journal(&self) -> &[Call] {
        &self.journal
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub(crate) fn node(&self, id: ObjectId) -> &ObjectNode {
        &self.nodes[id.slot()]
    }

    pub(crate) fn node_mut(&mut self, id: ObjectId) -> &mut ObjectNode {
        &mut self.nodes[id.slot()]
    }

    pub(crate) fn record(&mut self, id: ObjectId, kind: CallKind, member: &str) {
        let object = self.node(id).name.clone();
        self.journal.push(Call {
            object,
            kind,
            member: member.to_string(),
        });
    }

    fn push(&mut self, name: &str, type_name: &str) -> ObjectId {
        let id = ObjectId::at(self.nodes.len());
        self.nodes.push(ObjectNode {
            name: name.to_string(),
            type_name: type_name.to_string(),
            ..Default::default()
        });
        id
    }

    fn attach_child(&mut self, parent: ObjectId, name: &str, child: ObjectId) {
        self.node_mut(parent).children.insert(name.to_string(), child);
    }

    fn attach_item(&mut self, parent: ObjectId, collection: &str, item: ObjectId) {
        self.collection_entry(parent, collection).push(item);
    }

    fn ensure_collection(&mut self, parent: ObjectId, collection: &str) {
        self.collection_entry(parent, collection);
    }

    fn collection_entry(&mut self, parent: ObjectId, collection: &str) -> &mut Vec<ObjectId> {
        self.node_mut(parent)
            .collections
            .entry(collection.to_string())
            .or_default()
    }

    fn add_stream(
        &mut self,
        stream: &StreamDef,
        type_name: &str,
        operations: &[OperationDef],
    ) -> AutomationResult<ObjectId> {
        let id = self.push(&stream.name, type_name);

        let upstream = operations
            .iter()
            .filter(|op| op.products.contains(&stream.name))
            .map(|op| op.name.clone())
            .collect();
        let downstream = operations
            .iter()
            .filter(|op| op.feeds.contains(&stream.name))
            .map(|op| op.name.clone())
            .collect();

        let node = self.node_mut(id);
        node.lists.insert(names::UPSTREAM_OPERS.to_string(), upstream);
        node.lists
            .insert(names::DOWNSTREAM_OPERS.to_string(), downstream);
        for (name, def) in &stream.properties {
            node.slots.insert(name.clone(), scalar_slot(def)?);
        }
        for (name, def) in &stream.vectors {
            node.slots.insert(name.clone(), vector_slot(def)?);
        }
        Ok(id)
    }

    fn add_operations(
        &mut self,
        parent: ObjectId,
        operations: &[OperationDef],
    ) -> AutomationResult<()> {
        self.ensure_collection(parent, names::OPERATIONS);
        for op in operations {
            let id = self.push(&op.name, &op.type_name);
            let node = self.node_mut(id);
            node.lists
                .insert(names::ATTACHED_FEEDS.to_string(), op.feeds.clone());
            node.lists
                .insert(names::ATTACHED_PRODUCTS.to_string(), op.products.clone());
            for (name, def) in &op.properties {
                node.slots.insert(name.clone(), scalar_slot(def)?);
            }
            if let Some(column) = &op.column {
                let sub = self.push(&op.name, names::FLOWSHEET_TYPE);
                self.add_operations(sub, &column.operations)?;
                self.attach_child(id, names::COLUMN_FLOWSHEET, sub);
            }
            self.attach_item(parent, names::OPERATIONS, id);
        }
        Ok(())
    }

    fn export_streams(&self, flowsheet: &ObjectNode, collection: &str) -> Vec<StreamDef> {
        flowsheet
            .collections
            .get(collection)
            .into_iter()
            .flatten()
            .map(|id| {
                let node = self.node(*id);
                let mut stream = StreamDef::new(node.name.clone());
                for (name, slot) in &node.slots {
                    if slot.vector {
                        stream.vectors.insert(name.clone(), export_vector(slot));
                    } else {
                        stream.properties.insert(name.clone(), export_scalar(slot));
                    }
                }
                stream
            })
            .collect()
    }

    fn export_operations(&self, parent: &ObjectNode) -> Vec<OperationDef> {
        parent
            .collections
            .get(names::OPERATIONS)
            .into_iter()
            .flatten()
            .map(|id| {
                let node = self.node(*id);
                let mut op = OperationDef::new(node.name.clone(), node.type_name.clone());
                op.feeds = node
                    .lists
                    .get(names::ATTACHED_FEEDS)
                    .cloned()
                    .unwrap_or_default();
                op.products = node
                    .lists
                    .get(names::ATTACHED_PRODUCTS)
                    .cloned()
                    .unwrap_or_default();
                for (name, slot) in &node.slots {
                    op.properties.insert(name.clone(), export_scalar(slot));
                }
                if let Some(sub) = node.children.get(names::COLUMN_FLOWSHEET) {
                    op.column = Some(ColumnDef {
                        operations: self.export_operations(self.node(*sub)),
                    });
                }
                op
            })
            .collect()
    }
}

fn state_of(def: StateDef) -> PropertyState {
    match def {
        StateDef::Free => PropertyState::Free,
        StateDef::Calculated => PropertyState::Calculated,
    }
}

fn state_def(state: PropertyState) -> StateDef {
    match state {
        PropertyState::Free => StateDef::Free,
        PropertyState::Calculated => StateDef::Calculated,
    }
}

fn scalar_slot(def: &PropertyDef) -> AutomationResult<Slot> {
    let unit = parse_unit(&def.unit)?;
    Ok(Slot {
        quantity: unit.quantity,
        display_unit: def.unit.clone(),
        values: vec![def.value.map(|v| unit.to_si(v))],
        states: vec![state_of(def.state)],
        vector: false,
    })
}

fn vector_slot(def: &VectorDef) -> AutomationResult<Slot> {
    let unit = parse_unit(&def.unit)?;
    let states = match &def.states {
        Some(states) => states.iter().copied().map(state_of).collect(),
        None => vec![state_of(def.state); def.values.len()],
    };
    Ok(Slot {
        quantity: unit.quantity,
        display_unit: def.unit.clone(),
        values: def
            .values
            .iter()
            .map(|v| v.map(|v| unit.to_si(v)))
            .collect(),
        states,
        vector: true,
    })
}

fn export_scalar(slot: &Slot) -> PropertyDef {
    let unit = parse_unit(&slot.display_unit).ok();
    PropertyDef {
        value: slot
            .values
            .first()
            .copied()
            .flatten()
            .map(|v| unit.map_or(v, |u| u.from_si(v))),
        unit: slot.display_unit.clone(),
        state: slot
            .states
            .first()
            .copied()
            .map(state_def)
            .unwrap_or_default(),
    }
}

fn export_vector(slot: &Slot) -> VectorDef {
    let unit = parse_unit(&slot.display_unit).ok();
    let states: Vec<StateDef> = slot.states.iter().copied().map(state_def).collect();
    let uniform = states.windows(2).all(|w| w[0] == w[1]);
    VectorDef {
        values: slot
            .values
            .iter()
            .map(|v| v.map(|v| unit.map_or(v, |u| u.from_si(v))))
            .collect(),
        unit: slot.display_unit.clone(),
        state: states.first().copied().unwrap_or_default(),
        states: (!uniform).then_some(states),
    }
}
