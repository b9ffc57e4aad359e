use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use sl_core::{EMPTY_VALUE, ObjectId, is_empty_value, parse_unit};
use tracing::debug;

use crate::case::save_case;
use crate::error::{AutomationError, AutomationResult};
use crate::handle::{ObjectHandle, PropertyState};
use crate::memory::model::{CallKind, MemoryModel, Slot};
use crate::names;

/// Handle to one object of a [`MemoryModel`].
pub struct MemoryHandle {
    model: Rc<RefCell<MemoryModel>>,
    id: ObjectId,
}

impl MemoryHandle {
    pub(crate) fn new(model: Rc<RefCell<MemoryModel>>, id: ObjectId) -> Self {
        Self { model, id }
    }

    fn open_model(&self) -> AutomationResult<std::cell::RefMut<'_, MemoryModel>> {
        let model = self.model.borrow_mut();
        if model.closed {
            return Err(AutomationError::CaseClosed);
        }
        Ok(model)
    }

    fn sibling(&self, id: ObjectId) -> Box<dyn ObjectHandle> {
        Box::new(MemoryHandle::new(Rc::clone(&self.model), id))
    }
}

impl fmt::Debug for MemoryHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MemoryHandle({})", self.id)
    }
}

fn slot<'a>(model: &'a MemoryModel, id: ObjectId, property: &str) -> AutomationResult<&'a Slot> {
    let node = model.node(id);
    node.slots
        .get(property)
        .ok_or_else(|| AutomationError::NoSuchProperty {
            object: node.name.clone(),
            property: property.to_string(),
        })
}

fn slot_mut<'a>(
    model: &'a mut MemoryModel,
    id: ObjectId,
    property: &str,
) -> AutomationResult<&'a mut Slot> {
    let node = model.node_mut(id);
    let object = node.name.clone();
    node.slots
        .get_mut(property)
        .ok_or_else(|| AutomationError::NoSuchProperty {
            object,
            property: property.to_string(),
        })
}

fn length_mismatch(model: &MemoryModel, id: ObjectId, property: &str, expected: usize, found: usize) -> AutomationError {
    AutomationError::LengthMismatch {
        object: model.node(id).name.clone(),
        property: property.to_string(),
        expected,
        found,
    }
}

fn not_assignable(model: &MemoryModel, id: ObjectId, property: &str) -> AutomationError {
    AutomationError::NotAssignable {
        object: model.node(id).name.clone(),
        property: property.to_string(),
    }
}

impl ObjectHandle for MemoryHandle {
    fn name(&self) -> AutomationResult<String> {
        Ok(self.open_model()?.node(self.id).name.clone())
    }

    fn type_name(&self) -> AutomationResult<String> {
        Ok(self.open_model()?.node(self.id).type_name.clone())
    }

    fn get_value(&self, property: &str, unit: &str) -> AutomationResult<f64> {
        let mut model = self.open_model()?;
        model.record(self.id, CallKind::Get, property);
        let slot = slot(&model, self.id, property)?;
        if slot.vector {
            return Err(length_mismatch(&model, self.id, property, slot.values.len(), 1));
        }
        match slot.values[0] {
            None => Ok(EMPTY_VALUE),
            Some(si) => Ok(parse_unit(unit)?.ensure(slot.quantity, unit)?.from_si(si)),
        }
    }

    fn set_value(&self, property: &str, value: f64, unit: &str) -> AutomationResult<()> {
        let mut model = self.open_model()?;
        model.record(self.id, CallKind::Set, property);
        let target = slot(&model, self.id, property)?;
        if target.vector {
            return Err(length_mismatch(&model, self.id, property, target.values.len(), 1));
        }
        if !target.states[0].is_free() {
            return Err(not_assignable(&model, self.id, property));
        }
        let converted = if is_empty_value(value) {
            None
        } else {
            Some(parse_unit(unit)?.ensure(target.quantity, unit)?.to_si(value))
        };
        slot_mut(&mut model, self.id, property)?.values[0] = converted;
        debug!(object = %self.id, property, value, unit, "memory set_value");
        Ok(())
    }

    fn get_values(&self, property: &str, unit: &str) -> AutomationResult<Vec<f64>> {
        let mut model = self.open_model()?;
        model.record(self.id, CallKind::GetValues, property);
        let slot = slot(&model, self.id, property)?;
        let def = parse_unit(unit)?.ensure(slot.quantity, unit)?;
        Ok(slot
            .values
            .iter()
            .map(|v| v.map_or(EMPTY_VALUE, |si| def.from_si(si)))
            .collect())
    }

    fn set_values(&self, property: &str, values: &[f64], unit: &str) -> AutomationResult<()> {
        let mut model = self.open_model()?;
        model.record(self.id, CallKind::SetValues, property);
        let target = slot(&model, self.id, property)?;
        if target.values.len() != values.len() {
            return Err(length_mismatch(
                &model,
                self.id,
                property,
                target.values.len(),
                values.len(),
            ));
        }
        if target.states.iter().any(|s| !s.is_free()) {
            return Err(not_assignable(&model, self.id, property));
        }
        let def = parse_unit(unit)?.ensure(target.quantity, unit)?;
        let converted: Vec<Option<f64>> = values
            .iter()
            .map(|&v| (!is_empty_value(v)).then(|| def.to_si(v)))
            .collect();
        slot_mut(&mut model, self.id, property)?.values = converted;
        Ok(())
    }

    fn state(&self, property: &str) -> AutomationResult<i32> {
        let mut model = self.open_model()?;
        model.record(self.id, CallKind::State, property);
        let slot = slot(&model, self.id, property)?;
        Ok(slot
            .states
            .first()
            .copied()
            .unwrap_or(PropertyState::Calculated)
            .flag())
    }

    fn states(&self, property: &str) -> AutomationResult<Vec<i32>> {
        let mut model = self.open_model()?;
        model.record(self.id, CallKind::State, property);
        let slot = slot(&model, self.id, property)?;
        Ok(slot.states.iter().map(|s| s.flag()).collect())
    }

    fn text(&self, property: &str) -> AutomationResult<String> {
        let model = self.open_model()?;
        let node = model.node(self.id);
        node.texts
            .get(property)
            .cloned()
            .ok_or_else(|| AutomationError::NoSuchProperty {
                object: node.name.clone(),
                property: property.to_string(),
            })
    }

    fn names(&self, property: &str) -> AutomationResult<Vec<String>> {
        let model = self.open_model()?;
        let node = model.node(self.id);
        node.lists
            .get(property)
            .cloned()
            .ok_or_else(|| AutomationError::NoSuchProperty {
                object: node.name.clone(),
                property: property.to_string(),
            })
    }

    fn set_flag(&self, property: &str, on: bool) -> AutomationResult<()> {
        let mut model = self.open_model()?;
        model.record(self.id, CallKind::Set, property);
        let node = model.node_mut(self.id);
        match node.flags.get_mut(property) {
            Some(flag) => {
                *flag = on;
                Ok(())
            }
            None => Err(AutomationError::NoSuchProperty {
                object: node.name.clone(),
                property: property.to_string(),
            }),
        }
    }

    fn child(&self, name: &str) -> AutomationResult<Box<dyn ObjectHandle>> {
        let model = self.open_model()?;
        let node = model.node(self.id);
        match node.children.get(name) {
            Some(id) => Ok(self.sibling(*id)),
            None => Err(AutomationError::NoSuchObject {
                object: node.name.clone(),
                name: name.to_string(),
            }),
        }
    }

    fn collection(&self, name: &str) -> AutomationResult<Vec<Box<dyn ObjectHandle>>> {
        let model = self.open_model()?;
        let node = model.node(self.id);
        match node.collections.get(name) {
            Some(ids) => Ok(ids.iter().map(|id| self.sibling(*id)).collect()),
            None => Err(AutomationError::NoSuchCollection {
                object: node.name.clone(),
                name: name.to_string(),
            }),
        }
    }

    fn invoke(&self, method: &str) -> AutomationResult<()> {
        let mut model = self.open_model()?;
        model.record(self.id, CallKind::Invoke, method);
        let is_case = self.id == model.root;
        match method {
            names::SAVE if is_case => {
                let path = model.source.clone().ok_or(AutomationError::NoBackingFile)?;
                let case = model.to_case();
                drop(model);
                save_case(&path, &case)?;
                debug!(path = %path.display(), "memory case saved");
                Ok(())
            }
            names::CLOSE if is_case => {
                model.closed = true;
                Ok(())
            }
            _ => Err(AutomationError::NoSuchMethod {
                object: model.node(self.id).name.clone(),
                method: method.to_string(),
            }),
        }
    }
}
