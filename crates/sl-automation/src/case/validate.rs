//! Case validation logic.

use std::collections::{BTreeMap, HashSet};

use sl_core::parse_unit;

use crate::case::schema::{CaseDef, OperationDef, PropertyDef, StreamDef};

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Duplicate name: {name} in {context}")]
    DuplicateName { name: String, context: String },

    #[error("Missing reference: {name} in {context}")]
    MissingReference { name: String, context: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

pub fn validate_case(case: &CaseDef) -> Result<(), ValidationError> {
    let mut stream_names = HashSet::new();
    for stream in case.material_streams.iter().chain(&case.energy_streams) {
        if !stream_names.insert(stream.name.as_str()) {
            return Err(ValidationError::DuplicateName {
                name: stream.name.clone(),
                context: "streams".to_string(),
            });
        }
    }

    let component_count = case.fluid_package.components.len();
    for stream in &case.material_streams {
        validate_stream(stream, component_count)?;
    }
    for stream in &case.energy_streams {
        validate_stream(stream, component_count)?;
    }

    validate_operations(&case.operations, &stream_names, "operations")
}

fn validate_operations(
    operations: &[OperationDef],
    stream_names: &HashSet<&str>,
    context: &str,
) -> Result<(), ValidationError> {
    let mut op_names = HashSet::new();
    for op in operations {
        if !op_names.insert(op.name.as_str()) {
            return Err(ValidationError::DuplicateName {
                name: op.name.clone(),
                context: context.to_string(),
            });
        }

        for stream in op.feeds.iter().chain(&op.products) {
            if !stream_names.contains(stream.as_str()) {
                return Err(ValidationError::MissingReference {
                    name: stream.clone(),
                    context: format!("{} '{}'", context, op.name),
                });
            }
        }

        validate_properties(&op.name, &op.properties)?;

        if let Some(column) = &op.column {
            // Column internals live in their own flowsheet; they never connect to case streams.
            validate_operations(
                &column.operations,
                &HashSet::new(),
                &format!("column '{}'", op.name),
            )?;
        }
    }
    Ok(())
}

fn validate_stream(stream: &StreamDef, component_count: usize) -> Result<(), ValidationError> {
    validate_properties(&stream.name, &stream.properties)?;

    for (name, vector) in &stream.vectors {
        let field = format!("{}.{}", stream.name, name);
        if vector.values.len() != component_count {
            return Err(ValidationError::InvalidValue {
                field,
                value: vector.values.len().to_string(),
                reason: format!("expected one value per component ({})", component_count),
            });
        }
        if let Some(states) = &vector.states {
            if states.len() != component_count {
                return Err(ValidationError::InvalidValue {
                    field,
                    value: states.len().to_string(),
                    reason: "states must match the component list".to_string(),
                });
            }
        }
        check_unit(&field, &vector.unit)?;
        for value in vector.values.iter().flatten() {
            check_finite(&field, *value)?;
        }
    }
    Ok(())
}

fn validate_properties(
    owner: &str,
    properties: &BTreeMap<String, PropertyDef>,
) -> Result<(), ValidationError> {
    for (name, def) in properties {
        let field = format!("{}.{}", owner, name);
        check_unit(&field, &def.unit)?;
        if let Some(value) = def.value {
            check_finite(&field, value)?;
        }
    }
    Ok(())
}

fn check_unit(field: &str, unit: &str) -> Result<(), ValidationError> {
    parse_unit(unit)
        .map(|_| ())
        .map_err(|e| ValidationError::InvalidValue {
            field: field.to_string(),
            value: unit.to_string(),
            reason: e.to_string(),
        })
}

fn check_finite(field: &str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ValidationError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
            reason: "value must be finite".to_string(),
        })
    }
}
