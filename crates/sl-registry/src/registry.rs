//! Per-entity-kind property registry and the bulk dispatch algorithm.

use std::collections::HashMap;

use sl_core::Setpoint;
use tracing::{debug, warn};

use crate::batch::{ReadBatch, ReadReport, UnknownProperties, WriteBatch, WriteReport};
use crate::error::DispatchError;
use crate::kind::{PropertyKind, canonicalize};

/// Reads one property in the given unit. `None` means the remote value is empty.
pub type Getter<E, Err> = fn(&E, &str) -> Result<Option<f64>, Err>;

/// Writes one property in the given unit. Checks the write precondition itself.
pub type Setter<E, Err> = fn(&E, Setpoint, &str) -> Result<(), Err>;

/// Bound accessor pair for one property kind.
pub struct Accessor<E, Err> {
    pub getter: Getter<E, Err>,
    pub setter: Option<Setter<E, Err>>,
}

impl<E, Err> Clone for Accessor<E, Err> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E, Err> Copy for Accessor<E, Err> {}

/// Mapping from canonical property to accessors for one entity kind.
///
/// Built once per entity kind; the dispatch algorithm does not depend on its contents.
pub struct Registry<E, K, Err> {
    entity: &'static str,
    accessors: HashMap<K, Accessor<E, Err>>,
    spellings: HashMap<String, K>,
    accepted: Vec<&'static str>,
}

/// Incremental registry builder.
pub struct RegistryBuilder<E, K, Err> {
    entity: &'static str,
    accessors: Vec<(K, Accessor<E, Err>)>,
}

impl<E, K: PropertyKind, Err> RegistryBuilder<E, K, Err> {
    pub fn read_write(mut self, kind: K, getter: Getter<E, Err>, setter: Setter<E, Err>) -> Self {
        self.accessors.push((
            kind,
            Accessor {
                getter,
                setter: Some(setter),
            },
        ));
        self
    }

    pub fn read_only(mut self, kind: K, getter: Getter<E, Err>) -> Self {
        self.accessors.push((
            kind,
            Accessor {
                getter,
                setter: None,
            },
        ));
        self
    }

    pub fn build(self) -> Registry<E, K, Err> {
        let mut accessors = HashMap::new();
        let mut spellings = HashMap::new();

        for (kind, accessor) in self.accessors {
            let previous = accessors.insert(kind, accessor);
            debug_assert!(previous.is_none(), "{:?} registered twice", kind);

            for spelling in std::iter::once(kind.canonical_name()).chain(kind.synonyms().iter().copied()) {
                let previous = spellings.insert(canonicalize(spelling), kind);
                debug_assert!(
                    previous.is_none_or(|p| p == kind),
                    "spelling '{}' maps to two properties",
                    spelling
                );
            }
        }

        // Report accepted names in declaration order of the kind, not hash order.
        let accepted = K::all()
            .iter()
            .filter(|k| accessors.contains_key(*k))
            .map(|k| k.canonical_name())
            .collect();

        Registry {
            entity: self.entity,
            accessors,
            spellings,
            accepted,
        }
    }
}

impl<E, K, Err> Registry<E, K, Err>
where
    K: PropertyKind,
    Err: From<DispatchError>,
{
    /// Start a registry for the entity kind named `entity` (used in diagnostics).
    pub fn builder(entity: &'static str) -> RegistryBuilder<E, K, Err> {
        RegistryBuilder {
            entity,
            accessors: Vec::new(),
        }
    }

    pub fn entity(&self) -> &'static str {
        self.entity
    }

    /// Resolve a caller label to a registered property.
    pub fn resolve(&self, label: &str) -> Option<K> {
        self.spellings.get(&canonicalize(label)).copied()
    }

    /// Canonical names this registry accepts.
    pub fn accepted_names(&self) -> &[&'static str] {
        &self.accepted
    }

    pub fn is_writable(&self, kind: K) -> bool {
        self.accessors
            .get(&kind)
            .is_some_and(|a| a.setter.is_some())
    }

    /// Read one property. `unit` defaults to the property's default unit.
    pub fn get(&self, entity: &E, kind: K, unit: Option<&str>) -> Result<Option<f64>, Err> {
        let accessor = self.accessor(kind)?;
        (accessor.getter)(entity, unit.unwrap_or(kind.default_unit()))
    }

    /// Write one property. `unit` defaults to the property's default unit.
    pub fn set(
        &self,
        entity: &E,
        kind: K,
        setpoint: Setpoint,
        unit: Option<&str>,
    ) -> Result<(), Err> {
        let setter = self
            .accessor(kind)?
            .setter
            .ok_or(DispatchError::ReadOnly {
                entity: self.entity,
                property: kind.canonical_name(),
            })?;
        setter(entity, setpoint, unit.unwrap_or(kind.default_unit()))
    }

    /// Resolve and read every request in order.
    ///
    /// Unknown labels are skipped and reported together; an accessor error stops the batch.
    pub fn read(&self, entity: &E, batch: &ReadBatch) -> Result<ReadReport, Err> {
        let mut report = ReadReport::default();
        let mut not_found = Vec::new();

        for (label, unit) in batch.iter() {
            match self.resolve(label) {
                Some(kind) => {
                    debug!(entity = self.entity, label, property = kind.canonical_name(), "bulk read");
                    let value = self.get(entity, kind, unit)?;
                    report.values.insert(label.to_string(), value);
                }
                None => not_found.push(label.to_string()),
            }
        }

        report.unknown = self.diagnose(not_found);
        Ok(report)
    }

    /// Resolve and write every request in order.
    ///
    /// Unknown labels are skipped and reported together. A failing setter (including a
    /// property that is not free) aborts the remaining requests and no diagnostic is issued.
    pub fn write(&self, entity: &E, batch: &WriteBatch) -> Result<WriteReport, Err> {
        let mut report = WriteReport::default();
        let mut not_found = Vec::new();

        for (label, request) in batch.iter() {
            match self.resolve(label) {
                Some(kind) => {
                    debug!(entity = self.entity, label, property = kind.canonical_name(), setpoint = %request.setpoint, "bulk write");
                    self.set(entity, kind, request.setpoint, request.unit.as_deref())?;
                    report.applied.push(label.to_string());
                }
                None => not_found.push(label.to_string()),
            }
        }

        report.unknown = self.diagnose(not_found);
        Ok(report)
    }

    fn accessor(&self, kind: K) -> Result<&Accessor<E, Err>, DispatchError> {
        self.accessors
            .get(&kind)
            .ok_or(DispatchError::NotRegistered {
                entity: self.entity,
                property: kind.canonical_name(),
            })
    }

    fn diagnose(&self, labels: Vec<String>) -> Option<UnknownProperties> {
        if labels.is_empty() {
            return None;
        }
        let diagnostic = UnknownProperties {
            labels,
            accepted: self.accepted.clone(),
        };
        warn!(entity = self.entity, "{}", diagnostic);
        Some(diagnostic)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Prop {
        Level,
        Flow,
        Tag,
    }

    impl PropertyKind for Prop {
        fn all() -> &'static [Self] {
            &[Prop::Level, Prop::Flow, Prop::Tag]
        }

        fn canonical_name(self) -> &'static str {
            match self {
                Prop::Level => "LEVEL",
                Prop::Flow => "MASS_FLOW",
                Prop::Tag => "TAG",
            }
        }

        fn synonyms(self) -> &'static [&'static str] {
            match self {
                Prop::Flow => &["MASSFLOW"],
                _ => &[],
            }
        }

        fn default_unit(self) -> &'static str {
            match self {
                Prop::Level => "m",
                Prop::Flow => "kg/h",
                Prop::Tag => "",
            }
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    enum TestError {
        Locked(&'static str),
        Dispatch(DispatchError),
    }

    impl From<DispatchError> for TestError {
        fn from(e: DispatchError) -> Self {
            TestError::Dispatch(e)
        }
    }

    #[derive(Default)]
    struct Tank {
        level: RefCell<Option<f64>>,
        flow: RefCell<f64>,
        level_locked: bool,
        calls: RefCell<Vec<String>>,
    }

    fn get_level(t: &Tank, unit: &str) -> Result<Option<f64>, TestError> {
        t.calls.borrow_mut().push(format!("get LEVEL {}", unit));
        Ok(*t.level.borrow())
    }

    fn set_level(t: &Tank, sp: Setpoint, unit: &str) -> Result<(), TestError> {
        t.calls.borrow_mut().push(format!("set LEVEL {}", unit));
        if t.level_locked {
            return Err(TestError::Locked("LEVEL"));
        }
        *t.level.borrow_mut() = match sp {
            Setpoint::Value(v) => Some(v),
            Setpoint::Empty => None,
        };
        Ok(())
    }

    fn get_flow(t: &Tank, unit: &str) -> Result<Option<f64>, TestError> {
        t.calls.borrow_mut().push(format!("get MASS_FLOW {}", unit));
        Ok(Some(*t.flow.borrow()))
    }

    fn set_flow(t: &Tank, sp: Setpoint, unit: &str) -> Result<(), TestError> {
        t.calls.borrow_mut().push(format!("set MASS_FLOW {}", unit));
        if let Setpoint::Value(v) = sp {
            *t.flow.borrow_mut() = v;
        }
        Ok(())
    }

    fn get_tag(_: &Tank, _: &str) -> Result<Option<f64>, TestError> {
        Ok(Some(7.0))
    }

    fn registry() -> Registry<Tank, Prop, TestError> {
        Registry::builder("tank")
            .read_write(Prop::Level, get_level, set_level)
            .read_write(Prop::Flow, get_flow, set_flow)
            .read_only(Prop::Tag, get_tag)
            .build()
    }

    #[test]
    fn resolves_synonyms_in_any_case() {
        let reg = registry();
        assert_eq!(reg.resolve("massflow"), Some(Prop::Flow));
        assert_eq!(reg.resolve("Mass_Flow"), Some(Prop::Flow));
        assert_eq!(reg.resolve("MASS FLOW"), None);
        assert_eq!(reg.accepted_names(), &["LEVEL", "MASS_FLOW", "TAG"]);
    }

    #[test]
    fn read_uses_default_unit_and_keeps_labels() {
        let reg = registry();
        let tank = Tank {
            level: RefCell::new(Some(2.5)),
            flow: RefCell::new(10.0),
            ..Default::default()
        };

        let report = reg
            .read(&tank, &ReadBatch::new().with_default("level").with("MassFlow", "t/h"))
            .unwrap();

        assert_eq!(report.unknown, None);
        assert_eq!(report.value("level"), Some(2.5));
        assert_eq!(report.value("MassFlow"), Some(10.0));
        assert_eq!(
            *tank.calls.borrow(),
            vec!["get LEVEL m".to_string(), "get MASS_FLOW t/h".to_string()]
        );
    }

    #[test]
    fn unknown_labels_reported_once() {
        let reg = registry();
        let tank = Tank::default();

        let report = reg
            .read(
                &tank,
                &ReadBatch::new()
                    .with_default("colour")
                    .with_default("LEVEL")
                    .with_default("smell"),
            )
            .unwrap();

        let unknown = report.unknown.unwrap();
        assert_eq!(unknown.labels, vec!["colour", "smell"]);
        assert_eq!(unknown.accepted, vec!["LEVEL", "MASS_FLOW", "TAG"]);
        assert_eq!(report.values.len(), 1);
        assert!(report.values.contains_key("LEVEL"));
    }

    #[test]
    fn setter_failure_aborts_rest_of_batch() {
        let reg = registry();
        let tank = Tank {
            level_locked: true,
            ..Default::default()
        };

        let batch = WriteBatch::new()
            .with_default("nonsense", 1.0)
            .with_default("LEVEL", 3.0)
            .with_default("MASS_FLOW", 99.0);
        let err = reg.write(&tank, &batch).unwrap_err();

        assert_eq!(err, TestError::Locked("LEVEL"));
        assert_eq!(*tank.flow.borrow(), 0.0);
        assert_eq!(*tank.calls.borrow(), vec!["set LEVEL m".to_string()]);
    }

    #[test]
    fn unknown_writes_are_skipped_not_fatal() {
        let reg = registry();
        let tank = Tank::default();

        let batch = WriteBatch::new()
            .with("MASSFLOW", 12.0, "kg/h")
            .with_default("bogus", 1.0)
            .with_default("level", Setpoint::Empty);
        let report = reg.write(&tank, &batch).unwrap();

        assert_eq!(report.applied, vec!["MASSFLOW", "level"]);
        assert_eq!(report.unknown.unwrap().labels, vec!["bogus"]);
        assert_eq!(*tank.flow.borrow(), 12.0);
        assert_eq!(*tank.level.borrow(), None);
    }

    #[test]
    fn unregistered_kind_is_an_error_not_an_empty_value() {
        let reg: Registry<Tank, Prop, TestError> = Registry::builder("tank")
            .read_write(Prop::Level, get_level, set_level)
            .build();
        let tank = Tank::default();

        assert_eq!(reg.resolve("MASSFLOW"), None);
        let expected = TestError::Dispatch(DispatchError::NotRegistered {
            entity: "tank",
            property: "MASS_FLOW",
        });
        assert_eq!(reg.get(&tank, Prop::Flow, None).unwrap_err(), expected);
        assert_eq!(
            reg.set(&tank, Prop::Flow, Setpoint::Value(1.0), None)
                .unwrap_err(),
            expected
        );
        assert!(tank.calls.borrow().is_empty());
    }

    #[test]
    fn read_only_property_rejects_write() {
        let reg = registry();
        let tank = Tank::default();

        assert!(!reg.is_writable(Prop::Tag));
        let err = reg
            .write(&tank, &WriteBatch::new().with_default("TAG", 1.0))
            .unwrap_err();
        assert!(matches!(err, TestError::Dispatch(DispatchError::ReadOnly { .. })));
    }
}
