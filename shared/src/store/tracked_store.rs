use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::store::{error::StoreError, schema::Schema, tracked::Tracked};

/// A change-set keyed by property name. Dirty nested stores are represented
/// by their own `Diff`.
pub type Diff = Map<String, Value>;

static NULL: Value = Value::Null;

#[derive(Clone, Debug, PartialEq)]
pub enum Property {
    Value(Value),
    Store(TrackedStore),
}

/// Key/value store that remembers, per cycle, which keys were written and
/// what they held before the first write.
///
/// A restricted store only accepts the names its `Schema` declared; an
/// unrestricted store accepts any name and reads absent names as `null`.
#[derive(Clone, Debug, PartialEq)]
pub struct TrackedStore {
    // declaration / insertion order
    names: Vec<String>,
    data: HashMap<String, Property>,
    // changed property -> value before the first write of this cycle
    changes: HashMap<String, Value>,
    restricted: bool,
}

impl TrackedStore {
    pub fn new(schema: Schema) -> Self {
        let mut names = Vec::with_capacity(schema.len());
        let mut data = HashMap::with_capacity(schema.len());
        for (name, property) in schema.into_entries() {
            if data.insert(name.clone(), property).is_none() {
                names.push(name);
            }
        }

        Self {
            names,
            data,
            changes: HashMap::new(),
            restricted: true,
        }
    }

    /// A store that accepts any property name
    pub fn unrestricted() -> Self {
        Self {
            names: Vec::new(),
            data: HashMap::new(),
            changes: HashMap::new(),
            restricted: false,
        }
    }

    pub fn is_restricted(&self) -> bool {
        self.restricted
    }

    /// Whether `name` may be read or written
    pub fn has(&self, name: &str) -> bool {
        !self.restricted || self.data.contains_key(name)
    }

    /// Whether `name` currently holds something (declared, or written at least once)
    pub fn contains(&self, name: &str) -> bool {
        self.data.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn get(&self, name: &str) -> Result<&Value, StoreError> {
        self.assert_valid_property(name)?;

        match self.data.get(name) {
            Some(Property::Value(value)) => Ok(value),
            Some(Property::Store(_)) => Err(StoreError::NotAValue {
                name: name.to_string(),
            }),
            None => Ok(&NULL),
        }
    }

    pub fn get_bool(&self, name: &str) -> Result<bool, StoreError> {
        self.get(name)?
            .as_bool()
            .ok_or_else(|| unexpected_type(name, "bool"))
    }

    pub fn get_f64(&self, name: &str) -> Result<f64, StoreError> {
        self.get(name)?
            .as_f64()
            .ok_or_else(|| unexpected_type(name, "number"))
    }

    pub fn get_u32(&self, name: &str) -> Result<u32, StoreError> {
        self.get(name)?
            .as_u64()
            .and_then(|value| u32::try_from(value).ok())
            .ok_or_else(|| unexpected_type(name, "u32"))
    }

    pub fn get_usize(&self, name: &str) -> Result<usize, StoreError> {
        self.get(name)?
            .as_u64()
            .and_then(|value| usize::try_from(value).ok())
            .ok_or_else(|| unexpected_type(name, "usize"))
    }

    pub fn get_str(&self, name: &str) -> Result<&str, StoreError> {
        self.get(name)?
            .as_str()
            .ok_or_else(|| unexpected_type(name, "string"))
    }

    /// Read a value through its serde representation
    pub fn get_as<T: DeserializeOwned>(&self, name: &str) -> Result<T, StoreError> {
        serde_json::from_value(self.get(name)?.clone())
            .map_err(|_| unexpected_type(name, std::any::type_name::<T>()))
    }

    pub fn get_store(&self, name: &str) -> Result<&TrackedStore, StoreError> {
        self.assert_valid_property(name)?;

        match self.data.get(name) {
            Some(Property::Store(store)) => Ok(store),
            _ => Err(StoreError::NotAStore {
                name: name.to_string(),
            }),
        }
    }

    pub fn get_store_mut(&mut self, name: &str) -> Result<&mut TrackedStore, StoreError> {
        self.assert_valid_property(name)?;

        match self.data.get_mut(name) {
            Some(Property::Store(store)) => Ok(store),
            _ => Err(StoreError::NotAStore {
                name: name.to_string(),
            }),
        }
    }

    /// Every nested store held by this store
    pub fn stores_mut(&mut self) -> impl Iterator<Item = &mut TrackedStore> {
        self.data.values_mut().filter_map(|property| match property {
            Property::Store(store) => Some(store),
            Property::Value(_) => None,
        })
    }

    /// Assign a leaf value. Every call marks `name` as changed, even when the
    /// value is equal to the current one; only the first call in a cycle
    /// records the old value.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<(), StoreError> {
        self.assert_valid_property(name)?;
        let value = value.into();

        match self.data.get_mut(name) {
            Some(Property::Store(_)) => {
                return Err(StoreError::NotAValue {
                    name: name.to_string(),
                });
            }
            Some(Property::Value(current)) => {
                let old_value = std::mem::replace(current, value);
                if !self.changes.contains_key(name) {
                    self.changes.insert(name.to_string(), old_value);
                }
            }
            None => {
                self.names.push(name.to_string());
                self.data
                    .insert(name.to_string(), Property::Value(value));
                if !self.changes.contains_key(name) {
                    self.changes.insert(name.to_string(), Value::Null);
                }
            }
        }

        Ok(())
    }

    /// Whether `name` itself was written (or, for a nested store, has changes)
    /// since the last clear
    pub fn is_changed(&self, name: &str) -> bool {
        if self.changes.contains_key(name) {
            return true;
        }
        matches!(self.data.get(name), Some(Property::Store(store)) if store.has_changes())
    }

    /// Names of every changed property in declaration order
    pub fn changed_property_names(&self) -> Vec<&str> {
        self.names
            .iter()
            .filter(|name| self.is_changed(name))
            .map(String::as_str)
            .collect()
    }

    /// Apply a diff leaf by leaf. Object values descend into nested stores;
    /// everything else goes through `set`, so merged values are tracked like
    /// local writes.
    pub fn merge(&mut self, diff: &Diff) -> Result<(), StoreError> {
        for (name, value) in diff {
            if let (Some(Property::Store(store)), Value::Object(nested)) =
                (self.data.get_mut(name.as_str()), value)
            {
                store.merge(nested)?;
                continue;
            }
            self.set(name, value.clone())?;
        }
        Ok(())
    }

    /// Snapshot of every current value, nested stores included
    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        for name in &self.names {
            match self.data.get(name) {
                Some(Property::Value(value)) => {
                    map.insert(name.clone(), value.clone());
                }
                Some(Property::Store(store)) => {
                    map.insert(name.clone(), store.to_value());
                }
                None => {}
            }
        }
        Value::Object(map)
    }

    fn assert_valid_property(&self, name: &str) -> Result<(), StoreError> {
        if self.has(name) {
            Ok(())
        } else {
            Err(StoreError::InvalidProperty {
                name: name.to_string(),
            })
        }
    }

    fn collect_changes(&self, old_values: bool) -> Diff {
        let mut diff = Diff::new();
        for name in &self.names {
            match self.data.get(name) {
                Some(Property::Value(current)) => {
                    if let Some(old) = self.changes.get(name) {
                        let value = if old_values { old } else { current };
                        diff.insert(name.clone(), value.clone());
                    }
                }
                Some(Property::Store(store)) if store.has_changes() => {
                    let nested = if old_values {
                        store.changed_old_values()
                    } else {
                        store.changed_current_values()
                    };
                    diff.insert(name.clone(), Value::Object(nested));
                }
                _ => {}
            }
        }
        diff
    }
}

impl Tracked for TrackedStore {
    fn has_changes(&self) -> bool {
        !self.changes.is_empty()
            || self.data.values().any(|property| match property {
                Property::Store(store) => store.has_changes(),
                Property::Value(_) => false,
            })
    }

    fn changed_current_values(&self) -> Diff {
        self.collect_changes(false)
    }

    fn changed_old_values(&self) -> Diff {
        self.collect_changes(true)
    }

    fn clear_changes(&mut self) {
        self.changes.clear();
        for store in self.stores_mut() {
            store.clear_changes();
        }
    }
}

fn unexpected_type(name: &str, expected: &'static str) -> StoreError {
    StoreError::UnexpectedType {
        name: name.to_string(),
        expected,
    }
}
