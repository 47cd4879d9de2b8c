//! Key/value persistence contract.
//!
//! Loading never fails: a missing, unreadable or malformed entry yields the
//! caller's default. Saving is best-effort and only logs on failure.
use log::warn;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::convert::Infallible;
use std::rc::Rc;

/// Platform storage of named string slots.
/// Platform-specific implementations should provide this
pub trait KeyValueStore {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Read the raw value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be reached.
    fn read(&self, key: &str) -> Result<Option<String>, Self::Error>;

    /// Replace the raw value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be written.
    fn write(&self, key: &str, value: &str) -> Result<(), Self::Error>;
}

/// In-process store; clones share the same slots.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slots: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw slot contents, mainly for inspection in tests.
    #[must_use]
    pub fn raw(&self, key: &str) -> Option<String> {
        self.slots.borrow().get(key).cloned()
    }

    pub fn insert_raw(&self, key: &str, value: &str) {
        self.slots
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    type Error = Infallible;

    fn read(&self, key: &str) -> Result<Option<String>, Self::Error> {
        Ok(self.raw(key))
    }

    fn write(&self, key: &str, value: &str) -> Result<(), Self::Error> {
        self.insert_raw(key, value);
        Ok(())
    }
}

/// Load the value saved under `key`, or `default` when there is none.
///
/// Stored objects are repaired field by field against `default`: fields that
/// are numbers in `default` but were saved as strings are parsed (falling
/// back to the default's value when unparsable), and fields absent from the
/// stored object are taken from `default`.
pub fn load_state<S, T>(store: &S, key: &str, default: T) -> T
where
    S: KeyValueStore + ?Sized,
    T: Serialize + DeserializeOwned,
{
    let raw = match store.read(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return default,
        Err(err) => {
            warn!("Error loading state for key \"{key}\": {err}");
            return default;
        }
    };
    let mut parsed: Value = match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(err) => {
            warn!("Error parsing state for key \"{key}\": {err}");
            return default;
        }
    };
    if let Ok(template) = serde_json::to_value(&default) {
        repair_fields(&mut parsed, &template);
    }
    match serde_json::from_value(parsed) {
        Ok(value) => value,
        Err(err) => {
            warn!("Discarding malformed state for key \"{key}\": {err}");
            default
        }
    }
}

/// Serialize `value` under `key`. Failures are logged and swallowed.
pub fn save_state<S, T>(store: &S, key: &str, value: &T)
where
    S: KeyValueStore + ?Sized,
    T: Serialize + ?Sized,
{
    let serialized = match serde_json::to_string(value) {
        Ok(serialized) => serialized,
        Err(err) => {
            warn!("Error serializing state for key \"{key}\": {err}");
            return;
        }
    };
    if let Err(err) = store.write(key, &serialized) {
        warn!("Error saving state for key \"{key}\": {err}");
    }
}

fn repair_fields(parsed: &mut Value, template: &Value) {
    let (Value::Object(stored), Value::Object(defaults)) = (parsed, template) else {
        return;
    };
    for (field, default_value) in defaults {
        let Some(slot) = stored.get_mut(field) else {
            stored.insert(field.clone(), default_value.clone());
            continue;
        };
        if !default_value.is_number() {
            continue;
        }
        if let Some(text) = slot.as_str() {
            let repaired =
                coerce_number(text, default_value).unwrap_or_else(|| default_value.clone());
            *slot = repaired;
        }
    }
}

/// Parse text into a JSON number shaped like `like`; integer slots only
/// accept whole numbers.
fn coerce_number(text: &str, like: &Value) -> Option<Value> {
    let trimmed = text.trim();
    if like.is_f64() {
        let number = trimmed.parse::<f64>().ok().filter(|n| n.is_finite())?;
        serde_json::Number::from_f64(number).map(Value::Number)
    } else {
        trimmed.parse::<i64>().ok().map(Value::from)
    }
}
