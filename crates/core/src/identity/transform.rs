//! Canonical serialization of transform configurations.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::Error;

/// Requested transform parameters (width, format, quality, ...).
///
/// A plain key-value map. Any other `Serialize` type can be used in its place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransformConfig(BTreeMap<String, Value>);

impl TransformConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for TransformConfig {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Compact JSON with object keys sorted at every depth.
///
/// Going through `Value` re-keys every map into a `BTreeMap`, so struct field
/// order and map insertion order do not leak into the identity.
pub fn canonical_json<C: Serialize + ?Sized>(config: &C) -> Result<String, Error> {
    let value = serde_json::to_value(config)?;
    Ok(serde_json::to_string(&value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_empty_config() {
        assert_eq!(canonical_json(&TransformConfig::new()).unwrap(), "{}");
    }

    #[test]
    fn test_insertion_order_irrelevant() {
        let a = TransformConfig::new().with("w", 300).with("format", "webp");
        let b = TransformConfig::new().with("format", "webp").with("w", 300);
        assert_eq!(canonical_json(&a).unwrap(), canonical_json(&b).unwrap());
        assert_eq!(canonical_json(&a).unwrap(), r#"{"format":"webp","w":300}"#);
    }

    #[test]
    fn test_nested_keys_sorted() {
        let raw: Value = serde_json::from_str(r#"{"z":{"b":1,"a":2},"a":[{"y":1,"x":0}]}"#).unwrap();
        assert_eq!(canonical_json(&raw).unwrap(), r#"{"a":[{"x":0,"y":1}],"z":{"a":2,"b":1}}"#);
    }

    #[test]
    fn test_struct_field_order_irrelevant() {
        #[derive(Serialize)]
        struct Resize {
            width: u32,
            height: u32,
        }

        let from_struct = canonical_json(&Resize { width: 10, height: 20 }).unwrap();
        let from_map = canonical_json(&TransformConfig::new().with("height", 20).with("width", 10)).unwrap();
        assert_eq!(from_struct, from_map);
    }

    #[test]
    fn test_hashmap_is_stable() {
        let map: HashMap<String, u32> = (0..32).map(|i| (format!("k{i}"), i)).collect();
        let mut entries: Vec<_> = map.iter().map(|(k, v)| (k.clone(), *v)).collect();
        entries.reverse();
        let rebuilt: HashMap<String, u32> = entries.into_iter().collect();
        assert_eq!(canonical_json(&map).unwrap(), canonical_json(&rebuilt).unwrap());
    }

    #[test]
    fn test_non_string_keys_rejected() {
        let mut map = BTreeMap::new();
        map.insert(vec![1u8], 1);
        assert!(matches!(canonical_json(&map), Err(Error::Serialization(_))));
    }

    #[test]
    fn test_from_iter_and_get() {
        let config: TransformConfig = [("quality", 80)].into_iter().collect();
        assert_eq!(config.get("quality"), Some(&Value::from(80)));
        assert!(!config.is_empty());
    }
}
