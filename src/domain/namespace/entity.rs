//! Configuration namespace entity

use serde_json::{Map, Value};
use tracing::debug;

use super::{NamespaceError, NamespaceSource};

/// Keys starting with this prefix hold plugin-scoped data
pub const PLUGIN_PREFIX: &str = "plg_";

/// Process-wide settings as an explicit, ordered key → value mapping.
///
/// Later loads overwrite earlier keys.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigNamespace {
    values: Map<String, Value>,
}

impl ConfigNamespace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge `dict` at the top level, or store it whole under `group`
    pub fn load_dict(&mut self, dict: Map<String, Value>, group: Option<&str>) {
        match group {
            Some(group) if !group.is_empty() => {
                debug!(group, keys = dict.len(), "Loading grouped config");
                self.values.insert(group.to_string(), Value::Object(dict));
            }
            _ => {
                debug!(keys = dict.len(), "Loading config");
                self.values.extend(dict);
            }
        }
    }

    /// Merge everything `source` yields at the top level; returns the number
    /// of keys loaded
    pub fn load(&mut self, source: &dyn NamespaceSource) -> Result<usize, NamespaceError> {
        let dict = source.load()?;
        let count = dict.len();
        debug!(source = %source.describe(), keys = count, "Loaded config source");
        self.values.extend(dict);
        Ok(count)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.values.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.values.remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.values.get(key).and_then(Value::as_str)
    }

    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.values.get(key).and_then(Value::as_i64)
    }

    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.values.get(key).and_then(Value::as_f64)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.values.get(key).and_then(Value::as_bool)
    }

    /// Every plugin-scoped entry
    pub fn plugins(&self) -> Map<String, Value> {
        self.values
            .iter()
            .filter(|(key, _)| key.starts_with(PLUGIN_PREFIX))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }

    /// One plugin's sub-mapping; empty when absent or not a mapping.
    /// The prefix is optional in `plugin`.
    pub fn plugin_data(&self, plugin: &str) -> Map<String, Value> {
        let key = if plugin.starts_with(PLUGIN_PREFIX) {
            plugin.to_string()
        } else {
            format!("{}{}", PLUGIN_PREFIX, plugin)
        };

        match self.values.get(&key) {
            Some(Value::Object(map)) => map.clone(),
            _ => Map::new(),
        }
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.values
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn dict(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected an object"),
        }
    }

    struct Fixed(Value);

    impl NamespaceSource for Fixed {
        fn describe(&self) -> String {
            "fixed".to_string()
        }

        fn load(&self) -> Result<Map<String, Value>, NamespaceError> {
            Ok(dict(self.0.clone()))
        }
    }

    #[test]
    fn test_load_dict_top_level() {
        let mut namespace = ConfigNamespace::new();
        namespace.load_dict(dict(json!({"HI": "WORLD"})), None);

        assert_eq!(namespace.get_str("HI"), Some("WORLD"));
    }

    #[test]
    fn test_load_dict_grouped() {
        let mut namespace = ConfigNamespace::new();
        namespace.load_dict(dict(json!({"HI": "WORLD"})), Some("My_Dict"));

        assert!(!namespace.contains("HI"));
        assert_eq!(namespace.get("My_Dict"), Some(&json!({"HI": "WORLD"})));
    }

    #[test]
    fn test_later_loads_overwrite() {
        let mut namespace = ConfigNamespace::new();
        namespace.load_dict(dict(json!({"port": "COM1", "baud": 9600})), None);
        let loaded = namespace.load(&Fixed(json!({"port": "COM3"}))).unwrap();

        assert_eq!(loaded, 1);
        assert_eq!(namespace.get_str("port"), Some("COM3"));
        assert_eq!(namespace.get_i64("baud"), Some(9600));
    }

    #[test]
    fn test_plugins() {
        let mut namespace = ConfigNamespace::new();
        namespace.load_dict(
            dict(json!({
                "plg_dmm": {"address": "USB0::INSTR"},
                "plg_psu": "not a mapping",
                "station": "line 2"
            })),
            None,
        );

        let plugins = namespace.plugins();
        assert_eq!(plugins.len(), 2);
        assert!(!plugins.contains_key("station"));

        assert_eq!(
            namespace.plugin_data("plg_dmm").get("address"),
            Some(&json!("USB0::INSTR"))
        );
        assert_eq!(namespace.plugin_data("dmm"), namespace.plugin_data("plg_dmm"));
        assert!(namespace.plugin_data("psu").is_empty());
        assert!(namespace.plugin_data("scope").is_empty());
    }
}
