use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// One value in a [`StatsRecord`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StatValue {
    Int(i64),
    Float(f64),
    Text(String),
    Bool(bool),
}

impl std::fmt::Display for StatValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Text(v) => f.write_str(v),
            Self::Bool(v) => write!(f, "{v}"),
        }
    }
}

impl From<i64> for StatValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for StatValue {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<u32> for StatValue {
    fn from(v: u32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<f64> for StatValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<bool> for StatValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<String> for StatValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<&str> for StatValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

/// Flat, ordered mapping of named outputs for one render.
///
/// Keys are camelCase (`currentDay`, `progressPercent`, ...). Insertion order
/// is preserved and is the order consumers display them in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatsRecord {
    entries: Vec<(String, StatValue)>,
}

impl StatsRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert. A repeated key replaces the earlier value in place.
    pub fn with(mut self, key: &str, value: impl Into<StatValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: &str, value: impl Into<StatValue>) {
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((key.to_string(), value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&StatValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn get_int(&self, key: &str) -> Option<i64> {
        match self.get(key)? {
            StatValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn get_float(&self, key: &str) -> Option<f64> {
        match self.get(key)? {
            StatValue::Float(v) => Some(*v),
            StatValue::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn get_text(&self, key: &str) -> Option<&str> {
        match self.get(key)? {
            StatValue::Text(v) => Some(v),
            _ => None,
        }
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        match self.get(key)? {
            StatValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &StatValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// Hand-rolled so the JSON object keeps insertion order without pulling in
// `serde_json/preserve_order`.
impl Serialize for StatsRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> StatsRecord {
        StatsRecord::new()
            .with("year", 2025)
            .with("currentDay", 60)
            .with("progress", 0.5)
            .with("progressPercent", "16.4")
            .with("isComplete", false)
    }

    #[test]
    fn typed_getters() {
        let s = sample();
        assert_eq!(s.get_int("year"), Some(2025));
        assert_eq!(s.get_text("progressPercent"), Some("16.4"));
        assert_eq!(s.get_bool("isComplete"), Some(false));
        assert_eq!(s.get_float("currentDay"), Some(60.0));
        assert_eq!(s.get_int("progressPercent"), None);
        assert!(s.get("missing").is_none());
    }

    #[test]
    fn insert_replaces_in_place() {
        let mut s = sample();
        s.insert("year", 2026);
        assert_eq!(s.len(), 5);
        assert_eq!(s.iter().next().map(|(k, _)| k), Some("year"));
        assert_eq!(s.get_int("year"), Some(2026));
    }

    #[test]
    fn serializes_as_ordered_object() {
        let json = serde_json::to_string(&sample()).unwrap_or_default();
        assert_eq!(
            json,
            r#"{"year":2025,"currentDay":60,"progress":0.5,"progressPercent":"16.4","isComplete":false}"#
        );
    }

    #[test]
    fn display_values() {
        assert_eq!(StatValue::from("16.4").to_string(), "16.4");
        assert_eq!(StatValue::from(42u32).to_string(), "42");
        assert_eq!(StatValue::from(true).to_string(), "true");
    }
}
