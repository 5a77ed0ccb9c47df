//! Case-insensitive, order-preserving multi-value header map.

use serde::ser::{Serialize, SerializeMap, Serializer};

/// `Content-Length` header name.
pub const CONTENT_LENGTH: &str = "Content-Length";

/// `Transfer-Encoding` header name.
pub const TRANSFER_ENCODING: &str = "Transfer-Encoding";

/// Header map keyed by name, each name holding a list of values.
///
/// Names compare case-insensitively; the first spelling seen is kept.
/// Names iterate in the order they were first appended.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Vec<(String, Vec<String>)>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value, keeping any existing values for the same name.
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.position(&name) {
            Some(i) => self.entries[i].1.push(value),
            None => self.entries.push((name, vec![value])),
        }
    }

    /// Replace all values for `name` with a single value.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.position(&name) {
            Some(i) => self.entries[i].1 = vec![value],
            None => self.entries.push((name, vec![value])),
        }
    }

    /// First value for `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.get_all(name).first().map(String::as_str)
    }

    /// All values for `name`, in the order they were appended.
    pub fn get_all(&self, name: &str) -> &[String] {
        match self.position(name) {
            Some(i) => &self.entries[i].1,
            None => &[],
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Remove `name` and return its values.
    pub fn remove(&mut self, name: &str) -> Vec<String> {
        match self.position(name) {
            Some(i) => self.entries.remove(i).1,
            None => Vec::new(),
        }
    }

    /// Iterate `(name, values)` in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }

    /// Iterate every `(name, value)` pair, flattening multi-value entries.
    pub fn flatten(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .flat_map(|(name, values)| values.iter().map(move |v| (name.as_str(), v.as_str())))
    }

    /// Number of distinct header names.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|(k, _)| k.eq_ignore_ascii_case(name))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Headers {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut headers = Headers::new();
        for (k, v) in iter {
            headers.append(k, v);
        }
        headers
    }
}

impl Serialize for Headers {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, values) in &self.entries {
            map.serialize_entry(name, values)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_case_insensitive() {
        let mut headers = Headers::new();
        headers.append("Accept", "text/plain");
        headers.append("accept", "application/json");

        assert_eq!(headers.len(), 1);
        assert_eq!(headers.get("ACCEPT"), Some("text/plain"));
        assert_eq!(headers.get_all("Accept"), ["text/plain", "application/json"]);
    }

    #[test]
    fn insertion_order_is_preserved() {
        let headers: Headers = [("X-B", "1"), ("X-A", "2"), ("x-b", "3")].into_iter().collect();
        let flat: Vec<_> = headers.flatten().collect();
        assert_eq!(flat, vec![("X-B", "1"), ("X-B", "3"), ("X-A", "2")]);
    }

    #[test]
    fn set_and_remove() {
        let mut headers = Headers::new();
        headers.append(CONTENT_LENGTH, "1");
        headers.append(CONTENT_LENGTH, "2");
        headers.set("content-length", "3");
        assert_eq!(headers.get_all(CONTENT_LENGTH), ["3"]);

        assert_eq!(headers.remove("CONTENT-LENGTH"), vec!["3".to_string()]);
        assert!(!headers.contains(CONTENT_LENGTH));
        assert!(headers.is_empty());
    }
}
