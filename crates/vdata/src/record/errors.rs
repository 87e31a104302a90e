use std::collections::HashMap;

use serde::ser::{Serialize, SerializeMap, Serializer};

/// Validation messages grouped by attribute.
///
/// Attributes keep the order in which they first received a message, and
/// each attribute's messages keep insertion order. Entries only go away on
/// [`clear`](ErrorBag::clear).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorBag {
    entries: Vec<(String, Vec<String>)>,
    /// Attribute -> position in `entries`.
    index: HashMap<String, usize>,
}

impl ErrorBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message, creating the attribute's entry if needed.
    pub fn add(&mut self, attribute: impl Into<String>, message: impl Into<String>) {
        let attribute = attribute.into();
        let message = message.into();
        match self.index.get(&attribute) {
            Some(&position) => self.entries[position].1.push(message),
            None => {
                self.index.insert(attribute.clone(), self.entries.len());
                self.entries.push((attribute, vec![message]));
            }
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.index.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of attributes with at least one message.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Messages for `attribute`, empty when there are none.
    pub fn get(&self, attribute: &str) -> &[String] {
        self.index
            .get(attribute)
            .map(|&position| self.entries[position].1.as_slice())
            .unwrap_or(&[])
    }

    /// First message of the first attribute that received one.
    pub fn first(&self) -> Option<&str> {
        self.entries
            .iter()
            .find_map(|(_, messages)| messages.first())
            .map(String::as_str)
    }

    /// Attributes with messages, in first-error order.
    pub fn attributes(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(name, messages)| (name.as_str(), messages.as_slice()))
    }

    /// Total number of messages across all attributes.
    pub fn message_count(&self) -> usize {
        self.entries.iter().map(|(_, messages)| messages.len()).sum()
    }
}

/// Serializes as `{"attribute": ["message", ...], ...}` in first-error order.
impl Serialize for ErrorBag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (attribute, messages) in &self.entries {
            map.serialize_entry(attribute, messages)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_messages_append_per_attribute() {
        let mut bag = ErrorBag::new();
        bag.add("title", "first");
        bag.add("title", "second");
        assert_eq!(bag.get("title"), ["first", "second"]);
        assert_eq!(bag.len(), 1);
        assert_eq!(bag.message_count(), 2);
    }

    #[test]
    fn test_missing_attribute_is_empty_slice() {
        let bag = ErrorBag::new();
        assert!(bag.get("nope").is_empty());
        assert!(bag.is_empty());
        assert_eq!(bag.first(), None);
    }

    #[test]
    fn test_first_follows_insertion_order() {
        let mut bag = ErrorBag::new();
        bag.add("zeta", "z failed");
        bag.add("alpha", "a failed");
        assert_eq!(bag.first(), Some("z failed"));
        assert_eq!(bag.attributes().collect::<Vec<_>>(), vec!["zeta", "alpha"]);
    }

    #[test]
    fn test_clear_removes_everything() {
        let mut bag = ErrorBag::new();
        bag.add("a", "x");
        bag.clear();
        assert!(bag.is_empty());
        assert!(bag.get("a").is_empty());

        bag.add("b", "y");
        assert_eq!(bag.get("b"), ["y"]);
        assert_eq!(bag.first(), Some("y"));
    }

    #[test]
    fn test_iter_pairs_attributes_with_messages() {
        let mut bag = ErrorBag::new();
        bag.add("b", "b1");
        bag.add("a", "a1");
        bag.add("b", "b2");

        let pairs: Vec<(&str, Vec<&str>)> = bag
            .iter()
            .map(|(name, messages)| (name, messages.iter().map(String::as_str).collect()))
            .collect();
        assert_eq!(pairs, vec![("b", vec!["b1", "b2"]), ("a", vec!["a1"])]);
    }

    #[test]
    fn test_many_attributes_keep_order_and_lookup() {
        let mut bag = ErrorBag::new();
        for i in 0..500 {
            bag.add(format!("field_{i}"), format!("error {i}"));
        }
        bag.add("field_250", "again");

        assert_eq!(bag.len(), 500);
        assert_eq!(bag.get("field_250"), ["error 250", "again"]);
        assert_eq!(bag.attributes().nth(499), Some("field_499"));
    }

    #[test]
    fn test_serializes_as_ordered_object() {
        let mut bag = ErrorBag::new();
        bag.add("name", "Name must not be empty");
        bag.add("age", "Age must be a number");
        bag.add("name", "Name length must not be less than 2");

        let text = serde_json::to_string(&bag).unwrap();
        assert_eq!(
            text,
            r#"{"name":["Name must not be empty","Name length must not be less than 2"],"age":["Age must be a number"]}"#
        );
        assert_eq!(
            serde_json::to_value(&bag).unwrap(),
            json!({
                "name": ["Name must not be empty", "Name length must not be less than 2"],
                "age": ["Age must be a number"],
            })
        );
    }
}
