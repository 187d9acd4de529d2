//! Projection helper over lists of opaque server records.

use serde_json::Value;

/// A list of opaque records (tools, resources) with name-based filters.
///
/// `only` and `except` match each item's `name` field against the given
/// keys; items without a `name` never match.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Collection {
    items: Vec<Value>,
}

impl Collection {
    /// Wrap a list of records.
    pub fn new(items: Vec<Value>) -> Self {
        Self { items }
    }

    /// The underlying records.
    pub fn all(&self) -> &[Value] {
        &self.items
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate over the records.
    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.items.iter()
    }

    /// Keep only the records whose `name` is in `names`.
    ///
    /// An empty key set yields an empty collection.
    pub fn only<S: AsRef<str>>(&self, names: &[S]) -> Self {
        Self {
            items: self
                .items
                .iter()
                .filter(|item| Self::name_in(item, names))
                .cloned()
                .collect(),
        }
    }

    /// Drop the records whose `name` is in `names`.
    ///
    /// An empty key set yields the whole collection.
    pub fn except<S: AsRef<str>>(&self, names: &[S]) -> Self {
        Self {
            items: self
                .items
                .iter()
                .filter(|item| !Self::name_in(item, names))
                .cloned()
                .collect(),
        }
    }

    /// Transform every record.
    pub fn map<F: FnMut(&Value) -> Value>(&self, f: F) -> Self {
        Self {
            items: self.items.iter().map(f).collect(),
        }
    }

    fn name_in<S: AsRef<str>>(item: &Value, names: &[S]) -> bool {
        item.get("name")
            .and_then(Value::as_str)
            .is_some_and(|name| names.iter().any(|n| n.as_ref() == name))
    }
}

impl IntoIterator for Collection {
    type Item = Value;
    type IntoIter = std::vec::IntoIter<Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl From<Vec<Value>> for Collection {
    fn from(items: Vec<Value>) -> Self {
        Self::new(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn tools() -> Collection {
        Collection::new(vec![
            json!({"name": "echo", "description": "echoes"}),
            json!({"name": "add", "description": "adds"}),
            json!({"description": "anonymous"}),
        ])
    }

    #[test]
    fn only_matches_on_name() {
        let filtered = tools().only(&["echo"]);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered.all()[0]["name"], "echo");
    }

    #[test]
    fn only_with_no_keys_is_empty() {
        let filtered = tools().only::<&str>(&[]);
        assert!(filtered.is_empty());
    }

    #[test]
    fn except_drops_named_items() {
        let filtered = tools().except(&["echo"]);
        assert_eq!(filtered.len(), 2);
        assert!(filtered.iter().all(|item| item["name"] != "echo"));
    }

    #[test]
    fn except_with_no_keys_is_identity() {
        let all = tools();
        assert_eq!(all.except::<&str>(&[]), all);
    }

    #[test]
    fn nameless_items_never_match() {
        let filtered = tools().only(&["anonymous"]);
        assert!(filtered.is_empty());
    }

    #[test]
    fn map_transforms_every_item() {
        let names = tools().map(|item| item["name"].clone());
        assert_eq!(
            names.all(),
            &[json!("echo"), json!("add"), json!(null)]
        );
    }
}
