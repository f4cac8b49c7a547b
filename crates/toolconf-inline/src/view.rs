use serde_json::Value;
use toolconf_types::{Item, ItemList};

/// Read-only view of an item as the toolbox consumes it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConfItem<'a> {
    item: &'a Item,
}

impl<'a> ConfItem<'a> {
    pub fn new(item: &'a Item) -> Self {
        Self { item }
    }

    pub fn kind(&self) -> Option<&'a str> {
        self.item.kind.as_deref()
    }

    pub fn get(&self, key: &str) -> Option<&'a Value> {
        self.item.attributes.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&'a str> {
        self.get(key).and_then(Value::as_str)
    }

    /// The comma-separated `labels` attribute, split and trimmed.
    pub fn labels(&self) -> Option<Vec<String>> {
        let labels = self.get_str("labels")?;
        Some(labels.split(',').map(|label| label.trim().to_string()).collect())
    }

    /// Child views, for sections only.
    pub fn children(&self) -> Option<Vec<ConfItem<'a>>> {
        if !self.item.is_section() {
            return None;
        }
        Some(self.item.item_list().iter().map(ConfItem::new).collect())
    }
}
