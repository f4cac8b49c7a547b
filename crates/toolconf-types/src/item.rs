use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Kind tag of a section item.
pub const SECTION_KIND: &str = "section";

/// Kind tag of a group reference.
pub const GROUP_REFERENCE_KIND: &str = "group-reference";

/// Group reference tag used by older configuration files.
pub const LEGACY_GROUP_KIND: &str = "group";

/// A node of the configuration tree.
///
/// The `kind` tag is free-form in raw sources (`tool`, `label`, `section`,
/// ...); [`Item::classify`] narrows it to the three shapes the rest of the
/// system cares about. All other keys are kept verbatim in `attributes`.
/// Only sections carry `items`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Item {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<Item>>,
}

/// Structural classification of an [`Item`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ItemKind<'a> {
    /// Owns an ordered list of child items.
    Section,
    /// Placeholder for the items of a named group; removed by inlining.
    GroupReference,
    /// Anything else, carrying the raw kind tag if there is one.
    Leaf(Option<&'a str>),
}

impl Item {
    /// Create an item with the given kind and no attributes.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: Some(kind.into()),
            attributes: Map::new(),
            items: None,
        }
    }

    /// Create an empty section.
    pub fn section(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(SECTION_KIND)
            .with_attr("id", id.into())
            .with_attr("name", name.into())
            .with_items(Vec::new())
    }

    /// Create a reference to the group with the given id.
    pub fn group_reference(id: impl Into<String>) -> Self {
        Self::new(GROUP_REFERENCE_KIND).with_attr("id", id.into())
    }

    /// Builder: set an attribute.
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Builder: set the child item list.
    pub fn with_items(mut self, items: Vec<Item>) -> Self {
        self.items = Some(items);
        self
    }

    pub fn classify(&self) -> ItemKind<'_> {
        match self.kind.as_deref() {
            Some(SECTION_KIND) => ItemKind::Section,
            Some(GROUP_REFERENCE_KIND) | Some(LEGACY_GROUP_KIND) => ItemKind::GroupReference,
            other => ItemKind::Leaf(other),
        }
    }

    pub fn is_section(&self) -> bool {
        self.classify() == ItemKind::Section
    }

    pub fn is_group_reference(&self) -> bool {
        self.classify() == ItemKind::GroupReference
    }

    /// The `id` attribute, if present and a string.
    pub fn id(&self) -> Option<&str> {
        self.attr_str("id")
    }

    /// The `name` attribute, if present and a string.
    pub fn name(&self) -> Option<&str> {
        self.attr_str("name")
    }

    pub fn attr(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    pub fn attr_str(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).and_then(Value::as_str)
    }
}

/// A container that owns an ordered item list which may not exist yet.
///
/// Documents, sections and groups are all written without an `items` key
/// until something is added to them; [`ItemList::ensure_items`] creates the
/// empty list on first use and mutates the container in place.
pub trait ItemList {
    /// The current items, or an empty slice if the list does not exist.
    fn item_list(&self) -> &[Item];

    /// The item list, created empty if absent.
    fn ensure_items(&mut self) -> &mut Vec<Item>;
}

impl ItemList for Item {
    fn item_list(&self) -> &[Item] {
        self.items.as_deref().unwrap_or_default()
    }

    fn ensure_items(&mut self) -> &mut Vec<Item> {
        self.items.get_or_insert_with(Vec::new)
    }
}

/// Find the first item in `items` whose `id` attribute equals `id`.
///
/// Only the given list is scanned; nested sections are not searched.
pub fn find_by_id<'a>(items: &'a [Item], id: &str) -> Option<&'a Item> {
    items.iter().find(|item| item.id() == Some(id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn classify_kinds() {
        assert_eq!(Item::new("section").classify(), ItemKind::Section);
        assert_eq!(Item::new("group-reference").classify(), ItemKind::GroupReference);
        assert_eq!(Item::new("group").classify(), ItemKind::GroupReference);
        assert_eq!(Item::new("tool").classify(), ItemKind::Leaf(Some("tool")));
        assert_eq!(Item::default().classify(), ItemKind::Leaf(None));
    }

    #[test]
    fn leaf_serializes_without_items_key() {
        let item = Item::new("leaf").with_attr("id", "t1");
        assert_eq!(serde_json::to_value(&item).unwrap(), json!({"kind": "leaf", "id": "t1"}));
    }

    #[test]
    fn section_serializes_with_children() {
        let section = Item::section("s1", "Section One");
        assert_eq!(
            serde_json::to_value(&section).unwrap(),
            json!({"kind": "section", "id": "s1", "name": "Section One", "items": []})
        );
    }

    #[test]
    fn attributes_survive_deserialization() {
        let item: Item = serde_json::from_value(json!({
            "kind": "tool",
            "id": "cat1",
            "version": "1.0",
            "labels": "new, beta",
            "enabled": true
        }))
        .unwrap();
        assert_eq!(item.kind.as_deref(), Some("tool"));
        assert_eq!(item.id(), Some("cat1"));
        assert_eq!(item.attr_str("version"), Some("1.0"));
        assert_eq!(item.attr("enabled"), Some(&json!(true)));
        assert!(item.items.is_none());
        assert!(!item.attributes.contains_key("kind"));
    }

    #[test]
    fn nested_sections_deserialize() {
        let item: Item = serde_json::from_value(json!({
            "kind": "section",
            "id": "outer",
            "items": [{"kind": "section", "id": "inner", "items": [{"kind": "leaf"}]}]
        }))
        .unwrap();
        let inner = &item.item_list()[0];
        assert!(inner.is_section());
        assert_eq!(inner.item_list().len(), 1);
    }

    #[test]
    fn ensure_items_creates_list_once() {
        let mut item = Item::new("section");
        assert!(item.items.is_none());
        item.ensure_items().push(Item::new("leaf"));
        item.ensure_items().push(Item::new("leaf"));
        assert_eq!(item.item_list().len(), 2);
    }

    #[test]
    fn find_by_id_is_single_level() {
        let items = vec![
            Item::new("leaf").with_attr("id", "a"),
            Item::section("s", "S").with_items(vec![Item::new("leaf").with_attr("id", "deep")]),
        ];
        assert!(find_by_id(&items, "a").is_some());
        assert!(find_by_id(&items, "s").is_some());
        assert!(find_by_id(&items, "deep").is_none());
    }

    #[test]
    fn find_by_id_skips_items_without_id() {
        let items = vec![
            Item::new("label"),
            Item::new("leaf").with_attr("id", "x").with_attr("touched", true),
        ];
        let found = find_by_id(&items, "x").unwrap();
        assert_eq!(found.attr("touched"), Some(&json!(true)));
    }
}
