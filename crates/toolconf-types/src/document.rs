use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::item::{find_by_id, Item, ItemList};

/// A named, reusable list of items declared at the top of a document.
///
/// Groups only live in declarative sources. Inlining splices their items
/// into every place they are referenced and then drops the table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: String,
    #[serde(default = "enabled_by_default", skip_serializing_if = "is_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub items: Vec<Item>,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

fn enabled_by_default() -> bool {
    true
}

fn is_enabled(enabled: &bool) -> bool {
    *enabled
}

impl Group {
    /// Create an enabled, empty group.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            enabled: true,
            items: Vec::new(),
            attributes: Map::new(),
        }
    }

    /// Builder: set the group's items.
    pub fn with_items(mut self, items: Vec<Item>) -> Self {
        self.items = items;
        self
    }

    /// Builder: mark the group disabled.
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Items this group contributes when inlined: none if disabled.
    pub fn effective_items(&self) -> &[Item] {
        if self.enabled {
            &self.items
        } else {
            &[]
        }
    }
}

impl ItemList for Group {
    fn item_list(&self) -> &[Item] {
        &self.items
    }

    fn ensure_items(&mut self) -> &mut Vec<Item> {
        &mut self.items
    }
}

/// Root of a configuration tree.
///
/// `items` and `groups` are absent until first written, so the empty
/// document serializes as `{}`. Keys this model does not interpret
/// (`tool_path`, `monitor`, ...) are preserved in `extra`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<Item>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub groups: Option<Vec<Group>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Document {
    /// The empty document, `{}`.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A document with the given root items and no group table.
    pub fn with_items(items: Vec<Item>) -> Self {
        Self {
            items: Some(items),
            ..Self::default()
        }
    }

    /// Builder: set the group table.
    pub fn with_groups(mut self, groups: Vec<Group>) -> Self {
        self.groups = Some(groups);
        self
    }

    /// The group table, or an empty slice if there is none.
    pub fn group_list(&self) -> &[Group] {
        self.groups.as_deref().unwrap_or_default()
    }

    /// The group table, created empty if absent.
    pub fn ensure_groups(&mut self) -> &mut Vec<Group> {
        self.groups.get_or_insert_with(Vec::new)
    }

    pub fn find_group(&self, id: &str) -> Option<&Group> {
        self.group_list().iter().find(|group| group.id == id)
    }

    pub fn find_group_mut(&mut self, id: &str) -> Option<&mut Group> {
        self.groups
            .as_mut()?
            .iter_mut()
            .find(|group| group.id == id)
    }

    /// Root-level item with the given id (nested sections are not searched).
    pub fn find_item(&self, id: &str) -> Option<&Item> {
        find_by_id(self.item_list(), id)
    }

    /// Depth-first, pre-order search of the whole tree for a section with
    /// the given id.
    pub fn find_section(&self, id: &str) -> Option<&Item> {
        find_section_in(self.item_list(), id)
    }

    /// Mutable variant of [`Document::find_section`].
    pub fn find_section_mut(&mut self, id: &str) -> Option<&mut Item> {
        find_section_in_mut(self.items.as_deref_mut()?, id)
    }

    /// Returns `true` if a group reference remains anywhere in the tree.
    pub fn has_group_references(&self) -> bool {
        fn any_reference(items: &[Item]) -> bool {
            items
                .iter()
                .any(|item| item.is_group_reference() || any_reference(item.item_list()))
        }
        any_reference(self.item_list())
    }

    /// The `tool_path` metadata field.
    pub fn tool_path(&self) -> Option<&str> {
        self.extra.get("tool_path").and_then(Value::as_str)
    }

    /// The `monitor` metadata field.
    pub fn monitor(&self) -> Option<bool> {
        self.extra.get("monitor").and_then(Value::as_bool)
    }
}

impl ItemList for Document {
    fn item_list(&self) -> &[Item] {
        self.items.as_deref().unwrap_or_default()
    }

    fn ensure_items(&mut self) -> &mut Vec<Item> {
        self.items.get_or_insert_with(Vec::new)
    }
}

fn find_section_in<'a>(items: &'a [Item], id: &str) -> Option<&'a Item> {
    for item in items {
        if item.is_section() && item.id() == Some(id) {
            return Some(item);
        }
        if let Some(found) = find_section_in(item.item_list(), id) {
            return Some(found);
        }
    }
    None
}

fn find_section_in_mut<'a>(items: &'a mut [Item], id: &str) -> Option<&'a mut Item> {
    for item in items.iter_mut() {
        let matches = item.is_section() && item.id() == Some(id);
        if matches {
            return Some(item);
        }
        if let Some(children) = item.items.as_deref_mut() {
            if let Some(found) = find_section_in_mut(children, id) {
                return Some(found);
            }
        }
    }
    None
}
