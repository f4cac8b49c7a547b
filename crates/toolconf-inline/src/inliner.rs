//! Group reference inlining.
//!
//! [`inline_groups`] consumes a raw document and returns the flattened one.
//! Each item list is rebuilt front to back: group references are replaced
//! by the referenced group's effective items, any other item that owns a
//! child list has that list rebuilt recursively, everything else is
//! carried over in place. Every reference
//! receives its own copy of the group's items.

use std::collections::HashMap;

use toolconf_types::{Document, Group, Item};
use tracing::debug;

use crate::error::{InlineError, InlineResult};

/// Replace every group reference in `document` with the items of the group
/// it names and drop the group table.
///
/// Disabled groups resolve but contribute nothing. Group items are expanded
/// too, so a group may reference other groups and contain sections; a cycle
/// of references is an error. When two groups share an id the later
/// declaration wins.
pub fn inline_groups(mut document: Document) -> InlineResult<Document> {
    let groups = document.groups.take().unwrap_or_default();
    let table = GroupTable::new(&groups);
    if let Some(items) = document.items.take() {
        let mut expanding = Vec::new();
        document.items = Some(table.expand(items, &mut expanding)?);
    }
    Ok(document)
}

struct GroupTable<'a> {
    groups: HashMap<&'a str, &'a Group>,
}

impl<'a> GroupTable<'a> {
    fn new(groups: &'a [Group]) -> Self {
        let groups = groups
            .iter()
            .map(|group| (group.id.as_str(), group))
            .collect();
        Self { groups }
    }

    /// Rebuild `items` with all references resolved. `expanding` holds the
    /// ids of the groups currently being spliced, outermost first.
    fn expand(&self, items: Vec<Item>, expanding: &mut Vec<String>) -> InlineResult<Vec<Item>> {
        let mut rebuilt = Vec::with_capacity(items.len());
        for mut item in items {
            if item.is_group_reference() {
                let id = item.id().ok_or(InlineError::MissingReferenceId)?;
                let group = self
                    .groups
                    .get(id)
                    .ok_or_else(|| InlineError::UnknownGroup(id.to_string()))?;
                if expanding.iter().any(|open| open == id) {
                    return Err(InlineError::CyclicGroup(id.to_string()));
                }

                expanding.push(id.to_string());
                let spliced = self.expand(group.effective_items().to_vec(), expanding)?;
                expanding.pop();

                debug!(group = %group.id, items = spliced.len(), "inlined group reference");
                rebuilt.extend(spliced);
            } else {
                if let Some(children) = item.items.take() {
                    item.items = Some(self.expand(children, expanding)?);
                }
                rebuilt.push(item);
            }
        }
        Ok(rebuilt)
    }
}
