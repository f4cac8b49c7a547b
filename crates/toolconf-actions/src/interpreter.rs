//! Applying actions to an in-memory document.

use toolconf_types::{Document, Group, Item, ItemList, Target};
use tracing::debug;

use crate::action::{Action, ActionKind};
use crate::error::{ActionError, ActionResult};

/// Apply one action to `document` in place.
///
/// Section and group creation never fail and are not idempotent: applying
/// the same `create_section` twice yields two sections.
pub fn apply_action(document: &mut Document, action: &Action) -> ActionResult<()> {
    match action {
        Action::CreateSection { id, name } => {
            document.ensure_items().push(Item::section(id.as_str(), name.as_str()));
        }
        Action::CreateGroup { id } => {
            document.ensure_groups().push(Group::new(id.as_str()));
        }
        Action::AddItem { item, target } => {
            resolve_items(document, target.as_ref())?.push(item.clone());
        }
        Action::Disable { target } => match target {
            Target::Group(id) => {
                let group = document
                    .find_group_mut(id)
                    .ok_or_else(|| ActionError::UnresolvedTarget(target.clone()))?;
                group.enabled = false;
            }
            Target::Root | Target::Section(_) => {
                return Err(ActionError::UnsupportedTarget {
                    action: ActionKind::Disable.as_str(),
                    target: target.clone(),
                });
            }
        },
    }
    debug!(action = %action.kind(), "applied action");
    Ok(())
}

/// Apply `actions` in order, stopping at the first failure.
///
/// On error the document holds the effects of every action before the
/// failing one.
pub fn apply_batch(document: &mut Document, actions: &[Action]) -> ActionResult<()> {
    actions
        .iter()
        .try_for_each(|action| apply_action(document, action))
}

/// The item list a target refers to, created empty if the container has
/// none yet. No target means the root list.
fn resolve_items<'d>(
    document: &'d mut Document,
    target: Option<&Target>,
) -> ActionResult<&'d mut Vec<Item>> {
    match target {
        None | Some(Target::Root) => Ok(document.ensure_items()),
        Some(Target::Section(id)) => document
            .find_section_mut(id)
            .map(|section| section.ensure_items())
            .ok_or_else(|| ActionError::UnresolvedTarget(Target::Section(id.clone()))),
        Some(Target::Group(id)) => document
            .find_group_mut(id)
            .map(|group| group.ensure_items())
            .ok_or_else(|| ActionError::UnresolvedTarget(Target::Group(id.clone()))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn leaf(id: &str) -> Item {
        Item::new("leaf").with_attr("id", id)
    }

    #[test]
    fn create_section_then_add_item() {
        let mut doc = Document::with_items(Vec::new());
        apply_batch(
            &mut doc,
            &[
                Action::create_section("s1", "Section One"),
                Action::add_item(leaf("t1"), Some(Target::section("s1"))),
            ],
        )
        .unwrap();

        assert_eq!(
            serde_json::to_value(&doc).unwrap(),
            json!({"items": [{
                "kind": "section",
                "id": "s1",
                "name": "Section One",
                "items": [{"kind": "leaf", "id": "t1"}]
            }]})
        );
    }

    #[test]
    fn lists_are_created_on_first_use() {
        let mut doc = Document::empty();
        apply_action(&mut doc, &Action::add_item(leaf("a"), None)).unwrap();
        apply_action(&mut doc, &Action::create_group("g")).unwrap();
        apply_action(&mut doc, &Action::add_item(leaf("b"), Some(Target::group("g")))).unwrap();

        assert_eq!(doc.item_list(), &[leaf("a")]);
        assert_eq!(doc.find_group("g").unwrap().items, vec![leaf("b")]);
    }

    #[test]
    fn explicit_root_target() {
        let mut doc = Document::empty();
        apply_action(&mut doc, &Action::add_item(leaf("a"), Some(Target::Root))).unwrap();
        assert_eq!(doc.item_list(), &[leaf("a")]);
    }

    #[test]
    fn section_creation_is_not_idempotent() {
        let mut doc = Document::empty();
        let create = Action::create_section("s", "S");
        apply_batch(&mut doc, &[create.clone(), create]).unwrap();
        assert_eq!(doc.item_list().len(), 2);
    }

    #[test]
    fn create_group_appends_empty_group() {
        let mut doc = Document::empty();
        apply_action(&mut doc, &Action::create_group("g1")).unwrap();
        assert_eq!(
            serde_json::to_value(&doc).unwrap(),
            json!({"groups": [{"id": "g1", "items": []}]})
        );
    }

    #[test]
    fn add_item_reaches_nested_sections() {
        let mut doc = Document::with_items(vec![
            Item::section("outer", "Outer").with_items(vec![Item::new("section").with_attr("id", "inner")]),
        ]);
        apply_action(&mut doc, &Action::add_item(leaf("t"), Some(Target::section("inner")))).unwrap();
        let inner = doc.find_section("inner").unwrap();
        assert_eq!(inner.item_list(), &[leaf("t")]);
    }

    #[test]
    fn unresolved_section_leaves_document_untouched() {
        let mut doc = Document::empty();
        let err = apply_action(&mut doc, &Action::add_item(leaf("t"), Some(Target::section("missing"))))
            .unwrap_err();
        assert_eq!(err, ActionError::UnresolvedTarget(Target::section("missing")));
        assert_eq!(doc, Document::empty());
    }

    #[test]
    fn unresolved_group() {
        let mut doc = Document::empty();
        let err = apply_action(&mut doc, &Action::add_item(leaf("t"), Some(Target::group("nope"))))
            .unwrap_err();
        assert_eq!(err, ActionError::UnresolvedTarget(Target::group("nope")));
    }

    #[test]
    fn disable_group() {
        let mut doc = Document::empty();
        apply_batch(
            &mut doc,
            &[Action::create_group("g"), Action::disable(Target::group("g"))],
        )
        .unwrap();
        assert!(!doc.find_group("g").unwrap().enabled);
    }

    #[test]
    fn disable_requires_group_target() {
        let mut doc = Document::with_items(vec![Item::section("s", "S")]);
        let err = apply_action(&mut doc, &Action::disable(Target::section("s"))).unwrap_err();
        assert!(matches!(err, ActionError::UnsupportedTarget { action: "disable", .. }));

        let err = apply_action(&mut doc, &Action::disable(Target::group("missing"))).unwrap_err();
        assert_eq!(err, ActionError::UnresolvedTarget(Target::group("missing")));
    }

    #[test]
    fn batch_stops_at_first_error() {
        let mut doc = Document::empty();
        let err = apply_batch(
            &mut doc,
            &[
                Action::create_section("a", "A"),
                Action::add_item(leaf("x"), Some(Target::section("missing"))),
                Action::create_section("b", "B"),
            ],
        )
        .unwrap_err();
        assert!(matches!(err, ActionError::UnresolvedTarget(_)));
        assert_eq!(doc.item_list().len(), 1);
    }
}
