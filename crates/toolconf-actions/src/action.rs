//! The action vocabulary and its wire format.
//!
//! On the wire an action is an object whose `action` field names the kind
//! and whose remaining fields are its parameters:
//!
//! ```text
//! {"action": "create_section", "id": "text", "name": "Text Tools"}
//! {"action": "create_group", "id": "common"}
//! {"action": "add_item", "item": {...}, "target": {"section": "text"}}
//! {"action": "disable", "target": {"group": "common"}}
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use toolconf_types::{Item, Target};

use crate::error::{ActionError, ActionResult};

/// A single structural edit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case", try_from = "Value")]
pub enum Action {
    /// Append an empty section to the root item list.
    CreateSection { id: String, name: String },
    /// Append an empty, enabled group to the group table.
    CreateGroup { id: String },
    /// Append `item` to the target list (root when no target is given).
    AddItem {
        item: Item,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        target: Option<Target>,
    },
    /// Set `enabled = false` on a group.
    Disable { target: Target },
}

/// The closed set of action names.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ActionKind {
    CreateSection,
    CreateGroup,
    AddItem,
    Disable,
}

impl ActionKind {
    pub const ALL: [ActionKind; 4] = [
        ActionKind::CreateSection,
        ActionKind::CreateGroup,
        ActionKind::AddItem,
        ActionKind::Disable,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CreateSection => "create_section",
            Self::CreateGroup => "create_group",
            Self::AddItem => "add_item",
            Self::Disable => "disable",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == name)
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Action {
    pub fn create_section(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self::CreateSection {
            id: id.into(),
            name: name.into(),
        }
    }

    pub fn create_group(id: impl Into<String>) -> Self {
        Self::CreateGroup { id: id.into() }
    }

    pub fn add_item(item: Item, target: Option<Target>) -> Self {
        Self::AddItem { item, target }
    }

    pub fn disable(target: Target) -> Self {
        Self::Disable { target }
    }

    pub fn kind(&self) -> ActionKind {
        match self {
            Self::CreateSection { .. } => ActionKind::CreateSection,
            Self::CreateGroup { .. } => ActionKind::CreateGroup,
            Self::AddItem { .. } => ActionKind::AddItem,
            Self::Disable { .. } => ActionKind::Disable,
        }
    }
}

impl TryFrom<Value> for Action {
    type Error = ActionError;

    fn try_from(value: Value) -> ActionResult<Self> {
        let mut fields = match value {
            Value::Object(fields) => fields,
            other => return Err(ActionError::NotAnObject(other.to_string())),
        };
        let name = match fields.remove("action") {
            Some(Value::String(name)) => name,
            Some(other) => return Err(ActionError::UnknownAction(other.to_string())),
            None => return Err(ActionError::MissingAction),
        };
        let kind = ActionKind::from_name(&name).ok_or(ActionError::UnknownAction(name))?;
        let mut params = Params { kind, fields };

        let action = match kind {
            ActionKind::CreateSection => Action::CreateSection {
                id: params.required_string("id")?,
                name: params.required_string("name")?,
            },
            ActionKind::CreateGroup => Action::CreateGroup {
                id: params.required_string("id")?,
            },
            ActionKind::AddItem => {
                let item = params.required("item")?;
                let item = serde_json::from_value(item).map_err(|e| ActionError::InvalidField {
                    action: kind.as_str(),
                    field: "item",
                    reason: e.to_string(),
                })?;
                let target = params.optional("target").map(parse_target).transpose()?;
                Action::AddItem { item, target }
            }
            ActionKind::Disable => Action::Disable {
                target: parse_target(params.required("target")?)?,
            },
        };
        params.finish()?;
        Ok(action)
    }
}

/// Parse every action of a batch, failing on the first invalid one.
pub fn parse_batch(values: Vec<Value>) -> ActionResult<Vec<Action>> {
    values.into_iter().map(Action::try_from).collect()
}

/// Parse a target locator: `"root"`, `{"group": id}` or `{"section": id}`.
///
/// When an object carries both keys the group wins.
pub fn parse_target(value: Value) -> ActionResult<Target> {
    match &value {
        Value::String(s) if s == "root" => return Ok(Target::Root),
        Value::Object(locator) => {
            if let Some(Value::String(id)) = locator.get("group") {
                return Ok(Target::Group(id.clone()));
            }
            if let Some(Value::String(id)) = locator.get("section") {
                return Ok(Target::Section(id.clone()));
            }
        }
        _ => {}
    }
    Err(ActionError::InvalidTarget(value.to_string()))
}

struct Params {
    kind: ActionKind,
    fields: Map<String, Value>,
}

impl Params {
    fn optional(&mut self, field: &'static str) -> Option<Value> {
        self.fields.remove(field).filter(|value| !value.is_null())
    }

    fn required(&mut self, field: &'static str) -> ActionResult<Value> {
        self.optional(field).ok_or(ActionError::MissingField {
            action: self.kind.as_str(),
            field,
        })
    }

    fn required_string(&mut self, field: &'static str) -> ActionResult<String> {
        match self.required(field)? {
            Value::String(s) => Ok(s),
            other => Err(ActionError::InvalidField {
                action: self.kind.as_str(),
                field,
                reason: format!("expected a string, got {other}"),
            }),
        }
    }

    fn finish(self) -> ActionResult<()> {
        match self.fields.into_iter().next() {
            Some((field, _)) => Err(ActionError::UnexpectedField {
                action: self.kind.as_str(),
                field,
            }),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: Value) -> ActionResult<Action> {
        Action::try_from(value)
    }

    #[test]
    fn parses_each_action() {
        assert_eq!(
            parse(json!({"action": "create_section", "id": "s1", "name": "One"})).unwrap(),
            Action::create_section("s1", "One")
        );
        assert_eq!(
            parse(json!({"action": "create_group", "id": "g1"})).unwrap(),
            Action::create_group("g1")
        );
        assert_eq!(
            parse(json!({"action": "add_item", "item": {"kind": "leaf", "id": "t1"}, "target": {"section": "s1"}}))
                .unwrap(),
            Action::add_item(Item::new("leaf").with_attr("id", "t1"), Some(Target::section("s1")))
        );
        assert_eq!(
            parse(json!({"action": "disable", "target": {"group": "g1"}})).unwrap(),
            Action::disable(Target::group("g1"))
        );
    }

    #[test]
    fn add_item_target_is_optional() {
        let action = parse(json!({"action": "add_item", "item": {"kind": "leaf"}})).unwrap();
        assert_eq!(action, Action::add_item(Item::new("leaf"), None));

        let action = parse(json!({"action": "add_item", "item": {"kind": "leaf"}, "target": null})).unwrap();
        assert_eq!(action, Action::add_item(Item::new("leaf"), None));
    }

    #[test]
    fn unknown_action_is_rejected() {
        assert_eq!(
            parse(json!({"action": "delete_everything"})),
            Err(ActionError::UnknownAction("delete_everything".into()))
        );
        assert_eq!(parse(json!({"id": "x"})), Err(ActionError::MissingAction));
        assert!(matches!(parse(json!([1, 2])), Err(ActionError::NotAnObject(_))));
    }

    #[test]
    fn missing_fields_are_reported() {
        assert_eq!(
            parse(json!({"action": "create_section", "id": "s1"})),
            Err(ActionError::MissingField {
                action: "create_section",
                field: "name"
            })
        );
        assert_eq!(
            parse(json!({"action": "disable"})),
            Err(ActionError::MissingField {
                action: "disable",
                field: "target"
            })
        );
    }

    #[test]
    fn wrongly_typed_and_extra_fields_are_rejected() {
        assert!(matches!(
            parse(json!({"action": "create_group", "id": 7})),
            Err(ActionError::InvalidField { field: "id", .. })
        ));
        assert_eq!(
            parse(json!({"action": "create_group", "id": "g", "color": "red"})),
            Err(ActionError::UnexpectedField {
                action: "create_group",
                field: "color".into()
            })
        );
    }

    #[test]
    fn target_shapes() {
        assert_eq!(parse_target(json!("root")).unwrap(), Target::Root);
        assert_eq!(parse_target(json!({"section": "s"})).unwrap(), Target::section("s"));
        assert_eq!(
            parse_target(json!({"group": "g", "section": "s"})).unwrap(),
            Target::group("g")
        );
        assert!(matches!(
            parse_target(json!({"tool": "x"})),
            Err(ActionError::InvalidTarget(_))
        ));
    }

    #[test]
    fn batch_stops_at_first_invalid_action() {
        let err = parse_batch(vec![
            json!({"action": "create_group", "id": "g"}),
            json!({"action": "explode"}),
        ])
        .unwrap_err();
        assert_eq!(err, ActionError::UnknownAction("explode".into()));
    }

    #[test]
    fn serde_round_trip_uses_action_tag() {
        let action = Action::add_item(Item::new("leaf"), Some(Target::group("g")));
        let wire = serde_json::to_value(&action).unwrap();
        assert_eq!(
            wire,
            json!({"action": "add_item", "item": {"kind": "leaf"}, "target": {"group": "g"}})
        );
        let back: Action = serde_json::from_value(wire).unwrap();
        assert_eq!(back, action);
    }

    #[test]
    fn kind_names() {
        for kind in ActionKind::ALL {
            assert_eq!(ActionKind::from_name(kind.as_str()), Some(kind));
        }
        assert_eq!(Action::create_group("g").kind(), ActionKind::CreateGroup);
    }
}
