//! JSON-facing adapter over a [`VersionedStore`].
//!
//! `get` hands out `{version, document}`; `update` takes one of two payload
//! shapes:
//!
//! ```json
//! {"version": "<64 hex chars>", "document": { ... }}
//! {"actions": [{"action": "create_section", "id": "s1", "name": "S1"}]}
//! ```
//!
//! The first is a checked replace and fails on conflict. The second is a
//! batch and is retried until it lands.

use serde_json::{Map, Value};
use toolconf_actions::{parse_batch, Action};
use toolconf_types::{Document, VersionStamp};

use crate::error::{StoreError, StoreResult};
use crate::store::{Snapshot, VersionedStore};
use crate::traits::Backend;

/// A decoded `update` request.
#[derive(Clone, Debug, PartialEq)]
pub enum UpdatePayload {
    Replace {
        version: VersionStamp,
        document: Document,
    },
    Actions(Vec<Action>),
}

impl UpdatePayload {
    pub fn from_value(value: Value) -> StoreResult<Self> {
        let Value::Object(mut fields) = value else {
            return Err(StoreError::InvalidPayload(format!(
                "expected an object, got {value}"
            )));
        };

        if let Some(actions) = fields.remove("actions") {
            reject_leftovers(&fields)?;
            let Value::Array(actions) = actions else {
                return Err(StoreError::InvalidPayload(
                    "`actions` must be an array".to_string(),
                ));
            };
            return Ok(Self::Actions(parse_batch(actions)?));
        }

        match (fields.remove("version"), fields.remove("document")) {
            (Some(version), Some(document)) => {
                reject_leftovers(&fields)?;
                let version = serde_json::from_value(version)
                    .map_err(|e| StoreError::InvalidPayload(format!("version: {e}")))?;
                let document = serde_json::from_value(document)
                    .map_err(|e| StoreError::InvalidPayload(format!("document: {e}")))?;
                Ok(Self::Replace { version, document })
            }
            _ => Err(StoreError::InvalidPayload(
                "expected `{version, document}` or `{actions}`".to_string(),
            )),
        }
    }
}

fn reject_leftovers(fields: &Map<String, Value>) -> StoreResult<()> {
    match fields.keys().next() {
        Some(key) => Err(StoreError::InvalidPayload(format!("unexpected field `{key}`"))),
        None => Ok(()),
    }
}

/// Borrowing adapter that speaks JSON values to the caller.
#[derive(Debug)]
pub struct StoreView<'a, B> {
    store: &'a VersionedStore<B>,
}

impl<'a, B: Backend> StoreView<'a, B> {
    pub fn new(store: &'a VersionedStore<B>) -> Self {
        Self { store }
    }

    /// The latest snapshot.
    pub fn get(&self) -> StoreResult<Snapshot> {
        self.store.read()
    }

    /// Decode `payload` and carry it out. Returns the new version.
    pub fn update(&self, payload: Value) -> StoreResult<VersionStamp> {
        match UpdatePayload::from_value(payload)? {
            UpdatePayload::Replace { version, document } => self.store.update(&document, version),
            UpdatePayload::Actions(actions) => self.store.apply_batch(&actions),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryBackend;
    use serde_json::json;
    use toolconf_actions::ActionError;
    use toolconf_types::Item;

    fn initialized() -> VersionedStore<InMemoryBackend> {
        let store = VersionedStore::new(InMemoryBackend::new());
        store.ensure_exists().unwrap();
        store
    }

    #[test]
    fn get_serializes_version_as_hex() {
        let store = initialized();
        let snapshot = StoreView::new(&store).get().unwrap();
        let value = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(value["version"], json!(VersionStamp::of(b"{}").to_hex()));
        assert_eq!(value["document"], json!({}));
    }

    #[test]
    fn replace_payload_round_trips_through_get() {
        let store = initialized();
        let view = StoreView::new(&store);
        let snapshot = serde_json::to_value(view.get().unwrap()).unwrap();

        let stamp = view
            .update(json!({
                "version": snapshot["version"],
                "document": {"items": [{"kind": "leaf", "id": "t1"}]}
            }))
            .unwrap();

        let latest = view.get().unwrap();
        assert_eq!(latest.version, stamp);
        assert_eq!(
            latest.document,
            Document::with_items(vec![Item::new("leaf").with_attr("id", "t1")])
        );
    }

    #[test]
    fn stale_replace_payload_conflicts() {
        let store = initialized();
        let view = StoreView::new(&store);
        let stale = VersionStamp::of(b"something else").to_hex();
        let err = view
            .update(json!({"version": stale, "document": {}}))
            .unwrap_err();
        assert!(err.is_conflict());
    }

    #[test]
    fn actions_payload_runs_a_batch() {
        let store = VersionedStore::new(InMemoryBackend::new());
        let view = StoreView::new(&store);
        view.update(json!({"actions": [
            {"action": "create_group", "id": "g"},
            {"action": "add_item", "item": {"kind": "leaf"}, "target": {"group": "g"}},
        ]}))
        .unwrap();

        let document = view.get().unwrap().document;
        assert_eq!(document.find_group("g").unwrap().items.len(), 1);
    }

    #[test]
    fn malformed_actions_surface_as_action_errors() {
        let store = initialized();
        let err = StoreView::new(&store)
            .update(json!({"actions": [{"action": "rename"}]}))
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::Action(ActionError::UnknownAction(name)) if name == "rename"
        ));
    }

    #[test]
    fn unrecognized_payloads_are_rejected() {
        for payload in [
            json!([]),
            json!({}),
            json!({"version": VersionStamp::of(b"{}").to_hex()}),
            json!({"actions": {}}),
            json!({"actions": [], "force": true}),
            json!({"version": "zz", "document": {}}),
        ] {
            assert!(
                matches!(
                    UpdatePayload::from_value(payload.clone()),
                    Err(StoreError::InvalidPayload(_))
                ),
                "accepted {payload}"
            );
        }
    }
}
