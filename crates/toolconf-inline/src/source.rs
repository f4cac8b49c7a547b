//! Declarative configuration sources.
//!
//! A [`ConfSource`] is what the toolbox reads its item tree from. The
//! structured loader here accepts JSON and YAML files; sources in the older
//! markup dialect are read by a separate collaborator and are rejected with
//! [`SourceError::UnsupportedFormat`].

use std::fs;
use std::path::Path;

use toolconf_types::{Document, Item, ItemList};
use tracing::debug;

use crate::error::{SourceError, SourceResult};
use crate::inliner::inline_groups;
use crate::view::ConfItem;

/// Whether a source asks to be watched for changes when it does not say.
pub const DEFAULT_MONITOR: bool = false;

/// Interface to a parsed configuration source.
pub trait ConfSource {
    /// The flattened document, ready for the versioned store.
    fn document(&self) -> &Document;

    /// Root-level items as read-only views.
    fn items(&self) -> Vec<ConfItem<'_>> {
        self.document().item_list().iter().map(ConfItem::new).collect()
    }

    /// Directory tools in this toolbox are resolved against.
    fn tool_path(&self) -> Option<&str> {
        self.document().tool_path()
    }

    /// Whether the toolbox should reload when the source changes.
    fn monitor(&self) -> bool {
        DEFAULT_MONITOR
    }

    /// Whether this source describes tools installed from a tool shed.
    fn is_shed_conf(&self) -> bool {
        false
    }
}

/// Serialization formats understood by [`StructuredConfSource`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceFormat {
    Json,
    Yaml,
}

impl SourceFormat {
    /// Pick a format from a file extension.
    pub fn from_path(path: &Path) -> SourceResult<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default();
        match extension {
            "json" => Ok(Self::Json),
            "yml" | "yaml" => Ok(Self::Yaml),
            _ => Err(SourceError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// A JSON or YAML source, inlined once at load time.
#[derive(Clone, Debug, PartialEq)]
pub struct StructuredConfSource {
    document: Document,
}

impl StructuredConfSource {
    /// Parse `text` in the given format and inline its groups.
    pub fn parse(text: &str, format: SourceFormat) -> SourceResult<Self> {
        let mut raw: Document = match format {
            SourceFormat::Json => {
                serde_json::from_str(text).map_err(|e| SourceError::Parse(e.to_string()))?
            }
            SourceFormat::Yaml => {
                serde_yaml::from_str(text).map_err(|e| SourceError::Parse(e.to_string()))?
            }
        };
        normalize_legacy_kinds(&mut raw);
        let document = inline_groups(raw)?;
        Ok(Self { document })
    }

    /// Read and parse a source file, choosing the format by extension.
    pub fn from_path(path: &Path) -> SourceResult<Self> {
        let format = SourceFormat::from_path(path)?;
        let text = fs::read_to_string(path)?;
        debug!(path = %path.display(), ?format, "loading configuration source");
        Self::parse(&text, format)
    }

    /// Take ownership of the flattened document.
    pub fn into_document(self) -> Document {
        self.document
    }
}

impl ConfSource for StructuredConfSource {
    fn document(&self) -> &Document {
        &self.document
    }

    fn monitor(&self) -> bool {
        self.document.monitor().unwrap_or(DEFAULT_MONITOR)
    }
}

/// Open the source at `path`.
pub fn open_source(path: impl AsRef<Path>) -> SourceResult<StructuredConfSource> {
    StructuredConfSource::from_path(path.as_ref())
}

/// Older sources tag items with `type` instead of `kind`. Move the tag over
/// wherever `kind` is absent, in the tree and in every group.
fn normalize_legacy_kinds(document: &mut Document) {
    fn normalize(items: &mut [Item]) {
        for item in items {
            if item.kind.is_none() {
                if let Some(serde_json::Value::String(kind)) = item.attributes.remove("type") {
                    item.kind = Some(kind);
                }
            }
            if let Some(children) = item.items.as_deref_mut() {
                normalize(children);
            }
        }
    }

    if let Some(items) = document.items.as_deref_mut() {
        normalize(items);
    }
    if let Some(groups) = document.groups.as_deref_mut() {
        for group in groups {
            normalize(&mut group.items);
        }
    }
}
