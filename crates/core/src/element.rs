//! Designer element snapshots and the mapped tree produced by inspection.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A host element as seen through the designer API, without its subtree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ElementHandle {
    pub id: String,
    #[serde(rename = "type")]
    pub element_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_content: Option<String>,
}

/// A named style and its resolved CSS properties.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct StyleSnapshot {
    pub name: String,
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
}

/// An element with its styles and mapped children.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ElementMapping {
    pub id: String,
    #[serde(rename = "type")]
    pub element_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_content: Option<String>,
    #[serde(default)]
    pub styles: Vec<StyleSnapshot>,
    #[serde(default)]
    pub children: Vec<ElementMapping>,
}

impl ElementMapping {
    /// Starts a mapping for `handle` with no styles or children yet.
    #[must_use]
    pub fn from_handle(handle: &ElementHandle) -> Self {
        Self {
            id: handle.id.clone(),
            element_type: handle.element_type.clone(),
            tag: handle.tag.clone(),
            text_content: handle.text_content.clone(),
            styles: Vec::new(),
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn handle(&self) -> ElementHandle {
        ElementHandle {
            id: self.id.clone(),
            element_type: self.element_type.clone(),
            tag: self.tag.clone(),
            text_content: self.text_content.clone(),
        }
    }

    /// Number of elements in this tree, root included.
    #[must_use]
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(Self::node_count).sum::<usize>()
    }
}
