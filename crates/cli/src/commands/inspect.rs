use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use designer_ext_core::{ElementHandle, ElementMapping, StyleSnapshot};
use designer_ext_service::{DesignerHost, ElementInspector, SelectionReceiver, ServiceError};
use tokio::sync::mpsc;

/// Designer host backed by a saved element tree.
///
/// The selection is fixed; the selection stream closes right away.
struct SnapshotHost {
    selected: ElementHandle,
    nodes: HashMap<String, (Vec<ElementHandle>, Vec<StyleSnapshot>)>,
}

impl SnapshotHost {
    fn new(root: &ElementMapping, select: Option<&str>) -> Result<Self> {
        let mut nodes = HashMap::new();
        index(root, &mut nodes);
        let selected = match select {
            Some(id) => find(root, id).with_context(|| format!("element {id} not in snapshot"))?,
            None => root,
        };
        Ok(Self { selected: selected.handle(), nodes })
    }
}

fn index(node: &ElementMapping, nodes: &mut HashMap<String, (Vec<ElementHandle>, Vec<StyleSnapshot>)>) {
    let children = node.children.iter().map(ElementMapping::handle).collect();
    nodes.insert(node.id.clone(), (children, node.styles.clone()));
    for child in &node.children {
        index(child, nodes);
    }
}

fn find<'a>(node: &'a ElementMapping, id: &str) -> Option<&'a ElementMapping> {
    if node.id == id {
        return Some(node);
    }
    node.children.iter().find_map(|c| find(c, id))
}

#[async_trait]
impl DesignerHost for SnapshotHost {
    async fn selected_element(&self) -> Result<Option<ElementHandle>, ServiceError> {
        Ok(Some(self.selected.clone()))
    }

    async fn children(&self, element: &ElementHandle) -> Result<Vec<ElementHandle>, ServiceError> {
        self.nodes
            .get(&element.id)
            .map(|(children, _)| children.clone())
            .ok_or_else(|| ServiceError::Host(format!("unknown element {}", element.id)))
    }

    async fn styles(&self, element: &ElementHandle) -> Result<Vec<StyleSnapshot>, ServiceError> {
        self.nodes
            .get(&element.id)
            .map(|(_, styles)| styles.clone())
            .ok_or_else(|| ServiceError::Host(format!("unknown element {}", element.id)))
    }

    async fn subscribe_selection(&self) -> Result<SelectionReceiver, ServiceError> {
        let (_tx, rx) = mpsc::channel(1);
        Ok(rx)
    }
}

pub(crate) async fn run_inspect(snapshot: &Path, element: Option<&str>) -> Result<()> {
    let raw = std::fs::read_to_string(snapshot)
        .with_context(|| format!("failed to read {}", snapshot.display()))?;
    let root: ElementMapping = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not an element snapshot", snapshot.display()))?;

    let host = Arc::new(SnapshotHost::new(&root, element)?);
    let inspector = ElementInspector::new(host);
    inspector.run(std::future::pending()).await;

    let json = inspector.to_json().await?.context("element could not be mapped")?;
    println!("{json}");
    Ok(())
}
