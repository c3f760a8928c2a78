//! Inspection of the element selected in the designer.
//!
//! The host designer is reached through [`DesignerHost`]. Selection changes
//! arrive on a channel obtained from the host; dropping the receiver is the
//! unsubscribe.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use designer_ext_core::constants::{ELEMENT_MAPPING_TIMEOUT_SECS, MAX_ELEMENT_DEPTH};
use designer_ext_core::{ElementHandle, ElementMapping, StyleSnapshot};
use tokio::sync::{Mutex, mpsc};

use crate::error::ServiceError;

/// Selection events: `None` means nothing is selected.
pub type SelectionReceiver = mpsc::Receiver<Option<ElementHandle>>;

/// Element and selection APIs of the designer host.
#[async_trait]
pub trait DesignerHost: Send + Sync {
    async fn selected_element(&self) -> Result<Option<ElementHandle>, ServiceError>;

    async fn children(&self, element: &ElementHandle) -> Result<Vec<ElementHandle>, ServiceError>;

    async fn styles(&self, element: &ElementHandle) -> Result<Vec<StyleSnapshot>, ServiceError>;

    async fn subscribe_selection(&self) -> Result<SelectionReceiver, ServiceError>;
}

/// Walks an element subtree through the host.
pub struct ElementMapper {
    host: Arc<dyn DesignerHost>,
    max_depth: usize,
}

type MapFuture<'a> = Pin<Box<dyn Future<Output = Result<ElementMapping, ServiceError>> + Send + 'a>>;

impl ElementMapper {
    #[must_use]
    pub fn new(host: Arc<dyn DesignerHost>) -> Self {
        Self { host, max_depth: MAX_ELEMENT_DEPTH }
    }

    #[must_use]
    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub async fn map(&self, element: &ElementHandle) -> Result<ElementMapping, ServiceError> {
        self.map_node(element, 0).await
    }

    fn map_node<'a>(&'a self, element: &'a ElementHandle, depth: usize) -> MapFuture<'a> {
        Box::pin(async move {
            let mut mapping = ElementMapping::from_handle(element);
            mapping.styles = self.host.styles(element).await?;
            if depth >= self.max_depth {
                tracing::debug!(element_id = %element.id, depth, "max depth reached, not descending");
                return Ok(mapping);
            }
            for child in self.host.children(element).await? {
                mapping.children.push(self.map_node(&child, depth + 1).await?);
            }
            Ok(mapping)
        })
    }
}

#[derive(Debug, Default)]
struct InspectorState {
    last_seen: Option<String>,
    in_progress: bool,
    loading: bool,
    tree: Option<ElementMapping>,
}

/// Keeps the mapped tree of the current selection.
pub struct ElementInspector {
    host: Arc<dyn DesignerHost>,
    mapper: Arc<ElementMapper>,
    state: Arc<Mutex<InspectorState>>,
    timeout: Duration,
}

impl ElementInspector {
    #[must_use]
    pub fn new(host: Arc<dyn DesignerHost>) -> Self {
        let mapper = Arc::new(ElementMapper::new(Arc::clone(&host)));
        Self {
            host,
            mapper,
            state: Arc::new(Mutex::new(InspectorState::default())),
            timeout: Duration::from_secs(ELEMENT_MAPPING_TIMEOUT_SECS),
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub async fn tree(&self) -> Option<ElementMapping> {
        self.state.lock().await.tree.clone()
    }

    pub async fn is_loading(&self) -> bool {
        self.state.lock().await.loading
    }

    pub async fn last_seen_id(&self) -> Option<String> {
        self.state.lock().await.last_seen.clone()
    }

    /// Current tree as pretty JSON, for saving or copying.
    pub async fn to_json(&self) -> Result<Option<String>, ServiceError> {
        let state = self.state.lock().await;
        state.tree.as_ref().map(serde_json::to_string_pretty).transpose().map_err(Into::into)
    }

    /// Handles one selection event. Returns `false` when the event was
    /// ignored: a mapping is already running or the element was seen last.
    ///
    /// If mapping outlives the timeout, loading state is reset and the
    /// mapping keeps running; its outcome replaces the tree only if the
    /// element is still the last one seen.
    pub async fn on_selection(&self, element: Option<ElementHandle>) -> bool {
        let element = {
            let mut state = self.state.lock().await;
            if state.in_progress {
                return false;
            }
            let Some(element) = element else {
                state.last_seen = None;
                state.tree = None;
                state.loading = false;
                return true;
            };
            if state.last_seen.as_deref() == Some(element.id.as_str()) {
                return false;
            }
            state.in_progress = true;
            state.loading = true;
            state.last_seen = Some(element.id.clone());
            element
        };

        let mapper = Arc::clone(&self.mapper);
        let target = element.clone();
        let mut task = tokio::spawn(async move { mapper.map(&target).await });

        let outcome = tokio::time::timeout(self.timeout, &mut task).await;
        match outcome {
            Ok(joined) => {
                let mut state = self.state.lock().await;
                state.tree = mapped_tree(&element.id, joined);
                state.in_progress = false;
                state.loading = false;
            },
            Err(_) => {
                tracing::warn!(element_id = %element.id, "element mapping took too long, resetting state");
                {
                    let mut state = self.state.lock().await;
                    state.in_progress = false;
                    state.loading = false;
                }
                let state = Arc::clone(&self.state);
                let element_id = element.id;
                tokio::spawn(async move {
                    let joined = task.await;
                    let mut state = state.lock().await;
                    if state.last_seen.as_deref() == Some(element_id.as_str()) {
                        state.tree = mapped_tree(&element_id, joined);
                    }
                });
            },
        }
        true
    }

    /// Maps the initial selection, then follows selection changes until the
    /// host closes the stream or `shutdown` resolves. Returning drops the
    /// subscription.
    pub async fn run<F>(&self, shutdown: F)
    where
        F: Future<Output = ()> + Send,
    {
        match self.host.selected_element().await {
            Ok(element) => {
                self.on_selection(element).await;
            },
            Err(e) => {
                tracing::error!(error = %e, "error fetching initial element");
                self.state.lock().await.loading = false;
            },
        }

        let mut events = match self.host.subscribe_selection().await {
            Ok(events) => events,
            Err(e) => {
                tracing::error!(error = %e, "error subscribing to element changes");
                return;
            },
        };

        tokio::pin!(shutdown);
        let mut mapping: Pin<Box<dyn Future<Output = bool> + Send + '_>> =
            Box::pin(std::future::ready(true));
        let mut mapping_done = true;
        loop {
            tokio::select! {
                biased;
                () = &mut shutdown => break,
                _ = &mut mapping, if !mapping_done => mapping_done = true,
                event = events.recv() => match event {
                    Some(element) if mapping_done => {
                        mapping = Box::pin(self.on_selection(element));
                        mapping_done = false;
                    },
                    Some(element) => {
                        if !self.on_selection(element).await {
                            tracing::debug!("mapping in progress, selection ignored");
                        }
                    },
                    None => break,
                },
            }
        }
        // Bounded by the mapping timeout; leaves no mapping flagged in progress.
        if !mapping_done {
            mapping.await;
        }
        tracing::debug!("selection subscription closed");
    }
}

/// Tree to show for a finished mapping; failures clear it.
fn mapped_tree(
    element_id: &str,
    joined: Result<Result<ElementMapping, ServiceError>, tokio::task::JoinError>,
) -> Option<ElementMapping> {
    match joined {
        Ok(Ok(tree)) => Some(tree),
        Ok(Err(e)) => {
            tracing::error!(element_id, error = %e, "error mapping element");
            None
        },
        Err(e) => {
            tracing::error!(element_id, error = %e, "element mapping task failed");
            None
        },
    }
}

#[cfg(test)]
#[path = "element_inspector_tests.rs"]
mod tests;
