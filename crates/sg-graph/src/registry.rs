//! Multi-graph registry.
//!
//! Each graph sits behind its own `RwLock`, so mutations are serialized per
//! graph while readers of other graphs proceed. The registry list has its own
//! lock, held only long enough to add, drop or copy out handles.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use sg_core::GraphId;

use crate::error::{GraphError, GraphResult};
use crate::graph::Graph;

/// Shared handle to a registered graph.
#[derive(Debug, Clone)]
pub struct GraphHandle {
    id: GraphId,
    inner: Arc<RwLock<Graph>>,
}

impl GraphHandle {
    fn new(graph: Graph) -> Self {
        Self {
            id: graph.id().to_string(),
            inner: Arc::new(RwLock::new(graph)),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Shared access. Fails if a writer panicked mid-mutation.
    pub fn read(&self) -> GraphResult<RwLockReadGuard<'_, Graph>> {
        self.inner.read().map_err(|_| GraphError::Poisoned {
            graph_id: self.id.clone(),
        })
    }

    /// Exclusive access for mutation.
    pub fn write(&self) -> GraphResult<RwLockWriteGuard<'_, Graph>> {
        self.inner.write().map_err(|_| GraphError::Poisoned {
            graph_id: self.id.clone(),
        })
    }
}

/// Owns zero or more named graphs, kept in registration order.
///
/// No process-wide instance exists: callers create one and pass it to the
/// importer and the exporter.
#[derive(Debug, Default)]
pub struct GraphRegistry {
    entries: RwLock<Vec<GraphHandle>>,
}

impl GraphRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    // The entry list is only ever pushed to or removed from whole, so a
    // poisoned lock still guards a consistent list.
    fn entries(&self) -> RwLockReadGuard<'_, Vec<GraphHandle>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn entries_mut(&self) -> RwLockWriteGuard<'_, Vec<GraphHandle>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Create and register an empty graph.
    pub fn create(&self, graph_id: &str) -> GraphResult<GraphHandle> {
        self.register(Graph::new(graph_id))
    }

    /// Register a graph built elsewhere (e.g. by an importer).
    pub fn register(&self, graph: Graph) -> GraphResult<GraphHandle> {
        let mut entries = self.entries_mut();
        if entries.iter().any(|h| h.id == graph.id()) {
            return Err(GraphError::DuplicateGraphId {
                graph_id: graph.id().to_string(),
            });
        }
        let handle = GraphHandle::new(graph);
        entries.push(handle.clone());
        tracing::debug!(graph_id = %handle.id, "registered graph");
        Ok(handle)
    }

    pub fn get(&self, graph_id: &str) -> Option<GraphHandle> {
        self.entries().iter().find(|h| h.id == graph_id).cloned()
    }

    /// Unregister a graph. Outstanding handles stay usable but detached.
    pub fn remove(&self, graph_id: &str) -> GraphResult<GraphHandle> {
        let mut entries = self.entries_mut();
        let pos = entries
            .iter()
            .position(|h| h.id == graph_id)
            .ok_or_else(|| GraphError::GraphNotFound {
                graph_id: graph_id.to_string(),
            })?;
        tracing::debug!(graph_id, "unregistered graph");
        Ok(entries.remove(pos))
    }

    /// Registered ids in registration order.
    pub fn list_ids(&self) -> Vec<GraphId> {
        self.entries().iter().map(|h| h.id.clone()).collect()
    }

    /// Frozen list of handles, for consumers that walk every graph.
    pub fn snapshot(&self) -> Vec<GraphHandle> {
        self.entries().clone()
    }

    /// Drop every graph (session shutdown).
    pub fn clear(&self) {
        self.entries_mut().clear();
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_get_remove() {
        let reg = GraphRegistry::new();
        reg.create("b").unwrap();
        reg.create("a").unwrap();
        assert_eq!(reg.list_ids(), vec!["b", "a"]);

        let err = reg.create("a").unwrap_err();
        assert_eq!(
            err,
            GraphError::DuplicateGraphId {
                graph_id: "a".into()
            }
        );

        assert!(reg.get("a").is_some());
        assert!(reg.get("zzz").is_none());

        reg.remove("b").unwrap();
        assert_eq!(reg.list_ids(), vec!["a"]);
        assert!(matches!(
            reg.remove("b"),
            Err(GraphError::GraphNotFound { .. })
        ));

        reg.clear();
        assert!(reg.is_empty());
    }

    #[test]
    fn handles_share_the_registered_graph() {
        let reg = GraphRegistry::new();
        let handle = reg.create("g").unwrap();
        handle.write().unwrap().metadata.name.set("it", "Tempio".to_string());

        let again = reg.get("g").unwrap();
        assert_eq!(
            again.read().unwrap().metadata.name.get("it").map(String::as_str),
            Some("Tempio")
        );
    }

    #[test]
    fn poisoned_graph_reports_error() {
        let reg = GraphRegistry::new();
        let handle = reg.create("g").unwrap();
        let clone = handle.clone();
        let _ = std::thread::spawn(move || {
            let _guard = clone.write().unwrap();
            panic!("writer failed");
        })
        .join();

        assert!(matches!(handle.read(), Err(GraphError::Poisoned { .. })));
        // Other graphs and the registry itself stay usable.
        reg.create("h").unwrap();
        assert_eq!(reg.len(), 2);
    }
}
