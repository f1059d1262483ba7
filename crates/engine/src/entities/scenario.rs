//! Scenario catalog.
//!
//! Loaded scene graphs keyed by scenario id. Graphs are immutable once
//! registered and shared by `Arc`.

use std::collections::HashMap;
use std::sync::Arc;

use branchline_domain::{GraphError, ScenarioId, SceneGraph};

#[derive(Debug, Default)]
pub struct ScenarioCatalog {
    graphs: HashMap<ScenarioId, Arc<SceneGraph>>,
}

impl ScenarioCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_graph(mut self, graph: SceneGraph) -> Self {
        self.insert(graph);
        self
    }

    /// Register a graph, replacing any graph with the same scenario id.
    pub fn insert(&mut self, graph: SceneGraph) {
        tracing::debug!(
            scenario_id = %graph.scenario_id(),
            scenes = graph.scene_count(),
            "Registered scenario"
        );
        self.graphs
            .insert(graph.scenario_id().clone(), Arc::new(graph));
    }

    /// Parse and register a scenario document.
    pub fn load_json(
        &mut self,
        scenario_id: impl Into<ScenarioId>,
        json: &str,
    ) -> Result<(), GraphError> {
        let graph = SceneGraph::from_json(scenario_id, json)?;
        self.insert(graph);
        Ok(())
    }

    pub fn get(&self, scenario_id: &ScenarioId) -> Option<Arc<SceneGraph>> {
        self.graphs.get(scenario_id).cloned()
    }

    pub fn contains(&self, scenario_id: &ScenarioId) -> bool {
        self.graphs.contains_key(scenario_id)
    }

    /// Registered ids, sorted.
    pub fn ids(&self) -> Vec<ScenarioId> {
        let mut ids: Vec<ScenarioId> = self.graphs.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.graphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.graphs.is_empty()
    }
}
