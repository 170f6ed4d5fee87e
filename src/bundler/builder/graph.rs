//! Stage dependency graph.
//!
//! Edges point from a prerequisite to the stage that consumes its output.

use std::collections::HashMap;

use petgraph::Direction;
use petgraph::algo::{has_path_connecting, toposort};
use petgraph::graph::{DiGraph, NodeIndex};

use crate::bundler::{Error, Result, Stage};

/// Directed acyclic graph over the pipeline stages.
#[derive(Debug, Clone)]
pub struct StageGraph {
    /// The underlying graph.
    graph: DiGraph<Stage, ()>,

    /// Map from stage to node index.
    nodes: HashMap<Stage, NodeIndex>,
}

impl Default for StageGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl StageGraph {
    /// Graph of all stages wired by [`Stage::prerequisite`].
    pub fn new() -> Self {
        let mut graph = DiGraph::new();
        let mut nodes = HashMap::new();

        for stage in Stage::ALL {
            nodes.insert(stage, graph.add_node(stage));
        }
        for stage in Stage::ALL {
            if let Some(prerequisite) = stage.prerequisite() {
                graph.add_edge(nodes[&prerequisite], nodes[&stage], ());
            }
        }

        Self { graph, nodes }
    }

    fn index(&self, stage: Stage) -> Result<NodeIndex> {
        self.nodes
            .get(&stage)
            .copied()
            .ok_or_else(|| Error::GenericError(format!("stage `{stage}` is not in the graph")))
    }

    /// All stages in dependency order.
    pub fn stages(&self) -> Result<Vec<Stage>> {
        Ok(self
            .sorted()?
            .into_iter()
            .map(|idx| self.graph[idx])
            .collect())
    }

    /// `target` and everything it transitively consumes, in execution order.
    pub fn plan(&self, target: Stage) -> Result<Vec<Stage>> {
        let target_idx = self.index(target)?;

        Ok(self
            .sorted()?
            .into_iter()
            .filter(|&idx| {
                idx == target_idx || has_path_connecting(&self.graph, idx, target_idx, None)
            })
            .map(|idx| self.graph[idx])
            .collect())
    }

    /// Stages whose output `stage` consumes directly.
    pub fn prerequisites(&self, stage: Stage) -> Result<Vec<Stage>> {
        self.neighbors(stage, Direction::Incoming)
    }

    /// Stages that consume `stage`'s output directly.
    pub fn dependents(&self, stage: Stage) -> Result<Vec<Stage>> {
        self.neighbors(stage, Direction::Outgoing)
    }

    fn neighbors(&self, stage: Stage, direction: Direction) -> Result<Vec<Stage>> {
        let mut stages: Vec<Stage> = self
            .graph
            .neighbors_directed(self.index(stage)?, direction)
            .map(|idx| self.graph[idx])
            .collect();
        stages.sort();
        Ok(stages)
    }

    fn sorted(&self) -> Result<Vec<NodeIndex>> {
        toposort(&self.graph, None).map_err(|cycle| {
            Error::GenericError(format!(
                "dependency cycle involving `{}`",
                self.graph[cycle.node_id()]
            ))
        })
    }
}
