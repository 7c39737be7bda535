//! In-memory graph with Neo4j MERGE semantics, for tests.
//!
//! A relationship merged without properties matches any existing
//! relationship of that type between the two nodes; one merged with
//! `{amount}` only matches an identical amount.

use std::collections::HashSet;

use thiserror::Error;

use super::{GraphOp, GraphStore, Part};

/// Returned for any statement touching the part set by [`MemoryGraph::reject_part`].
#[derive(Error, Debug, PartialEq, Eq)]
#[error("statement rejected: {0}")]
pub struct Rejected(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Node {
    Food(String),
    Recipe { name: String, steps: Vec<String> },
    Part(Part, String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub from: Node,
    pub to: Node,
    pub rel: &'static str,
    pub amount: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryGraph {
    nodes: HashSet<Node>,
    edges: Vec<Edge>,
    reject: Option<String>,
    commits: usize,
}

impl MemoryGraph {
    /// Fail any transaction that merges an ingredient or sauce named `name`.
    pub fn reject_part(mut self, name: &str) -> Self {
        self.reject = Some(name.to_string());
        self
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Transactions applied successfully.
    pub fn commits(&self) -> usize {
        self.commits
    }

    pub fn has_node(&self, node: &Node) -> bool {
        self.nodes.contains(node)
    }

    pub fn edge_from(&self, node: &Node) -> Option<&Edge> {
        self.edges.iter().find(|e| &e.from == node)
    }

    pub fn foods(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .nodes
            .iter()
            .filter_map(|n| match n {
                Node::Food(name) => Some(name.clone()),
                _ => None,
            })
            .collect();
        names.sort();
        names
    }

    fn merge_edge(&mut self, from: Node, to: Node, rel: &'static str, amount: Option<String>) {
        let exists = self.edges.iter().any(|e| {
            e.from == from
                && e.to == to
                && e.rel == rel
                && (amount.is_none() || e.amount == amount)
        });
        if !exists {
            self.edges.push(Edge {
                from,
                to,
                rel,
                amount,
            });
        }
    }

    fn apply_op(&mut self, op: &GraphOp) -> Result<(), Rejected> {
        match op {
            GraphOp::MergeFood { name } => {
                self.nodes.insert(Node::Food(name.clone()));
            }
            GraphOp::MergeRecipe { food, name, steps } => {
                let food = Node::Food(food.clone());
                // MATCH with no rows: nothing merged
                if !self.nodes.contains(&food) {
                    return Ok(());
                }
                let recipe = Node::Recipe {
                    name: name.clone(),
                    steps: steps.clone(),
                };
                self.nodes.insert(recipe.clone());
                self.merge_edge(recipe, food, "RECIPE_OF", None);
            }
            GraphOp::MergePart {
                part,
                name,
                amount,
                recipe,
                steps,
            } => {
                if self.reject.as_deref() == Some(name.as_str()) {
                    return Err(Rejected(format!("{} {}", part.label(), name)));
                }
                let recipe = Node::Recipe {
                    name: recipe.clone(),
                    steps: steps.clone(),
                };
                if !self.nodes.contains(&recipe) {
                    return Ok(());
                }
                let node = Node::Part(*part, name.clone());
                self.nodes.insert(node.clone());
                self.merge_edge(node, recipe, part.relation(), amount.clone());
            }
        }
        Ok(())
    }
}

impl GraphStore for MemoryGraph {
    type Error = Rejected;

    async fn apply(&mut self, ops: &[GraphOp]) -> Result<(), Rejected> {
        let mut staged = self.clone();
        for op in ops {
            staged.apply_op(op)?;
        }
        self.nodes = staged.nodes;
        self.edges = staged.edges;
        self.commits += 1;
        Ok(())
    }
}
