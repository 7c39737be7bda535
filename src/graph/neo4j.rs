use neo4rs::{query, ConfigBuilder, Graph, Query};
use tracing::{info, warn};

use super::{GraphError, GraphOp, GraphStore};
use crate::config::GraphConfig;

/// Long-lived Bolt connection; each `apply` is one explicit transaction.
pub struct Neo4jStore {
    graph: Graph,
}

impl Neo4jStore {
    /// Connect and verify the server answers before any crawling starts.
    pub async fn connect(cfg: &GraphConfig) -> Result<Self, GraphError> {
        let config = ConfigBuilder::default()
            .uri(cfg.uri.as_str())
            .user(cfg.user.as_str())
            .password(cfg.password.as_str())
            .db(cfg.database.as_str())
            .build()?;
        let graph = Graph::connect(config).await?;
        graph.run(query("RETURN 1")).await?;
        info!("Connected to Neo4j at {} (db {})", cfg.uri, cfg.database);
        Ok(Self { graph })
    }
}

impl GraphStore for Neo4jStore {
    type Error = GraphError;

    async fn apply(&mut self, ops: &[GraphOp]) -> Result<(), GraphError> {
        let mut txn = self.graph.start_txn().await?;
        for op in ops {
            if let Err(e) = txn.run(to_query(op)).await {
                if let Err(rb) = txn.rollback().await {
                    warn!("Rollback failed: {}", rb);
                }
                return Err(e.into());
            }
        }
        txn.commit().await?;
        Ok(())
    }
}

fn cypher(op: &GraphOp) -> String {
    match op {
        GraphOp::MergeFood { .. } => "MERGE (food:Food {name: $name})".to_string(),
        GraphOp::MergeRecipe { .. } => "MATCH (food:Food {name: $food})
             MERGE (recipe:Recipe {name: $name, recipe: $steps})
             MERGE (recipe)-[:RECIPE_OF]->(food)"
            .to_string(),
        GraphOp::MergePart { part, amount, .. } => {
            part_cypher(part.label(), part.relation(), amount.is_some())
        }
    }
}

fn to_query(op: &GraphOp) -> Query {
    let q = query(&cypher(op));
    match op {
        GraphOp::MergeFood { name } => q.param("name", name.as_str()),
        GraphOp::MergeRecipe { food, name, steps } => q
            .param("food", food.as_str())
            .param("name", name.as_str())
            .param("steps", steps.clone()),
        GraphOp::MergePart {
            name,
            amount,
            recipe,
            steps,
            ..
        } => {
            let q = q
                .param("recipe", recipe.as_str())
                .param("steps", steps.clone())
                .param("name", name.as_str());
            match amount {
                Some(a) => q.param("amount", a.as_str()),
                None => q,
            }
        }
    }
}

/// Labels and relationship types cannot be parameters; both come from `Part`.
/// Relationship identity differs with and without `amount`, hence two shapes.
fn part_cypher(label: &str, rel: &str, with_amount: bool) -> String {
    let props = if with_amount { " {amount: $amount}" } else { "" };
    format!(
        "MATCH (recipe:Recipe {{name: $recipe, recipe: $steps}})
         MERGE (n:{label} {{name: $name}})
         MERGE (n)-[:{rel}{props}]->(recipe)"
    )
}
