#[cfg(test)]
pub mod memory;
pub mod neo4j;

use thiserror::Error;
use tracing::debug;

use crate::model::{Food, IngredientEntry};

#[derive(Error, Debug)]
pub enum GraphError {
    #[error("neo4j: {0}")]
    Neo4j(#[from] neo4rs::Error),
}

/// Ingredient-like nodes hanging off a recipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Part {
    Ingredient,
    Sauce,
}

impl Part {
    pub fn label(self) -> &'static str {
        match self {
            Part::Ingredient => "Ingredient",
            Part::Sauce => "Sauce",
        }
    }

    pub fn relation(self) -> &'static str {
        match self {
            Part::Ingredient => "INGREDIENT_OF",
            Part::Sauce => "SAUCE_OF",
        }
    }
}

/// One merge statement. A food compiles into an ordered list of these,
/// which a store applies inside a single transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphOp {
    /// `(:Food {name})`
    MergeFood { name: String },
    /// `(:Recipe {name, recipe: steps})-[:RECIPE_OF]->(:Food {name: food})`
    MergeRecipe {
        food: String,
        name: String,
        steps: Vec<String>,
    },
    /// `(:Ingredient|Sauce {name})-[:REL {amount}?]->(:Recipe)`. The recipe is
    /// addressed by its key `(recipe, steps)`.
    MergePart {
        part: Part,
        name: String,
        amount: Option<String>,
        recipe: String,
        steps: Vec<String>,
    },
}

/// Transactional sink for merge plans.
#[allow(async_fn_in_trait)]
pub trait GraphStore {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Apply every op or none of them.
    async fn apply(&mut self, ops: &[GraphOp]) -> Result<(), Self::Error>;
}

pub fn plan_food(food: &Food) -> Vec<GraphOp> {
    let mut ops = vec![GraphOp::MergeFood {
        name: food.name.clone(),
    }];

    for recipe in &food.recipes {
        ops.push(GraphOp::MergeRecipe {
            food: food.name.clone(),
            name: recipe.name.clone(),
            steps: recipe.steps.clone(),
        });

        let parts = recipe
            .ingredients
            .iter()
            .map(|e| (Part::Ingredient, e))
            .chain(recipe.sauces.iter().map(|e| (Part::Sauce, e)));
        for (part, entry) in parts {
            ops.push(part_op(part, entry, &recipe.name, &recipe.steps));
        }
    }
    ops
}

fn part_op(part: Part, entry: &IngredientEntry, recipe: &str, steps: &[String]) -> GraphOp {
    GraphOp::MergePart {
        part,
        name: entry.name.trim().to_string(),
        amount: entry.amount().map(str::to_string),
        recipe: recipe.to_string(),
        steps: steps.to_vec(),
    }
}

/// Upsert one food with all its recipes in a single transaction.
pub async fn write_food<G: GraphStore>(store: &mut G, food: &Food) -> Result<(), G::Error> {
    let ops = plan_food(food);
    debug!(
        "Writing {} ({} recipes, {} statements)",
        food.name,
        food.recipes.len(),
        ops.len()
    );
    store.apply(&ops).await
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::model::{number_steps, Food, IngredientEntry, Recipe};

    pub fn recipe(name: &str, ingredients: &[(&str, &str)], sauces: &[(&str, &str)]) -> Recipe {
        let entries = |xs: &[(&str, &str)]| {
            xs.iter()
                .map(|(n, q)| IngredientEntry::new(n, q))
                .collect::<Vec<_>>()
        };
        Recipe {
            name: name.to_string(),
            ingredients: entries(ingredients),
            sauces: entries(sauces),
            steps: number_steps(["Prepare", "Cook"]),
        }
    }

    pub fn food(name: &str, recipes: Vec<Recipe>) -> Food {
        Food {
            name: name.to_string(),
            recipes,
        }
    }
}
