use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};
use serde::Deserialize;

use super::{text_of, ParseError};
use crate::model::{number_steps, IngredientEntry, Recipe};

static LD_JSON: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"script[type="application/ld+json"]"#).expect("valid ld+json selector")
});
static MATERIAL_AREA: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("#divConfirmedMaterialArea").expect("valid area selector"));
static ITEM_NAME: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".ingre_list_name > a").expect("valid name selector"));
static ITEM_QUANTITY: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".ingre_list_ea").expect("valid quantity selector"));

#[derive(Deserialize)]
struct LdRecipe {
    name: String,
    #[serde(rename = "recipeInstructions")]
    instructions: Vec<LdStep>,
}

#[derive(Deserialize)]
struct LdStep {
    text: String,
}

/// Parse a recipe detail page.
///
/// Name and instructions come from the embedded JSON-LD block; ingredients
/// and sauces from the two lists inside the confirmed-material area.
pub fn parse_recipe(html: &str) -> Result<Recipe, ParseError> {
    let doc = Html::parse_document(html);

    let ld_text = doc
        .select(&LD_JSON)
        .next()
        .map(|el| el.text().collect::<String>())
        .ok_or(ParseError::NoStructuredData)?;
    let ld: LdRecipe = serde_json::from_str(ld_text.trim())?;

    let area = doc
        .select(&MATERIAL_AREA)
        .next()
        .ok_or(ParseError::MissingElement("material area"))?;
    let ingredients =
        nth_child(area, 0, "ul").ok_or(ParseError::MissingElement("ingredient list"))?;
    let sauces = nth_child(area, 1, "ul").ok_or(ParseError::MissingElement("sauce list"))?;

    Ok(Recipe {
        name: ld.name,
        ingredients: parse_entries(ingredients)?,
        sauces: parse_entries(sauces)?,
        steps: number_steps(ld.instructions.iter().map(|s| s.text.as_str())),
    })
}

/// Element child at position `n` (0-based), only if it has tag `tag`.
/// Same as `> tag:nth-child(n + 1)`.
fn nth_child<'a>(parent: ElementRef<'a>, n: usize, tag: &str) -> Option<ElementRef<'a>> {
    parent
        .children()
        .filter_map(ElementRef::wrap)
        .nth(n)
        .filter(|el| el.value().name() == tag)
}

fn parse_entries(list: ElementRef<'_>) -> Result<Vec<IngredientEntry>, ParseError> {
    list.children()
        .filter_map(ElementRef::wrap)
        .filter(|el| el.value().name() == "li")
        .map(|li| -> Result<IngredientEntry, ParseError> {
            let name = li
                .select(&ITEM_NAME)
                .next()
                .ok_or(ParseError::MissingElement("ingredient name"))?;
            let quantity = li
                .select(&ITEM_QUANTITY)
                .next()
                .ok_or(ParseError::MissingElement("ingredient quantity"))?;
            Ok(IngredientEntry::new(&text_of(name), &text_of(quantity)))
        })
        .collect()
}
