use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};

use super::{text_of, ParseError};

const CATEGORY_GROUP_CSS: &str =
    "#id_search_category > table > tbody > tr:nth-child(1) > td > div > div:nth-child(3)";

static CATEGORY_GROUP: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(CATEGORY_GROUP_CSS).expect("valid category selector"));

static ANCHOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("valid anchor selector"));

static FOOD_ITEM: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("#contents_area_full > div.s_category_tag > ul > li")
        .expect("valid food item selector")
});

/// Second quoted argument of `javascript:goSearchRecipe('cat3','63')`.
static CATEGORY_CODE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"'[^']*'\s*,\s*'([^']*)'").expect("valid category code regex")
});

/// Category codes from the third category group of the root listing page.
///
/// The "all" entry carries an empty code and is skipped.
pub fn parse_category_codes(html: &str) -> Result<Vec<String>, ParseError> {
    let doc = Html::parse_document(html);
    let group = doc
        .select(&CATEGORY_GROUP)
        .next()
        .ok_or(ParseError::MissingElement("category group"))?;

    let mut seen = HashSet::new();
    let codes = group
        .select(&ANCHOR)
        .filter_map(|a| a.value().attr("href"))
        .filter_map(|href| CATEGORY_CODE_RE.captures(href))
        .filter_map(|caps| caps.get(1).map(|m| m.as_str().trim().to_string()))
        .filter(|code| !code.is_empty() && seen.insert(code.clone()))
        .collect();
    Ok(codes)
}

/// Food names listed on a category page, in page order.
pub fn parse_food_names(html: &str) -> Vec<String> {
    let doc = Html::parse_document(html);
    doc.select(&FOOD_ITEM)
        .map(text_of)
        .filter(|name| !name.is_empty())
        .collect()
}

#[cfg(test)]
pub(crate) mod fixtures {
    /// Root listing page with a category table; `codes` land in the third group.
    pub fn root_listing(codes: &[&str]) -> String {
        let anchors: String = codes
            .iter()
            .map(|c| format!(r#"<a href="javascript:goSearchRecipe('cat3','{c}')">cat {c}</a>"#))
            .collect();
        format!(
            r#"<html><body>
            <div id="id_search_category"><table><tr><td><div>
              <div class="cate_list"><span>By kind</span><a href="javascript:goSearchRecipe('cat4','')">All</a><a href="javascript:goSearchRecipe('cat4','63')">Side</a></div>
              <div class="cate_list"><span>By situation</span><a href="javascript:goSearchRecipe('cat2','12')">Daily</a></div>
              <div class="cate_list"><span>By ingredient</span><a href="javascript:goSearchRecipe('cat3','')" class="active">All</a>{anchors}</div>
            </div></td></tr></table></div>
            </body></html>"#
        )
    }

    pub fn category_page(foods: &[&str]) -> String {
        let items: String = foods.iter().map(|f| format!("<li>{f}</li>")).collect();
        format!(
            r#"<html><body><div id="contents_area_full">
            <div class="s_category_tag"><ul>{items}</ul></div>
            </div></body></html>"#
        )
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn codes_from_third_group_only() {
        let html = root_listing(&["70", "71", "72"]);
        let codes = parse_category_codes(&html).unwrap();
        assert_eq!(codes, vec!["70", "71", "72"]);
    }

    #[test]
    fn duplicate_codes_collapse() {
        let html = root_listing(&["70", "70", "71"]);
        assert_eq!(parse_category_codes(&html).unwrap(), vec!["70", "71"]);
    }

    #[test]
    fn missing_category_group_is_error() {
        let err = parse_category_codes("<html><body><p>maintenance</p></body></html>").unwrap_err();
        assert!(matches!(err, ParseError::MissingElement(_)));
    }

    #[test]
    fn food_names_trimmed_in_order() {
        let html = category_page(&[" Kimchi Stew ", "Bibimbap", "  "]);
        assert_eq!(parse_food_names(&html), vec!["Kimchi Stew", "Bibimbap"]);
    }

    #[test]
    fn empty_category_page() {
        assert!(parse_food_names("<html></html>").is_empty());
    }
}
