use std::sync::LazyLock;

use scraper::{Html, Selector};

static RECIPE_LINK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".common_sp_link").expect("valid link selector"));

/// Recipe ids linked from a search results page, in result order.
///
/// Links look like `/recipe/6903394`; the id is the last path segment.
pub fn parse_candidate_ids(html: &str) -> Vec<String> {
    let doc = Html::parse_document(html);
    doc.select(&RECIPE_LINK)
        .filter_map(|el| el.value().attr("href"))
        .filter_map(|href| href.trim().rsplit('/').next())
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
pub(crate) mod fixtures {
    pub fn search_page(ids: &[&str]) -> String {
        let cards: String = ids
            .iter()
            .map(|id| {
                format!(
                    r#"<li class="common_sp_list_li"><div class="common_sp_thumb">
                    <a href="/recipe/{id}" class="common_sp_link"><img src="x.jpg"></a></div></li>"#
                )
            })
            .collect();
        format!(r#"<html><body><ul class="common_sp_list_ul">{cards}</ul></body></html>"#)
    }
}
