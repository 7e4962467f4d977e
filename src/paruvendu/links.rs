use reqwest::Url;
use scraper::{Html, Selector};

use crate::{Error, Result};

/// Absolute targets of every `<a href>` of a page, in document order.
pub fn extract_hrefs(html: &str, page_url: &str) -> Result<Vec<String>> {
    let selector = Selector::parse("a[href]").map_err(|_| Error::InvalidSelector("a[href]".into()))?;
    let base = Url::parse(page_url).ok();
    let doc = Html::parse_document(html);

    Ok(doc
        .select(&selector)
        .filter_map(|a| a.value().attr("href"))
        .filter_map(|href| match &base {
            Some(base) => base.join(href).ok().map(String::from),
            None => Some(href.to_string()),
        })
        .collect())
}

/// Appends the hrefs starting with `prefix` that are not known yet.
/// Returns how many were added.
pub fn collect_new(known: &mut Vec<String>, hrefs: &[String], prefix: &str) -> usize {
    let mut added = 0;
    for href in hrefs {
        if href.starts_with(prefix) && !known.contains(href) {
            known.push(href.clone());
            added += 1;
        }
    }
    added
}

/// Drops links carrying a query string and repeated links.
pub fn clean_listing_links(links: &[String]) -> Vec<String> {
    let mut cleaned: Vec<String> = Vec::with_capacity(links.len());
    for link in links {
        let link = link.trim().trim_end_matches(';');
        if link.is_empty() || link.contains('?') {
            continue;
        }
        if !cleaned.iter().any(|l| l == link) {
            cleaned.push(link.to_string());
        }
    }
    cleaned
}

/// Last path segment of a listing link.
pub fn listing_id(link: &str) -> String {
    let id = match link.rfind('/') {
        Some(i) => &link[i + 1..],
        None => link,
    };
    id.replace(';', "")
}
