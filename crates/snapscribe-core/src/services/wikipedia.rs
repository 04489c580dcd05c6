use reqwest::StatusCode;
use serde::Deserialize;

use super::{http_client, Encyclopedia};
use crate::error::{Error, Result};
use crate::model::WikiSummary;

const SEARCH_URL: &str = "https://en.wikipedia.org/w/api.php";
const SUMMARY_URL: &str = "https://en.wikipedia.org/api/rest_v1/page/summary/";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    query: Option<SearchQuery>,
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    #[serde(default)]
    search: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    title: String,
}

#[derive(Debug, Deserialize)]
struct SummaryResponse {
    #[serde(rename = "type", default)]
    page_type: String,
    #[serde(default)]
    extract: Option<String>,
    #[serde(default)]
    content_urls: Option<ContentUrls>,
}

#[derive(Debug, Deserialize)]
struct ContentUrls {
    desktop: PageUrl,
}

#[derive(Debug, Deserialize)]
struct PageUrl {
    page: String,
}

/// Wikipedia lookup: full-text search for the top hit, then the article
/// summary. Disambiguation pages, missing pages, and empty search results
/// are all the same soft miss.
pub struct WikipediaClient {
    http: reqwest::blocking::Client,
}

impl WikipediaClient {
    pub fn new() -> Result<Self> {
        Ok(Self {
            http: http_client()?,
        })
    }

    fn top_search_hit(&self, query: &str) -> Result<Option<String>> {
        let response = self
            .http
            .get(SEARCH_URL)
            .query(&[
                ("action", "query"),
                ("list", "search"),
                ("srsearch", query),
                ("srlimit", "1"),
                ("format", "json"),
            ])
            .send()?;

        if !response.status().is_success() {
            return Err(Error::remote(
                "wikipedia",
                format!("search failed: {}", response.status()),
            ));
        }

        let parsed: SearchResponse = response.json()?;
        Ok(parsed
            .query
            .map(|q| q.search)
            .unwrap_or_default()
            .into_iter()
            .next()
            .map(|hit| hit.title))
    }

    fn summary(&self, title: &str) -> Result<Option<WikiSummary>> {
        let slug = urlencoding::encode(&title.replace(' ', "_")).into_owned();
        let response = self.http.get(format!("{SUMMARY_URL}{slug}")).send()?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(Error::remote(
                "wikipedia",
                format!("summary failed: {}", response.status()),
            ));
        }

        let parsed: SummaryResponse = response.json()?;
        if parsed.page_type == "disambiguation" {
            tracing::debug!(title, "ambiguous article, treating as no result");
            return Ok(None);
        }
        let Some(summary) = parsed.extract.filter(|text| !text.is_empty()) else {
            return Ok(None);
        };
        let url = parsed
            .content_urls
            .map_or_else(|| format!("https://en.wikipedia.org/wiki/{slug}"), |urls| urls.desktop.page);

        Ok(Some(WikiSummary { url, summary }))
    }
}

impl Encyclopedia for WikipediaClient {
    fn lookup(&self, query: &str) -> Result<Option<WikiSummary>> {
        let Some(title) = self.top_search_hit(query)? else {
            return Ok(None);
        };
        self.summary(&title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_response_shape() {
        let parsed: SearchResponse = serde_json::from_str(
            r#"{"query": {"search": [{"title": "Lighthouse", "pageid": 18091}]}}"#,
        )
        .unwrap();

        let hit = parsed.query.unwrap().search.into_iter().next().unwrap();
        assert_eq!(hit.title, "Lighthouse");
    }

    #[test]
    fn test_empty_search_response() {
        let parsed: SearchResponse =
            serde_json::from_str(r#"{"query": {"search": []}}"#).unwrap();
        assert!(parsed.query.unwrap().search.is_empty());

        let parsed: SearchResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.query.is_none());
    }

    #[test]
    fn test_summary_response_shape() {
        let parsed: SummaryResponse = serde_json::from_str(
            r#"{
                "type": "standard",
                "extract": "A lighthouse is a tower.",
                "content_urls": {"desktop": {"page": "https://en.wikipedia.org/wiki/Lighthouse"}}
            }"#,
        )
        .unwrap();

        assert_eq!(parsed.page_type, "standard");
        assert_eq!(parsed.extract.as_deref(), Some("A lighthouse is a tower."));
    }

    #[test]
    fn test_disambiguation_type_parses() {
        let parsed: SummaryResponse =
            serde_json::from_str(r#"{"type": "disambiguation", "extract": "May refer to:"}"#)
                .unwrap();

        assert_eq!(parsed.page_type, "disambiguation");
    }
}
