use serde::Deserialize;
use serde_json::json;

use super::{http_client, VisionService};
use crate::error::{Error, Result};
use crate::model::{VisionAnalysis, VisionTag};

const ANALYZE_PATH: &str = "/vision/v3.2/analyze";

#[derive(Debug, Deserialize)]
struct AnalyzeResponse {
    #[serde(default)]
    tags: Vec<TagEntry>,
    #[serde(default)]
    objects: Vec<ObjectEntry>,
}

#[derive(Debug, Deserialize)]
struct TagEntry {
    name: String,
    confidence: f64,
}

#[derive(Debug, Deserialize)]
struct ObjectEntry {
    #[serde(rename = "object")]
    label: String,
    confidence: f64,
}

/// Azure Computer Vision client, analyzing images by URL.
pub struct AzureVisionClient {
    http: reqwest::blocking::Client,
    key: String,
    endpoint: String,
}

impl AzureVisionClient {
    pub fn new(key: impl Into<String>, endpoint: impl Into<String>) -> Result<Self> {
        Ok(Self {
            http: http_client()?,
            key: key.into(),
            endpoint: endpoint.into(),
        })
    }

    fn analyze_url(&self) -> String {
        format!("{}{ANALYZE_PATH}", self.endpoint.trim_end_matches('/'))
    }
}

impl VisionService for AzureVisionClient {
    fn analyze(&self, image_url: &str) -> Result<VisionAnalysis> {
        tracing::debug!(image_url, "requesting vision analysis");
        let response = self
            .http
            .post(self.analyze_url())
            .query(&[("visualFeatures", "Tags,Objects")])
            .header("Ocp-Apim-Subscription-Key", &self.key)
            .json(&json!({ "url": image_url }))
            .send()?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().unwrap_or_default();
            return Err(Error::remote("azure vision", format!("{status}: {body}")));
        }

        let parsed: AnalyzeResponse = response.json()?;
        Ok(VisionAnalysis {
            tags: parsed
                .tags
                .into_iter()
                .filter(|tag| tag.confidence > 0.0)
                .map(|tag| VisionTag::new(tag.name, tag.confidence))
                .collect(),
            objects: parsed
                .objects
                .into_iter()
                .filter(|object| object.confidence > 0.0)
                .map(|object| object.label)
                .collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyze_url_strips_trailing_slash() {
        let client = AzureVisionClient::new("key", "https://vision.example/").unwrap();
        assert_eq!(client.analyze_url(), "https://vision.example/vision/v3.2/analyze");

        let client = AzureVisionClient::new("key", "https://vision.example").unwrap();
        assert_eq!(client.analyze_url(), "https://vision.example/vision/v3.2/analyze");
    }

    #[test]
    fn test_response_shape_deserializes() {
        let parsed: AnalyzeResponse = serde_json::from_str(
            r#"{
                "tags": [{"name": "cat", "confidence": 0.98, "hint": "ignored"}],
                "objects": [{"object": "cat", "confidence": 0.91, "rectangle": {}}]
            }"#,
        )
        .unwrap();

        assert_eq!(parsed.tags[0].name, "cat");
        assert_eq!(parsed.objects[0].label, "cat");
    }

    #[test]
    fn test_missing_sections_default_empty() {
        let parsed: AnalyzeResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.tags.is_empty());
        assert!(parsed.objects.is_empty());
    }
}
