use serde::{Deserialize, Serialize};

/// Metadata for a single hosted photo, as returned by the hosting service.
///
/// `image_url` points at a mid-sized variant suitable for vision analysis
/// (400-599 px wide when one exists, the widest available otherwise).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhotoRecord {
    pub id: String,
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub image_url: String,
}

impl PhotoRecord {
    /// A photo that already has both a title and a description is never touched.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.title.is_empty() && !self.description.is_empty()
    }
}

/// One tag candidate from the vision service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisionTag {
    pub name: String,
    pub confidence: f64,
}

impl VisionTag {
    pub fn new(name: impl Into<String>, confidence: f64) -> Self {
        Self {
            name: name.into(),
            confidence,
        }
    }
}

/// Everything the vision service reported for one image.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VisionAnalysis {
    pub tags: Vec<VisionTag>,
    /// Detected object labels. Carried to match the full analysis response;
    /// the merge step works from `tags` alone.
    pub objects: Vec<String>,
}

/// A usable encyclopedia hit: the article URL and its lead summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WikiSummary {
    pub url: String,
    pub summary: String,
}
