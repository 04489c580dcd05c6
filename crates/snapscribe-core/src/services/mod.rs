mod azure;
mod flickr;
mod oauth;
mod openai;
mod wikipedia;

pub use azure::AzureVisionClient;
pub use flickr::{FlickrClient, VerifierSource};
pub use openai::{OpenAiClient, DEFAULT_ENGINE};
pub use wikipedia::WikipediaClient;

use std::time::Duration;

use crate::error::Result;
use crate::model::{PhotoRecord, VisionAnalysis, WikiSummary};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);
const USER_AGENT: &str = concat!("snapscribe/", env!("CARGO_PKG_VERSION"));

/// The photo hosting service: album listing, per-photo info, metadata writes.
pub trait PhotoHost {
    fn album_photo_ids(&self, album_id: &str) -> Result<Vec<String>>;
    fn photo_info(&self, photo_id: &str) -> Result<PhotoRecord>;
    fn update_photo(
        &mut self,
        photo_id: &str,
        title: &str,
        description: &str,
        tags: &[String],
    ) -> Result<()>;
}

/// Vision analysis of one image URL.
pub trait VisionService {
    fn analyze(&self, image_url: &str) -> Result<VisionAnalysis>;
}

/// Text generation from a prompt at a caller-chosen temperature.
pub trait TextGenerator {
    fn complete(&self, prompt: &str, temperature: f64) -> Result<String>;
}

/// Encyclopedia lookup. Ambiguous or missing articles are a soft `Ok(None)`,
/// never an error.
pub trait Encyclopedia {
    fn lookup(&self, query: &str) -> Result<Option<WikiSummary>>;
}

fn http_client() -> Result<reqwest::blocking::Client> {
    Ok(reqwest::blocking::Client::builder()
        .connect_timeout(CONNECT_TIMEOUT)
        .timeout(REQUEST_TIMEOUT)
        .user_agent(USER_AGENT)
        .build()?)
}
