pub mod config;
pub mod error;
pub mod model;
pub mod scanner;
pub mod services;
pub mod tagger;

pub use config::{Config, ConfigOverrides, ConfigStore, Profile};
pub use error::{Error, Result};
pub use model::{PhotoRecord, VisionAnalysis, VisionTag, WikiSummary};
pub use services::{
    AzureVisionClient, Encyclopedia, FlickrClient, OpenAiClient, PhotoHost, TextGenerator,
    VerifierSource, VisionService, WikipediaClient, DEFAULT_ENGINE,
};
pub use tagger::{merge_tags, tag_photo, TagOutcome};
