pub mod prompt;
pub mod scan;
pub mod tag;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "snapscribe",
    about = "Fill in missing titles, descriptions, and tags for hosted photo albums",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Enumerate the photos in an album that have no description
    Scan {
        /// The ID of the album on Flickr
        album_id: Option<String>,
        /// The Flickr API key
        #[arg(long)]
        api_key: Option<String>,
        /// The Flickr API secret
        #[arg(long)]
        api_secret: Option<String>,
        /// Store the API key and secret in the home directory and exit
        #[arg(long)]
        store: bool,
        /// Run the tagging pipeline on each photo that is missing a description
        #[arg(long)]
        tag: bool,
    },
    /// Generate a title, description, and tags for a single photo
    Tag {
        /// The ID of the photo on Flickr
        photo_id: Option<String>,
        /// The Flickr API key
        #[arg(long)]
        api_key: Option<String>,
        /// The Flickr API secret
        #[arg(long)]
        api_secret: Option<String>,
        /// The Azure Vision API key
        #[arg(long)]
        azure_key: Option<String>,
        /// The Azure Vision API endpoint
        #[arg(long)]
        azure_endpoint: Option<String>,
        /// The OpenAI API key
        #[arg(long)]
        openai_api_key: Option<String>,
        /// The completion engine to use
        #[arg(long, default_value = snapscribe_core::DEFAULT_ENGINE)]
        engine: String,
        /// Write the configuration file and exit
        #[arg(long)]
        store: bool,
    },
}
