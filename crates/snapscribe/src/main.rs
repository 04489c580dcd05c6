use anyhow::Result;
use clap::Parser;

use snapscribe::cli::{Cli, Commands};
use snapscribe_core::config::ConfigOverrides;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Scan {
            album_id,
            api_key,
            api_secret,
            store,
            tag,
        } => snapscribe::cli::scan::run(album_id.as_deref(), api_key, api_secret, store, tag),
        Commands::Tag {
            photo_id,
            api_key,
            api_secret,
            azure_key,
            azure_endpoint,
            openai_api_key,
            engine,
            store,
        } => {
            let overrides = ConfigOverrides {
                api_key,
                api_secret,
                azure_key,
                azure_endpoint,
                openai_api_key,
            };
            snapscribe::cli::tag::run(photo_id.as_deref(), overrides, &engine, store)
        }
    }
}
