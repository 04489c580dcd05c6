use anyhow::{bail, Context, Result};
use console::style;

use snapscribe_core::config::{self, ConfigOverrides, ConfigStore, Profile};
use snapscribe_core::{
    AzureVisionClient, Config, FlickrClient, OpenAiClient, TagOutcome, WikipediaClient,
};

use super::prompt;

pub fn run(
    photo_id: Option<&str>,
    overrides: ConfigOverrides,
    engine: &str,
    store_flag: bool,
) -> Result<()> {
    let store = ConfigStore::new()?;
    let config = config::resolve(&store, overrides, Profile::Tag, prompt::ask)?;

    if store_flag {
        store.store_config(&config)?;
        eprintln!("Wrote configuration to {}", store.config_path().display());
        return Ok(());
    }

    let Some(photo_id) = photo_id else {
        bail!("a photo id is required unless --store is given");
    };

    let (mut host, vision, generator, encyclopedia) = build_clients(&config, &store, engine)?;
    match snapscribe_core::tag_photo(&mut host, &vision, &generator, &encyclopedia, photo_id)? {
        TagOutcome::Unchanged => {
            eprintln!("Photo {photo_id} already has a title and a description");
        }
        TagOutcome::Updated {
            title,
            description,
            tags,
        } => {
            eprintln!("Updated photo {photo_id}");
            eprintln!("  title: {}", style(&title).green());
            eprintln!("  tags: {}", style(tags.join(", ")).cyan());
            eprintln!("  description: {description}");
        }
    }

    Ok(())
}

/// Build the full client set for the tagging pipeline from resolved config.
pub(crate) fn build_clients(
    config: &Config,
    store: &ConfigStore,
    engine: &str,
) -> Result<(FlickrClient, AzureVisionClient, OpenAiClient, WikipediaClient)> {
    let azure_key = config
        .azure_key
        .as_deref()
        .context("Azure Vision API key is not configured")?;
    let azure_endpoint = config
        .azure_endpoint
        .as_deref()
        .context("Azure Vision API endpoint is not configured")?;
    let openai_api_key = config
        .openai_api_key
        .as_deref()
        .context("OpenAI API key is not configured")?;

    let mut host = FlickrClient::new(&config.api_key, &config.api_secret)?
        .with_verifier_source(Box::new(prompt::StdinVerifier))
        .with_token_store(store.clone());
    if let (Some(token), Some(secret)) = (&config.oauth_token, &config.oauth_token_secret) {
        host = host.with_access_token(token, secret);
    }

    Ok((
        host,
        AzureVisionClient::new(azure_key, azure_endpoint)?,
        OpenAiClient::new(openai_api_key, engine)?,
        WikipediaClient::new()?,
    ))
}
