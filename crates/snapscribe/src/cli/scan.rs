use anyhow::{bail, Result};
use console::style;

use snapscribe_core::config::{self, ConfigOverrides, ConfigStore, Profile};
use snapscribe_core::{scanner, FlickrClient, DEFAULT_ENGINE};

use super::prompt;

pub fn run(
    album_id: Option<&str>,
    api_key: Option<String>,
    api_secret: Option<String>,
    store_flag: bool,
    tag_flag: bool,
) -> Result<()> {
    let store = ConfigStore::new()?;
    let overrides = ConfigOverrides {
        api_key,
        api_secret,
        ..Default::default()
    };
    // Tagging the scanned photos needs the full credential set.
    let profile = if tag_flag { Profile::Tag } else { Profile::Scan };
    let config = config::resolve(&store, overrides, profile, prompt::ask)?;

    if store_flag {
        store.store_credentials(&config.api_key, &config.api_secret)?;
        eprintln!("Stored credentials in {}", store.credential_path().display());
        return Ok(());
    }

    let Some(album_id) = album_id else {
        bail!("an album id is required unless --store is given");
    };

    if tag_flag {
        let (mut host, vision, generator, encyclopedia) =
            super::tag::build_clients(&config, &store, DEFAULT_ENGINE)?;
        let ids = scanner::tag_album(&mut host, &vision, &generator, &encyclopedia, album_id)?;
        for id in &ids {
            println!("{id}");
        }
        eprintln!(
            "Processed {} photos missing a description",
            style(ids.len()).bold()
        );
    } else {
        let host = FlickrClient::new(&config.api_key, &config.api_secret)?;
        let ids = scanner::scan_album(&host, album_id)?;
        for id in &ids {
            println!("{id}");
        }
        eprintln!(
            "{} photos missing a description",
            style(ids.len()).bold()
        );
    }

    Ok(())
}
