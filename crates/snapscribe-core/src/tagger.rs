//! The per-photo decision pipeline: merge tag sources, decide whether the
//! title and description need generating, and write the result back.

use crate::error::Result;
use crate::model::{VisionAnalysis, VisionTag};
use crate::services::{Encyclopedia, PhotoHost, TextGenerator, VisionService};

/// Minimum vision-tag confidence for inclusion in the merged set.
pub const CONFIDENCE_THRESHOLD: f64 = 0.9;

/// Generic vision tags that add no descriptive value.
pub const TAG_DENYLIST: [&str; 3] = ["cloud", "sky", "outdoor"];

/// Camera-assigned title patterns that should be replaced.
const TITLE_PREFIXES: [&str; 3] = ["_MG", "IMG", "DSC"];
const TITLE_SUFFIX: &str = "_iOS";

/// Garbage the generation service occasionally prepends to its output.
const JUNK_PREFIX: &str = "rera\n\n";

const TITLE_TEMPERATURE: f64 = 0.5;
const DESCRIPTION_TEMPERATURE: f64 = 0.8;

/// What the pipeline decided for one photo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagOutcome {
    /// The photo already had a title and a description; nothing was called.
    Unchanged,
    /// The metadata that was written back.
    Updated {
        title: String,
        description: String,
        tags: Vec<String>,
    },
}

/// Combine vision tags with the photo's existing tags.
///
/// Vision tags are kept when their confidence exceeds the threshold, their
/// name is not denylisted, and they were not already taken from the vision
/// list; existing tags follow in their original order, duplicates allowed.
#[must_use]
pub fn merge_tags(existing: &[String], vision: &[VisionTag]) -> Vec<String> {
    let mut merged: Vec<String> = Vec::new();
    for tag in vision {
        if tag.confidence > CONFIDENCE_THRESHOLD
            && !TAG_DENYLIST.contains(&tag.name.as_str())
            && !merged.contains(&tag.name)
        {
            merged.push(tag.name.clone());
        }
    }
    merged.extend(existing.iter().cloned());
    merged
}

/// Remove one leading junk prefix from generated text, if present.
#[must_use]
pub fn strip_junk_prefix(text: &str) -> &str {
    text.strip_prefix(JUNK_PREFIX).unwrap_or(text)
}

/// A title needs regenerating when it is empty or looks camera-assigned.
#[must_use]
pub fn needs_new_title(title: &str) -> bool {
    title.is_empty()
        || TITLE_PREFIXES.iter().any(|prefix| title.starts_with(prefix))
        || title.ends_with(TITLE_SUFFIX)
}

/// Run the full pipeline for one photo and write the result back.
///
/// Linear, single pass: fetch, short-circuit on complete photos, acquire
/// vision tags only when the photo has none of its own, merge, decide title,
/// decide description (encyclopedia first, generation as fallback), augment
/// tags from the final description, commit once.
pub fn tag_photo<H, V, G, E>(
    host: &mut H,
    vision: &V,
    generator: &G,
    encyclopedia: &E,
    photo_id: &str,
) -> Result<TagOutcome>
where
    H: PhotoHost + ?Sized,
    V: VisionService + ?Sized,
    G: TextGenerator + ?Sized,
    E: Encyclopedia + ?Sized,
{
    let photo = host.photo_info(photo_id)?;
    if photo.is_complete() {
        tracing::info!(photo_id, "photo already titled and described, leaving unchanged");
        return Ok(TagOutcome::Unchanged);
    }

    let analysis = if photo.tags.is_empty() {
        vision.analyze(&photo.image_url)?
    } else {
        VisionAnalysis::default()
    };

    let mut tags = merge_tags(&photo.tags, &analysis.tags);
    tracing::debug!(?tags, "merged tag set");

    let title = if needs_new_title(&photo.title) {
        generate_title(generator, &tags)?
    } else {
        photo.title.clone()
    };

    let description = if photo.description.is_empty() {
        describe(generator, encyclopedia, &title, &tags)?
    } else {
        photo.description.clone()
    };

    for suggestion in suggest_tags(generator, &description)? {
        if !tags.contains(&suggestion) {
            tags.push(suggestion);
        }
    }

    host.update_photo(photo_id, &title, &description, &tags)?;
    tracing::info!(photo_id, %title, "photo updated");
    Ok(TagOutcome::Updated {
        title,
        description,
        tags,
    })
}

fn generate_title<G: TextGenerator + ?Sized>(generator: &G, tags: &[String]) -> Result<String> {
    let prompt = format!(
        "Create a short title for an image with these tags {}",
        tags.join(", ")
    );
    let generated = generator.complete(&prompt, TITLE_TEMPERATURE)?;
    Ok(strip_junk_prefix(&generated).to_string())
}

/// Encyclopedia summary when the title matches an article, generated text
/// otherwise. An encyclopedia hit gets the article link appended.
fn describe<G, E>(generator: &G, encyclopedia: &E, title: &str, tags: &[String]) -> Result<String>
where
    G: TextGenerator + ?Sized,
    E: Encyclopedia + ?Sized,
{
    if let Some(hit) = encyclopedia.lookup(title)? {
        return Ok(format!("{}\n\n\nWikipedia: {}", hit.summary, hit.url));
    }

    let prompt = format!(
        "Create an encyclopedic photo description for a photo titled \"{title}\". \
         The photo has these tags: {}.",
        tags.join(", ")
    );
    let generated = generator.complete(&prompt, DESCRIPTION_TEMPERATURE)?;
    Ok(strip_junk_prefix(&generated).to_string())
}

fn suggest_tags<G: TextGenerator + ?Sized>(
    generator: &G,
    description: &str,
) -> Result<Vec<String>> {
    let prompt = format!(
        "suggest up to 20 comma separated image tags based on the following description: {description}"
    );
    let generated = generator.complete(&prompt, DESCRIPTION_TEMPERATURE)?;
    Ok(generated
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(ToString::to_string)
        .collect())
}
