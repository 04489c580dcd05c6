//! Album scanning: find the photos in an album that still need a description.

use crate::error::Result;
use crate::services::{Encyclopedia, PhotoHost, TextGenerator, VisionService};
use crate::tagger::{tag_photo, TagOutcome};

/// Ids of the photos in `album_id` whose description is empty, in album
/// order. Listing or info failures propagate; there is no retry.
pub fn scan_album<H>(host: &H, album_id: &str) -> Result<Vec<String>>
where
    H: PhotoHost + ?Sized,
{
    let ids = host.album_photo_ids(album_id)?;
    tracing::debug!(album_id, photos = ids.len(), "scanning album");

    let mut missing = Vec::new();
    for id in ids {
        let photo = host.photo_info(&id)?;
        if photo.description.is_empty() {
            missing.push(id);
        }
    }
    Ok(missing)
}

/// Scan the album, then run the tagging pipeline on each collected photo in
/// order. One photo's failure is logged and does not stop the rest.
///
/// Returns the scanned ids (the same list `scan_album` would produce).
pub fn tag_album<H, V, G, E>(
    host: &mut H,
    vision: &V,
    generator: &G,
    encyclopedia: &E,
    album_id: &str,
) -> Result<Vec<String>>
where
    H: PhotoHost + ?Sized,
    V: VisionService + ?Sized,
    G: TextGenerator + ?Sized,
    E: Encyclopedia + ?Sized,
{
    let missing = scan_album(host, album_id)?;

    for photo_id in &missing {
        match tag_photo(host, vision, generator, encyclopedia, photo_id) {
            Ok(TagOutcome::Updated { .. }) => {
                tracing::info!(%photo_id, "photo tagged");
            }
            Ok(TagOutcome::Unchanged) => {
                tracing::debug!(%photo_id, "photo unchanged");
            }
            Err(err) => {
                tracing::warn!(%photo_id, error = %err, "tagging failed, continuing");
            }
        }
    }

    Ok(missing)
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::model::VisionTag;
    use crate::tagger::tests::{photo, MockEncyclopedia, MockGenerator, MockHost, MockVision};

    #[test]
    fn test_scan_collects_only_empty_descriptions() {
        let host = MockHost::new(vec![
            photo("1", "t", "", &[]),
            photo("2", "t", "x", &[]),
            photo("3", "", "", &[]),
        ]);

        assert_eq!(scan_album(&host, "album").unwrap(), vec!["1", "3"]);
    }

    #[test]
    fn test_scan_preserves_album_order() {
        let host = MockHost::new(vec![
            photo("9", "t", "", &[]),
            photo("2", "t", "", &[]),
            photo("5", "t", "", &[]),
        ]);

        assert_eq!(scan_album(&host, "album").unwrap(), vec!["9", "2", "5"]);
    }

    #[test]
    fn test_scan_propagates_info_failure() {
        let mut host = MockHost::new(vec![photo("1", "t", "", &[])]);
        host.broken.push("1".to_string());

        assert!(scan_album(&host, "album").is_err());
    }

    #[test]
    fn test_tag_album_updates_each_missing_photo() {
        let mut host = MockHost::new(vec![
            photo("1", "IMG_0001", "", &[]),
            photo("2", "Fine", "described", &[]),
            photo("3", "IMG_0002", "", &[]),
        ]);
        let vision = MockVision::with_tags(vec![VisionTag::new("cat", 0.95)]);
        let generator = MockGenerator::new("Title", "Desc", "more, tags");
        let encyclopedia = MockEncyclopedia::miss();

        let scanned = tag_album(&mut host, &vision, &generator, &encyclopedia, "album").unwrap();

        assert_eq!(scanned, vec!["1", "3"]);
        assert_eq!(host.updates.len(), 2);
        assert_eq!(host.updates[0].0, "1");
        assert_eq!(host.updates[1].0, "3");
    }

    #[test]
    fn test_tag_album_continues_past_failures() {
        let mut host = MockHost::new(vec![
            photo("1", "IMG_0001", "", &[]),
            photo("2", "IMG_0002", "", &[]),
        ]);
        let vision = MockVision {
            fail: true,
            ..MockVision::with_tags(vec![])
        };
        let generator = MockGenerator::new("Title", "Desc", "more");
        let encyclopedia = MockEncyclopedia::miss();

        // Photo 1 has no tags, so its vision call fails; photo 2 would fail the
        // same way. Neither failure aborts the batch.
        let scanned = tag_album(&mut host, &vision, &generator, &encyclopedia, "album").unwrap();

        assert_eq!(scanned, vec!["1", "2"]);
        assert!(host.updates.is_empty());
        assert_eq!(*vision.calls.borrow(), 2);
    }

    #[test]
    fn test_tag_album_mixed_failure_still_updates_rest() {
        let mut host = MockHost::new(vec![
            photo("1", "IMG_0001", "", &[]),
            photo("2", "IMG_0002", "", &["boat"]),
        ]);
        let vision = MockVision {
            fail: true,
            ..MockVision::with_tags(vec![])
        };
        let generator = MockGenerator::new("Title", "Desc", "more");
        let encyclopedia = MockEncyclopedia::miss();

        tag_album(&mut host, &vision, &generator, &encyclopedia, "album").unwrap();

        // Photo 1 dies on the vision call; photo 2 has its own tags, skips
        // vision, and still gets written.
        assert_eq!(host.updates.len(), 1);
        assert_eq!(host.updates[0].0, "2");
    }
}
