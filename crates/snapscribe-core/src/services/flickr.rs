use serde_json::Value;

use super::oauth::{self, TokenPair};
use super::{http_client, PhotoHost};
use crate::config::ConfigStore;
use crate::error::{Error, Result};
use crate::model::PhotoRecord;

const REST_URL: &str = "https://api.flickr.com/services/rest/";
const REQUEST_TOKEN_URL: &str = "https://www.flickr.com/services/oauth/request_token";
const AUTHORIZE_URL: &str = "https://www.flickr.com/services/oauth/authorize";
const ACCESS_TOKEN_URL: &str = "https://www.flickr.com/services/oauth/access_token";

/// Preferred width range for the vision-analysis image variant.
const MIN_WIDTH: u64 = 400;
const MAX_WIDTH: u64 = 600;

/// Obtains the out-of-band verifier code during the write-authorization
/// handshake. Implementations show the authorization URL to the user and
/// return the code they supply.
pub trait VerifierSource {
    fn verifier(&self, authorize_url: &str) -> Result<String>;
}

/// Client for the Flickr REST API. Read calls are api-key-only; writes are
/// OAuth-signed and trigger the interactive authorization handshake when no
/// access token is held yet.
pub struct FlickrClient {
    http: reqwest::blocking::Client,
    api_key: String,
    api_secret: String,
    access_token: Option<TokenPair>,
    verifier_source: Option<Box<dyn VerifierSource>>,
    token_store: Option<ConfigStore>,
}

impl FlickrClient {
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Result<Self> {
        Ok(Self {
            http: http_client()?,
            api_key: api_key.into(),
            api_secret: api_secret.into(),
            access_token: None,
            verifier_source: None,
            token_store: None,
        })
    }

    /// Reuse a previously persisted write token.
    #[must_use]
    pub fn with_access_token(mut self, token: impl Into<String>, secret: impl Into<String>) -> Self {
        self.access_token = Some(TokenPair {
            token: token.into(),
            secret: secret.into(),
        });
        self
    }

    /// Enable the interactive authorization handshake for writes.
    #[must_use]
    pub fn with_verifier_source(mut self, source: Box<dyn VerifierSource>) -> Self {
        self.verifier_source = Some(source);
        self
    }

    /// Persist tokens obtained by the handshake into the stored configuration.
    #[must_use]
    pub fn with_token_store(mut self, store: ConfigStore) -> Self {
        self.token_store = Some(store);
        self
    }

    fn call(&self, method: &str, params: &[(&str, &str)]) -> Result<Value> {
        let mut query: Vec<(&str, &str)> = vec![
            ("method", method),
            ("api_key", &self.api_key),
            ("format", "json"),
            ("nojsoncallback", "1"),
        ];
        query.extend_from_slice(params);

        tracing::debug!(method, "flickr call");
        let response = self.http.get(REST_URL).query(&query).send()?;
        let value: Value = response.error_for_status()?.json()?;
        check_stat(method, value)
    }

    fn signed_call(&self, method: &str, params: &[(&str, &str)]) -> Result<Value> {
        let token = self
            .access_token
            .as_ref()
            .ok_or_else(|| Error::Authorization("no write token held".into()))?;

        let mut extra: Vec<(&str, &str)> = vec![
            ("method", method),
            ("format", "json"),
            ("nojsoncallback", "1"),
        ];
        extra.extend_from_slice(params);
        let query = oauth::signed_params(
            "POST",
            REST_URL,
            &self.api_key,
            &self.api_secret,
            Some(token),
            &extra,
        )?;

        tracing::debug!(method, "flickr signed call");
        let response = self.http.post(REST_URL).query(&query).send()?;
        let value: Value = response.error_for_status()?.json()?;
        check_stat(method, value)
    }

    /// Run the oob authorization handshake: request token, user visits the
    /// authorization URL, verifier code comes back, access-token exchange.
    fn authorize_write(&mut self) -> Result<()> {
        let source = self.verifier_source.as_ref().ok_or_else(|| {
            Error::Authorization("no write token held and no verifier source configured".into())
        })?;

        let request_token = self.obtain_token(
            REQUEST_TOKEN_URL,
            None,
            &[("oauth_callback", "oob")],
        )?;
        let authorize_url = format!(
            "{AUTHORIZE_URL}?oauth_token={}&perms=write",
            urlencoding::encode(&request_token.token)
        );

        let verifier = source.verifier(&authorize_url)?;
        let verifier = verifier.trim();
        if verifier.is_empty() {
            return Err(Error::Authorization("empty verifier code".into()));
        }

        let access_token = self.obtain_token(
            ACCESS_TOKEN_URL,
            Some(&request_token),
            &[("oauth_verifier", verifier)],
        )?;

        if let Some(store) = &self.token_store {
            store.save_oauth_token(&access_token.token, &access_token.secret)?;
        }
        tracing::info!("write access authorized");
        self.access_token = Some(access_token);
        Ok(())
    }

    fn obtain_token(
        &self,
        url: &str,
        token: Option<&TokenPair>,
        extra: &[(&str, &str)],
    ) -> Result<TokenPair> {
        let query =
            oauth::signed_params("GET", url, &self.api_key, &self.api_secret, token, extra)?;
        let body = self
            .http
            .get(url)
            .query(&query)
            .send()?
            .error_for_status()?
            .text()?;
        oauth::parse_token_response(&body)
            .ok_or_else(|| Error::Authorization(format!("unexpected token response: {body}")))
    }
}

impl PhotoHost for FlickrClient {
    fn album_photo_ids(&self, album_id: &str) -> Result<Vec<String>> {
        let value = self.call("flickr.photosets.getPhotos", &[("photoset_id", album_id)])?;
        let photos = value
            .pointer("/photoset/photo")
            .and_then(Value::as_array)
            .ok_or_else(|| Error::remote("flickr", "photoset listing had no photo array"))?;

        photos
            .iter()
            .map(|photo| {
                scalar_string(photo.get("id"))
                    .ok_or_else(|| Error::remote("flickr", "photo entry without an id"))
            })
            .collect()
    }

    fn photo_info(&self, photo_id: &str) -> Result<PhotoRecord> {
        let info = self.call("flickr.photos.getInfo", &[("photo_id", photo_id)])?;
        let photo = info
            .get("photo")
            .ok_or_else(|| Error::remote("flickr", "photo info had no photo object"))?;

        let title = content_field(photo.get("title"));
        let description = content_field(photo.get("description"));
        let tags = photo
            .pointer("/tags/tag")
            .and_then(Value::as_array)
            .map(|entries| {
                entries
                    .iter()
                    .filter_map(|entry| scalar_string(entry.get("_content")))
                    .collect()
            })
            .unwrap_or_default();

        let sizes = self.call("flickr.photos.getSizes", &[("photo_id", photo_id)])?;
        let image_url = pick_image_url(&sizes)?;

        Ok(PhotoRecord {
            id: photo_id.to_string(),
            title,
            description,
            tags,
            image_url,
        })
    }

    fn update_photo(
        &mut self,
        photo_id: &str,
        title: &str,
        description: &str,
        tags: &[String],
    ) -> Result<()> {
        if self.access_token.is_none() {
            self.authorize_write()?;
        }

        self.signed_call(
            "flickr.photos.setTags",
            &[("photo_id", photo_id), ("tags", &tags.join(","))],
        )?;
        self.signed_call(
            "flickr.photos.setMeta",
            &[
                ("photo_id", photo_id),
                ("title", title),
                ("description", description),
            ],
        )?;
        Ok(())
    }
}

fn check_stat(method: &str, value: Value) -> Result<Value> {
    if value.get("stat").and_then(Value::as_str) == Some("ok") {
        return Ok(value);
    }
    let message = value
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or("unknown error");
    Err(Error::remote("flickr", format!("{method}: {message}")))
}

/// Text fields arrive as `{"_content": "..."}`.
fn content_field(value: Option<&Value>) -> String {
    value
        .and_then(|v| scalar_string(v.get("_content")))
        .unwrap_or_default()
}

/// The API is inconsistent about numbers vs. numeric strings.
fn scalar_string(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

fn scalar_u64(value: Option<&Value>) -> Option<u64> {
    match value? {
        Value::Number(number) => number.as_u64(),
        Value::String(text) => text.parse().ok(),
        _ => None,
    }
}

/// Choose the size variant to feed into vision analysis: the first one
/// 400-599 px wide, or the widest available when no such variant exists.
fn pick_image_url(sizes: &Value) -> Result<String> {
    let entries = sizes
        .pointer("/sizes/size")
        .and_then(Value::as_array)
        .ok_or_else(|| Error::remote("flickr", "size listing had no size array"))?;

    let mut widest: Option<(u64, String)> = None;
    for entry in entries {
        let Some(width) = scalar_u64(entry.get("width")) else {
            continue;
        };
        let Some(source) = scalar_string(entry.get("source")) else {
            continue;
        };
        if (MIN_WIDTH..MAX_WIDTH).contains(&width) {
            return Ok(source);
        }
        if widest.as_ref().is_none_or(|(best, _)| width > *best) {
            widest = Some((width, source));
        }
    }

    widest
        .map(|(_, source)| source)
        .ok_or_else(|| Error::remote("flickr", "no usable size variant"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_pick_image_url_prefers_medium_variant() {
        let sizes = json!({
            "sizes": {"size": [
                {"width": 100, "source": "small"},
                {"width": "500", "source": "medium"},
                {"width": 1024, "source": "large"},
            ]}
        });

        assert_eq!(pick_image_url(&sizes).unwrap(), "medium");
    }

    #[test]
    fn test_pick_image_url_falls_back_to_widest() {
        let sizes = json!({
            "sizes": {"size": [
                {"width": "240", "source": "small"},
                {"width": 2048, "source": "original"},
                {"width": 1024, "source": "large"},
            ]}
        });

        assert_eq!(pick_image_url(&sizes).unwrap(), "original");
    }

    #[test]
    fn test_pick_image_url_no_variants() {
        let sizes = json!({"sizes": {"size": []}});

        assert!(matches!(
            pick_image_url(&sizes),
            Err(Error::RemoteService { .. })
        ));
    }

    #[test]
    fn test_content_field_shapes() {
        let photo = json!({"title": {"_content": "A title"}, "description": {"_content": ""}});

        assert_eq!(content_field(photo.get("title")), "A title");
        assert_eq!(content_field(photo.get("description")), "");
        assert_eq!(content_field(photo.get("missing")), "");
    }

    #[test]
    fn test_scalar_string_accepts_numbers() {
        let value = json!({"id": 52781234});
        assert_eq!(scalar_string(value.get("id")).as_deref(), Some("52781234"));

        let value = json!({"id": "52781234"});
        assert_eq!(scalar_string(value.get("id")).as_deref(), Some("52781234"));
    }

    #[test]
    fn test_check_stat_failure_carries_message() {
        let value = json!({"stat": "fail", "code": 1, "message": "Photoset not found"});
        let err = check_stat("flickr.photosets.getPhotos", value).unwrap_err();

        assert!(err.to_string().contains("Photoset not found"));
    }
}
