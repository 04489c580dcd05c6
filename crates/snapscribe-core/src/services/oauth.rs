//! OAuth 1.0a request signing for the hosting service's write endpoints.

use std::time::{SystemTime, UNIX_EPOCH};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use hmac::{Hmac, Mac};
use rand::RngCore;
use sha1::Sha1;

use crate::error::{Error, Result};

type HmacSha1 = Hmac<Sha1>;

/// An OAuth token with its signing secret (request token or access token).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub token: String,
    pub secret: String,
}

fn nonce() -> String {
    let mut bytes = [0u8; 8];
    rand::rng().fill_bytes(&mut bytes);
    bytes.iter().map(|value| format!("{value:02x}")).collect()
}

fn timestamp() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or(0)
        .to_string()
}

/// RFC 5849 §3.4.1: percent-encode both sides, sort by key then value, join
/// with `&`, then concatenate method, encoded URL, and encoded parameters.
fn signature_base_string(method: &str, url: &str, params: &[(String, String)]) -> String {
    let mut pairs: Vec<(String, String)> = params
        .iter()
        .map(|(key, value)| {
            (
                urlencoding::encode(key).into_owned(),
                urlencoding::encode(value).into_owned(),
            )
        })
        .collect();
    pairs.sort();
    let joined = pairs
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("&");
    format!(
        "{}&{}&{}",
        method,
        urlencoding::encode(url),
        urlencoding::encode(&joined)
    )
}

fn sign(base: &str, consumer_secret: &str, token_secret: &str) -> Result<String> {
    let key = format!(
        "{}&{}",
        urlencoding::encode(consumer_secret),
        urlencoding::encode(token_secret)
    );
    let mut mac = HmacSha1::new_from_slice(key.as_bytes())
        .map_err(|err| Error::Authorization(format!("signing key rejected: {err}")))?;
    mac.update(base.as_bytes());
    Ok(BASE64.encode(mac.finalize().into_bytes()))
}

/// Build the complete signed parameter list for one request. The returned
/// pairs carry the nonce, timestamp, and `oauth_signature` and can be sent
/// either as a query string or a form body.
pub fn signed_params(
    method: &str,
    url: &str,
    consumer_key: &str,
    consumer_secret: &str,
    token: Option<&TokenPair>,
    extra: &[(&str, &str)],
) -> Result<Vec<(String, String)>> {
    let mut params: Vec<(String, String)> = vec![
        ("oauth_consumer_key".into(), consumer_key.into()),
        ("oauth_nonce".into(), nonce()),
        ("oauth_signature_method".into(), "HMAC-SHA1".into()),
        ("oauth_timestamp".into(), timestamp()),
        ("oauth_version".into(), "1.0".into()),
    ];
    if let Some(token) = token {
        params.push(("oauth_token".into(), token.token.clone()));
    }
    for (key, value) in extra {
        params.push(((*key).into(), (*value).into()));
    }

    let base = signature_base_string(method, url, &params);
    let signature = sign(&base, consumer_secret, token.map_or("", |pair| pair.secret.as_str()))?;
    params.push(("oauth_signature".into(), signature));
    Ok(params)
}

/// Parse a form-encoded token response
/// (`oauth_token=...&oauth_token_secret=...&...`).
pub fn parse_token_response(body: &str) -> Option<TokenPair> {
    let mut token = None;
    let mut secret = None;
    for pair in body.split('&') {
        if let Some((key, value)) = pair.split_once('=') {
            let value = urlencoding::decode(value).ok()?.into_owned();
            match key {
                "oauth_token" => token = Some(value),
                "oauth_token_secret" => secret = Some(value),
                _ => {}
            }
        }
    }
    Some(TokenPair {
        token: token?,
        secret: secret?,
    })
}
