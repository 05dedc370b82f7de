//! Implements the `Feed` trait by downloading the JSON document with `reqwest`.

use crate::api::Feed;
use crate::error::Res;
use crate::model::NewTransaction;
use anyhow::Context;
use std::time::Duration;
use tracing::{debug, trace};
use url::Url;

const FETCH_TIMEOUT: Duration = Duration::from_secs(60);

/// Fetches the feed from a URL. The document must be a JSON array of records.
pub(crate) struct HttpFeed {
    url: Url,
    client: reqwest::Client,
}

impl HttpFeed {
    pub(crate) fn new(url: &str) -> Res<Self> {
        let url = Url::parse(url).with_context(|| format!("Invalid seed feed URL '{url}'"))?;
        let client = reqwest::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .context("Unable to build the HTTP client")?;
        Ok(Self { url, client })
    }
}

#[async_trait::async_trait]
impl Feed for HttpFeed {
    async fn fetch(&self) -> Res<Vec<NewTransaction>> {
        debug!("Fetching seed feed from {}", self.url);
        let response = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .with_context(|| format!("Request to {} failed", self.url))?
            .error_for_status()
            .with_context(|| format!("The seed feed at {} returned an error status", self.url))?;
        let body = response
            .bytes()
            .await
            .context("Unable to read the seed feed response body")?;
        trace!("Received {} bytes", body.len());
        decode(&body)
    }
}

/// Decodes a feed document.
pub(super) fn decode(body: &[u8]) -> Res<Vec<NewTransaction>> {
    serde_json::from_slice(body).context("The seed feed is not a JSON array of transactions")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_bad_url() {
        assert!(HttpFeed::new("not a url").is_err());
        assert!(HttpFeed::new("https://example.com/feed.json").is_ok());
    }

    #[test]
    fn test_decode_feed_document() {
        let body = br#"[
            {"id": 1, "title": "A", "price": 10, "dateOfSale": "2021-11-27T20:29:54+05:30",
             "sold": false, "category": "x", "image": "https://example.com/a.jpg"},
            {"id": 2, "title": "B", "price": "12.5"}
        ]"#;
        let records = decode(body).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].price, Some(10.0));
        assert_eq!(records[1].price, Some(12.5));
        assert_eq!(records[1].sold, None);
    }

    #[test]
    fn test_decode_rejects_non_array() {
        assert!(decode(br#"{"id": 1}"#).is_err());
        assert!(decode(b"<html>").is_err());
    }
}
