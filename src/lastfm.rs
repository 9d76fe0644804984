use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::debug;

use crate::error::{Error, Result};

/// Last.fm-style API transport.
///
/// The resolver only needs "call this method with these params and give me
/// the JSON body"; tests substitute their own implementation.
#[async_trait]
pub trait LastfmApi: Send + Sync {
    async fn request(&self, method: &str, params: &[(&str, &str)]) -> Result<Value>;
}

pub struct LastfmClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl LastfmClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    fn build_url(&self, method: &str, params: &[(&str, &str)]) -> String {
        let mut url = format!(
            "{}?method={}&api_key={}&format=json",
            self.base_url,
            urlencoding::encode(method),
            urlencoding::encode(&self.api_key),
        );
        for (name, value) in params {
            url.push_str(&format!("&{}={}", name, urlencoding::encode(value)));
        }
        url
    }
}

#[async_trait]
impl LastfmApi for LastfmClient {
    async fn request(&self, method: &str, params: &[(&str, &str)]) -> Result<Value> {
        let url = self.build_url(method, params);
        debug!(method, "calling upstream");

        let response = self
            .client
            .get(&url)
            .timeout(Duration::from_secs(30))
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(Error::UpstreamStatus(status.as_u16()));
        }

        Ok(response.json::<Value>().await?)
    }
}

// Wire-format models. The upstream API is loose with types (numbers arrive
// as strings or numbers depending on the endpoint, subtrees go missing), so
// the raw structs default aggressively and coerce where it matters.

#[derive(Debug, Deserialize)]
pub struct TagResponse {
    pub tag: RawTag,
}

#[derive(Debug, Deserialize)]
pub struct RawTag {
    #[serde(default)]
    pub wiki: Option<RawWiki>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawWiki {
    #[serde(default)]
    pub published: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AlbumResponse {
    pub album: RawAlbum,
}

#[derive(Debug, Deserialize)]
pub struct RawAlbum {
    pub name: String,
    pub artist: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub tracks: Option<RawTrackList>,
    #[serde(default)]
    pub wiki: Option<RawWiki>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawTrackList {
    #[serde(default)]
    pub track: Vec<RawTrack>,
}

#[derive(Debug, Deserialize)]
pub struct RawTrack {
    pub name: String,
    #[serde(default, deserialize_with = "lenient_seconds")]
    pub duration: u64,
    #[serde(rename = "@attr", default)]
    pub attr: Option<RawTrackAttr>,
}

#[derive(Debug, Deserialize)]
pub struct RawTrackAttr {
    #[serde(default, deserialize_with = "lenient_rank")]
    pub rank: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct GeoTopTracksResponse {
    pub tracks: RawChartTrackList,
}

#[derive(Debug, Deserialize)]
pub struct GeoTopArtistsResponse {
    pub topartists: RawChartArtistList,
}

#[derive(Debug, Deserialize)]
pub struct ChartTopArtistsResponse {
    pub artists: RawChartArtistList,
}

#[derive(Debug, Deserialize)]
pub struct ChartTopTracksResponse {
    pub tracks: RawChartTrackList,
}

#[derive(Debug, Deserialize)]
pub struct ChartTopTagsResponse {
    pub tags: RawChartTagList,
}

#[derive(Debug, Deserialize)]
pub struct ArtistTopTracksResponse {
    pub toptracks: RawChartTrackList,
}

#[derive(Debug, Deserialize)]
pub struct ArtistTopAlbumsResponse {
    pub topalbums: RawTopAlbumList,
}

#[derive(Debug, Deserialize)]
pub struct SimilarArtistsResponse {
    pub similarartists: RawSimilarList,
}

#[derive(Debug, Deserialize)]
pub struct ArtistSearchResponse {
    pub results: RawSearchResults,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawChartTrackList {
    #[serde(default)]
    pub track: Vec<RawChartTrack>,
}

#[derive(Debug, Deserialize)]
pub struct RawChartTrack {
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub listeners: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub playcount: Option<String>,
    #[serde(default)]
    pub artist: Option<RawTrackArtist>,
}

#[derive(Debug, Deserialize)]
pub struct RawTrackArtist {
    pub name: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawChartArtistList {
    #[serde(default)]
    pub artist: Vec<RawChartArtist>,
}

#[derive(Debug, Deserialize)]
pub struct RawChartArtist {
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub listeners: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub playcount: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawChartTagList {
    #[serde(default)]
    pub tag: Vec<RawChartTag>,
}

#[derive(Debug, Deserialize)]
pub struct RawChartTag {
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub taggings: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawTopAlbumList {
    #[serde(default)]
    pub album: Vec<RawTopAlbum>,
}

#[derive(Debug, Deserialize)]
pub struct RawTopAlbum {
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub playcount: Option<String>,
    #[serde(default)]
    pub artist: Option<RawTrackArtist>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawSimilarList {
    #[serde(default)]
    pub artist: Vec<RawSimilarArtist>,
}

#[derive(Debug, Deserialize)]
pub struct RawSimilarArtist {
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(rename = "match", default, deserialize_with = "lenient_string")]
    pub similarity: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawSearchResults {
    #[serde(default)]
    pub artistmatches: RawArtistMatches,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawArtistMatches {
    #[serde(default)]
    pub artist: Vec<RawArtistMatch>,
}

#[derive(Debug, Deserialize)]
pub struct RawArtistMatch {
    pub name: String,
    #[serde(default)]
    pub image: Vec<RawImage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawImage {
    #[serde(rename = "#text")]
    pub url: String,
    pub size: String,
}

/// Track durations arrive as numbers, numeric strings, or null; all collapse
/// to whole seconds, anything else to 0.
fn lenient_seconds<'de, D>(deserializer: D) -> std::result::Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(coerce_seconds(&value))
}

pub(crate) fn coerce_seconds(value: &Value) -> u64 {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().map(|f| if f > 0.0 { f as u64 } else { 0 }))
            .unwrap_or(0),
        Value::String(s) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

fn lenient_rank<'de, D>(deserializer: D) -> std::result::Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match &value {
        Value::Number(n) => n.as_u64().map(|n| n as u32),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

/// Accepts a string or a number and yields the string form; the API is not
/// consistent about which one it sends for counts.
fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}
