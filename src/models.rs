use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Tag wiki text; both fields default to empty when the upstream response
/// carries no wiki subtree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagInfo {
    pub wiki_summary: String,
    pub wiki_content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackInfo {
    pub number: Option<u32>,
    pub name: String,
    pub duration_seconds: u64,
}

/// Album fields plus the derived totals: `total_duration_minutes` is the
/// floored sum of track seconds (`None` when the sum is zero) and
/// `release_date` comes from the wiki publication field when present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlbumInfo {
    pub name: String,
    pub artist: String,
    pub url: Option<String>,
    pub release_date: Option<String>,
    pub total_duration_minutes: Option<u64>,
    pub tracks: Vec<TrackInfo>,
}

// Listener and play counts stay strings: that is how the upstream API
// serializes them, and nothing here does arithmetic on them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartTrack {
    pub name: String,
    pub artist: Option<String>,
    pub url: Option<String>,
    pub listeners: Option<String>,
    pub playcount: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartArtist {
    pub name: String,
    pub url: Option<String>,
    pub listeners: Option<String>,
    pub playcount: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartTag {
    pub name: String,
    pub url: Option<String>,
    pub taggings: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopAlbum {
    pub name: String,
    pub artist: Option<String>,
    pub url: Option<String>,
    pub playcount: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarArtist {
    pub name: String,
    pub url: Option<String>,
    pub similarity: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryTrends {
    pub country: String,
    pub top_tracks: Vec<ChartTrack>,
    pub top_artists: Vec<ChartArtist>,
}

/// Everything shown on an artist page. Never cached: there is no stable
/// single-entity key for this aggregate, so each view fetches fresh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtistOverview {
    pub name: String,
    pub top_tracks: Vec<ChartTrack>,
    pub top_albums: Vec<TopAlbum>,
    pub similar: Vec<SimilarArtist>,
    pub photo_url: Option<String>,
}

/// Worldwide charts. Each section is independent; a section is `None` when
/// its chart could not be fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalTrends {
    pub top_artists: Option<Vec<ChartArtist>>,
    pub top_tracks: Option<Vec<ChartTrack>>,
    pub top_tags: Option<Vec<ChartTag>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewKind {
    Tag,
    Album,
    Artist,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub user_id: Uuid,
    pub kind: ReviewKind,
    pub item_id: Uuid,
    pub rating: u8,
    pub text: String,
}
