use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{AlbumInfo, ChartArtist, ChartTrack, Review, ReviewKind, TagInfo};

/// Key shapes the store is queried by. Exact-field match only.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StoreKey {
    Tag(String),
    Album { artist: String, album: String },
    Country(String),
    Reviews { kind: ReviewKind, item_id: Uuid },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: Uuid,
    pub body: DocumentBody,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DocumentBody {
    Tag {
        tag: String,
        info: TagInfo,
    },
    Album {
        artist: String,
        album: String,
        info: AlbumInfo,
    },
    Country {
        country: String,
        top_tracks: Vec<ChartTrack>,
        top_artists: Vec<ChartArtist>,
    },
    Review(Review),
}

impl Document {
    pub fn new(body: DocumentBody) -> Self {
        Self {
            id: Uuid::new_v4(),
            body,
        }
    }

    /// Whether this document matches a lookup key, field for field.
    pub fn matches(&self, key: &StoreKey) -> bool {
        match (&self.body, key) {
            (DocumentBody::Tag { tag, .. }, StoreKey::Tag(wanted)) => tag == wanted,
            (
                DocumentBody::Album { artist, album, .. },
                StoreKey::Album {
                    artist: wanted_artist,
                    album: wanted_album,
                },
            ) => artist == wanted_artist && album == wanted_album,
            (DocumentBody::Country { country, .. }, StoreKey::Country(wanted)) => {
                country == wanted
            }
            (DocumentBody::Review(review), StoreKey::Reviews { kind, item_id }) => {
                review.kind == *kind && review.item_id == *item_id
            }
            _ => false,
        }
    }
}

/// Outcome of a cache-or-fetch lookup: where the value came from, or that the
/// upstream could not provide one. Expected upstream failures never surface
/// as errors; they collapse to `Unavailable`.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<T> {
    /// Answered from the local store.
    Cached(T),
    /// Fetched from the upstream API on a cache miss.
    Fresh(T),
    /// The upstream failed or the response was malformed; nothing was cached.
    Unavailable,
}

impl<T> Lookup<T> {
    pub fn value(&self) -> Option<&T> {
        match self {
            Lookup::Cached(value) | Lookup::Fresh(value) => Some(value),
            Lookup::Unavailable => None,
        }
    }

    pub fn into_value(self) -> Option<T> {
        match self {
            Lookup::Cached(value) | Lookup::Fresh(value) => Some(value),
            Lookup::Unavailable => None,
        }
    }

    pub fn from_cache(&self) -> bool {
        matches!(self, Lookup::Cached(_))
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, Lookup::Unavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag_doc(tag: &str) -> Document {
        Document::new(DocumentBody::Tag {
            tag: tag.to_string(),
            info: TagInfo {
                wiki_summary: String::new(),
                wiki_content: String::new(),
            },
        })
    }

    #[test]
    fn tag_documents_match_their_tag_only() {
        let doc = tag_doc("rock");
        assert!(doc.matches(&StoreKey::Tag("rock".to_string())));
        assert!(!doc.matches(&StoreKey::Tag("jazz".to_string())));
        assert!(!doc.matches(&StoreKey::Country("rock".to_string())));
    }

    #[test]
    fn album_keys_need_both_fields() {
        let doc = Document::new(DocumentBody::Album {
            artist: "Daft Punk".to_string(),
            album: "Discovery".to_string(),
            info: AlbumInfo {
                name: "Discovery".to_string(),
                artist: "Daft Punk".to_string(),
                url: None,
                release_date: None,
                total_duration_minutes: None,
                tracks: vec![],
            },
        });

        assert!(doc.matches(&StoreKey::Album {
            artist: "Daft Punk".to_string(),
            album: "Discovery".to_string(),
        }));
        assert!(!doc.matches(&StoreKey::Album {
            artist: "Daft Punk".to_string(),
            album: "Homework".to_string(),
        }));
    }

    #[test]
    fn lookup_reports_provenance() {
        let cached = Lookup::Cached(1);
        let fresh = Lookup::Fresh(1);
        let missing: Lookup<i32> = Lookup::Unavailable;

        assert!(cached.from_cache());
        assert!(!fresh.from_cache());
        assert_eq!(fresh.value(), Some(&1));
        assert!(missing.is_unavailable());
        assert_eq!(missing.value(), None);
    }
}
