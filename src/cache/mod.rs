pub mod fetcher;
pub mod storage;
pub mod types;

use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use crate::cache::fetcher::ApiFetcher;
use crate::cache::storage::{DocumentStore, FileStore, MemoryStore};
use crate::cache::types::{Document, DocumentBody, Lookup, StoreKey};
use crate::config::Config;
use crate::error::Result;
use crate::lastfm::{LastfmApi, LastfmClient};
use crate::models::{
    AlbumInfo, ArtistOverview, CountryTrends, GlobalTrends, Review, ReviewKind, TagInfo,
};
use crate::rate_limit::RateLimiter;

/// Cache-or-fetch front end over the music-metadata API.
///
/// Each lookup derives a key, consults the document store, and only goes
/// upstream (through the shared rate gate) on a miss, persisting what it
/// fetched. Artist and global-chart lookups have no stable single-entity key
/// and always fetch. The check-then-insert sequence is not transactional: two
/// concurrent misses on one key may both fetch (still spaced by the gate) and
/// both insert, and first-match reads make the duplicate harmless.
pub struct Resolver {
    entries: Arc<dyn DocumentStore>,
    reviews: Arc<dyn DocumentStore>,
    fetcher: ApiFetcher,
}

impl Resolver {
    pub fn new(
        entries: Arc<dyn DocumentStore>,
        reviews: Arc<dyn DocumentStore>,
        api: Arc<dyn LastfmApi>,
        limiter: Arc<RateLimiter>,
    ) -> Self {
        Self {
            entries,
            reviews,
            fetcher: ApiFetcher::new(api, limiter),
        }
    }

    /// Wires up a resolver from configuration: real HTTP transport, one
    /// shared rate gate, and file-backed stores when a directory is
    /// configured.
    pub async fn from_config(config: &Config) -> Result<Self> {
        let api: Arc<dyn LastfmApi> = Arc::new(LastfmClient::new(
            config.base_url.clone(),
            config.api_key.clone(),
        ));
        let limiter = Arc::new(RateLimiter::new(config.min_interval));

        let (entries, reviews): (Arc<dyn DocumentStore>, Arc<dyn DocumentStore>) =
            match &config.store_dir {
                Some(dir) => (
                    Arc::new(FileStore::open(dir.join("entries.bin")).await?),
                    Arc::new(FileStore::open(dir.join("reviews.bin")).await?),
                ),
                None => (Arc::new(MemoryStore::new()), Arc::new(MemoryStore::new())),
            };

        Ok(Self::new(entries, reviews, api, limiter))
    }

    pub async fn tag_info(&self, tag: &str) -> Result<Lookup<TagInfo>> {
        let key = StoreKey::Tag(tag.to_string());

        if let Some(doc) = self.entries.find_one(&key).await {
            if let DocumentBody::Tag { info, .. } = doc.body {
                debug!(tag, "tag served from store");
                return Ok(Lookup::Cached(info));
            }
        }

        let Some(info) = self.fetcher.tag_info(tag).await else {
            return Ok(Lookup::Unavailable);
        };

        self.entries
            .insert_one(Document::new(DocumentBody::Tag {
                tag: tag.to_string(),
                info: info.clone(),
            }))
            .await?;

        Ok(Lookup::Fresh(info))
    }

    pub async fn album_info(&self, artist: &str, album: &str) -> Result<Lookup<AlbumInfo>> {
        let key = StoreKey::Album {
            artist: artist.to_string(),
            album: album.to_string(),
        };

        if let Some(doc) = self.entries.find_one(&key).await {
            if let DocumentBody::Album { info, .. } = doc.body {
                debug!(artist, album, "album served from store");
                return Ok(Lookup::Cached(info));
            }
        }

        let Some(info) = self.fetcher.album_info(artist, album).await else {
            return Ok(Lookup::Unavailable);
        };

        self.entries
            .insert_one(Document::new(DocumentBody::Album {
                artist: artist.to_string(),
                album: album.to_string(),
                info: info.clone(),
            }))
            .await?;

        Ok(Lookup::Fresh(info))
    }

    pub async fn country_trends(&self, country: &str) -> Result<Lookup<CountryTrends>> {
        let key = StoreKey::Country(country.to_string());

        if let Some(doc) = self.entries.find_one(&key).await {
            if let DocumentBody::Country {
                country: cached_country,
                top_tracks,
                top_artists,
            } = doc.body
            {
                debug!(country, "country trends served from store");
                return Ok(Lookup::Cached(CountryTrends {
                    country: cached_country,
                    top_tracks,
                    top_artists,
                }));
            }
        }

        let Some((top_tracks, top_artists)) = self.fetcher.country_trends(country).await else {
            return Ok(Lookup::Unavailable);
        };

        self.entries
            .insert_one(Document::new(DocumentBody::Country {
                country: country.to_string(),
                top_tracks: top_tracks.clone(),
                top_artists: top_artists.clone(),
            }))
            .await?;

        Ok(Lookup::Fresh(CountryTrends {
            country: country.to_string(),
            top_tracks,
            top_artists,
        }))
    }

    /// Always fetches: artist pages aggregate four upstream calls and are
    /// never read back from the store.
    pub async fn artist_overview(&self, artist: &str) -> Lookup<ArtistOverview> {
        match self.fetcher.artist_overview(artist).await {
            Some(overview) => Lookup::Fresh(overview),
            None => Lookup::Unavailable,
        }
    }

    /// Always fetches; unavailable only when every chart fails.
    pub async fn global_trends(&self) -> Lookup<GlobalTrends> {
        match self.fetcher.global_trends().await {
            Some(trends) => Lookup::Fresh(trends),
            None => Lookup::Unavailable,
        }
    }

    pub async fn submit_review(&self, review: Review) -> Result<Uuid> {
        self.reviews
            .insert_one(Document::new(DocumentBody::Review(review)))
            .await
    }

    /// Reviews for one item, in insertion order.
    pub async fn reviews_for(&self, kind: ReviewKind, item_id: Uuid) -> Vec<Review> {
        self.reviews
            .find_many(&StoreKey::Reviews { kind, item_id })
            .await
            .into_iter()
            .filter_map(|doc| match doc.body {
                DocumentBody::Review(review) => Some(review),
                _ => None,
            })
            .collect()
    }
}
