use std::sync::Arc;

use serde_json::Value;
use tracing::warn;

use crate::lastfm::{
    AlbumResponse, ArtistSearchResponse, ArtistTopAlbumsResponse, ArtistTopTracksResponse,
    ChartTopArtistsResponse, ChartTopTagsResponse, ChartTopTracksResponse, GeoTopArtistsResponse,
    GeoTopTracksResponse, LastfmApi, RawAlbum, RawChartArtist, RawChartTag, RawChartTrack,
    RawSimilarArtist, RawTopAlbum, SimilarArtistsResponse, TagResponse,
};
use crate::models::{
    AlbumInfo, ArtistOverview, ChartArtist, ChartTag, ChartTrack, GlobalTrends, SimilarArtist,
    TagInfo, TopAlbum, TrackInfo,
};
use crate::rate_limit::RateLimiter;

/// Issues rate-limited upstream calls and normalizes the responses.
///
/// Fetches never raise: a failed or malformed response becomes `None`, which
/// the resolver reports as an unavailable lookup. A single attempt per call,
/// no retries.
pub struct ApiFetcher {
    api: Arc<dyn LastfmApi>,
    limiter: Arc<RateLimiter>,
}

impl ApiFetcher {
    pub fn new(api: Arc<dyn LastfmApi>, limiter: Arc<RateLimiter>) -> Self {
        Self { api, limiter }
    }

    /// Every upstream call funnels through here so the rate gate covers all
    /// of them, whichever lookup kind triggered the request.
    async fn call(&self, method: &str, params: &[(&str, &str)]) -> Option<Value> {
        self.limiter.acquire().await;
        match self.api.request(method, params).await {
            Ok(body) => Some(body),
            Err(e) => {
                warn!(method, error = %e, "upstream request failed");
                None
            }
        }
    }

    pub async fn tag_info(&self, tag: &str) -> Option<TagInfo> {
        let body = self.call("tag.getInfo", &[("tag", tag)]).await?;
        let response: TagResponse = serde_json::from_value(body).ok()?;

        let wiki = response.tag.wiki.unwrap_or_default();
        Some(TagInfo {
            wiki_summary: wiki.summary.unwrap_or_default(),
            wiki_content: wiki.content.unwrap_or_default(),
        })
    }

    pub async fn album_info(&self, artist: &str, album: &str) -> Option<AlbumInfo> {
        let body = self
            .call("album.getInfo", &[("artist", artist), ("album", album)])
            .await?;
        let response: AlbumResponse = serde_json::from_value(body).ok()?;
        Some(normalize_album(response.album))
    }

    /// Both charts have to come back for the country page to be cacheable;
    /// a partial result is treated as no result.
    pub async fn country_trends(
        &self,
        country: &str,
    ) -> Option<(Vec<ChartTrack>, Vec<ChartArtist>)> {
        let params = [("country", country)];

        let tracks_body = self.call("geo.getTopTracks", &params).await?;
        let artists_body = self.call("geo.getTopArtists", &params).await?;

        let tracks: GeoTopTracksResponse = serde_json::from_value(tracks_body).ok()?;
        let artists: GeoTopArtistsResponse = serde_json::from_value(artists_body).ok()?;

        Some((
            tracks.tracks.track.into_iter().map(chart_track).collect(),
            artists
                .topartists
                .artist
                .into_iter()
                .map(chart_artist)
                .collect(),
        ))
    }

    pub async fn artist_overview(&self, artist: &str) -> Option<ArtistOverview> {
        let params = [("artist", artist)];

        let top_tracks = self
            .call("artist.getTopTracks", &params)
            .await
            .and_then(|body| serde_json::from_value::<ArtistTopTracksResponse>(body).ok());
        let top_albums = self
            .call("artist.getTopAlbums", &params)
            .await
            .and_then(|body| serde_json::from_value::<ArtistTopAlbumsResponse>(body).ok());
        let similar = self
            .call("artist.getSimilar", &params)
            .await
            .and_then(|body| serde_json::from_value::<SimilarArtistsResponse>(body).ok());
        let search = self
            .call("artist.search", &params)
            .await
            .and_then(|body| serde_json::from_value::<ArtistSearchResponse>(body).ok());

        // Top tracks and top albums are required; similar artists and the
        // photo just enrich the page.
        let top_tracks = top_tracks?;
        let top_albums = top_albums?;

        Some(ArtistOverview {
            name: artist.to_string(),
            top_tracks: top_tracks
                .toptracks
                .track
                .into_iter()
                .map(chart_track)
                .collect(),
            top_albums: top_albums
                .topalbums
                .album
                .into_iter()
                .map(top_album)
                .collect(),
            similar: similar
                .map(|response| {
                    response
                        .similarartists
                        .artist
                        .into_iter()
                        .map(similar_artist)
                        .collect()
                })
                .unwrap_or_default(),
            photo_url: search.as_ref().and_then(artist_photo),
        })
    }

    pub async fn global_trends(&self) -> Option<GlobalTrends> {
        let top_artists = self
            .call("chart.getTopArtists", &[])
            .await
            .and_then(|body| serde_json::from_value::<ChartTopArtistsResponse>(body).ok())
            .map(|response| {
                response
                    .artists
                    .artist
                    .into_iter()
                    .map(chart_artist)
                    .collect::<Vec<_>>()
            });
        let top_tracks = self
            .call("chart.getTopTracks", &[])
            .await
            .and_then(|body| serde_json::from_value::<ChartTopTracksResponse>(body).ok())
            .map(|response| {
                response
                    .tracks
                    .track
                    .into_iter()
                    .map(chart_track)
                    .collect::<Vec<_>>()
            });
        let top_tags = self
            .call("chart.getTopTags", &[])
            .await
            .and_then(|body| serde_json::from_value::<ChartTopTagsResponse>(body).ok())
            .map(|response| {
                response
                    .tags
                    .tag
                    .into_iter()
                    .map(chart_tag)
                    .collect::<Vec<_>>()
            });

        if top_artists.is_none() && top_tracks.is_none() && top_tags.is_none() {
            return None;
        }

        Some(GlobalTrends {
            top_artists,
            top_tracks,
            top_tags,
        })
    }
}

/// Flattens the raw track list and derives the album totals: summed track
/// seconds floored to minutes (zero sum means the total is unknown) and the
/// wiki publication date when present.
pub(crate) fn normalize_album(raw: RawAlbum) -> AlbumInfo {
    let tracks: Vec<TrackInfo> = raw
        .tracks
        .unwrap_or_default()
        .track
        .into_iter()
        .map(|track| TrackInfo {
            number: track.attr.and_then(|attr| attr.rank),
            name: track.name,
            duration_seconds: track.duration,
        })
        .collect();

    let total_seconds: u64 = tracks.iter().map(|track| track.duration_seconds).sum();
    let total_duration_minutes = (total_seconds > 0).then(|| total_seconds / 60);

    AlbumInfo {
        name: raw.name,
        artist: raw.artist,
        url: raw.url,
        release_date: raw.wiki.and_then(|wiki| wiki.published),
        total_duration_minutes,
        tracks,
    }
}

fn chart_track(raw: RawChartTrack) -> ChartTrack {
    ChartTrack {
        name: raw.name,
        artist: raw.artist.map(|artist| artist.name),
        url: raw.url,
        listeners: raw.listeners,
        playcount: raw.playcount,
    }
}

fn chart_artist(raw: RawChartArtist) -> ChartArtist {
    ChartArtist {
        name: raw.name,
        url: raw.url,
        listeners: raw.listeners,
        playcount: raw.playcount,
    }
}

fn chart_tag(raw: RawChartTag) -> ChartTag {
    ChartTag {
        name: raw.name,
        url: raw.url,
        taggings: raw.taggings,
    }
}

fn top_album(raw: RawTopAlbum) -> TopAlbum {
    TopAlbum {
        name: raw.name,
        artist: raw.artist.map(|artist| artist.name),
        url: raw.url,
        playcount: raw.playcount,
    }
}

fn similar_artist(raw: RawSimilarArtist) -> SimilarArtist {
    SimilarArtist {
        name: raw.name,
        url: raw.url,
        similarity: raw.similarity,
    }
}

fn artist_photo(response: &ArtistSearchResponse) -> Option<String> {
    let matched = response.results.artistmatches.artist.first()?;
    matched
        .image
        .iter()
        .find(|image| image.size == "large" || image.size == "medium")
        .map(|image| image.url.clone())
        .filter(|url| !url.is_empty())
}
