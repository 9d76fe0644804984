use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rustc_hash::FxHashMap;
use serde_json::{Value, json};
use tokio::sync::Mutex;

use fmcache::{Error, LastfmApi, MemoryStore, RateLimiter, Resolver};

pub enum Scripted {
    Body(Value),
    Status(u16),
}

/// Scripted transport: responses are keyed by API method and every call is
/// recorded for assertions. Methods with no script answer 404.
pub struct ScriptedApi {
    responses: FxHashMap<String, Scripted>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedApi {
    pub fn new() -> Self {
        Self {
            responses: FxHashMap::default(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_body(mut self, method: &str, body: Value) -> Self {
        self.responses
            .insert(method.to_string(), Scripted::Body(body));
        self
    }

    pub fn with_status(mut self, method: &str, status: u16) -> Self {
        self.responses
            .insert(method.to_string(), Scripted::Status(status));
        self
    }

    pub async fn calls(&self) -> Vec<String> {
        self.calls.lock().await.clone()
    }

    pub async fn call_count(&self) -> usize {
        self.calls.lock().await.len()
    }
}

#[async_trait]
impl LastfmApi for ScriptedApi {
    async fn request(&self, method: &str, _params: &[(&str, &str)]) -> fmcache::Result<Value> {
        self.calls.lock().await.push(method.to_string());
        match self.responses.get(method) {
            Some(Scripted::Body(body)) => Ok(body.clone()),
            Some(Scripted::Status(code)) => Err(Error::UpstreamStatus(*code)),
            None => Err(Error::UpstreamStatus(404)),
        }
    }
}

pub struct TestHarness {
    pub resolver: Resolver,
    pub entries: Arc<MemoryStore>,
    pub reviews: Arc<MemoryStore>,
    pub api: Arc<ScriptedApi>,
}

/// Resolver wired to in-memory stores, the scripted transport, and a zero
/// minimum interval so tests run at full speed while still passing through
/// the gate.
pub fn harness(api: ScriptedApi) -> TestHarness {
    let api = Arc::new(api);
    let entries = Arc::new(MemoryStore::new());
    let reviews = Arc::new(MemoryStore::new());
    let limiter = Arc::new(RateLimiter::new(Duration::ZERO));
    let resolver = Resolver::new(
        entries.clone(),
        reviews.clone(),
        api.clone(),
        limiter,
    );

    TestHarness {
        resolver,
        entries,
        reviews,
        api,
    }
}

pub fn rock_tag_body() -> Value {
    json!({"tag": {"name": "rock", "wiki": {"summary": "S", "content": "C"}}})
}

pub fn discovery_album_body() -> Value {
    json!({"album": {
        "name": "Discovery",
        "artist": "Daft Punk",
        "url": "https://www.last.fm/music/Daft+Punk/Discovery",
        "wiki": {"published": "26 Feb 2001, 00:00"},
        "tracks": {"track": [
            {"name": "One More Time", "duration": "180", "@attr": {"rank": "1"}},
            {"name": "Aerodynamic", "duration": null, "@attr": {"rank": "2"}},
            {"name": "Digital Love", "duration": "240", "@attr": {"rank": "3"}},
        ]},
    }})
}

pub fn geo_tracks_body() -> Value {
    json!({"tracks": {"track": [
        {"name": "Alive", "listeners": "1000", "url": "https://example/alive",
         "artist": {"name": "Daft Punk"}},
    ]}})
}

pub fn geo_artists_body() -> Value {
    json!({"topartists": {"artist": [
        {"name": "Daft Punk", "listeners": "2000", "url": "https://example/dp"},
    ]}})
}

pub fn artist_top_tracks_body() -> Value {
    json!({"toptracks": {"track": [
        {"name": "Get Lucky", "playcount": "500", "listeners": "300",
         "url": "https://example/get-lucky"},
    ]}})
}

pub fn artist_top_albums_body() -> Value {
    json!({"topalbums": {"album": [
        {"name": "Random Access Memories", "playcount": 12345,
         "url": "https://example/ram", "artist": {"name": "Daft Punk"}},
    ]}})
}

pub fn similar_artists_body() -> Value {
    json!({"similarartists": {"artist": [
        {"name": "Justice", "match": "0.87", "url": "https://example/justice"},
    ]}})
}

pub fn artist_search_body() -> Value {
    json!({"results": {"artistmatches": {"artist": [
        {"name": "Daft Punk", "image": [
            {"#text": "", "size": "small"},
            {"#text": "https://img.example/dp-large.png", "size": "large"},
        ]},
    ]}}})
}

pub fn chart_artists_body() -> Value {
    json!({"artists": {"artist": [
        {"name": "Kraftwerk", "playcount": "900", "listeners": "400"},
    ]}})
}

pub fn chart_tracks_body() -> Value {
    json!({"tracks": {"track": [
        {"name": "The Model", "playcount": "800", "listeners": "350",
         "artist": {"name": "Kraftwerk"}},
    ]}})
}

pub fn chart_tags_body() -> Value {
    json!({"tags": {"tag": [
        {"name": "electronic", "url": "https://example/electronic", "taggings": "12000"},
    ]}})
}
