//! Player endpoints. All of them require Spotify Premium and a token with the `user-read-playback-state` or
//! `user-modify-playback-state` scope.

use std::fmt::Display;

use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};

use super::with_query;
use crate::{client::ReadWriteClient, encoding::QueryParams, error::Result};

const DEVICE_ID_QUERY: &str = "device_id";

#[derive(Debug, Clone)]
pub struct Player {
    client: ReadWriteClient,
}

/// The repeat mode of the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepeatState {
    Track,
    Context,
    Off,
}

impl Display for RepeatState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            RepeatState::Track => "track",
            RepeatState::Context => "context",
            RepeatState::Off => "off",
        })
    }
}

impl Player {
    pub(crate) fn new(client: ReadWriteClient) -> Self {
        Self { client }
    }

    /// The current playback state. Spotify responds with an empty body if nothing is playing, so use an `Option` for
    /// `T`.
    pub async fn playback_state<T>(&self, market: Option<&str>) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let params = QueryParams::new().insert("market", market);
        self.client.get("me/player", Some(&params), None).await
    }

    pub async fn currently_playing<T>(&self, market: Option<&str>) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let params = QueryParams::new().insert("market", market);
        self.client
            .get("me/player/currently-playing", Some(&params), None)
            .await
    }

    pub async fn devices<T>(&self) -> Result<T>
    where
        T: DeserializeOwned,
    {
        self.client.get("me/player/devices", None, None).await
    }

    pub async fn recently_played<T>(&self, limit: Option<u32>, after: Option<u64>, before: Option<u64>) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let params = QueryParams::new()
            .insert("limit", limit)
            .insert("after", after)
            .insert("before", before);

        self.client.get("me/player/recently-played", Some(&params), None).await
    }

    pub async fn queue<T>(&self) -> Result<T>
    where
        T: DeserializeOwned,
    {
        self.client.get("me/player/queue", None, None).await
    }

    /// Transfer playback to another device. Only one device ID is currently supported by Spotify.
    pub async fn transfer(&self, device_id: &str, play: Option<bool>) -> Result<()> {
        let mut body = Map::new();
        body.insert("device_ids".to_owned(), json!([device_id]));

        if let Some(play) = play {
            body.insert("play".to_owned(), json!(play));
        }

        self.client.put("me/player", Some(Value::Object(body)), None).await
    }

    /// Resume playback.
    pub async fn resume(&self, device_id: Option<&str>) -> Result<()> {
        self.client
            .put(&device_path("me/player/play", device_id), None, None)
            .await
    }

    /// Start playing a context (an album, artist or playlist), optionally starting from a given position in it.
    pub async fn play_context(&self, context_uri: &str, offset: Option<u32>, device_id: Option<&str>) -> Result<()> {
        let mut body = Map::new();
        body.insert("context_uri".to_owned(), json!(context_uri));

        if let Some(position) = offset {
            body.insert("offset".to_owned(), json!({ "position": position }));
        }

        self.client
            .put(&device_path("me/player/play", device_id), Some(Value::Object(body)), None)
            .await
    }

    /// Start playing a list of tracks or episodes.
    pub async fn play_items(&self, uris: &[&str], device_id: Option<&str>) -> Result<()> {
        self.client
            .put(
                &device_path("me/player/play", device_id),
                Some(json!({ "uris": uris })),
                None,
            )
            .await
    }

    pub async fn pause(&self, device_id: Option<&str>) -> Result<()> {
        self.client
            .put(&device_path("me/player/pause", device_id), None, None)
            .await
    }

    pub async fn next(&self, device_id: Option<&str>) -> Result<()> {
        self.client
            .post(&device_path("me/player/next", device_id), None, None)
            .await
    }

    pub async fn previous(&self, device_id: Option<&str>) -> Result<()> {
        self.client
            .post(&device_path("me/player/previous", device_id), None, None)
            .await
    }

    pub async fn seek(&self, position_ms: u64, device_id: Option<&str>) -> Result<()> {
        let params = QueryParams::new()
            .insert("position_ms", position_ms)
            .insert(DEVICE_ID_QUERY, device_id);

        self.client.put(&with_query("me/player/seek", &params), None, None).await
    }

    pub async fn repeat(&self, state: RepeatState, device_id: Option<&str>) -> Result<()> {
        let params = QueryParams::new()
            .insert("state", state.to_string())
            .insert(DEVICE_ID_QUERY, device_id);

        self.client.put(&with_query("me/player/repeat", &params), None, None).await
    }

    pub async fn shuffle(&self, state: bool, device_id: Option<&str>) -> Result<()> {
        let params = QueryParams::new()
            .insert("state", state)
            .insert(DEVICE_ID_QUERY, device_id);

        self.client.put(&with_query("me/player/shuffle", &params), None, None).await
    }

    /// Set the volume. Spotify accepts 0 to 100 and rejects anything else.
    pub async fn volume(&self, volume_percent: u8, device_id: Option<&str>) -> Result<()> {
        let params = QueryParams::new()
            .insert("volume_percent", volume_percent)
            .insert(DEVICE_ID_QUERY, device_id);

        self.client.put(&with_query("me/player/volume", &params), None, None).await
    }

    /// Add a track or an episode to the end of the queue.
    pub async fn add_to_queue(&self, uri: &str, device_id: Option<&str>) -> Result<()> {
        let params = QueryParams::new().insert("uri", uri).insert(DEVICE_ID_QUERY, device_id);
        self.client.post(&with_query("me/player/queue", &params), None, None).await
    }
}

fn device_path(path: &str, device_id: Option<&str>) -> String {
    with_query(path, &QueryParams::new().insert(DEVICE_ID_QUERY, device_id))
}
