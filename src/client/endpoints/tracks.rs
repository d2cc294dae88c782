use serde::de::DeserializeOwned;
use serde_json::json;

use super::{id_path, PageParams};
use crate::{client::ReadWriteClient, encoding::QueryParams, error::Result};

/// Track endpoints, including the current user's saved tracks, audio features and recommendations.
#[derive(Debug, Clone)]
pub struct Tracks {
    client: ReadWriteClient,
}

impl Tracks {
    pub(crate) fn new(client: ReadWriteClient) -> Self {
        Self { client }
    }

    pub async fn get<T>(&self, id: &str, market: Option<&str>) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let params = QueryParams::new().insert("market", market);
        self.client.get(&id_path("tracks", id), Some(&params), None).await
    }

    /// Get several tracks at once. Spotify allows at most 50 IDs.
    pub async fn get_several<T>(&self, ids: &[&str], market: Option<&str>) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let params = QueryParams::new().insert("ids", ids).insert("market", market);
        self.client.get("tracks", Some(&params), None).await
    }

    pub async fn saved<T>(&self, market: Option<&str>, page: PageParams) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let params = page.apply(QueryParams::new().insert("market", market));
        self.client.get("me/tracks", Some(&params), None).await
    }

    pub async fn save(&self, ids: &[&str]) -> Result<()> {
        self.client.put("me/tracks", Some(json!({ "ids": ids })), None).await
    }

    pub async fn remove_saved(&self, ids: &[&str]) -> Result<()> {
        self.client.delete("me/tracks", Some(json!({ "ids": ids })), None).await
    }

    pub async fn contains_saved(&self, ids: &[&str]) -> Result<Vec<bool>> {
        let params = QueryParams::new().insert("ids", ids);
        self.client.get("me/tracks/contains", Some(&params), None).await
    }

    pub async fn audio_features<T>(&self, id: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        self.client.get(&id_path("audio-features", id), None, None).await
    }

    pub async fn several_audio_features<T>(&self, ids: &[&str]) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let params = QueryParams::new().insert("ids", ids);
        self.client.get("audio-features", Some(&params), None).await
    }

    pub async fn audio_analysis<T>(&self, id: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        self.client.get(&id_path("audio-analysis", id), None, None).await
    }

    /// Get recommendations. The seeds (`seed_artists`, `seed_genres`, `seed_tracks`) and any tunable attributes
    /// (`target_energy`, `min_tempo` and so on) are given as-is.
    pub async fn recommendations<T>(&self, params: &QueryParams) -> Result<T>
    where
        T: DeserializeOwned,
    {
        self.client.get("recommendations", Some(params), None).await
    }
}
