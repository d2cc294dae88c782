use serde::de::DeserializeOwned;
use serde_json::json;

use super::{id_path, PageParams};
use crate::{client::ReadWriteClient, encoding::QueryParams, error::Result};

/// Album endpoints, including the current user's saved albums.
#[derive(Debug, Clone)]
pub struct Albums {
    client: ReadWriteClient,
}

impl Albums {
    pub(crate) fn new(client: ReadWriteClient) -> Self {
        Self { client }
    }

    pub async fn get<T>(&self, id: &str, market: Option<&str>) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let params = QueryParams::new().insert("market", market);
        self.client.get(&id_path("albums", id), Some(&params), None).await
    }

    /// Get several albums at once. Spotify allows at most 20 IDs.
    pub async fn get_several<T>(&self, ids: &[&str], market: Option<&str>) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let params = QueryParams::new().insert("ids", ids).insert("market", market);
        self.client.get("albums", Some(&params), None).await
    }

    pub async fn tracks<T>(&self, id: &str, market: Option<&str>, page: PageParams) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let params = page.apply(QueryParams::new().insert("market", market));
        self.client
            .get(&format!("{}/tracks", id_path("albums", id)), Some(&params), None)
            .await
    }

    pub async fn saved<T>(&self, market: Option<&str>, page: PageParams) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let params = page.apply(QueryParams::new().insert("market", market));
        self.client.get("me/albums", Some(&params), None).await
    }

    pub async fn save(&self, ids: &[&str]) -> Result<()> {
        self.client.put("me/albums", Some(json!({ "ids": ids })), None).await
    }

    pub async fn remove_saved(&self, ids: &[&str]) -> Result<()> {
        self.client.delete("me/albums", Some(json!({ "ids": ids })), None).await
    }

    /// Check whether the given albums are in the user's library. The result has one entry per ID, in order.
    pub async fn contains_saved(&self, ids: &[&str]) -> Result<Vec<bool>> {
        let params = QueryParams::new().insert("ids", ids);
        self.client.get("me/albums/contains", Some(&params), None).await
    }
}
