use serde::de::DeserializeOwned;

use super::{id_path, with_query, PageParams};
use crate::{client::ReadWriteClient, encoding::QueryParams, error::Result};

/// Show (podcast) endpoints. Unlike the other saved-item endpoints, saving and removing shows takes the IDs in the
/// query.
#[derive(Debug, Clone)]
pub struct Shows {
    client: ReadWriteClient,
}

impl Shows {
    pub(crate) fn new(client: ReadWriteClient) -> Self {
        Self { client }
    }

    pub async fn get<T>(&self, id: &str, market: Option<&str>) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let params = QueryParams::new().insert("market", market);
        self.client.get(&id_path("shows", id), Some(&params), None).await
    }

    pub async fn get_several<T>(&self, ids: &[&str], market: Option<&str>) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let params = QueryParams::new().insert("ids", ids).insert("market", market);
        self.client.get("shows", Some(&params), None).await
    }

    pub async fn episodes<T>(&self, id: &str, market: Option<&str>, page: PageParams) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let params = page.apply(QueryParams::new().insert("market", market));
        self.client
            .get(&format!("{}/episodes", id_path("shows", id)), Some(&params), None)
            .await
    }

    pub async fn saved<T>(&self, page: PageParams) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let params = page.apply(QueryParams::new());
        self.client.get("me/shows", Some(&params), None).await
    }

    pub async fn save(&self, ids: &[&str]) -> Result<()> {
        let params = QueryParams::new().insert("ids", ids);
        self.client.put(&with_query("me/shows", &params), None, None).await
    }

    pub async fn remove_saved(&self, ids: &[&str], market: Option<&str>) -> Result<()> {
        let params = QueryParams::new().insert("ids", ids).insert("market", market);
        self.client.delete(&with_query("me/shows", &params), None, None).await
    }

    pub async fn contains_saved(&self, ids: &[&str]) -> Result<Vec<bool>> {
        let params = QueryParams::new().insert("ids", ids);
        self.client.get("me/shows/contains", Some(&params), None).await
    }
}
