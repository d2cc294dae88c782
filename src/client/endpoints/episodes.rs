use serde::de::DeserializeOwned;
use serde_json::json;

use super::{id_path, PageParams};
use crate::{client::ReadWriteClient, encoding::QueryParams, error::Result};

#[derive(Debug, Clone)]
pub struct Episodes {
    client: ReadWriteClient,
}

impl Episodes {
    pub(crate) fn new(client: ReadWriteClient) -> Self {
        Self { client }
    }

    pub async fn get<T>(&self, id: &str, market: Option<&str>) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let params = QueryParams::new().insert("market", market);
        self.client.get(&id_path("episodes", id), Some(&params), None).await
    }

    pub async fn get_several<T>(&self, ids: &[&str], market: Option<&str>) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let params = QueryParams::new().insert("ids", ids).insert("market", market);
        self.client.get("episodes", Some(&params), None).await
    }

    pub async fn saved<T>(&self, market: Option<&str>, page: PageParams) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let params = page.apply(QueryParams::new().insert("market", market));
        self.client.get("me/episodes", Some(&params), None).await
    }

    pub async fn save(&self, ids: &[&str]) -> Result<()> {
        self.client.put("me/episodes", Some(json!({ "ids": ids })), None).await
    }

    pub async fn remove_saved(&self, ids: &[&str]) -> Result<()> {
        self.client.delete("me/episodes", Some(json!({ "ids": ids })), None).await
    }

    pub async fn contains_saved(&self, ids: &[&str]) -> Result<Vec<bool>> {
        let params = QueryParams::new().insert("ids", ids);
        self.client.get("me/episodes/contains", Some(&params), None).await
    }
}
