use serde::de::DeserializeOwned;

use super::{id_path, PageParams};
use crate::{client::ReadWriteClient, encoding::QueryParams, error::Result};

#[derive(Debug, Clone)]
pub struct Artists {
    client: ReadWriteClient,
}

impl Artists {
    pub(crate) fn new(client: ReadWriteClient) -> Self {
        Self { client }
    }

    pub async fn get<T>(&self, id: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        self.client.get(&id_path("artists", id), None, None).await
    }

    pub async fn get_several<T>(&self, ids: &[&str]) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let params = QueryParams::new().insert("ids", ids);
        self.client.get("artists", Some(&params), None).await
    }

    /// Get an artist's albums. `include_groups` filters by album group, for example `["album", "single"]`; all groups
    /// are returned if it's empty.
    pub async fn albums<T>(
        &self,
        id: &str,
        include_groups: &[&str],
        market: Option<&str>,
        page: PageParams,
    ) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let include_groups = (!include_groups.is_empty()).then_some(include_groups);
        let params = page.apply(
            QueryParams::new()
                .insert("include_groups", include_groups)
                .insert("market", market),
        );

        self.client
            .get(&format!("{}/albums", id_path("artists", id)), Some(&params), None)
            .await
    }

    pub async fn top_tracks<T>(&self, id: &str, market: Option<&str>) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let params = QueryParams::new().insert("market", market);
        self.client
            .get(&format!("{}/top-tracks", id_path("artists", id)), Some(&params), None)
            .await
    }

    pub async fn related_artists<T>(&self, id: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        self.client
            .get(&format!("{}/related-artists", id_path("artists", id)), None, None)
            .await
    }
}
