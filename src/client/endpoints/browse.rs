use serde::de::DeserializeOwned;

use super::{id_path, PageParams};
use crate::{client::ReadWriteClient, encoding::QueryParams, error::Result};

/// Browse endpoints: categories, featured playlists, new releases, markets and genre seeds.
#[derive(Debug, Clone)]
pub struct Browse {
    client: ReadWriteClient,
}

impl Browse {
    pub(crate) fn new(client: ReadWriteClient) -> Self {
        Self { client }
    }

    pub async fn categories<T>(&self, locale: Option<&str>, page: PageParams) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let params = page.apply(QueryParams::new().insert("locale", locale));
        self.client.get("browse/categories", Some(&params), None).await
    }

    pub async fn category<T>(&self, id: &str, locale: Option<&str>) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let params = QueryParams::new().insert("locale", locale);
        self.client
            .get(&id_path("browse/categories", id), Some(&params), None)
            .await
    }

    pub async fn category_playlists<T>(&self, id: &str, page: PageParams) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let params = page.apply(QueryParams::new());
        self.client
            .get(
                &format!("{}/playlists", id_path("browse/categories", id)),
                Some(&params),
                None,
            )
            .await
    }

    pub async fn featured_playlists<T>(&self, locale: Option<&str>, page: PageParams) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let params = page.apply(QueryParams::new().insert("locale", locale));
        self.client.get("browse/featured-playlists", Some(&params), None).await
    }

    pub async fn new_releases<T>(&self, page: PageParams) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let params = page.apply(QueryParams::new());
        self.client.get("browse/new-releases", Some(&params), None).await
    }

    /// The markets (ISO 3166-1 alpha-2 country codes) where Spotify is available.
    pub async fn markets<T>(&self) -> Result<T>
    where
        T: DeserializeOwned,
    {
        self.client.get("markets", None, None).await
    }

    pub async fn genre_seeds<T>(&self) -> Result<T>
    where
        T: DeserializeOwned,
    {
        self.client.get("recommendations/available-genre-seeds", None, None).await
    }
}
