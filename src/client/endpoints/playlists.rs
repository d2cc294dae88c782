use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};

use super::{id_path, PageParams};
use crate::{client::ReadWriteClient, encoding::QueryParams, error::Result};

/// Playlist endpoints. Methods that modify a playlist's items return Spotify's snapshot object, which holds the
/// playlist's new `snapshot_id`.
#[derive(Debug, Clone)]
pub struct Playlists {
    client: ReadWriteClient,
}

impl Playlists {
    pub(crate) fn new(client: ReadWriteClient) -> Self {
        Self { client }
    }

    /// Get a playlist. `fields` selects a subset of the playlist's fields, for example `name,tracks.items(track.id)`.
    pub async fn get<T>(&self, id: &str, market: Option<&str>, fields: Option<&str>) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let params = QueryParams::new().insert("market", market).insert("fields", fields);
        self.client.get(&id_path("playlists", id), Some(&params), None).await
    }

    pub async fn items<T>(&self, id: &str, market: Option<&str>, fields: Option<&str>, page: PageParams) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let params = page.apply(QueryParams::new().insert("market", market).insert("fields", fields));
        self.client
            .get(&format!("{}/tracks", id_path("playlists", id)), Some(&params), None)
            .await
    }

    /// Add items by their Spotify URIs. They're appended unless `position` is given.
    pub async fn add_items<T>(&self, id: &str, uris: &[&str], position: Option<u32>) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let mut body = Map::new();
        body.insert("uris".to_owned(), json!(uris));

        if let Some(position) = position {
            body.insert("position".to_owned(), json!(position));
        }

        self.client
            .post(
                &format!("{}/tracks", id_path("playlists", id)),
                Some(Value::Object(body)),
                None,
            )
            .await
    }

    /// Replace all of the playlist's items.
    pub async fn replace_items<T>(&self, id: &str, uris: &[&str]) -> Result<T>
    where
        T: DeserializeOwned,
    {
        self.client
            .put(
                &format!("{}/tracks", id_path("playlists", id)),
                Some(json!({ "uris": uris })),
                None,
            )
            .await
    }

    /// Move `range_length` items starting at `range_start` to before the item at `insert_before`.
    pub async fn reorder_items<T>(
        &self,
        id: &str,
        range_start: u32,
        insert_before: u32,
        range_length: Option<u32>,
        snapshot_id: Option<&str>,
    ) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let mut body = Map::new();
        body.insert("range_start".to_owned(), json!(range_start));
        body.insert("insert_before".to_owned(), json!(insert_before));

        if let Some(range_length) = range_length {
            body.insert("range_length".to_owned(), json!(range_length));
        }

        if let Some(snapshot_id) = snapshot_id {
            body.insert("snapshot_id".to_owned(), json!(snapshot_id));
        }

        self.client
            .put(
                &format!("{}/tracks", id_path("playlists", id)),
                Some(Value::Object(body)),
                None,
            )
            .await
    }

    pub async fn remove_items<T>(&self, id: &str, uris: &[&str], snapshot_id: Option<&str>) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let tracks: Vec<Value> = uris.iter().map(|uri| json!({ "uri": uri })).collect();

        let mut body = Map::new();
        body.insert("tracks".to_owned(), Value::Array(tracks));

        if let Some(snapshot_id) = snapshot_id {
            body.insert("snapshot_id".to_owned(), json!(snapshot_id));
        }

        self.client
            .delete(
                &format!("{}/tracks", id_path("playlists", id)),
                Some(Value::Object(body)),
                None,
            )
            .await
    }

    /// Change a playlist's name, description, public or collaborative status. `details` is sent as-is.
    pub async fn change_details(&self, id: &str, details: Value) -> Result<()> {
        self.client.put(&id_path("playlists", id), Some(details), None).await
    }

    pub async fn create<T>(
        &self,
        user_id: &str,
        name: &str,
        public: Option<bool>,
        collaborative: Option<bool>,
        description: Option<&str>,
    ) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let mut body = Map::new();
        body.insert("name".to_owned(), json!(name));

        if let Some(public) = public {
            body.insert("public".to_owned(), json!(public));
        }

        if let Some(collaborative) = collaborative {
            body.insert("collaborative".to_owned(), json!(collaborative));
        }

        if let Some(description) = description {
            body.insert("description".to_owned(), json!(description));
        }

        self.client
            .post(
                &format!("{}/playlists", id_path("users", user_id)),
                Some(Value::Object(body)),
                None,
            )
            .await
    }

    pub async fn current_user_playlists<T>(&self, page: PageParams) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let params = page.apply(QueryParams::new());
        self.client.get("me/playlists", Some(&params), None).await
    }

    pub async fn user_playlists<T>(&self, user_id: &str, page: PageParams) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let params = page.apply(QueryParams::new());
        self.client
            .get(&format!("{}/playlists", id_path("users", user_id)), Some(&params), None)
            .await
    }

    pub async fn follow(&self, id: &str, public: bool) -> Result<()> {
        self.client
            .put(
                &format!("{}/followers", id_path("playlists", id)),
                Some(json!({ "public": public })),
                None,
            )
            .await
    }

    pub async fn unfollow(&self, id: &str) -> Result<()> {
        self.client
            .delete(&format!("{}/followers", id_path("playlists", id)), None, None)
            .await
    }

    pub async fn cover_image<T>(&self, id: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        self.client
            .get(&format!("{}/images", id_path("playlists", id)), None, None)
            .await
    }
}
