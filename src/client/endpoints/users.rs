use std::fmt::Display;

use serde::de::DeserializeOwned;

use super::{id_path, with_query, PageParams};
use crate::{client::ReadWriteClient, encoding::QueryParams, error::Result};

/// User profile, top items and follow endpoints.
#[derive(Debug, Clone)]
pub struct Users {
    client: ReadWriteClient,
}

/// The kind of items in a user's top items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopItemType {
    Artists,
    Tracks,
}

/// Over what time frame a user's top items are calculated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeRange {
    /// Approximately the last year.
    LongTerm,
    /// Approximately the last 6 months. Spotify's default.
    MediumTerm,
    /// Approximately the last 4 weeks.
    ShortTerm,
}

/// What kind of IDs the follow endpoints operate on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowType {
    Artist,
    User,
}

impl Display for TopItemType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            TopItemType::Artists => "artists",
            TopItemType::Tracks => "tracks",
        })
    }
}

impl Display for TimeRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            TimeRange::LongTerm => "long_term",
            TimeRange::MediumTerm => "medium_term",
            TimeRange::ShortTerm => "short_term",
        })
    }
}

impl Display for FollowType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            FollowType::Artist => "artist",
            FollowType::User => "user",
        })
    }
}

impl Users {
    pub(crate) fn new(client: ReadWriteClient) -> Self {
        Self { client }
    }

    /// The current user's profile. Requires a token from a user-authorized flow.
    pub async fn current_user<T>(&self) -> Result<T>
    where
        T: DeserializeOwned,
    {
        self.client.get("me", None, None).await
    }

    pub async fn profile<T>(&self, user_id: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        self.client.get(&id_path("users", user_id), None, None).await
    }

    pub async fn top_items<T>(
        &self,
        item_type: TopItemType,
        time_range: Option<TimeRange>,
        page: PageParams,
    ) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let params = page.apply(QueryParams::new().insert("time_range", time_range.map(|range| range.to_string())));
        self.client.get(&format!("me/top/{item_type}"), Some(&params), None).await
    }

    /// The artists the current user follows. This is a cursor-based page; pass the last artist ID as `after` to get
    /// the next one.
    pub async fn followed_artists<T>(&self, after: Option<&str>, limit: Option<u32>) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let params = QueryParams::new()
            .insert("type", "artist")
            .insert("after", after)
            .insert("limit", limit);

        self.client.get("me/following", Some(&params), None).await
    }

    pub async fn follow(&self, follow_type: FollowType, ids: &[&str]) -> Result<()> {
        let params = QueryParams::new().insert("type", follow_type.to_string()).insert("ids", ids);
        self.client.put(&with_query("me/following", &params), None, None).await
    }

    pub async fn unfollow(&self, follow_type: FollowType, ids: &[&str]) -> Result<()> {
        let params = QueryParams::new().insert("type", follow_type.to_string()).insert("ids", ids);
        self.client.delete(&with_query("me/following", &params), None, None).await
    }

    pub async fn is_following(&self, follow_type: FollowType, ids: &[&str]) -> Result<Vec<bool>> {
        let params = QueryParams::new().insert("type", follow_type.to_string()).insert("ids", ids);
        self.client.get("me/following/contains", Some(&params), None).await
    }

    /// Check whether the current user follows a playlist.
    pub async fn follows_playlist(&self, playlist_id: &str) -> Result<Vec<bool>> {
        self.client
            .get(
                &format!("{}/followers/contains", id_path("playlists", playlist_id)),
                None,
                None,
            )
            .await
    }
}
