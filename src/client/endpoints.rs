//! Thin wrappers over the Spotify Web API's endpoints.
//!
//! Every method maps to exactly one request through the client's [get](super::ReadOnlyClient::get),
//! [post](super::ReadWriteClient::post), [put](super::ReadWriteClient::put) or
//! [delete](super::ReadWriteClient::delete). Responses are deserialized into whatever type the caller chooses, such as
//! [serde_json::Value], their own structs or [Page](crate::model::page::Page).

mod albums;
mod artists;
mod browse;
mod episodes;
mod player;
mod playlists;
mod search;
mod shows;
mod tracks;
mod users;

pub use self::{
    albums::Albums,
    artists::Artists,
    browse::Browse,
    episodes::Episodes,
    player::{Player, RepeatState},
    playlists::Playlists,
    search::{Search, SearchBuilder},
    shows::Shows,
    tracks::Tracks,
    users::{FollowType, TimeRange, TopItemType, Users},
};

use crate::encoding::{encode_query_component, QueryParams};

/// Paging parameters for endpoints that return an offset-based page.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PageParams {
    limit: Option<u32>,
    offset: Option<u32>,
}

impl PageParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// The maximum number of items to return. Spotify's default is 20, and the maximum usually 50.
    pub fn limit(self, limit: u32) -> Self {
        Self {
            limit: Some(limit),
            ..self
        }
    }

    /// The index of the first item to return.
    pub fn offset(self, offset: u32) -> Self {
        Self {
            offset: Some(offset),
            ..self
        }
    }

    pub(crate) fn apply(&self, params: QueryParams) -> QueryParams {
        params.insert("limit", self.limit).insert("offset", self.offset)
    }
}

/// Joins a path with an ID, encoding the ID so it stays in its own path segment.
pub(crate) fn id_path(prefix: &str, id: &str) -> String {
    format!("{prefix}/{}", encode_query_component(id))
}

/// Appends query parameters to a path, for writing requests that take their arguments in the query.
pub(crate) fn with_query(path: &str, params: &QueryParams) -> String {
    format!("{path}{}", params.to_query_string())
}
