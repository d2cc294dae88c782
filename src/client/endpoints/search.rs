use log::trace;
use serde::de::DeserializeOwned;

use crate::{
    client::ReadWriteClient,
    encoding::QueryParams,
    error::Result,
    model::{ItemType, ToTypesString},
};

/// The default search limit, i.e. how many items there are in each page.
pub const DEFAULT_SEARCH_LIMIT: u32 = 20;
/// The default search offset.
pub const DEFAULT_SEARCH_OFFSET: u32 = 0;

/// Search Spotify's catalog. Start a search with [query](Search::query).
#[derive(Debug, Clone)]
pub struct Search {
    client: ReadWriteClient,
}

/// A builder for a search in Spotify's catalog. New instances are returned by [Search::query].
#[derive(Debug)]
pub struct SearchBuilder<'a> {
    client: &'a ReadWriteClient,
    query: String,
    types: String,
    limit: u32,
    offset: u32,
    market: Option<String>,
    include_external_audio: bool,
}

impl Search {
    pub(crate) fn new(client: ReadWriteClient) -> Self {
        Self { client }
    }

    /// Start a search with the given query. By default all item types are searched for.
    pub fn query<S>(&self, query: S) -> SearchBuilder<'_>
    where
        S: Into<String>,
    {
        SearchBuilder {
            client: &self.client,
            query: query.into(),
            types: ItemType::ALL.to_types_string(),
            limit: DEFAULT_SEARCH_LIMIT,
            offset: DEFAULT_SEARCH_OFFSET,
            market: None,
            include_external_audio: false,
        }
    }
}

impl<'a> SearchBuilder<'a> {
    /// Set specific Spotify item types to search for. The `types` parameter can be any iterator of
    /// [ItemType](crate::model::ItemType)-enums.
    pub fn types<T>(self, types: T) -> Self
    where
        T: ToTypesString,
    {
        Self {
            types: types.to_types_string(),
            ..self
        }
    }

    /// The maximum number of results to return in each item type.
    ///
    /// Default: 20. Maximum: 50.
    pub fn limit(self, limit: u32) -> Self {
        Self { limit, ..self }
    }

    /// The index of the first result to return. By combining this with [limit](SearchBuilder::limit), you may request
    /// new pages of content.
    ///
    /// Default: 0.
    pub fn offset(self, offset: u32) -> Self {
        Self { offset, ..self }
    }

    /// Specify a country such that content that is available in that market will be returned. If using a
    /// user-authorized token, the country associated with the user's account takes priority over this parameter.
    pub fn market<S>(self, market: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            market: Some(market.into()),
            ..self
        }
    }

    /// Mark externally hosted audio content as playable in the response.
    pub fn include_external_audio(self, include_external_audio: bool) -> Self {
        Self {
            include_external_audio,
            ..self
        }
    }

    fn build_params(&self) -> QueryParams {
        QueryParams::new()
            .insert("q", self.query.as_str())
            .insert("type", self.types.as_str())
            .insert("limit", self.limit)
            .insert("offset", self.offset)
            .insert("market", self.market.as_deref())
            .insert("include_external", self.include_external_audio.then_some("audio"))
    }

    /// Send the search. The response has one page per searched item type, such as `tracks` and `artists`.
    pub async fn send<T>(self) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let params = self.build_params();
        trace!("Searching with parameters: {params:?}");

        self.client.get("search", Some(&params), None).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::client::RequestEngine;

    fn search() -> Search {
        let engine = Arc::new(RequestEngine::new(
            reqwest::Client::new(),
            crate::client::API_BASE_URL,
            None,
        ));

        Search::new(ReadWriteClient::new(engine))
    }

    #[test]
    fn default_parameters() {
        let search = search();
        let params = search.query("daft punk").build_params();

        assert_eq!(
            params.to_query_string(),
            "?q=daft%20punk&type=album%2Cartist%2Cplaylist%2Ctrack%2Cshow%2Cepisode%2Caudiobook&limit=20&offset=0"
        );
    }

    #[test]
    fn custom_parameters() {
        let search = search();
        let params = search
            .query("abba")
            .types([ItemType::Track])
            .limit(5)
            .offset(10)
            .market("FI")
            .include_external_audio(true)
            .build_params();

        assert_eq!(
            params.to_query_string(),
            "?q=abba&type=track&limit=5&offset=10&market=FI&include_external=audio"
        );
    }
}
