//! Paged results.
//!
//! Spotify returns lists either as offset-based pages (`limit`, `offset`, `total`) or as cursor-based pages
//! (`cursors`). Both have the items and an absolute URL to the next page, which is all [Page] needs to walk them.

use log::debug;
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::{client::ReadOnlyClient, error::Result};

/// A page of items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub href: Option<String>,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
    pub total: Option<u32>,
    pub cursors: Option<Cursors>,
}

/// Cursors of a cursor-based page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cursors {
    pub after: Option<String>,
    pub before: Option<String>,
}

impl<T> Page<T>
where
    T: DeserializeOwned,
{
    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }

    /// Returns the next page from this page, if it exists.
    pub async fn next_page(&self, client: &ReadOnlyClient) -> Result<Option<Page<T>>> {
        match self.next.as_deref() {
            Some(url) => {
                debug!("Requesting next page: {url}");
                client.get(url, None, None).await.map(Some)
            }

            None => Ok(None),
        }
    }

    /// Walks every page starting from this one and returns all their items in order.
    pub async fn collect_all(self, client: &ReadOnlyClient) -> Result<Vec<T>> {
        let mut items = Vec::new();
        let mut page = self;

        loop {
            let next = page.next_page(client).await?;
            items.extend(page.items);

            match next {
                Some(next) => page = next,
                None => return Ok(items),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn offset_page() {
        let page: Page<String> = serde_json::from_value(json!({
            "href": "https://api.spotify.com/v1/me/tracks?offset=0&limit=2",
            "items": ["a", "b"],
            "limit": 2,
            "next": "https://api.spotify.com/v1/me/tracks?offset=2&limit=2",
            "offset": 0,
            "previous": null,
            "total": 3
        }))
        .unwrap();

        assert_eq!(page.items, ["a", "b"]);
        assert_eq!(page.total, Some(3));
        assert!(page.has_next());
        assert_eq!(page.cursors, None);
    }

    #[test]
    fn cursor_page() {
        let page: Page<u32> = serde_json::from_value(json!({
            "items": [1],
            "next": null,
            "cursors": { "after": "abc" }
        }))
        .unwrap();

        assert!(!page.has_next());
        assert_eq!(page.cursors.unwrap().after.as_deref(), Some("abc"));
        assert_eq!(page.offset, None);
    }
}
