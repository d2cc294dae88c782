//! Objects the library itself needs to understand in Spotify's responses. Everything else is deserialized into
//! whatever type the caller asks for.

pub mod error;
pub mod page;

use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// The item types a [search](crate::client::Search) can look for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    Album,
    Artist,
    Playlist,
    Track,
    Show,
    Episode,
    Audiobook,
}

/// Converts a list of item types to the comma-separated string the search endpoint expects.
pub trait ToTypesString: crate::private::Sealed {
    fn to_types_string(self) -> String;
}

impl ItemType {
    pub const ALL: [ItemType; 7] = [
        ItemType::Album,
        ItemType::Artist,
        ItemType::Playlist,
        ItemType::Track,
        ItemType::Show,
        ItemType::Episode,
        ItemType::Audiobook,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            ItemType::Album => "album",
            ItemType::Artist => "artist",
            ItemType::Playlist => "playlist",
            ItemType::Track => "track",
            ItemType::Show => "show",
            ItemType::Episode => "episode",
            ItemType::Audiobook => "audiobook",
        }
    }
}

impl Display for ItemType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<I> crate::private::Sealed for I where I: IntoIterator<Item = ItemType> {}

impl<I> ToTypesString for I
where
    I: IntoIterator<Item = ItemType>,
{
    fn to_types_string(self) -> String {
        self.into_iter()
            .map(|ty| ty.to_string())
            .collect::<Vec<String>>()
            .join(",")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn types_string() {
        assert_eq!([ItemType::Track, ItemType::Artist].to_types_string(), "track,artist");
        assert_eq!(
            ItemType::ALL.to_types_string(),
            "album,artist,playlist,track,show,episode,audiobook"
        );
    }

    #[test]
    fn item_type_serializes_lowercase() {
        assert_eq!(serde_json::to_value(ItemType::Episode).unwrap(), "episode");
    }
}
