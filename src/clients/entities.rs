use serde::Deserialize;

/// A playlist found by search, identified by its id and its owner's id
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlaylistRef {
    pub playlist_id: String,
    pub owner_id: String,
}

impl PlaylistRef {
    pub fn new(playlist_id: impl Into<String>, owner_id: impl Into<String>) -> Self {
        PlaylistRef {
            playlist_id: playlist_id.into(),
            owner_id: owner_id.into(),
        }
    }
}

/// One page of playlist search results
#[derive(Debug, Clone, Default)]
pub struct SearchPage {
    /// Usable playlists, in result order
    pub playlists: Vec<PlaylistRef>,
    /// Items the API returned, null and incomplete summaries included
    pub returned: usize,
}

/// Where the next page of a playlist's track list starts
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PageCursor {
    pub playlist_id: String,
    pub offset: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawArtist {
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawTrack {
    pub name: Option<String>,
    pub artists: Option<Vec<RawArtist>>,
}

/// A playlist item as the catalog returns it. Any part may be missing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawTrackEntry {
    pub track: Option<RawTrack>,
}

/// One page of a playlist's track list. Items may be null.
#[derive(Debug, Clone, Default)]
pub struct TrackPage {
    pub items: Vec<Option<RawTrackEntry>>,
    pub next: Option<PageCursor>,
}

/// A playlist object. `tracks` is `None` when the response carried no track list.
#[derive(Debug, Clone)]
pub struct PlaylistObject {
    pub uri: String,
    pub name: Option<String>,
    pub tracks: Option<TrackPage>,
}

/// A flat track row derived from one playlist item
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TrackRecord {
    pub title: String,
    pub artist: String,
    /// `"<artist> - <title>"`
    pub artitle: String,
    /// URI of the playlist the track was found in
    pub uri: String,
    /// Display name of that playlist
    pub name: String,
}

/// A deduplicated record with its position in the playlist's batch before
/// duplicates were removed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedRecord {
    pub position: usize,
    pub record: TrackRecord,
}

/// A row of the `songs` table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SongRow {
    /// Position of the record within its playlist's batch, counted before
    /// duplicates were dropped
    pub index: i64,
    pub title: String,
    pub artist: String,
    pub artitle: String,
    pub uri: String,
    pub name: String,
    /// Search term that discovered the playlist
    pub term: String,
}
