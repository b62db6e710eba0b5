use crate::clients::{
    entities::{PageCursor, PlaylistObject, PlaylistRef, SearchPage, TrackPage},
    errors::Result,
};

/// Read access to a music catalog's playlists
///
/// Implemented by [`SpotifyClient`](crate::clients::SpotifyClient) and by
/// in-memory doubles in tests. Calls are awaited one at a time by the crawler.
#[allow(async_fn_in_trait)]
pub trait Catalog {
    /// Fetch up to `limit` playlists matching `term`, starting at `offset`.
    /// `Ok(None)` means the response had no playlist list at all.
    async fn search_playlists(&self, term: &str, limit: u32, offset: u32)
    -> Result<Option<SearchPage>>;

    /// Fetch a playlist together with the first page of its tracks
    async fn playlist(&self, playlist: &PlaylistRef) -> Result<PlaylistObject>;

    /// Fetch the track page a continuation cursor points at
    async fn next_tracks(&self, cursor: &PageCursor) -> Result<TrackPage>;
}
