use futures::stream::{self, Stream, StreamExt};
use log::{debug, warn};

use crate::clients::{
    Catalog,
    entities::{PageCursor, PlaylistRef, RawTrackEntry, TrackPage},
};

/// A playlist with its complete, null-free track list
#[derive(Debug, Clone)]
pub struct ExpandedPlaylist {
    pub uri: String,
    /// Display name, empty when the playlist has none
    pub name: String,
    pub entries: Vec<RawTrackEntry>,
}

enum Step {
    Ready(TrackPage),
    Follow(PageCursor),
}

/// Lazily walk a playlist's track pages starting at `first`.
///
/// The stream ends when a page has no continuation cursor, or when fetching
/// the next page fails. Pages already yielded are unaffected by that failure.
pub fn track_pages<C: Catalog>(
    catalog: &C,
    first: TrackPage,
) -> impl Stream<Item = TrackPage> + '_ {
    stream::unfold(Some(Step::Ready(first)), move |step| async move {
        let page = match step? {
            Step::Ready(page) => page,
            Step::Follow(cursor) => match catalog.next_tracks(&cursor).await {
                Ok(page) => page,
                Err(e) => {
                    warn!(
                        "Stopping pagination of {} at offset {}: {e}",
                        cursor.playlist_id, cursor.offset
                    );
                    return None;
                }
            },
        };
        let next = page.next.clone().map(Step::Follow);
        Some((page, next))
    })
}

/// Fetch a playlist and all of its tracks.
///
/// Returns `None` when the playlist cannot be fetched or carries no track list.
pub async fn expand_playlist<C: Catalog>(
    catalog: &C,
    playlist: &PlaylistRef,
) -> Option<ExpandedPlaylist> {
    let object = match catalog.playlist(playlist).await {
        Ok(object) => object,
        Err(e) => {
            warn!("Could not fetch playlist {}: {e}", playlist.playlist_id);
            return None;
        }
    };

    let Some(first) = object.tracks else {
        debug!("Playlist {} has no track list", object.uri);
        return None;
    };

    let entries: Vec<RawTrackEntry> = track_pages(catalog, first)
        .inspect(|_| debug!("Still getting more songs for {}", object.uri))
        .flat_map(|page| stream::iter(page.items.into_iter().flatten()))
        .collect()
        .await;

    Some(ExpandedPlaylist {
        uri: object.uri,
        name: object.name.unwrap_or_default(),
        entries,
    })
}
