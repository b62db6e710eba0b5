use std::path::PathBuf;

use log::debug;
use rspotify::{
    ClientCredsSpotify, Config, Credentials,
    model::{PlaylistId, SearchResult, SearchType},
    prelude::*,
};
use serde::Deserialize;
use serde_json::Value;

use crate::clients::{
    catalog::Catalog,
    entities::{PageCursor, PlaylistObject, PlaylistRef, RawTrackEntry, SearchPage, TrackPage},
    errors::{Error, Result},
};

// Max page size of the playlist items endpoint
const TRACK_PAGE_LIMIT: u32 = 100;

// Response shapes below are read back from rspotify's models through serde so
// that every field the crawler relies on is an explicit `Option`.

#[derive(Deserialize, Debug)]
struct SearchOwner {
    id: Option<String>,
}

#[derive(Deserialize, Debug)]
struct PlaylistSummary {
    id: Option<String>,
    owner: Option<SearchOwner>,
}

#[derive(Deserialize, Debug)]
struct PlaylistSearchResponse {
    items: Option<Vec<Option<PlaylistSummary>>>,
}

#[derive(Deserialize, Debug)]
struct TrackPageResponse {
    items: Option<Vec<Option<RawTrackEntry>>>,
    next: Option<String>,
    #[serde(default)]
    offset: u32,
    #[serde(default)]
    limit: u32,
}

#[derive(Deserialize, Debug)]
struct PlaylistResponse {
    name: Option<String>,
    tracks: Option<TrackPageResponse>,
}

// Spotify ids may come back either bare or as `spotify:<type>:<id>` URIs
fn bare_id(id: &str) -> &str {
    id.rsplit(':').next().unwrap_or(id)
}

fn parse_search_page(value: Value) -> Result<Option<SearchPage>> {
    let response: PlaylistSearchResponse = serde_json::from_value(value)?;
    let Some(items) = response.items else {
        return Ok(None);
    };

    let returned = items.len();
    let playlists = items
        .into_iter()
        .flatten()
        .filter_map(|summary| {
            let owner_id = summary.owner.and_then(|o| o.id);
            match (summary.id, owner_id) {
                (Some(id), Some(owner)) => Some(PlaylistRef::new(bare_id(&id), bare_id(&owner))),
                (id, _) => {
                    debug!("Dropping incomplete playlist summary {id:?}");
                    None
                }
            }
        })
        .collect();

    Ok(Some(SearchPage {
        playlists,
        returned,
    }))
}

fn into_track_page(playlist_id: &str, response: TrackPageResponse) -> TrackPage {
    let items = response.items.unwrap_or_default();
    let next = response.next.map(|_| {
        // Fall back to the item count when the page does not echo its limit
        let step = if response.limit > 0 {
            response.limit
        } else {
            u32::try_from(items.len()).unwrap_or(u32::MAX)
        };
        PageCursor {
            playlist_id: playlist_id.to_string(),
            offset: response.offset.saturating_add(step),
        }
    });
    TrackPage { items, next }
}

fn parse_track_page(playlist_id: &str, value: Value) -> Result<TrackPage> {
    let response: TrackPageResponse = serde_json::from_value(value)?;
    Ok(into_track_page(playlist_id, response))
}

fn parse_playlist(playlist_id: &str, uri: String, value: Value) -> Result<PlaylistObject> {
    let response: PlaylistResponse = serde_json::from_value(value)?;
    Ok(PlaylistObject {
        uri,
        name: response.name,
        tracks: response
            .tracks
            .map(|tracks| into_track_page(playlist_id, tracks)),
    })
}

fn playlist_id(id: &str) -> Result<PlaylistId<'_>> {
    PlaylistId::from_id_or_uri(id).map_err(|e| Error::UnexpectedResponse(e.to_string()))
}

/// Catalog backed by the Spotify Web API using the client-credentials flow
pub struct SpotifyClient {
    pub spotify: ClientCredsSpotify,
}

impl SpotifyClient {
    pub fn new(spotify: ClientCredsSpotify) -> Self {
        SpotifyClient { spotify }
    }

    // Request an app access token. Public playlist search needs no user login.
    pub async fn authorize_client(&self) -> Result<()> {
        debug!("Requesting Spotify client credentials token ...");
        self.spotify.request_token().await?;
        debug!("Spotify client authorized");
        Ok(())
    }

    // Create a SpotifyClient from environment variables or raise a configuration error
    pub fn try_default() -> Result<Self> {
        let creds = Credentials::from_env().ok_or_else(|| {
            Error::ConfigurationError(
                "Missing Spotify credentials. Set RSPOTIFY_CLIENT_ID and RSPOTIFY_CLIENT_SECRET."
                    .into(),
            )
        })?;

        let cache_path = dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from("/tmp")) // Fallback to /tmp if cache directory can't be determined
            .join(".playlist_crawler_token");

        let spotify = ClientCredsSpotify::with_config(
            creds,
            Config {
                token_cached: true,
                token_refreshing: true,
                cache_path,
                ..Default::default()
            },
        );

        Ok(Self { spotify })
    }
}

impl Catalog for SpotifyClient {
    async fn search_playlists(
        &self,
        term: &str,
        limit: u32,
        offset: u32,
    ) -> Result<Option<SearchPage>> {
        let result = self
            .spotify
            .search(
                term,
                SearchType::Playlist,
                None,
                None,
                Some(limit),
                Some(offset),
            )
            .await?;

        match result {
            SearchResult::Playlists(page) => parse_search_page(serde_json::to_value(page)?),
            other => Err(Error::UnexpectedResponse(format!(
                "playlist search returned {other:?}"
            ))),
        }
    }

    async fn playlist(&self, playlist: &PlaylistRef) -> Result<PlaylistObject> {
        let id = playlist_id(&playlist.playlist_id)?;
        debug!(
            "Fetching playlist {} owned by {}",
            playlist.playlist_id, playlist.owner_id
        );
        let full = self.spotify.playlist(id.clone(), None, None).await?;
        parse_playlist(&playlist.playlist_id, id.uri(), serde_json::to_value(full)?)
    }

    async fn next_tracks(&self, cursor: &PageCursor) -> Result<TrackPage> {
        let id = playlist_id(&cursor.playlist_id)?;
        let page = self
            .spotify
            .playlist_items_manual(
                id,
                None,
                None,
                Some(TRACK_PAGE_LIMIT),
                Some(cursor.offset),
            )
            .await?;
        parse_track_page(&cursor.playlist_id, serde_json::to_value(page)?)
    }
}
