//! In-memory catalog and sink doubles shared by unit tests

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use crate::clients::{
    Catalog, RecordSink,
    entities::{
        IndexedRecord, PageCursor, PlaylistObject, PlaylistRef, RawArtist, RawTrack,
        RawTrackEntry, SearchPage, TrackPage, TrackRecord,
    },
    errors::{Error, Result},
};

pub fn entry(title: &str, artist: &str) -> RawTrackEntry {
    RawTrackEntry {
        track: Some(RawTrack {
            name: Some(title.into()),
            artists: Some(vec![RawArtist {
                name: Some(artist.into()),
            }]),
        }),
    }
}

pub fn page(items: Vec<Option<RawTrackEntry>>, next: Option<PageCursor>) -> TrackPage {
    TrackPage { items, next }
}

pub fn cursor(playlist_id: &str, offset: u32) -> PageCursor {
    PageCursor {
        playlist_id: playlist_id.into(),
        offset,
    }
}

pub fn playlist_ref(playlist_id: &str) -> PlaylistRef {
    PlaylistRef::new(playlist_id, format!("owner-of-{playlist_id}"))
}

/// Scripted catalog. Unknown search cursors answer with a missing page,
/// unknown playlists and continuations fail. Expanding the same playlist
/// twice panics.
#[derive(Default)]
pub struct MockCatalog {
    searches: HashMap<(String, u32), SearchPage>,
    failing_searches: HashSet<(String, u32)>,
    playlists: HashMap<String, PlaylistObject>,
    continuations: HashMap<PageCursor, TrackPage>,
    search_calls: RefCell<Vec<(String, u32)>>,
    expanded: RefCell<Vec<PlaylistRef>>,
    continuation_calls: RefCell<Vec<PageCursor>>,
}

impl MockCatalog {
    pub fn add_search(&mut self, term: &str, offset: u32, playlists: Vec<PlaylistRef>) {
        self.add_search_with_unusable(term, offset, playlists, 0);
    }

    /// Register a search page that also carried `unusable` null or incomplete
    /// summaries
    pub fn add_search_with_unusable(
        &mut self,
        term: &str,
        offset: u32,
        playlists: Vec<PlaylistRef>,
        unusable: usize,
    ) {
        let returned = playlists.len() + unusable;
        self.searches.insert(
            (term.into(), offset),
            SearchPage {
                playlists,
                returned,
            },
        );
    }

    pub fn fail_search(&mut self, term: &str, offset: u32) {
        self.failing_searches.insert((term.into(), offset));
    }

    pub fn add_playlist(&mut self, playlist_id: &str, name: Option<&str>, tracks: Option<TrackPage>) {
        self.playlists.insert(
            playlist_id.into(),
            PlaylistObject {
                uri: format!("spotify:playlist:{playlist_id}"),
                name: name.map(str::to_string),
                tracks,
            },
        );
    }

    /// Register a playlist whose single track page holds `entries`
    pub fn add_simple_playlist(&mut self, playlist_id: &str, entries: Vec<RawTrackEntry>) {
        let items = entries.into_iter().map(Some).collect();
        self.add_playlist(playlist_id, Some(playlist_id), Some(page(items, None)));
    }

    pub fn add_continuation(&mut self, cursor: PageCursor, page: TrackPage) {
        self.continuations.insert(cursor, page);
    }

    pub fn search_calls(&self) -> Vec<(String, u32)> {
        self.search_calls.borrow().clone()
    }

    pub fn expanded(&self) -> Vec<PlaylistRef> {
        self.expanded.borrow().clone()
    }

    pub fn continuation_calls(&self) -> Vec<PageCursor> {
        self.continuation_calls.borrow().clone()
    }
}

impl Catalog for MockCatalog {
    async fn search_playlists(
        &self,
        term: &str,
        _limit: u32,
        offset: u32,
    ) -> Result<Option<SearchPage>> {
        let key = (term.to_string(), offset);
        self.search_calls.borrow_mut().push(key.clone());
        if self.failing_searches.contains(&key) {
            return Err(Error::UnexpectedResponse(format!(
                "search {term:?} failed at offset {offset}"
            )));
        }
        Ok(self.searches.get(&key).cloned())
    }

    async fn playlist(&self, playlist: &PlaylistRef) -> Result<PlaylistObject> {
        {
            let mut expanded = self.expanded.borrow_mut();
            assert!(
                !expanded.contains(playlist),
                "playlist {playlist:?} expanded twice"
            );
            expanded.push(playlist.clone());
        }
        self.playlists
            .get(&playlist.playlist_id)
            .cloned()
            .ok_or_else(|| Error::UnexpectedResponse(format!("no playlist {}", playlist.playlist_id)))
    }

    async fn next_tracks(&self, cursor: &PageCursor) -> Result<TrackPage> {
        self.continuation_calls.borrow_mut().push(cursor.clone());
        self.continuations
            .get(cursor)
            .cloned()
            .ok_or_else(|| Error::UnexpectedResponse(format!("no page at {cursor:?}")))
    }
}

/// Sink keeping every appended batch in memory
#[derive(Default)]
pub struct MemorySink {
    batches: RefCell<Vec<(String, Vec<IndexedRecord>)>>,
}

impl MemorySink {
    /// Stored batches without their positions
    pub fn batches(&self) -> Vec<(String, Vec<TrackRecord>)> {
        self.batches
            .borrow()
            .iter()
            .map(|(term, batch)| {
                let records = batch.iter().map(|r| r.record.clone()).collect();
                (term.clone(), records)
            })
            .collect()
    }

    pub fn positions(&self) -> Vec<Vec<usize>> {
        self.batches
            .borrow()
            .iter()
            .map(|(_, batch)| batch.iter().map(|r| r.position).collect())
            .collect()
    }

    pub fn row_count(&self) -> usize {
        self.batches.borrow().iter().map(|(_, batch)| batch.len()).sum()
    }
}

impl RecordSink for MemorySink {
    async fn append(&self, term: &str, batch: &[IndexedRecord]) -> Result<()> {
        self.batches
            .borrow_mut()
            .push((term.to_string(), batch.to_vec()));
        Ok(())
    }
}

/// Sink whose every write fails with a storage error
pub struct FailingSink;

impl RecordSink for FailingSink {
    async fn append(&self, _term: &str, _batch: &[IndexedRecord]) -> Result<()> {
        Err(Error::StorageError(async_duckdb::Error::Duckdb(
            async_duckdb::duckdb::Error::QueryReturnedNoRows,
        )))
    }
}
