use std::collections::HashSet;

use crate::clients::entities::{IndexedRecord, PlaylistRef, TrackRecord};

/// Run-scoped crawl state: which playlists were expanded and how many
/// candidates have been processed against the global cap.
///
/// Lives only as long as one crawl; nothing is persisted between runs.
#[derive(Debug)]
pub struct CrawlContext {
    visited: HashSet<PlaylistRef>,
    processed: usize,
    cap: usize,
}

impl CrawlContext {
    pub fn new(cap: usize) -> Self {
        CrawlContext {
            visited: HashSet::new(),
            processed: 0,
            cap,
        }
    }

    /// Count a discovered candidate, duplicates included
    pub fn record_candidate(&mut self) {
        self.processed += 1;
    }

    pub fn processed(&self) -> usize {
        self.processed
    }

    pub fn cap_reached(&self) -> bool {
        self.processed >= self.cap
    }

    /// Mark `playlist` as visited. Returns `false` if it was already visited
    /// during this run and must not be expanded again.
    pub fn mark_visited(&mut self, playlist: &PlaylistRef) -> bool {
        self.visited.insert(playlist.clone())
    }
}

/// Drop records identical on every field to an earlier record of the same
/// batch, keeping first occurrences in order. Survivors keep the position
/// they had in `batch`.
pub fn dedup_batch(batch: Vec<TrackRecord>) -> Vec<IndexedRecord> {
    let mut seen = HashSet::with_capacity(batch.len());
    batch
        .into_iter()
        .enumerate()
        .filter(|(_, record)| seen.insert(record.clone()))
        .map(|(position, record)| IndexedRecord { position, record })
        .collect()
}
