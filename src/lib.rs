//! Playlist crawler - collect tracks from Spotify playlists matching search terms
//!
//! This library searches the catalog for playlists term by term, expands every
//! playlist it finds into its full track list, and appends the flattened,
//! deduplicated tracks to a local `DuckDB` table for offline analysis.

/// Client modules for interacting with external services and local storage
pub mod clients;
/// Search-driven crawl loop and its configuration
pub mod crawler;
/// Run-scoped visited set and per-batch deduplication
pub mod dedup;
/// Playlist track-list pagination
pub mod expander;
/// Conversion of raw playlist items into track records
pub mod normalizer;

#[cfg(test)]
mod test_utils;
