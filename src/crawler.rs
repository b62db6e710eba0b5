use std::env::VarError;
use std::fmt::Display;
use std::str::FromStr;

use log::{debug, info, warn};

use crate::clients::{
    Catalog, RecordSink,
    entities::PlaylistRef,
    errors::{Error, Result},
};
use crate::dedup::{CrawlContext, dedup_batch};
use crate::expander::expand_playlist;
use crate::normalizer::normalize;

const PAGE_SIZE_ENV: &str = "CRAWLER_PAGE_SIZE";
const TOTAL_PLAYLISTS_ENV: &str = "CRAWLER_TOTAL_PLAYLISTS";
const DEFAULT_PAGE_SIZE: u32 = 10;
const DEFAULT_TOTAL_PLAYLISTS: usize = 100_000;
// Largest page the search endpoint serves
const MAX_PAGE_SIZE: u32 = 50;

// Configuration for the Crawler struct
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Playlists requested per search page
    pub page_size: u32,
    /// Candidates processed across all terms before the crawl stops
    pub total_playlists: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            page_size: DEFAULT_PAGE_SIZE,
            total_playlists: DEFAULT_TOTAL_PLAYLISTS,
        }
    }
}

// Read an optional setting from the environment
fn env_value<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| Error::ConfigurationError(format!("{key}={raw:?}: {e}"))),
        Err(VarError::NotPresent) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Builds a [`Config`] from explicit values, then the environment, then defaults
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    page_size: Option<u32>,
    total_playlists: Option<usize>,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = Some(page_size);
        self
    }

    #[must_use]
    pub fn total_playlists(mut self, total_playlists: usize) -> Self {
        self.total_playlists = Some(total_playlists);
        self
    }

    pub fn build(self) -> Result<Config> {
        let page_size = match self.page_size {
            Some(p) => p,
            None => env_value(PAGE_SIZE_ENV)?.unwrap_or(DEFAULT_PAGE_SIZE),
        };
        let total_playlists = match self.total_playlists {
            Some(t) => t,
            None => env_value(TOTAL_PLAYLISTS_ENV)?.unwrap_or(DEFAULT_TOTAL_PLAYLISTS),
        };

        if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
            return Err(Error::ConfigurationError(format!(
                "page size must be between 1 and {MAX_PAGE_SIZE}, got {page_size}"
            )));
        }

        Ok(Config {
            page_size,
            total_playlists,
        })
    }
}

/// Counters reported at the end of a crawl
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrawlSummary {
    /// Search results processed against the cap, duplicates included
    pub playlists_seen: usize,
    /// Playlists handed to expansion (first visits only)
    pub playlists_expanded: usize,
    /// Playlists that produced a stored batch
    pub playlists_stored: usize,
    pub songs_stored: usize,
}

enum PlaylistOutcome {
    Skipped,
    Discarded,
    Stored(usize),
}

// The main Crawler struct that walks search results and stores playlist tracks
pub struct Crawler<C, S> {
    catalog: C,
    sink: S,
    config: Config,
}

impl<C: Catalog, S: RecordSink> Crawler<C, S> {
    pub fn new(catalog: C, sink: S, config: Config) -> Self {
        Crawler {
            catalog,
            sink,
            config,
        }
    }

    #[cfg(test)]
    pub(crate) fn catalog(&self) -> &C {
        &self.catalog
    }

    #[cfg(test)]
    pub(crate) fn sink(&self) -> &S {
        &self.sink
    }

    /// Crawl every term in order until the search runs dry or the playlist
    /// cap is reached. Only storage errors abort the crawl.
    pub async fn crawl(&self, terms: &[String]) -> Result<CrawlSummary> {
        let page_size = self.config.page_size;
        let mut ctx = CrawlContext::new(self.config.total_playlists);
        let mut summary = CrawlSummary::default();

        'terms: for term in terms {
            info!("Starting search with {term}");
            let mut offset: u32 = 0;

            while !ctx.cap_reached() {
                let page = match self
                    .catalog
                    .search_playlists(term, page_size, offset)
                    .await
                {
                    Ok(page) => page,
                    Err(e) => {
                        // Retry one position further instead of skipping a page
                        warn!("Search for {term:?} failed at offset {offset}: {e}");
                        offset = offset.saturating_add(1);
                        continue;
                    }
                };
                offset = offset.saturating_add(page_size);

                // Only an empty or missing result list ends the term; a page of
                // unusable summaries still moves on to the next offset
                let playlists = match page {
                    Some(page) if page.returned > 0 => page.playlists,
                    _ => {
                        info!("There are no more playlists for {term:?}");
                        break;
                    }
                };
                info!("Got {} playlists", playlists.len());

                for playlist in playlists {
                    ctx.record_candidate();
                    match self.process_playlist(&mut ctx, term, &playlist).await? {
                        PlaylistOutcome::Skipped => {}
                        PlaylistOutcome::Discarded => summary.playlists_expanded += 1,
                        PlaylistOutcome::Stored(songs) => {
                            summary.playlists_expanded += 1;
                            summary.playlists_stored += 1;
                            summary.songs_stored += songs;
                            info!(
                                "[Term: {term}] Have retrieved {} songs from {} playlists",
                                summary.songs_stored,
                                ctx.processed()
                            );
                        }
                    }

                    if ctx.cap_reached() {
                        info!("Reached the limit of {} playlists", self.config.total_playlists);
                        break 'terms;
                    }
                }
            }
        }

        summary.playlists_seen = ctx.processed();
        info!(
            "Crawl finished: {} playlists seen, {} expanded, {} stored, {} songs",
            summary.playlists_seen,
            summary.playlists_expanded,
            summary.playlists_stored,
            summary.songs_stored
        );
        Ok(summary)
    }

    async fn process_playlist(
        &self,
        ctx: &mut CrawlContext,
        term: &str,
        playlist: &PlaylistRef,
    ) -> Result<PlaylistOutcome> {
        if !ctx.mark_visited(playlist) {
            debug!("Skipping already visited playlist {}", playlist.playlist_id);
            return Ok(PlaylistOutcome::Skipped);
        }

        let Some(expanded) = expand_playlist(&self.catalog, playlist).await else {
            return Ok(PlaylistOutcome::Discarded);
        };

        let records = match normalize(&expanded.entries, &expanded.uri, &expanded.name) {
            Ok(records) => records,
            Err(e) => {
                warn!("Discarding playlist {}: {e}", expanded.uri);
                return Ok(PlaylistOutcome::Discarded);
            }
        };

        let batch = dedup_batch(records);
        if batch.is_empty() {
            debug!("Playlist {} produced no songs", expanded.uri);
            return Ok(PlaylistOutcome::Discarded);
        }

        self.sink.append(term, &batch).await?;
        Ok(PlaylistOutcome::Stored(batch.len()))
    }
}
