use std::path::PathBuf;

use clap::Parser;
use log::info;
use playlist_crawler::clients::errors::Result;
use playlist_crawler::clients::{LocalStorage, SpotifyClient};
use playlist_crawler::crawler::{ConfigBuilder, CrawlSummary, Crawler};

#[derive(Parser, Debug)]
#[command(name = "playlist-crawler")]
#[command(version, about = "Store the tracks of Spotify playlists matching search terms", long_about = None)]
struct Cli {
    /// DuckDB file the `songs` table is appended to
    db_path: PathBuf,

    /// Search terms, crawled in order
    #[arg(required = true)]
    terms: Vec<String>,
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    crawl(cli).await?;
    Ok(())
}

async fn crawl(cli: Cli) -> Result<CrawlSummary> {
    info!("Building config ...");
    let config = ConfigBuilder::new().build()?;
    let spotify = SpotifyClient::try_default()?;
    info!("Authorizing Spotify client ...");
    spotify.authorize_client().await?;

    let storage = LocalStorage::new(cli.db_path);
    info!("Storing songs in {:?}", storage.path());

    let crawler = Crawler::new(spotify, storage, config);
    crawler.crawl(&cli.terms).await
}
