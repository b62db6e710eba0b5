use async_duckdb::ClientBuilder;
use async_duckdb::duckdb::params;
use log::debug;
use std::path::{Path, PathBuf};

use crate::clients::entities::{IndexedRecord, SongRow};
use crate::clients::errors::Result;

enum Table {
    Songs,
}

impl Table {
    pub fn as_str(&self) -> &'static str {
        match self {
            Table::Songs => "songs",
        }
    }
}

/// Destination for deduplicated playlist batches
#[allow(async_fn_in_trait)]
pub trait RecordSink {
    /// Append every record of `batch` as one row tagged with `term`
    async fn append(&self, term: &str, batch: &[IndexedRecord]) -> Result<()>;
}

/// Append-only `songs` table in a `DuckDB` file
///
/// The database is opened for each batch and closed again right after the
/// batch is written, so every stored batch is durable on its own.
pub struct LocalStorage {
    db_path: PathBuf,
}

impl LocalStorage {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        LocalStorage {
            db_path: db_path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.db_path
    }

    async fn open(&self) -> Result<async_duckdb::Client> {
        let client = ClientBuilder::new().path(&self.db_path).open().await?;
        debug!("Opened local storage database at {:?}", self.db_path);
        Ok(client)
    }

    fn create_table_query() -> String {
        format!(
            "
            CREATE TABLE IF NOT EXISTS {songs} (
                \"index\" BIGINT,
                title TEXT,
                artist TEXT,
                artitle TEXT,
                uri TEXT,
                name TEXT,
                term TEXT
            );
        ",
            songs = Table::Songs.as_str()
        )
    }

    // Write one batch and close the database before returning
    pub async fn append_batch(&self, term: &str, batch: &[IndexedRecord]) -> Result<()> {
        if batch.is_empty() {
            return Ok(());
        }

        let rows: Vec<SongRow> = batch
            .iter()
            .map(|IndexedRecord { position, record }| SongRow {
                index: i64::try_from(*position).unwrap_or(i64::MAX),
                title: record.title.clone(),
                artist: record.artist.clone(),
                artitle: record.artitle.clone(),
                uri: record.uri.clone(),
                name: record.name.clone(),
                term: term.to_string(),
            })
            .collect();
        let count = rows.len();
        let table_query = Self::create_table_query();

        let client = self.open().await?;
        client
            .conn(move |conn| {
                conn.execute_batch(&table_query)?;
                let mut app = conn.appender(Table::Songs.as_str())?;
                for row in &rows {
                    app.append_row(params![
                        row.index,
                        row.title,
                        row.artist,
                        row.artitle,
                        row.uri,
                        row.name,
                        row.term
                    ])?;
                }
                app.flush()?;
                Ok(())
            })
            .await?;
        client.close().await?;

        debug!("Appended {count} rows for term {term:?}");
        Ok(())
    }

    // Read every stored row in insertion order
    pub async fn load_songs(&self) -> Result<Vec<SongRow>> {
        let table_query = Self::create_table_query();
        let query = format!(
            "SELECT \"index\", title, artist, artitle, uri, name, term FROM {} ORDER BY rowid;",
            Table::Songs.as_str()
        );

        let client = self.open().await?;
        let songs = client
            .conn(move |conn| {
                conn.execute_batch(&table_query)?;
                let mut stmt = conn.prepare(&query)?;
                let mut rows = stmt.query([])?;
                let mut songs = vec![];
                while let Some(row) = rows.next()? {
                    songs.push(SongRow {
                        index: row.get(0)?,
                        title: row.get(1)?,
                        artist: row.get(2)?,
                        artitle: row.get(3)?,
                        uri: row.get(4)?,
                        name: row.get(5)?,
                        term: row.get(6)?,
                    });
                }
                Ok(songs)
            })
            .await?;
        client.close().await?;

        Ok(songs)
    }
}

impl RecordSink for LocalStorage {
    async fn append(&self, term: &str, batch: &[IndexedRecord]) -> Result<()> {
        self.append_batch(term, batch).await
    }
}
