use crate::clients::{
    entities::{RawTrackEntry, TrackRecord},
    errors::{Error, Result},
};

fn malformed(position: usize, reason: &str) -> Error {
    Error::MalformedTrack {
        position,
        reason: reason.to_string(),
    }
}

fn normalize_entry(
    position: usize,
    entry: &RawTrackEntry,
    uri: &str,
    name: &str,
) -> Result<TrackRecord> {
    let track = entry
        .track
        .as_ref()
        .ok_or_else(|| malformed(position, "item has no track"))?;
    let title = track
        .name
        .as_ref()
        .ok_or_else(|| malformed(position, "track has no name"))?;
    let artist = track
        .artists
        .as_ref()
        .and_then(|artists| artists.first())
        .ok_or_else(|| malformed(position, "track has no artists"))?
        .name
        .as_ref()
        .ok_or_else(|| malformed(position, "first artist has no name"))?;

    Ok(TrackRecord {
        title: title.clone(),
        artist: artist.clone(),
        artitle: format!("{artist} - {title}"),
        uri: uri.to_string(),
        name: name.to_string(),
    })
}

/// Turn a playlist's raw entries into track records.
///
/// Playlists with at most one entry produce no records. Otherwise either every
/// entry yields a record or the whole batch is rejected with the first
/// malformed entry's error; a partial batch is never returned.
pub fn normalize(entries: &[RawTrackEntry], uri: &str, name: &str) -> Result<Vec<TrackRecord>> {
    if entries.len() <= 1 {
        return Ok(Vec::new());
    }
    entries
        .iter()
        .enumerate()
        .map(|(position, entry)| normalize_entry(position, entry, uri, name))
        .collect()
}
