use std::collections::{HashMap, HashSet};

use crate::{
    error::Result,
    management::Session,
    types::{ArtistPlayCounts, PlayHistory, RecentlyPlayed, Track, TrackPlayAggregate, first_image},
};

use super::Spotify;

/// Number of entries in the top tracks by play count.
pub const TOP_PLAYED_TRACKS_LIMIT: usize = 5;
/// Number of raw history items considered for the recent tracks section.
pub const RECENT_TRACKS_WINDOW: usize = 12;

impl Spotify {
    /// Fetches one default-sized page of the user's play history.
    ///
    /// Each aggregation below calls this again, so two aggregations taken a
    /// moment apart may see different windows.
    pub async fn recently_played(&self, session: &Session) -> Result<RecentlyPlayed> {
        self.get_json(session, "/me/player/recently-played", &[]).await
    }

    /// Play counts per credited artist over the recently played window.
    pub async fn top_played_artists(&self, session: &Session) -> Result<ArtistPlayCounts> {
        let window = self.recently_played(session).await?;
        Ok(tally_artists(&window.items))
    }

    /// The five most played tracks of the recently played window.
    pub async fn top5_tracks_by_play_count(&self, session: &Session) -> Result<Vec<TrackPlayAggregate>> {
        let window = self.recently_played(session).await?;
        Ok(top_tracks_by_count(&window.items, TOP_PLAYED_TRACKS_LIMIT))
    }

    /// Distinct tracks among the twelve most recent plays, newest first.
    pub async fn recent_unique_tracks(&self, session: &Session) -> Result<Vec<Track>> {
        let window = self.recently_played(session).await?;
        Ok(unique_recent_tracks(&window.items, RECENT_TRACKS_WINDOW))
    }
}

/// Counts every (track, credited artist) pair, so a track with two artists
/// adds one play to each. Names keep the order in which they first appear.
pub fn tally_artists(items: &[PlayHistory]) -> ArtistPlayCounts {
    let mut counts: ArtistPlayCounts = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for artist in items.iter().flat_map(|item| &item.track.artists) {
        match index.get(&artist.name) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(artist.name.clone(), counts.len());
                counts.push((artist.name.clone(), 1));
            }
        }
    }

    counts
}

/// Sorts artist counts by count, highest first, and keeps `limit` entries.
/// Equal counts keep their first-seen order.
pub fn rank_artists(mut counts: ArtistPlayCounts, limit: usize) -> ArtistPlayCounts {
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.truncate(limit);
    counts
}

/// Tallies plays per track and returns the `limit` most played. Tracks are
/// told apart by [`crate::types::ApiTrack::key`].
///
/// The sort is stable, so tracks with the same count stay in the order they
/// were first seen in the window.
pub fn top_tracks_by_count(items: &[PlayHistory], limit: usize) -> Vec<TrackPlayAggregate> {
    let mut tracks: Vec<TrackPlayAggregate> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for item in items {
        let track = &item.track;
        match index.get(track.key()) {
            Some(&i) => tracks[i].count += 1,
            None => {
                index.insert(track.key(), tracks.len());
                tracks.push(TrackPlayAggregate {
                    id: track.id.clone(),
                    name: track.name.clone(),
                    image: track.album.as_ref().and_then(|a| first_image(&a.images)),
                    count: 1,
                });
            }
        }
    }

    tracks.sort_by(|a, b| b.count.cmp(&a.count));
    tracks.truncate(limit);
    tracks
}

/// Takes the first `window` items and drops repeated tracks, keeping the
/// first occurrence and the arrival order.
pub fn unique_recent_tracks(items: &[PlayHistory], window: usize) -> Vec<Track> {
    let mut seen = HashSet::new();
    items
        .iter()
        .take(window)
        .filter(|item| seen.insert(item.track.key()))
        .map(|item| Track::from(item.track.clone()))
        .collect()
}
