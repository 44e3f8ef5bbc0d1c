//! Recent download history.
//!
//! History lives with the client, never on the server. [`RecentDownloads`]
//! holds the rules (dedup, caps, grouping) and delegates persistence to an
//! injected [`HistoryStore`], so the same logic works against browser
//! storage, a file or plain memory.

use std::collections::{BTreeSet, HashMap};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::resolution::ResolutionTier;
use crate::video_id::VideoIdentifier;

/// Maximum number of video groups returned by [`RecentDownloads::list`].
pub const MAX_HISTORY: usize = 10;

/// Maximum number of raw records kept in the store.
pub const MAX_STORAGE_ITEMS: usize = MAX_HISTORY * 5;

/// One downloaded thumbnail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub video_id: VideoIdentifier,
    pub resolution: ResolutionTier,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
}

/// Downloads of one video, aggregated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryGroup {
    pub video_id: VideoIdentifier,
    pub resolutions: BTreeSet<ResolutionTier>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub last_downloaded: DateTime<Utc>,
}

/// Persistence medium for history records.
pub trait HistoryStore {
    /// Load all records, newest first. Unreadable data loads as empty.
    fn load(&self) -> Vec<HistoryEntry>;

    /// Replace all records.
    fn save(&mut self, entries: &[HistoryEntry]);
}

/// Store that keeps records in memory only.
#[derive(Debug, Clone, Default)]
pub struct InMemoryHistoryStore {
    entries: Vec<HistoryEntry>,
}

impl HistoryStore for InMemoryHistoryStore {
    fn load(&self) -> Vec<HistoryEntry> {
        self.entries.clone()
    }

    fn save(&mut self, entries: &[HistoryEntry]) {
        self.entries = entries.to_vec();
    }
}

/// Decode a JSON snapshot. Corrupted data yields an empty history.
pub fn entries_from_json(raw: &str) -> Vec<HistoryEntry> {
    serde_json::from_str(raw).unwrap_or_default()
}

/// Encode records as a JSON snapshot.
pub fn entries_to_json(entries: &[HistoryEntry]) -> serde_json::Result<String> {
    serde_json::to_string(entries)
}

/// Recent download history over an injected store.
pub struct RecentDownloads<S: HistoryStore> {
    store: S,
}

impl<S: HistoryStore> RecentDownloads<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Record a download. An earlier record for the same video and tier is
    /// replaced, and the oldest records beyond the storage cap are dropped.
    pub fn add(&mut self, video_id: VideoIdentifier, resolution: ResolutionTier, at: DateTime<Utc>) {
        let existing = self.store.load();
        let mut entries = Vec::with_capacity(existing.len() + 1);
        entries.push(HistoryEntry {
            video_id: video_id.clone(),
            resolution,
            timestamp: at,
        });
        entries.extend(
            existing
                .into_iter()
                .filter(|e| !(e.video_id == video_id && e.resolution == resolution)),
        );
        entries.truncate(MAX_STORAGE_ITEMS);
        self.store.save(&entries);
    }

    /// Downloads grouped by video, most recently downloaded first.
    pub fn list(&self) -> Vec<HistoryGroup> {
        let mut groups: HashMap<VideoIdentifier, HistoryGroup> = HashMap::new();

        for entry in self.store.load() {
            let group = groups
                .entry(entry.video_id.clone())
                .or_insert_with(|| HistoryGroup {
                    video_id: entry.video_id.clone(),
                    resolutions: BTreeSet::new(),
                    last_downloaded: entry.timestamp,
                });
            group.last_downloaded = group.last_downloaded.max(entry.timestamp);
            group.resolutions.insert(entry.resolution);
        }

        let mut groups: Vec<HistoryGroup> = groups.into_values().collect();
        groups.sort_by(|a, b| b.last_downloaded.cmp(&a.last_downloaded));
        groups.truncate(MAX_HISTORY);
        groups
    }

    pub fn clear(&mut self) {
        self.store.save(&[]);
    }

    pub fn is_empty(&self) -> bool {
        self.store.load().is_empty()
    }

    pub fn into_store(self) -> S {
        self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn vid(n: usize) -> VideoIdentifier {
        VideoIdentifier::parse(&format!("video{:06}", n)).unwrap()
    }

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000, 0).unwrap() + Duration::seconds(secs)
    }

    #[test]
    fn test_add_deduplicates_by_video_and_tier() {
        let mut history = RecentDownloads::new(InMemoryHistoryStore::default());
        history.add(vid(1), ResolutionTier::High, at(0));
        history.add(vid(1), ResolutionTier::MaxRes, at(1));
        history.add(vid(1), ResolutionTier::High, at(2));

        let entries = history.into_store().load();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].resolution, ResolutionTier::High);
        assert_eq!(entries[0].timestamp, at(2));
        assert_eq!(entries[1].resolution, ResolutionTier::MaxRes);
    }

    #[test]
    fn test_storage_is_capped() {
        let mut history = RecentDownloads::new(InMemoryHistoryStore::default());
        for i in 0..(MAX_STORAGE_ITEMS + 7) {
            history.add(vid(i), ResolutionTier::Default, at(i as i64));
        }

        let entries = history.into_store().load();
        assert_eq!(entries.len(), MAX_STORAGE_ITEMS);
        // Newest first, oldest dropped
        assert_eq!(entries[0].video_id, vid(MAX_STORAGE_ITEMS + 6));
        assert_eq!(entries.last().unwrap().video_id, vid(7));
    }

    #[test]
    fn test_list_groups_and_sorts() {
        let mut history = RecentDownloads::new(InMemoryHistoryStore::default());
        history.add(vid(1), ResolutionTier::High, at(0));
        history.add(vid(2), ResolutionTier::MaxRes, at(5));
        history.add(vid(1), ResolutionTier::Medium, at(10));

        let groups = history.list();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].video_id, vid(1));
        assert_eq!(groups[0].last_downloaded, at(10));
        assert_eq!(
            groups[0].resolutions.iter().copied().collect::<Vec<_>>(),
            vec![ResolutionTier::High, ResolutionTier::Medium]
        );
        assert_eq!(groups[1].video_id, vid(2));
    }

    #[test]
    fn test_list_is_capped_at_max_history() {
        let mut history = RecentDownloads::new(InMemoryHistoryStore::default());
        for i in 0..(MAX_HISTORY + 3) {
            history.add(vid(i), ResolutionTier::High, at(i as i64));
        }

        let groups = history.list();
        assert_eq!(groups.len(), MAX_HISTORY);
        assert_eq!(groups[0].video_id, vid(MAX_HISTORY + 2));
    }

    #[test]
    fn test_clear() {
        let mut history = RecentDownloads::new(InMemoryHistoryStore::default());
        history.add(vid(1), ResolutionTier::High, at(0));
        assert!(!history.is_empty());

        history.clear();
        assert!(history.is_empty());
        assert!(history.list().is_empty());
    }

    #[test]
    fn test_json_snapshot() {
        let entries = vec![HistoryEntry {
            video_id: vid(1),
            resolution: ResolutionTier::Standard,
            timestamp: at(0),
        }];
        let json = entries_to_json(&entries).unwrap();
        assert!(json.contains("\"videoId\":\"video000001\""));
        assert!(json.contains("\"resolution\":\"sddefault\""));
        assert!(json.contains("\"timestamp\":1700000000000"));

        assert_eq!(entries_from_json(&json), entries);
        assert!(entries_from_json("{not json").is_empty());
        assert!(entries_from_json("[{\"videoId\":\"bad\"}]").is_empty());
    }
}
