/*!
 * Time-indexed storage for parsed subtitle entries.
 *
 * The store maps start times to the entries that begin there, preserving
 * parse order for entries sharing a start time. It is populated once per
 * script load and queried repeatedly on a playback-driven cadence; a
 * copy-on-write wrapper is provided for callers that hot-reload scripts
 * while queries are in flight.
 */

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use log::debug;
use parking_lot::RwLock;

use crate::markup::StyleRange;
use crate::timecode::TimeCode;

/// One parsed subtitle entry.
///
/// Immutable after construction: the parser builds it once and the store
/// owns it until the script is invalidated. `text` carries no markup
/// delimiters; styling lives in `style_ranges`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitleEntry {
    /// Time the entry becomes visible
    pub start: TimeCode,
    /// Time the entry stops being visible (exclusive)
    pub end: TimeCode,
    /// Plain text with markup stripped
    pub text: String,
    /// Styled ranges covering `text`, in left-to-right order
    pub style_ranges: Vec<StyleRange>,
}

impl SubtitleEntry {
    /// Create a new subtitle entry
    pub fn new(start: TimeCode, end: TimeCode, text: String, style_ranges: Vec<StyleRange>) -> Self {
        SubtitleEntry {
            start,
            end,
            text,
            style_ranges,
        }
    }

    /// Whether the entry is visible at `now` (`start <= now < end`)
    pub fn is_active_at(&self, now: TimeCode) -> bool {
        self.start <= now && now < self.end
    }
}

impl fmt::Display for SubtitleEntry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{} --> {}", self.start, self.end)?;
        writeln!(f, "{}", self.text)?;
        writeln!(f)
    }
}

/// Start-time-indexed collection of subtitle entries.
///
/// Entries sharing a start time keep their parse order, which is their
/// display order. The map key always equals the entry's own start time.
#[derive(Debug, Default)]
pub struct TimedEntryStore {
    entries: BTreeMap<TimeCode, Vec<SubtitleEntry>>,
}

impl TimedEntryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry under its own start time, after any entry already
    /// stored there
    pub fn insert(&mut self, entry: SubtitleEntry) {
        self.entries.entry(entry.start).or_default().push(entry);
    }

    /// All entries visible at `now`, in start-time order with ties broken
    /// by parse order. The boundary `now == end` excludes an entry.
    pub fn active_entries(&self, now: TimeCode) -> Vec<&SubtitleEntry> {
        self.entries
            .range(..=now)
            .flat_map(|(_, list)| list)
            .filter(|entry| entry.is_active_at(now))
            .collect()
    }

    /// Number of entries visible at `now`
    pub fn active_count(&self, now: TimeCode) -> usize {
        self.entries
            .range(..=now)
            .flat_map(|(_, list)| list)
            .filter(|entry| entry.is_active_at(now))
            .count()
    }

    /// Iterate all entries in start-time order
    pub fn iter(&self) -> impl Iterator<Item = &SubtitleEntry> {
        self.entries.values().flatten()
    }

    /// Iterate the distinct start times in ascending order
    pub fn start_times(&self) -> impl Iterator<Item = TimeCode> + '_ {
        self.entries.keys().copied()
    }

    /// Total number of stored entries
    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    /// True when the store holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every entry. Idempotent.
    pub fn invalidate(&mut self) {
        if !self.entries.is_empty() {
            debug!("Invalidating subtitle store ({} entries)", self.len());
        }
        self.entries.clear();
    }
}

/// Copy-on-write handle over a [`TimedEntryStore`].
///
/// Playback-side readers take an `Arc` snapshot and query it without
/// holding any lock; a script reload builds a fresh store off to the side
/// and swaps it in atomically. Readers still holding the old snapshot keep
/// seeing the old entries until they re-snapshot.
#[derive(Debug, Default)]
pub struct SharedStore {
    inner: RwLock<Arc<TimedEntryStore>>,
}

impl SharedStore {
    /// Create a handle over an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Current snapshot for querying
    pub fn snapshot(&self) -> Arc<TimedEntryStore> {
        self.inner.read().clone()
    }

    /// Replace the store with a freshly parsed one
    pub fn swap(&self, store: TimedEntryStore) {
        debug!("Swapping subtitle store ({} entries)", store.len());
        *self.inner.write() = Arc::new(store);
    }

    /// Replace the store with an empty one. Idempotent.
    pub fn invalidate(&self) {
        *self.inner.write() = Arc::new(TimedEntryStore::new());
    }
}
