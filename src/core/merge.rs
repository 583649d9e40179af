//! Merging of thread fragments that share a title.

use std::collections::BTreeMap;

use crate::identity::ResolvedFragment;
use crate::thread::ConsolidatedThread;

/// Combines resolved fragments into one thread per distinct title.
///
/// Within a title, fragments are ordered by the timestamp of their oldest
/// message; fragments without messages go last and ties keep archive order.
/// Messages are then concatenated fragment by fragment, so the result is
/// ordered at fragment granularity. Threads are returned sorted by title.
///
/// # Example
///
/// Input:  `[("Alice", 2020-01-01 ..), ("Alice", 2019-06-01 ..)]`
/// Output: `[("Alice", 2019-06-01 .. 2020-01-01 ..)]`
pub fn merge_fragments(fragments: Vec<ResolvedFragment>) -> Vec<ConsolidatedThread> {
    let mut groups: BTreeMap<String, Vec<ResolvedFragment>> = BTreeMap::new();
    for fragment in fragments {
        groups.entry(fragment.title.clone()).or_default().push(fragment);
    }

    groups
        .into_iter()
        .map(|(title, mut group)| {
            // Option orders None first; flip it so empty fragments sort last
            group.sort_by_key(|f| match f.first_timestamp() {
                Some(ts) => (false, Some(ts)),
                None => (true, None),
            });
            let messages = group.into_iter().flat_map(|f| f.messages).collect();
            ConsolidatedThread::new(title, messages)
        })
        .collect()
}

/// Counts gathered over one parse of an archive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArchiveStats {
    /// `div.thread` elements read from the archive.
    pub fragments: usize,
    /// Messages across all threads.
    pub messages: usize,
    /// Threads after merging.
    pub threads: usize,
}

impl ArchiveStats {
    /// Collects statistics for merged `threads` built from `fragments`.
    pub fn collect(fragments: usize, threads: &[ConsolidatedThread]) -> Self {
        Self {
            fragments,
            messages: threads.iter().map(|t| t.messages().len()).sum(),
            threads: threads.len(),
        }
    }

    /// Percentage of fragments folded into another fragment's thread.
    pub fn merge_ratio(&self) -> f64 {
        if self.fragments == 0 {
            return 0.0;
        }
        (1.0 - (self.threads as f64 / self.fragments as f64)) * 100.0
    }
}
