use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::str::FromStr;

use bytes::Bytes;

use crate::util::FreqTable;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedEntry {
    pub key: Bytes,
    pub count: u64,
    pub rank: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectStrategy {
    /// Sort every entry, take the first k. O(n log n).
    FullSort,
    /// Min-heap capped at k entries. O(n log k), wins when k is small
    /// against the number of distinct records.
    BoundedHeap,
}

impl FromStr for SelectStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, String> {
        match s {
            "sort" => Ok(SelectStrategy::FullSort),
            "heap" => Ok(SelectStrategy::BoundedHeap),
            other => Err(format!(
                "unknown selection strategy \"{}\" (expected \"sort\" or \"heap\")",
                other
            )),
        }
    }
}

// Total order shared by both strategies: higher count first, equal
// counts fall back to ascending key order. Less means ranks earlier.
fn rank_cmp(a: &(Bytes, u64), b: &(Bytes, u64)) -> Ordering {
    b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0))
}

// Heap wrapper: the maximum is the entry ranking last, so the heap top
// is always the current eviction candidate.
struct Worst((Bytes, u64));

impl PartialEq for Worst {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Worst {}

impl PartialOrd for Worst {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Worst {
    fn cmp(&self, other: &Self) -> Ordering {
        rank_cmp(&self.0, &other.0)
    }
}

/// Extracts the `min(k, |table|)` entries ranking first, 1-based ranks
/// assigned in order. Both strategies produce identical sequences, ties
/// included.
pub fn select_top_k(table: &FreqTable, k: usize, strategy: SelectStrategy) -> Vec<RankedEntry> {
    let entries = match strategy {
        SelectStrategy::FullSort => full_sort(table, k),
        SelectStrategy::BoundedHeap => bounded_heap(table, k),
    };

    entries
        .into_iter()
        .enumerate()
        .map(|(i, (key, count))| RankedEntry {
            key,
            count,
            rank: i + 1,
        })
        .collect()
}

fn full_sort(table: &FreqTable, k: usize) -> Vec<(Bytes, u64)> {
    let mut entries: Vec<(Bytes, u64)> = table
        .iter()
        .map(|(key, &count)| (key.clone(), count))
        .collect();
    entries.sort_unstable_by(rank_cmp);
    entries.truncate(k);
    entries
}

fn bounded_heap(table: &FreqTable, k: usize) -> Vec<(Bytes, u64)> {
    if k == 0 {
        return Vec::new();
    }

    let mut heap: BinaryHeap<Worst> = BinaryHeap::with_capacity(k + 1);
    for (key, &count) in table.iter() {
        let candidate = (key.clone(), count);
        if heap.len() < k {
            heap.push(Worst(candidate));
        } else {
            let replace = match heap.peek() {
                Some(worst) => rank_cmp(&candidate, &worst.0) == Ordering::Less,
                None => true,
            };
            if replace {
                heap.pop();
                heap.push(Worst(candidate));
            }
        }
    }

    let mut entries: Vec<(Bytes, u64)> = heap.into_iter().map(|worst| worst.0).collect();
    entries.sort_unstable_by(rank_cmp);
    entries
}
