//! Partitioning of submitted entries into tag-list ranges.

use drawlist_core::profiling::profile_function;

use super::RenderListEntry;
use crate::predicate::{Predicate, accepts};
use crate::tags::{TagListKey, TagListRegistry};

/// A run of the index array whose entries share one tag list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Range {
    pub tag_list_key: TagListKey,
    /// Offset into the index array, not the arena.
    pub start: usize,
    pub count: usize,
    /// Rejected by the predicate of the current draw call.
    pub skip: bool,
}

impl Range {
    pub fn span(&self) -> std::ops::Range<usize> {
        self.start..self.start + self.count
    }
}

/// Builds and caches the tag-list ranges of a frame.
///
/// Ranges stay valid until the next submission marks them dirty.
#[derive(Debug)]
pub struct RangePartitioner {
    ranges: Vec<Range>,
    stack: Vec<(usize, usize)>,
    dirty: bool,
}

impl RangePartitioner {
    pub fn new() -> Self {
        Self {
            ranges: Vec::new(),
            stack: Vec::new(),
            dirty: true,
        }
    }

    /// Force a rebuild on the next [`RangePartitioner::build`].
    pub fn invalidate(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn ranges(&self) -> &[Range] {
        &self.ranges
    }

    /// Rebuild the ranges if a submission happened since the last build.
    ///
    /// `indices` is reordered so entries of one tag list are contiguous,
    /// keeping submission order within a tag list. Returns `true` when the
    /// ranges were rebuilt.
    pub fn build(&mut self, entries: &[RenderListEntry], indices: &mut [u32]) -> bool {
        if !self.dirty {
            return false;
        }
        profile_function!();

        let key_of = |index: u32| entries[index as usize].tag_list_key;
        indices.sort_by_key(|&index| key_of(index));

        self.ranges.clear();
        self.stack.clear();
        self.stack.push((0, indices.len()));

        // Split around the run holding the middle key, one distinct key per step
        while let Some((low, high)) = self.stack.pop() {
            if low >= high {
                continue;
            }
            let window = &indices[low..high];
            let key = key_of(window[window.len() / 2]);
            let start = low + window.partition_point(|&index| key_of(index) < key);
            let end = low + window.partition_point(|&index| key_of(index) <= key);

            self.ranges.push(Range {
                tag_list_key: key,
                start,
                count: end - start,
                skip: false,
            });
            self.stack.push((end, high));
            self.stack.push((low, start));
        }
        self.ranges.sort_unstable_by_key(|range| range.start);

        tracing::trace!(
            "Partitioned {} entries into {} ranges",
            indices.len(),
            self.ranges.len()
        );
        self.dirty = false;
        true
    }

    /// Mark ranges whose tags do not overlap `predicate`. Returns the number of
    /// skipped ranges.
    pub fn apply_predicate(
        &mut self,
        predicate: Option<&Predicate>,
        tag_lists: &TagListRegistry,
    ) -> usize {
        let mut skipped = 0;
        for range in &mut self.ranges {
            range.skip = !accepts(predicate, tag_lists.tags(range.tag_list_key));
            skipped += range.skip as usize;
        }
        skipped
    }

    pub fn reset(&mut self) {
        self.ranges.clear();
        self.dirty = true;
    }
}

impl Default for RangePartitioner {
    fn default() -> Self {
        Self::new()
    }
}
