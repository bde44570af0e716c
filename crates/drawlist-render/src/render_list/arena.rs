//! Per-frame entry arena.

use drawlist_core::profiling::profile_function;

use super::RenderListEntry;

/// Index range of arena slots returned by [`RenderListArena::alloc`].
///
/// A span is valid until the next allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderListSpan {
    pub begin: u32,
    pub end: u32,
}

impl RenderListSpan {
    pub fn len(&self) -> usize {
        (self.end - self.begin) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.begin == self.end
    }

    /// Arena index of slot `offset` within the span.
    pub fn index(&self, offset: u32) -> u32 {
        debug_assert!(offset < self.end - self.begin);
        self.begin + offset
    }
}

/// Append-only storage for one frame of render-list entries, with the index
/// array of submitted entries.
///
/// Both buffers keep their storage across frames.
#[derive(Debug, Default)]
pub struct RenderListArena {
    entries: Vec<RenderListEntry>,
    indices: Vec<u32>,
    last_alloc: RenderListSpan,
}

impl RenderListArena {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            indices: Vec::with_capacity(capacity),
            last_alloc: RenderListSpan::default(),
        }
    }

    /// Reserve `count` default-initialized slots.
    ///
    /// Storage grows geometrically.
    pub fn alloc(&mut self, count: usize) -> RenderListSpan {
        profile_function!();
        let begin = self.entries.len();
        let end = begin + count;

        if end > self.entries.capacity() {
            let target = end.max(self.entries.capacity() * 2);
            self.entries.reserve_exact(target - begin);
            self.indices
                .reserve(target.saturating_sub(self.indices.len()));
        }
        self.entries.resize(end, RenderListEntry::default());

        self.last_alloc = RenderListSpan {
            begin: begin as u32,
            end: end as u32,
        };
        self.last_alloc
    }

    /// Commit entries `begin..end` of the last allocation.
    ///
    /// The arena is truncated back to `end`, releasing the unused tail of the
    /// allocation. An empty range leaves the arena untouched. Returns the
    /// number of committed entries.
    pub fn submit(&mut self, begin: u32, end: u32) -> usize {
        profile_function!();
        debug_assert!(begin <= end, "submit range is reversed");
        debug_assert!(
            begin >= self.last_alloc.begin && end <= self.last_alloc.end,
            "submit range {}..{} is outside the last allocation {}..{}",
            begin,
            end,
            self.last_alloc.begin,
            self.last_alloc.end
        );
        if begin == end {
            return 0;
        }

        self.entries.truncate(end as usize);
        self.last_alloc.end = end;
        self.indices.extend(begin..end);
        (end - begin) as usize
    }

    pub fn entries(&self) -> &[RenderListEntry] {
        &self.entries
    }

    pub fn entries_mut(&mut self) -> &mut [RenderListEntry] {
        &mut self.entries
    }

    pub fn span_mut(&mut self, span: RenderListSpan) -> &mut [RenderListEntry] {
        &mut self.entries[span.begin as usize..span.end as usize]
    }

    /// Arena indices of submitted entries.
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Entries and index array, borrowed together.
    pub fn split_mut(&mut self) -> (&[RenderListEntry], &mut [u32]) {
        (&self.entries, &mut self.indices)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn submitted(&self) -> usize {
        self.indices.len()
    }

    pub fn capacity(&self) -> usize {
        self.entries.capacity()
    }

    pub fn reset(&mut self) {
        self.entries.clear();
        self.indices.clear();
        self.last_alloc = RenderListSpan::default();
    }
}
