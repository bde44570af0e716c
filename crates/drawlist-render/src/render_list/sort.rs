//! Sort-key building, sorting and batch dispatch.

use drawlist_core::math::Mat4;
use drawlist_core::profiling::{profile_function, profile_scope};
use static_assertions::assert_eq_size;

use super::{
    BATCH_KEY_MASK, DispatchHandle, DispatchOperation, DispatchParams, DispatchRegistry,
    MajorOrder, Range, RenderListEntry, Visibility,
};
use crate::render_object::RenderObjectList;

/// Integer span world depths are quantized into.
pub const DEPTH_RANGE: f32 = 16_777_215.0;

/// Derived per-entry sort data, rebuilt on every draw.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SortValue {
    /// Clip-space depth `z / w` of a world entry.
    pub zw: f32,
    pub order: u32,
    /// Batch key in the low 24 bits, dispatch handle in the high 8.
    pub batch_key: u32,
    pub minor_order: u8,
    pub major_order: MajorOrder,
}

assert_eq_size!(SortValue, [u32; 4]);

impl SortValue {
    #[inline]
    pub fn pack_batch_key(batch_key: u32, dispatch: DispatchHandle) -> u32 {
        (batch_key & BATCH_KEY_MASK) | ((dispatch.0 as u32) << 24)
    }

    #[inline]
    pub fn dispatch(&self) -> DispatchHandle {
        DispatchHandle((self.batch_key >> 24) as u8)
    }
}

/// Counts produced by [`RenderListSorter::build_keys`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SortKeyStats {
    /// Entries that entered the sort buffer.
    pub sorted: usize,
    /// Entries left out because they are not visible.
    pub culled: usize,
}

/// Per-draw scratch buffers for sorting.
#[derive(Debug, Default)]
pub struct RenderListSorter {
    values: Vec<SortValue>,
    buffer: Vec<u32>,
}

impl RenderListSorter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arena indices of the sort buffer, sorted after [`RenderListSorter::sort`].
    pub fn buffer(&self) -> &[u32] {
        &self.buffer
    }

    pub fn value(&self, index: u32) -> Option<&SortValue> {
        self.values.get(index as usize)
    }

    /// Fill the sort buffer with the visible entries of non-skipped ranges.
    ///
    /// World entries are keyed by their clip-space depth, quantized over the
    /// depth span of the entries that made it in, nearer first. Other entries
    /// keep their explicit order.
    pub fn build_keys(
        &mut self,
        entries: &[RenderListEntry],
        indices: &[u32],
        ranges: &[Range],
        view_proj: &Mat4,
    ) -> SortKeyStats {
        profile_function!();
        self.buffer.clear();
        self.values.clear();
        self.values.resize(entries.len(), SortValue::default());

        let mut stats = SortKeyStats::default();
        let mut min_zw = f32::MAX;
        let mut max_zw = -f32::MAX;

        for range in ranges.iter().filter(|range| !range.skip) {
            debug_assert!(range.start + range.count <= indices.len());
            for &index in &indices[range.span()] {
                let entry = &entries[index as usize];
                if entry.visibility == Visibility::None {
                    stats.culled += 1;
                    continue;
                }

                let value = &mut self.values[index as usize];
                value.major_order = entry.major_order;
                value.minor_order = entry.minor_order;
                value.batch_key = SortValue::pack_batch_key(entry.batch_key, entry.dispatch);
                if entry.major_order == MajorOrder::World {
                    let clip = *view_proj * entry.world_position.extend(1.0);
                    let zw = clip.z / clip.w;
                    value.zw = zw;
                    if zw.is_finite() {
                        min_zw = min_zw.min(zw);
                        max_zw = max_zw.max(zw);
                    }
                } else {
                    value.order = entry.order;
                }
                self.buffer.push(index);
            }
        }

        let scale = if max_zw > min_zw {
            DEPTH_RANGE / (max_zw - min_zw)
        } else {
            1.0
        };
        for &index in &self.buffer {
            if entries[index as usize].major_order == MajorOrder::World {
                let value = &mut self.values[index as usize];
                value.order = quantize_depth(value.zw, min_zw, scale);
            }
        }

        stats.sorted = self.buffer.len();
        stats
    }

    /// Sort the buffer by major order, order, minor order and batch key.
    /// Ties keep submission order.
    pub fn sort(&mut self) {
        profile_function!();
        let values = &self.values;
        self.buffer.sort_unstable_by_key(|&index| {
            let value = &values[index as usize];
            (
                value.major_order,
                value.order,
                value.minor_order,
                value.batch_key,
                index,
            )
        });
    }

    /// Send `Begin` to every dispatch, one `Batch` per maximal run sharing
    /// dispatch, batch key and minor order, then `End` to every dispatch.
    ///
    /// Runs of entries without a valid dispatch are skipped. Returns the
    /// number of batches dispatched.
    pub fn dispatch(
        &self,
        entries: &[RenderListEntry],
        dispatches: &mut DispatchRegistry,
        render_objects: &mut RenderObjectList,
    ) -> usize {
        profile_function!();
        notify_all(DispatchOperation::Begin, entries, dispatches, render_objects);

        let mut batches = 0;
        {
            profile_scope!("batches");
            let run_key = |index: u32| {
                let value = &self.values[index as usize];
                (value.batch_key, value.minor_order)
            };

            let mut start = 0;
            while start < self.buffer.len() {
                let key = run_key(self.buffer[start]);
                let end = start
                    + self.buffer[start..]
                        .iter()
                        .position(|&index| run_key(index) != key)
                        .unwrap_or(self.buffer.len() - start);

                let handle = self.values[self.buffer[start] as usize].dispatch();
                if let Some(dispatch) = dispatches.get_mut(handle) {
                    dispatch.dispatch(&mut DispatchParams {
                        operation: DispatchOperation::Batch,
                        entries,
                        indices: &self.buffer[start..end],
                        render_objects: &mut *render_objects,
                    });
                    batches += 1;
                }
                start = end;
            }
        }

        notify_all(DispatchOperation::End, entries, dispatches, render_objects);
        tracing::trace!(
            "Dispatched {} batches from {} sorted entries",
            batches,
            self.buffer.len()
        );
        batches
    }

    pub fn clear(&mut self) {
        self.values.clear();
        self.buffer.clear();
    }
}

/// Map a clip-space depth onto `0..=DEPTH_RANGE`.
///
/// Depths at or behind the eye (`w == 0` gives `-inf`) go first, anything
/// else non-finite goes last.
fn quantize_depth(zw: f32, min_zw: f32, scale: f32) -> u32 {
    if zw.is_finite() {
        ((zw - min_zw) * scale).clamp(0.0, DEPTH_RANGE) as u32
    } else if zw == f32::NEG_INFINITY {
        0
    } else {
        DEPTH_RANGE as u32
    }
}

fn notify_all(
    operation: DispatchOperation,
    entries: &[RenderListEntry],
    dispatches: &mut DispatchRegistry,
    render_objects: &mut RenderObjectList,
) {
    for dispatch in dispatches.iter_mut() {
        dispatch.dispatch(&mut DispatchParams {
            operation,
            entries,
            indices: &[],
            render_objects: &mut *render_objects,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tags::TagListKey;
    use drawlist_core::math::Vec3;

    fn full_range(count: usize) -> Vec<Range> {
        vec![Range {
            tag_list_key: TagListKey::default(),
            start: 0,
            count,
            skip: false,
        }]
    }

    fn world_entry(z: f32) -> RenderListEntry {
        RenderListEntry {
            world_position: Vec3::new(0.0, 0.0, z),
            dispatch: DispatchHandle(0),
            visibility: Visibility::Full,
            ..Default::default()
        }
    }

    fn sorted(entries: &[RenderListEntry], view_proj: &Mat4) -> (Vec<u32>, SortKeyStats) {
        let indices: Vec<u32> = (0..entries.len() as u32).collect();
        let mut sorter = RenderListSorter::new();
        let stats = sorter.build_keys(entries, &indices, &full_range(entries.len()), view_proj);
        sorter.sort();
        (sorter.buffer().to_vec(), stats)
    }

    #[test]
    fn test_world_entries_sort_nearer_first() {
        let entries = [world_entry(3.0), world_entry(1.0), world_entry(2.0)];
        let (order, _) = sorted(&entries, &Mat4::IDENTITY);
        assert_eq!(order, vec![1, 2, 0]);
    }

    #[test]
    fn test_entry_at_eye_keeps_depth_order() {
        let view = Mat4::look_at_rh(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO, Vec3::Y);
        let projection = Mat4::perspective_rh_gl(1.0, 1.0, 0.1, 100.0);
        let view_proj = projection * view;
        let entries = [
            world_entry(-5.0),
            world_entry(5.0),
            world_entry(0.0),
            world_entry(10.0),
        ];

        let indices: Vec<u32> = (0..entries.len() as u32).collect();
        let mut sorter = RenderListSorter::new();
        sorter.build_keys(&entries, &indices, &full_range(entries.len()), &view_proj);
        assert_eq!(sorter.value(3).map(|v| v.order), Some(0));

        sorter.sort();
        let finite: Vec<u32> = sorter
            .buffer()
            .iter()
            .copied()
            .filter(|&index| index != 3)
            .collect();
        assert_eq!(finite, vec![1, 2, 0]);

        let order = |index| sorter.value(index).map(|v| v.order).unwrap_or_default();
        assert!(order(1) < order(2));
        assert!(order(2) < order(0));
    }

    #[test]
    fn test_non_finite_depth_saturates() {
        assert_eq!(quantize_depth(f32::NEG_INFINITY, 0.0, 1.0), 0);
        assert_eq!(quantize_depth(f32::INFINITY, 0.0, 1.0), DEPTH_RANGE as u32);
        assert_eq!(quantize_depth(f32::NAN, 0.0, 1.0), DEPTH_RANGE as u32);
    }

    #[test]
    fn test_single_depth_uses_fallback_scale() {
        let entries = [world_entry(4.0), world_entry(4.0)];
        let indices = [0, 1];
        let mut sorter = RenderListSorter::new();
        sorter.build_keys(&entries, &indices, &full_range(2), &Mat4::IDENTITY);

        assert_eq!(sorter.value(0).map(|v| v.order), Some(0));
        assert_eq!(sorter.value(1).map(|v| v.order), Some(0));
    }

    #[test]
    fn test_depth_span_is_fully_used() {
        let entries = [world_entry(-1.0), world_entry(1.0)];
        let indices = [0, 1];
        let mut sorter = RenderListSorter::new();
        sorter.build_keys(&entries, &indices, &full_range(2), &Mat4::IDENTITY);

        assert_eq!(sorter.value(0).map(|v| v.order), Some(0));
        assert_eq!(sorter.value(1).map(|v| v.order), Some(DEPTH_RANGE as u32));
    }

    #[test]
    fn test_invisible_and_skipped_entries_are_excluded() {
        let mut entries = vec![world_entry(1.0), world_entry(2.0), world_entry(3.0)];
        entries[1].visibility = Visibility::None;
        let indices = [0, 1, 2];
        let ranges = [
            Range {
                tag_list_key: TagListKey(1),
                start: 0,
                count: 2,
                skip: false,
            },
            Range {
                tag_list_key: TagListKey(2),
                start: 2,
                count: 1,
                skip: true,
            },
        ];

        let mut sorter = RenderListSorter::new();
        let stats = sorter.build_keys(&entries, &indices, &ranges, &Mat4::IDENTITY);

        assert_eq!(sorter.buffer(), &[0]);
        assert_eq!(stats, SortKeyStats { sorted: 1, culled: 1 });
    }

    #[test]
    fn test_major_order_dominates_depth() {
        let mut entries = [world_entry(9.0), world_entry(1.0), world_entry(5.0)];
        entries[0].major_order = MajorOrder::BeforeWorld;
        entries[0].order = 100;
        entries[1].major_order = MajorOrder::AfterWorld;

        let (order, _) = sorted(&entries, &Mat4::IDENTITY);
        assert_eq!(order, vec![0, 2, 1]);
    }

    #[test]
    fn test_pack_batch_key_keeps_dispatches_apart() {
        let a = SortValue::pack_batch_key(0xff00_0001, DispatchHandle(1));
        let b = SortValue::pack_batch_key(0x0000_0001, DispatchHandle(2));

        assert_eq!(a & BATCH_KEY_MASK, 1);
        assert_ne!(a, b);
        assert_eq!(
            SortValue {
                batch_key: a,
                ..Default::default()
            }
            .dispatch(),
            DispatchHandle(1)
        );
    }
}
