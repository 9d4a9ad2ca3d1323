use alloc::vec::Vec;

use crate::fenwick::Fenwick;

/// Smallest extent ever recorded for an item. Zero-sized measurements are clamped up to this.
pub const MIN_EXTENT: u32 = 1;

/// Per-index extents, measured or estimated.
///
/// Measured extents are stored exactly. Every index that has not been measured contributes the
/// running average of all measured extents (or the configured default while nothing has been
/// measured), so the total extent converges as more rows are rendered without ever touching the
/// unseen ones.
///
/// Offsets are derived from two prefix trees (measured extents, measured flags):
/// `offset_of(i) = measured_sum[0, i) + unmeasured_count[0, i) * estimate`, which keeps offset
/// queries and offset → index lookups at `O(log n)` regardless of how the average moves.
#[derive(Clone, Debug)]
pub struct HeightModel {
    default_extent: u32,
    extents: Vec<u32>, // 0 = not measured
    sums: Fenwick,
    measured: Fenwick,
}

impl HeightModel {
    pub fn new(size: usize, default_extent: u32) -> Self {
        Self {
            default_extent: default_extent.max(MIN_EXTENT),
            extents: alloc::vec![0; size],
            sums: Fenwick::new(size),
            measured: Fenwick::new(size),
        }
    }

    pub fn len(&self) -> usize {
        self.extents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extents.is_empty()
    }

    pub fn default_extent(&self) -> u32 {
        self.default_extent
    }

    pub fn measured_count(&self) -> usize {
        self.measured.total() as usize
    }

    pub fn is_measured(&self, index: usize) -> bool {
        self.extents.get(index).is_some_and(|&e| e != 0)
    }

    pub fn measured_extent(&self, index: usize) -> Option<u32> {
        self.extents.get(index).copied().filter(|&e| e != 0)
    }

    /// The extent assumed for any index that has not been measured yet.
    pub fn average_extent(&self) -> u32 {
        let count = self.measured.total();
        if count == 0 {
            return self.default_extent;
        }
        let sum = self.sums.total();
        let avg = (sum + count / 2) / count;
        (avg.min(u32::MAX as u64) as u32).max(MIN_EXTENT)
    }

    /// Measured extent if known, otherwise the running average.
    pub fn estimate(&self, index: usize) -> u32 {
        self.measured_extent(index)
            .unwrap_or_else(|| self.average_extent())
    }

    /// Stores a measured extent and returns how much the index's extent moved (measured or
    /// estimated before, measured now). Out-of-range indexes are ignored.
    pub fn record(&mut self, index: usize, extent: u32) -> i64 {
        let Some(&cur) = self.extents.get(index) else {
            return 0;
        };
        let extent = extent.max(MIN_EXTENT);
        let before = if cur == 0 {
            self.average_extent()
        } else {
            cur
        };
        if cur != extent {
            if cur == 0 {
                self.measured.add(index, 1);
            }
            self.sums.add(index, extent as i64 - cur as i64);
            self.extents[index] = extent;
        }
        extent as i64 - before as i64
    }

    /// Forgets every measurement at or after `index`.
    pub fn invalidate_from(&mut self, index: usize) {
        for i in index..self.extents.len() {
            let cur = self.extents[i];
            if cur != 0 {
                self.sums.add(i, -(cur as i64));
                self.measured.add(i, -1);
                self.extents[i] = 0;
            }
        }
    }

    /// Forgets every measurement.
    pub fn reset(&mut self) {
        vdebug!(measured = self.measured_count(), "HeightModel::reset");
        self.extents.fill(0);
        self.rebuild();
    }

    /// Changes the number of items. Measurements for surviving indexes are kept; new indexes
    /// start out unmeasured.
    ///
    /// Shrinking truncates in `O(log n)`. Growing appends in `O(log n)` per new index, or
    /// rebuilds in `O(n)` when the list more than doubles.
    pub fn resize(&mut self, size: usize) {
        let len = self.extents.len();
        if size < len {
            self.extents.truncate(size);
            self.sums.truncate(size);
            self.measured.truncate(size);
        } else if size - len > len {
            self.extents.resize(size, 0);
            self.rebuild();
        } else {
            self.extents.resize(size, 0);
            for _ in len..size {
                self.sums.push_value(0);
                self.measured.push_value(0);
            }
        }
    }

    /// Start offset of `index` (clamped to `len()`, so `offset_of(len())` is the total extent).
    pub fn offset_of(&self, index: usize) -> u64 {
        let index = index.min(self.extents.len());
        let measured = self.measured.prefix_sum(index);
        let unmeasured = index as u64 - measured;
        self.sums
            .prefix_sum(index)
            .saturating_add(unmeasured.saturating_mul(self.average_extent() as u64))
    }

    /// Approximate total scrollable extent: `size * average`, exact for measured rows.
    pub fn total_extent(&self) -> u64 {
        self.offset_of(self.extents.len())
    }

    /// Index of the item covering `offset` (clamped to the last item).
    pub fn index_at_offset(&self, offset: u64) -> Option<usize> {
        let n = self.extents.len();
        if n == 0 {
            return None;
        }
        let est = self.average_extent() as u64;
        let mut remaining = offset;
        let mut idx = 0usize;
        let mut bit = self.sums.max_bit();
        // Top-down descent over both trees at once. Node `idx + bit` covers exactly `bit`
        // indexes, so its unmeasured share is `bit - measured.node(..)`.
        while bit != 0 {
            let next = idx + bit;
            if next <= n {
                let unmeasured = bit as u64 - self.measured.node(next);
                let weight = self
                    .sums
                    .node(next)
                    .saturating_add(unmeasured.saturating_mul(est));
                if weight <= remaining {
                    remaining -= weight;
                    idx = next;
                }
            }
            bit >>= 1;
        }
        Some(idx.min(n - 1))
    }

    fn rebuild(&mut self) {
        self.sums = Fenwick::from_values(self.extents.iter().map(|&e| e as u64));
        self.measured = Fenwick::from_values(self.extents.iter().map(|&e| (e != 0) as u64));
    }
}
