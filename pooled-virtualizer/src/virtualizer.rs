use core::cmp;

use crate::anchor::Anchor;
use crate::height::HeightModel;
use crate::host::{ElementFactory, ScrollSurface};
use crate::pool::ElementPool;
use crate::window;
use crate::{
    Align, RecomputeOutcome, ScrollDirection, VirtualizerError, VirtualizerOptions, WindowRange,
    WindowState,
};

/// A windowing engine that recycles a bounded pool of element handles.
///
/// The virtualizer owns the host's [`ElementFactory`] and [`ScrollSurface`]. Nothing happens
/// until [`Self::recompute`] runs: it reads the surface metrics, computes the window, rebinds
/// pool slots, records measurements and corrects the scroll offset so that the anchor item does
/// not move on screen. Hosts usually call `recompute` through a frame-coalescing driver rather
/// than directly.
pub struct Virtualizer<F: ElementFactory, S> {
    options: VirtualizerOptions,
    factory: F,
    surface: S,

    heights: HeightModel,
    pool: ElementPool<F::Element>,

    scroll_offset: u64,
    viewport: u32,
    scroll_direction: Option<ScrollDirection>,
    window: Option<WindowRange>,
    placeholder_extent: Option<u64>,

    pending_scroll: Option<(usize, Align)>,
    remeasure_pending: bool,
}

impl<F: ElementFactory, S: ScrollSurface> Virtualizer<F, S> {
    pub fn new(options: VirtualizerOptions, factory: F, surface: S) -> Self {
        vdebug!(
            size = options.size,
            default_extent = options.default_extent,
            buffer_size = ?options.buffer_size,
            "Virtualizer::new"
        );
        Self {
            heights: HeightModel::new(options.size, options.default_extent),
            pool: ElementPool::new(options.spare_slots),
            options,
            factory,
            surface,
            scroll_offset: 0,
            viewport: 0,
            scroll_direction: None,
            window: None,
            placeholder_extent: None,
            pending_scroll: None,
            remeasure_pending: false,
        }
    }

    pub fn options(&self) -> &VirtualizerOptions {
        &self.options
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }

    pub fn factory_mut(&mut self) -> &mut F {
        &mut self.factory
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn heights(&self) -> &HeightModel {
        &self.heights
    }

    pub fn pool(&self) -> &ElementPool<F::Element> {
        &self.pool
    }

    pub fn size(&self) -> usize {
        self.heights.len()
    }

    /// Changes the item count.
    ///
    /// Shrinking takes effect immediately: measurements and slot bindings at or beyond `size`
    /// are dropped before this returns. The window itself is recomputed on the next
    /// [`Self::recompute`].
    pub fn set_size(&mut self, size: usize) {
        let prev = self.heights.len();
        if size == prev {
            return;
        }
        if size < prev {
            self.pool.evict_from(size, &mut self.factory);
            vdebug!(prev, size, "evicted indexes past the new size");
        }
        // Truncation drops the measurements past `size` along with the indexes.
        self.heights.resize(size);
        self.options.size = size;
        self.window = clamp_window(self.window, size);
    }

    /// Runout rows kept on each side of the viewport (`None` = one viewport's worth).
    pub fn set_buffer_size(&mut self, buffer_size: Option<usize>) {
        self.options.buffer_size = buffer_size;
    }

    pub fn first_visible_index(&self) -> Option<usize> {
        self.window.map(|w| w.first_visible)
    }

    pub fn last_visible_index(&self) -> Option<usize> {
        self.window.map(|w| w.last_visible)
    }

    /// The window computed by the last recompute.
    pub fn window(&self) -> Option<WindowRange> {
        self.window
    }

    pub fn scroll_offset(&self) -> u64 {
        self.scroll_offset
    }

    pub fn viewport(&self) -> u32 {
        self.viewport
    }

    pub fn scroll_direction(&self) -> Option<ScrollDirection> {
        self.scroll_direction
    }

    pub fn total_extent(&self) -> u64 {
        self.heights.total_extent()
    }

    pub fn max_scroll_offset(&self) -> u64 {
        window::max_scroll_offset(&self.heights, self.viewport)
    }

    /// Start offset of `index` under the current estimates.
    pub fn item_offset(&self, index: usize) -> Option<u64> {
        (index < self.heights.len()).then(|| self.heights.offset_of(index))
    }

    pub fn item_extent(&self, index: usize) -> Option<u32> {
        (index < self.heights.len()).then(|| self.heights.estimate(index))
    }

    pub fn index_at_offset(&self, offset: u64) -> Option<usize> {
        self.heights.index_at_offset(offset)
    }

    /// Requests that `index` be scrolled to the top of the viewport on the next recompute.
    ///
    /// Out-of-range indexes are clamped. Only the last request before a recompute is honored.
    pub fn scroll_to_index(&mut self, index: usize) {
        self.scroll_to_index_aligned(index, Align::Start);
    }

    pub fn scroll_to_index_aligned(&mut self, index: usize, align: Align) {
        self.pending_scroll = Some((index, align));
    }

    pub fn pending_scroll(&self) -> Option<(usize, Align)> {
        self.pending_scroll
    }

    /// Marks bound elements for re-measurement (e.g. after the host observed one of them
    /// resizing). The measurement happens on the next recompute.
    pub fn request_remeasure(&mut self) {
        self.remeasure_pending = true;
    }

    /// Forgets every measurement. Bound elements are measured again on the next recompute.
    pub fn reset_measurements(&mut self) {
        self.heights.reset();
        self.remeasure_pending = true;
    }

    /// Computes the scroll offset that would show `index` with `align`.
    pub fn scroll_to_index_offset(&self, index: usize, align: Align) -> u64 {
        let size = self.heights.len();
        if size == 0 {
            return 0;
        }
        let index = index.min(size - 1);
        let start = self.heights.offset_of(index);
        let end = start.saturating_add(self.heights.estimate(index) as u64);
        let view = self.viewport as u64;

        let target = match align {
            Align::Start => start,
            Align::End => end.saturating_sub(view),
            Align::Center => {
                let center = start.saturating_add((end - start) / 2);
                center.saturating_sub(view / 2)
            }
            Align::Auto => {
                let cur = self.scroll_offset;
                let cur_end = cur.saturating_add(view);
                if start >= cur && end <= cur_end {
                    cur
                } else if start < cur {
                    start
                } else {
                    end.saturating_sub(view)
                }
            }
        };
        cmp::min(target, self.max_scroll_offset())
    }

    /// Snapshot of the state left by the last recompute.
    pub fn window_state(&self) -> WindowState {
        WindowState {
            size: self.heights.len(),
            scroll_offset: self.scroll_offset,
            viewport: self.viewport,
            scroll_direction: self.scroll_direction,
            total_extent: self.heights.total_extent(),
            average_extent: self.heights.average_extent(),
            measured: self.heights.measured_count(),
            window: self.window,
            slots: self.pool.len(),
            spare: self.pool.spare_len(),
        }
    }

    /// Runs one full layout: window → pool → measurements → anchor correction.
    ///
    /// Returns [`VirtualizerError::SurfaceUnavailable`] (non-fatal) when the surface has no
    /// metrics yet, and [`VirtualizerError::UnderProvisioned`] (fatal) when the factory fails to
    /// create the requested handles.
    pub fn recompute(&mut self) -> Result<RecomputeOutcome, VirtualizerError> {
        let metrics = self
            .surface
            .metrics()
            .ok_or(VirtualizerError::SurfaceUnavailable)?;

        self.viewport = metrics.viewport;
        self.scroll_direction = match metrics.offset.cmp(&self.scroll_offset) {
            cmp::Ordering::Greater => Some(ScrollDirection::Forward),
            cmp::Ordering::Less => Some(ScrollDirection::Backward),
            cmp::Ordering::Equal => self.scroll_direction,
        };
        self.scroll_offset = cmp::min(metrics.offset, self.max_scroll_offset());
        let initial_offset = self.scroll_offset;

        let anchor = self.capture_anchor();

        if self.remeasure_pending {
            self.remeasure_pending = false;
            self.pool.remeasure(&mut self.heights, &mut self.factory);
        }

        let mut outcome = RecomputeOutcome::default();
        loop {
            // Estimates may already have moved (remeasure, previous pass): put the anchor back
            // before laying out so the pass binds the rows that will actually be on screen.
            self.scroll_offset = self.reconciled_offset(anchor);
            outcome.updated += self.layout()?;
            outcome.passes += 1;

            let target = self.reconciled_offset(anchor);
            let next = window::compute(
                &self.heights,
                target,
                self.viewport,
                self.window.map(|w| w.first_visible),
                self.options.buffer_size,
                self.options.walk_limit,
            );
            if target == self.scroll_offset && next == self.window {
                outcome.settled = true;
                break;
            }
            if outcome.passes >= self.options.max_reconcile_passes {
                vwarn!(
                    passes = outcome.passes,
                    scroll_offset = self.scroll_offset,
                    target,
                    "reconciliation did not settle"
                );
                break;
            }
        }

        let total = self.heights.total_extent();
        if self.placeholder_extent != Some(total) {
            self.surface.set_placeholder_extent(total);
            self.placeholder_extent = Some(total);
        }
        if self.scroll_offset != metrics.offset {
            self.surface.set_scroll_offset(self.scroll_offset);
        }
        self.pool.place(&self.heights, &mut self.factory);

        outcome.scroll_adjustment = self.scroll_offset as i64 - initial_offset as i64;
        vtrace!(
            scroll_offset = self.scroll_offset,
            viewport = self.viewport,
            total,
            window = ?self.window,
            passes = outcome.passes,
            updated = outcome.updated,
            adjustment = outcome.scroll_adjustment,
            "recompute"
        );
        Ok(outcome)
    }

    /// Picks the anchor for this recompute. A pending scroll-to wins over the visible items and
    /// also moves the scroll offset to its target.
    fn capture_anchor(&mut self) -> Option<Anchor> {
        let size = self.heights.len();
        if let Some((index, align)) = self.pending_scroll.take() {
            if size == 0 {
                return None;
            }
            let index = index.min(size - 1);
            let target = self.scroll_to_index_offset(index, align);
            if target != self.scroll_offset {
                self.scroll_direction = Some(if target > self.scroll_offset {
                    ScrollDirection::Forward
                } else {
                    ScrollDirection::Backward
                });
            }
            self.scroll_offset = target;
            return Some(Anchor::at(&self.heights, index, target));
        }

        let visible = window::compute(
            &self.heights,
            self.scroll_offset,
            self.viewport,
            self.window.map(|w| w.first_visible),
            Some(0),
            self.options.walk_limit,
        )?;
        Some(Anchor::capture(
            &self.heights,
            &visible,
            self.scroll_offset,
            self.scroll_direction,
        ))
    }

    fn reconciled_offset(&self, anchor: Option<Anchor>) -> u64 {
        let max_scroll = self.max_scroll_offset();
        match anchor {
            Some(anchor) => anchor.reconcile(&self.heights, max_scroll),
            None => cmp::min(self.scroll_offset, max_scroll),
        }
    }

    /// One layout pass at the current scroll offset. Returns the number of element updates.
    fn layout(&mut self) -> Result<usize, VirtualizerError> {
        let next = window::compute(
            &self.heights,
            self.scroll_offset,
            self.viewport,
            self.window.map(|w| w.first_visible),
            self.options.buffer_size,
            self.options.walk_limit,
        );
        let Some(next) = next else {
            self.pool.ensure_capacity(0, 0..0, &mut self.factory)?;
            self.window = None;
            return Ok(0);
        };

        let range = next.start_index..next.end_index;
        self.pool
            .ensure_capacity(range.len(), range.clone(), &mut self.factory)?;
        let updated = self.pool.assign(range, &mut self.heights, &mut self.factory);
        self.window = Some(next);
        Ok(updated)
    }
}

impl<F: ElementFactory, S> core::fmt::Debug for Virtualizer<F, S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Virtualizer")
            .field("options", &self.options)
            .field("scroll_offset", &self.scroll_offset)
            .field("viewport", &self.viewport)
            .field("scroll_direction", &self.scroll_direction)
            .field("window", &self.window)
            .field("heights", &self.heights)
            .field("slots", &self.pool.len())
            .field("pending_scroll", &self.pending_scroll)
            .finish_non_exhaustive()
    }
}

fn clamp_window(window: Option<WindowRange>, size: usize) -> Option<WindowRange> {
    let w = window?;
    if size == 0 || w.first_visible >= size {
        return None;
    }
    Some(WindowRange {
        first_visible: w.first_visible,
        last_visible: w.last_visible.min(size - 1),
        start_index: w.start_index.min(size),
        end_index: w.end_index.min(size),
    })
}
