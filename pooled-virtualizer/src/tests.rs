use crate::*;

use crate::window;
use alloc::boxed::Box;
use alloc::vec::Vec;
use std::collections::BTreeSet;

#[derive(Clone, Copy, Debug)]
struct Lcg(u64);

impl Lcg {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn next_u64(&mut self) -> u64 {
        // Deterministic, dependency-free PRNG for tests.
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0 >> 11
    }

    fn gen_range_u64(&mut self, start: u64, end_exclusive: u64) -> u64 {
        debug_assert!(start < end_exclusive);
        start + (self.next_u64() % (end_exclusive - start))
    }

    fn gen_range_usize(&mut self, start: usize, end_exclusive: usize) -> usize {
        self.gen_range_u64(start as u64, end_exclusive as u64) as usize
    }

    fn gen_range_u32(&mut self, start: u32, end_exclusive: u32) -> u32 {
        self.gen_range_u64(start as u64, end_exclusive as u64) as u32
    }
}

#[derive(Debug)]
struct TestElement {
    id: usize,
    index: Option<usize>,
    offset: Option<u64>,
}

struct TestFactory {
    extent: Box<dyn Fn(usize) -> u32>,
    next_id: usize,
    batches: Vec<usize>,
    updates: Vec<(usize, usize)>, // (element id, index)
    detached: usize,
    released: usize,
    short_by: usize,
}

impl TestFactory {
    fn new(extent: impl Fn(usize) -> u32 + 'static) -> Self {
        Self {
            extent: Box::new(extent),
            next_id: 0,
            batches: Vec::new(),
            updates: Vec::new(),
            detached: 0,
            released: 0,
            short_by: 0,
        }
    }

    fn set_extent(&mut self, extent: impl Fn(usize) -> u32 + 'static) {
        self.extent = Box::new(extent);
    }
}

impl ElementFactory for TestFactory {
    type Element = TestElement;

    fn create_elements(&mut self, count: usize) -> Vec<TestElement> {
        self.batches.push(count);
        let count = count.saturating_sub(self.short_by);
        (0..count)
            .map(|_| {
                self.next_id += 1;
                TestElement {
                    id: self.next_id,
                    index: None,
                    offset: None,
                }
            })
            .collect()
    }

    fn update_element(&mut self, element: &mut TestElement, index: usize) {
        element.index = Some(index);
        self.updates.push((element.id, index));
    }

    fn measure_element(&mut self, element: &TestElement) -> u32 {
        element.index.map_or(0, |i| (self.extent)(i))
    }

    fn detach_element(&mut self, element: &mut TestElement, index: usize) {
        assert_eq!(element.index, Some(index));
        element.index = None;
        self.detached += 1;
    }

    fn place_element(&mut self, element: &mut TestElement, offset: u64) {
        element.offset = Some(offset);
    }

    fn release_element(&mut self, _element: TestElement) {
        self.released += 1;
    }
}

#[derive(Debug)]
struct TestSurface {
    offset: u64,
    viewport: u32,
    placeholder: u64,
    attached: bool,
}

impl TestSurface {
    fn new(viewport: u32) -> Self {
        Self {
            offset: 0,
            viewport,
            placeholder: 0,
            attached: true,
        }
    }
}

impl ScrollSurface for TestSurface {
    fn metrics(&self) -> Option<ScrollMetrics> {
        self.attached.then_some(ScrollMetrics {
            offset: self.offset,
            viewport: self.viewport,
        })
    }

    fn set_scroll_offset(&mut self, offset: u64) {
        // Like a real scroll container: can't scroll past the placeholder.
        let max = self.placeholder.saturating_sub(self.viewport as u64);
        self.offset = offset.min(max);
    }

    fn set_placeholder_extent(&mut self, extent: u64) {
        self.placeholder = extent;
    }
}

type TestVirtualizer = Virtualizer<TestFactory, TestSurface>;

fn virtualizer(
    options: VirtualizerOptions,
    viewport: u32,
    extent: impl Fn(usize) -> u32 + 'static,
) -> TestVirtualizer {
    Virtualizer::new(options, TestFactory::new(extent), TestSurface::new(viewport))
}

fn scroll_to(v: &mut TestVirtualizer, offset: u64) {
    v.surface_mut().offset = offset;
}

/// Recomputes until the reconciler reports a settled layout.
fn settle(v: &mut TestVirtualizer) -> RecomputeOutcome {
    for _ in 0..16 {
        let outcome = v.recompute().unwrap();
        if outcome.settled {
            return outcome;
        }
    }
    panic!("layout did not settle: {:?}", v.window_state());
}

fn assigned_indexes(v: &TestVirtualizer) -> BTreeSet<usize> {
    v.pool().assigned().map(|(i, _)| i).collect()
}

fn screen_position(v: &TestVirtualizer, index: usize) -> i64 {
    v.item_offset(index).unwrap() as i64 - v.scroll_offset() as i64
}

#[test]
fn fixed_extent_window_and_exact_restoration() {
    let mut v = virtualizer(VirtualizerOptions::new(100, 30), 500, |_| 30);
    settle(&mut v);
    assert_eq!(v.first_visible_index(), Some(0));
    // 500 / 30 rounded up
    assert_eq!(v.last_visible_index(), Some(16));
    assert_eq!(v.total_extent(), 3000);
    assert_eq!(v.surface().placeholder, 3000);

    scroll_to(&mut v, 1000);
    settle(&mut v);
    assert_eq!(v.first_visible_index(), Some(33));
    assert_eq!(v.scroll_offset(), 1000);

    scroll_to(&mut v, 0);
    settle(&mut v);
    assert_eq!(v.first_visible_index(), Some(0));
    assert_eq!(v.last_visible_index(), Some(16));
}

#[test]
fn wrong_default_estimate_converges_to_measured_extents() {
    let mut v = virtualizer(VirtualizerOptions::new(100, 20), 500, |_| 30);
    settle(&mut v);
    assert_eq!(v.first_visible_index(), Some(0));
    assert_eq!(v.last_visible_index(), Some(16));
    assert_eq!(v.heights().average_extent(), 30);
    assert_eq!(v.total_extent(), 3000);
}

#[test]
fn default_buffer_covers_one_viewport_on_each_side() {
    let mut v = virtualizer(VirtualizerOptions::new(1000, 10), 100, |_| 10);
    scroll_to(&mut v, 5000);
    settle(&mut v);
    let w = v.window().unwrap();
    assert_eq!(w.first_visible, 500);
    assert_eq!(w.last_visible, 509);
    assert_eq!(w.start_index, 490);
    assert_eq!(w.end_index, 520);
    assert_eq!(v.pool().len(), 30);
}

#[test]
fn explicit_buffer_size_is_clamped_to_bounds() {
    let mut v = virtualizer(
        VirtualizerOptions::new(20, 10).with_buffer_size(Some(3)),
        50,
        |_| 10,
    );
    settle(&mut v);
    let w = v.window().unwrap();
    assert_eq!((w.first_visible, w.last_visible), (0, 4));
    assert_eq!((w.start_index, w.end_index), (0, 8));

    scroll_to(&mut v, 10_000);
    settle(&mut v);
    let w = v.window().unwrap();
    assert_eq!(v.scroll_offset(), 150);
    assert_eq!((w.first_visible, w.last_visible), (15, 19));
    assert_eq!((w.start_index, w.end_index), (12, 20));
}

#[test]
fn window_coverage_holds_for_random_layouts() {
    let mut rng = Lcg::new(7);
    for case in 0..200 {
        let size = rng.gen_range_usize(0, 400);
        let viewport = rng.gen_range_u32(0, 700);
        let buffer = rng.gen_range_usize(0, 6);
        let seed = rng.next_u64();
        let extent = move |i: usize| 5 + ((i as u64 ^ seed) % 60) as u32;

        let mut v = virtualizer(
            VirtualizerOptions::new(size, 25).with_buffer_size(Some(buffer)),
            viewport,
            extent,
        );
        for _ in 0..3 {
            let offset = rng.gen_range_u64(0, 30_000);
            scroll_to(&mut v, offset);
            v.recompute().unwrap();

            let Some(w) = v.window() else {
                assert!(size == 0 || viewport == 0, "case {case}");
                assert!(v.pool().is_empty());
                continue;
            };
            for i in w.first_visible..=w.last_visible {
                assert!(v.pool().slot_for(i).is_some(), "case {case}: {i} not bound");
            }
            let lo = w.first_visible.saturating_sub(buffer);
            let hi = (w.last_visible + buffer).min(size - 1);
            for i in assigned_indexes(&v) {
                assert!(lo <= i && i <= hi, "case {case}: {i} outside {lo}..={hi}");
            }
            assert_eq!(v.pool().len(), w.len());
        }
    }
}

#[test]
fn small_scrolls_do_not_rebind_unchanged_slots() {
    let mut v = virtualizer(VirtualizerOptions::new(1000, 30), 300, |_| 30);
    scroll_to(&mut v, 3010);
    settle(&mut v);

    let before = assigned_indexes(&v);
    let updates_before = v.factory().updates.len();

    // Less than one row: same window, no updates at all.
    scroll_to(&mut v, 3025);
    settle(&mut v);
    assert_eq!(v.factory().updates.len(), updates_before);
    assert_eq!(assigned_indexes(&v), before);

    // Crossing a row boundary only binds the newly exposed indexes.
    scroll_to(&mut v, 3045);
    settle(&mut v);
    let fresh = &v.factory().updates[updates_before..];
    assert!(!fresh.is_empty());
    for &(_, index) in fresh {
        assert!(!before.contains(&index), "index {index} was rebound");
    }
}

#[test]
fn anchor_stays_put_while_estimates_change() {
    let mut rng = Lcg::new(42);
    let mut v = virtualizer(VirtualizerOptions::new(2000, 30), 400, |_| 30);
    scroll_to(&mut v, 30_000);
    settle(&mut v);

    for _ in 0..20 {
        let anchor = v.first_visible_index().unwrap();
        let before = screen_position(&v, anchor);

        let base = rng.gen_range_u32(10, 80);
        let spread = rng.gen_range_u64(1, 40);
        v.factory_mut()
            .set_extent(move |i| base + ((i as u64 * 7919) % spread) as u32);
        v.request_remeasure();
        v.recompute().unwrap();

        let after = screen_position(&v, anchor);
        assert!((after - before).abs() <= 1, "anchor moved {before} -> {after}");
    }
}

#[test]
fn measuring_rows_above_the_viewport_corrects_scroll_offset() {
    let mut v = virtualizer(VirtualizerOptions::new(500, 20), 200, |_| 20);
    scroll_to(&mut v, 4000);
    settle(&mut v);
    let anchor = v.first_visible_index().unwrap();
    let before = screen_position(&v, anchor);

    // Every row doubles: the unmeasured rows above follow the new average.
    v.factory_mut().set_extent(|_| 40);
    v.request_remeasure();
    let outcome = settle(&mut v);

    assert_eq!(screen_position(&v, anchor), before);
    assert!(outcome.scroll_adjustment > 0);
    assert_eq!(v.surface().offset, v.scroll_offset());
}

#[test]
fn scroll_to_index_round_trips_for_every_index() {
    let size = 300;
    let mut v = virtualizer(VirtualizerOptions::new(size, 25), 240, |i| 10 + (i % 37) as u32);
    settle(&mut v);
    for k in 0..size {
        v.scroll_to_index(k);
        v.recompute().unwrap();
        let first = v.first_visible_index().unwrap();
        let last = v.last_visible_index().unwrap();
        assert!(first <= k && k <= last, "k={k} first={first} last={last}");
    }
}

#[test]
fn scroll_to_index_clamps_and_last_request_wins() {
    let mut v = virtualizer(VirtualizerOptions::new(100, 30), 300, |_| 30);
    settle(&mut v);

    v.scroll_to_index(10);
    v.scroll_to_index(50);
    settle(&mut v);
    assert_eq!(v.first_visible_index(), Some(50));
    assert_eq!(v.scroll_offset(), 1500);

    v.scroll_to_index(10_000);
    settle(&mut v);
    assert_eq!(v.last_visible_index(), Some(99));
    assert_eq!(v.scroll_offset(), v.max_scroll_offset());
}

#[test]
fn scroll_to_index_offset_alignments() {
    let mut v = virtualizer(VirtualizerOptions::new(100, 10), 50, |_| 10);
    scroll_to(&mut v, 200);
    settle(&mut v);

    assert_eq!(v.scroll_to_index_offset(30, Align::Start), 300);
    assert_eq!(v.scroll_to_index_offset(30, Align::End), 260);
    assert_eq!(v.scroll_to_index_offset(30, Align::Center), 280);
    // [200, 250) already shows item 22.
    assert_eq!(v.scroll_to_index_offset(22, Align::Auto), 200);
    assert_eq!(v.scroll_to_index_offset(10, Align::Auto), 100);
    assert_eq!(v.scroll_to_index_offset(40, Align::Auto), 360);
    assert_eq!(v.scroll_to_index_offset(99, Align::Start), v.max_scroll_offset());
}

#[test]
fn shrinking_size_evicts_bindings_and_measurements_immediately() {
    let mut v = virtualizer(VirtualizerOptions::new(100, 30), 300, |_| 30);
    scroll_to(&mut v, 2700);
    settle(&mut v);
    assert!(assigned_indexes(&v).iter().any(|&i| i >= 40));
    let detached_before = v.factory().detached;

    v.set_size(40);
    assert_eq!(v.size(), 40);
    assert!(assigned_indexes(&v).iter().all(|&i| i < 40));
    assert!(v.factory().detached > detached_before);
    assert!((40..100).all(|i| v.heights().measured_extent(i).is_none()));
    if let Some(last) = v.last_visible_index() {
        assert!(last < 40);
    }

    settle(&mut v);
    assert_eq!(v.last_visible_index(), Some(39));
    assert_eq!(v.scroll_offset(), 40 * 30 - 300);
    assert!(assigned_indexes(&v).iter().all(|&i| i < 40));
}

#[test]
fn growing_size_keeps_measurements() {
    let mut v = virtualizer(VirtualizerOptions::new(10, 10), 100, |i| 10 + i as u32);
    settle(&mut v);
    let measured = v.heights().measured_count();
    v.set_size(1000);
    assert_eq!(v.heights().measured_count(), measured);
    assert_eq!(v.heights().measured_extent(3), Some(13));
    settle(&mut v);
    assert_eq!(v.first_visible_index(), Some(0));
}

#[test]
fn variable_extents_converge_back_to_the_top() {
    let mut v = virtualizer(VirtualizerOptions::new(100, 30), 500, |i| 30 + i as u32);
    for _ in 0..5 {
        // Rows at the bottom are taller than the estimate, so the end moves away while they get
        // measured. Keep dragging to the end like a user would.
        let mut frames = 0;
        while v.last_visible_index() != Some(99) || v.scroll_offset() != v.max_scroll_offset() {
            assert!(frames < 10, "bottom not reached: {:?}", v.window_state());
            scroll_to(&mut v, u64::MAX / 4);
            settle(&mut v);
            frames += 1;
        }

        scroll_to(&mut v, 0);
        settle(&mut v);
        assert_eq!(v.first_visible_index(), Some(0));
        assert_eq!(v.scroll_offset(), 0);
    }
    // Stable once at the top: another frame changes nothing.
    let outcome = settle(&mut v);
    assert_eq!(outcome.updated, 0);
    assert_eq!(outcome.scroll_adjustment, 0);
    assert_eq!(v.first_visible_index(), Some(0));
}

#[test]
fn empty_list_has_no_window_and_no_slots() {
    let mut v = virtualizer(VirtualizerOptions::new(0, 30), 500, |_| 30);
    settle(&mut v);
    assert_eq!(v.first_visible_index(), None);
    assert_eq!(v.last_visible_index(), None);
    assert!(v.pool().is_empty());
    assert!(v.factory().batches.is_empty());
    assert_eq!(v.surface().placeholder, 0);

    v.scroll_to_index(5);
    settle(&mut v);
    assert_eq!(v.first_visible_index(), None);
}

#[test]
fn zero_viewport_releases_the_window() {
    let mut v = virtualizer(VirtualizerOptions::new(50, 10).with_spare_slots(2), 100, |_| 10);
    settle(&mut v);
    assert!(!v.pool().is_empty());

    v.surface_mut().viewport = 0;
    settle(&mut v);
    assert_eq!(v.window(), None);
    assert!(v.pool().is_empty());
    assert_eq!(v.pool().spare_len(), 2);
    assert!(v.factory().released > 0);
}

#[test]
fn pool_grows_in_batches_and_reuses_spares() {
    let mut v = virtualizer(
        VirtualizerOptions::new(1000, 10).with_buffer_size(Some(0)),
        100,
        |_| 10,
    );
    settle(&mut v);
    assert_eq!(v.factory().batches, vec![10]);

    v.surface_mut().viewport = 50;
    settle(&mut v);
    assert_eq!(v.pool().len(), 5);
    assert_eq!(v.pool().spare_len(), 4);
    assert_eq!(v.factory().released, 1);

    v.surface_mut().viewport = 120;
    settle(&mut v);
    assert_eq!(v.pool().len(), 12);
    assert_eq!(v.pool().spare_len(), 0);
    // 4 spares reused, 3 created in one batch.
    assert_eq!(v.factory().batches, vec![10, 3]);
}

#[test]
fn under_provisioned_factory_is_fatal() {
    let mut v = virtualizer(VirtualizerOptions::new(100, 10), 100, |_| 10);
    v.factory_mut().short_by = 1;
    let err = v.recompute().unwrap_err();
    assert!(matches!(
        err,
        VirtualizerError::UnderProvisioned {
            requested: 20,
            returned: 19
        }
    ));
    assert!(err.is_fatal());
    assert!(v.pool().is_empty());
}

#[test]
fn detached_surface_is_a_transient_error() {
    let mut v = virtualizer(VirtualizerOptions::new(100, 10), 100, |_| 10);
    v.surface_mut().attached = false;
    let err = v.recompute().unwrap_err();
    assert_eq!(err, VirtualizerError::SurfaceUnavailable);
    assert!(!err.is_fatal());

    v.surface_mut().attached = true;
    settle(&mut v);
    assert_eq!(v.first_visible_index(), Some(0));
}

#[test]
fn zero_extent_measurements_are_clamped() {
    let mut v = virtualizer(VirtualizerOptions::new(10, 10), 5, |_| 0);
    settle(&mut v);
    assert!(v.heights().measured_count() > 0);
    assert_eq!(v.heights().average_extent(), MIN_EXTENT);
    assert_eq!(v.total_extent(), 10);
    assert_eq!(v.last_visible_index(), Some(4));
}

#[test]
fn elements_are_placed_at_their_cumulative_offsets() {
    let mut v = virtualizer(VirtualizerOptions::new(50, 10), 100, |i| 10 + (i % 3) as u32);
    scroll_to(&mut v, 300);
    settle(&mut v);
    for slot in v.pool().slots() {
        let index = slot.index().unwrap();
        assert_eq!(slot.element().offset, v.item_offset(index));
        assert_eq!(slot.last_known_extent(), 10 + (index % 3) as u32);
    }
}

#[test]
fn reset_measurements_re_measures_bound_elements() {
    let mut v = virtualizer(VirtualizerOptions::new(100, 10), 100, |_| 20);
    settle(&mut v);
    let bound = v.pool().len();
    v.reset_measurements();
    assert_eq!(v.heights().measured_count(), 0);
    assert_eq!(v.heights().average_extent(), 10);

    settle(&mut v);
    assert!(v.heights().measured_count() >= bound);
    assert_eq!(v.heights().average_extent(), 20);
}

#[test]
fn height_model_estimates_and_offsets() {
    let mut h = HeightModel::new(10, 20);
    assert_eq!(h.estimate(3), 20);
    assert_eq!(h.total_extent(), 200);

    h.record(0, 10);
    h.record(1, 30);
    assert_eq!(h.average_extent(), 20);
    h.record(2, 50);
    assert_eq!(h.average_extent(), 30);
    assert_eq!(h.estimate(9), 30);
    assert_eq!(h.offset_of(3), 90);
    // 90 measured + 7 * 30
    assert_eq!(h.total_extent(), 300);

    // Re-recording the same value is a no-op on the aggregates.
    assert_eq!(h.record(2, 50), 0);
    assert_eq!(h.measured_count(), 3);

    h.invalidate_from(1);
    assert_eq!(h.measured_count(), 1);
    assert_eq!(h.average_extent(), 10);
    assert_eq!(h.total_extent(), 100);

    h.resize(4);
    assert_eq!(h.len(), 4);
    assert_eq!(h.measured_extent(0), Some(10));
    assert_eq!(h.record(7, 10), 0);
}

#[test]
fn height_model_lookup_matches_linear_scan() {
    let mut rng = Lcg::new(99);
    for _ in 0..50 {
        let size = rng.gen_range_usize(1, 300);
        let mut h = HeightModel::new(size, rng.gen_range_u32(1, 50));
        for _ in 0..rng.gen_range_usize(0, size) {
            let i = rng.gen_range_usize(0, size);
            h.record(i, rng.gen_range_u32(1, 100));
        }

        assert_matches_linear_scan(&h, &mut rng);
    }
}

fn assert_matches_linear_scan(h: &HeightModel, rng: &mut Lcg) {
    let size = h.len();
    let mut offset = 0u64;
    for i in 0..size {
        assert_eq!(h.offset_of(i), offset, "offset_of({i}) with len {size}");
        offset += h.estimate(i) as u64;
    }
    assert_eq!(h.total_extent(), offset);
    if size == 0 {
        assert_eq!(h.index_at_offset(0), None);
        return;
    }

    for _ in 0..20 {
        let target = rng.gen_range_u64(0, offset + 50);
        let expected = (0..size)
            .find(|&i| h.offset_of(i + 1) > target)
            .unwrap_or(size - 1);
        assert_eq!(h.index_at_offset(target), Some(expected));
    }
}

#[test]
fn appending_and_truncating_keeps_lookups_consistent() {
    let mut rng = Lcg::new(11);
    let mut h = HeightModel::new(500, 20);
    for i in (0..500).step_by(2) {
        h.record(i, rng.gen_range_u32(1, 90));
    }

    for step in 0..120 {
        let len = h.len();
        if step % 10 == 9 {
            let cut = rng.gen_range_usize(0, len);
            h.resize(cut);
            assert_eq!(h.len(), cut);
            assert!((cut..len).all(|i| !h.is_measured(i)));
        } else {
            h.resize(len + 25);
        }
        let len = h.len();
        if len > 0 {
            for _ in 0..5 {
                let i = rng.gen_range_usize(0, len);
                h.record(i, rng.gen_range_u32(1, 90));
            }
        }
        let measured = (0..len).filter(|&i| h.is_measured(i)).count();
        assert_eq!(h.measured_count(), measured);
        assert_matches_linear_scan(&h, &mut rng);
    }
}

#[test]
fn set_size_appends_without_losing_measurements() {
    let mut v = virtualizer(VirtualizerOptions::new(200, 10), 100, |i| 5 + (i % 9) as u32);
    scroll_to(&mut v, 400);
    settle(&mut v);
    let measured: Vec<(usize, u32)> = (0..200)
        .filter_map(|i| v.heights().measured_extent(i).map(|e| (i, e)))
        .collect();
    assert!(!measured.is_empty());

    let mut rng = Lcg::new(5);
    for _ in 0..40 {
        let size = v.size() + 50;
        v.set_size(size);
        assert_eq!(v.size(), size);
    }
    for &(i, e) in &measured {
        assert_eq!(v.heights().measured_extent(i), Some(e));
    }
    assert_matches_linear_scan(v.heights(), &mut rng);

    v.set_size(10);
    v.set_size(2200);
    assert!((10..2200).all(|i| !v.heights().is_measured(i)));
    assert_matches_linear_scan(v.heights(), &mut rng);
}

#[test]
fn walking_from_a_hint_agrees_with_prefix_search() {
    let mut rng = Lcg::new(3);
    let mut h = HeightModel::new(5000, 17);
    for i in (0..5000).step_by(3) {
        h.record(i, rng.gen_range_u32(1, 90));
    }
    let total = h.total_extent();
    for _ in 0..500 {
        let offset = rng.gen_range_u64(0, total);
        let hint = Some(rng.gen_range_usize(0, 5000));
        let limit = rng.gen_range_usize(0, 600);
        assert_eq!(
            window::locate_first(&h, offset, hint, limit),
            h.index_at_offset(offset)
        );
    }
}

#[test]
fn rebinding_the_same_index_is_a_no_op() {
    let mut heights = HeightModel::new(10, 10);
    let mut pool: ElementPool<TestElement> = ElementPool::new(0);
    let mut factory = TestFactory::new(|_| 12);
    pool.ensure_capacity(1, 0..1, &mut factory).unwrap();

    assert!(pool.bind(0, 3, &mut heights, &mut factory));
    assert!(!pool.bind(0, 3, &mut heights, &mut factory));
    assert_eq!(factory.updates.len(), 1);
    assert_eq!(factory.detached, 0);
    assert_eq!(heights.measured_extent(3), Some(12));

    assert!(pool.bind(0, 4, &mut heights, &mut factory));
    assert_eq!(factory.detached, 1);
    assert_eq!(pool.slot_for(4).map(|s| s.last_known_extent()), Some(12));
}

#[test]
fn checked_size_rejects_invalid_counts() {
    assert_eq!(checked_size(10.0), Ok(10));
    assert_eq!(checked_size(0.0), Ok(0));
    assert!(matches!(checked_size(-1.0), Err(VirtualizerError::InvalidSize(_))));
    assert!(matches!(checked_size(2.5), Err(VirtualizerError::InvalidSize(_))));
    assert!(matches!(checked_size(f64::NAN), Err(VirtualizerError::InvalidSize(_))));
    assert!(matches!(checked_size(f64::INFINITY), Err(VirtualizerError::InvalidSize(_))));
}

#[test]
fn window_state_reports_the_last_recompute() {
    let mut v = virtualizer(VirtualizerOptions::new(100, 30), 500, |_| 30);
    scroll_to(&mut v, 1000);
    settle(&mut v);
    let state = v.window_state();
    assert_eq!(state.size, 100);
    assert_eq!(state.scroll_offset, 1000);
    assert_eq!(state.viewport, 500);
    assert_eq!(state.scroll_direction, Some(ScrollDirection::Forward));
    assert_eq!(state.total_extent, 3000);
    assert_eq!(state.window, v.window());
    assert_eq!(state.slots, v.pool().len());
}
