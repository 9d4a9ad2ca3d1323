use crate::height::HeightModel;
use crate::{ScrollDirection, WindowRange};

/// The item held visually stationary across one reconciliation.
///
/// `offset_in_viewport` is the distance from the top of the viewport to the item's start; it is
/// negative when the item is partially scrolled out above the viewport.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Anchor {
    pub index: usize,
    pub offset_in_viewport: i64,
}

impl Anchor {
    /// Anchors `index` at its current on-screen position for `scroll_offset`.
    pub fn at(heights: &HeightModel, index: usize, scroll_offset: u64) -> Self {
        Self {
            index,
            offset_in_viewport: heights.offset_of(index) as i64 - scroll_offset as i64,
        }
    }

    /// Picks the anchor for `visible`: the topmost visible item, or the bottommost one while
    /// scrolling backward. A viewport resting at offset 0 always anchors its top item so the
    /// start of the list stays pinned.
    pub fn capture(
        heights: &HeightModel,
        visible: &WindowRange,
        scroll_offset: u64,
        direction: Option<ScrollDirection>,
    ) -> Self {
        let index = match direction {
            Some(ScrollDirection::Backward) if scroll_offset > 0 => visible.last_visible,
            _ => visible.first_visible,
        };
        Self::at(heights, index, scroll_offset)
    }

    /// Scroll offset that puts the anchor back at `offset_in_viewport` under the current
    /// estimates, clamped to `[0, max_scroll]`.
    pub fn reconcile(&self, heights: &HeightModel, max_scroll: u64) -> u64 {
        let start = heights.offset_of(self.index) as i64;
        let target = start - self.offset_in_viewport;
        target.clamp(0, max_scroll.min(i64::MAX as u64) as i64) as u64
    }
}
