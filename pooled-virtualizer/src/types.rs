/// Where a scrolled-to item should land inside the viewport.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Align {
    #[default]
    Start,
    Center,
    End,
    /// Keep the current offset if the item is fully visible, otherwise scroll the minimum
    /// distance (like `Start` when above the viewport, `End` when below).
    Auto,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScrollDirection {
    Forward,
    Backward,
}

/// What the scroll surface reports on each recompute.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollMetrics {
    /// Current scroll offset of the scroll target (e.g. `scrollTop`).
    pub offset: u64,
    /// Visible extent of the scroll target along the scroll axis.
    pub viewport: u32,
}

/// The result of one window computation.
///
/// `first_visible..=last_visible` is what intersects the viewport; `start_index..end_index`
/// additionally covers the runout buffer on both sides and is what the pool materializes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WindowRange {
    pub first_visible: usize,
    pub last_visible: usize, // inclusive
    pub start_index: usize,
    pub end_index: usize, // exclusive
}

impl WindowRange {
    /// Number of materialized indexes (visible + runout).
    pub fn len(&self) -> usize {
        self.end_index - self.start_index
    }

    pub fn is_empty(&self) -> bool {
        self.start_index >= self.end_index
    }

    pub fn visible_len(&self) -> usize {
        self.last_visible + 1 - self.first_visible
    }

    pub fn contains(&self, index: usize) -> bool {
        (self.start_index..self.end_index).contains(&index)
    }
}

/// Summary of a single recompute.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RecomputeOutcome {
    /// Layout passes performed (layout → measure → reconcile).
    pub passes: usize,
    /// `update_element` calls made.
    pub updated: usize,
    /// Net scroll offset correction applied by the reconciler.
    pub scroll_adjustment: i64,
    /// `false` when the reconciler ran out of passes; another recompute should follow.
    pub settled: bool,
}
