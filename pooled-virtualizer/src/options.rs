/// Configuration for [`crate::Virtualizer`].
///
/// All fields are plain data, so options can be cloned, compared and (with `feature = "serde"`)
/// persisted alongside the rest of a component's settings.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VirtualizerOptions {
    /// Initial item count.
    pub size: usize,

    /// Extent assumed for every item until the first measurement comes in.
    pub default_extent: u32,

    /// Runout rows kept materialized on each side of the viewport.
    ///
    /// `None` keeps one viewport's worth of rows (at the current estimate) on each side. Larger
    /// values trade memory and update churn for fewer blank frames during fast scrolls.
    pub buffer_size: Option<usize>,

    /// How many detached handles the pool keeps around when the window shrinks. Anything beyond
    /// this is handed back through `ElementFactory::release_element`.
    pub spare_slots: usize,

    /// Upper bound on layout → measure → reconcile passes within one recompute.
    pub max_reconcile_passes: usize,

    /// How many rows the window calculator walks from the previous anchor before falling back to
    /// a prefix-tree search.
    pub walk_limit: usize,
}

impl VirtualizerOptions {
    pub fn new(size: usize, default_extent: u32) -> Self {
        Self {
            size,
            default_extent,
            buffer_size: None,
            spare_slots: 4,
            max_reconcile_passes: 4,
            walk_limit: 256,
        }
    }

    pub fn with_buffer_size(mut self, buffer_size: Option<usize>) -> Self {
        self.buffer_size = buffer_size;
        self
    }

    pub fn with_spare_slots(mut self, spare_slots: usize) -> Self {
        self.spare_slots = spare_slots;
        self
    }

    pub fn with_max_reconcile_passes(mut self, passes: usize) -> Self {
        self.max_reconcile_passes = passes.max(1);
        self
    }

    pub fn with_walk_limit(mut self, walk_limit: usize) -> Self {
        self.walk_limit = walk_limit;
        self
    }
}

impl Default for VirtualizerOptions {
    fn default() -> Self {
        Self::new(0, 20)
    }
}
