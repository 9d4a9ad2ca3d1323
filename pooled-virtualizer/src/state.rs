use crate::{ScrollDirection, WindowRange};

/// A lightweight, serializable snapshot of the virtualizer after its last recompute.
///
/// Useful for debugging overlays and for asserting on the engine from tests without reaching
/// into the host. With `feature = "serde"`, this type implements `Serialize`/`Deserialize`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WindowState {
    pub size: usize,
    pub scroll_offset: u64,
    pub viewport: u32,
    pub scroll_direction: Option<ScrollDirection>,
    pub total_extent: u64,
    pub average_extent: u32,
    pub measured: usize,
    pub window: Option<WindowRange>,
    /// Slots currently bound to the window.
    pub slots: usize,
    /// Detached handles retained for reuse.
    pub spare: usize,
}
