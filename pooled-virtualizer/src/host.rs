use alloc::vec::Vec;

use crate::ScrollMetrics;

/// The capability interface the virtualizer needs from a retained-mode UI surface.
///
/// `Element` is an opaque handle (a DOM node, a widget id, a terminal row buffer...). The
/// virtualizer never inspects it; it only asks the factory to create handles in batches, bind
/// them to indexes and report their rendered extent.
pub trait ElementFactory {
    type Element;

    /// Creates `count` fresh handles. Must return exactly `count` handles.
    fn create_elements(&mut self, count: usize) -> Vec<Self::Element>;

    /// Binds `element` to `index`. The element must be in its final rendered state for `index`
    /// when this returns, because it is measured right after.
    fn update_element(&mut self, element: &mut Self::Element, index: usize);

    /// Reads back the rendered extent of `element` along the scroll axis.
    fn measure_element(&mut self, element: &Self::Element) -> u32;

    /// Cleanup hook fired before an element leaves `index` (rebinding or eviction).
    fn detach_element(&mut self, _element: &mut Self::Element, _index: usize) {}

    /// Moves `element` to `offset` inside the scroll container.
    fn place_element(&mut self, _element: &mut Self::Element, _offset: u64) {}

    /// Hands back a handle the pool no longer retains.
    fn release_element(&mut self, _element: Self::Element) {}
}

/// The scroll target and the scroll container, as seen by the virtualizer.
pub trait ScrollSurface {
    /// Current scroll offset and viewport extent, or `None` while the surface is not laid out.
    fn metrics(&self) -> Option<ScrollMetrics>;

    fn set_scroll_offset(&mut self, offset: u64);

    /// Sizes the placeholder that gives the container its total scrollable extent.
    fn set_placeholder_extent(&mut self, extent: u64);
}
