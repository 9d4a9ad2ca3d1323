use pooled_virtualizer::{
    Align, ElementFactory, RecomputeOutcome, ScrollSurface, Virtualizer, VirtualizerError,
    checked_size,
};

use crate::FrameRequests;

/// What a call to [`Driver::frame`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FrameOutcome {
    /// Nothing was requested since the last frame.
    Idle,
    /// One recompute ran.
    Recomputed(RecomputeOutcome),
    /// The recompute failed transiently (the surface is not laid out yet). The work stays
    /// pending inside the virtualizer and runs on the next triggering event.
    Deferred,
}

/// Funnels scroll, resize and size-change events into one recompute per frame.
///
/// Hosts forward their events to the `on_*` methods (cheap: they only set flags) and call
/// [`Self::frame`] from their frame callback. A [`FrameRequests`] handle obtained from
/// [`Self::requests`] can be cloned into the element factory for requests that originate from
/// inside `create_elements`/`update_element`.
pub struct Driver<F: ElementFactory, S> {
    v: Virtualizer<F, S>,
    requests: FrameRequests,
}

impl<F: ElementFactory, S: ScrollSurface> Driver<F, S> {
    /// Wraps `v`. The first frame is requested right away so the initial window gets built.
    pub fn new(v: Virtualizer<F, S>) -> Self {
        Self::with_requests(v, FrameRequests::new())
    }

    /// Like [`Self::new`], sharing an existing handle (e.g. one already captured by the factory).
    pub fn with_requests(v: Virtualizer<F, S>, requests: FrameRequests) -> Self {
        requests.request_frame();
        Self { v, requests }
    }

    pub fn virtualizer(&self) -> &Virtualizer<F, S> {
        &self.v
    }

    pub fn virtualizer_mut(&mut self) -> &mut Virtualizer<F, S> {
        &mut self.v
    }

    pub fn into_virtualizer(self) -> Virtualizer<F, S> {
        self.v
    }

    pub fn requests(&self) -> &FrameRequests {
        &self.requests
    }

    pub fn needs_frame(&self) -> bool {
        self.requests.needs_frame()
    }

    /// The scroll target scrolled.
    pub fn on_scroll(&mut self) {
        self.requests.request_frame();
    }

    /// The scroll target changed its viewport extent.
    pub fn on_resize(&mut self) {
        self.requests.request_frame();
    }

    /// One of the pooled elements changed its rendered extent.
    pub fn on_element_resized(&mut self) {
        self.requests.request_remeasure();
    }

    /// The data behind the list changed without the count changing.
    pub fn notify_size_changed(&mut self) {
        self.requests.request_frame();
    }

    pub fn size(&self) -> usize {
        self.v.size()
    }

    /// Changes the item count. Shrinking evicts bindings and measurements before returning; the
    /// window follows on the next frame.
    pub fn set_size(&mut self, size: usize) {
        self.v.set_size(size);
        self.notify_size_changed();
    }

    /// [`Self::set_size`] for counts coming from an untyped host (script bindings, JSON...).
    pub fn set_size_f64(&mut self, raw: f64) -> Result<(), VirtualizerError> {
        let size = checked_size(raw)?;
        self.set_size(size);
        Ok(())
    }

    pub fn scroll_to_index(&mut self, index: usize) {
        self.scroll_to_index_aligned(index, Align::Start);
    }

    pub fn scroll_to_index_aligned(&mut self, index: usize, align: Align) {
        self.requests.request_scroll_to(index, align);
    }

    pub fn first_visible_index(&self) -> Option<usize> {
        self.v.first_visible_index()
    }

    pub fn last_visible_index(&self) -> Option<usize> {
        self.v.last_visible_index()
    }

    /// Runs the frame: drains every pending request and recomputes at most once.
    ///
    /// Transient failures are logged and reported as [`FrameOutcome::Deferred`]; fatal ones
    /// (an under-provisioning factory) are returned. When the reconciler did not settle within
    /// its pass budget, another frame is requested.
    pub fn frame(&mut self) -> Result<FrameOutcome, VirtualizerError> {
        let pending = self.requests.begin_frame();
        if pending.is_empty() {
            self.requests.end_frame();
            return Ok(FrameOutcome::Idle);
        }

        if let Some(size) = pending.size {
            self.v.set_size(size);
        }
        if let Some((index, align)) = pending.scroll_to {
            self.v.scroll_to_index_aligned(index, align);
        }
        if pending.remeasure {
            self.v.request_remeasure();
        }

        let result = self.v.recompute();
        self.requests.end_frame();

        match result {
            Ok(outcome) => {
                if !outcome.settled {
                    self.requests.request_frame();
                }
                vtrace!(
                    passes = outcome.passes,
                    updated = outcome.updated,
                    settled = outcome.settled,
                    "frame"
                );
                Ok(FrameOutcome::Recomputed(outcome))
            }
            Err(err) if !err.is_fatal() => {
                vwarn!(error = %err, "recompute failed; retrying on the next event");
                Ok(FrameOutcome::Deferred)
            }
            Err(err) => Err(err),
        }
    }
}

impl<F: ElementFactory, S> core::fmt::Debug for Driver<F, S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Driver")
            .field("v", &self.v)
            .field("requests", &self.requests)
            .finish()
    }
}
