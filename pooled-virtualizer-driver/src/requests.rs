use alloc::rc::Rc;
use core::cell::RefCell;
use core::mem;

use pooled_virtualizer::Align;

/// Work accumulated between two frames.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Pending {
    pub(crate) dirty: bool,
    pub(crate) size: Option<usize>,
    pub(crate) scroll_to: Option<(usize, Align)>,
    pub(crate) remeasure: bool,
}

impl Pending {
    pub(crate) fn is_empty(&self) -> bool {
        !self.dirty && self.size.is_none() && self.scroll_to.is_none() && !self.remeasure
    }
}

#[derive(Default)]
struct Inner {
    next: Pending,
    // Requests issued while a frame runs; they belong to the frame after it.
    deferred: Pending,
    in_frame: bool,
    waker: Option<Rc<dyn Fn()>>,
}

/// A cloneable handle for scheduling work on a [`crate::Driver`].
///
/// Every request sets a coalescing flag that the next [`crate::Driver::frame`] drains, so any
/// number of requests between two frames cost one recompute. Handles may be captured by the
/// host's element factory: requests issued from inside `create_elements` or `update_element`
/// (that is, while a frame is running) are deferred to the following frame.
///
/// An optional waker is invoked whenever the handle goes from "nothing to do" to "frame needed",
/// which is where a host schedules its animation-frame callback.
#[derive(Clone, Default)]
pub struct FrameRequests {
    inner: Rc<RefCell<Inner>>,
}

impl FrameRequests {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs the callback fired when a frame becomes necessary.
    pub fn set_waker(&self, waker: impl Fn() + 'static) {
        self.inner.borrow_mut().waker = Some(Rc::new(waker));
    }

    pub fn clear_waker(&self) {
        self.inner.borrow_mut().waker = None;
    }

    /// Whether the next frame has work to do.
    pub fn needs_frame(&self) -> bool {
        !self.inner.borrow().next.is_empty()
    }

    /// Whether a frame is currently running.
    pub fn in_frame(&self) -> bool {
        self.inner.borrow().in_frame
    }

    /// Requests a recompute (scroll, resize, explicit size notification...).
    pub fn request_frame(&self) {
        self.update(|p| p.dirty = true);
    }

    /// Changes the item count at the start of the next frame.
    pub fn request_size(&self, size: usize) {
        self.update(|p| p.size = Some(size));
    }

    /// Scrolls `index` into view on the next frame. Last request wins.
    pub fn request_scroll_to(&self, index: usize, align: Align) {
        self.update(|p| p.scroll_to = Some((index, align)));
    }

    /// Re-measures bound elements on the next frame.
    pub fn request_remeasure(&self) {
        self.update(|p| p.remeasure = true);
    }

    /// Drains the pending work and marks the frame as running.
    pub(crate) fn begin_frame(&self) -> Pending {
        let mut inner = self.inner.borrow_mut();
        inner.in_frame = true;
        mem::take(&mut inner.next)
    }

    /// Ends the running frame and promotes deferred requests to the next one.
    pub(crate) fn end_frame(&self) {
        let waker = {
            let mut inner = self.inner.borrow_mut();
            inner.in_frame = false;
            let deferred = mem::take(&mut inner.deferred);
            if deferred.is_empty() {
                None
            } else {
                vdebug!(?deferred, "requests deferred to the next frame");
                let was_idle = inner.next.is_empty();
                merge(&mut inner.next, deferred);
                if was_idle { inner.waker.clone() } else { None }
            }
        };
        if let Some(waker) = waker {
            waker();
        }
    }

    fn update(&self, f: impl FnOnce(&mut Pending)) {
        let waker = {
            let mut inner = self.inner.borrow_mut();
            if inner.in_frame {
                f(&mut inner.deferred);
                None
            } else {
                let was_idle = inner.next.is_empty();
                f(&mut inner.next);
                if was_idle { inner.waker.clone() } else { None }
            }
        };
        // Called with the borrow released: the waker may query the handle.
        if let Some(waker) = waker {
            waker();
        }
    }
}

fn merge(into: &mut Pending, from: Pending) {
    into.dirty |= from.dirty;
    into.remeasure |= from.remeasure;
    if from.size.is_some() {
        into.size = from.size;
    }
    if from.scroll_to.is_some() {
        into.scroll_to = from.scroll_to;
    }
}

impl core::fmt::Debug for FrameRequests {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("FrameRequests")
            .field("next", &inner.next)
            .field("deferred", &inner.deferred)
            .field("in_frame", &inner.in_frame)
            .field("has_waker", &inner.waker.is_some())
            .finish()
    }
}
