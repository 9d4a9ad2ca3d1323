use pooled_virtualizer::{
    ElementFactory, ScrollMetrics, ScrollSurface, Virtualizer, VirtualizerOptions,
};
use pooled_virtualizer_driver::{Driver, FrameOutcome, FrameRequests};

// Cards whose height depends on their content; the estimate starts out wrong.
struct Cards {
    requests: FrameRequests,
}

impl ElementFactory for Cards {
    type Element = Option<usize>;

    fn create_elements(&mut self, count: usize) -> Vec<Option<usize>> {
        vec![None; count]
    }

    fn update_element(&mut self, card: &mut Option<usize>, index: usize) {
        *card = Some(index);
        // Rendering card 30 triggers a jump; the handle defers it to the next frame.
        if index == 30 {
            self.requests.request_scroll_to(500, pooled_virtualizer::Align::Center);
        }
    }

    fn measure_element(&mut self, card: &Option<usize>) -> u32 {
        card.map_or(0, |i| 40 + (i % 5) as u32 * 12)
    }
}

#[derive(Default)]
struct Page {
    offset: u64,
}

impl ScrollSurface for Page {
    fn metrics(&self) -> Option<ScrollMetrics> {
        Some(ScrollMetrics {
            offset: self.offset,
            viewport: 600,
        })
    }

    fn set_scroll_offset(&mut self, offset: u64) {
        self.offset = offset;
    }

    fn set_placeholder_extent(&mut self, _extent: u64) {}
}

fn main() {
    // Example: an adapter owns the frame loop and forwards UI events to the driver.
    //
    // - scroll/resize handlers call `on_scroll`/`on_resize` (cheap, just flags)
    // - the frame callback calls `frame()` while `needs_frame()` is set
    let requests = FrameRequests::new();
    requests.set_waker(|| println!("  (waker: schedule a frame)"));

    let v = Virtualizer::new(
        VirtualizerOptions::new(10_000, 30),
        Cards {
            requests: requests.clone(),
        },
        Page::default(),
    );
    let mut d = Driver::with_requests(v, requests);

    let mut frame = 0;
    let mut run = |d: &mut Driver<Cards, Page>| {
        while d.needs_frame() {
            frame += 1;
            match d.frame() {
                Ok(FrameOutcome::Recomputed(outcome)) => println!(
                    "frame {frame}: visible {:?}..={:?} {outcome:?}",
                    d.first_visible_index(),
                    d.last_visible_index()
                ),
                Ok(other) => println!("frame {frame}: {other:?}"),
                Err(err) => {
                    eprintln!("fatal: {err}");
                    return;
                }
            }
        }
    };

    run(&mut d);

    // A burst of scroll events before the next frame collapses into one recompute.
    for offset in [400, 900, 1400] {
        d.virtualizer_mut().surface_mut().offset = offset;
        d.on_scroll();
    }
    run(&mut d);

    d.set_size(20);
    run(&mut d);
}
