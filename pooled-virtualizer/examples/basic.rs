// Example: a million text rows backed by a pool of a few dozen buffers.
use pooled_virtualizer::{
    Align, ElementFactory, ScrollMetrics, ScrollSurface, Virtualizer, VirtualizerOptions,
};

struct Rows {
    created: usize,
}

impl ElementFactory for Rows {
    type Element = String;

    fn create_elements(&mut self, count: usize) -> Vec<String> {
        self.created += count;
        vec![String::new(); count]
    }

    fn update_element(&mut self, row: &mut String, index: usize) {
        row.clear();
        row.push_str(&format!("row {index}"));
        // Every seventh row wraps onto a second line.
        if index % 7 == 0 {
            row.push_str("\n(wrapped)");
        }
    }

    fn measure_element(&mut self, row: &String) -> u32 {
        row.lines().count() as u32
    }
}

#[derive(Default)]
struct Terminal {
    offset: u64,
    placeholder: u64,
}

impl ScrollSurface for Terminal {
    fn metrics(&self) -> Option<ScrollMetrics> {
        Some(ScrollMetrics {
            offset: self.offset,
            viewport: 24,
        })
    }

    fn set_scroll_offset(&mut self, offset: u64) {
        self.offset = offset;
    }

    fn set_placeholder_extent(&mut self, extent: u64) {
        self.placeholder = extent;
    }
}

fn main() {
    let mut v = Virtualizer::new(
        VirtualizerOptions::new(1_000_000, 1),
        Rows { created: 0 },
        Terminal::default(),
    );

    v.recompute().unwrap();
    println!("window={:?}", v.window());
    println!("total_extent={}", v.total_extent());

    v.surface_mut().offset = 123_456;
    let outcome = v.recompute().unwrap();
    println!("after scroll: {outcome:?}");
    println!("first_visible={:?}", v.first_visible_index());

    v.scroll_to_index_aligned(999_999, Align::End);
    v.recompute().unwrap();
    println!(
        "after scroll_to_index: offset={} last_visible={:?}",
        v.scroll_offset(),
        v.last_visible_index()
    );
    println!(
        "elements created={} pooled={}",
        v.factory().created,
        v.pool().len()
    );
}
