use crate::WindowRange;
use crate::height::HeightModel;

/// Largest scroll offset that still shows a full viewport.
pub(crate) fn max_scroll_offset(heights: &HeightModel, viewport: u32) -> u64 {
    heights.total_extent().saturating_sub(viewport as u64)
}

/// Finds the item covering `scroll_offset`.
///
/// Starts from `hint` (the previous first visible index) and walks item by item, so per-frame
/// cost tracks scroll distance instead of list length. Long jumps fall back to the prefix tree.
pub(crate) fn locate_first(
    heights: &HeightModel,
    scroll_offset: u64,
    hint: Option<usize>,
    walk_limit: usize,
) -> Option<usize> {
    let size = heights.len();
    if size == 0 {
        return None;
    }

    if let Some(mut i) = hint.filter(|&h| h < size) {
        let mut off = heights.offset_of(i);
        let mut steps = 0usize;
        if off <= scroll_offset {
            while steps <= walk_limit {
                let end = off.saturating_add(heights.estimate(i) as u64);
                if end > scroll_offset || i + 1 >= size {
                    return Some(i);
                }
                off = end;
                i += 1;
                steps += 1;
            }
        } else {
            while off > scroll_offset && i > 0 && steps <= walk_limit {
                i -= 1;
                off = off.saturating_sub(heights.estimate(i) as u64);
                steps += 1;
            }
            if off <= scroll_offset {
                return Some(i);
            }
        }
        vtrace!(hint = ?hint, scroll_offset, "walk limit hit, seeking");
    }

    heights.index_at_offset(scroll_offset)
}

/// Computes the visible range and its runout-expanded window.
///
/// Returns `None` when there is nothing to show (`size == 0` or a zero-sized viewport).
pub(crate) fn compute(
    heights: &HeightModel,
    scroll_offset: u64,
    viewport: u32,
    hint: Option<usize>,
    buffer_size: Option<usize>,
    walk_limit: usize,
) -> Option<WindowRange> {
    let size = heights.len();
    if size == 0 || viewport == 0 {
        return None;
    }

    let scroll_offset = scroll_offset.min(max_scroll_offset(heights, viewport));
    let first = locate_first(heights, scroll_offset, hint, walk_limit)?;

    let scroll_end = scroll_offset.saturating_add(viewport as u64);
    let mut last = first;
    let mut end = heights
        .offset_of(first)
        .saturating_add(heights.estimate(first) as u64);
    while end < scroll_end && last + 1 < size {
        last += 1;
        end = end.saturating_add(heights.estimate(last) as u64);
    }

    let buffer = buffer_size.unwrap_or(last + 1 - first);
    Some(WindowRange {
        first_visible: first,
        last_visible: last,
        start_index: first.saturating_sub(buffer),
        end_index: last.saturating_add(1).saturating_add(buffer).min(size),
    })
}
