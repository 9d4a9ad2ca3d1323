use alloc::vec::Vec;
use core::mem;
use core::ops::Range;

use crate::VirtualizerError;
use crate::height::{HeightModel, MIN_EXTENT};
use crate::host::ElementFactory;

/// One reusable element and what it is currently bound to.
#[derive(Clone, Debug)]
pub struct Slot<E> {
    element: E,
    index: Option<usize>,
    extent: u32,
    placed_at: Option<u64>,
}

impl<E> Slot<E> {
    fn new(element: E) -> Self {
        Self {
            element,
            index: None,
            extent: 0,
            placed_at: None,
        }
    }

    pub fn element(&self) -> &E {
        &self.element
    }

    pub fn index(&self) -> Option<usize> {
        self.index
    }

    /// Extent read back after the last update (or remeasure).
    pub fn last_known_extent(&self) -> u32 {
        self.extent
    }
}

/// A bounded set of element handles that get rebound to indexes as the window moves.
///
/// Handles are created in batches through [`ElementFactory::create_elements`] and are never
/// destroyed while they are part of the pool. When the window shrinks, surplus handles are
/// parked as spares up to `spare_limit`; only handles beyond that are released to the factory.
#[derive(Debug)]
pub struct ElementPool<E> {
    slots: Vec<Slot<E>>,
    spare: Vec<E>,
    spare_limit: usize,

    // Reused across `assign` calls.
    held: Vec<Option<usize>>,
    free: Vec<usize>,
}

impl<E> ElementPool<E> {
    pub fn new(spare_limit: usize) -> Self {
        Self {
            slots: Vec::new(),
            spare: Vec::new(),
            spare_limit,
            held: Vec::new(),
            free: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn spare_len(&self) -> usize {
        self.spare.len()
    }

    pub fn slots(&self) -> &[Slot<E>] {
        &self.slots
    }

    pub fn set_spare_limit(&mut self, spare_limit: usize) {
        self.spare_limit = spare_limit;
    }

    /// Slot currently bound to `index`, if any.
    pub fn slot_for(&self, index: usize) -> Option<&Slot<E>> {
        self.slots.iter().find(|s| s.index == Some(index))
    }

    /// Iterates over bound `(index, element)` pairs in slot order.
    pub fn assigned(&self) -> impl Iterator<Item = (usize, &E)> + '_ {
        self.slots
            .iter()
            .filter_map(|s| s.index.map(|i| (i, &s.element)))
    }

    /// Grows or shrinks the pool to exactly `n` slots.
    ///
    /// Growth reuses spares first and then asks the factory for the remainder in one batch.
    /// Shrinking drops slots bound outside `keep` (or unbound) before anything inside it.
    pub fn ensure_capacity<F>(
        &mut self,
        n: usize,
        keep: Range<usize>,
        factory: &mut F,
    ) -> Result<(), VirtualizerError>
    where
        F: ElementFactory<Element = E>,
    {
        let len = self.slots.len();
        if n > len {
            let mut missing = n - len;
            while missing > 0 {
                let Some(element) = self.spare.pop() else {
                    break;
                };
                self.slots.push(Slot::new(element));
                missing -= 1;
            }
            if missing > 0 {
                let created = factory.create_elements(missing);
                if created.len() < missing {
                    vwarn!(
                        requested = missing,
                        returned = created.len(),
                        "element factory under-provisioned the pool"
                    );
                    let returned = created.len();
                    for element in created {
                        factory.release_element(element);
                    }
                    return Err(VirtualizerError::UnderProvisioned {
                        requested: missing,
                        returned,
                    });
                }
                vdebug!(created = missing, slots = n, "pool grew");
                let mut created = created.into_iter();
                self.slots
                    .extend(created.by_ref().take(missing).map(Slot::new));
                for extra in created {
                    factory.release_element(extra);
                }
            }
        } else if n < len {
            let mut surplus = len - n;
            let mut s = len;
            while s > 0 && surplus > 0 {
                s -= 1;
                let bound_inside = self.slots[s].index.is_some_and(|i| keep.contains(&i));
                if !bound_inside {
                    let slot = self.slots.swap_remove(s);
                    self.retire(slot, factory);
                    surplus -= 1;
                }
            }
            // Only reachable when `keep` is wider than `n`.
            while surplus > 0 {
                let Some(slot) = self.slots.pop() else {
                    break;
                };
                self.retire(slot, factory);
                surplus -= 1;
            }
            vdebug!(slots = n, spare = self.spare.len(), "pool shrank");
        }
        Ok(())
    }

    /// Binds every index in `range` to a slot and returns the number of `update_element` calls.
    ///
    /// Slots already bound to an index inside `range` keep it untouched. The pool must hold at
    /// least `range.len()` slots (see [`Self::ensure_capacity`]); indexes that don't fit are
    /// left unbound.
    pub fn assign<F>(
        &mut self,
        range: Range<usize>,
        heights: &mut HeightModel,
        factory: &mut F,
    ) -> usize
    where
        F: ElementFactory<Element = E>,
    {
        let mut held = mem::take(&mut self.held);
        let mut free = mem::take(&mut self.free);
        held.clear();
        held.resize(range.len(), None);
        free.clear();

        for (s, slot) in self.slots.iter().enumerate() {
            match slot.index {
                Some(i) if range.contains(&i) && held[i - range.start].is_none() => {
                    held[i - range.start] = Some(s);
                }
                _ => free.push(s),
            }
        }

        let mut updated = 0usize;
        for (offset, holder) in held.iter().enumerate() {
            if holder.is_some() {
                continue;
            }
            let Some(s) = free.pop() else {
                vwarn!(index = range.start + offset, "pool has no free slot");
                break;
            };
            if self.bind(s, range.start + offset, heights, factory) {
                updated += 1;
            }
        }

        // Whatever is left over is bound outside the window.
        for &s in &free {
            self.unbind(s, factory);
        }

        self.held = held;
        self.free = free;
        updated
    }

    /// Binds slot `s` to `index`, returning `true` if `update_element` ran.
    ///
    /// Rebinding a slot to the index it already holds is a no-op.
    pub fn bind<F>(
        &mut self,
        s: usize,
        index: usize,
        heights: &mut HeightModel,
        factory: &mut F,
    ) -> bool
    where
        F: ElementFactory<Element = E>,
    {
        let Some(slot) = self.slots.get_mut(s) else {
            return false;
        };
        if slot.index == Some(index) {
            return false;
        }
        if let Some(prev) = slot.index.take() {
            factory.detach_element(&mut slot.element, prev);
        }
        factory.update_element(&mut slot.element, index);
        let extent = factory.measure_element(&slot.element).max(MIN_EXTENT);
        slot.index = Some(index);
        slot.extent = extent;
        slot.placed_at = None;
        heights.record(index, extent);
        true
    }

    /// Unbinds every slot holding an index `>= size`.
    pub fn evict_from<F>(&mut self, size: usize, factory: &mut F) -> usize
    where
        F: ElementFactory<Element = E>,
    {
        let mut evicted = 0usize;
        for s in 0..self.slots.len() {
            if self.slots[s].index.is_some_and(|i| i >= size) {
                self.unbind(s, factory);
                evicted += 1;
            }
        }
        evicted
    }

    /// Re-reads the extent of every bound element and records it. Returns how many changed.
    pub fn remeasure<F>(&mut self, heights: &mut HeightModel, factory: &mut F) -> usize
    where
        F: ElementFactory<Element = E>,
    {
        let mut changed = 0usize;
        for slot in &mut self.slots {
            let Some(index) = slot.index else {
                continue;
            };
            let extent = factory.measure_element(&slot.element).max(MIN_EXTENT);
            if extent != slot.extent {
                changed += 1;
            }
            slot.extent = extent;
            heights.record(index, extent);
        }
        changed
    }

    /// Moves every bound element to its current offset, skipping elements already there.
    pub fn place<F>(&mut self, heights: &HeightModel, factory: &mut F)
    where
        F: ElementFactory<Element = E>,
    {
        for slot in &mut self.slots {
            let Some(index) = slot.index else {
                continue;
            };
            let offset = heights.offset_of(index);
            if slot.placed_at != Some(offset) {
                factory.place_element(&mut slot.element, offset);
                slot.placed_at = Some(offset);
            }
        }
    }

    fn unbind<F>(&mut self, s: usize, factory: &mut F)
    where
        F: ElementFactory<Element = E>,
    {
        let slot = &mut self.slots[s];
        if let Some(prev) = slot.index.take() {
            factory.detach_element(&mut slot.element, prev);
        }
        slot.placed_at = None;
    }

    fn retire<F>(&mut self, mut slot: Slot<E>, factory: &mut F)
    where
        F: ElementFactory<Element = E>,
    {
        if let Some(prev) = slot.index.take() {
            factory.detach_element(&mut slot.element, prev);
        }
        if self.spare.len() < self.spare_limit {
            self.spare.push(slot.element);
        } else {
            factory.release_element(slot.element);
        }
    }
}
