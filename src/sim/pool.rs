//! Recyclable entity storage
//!
//! Slots are never removed, only flagged inactive and pushed onto a free list.
//! Acquire pops the free list before growing, so a warmed-up pool stops
//! allocating. Handles carry a generation so a stale handle cannot release or
//! read an entity that has since reused its slot.

use serde::{Deserialize, Serialize};

/// Stable reference to a pooled entity; doubles as the entity id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PoolHandle {
    index: u32,
    generation: u32,
}

impl PoolHandle {
    /// Slot position inside the pool (iteration order)
    pub fn index(self) -> usize {
        self.index as usize
    }

    pub fn generation(self) -> u32 {
        self.generation
    }
}

#[derive(Debug, Clone)]
struct Slot<T> {
    value: T,
    active: bool,
    generation: u32,
}

/// Free-list backed pool of `T`
#[derive(Debug, Clone)]
pub struct EntityPool<T> {
    slots: Vec<Slot<T>>,
    /// Indices of inactive slots, popped from the back
    free: Vec<u32>,
    active_count: usize,
    /// Optional ceiling honoured by `try_acquire`
    limit: Option<usize>,
}

impl<T> Default for EntityPool<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> EntityPool<T> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            active_count: 0,
            limit: None,
        }
    }

    /// Pre-reserve room for `capacity` slots
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::with_capacity(capacity),
            active_count: 0,
            limit: None,
        }
    }

    /// Pool whose `try_acquire` refuses to grow past `limit` slots
    pub fn with_limit(limit: usize) -> Self {
        let mut pool = Self::with_capacity(limit);
        pool.limit = Some(limit);
        pool
    }

    /// Activate `value` in a free slot, growing the pool if none is free
    pub fn acquire(&mut self, value: T) -> PoolHandle {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            debug_assert!(!slot.active, "free list held an active slot");
            slot.value = value;
            slot.active = true;
            slot.generation = slot.generation.wrapping_add(1);
            self.active_count += 1;
            return PoolHandle {
                index,
                generation: slot.generation,
            };
        }

        let index = self.slots.len() as u32;
        if self.slots.len() == self.slots.capacity() {
            log::debug!(
                "Pool of {} growing past {} slots",
                std::any::type_name::<T>(),
                self.slots.len()
            );
        }
        self.slots.push(Slot {
            value,
            active: true,
            generation: 0,
        });
        self.active_count += 1;
        PoolHandle {
            index,
            generation: 0,
        }
    }

    /// Like `acquire`, but returns `None` instead of growing past the limit
    pub fn try_acquire(&mut self, value: T) -> Option<PoolHandle> {
        match self.limit {
            Some(limit) if self.free.is_empty() && self.slots.len() >= limit => None,
            _ => Some(self.acquire(value)),
        }
    }

    /// Deactivate the entity; stale or repeated releases return `false`
    pub fn release(&mut self, handle: PoolHandle) -> bool {
        match self.slots.get_mut(handle.index()) {
            Some(slot) if slot.active && slot.generation == handle.generation => {
                slot.active = false;
                self.free.push(handle.index);
                self.active_count -= 1;
                true
            }
            _ => false,
        }
    }

    pub fn is_active(&self, handle: PoolHandle) -> bool {
        self.get(handle).is_some()
    }

    pub fn get(&self, handle: PoolHandle) -> Option<&T> {
        self.slots
            .get(handle.index())
            .filter(|slot| slot.active && slot.generation == handle.generation)
            .map(|slot| &slot.value)
    }

    pub fn get_mut(&mut self, handle: PoolHandle) -> Option<&mut T> {
        self.slots
            .get_mut(handle.index())
            .filter(|slot| slot.active && slot.generation == handle.generation)
            .map(|slot| &mut slot.value)
    }

    /// Active entities in slot order
    pub fn iter_active(&self) -> impl Iterator<Item = (PoolHandle, &T)> {
        self.slots.iter().enumerate().filter_map(|(i, slot)| {
            slot.active.then_some((
                PoolHandle {
                    index: i as u32,
                    generation: slot.generation,
                },
                &slot.value,
            ))
        })
    }

    /// Mutable active entities in slot order
    pub fn iter_active_mut(&mut self) -> impl Iterator<Item = (PoolHandle, &mut T)> {
        self.slots.iter_mut().enumerate().filter_map(|(i, slot)| {
            if slot.active {
                Some((
                    PoolHandle {
                        index: i as u32,
                        generation: slot.generation,
                    },
                    &mut slot.value,
                ))
            } else {
                None
            }
        })
    }

    pub fn for_each_active(&self, mut f: impl FnMut(PoolHandle, &T)) {
        for (handle, value) in self.iter_active() {
            f(handle, value);
        }
    }

    pub fn for_each_active_mut(&mut self, mut f: impl FnMut(PoolHandle, &mut T)) {
        for (handle, value) in self.iter_active_mut() {
            f(handle, value);
        }
    }

    /// Visit active entities in slot order, releasing those for which `keep`
    /// returns `false`
    pub fn retain(&mut self, mut keep: impl FnMut(&mut T) -> bool) {
        for (i, slot) in self.slots.iter_mut().enumerate() {
            if slot.active && !keep(&mut slot.value) {
                slot.active = false;
                self.free.push(i as u32);
                self.active_count -= 1;
            }
        }
    }

    /// Deactivate everything; slot storage is kept for reuse
    pub fn reset(&mut self) {
        for slot in &mut self.slots {
            slot.active = false;
        }
        self.free.clear();
        // Reversed so the lowest index is handed out first
        self.free.extend((0..self.slots.len() as u32).rev());
        self.active_count = 0;
    }

    pub fn active_count(&self) -> usize {
        self.active_count
    }

    pub fn is_empty(&self) -> bool {
        self.active_count == 0
    }

    /// Slots ever allocated (active + inactive)
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_acquire_grows_when_exhausted() {
        let mut pool = EntityPool::new();
        let a = pool.acquire(1);
        let b = pool.acquire(2);
        // All slots active: the next acquire must append a fresh slot
        let c = pool.acquire(3);

        assert_eq!(pool.slot_count(), 3);
        assert_eq!(pool.active_count(), 3);
        assert_ne!(c.index(), a.index());
        assert_ne!(c.index(), b.index());
        assert_eq!(pool.get(a), Some(&1));
        assert_eq!(pool.get(b), Some(&2));
        assert_eq!(pool.get(c), Some(&3));
    }

    #[test]
    fn test_reuse_before_grow() {
        let mut pool = EntityPool::new();
        let a = pool.acquire("a");
        let _b = pool.acquire("b");
        assert!(pool.release(a));

        let c = pool.acquire("c");
        assert_eq!(c.index(), a.index());
        assert_eq!(pool.slot_count(), 2);
        assert_eq!(pool.get(c), Some(&"c"));
    }

    #[test]
    fn test_stale_handle_rejected() {
        let mut pool = EntityPool::new();
        let a = pool.acquire(10);
        assert!(pool.release(a));
        assert!(!pool.release(a), "double release must be a no-op");

        let b = pool.acquire(20);
        assert_eq!(b.index(), a.index());
        assert_ne!(b.generation(), a.generation());
        assert!(pool.get(a).is_none());
        assert!(!pool.release(a));
        assert_eq!(pool.get(b), Some(&20));
        assert_eq!(pool.active_count(), 1);
    }

    #[test]
    fn test_iteration_is_slot_ordered_and_active_only() {
        let mut pool = EntityPool::new();
        let handles: Vec<_> = (0..5).map(|i| pool.acquire(i)).collect();
        pool.release(handles[1]);
        pool.release(handles[3]);

        let seen: Vec<i32> = pool.iter_active().map(|(_, v)| *v).collect();
        assert_eq!(seen, vec![0, 2, 4]);

        let mut visited = Vec::new();
        pool.for_each_active(|h, v| visited.push((h.index(), *v)));
        assert_eq!(visited, vec![(0, 0), (2, 2), (4, 4)]);
    }

    #[test]
    fn test_retain_releases_in_place() {
        let mut pool = EntityPool::new();
        for i in 0..6 {
            pool.acquire(i);
        }
        pool.retain(|v| *v % 2 == 0);
        assert_eq!(pool.active_count(), 3);

        // Freed slots are reused before the pool grows
        for i in 0..3 {
            pool.acquire(100 + i);
        }
        assert_eq!(pool.slot_count(), 6);
        assert_eq!(pool.active_count(), 6);
    }

    #[test]
    fn test_reset_keeps_slots() {
        let mut pool = EntityPool::with_capacity(4);
        for i in 0..4 {
            pool.acquire(i);
        }
        pool.reset();
        assert!(pool.is_empty());
        assert_eq!(pool.slot_count(), 4);
        assert_eq!(pool.iter_active().count(), 0);

        let h = pool.acquire(99);
        assert_eq!(h.index(), 0);
        assert_eq!(pool.slot_count(), 4);
    }

    #[test]
    fn test_try_acquire_respects_limit() {
        let mut pool = EntityPool::with_limit(2);
        let a = pool.try_acquire(1).unwrap();
        assert!(pool.try_acquire(2).is_some());
        assert!(pool.try_acquire(3).is_none());

        pool.release(a);
        assert!(pool.try_acquire(4).is_some());
        assert_eq!(pool.slot_count(), 2);

        // Plain acquire still grows
        pool.acquire(5);
        assert_eq!(pool.slot_count(), 3);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Acquire(u32),
        Release(usize),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            any::<u32>().prop_map(Op::Acquire),
            (0usize..32).prop_map(Op::Release),
        ]
    }

    proptest! {
        #[test]
        fn prop_active_handles_never_alias(ops in proptest::collection::vec(op(), 0..200)) {
            let mut pool = EntityPool::new();
            let mut live: Vec<(PoolHandle, u32)> = Vec::new();

            for op in ops {
                match op {
                    Op::Acquire(v) => {
                        let h = pool.acquire(v);
                        prop_assert!(live.iter().all(|(other, _)| other.index() != h.index()));
                        live.push((h, v));
                    }
                    Op::Release(i) if !live.is_empty() => {
                        let (h, _) = live.remove(i % live.len());
                        prop_assert!(pool.release(h));
                    }
                    Op::Release(_) => {}
                }
                prop_assert_eq!(pool.active_count(), live.len());
                for (h, v) in &live {
                    prop_assert_eq!(pool.get(*h), Some(v));
                }
            }
        }
    }
}
