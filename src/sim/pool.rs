//! Fixed-capacity entity arena
//!
//! Slots are allocated once. An active index list and a free index stack
//! partition them, so acquiring and recycling never allocate.

use rand::Rng;

/// An entity that can live in a [`Pool`]
pub trait PoolEntity: Default {
    fn is_active(&self) -> bool;

    fn set_active(&mut self, active: bool);

    /// Restore every field to its default (inactive) state
    fn reset(&mut self) {
        *self = Self::default();
    }

    /// Advance kinematics by one simulation step
    fn step<R: Rng + ?Sized>(&mut self, rng: &mut R);

    /// Whether the entity has left the area it may live in
    fn is_out_of_bounds(&self, width: f64, height: f64) -> bool;
}

/// Reusable entity store with a hard capacity
#[derive(Debug, Clone)]
pub struct Pool<E> {
    slots: Vec<E>,
    /// Slot indices currently in use
    active: Vec<usize>,
    /// Slot indices ready for reuse (stack)
    free: Vec<usize>,
}

impl<E: PoolEntity> Pool<E> {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: (0..capacity).map(|_| E::default()).collect(),
            active: Vec::with_capacity(capacity),
            // Reversed so slot 0 is handed out first
            free: (0..capacity).rev().collect(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Take a fresh entity out of the pool, or `None` when every slot is in use
    ///
    /// The entity comes back reset and marked active.
    pub fn acquire(&mut self) -> Option<&mut E> {
        let Some(idx) = self.free.pop() else {
            log::trace!("pool exhausted ({} slots)", self.slots.len());
            return None;
        };
        self.active.push(idx);
        let entity = &mut self.slots[idx];
        entity.reset();
        entity.set_active(true);
        Some(entity)
    }

    /// Step every active entity and recycle the ones that died or left the bounds
    ///
    /// Walks the active list back to front so a swap-remove only ever pulls in
    /// an entry that has already been stepped. Returns how many were recycled.
    pub fn advance<R: Rng + ?Sized>(&mut self, width: f64, height: f64, rng: &mut R) -> usize {
        let mut recycled = 0;
        let mut i = self.active.len();
        while i > 0 {
            i -= 1;
            let idx = self.active[i];
            let entity = &mut self.slots[idx];
            entity.step(rng);

            if !entity.is_active() || entity.is_out_of_bounds(width, height) {
                entity.reset();
                self.active.swap_remove(i);
                self.free.push(idx);
                recycled += 1;
            }
        }
        recycled
    }

    /// Iterate over the entities currently in use
    pub fn active(&self) -> impl Iterator<Item = &E> + '_ {
        self.active.iter().map(|&idx| &self.slots[idx])
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    pub fn available_count(&self) -> usize {
        self.free.len()
    }

    /// Return every entity to the pool
    pub fn clear(&mut self) {
        for idx in self.active.drain(..) {
            self.slots[idx].reset();
            self.free.push(idx);
        }
    }
}
