use gallery_core::types::BodyHandle;

#[derive(Debug, Clone, Copy)]
struct Slot {
    generation: u32,
    alive: bool,
}

/// Generational slot allocator for rigid bodies.
///
/// Freed slots are reused with a bumped generation, so a handle kept past
/// removal never aliases the body that later takes its slot.
pub struct HandleAllocator {
    slots: Vec<Slot>,
    free_indices: Vec<u32>,
}

impl HandleAllocator {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_indices: Vec::new(),
        }
    }

    pub fn allocate(&mut self) -> BodyHandle {
        if let Some(index) = self.free_indices.pop() {
            let slot = &mut self.slots[index as usize];
            slot.alive = true;
            BodyHandle::new(index, slot.generation)
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(Slot {
                generation: 0,
                alive: true,
            });
            BodyHandle::new(index, 0)
        }
    }

    /// Returns false for stale or unknown handles.
    pub fn deallocate(&mut self, handle: BodyHandle) -> bool {
        if !self.is_alive(handle) {
            return false;
        }
        let slot = &mut self.slots[handle.index as usize];
        slot.generation = slot.generation.wrapping_add(1);
        slot.alive = false;
        self.free_indices.push(handle.index);
        true
    }

    pub fn is_alive(&self, handle: BodyHandle) -> bool {
        self.slots
            .get(handle.index as usize)
            .is_some_and(|slot| slot.alive && slot.generation == handle.generation)
    }

    /// Drop every slot. Outstanding handles all go stale.
    pub fn reset(&mut self) {
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.alive {
                slot.generation = slot.generation.wrapping_add(1);
                slot.alive = false;
                self.free_indices.push(index as u32);
            }
        }
    }
}

impl Default for HandleAllocator {
    fn default() -> Self {
        Self::new()
    }
}
