use std::collections::VecDeque;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Texture,
    Geometry
}

/// A handle to a slot in [`ResourceRegistry`].
///
/// The generation guards against a stale handle releasing a slot
/// that was already handed out again.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ResourceHandle {
    slot: usize,
    generation: u32,
    kind: ResourceKind
}

impl ResourceHandle {
    pub fn kind(&self) -> ResourceKind {
        self.kind
    }
}

#[derive(Copy, Clone)]
struct Slot {
    generation: u32,
    kind: Option<ResourceKind>
}

/// Bookkeeping for per-frame scene resources (background textures and star geometry).
/// Every allocation must be matched by a release, so `live_count` stays flat
/// across any number of rebuilds.
#[derive(Default)]
pub struct ResourceRegistry {
    slots: Vec<Slot>,
    free_list: VecDeque<usize>
}

impl ResourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate(&mut self, kind: ResourceKind) -> ResourceHandle {
        let slot = self.free_list
            .pop_back()
            .unwrap_or(self.slots.len());
        if slot < self.slots.len() {
            let entry = &mut self.slots[slot];
            entry.generation = entry.generation.wrapping_add(1);
            entry.kind = Some(kind);
        } else {
            self.slots.push(Slot { generation: 0, kind: Some(kind) });
        }
        ResourceHandle {
            slot,
            generation: self.slots[slot].generation,
            kind
        }
    }

    /// Returns `false` when the handle was already released or is stale.
    pub fn release(&mut self, handle: ResourceHandle) -> bool {
        if handle.slot >= self.slots.len() { return false; }
        let entry = &mut self.slots[handle.slot];
        if entry.generation != handle.generation || entry.kind.is_none() {
            return false;
        }
        entry.kind = None;
        self.free_list.push_back(handle.slot);
        true
    }

    pub fn is_live(&self, handle: ResourceHandle) -> bool {
        self.slots
            .get(handle.slot)
            .map(|it| it.generation == handle.generation && it.kind.is_some())
            .unwrap_or(false)
    }

    pub fn live_count(&self, kind: ResourceKind) -> usize {
        self.slots
            .iter()
            .filter(|it| it.kind == Some(kind))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn released_slots_are_reused() {
        let mut registry = ResourceRegistry::new();
        let first = registry.allocate(ResourceKind::Texture);
        assert!(registry.release(first));
        let second = registry.allocate(ResourceKind::Texture);
        assert_eq!(registry.slots.len(), 1);
        assert!(registry.is_live(second));
        assert!(!registry.is_live(first));
    }

    #[test]
    fn stale_handle_cannot_release_a_reused_slot() {
        let mut registry = ResourceRegistry::new();
        let first = registry.allocate(ResourceKind::Geometry);
        registry.release(first);
        let second = registry.allocate(ResourceKind::Geometry);
        assert!(!registry.release(first));
        assert!(registry.is_live(second));
        assert_eq!(registry.live_count(ResourceKind::Geometry), 1);
    }

    #[test]
    fn counts_are_tracked_per_kind() {
        let mut registry = ResourceRegistry::new();
        let tex = registry.allocate(ResourceKind::Texture);
        registry.allocate(ResourceKind::Geometry);
        registry.allocate(ResourceKind::Geometry);
        assert_eq!(registry.live_count(ResourceKind::Texture), 1);
        assert_eq!(registry.live_count(ResourceKind::Geometry), 2);
        assert_eq!(tex.kind(), ResourceKind::Texture);
    }
}
