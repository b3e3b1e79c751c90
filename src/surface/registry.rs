//! The set of surfaces currently shown.
//!
//! Registration is what keeps a shown surface alive after the script drops
//! its handle; the host consults it before destroying a released surface.

use std::collections::BTreeSet;

use super::SurfaceId;

#[derive(Debug, Default)]
pub struct SurfaceRegistry {
    shown: BTreeSet<SurfaceId>,
}

impl SurfaceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` if `id` was already registered.
    pub fn register(&mut self, id: SurfaceId) -> bool {
        let inserted = self.shown.insert(id);
        if inserted {
            log::debug!("registered surface {id:?} ({} shown)", self.shown.len());
        }
        inserted
    }

    /// Returns `false` (and does nothing) if `id` was not registered.
    pub fn unregister(&mut self, id: SurfaceId) -> bool {
        let removed = self.shown.remove(&id);
        if removed {
            log::debug!("unregistered surface {id:?} ({} shown)", self.shown.len());
        }
        removed
    }

    pub fn contains(&self, id: SurfaceId) -> bool {
        self.shown.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.shown.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shown.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = SurfaceId> + '_ {
        self.shown.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    #[test]
    fn register_and_unregister() {
        let mut ids: SlotMap<SurfaceId, ()> = SlotMap::with_key();
        let (a, b) = (ids.insert(()), ids.insert(()));
        let mut reg = SurfaceRegistry::new();
        assert!(reg.register(a));
        assert!(!reg.register(a));
        assert!(reg.register(b));
        assert_eq!(reg.len(), 2);
        assert!(reg.unregister(a));
        assert!(!reg.contains(a));
        assert_eq!(reg.ids().collect::<Vec<_>>(), vec![b]);
    }

    #[test]
    fn unregister_unknown_is_noop() {
        let mut ids: SlotMap<SurfaceId, ()> = SlotMap::with_key();
        let mut reg = SurfaceRegistry::new();
        assert!(!reg.unregister(ids.insert(())));
        assert!(reg.is_empty());
    }
}
