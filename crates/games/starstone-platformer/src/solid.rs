use std::collections::{HashMap, HashSet};

use starstone_core::geometry::Rect;

use crate::entity::{Entity, EntityId};

/// Ordered set of the entities that currently block movement.
///
/// Rectangles are read from the level's entity arena at query time, so the
/// set never holds stale geometry. Query results follow insertion order.
#[derive(Debug, Clone, Default)]
pub struct SolidSet {
    order: Vec<EntityId>,
    /// O(1) lookup companion for `order`.
    members: HashSet<EntityId>,
}

impl SolidSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false if the id was already a member.
    pub fn insert(&mut self, id: EntityId) -> bool {
        if !self.members.insert(id) {
            return false;
        }
        self.order.push(id);
        true
    }

    /// Returns false if the id was not a member.
    pub fn remove(&mut self, id: EntityId) -> bool {
        if !self.members.remove(&id) {
            return false;
        }
        self.order.retain(|&member| member != id);
        true
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.members.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn clear(&mut self) {
        self.order.clear();
        self.members.clear();
    }

    /// Members other than `exclude` whose rectangle strictly overlaps `area`.
    /// Entities killed earlier in the frame are skipped.
    pub fn overlapping(
        &self,
        area: &Rect,
        exclude: EntityId,
        entities: &HashMap<EntityId, Entity>,
    ) -> Vec<EntityId> {
        self.order
            .iter()
            .copied()
            .filter(|&id| id != exclude)
            .filter(|id| {
                entities
                    .get(id)
                    .is_some_and(|e| e.is_active() && e.rect.intersects(area))
            })
            .collect()
    }
}
