//! The draft pool: catalog items not yet claimed by anyone.

use draftroom_protocol::{Item, ItemId};
use rand::Rng;

use crate::DraftError;

/// The set of items still up for grabs in one room.
///
/// Initialized as a copy of the catalog; items only ever leave, one at
/// a time, and are never re-added. Together with the roster's pick
/// lists this upholds the conservation invariant: every catalog item is
/// either here or in exactly one participant's picks.
#[derive(Debug, Clone)]
pub struct DraftPool {
    items: Vec<Item>,
}

impl DraftPool {
    /// Copies the catalog into a fresh pool.
    pub fn new(catalog: &[Item]) -> Self {
        Self {
            items: catalog.to_vec(),
        }
    }

    /// Removes and returns the item with the given id.
    ///
    /// # Errors
    /// `DraftError::ItemNotFound` if no such item remains — either it
    /// was already claimed or it was never in the catalog. Callers
    /// treat this as a routine race loss, not a fault.
    pub fn claim(&mut self, id: ItemId) -> Result<Item, DraftError> {
        let index = self
            .items
            .iter()
            .position(|item| item.id == id)
            .ok_or(DraftError::ItemNotFound(id))?;
        Ok(self.items.remove(index))
    }

    /// Removes and returns one item chosen uniformly at random.
    ///
    /// # Errors
    /// `DraftError::PoolEmpty` if nothing remains.
    pub fn claim_random<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
    ) -> Result<Item, DraftError> {
        if self.items.is_empty() {
            return Err(DraftError::PoolEmpty);
        }
        let index = rng.random_range(0..self.items.len());
        Ok(self.items.remove(index))
    }

    /// The remaining items, in catalog order.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
