//! Ordered card storage for the current topic.

use crate::card::Card;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

/// Internal identity of a store slot. Never serialized; cards are addressed
/// by position everywhere outside the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CardId(Uuid);

impl CardId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

/// A store operation named a position past the end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Card index {index} is out of bounds (length {len})")]
pub struct IndexError {
    pub index: usize,
    pub len: usize,
}

/// Ordered sequence of cards with point edits.
///
/// Cards live behind an `Arc`; writers go through `Arc::make_mut`, so a
/// [`snapshot`](CardStore::snapshot) taken earlier never observes a later
/// write or a half-applied batch.
#[derive(Debug, Clone, Default)]
pub struct CardStore {
    cards: Arc<Vec<Card>>,
    ids: Vec<CardId>,
}

impl CardStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from an existing card list (e.g. a loaded save).
    pub fn from_cards(cards: Vec<Card>) -> Self {
        let ids = cards.iter().map(|_| CardId::new()).collect();
        Self {
            cards: Arc::new(cards),
            ids,
        }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Card> {
        self.cards.get(index)
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// A cheap handle to the current contents.
    pub fn snapshot(&self) -> Arc<Vec<Card>> {
        Arc::clone(&self.cards)
    }

    pub fn id_at(&self, index: usize) -> Option<CardId> {
        self.ids.get(index).copied()
    }

    pub fn index_of(&self, id: CardId) -> Option<usize> {
        self.ids.iter().position(|&candidate| candidate == id)
    }

    /// Append a batch, preserving its order after existing cards.
    pub fn append(&mut self, batch: Vec<Card>) {
        if batch.is_empty() {
            return;
        }
        self.ids.extend(batch.iter().map(|_| CardId::new()));
        Arc::make_mut(&mut self.cards).extend(batch);
    }

    /// Remove the card at `index`, shifting later cards down.
    pub fn remove_at(&mut self, index: usize) -> Result<Card, IndexError> {
        self.check(index)?;
        self.ids.remove(index);
        Ok(Arc::make_mut(&mut self.cards).remove(index))
    }

    /// Swap the card at `index` in place. The slot keeps its identity.
    pub fn replace_at(&mut self, index: usize, card: Card) -> Result<Card, IndexError> {
        self.check(index)?;
        let slot = &mut Arc::make_mut(&mut self.cards)[index];
        Ok(std::mem::replace(slot, card))
    }

    pub fn clear(&mut self) {
        self.cards = Arc::new(Vec::new());
        self.ids.clear();
    }

    fn check(&self, index: usize) -> Result<(), IndexError> {
        if index < self.len() {
            Ok(())
        } else {
            Err(IndexError {
                index,
                len: self.len(),
            })
        }
    }
}
