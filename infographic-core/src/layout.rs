//! Grouping of cards into display rows.

use crate::card::Card;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// One card across the full width.
    Full,
    /// Two half-width cards side by side.
    Grid,
}

/// One display row: a single full card or a pair of half cards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayGroup<'a> {
    pub layout: Layout,
    /// Store index of the first card in the group.
    pub start: usize,
    pub cards: &'a [Card],
}

impl<'a> DisplayGroup<'a> {
    /// Store indices of the cards in this group.
    pub fn indices(&self) -> std::ops::Range<usize> {
        self.start..self.start + self.cards.len()
    }
}

/// Partition `cards` into display groups.
///
/// Pairing is greedy left to right: a half card pairs only with the card
/// directly after it, and only if that card is also half. Anything else is a
/// full group.
pub fn group_cards(cards: &[Card]) -> Vec<DisplayGroup<'_>> {
    let mut groups = Vec::with_capacity(cards.len());
    let mut i = 0;
    while i < cards.len() {
        let pairs = cards[i].is_half() && cards.get(i + 1).is_some_and(Card::is_half);
        let (layout, span) = if pairs {
            (Layout::Grid, 2)
        } else {
            (Layout::Full, 1)
        };
        groups.push(DisplayGroup {
            layout,
            start: i,
            cards: &cards[i..i + span],
        });
        i += span;
    }
    groups
}

/// Cards of `groups` in display order.
pub fn flatten<'a>(groups: &[DisplayGroup<'a>]) -> Vec<&'a Card> {
    groups.iter().flat_map(|g| g.cards.iter()).collect()
}
