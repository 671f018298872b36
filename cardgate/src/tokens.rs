//! Merchant-side registry of saved cards and their gateway tokens.
//!
//! When a payer saves a card during checkout, the gateway issues a `cli_auth`
//! token that stands in for the card's PAN on later charges. The merchant is
//! responsible for storing those tokens per user and, critically, for never
//! charging a token that belongs to someone else. [`CardRegistry`] is that
//! store: a concurrent per-user map with an ownership-checked token lookup.

use dashmap::DashMap;

use crate::fields::{CardShortCode, CardToken, CardVendor};
use serde::{Deserialize, Serialize};

/// A card saved by a payer, as the merchant stores it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedCard {
    /// Merchant-assigned card identifier, unique per user.
    pub card_id: u64,
    /// Card brand.
    pub vendor: CardVendor,
    /// Masked number shown when picking the card.
    pub short_code: CardShortCode,
    /// Gateway token standing in for the PAN.
    #[serde(rename = "cli_auth")]
    pub cli_auth: CardToken,
}

/// Failure to resolve a saved card to its token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    /// The user has no saved cards at all.
    #[error("user {user_id} has no saved cards")]
    UnknownUser {
        /// The requesting user.
        user_id: u64,
    },

    /// The card exists under a different user, or not at all.
    #[error("user {user_id} does not own card {card_id}")]
    NotOwned {
        /// The requesting user.
        user_id: u64,
        /// The requested card.
        card_id: u64,
    },
}

/// Concurrent per-user store of saved cards.
///
/// # Example
///
/// ```rust
/// use cardgate::fields::{CardShortCode, CardToken, CardVendor, Field};
/// use cardgate::tokens::{CardRegistry, SavedCard};
///
/// let registry = CardRegistry::new();
/// registry.insert(2, SavedCard {
///     card_id: 1,
///     vendor: CardVendor::Visa,
///     short_code: CardShortCode::parse("****1111".into()).unwrap(),
///     cli_auth: CardToken::parse("t5ca63654a3c44a8fac1dea7f1227b9f5d8dc4af".into()).unwrap(),
/// });
///
/// let token = registry.authorize(2, 1).unwrap();
/// assert!(registry.authorize(3, 1).is_err());
/// ```
#[derive(Debug, Default)]
pub struct CardRegistry {
    cards: DashMap<u64, Vec<SavedCard>>,
}

impl CardRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cards: DashMap::new(),
        }
    }

    /// Stores a card under the given user.
    ///
    /// A card with the same `card_id` already stored for this user is
    /// replaced; tokens rotate when a payer re-saves a card.
    pub fn insert(&self, user_id: u64, card: SavedCard) {
        let mut entry = self.cards.entry(user_id).or_default();
        if let Some(existing) = entry.iter_mut().find(|c| c.card_id == card.card_id) {
            *existing = card;
        } else {
            entry.push(card);
        }
    }

    /// Returns the user's saved cards, most recently added last.
    #[must_use]
    pub fn cards_for(&self, user_id: u64) -> Vec<SavedCard> {
        self.cards
            .get(&user_id)
            .map(|cards| cards.clone())
            .unwrap_or_default()
    }

    /// Resolves a card to its token, enforcing that `user_id` owns it.
    ///
    /// # Errors
    ///
    /// [`TokenError::UnknownUser`] if the user has no cards,
    /// [`TokenError::NotOwned`] if the card is not among them.
    pub fn authorize(&self, user_id: u64, card_id: u64) -> Result<CardToken, TokenError> {
        let cards = self
            .cards
            .get(&user_id)
            .ok_or(TokenError::UnknownUser { user_id })?;
        cards
            .iter()
            .find(|card| card.card_id == card_id)
            .map(|card| card.cli_auth.clone())
            .ok_or(TokenError::NotOwned { user_id, card_id })
    }

    /// Removes a card, returning whether it was present.
    pub fn remove(&self, user_id: u64, card_id: u64) -> bool {
        self.cards.get_mut(&user_id).is_some_and(|mut cards| {
            let before = cards.len();
            cards.retain(|card| card.card_id != card_id);
            cards.len() != before
        })
    }

    /// Returns the number of users with at least one saved card.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Returns `true` if no cards are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::Field;

    fn card(card_id: u64, token_suffix: char) -> SavedCard {
        let mut token = "t5ca63654a3c44a8fac1dea7f1227b9f5d8dc4a".to_owned();
        token.push(token_suffix);
        SavedCard {
            card_id,
            vendor: CardVendor::Visa,
            short_code: CardShortCode::parse("****1111".to_owned()).unwrap(),
            cli_auth: CardToken::parse(token).unwrap(),
        }
    }

    #[test]
    fn test_authorize_returns_owned_token() {
        let registry = CardRegistry::new();
        registry.insert(2, card(1, 'f'));
        let token = registry.authorize(2, 1).unwrap();
        assert!(token.as_str().ends_with('f'));
    }

    #[test]
    fn test_authorize_rejects_foreign_card() {
        let registry = CardRegistry::new();
        registry.insert(2, card(1, 'f'));
        registry.insert(3, card(7, '0'));
        assert_eq!(
            registry.authorize(3, 1),
            Err(TokenError::NotOwned {
                user_id: 3,
                card_id: 1
            })
        );
    }

    #[test]
    fn test_authorize_rejects_unknown_user() {
        let registry = CardRegistry::new();
        assert_eq!(
            registry.authorize(9, 1),
            Err(TokenError::UnknownUser { user_id: 9 })
        );
    }

    #[test]
    fn test_insert_replaces_rotated_token() {
        let registry = CardRegistry::new();
        registry.insert(2, card(1, 'f'));
        registry.insert(2, card(1, '0'));
        assert_eq!(registry.cards_for(2).len(), 1);
        assert!(registry.authorize(2, 1).unwrap().as_str().ends_with('0'));
    }

    #[test]
    fn test_remove_card() {
        let registry = CardRegistry::new();
        registry.insert(2, card(1, 'f'));
        assert!(registry.remove(2, 1));
        assert!(!registry.remove(2, 1));
        assert!(registry.cards_for(2).is_empty());
    }

    #[test]
    fn test_saved_card_wire_shape_uses_cli_auth() {
        let value = serde_json::to_value(card(1, 'f')).unwrap();
        assert_eq!(value["cardId"], 1);
        assert_eq!(value["shortCode"], "****1111");
        assert!(value["cli_auth"].is_string());
    }
}
