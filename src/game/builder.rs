//! Builder for starting a game with a seeded Funnel.

use super::session::GameSession;
use crate::cards::NewCard;
use crate::core::{BoardConfig, EngineResult};

/// Builder for creating a `GameSession`.
#[derive(Clone, Debug, Default)]
pub struct GameBuilder {
    config: BoardConfig,
    cards: Vec<NewCard>,
}

impl GameBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn config(mut self, config: BoardConfig) -> Self {
        self.config = config;
        self
    }

    /// Queue a card for the Funnel.
    #[must_use]
    pub fn card(mut self, card: NewCard) -> Self {
        self.cards.push(card);
        self
    }

    #[must_use]
    pub fn cards(mut self, cards: impl IntoIterator<Item = NewCard>) -> Self {
        self.cards.extend(cards);
        self
    }

    /// Build the session. Cards get ids in the order they were added.
    pub fn build(self) -> EngineResult<GameSession> {
        let mut session = GameSession::new(self.config);
        for card in self.cards {
            session.add_card(card)?;
        }
        Ok(session)
    }
}
