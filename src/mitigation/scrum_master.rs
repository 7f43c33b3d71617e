//! Scrum Master tokens and technical-debt investment.

use serde::{Deserialize, Serialize};

use crate::core::error::{EngineError, EngineResult};

/// Mitigation resources held by the team.
///
/// `tokens_available` is derived as `tokens_total - tokens_used`, so it can
/// never go negative. Replenishing tokens is left to the host.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrumMasterState {
    pub tokens_total: u32,
    pub tokens_used: u32,

    pub technical_debt_active: bool,
    /// Turn at which the softening stops. `None` while inactive.
    pub technical_debt_expires_at: Option<u32>,

    /// Technical-debt effort invested during the current turn.
    pub technical_debt_invested: u32,
}

impl ScrumMasterState {
    #[must_use]
    pub const fn new(tokens: u32) -> Self {
        Self {
            tokens_total: tokens,
            tokens_used: 0,
            technical_debt_active: false,
            technical_debt_expires_at: None,
            technical_debt_invested: 0,
        }
    }

    #[must_use]
    pub const fn tokens_available(&self) -> u32 {
        self.tokens_total.saturating_sub(self.tokens_used)
    }

    /// Fail with `NoTokensAvailable` if every token is spent.
    pub fn ensure_token(&self) -> EngineResult<()> {
        if self.tokens_available() == 0 {
            return Err(EngineError::NoTokensAvailable);
        }
        Ok(())
    }

    /// Spend one token. Callers check `ensure_token` first.
    pub fn consume_token(&mut self) {
        debug_assert!(self.tokens_available() > 0);
        self.tokens_used += 1;
    }

    /// Add this turn's technical-debt effort.
    ///
    /// When the running total first reaches `threshold`, softening turns on
    /// until `turn + duration`. Returns `true` if this call activated it.
    pub fn record_investment(
        &mut self,
        effort: u32,
        threshold: u32,
        duration: u32,
        turn: u32,
    ) -> bool {
        let before = self.technical_debt_invested;
        self.technical_debt_invested += effort;

        let crossed = before < threshold && self.technical_debt_invested >= threshold;
        if crossed {
            self.technical_debt_active = true;
            self.technical_debt_expires_at = Some(turn + duration);
        }
        crossed
    }

    /// Clear the technical-debt flag once `turn` reaches its expiry.
    ///
    /// Returns `true` if the flag was cleared.
    pub fn expire(&mut self, turn: u32) -> bool {
        match self.technical_debt_expires_at {
            Some(expiry) if self.technical_debt_active && turn >= expiry => {
                self.technical_debt_active = false;
                self.technical_debt_expires_at = None;
                true
            }
            _ => false,
        }
    }

    /// Start a new turn's investment tally.
    pub fn reset_investment(&mut self) {
        self.technical_debt_invested = 0;
    }
}

impl Default for ScrumMasterState {
    fn default() -> Self {
        Self::new(0)
    }
}
