//! Roll resolution: roll + stage + mitigation state -> target stage.
//!
//! Pure functions; the session applies the resulting `Resolution` to the
//! board and metrics.

use serde::{Deserialize, Serialize};

use super::outcome::{Mitigation, Outcome, ResolvedOutcome};
use crate::core::error::{EngineError, EngineResult};
use crate::stages::Stage;

/// The decided fate of one roll.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    /// Die value, 1..=6.
    pub roll: u8,
    /// Stage the card was rolled in.
    pub from: Stage,
    pub outcome: ResolvedOutcome,
    /// Stage the card is sent to.
    pub to: Stage,
}

impl Resolution {
    /// Is this an adverse roll (anything but 2 or 3)?
    ///
    /// Adverse rolls bump the card's revert counter and are logged, even
    /// when a mitigation softened where the card lands.
    #[must_use]
    pub const fn is_revert(&self) -> bool {
        !matches!(self.roll, 2 | 3)
    }

    /// Can a token still be spent on this resolution?
    #[must_use]
    pub fn accepts_token(&self) -> bool {
        matches!(self.roll, 5 | 6) && self.outcome.effective().softened().is_some()
    }

    /// The same roll, softened one more tier by a token.
    #[must_use]
    pub fn with_token(&self) -> Option<Resolution> {
        if !self.accepts_token() {
            return None;
        }
        let outcome = self.outcome.mitigate(Mitigation::Token)?;
        let to = outcome.effective().target(self.from);
        Some(Resolution {
            roll: self.roll,
            from: self.from,
            outcome,
            to,
        })
    }
}

/// Resolve a roll for a card in `from`.
///
/// With technical debt active, a roll of 6 is softened to the roll-5 target.
///
/// ```
/// use sprint_board::outcomes::resolve;
/// use sprint_board::stages::Stage;
///
/// let plain = resolve(6, Stage::Integration, false).unwrap();
/// assert_eq!(plain.to, Stage::SprintBacklog);
///
/// let softened = resolve(6, Stage::Integration, true).unwrap();
/// assert_eq!(softened.to, Stage::Implementation);
/// ```
pub fn resolve(roll: u8, from: Stage, technical_debt_active: bool) -> EngineResult<Resolution> {
    let base = Outcome::from_roll(roll).ok_or(EngineError::InvalidRoll(roll))?;

    let mut outcome = ResolvedOutcome::new(base);
    if technical_debt_active && base == Outcome::CriticalFailure {
        if let Some(softened) = outcome.mitigate(Mitigation::TechnicalDebt) {
            outcome = softened;
        }
    }

    let to = outcome.effective().target(from);
    Ok(Resolution { roll, from, outcome, to })
}
