//! Role ownership and movement permissions.
//!
//! Each of the eight roles owns exactly one stage. A role may only start a
//! move from the stage it owns, and only toward that stage's successor or
//! straight to Production.

use serde::{Deserialize, Serialize};

use crate::core::error::{EngineError, EngineResult};
use crate::stages::Stage;

/// A team role. Declaration order is turn order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Stakeholder,
    ProductOwner,
    ScrumMaster,
    DeveloperImplementation,
    DeveloperIntegration,
    QaTester,
    ReleaseManager,
    Customer,
}

impl Role {
    /// All roles, in turn order.
    pub const ALL: [Role; 8] = [
        Role::Stakeholder,
        Role::ProductOwner,
        Role::ScrumMaster,
        Role::DeveloperImplementation,
        Role::DeveloperIntegration,
        Role::QaTester,
        Role::ReleaseManager,
        Role::Customer,
    ];

    /// The single stage this role is responsible for.
    #[must_use]
    pub const fn owned_stage(self) -> Stage {
        match self {
            Role::Stakeholder => Stage::Funnel,
            Role::ProductOwner => Stage::ProductBacklog,
            Role::ScrumMaster => Stage::SprintBacklog,
            Role::DeveloperImplementation => Stage::Implementation,
            Role::DeveloperIntegration => Stage::Integration,
            Role::QaTester => Stage::Testing,
            Role::ReleaseManager => Stage::PreDeployment,
            Role::Customer => Stage::Production,
        }
    }

    /// Inverse of `owned_stage`.
    #[must_use]
    pub const fn owner_of(stage: Stage) -> Role {
        match stage {
            Stage::Funnel => Role::Stakeholder,
            Stage::ProductBacklog => Role::ProductOwner,
            Stage::SprintBacklog => Role::ScrumMaster,
            Stage::Implementation => Role::DeveloperImplementation,
            Stage::Integration => Role::DeveloperIntegration,
            Stage::Testing => Role::QaTester,
            Stage::PreDeployment => Role::ReleaseManager,
            Stage::Production => Role::Customer,
        }
    }

    /// The role that acts after this one (wraps around).
    #[must_use]
    pub fn next(self) -> Role {
        let index = Self::ALL.iter().position(|&r| r == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }

    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Role::Stakeholder => "Stakeholder/BA",
            Role::ProductOwner => "Product Owner",
            Role::ScrumMaster => "Scrum Master",
            Role::DeveloperImplementation => "Developer (Implementation)",
            Role::DeveloperIntegration => "Developer (Integration)",
            Role::QaTester => "QA Tester",
            Role::ReleaseManager => "Release Manager",
            Role::Customer => "Customer",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Can `role` start a move out of `from`?
#[must_use]
pub fn can_initiate_move(role: Role, from: Stage) -> bool {
    role.owned_stage() == from
}

/// Can `role` move a card from `from` to `to`?
///
/// ```
/// use sprint_board::roles::{can_move_to, Role};
/// use sprint_board::stages::Stage;
///
/// assert!(can_move_to(Role::QaTester, Stage::Testing, Stage::PreDeployment));
/// assert!(can_move_to(Role::QaTester, Stage::Testing, Stage::Production));
/// assert!(!can_move_to(Role::QaTester, Stage::Testing, Stage::Implementation));
/// assert!(!can_move_to(Role::Customer, Stage::Testing, Stage::PreDeployment));
/// ```
#[must_use]
pub fn can_move_to(role: Role, from: Stage, to: Stage) -> bool {
    can_initiate_move(role, from)
        && from != to
        && (from.next() == Some(to) || to == Stage::Production)
}

/// Can `role` roll the die for a card in `stage`?
#[must_use]
pub fn can_roll(role: Role, stage: Stage) -> bool {
    stage.is_execution() && can_initiate_move(role, stage)
}

/// Validate a move, naming the failing rule.
///
/// Ownership failures are `PermissionDenied`; adjacency failures are
/// `InvalidTransition`.
pub fn check_move(role: Role, from: Stage, to: Stage) -> EngineResult<()> {
    if !can_initiate_move(role, from) {
        return Err(EngineError::PermissionDenied { role, stage: from });
    }
    if !can_move_to(role, from, to) {
        return Err(EngineError::InvalidTransition { from, to });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ownership_is_a_bijection() {
        for role in Role::ALL {
            assert_eq!(Role::owner_of(role.owned_stage()), role);
        }
        for stage in Stage::ALL {
            assert_eq!(Role::owner_of(stage).owned_stage(), stage);
        }
    }

    #[test]
    fn test_only_owner_initiates() {
        for role in Role::ALL {
            for stage in Stage::ALL {
                assert_eq!(can_initiate_move(role, stage), role.owned_stage() == stage);
            }
        }
    }

    #[test]
    fn test_successor_or_production_only() {
        let role = Role::DeveloperImplementation;
        let from = Stage::Implementation;

        assert!(can_move_to(role, from, Stage::Integration));
        assert!(can_move_to(role, from, Stage::Production));
        assert!(!can_move_to(role, from, Stage::Testing));
        assert!(!can_move_to(role, from, Stage::SprintBacklog));
        assert!(!can_move_to(role, from, Stage::Implementation));
    }

    #[test]
    fn test_customer_cannot_move_production_to_itself() {
        assert!(!can_move_to(Role::Customer, Stage::Production, Stage::Production));
    }

    #[test]
    fn test_check_move_errors() {
        let err = check_move(Role::Customer, Stage::Funnel, Stage::ProductBacklog).unwrap_err();
        assert!(matches!(
            err,
            EngineError::PermissionDenied { role: Role::Customer, stage: Stage::Funnel }
        ));

        let err = check_move(Role::Stakeholder, Stage::Funnel, Stage::SprintBacklog).unwrap_err();
        assert!(matches!(
            err,
            EngineError::InvalidTransition { from: Stage::Funnel, to: Stage::SprintBacklog }
        ));

        assert!(check_move(Role::Stakeholder, Stage::Funnel, Stage::ProductBacklog).is_ok());
    }

    #[test]
    fn test_can_roll() {
        assert!(can_roll(Role::QaTester, Stage::Testing));
        assert!(!can_roll(Role::QaTester, Stage::Integration));
        assert!(!can_roll(Role::ScrumMaster, Stage::SprintBacklog));
        assert!(!can_roll(Role::Customer, Stage::Production));
    }

    #[test]
    fn test_turn_order_wraps() {
        assert_eq!(Role::Stakeholder.next(), Role::ProductOwner);
        assert_eq!(Role::Customer.next(), Role::Stakeholder);
    }
}
