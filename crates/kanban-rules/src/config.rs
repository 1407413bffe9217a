//! Tunable parameters for the rule layer.
//!
//! These mirror the `lifecycle`, `labor` and `decomposition` sections of
//! `kanban-config.yaml`. The session constructs a [`RulesConfig`] from the
//! loaded configuration and passes it into every rule function that needs a
//! threshold, so tests can override any default.

use kanban_types::Seniority;
use rust_decimal::Decimal;

/// Every rule-layer tunable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RulesConfig {
    /// Worker lifecycle thresholds.
    pub lifecycle: LifecycleConfig,
    /// Labor produced per worker per day, by seniority.
    pub efficiency: EfficiencyTable,
    /// Feature-to-task decomposition bounds.
    pub decomposition: DecompositionConfig,
}

/// Day counts that drive worker state transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LifecycleConfig {
    /// Days a new hire spends onboarding (default: 3). Zero hires as Active.
    pub onboarding_days: u32,
    /// Days of learning before a role is acquired (default: 8).
    pub days_to_learn_role: u32,
    /// Days a worker spends changing teams (default: 3).
    pub days_to_change_teams: u32,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            onboarding_days: 3,
            days_to_learn_role: 8,
            days_to_change_teams: 3,
        }
    }
}

/// Labor units a worker removes per day.
///
/// The shipped table gives every tier the same efficiency of 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EfficiencyTable {
    /// Junior efficiency.
    pub junior: Decimal,
    /// Mid-level efficiency.
    pub mid: Decimal,
    /// Senior efficiency.
    pub senior: Decimal,
}

impl Default for EfficiencyTable {
    fn default() -> Self {
        Self {
            junior: Decimal::ONE,
            mid: Decimal::ONE,
            senior: Decimal::ONE,
        }
    }
}

impl EfficiencyTable {
    /// Efficiency for a seniority tier.
    pub const fn for_seniority(&self, seniority: Seniority) -> Decimal {
        match seniority {
            Seniority::Junior => self.junior,
            Seniority::Mid => self.mid,
            Seniority::Senior => self.senior,
        }
    }
}

/// Inclusive bounds on the number of tasks generated for one sub-board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskBounds {
    /// Fewest tasks generated.
    pub min: u32,
    /// Most tasks generated.
    pub max: u32,
}

/// How story points translate into generated tasks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecompositionConfig {
    /// Story points covered by one generated task (default: 5).
    pub points_per_task: u32,
    /// Backend task bounds (default: 2..=6).
    pub backend: TaskBounds,
    /// Frontend task bounds (default: 1..=4).
    pub frontend: TaskBounds,
}

impl Default for DecompositionConfig {
    fn default() -> Self {
        Self {
            points_per_task: 5,
            backend: TaskBounds { min: 2, max: 6 },
            frontend: TaskBounds { min: 1, max: 4 },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_game_constants() {
        let config = RulesConfig::default();
        assert_eq!(config.lifecycle.days_to_learn_role, 8);
        assert_eq!(config.lifecycle.days_to_change_teams, 3);
        assert_eq!(config.lifecycle.onboarding_days, 3);
        assert_eq!(config.decomposition.points_per_task, 5);
    }

    #[test]
    fn default_efficiency_is_flat() {
        let table = EfficiencyTable::default();
        assert_eq!(table.for_seniority(Seniority::Junior), Decimal::ONE);
        assert_eq!(table.for_seniority(Seniority::Mid), Decimal::ONE);
        assert_eq!(table.for_seniority(Seniority::Senior), Decimal::ONE);
    }
}
