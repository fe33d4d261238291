pub mod available_preference_rule;
pub mod desired_preference_rule;
pub mod forbidden_preference_rule;
pub mod hospital_cap_rule;
pub mod night_balance_rule;
pub mod night_gap_rule;
pub mod night_remote_same_day_rule;
pub mod night_spread_rule;
pub mod no_double_booking_rule;
pub mod no_remote_after_night_rule;
pub mod one_worker_per_slot_rule;
pub mod rest_after_night_rule;
pub mod specialist_holiday_night_rule;
pub mod weekday_balance_rule;

use shared::{EngineError, EngineResult};
use std::collections::BTreeSet;

use crate::domain::calendar::MonthCalendar;
use crate::domain::entities::{CapTable, Hospital, PreferenceSet, Worker};
use crate::domain::services::model::RosterModel;
use crate::domain::services::variable_builder::VariableUniverse;
use crate::infrastructure::config::RosterSettings;

pub use available_preference_rule::AvailablePreferenceRule;
pub use desired_preference_rule::DesiredPreferenceRule;
pub use forbidden_preference_rule::ForbiddenPreferenceRule;
pub use hospital_cap_rule::HospitalCapRule;
pub use night_balance_rule::NightBalanceRule;
pub use night_gap_rule::NightGapRule;
pub use night_remote_same_day_rule::NightRemoteSameDayRule;
pub use night_spread_rule::NightSpreadRule;
pub use no_double_booking_rule::NoDoubleBookingRule;
pub use no_remote_after_night_rule::NoRemoteAfterNightRule;
pub use one_worker_per_slot_rule::OneWorkerPerSlotRule;
pub use rest_after_night_rule::RestAfterNightRule;
pub use specialist_holiday_night_rule::SpecialistHolidayNightRule;
pub use weekday_balance_rule::WeekdayBalanceRule;

/// Context fields a rule may depend on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextKey {
    RequiredCoverage,
    Preferences,
    Caps,
}

impl ContextKey {
    pub fn as_str(self) -> &'static str {
        match self {
            ContextKey::RequiredCoverage => "required_coverage",
            ContextKey::Preferences => "preferences",
            ContextKey::Caps => "caps",
        }
    }
}

/// Everything a rule may read while contributing to the model. The
/// optional fields mirror optional collaborator inputs; whether a rule's
/// requirements are met is checked once, before any rule runs.
pub struct RuleContext<'a> {
    pub calendar: &'a MonthCalendar,
    pub hospitals: &'a [Hospital],
    pub workers: &'a [Worker],
    pub universe: &'a VariableUniverse,
    pub preferences: Option<&'a PreferenceSet>,
    pub caps: Option<&'a CapTable>,
    pub settings: &'a RosterSettings,
}

impl<'a> RuleContext<'a> {
    pub fn has(&self, key: ContextKey) -> bool {
        match key {
            ContextKey::RequiredCoverage => true,
            ContextKey::Preferences => self.preferences.is_some(),
            ContextKey::Caps => self.caps.is_some(),
        }
    }

    pub fn preferences(&self) -> EngineResult<&'a PreferenceSet> {
        self.preferences.ok_or_else(|| {
            EngineError::Config("Rule context is missing preferences".to_string())
        })
    }

    pub fn caps(&self) -> EngineResult<&'a CapTable> {
        self.caps
            .ok_or_else(|| EngineError::Config("Rule context is missing caps".to_string()))
    }

    pub fn hospital(&self, name: &str) -> Option<&'a Hospital> {
        self.hospitals.iter().find(|h| h.name == name)
    }

    pub fn worker(&self, name: &str) -> Option<&'a Worker> {
        self.workers.iter().find(|w| w.name == name)
    }

    pub fn is_remote_hospital(&self, name: &str) -> bool {
        self.hospital(name).is_some_and(|h| h.is_remote)
    }
}

/// A scheduling rule. Hard rules contribute linear constraints only; soft
/// rules contribute slack variables and weighted penalty ledger entries.
/// `apply` is pure with respect to the model it receives; rules never
/// retry.
pub trait ConstraintRule: Send + Sync {
    fn name(&self) -> &'static str;

    /// Short human description used in penalty reports.
    fn summary(&self) -> &'static str;

    fn required_context(&self) -> &'static [ContextKey] {
        &[]
    }

    fn apply(&self, model: &mut RosterModel, ctx: &RuleContext<'_>) -> EngineResult<()>;
}

impl std::fmt::Debug for dyn ConstraintRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConstraintRule")
            .field("name", &self.name())
            .finish()
    }
}

/// The full rule set in its canonical order: hard rules first, then soft.
/// The order is irrelevant for correctness but fixed for reproducible
/// constraint and slack naming.
pub fn build_registry(settings: &RosterSettings) -> EngineResult<Vec<Box<dyn ConstraintRule>>> {
    let weights = &settings.weights;
    let mut registry: Vec<Box<dyn ConstraintRule>> = vec![
        Box::new(OneWorkerPerSlotRule::new()),
        Box::new(NoDoubleBookingRule::new()),
        Box::new(ForbiddenPreferenceRule::new()),
        Box::new(HospitalCapRule::new()),
        Box::new(NightGapRule::new(settings.min_night_gap)),
        Box::new(NoRemoteAfterNightRule::new()),
        Box::new(SpecialistHolidayNightRule::new()),
        Box::new(NightSpreadRule::new(
            settings.soft_night_window,
            weights.night_spread,
        )),
        Box::new(NightRemoteSameDayRule::new(weights.night_remote_same_day)),
        Box::new(NightBalanceRule::new(weights.night_balance)),
        Box::new(WeekdayBalanceRule::new(weights.weekday_balance)),
        Box::new(RestAfterNightRule::new(weights.rest_after_night)),
        Box::new(DesiredPreferenceRule::new(weights.desired_preference)),
        Box::new(AvailablePreferenceRule::new(weights.available_preference)),
    ];

    if let Some(enabled) = &settings.enabled_rules {
        let known: BTreeSet<&str> = registry.iter().map(|r| r.name()).collect();
        for name in enabled {
            if !known.contains(name.as_str()) {
                return Err(EngineError::Config(format!(
                    "Unknown rule enabled in configuration: {}",
                    name
                )));
            }
        }
        registry.retain(|rule| enabled.contains(rule.name()));
    }

    Ok(registry)
}

/// Fail before any rule runs if a rule's declared context is missing.
pub fn validate_context(
    registry: &[Box<dyn ConstraintRule>],
    ctx: &RuleContext<'_>,
) -> EngineResult<()> {
    for rule in registry {
        for key in rule.required_context() {
            if !ctx.has(*key) {
                return Err(EngineError::Config(format!(
                    "Rule {} requires context field {} which was not provided",
                    rule.name(),
                    key.as_str()
                )));
            }
        }
    }
    Ok(())
}

/// Fatal on a weight the objective cannot carry.
pub(crate) fn check_weight(rule: &str, weight: f64) -> EngineResult<()> {
    if !weight.is_finite() || weight < 0.0 {
        return Err(EngineError::Config(format!(
            "Rule {} has invalid weight {}",
            rule, weight
        )));
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod harness {
    use super::*;
    use crate::domain::entities::RosterInput;
    use crate::domain::services::variable_builder::VariableBuilder;

    /// Owns everything a `RuleContext` borrows, so rule tests can build a
    /// context from a plain `RosterInput`.
    pub(crate) struct RuleHarness {
        pub calendar: MonthCalendar,
        pub hospitals: Vec<Hospital>,
        pub workers: Vec<Worker>,
        pub universe: VariableUniverse,
        pub preferences: Option<PreferenceSet>,
        pub caps: Option<CapTable>,
        pub settings: RosterSettings,
    }

    impl RuleHarness {
        pub fn new(input: RosterInput) -> Self {
            let calendar =
                MonthCalendar::build(input.year, input.month, &input.holidays).unwrap();
            let universe = VariableBuilder::new(
                &calendar,
                &input.hospitals,
                &input.workers,
                &input.specified_days,
            )
            .build();
            Self {
                calendar,
                hospitals: input.hospitals,
                workers: input.workers,
                universe,
                preferences: input.preferences,
                caps: input.caps,
                settings: RosterSettings::default(),
            }
        }

        pub fn ctx(&self) -> RuleContext<'_> {
            RuleContext {
                calendar: &self.calendar,
                hospitals: &self.hospitals,
                workers: &self.workers,
                universe: &self.universe,
                preferences: self.preferences.as_ref(),
                caps: self.caps.as_ref(),
                settings: &self.settings,
            }
        }

        pub fn model(&self) -> RosterModel {
            let mut model = RosterModel::new();
            model.materialize(self.universe.keys().cloned());
            model
        }
    }
}
