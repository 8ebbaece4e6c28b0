//! Intervention policies.

use crate::model::{Counts, HealthState, Population};
use clap::ValueEnum;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fraction of the susceptibles vaccinated before the first step.
const VACCINE_COVERAGE: f64 = 0.30;
/// Prevalence above which contacts are reduced.
const QUARANTINE_THRESHOLD: f64 = 0.05;
/// Factor applied to the contact count while quarantine is active.
const QUARANTINE_FACTOR: f64 = 0.5;

/// Scenario policy controlling initialization-time and per-step effects.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Scenario {
    #[value(name = "baseline")]
    Baseline,
    #[value(name = "vaccine30")]
    Vaccine30,
    #[value(name = "quarantine50")]
    Quarantine50,
    #[value(name = "combo")]
    Combo,
}

impl Scenario {
    pub const ALL: [Scenario; 4] = [
        Scenario::Baseline,
        Scenario::Vaccine30,
        Scenario::Quarantine50,
        Scenario::Combo,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Scenario::Baseline => "baseline",
            Scenario::Vaccine30 => "vaccine30",
            Scenario::Quarantine50 => "quarantine50",
            Scenario::Combo => "combo",
        }
    }

    fn vaccinates(&self) -> bool {
        matches!(self, Scenario::Vaccine30 | Scenario::Combo)
    }

    fn quarantines(&self) -> bool {
        matches!(self, Scenario::Quarantine50 | Scenario::Combo)
    }

    /// One-time effect, applied before the step-0 counts are recorded.
    ///
    /// Vaccinating scenarios move a rounded 30% of the current susceptibles
    /// straight to `R`. Returns the number of agents affected.
    pub fn apply_at_init<R: Rng + ?Sized>(&self, pop: &mut Population, rng: &mut R) -> usize {
        if !self.vaccinates() {
            return 0;
        }
        let n_sus = pop.count(HealthState::S);
        let n_vac = ((VACCINE_COVERAGE * n_sus as f64).round() as usize).min(n_sus);
        pop.transition_random(HealthState::S, HealthState::R, n_vac, rng)
    }

    /// Contacts each infected agent makes this step, given the start-of-step counts.
    pub fn effective_contacts(&self, k_base: usize, counts: &Counts, n_agt: usize) -> usize {
        if !self.quarantines() || n_agt == 0 {
            return k_base;
        }
        let prevalence = counts.i as f64 / n_agt as f64;
        if prevalence > QUARANTINE_THRESHOLD {
            ((QUARANTINE_FACTOR * k_base as f64).round() as usize).max(1)
        } else {
            k_base
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
