use crate::engine::SimParams;
use crate::scenario::Scenario;
use crate::utils::{check_list, check_num};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

/// Transmission model parameters.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelConfig {
    /// Infection probability per contact with a susceptible.
    pub beta: f64,
    /// Recovery probability per step.
    pub gamma: f64,
    /// Contacts made by each infected agent per step.
    pub contacts_per_step: usize,
}

/// Initial condition parameters.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InitConfig {
    /// Number of agents.
    pub population_size: usize,
    /// Number of agents infected at step 0.
    pub initial_infected: usize,
}

/// Replication parameters.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    /// Maximum number of steps per run.
    pub max_steps: usize,
    /// Seeds of the replicated runs, one run per seed and scenario.
    pub seeds: Vec<u64>,
    /// Scenarios to simulate and analyze.
    #[serde(default = "default_scenarios")]
    pub scenarios: Vec<Scenario>,
}

fn default_scenarios() -> Vec<Scenario> {
    Scenario::ALL.to_vec()
}

/// Simulation configuration.
///
/// Loaded from a TOML file and validated before use.
/// See [`Config::from_file`] for loading.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub model: ModelConfig,
    pub init: InitConfig,
    pub run: RunConfig,
}

impl Config {
    /// Load a [`Config`] from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, deserialized,
    /// or if the configuration values are invalid.
    pub fn from_file<P: AsRef<Path>>(file: P) -> Result<Self> {
        let file = file.as_ref();
        let contents =
            fs::read_to_string(file).with_context(|| format!("failed to read {file:?}"))?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents).context("failed to deserialize config")?;

        config.validate().context("failed to validate config")?;

        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        check_num(self.model.beta, 0.0..=1.0).context("invalid infection probability")?;
        check_num(self.model.gamma, 0.0..=1.0).context("invalid recovery probability")?;
        check_num(self.model.contacts_per_step, 1..=10_000)
            .context("invalid number of contacts per step")?;

        check_num(self.init.population_size, 0..=100_000).context("invalid population size")?;
        check_num(self.init.initial_infected, 0..=self.init.population_size)
            .context("invalid initial number of infected")?;

        check_num(self.run.max_steps, 0..=1_000_000).context("invalid maximum number of steps")?;
        check_list(&self.run.seeds).context("invalid seeds")?;
        check_list(&self.run.scenarios).context("invalid scenarios")?;

        Ok(())
    }

    /// Parameters of the run of `scenario` with `seed`.
    pub fn sim_params(&self, scenario: Scenario, seed: u64) -> SimParams {
        SimParams {
            population_size: self.init.population_size,
            initial_infected: self.init.initial_infected,
            beta: self.model.beta,
            gamma: self.model.gamma,
            contacts_per_step: self.model.contacts_per_step,
            max_steps: self.run.max_steps,
            seed,
            scenario,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: &str = r#"
[model]
beta = 0.1
gamma = 0.05
contacts_per_step = 5

[init]
population_size = 50
initial_infected = 2

[run]
max_steps = 200
seeds = [42, 43, 44]
"#;

    #[test]
    fn parse_with_default_scenarios() {
        let cfg = Config::from_toml(CONFIG).unwrap();
        assert_eq!(cfg.init.population_size, 50);
        assert_eq!(cfg.run.seeds, vec![42, 43, 44]);
        assert_eq!(cfg.run.scenarios, Scenario::ALL.to_vec());

        let params = cfg.sim_params(Scenario::Combo, 43);
        assert_eq!(params.seed, 43);
        assert_eq!(params.scenario, Scenario::Combo);
        assert_eq!(params.contacts_per_step, 5);
        assert_eq!(params.max_steps, 200);
    }

    #[test]
    fn parse_explicit_scenarios() {
        let contents = format!("{CONFIG}scenarios = [\"quarantine50\", \"baseline\"]\n");
        let cfg = Config::from_toml(&contents).unwrap();
        assert_eq!(
            cfg.run.scenarios,
            vec![Scenario::Quarantine50, Scenario::Baseline]
        );
    }

    #[test]
    fn reject_invalid_values() {
        let cases = [
            CONFIG.replace("beta = 0.1", "beta = 1.5"),
            CONFIG.replace("gamma = 0.05", "gamma = -0.1"),
            CONFIG.replace("contacts_per_step = 5", "contacts_per_step = 0"),
            CONFIG.replace("initial_infected = 2", "initial_infected = 51"),
            CONFIG.replace("seeds = [42, 43, 44]", "seeds = []"),
            CONFIG.replace("seeds = [42, 43, 44]", "seeds = [42, 42]"),
            format!("{CONFIG}scenarios = [\"lockdown\"]\n"),
        ];
        for contents in cases {
            assert!(Config::from_toml(&contents).is_err(), "{contents}");
        }
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::from_file(dir.path().join("config.toml")).is_err());
    }
}
