use crate::metrics::MetricsSink;
use crate::model::{HealthState, Population};
use crate::scenario::Scenario;
use anyhow::{Context, Result};
use rand::prelude::*;
use rand_chacha::ChaCha12Rng;
use rand_distr::Uniform;

/// Parameters of a single run. Immutable once the run starts.
#[derive(Debug, PartialEq, Clone)]
pub struct SimParams {
    /// Number of agents.
    pub population_size: usize,
    /// Number of agents infected before the first step.
    pub initial_infected: usize,
    /// Infection probability per contact with a susceptible.
    pub beta: f64,
    /// Recovery probability per step.
    pub gamma: f64,
    /// Contacts made by each infected agent per step, before interventions.
    pub contacts_per_step: usize,
    /// Maximum number of steps.
    pub max_steps: usize,
    pub seed: u64,
    pub scenario: Scenario,
}

/// Simulation engine.
///
/// Holds the parameters, the population and the random number generator of a
/// single run. All randomness of the run is drawn from `rng` in a fixed order:
/// initial infections, then the scenario's init effect, then for every step
/// the contact and acceptance draws of each infected agent followed by one
/// recovery draw per infected agent.
pub struct Engine {
    params: SimParams,
    pop: Population,
    rng: ChaCha12Rng,
    step: usize,
}

impl Engine {
    /// Create the population, seed infections and apply the scenario's init effect.
    pub fn new(params: SimParams) -> Self {
        let mut rng = ChaCha12Rng::seed_from_u64(params.seed);

        let mut pop = Population::new(params.population_size, HealthState::S);
        pop.seed_infections(params.initial_infected, &mut rng);
        params.scenario.apply_at_init(&mut pop, &mut rng);

        log::info!(
            "initialized {}: N={}, I0={}, beta={:.3}, gamma={:.3}, k={}, max_steps={}, seed={}",
            params.scenario,
            params.population_size,
            params.initial_infected,
            params.beta,
            params.gamma,
            params.contacts_per_step,
            params.max_steps,
            params.seed
        );

        Self {
            params,
            pop,
            rng,
            step: 0,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.step >= self.params.max_steps || self.pop.count(HealthState::I) == 0
    }

    /// Record the initial counts, then step until `max_steps` is reached or
    /// no infected agents remain, recording the counts after every step.
    pub fn run_simulation(&mut self, sink: &mut MetricsSink) -> Result<()> {
        self.record(sink);

        while !self.is_finished() {
            self.perform_step()
                .with_context(|| format!("failed to perform step {}", self.step + 1))?;
            self.record(sink);
        }

        let counts = self.pop.counts();
        log::info!(
            "finished {} after {} steps: S={} I={} R={}",
            self.params.scenario,
            self.step,
            counts.s,
            counts.i,
            counts.r
        );

        Ok(())
    }

    /// Advance the population by one step.
    pub fn perform_step(&mut self) -> Result<()> {
        // Snapshot the infected agents; every draw below reads start-of-step states.
        let i_agt_inf = self.pop.select(HealthState::I);
        let counts = self.pop.counts();
        let n_agt = self.pop.len();

        let k_eff =
            self.params
                .scenario
                .effective_contacts(self.params.contacts_per_step, &counts, n_agt);

        let mut i_agt_new_inf = Vec::new();
        if !i_agt_inf.is_empty() {
            let target_dist = Uniform::new(0, n_agt)?;
            for &i_src in &i_agt_inf {
                for _ in 0..k_eff {
                    let i_tgt = loop {
                        let i_tgt = target_dist.sample(&mut self.rng);
                        if i_tgt != i_src || n_agt == 1 {
                            break i_tgt;
                        }
                    };
                    // Nothing is applied before the end of the step, so the
                    // current state is the start-of-step state.
                    if self.pop.state(i_tgt) == HealthState::S
                        && self.rng.random::<f64>() < self.params.beta
                    {
                        i_agt_new_inf.push(i_tgt);
                    }
                }
            }
        }

        let mut i_agt_rec = Vec::with_capacity(i_agt_inf.len());
        for &i_agt in &i_agt_inf {
            if self.rng.random::<f64>() < self.params.gamma {
                i_agt_rec.push(i_agt);
            }
        }

        // Targets marked more than once are infected once.
        i_agt_new_inf.sort_unstable();
        i_agt_new_inf.dedup();

        for &i_agt in &i_agt_new_inf {
            self.pop.set_state(i_agt, HealthState::I);
        }
        for &i_agt in &i_agt_rec {
            let agt = &self.pop.agents()[i_agt];
            log::trace!(
                "agent {} recovered after {} steps infected",
                agt.id(),
                agt.time_in_state()
            );
            self.pop.set_state(i_agt, HealthState::R);
        }

        self.pop.tick_all();
        self.step += 1;

        Ok(())
    }

    fn record(&self, sink: &mut MetricsSink) {
        let counts = self.pop.counts();
        log::debug!(
            "Step {}: S={} I={} R={}",
            self.step,
            counts.s,
            counts.i,
            counts.r
        );
        sink.record(self.step, counts.s, counts.i, counts.r);
    }
}
