//! Agents and the population they live in.

use rand::prelude::*;

/// Health state of an agent. `R` is absorbing.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum HealthState {
    S,
    I,
    R,
}

/// One simulated individual.
#[derive(Debug, Clone)]
pub struct Agent {
    id: usize,
    state: HealthState,
    time_in_state: usize,
}

impl Agent {
    pub fn new(id: usize, state: HealthState) -> Self {
        Self {
            id,
            state,
            time_in_state: 0,
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn state(&self) -> HealthState {
        self.state
    }

    /// Number of steps spent in the current state.
    pub fn time_in_state(&self) -> usize {
        self.time_in_state
    }

    /// Set the state, resetting the time-in-state counter on change.
    pub fn set_state(&mut self, state: HealthState) {
        if self.state != state {
            self.state = state;
            self.time_in_state = 0;
        }
    }

    pub fn tick(&mut self) {
        self.time_in_state += 1;
    }
}

/// Number of agents in each health state.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub struct Counts {
    pub s: usize,
    pub i: usize,
    pub r: usize,
}

/// Fixed-size, index-addressed collection of agents.
///
/// Agent ids equal their index, so "another agent" is index inequality.
#[derive(Debug, Clone)]
pub struct Population {
    agt_vec: Vec<Agent>,
}

impl Population {
    /// Create `n_agt` agents, all starting in `state`.
    pub fn new(n_agt: usize, state: HealthState) -> Self {
        let agt_vec = (0..n_agt).map(|id| Agent::new(id, state)).collect();
        Self { agt_vec }
    }

    pub fn len(&self) -> usize {
        self.agt_vec.len()
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agt_vec
    }

    pub fn state(&self, i_agt: usize) -> HealthState {
        self.agt_vec[i_agt].state()
    }

    pub fn set_state(&mut self, i_agt: usize, state: HealthState) {
        self.agt_vec[i_agt].set_state(state);
    }

    pub fn count(&self, state: HealthState) -> usize {
        self.agt_vec.iter().filter(|agt| agt.state() == state).count()
    }

    pub fn counts(&self) -> Counts {
        let mut counts = Counts::default();
        for agt in &self.agt_vec {
            match agt.state() {
                HealthState::S => counts.s += 1,
                HealthState::I => counts.i += 1,
                HealthState::R => counts.r += 1,
            }
        }
        counts
    }

    /// Indices of the agents currently in `state`, in population order.
    pub fn select(&self, state: HealthState) -> Vec<usize> {
        self.agt_vec
            .iter()
            .filter(|agt| agt.state() == state)
            .map(Agent::id)
            .collect()
    }

    /// Move `min(amount, |from|)` distinct agents, drawn uniformly without
    /// replacement from those in `from`, into `to`. Returns how many moved.
    pub fn transition_random<R: Rng + ?Sized>(
        &mut self,
        from: HealthState,
        to: HealthState,
        amount: usize,
        rng: &mut R,
    ) -> usize {
        let i_agt_from = self.select(from);
        let i_agt_sel: Vec<usize> = i_agt_from.choose_multiple(rng, amount).copied().collect();
        for &i_agt in &i_agt_sel {
            self.agt_vec[i_agt].set_state(to);
        }
        i_agt_sel.len()
    }

    /// Infect `min(amount, |S|)` distinct susceptible agents.
    pub fn seed_infections<R: Rng + ?Sized>(&mut self, amount: usize, rng: &mut R) -> usize {
        self.transition_random(HealthState::S, HealthState::I, amount, rng)
    }

    pub fn tick_all(&mut self) {
        self.agt_vec.iter_mut().for_each(Agent::tick);
    }
}
