use std::collections::HashMap;

use log::{debug, trace, warn};
use rand::{seq::SliceRandom, Rng};

use crate::{
    check_interval,
    env::{DiscreteAction, Environment},
    exploration::{Choice, EpsilonGreedy},
    Error, Result,
};

use super::value_table::ValueTable;

/// How the value of the next state enters the temporal-difference target
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UpdateRule {
    /// On-policy: use the value of the next action actually chosen
    #[default]
    Sarsa,
    /// Use the mean value over all actions in the next state
    ///
    /// Every action is weighted by `1 / |A|` whatever the exploration rate, which differs from
    /// textbook Expected SARSA where the weights follow the behaviour policy.
    ExpectedSarsa,
}

impl UpdateRule {
    /// Estimated value of `next_state` under this rule
    pub fn next_value<S, A>(
        &self,
        table: &ValueTable<S, A>,
        next_state: &S,
        next_action: A,
    ) -> Result<f64>
    where
        S: super::Hashable + std::fmt::Debug,
        A: DiscreteAction,
    {
        match self {
            UpdateRule::Sarsa => table.get(next_state, next_action),
            UpdateRule::ExpectedSarsa => {
                let values = table.values(next_state)?;
                Ok(values.iter().sum::<f64>() / values.len() as f64)
            }
        }
    }

    /// `reward + gamma * next_value`
    pub fn td_target<S, A>(
        &self,
        table: &ValueTable<S, A>,
        reward: f64,
        gamma: f64,
        next_state: &S,
        next_action: A,
    ) -> Result<f64>
    where
        S: super::Hashable + std::fmt::Debug,
        A: DiscreteAction,
    {
        Ok(reward + gamma * self.next_value(table, next_state, next_action)?)
    }
}

/// Configuration for the [`SarsaAgent`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SarsaAgentConfig {
    /// Learning rate, must be positive
    pub lr: f64,
    /// Exploration rate in `[0,1]`
    pub epsilon: f64,
    /// Discount factor in `[0,1]`
    pub gamma: f64,
    pub rule: UpdateRule,
}

impl Default for SarsaAgentConfig {
    fn default() -> Self {
        Self {
            lr: 0.01,
            epsilon: 0.1,
            gamma: 0.01,
            rule: UpdateRule::Sarsa,
        }
    }
}

/// How an episode ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// A terminal state was reached
    Terminated,
    /// The step limit was hit first
    Truncated,
}

/// Summary of one episode run by [`SarsaAgent::go`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpisodeSummary<S> {
    pub steps: usize,
    pub total_reward: f64,
    pub final_state: S,
    pub outcome: Outcome,
}

/// A tabular SARSA agent
///
/// ### Generics
/// - `E` - The [`Environment`] in which the agent will learn
///     - The state space must be discrete and hashable because one row of values is
///       stored per visited state
///
/// Randomness is always supplied by the caller so runs can be reproduced from a seed.
#[derive(Debug, Clone)]
pub struct SarsaAgent<E: Environment> {
    table: ValueTable<E::State, E::Action>,
    exploration: EpsilonGreedy,
    lr: f64,
    gamma: f64,
    rule: UpdateRule,
    episode: u32,
}

impl<E: Environment> SarsaAgent<E> {
    /// Initialize a new `SarsaAgent` with an empty value table
    ///
    /// **Errors** with [`InvalidConfiguration`](Error::InvalidConfiguration) if `lr` is not
    /// positive and finite, or if `epsilon` or `gamma` is not in the interval `[0,1]`
    pub fn new(config: SarsaAgentConfig) -> Result<Self> {
        let SarsaAgentConfig {
            lr,
            epsilon,
            gamma,
            rule,
        } = config;
        if !(lr > 0.0 && lr.is_finite()) {
            return Err(Error::InvalidConfiguration {
                message: format!("Invalid value for `lr`: {lr}. Must be positive and finite."),
            });
        }
        check_interval!(gamma, 0.0, 1.0);

        Ok(Self {
            table: ValueTable::new(),
            exploration: EpsilonGreedy::new(epsilon)?,
            lr,
            gamma,
            rule,
            episode: 0,
        })
    }

    pub fn value_table(&self) -> &ValueTable<E::State, E::Action> {
        &self.table
    }

    pub fn lr(&self) -> f64 {
        self.lr
    }

    pub fn epsilon(&self) -> f64 {
        self.exploration.epsilon()
    }

    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    pub fn rule(&self) -> UpdateRule {
        self.rule
    }

    /// Number of episodes completed through [`go`](SarsaAgent::go)
    pub fn episode(&self) -> u32 {
        self.episode
    }

    fn ensure(&mut self, state: E::State) {
        if self.table.ensure(state) {
            debug!("Visited {:?}, value table now has {} states", state, self.table.len());
        }
    }

    /// Choose an action based on the current state and exploration policy
    ///
    /// Unseen states are added to the value table first. When exploiting, ties between
    /// actions sharing the exact maximum value are broken uniformly at random.
    pub fn act<R: Rng + ?Sized>(
        &mut self,
        env: &E,
        state: E::State,
        rng: &mut R,
    ) -> Result<E::Action> {
        env.validate(&state)?;
        self.ensure(state);

        let action = match self.exploration.choose(rng) {
            Choice::Explore => random_action(rng),
            Choice::Exploit => {
                let row = self.table.row(&state)?;
                let max = row
                    .iter()
                    .map(|&(_, q)| q)
                    .fold(f64::NEG_INFINITY, f64::max);
                let best = row
                    .into_iter()
                    .filter(|&(_, q)| q == max)
                    .map(|(a, _)| a)
                    .collect::<Vec<_>>();
                match best.choose(rng) {
                    Some(&a) => a,
                    None => random_action(rng),
                }
            }
        };

        Ok(action)
    }

    /// Take `action` in `state`, choose the follow-up action and update the value table
    ///
    /// The next action is chosen even when the episode terminated; the caller decides
    /// whether to use it.
    ///
    /// **Returns** `(next_state, next_action, reward, terminated)`
    pub fn step<R: Rng + ?Sized>(
        &mut self,
        env: &E,
        state: E::State,
        action: E::Action,
        rng: &mut R,
    ) -> Result<(E::State, E::Action, f64, bool)> {
        let (next_state, reward, terminated) = env.transition(state, action)?;
        let next_action = self.act(env, next_state, rng)?;

        self.ensure(state);
        self.ensure(next_state);
        let diff = self.learn(state, action, reward, next_state, next_action)?;

        trace!(
            "{:?} --{:?}--> {:?} reward={} diff={}",
            state,
            action,
            next_state,
            reward,
            diff
        );

        Ok((next_state, next_action, reward, terminated))
    }

    /// Apply the temporal-difference update for one transition
    ///
    /// **Returns** the amount added to `Q(state, action)`
    fn learn(
        &mut self,
        state: E::State,
        action: E::Action,
        reward: f64,
        next_state: E::State,
        next_action: E::Action,
    ) -> Result<f64> {
        let q_value = self.table.get(&state, action)?;
        let target =
            self.rule
                .td_target(&self.table, reward, self.gamma, &next_state, next_action)?;
        let diff = self.lr * (target - q_value);
        self.table.update(&state, action, diff)?;
        Ok(diff)
    }

    /// Run one episode from `start` until a terminal state or `max_steps` steps
    pub fn go<R: Rng + ?Sized>(
        &mut self,
        env: &E,
        start: E::State,
        max_steps: usize,
        rng: &mut R,
    ) -> Result<EpisodeSummary<E::State>> {
        self.go_with(env, start, max_steps, rng, |_| {})
    }

    /// Like [`go`](SarsaAgent::go), calling `observe` with the start state and with every
    /// state reached afterwards
    pub fn go_with<R, F>(
        &mut self,
        env: &E,
        start: E::State,
        max_steps: usize,
        rng: &mut R,
        mut observe: F,
    ) -> Result<EpisodeSummary<E::State>>
    where
        R: Rng + ?Sized,
        F: FnMut(&E::State),
    {
        let mut state = start;
        let mut action = self.act(env, state, rng)?;
        let mut summary = EpisodeSummary {
            steps: 0,
            total_reward: 0.0,
            final_state: start,
            outcome: Outcome::Truncated,
        };
        observe(&state);

        while summary.steps < max_steps {
            let (next_state, next_action, reward, terminated) =
                self.step(env, state, action, rng)?;
            summary.steps += 1;
            summary.total_reward += reward;
            summary.final_state = next_state;
            observe(&next_state);

            if terminated {
                summary.outcome = Outcome::Terminated;
                break;
            }
            (state, action) = (next_state, next_action);
        }

        if summary.outcome == Outcome::Truncated {
            warn!(
                "Episode {} truncated after {} steps at {:?}",
                self.episode, summary.steps, summary.final_state
            );
        }
        debug!(
            "Episode {} finished: steps={} reward={}",
            self.episode, summary.steps, summary.total_reward
        );
        self.episode += 1;

        Ok(summary)
    }

    /// Best known action in `state`, taking the first in action order on ties
    ///
    /// **Returns** `None` if the state has never been visited
    pub fn greedy_action(&self, state: &E::State) -> Option<E::Action> {
        let values = self.table.values(state).ok()?;
        let (ix, _) = values
            .iter()
            .enumerate()
            .fold(None, |best: Option<(usize, f64)>, (i, &q)| match best {
                Some((_, b)) if b >= q => best,
                _ => Some((i, q)),
            })?;
        E::Action::all().get(ix).copied()
    }

    /// Greedy action for every visited state
    pub fn policy(&self) -> HashMap<E::State, E::Action> {
        self.table
            .iter()
            .filter_map(|(s, _)| Some((*s, self.greedy_action(s)?)))
            .collect()
    }
}

fn random_action<A: DiscreteAction, R: Rng + ?Sized>(rng: &mut R) -> A {
    *A::all()
        .choose(rng)
        .expect("There is always at least one action available")
}
