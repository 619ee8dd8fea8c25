use std::{collections::HashMap, fmt::Debug, marker::PhantomData};

use crate::{env::DiscreteAction, Error, Result};

use super::Hashable;

/// A sparse table of action values
///
/// Each visited state owns one row holding a value for every action in `A::all()`. Rows are
/// created full of zeros the first time a state is [ensured](ValueTable::ensure) and are
/// never removed. Reading a state that was never ensured is an error.
#[derive(Debug, Clone)]
pub struct ValueTable<S, A> {
    rows: HashMap<S, Vec<f64>>,
    _actions: PhantomData<A>,
}

impl<S, A> Default for ValueTable<S, A> {
    fn default() -> Self {
        Self {
            rows: HashMap::new(),
            _actions: PhantomData,
        }
    }
}

impl<S, A> ValueTable<S, A>
where
    S: Hashable + Debug,
    A: DiscreteAction,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a row of zeros for `state` if it is not already present
    ///
    /// **Returns** `true` if a row was inserted
    pub fn ensure(&mut self, state: S) -> bool {
        if self.rows.contains_key(&state) {
            return false;
        }
        self.rows.insert(state, vec![0.0; A::count()]);
        true
    }

    pub fn contains(&self, state: &S) -> bool {
        self.rows.contains_key(state)
    }

    /// Number of states in the table
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Value of taking `action` in `state`
    pub fn get(&self, state: &S, action: A) -> Result<f64> {
        Ok(self.values(state)?[action.index()])
    }

    /// Add `delta` to the value of taking `action` in `state`
    pub fn update(&mut self, state: &S, action: A, delta: f64) -> Result<()> {
        let row = self
            .rows
            .get_mut(state)
            .ok_or_else(|| unknown_state(state))?;
        row[action.index()] += delta;
        Ok(())
    }

    /// Raw action values of `state`, ordered like `A::all()`
    pub fn values(&self, state: &S) -> Result<&[f64]> {
        self.rows
            .get(state)
            .map(Vec::as_slice)
            .ok_or_else(|| unknown_state(state))
    }

    /// Action values of `state` paired with their actions
    pub fn row(&self, state: &S) -> Result<Vec<(A, f64)>> {
        let values = self.values(state)?;
        Ok(A::all().iter().copied().zip(values.iter().copied()).collect())
    }

    /// Iterate over every state and its raw action values, in arbitrary order
    pub fn iter(&self) -> impl Iterator<Item = (&S, &[f64])> {
        self.rows.iter().map(|(s, v)| (s, v.as_slice()))
    }
}

fn unknown_state<S: Debug>(state: &S) -> Error {
    Error::UnknownState {
        state: format!("{state:?}"),
    }
}
