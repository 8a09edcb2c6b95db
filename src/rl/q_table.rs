//! Sparse Q-table keyed by encoded state

use std::collections::HashMap;

use super::encoder::EncodedState;

/// Number of actions the agent chooses between
pub const N_ACTIONS: usize = 3;

/// Action values of one state, indexed like [`super::agent::ACTIONS`]
pub type ActionValues = [f64; N_ACTIONS];

/// The action-value vector of a state that has never been updated
pub const fn zero_values() -> ActionValues {
    [0.0; N_ACTIONS]
}

/// Mapping from encoded state to action values
///
/// States are added the first time they are looked up mutably and are never
/// evicted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QTable {
    values: HashMap<EncodedState, ActionValues>,
}

impl QTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Values for `state`, inserting the zero vector for a new state
    pub fn values_mut(&mut self, state: EncodedState) -> &mut ActionValues {
        self.values.entry(state).or_insert_with(zero_values)
    }

    /// Values for `state` without inserting; unseen states read as zeros
    pub fn values(&self, state: &EncodedState) -> ActionValues {
        self.values.get(state).copied().unwrap_or_else(zero_values)
    }

    /// Highest action value of `state`
    pub fn max_value(&self, state: &EncodedState) -> f64 {
        max_value(&self.values(state))
    }

    /// Number of states stored
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn contains(&self, state: &EncodedState) -> bool {
        self.values.contains_key(state)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&EncodedState, &ActionValues)> {
        self.values.iter()
    }

    /// Entries sorted by state, for deterministic output
    pub fn sorted_entries(&self) -> Vec<(EncodedState, ActionValues)> {
        let mut entries: Vec<_> = self.values.iter().map(|(k, v)| (*k, *v)).collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }
}

impl FromIterator<(EncodedState, ActionValues)> for QTable {
    fn from_iter<I: IntoIterator<Item = (EncodedState, ActionValues)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// Index of the largest value; ties resolve to the lowest index
pub fn argmax(values: &ActionValues) -> usize {
    let mut best = 0;
    for (i, &value) in values.iter().enumerate().skip(1) {
        if value > values[best] {
            best = i;
        }
    }
    best
}

/// Largest value of an action-value vector
pub fn max_value(values: &ActionValues) -> f64 {
    values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(level: u8) -> EncodedState {
        EncodedState {
            food_ahead: true,
            food_left: false,
            food_right: false,
            distance_level: level,
        }
    }

    #[test]
    fn test_unseen_state_reads_zero() {
        let table = QTable::new();
        assert_eq!(table.values(&state(0)), [0.0; 3]);
        assert_eq!(table.max_value(&state(0)), 0.0);
        assert!(table.is_empty());
    }

    #[test]
    fn test_values_mut_inserts_zero_vector() {
        let mut table = QTable::new();
        assert_eq!(*table.values_mut(state(1)), zero_values());
        assert_eq!(table.len(), 1);
        assert!(table.contains(&state(1)));

        table.values_mut(state(1))[2] = 1.5;
        assert_eq!(table.values(&state(1)), [0.0, 0.0, 1.5]);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_argmax_prefers_lowest_index_on_ties() {
        assert_eq!(argmax(&[0.0, 0.0, 0.0]), 0);
        assert_eq!(argmax(&[1.0, 2.0, 2.0]), 1);
        assert_eq!(argmax(&[-1.0, -3.0, -0.5]), 2);
    }

    #[test]
    fn test_max_value() {
        assert_eq!(max_value(&[0.5, 1.5, 0.8]), 1.5);
        assert_eq!(max_value(&[-2.0, -1.0, -3.0]), -1.0);
    }

    #[test]
    fn test_sorted_entries() {
        let table: QTable = [(state(3), [1.0, 0.0, 0.0]), (state(0), [0.0, 2.0, 0.0])]
            .into_iter()
            .collect();
        let entries = table.sorted_entries();
        assert_eq!(entries[0].0, state(0));
        assert_eq!(entries[1].0, state(3));
    }
}
