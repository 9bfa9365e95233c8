use thiserror::Error;
use tracing::{debug, trace, warn};

use crate::{
    alphabet::{AlphabetIndex, Group},
    math::{IndexedMap, IndexedSet, Map, Set},
};

use super::{Automaton, State};

/// Raw transition table as it appears in a definition record: origin state to group label to
/// target state. Rows and cells keep their declaration order.
pub type TransitionTable = IndexedMap<State, IndexedMap<Group, State>>;

/// Errors that can occur when validating the components of an automaton.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    /// No states were declared.
    #[error("the set of states must not be empty")]
    EmptyStateSet,
    /// No initial state was given to the builder.
    #[error("no initial state was given")]
    MissingInitial,
    /// A state is referenced but was never declared.
    #[error("state \"{0}\" is not declared")]
    UnknownState(State),
    /// A transition uses a group that is not part of the alphabet.
    #[error("group \"{0}\" is not part of the alphabet")]
    UnknownGroup(Group),
}

/// Helper struct for the construction of an [`Automaton`]. It collects states, transitions,
/// the initial and the accepting states and validates all of them in [`AutomatonBuilder::build`].
///
/// # Example
///
/// We want to create a DFA with two states `q0` and `q1` over the alphabet `{0, 1}` that accepts
/// precisely the words ending in `0`. This can be done as follows
/// ```
/// use dfa_sim::prelude::*;
///
/// let dfa = AutomatonBuilder::new(AlphabetIndex::plain(['0', '1']))
///     .with_states(["q0", "q1"])
///     .with_transitions([
///         ("q0", "0", "q1"),
///         ("q0", "1", "q0"),
///         ("q1", "0", "q1"),
///         ("q1", "1", "q0"),
///     ])
///     .with_initial("q0")
///     .with_accepting(["q1"])
///     .build()
///     .unwrap();
/// assert!(dfa.accepts("110").unwrap());
/// ```
#[derive(Clone, Debug)]
pub struct AutomatonBuilder {
    alphabet: AlphabetIndex,
    description: Option<String>,
    states: Vec<State>,
    /// Rows of `(group, target)` cells per origin, in the order they were added. A row may be
    /// empty, its origin is validated all the same.
    transitions: Vec<(State, Vec<(Group, State)>)>,
    initial: Option<State>,
    accepting: Vec<State>,
}

impl AutomatonBuilder {
    /// Creates an empty builder for automata over the given alphabet.
    pub fn new(alphabet: AlphabetIndex) -> Self {
        Self {
            alphabet,
            description: None,
            states: vec![],
            transitions: vec![],
            initial: None,
            accepting: vec![],
        }
    }

    /// Attaches a free form description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Declares states, in order. Declaring a state twice has no effect.
    pub fn with_states<I, S>(mut self, states: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<State>,
    {
        self.states.extend(states.into_iter().map(Into::into));
        self
    }

    /// Adds transitions given as `(origin, group, target)` triples. If two transitions share
    /// origin and group, the one added last wins.
    pub fn with_transitions<I, Q, G, P>(mut self, transitions: I) -> Self
    where
        I: IntoIterator<Item = (Q, G, P)>,
        Q: Into<State>,
        G: Into<Group>,
        P: Into<State>,
    {
        self.transitions.extend(
            transitions
                .into_iter()
                .map(|(q, g, p)| (q.into(), vec![(g.into(), p.into())])),
        );
        self
    }

    /// Adds all rows of a nested transition table, in declaration order. Every origin of the
    /// table is checked in [`AutomatonBuilder::build`], including those with an empty row.
    pub fn with_transition_table(mut self, table: TransitionTable) -> Self {
        self.transitions
            .extend(table.into_iter().map(|(q, row)| (q, row.into_iter().collect())));
        self
    }

    /// Sets the initial state.
    pub fn with_initial(mut self, initial: impl Into<State>) -> Self {
        self.initial = Some(initial.into());
        self
    }

    /// Adds accepting states.
    pub fn with_accepting<I, S>(mut self, accepting: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<State>,
    {
        self.accepting.extend(accepting.into_iter().map(Into::into));
        self
    }

    /// Validates the collected components and produces the [`Automaton`]. Validation stops at
    /// the first violation:
    /// 1. there has to be at least one state,
    /// 2. the initial state must be declared,
    /// 3. every accepting state must be declared,
    /// 4. for every row of transitions, in the order they were added, the origin must be
    ///    declared, then for each of its cells the group must exist and the target must be
    ///    declared.
    ///
    /// The transition table is not required to be total.
    pub fn build(self) -> Result<Automaton, BuildError> {
        let mut states = IndexedSet::default();
        for q in self.states {
            if states.contains(&q) {
                warn!("state {q} is declared more than once");
                continue;
            }
            states.insert(q);
        }
        if states.is_empty() {
            return Err(BuildError::EmptyStateSet);
        }

        let lookup = |q: &State| {
            states
                .get_index_of(q)
                .ok_or_else(|| BuildError::UnknownState(q.clone()))
        };

        let initial = lookup(self.initial.as_ref().ok_or(BuildError::MissingInitial)?)?;

        let accepting = self
            .accepting
            .iter()
            .map(lookup)
            .collect::<Result<Set<_>, _>>()?;

        let mut transitions = Map::default();
        for (q, row) in &self.transitions {
            let origin = lookup(q)?;
            if row.is_empty() {
                trace!("state {q} has an empty row of transitions");
            }
            for (g, p) in row {
                let group = self
                    .alphabet
                    .group_index(g)
                    .ok_or_else(|| BuildError::UnknownGroup(g.clone()))?;
                let target = lookup(p)?;
                if transitions.insert((origin, group), target).is_some() {
                    trace!("transition from {q} on {g} is overridden, now leads to {p}");
                }
            }
        }

        debug!(
            "built automaton with {} states and {} transitions over {} groups",
            states.len(),
            transitions.len(),
            self.alphabet.group_count()
        );

        Ok(Automaton {
            description: self.description,
            states,
            alphabet: self.alphabet,
            transitions,
            initial,
            accepting,
        })
    }
}

/// Validates the raw components of an automaton and assembles them, this is a shorthand for
/// feeding everything into an [`AutomatonBuilder`].
pub fn build_automaton<S, A>(
    states: S,
    alphabet: AlphabetIndex,
    transitions: TransitionTable,
    initial: impl Into<State>,
    accepting: A,
) -> Result<Automaton, BuildError>
where
    S: IntoIterator,
    S::Item: Into<State>,
    A: IntoIterator,
    A::Item: Into<State>,
{
    AutomatonBuilder::new(alphabet)
        .with_states(states)
        .with_transition_table(transitions)
        .with_initial(initial)
        .with_accepting(accepting)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alphabet::AlphabetSpec;

    fn binary() -> AlphabetIndex {
        AlphabetIndex::plain(['0', '1'])
    }

    fn table<const N: usize>(entries: [(&str, &str, &str); N]) -> TransitionTable {
        let mut table = TransitionTable::default();
        for (q, g, p) in entries {
            table
                .entry(q.to_string())
                .or_default()
                .insert(g.to_string(), p.to_string());
        }
        table
    }

    #[test]
    fn empty_state_set() {
        assert_eq!(
            build_automaton(
                Vec::<String>::new(),
                binary(),
                TransitionTable::default(),
                "q0",
                ["q0"]
            )
            .unwrap_err(),
            BuildError::EmptyStateSet
        );
    }

    #[test]
    fn initial_must_be_declared() {
        assert_eq!(
            build_automaton(["q0", "q1"], binary(), TransitionTable::default(), "q2", ["q1"])
                .unwrap_err(),
            BuildError::UnknownState("q2".to_string())
        );
        assert_eq!(
            AutomatonBuilder::new(binary())
                .with_states(["q0"])
                .build()
                .unwrap_err(),
            BuildError::MissingInitial
        );
    }

    #[test]
    fn accepting_must_be_declared() {
        assert_eq!(
            build_automaton(
                ["q0", "q1"],
                binary(),
                TransitionTable::default(),
                "q0",
                ["q1", "qf"]
            )
            .unwrap_err(),
            BuildError::UnknownState("qf".to_string())
        );
    }

    #[test]
    fn transition_endpoints_must_be_declared() {
        assert_eq!(
            build_automaton(
                ["q0", "q1"],
                binary(),
                table([("q0", "0", "q1"), ("q5", "0", "q1")]),
                "q0",
                ["q1"]
            )
            .unwrap_err(),
            BuildError::UnknownState("q5".to_string())
        );
        assert_eq!(
            build_automaton(
                ["q0", "q1"],
                binary(),
                table([("q0", "0", "q1"), ("q1", "1", "q9")]),
                "q0",
                ["q1"]
            )
            .unwrap_err(),
            BuildError::UnknownState("q9".to_string())
        );
    }

    #[test]
    fn origins_with_empty_rows_must_be_declared() {
        let mut transitions = table([("q0", "0", "q1")]);
        transitions.entry("q5".to_string()).or_default();
        assert_eq!(
            build_automaton(["q0", "q1"], binary(), transitions, "q0", ["q1"]).unwrap_err(),
            BuildError::UnknownState("q5".to_string())
        );

        let mut transitions = table([("q0", "0", "q1")]);
        transitions.entry("q1".to_string()).or_default();
        let dfa = build_automaton(["q0", "q1"], binary(), transitions, "q0", ["q1"]).unwrap();
        assert_eq!(dfa.transitions().count(), 1);
    }

    #[test_log::test]
    fn rows_are_checked_in_declaration_order() {
        let transitions = table([("q1", "0", "bad1"), ("q0", "0", "bad0")]);
        assert_eq!(
            transitions.keys().collect::<Vec<_>>(),
            vec!["q1", "q0"]
        );
        assert_eq!(
            build_automaton(["q0", "q1"], binary(), transitions, "q0", ["q1"]).unwrap_err(),
            BuildError::UnknownState("bad1".to_string())
        );
        // an undeclared origin added before a bad target is reported first
        assert_eq!(
            AutomatonBuilder::new(binary())
                .with_states(["q0"])
                .with_transitions([("q0", "1", "q0")])
                .with_transition_table(table([("ghost", "0", "q0"), ("q0", "0", "bad")]))
                .with_initial("q0")
                .build()
                .unwrap_err(),
            BuildError::UnknownState("ghost".to_string())
        );
    }

    #[test]
    fn transition_group_must_exist() {
        let alphabet =
            AlphabetIndex::build(&AlphabetSpec::new().with_group("digit", "0,1")).unwrap();
        assert_eq!(
            build_automaton(
                ["q0"],
                alphabet.clone(),
                table([("q0", "0", "q0")]),
                "q0",
                ["q0"]
            )
            .unwrap_err(),
            BuildError::UnknownGroup("0".to_string())
        );
        assert!(build_automaton(
            ["q0"],
            alphabet,
            table([("q0", "digit", "q0")]),
            "q0",
            ["q0"]
        )
        .is_ok());
    }

    #[test]
    fn checks_run_in_order() {
        // both the initial state and a transition target are unknown, the initial state is
        // checked first
        assert_eq!(
            build_automaton(
                ["q0"],
                binary(),
                table([("q0", "x", "nowhere")]),
                "start",
                ["end"]
            )
            .unwrap_err(),
            BuildError::UnknownState("start".to_string())
        );
        // group before target
        assert_eq!(
            build_automaton(["q0"], binary(), table([("q0", "x", "nowhere")]), "q0", ["q0"])
                .unwrap_err(),
            BuildError::UnknownGroup("x".to_string())
        );
    }

    #[test]
    fn duplicate_states_collapse() {
        let dfa = AutomatonBuilder::new(binary())
            .with_states(["q0", "q1", "q0"])
            .with_initial("q0")
            .build()
            .unwrap();
        assert_eq!(dfa.size(), 2);
        assert_eq!(dfa.accepting_states().count(), 0);
    }

    #[test]
    fn later_transitions_override() {
        let dfa = AutomatonBuilder::new(binary())
            .with_states(["q0", "q1"])
            .with_transitions([("q0", "0", "q0"), ("q0", "0", "q1")])
            .with_initial("q0")
            .build()
            .unwrap();
        assert_eq!(dfa.transition("q0", "0"), Some("q1"));
    }

    #[test]
    fn partial_tables_are_accepted() {
        let dfa = build_automaton(
            ["q0", "q1"],
            binary(),
            table([("q0", "0", "q1")]),
            "q0",
            Vec::<String>::new(),
        )
        .unwrap();
        assert!(!dfa.is_complete());
        assert_eq!(dfa.description(), None);
    }
}
