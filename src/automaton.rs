use itertools::Itertools;

use crate::{
    alphabet::{AlphabetIndex, Group, Symbol},
    math::{IndexedSet, Map, Set},
    run::{self, Run, RunError},
    Show,
};

mod builder;
pub use builder::{build_automaton, AutomatonBuilder, BuildError, TransitionTable};

mod definition;
pub use definition::{Definition, DefinitionError};

/// The label of a state. States have no internal structure, two states are the same if and only
/// if their labels coincide.
pub type State = String;

/// Position of a state in the order of declaration.
pub(crate) type StateIndex = usize;

/// A deterministic finite automaton over a grouped alphabet.
///
/// Instances can only be obtained through an [`AutomatonBuilder`] (or a [`Definition`]), which
/// guarantees that the initial state, all accepting states and every endpoint of a transition
/// are declared states and that every transition is labelled with a group of the alphabet. The
/// transition table may have gaps, those surface as [`RunError::MissingTransition`] when a word
/// runs into them.
///
/// An automaton is immutable once built.
#[derive(Clone, Debug)]
pub struct Automaton {
    description: Option<String>,
    states: IndexedSet<State>,
    alphabet: AlphabetIndex,
    transitions: Map<(StateIndex, usize), StateIndex>,
    initial: StateIndex,
    accepting: Set<StateIndex>,
}

impl Automaton {
    /// Returns the description the automaton was built with, if any.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns a reference to the underlying alphabet.
    pub fn alphabet(&self) -> &AlphabetIndex {
        &self.alphabet
    }

    /// Returns the number of states.
    pub fn size(&self) -> usize {
        self.states.len()
    }

    /// Iterates over the state labels in the order in which they were declared.
    pub fn states(&self) -> impl Iterator<Item = &str> + '_ {
        self.states.iter().map(String::as_str)
    }

    /// Checks whether a state with the given label exists.
    pub fn contains_state(&self, state: &str) -> bool {
        self.states.contains(state)
    }

    /// Returns the label of the initial state.
    pub fn initial(&self) -> &str {
        self.label(self.initial)
    }

    /// Iterates over the accepting states in the order in which they were declared.
    pub fn accepting_states(&self) -> impl Iterator<Item = &str> + '_ {
        self.states
            .iter()
            .enumerate()
            .filter(|(idx, _)| self.accepting.contains(idx))
            .map(|(_, q)| q.as_str())
    }

    /// Returns true if `state` is an accepting state.
    pub fn is_accepting(&self, state: &str) -> bool {
        self.states
            .get_index_of(state)
            .is_some_and(|idx| self.accepting.contains(&idx))
    }

    /// Returns the target of the transition leaving `state` on `group`, if it exists.
    pub fn transition(&self, state: &str, group: &str) -> Option<&str> {
        let q = self.states.get_index_of(state)?;
        let g = self.alphabet.group_index(group)?;
        self.successor_index(q, g).map(|p| self.label(p))
    }

    /// Returns the state that is reached from `state` by reading `symbol`.
    pub fn successor(&self, state: &str, symbol: Symbol) -> Option<&str> {
        let q = self.states.get_index_of(state)?;
        let g = self.alphabet.group_index_of(symbol)?;
        self.successor_index(q, g).map(|p| self.label(p))
    }

    /// Iterates over all defined transitions as `(origin, group, target)` triples, ordered by
    /// origin and then by group.
    pub fn transitions(&self) -> impl Iterator<Item = (&str, &Group, &str)> + '_ {
        self.cells().filter_map(|(q, g, target)| {
            target.map(|p| (q, g, p))
        })
    }

    /// Iterates over the `(state, group)` pairs for which no transition is defined.
    pub fn missing_transitions(&self) -> impl Iterator<Item = (&str, &Group)> + '_ {
        self.cells()
            .filter(|(_, _, target)| target.is_none())
            .map(|(q, g, _)| (q, g))
    }

    /// Returns true if every state has a transition on every group.
    pub fn is_complete(&self) -> bool {
        self.missing_transitions().next().is_none()
    }

    /// Evaluates `input` on `self`, see [`run::evaluate`].
    pub fn evaluate(&self, input: &str) -> Result<Run<'_>, RunError> {
        run::evaluate(self, input)
    }

    /// Returns whether `input` is accepted, or the error that stopped its evaluation.
    pub fn accepts(&self, input: &str) -> Result<bool, RunError> {
        self.evaluate(input).map(|run| run.accepted())
    }

    fn cells(&self) -> impl Iterator<Item = (&str, &Group, Option<&str>)> + '_ {
        self.states.iter().enumerate().flat_map(move |(q, label)| {
            self.alphabet
                .groups()
                .enumerate()
                .map(move |(g, (group, _))| {
                    (
                        label.as_str(),
                        group,
                        self.successor_index(q, g).map(|p| self.label(p)),
                    )
                })
        })
    }

    pub(crate) fn initial_index(&self) -> StateIndex {
        self.initial
    }

    pub(crate) fn is_accepting_index(&self, idx: StateIndex) -> bool {
        self.accepting.contains(&idx)
    }

    pub(crate) fn successor_index(&self, state: StateIndex, group: usize) -> Option<StateIndex> {
        self.transitions.get(&(state, group)).copied()
    }

    /// Indices are only ever handed out by the builder, so they are always in range.
    pub(crate) fn label(&self, idx: StateIndex) -> &str {
        &self.states[idx]
    }
}

impl Show for Automaton {
    /// Renders the transition table, the initial state is marked with `->` and accepting
    /// states with `*`.
    fn show(&self) -> String {
        let mut b = tabled::builder::Builder::default();

        b.push_record(
            std::iter::once("δ".to_string()).chain(self.alphabet.groups().map(|(g, _)| g.clone())),
        );

        for (q, label) in self.states.iter().enumerate() {
            let marker = match (q == self.initial, self.accepting.contains(&q)) {
                (true, true) => "->*",
                (true, false) => "->",
                (false, true) => "*",
                (false, false) => "",
            };
            let row = std::iter::once(format!("{marker}{label}")).chain(
                (0..self.alphabet.group_count()).map(|g| {
                    self.successor_index(q, g)
                        .map_or("-".to_string(), |p| self.label(p).to_string())
                }),
            );
            b.push_record(row);
        }

        b.build().with(tabled::settings::Style::ascii()).to_string()
    }
}

impl std::fmt::Display for Automaton {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "DFA with states {{{}}} over {}, initial {}, accepting {{{}}}",
            self.states().join(", "),
            self.alphabet.show(),
            self.initial(),
            self.accepting_states().join(", ")
        )
    }
}
