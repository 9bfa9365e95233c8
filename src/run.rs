use itertools::Itertools;
use thiserror::Error;
use tracing::trace;

use crate::{
    alphabet::{Group, Symbol},
    automaton::{Automaton, State},
    Show,
};

/// Reasons for which the evaluation of a word can fail. A failed evaluation does not affect the
/// automaton, it can be used for further evaluations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RunError {
    /// The word contains a symbol that is not part of the alphabet. The position is the
    /// zero-based index of the symbol in the word.
    #[error("symbol \"{symbol}\" at position {position} is not part of the alphabet")]
    UnrecognizedSymbol {
        /// The offending symbol.
        symbol: Symbol,
        /// Its position in the word.
        position: usize,
    },
    /// The run reached a state which has no transition on the group of the next symbol.
    #[error("no transition defined for state \"{state}\" on group \"{group}\"")]
    MissingTransition {
        /// The state the run got stuck in.
        state: State,
        /// The group of the symbol that could not be read.
        group: Group,
    },
    /// The alphabet recognizes a symbol but cannot resolve its group. This cannot happen for
    /// automata obtained from a builder.
    #[error("symbol \"{symbol}\" is recognized, but does not belong to any group")]
    Internal {
        /// The symbol whose group could not be resolved.
        symbol: Symbol,
    },
}

/// A single step of a [`Run`]: the symbol that was read, the group it belongs to and the
/// state that was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step<'a> {
    /// The symbol that was read.
    pub symbol: Symbol,
    /// The group of `symbol` whose transition was taken.
    pub group: &'a str,
    /// The state reached after reading `symbol`.
    pub state: &'a str,
}

/// The result of a successful evaluation. It records the complete path through the automaton,
/// starting in the initial state, and whether the word is accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run<'a> {
    initial: &'a str,
    steps: Vec<Step<'a>>,
    accepted: bool,
}

impl<'a> Run<'a> {
    /// The state in which the run starts.
    pub fn initial(&self) -> &'a str {
        self.initial
    }

    /// The steps taken, one for every symbol of the word.
    pub fn steps(&self) -> &[Step<'a>] {
        &self.steps
    }

    /// Iterates over the visited states, beginning with the initial state. This yields one
    /// state more than the word has symbols.
    pub fn states(&self) -> impl Iterator<Item = &'a str> + '_ {
        std::iter::once(self.initial).chain(self.steps.iter().map(|step| step.state))
    }

    /// Returns the number of visited states, see [`Run::states`].
    pub fn path_len(&self) -> usize {
        self.steps.len() + 1
    }

    /// The state in which the run ends.
    pub fn final_state(&self) -> &'a str {
        self.steps.last().map_or(self.initial, |step| step.state)
    }

    /// The word that was read.
    pub fn word(&self) -> String {
        self.steps.iter().map(|step| step.symbol).collect()
    }

    /// Whether the run ends in an accepting state.
    pub fn accepted(&self) -> bool {
        self.accepted
    }
}

impl Show for Run<'_> {
    fn show(&self) -> String {
        std::iter::once(self.initial.to_string())
            .chain(
                self.steps
                    .iter()
                    .map(|step| format!("--({})-> {}", step.symbol, step.state)),
            )
            .join(" ")
    }
}

/// Evaluates `input` on the given automaton.
///
/// Starting in the initial state, the word is read symbol by symbol. Every symbol is resolved to
/// its group and the transition for the current state and that group is taken. The evaluation
/// stops at the first symbol that is not part of the alphabet or for which no transition exists.
/// If the whole word can be read, the returned [`Run`] contains the path and the word is accepted
/// if and only if the final state is accepting.
///
/// # Example
/// ```
/// use dfa_sim::prelude::*;
///
/// let dfa = AutomatonBuilder::new(AlphabetIndex::plain(['a', 'b']))
///     .with_states(["even", "odd"])
///     .with_transitions([
///         ("even", "a", "odd"),
///         ("odd", "a", "even"),
///         ("even", "b", "even"),
///         ("odd", "b", "odd"),
///     ])
///     .with_initial("even")
///     .with_accepting(["even"])
///     .build()
///     .unwrap();
///
/// let run = evaluate(&dfa, "aba").unwrap();
/// assert_eq!(run.show(), "even --(a)-> odd --(b)-> odd --(a)-> even");
/// assert!(run.accepted());
///
/// assert_eq!(
///     evaluate(&dfa, "abc").unwrap_err(),
///     RunError::UnrecognizedSymbol { symbol: 'c', position: 2 }
/// );
/// ```
pub fn evaluate<'a>(automaton: &'a Automaton, input: &str) -> Result<Run<'a>, RunError> {
    let alphabet = automaton.alphabet();
    let mut current = automaton.initial_index();
    let mut steps = Vec::with_capacity(input.len());

    for (position, symbol) in input.chars().enumerate() {
        if !alphabet.contains(symbol) {
            trace!("symbol {symbol} at position {position} is not in the alphabet");
            return Err(RunError::UnrecognizedSymbol { symbol, position });
        }

        let (group_idx, group) = alphabet
            .group_index_of(symbol)
            .and_then(|idx| alphabet.group_label(idx).map(|label| (idx, label)))
            .ok_or(RunError::Internal { symbol })?;

        let Some(next) = automaton.successor_index(current, group_idx) else {
            trace!(
                "no transition from {} on group {group}",
                automaton.label(current)
            );
            return Err(RunError::MissingTransition {
                state: automaton.label(current).to_string(),
                group: group.clone(),
            });
        };

        trace!(
            "{} --({symbol})-> {}",
            automaton.label(current),
            automaton.label(next)
        );
        current = next;
        steps.push(Step {
            symbol,
            group: group.as_str(),
            state: automaton.label(current),
        });
    }

    Ok(Run {
        initial: automaton.initial(),
        steps,
        accepted: automaton.is_accepting_index(current),
    })
}
