//! Library for constructing and simulating deterministic finite automata (DFA) in Rust.
//!
//! An automaton consists of a finite set of states (identified by their labels), an alphabet, a transition function, a designated initial state and a set of accepting states. The alphabet is *grouped*: its symbols are partitioned into symbol classes (groups) and the transition function is defined on groups rather than on single symbols. A group `digit = 0,1,2` therefore occupies a single column of the transition table, and reading any of `0`, `1` or `2` leads to the same state. Symbols that are not part of a named group form a singleton group labelled by the symbol itself.
//!
//! Construction happens in two steps. First an [`alphabet::AlphabetSpec`] is resolved into an [`AlphabetIndex`], which makes sure that no symbol belongs to more than one group and precomputes the group of every symbol. Then an [`automaton::AutomatonBuilder`] checks that every state referenced as initial state, accepting state or endpoint of a transition is declared and that every transition uses a known group. The result is an immutable [`Automaton`]; the transition table does not need to be total, missing entries are only detected when a word actually reaches them.
//!
//! Words are evaluated with [`run::evaluate`] (or [`Automaton::evaluate`]), which returns the complete path through the automaton together with the acceptance verdict, or a [`run::RunError`] describing the first symbol that could not be processed. Evaluation never modifies the automaton, so a single automaton can be shared between threads and evaluated concurrently.
//!
//! Definitions are usually given as a JSON record, see [`automaton::Definition`].
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

/// The prelude is supposed to make using this package easier. Including everything, i.e.
/// `use dfa_sim::prelude::*;` should be enough to use the package.
pub mod prelude {
    pub use super::{
        alphabet::{AlphabetError, AlphabetIndex, AlphabetSpec, Group, Symbol},
        automaton::{
            build_automaton, Automaton, AutomatonBuilder, BuildError, Definition,
            DefinitionError, State, TransitionTable,
        },
        dot::Dottable,
        run::{evaluate, Run, RunError, Step},
        Show,
    };
}

/// Type aliases for the collections used throughout the crate.
pub mod math;

/// Grouped alphabets and their resolution into an index from symbols to groups.
pub mod alphabet;
pub use alphabet::AlphabetIndex;

/// The automaton value object, its builder and the definition record it is built from.
pub mod automaton;
pub use automaton::Automaton;

/// Evaluation of words, producing paths and acceptance verdicts.
pub mod run;

/// Export of automata in the graphviz DOT format.
pub mod dot;

/// Generation of random automata and words. This is feature gated behind the `random` feature.
#[cfg(feature = "random")]
pub mod random;

/// Helper trait which can be used to display alphabets, automata and runs.
pub trait Show {
    /// Returns a human readable representation of `self`. For a run this should be the path
    /// it takes, for an automaton the transition table.
    fn show(&self) -> String;
}

impl<S: Show> Show for &S {
    fn show(&self) -> String {
        S::show(*self)
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    /// Two states over `{0, 1}`, accepts exactly the words ending in `0`.
    pub fn ends_with_zero() -> Automaton {
        AutomatonBuilder::new(AlphabetIndex::plain(['0', '1']))
            .with_states(["q0", "q1"])
            .with_transitions([
                ("q0", "0", "q1"),
                ("q0", "1", "q0"),
                ("q1", "0", "q1"),
                ("q1", "1", "q0"),
            ])
            .with_initial("q0")
            .with_accepting(["q1"])
            .build()
            .unwrap()
    }

    /// Counts digits modulo two, `#` resets to the start. Uses a `digit` group.
    pub fn digit_parity() -> Automaton {
        let alphabet = AlphabetIndex::build(
            &AlphabetSpec::new()
                .with_group("digit", "0,1,2")
                .with_isolated(["#"]),
        )
        .unwrap();
        AutomatonBuilder::new(alphabet)
            .with_states(["even", "odd"])
            .with_transitions([
                ("even", "digit", "odd"),
                ("odd", "digit", "even"),
                ("even", "#", "even"),
                ("odd", "#", "even"),
            ])
            .with_initial("even")
            .with_accepting(["even"])
            .build()
            .unwrap()
    }

    fn path(run: &Run<'_>) -> Vec<String> {
        run.states().map(str::to_string).collect()
    }

    #[test]
    fn ends_with_zero_paths() {
        let dfa = ends_with_zero();

        let run = dfa.evaluate("1010").unwrap();
        assert_eq!(path(&run), vec!["q0", "q0", "q1", "q0", "q1"]);
        assert!(run.accepted());
        assert_eq!(run.path_len(), 5);

        let run = dfa.evaluate("1001").unwrap();
        assert_eq!(path(&run), vec!["q0", "q0", "q1", "q1", "q0"]);
        assert!(!run.accepted());

        let run = dfa.evaluate("01").unwrap();
        assert_eq!(path(&run), vec!["q0", "q1", "q0"]);
        assert!(!run.accepted());

        let run = dfa.evaluate("1").unwrap();
        assert_eq!(path(&run), vec!["q0", "q0"]);
        assert!(!run.accepted());

        let run = dfa.evaluate("0").unwrap();
        assert_eq!(path(&run), vec!["q0", "q1"]);
        assert!(run.accepted());
    }

    #[test]
    fn group_columns_match_every_member() {
        let dfa = digit_parity();
        let targets = ['0', '1', '2']
            .into_iter()
            .map(|sym| dfa.evaluate(&sym.to_string()).unwrap().final_state().to_string())
            .collect::<Vec<_>>();
        assert_eq!(targets, vec!["odd", "odd", "odd"]);

        assert!(dfa.accepts("12").unwrap());
        assert!(!dfa.accepts("1#2").unwrap());
        assert!(dfa.accepts("201#").unwrap());
    }

    #[test]
    fn overlapping_groups_are_rejected() {
        let spec = AlphabetSpec::new()
            .with_group("vowel", "a,e")
            .with_group("letter", "a,b,c");
        assert_eq!(
            AlphabetIndex::build(&spec),
            Err(AlphabetError::DuplicateSymbol('a'))
        );
    }

    #[test]
    fn unrecognized_symbol_position() {
        let dfa = ends_with_zero();
        assert_eq!(
            dfa.evaluate("01a0").unwrap_err(),
            RunError::UnrecognizedSymbol {
                symbol: 'a',
                position: 2
            }
        );
        assert_eq!(
            dfa.evaluate("x").unwrap_err(),
            RunError::UnrecognizedSymbol {
                symbol: 'x',
                position: 0
            }
        );
    }

    #[test]
    fn gap_in_transition_table() {
        let dfa = AutomatonBuilder::new(AlphabetIndex::plain(['0', '1']))
            .with_states(["q0", "q1"])
            .with_transitions([("q0", "0", "q1"), ("q0", "1", "q0"), ("q1", "0", "q1")])
            .with_initial("q0")
            .with_accepting(["q1"])
            .build()
            .unwrap();

        assert!(dfa.accepts("1100").unwrap());
        for word in ["01", "1001", "00001"] {
            assert_eq!(
                dfa.evaluate(word).unwrap_err(),
                RunError::MissingTransition {
                    state: "q1".to_string(),
                    group: "1".to_string()
                }
            );
        }
        // the automaton stays usable after a failed evaluation
        assert!(dfa.accepts("0").unwrap());
    }

    #[test]
    fn shared_between_threads() {
        let dfa = std::sync::Arc::new(digit_parity());
        let handles = (0..4)
            .map(|i| {
                let dfa = std::sync::Arc::clone(&dfa);
                std::thread::spawn(move || {
                    let word = "1".repeat(i);
                    dfa.accepts(&word).unwrap()
                })
            })
            .collect::<Vec<_>>();
        let verdicts = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .collect::<Vec<_>>();
        assert_eq!(verdicts, vec![true, false, true, false]);
    }
}
