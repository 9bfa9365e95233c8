use tracing::debug;

use crate::{
    alphabet::{AlphabetIndex, Symbol},
    automaton::{AutomatonBuilder, BuildError},
    Automaton,
};

/// Generates a random automaton with states `q0` to `q{size - 1}` over the given alphabet. `q0`
/// is the initial state and every state is accepting with probability one half. Each cell of
/// the transition table is filled with probability `density`, its target is drawn uniformly
/// from all states. A `density` of `1.0` thus yields a complete automaton.
///
/// Fails with [`BuildError::EmptyStateSet`] if `size` is zero.
pub fn generate_random_automaton(
    rng: &mut fastrand::Rng,
    size: usize,
    alphabet: AlphabetIndex,
    density: f64,
) -> Result<Automaton, BuildError> {
    let states = (0..size).map(|i| format!("q{i}")).collect::<Vec<_>>();

    let mut transitions = vec![];
    for q in &states {
        for (group, _) in alphabet.groups() {
            if rng.f64() < density {
                let target = &states[rng.usize(..size)];
                transitions.push((q.clone(), group.clone(), target.clone()));
            }
        }
    }

    let accepting = states
        .iter()
        .filter(|_| rng.bool())
        .cloned()
        .collect::<Vec<_>>();

    debug!(
        "generated random automaton with {size} states and {} transitions",
        transitions.len()
    );

    AutomatonBuilder::new(alphabet)
        .with_description(format!("random automaton with {size} states"))
        .with_initial("q0")
        .with_states(states)
        .with_transitions(transitions)
        .with_accepting(accepting)
        .build()
}

/// Draws a word of length `len` whose symbols are chosen uniformly from the alphabet. For an
/// empty alphabet, the result is always the empty word.
pub fn random_word(rng: &mut fastrand::Rng, alphabet: &AlphabetIndex, len: usize) -> String {
    let symbols = alphabet.symbols().collect::<Vec<Symbol>>();
    if symbols.is_empty() {
        return String::new();
    }
    (0..len).map(|_| symbols[rng.usize(..symbols.len())]).collect()
}
