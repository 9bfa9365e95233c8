use std::{io::Read, path::Path};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::alphabet::{AlphabetError, AlphabetIndex, AlphabetSpec};

use super::{Automaton, AutomatonBuilder, BuildError, State, TransitionTable};

/// Represents the types of errors that can occur when loading a [`Definition`] and turning it
/// into an [`Automaton`].
#[derive(Error, Debug)]
pub enum DefinitionError {
    /// The definition could not be read.
    #[error("could not read definition: {0}")]
    Io(#[from] std::io::Error),
    /// The definition is not a well-formed record.
    #[error("malformed definition: {0}")]
    Json(#[from] serde_json::Error),
    /// The alphabet is inconsistent.
    #[error(transparent)]
    Alphabet(#[from] AlphabetError),
    /// The components of the automaton do not fit together.
    #[error(transparent)]
    Build(#[from] BuildError),
}

/// Unvalidated description of an automaton, usually read from a JSON document like
/// ```json
/// {
///   "description": "binary words with an even number of ones",
///   "states": ["even", "odd"],
///   "alphabet": { "groups": { "bit": "0" }, "isolated": ["1"] },
///   "initialState": "even",
///   "acceptingStates": ["even"],
///   "transitions": {
///     "even": { "bit": "even", "1": "odd" },
///     "odd": { "bit": "odd", "1": "even" }
///   }
/// }
/// ```
/// A definition is consumed by [`Definition::build`], which validates it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Definition {
    /// Free form description of the automaton.
    #[serde(default)]
    pub description: String,
    /// The declared states, in order.
    pub states: Vec<State>,
    /// The grouped alphabet.
    #[serde(default)]
    pub alphabet: AlphabetSpec,
    /// Label of the initial state.
    pub initial_state: State,
    /// Labels of the accepting states.
    #[serde(default)]
    pub accepting_states: Vec<State>,
    /// Origin state to group label to target state.
    #[serde(default)]
    pub transitions: TransitionTable,
}

impl Definition {
    /// Parses a definition from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, DefinitionError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parses a definition from a reader yielding JSON.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DefinitionError> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Reads and parses the JSON file at `path`.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, DefinitionError> {
        debug!("reading definition from {}", path.as_ref().display());
        let file = std::fs::File::open(path)?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    /// Serializes `self` into pretty printed JSON.
    pub fn to_json(&self) -> Result<String, DefinitionError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Resolves the alphabet and validates the remaining components, producing an [`Automaton`].
    pub fn build(self) -> Result<Automaton, DefinitionError> {
        let alphabet = AlphabetIndex::build(&self.alphabet)?;
        let mut builder = AutomatonBuilder::new(alphabet)
            .with_states(self.states)
            .with_transition_table(self.transitions)
            .with_initial(self.initial_state)
            .with_accepting(self.accepting_states);
        if !self.description.is_empty() {
            builder = builder.with_description(self.description);
        }
        Ok(builder.build()?)
    }
}

impl TryFrom<Definition> for Automaton {
    type Error = DefinitionError;

    fn try_from(value: Definition) -> Result<Self, Self::Error> {
        value.build()
    }
}
