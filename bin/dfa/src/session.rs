use std::io::{self, BufRead, Write};

use dfa_sim::prelude::*;
use owo_colors::OwoColorize;
use thiserror::Error;
use tracing::{debug, trace};

#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Definition(#[from] DefinitionError),
    #[error(transparent)]
    Alphabet(#[from] AlphabetError),
    #[error(transparent)]
    Build(#[from] BuildError),
    #[error("group entry \"{0}\" is not of the form name=symbols")]
    MalformedGroup(String),
    #[error("input ended before the automaton was fully defined")]
    Aborted,
}

/// Splits a comma separated answer, dropping empty entries.
pub fn split_list(answer: &str) -> Vec<String> {
    answer
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Reads answers from `input` and writes questions and results to `output`.
pub struct Session<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Returns `None` once the input is exhausted.
    fn ask(&mut self, question: &str) -> io::Result<Option<String>> {
        write!(self.output, "{question}")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn ask_required(&mut self, question: &str) -> Result<String, SessionError> {
        self.ask(question)?.ok_or(SessionError::Aborted)
    }

    /// Asks for all components of an automaton, one after the other. States, initial and
    /// accepting states are validated before the transitions are asked for. A transition target
    /// is asked for again until it names a declared state.
    pub fn define(&mut self) -> Result<Definition, SessionError> {
        writeln!(self.output, "--- Deterministic Finite Automaton Simulator ---")?;
        writeln!(self.output, "Please define the components of your DFA.")?;

        let states = split_list(
            &self.ask_required("1. States (comma separated, e.g. q0,q1,q2): ")?,
        );

        let mut alphabet = AlphabetSpec::new();
        let groups = self.ask_required(
            "2. Symbol groups (name=symbols separated by ';', e.g. digit=0,1,2; empty for none): ",
        )?;
        for entry in groups.split(';').map(str::trim).filter(|e| !e.is_empty()) {
            let (name, symbols) = entry
                .split_once('=')
                .ok_or_else(|| SessionError::MalformedGroup(entry.to_string()))?;
            alphabet = alphabet.with_group(name.trim(), symbols);
        }
        let isolated = self.ask_required("3. Further symbols (comma separated, e.g. a,b): ")?;
        alphabet = alphabet.with_isolated(split_list(&isolated));
        let index = AlphabetIndex::build(&alphabet)?;

        let initial_state = self.ask_required("4. Initial state (e.g. q0): ")?;
        let accepting_states =
            split_list(&self.ask_required("5. Accepting states (comma separated, e.g. q2): ")?);

        // fail early, before asking for the transitions
        let skeleton = build_automaton(
            states.clone(),
            index.clone(),
            TransitionTable::default(),
            initial_state.clone(),
            accepting_states.clone(),
        )?;

        writeln!(self.output, "6. Transition function (δ):")?;
        let mut transitions = TransitionTable::default();
        for q in skeleton.states() {
            for (group, _) in index.groups() {
                let target = loop {
                    let answer = self.ask_required(&format!("   δ({q}, {group}) -> "))?;
                    if skeleton.contains_state(&answer) {
                        break answer;
                    }
                    writeln!(
                        self.output,
                        "   [Warning] \"{answer}\" is not a valid state, please enter an existing state."
                    )?;
                };
                transitions
                    .entry(q.to_string())
                    .or_default()
                    .insert(group.clone(), target);
            }
        }
        debug!("interactive definition complete");

        Ok(Definition {
            description: String::new(),
            states,
            alphabet,
            initial_state,
            accepting_states,
            transitions,
        })
    }

    /// Evaluates `word` and writes the path and verdict, or the reason the evaluation failed.
    pub fn report(&mut self, dfa: &Automaton, word: &str) -> io::Result<bool> {
        match dfa.evaluate(word) {
            Ok(run) => {
                writeln!(self.output, "   Path: {}", run.show())?;
                if run.accepted() {
                    writeln!(
                        self.output,
                        "   Result: {} (final state \"{}\" is an accepting state).",
                        "ACCEPTED".green().bold(),
                        run.final_state()
                    )?;
                } else {
                    writeln!(
                        self.output,
                        "   Result: {} (final state \"{}\" is not an accepting state).",
                        "REJECTED".red().bold(),
                        run.final_state()
                    )?;
                }
                Ok(true)
            }
            Err(err) => {
                writeln!(self.output, "   -> {}: {err}", "Error".yellow().bold())?;
                Ok(false)
            }
        }
    }

    /// Reads words line by line and evaluates each of them until the input ends or `:quit`
    /// (or `:sair`) is entered. Failed evaluations are reported and the loop continues.
    pub fn test_loop(&mut self, dfa: &Automaton) -> io::Result<()> {
        writeln!(self.output, "\n--- Testing ---")?;
        loop {
            let Some(word) =
                self.ask("\nEnter a word to test or ':quit' to exit.\n> ")?
            else {
                break;
            };
            if matches!(word.to_lowercase().as_str(), ":quit" | ":sair") {
                break;
            }
            trace!("testing word \"{word}\"");
            self.report(dfa, &word)?;
        }
        writeln!(self.output, "exiting...")?;
        Ok(())
    }
}
