use itertools::Itertools;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, trace};

use crate::{
    math::{IndexedMap, Map, OrderedMap},
    Show,
};

/// A single symbol of an alphabet. Input strings are consumed one `char` at a time, so
/// this is also the unit in which words are read.
pub type Symbol = char;

/// The label of a symbol class. Transitions are defined on groups rather than on
/// individual symbols, every symbol in a group behaves identically.
pub type Group = String;

/// Raw description of a grouped alphabet, as it appears in a definition record.
///
/// Named groups map a label to a comma separated list of symbols, e.g. `"digit" => "0,1,2"`.
/// Every isolated symbol forms a singleton group whose label is the symbol itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlphabetSpec {
    /// Named groups, label to comma separated symbol list.
    #[serde(default, skip_serializing_if = "OrderedMap::is_empty")]
    pub groups: OrderedMap<String, String>,
    /// Symbols that form their own group.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub isolated: Vec<String>,
}

impl AlphabetSpec {
    /// Creates an empty specification.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a named group with the given comma separated symbol list.
    pub fn with_group(mut self, label: impl Into<String>, symbols: impl Into<String>) -> Self {
        self.groups.insert(label.into(), symbols.into());
        self
    }

    /// Adds isolated symbols, each of which becomes a singleton group.
    pub fn with_isolated<I, S>(mut self, symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.isolated.extend(symbols.into_iter().map(Into::into));
        self
    }
}

/// Errors that can occur when resolving an [`AlphabetSpec`] into an [`AlphabetIndex`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AlphabetError {
    /// The symbol was assigned to more than one group.
    #[error("symbol \"{0}\" belongs to more than one group")]
    DuplicateSymbol(Symbol),
    /// An isolated symbol collides with the label of a named group.
    #[error("group \"{0}\" is declared more than once")]
    DuplicateGroup(Group),
    /// A named group whose symbol list contains no symbols.
    #[error("group \"{0}\" does not contain any symbols")]
    EmptyGroup(Group),
    /// A token that is not exactly one character long.
    #[error("\"{0}\" is not a single character and cannot be used as a symbol")]
    InvalidSymbol(String),
}

/// Resolved alphabet: the set of recognized symbols together with a precomputed mapping from
/// each symbol to the group that indexes the transition table.
///
/// Groups keep the order in which they were declared, named groups come first (ordered by their
/// label) and isolated symbols follow in list order. Groups are pairwise disjoint, every symbol
/// belongs to exactly one of them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AlphabetIndex {
    groups: IndexedMap<Group, Vec<Symbol>>,
    group_of: Map<Symbol, usize>,
}

fn single_symbol(token: &str) -> Result<Symbol, AlphabetError> {
    let mut chars = token.chars();
    match (chars.next(), chars.next()) {
        (Some(sym), None) => Ok(sym),
        _ => Err(AlphabetError::InvalidSymbol(token.to_string())),
    }
}

/// Splits a comma separated symbol list. Tokens are trimmed, empty tokens are dropped and
/// repetitions within the same list collapse.
fn parse_symbols(text: &str) -> Result<Vec<Symbol>, AlphabetError> {
    text.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(single_symbol)
        .collect::<Result<Vec<_>, _>>()
        .map(|symbols| symbols.into_iter().unique().collect())
}

impl AlphabetIndex {
    /// Builds the index from a raw specification, failing on the first symbol that is seen in a
    /// second group.
    ///
    /// # Example
    /// ```
    /// use dfa_sim::prelude::*;
    ///
    /// let spec = AlphabetSpec::new()
    ///     .with_group("digit", "0, 1, 2")
    ///     .with_isolated(["#"]);
    /// let alphabet = AlphabetIndex::build(&spec).unwrap();
    /// assert_eq!(alphabet.group_of('1').map(String::as_str), Some("digit"));
    /// assert_eq!(alphabet.group_of('#').map(String::as_str), Some("#"));
    /// assert!(!alphabet.contains('3'));
    /// ```
    pub fn build(spec: &AlphabetSpec) -> Result<Self, AlphabetError> {
        let mut index = Self::default();

        for (label, text) in &spec.groups {
            let symbols = parse_symbols(text)?;
            if symbols.is_empty() {
                return Err(AlphabetError::EmptyGroup(label.clone()));
            }
            index.insert_group(label.clone(), symbols)?;
        }

        for token in spec
            .isolated
            .iter()
            .map(|token| token.trim())
            .filter(|token| !token.is_empty())
        {
            let symbol = single_symbol(token)?;
            index.insert_group(symbol.to_string(), vec![symbol])?;
        }

        debug!(
            "built alphabet with {} symbols in {} groups",
            index.size(),
            index.group_count()
        );
        Ok(index)
    }

    /// Creates an alphabet in which every symbol forms its own group. Repeated symbols are
    /// ignored.
    pub fn plain<I: IntoIterator<Item = Symbol>>(symbols: I) -> Self {
        let mut index = Self::default();
        for sym in symbols.into_iter().unique() {
            index.group_of.insert(sym, index.groups.len());
            index.groups.insert(sym.to_string(), vec![sym]);
        }
        index
    }

    fn insert_group(&mut self, label: Group, symbols: Vec<Symbol>) -> Result<(), AlphabetError> {
        if let Some(sym) = symbols.iter().find(|sym| self.group_of.contains_key(sym)) {
            trace!("symbol {sym} of group {label} was already assigned");
            return Err(AlphabetError::DuplicateSymbol(*sym));
        }
        if self.groups.contains_key(&label) {
            return Err(AlphabetError::DuplicateGroup(label));
        }

        let position = self.groups.len();
        self.group_of
            .extend(symbols.iter().map(|sym| (*sym, position)));
        self.groups.insert(label, symbols);
        Ok(())
    }

    /// Returns the number of recognized symbols.
    pub fn size(&self) -> usize {
        self.group_of.len()
    }

    /// Returns the number of groups, i.e. the number of columns of a transition table.
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Returns true if no symbol is recognized.
    pub fn is_empty(&self) -> bool {
        self.group_of.is_empty()
    }

    /// Checks whether `symbol` is part of the alphabet.
    pub fn contains(&self, symbol: Symbol) -> bool {
        self.group_of.contains_key(&symbol)
    }

    /// Iterates over all recognized symbols, group by group in declaration order.
    pub fn symbols(&self) -> impl Iterator<Item = Symbol> + '_ {
        self.groups.values().flatten().copied()
    }

    /// Iterates over the groups and their symbols in declaration order.
    pub fn groups(&self) -> impl Iterator<Item = (&Group, &[Symbol])> + '_ {
        self.groups
            .iter()
            .map(|(label, symbols)| (label, symbols.as_slice()))
    }

    /// Returns the label of the group that `symbol` belongs to.
    pub fn group_of(&self, symbol: Symbol) -> Option<&Group> {
        self.group_index_of(symbol)
            .and_then(|idx| self.group_label(idx))
    }

    /// Checks whether a group with the given label exists.
    pub fn has_group(&self, label: &str) -> bool {
        self.groups.contains_key(label)
    }

    /// Returns the symbols making up the group `label`.
    pub fn symbols_of(&self, label: &str) -> Option<&[Symbol]> {
        self.groups.get(label).map(Vec::as_slice)
    }

    pub(crate) fn group_index_of(&self, symbol: Symbol) -> Option<usize> {
        self.group_of.get(&symbol).copied()
    }

    pub(crate) fn group_index(&self, label: &str) -> Option<usize> {
        self.groups.get_index_of(label)
    }

    pub(crate) fn group_label(&self, idx: usize) -> Option<&Group> {
        self.groups.get_index(idx).map(|(label, _)| label)
    }
}

impl TryFrom<&AlphabetSpec> for AlphabetIndex {
    type Error = AlphabetError;

    fn try_from(value: &AlphabetSpec) -> Result<Self, Self::Error> {
        Self::build(value)
    }
}

impl Show for AlphabetIndex {
    fn show(&self) -> String {
        format!(
            "{{{}}}",
            self.groups()
                .map(|(label, symbols)| match symbols {
                    [sym] if sym.to_string() == *label => label.clone(),
                    _ => format!("{label}: {}", symbols.iter().join(",")),
                })
                .join(", ")
        )
    }
}
