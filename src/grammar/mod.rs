/*
    This module is for storing and manipulating grammars
*/

pub(crate) mod production;
pub mod recursion;
pub mod resolve;

use std::collections::HashSet;
use std::str::FromStr;

use itertools::Itertools;

use crate::error::{GrammarError, GrammarResult};
pub use resolve::{Item, Resolved, Terminal};

/// The marker for the empty alternative.
pub const EPSILON: &str = "ε";

/// The base unit in a production. Whether a `Word` is a terminal is decided
/// by the grammar it sits in: it is a nonterminal reference iff some
/// nonterminal of that grammar has it as its head.
#[derive(Debug, PartialEq, Eq, Clone, Hash)]
pub enum Symbol {
    Word(String),
    // `text`, 'text' or "text"; always a terminal
    Quoted(String),
    // /regex/; a terminal matching the whole pattern
    Pattern(String),
    Epsilon,
    // {narration}; never tokenized or parsed
    Action(String),
}

impl Symbol {
    pub fn is_action(&self) -> bool {
        matches!(self, Symbol::Action(_))
    }
}

/// An ordered sequence of symbols, one alternative of a nonterminal.
#[derive(Debug, PartialEq, Eq, Clone, Hash)]
pub struct Production {
    symbols: Vec<Symbol>,
}

impl Production {
    /// Fails if nothing but actions is left, the empty alternative has to be
    /// spelled out as `ε`.
    pub fn new(symbols: Vec<Symbol>) -> GrammarResult<Self> {
        if symbols.iter().all(Symbol::is_action) {
            return Err(GrammarError::EmptyProduction);
        }
        Ok(Production { symbols })
    }

    pub fn epsilon() -> Self {
        Production { symbols: vec![Symbol::Epsilon] }
    }

    /// Every symbol, actions included.
    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    /// The symbols that take part in parsing.
    pub fn grammar_symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.iter().filter(|s| !s.is_action())
    }

    pub fn first(&self) -> Option<&Symbol> {
        self.grammar_symbols().next()
    }

    pub fn is_epsilon(&self) -> bool {
        self.grammar_symbols().all(|s| *s == Symbol::Epsilon)
    }

    // Production built from a slice of another one, may contain only actions
    pub(crate) fn from_parts(symbols: Vec<Symbol>) -> Self {
        Production { symbols }
    }
}

impl FromStr for Production {
    type Err = GrammarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Production::new(production::lex_production(s)?)
    }
}

/// A head plus its alternatives, in the order they are tried.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Nonterminal {
    head: String,
    productions: Vec<Production>,
}

impl Nonterminal {
    /// Builds a nonterminal from production strings such as `"if ( expr ) stmt"`.
    pub fn new<'a>(head: &str, productions: impl IntoIterator<Item = &'a str>) -> GrammarResult<Self> {
        let productions = productions
            .into_iter()
            .map(Production::from_str)
            .collect::<GrammarResult<Vec<_>>>()?;

        Ok(Nonterminal::from_productions(head, productions))
    }

    pub fn from_productions(head: impl Into<String>, productions: Vec<Production>) -> Self {
        Nonterminal { head: head.into(), productions }
    }

    pub fn head(&self) -> &str {
        &self.head
    }

    pub fn productions(&self) -> &[Production] {
        &self.productions
    }

    /// True if the production starts with this nonterminal's own head.
    pub fn recurses_left(&self, production: &Production) -> bool {
        matches!(production.first(), Some(Symbol::Word(w)) if *w == self.head)
    }

    pub fn is_left_recursive(&self) -> bool {
        self.productions.iter().any(|p| self.recurses_left(p))
    }
}

/// A context-free grammar. The first nonterminal is the start symbol;
/// terminals are every symbol that cannot be traced to a head.
#[derive(Debug, PartialEq, Eq, Clone, Default)]
pub struct Grammar {
    nonterminals: Vec<Nonterminal>,
}

impl Grammar {
    /// Builds and validates a grammar.
    pub fn new(nonterminals: Vec<Nonterminal>) -> GrammarResult<Self> {
        let grammar = Grammar { nonterminals };
        grammar.validate()?;
        Ok(grammar)
    }

    pub fn nonterminals(&self) -> &[Nonterminal] {
        &self.nonterminals
    }

    pub fn start(&self) -> Option<&Nonterminal> {
        self.nonterminals.first()
    }

    pub fn get(&self, head: &str) -> Option<&Nonterminal> {
        self.nonterminals.iter().find(|nt| nt.head == head)
    }

    /// The same grammar with `head` moved to the front as start symbol.
    pub fn with_start(&self, head: &str) -> Option<Grammar> {
        let start = self.get(head)?.clone();
        let rest = self.nonterminals.iter().filter(|nt| nt.head != head).cloned();
        Some(std::iter::once(start).chain(rest).collect())
    }

    pub fn is_head(&self, word: &str) -> bool {
        self.get(word).is_some()
    }

    pub fn is_terminal(&self, symbol: &Symbol) -> bool {
        match symbol {
            Symbol::Word(w) => !self.is_head(w),
            Symbol::Quoted(_) | Symbol::Pattern(_) => true,
            Symbol::Epsilon | Symbol::Action(_) => false,
        }
    }

    /// Ensures every nonterminal has at least one production and no head is
    /// defined twice.
    pub fn validate(&self) -> GrammarResult<()> {
        let mut heads = HashSet::new();
        for nt in &self.nonterminals {
            if nt.productions.is_empty() {
                return Err(GrammarError::NoProductions { head: nt.head.clone() });
            }
            if !heads.insert(nt.head.as_str()) {
                return Err(GrammarError::DuplicateHead { head: nt.head.clone() });
            }
        }
        Ok(())
    }

    /// The terminal vocabulary, unique and in order of first appearance.
    pub fn terminals(&self) -> Vec<&Symbol> {
        self.nonterminals
            .iter()
            .flat_map(|nt| nt.productions.iter())
            .flat_map(|p| p.grammar_symbols())
            .filter(|s| self.is_terminal(s))
            .unique()
            .collect()
    }

    /// Every word, literal and head used anywhere, for picking fresh names.
    pub(crate) fn names(&self) -> HashSet<String> {
        let mut names: HashSet<String> = self.nonterminals.iter().map(|nt| nt.head.clone()).collect();
        for symbol in self.nonterminals.iter().flat_map(|nt| nt.productions.iter()).flat_map(|p| p.symbols.iter()) {
            if let Symbol::Word(w) | Symbol::Quoted(w) = symbol {
                names.insert(w.clone());
            }
        }
        names
    }
}

impl FromIterator<Nonterminal> for Grammar {
    /// Collects without validating.
    fn from_iter<T: IntoIterator<Item = Nonterminal>>(iter: T) -> Self {
        Grammar { nonterminals: iter.into_iter().collect() }
    }
}
