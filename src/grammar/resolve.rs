/*
    One pass over a grammar that turns every symbol into either a terminal
    id or a nonterminal index, so parsing never has to look names up.
*/

use std::collections::HashMap;

use log::debug;
use regex::Regex;

use super::{Grammar, Nonterminal, Production, Symbol};
use crate::error::{GrammarError, GrammarResult};

/// An entry of the terminal vocabulary.
#[derive(Debug, Clone)]
pub enum Terminal {
    Literal(String),
    // `regex` has to cover a whole candidate, `prefix` finds one at the
    // start of the text
    Pattern { source: String, regex: Regex, prefix: Regex },
}

impl Terminal {
    fn pattern(source: &str) -> GrammarResult<Terminal> {
        let compile = |anchored: String| Regex::new(&anchored).map_err(|e| GrammarError::InvalidPattern {
            pattern: source.to_string(),
            message: e.to_string()
        });
        Ok(Terminal::Pattern {
            source: source.to_string(),
            regex: compile(format!("^(?:{})$", source))?,
            prefix: compile(format!("^(?:{})", source))?
        })
    }

    /// The label tokens of this terminal carry.
    pub fn label(&self) -> String {
        match self {
            Terminal::Literal(text) => text.clone(),
            Terminal::Pattern { source, .. } => format!("/{}/", source),
        }
    }

    pub fn accepts(&self, text: &str) -> bool {
        match self {
            Terminal::Literal(literal) => literal == text,
            Terminal::Pattern { regex, .. } => regex.is_match(text),
        }
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Terminal::Literal(_))
    }
}

impl PartialEq for Terminal {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Terminal::Literal(a), Terminal::Literal(b)) => a == b,
            (Terminal::Pattern { source: a, .. }, Terminal::Pattern { source: b, .. }) => a == b,
            _ => false,
        }
    }
}

/// A resolved production symbol.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Item {
    Terminal(usize),
    Nonterminal(usize),
    Epsilon,
}

#[derive(Debug)]
pub struct Alternative<'g> {
    pub production: &'g Production,
    // Position of the production in its nonterminal
    pub index: usize,
    pub items: Vec<Item>,
}

#[derive(Debug)]
pub struct Rule<'g> {
    pub nonterminal: &'g Nonterminal,
    // Non-epsilon alternatives in declaration order
    pub alternatives: Vec<Alternative<'g>>,
    // The first epsilon production, tried only after every other one failed
    pub epsilon: Option<Alternative<'g>>,
}

impl<'g> Rule<'g> {
    pub fn head(&self) -> &'g str {
        self.nonterminal.head()
    }
}

/// A validated grammar with every symbol resolved.
#[derive(Debug)]
pub struct Resolved<'g> {
    grammar: &'g Grammar,
    terminals: Vec<Terminal>,
    rules: Vec<Rule<'g>>,
}

impl<'g> Resolved<'g> {
    pub fn grammar(&self) -> &'g Grammar {
        self.grammar
    }

    pub fn terminals(&self) -> &[Terminal] {
        &self.terminals
    }

    pub fn terminal(&self, id: usize) -> &Terminal {
        &self.terminals[id]
    }

    pub fn rules(&self) -> &[Rule<'g>] {
        &self.rules
    }

    pub fn rule(&self, index: usize) -> &Rule<'g> {
        &self.rules[index]
    }
}

struct Resolver<'g> {
    grammar: &'g Grammar,
    heads: HashMap<&'g str, usize>,
    terminals: Vec<Terminal>,
}

impl<'g> Resolver<'g> {
    fn intern(&mut self, terminal: Terminal) -> usize {
        match self.terminals.iter().position(|t| *t == terminal) {
            Some(id) => id,
            None => {
                self.terminals.push(terminal);
                self.terminals.len() - 1
            }
        }
    }

    fn resolve_symbol(&mut self, symbol: &Symbol) -> GrammarResult<Option<Item>> {
        let item = match symbol {
            Symbol::Word(w) => match self.heads.get(w.as_str()) {
                Some(&index) => Item::Nonterminal(index),
                None => Item::Terminal(self.intern(Terminal::Literal(w.clone()))),
            },
            Symbol::Quoted(q) => Item::Terminal(self.intern(Terminal::Literal(q.clone()))),
            Symbol::Pattern(p) => {
                let terminal = Terminal::pattern(p)?;
                Item::Terminal(self.intern(terminal))
            }
            Symbol::Epsilon => Item::Epsilon,
            Symbol::Action(_) => return Ok(None),
        };
        Ok(Some(item))
    }

    fn resolve_rule(&mut self, nonterminal: &'g Nonterminal) -> GrammarResult<Rule<'g>> {
        let mut alternatives = Vec::new();
        let mut epsilon = None;

        for (index, production) in nonterminal.productions().iter().enumerate() {
            let mut items = Vec::new();
            for symbol in production.symbols() {
                if let Some(item) = self.resolve_symbol(symbol)? {
                    items.push(item);
                }
            }

            let alternative = Alternative { production, index, items };
            if production.is_epsilon() {
                epsilon.get_or_insert(alternative);
            } else {
                alternatives.push(alternative);
            }
        }

        Ok(Rule { nonterminal, alternatives, epsilon })
    }
}

impl Grammar {
    /// Validates the grammar and resolves every production symbol.
    pub fn resolve(&self) -> GrammarResult<Resolved<'_>> {
        self.validate()?;
        if self.nonterminals.is_empty() {
            return Err(GrammarError::NoStartSymbol);
        }

        let mut resolver = Resolver {
            grammar: self,
            heads: self.nonterminals.iter().enumerate().map(|(i, nt)| (nt.head(), i)).collect(),
            terminals: Vec::new(),
        };

        let rules = self.nonterminals
            .iter()
            .map(|nt| resolver.resolve_rule(nt))
            .collect::<GrammarResult<Vec<_>>>()?;

        debug!(
            "resolved {} nonterminals over {} terminals",
            rules.len(),
            resolver.terminals.len()
        );

        Ok(Resolved {
            grammar: resolver.grammar,
            terminals: resolver.terminals,
            rules
        })
    }
}
