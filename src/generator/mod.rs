/*
    This module generates random sentences of a grammar's language
*/

use rand::prelude::*;
use thiserror::Error;

use crate::grammar::{Grammar, Nonterminal, Production, Symbol};

#[derive(Debug, Error, PartialEq)]
pub enum GenerateError {
    #[error("Grammar has no nonterminals")]
    EmptyGrammar,
    #[error("Nonterminal `{0}` has no productions")]
    NoProductions(String),
    #[error("Cannot invent text for pattern terminal /{0}/")]
    PatternTerminal(String),
    // Every production still refers to a nonterminal this deep
    #[error("Could not ground out `{0}` within the depth limit")]
    DepthExceeded(String),
}

pub type GenResult = Result<Vec<String>, GenerateError>;

/// Generates a sentence from the start symbol, terminals separated by spaces.
pub fn generate(grammar: &Grammar, rng: &mut impl Rng, max_depth: usize) -> Result<String, GenerateError> {
    let start = grammar.start().ok_or(GenerateError::EmptyGrammar)?;
    Ok(generate_nonterminal(grammar, start, rng, max_depth)?.join(" "))
}

fn is_grounded(grammar: &Grammar, production: &Production) -> bool {
    production.grammar_symbols().all(|s| !matches!(s, Symbol::Word(w) if grammar.is_head(w)))
}

fn generate_nonterminal(grammar: &Grammar, nonterminal: &Nonterminal, rng: &mut impl Rng, depth: usize) -> GenResult {
    if nonterminal.productions().is_empty() {
        return Err(GenerateError::NoProductions(nonterminal.head().to_string()));
    }

    // Out of depth, only productions without nonterminals are allowed
    let candidates: Vec<&Production> = if depth == 0 {
        nonterminal.productions().iter().filter(|p| is_grounded(grammar, p)).collect()
    } else {
        nonterminal.productions().iter().collect()
    };

    let production = candidates
        .choose(rng)
        .ok_or_else(|| GenerateError::DepthExceeded(nonterminal.head().to_string()))?;

    let mut result = Vec::new();
    for symbol in production.grammar_symbols() {
        result.extend(generate_symbol(grammar, symbol, rng, depth)?);
    }

    return Ok(result);
}

fn generate_symbol(grammar: &Grammar, symbol: &Symbol, rng: &mut impl Rng, depth: usize) -> GenResult {
    match symbol {
        Symbol::Word(w) => match grammar.get(w) {
            Some(nt) => generate_nonterminal(grammar, nt, rng, depth.saturating_sub(1)),
            None => Ok(vec![w.clone()]),
        },
        Symbol::Quoted(q) => Ok(vec![q.clone()]),
        Symbol::Pattern(p) => Err(GenerateError::PatternTerminal(p.clone())),
        Symbol::Epsilon | Symbol::Action(_) => Ok(Vec::new()),
    }
}
