/*
    This module parses token streams with a recursive-descent parser that
    backtracks one production at a time
*/

mod node;

use itertools::Itertools;
use log::{debug, trace};

use crate::error::{ParseError, ParseResult, SyntaxError};
use crate::grammar::resolve::Alternative;
use crate::grammar::{Grammar, Item, Resolved};
use crate::lexer::{self, Munch, Token};
pub use node::{Label, Node};

/// Knobs for a single parse.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Options {
    pub munch: Munch,
    // Deepest nonterminal nesting before giving up, unlimited if unset
    pub max_depth: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Failure {
    // `rule` could not go past token `at`
    NoMatch { rule: usize, at: usize },
    // `rule` was reentered at token `at` without consuming anything
    LeftRecursion { rule: usize, at: usize },
    DepthExceeded { rule: usize },
}

impl Failure {
    fn at(&self) -> usize {
        match self {
            Failure::NoMatch { at, .. } => *at,
            Failure::LeftRecursion { .. } | Failure::DepthExceeded { .. } => usize::MAX,
        }
    }

    // Failures that no other alternative can recover from
    fn is_fatal(&self) -> bool {
        !matches!(self, Failure::NoMatch { .. })
    }
}

enum Outcome {
    // The node and the number of tokens it consumed
    Success(Node, usize),
    Failure(Failure),
}

struct Parser<'a, 'g> {
    resolved: &'a Resolved<'g>,
    tokens: &'a [Token],
    // Source text, when the tokens came from one
    input: Option<&'a str>,
    max_depth: Option<usize>,
}

impl<'a, 'g> Parser<'a, 'g> {
    // `stalled` counts the enclosing calls made since the last token was
    // consumed. Once it exceeds the number of rules some rule has been
    // reentered at the same token, which can only repeat forever.
    fn parse(&self, rule: usize, pos: usize, depth: usize, stalled: usize) -> Outcome {
        if stalled > self.resolved.rules().len() {
            return Outcome::Failure(Failure::LeftRecursion { rule, at: pos });
        }
        if self.max_depth.is_some_and(|max| depth > max) {
            return Outcome::Failure(Failure::DepthExceeded { rule });
        }

        let current = self.resolved.rule(rule);
        let mut furthest = Failure::NoMatch { rule, at: pos };

        for alternative in &current.alternatives {
            trace!("{} at token {}: trying `{}`", current.head(), pos, alternative.production);
            match self.parse_alternative(rule, alternative, pos, depth, stalled) {
                Outcome::Success(node, consumed) => return Outcome::Success(node, consumed),
                Outcome::Failure(failure) if failure.is_fatal() => return Outcome::Failure(failure),
                Outcome::Failure(failure) => {
                    if failure.at() > furthest.at() {
                        furthest = failure;
                    }
                }
            }
        }

        if let Some(epsilon) = &current.epsilon {
            trace!("{} at token {}: falling back to ε", current.head(), pos);
            let children = epsilon.items.iter().map(|_| Node::epsilon()).collect();
            return Outcome::Success(Node::rule(current, epsilon, children), 0);
        }

        Outcome::Failure(furthest)
    }

    // Any mismatch abandons the whole alternative
    fn parse_alternative(&self, rule: usize, alternative: &Alternative, pos: usize, depth: usize, stalled: usize) -> Outcome {
        let mut children = Vec::with_capacity(alternative.items.len());
        let mut consumed = 0;

        for item in &alternative.items {
            let at = pos + consumed;
            match *item {
                Item::Terminal(id) => match self.tokens.get(at) {
                    Some(token) if self.resolved.terminal(id).accepts(&token.text) => {
                        children.push(Node::leaf(token));
                        consumed += 1;
                    }
                    _ => return Outcome::Failure(Failure::NoMatch { rule, at }),
                },
                Item::Nonterminal(index) => {
                    let stalled = if consumed == 0 { stalled + 1 } else { 0 };
                    match self.parse(index, at, depth + 1, stalled) {
                        Outcome::Success(child, shift) => {
                            children.push(child);
                            consumed += shift;
                        }
                        failure => return failure,
                    }
                }
                Item::Epsilon => children.push(Node::epsilon()),
            }
        }

        Outcome::Success(Node::rule(self.resolved.rule(rule), alternative, children), consumed)
    }

    // Byte position of token `at` and the text from there on
    fn remaining(&self, at: usize) -> (usize, String) {
        match self.input {
            Some(input) => {
                let position = self.tokens.get(at).map_or(input.len(), |t| t.position);
                (position, input[position..].trim().to_string())
            }
            None => {
                let position = self.tokens
                    .get(at)
                    .or(self.tokens.last())
                    .map_or(0, |t| if at < self.tokens.len() { t.position } else { t.end() });
                let text = self.tokens.iter().skip(at).map(|t| t.text.as_str()).join(" ");
                (position, text)
            }
        }
    }

    fn error(&self, failure: Failure) -> ParseError {
        match failure {
            Failure::NoMatch { rule, at } => {
                let (position, remaining) = self.remaining(at);
                SyntaxError::NoMatch {
                    nonterminal: self.resolved.rule(rule).head().to_string(),
                    position,
                    remaining
                }.into()
            }
            Failure::LeftRecursion { rule, at } => ParseError::LeftRecursion {
                nonterminal: self.resolved.rule(rule).head().to_string(),
                position: self.remaining(at).0
            },
            Failure::DepthExceeded { rule } => ParseError::DepthExceeded {
                nonterminal: self.resolved.rule(rule).head().to_string(),
                depth: self.max_depth.unwrap_or_default()
            },
        }
    }
}

impl<'g> Resolved<'g> {
    /// Parses a prefix of `tokens` as the nonterminal at `index`, returning
    /// the tree and how many tokens it consumed.
    pub fn parse(&self, index: usize, tokens: &[Token], options: &Options) -> ParseResult<(Node, usize)> {
        let parser = Parser { resolved: self, tokens, input: None, max_depth: options.max_depth };
        match parser.parse(index, 0, 0, 0) {
            Outcome::Success(node, consumed) => Ok((node, consumed)),
            Outcome::Failure(failure) => Err(parser.error(failure)),
        }
    }

    pub fn parse_ast(&self, input: &str) -> ParseResult<Node> {
        self.parse_ast_with(input, &Options::default())
    }

    /// Tokenizes and parses `input` from the start symbol. All of the input
    /// has to be consumed.
    pub fn parse_ast_with(&self, input: &str, options: &Options) -> ParseResult<Node> {
        let (tokens, lexical) = lexer::scan(self, input, options.munch);
        let parser = Parser { resolved: self, tokens: &tokens, input: Some(input), max_depth: options.max_depth };

        let (tree, consumed) = match parser.parse(0, 0, 0, 0) {
            Outcome::Success(tree, consumed) => (tree, consumed),
            // A bad token is reported before any plain mismatch it caused
            Outcome::Failure(failure) => return Err(match lexical {
                Some(error) if !failure.is_fatal() => error.into(),
                _ => parser.error(failure),
            }),
        };

        // A complete sentence followed by anything at all is trailing input
        let trailing = tokens.get(consumed).map(|t| t.position).or(lexical.map(|e| e.position));
        if let Some(position) = trailing {
            debug!("parsed {} of {} tokens", consumed, tokens.len());
            return Err(SyntaxError::TrailingInput {
                position,
                remaining: input[position..].trim_end().to_string()
            }.into());
        }

        Ok(tree)
    }
}

impl Grammar {
    /// Parses the input according to the grammar.
    pub fn parse_ast(&self, input: &str) -> ParseResult<Node> {
        self.resolve()?.parse_ast(input)
    }

    pub fn parse_ast_with(&self, input: &str, options: &Options) -> ParseResult<Node> {
        self.resolve()?.parse_ast_with(input, options)
    }
}
