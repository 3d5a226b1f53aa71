/*
    This module splits input text into tokens. The token kinds are not fixed,
    they are the terminal vocabulary of whatever grammar is in use.
*/

use log::trace;

use crate::error::LexicalError;
use crate::grammar::{Resolved, Terminal};

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Token {
    // Label of the terminal that claimed the text
    pub label: String,
    // Index into the resolved vocabulary
    pub terminal: usize,
    pub text: String,
    // Byte offset into the input
    pub position: usize
}

impl Token {
    pub fn end(&self) -> usize {
        self.position + self.text.len()
    }
}

/// How far a candidate token is extended before it is committed.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub enum Munch {
    // Commit the first candidate any terminal accepts. A terminal that is a
    // prefix of another one always wins.
    #[default]
    Earliest,
    // Commit the longest candidate any terminal accepts. A pattern offers
    // the prefix its regex matches first.
    Longest,
}

// The terminal accepting `candidate`, literals before patterns
fn best_terminal(terminals: &[Terminal], candidate: &str) -> Option<usize> {
    let mut pattern = None;
    for (id, terminal) in terminals.iter().enumerate() {
        if terminal.accepts(candidate) {
            if terminal.is_literal() {
                return Some(id);
            }
            pattern.get_or_insert(id);
        }
    }
    pattern
}

// Length of the token `terminal` would start at the beginning of `rest`
fn claim(terminal: &Terminal, rest: &str, munch: Munch) -> Option<usize> {
    let end = match terminal {
        Terminal::Literal(text) => rest.starts_with(text.as_str()).then(|| text.len()),
        Terminal::Pattern { prefix, .. } => match munch {
            Munch::Earliest => prefix.shortest_match(rest),
            Munch::Longest => prefix.find(rest).map(|m| m.end()),
        },
    };
    end.filter(|&end| end > 0)
}

// Returns (length, terminal) of the next token at the start of `rest`
fn next_token(terminals: &[Terminal], rest: &str, munch: Munch) -> Option<(usize, usize)> {
    let ends = terminals.iter().filter_map(|t| claim(t, rest, munch));
    let end = match munch {
        Munch::Earliest => ends.min(),
        Munch::Longest => ends.max(),
    }?;
    best_terminal(terminals, &rest[..end]).map(|id| (end, id))
}

// The run of text at the start of `rest` that no token can start in
fn unreadable<'a>(terminals: &[Terminal], rest: &'a str, munch: Munch) -> &'a str {
    let end = rest
        .char_indices()
        .skip(1)
        .find(|&(i, c)| c.is_whitespace() || next_token(terminals, &rest[i..], munch).is_some())
        .map_or(rest.len(), |(i, _)| i);
    &rest[..end]
}

/// The tokens read so far, and the error that stopped reading, if any.
pub(crate) fn scan(resolved: &Resolved, input: &str, munch: Munch) -> (Vec<Token>, Option<LexicalError>) {
    let terminals = resolved.terminals();
    let mut tokens = Vec::new();
    let mut pos = 0;

    loop {
        let rest = &input[pos..];
        let trimmed = rest.trim_start();
        pos += rest.len() - trimmed.len();
        if trimmed.is_empty() {
            return (tokens, None);
        }

        match next_token(terminals, trimmed, munch) {
            Some((len, id)) => {
                let token = Token {
                    label: terminals[id].label(),
                    terminal: id,
                    text: trimmed[..len].to_string(),
                    position: pos
                };
                trace!("token {:?} at {}", token.text, pos);
                tokens.push(token);
                pos += len;
            }
            None => {
                let text = unreadable(terminals, trimmed, munch);
                let error = LexicalError { text: text.to_string(), position: pos };
                return (tokens, Some(error));
            }
        }
    }
}

/// Tokenizes the whole input, skipping whitespace between tokens.
pub fn tokenize(resolved: &Resolved, input: &str, munch: Munch) -> Result<Vec<Token>, LexicalError> {
    match scan(resolved, input, munch) {
        (tokens, None) => Ok(tokens),
        (_, Some(error)) => Err(error),
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::grammar::{Grammar, Nonterminal};

    fn arithmetic() -> Grammar {
        Grammar::new(vec![
            Nonterminal::new("expr", ["term rest"]).unwrap(),
            Nonterminal::new("rest", ["+ term rest", "- term rest", "ε"]).unwrap(),
            Nonterminal::new("term", ["0", "1", "2", "3", "4", "5", "6", "7", "8", "9"]).unwrap(),
        ]).unwrap()
    }

    fn texts(tokens: &[Token]) -> Vec<&str> {
        tokens.iter().map(|t| t.text.as_str()).collect()
    }

    #[rstest]
    #[case("9-7", vec!["9", "-", "7"])]
    #[case("  9 - 7  ", vec!["9", "-", "7"])]
    #[case("9-7+3", vec!["9", "-", "7", "+", "3"])]
    #[case("   ", vec![])]
    fn tokenize_digits(#[case] input: &str, #[case] expected: Vec<&str>) {
        let grammar = arithmetic();
        let resolved = grammar.resolve().unwrap();
        let tokens = tokenize(&resolved, input, Munch::Earliest).unwrap();

        assert_eq!(texts(&tokens), expected);
    }

    #[test]
    fn whitespace_keeps_positions() {
        let grammar = arithmetic();
        let resolved = grammar.resolve().unwrap();
        let tokens = tokenize(&resolved, "  9 - 7  ", Munch::Earliest).unwrap();

        let positions: Vec<usize> = tokens.iter().map(|t| t.position).collect();
        assert_eq!(positions, vec![2, 4, 6]);
        assert_eq!(tokens[1].label, "-");
        assert_eq!(tokens[1].end(), 5);
    }

    #[test]
    fn unknown_sequence() {
        let grammar = arithmetic();
        let resolved = grammar.resolve().unwrap();

        assert_eq!(
            tokenize(&resolved, "9 * 7", Munch::Earliest),
            Err(LexicalError { text: "*".to_string(), position: 2 })
        );
    }

    #[rstest]
    #[case("9 *7", "*", 2)]
    #[case("9 $$ 7", "$$", 2)]
    #[case("9-7?=+3", "?=", 3)]
    fn unknown_sequence_stops_at_next_token(#[case] input: &str, #[case] text: &str, #[case] position: usize) {
        let grammar = arithmetic();
        let resolved = grammar.resolve().unwrap();

        assert_eq!(
            tokenize(&resolved, input, Munch::Earliest),
            Err(LexicalError { text: text.to_string(), position })
        );
    }

    #[test]
    fn long_input_with_patterns() {
        let grammar = Grammar::new(vec![
            Nonterminal::new("sum", ["num + sum", "num"]).unwrap(),
            Nonterminal::new("num", ["/[0-9]+/"]).unwrap(),
        ]).unwrap();
        let resolved = grammar.resolve().unwrap();
        let input = vec!["12"; 5000].join("+");

        let longest = tokenize(&resolved, &input, Munch::Longest).unwrap();
        assert_eq!(longest.len(), 9999);
        assert!(longest.iter().step_by(2).all(|t| t.text == "12"));

        let earliest = tokenize(&resolved, &input, Munch::Earliest).unwrap();
        assert_eq!(earliest.len(), 14999);
    }

    #[test]
    fn shorter_prefix_wins_by_default() {
        let grammar = Grammar::new(vec![
            Nonterminal::new("cmp", ["x = x", "x == x"]).unwrap(),
        ]).unwrap();
        let resolved = grammar.resolve().unwrap();

        let earliest = tokenize(&resolved, "x==x", Munch::Earliest).unwrap();
        assert_eq!(texts(&earliest), vec!["x", "=", "=", "x"]);

        let longest = tokenize(&resolved, "x==x", Munch::Longest).unwrap();
        assert_eq!(texts(&longest), vec!["x", "==", "x"]);
    }

    #[test]
    fn keywords_and_patterns() {
        let grammar = Grammar::new(vec![
            Nonterminal::new("stmt", ["if id", "id"]).unwrap(),
            Nonterminal::new("id", ["/[a-z]+/"]).unwrap(),
        ]).unwrap();
        let resolved = grammar.resolve().unwrap();

        let longest = tokenize(&resolved, "if abc", Munch::Longest).unwrap();
        assert_eq!(texts(&longest), vec!["if", "abc"]);
        assert_eq!(longest[0].label, "if");
        assert_eq!(longest[1].label, "/[a-z]+/");

        let earliest = tokenize(&resolved, "if abc", Munch::Earliest).unwrap();
        assert_eq!(texts(&earliest), vec!["i", "f", "a", "b", "c"]);
    }
}
