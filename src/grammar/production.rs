/*
    Splits a production string into symbols. Symbols are separated by
    whitespace, except inside quotes, /patterns/ and {actions}.
*/

use itertools::{Itertools, PeekingNext};

use super::{Symbol, EPSILON};
use crate::error::{GrammarError, GrammarResult};

const QUOTES: [char; 3] = ['`', '\'', '"'];

// True if the delimiter `c` is a symbol of its own rather than the start of
// a delimited one, e.g. the `/` in `term / factor`
fn stands_alone(c: char, next: Option<char>) -> bool {
    match next {
        None => true,
        Some(n) => n.is_whitespace() || n == c,
    }
}

fn lex_delimited(chars: &mut impl PeekingNext<Item = char>, close: char, text: &str) -> GrammarResult<String> {
    let open = chars.next(); // Consume the opening delimiter
    let inner: String = chars.peeking_take_while(|&c| c != close).collect();

    if chars.next() != Some(close) {
        return Err(GrammarError::Unterminated {
            delimiter: open.unwrap_or(close),
            text: text.to_string()
        });
    }
    if inner.is_empty() {
        return Err(GrammarError::EmptyLiteral { text: text.to_string() });
    }

    Ok(inner)
}

fn lex_action(chars: &mut impl Iterator<Item = char>, text: &str) -> GrammarResult<Symbol> {
    chars.next(); // Consume open brace
    let mut depth = 1;
    let mut body = String::new();

    for c in chars {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Ok(Symbol::Action(body));
                }
            }
            _ => {}
        }
        body.push(c);
    }

    Err(GrammarError::Unterminated { delimiter: '{', text: text.to_string() })
}

fn lex_word(chars: &mut impl PeekingNext<Item = char>) -> Symbol {
    let word: String = chars.peeking_take_while(|c| !c.is_whitespace()).collect();
    if word == EPSILON {
        Symbol::Epsilon
    } else {
        Symbol::Word(word)
    }
}

pub fn lex_production(text: &str) -> GrammarResult<Vec<Symbol>> {
    let mut symbols = Vec::new();
    let mut chars = text.chars().multipeek();

    loop {
        // Earlier symbols may have peeked past what they consumed
        chars.reset_peek();
        let Some(&c) = chars.peek() else { break };
        let next = chars.peek().copied();
        chars.reset_peek();

        if c.is_whitespace() {
            chars.next();
        } else if QUOTES.contains(&c) && !stands_alone(c, next) {
            symbols.push(Symbol::Quoted(lex_delimited(&mut chars, c, text)?));
        } else if c == '/' && !stands_alone(c, next) {
            symbols.push(Symbol::Pattern(lex_delimited(&mut chars, '/', text)?));
        } else if c == '{' && !stands_alone(c, next) && next != Some('}') {
            symbols.push(lex_action(&mut chars, text)?);
        } else {
            symbols.push(lex_word(&mut chars));
        }
    }

    return Ok(symbols);
}

#[cfg(test)]
mod tests {
    use std::iter::zip;

    use super::*;

    fn word(text: &str) -> Symbol {
        Symbol::Word(text.to_string())
    }

    #[test]
    fn lex_plain_words() {
        let lines = vec![
            "for ( optexpr ; optexpr ; optexpr ) stmt",
            "  expr   ;  ",
            "term / factor"
        ];
        let answers = vec![
            vec![word("for"), word("("), word("optexpr"), word(";"), word("optexpr"), word(";"), word("optexpr"), word(")"), word("stmt")],
            vec![word("expr"), word(";")],
            vec![word("term"), word("/"), word("factor")]
        ];

        for (line, answer) in zip(lines, answers) {
            assert_eq!(lex_production(line).unwrap(), answer);
        }
    }

    #[test]
    fn lex_words_between_spaces() {
        assert_eq!(lex_production("term rest").unwrap(), vec![word("term"), word("rest")]);
        assert_eq!(lex_production("expr ;").unwrap(), vec![word("expr"), word(";")]);
        assert_eq!(
            lex_production("optexpr  stmt\tother  ").unwrap(),
            vec![word("optexpr"), word("stmt"), word("other")]
        );
        assert!(lex_production("alpha bravo charlie").unwrap().iter().all(|s| *s != word("")));
    }

    #[test]
    fn lex_delimited_symbols() {
        assert_eq!(
            lex_production("name `→` production").unwrap(),
            vec![word("name"), Symbol::Quoted("→".to_string()), word("production")]
        );
        assert_eq!(
            lex_production("/[0-9]+/ \"else if\"").unwrap(),
            vec![Symbol::Pattern("[0-9]+".to_string()), Symbol::Quoted("else if".to_string())]
        );
        assert_eq!(lex_production("ε").unwrap(), vec![Symbol::Epsilon]);
    }

    #[test]
    fn lex_actions() {
        assert_eq!(
            lex_production("{print('+')} expr + term").unwrap(),
            vec![Symbol::Action("print('+')".to_string()), word("expr"), word("+"), word("term")]
        );
        assert_eq!(
            lex_production("+ term {print('+') } rest").unwrap(),
            vec![word("+"), word("term"), Symbol::Action("print('+') ".to_string()), word("rest")]
        );
        // A lone brace is an ordinary terminal
        assert_eq!(
            lex_production("{ stmts }").unwrap(),
            vec![word("{"), word("stmts"), word("}")]
        );
    }

    #[test]
    fn lex_unterminated() {
        assert_eq!(
            lex_production("`abc def").unwrap_err(),
            GrammarError::Unterminated { delimiter: '`', text: "`abc def".to_string() }
        );
        assert_eq!(
            lex_production("/[a-z]+").unwrap_err(),
            GrammarError::Unterminated { delimiter: '/', text: "/[a-z]+".to_string() }
        );
        assert_eq!(
            lex_production("{print(x)").unwrap_err(),
            GrammarError::Unterminated { delimiter: '{', text: "{print(x)".to_string() }
        );
    }
}
