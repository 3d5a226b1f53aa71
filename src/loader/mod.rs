/*
    This module reads grammar files, one rule per line:

        stmt    → expr ; | if ( expr ) stmt
                | other
        optexpr → ε | expr

    Lines starting with `|` continue the rule above them, lines starting
    with `;` are comments.
*/

mod verifier;

use std::fmt::Display;
use std::fs::File;
use std::io::BufRead;
use std::path::{Path, PathBuf};

use itertools::Itertools;
use log::debug;

use crate::error::{GrammarError, Location};
use crate::grammar::production::lex_production;
use crate::grammar::{Grammar, Nonterminal, Production, Symbol};
use verifier::verify_rules;

#[derive(Debug)]
pub enum LoadErrorKind {
    // The line does not start with a head
    MissingHead,
    // The head is not followed by `→`
    MissingArrow,
    // A `|` line with no rule before it
    OrphanContinuation,
    // The same head starts two rules
    DuplicateHead { head: String, first: usize },
    // A production or the grammar as a whole is unusable
    Grammar(GrammarError),
    // There was an issue with reading a file
    FileError(std::io::Error),
}

impl PartialEq for LoadErrorKind {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (LoadErrorKind::FileError(a), LoadErrorKind::FileError(b)) => a.kind() == b.kind(),
            (LoadErrorKind::DuplicateHead { head: a, first: x }, LoadErrorKind::DuplicateHead { head: b, first: y }) => a == b && x == y,
            (LoadErrorKind::Grammar(a), LoadErrorKind::Grammar(b)) => a == b,
            _ => std::mem::discriminant(self) == std::mem::discriminant(other),
        }
    }
}

impl Display for LoadErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadErrorKind::MissingHead => write!(f, "Expected a nonterminal at the start of the rule"),
            LoadErrorKind::MissingArrow => write!(f, "Expected `→` after nonterminal"),
            LoadErrorKind::OrphanContinuation => write!(f, "`|` continues no rule"),
            LoadErrorKind::DuplicateHead { head, first } => write!(f, "`{}` was already defined on line {}", head, first),
            LoadErrorKind::Grammar(e) => write!(f, "{}", e),
            LoadErrorKind::FileError(e) => write!(f, "File error: {}", e),
        }
    }
}

#[derive(Debug, PartialEq, thiserror::Error)]
#[error("[{location}] {error}")]
pub struct LoadError {
    pub location: Location,
    pub error: LoadErrorKind
}

pub type LoadErrors = Vec<LoadError>;

pub type Result<T> = std::result::Result<T, LoadErrorKind>;
pub type LineResult<T> = std::result::Result<T, LoadError>;
pub type FileResult<T> = std::result::Result<T, LoadErrors>;

fn io_error(error: std::io::Error, file: PathBuf) -> LoadError {
    LoadError {
        location: Location {
            file,
            line: 0
        },
        error: LoadErrorKind::FileError(error)
    }
}

#[derive(PartialEq, Debug)]
struct Rule {
    head: String,
    productions: Vec<Production>,
    location: Location
}

#[derive(PartialEq, Debug)]
enum Line {
    Rule(Rule),
    Continuation(Vec<Production>)
}

fn is_word(symbol: &Symbol, text: &str) -> bool {
    matches!(symbol, Symbol::Word(w) if w == text)
}

fn parse_alternatives(symbols: &[Symbol]) -> Result<Vec<Production>> {
    symbols
        .split(|s| is_word(s, "|"))
        .map(|group| Production::new(group.to_vec()).map_err(LoadErrorKind::Grammar))
        .collect()
}

fn parse_line(symbols: &[Symbol], location: Location) -> Result<Line> {
    let head = match symbols.first() {
        Some(s) if is_word(s, "|") => return Ok(Line::Continuation(parse_alternatives(&symbols[1..])?)),
        Some(Symbol::Word(w)) => w.clone(),
        _ => return Err(LoadErrorKind::MissingHead)
    };

    match symbols.get(1) {
        Some(s) if is_word(s, "→") || is_word(s, "->") => {}
        _ => return Err(LoadErrorKind::MissingArrow)
    }

    return Ok(Line::Rule(Rule {
        head,
        productions: parse_alternatives(&symbols[2..])?,
        location
    }));
}

fn parse_lex_line(line: &str, location: Location) -> LineResult<Line> {
    lex_production(line)
        .map_err(LoadErrorKind::Grammar)
        .and_then(|symbols| parse_line(&symbols, location.clone()))
        .map_err(|error| LoadError { location, error })
}

fn is_rule_line(line: &String) -> bool {
    !line.trim().is_empty() && !line.starts_with(';')
}

// Returns an iterator over the lines of a reader, with the io errors wrapped
// in LoadError and enumerated
fn reader_line_nums<'a>(reader: impl BufRead + 'a, path: &'a Path) -> impl Iterator<Item = (usize, LineResult<String>)> + 'a {
    reader
        .lines()
        .map(move |line| line.map_err(|e| io_error(e, path.to_path_buf())))
        .enumerate()
        .filter(|(_, line)| line.as_ref().is_ok_and(is_rule_line) || line.is_err())
        .map(|(num, line)| (num + 1, line))
}

// Folds continuation lines into the rule above them
fn rules_from_lines(lines: Vec<(Line, Location)>) -> FileResult<Vec<Rule>> {
    let mut rules: Vec<Rule> = Vec::new();
    let mut errors = Vec::new();

    for (line, location) in lines {
        match (line, rules.last_mut()) {
            (Line::Rule(rule), _) => rules.push(rule),
            (Line::Continuation(productions), Some(rule)) => rule.productions.extend(productions),
            (Line::Continuation(_), None) => errors.push(LoadError {
                location,
                error: LoadErrorKind::OrphanContinuation
            }),
        }
    }

    if errors.len() > 0 {
        return Err(errors);
    }
    Ok(rules)
}

fn grammar_from_rules(rules: Vec<Rule>, path: &Path) -> FileResult<Grammar> {
    verify_rules(&rules)?;

    let grammar: Grammar = rules
        .into_iter()
        .map(|rule| Nonterminal::from_productions(rule.head, rule.productions))
        .collect();

    grammar.validate().map_err(|e| vec![LoadError {
        location: Location { file: path.to_path_buf(), line: 0 },
        error: LoadErrorKind::Grammar(e)
    }])?;

    debug!("loaded {} nonterminals from {}", grammar.nonterminals().len(), path.display());
    return Ok(grammar);
}

/// Reads a grammar from any buffered reader, `path` only labels errors.
pub fn load_reader(reader: impl BufRead, path: &Path) -> FileResult<Grammar> {
    let lines = reader_line_nums(reader, path);

    let parsed_lines = lines.map(|(num, line_res)| {
        let location = Location {
            file: path.to_path_buf(),
            line: num
        };
        line_res
            .and_then(|line| parse_lex_line(&line, location.clone()))
            .map(|line| (line, location))
    });

    let (lines, errors): (Vec<_>, Vec<_>) = parsed_lines.partition(LineResult::is_ok);
    if errors.len() > 0 {
        return Err(errors.into_iter().filter_map(|e| e.err()).collect_vec());
    }
    let lines_unwrapped = lines.into_iter().filter_map(|l| l.ok()).collect_vec();

    let rules = rules_from_lines(lines_unwrapped)?;
    return grammar_from_rules(rules, path);
}

pub fn load_str(text: &str, path: &Path) -> FileResult<Grammar> {
    load_reader(text.as_bytes(), path)
}

pub fn load_file(path: &Path) -> FileResult<Grammar> {
    let file = File::open(path).map_err(|e| vec![io_error(e, path.to_path_buf())])?;
    load_reader(std::io::BufReader::new(file), path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn location(line: usize) -> Location {
        Location {
            file: PathBuf::from("test.grm"),
            line
        }
    }

    fn load(text: &str) -> FileResult<Grammar> {
        load_str(text, Path::new("test.grm"))
    }

    #[test]
    fn parse_normal_line() {
        let symbols = lex_production("optexpr → ε | expr").unwrap();
        let answer = Rule {
            head: "optexpr".to_string(),
            productions: vec![Production::epsilon(), "expr".parse().unwrap()],
            location: location(1)
        };

        assert_eq!(parse_line(&symbols, location(1)), Ok(Line::Rule(answer)));
    }

    #[test]
    fn parse_quoted_bar() {
        let symbols = lex_production("bnfchar -> `|` | `→`").unwrap();
        let line = parse_line(&symbols, location(1)).unwrap();

        match line {
            Line::Rule(rule) => assert_eq!(rule.productions, vec![
                Production::new(vec![Symbol::Quoted("|".to_string())]).unwrap(),
                Production::new(vec![Symbol::Quoted("→".to_string())]).unwrap(),
            ]),
            other => panic!("expected a rule, got {:?}", other),
        }
    }

    #[test]
    fn parse_malformed_line() {
        let missing_arrow = lex_production("alpha bravo charlie").unwrap();
        assert_eq!(parse_line(&missing_arrow, location(1)), Err(LoadErrorKind::MissingArrow));

        let missing_head = lex_production("`alpha` → bravo").unwrap();
        assert_eq!(parse_line(&missing_head, location(1)), Err(LoadErrorKind::MissingHead));

        let empty_alternative = lex_production("alpha → bravo | | charlie").unwrap();
        assert_eq!(
            parse_line(&empty_alternative, location(1)),
            Err(LoadErrorKind::Grammar(GrammarError::EmptyProduction))
        );
    }

    #[test]
    fn load_with_continuations() {
        let text = "\
; Figure 2.16
stmt    → expr ; | if ( expr ) stmt
        | for ( optexpr ; optexpr ; optexpr ) stmt
        | other

optexpr → ε | expr
";
        let grammar = load(text).unwrap();

        assert_eq!(grammar, Grammar::new(vec![
            Nonterminal::new("stmt", [
                "expr ;",
                "if ( expr ) stmt",
                "for ( optexpr ; optexpr ; optexpr ) stmt",
                "other"
            ]).unwrap(),
            Nonterminal::new("optexpr", ["ε", "expr"]).unwrap(),
        ]).unwrap());
    }

    #[test]
    fn printed_grammar_loads_back() {
        let grammar = Grammar::new(vec![
            Nonterminal::new("expr", ["term rest"]).unwrap(),
            Nonterminal::new("rest", ["+ term {print('+')} rest", "ε"]).unwrap(),
            Nonterminal::new("term", ["/[0-9]/", "`(` expr `)`"]).unwrap(),
        ]).unwrap();

        assert_eq!(load(&grammar.to_string()).unwrap(), grammar);
    }

    #[test]
    fn collects_every_line_error() {
        let text = "\
| dangling
stmt other
stmt → `unterminated
";
        let errors = load(text).unwrap_err();
        let lines: Vec<usize> = errors.iter().map(|e| e.location.line).collect();

        assert_eq!(lines, vec![2, 3]);
        assert_eq!(errors[0].error, LoadErrorKind::MissingArrow);
    }

    #[test]
    fn orphan_continuation() {
        let errors = load("| other\nstmt → other").unwrap_err();
        assert_eq!(errors, vec![LoadError { location: location(1), error: LoadErrorKind::OrphanContinuation }]);
    }

    #[test]
    fn missing_file() {
        let errors = load_file(Path::new("does/not/exist.grm")).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].location.line, 0);
        assert!(matches!(errors[0].error, LoadErrorKind::FileError(_)));
    }
}
