/*
    Text renderings of grammars and syntax trees, for diagnostics only
*/

use std::fmt::{self, Display};

use crate::grammar::{Grammar, Nonterminal, Production, Symbol, EPSILON};
use crate::lexer::Token;
use crate::parser::{Label, Node};

const BLUE: &str = "\x1b[34m";
const RESET: &str = "\x1b[0m";

impl Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::Word(w) => write!(f, "{}", w),
            Symbol::Quoted(q) if q.contains('`') => write!(f, "\"{}\"", q),
            Symbol::Quoted(q) => write!(f, "`{}`", q),
            Symbol::Pattern(p) => write!(f, "/{}/", p),
            Symbol::Epsilon => write!(f, "{}", EPSILON),
            Symbol::Action(a) => write!(f, "{{{}}}", a),
        }
    }
}

impl Display for Production {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, symbol) in self.symbols().iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", symbol)?;
        }
        Ok(())
    }
}

impl Display for Nonterminal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} →", self.head())?;
        for (i, production) in self.productions().iter().enumerate() {
            let separator = if i == 0 { "" } else { " |" };
            write!(f, "{} {}", separator, production)?;
        }
        Ok(())
    }
}

/// A grammar rendering that can highlight nonterminal references.
pub struct Styled<'g> {
    grammar: &'g Grammar,
    color: bool,
}

impl Grammar {
    pub fn styled(&self, color: bool) -> Styled<'_> {
        Styled { grammar: self, color }
    }
}

impl<'g> Styled<'g> {
    fn production(&self, production: &Production) -> String {
        production
            .symbols()
            .iter()
            .map(|symbol| match symbol {
                Symbol::Word(w) if self.color && self.grammar.is_head(w) => format!("{}{}{}", BLUE, w, RESET),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl<'g> Display for Styled<'g> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.grammar
            .nonterminals()
            .iter()
            .map(|nt| nt.head().chars().count())
            .max()
            .unwrap_or(0);

        for (i, nt) in self.grammar.nonterminals().iter().enumerate() {
            if i > 0 {
                write!(f, "\n\n")?;
            }
            for (j, production) in nt.productions().iter().enumerate() {
                if j == 0 {
                    write!(f, "{:<width$} → {}", nt.head(), self.production(production), width = width)?;
                } else {
                    write!(f, "\n{:width$} | {}", "", self.production(production), width = width)?;
                }
            }
            if nt.productions().is_empty() {
                write!(f, "{:<width$} →", nt.head(), width = width)?;
            }
        }
        Ok(())
    }
}

impl Display for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.styled(false))
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.label == self.text {
            write!(f, "{}", self.text)
        } else {
            write!(f, "{:?} {}", self.text, self.label)
        }
    }
}

impl Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Rule { head, text, .. } => write!(f, "{} → {}", head, text),
            Label::Terminal(token) => write!(f, "{}", token),
            Label::Epsilon => write!(f, "{}", EPSILON),
        }
    }
}

impl Node {
    fn fmt_children(&self, f: &mut fmt::Formatter<'_>, prefix: &str) -> fmt::Result {
        for (i, child) in self.children.iter().enumerate() {
            let last = i + 1 == self.children.len();
            let (branch, indent) = if last { ("└── ", "    ") } else { ("├── ", "│   ") };
            write!(f, "\n{}{}{}", prefix, branch, child.label)?;
            child.fmt_children(f, &format!("{}{}", prefix, indent))?;
        }
        Ok(())
    }
}

/// Renders the tree with box-drawing branches, one node per line.
impl Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label)?;
        self.fmt_children(f, "")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fig215() -> Grammar {
        Grammar::new(vec![
            Nonterminal::new("expr", ["term rest"]).unwrap(),
            Nonterminal::new("rest", [
                "+ term {print('+')} rest",
                "- term {print('-')} rest",
                "ε"
            ]).unwrap(),
            Nonterminal::new("term", ["/[0-9]/"]).unwrap(),
        ]).unwrap()
    }

    #[test]
    fn format_grammar() {
        let expected = "\
expr → term rest

rest → + term {print('+')} rest
     | - term {print('-')} rest
     | ε

term → /[0-9]/";

        assert_eq!(fig215().to_string(), expected);
    }

    #[test]
    fn format_colored_grammar() {
        let grammar = Grammar::new(vec![Nonterminal::new("S", ["( S )", "x"]).unwrap()]).unwrap();

        assert_eq!(grammar.styled(true).to_string(), "S → ( \x1b[34mS\x1b[0m )\n  | x");
        assert_eq!(grammar.styled(false).to_string(), "S → ( S )\n  | x");
    }

    #[test]
    fn format_nonterminal() {
        let nt = Nonterminal::new("optexpr", ["ε", "expr", "`|`"]).unwrap();
        assert_eq!(nt.to_string(), "optexpr → ε | expr | `|`");
    }

    #[test]
    fn format_tree() {
        let tree = fig215().parse_ast("9-7").unwrap();
        let expected = "\
expr → term rest
├── term → /[0-9]/
│   └── \"9\" /[0-9]/
└── rest → - term {print('-')} rest
    ├── -
    ├── term → /[0-9]/
    │   └── \"7\" /[0-9]/
    └── rest → ε
        └── ε";

        assert_eq!(tree.to_string(), expected);
    }
}
