/*
    A context-free grammar engine: grammars are plain data, the tokenizer
    takes its vocabulary from the grammar, and a backtracking
    recursive-descent parser builds the tree.
*/

pub mod error;
pub mod generator;
pub mod grammar;
pub mod lexer;
pub mod loader;
pub mod parser;
pub mod printer;

pub use error::{GrammarError, LexicalError, ParseError, SyntaxError};
pub use grammar::{Grammar, Nonterminal, Production, Symbol};
pub use lexer::{tokenize, Munch, Token};
pub use parser::{Node, Options};
