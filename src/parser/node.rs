use crate::grammar::resolve::{Alternative, Rule};
use crate::lexer::Token;

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Label {
    // A nonterminal together with the production that matched
    Rule { head: String, production: usize, text: String },
    Terminal(Token),
    Epsilon,
}

/// A node of the syntax tree. Leaves are matched tokens or ε.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Node {
    pub label: Label,
    pub children: Vec<Node>,
}

impl Node {
    pub(crate) fn rule(rule: &Rule, alternative: &Alternative, children: Vec<Node>) -> Self {
        Node {
            label: Label::Rule {
                head: rule.head().to_string(),
                production: alternative.index,
                text: alternative.production.to_string()
            },
            children
        }
    }

    pub(crate) fn leaf(token: &Token) -> Self {
        Node { label: Label::Terminal(token.clone()), children: Vec::new() }
    }

    pub(crate) fn epsilon() -> Self {
        Node { label: Label::Epsilon, children: Vec::new() }
    }

    /// The nonterminal this node was built for, if it is not a leaf.
    pub fn head(&self) -> Option<&str> {
        match &self.label {
            Label::Rule { head, .. } => Some(head),
            _ => None,
        }
    }

    /// Index of the matched production within its nonterminal.
    pub fn production(&self) -> Option<usize> {
        match &self.label {
            Label::Rule { production, .. } => Some(*production),
            _ => None,
        }
    }

    pub fn token(&self) -> Option<&Token> {
        match &self.label {
            Label::Terminal(token) => Some(token),
            _ => None,
        }
    }

    pub fn is_epsilon(&self) -> bool {
        self.label == Label::Epsilon
    }

    /// True for a rule node whose production matched nothing.
    pub fn matched_epsilon(&self) -> bool {
        self.head().is_some() && self.children.iter().all(Node::is_epsilon)
    }

    /// Every matched token, left to right.
    pub fn tokens(&self) -> Vec<&Token> {
        let mut tokens = Vec::new();
        self.collect_tokens(&mut tokens);
        tokens
    }

    fn collect_tokens<'a>(&'a self, tokens: &mut Vec<&'a Token>) {
        match &self.label {
            Label::Terminal(token) => tokens.push(token),
            _ => self.children.iter().for_each(|c| c.collect_tokens(tokens)),
        }
    }
}
