/*
    Immediate left-recursion elimination. Only productions that start with
    their own head are detected; recursion through other nonterminals is
    left alone.
*/

use std::collections::HashSet;

use log::debug;

use super::{Grammar, Nonterminal, Production, Symbol};
use crate::error::{GrammarError, GrammarResult};

const REST: &str = "R";

impl Nonterminal {
    /// Rewrites
    ///     A → A α | A β | γ | δ
    /// as the pair
    ///     A → γ R | δ R
    ///     R → α R | β R | ε
    /// where `rest` names R. A nonterminal without left recursion comes back
    /// unchanged.
    pub fn anti_left_recurse(&self, rest: &str) -> GrammarResult<Vec<Nonterminal>> {
        let suffix = Symbol::Word(rest.to_string());
        let mut grounded = Vec::new();
        let mut tails = Vec::new();

        for production in &self.productions {
            let symbols = production.symbols();

            if self.recurses_left(production) {
                // Drop the head, keep any actions in front of it
                let head_at = symbols.iter().position(|s| !s.is_action()).unwrap_or(0);
                let mut alpha: Vec<Symbol> = symbols[..head_at].to_vec();
                alpha.extend_from_slice(&symbols[head_at + 1..]);

                if alpha.iter().all(Symbol::is_action) {
                    return Err(GrammarError::BareLeftRecursion {
                        head: self.head.clone(),
                        production: production.to_string()
                    });
                }
                alpha.push(suffix.clone());
                tails.push(Production::from_parts(alpha));
            } else {
                // γ R, where ε R is just R
                let mut gamma: Vec<Symbol> = if production.is_epsilon() {
                    symbols.iter().filter(|s| **s != Symbol::Epsilon).cloned().collect()
                } else {
                    symbols.to_vec()
                };
                gamma.push(suffix.clone());
                grounded.push(Production::from_parts(gamma));
            }
        }

        if tails.is_empty() {
            return Ok(vec![self.clone()]);
        }
        if grounded.is_empty() {
            return Err(GrammarError::Ungroundable { head: self.head.clone() });
        }

        tails.push(Production::epsilon());
        Ok(vec![
            Nonterminal::from_productions(self.head.clone(), grounded),
            Nonterminal::from_productions(rest, tails),
        ])
    }
}

// `R`, or `R1`, `R2`, ... if taken
fn fresh_name(taken: &mut HashSet<String>) -> String {
    let mut name = REST.to_string();
    let mut n = 0;
    while taken.contains(&name) {
        n += 1;
        name = format!("{}{}", REST, n);
    }
    taken.insert(name.clone());
    name
}

impl Grammar {
    /// Eliminates immediate left recursion by rewriting every nonterminal,
    /// in order. Each left-recursive nonterminal gets its own fresh rest
    /// nonterminal right after it.
    pub fn anti_left_recurse(&self) -> GrammarResult<Grammar> {
        self.validate()?;
        let mut taken = self.names();
        let mut nonterminals = Vec::with_capacity(self.nonterminals.len());

        for nt in &self.nonterminals {
            if !nt.is_left_recursive() {
                nonterminals.push(nt.clone());
                continue;
            }
            let rest = fresh_name(&mut taken);
            debug!("eliminating left recursion in `{}` through `{}`", nt.head(), rest);
            nonterminals.extend(nt.anti_left_recurse(&rest)?);
        }

        Ok(Grammar { nonterminals })
    }
}
