use std::collections::HashMap;

use super::LoadErrorKind::DuplicateHead;
use super::{FileResult, LoadError, LoadErrors, Rule};

// Every rule whose head already started an earlier rule
fn get_duplicate_heads(rules: &[Rule]) -> LoadErrors {
    let mut first_lines = HashMap::<&str, usize>::with_capacity(rules.len());

    rules.iter()
        .filter_map(|rule| match first_lines.get(rule.head.as_str()) {
            Some(&first) => Some(LoadError {
                location: rule.location.clone(),
                error: DuplicateHead { head: rule.head.clone(), first }
            }),
            None => {
                first_lines.insert(&rule.head, rule.location.line);
                None
            }
        })
        .collect()
}

pub fn verify_rules(rules: &[Rule]) -> FileResult<()> {
    let mut errors = Vec::new();

    errors.extend(get_duplicate_heads(rules).into_iter());

    if errors.len() > 0 {
        Err(errors)
    } else {
        Ok(())
    }
}
