//! Boolean expression evaluation against a record's content. Matching is
//! plain substring containment; And/Or short-circuit; the case-folded
//! haystack is computed at most once per record regardless of how many
//! case-insensitive terms reference it.

use std::cell::RefCell;

use super::ast::{fold_ascii_fast, AstNode};

/// Evaluates a single AST against many records, amortizing the
/// case-folded haystack computation across terms within one record.
pub struct Evaluator<'a> {
    ast: &'a AstNode,
    folded_haystack: RefCell<Option<String>>,
}

impl<'a> Evaluator<'a> {
    pub fn new(ast: &'a AstNode) -> Self {
        Self {
            ast,
            folded_haystack: RefCell::new(None),
        }
    }

    /// Evaluate against one record's content. The folded haystack (if any
    /// case-insensitive term needs it) is computed at most once here,
    /// regardless of how many terms in the AST reference it.
    pub fn matches(&self, haystack: &str) -> bool {
        *self.folded_haystack.borrow_mut() = None;
        self.eval(self.ast, haystack)
    }

    fn folded(&self, haystack: &str) -> std::cell::Ref<'_, str> {
        {
            let mut slot = self.folded_haystack.borrow_mut();
            if slot.is_none() {
                *slot = Some(fold_ascii_fast(haystack));
            }
        }
        std::cell::Ref::map(self.folded_haystack.borrow(), |opt| {
            opt.as_deref().expect("just populated")
        })
    }

    fn eval(&self, node: &AstNode, haystack: &str) -> bool {
        match node {
            AstNode::Term(term) => {
                if term.case_fold {
                    self.folded(haystack).contains(term.folded.as_str())
                } else {
                    haystack.contains(term.literal.as_str())
                }
            }
            AstNode::And(left, right) => self.eval(left, haystack) && self.eval(right, haystack),
            AstNode::Or(left, right) => self.eval(left, haystack) || self.eval(right, haystack),
            AstNode::Not(child) => !self.eval(child, haystack),
        }
    }
}

/// Stateless convenience entry point for one-off evaluation (tests,
/// dry-run expression checks). Prefer `Evaluator` on the hot path.
pub fn evaluate(ast: &AstNode, haystack: &str) -> bool {
    Evaluator::new(ast).matches(haystack)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::parser::parse;

    fn ast(expr: &str, case_sensitive: bool) -> AstNode {
        parse(expr, case_sensitive).unwrap()
    }

    #[test]
    fn simple_term_matches_substring() {
        let a = ast("error", false);
        assert!(evaluate(&a, "connection ERROR occurred"));
    }

    #[test]
    fn case_sensitive_term_requires_exact_case() {
        let a = ast("ERROR", true);
        assert!(!evaluate(&a, "connection error occurred"));
        assert!(evaluate(&a, "connection ERROR occurred"));
    }

    #[test]
    fn and_requires_both_sides() {
        let a = ast("error AND timeout", false);
        assert!(evaluate(&a, "error: timeout exceeded"));
        assert!(!evaluate(&a, "error: connection refused"));
    }

    #[test]
    fn or_requires_either_side() {
        let a = ast("error OR warn", false);
        assert!(evaluate(&a, "a warn was logged"));
        assert!(!evaluate(&a, "all good"));
    }

    #[test]
    fn not_inverts() {
        let a = ast("NOT debug", false);
        assert!(evaluate(&a, "info: started"));
        assert!(!evaluate(&a, "DEBUG: started"));
    }

    #[test]
    fn de_morgan_and_not_or_not() {
        use proptest::prelude::*;
        proptest!(|(a in "[a-z]{1,5}", b in "[a-z]{1,5}", h in "[a-z ]{0,20}")| {
            let left = ast(&format!("NOT ({a} OR {b})"), false);
            let right = ast(&format!("NOT {a} AND NOT {b}"), false);
            prop_assert_eq!(evaluate(&left, &h), evaluate(&right, &h));
        });
    }

    #[test]
    fn double_negation_is_identity() {
        use proptest::prelude::*;
        proptest!(|(a in "[a-z]{1,5}", h in "[a-z ]{0,20}")| {
            let plain = ast(&a, false);
            let double = ast(&format!("NOT NOT {a}"), false);
            prop_assert_eq!(evaluate(&plain, &h), evaluate(&double, &h));
        });
    }

    #[test]
    fn quoted_term_with_space_matches_phrase() {
        let a = ast(r#""connection timeout""#, false);
        assert!(evaluate(&a, "got a connection timeout today"));
        assert!(!evaluate(&a, "connection refused, timeout later"));
    }
}
