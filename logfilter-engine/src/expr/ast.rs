//! The parsed, immutable boolean expression tree.

/// A term's precomputed comparison form, attached once at AST-build time
/// so the evaluator's hot path never folds the needle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermNode {
    /// Original literal as written in the expression.
    pub literal: String,
    /// Whether this term compares case-insensitively.
    pub case_fold: bool,
    /// `literal` after Unicode simple case-folding, precomputed when
    /// `case_fold` is true. Equal to `literal` otherwise.
    pub folded: String,
}

impl TermNode {
    pub fn new(literal: impl Into<String>, case_fold: bool) -> Self {
        let literal = literal.into();
        let folded = if case_fold {
            fold_ascii_fast(&literal)
        } else {
            literal.clone()
        };
        Self {
            literal,
            case_fold,
            folded,
        }
    }
}

/// ASCII-fast-path case folding: lowercases ASCII in place, falls back to
/// Unicode simple case-folding (via `to_lowercase`) only for non-ASCII
/// input, since `to_lowercase` is not a no-op allocation for plain ASCII.
pub fn fold_ascii_fast(s: &str) -> String {
    if s.is_ascii() {
        s.to_ascii_lowercase()
    } else {
        s.to_lowercase()
    }
}

/// Tagged variant AST node. Binary shape throughout keeps evaluation uniform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AstNode {
    Term(TermNode),
    And(Box<AstNode>, Box<AstNode>),
    Or(Box<AstNode>, Box<AstNode>),
    Not(Box<AstNode>),
}

impl AstNode {
    pub fn term(literal: impl Into<String>, case_fold: bool) -> Self {
        AstNode::Term(TermNode::new(literal, case_fold))
    }

    pub fn and(left: AstNode, right: AstNode) -> Self {
        AstNode::And(Box::new(left), Box::new(right))
    }

    pub fn or(left: AstNode, right: AstNode) -> Self {
        AstNode::Or(Box::new(left), Box::new(right))
    }

    pub fn not(child: AstNode) -> Self {
        AstNode::Not(Box::new(child))
    }

    /// True iff `self` is a `Not` node. Used by the highlighter, since
    /// occurrences inside negated sub-expressions are never highlighted.
    pub fn is_negated_at_root(&self) -> bool {
        matches!(self, AstNode::Not(_))
    }
}

/// Collects every `Term` reachable without crossing a `Not` an odd number
/// of times: the terms the output highlighter should mark, since
/// occurrences inside negated sub-expressions are never highlighted.
pub fn collect_positive_terms(ast: &AstNode) -> Vec<&TermNode> {
    let mut out = Vec::new();
    walk(ast, false, &mut out);
    out
}

fn walk<'a>(node: &'a AstNode, negated: bool, out: &mut Vec<&'a TermNode>) {
    match node {
        AstNode::Term(t) => {
            if !negated {
                out.push(t);
            }
        }
        AstNode::And(l, r) | AstNode::Or(l, r) => {
            walk(l, negated, out);
            walk(r, negated, out);
        }
        AstNode::Not(child) => walk(child, !negated, out),
    }
}
