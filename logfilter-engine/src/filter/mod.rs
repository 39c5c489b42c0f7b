//! Composable per-record predicates: date window, time-of-day window,
//! and the expression filter, applied in that fixed order.

use chrono::{NaiveDate, NaiveTime};
use smallvec::SmallVec;

use crate::expr::{AstNode, Evaluator};
use crate::record::LogRecord;

pub trait Filter {
    fn accept(&self, record: &LogRecord, content: &str) -> bool;
}

/// Inclusive `record.timestamp.date() in [from, to]`. A record without a
/// timestamp passes.
pub struct DateWindowFilter {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl Filter for DateWindowFilter {
    fn accept(&self, record: &LogRecord, _content: &str) -> bool {
        let Some(ts) = record.timestamp else {
            return true;
        };
        let date = ts.date();
        if let Some(from) = self.from {
            if date < from {
                return false;
            }
        }
        if let Some(to) = self.to {
            if date > to {
                return false;
            }
        }
        true
    }
}

/// Inclusive `time(record.timestamp) in [from, to]`, wrapping across
/// midnight when `from > to`. Absence-of-timestamp passes, same as
/// `DateWindowFilter`.
pub struct TimeWindowFilter {
    pub from: NaiveTime,
    pub to: NaiveTime,
}

impl Filter for TimeWindowFilter {
    fn accept(&self, record: &LogRecord, _content: &str) -> bool {
        let Some(ts) = record.timestamp else {
            return true;
        };
        let t = ts.time();
        if self.from <= self.to {
            t >= self.from && t <= self.to
        } else {
            t >= self.from || t <= self.to
        }
    }
}

/// Evaluates the boolean search expression against the record's content,
/// decoded per the configured encoding policy.
pub struct ExpressionFilter<'a> {
    evaluator: Evaluator<'a>,
}

impl<'a> ExpressionFilter<'a> {
    pub fn new(ast: &'a AstNode) -> Self {
        Self {
            evaluator: Evaluator::new(ast),
        }
    }
}

impl<'a> Filter for ExpressionFilter<'a> {
    fn accept(&self, _record: &LogRecord, content: &str) -> bool {
        self.evaluator.matches(content)
    }
}

/// Ordered predicate chain; a record passes iff every predicate accepts.
/// Cheapest-first ordering (date, then time, then expression) lets the
/// chain short-circuit before the substring search runs.
pub struct FilterChain<'a> {
    predicates: SmallVec<[Box<dyn Filter + 'a>; 3]>,
}

impl<'a> FilterChain<'a> {
    pub fn new() -> Self {
        Self {
            predicates: SmallVec::new(),
        }
    }

    pub fn push(mut self, predicate: Box<dyn Filter + 'a>) -> Self {
        self.predicates.push(predicate);
        self
    }

    pub fn accept(&self, record: &LogRecord, content: &str) -> bool {
        self.predicates.iter().all(|p| p.accept(record, content))
    }
}

impl<'a> Default for FilterChain<'a> {
    fn default() -> Self {
        Self::new()
    }
}
