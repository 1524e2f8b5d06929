//! Brute-force search for a formula relating a set of constants to a target value.
//!
//! Candidates are built bottom-up from a small grammar: a candidate is either one of the
//! constants, an integer power `u^n` of a smaller candidate (with `2 <= |n| <= max_power`, or
//! `n = -1`), or the sum or product of two smaller candidates. The complexity of a candidate is
//! the number of nodes in the expression tree built by the grammar, so a constant has complexity
//! 1, and `C^2` and `A * B` have complexity 3.
//!
//! Candidates are enumerated level by level in order of non-decreasing complexity. Candidates
//! that simplify to the same expression as an earlier candidate are discarded, and do not take
//! part in building larger candidates. The values of the candidates in one level are computed in
//! parallel, but the enumeration order and the ranking of the results do not depend on the number
//! of threads.

use eureka_compute::{primitive::PRECISION, simplify, SymExpr};
use eureka_error::Error;
use rayon::prelude::*;
use rug::{ops::Pow, Float};
use std::{cmp::Ordering, collections::HashSet};
use tracing::{debug, trace, warn};
use crate::constant::{check_tolerance, relative_error, Constant, ConstantTable};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Options bounding the search.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SearchOptions {
    /// The highest complexity of candidate to build.
    pub max_complexity: usize,

    /// The maximum number of candidates to build, across all complexities.
    pub candidate_budget: usize,

    /// The largest magnitude of integer exponent to use.
    pub max_power: u32,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            max_complexity: 5,
            candidate_budget: 20_000,
            max_power: 3,
        }
    }
}

/// A candidate formula that matches the target value within the tolerance.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SearchCandidate {
    /// The simplified formula.
    pub expr: SymExpr,

    /// The value of the formula.
    pub value: Float,

    /// The relative error of the value against the target.
    pub relative_error: f64,

    /// The complexity at which the formula was first built.
    pub complexity: usize,
}

/// The result of [`search_with`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SearchReport {
    /// The matching candidates, best first.
    pub candidates: Vec<SearchCandidate>,

    /// The number of candidates built, including duplicates and candidates outside the
    /// tolerance.
    pub explored: usize,

    /// True if the candidate budget ran out before every candidate up to the maximum complexity
    /// was built.
    pub exhausted: bool,
}

/// A candidate that was kept for building larger candidates.
#[derive(Debug, Clone)]
struct Node {
    expr: SymExpr,
    value: Float,
}

impl Node {
    fn binary(lhs: &Node, rhs: &Node, op: BinaryOp) -> Node {
        match op {
            BinaryOp::Mul => Node {
                expr: SymExpr::Mul(vec![lhs.expr.clone(), rhs.expr.clone()]),
                value: Float::with_val(PRECISION, &lhs.value * &rhs.value),
            },
            BinaryOp::Add => Node {
                expr: SymExpr::Add(vec![lhs.expr.clone(), rhs.expr.clone()]),
                value: Float::with_val(PRECISION, &lhs.value + &rhs.value),
            },
        }
    }

    fn power(base: &Node, exp: i32) -> Node {
        Node {
            expr: base.expr.clone().pow(SymExpr::number(exp)),
            value: base.value.clone().pow(exp),
        }
    }
}

/// The candidates of one level, built up to the remaining budget.
struct Batch {
    nodes: Vec<Node>,
    limit: usize,
    truncated: bool,
}

impl Batch {
    /// Returns true if another candidate fits in the budget.
    fn has_room(&mut self) -> bool {
        if self.nodes.len() < self.limit {
            true
        } else {
            self.truncated = true;
            false
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum BinaryOp {
    Mul,
    Add,
}

/// The exponents used by the grammar, in enumeration order.
fn exponents(max_power: u32) -> Vec<i32> {
    let max_power = i32::try_from(max_power).unwrap_or(i32::MAX);
    (-max_power..=max_power)
        .filter(|n| *n != 0 && *n != 1)
        .collect()
}

/// Total order used to rank the results: relative error, then complexity, then the text of the
/// expression.
fn rank(a: &SearchCandidate, b: &SearchCandidate) -> Ordering {
    a.relative_error.total_cmp(&b.relative_error)
        .then(a.complexity.cmp(&b.complexity))
        .then_with(|| a.expr.to_string().cmp(&b.expr.to_string()))
}

/// The state of the enumeration.
struct Search<'a> {
    options: &'a SearchOptions,
    target: &'a Float,
    tolerance: f64,

    /// The kept candidates, indexed by complexity. Index 0 is always empty, and a level is
    /// pushed once it has been scored.
    levels: Vec<Vec<Node>>,

    /// The simplified forms of every kept candidate.
    seen: HashSet<SymExpr>,

    candidates: Vec<SearchCandidate>,
    explored: usize,
    exhausted: bool,
}

impl<'a> Search<'a> {
    /// The number of candidates that can still be built.
    fn remaining(&self) -> usize {
        self.options.candidate_budget.saturating_sub(self.explored)
    }

    /// Builds the raw candidates of the given complexity, stopping early if the budget runs out.
    fn build_level(&mut self, constants: &[Constant], complexity: usize) -> Vec<Node> {
        let mut batch = Batch {
            nodes: Vec::new(),
            limit: self.remaining(),
            truncated: false,
        };

        if complexity == 1 {
            for constant in constants {
                if !batch.has_room() {
                    break;
                }
                batch.nodes.push(Node {
                    expr: SymExpr::symbol(constant.symbol.clone()),
                    value: constant.value.clone(),
                });
            }
        }

        if complexity >= 3 {
            'powers: for base in &self.levels[complexity - 2] {
                for exp in exponents(self.options.max_power) {
                    if !batch.has_room() {
                        break 'powers;
                    }
                    batch.nodes.push(Node::power(base, exp));
                }
            }
        }

        'binary: for op in [BinaryOp::Mul, BinaryOp::Add] {
            // the operands' complexities add up to `complexity - 1`
            for lhs_complexity in 1..complexity.saturating_sub(1) {
                let rhs_complexity = complexity - 1 - lhs_complexity;
                if lhs_complexity > rhs_complexity {
                    break;
                }

                for (i, lhs) in self.levels[lhs_complexity].iter().enumerate() {
                    // operands of the same complexity are only combined once
                    let skip = if lhs_complexity == rhs_complexity { i } else { 0 };
                    for rhs in self.levels[rhs_complexity].iter().skip(skip) {
                        if !batch.has_room() {
                            break 'binary;
                        }
                        batch.nodes.push(Node::binary(lhs, rhs, op));
                    }
                }
            }
        }

        self.exhausted |= batch.truncated;
        batch.nodes
    }

    /// Simplifies and scores the candidates of one level, keeping the new ones.
    fn score_level(&mut self, pending: Vec<Node>, complexity: usize) {
        self.explored += pending.len();

        let simplified = pending.into_par_iter()
            .map(|node| (simplify(&node.expr), node))
            .collect::<Vec<_>>();

        let mut level = Vec::new();
        for (canonical, node) in simplified {
            if !node.value.is_finite() || !self.seen.insert(canonical.clone()) {
                continue;
            }

            let relative_error = relative_error(&node.value, self.target);
            if relative_error <= self.tolerance {
                trace!(target: "search", candidate = %canonical, relative_error, "match");
                self.candidates.push(SearchCandidate {
                    expr: canonical,
                    value: node.value.clone(),
                    relative_error,
                    complexity,
                });
            }
            level.push(node);
        }

        debug!(
            target: "search",
            complexity,
            kept = level.len(),
            explored = self.explored,
            matches = self.candidates.len(),
            "level finished"
        );
        self.levels.push(level);
    }
}

/// Searches for formulae over the given constants whose value is within the relative `tolerance`
/// of `target`, building candidates up to complexity `max_complexity`.
///
/// The default candidate budget and maximum exponent of [`SearchOptions`] are used. The results
/// are ranked by ascending relative error, then by ascending complexity, then by the text of the
/// formula.
pub fn search(
    constants: &[Constant],
    target: &Float,
    tolerance: f64,
    max_complexity: usize,
) -> Result<Vec<SearchCandidate>, Error> {
    let options = SearchOptions { max_complexity, ..Default::default() };
    search_with(constants, target, tolerance, &options).map(|report| report.candidates)
}

/// Searches for formulae over the given constants whose value is within the relative `tolerance`
/// of `target`, with the given options.
///
/// Fails if the tolerance is negative, or if two constants share a symbol. Running out of
/// budget is not an error: the report contains the candidates found so far, and
/// [`SearchReport::exhausted`] is set.
pub fn search_with(
    constants: &[Constant],
    target: &Float,
    tolerance: f64,
    options: &SearchOptions,
) -> Result<SearchReport, Error> {
    check_tolerance(tolerance)?;
    ConstantTable::try_from_constants(constants.iter().cloned())?;

    debug!(
        target: "search",
        constants = constants.len(),
        %target,
        tolerance,
        max_complexity = options.max_complexity,
        budget = options.candidate_budget,
        "search started"
    );

    let mut search = Search {
        options,
        target,
        tolerance,
        levels: vec![Vec::new()],
        seen: HashSet::new(),
        candidates: Vec::new(),
        explored: 0,
        exhausted: false,
    };

    for complexity in 1..=options.max_complexity {
        let pending = search.build_level(constants, complexity);
        search.score_level(pending, complexity);
        if search.levels[1].is_empty() {
            // every larger candidate is built from the constants
            debug!(target: "search", "no usable constants");
            break;
        }
        if search.exhausted {
            warn!(
                target: "search",
                complexity,
                budget = options.candidate_budget,
                "candidate budget exhausted"
            );
            break;
        }
    }

    let mut candidates = search.candidates;
    candidates.sort_by(rank);
    debug!(target: "search", found = candidates.len(), explored = search.explored, "search finished");
    Ok(SearchReport {
        candidates,
        explored: search.explored,
        exhausted: search.exhausted,
    })
}

#[cfg(test)]
mod tests {
    use eureka_compute::primitive::float;
    use pretty_assertions::assert_eq;
    use super::*;

    fn constants() -> Vec<Constant> {
        vec![
            Constant::exact("C1", 1.5),
            Constant::exact("C2", 2.7),
            Constant::exact("C3", 3.1),
        ]
    }

    #[test]
    fn grammar_exponents() {
        assert_eq!(exponents(3), vec![-3, -2, -1, 2, 3]);
    }

    #[test]
    fn finds_planted_square() {
        let target = float(3.1).pow(2);
        let candidates = search(&constants(), &target, 1e-12, 3).unwrap();
        let best = &candidates[0];
        assert_eq!(best.expr.to_string(), "C3^2");
        assert_eq!(best.complexity, 3);
        assert_eq!(best.relative_error, 0.0);
    }

    #[test]
    fn products_and_sums() {
        let target = Float::with_val(PRECISION, &float(1.5) * &float(2.7));
        let candidates = search(&constants(), &target, 1e-12, 3).unwrap();
        assert_eq!(candidates[0].expr.to_string(), "C1 * C2");

        let target = Float::with_val(PRECISION, &float(1.5) + &float(3.1));
        let candidates = search(&constants(), &target, 1e-12, 3).unwrap();
        assert_eq!(candidates[0].expr.to_string(), "C1 + C3");
    }

    #[test]
    fn duplicates_are_discarded() {
        // `C1 * C1` simplifies to `C1^2`, which is built first
        let target = float(1.5).pow(2);
        let candidates = search(&constants(), &target, 1e-12, 3).unwrap();
        assert_eq!(candidates.len(), 1);
    }

    #[test]
    fn no_match_is_empty() {
        let report = search_with(&constants(), &float(1000.123), 1e-9, &SearchOptions::default()).unwrap();
        assert!(report.candidates.is_empty());
        assert!(!report.exhausted);
        assert!(report.explored > 3);
    }

    #[test]
    fn budget_exhaustion() {
        let options = SearchOptions { candidate_budget: 4, ..Default::default() };
        let report = search_with(&constants(), &float(3.1), 1e-12, &options).unwrap();
        assert!(report.exhausted);
        assert_eq!(report.explored, 4);

        // the constant itself was found before the budget ran out
        assert_eq!(report.candidates.len(), 1);
        assert_eq!(report.candidates[0].expr.to_string(), "C3");
    }

    #[test]
    fn independent_of_thread_count() {
        let constants = vec![
            Constant::exact("C1", 1.5),
            Constant::exact("C2", 2.7),
            Constant::exact("C3", 3.1),
            Constant::exact("C4", 0.8),
        ];
        let target = float(5);
        let options = SearchOptions { max_complexity: 5, ..Default::default() };
        let run = |threads: usize| {
            rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()
                .unwrap()
                .install(|| search_with(&constants, &target, 0.5, &options).unwrap())
        };

        let single = run(1);
        assert!(single.candidates.len() > 20);
        assert_eq!(run(4), single);
        assert_eq!(run(4), single);
    }

    #[test]
    fn unbounded_complexity() {
        let options = SearchOptions {
            max_complexity: usize::MAX,
            candidate_budget: 200,
            ..Default::default()
        };
        let report = search_with(&constants(), &float(3.1), 1e-12, &options).unwrap();
        assert!(report.exhausted);
        assert_eq!(report.explored, 200);
        assert_eq!(report.candidates[0].expr.to_string(), "C3");

        let report = search_with(&[], &float(3.1), 1e-12, &options).unwrap();
        assert!(report.candidates.is_empty());
        assert!(!report.exhausted);
    }
}
