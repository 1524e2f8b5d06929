//! Verification of derivations from axioms.
//!
//! The engine keeps a working set of known equations, starting with the axioms. Each **step**
//! applies every rule in the [catalogue](Rule) to the equations found by the previous step, in a
//! fixed order: rules in catalogue order, and premises in the order they were added to the
//! working set. The derivation succeeds at the first step that produces an equation structurally
//! equal to the target, in either orientation.
//!
//! Equations in the working set are kept in a canonical form: both sides are
//! [simplified](eureka_compute::simplify), and terms that appear identically on both sides are
//! cancelled. Tautologies (`x = x`) and duplicates are discarded.
//!
//! A failed derivation does not mean the target is false; only that it cannot be reached with
//! the rules in the catalogue within the step budget.

mod normalize;
mod rule;

pub use rule::Rule;

use eureka_compute::{
    parse_equation,
    symbolic::SimplifyCache,
    Equation,
};
use eureka_error::Error;
use std::collections::{BTreeSet, HashSet};
use tracing::{debug, trace, warn};
use normalize::{normalize, orientation_key};
use rule::Goal;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A named equation taken as given.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Axiom {
    /// The name of the axiom, such as `"newton's second law"`.
    pub name: String,

    /// The equation asserted by the axiom.
    pub equation: Equation,
}

impl Axiom {
    /// Creates a new axiom.
    pub fn new(name: impl Into<String>, equation: Equation) -> Self {
        Self { name: name.into(), equation }
    }

    /// Parses the source text of an equation into an axiom.
    pub fn parse(name: impl Into<String>, source: &str) -> Result<Self, Error> {
        Ok(Self::new(name, parse_equation(source)?))
    }
}

/// A single application of a rule.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DerivationStep {
    /// The rule that was applied.
    pub rule: Rule,

    /// The equations the rule was applied to, in canonical form.
    pub premises: Vec<Equation>,

    /// The derived equation, in canonical form.
    pub result: Equation,
}

/// The steps leading from the axioms to the target, in the order they were discovered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DerivationTrace {
    pub steps: Vec<DerivationStep>,
}

impl DerivationTrace {
    /// Returns the number of steps in the trace.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Returns true if the target was one of the axioms.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Iterates over the steps in the order they were discovered.
    pub fn iter(&self) -> std::slice::Iter<'_, DerivationStep> {
        self.steps.iter()
    }

    /// Returns the rules used, in order.
    pub fn rules(&self) -> Vec<Rule> {
        self.steps.iter().map(|step| step.rule).collect()
    }
}

impl<'a> IntoIterator for &'a DerivationTrace {
    type Item = &'a DerivationStep;
    type IntoIter = std::slice::Iter<'a, DerivationStep>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Why a derivation could not be completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FailureReason {
    /// The step budget ran out before the target was found.
    StepBudgetExhausted,

    /// A step produced no new equations.
    NoApplicableRule,

    /// A step produced no new equations because the working set was full.
    WorkingSetFull,
}

/// The result of [`derive`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DerivationResult {
    /// The target follows from the axioms through the steps in the trace.
    Verified(DerivationTrace),

    /// The target could not be derived.
    Failed(FailureReason),
}

impl DerivationResult {
    /// Returns true if the derivation was verified.
    pub fn is_verified(&self) -> bool {
        matches!(self, DerivationResult::Verified(_))
    }
}

/// Options bounding the derivation.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DeriveOptions {
    /// The maximum number of steps.
    pub max_steps: usize,

    /// The maximum number of equations in the working set, including the axioms.
    pub max_equations: usize,

    /// Derived equations with more nodes than this are discarded.
    pub max_nodes: usize,
}

impl Default for DeriveOptions {
    fn default() -> Self {
        Self {
            max_steps: 5,
            max_equations: 512,
            max_nodes: 96,
        }
    }
}

/// How an equation in the working set was derived.
#[derive(Debug, Clone)]
struct Origin {
    rule: Rule,
    premises: Vec<usize>,
}

/// An equation in the working set.
#[derive(Debug, Clone)]
struct Known {
    equation: Equation,

    /// [`None`] for axioms.
    origin: Option<Origin>,
}

/// What happened to an equation offered to the working set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Insertion {
    Added,
    Discarded,
    Oversized,
    Full,
}

/// The state of a single derivation.
struct Engine<'a> {
    options: &'a DeriveOptions,
    goal: Goal,
    target_key: Equation,
    known: Vec<Known>,
    seen: HashSet<Equation>,
    cache: SimplifyCache,
}

impl<'a> Engine<'a> {
    /// Normalizes the equation and adds it to the working set if it is new.
    fn insert(&mut self, equation: &Equation, origin: Option<Origin>) -> Insertion {
        let equation = normalize(equation, &mut self.cache);
        if equation.is_tautology() {
            return Insertion::Discarded;
        }

        let is_axiom = origin.is_none();
        if !is_axiom && equation.lhs.node_count() + equation.rhs.node_count() > self.options.max_nodes {
            return Insertion::Oversized;
        }

        let key = orientation_key(&equation);
        if self.seen.contains(&key) {
            return Insertion::Discarded;
        }
        if !is_axiom && self.known.len() >= self.options.max_equations {
            return Insertion::Full;
        }

        if let Some(origin) = &origin {
            trace!(target: "derive", rule = %origin.rule, %equation, "derived");
        }
        self.seen.insert(key);
        self.known.push(Known { equation, origin });
        Insertion::Added
    }

    /// Returns the index of the first equation at or after `start` that matches the target.
    fn find_target(&self, start: usize) -> Option<usize> {
        (start..self.known.len())
            .find(|&index| orientation_key(&self.known[index].equation) == self.target_key)
    }

    /// Collects the steps on the ancestry of the given equation, in discovery order.
    fn trace(&self, index: usize) -> DerivationTrace {
        let mut ancestors = BTreeSet::new();
        let mut stack = vec![index];
        while let Some(current) = stack.pop() {
            if let Some(origin) = &self.known[current].origin {
                if ancestors.insert(current) {
                    stack.extend(origin.premises.iter().copied());
                }
            }
        }

        let steps = ancestors
            .into_iter()
            .filter_map(|index| {
                let known = &self.known[index];
                let origin = known.origin.as_ref()?;
                Some(DerivationStep {
                    rule: origin.rule,
                    premises: origin.premises
                        .iter()
                        .map(|premise| self.known[*premise].equation.clone())
                        .collect(),
                    result: known.equation.clone(),
                })
            })
            .collect();
        DerivationTrace { steps }
    }

    /// Applies a unary rule to one equation.
    fn apply_unary(&self, rule: Rule, index: usize) -> Vec<Equation> {
        let equation = &self.known[index].equation;
        match rule {
            Rule::Reflect => rule::reflect(equation),
            Rule::Differentiate => rule::differentiate(equation, &self.goal),
            Rule::Integrate => rule::integrate_integrals(equation).into_iter().collect(),
            Rule::Isolate => rule::isolate(equation, &self.goal).into_iter().collect(),
            _ => Vec::new(),
        }
    }

    /// Applies a binary rule to two equations.
    fn apply_binary(&mut self, rule: Rule, p: usize, q: usize) -> Option<Equation> {
        let (p_eq, q_eq) = (&self.known[p].equation, &self.known[q].equation);
        match rule {
            Rule::Substitute => rule::substitute_into(p_eq, q_eq),
            Rule::Fold => rule::fold_into(p_eq, q_eq),
            Rule::Add | Rule::Subtract => {
                let combined = if rule == Rule::Add {
                    rule::add(p_eq, q_eq)
                } else {
                    rule::subtract(p_eq, q_eq)
                };

                // only keep combinations where terms cancel or merge
                let limit = p_eq.term_count() + q_eq.term_count();
                let combined = normalize(&combined, &mut self.cache);
                (combined.term_count() < limit).then_some(combined)
            },
            _ => None,
        }
    }

    /// The pairs of equations a binary rule is applied to in one step: every pair of distinct
    /// equations found before the step, where at least one was found by the previous step.
    fn pairs(rule: Rule, frontier: usize, end: usize) -> Vec<(usize, usize)> {
        let mut pairs = Vec::new();
        for p in 0..end {
            for q in 0..end {
                let ordered_ok = if rule.is_ordered() { p != q } else { p < q };
                if ordered_ok && (p >= frontier || q >= frontier) {
                    pairs.push((p, q));
                }
            }
        }
        pairs
    }

    /// Runs one step. Returns the number of equations added, and the number dropped because the
    /// working set was full.
    fn step(&mut self, step: usize, frontier: usize) -> (usize, usize) {
        let end = self.known.len();
        let mut added = 0;
        let mut full = 0;
        let mut oversized = 0;

        let mut offer = |engine: &mut Self, equation: &Equation, origin: Origin| {
            match engine.insert(equation, Some(origin)) {
                Insertion::Added => added += 1,
                Insertion::Full => full += 1,
                Insertion::Oversized => oversized += 1,
                Insertion::Discarded => (),
            }
        };

        for rule in Rule::ALL {
            if rule.is_binary() {
                for (p, q) in Self::pairs(rule, frontier, end) {
                    if let Some(result) = self.apply_binary(rule, p, q) {
                        offer(self, &result, Origin { rule, premises: vec![p, q] });
                    }
                }
            } else {
                for index in frontier..end {
                    for result in self.apply_unary(rule, index) {
                        offer(self, &result, Origin { rule, premises: vec![index] });
                    }
                }
            }
        }

        if oversized > 0 {
            warn!(
                target: "derive",
                step,
                dropped = oversized,
                max_nodes = self.options.max_nodes,
                "dropped equations over the node limit"
            );
        }
        if full > 0 {
            warn!(
                target: "derive",
                step,
                dropped = full,
                max_equations = self.options.max_equations,
                "working set is full"
            );
        }
        (added, full)
    }
}

/// Checks that the target equation follows from the axioms within `max_steps` steps, using the
/// default limits for everything else.
///
/// See [`derive_with`].
pub fn derive(axioms: &[Axiom], target: &Equation, max_steps: usize) -> DerivationResult {
    derive_with(axioms, target, &DeriveOptions {
        max_steps,
        ..DeriveOptions::default()
    })
}

/// Checks that the target equation follows from the axioms.
///
/// Returns [`DerivationResult::Verified`] with the steps on the path to the target at the first
/// step that produces it, or immediately with an empty trace if the target is one of the axioms.
/// Otherwise, returns [`DerivationResult::Failed`] with:
///
/// - [`FailureReason::StepBudgetExhausted`] if every step produced something new, but not the
///   target. This is always the result for `max_steps = 0` if the target is not an axiom.
/// - [`FailureReason::NoApplicableRule`] if a step produced no new equations.
/// - [`FailureReason::WorkingSetFull`] if a step produced no new equations because the working
///   set had reached [`DeriveOptions::max_equations`].
///
/// The result depends only on the inputs; two calls with the same arguments return the same trace.
pub fn derive_with(axioms: &[Axiom], target: &Equation, options: &DeriveOptions) -> DerivationResult {
    let mut cache = SimplifyCache::new();
    let target = normalize(target, &mut cache);
    let mut engine = Engine {
        options,
        goal: Goal::new(&target, axioms.iter().map(|axiom| &axiom.equation)),
        target_key: orientation_key(&target),
        known: Vec::with_capacity(axioms.len()),
        seen: HashSet::new(),
        cache,
    };

    for axiom in axioms {
        if engine.insert(&axiom.equation, None) == Insertion::Discarded {
            trace!(target: "derive", axiom = %axiom.name, "axiom is a tautology or duplicate");
        }
    }
    debug!(target: "derive", axioms = engine.known.len(), %target, "derivation start");

    if engine.find_target(0).is_some() {
        debug!(target: "derive", "target is an axiom");
        return DerivationResult::Verified(DerivationTrace::default());
    }

    let mut frontier = 0;
    for step in 1..=options.max_steps {
        let start = engine.known.len();
        let (added, full) = engine.step(step, frontier);
        debug!(target: "derive", step, added, known = engine.known.len(), "step complete");

        if let Some(index) = engine.find_target(start) {
            let trace = engine.trace(index);
            debug!(target: "derive", step, steps = trace.len(), "target derived");
            return DerivationResult::Verified(trace);
        }

        if added == 0 {
            let reason = if full > 0 {
                FailureReason::WorkingSetFull
            } else {
                FailureReason::NoApplicableRule
            };
            debug!(target: "derive", step, ?reason, "derivation failed");
            return DerivationResult::Failed(reason);
        }
        frontier = start;
    }

    debug!(target: "derive", max_steps = options.max_steps, "step budget exhausted");
    DerivationResult::Failed(FailureReason::StepBudgetExhausted)
}
