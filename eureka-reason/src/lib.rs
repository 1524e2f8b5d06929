//! Reasoning over physics formulae, built on the expression model of [`eureka_compute`].
//!
//! This crate contains four independent components:
//!
//! - [`derive`] checks that a target equation follows from a set of axioms through a bounded
//!   number of algebraic transformations, returning the trace of transformations used.
//! - [`analogy`] looks for a renaming of variables that makes two equations from different
//!   domains identical (such as a mass on a spring and an LC circuit).
//! - [`decompose`] checks a proposed formula for a composite constant against its known value.
//! - [`search`] enumerates small formulae over a set of constants, looking for one that matches a
//!   target value.
//!
//! Every component is a pure function of its inputs. Expected negative outcomes, such as a
//! derivation that cannot be completed or a decomposition that does not match, are returned as
//! values; only malformed input is reported as an [`Error`](eureka_error::Error).
//!
//! ```
//! use eureka_compute::parse_equation;
//! use eureka_reason::{derive, Axiom, DerivationResult};
//!
//! let axioms = [
//!     Axiom::parse("coulomb", "alpha = e^2 / (4 pi epsilon_0 hbar c)").unwrap(),
//!     Axiom::parse("coulomb constant", "k_e = 1 / (4 pi epsilon_0)").unwrap(),
//! ];
//! let target = parse_equation("alpha = k_e e^2 / (hbar c)").unwrap();
//!
//! match derive(&axioms, &target, 5) {
//!     DerivationResult::Verified(trace) => assert_eq!(trace.len(), 1),
//!     DerivationResult::Failed(reason) => panic!("not derived: {:?}", reason),
//! }
//! ```

pub mod analogy;
pub mod constant;
pub mod decompose;
pub mod derive;
pub mod error;
pub mod search;

pub use analogy::{find_analogy, find_analogy_with, AnalogyMapping, AnalogyOptions, AnalogyResult, Atom};
pub use constant::{Constant, ConstantTable};
pub use decompose::{verify_decomposition, DecompositionResult, Fit};
pub use derive::{
    derive,
    derive_with,
    Axiom,
    DerivationResult,
    DerivationStep,
    DerivationTrace,
    DeriveOptions,
    FailureReason,
    Rule,
};
pub use search::{search, search_with, SearchCandidate, SearchOptions, SearchReport};
