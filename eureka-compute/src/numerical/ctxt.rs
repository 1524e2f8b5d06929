use crate::consts;
use levenshtein::levenshtein;
use rug::Float;
use std::collections::HashMap;
use super::func::BUILTINS;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A context to use when evaluating an expression, containing the values bound to symbols.
///
/// The default context binds the mathematical constants `pi`, `tau`, and `phi`. The symbol `e`
/// is left unbound, since formulae commonly use it for the elementary charge.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Ctxt {
    /// The values bound to symbols.
    vars: HashMap<String, Float>,
}

impl Default for Ctxt {
    fn default() -> Self {
        Self {
            vars: consts::BOUND_BY_DEFAULT
                .iter()
                .map(|(name, value)| (name.to_string(), Float::clone(value)))
                .collect(),
        }
    }
}

impl Ctxt {
    /// Creates a new empty context, without any constants.
    pub fn new() -> Ctxt {
        Ctxt {
            vars: HashMap::new(),
        }
    }

    /// Binds a value to a symbol, replacing any previous value.
    pub fn add_var(&mut self, name: &str, value: Float) {
        self.vars.insert(name.to_string(), value);
    }

    /// Removes the value bound to a symbol, returning it.
    pub fn remove_var(&mut self, name: &str) -> Option<Float> {
        self.vars.remove(name)
    }

    /// Get the value bound to a symbol.
    pub fn get_var(&self, name: &str) -> Option<Float> {
        self.vars.get(name).cloned()
    }

    /// Returns the values bound in the context.
    pub fn get_vars(&self) -> &HashMap<String, Float> {
        &self.vars
    }

    /// Returns all builtin functions with a name similar to the given name.
    pub fn get_similar_funcs(&self, name: &str) -> Vec<String> {
        BUILTINS
            .iter()
            .filter(|builtin| levenshtein(builtin, name) < 2)
            .map(|builtin| builtin.to_string())
            .collect()
    }
}

impl<S: Into<String>> FromIterator<(S, Float)> for Ctxt {
    fn from_iter<I: IntoIterator<Item = (S, Float)>>(iter: I) -> Self {
        Ctxt {
            vars: iter.into_iter().map(|(name, value)| (name.into(), value)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use crate::primitive::float;
    use super::*;

    #[test]
    fn default_constants() {
        let ctxt = Ctxt::default();
        let mut names = ctxt.get_vars().keys().cloned().collect::<Vec<_>>();
        names.sort();
        assert_eq!(names, vec!["phi", "pi", "tau"]);
        assert_eq!(ctxt.get_var("e"), None);
    }

    #[test]
    fn bind_and_unbind() {
        let mut ctxt = Ctxt::new();
        ctxt.add_var("g", float(9.81));
        assert_eq!(ctxt.get_var("g"), Some(float(9.81)));
        assert_eq!(ctxt.remove_var("g"), Some(float(9.81)));
        assert!(ctxt.get_vars().is_empty());
    }

    #[test]
    fn similar_funcs() {
        assert_eq!(Ctxt::new().get_similar_funcs("son"), vec!["sin".to_string()]);
    }
}
