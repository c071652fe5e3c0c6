use std::fmt;
use std::sync::Arc;

use regex::Regex;

use crate::errors::ConfigError;

/// Named path-parameter validator attachable to a [`super::Group`].
///
/// A rule is the logical AND of its configured checks: regex pattern,
/// minimum length, maximum length, and an arbitrary predicate. Any failing
/// check fails the whole rule, and the execution layer rejects the request
/// with an invalid-parameter condition before any handler runs.
///
/// Lengths are counted in characters, not bytes.
///
/// # Example
///
/// ```rust
/// use rairouter::tree::ParamRule;
///
/// # fn main() -> Result<(), rairouter::errors::ConfigError> {
/// let rule = ParamRule::new("id").pattern("^[0-9]+$")?.max_len(8);
/// assert!(rule.validate("42"));
/// assert!(!rule.validate("forty-two"));
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ParamRule {
    name: String,
    pattern: Option<Regex>,
    min_len: Option<usize>,
    max_len: Option<usize>,
    predicate: Option<Arc<dyn Fn(&str) -> bool + Send + Sync>>,
}

impl ParamRule {
    /// Create a rule for the parameter with the given name. With no checks
    /// configured, the rule accepts every value.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pattern: None,
            min_len: None,
            max_len: None,
            predicate: None,
        }
    }

    /// Require the raw value to match a regex pattern.
    ///
    /// The pattern is compiled eagerly; an invalid expression is a
    /// configuration error, surfaced before any request is served.
    pub fn pattern(mut self, expr: &str) -> Result<Self, ConfigError> {
        let regex = Regex::new(expr).map_err(|source| ConfigError::InvalidParamPattern {
            param: self.name.clone(),
            source,
        })?;
        self.pattern = Some(regex);
        Ok(self)
    }

    /// Require at least `len` characters.
    #[must_use]
    pub fn min_len(mut self, len: usize) -> Self {
        self.min_len = Some(len);
        self
    }

    /// Require at most `len` characters.
    #[must_use]
    pub fn max_len(mut self, len: usize) -> Self {
        self.max_len = Some(len);
        self
    }

    /// Require an arbitrary predicate to hold for the raw value.
    #[must_use]
    pub fn predicate<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.predicate = Some(Arc::new(f));
        self
    }

    /// The parameter name this rule applies to.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Validate a raw path-parameter value against every configured check.
    #[must_use]
    pub fn validate(&self, raw: &str) -> bool {
        if let Some(re) = &self.pattern {
            if !re.is_match(raw) {
                return false;
            }
        }
        if self.min_len.is_some() || self.max_len.is_some() {
            let chars = raw.chars().count();
            if let Some(min) = self.min_len {
                if chars < min {
                    return false;
                }
            }
            if let Some(max) = self.max_len {
                if chars > max {
                    return false;
                }
            }
        }
        if let Some(pred) = &self.predicate {
            if !(pred.as_ref())(raw) {
                return false;
            }
        }
        true
    }
}

impl fmt::Debug for ParamRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParamRule")
            .field("name", &self.name)
            .field("pattern", &self.pattern.as_ref().map(Regex::as_str))
            .field("min_len", &self.min_len)
            .field("max_len", &self.max_len)
            .field("predicate", &self.predicate.is_some())
            .finish()
    }
}
