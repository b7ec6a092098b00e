//! Analysis configuration.

use mina_patterns::MatchConfig;

/// Environment variable overriding [`AnalysisConfig::max_witnesses`].
pub const MAX_WITNESSES_VAR: &str = "MINA_MAX_WITNESSES";
/// Environment variable that, when set, disables redundancy checking.
pub const NO_REDUNDANCY_VAR: &str = "MINA_NO_REDUNDANCY";
/// Environment variable that, when set, analyses units sequentially.
pub const SEQUENTIAL_VAR: &str = "MINA_SEQUENTIAL";

/// Knobs of a [`Session`](crate::Session).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AnalysisConfig {
    /// Report cases that can never be reached.
    pub check_redundancy: bool,
    /// Witnesses synthesised per non-exhaustive match (at least one).
    pub max_witnesses: usize,
    /// Analyse independent units of one dependency level concurrently.
    pub parallel: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            check_redundancy: true,
            max_witnesses: 3,
            parallel: true,
        }
    }
}

impl AnalysisConfig {
    /// Report every witness of every match (for testing).
    pub fn unlimited() -> Self {
        AnalysisConfig {
            max_witnesses: usize::MAX,
            ..Self::default()
        }
    }

    /// Defaults with the `MINA_*` environment overrides applied.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env), reading variables through `lookup`.
    ///
    /// Flag variables count as set unless empty, `0` or `false`. An
    /// unparsable witness count keeps the default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let flag = |key: &str| {
            lookup(key).is_some_and(|value| {
                let value = value.trim();
                !(value.is_empty() || value == "0" || value.eq_ignore_ascii_case("false"))
            })
        };

        let mut config = Self::default();
        if let Some(raw) = lookup(MAX_WITNESSES_VAR) {
            match raw.trim().parse::<usize>() {
                Ok(max) => config.max_witnesses = max,
                Err(err) => {
                    tracing::warn!(%raw, %err, "ignoring invalid MINA_MAX_WITNESSES");
                }
            }
        }
        if flag(NO_REDUNDANCY_VAR) {
            config.check_redundancy = false;
        }
        if flag(SEQUENTIAL_VAR) {
            config.parallel = false;
        }
        config
    }

    #[must_use]
    pub fn with_redundancy(mut self, check: bool) -> Self {
        self.check_redundancy = check;
        self
    }

    #[must_use]
    pub fn with_max_witnesses(mut self, max: usize) -> Self {
        self.max_witnesses = max;
        self
    }

    #[must_use]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn match_config(&self) -> MatchConfig {
        MatchConfig {
            check_redundancy: self.check_redundancy,
            max_witnesses: self.max_witnesses.max(1),
        }
    }
}

#[cfg(test)]
mod tests;
