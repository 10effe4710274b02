// Environment access behind a trait so handlers never touch process globals

use std::collections::BTreeMap;

/// Read-only view over a set of environment variables
pub trait EnvLookup: Send + Sync + std::fmt::Debug {
    /// Returns the value of `key`, or `None` when it is not set
    fn get(&self, key: &str) -> Option<String>;

    /// Returns the names of every variable currently set
    fn names(&self) -> Vec<String>;
}

/// Reads straight from the process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvLookup for ProcessEnv {
    fn get(&self, key: &str) -> Option<String> {
        // Lossy like `names`, so a listed variable is never reported as unset
        std::env::var_os(key).map(|value| value.to_string_lossy().into_owned())
    }

    fn names(&self) -> Vec<String> {
        // Non UTF-8 names are still listed, lossily
        std::env::vars_os()
            .map(|(name, _)| name.to_string_lossy().into_owned())
            .collect()
    }
}

/// Fixed set of variables, used to substitute the environment in tests
#[derive(Debug, Clone, Default)]
pub struct StaticEnv {
    vars: BTreeMap<String, String>,
}

impl StaticEnv {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a variable
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(key.into(), value.into());
        self
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for StaticEnv {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

impl EnvLookup for StaticEnv {
    fn get(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }

    fn names(&self) -> Vec<String> {
        self.vars.keys().cloned().collect()
    }
}
