use std::collections::BTreeMap;
use std::env;

/// Point-in-time copy of the process environment.
///
/// Variables whose name or value is not valid UTF-8 are skipped when the
/// snapshot is captured; the dev-server tool never reads them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvSnapshot {
    vars: BTreeMap<String, String>,
}

impl EnvSnapshot {
    /// Captures the current process environment.
    #[must_use]
    pub fn capture() -> Self {
        env::vars_os()
            .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
            .collect()
    }

    /// Returns the raw value of `name`, including empty strings.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    /// Returns the value of `name` when it is set to a non-empty string.
    #[must_use]
    pub fn non_empty(&self, name: &str) -> Option<&str> {
        self.get(name).filter(|value| !value.is_empty())
    }

    /// Returns the first variable in `names` holding a non-empty value,
    /// paired with the name it was read from.
    #[must_use]
    pub fn first_non_empty<'a>(&'a self, names: &[&'a str]) -> Option<(&'a str, &'a str)> {
        names
            .iter()
            .find_map(|name| self.non_empty(name).map(|value| (*name, value)))
    }

    /// Consumes the snapshot, yielding the underlying map.
    #[must_use]
    pub fn into_map(self) -> BTreeMap<String, String> {
        self.vars
    }
}

impl<K, V> FromIterator<(K, V)> for EnvSnapshot
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}
