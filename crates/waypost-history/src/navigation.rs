//! Navigation requests

use serde::{Deserialize, Serialize};
use waypost_query::Params;

/// How a navigation lands in the host's stack
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NavigationMode {
    /// Add a new entry
    #[default]
    Push,
    /// Overwrite the active entry
    Replace,
}

impl NavigationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            NavigationMode::Push => "push",
            NavigationMode::Replace => "replace",
        }
    }
}

impl std::fmt::Display for NavigationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for NavigationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "push" => Ok(NavigationMode::Push),
            "replace" => Ok(NavigationMode::Replace),
            _ => Err(format!("Unknown navigation mode: {}", s)),
        }
    }
}

/// Query part of a navigation request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Search {
    /// Used exactly as given, e.g. `?id=3`
    Raw(String),
    /// Serialized with [`waypost_query::stringify`]
    Params(Params),
}

impl Search {
    /// Text appended to the pathname
    pub fn to_query_string(&self) -> String {
        match self {
            Search::Raw(raw) => raw.clone(),
            Search::Params(params) => waypost_query::stringify(params),
        }
    }
}

impl From<&str> for Search {
    fn from(raw: &str) -> Self {
        Search::Raw(raw.to_string())
    }
}

impl From<String> for Search {
    fn from(raw: String) -> Self {
        Search::Raw(raw)
    }
}

impl From<Params> for Search {
    fn from(params: Params) -> Self {
        Search::Params(params)
    }
}

/// A single navigation request.
///
/// Every field is optional: a missing pathname keeps the current one, a
/// missing search clears the query and the mode defaults to push.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Navigation {
    pub pathname: Option<String>,
    pub search: Option<Search>,
    pub mode: NavigationMode,
}

impl Navigation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push navigation to `pathname`
    pub fn to(pathname: impl Into<String>) -> Self {
        Self {
            pathname: Some(pathname.into()),
            ..Self::default()
        }
    }

    pub fn search(mut self, search: impl Into<Search>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn mode(mut self, mode: NavigationMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn replace(self) -> Self {
        self.mode(NavigationMode::Replace)
    }
}

impl From<&str> for Navigation {
    fn from(pathname: &str) -> Self {
        Navigation::to(pathname)
    }
}

impl From<String> for Navigation {
    fn from(pathname: String) -> Self {
        Navigation::to(pathname)
    }
}

impl<P, S> From<(P, S)> for Navigation
where
    P: Into<String>,
    S: Into<Search>,
{
    fn from((pathname, search): (P, S)) -> Self {
        Navigation::to(pathname).search(search)
    }
}
