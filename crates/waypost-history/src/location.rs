//! Location snapshots

use serde::{Deserialize, Serialize};
use waypost_query::Params;

use crate::host::HostLocation;

/// Point-in-time read of the active entry.
///
/// Built fresh on every request and never updated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub pathname: String,
    /// Raw query string including `?`, or `""`
    pub search: String,
    /// `search` parsed into key/value pairs
    pub params: Params,
}

impl From<HostLocation> for Location {
    fn from(location: HostLocation) -> Self {
        let params = waypost_query::parse(location.search.as_str());

        Self {
            pathname: location.pathname,
            search: location.search,
            params,
        }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.pathname, self.search)
    }
}
