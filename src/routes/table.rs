//! Route lookup.

use std::collections::HashMap;

use crate::routes::behavior::Behavior;

/// Immutable map from request path to scripted behavior.
///
/// Built once at boot and shared read-only by every connection; unmatched
/// paths resolve to [`Behavior::Reject`].
#[derive(Debug)]
pub struct RouteTable {
    routes: HashMap<&'static str, Behavior>,
}

impl RouteTable {
    /// Build the fixed route set.
    pub fn new() -> Self {
        let routes = HashMap::from([
            ("/binary", Behavior::Binary),
            ("/counter", Behavior::Counter),
            ("/heartbeat", Behavior::Heartbeat),
            ("/hello", Behavior::Hello),
        ]);
        Self { routes }
    }

    /// Resolve a request path to its behavior. Exact match only.
    pub fn resolve(&self, path: &str) -> Behavior {
        self.routes.get(path).copied().unwrap_or(Behavior::Reject)
    }

    /// Number of registered routes (the reject fallback is not a route).
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::new()
    }
}
