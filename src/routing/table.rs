//! Route table: compiled lookup from request paths to view components.
//!
//! # Responsibilities
//! - Compile route configs into a radix tree at startup
//! - Look up the matching route for a request path
//! - Return matched route plus decoded parameters, or explicit no-match
//!
//! # Design Decisions
//! - One shared tree for all routes; page routes are method-agnostic,
//!   matching on path alone
//! - O(path-length) lookup via `matchit`, no allocations until a match
//! - Immutable after construction (thread-safe without locks)

use std::collections::HashMap;

use matchit::Router as PathTree;

use crate::config::schema::RouteConfig;
use crate::config::validation::ValidationError;
use crate::routing::RouteParams;

/// A compiled route: name, pattern and the component it renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub name: String,
    pub pattern: String,
    pub component: String,
}

/// The result of a successful route lookup.
#[derive(Debug, Clone)]
pub struct RouteMatch {
    pub route: Route,
    pub params: RouteParams,
}

/// Immutable route table, compiled once at startup.
#[derive(Debug)]
pub struct RouteTable {
    tree: PathTree<usize>,
    routes: Vec<Route>,
    by_name: HashMap<String, usize>,
}

impl RouteTable {
    /// Compile a table from route configs.
    ///
    /// Duplicate names and empty patterns are caught by
    /// [`validate_config`](crate::config::validate_config) beforehand;
    /// this reports pattern syntax errors the tree itself rejects.
    pub fn from_config(configs: &[RouteConfig]) -> Result<Self, ValidationError> {
        let mut tree = PathTree::new();
        let mut routes = Vec::with_capacity(configs.len());
        let mut by_name = HashMap::with_capacity(configs.len());

        for (index, config) in configs.iter().enumerate() {
            tree.insert(&config.pattern, index).map_err(|e| {
                ValidationError::InvalidPattern {
                    name: config.name.clone(),
                    reason: e.to_string(),
                }
            })?;
            by_name.insert(config.name.clone(), index);
            routes.push(Route {
                name: config.name.clone(),
                pattern: config.pattern.clone(),
                component: config.component.clone(),
            });
        }

        Ok(Self { tree, routes, by_name })
    }

    /// Look up the route matching `path`.
    ///
    /// Returns `None` when nothing matches; the caller is expected to
    /// delegate the request onward without side effects.
    pub fn resolve(&self, path: &str) -> Option<RouteMatch> {
        let matched = self.tree.at(path).ok()?;
        let route = self.routes[*matched.value].clone();
        let params = matched
            .params
            .iter()
            .map(|(k, v)| (k.to_owned(), v.to_owned()))
            .collect();
        Some(RouteMatch { route, params })
    }

    /// Look up a route by name (used for redirect path generation).
    pub fn get(&self, name: &str) -> Option<&Route> {
        self.by_name.get(name).map(|&index| &self.routes[index])
    }

    /// Number of compiled routes.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
