//! Path generation: the inverse of route matching.
//!
//! Redirect aborts name a route rather than a path; the concrete
//! location emitted in the 302 response is generated here from the
//! route's own pattern, so a redirect can never point at a path the
//! table would not match.

use url::form_urlencoded;

use crate::routing::table::RouteTable;
use crate::routing::{QueryParams, RouteParams};

/// Failure to generate a concrete path for a named route.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    #[error("unknown route `{0}`")]
    UnknownRoute(String),

    #[error("route `{route}` is missing a value for parameter `{param}`")]
    MissingParam { route: String, param: String },
}

impl RouteTable {
    /// Generate the path for `name`, substituting `{param}` segments
    /// from `params` and appending `query` as a query string.
    ///
    /// Query keys are serialized in sorted order so generated paths are
    /// deterministic.
    pub fn make_path(
        &self,
        name: &str,
        params: &RouteParams,
        query: &QueryParams,
    ) -> Result<String, PathError> {
        let route = self
            .get(name)
            .ok_or_else(|| PathError::UnknownRoute(name.to_string()))?;

        let mut path = String::with_capacity(route.pattern.len());
        for segment in route.pattern.split('/') {
            if segment.is_empty() {
                continue;
            }
            path.push('/');
            match parse_param(segment) {
                Some(param) => {
                    let value = params.get(param).ok_or_else(|| PathError::MissingParam {
                        route: route.name.clone(),
                        param: param.to_string(),
                    })?;
                    path.push_str(value);
                }
                None => path.push_str(segment),
            }
        }
        if path.is_empty() {
            path.push('/');
        }

        if !query.is_empty() {
            let mut pairs: Vec<_> = query.iter().collect();
            pairs.sort_by_key(|(k, _)| k.as_str());
            let mut serializer = form_urlencoded::Serializer::new(String::new());
            for (k, v) in pairs {
                serializer.append_pair(k, v);
            }
            path.push('?');
            path.push_str(&serializer.finish());
        }

        Ok(path)
    }
}

/// Returns the parameter name for `{id}` / `{*rest}` segments.
fn parse_param(segment: &str) -> Option<&str> {
    let inner = segment.strip_prefix('{')?.strip_suffix('}')?;
    Some(inner.strip_prefix('*').unwrap_or(inner))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::RouteConfig;
    use std::collections::HashMap;

    fn table() -> RouteTable {
        RouteTable::from_config(&[
            RouteConfig::new("home", "/", "Home"),
            RouteConfig::new("profile", "/profile/{id}", "Profile"),
            RouteConfig::new("docs", "/docs/{*rest}", "Docs"),
        ])
        .unwrap()
    }

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn static_route_generates_its_pattern() {
        let path = table().make_path("home", &params(&[]), &params(&[])).unwrap();
        assert_eq!(path, "/");
    }

    #[test]
    fn params_are_substituted() {
        let path = table()
            .make_path("profile", &params(&[("id", "7")]), &params(&[]))
            .unwrap();
        assert_eq!(path, "/profile/7");
    }

    #[test]
    fn catch_all_params_are_substituted() {
        let path = table()
            .make_path("docs", &params(&[("rest", "guide/intro")]), &params(&[]))
            .unwrap();
        assert_eq!(path, "/docs/guide/intro");
    }

    #[test]
    fn query_is_appended_sorted_and_encoded() {
        let path = table()
            .make_path(
                "profile",
                &params(&[("id", "7")]),
                &params(&[("tab", "posts"), ("q", "a b")]),
            )
            .unwrap();
        assert_eq!(path, "/profile/7?q=a+b&tab=posts");
    }

    #[test]
    fn unknown_route_is_an_error() {
        let err = table()
            .make_path("nope", &params(&[]), &params(&[]))
            .unwrap_err();
        assert_eq!(err, PathError::UnknownRoute("nope".into()));
    }

    #[test]
    fn missing_param_is_an_error() {
        let err = table()
            .make_path("profile", &params(&[]), &params(&[]))
            .unwrap_err();
        assert!(matches!(err, PathError::MissingParam { .. }));
    }

    #[test]
    fn generated_paths_round_trip_through_resolve() {
        let table = table();
        let path = table
            .make_path("profile", &params(&[("id", "42")]), &params(&[]))
            .unwrap();
        let m = table.resolve(&path).unwrap();
        assert_eq!(m.route.name, "profile");
        assert_eq!(m.params.get("id").map(String::as_str), Some("42"));
    }
}
