//! Request-scoped context.
//!
//! # Data Flow
//! ```text
//! Matched Request (head only)
//!     → cookies.rs  (parse Cookie header → CookieStore)
//!     → location.rs (derive url/protocol/query/path/hostname)
//!     → RequestContext { headers, location, cookies, client }
//!     → handed to the render engine as Arc<RequestContext>
//!     → fetch layer holds only a Weak back-reference
//! ```
//!
//! # Design Decisions
//! - Built fresh for every matched request; never cached, pooled or
//!   reused — a stale context would read cookies or location from the
//!   wrong request
//! - Dropped when the render settles; outbound fetches must not extend
//!   its lifetime (hence `Weak` in the fetch layer)
//! - The shared outbound client rides along so components can fetch
//!   without reaching for process-wide state

pub mod cookies;
pub mod location;

use std::sync::Arc;

use axum::http::request::Parts;
use axum::http::HeaderMap;

pub use cookies::CookieStore;
pub use location::Location;

use crate::fetch::{DataFetcher, HttpClient};

/// Factory producing the cookie store for a request head.
pub type CookieFactory = Arc<dyn Fn(&Parts) -> CookieStore + Send + Sync>;

/// Factory producing the location descriptor for a request head.
pub type LocationFactory = Arc<dyn Fn(&Parts) -> Location + Send + Sync>;

/// State scoped to exactly one in-flight request.
pub struct RequestContext {
    headers: HeaderMap,
    host: Option<String>,
    location: Location,
    cookies: CookieStore,
    client: HttpClient,
}

impl RequestContext {
    /// Build a context with the default cookie and location factories.
    pub fn from_parts(parts: &Parts, client: HttpClient) -> Arc<Self> {
        Self::build(parts, client, None, None)
    }

    pub(crate) fn build(
        parts: &Parts,
        client: HttpClient,
        cookie_factory: Option<&CookieFactory>,
        location_factory: Option<&LocationFactory>,
    ) -> Arc<Self> {
        let cookies = match cookie_factory {
            Some(factory) => factory(parts),
            None => CookieStore::from_parts(parts),
        };
        let location = match location_factory {
            Some(factory) => factory(parts),
            None => Location::from_parts(parts),
        };
        Arc::new(Self {
            headers: parts.headers.clone(),
            host: location::host_of(parts).map(str::to_string),
            location,
            cookies,
            client,
        })
    }

    /// Headers of the original inbound request.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Location the browser requested.
    pub fn location(&self) -> &Location {
        &self.location
    }

    /// Cookie store bound to this request/response pair.
    pub fn cookies(&self) -> &CookieStore {
        &self.cookies
    }

    /// Origin of the inbound request (`protocol://host`, host including
    /// any port), used to qualify relative outbound URLs. The host is
    /// the `Host` header, or the URI authority on HTTP/2.
    ///
    /// `None` when the request carried no usable host; a relative fetch
    /// then stays relative and fails at send time instead of here.
    pub fn base_url(&self) -> Option<String> {
        self.host
            .as_ref()
            .map(|host| format!("{}://{}", self.location.protocol, host))
    }

    /// A data fetcher scoped to this request. Holds only a weak
    /// reference back to the context.
    pub fn fetcher(self: &Arc<Self>) -> DataFetcher {
        DataFetcher::new(Arc::downgrade(self), self.client.clone())
    }
}
