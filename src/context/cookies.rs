//! Per-request cookie store.
//!
//! # Responsibilities
//! - Parse the inbound `Cookie` header(s) once, at context construction
//! - Serve reads during the render from that snapshot
//! - Queue `Set-Cookie` values for whichever response the render
//!   settles into (markup, redirect, fallback, error)
//!
//! # Design Decisions
//! - Bound to exactly one request/response pair; never shared, never
//!   reused
//! - Writes are visible to later reads within the same render
//! - A mutation both updates the snapshot and queues a `Set-Cookie`

use std::collections::HashMap;
use std::sync::Mutex;

use axum::http::header::COOKIE;
use axum::http::request::Parts;

/// Cookie store scoped to a single request/response pair.
#[derive(Debug, Default)]
pub struct CookieStore {
    inner: Mutex<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    values: HashMap<String, String>,
    pending: Vec<String>,
}

impl CookieStore {
    /// Parse the inbound `Cookie` header(s) into a fresh store.
    pub fn from_parts(parts: &Parts) -> Self {
        let mut values = HashMap::new();
        for header in parts.headers.get_all(COOKIE) {
            let Ok(raw) = header.to_str() else { continue };
            for pair in raw.split(';') {
                if let Some((name, value)) = pair.split_once('=') {
                    values.insert(name.trim().to_string(), value.trim().to_string());
                }
            }
        }
        Self {
            inner: Mutex::new(Inner { values, pending: Vec::new() }),
        }
    }

    /// Value of a cookie, as the browser sent it (or as set during this render).
    pub fn get(&self, name: &str) -> Option<String> {
        self.inner.lock().unwrap().values.get(name).cloned()
    }

    /// Snapshot of all cookie values.
    pub fn all(&self) -> HashMap<String, String> {
        self.inner.lock().unwrap().values.clone()
    }

    /// Set a cookie: visible to later reads in this render, and queued
    /// as a `Set-Cookie` header on the settled response.
    pub fn set(&self, name: &str, value: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner.values.insert(name.to_string(), value.to_string());
        inner.pending.push(format!("{name}={value}; Path=/"));
    }

    /// Remove a cookie, queueing an expiry for the browser.
    pub fn remove(&self, name: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner.values.remove(name);
        inner.pending.push(format!("{name}=; Path=/; Max-Age=0"));
    }

    /// Drain the queued `Set-Cookie` values. Called once when the
    /// render settles.
    pub fn take_pending(&self) -> Vec<String> {
        std::mem::take(&mut self.inner.lock().unwrap().pending)
    }
}
