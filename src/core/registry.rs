//! Id registry and deferred reference resolution.
//!
//! Builders register every item that carries an `id` as soon as the item is
//! finished, and queue every URL they read. References are only checked once
//! the whole document exists, since forward references are legal.

use std::collections::HashMap;

use super::{DiagnosticKind, Diagnostics};
use crate::dom::Handle;

/// Where a reference was read from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReferenceSite {
    /// Raw URL or id as written in the document.
    pub url: String,
    /// Element holding the reference.
    pub element: String,
    /// Attribute (or child element) holding the reference.
    pub attribute: String,
}

/// Id to handle map plus the queue of references awaiting resolution.
#[derive(Clone, Debug, Default)]
pub struct Registry {
    ids: HashMap<String, Handle>,
    pending: Vec<ReferenceSite>,
}

/// Id part of a same-document URL.
///
/// `#id` and bare `id` yield `id`; URLs pointing into another document
/// (`other.dae#id`) and empty strings yield `None`.
pub fn fragment(url: &str) -> Option<&str> {
    let url = url.trim();
    let id = match url.split_once('#') {
        Some(("", id)) => id,
        Some(_) => return None,
        None => url,
    };
    (!id.is_empty()).then_some(id)
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `id`. Returns false and records a `DuplicateId` warning if
    /// the id is already taken; the earlier registration is kept.
    pub fn register(&mut self, id: &str, handle: Handle, element: &str, diags: &mut Diagnostics<'_>) -> bool {
        if let Some(existing) = self.ids.get(id) {
            diags.warn(
                DiagnosticKind::DuplicateId,
                element,
                id,
                format!("id already registered for {existing:?}; keeping the first"),
            );
            return false;
        }
        self.ids.insert(id.to_string(), handle);
        true
    }

    /// Queue a reference for the resolution pass.
    pub fn reference(&mut self, url: &str, element: &str, attribute: &str) {
        self.pending.push(ReferenceSite {
            url: url.to_string(),
            element: element.to_string(),
            attribute: attribute.to_string(),
        });
    }

    /// Look up a registered id.
    pub fn get(&self, id: &str) -> Option<Handle> {
        self.ids.get(id).copied()
    }

    /// Resolve a URL (`#id` or bare id) against the registered ids.
    pub fn resolve(&self, url: &str) -> Option<Handle> {
        fragment(url).and_then(|id| self.get(id))
    }

    /// Check every queued reference. Unresolvable ones are returned and
    /// reported as `UnresolvedReference` warnings. Drains the queue.
    pub fn resolve_pending(&mut self, diags: &mut Diagnostics<'_>) -> Vec<ReferenceSite> {
        let pending = std::mem::take(&mut self.pending);
        let mut unresolved = Vec::new();
        for site in pending {
            if self.resolve(&site.url).is_some() {
                continue;
            }
            let why = if fragment(&site.url).is_none() {
                "URL does not point into this document"
            } else {
                "no element with this id"
            };
            diags.warn(
                DiagnosticKind::UnresolvedReference,
                &site.element,
                &site.url,
                format!("{} '{}': {}", site.attribute, site.url, why),
            );
            unresolved.push(site);
        }
        unresolved
    }

    /// Number of references still queued.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Number of registered ids.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Check if no ids are registered.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Iterate over registered ids.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Handle)> {
        self.ids.iter().map(|(k, v)| (k.as_str(), *v))
    }
}
