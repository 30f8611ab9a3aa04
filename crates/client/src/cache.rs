//! Last-known server state of money requests, keyed by id.
//!
//! Tabs (`kind` x `status`) hold ids in server order. Entries are only ever
//! replaced by a copy the server returned; nothing here changes a status on
//! its own.

use std::collections::HashMap;

use api_types::request::{MoneyRequestView, RequestKind, RequestPage, RequestStatus};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Freshness {
    /// Matches the last server response.
    Fresh,
    /// A call touching this entry failed or it changed elsewhere; reload
    /// before trusting it.
    Stale,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CachedRequest {
    pub request: MoneyRequestView,
    pub freshness: Freshness,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TabKey {
    pub kind: RequestKind,
    pub status: RequestStatus,
}

impl TabKey {
    pub fn new(kind: RequestKind, status: RequestStatus) -> Self {
        Self { kind, status }
    }

    fn matches(&self, request: &MoneyRequestView) -> bool {
        request.kind() == self.kind && request.status == self.status
    }
}

#[derive(Clone, Debug)]
struct Tab {
    ids: Vec<Uuid>,
    page: u64,
    total: u64,
    total_pages: u64,
    freshness: Freshness,
}

#[derive(Debug, Default)]
pub struct RequestCache {
    entries: HashMap<Uuid, CachedRequest>,
    tabs: HashMap<TabKey, Tab>,
}

impl RequestCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a page fetched for `key`. Items that do not belong to the tab
    /// are dropped; the number dropped is returned.
    pub fn load_tab(&mut self, key: TabKey, page: RequestPage) -> usize {
        let mut ids = Vec::with_capacity(page.items.len());
        let mut dropped = 0;
        for request in page.items {
            if !key.matches(&request) {
                tracing::warn!(
                    id = %request.id,
                    status = request.status.as_str(),
                    tab = key.status.as_str(),
                    "dropping request listed under the wrong tab"
                );
                dropped += 1;
                continue;
            }
            ids.push(request.id);
            self.entries.insert(
                request.id,
                CachedRequest {
                    request,
                    freshness: Freshness::Fresh,
                },
            );
        }
        self.tabs.insert(
            key,
            Tab {
                ids,
                page: page.page,
                total: page.total,
                total_pages: page.total_pages,
                freshness: Freshness::Fresh,
            },
        );
        dropped
    }

    /// Requests of a loaded tab, in server order.
    pub fn tab(&self, key: TabKey) -> Vec<&MoneyRequestView> {
        let Some(tab) = self.tabs.get(&key) else {
            return Vec::new();
        };
        tab.ids
            .iter()
            .filter_map(|id| self.entries.get(id))
            .map(|cached| &cached.request)
            .filter(|request| key.matches(request))
            .collect()
    }

    /// `(page, total, total_pages)` of a loaded tab.
    pub fn tab_position(&self, key: TabKey) -> Option<(u64, u64, u64)> {
        self.tabs
            .get(&key)
            .map(|tab| (tab.page, tab.total, tab.total_pages))
    }

    pub fn tab_freshness(&self, key: TabKey) -> Option<Freshness> {
        self.tabs.get(&key).map(|tab| tab.freshness)
    }

    /// Case-insensitive substring search over the loaded page of a tab:
    /// description, id and, for transfers, the account holder name.
    pub fn search(&self, key: TabKey, query: &str) -> Vec<&MoneyRequestView> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return self.tab(key);
        }
        self.tab(key)
            .into_iter()
            .filter(|request| {
                request.description.to_lowercase().contains(&needle)
                    || request.id.to_string().contains(&needle)
                    || request
                        .account_holder_name()
                        .is_some_and(|name| name.to_lowercase().contains(&needle))
            })
            .collect()
    }

    pub fn get(&self, id: Uuid) -> Option<&CachedRequest> {
        self.entries.get(&id)
    }

    pub fn mark_stale(&mut self, id: Uuid) {
        if let Some(cached) = self.entries.get_mut(&id) {
            cached.freshness = Freshness::Stale;
        }
    }

    pub fn mark_tab_stale(&mut self, key: TabKey) {
        if let Some(tab) = self.tabs.get_mut(&key) {
            tab.freshness = Freshness::Stale;
        }
    }

    /// Replaces an entry with the server's copy.
    ///
    /// When the status changed, the id leaves its old tab and both the old
    /// and the new tab are flagged stale.
    pub fn replace(&mut self, request: MoneyRequestView) {
        let kind = request.kind();
        let previous = self
            .entries
            .get(&request.id)
            .map(|cached| cached.request.status);

        if let Some(previous) = previous
            && previous != request.status
        {
            let old = TabKey::new(kind, previous);
            if let Some(tab) = self.tabs.get_mut(&old) {
                tab.ids.retain(|id| *id != request.id);
            }
            self.mark_tab_stale(old);
        }
        self.mark_tab_stale(TabKey::new(kind, request.status));

        self.entries.insert(
            request.id,
            CachedRequest {
                request,
                freshness: Freshness::Fresh,
            },
        );
    }
}
