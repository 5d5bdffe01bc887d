use std::{
    cell::{Cell, RefCell},
    collections::{BTreeMap, BTreeSet},
};

use crate::{error::Error, offline::CacheBackend};

/// A request handled by the [`MemoryBackend`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryRequest {
    /// The HTTP method.
    pub method: String,
    /// The request URL. Also the cache key.
    pub url: String,
}

impl MemoryRequest {
    /// Constructs a new [`MemoryRequest`].
    pub fn new(method: &str, url: &str) -> Self {
        Self {
            method: method.to_ascii_uppercase(),
            url: url.into(),
        }
    }

    /// Constructs a `GET` request.
    pub fn get(url: &str) -> Self {
        Self::new("GET", url)
    }
}

/// A response produced by the [`MemoryBackend`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryResponse {
    /// The HTTP status.
    pub status: u16,
    /// The response body.
    pub body: String,
}

impl MemoryResponse {
    /// Constructs a `200 OK` response.
    pub fn ok(body: &str) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }
}

/// Network origin and cache storage state.
#[derive(Debug, Default)]
struct MemoryState {
    /// What the network answers, by URL.
    origin: BTreeMap<String, MemoryResponse>,
    /// URLs whose fetch fails at the transport level.
    failing: BTreeSet<String>,
    /// Whether every fetch fails.
    offline: bool,
    /// Named caches, in creation order.
    caches: Vec<(String, BTreeMap<String, MemoryResponse>)>,
}

/// A [`CacheBackend`] that keeps both the network and the caches in memory.
///
/// Useful outside the browser, and for exercising the worker lifecycle
/// deterministically.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    /// Shared state.
    state: RefCell<MemoryState>,
    /// Number of network fetches performed.
    network_hits: Cell<usize>,
    /// Number of skip-waiting requests.
    skip_waiting_calls: Cell<usize>,
    /// Number of successful client claims.
    claim_calls: Cell<usize>,
    /// Whether claiming clients fails.
    refuse_claim: Cell<bool>,
    /// Whether storing into a cache fails.
    refuse_store: Cell<bool>,
}

impl MemoryBackend {
    /// Constructs an empty [`MemoryBackend`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the network answer `url` with `body`.
    pub fn serve(&self, url: &str, body: &str) {
        let mut state = self.state.borrow_mut();
        state.failing.remove(url);
        state.origin.insert(url.into(), MemoryResponse::ok(body));
    }

    /// Makes the network answer `url` with an empty body and `status`.
    pub fn serve_status(&self, url: &str, status: u16) {
        self.state.borrow_mut().origin.insert(
            url.into(),
            MemoryResponse {
                status,
                body: String::new(),
            },
        );
    }

    /// Makes every fetch of `url` fail.
    pub fn fail(&self, url: &str) {
        self.state.borrow_mut().failing.insert(url.into());
    }

    /// Makes every fetch fail.
    pub fn go_offline(&self) {
        self.state.borrow_mut().offline = true;
    }

    /// Restores the network.
    pub fn go_online(&self) {
        self.state.borrow_mut().offline = false;
    }

    /// Makes claiming clients fail or succeed.
    pub fn refuse_claim(&self, refuse: bool) {
        self.refuse_claim.set(refuse);
    }

    /// Makes storing into caches fail or succeed, like an exhausted quota.
    pub fn refuse_store(&self, refuse: bool) {
        self.refuse_store.set(refuse);
    }

    /// Stores an entry directly, creating the cache if needed.
    pub fn seed_cache(&self, cache: &str, url: &str, body: &str) {
        let mut state = self.state.borrow_mut();
        Self::open(&mut state, cache).insert(url.into(), MemoryResponse::ok(body));
    }

    /// Returns the names of all caches, in creation order.
    pub fn cache_names_snapshot(&self) -> Vec<String> {
        self.state
            .borrow()
            .caches
            .iter()
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Returns the URLs stored in the named cache.
    pub fn cached_paths(&self, cache: &str) -> Vec<String> {
        self.state
            .borrow()
            .caches
            .iter()
            .find(|(name, _)| name == cache)
            .map(|(_, entries)| entries.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Returns the number of network fetches performed.
    pub fn network_hits(&self) -> usize {
        self.network_hits.get()
    }

    /// Returns the number of skip-waiting requests.
    pub fn skip_waiting_calls(&self) -> usize {
        self.skip_waiting_calls.get()
    }

    /// Returns the number of successful client claims.
    pub fn claim_calls(&self) -> usize {
        self.claim_calls.get()
    }

    fn open<'a>(
        state: &'a mut MemoryState,
        cache: &str,
    ) -> &'a mut BTreeMap<String, MemoryResponse> {
        let index = match state.caches.iter().position(|(name, _)| name == cache) {
            Some(index) => index,
            None => {
                state.caches.push((cache.into(), BTreeMap::new()));
                state.caches.len() - 1
            }
        };
        &mut state.caches[index].1
    }
}

impl CacheBackend for MemoryBackend {
    type Request = MemoryRequest;
    type Response = MemoryResponse;

    fn request(&self, path: &str) -> Result<Self::Request, Error> {
        Ok(MemoryRequest::get(path))
    }

    fn is_get(request: &Self::Request) -> bool {
        request.method == "GET"
    }

    fn url(request: &Self::Request) -> String {
        request.url.clone()
    }

    fn is_success(response: &Self::Response) -> bool {
        (200..300).contains(&response.status)
    }

    async fn fetch(&self, request: &Self::Request) -> Result<Self::Response, Error> {
        self.network_hits.set(self.network_hits.get() + 1);
        let state = self.state.borrow();
        let failed = |reason: &str| Error::FetchFailed {
            url: request.url.clone(),
            reason: reason.into(),
        };
        if state.offline || state.failing.contains(&request.url) {
            return Err(failed("network unreachable"));
        }
        Ok(state
            .origin
            .get(&request.url)
            .cloned()
            .unwrap_or(MemoryResponse {
                status: 404,
                body: String::new(),
            }))
    }

    async fn cache_names(&self) -> Result<Vec<String>, Error> {
        Ok(self.cache_names_snapshot())
    }

    async fn store(
        &self,
        cache: &str,
        entries: Vec<(Self::Request, Self::Response)>,
    ) -> Result<(), Error> {
        if self.refuse_store.get() {
            return Err(Error::Cache {
                cache: cache.into(),
                reason: "QuotaExceededError: storage is full".into(),
            });
        }
        let mut state = self.state.borrow_mut();
        let store = Self::open(&mut state, cache);
        for (request, response) in entries {
            store.insert(request.url, response);
        }
        Ok(())
    }

    async fn lookup(
        &self,
        cache: &str,
        request: &Self::Request,
    ) -> Result<Option<Self::Response>, Error> {
        Ok(self
            .state
            .borrow()
            .caches
            .iter()
            .find(|(name, _)| name == cache)
            .and_then(|(_, entries)| entries.get(&request.url).cloned()))
    }

    async fn delete(&self, cache: &str) -> Result<bool, Error> {
        let mut state = self.state.borrow_mut();
        let before = state.caches.len();
        state.caches.retain(|(name, _)| name != cache);
        Ok(state.caches.len() != before)
    }

    async fn skip_waiting(&self) -> Result<(), Error> {
        self.skip_waiting_calls.set(self.skip_waiting_calls.get() + 1);
        Ok(())
    }

    async fn claim_clients(&self) -> Result<(), Error> {
        if self.refuse_claim.get() {
            return Err(Error::Js("InvalidStateError: clients cannot be claimed".into()));
        }
        self.claim_calls.set(self.claim_calls.get() + 1);
        Ok(())
    }
}
