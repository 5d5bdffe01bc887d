//! ## Offline asset cache
//!
//! The application shell is served from a versioned cache so the page keeps
//! working without a network connection. Each worker instance moves through
//! an explicit lifecycle:
//!
//! ```text
//! Parsed ──install──▶ Installing ──ok──▶ Installed ──activate──▶ Activating ──ok──▶ Active
//!   │                      │                                          │          ▲
//!   │                      └──err──▶ Redundant          Installed ◀──err┘          │
//!   └──────────────────────────── resume (version cache exists) ───────────────────┘
//! ```
//!
//! - Installing fetches every manifest path before anything is written. A
//!   single failed fetch aborts the install and leaves all existing caches
//!   untouched. The backend writes the entries all or nothing.
//! - Activating claims all open clients, then deletes every cache whose name
//!   is not the manifest version. A refused claim deletes nothing, so the
//!   previous worker keeps a complete cache.
//! - Active workers answer `GET` requests from the current cache and fall
//!   back to the network on a miss. Other methods are never intercepted.
//! - Browsers stop idle workers and start the script again for the next
//!   request, without replaying install or activate. A fresh instance whose
//!   version cache already exists resumes as active on its first request.
//!
//! The lifecycle is generic over a [`CacheBackend`], so it runs the same way
//! against the browser's `CacheStorage` and against the in-memory
//! [`MemoryBackend`].

use std::{cell::Cell, rc::Rc};

use futures_util::future::try_join_all;

use crate::error::Error;

/// In-memory backend.
pub mod memory;

/// Service worker backend.
pub mod service_worker;

pub use memory::{MemoryBackend, MemoryRequest, MemoryResponse};

/// Cache version shipped with the current build.
///
/// Bump it whenever a cached asset changes, or stale assets are served
/// indefinitely.
pub const CACHE_VERSION: &str = "0FluffStyle-v1-3-cache";

/// Assets that make up the application shell.
pub const SHELL_ASSETS: &[&str] = &[
    "./",
    "index.html",
    "script.js",
    "style.css",
    "manifest.json",
    "icon.png",
];

/// A cache version and the resources it must contain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheManifest {
    /// Opaque cache identifier, compared for equality only.
    version: String,
    /// Resource paths, in fetch order.
    paths: Vec<String>,
}

impl Default for CacheManifest {
    fn default() -> Self {
        Self::new(CACHE_VERSION).paths(SHELL_ASSETS)
    }
}

impl CacheManifest {
    /// Constructs an empty [`CacheManifest`] for the given version.
    pub fn new(version: &str) -> Self {
        Self {
            version: version.into(),
            paths: Vec::new(),
        }
    }

    /// Appends a resource path. Duplicates are ignored.
    pub fn path(mut self, path: &str) -> Self {
        if !self.paths.iter().any(|p| p == path) {
            self.paths.push(path.into());
        }
        self
    }

    /// Appends several resource paths.
    pub fn paths(self, paths: &[&str]) -> Self {
        paths.iter().fold(self, |manifest, path| manifest.path(path))
    }

    /// Returns the cache version.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Returns the resource paths.
    pub fn resources(&self) -> &[String] {
        &self.paths
    }
}

/// Lifecycle state of a worker instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    /// Created, install not started.
    Parsed,
    /// Populating the cache.
    Installing,
    /// Cache populated, activation not started.
    Installed,
    /// Purging stale caches and claiming clients.
    Activating,
    /// Serving requests.
    Active,
    /// Install failed; the instance never serves.
    Redundant,
}

/// How a request was answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome<R> {
    /// Served from the current cache.
    Cached(R),
    /// Cache miss, served from the network.
    Network(R),
    /// Not intercepted; the browser handles the request itself.
    Bypass,
}

impl<R> FetchOutcome<R> {
    /// Returns the response, if the request was intercepted.
    pub fn into_response(self) -> Option<R> {
        match self {
            FetchOutcome::Cached(response) | FetchOutcome::Network(response) => Some(response),
            FetchOutcome::Bypass => None,
        }
    }
}

/// Cache storage, network and client control used by the worker lifecycle.
#[allow(async_fn_in_trait)]
pub trait CacheBackend {
    /// A network request.
    type Request;
    /// A network response.
    type Response;

    /// Builds a `GET` request for a manifest path.
    fn request(&self, path: &str) -> Result<Self::Request, Error>;

    /// Returns whether the request uses the `GET` method.
    fn is_get(request: &Self::Request) -> bool;

    /// Returns the request URL, for diagnostics.
    fn url(request: &Self::Request) -> String;

    /// Returns whether the response has a success status.
    fn is_success(response: &Self::Response) -> bool;

    /// Performs a live network fetch.
    async fn fetch(&self, request: &Self::Request) -> Result<Self::Response, Error>;

    /// Returns the names of all existing caches.
    async fn cache_names(&self) -> Result<Vec<String>, Error>;

    /// Opens (or creates) the named cache and stores every entry in it.
    ///
    /// Either every entry is stored or the cache does not exist afterwards.
    async fn store(
        &self,
        cache: &str,
        entries: Vec<(Self::Request, Self::Response)>,
    ) -> Result<(), Error>;

    /// Looks up a request in the named cache. Never creates the cache.
    async fn lookup(
        &self,
        cache: &str,
        request: &Self::Request,
    ) -> Result<Option<Self::Response>, Error>;

    /// Deletes the named cache. Returns whether it existed.
    async fn delete(&self, cache: &str) -> Result<bool, Error>;

    /// Supersedes any waiting worker instance.
    async fn skip_waiting(&self) -> Result<(), Error>;

    /// Takes control of all open client pages.
    async fn claim_clients(&self) -> Result<(), Error>;
}

/// One worker instance, bound to a single manifest version.
#[derive(Debug)]
pub struct ServiceWorker<B> {
    /// The manifest this instance caches.
    manifest: CacheManifest,
    /// The platform backend.
    backend: Rc<B>,
    /// Lifecycle state.
    state: Cell<WorkerState>,
}

impl<B: CacheBackend> ServiceWorker<B> {
    /// Constructs a new [`ServiceWorker`] in the [`WorkerState::Parsed`] state.
    pub fn new(manifest: CacheManifest, backend: Rc<B>) -> Self {
        Self {
            manifest,
            backend,
            state: Cell::new(WorkerState::Parsed),
        }
    }

    /// Returns the lifecycle state.
    pub fn state(&self) -> WorkerState {
        self.state.get()
    }

    /// Returns the cache version of this instance.
    pub fn version(&self) -> &str {
        self.manifest.version()
    }

    /// Moves to `to` if the worker is currently in `from`.
    fn transition(
        &self,
        from: WorkerState,
        to: WorkerState,
        operation: &'static str,
    ) -> Result<(), Error> {
        let current = self.state.get();
        if current != from {
            return Err(Error::InvalidTransition {
                from: current,
                operation,
            });
        }
        self.state.set(to);
        Ok(())
    }

    /// Fetches every manifest resource and stores them in the versioned
    /// cache, then supersedes any waiting instance.
    ///
    /// On failure the worker becomes [`WorkerState::Redundant`] and no cache
    /// is created or modified.
    pub async fn install(&self) -> Result<(), Error> {
        self.transition(WorkerState::Parsed, WorkerState::Installing, "install")?;
        tracing::info!(version = self.version(), "installing offline cache");
        match self.populate().await {
            Ok(()) => {
                self.state.set(WorkerState::Installed);
                if let Err(error) = self.backend.skip_waiting().await {
                    tracing::warn!(%error, "unable to skip waiting");
                }
                Ok(())
            }
            Err(error) => {
                tracing::warn!(version = self.version(), %error, "offline cache install failed");
                self.state.set(WorkerState::Redundant);
                Err(error)
            }
        }
    }

    /// Fetches all resources, then writes them in one go.
    async fn populate(&self) -> Result<(), Error> {
        let requests = self
            .manifest
            .resources()
            .iter()
            .map(|path| self.backend.request(path))
            .collect::<Result<Vec<_>, _>>()?;
        let entries = try_join_all(requests.into_iter().map(|request| async move {
            let response = self.backend.fetch(&request).await?;
            if !B::is_success(&response) {
                return Err(Error::FetchFailed {
                    url: B::url(&request),
                    reason: "unsuccessful response status".into(),
                });
            }
            Ok((request, response))
        }))
        .await?;
        self.backend.store(self.version(), entries).await
    }

    /// Claims all clients, then deletes stale caches.
    ///
    /// If the claim fails, no cache is touched, the worker falls back to
    /// [`WorkerState::Installed`] and activation may be retried. Once clients
    /// are claimed the worker is [`WorkerState::Active`]; stale caches that
    /// could not be deleted are retried by the next activation.
    pub async fn activate(&self) -> Result<(), Error> {
        self.transition(WorkerState::Installed, WorkerState::Activating, "activate")?;
        if let Err(error) = self.backend.claim_clients().await {
            tracing::warn!(version = self.version(), %error, "offline cache activation failed");
            self.state.set(WorkerState::Installed);
            return Err(error);
        }
        self.state.set(WorkerState::Active);
        if let Err(error) = self.purge_stale().await {
            tracing::warn!(version = self.version(), %error, "unable to purge stale caches");
        }
        tracing::info!(version = self.version(), "offline cache active");
        Ok(())
    }

    /// Resumes a worker whose script was restarted by the browser.
    ///
    /// A [`WorkerState::Parsed`] worker becomes [`WorkerState::Active`] if
    /// its version cache already exists. Returns whether the worker is
    /// active afterwards.
    pub async fn resume(&self) -> Result<bool, Error> {
        if self.state.get() != WorkerState::Parsed {
            return Ok(self.state.get() == WorkerState::Active);
        }
        let names = self.backend.cache_names().await?;
        // install or activate may have run while the names were listed
        if self.state.get() != WorkerState::Parsed
            || !names.iter().any(|name| name == self.version())
        {
            return Ok(self.state.get() == WorkerState::Active);
        }
        self.state.set(WorkerState::Active);
        tracing::info!(version = self.version(), "resumed offline cache");
        Ok(true)
    }

    /// Deletes every cache that does not belong to this version.
    async fn purge_stale(&self) -> Result<(), Error> {
        let stale: Vec<String> = self
            .backend
            .cache_names()
            .await?
            .into_iter()
            .filter(|name| name != self.version())
            .collect();
        for name in &stale {
            tracing::debug!(cache = %name, "deleting stale cache");
        }
        try_join_all(stale.iter().map(|name| self.backend.delete(name))).await?;
        Ok(())
    }

    /// Answers an intercepted request.
    ///
    /// `GET` requests are matched against the current cache and fall back to
    /// the network; network responses are not cached. Everything else is
    /// left to the browser. A [`WorkerState::Parsed`] worker tries to
    /// [`resume`](Self::resume) first.
    pub async fn handle_fetch(
        &self,
        request: &B::Request,
    ) -> Result<FetchOutcome<B::Response>, Error> {
        if !B::is_get(request) {
            return Ok(FetchOutcome::Bypass);
        }
        if self.state.get() == WorkerState::Parsed {
            self.resume().await?;
        }
        let state = self.state.get();
        if state != WorkerState::Active {
            return Err(Error::InvalidTransition {
                from: state,
                operation: "serve from",
            });
        }
        if let Some(response) = self.backend.lookup(self.version(), request).await? {
            tracing::trace!(url = %B::url(request), "served from cache");
            return Ok(FetchOutcome::Cached(response));
        }
        tracing::debug!(url = %B::url(request), "cache miss");
        Ok(FetchOutcome::Network(self.backend.fetch(request).await?))
    }
}

/// Owns the active worker and swaps in new versions.
#[derive(Debug)]
pub struct Registration<B> {
    /// The platform backend.
    backend: Rc<B>,
    /// The worker currently serving requests.
    active: Option<Rc<ServiceWorker<B>>>,
}

impl<B: CacheBackend> Registration<B> {
    /// Constructs a new [`Registration`] with no active worker.
    pub fn new(backend: Rc<B>) -> Self {
        Self {
            backend,
            active: None,
        }
    }

    /// Returns the active worker.
    pub fn active(&self) -> Option<&ServiceWorker<B>> {
        self.active.as_deref()
    }

    /// Installs and activates a worker for `manifest`.
    ///
    /// Does nothing if the active worker already has this version. If the
    /// install fails, the previously active worker keeps serving.
    pub async fn update(&mut self, manifest: CacheManifest) -> Result<(), Error> {
        if self
            .active
            .as_ref()
            .is_some_and(|worker| worker.version() == manifest.version())
        {
            return Ok(());
        }
        let worker = Rc::new(ServiceWorker::new(manifest, Rc::clone(&self.backend)));
        worker.install().await?;
        worker.activate().await?;
        self.active = Some(worker);
        Ok(())
    }

    /// Routes a request through the active worker, or straight to the
    /// network when there is none.
    pub async fn fetch(&self, request: &B::Request) -> Result<FetchOutcome<B::Response>, Error> {
        match &self.active {
            Some(worker) => worker.handle_fetch(request).await,
            None => Ok(FetchOutcome::Network(self.backend.fetch(request).await?)),
        }
    }
}

#[cfg(test)]
mod tests {
    use pollster::block_on;

    use super::*;

    fn origin() -> Rc<MemoryBackend> {
        let backend = MemoryBackend::new();
        for path in SHELL_ASSETS {
            backend.serve(path, &format!("{path} v1"));
        }
        Rc::new(backend)
    }

    fn manifest(version: &str) -> CacheManifest {
        CacheManifest::new(version).paths(SHELL_ASSETS)
    }

    #[test]
    fn test_default_manifest() {
        let manifest = CacheManifest::default();
        assert_eq!(manifest.version(), CACHE_VERSION);
        assert_eq!(manifest.resources().len(), 6);
        assert_eq!(manifest.resources()[0], "./");
    }

    #[test]
    fn test_manifest_ignores_duplicate_paths() {
        let manifest = CacheManifest::new("v1").paths(&["a.js", "b.js", "a.js"]);
        assert_eq!(manifest.resources(), ["a.js", "b.js"]);
    }

    #[test]
    fn test_install_then_activate() {
        let backend = origin();
        let worker = ServiceWorker::new(manifest("v1"), Rc::clone(&backend));
        assert_eq!(worker.state(), WorkerState::Parsed);

        block_on(worker.install()).expect("install");
        assert_eq!(worker.state(), WorkerState::Installed);
        assert_eq!(backend.cached_paths("v1").len(), SHELL_ASSETS.len());
        assert_eq!(backend.skip_waiting_calls(), 1);

        block_on(worker.activate()).expect("activate");
        assert_eq!(worker.state(), WorkerState::Active);
        assert_eq!(backend.claim_calls(), 1);
    }

    #[test]
    fn test_new_version_replaces_old_cache() {
        let backend = origin();
        let mut registration = Registration::new(Rc::clone(&backend));
        block_on(registration.update(manifest("v1"))).expect("v1");
        backend.serve("index.html", "index.html v2");
        block_on(registration.update(manifest("v2"))).expect("v2");

        assert_eq!(backend.cache_names_snapshot(), ["v2"]);
        assert_eq!(registration.active().map(|w| w.version()), Some("v2"));

        let request = MemoryRequest::get("index.html");
        let outcome = block_on(registration.fetch(&request)).expect("fetch");
        assert_eq!(outcome, FetchOutcome::Cached(MemoryResponse::ok("index.html v2")));
    }

    #[test]
    fn test_failed_install_keeps_previous_cache() {
        let backend = origin();
        let mut registration = Registration::new(Rc::clone(&backend));
        block_on(registration.update(manifest("v1"))).expect("v1");

        backend.fail("style.css");
        let result = block_on(registration.update(manifest("v2")));
        assert!(matches!(result, Err(Error::FetchFailed { url, .. }) if url == "style.css"));

        assert_eq!(backend.cache_names_snapshot(), ["v1"]);
        assert_eq!(registration.active().map(|w| w.version()), Some("v1"));

        backend.go_offline();
        let request = MemoryRequest::get("style.css");
        let outcome = block_on(registration.fetch(&request)).expect("fetch");
        assert_eq!(outcome, FetchOutcome::Cached(MemoryResponse::ok("style.css v1")));
    }

    #[test]
    fn test_unsuccessful_status_fails_install() {
        let backend = origin();
        backend.serve_status("icon.png", 404);
        let worker = ServiceWorker::new(manifest("v1"), Rc::clone(&backend));
        assert!(block_on(worker.install()).is_err());
        assert_eq!(worker.state(), WorkerState::Redundant);
        assert!(backend.cache_names_snapshot().is_empty());
        assert_eq!(backend.skip_waiting_calls(), 0);
    }

    #[test]
    fn test_update_same_version_is_idempotent() {
        let backend = origin();
        let mut registration = Registration::new(Rc::clone(&backend));
        block_on(registration.update(manifest("v1"))).expect("first");
        let fetches = backend.network_hits();
        block_on(registration.update(manifest("v1"))).expect("second");
        assert_eq!(backend.network_hits(), fetches);
        assert_eq!(backend.cache_names_snapshot(), ["v1"]);
    }

    #[test]
    fn test_activation_purges_every_stale_cache() {
        let backend = origin();
        backend.seed_cache("v0", "index.html", "ancient");
        backend.seed_cache("unrelated", "x", "y");
        let worker = ServiceWorker::new(manifest("v1"), Rc::clone(&backend));
        block_on(worker.install()).expect("install");
        assert_eq!(backend.cache_names_snapshot(), ["v0", "unrelated", "v1"]);
        block_on(worker.activate()).expect("activate");
        assert_eq!(backend.cache_names_snapshot(), ["v1"]);
    }

    #[test]
    fn test_failed_claim_keeps_worker_installed() {
        let backend = origin();
        backend.seed_cache("v0", "index.html", "ancient");
        let worker = ServiceWorker::new(manifest("v1"), Rc::clone(&backend));
        block_on(worker.install()).expect("install");
        backend.refuse_claim(true);
        assert!(block_on(worker.activate()).is_err());
        assert_eq!(worker.state(), WorkerState::Installed);
        assert_eq!(backend.cache_names_snapshot(), ["v0", "v1"]);

        backend.refuse_claim(false);
        block_on(worker.activate()).expect("retry");
        assert_eq!(worker.state(), WorkerState::Active);
        assert_eq!(backend.cache_names_snapshot(), ["v1"]);
    }

    #[test]
    fn test_failed_activation_keeps_previous_worker_serving() {
        let backend = origin();
        let mut registration = Registration::new(Rc::clone(&backend));
        block_on(registration.update(manifest("v1"))).expect("v1");

        backend.refuse_claim(true);
        assert!(block_on(registration.update(manifest("v2"))).is_err());
        assert_eq!(registration.active().map(|w| w.version()), Some("v1"));
        assert!(backend.cache_names_snapshot().contains(&"v1".to_string()));

        backend.go_offline();
        let request = MemoryRequest::get("index.html");
        let outcome = block_on(registration.fetch(&request)).expect("offline fetch");
        assert_eq!(outcome, FetchOutcome::Cached(MemoryResponse::ok("index.html v1")));

        backend.go_online();
        backend.refuse_claim(false);
        block_on(registration.update(manifest("v2"))).expect("v2");
        assert_eq!(backend.cache_names_snapshot(), ["v2"]);
    }

    #[test]
    fn test_restarted_worker_resumes_from_existing_cache() {
        let backend = origin();
        let worker = ServiceWorker::new(manifest("v1"), Rc::clone(&backend));
        block_on(worker.install()).expect("install");
        block_on(worker.activate()).expect("activate");
        drop(worker);

        let restarted = ServiceWorker::new(manifest("v1"), Rc::clone(&backend));
        backend.go_offline();
        let request = MemoryRequest::get("index.html");
        let outcome = block_on(restarted.handle_fetch(&request)).expect("offline fetch");
        assert_eq!(outcome, FetchOutcome::Cached(MemoryResponse::ok("index.html v1")));
        assert_eq!(restarted.state(), WorkerState::Active);
    }

    #[test]
    fn test_worker_without_cache_does_not_resume() {
        let backend = origin();
        backend.seed_cache("v0", "index.html", "ancient");
        let worker = ServiceWorker::new(manifest("v1"), Rc::clone(&backend));

        assert!(!block_on(worker.resume()).expect("resume"));
        assert!(matches!(
            block_on(worker.handle_fetch(&MemoryRequest::get("index.html"))),
            Err(Error::InvalidTransition { from: WorkerState::Parsed, .. })
        ));
        assert!(!backend.cache_names_snapshot().contains(&"v1".to_string()));
    }

    #[test]
    fn test_refused_store_fails_install_without_cache() {
        let backend = origin();
        backend.refuse_store(true);
        let worker = ServiceWorker::new(manifest("v1"), Rc::clone(&backend));
        assert!(matches!(block_on(worker.install()), Err(Error::Cache { .. })));
        assert_eq!(worker.state(), WorkerState::Redundant);
        assert!(backend.cache_names_snapshot().is_empty());

        let restarted = ServiceWorker::new(manifest("v1"), Rc::clone(&backend));
        assert!(!block_on(restarted.resume()).expect("resume"));
    }

    #[test]
    fn test_guarded_transitions() {
        let backend = origin();
        let worker = ServiceWorker::new(manifest("v1"), Rc::clone(&backend));
        assert!(matches!(
            block_on(worker.activate()),
            Err(Error::InvalidTransition { from: WorkerState::Parsed, .. })
        ));
        block_on(worker.install()).expect("install");
        assert!(matches!(
            block_on(worker.install()),
            Err(Error::InvalidTransition { from: WorkerState::Installed, .. })
        ));
        assert!(matches!(
            block_on(worker.handle_fetch(&MemoryRequest::get("index.html"))),
            Err(Error::InvalidTransition { from: WorkerState::Installed, .. })
        ));
    }

    #[test]
    fn test_cache_miss_goes_to_network_without_caching() {
        let backend = origin();
        backend.serve("api/quote", "hello");
        let mut registration = Registration::new(Rc::clone(&backend));
        block_on(registration.update(manifest("v1"))).expect("v1");

        let request = MemoryRequest::get("api/quote");
        let first = block_on(registration.fetch(&request)).expect("first");
        assert_eq!(first, FetchOutcome::Network(MemoryResponse::ok("hello")));
        assert!(!backend.cached_paths("v1").contains(&"api/quote".to_string()));
    }

    #[test]
    fn test_non_get_requests_bypass_the_worker() {
        let backend = origin();
        let mut registration = Registration::new(Rc::clone(&backend));
        block_on(registration.update(manifest("v1"))).expect("v1");
        let hits = backend.network_hits();

        let post = MemoryRequest::new("POST", "index.html");
        let outcome = block_on(registration.fetch(&post)).expect("post");
        assert_eq!(outcome, FetchOutcome::Bypass);
        assert_eq!(outcome.into_response(), None);
        assert_eq!(backend.network_hits(), hits);
    }

    #[test]
    fn test_without_worker_requests_go_to_network() {
        let backend = origin();
        let registration = Registration::new(Rc::clone(&backend));
        let request = MemoryRequest::get("index.html");
        let outcome = block_on(registration.fetch(&request)).expect("fetch");
        assert_eq!(outcome, FetchOutcome::Network(MemoryResponse::ok("index.html v1")));
    }
}
