use std::rc::Rc;

use futures_util::future::try_join_all;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{future_to_promise, JsFuture};
use web_sys::{
    js_sys::{self, Array},
    Cache, CacheStorage, ExtendableEvent, FetchEvent, Request, Response,
    ServiceWorkerGlobalScope,
};

use crate::{
    error::Error,
    logger,
    offline::{CacheBackend, CacheManifest, FetchOutcome, ServiceWorker},
};

/// [`CacheBackend`] backed by the browser's `CacheStorage`.
///
/// Only usable inside a service worker global scope.
#[derive(Debug)]
pub struct ServiceWorkerBackend {
    /// The worker global scope.
    scope: ServiceWorkerGlobalScope,
    /// The origin's cache storage.
    caches: CacheStorage,
}

impl ServiceWorkerBackend {
    /// Constructs a new [`ServiceWorkerBackend`] for the current global scope.
    pub fn new() -> Result<Self, Error> {
        let scope = js_sys::global()
            .dyn_into::<ServiceWorkerGlobalScope>()
            .map_err(|_| Error::Js("not running in a service worker".into()))?;
        let caches = scope.caches()?;
        Ok(Self { scope, caches })
    }

    /// Opens (or creates) the named cache.
    async fn open(&self, cache: &str) -> Result<Cache, Error> {
        let opened = JsFuture::from(self.caches.open(cache))
            .await
            .map_err(|error| cache_error(cache, error))?;
        Ok(opened.unchecked_into())
    }
}

/// Wraps a JavaScript failure of a cache operation.
fn cache_error(cache: &str, error: JsValue) -> Error {
    Error::Cache {
        cache: cache.into(),
        reason: Error::from(error).to_string(),
    }
}

impl CacheBackend for ServiceWorkerBackend {
    type Request = Request;
    type Response = Response;

    fn request(&self, path: &str) -> Result<Self::Request, Error> {
        Ok(Request::new_with_str(path)?)
    }

    fn is_get(request: &Self::Request) -> bool {
        request.method() == "GET"
    }

    fn url(request: &Self::Request) -> String {
        request.url()
    }

    fn is_success(response: &Self::Response) -> bool {
        response.ok()
    }

    async fn fetch(&self, request: &Self::Request) -> Result<Self::Response, Error> {
        let response = JsFuture::from(self.scope.fetch_with_request(request))
            .await
            .map_err(|error| Error::FetchFailed {
                url: request.url(),
                reason: Error::from(error).to_string(),
            })?;
        Ok(response.unchecked_into())
    }

    async fn cache_names(&self) -> Result<Vec<String>, Error> {
        let keys = JsFuture::from(self.caches.keys()).await?;
        Ok(Array::from(&keys)
            .iter()
            .filter_map(|name| name.as_string())
            .collect())
    }

    async fn store(
        &self,
        cache: &str,
        entries: Vec<(Self::Request, Self::Response)>,
    ) -> Result<(), Error> {
        let store = self.open(cache).await?;
        let puts = entries
            .iter()
            .map(|(request, response)| JsFuture::from(store.put_with_request(request, response)));
        if let Err(error) = try_join_all(puts).await {
            // a partially written cache must not be mistaken for a complete one
            if let Err(cleanup) = JsFuture::from(self.caches.delete(cache)).await {
                tracing::error!(cache, error = ?cleanup, "unable to drop partial cache");
            }
            return Err(cache_error(cache, error));
        }
        Ok(())
    }

    async fn lookup(
        &self,
        cache: &str,
        request: &Self::Request,
    ) -> Result<Option<Self::Response>, Error> {
        let exists = JsFuture::from(self.caches.has(cache))
            .await
            .map_err(|error| cache_error(cache, error))?;
        if !exists.as_bool().unwrap_or(false) {
            return Ok(None);
        }
        let store = self.open(cache).await?;
        let matched = JsFuture::from(store.match_with_request(request))
            .await
            .map_err(|error| cache_error(cache, error))?;
        if matched.is_undefined() {
            return Ok(None);
        }
        Ok(Some(matched.unchecked_into()))
    }

    async fn delete(&self, cache: &str) -> Result<bool, Error> {
        let deleted = JsFuture::from(self.caches.delete(cache))
            .await
            .map_err(|error| cache_error(cache, error))?;
        Ok(deleted.as_bool().unwrap_or(false))
    }

    async fn skip_waiting(&self) -> Result<(), Error> {
        JsFuture::from(self.scope.skip_waiting()?).await?;
        Ok(())
    }

    async fn claim_clients(&self) -> Result<(), Error> {
        JsFuture::from(self.scope.clients().claim()).await?;
        Ok(())
    }
}

/// Wires the worker lifecycle to the `install`, `activate` and `fetch`
/// events of the current service worker scope.
pub fn install_handlers(manifest: CacheManifest) -> Result<(), Error> {
    let backend = Rc::new(ServiceWorkerBackend::new()?);
    let scope = backend.scope.clone();
    let worker = Rc::new(ServiceWorker::new(manifest, backend));

    let on_install = Closure::<dyn FnMut(_)>::new({
        let worker = Rc::clone(&worker);
        move |event: ExtendableEvent| {
            let worker = Rc::clone(&worker);
            let promise = future_to_promise(async move {
                worker.install().await?;
                Ok(JsValue::UNDEFINED)
            });
            if let Err(error) = event.wait_until(&promise) {
                tracing::error!(error = ?error, "install event rejected waitUntil");
            }
        }
    });
    scope.set_oninstall(Some(on_install.as_ref().unchecked_ref()));
    on_install.forget();

    let on_activate = Closure::<dyn FnMut(_)>::new({
        let worker = Rc::clone(&worker);
        move |event: ExtendableEvent| {
            let worker = Rc::clone(&worker);
            let promise = future_to_promise(async move {
                worker.activate().await?;
                Ok(JsValue::UNDEFINED)
            });
            if let Err(error) = event.wait_until(&promise) {
                tracing::error!(error = ?error, "activate event rejected waitUntil");
            }
        }
    });
    scope.set_onactivate(Some(on_activate.as_ref().unchecked_ref()));
    on_activate.forget();

    let on_fetch = Closure::<dyn FnMut(_)>::new(move |event: FetchEvent| {
        let request = event.request();
        // leave non-GET requests to the browser
        if !ServiceWorkerBackend::is_get(&request) {
            return;
        }
        let worker = Rc::clone(&worker);
        let promise = future_to_promise(async move {
            let response = match worker.handle_fetch(&request).await {
                Ok(FetchOutcome::Cached(response) | FetchOutcome::Network(response)) => response,
                Ok(FetchOutcome::Bypass) => worker.backend.fetch(&request).await?,
                Err(error) => {
                    tracing::warn!(%error, url = %request.url(), "serving from network");
                    worker.backend.fetch(&request).await?
                }
            };
            Ok(response.into())
        });
        if let Err(error) = event.respond_with(&promise) {
            tracing::error!(error = ?error, "fetch event rejected respondWith");
        }
    });
    scope.set_onfetch(Some(on_fetch.as_ref().unchecked_ref()));
    on_fetch.forget();

    Ok(())
}

/// Entry point for the service worker script.
///
/// Installs the panic hook and console logger, then registers the offline
/// cache lifecycle for the shell assets.
#[wasm_bindgen(js_name = startServiceWorker)]
pub fn start_service_worker() -> Result<(), JsValue> {
    std::panic::set_hook(Box::new(console_error_panic_hook::hook));
    if let Err(error) = logger::init(tracing::Level::INFO) {
        web_sys::console::warn_1(&error.into());
    }
    install_handlers(CacheManifest::default())?;
    Ok(())
}
