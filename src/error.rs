use web_sys::wasm_bindgen::JsValue;

use crate::offline::WorkerState;

/// Error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Unable to retrieve the window.
    #[error("Unable to retrieve window")]
    UnableToRetrieveWindow,

    /// Unable to retrieve the document.
    #[error("Unable to retrieve document")]
    UnableToRetrieveDocument,

    /// An element required by the page layout is missing.
    #[error("Unable to find element with id `{0}`")]
    ElementNotFound(String),

    /// No character map is registered under the given name.
    #[error("Unknown character map `{0}`")]
    UnknownCharacterMap(String),

    /// A network fetch failed or returned a non-success status.
    #[error("Failed to fetch `{url}`: {reason}")]
    FetchFailed {
        /// The requested resource.
        url: String,
        /// What went wrong.
        reason: String,
    },

    /// A cache store operation failed.
    #[error("Cache `{cache}` operation failed: {reason}")]
    Cache {
        /// The cache name.
        cache: String,
        /// What went wrong.
        reason: String,
    },

    /// A worker lifecycle operation was invoked in the wrong state.
    #[error("Cannot {operation} a worker in the {from:?} state")]
    InvalidTransition {
        /// The state the worker was in.
        from: WorkerState,
        /// The rejected operation.
        operation: &'static str,
    },

    /// The logger could not be installed.
    #[error("Unable to initialize logger: {0}")]
    Logger(String),

    /// A JavaScript exception.
    #[error("JavaScript error: {0}")]
    Js(String),
}

/// Convert a [`JsValue`] to an [`Error`].
impl From<JsValue> for Error {
    fn from(value: JsValue) -> Self {
        match value.as_string() {
            Some(message) => Self::Js(message),
            None => Self::Js(format!("{value:?}")),
        }
    }
}

/// Convert an [`Error`] to a [`JsValue`] for the JavaScript caller.
impl From<Error> for JsValue {
    fn from(error: Error) -> Self {
        JsValue::from_str(&error.to_string())
    }
}
