//! ## Page
//!
//! The browser side of the styler. [`StylerApp`] binds a [`StyleCatalog`]
//! to a page made of a handful of elements, looked up by id (see
//! [`StylerOptions`] for the defaults):
//!
//! | Element          | Default id     | Role                                    |
//! |------------------|----------------|-----------------------------------------|
//! | text input       | `textInput`    | source text, re-rendered on every edit  |
//! | clear button     | `clearBtn`     | hidden while the input is empty         |
//! | grid             | `fontGrid`     | one card per style, in catalog order    |
//! | counter          | `charCounter`  | `n / limit`, coloured near the limit    |
//! | toast            | `toast`        | shown after a successful copy           |
//! | title            | `appTitle`     | the app name in bold serif letters      |
//! | repository link  | `githubButton` | optional, opens the project page        |
//!
//! Card clicks are handled by a single listener on the grid, so re-rendering
//! the cards never leaks listeners. Clicking a card copies its text, the
//! share button opens the native share sheet.
//!
//! Copying prefers the asynchronous Clipboard API and falls back to
//! `execCommand("copy")` outside secure contexts. Sharing falls back to
//! copying when `navigator.share` is missing.
//!
//! [`StyleCatalog`]: crate::StyleCatalog
//! [`StylerOptions`]: crate::StylerOptions

/// Page wiring and the `startApp` entry point.
pub mod app;

/// Clipboard, share sheet and toast.
pub mod clipboard;

/// DOM helpers.
pub mod dom;

/// Event listener management.
pub(crate) mod event_callback;

pub use app::{start_app, StylerApp};
pub use clipboard::{copy_to_clipboard, share_text, ShareOutcome, Toast};
pub use dom::CardAction;
