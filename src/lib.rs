#![warn(missing_docs, clippy::unwrap_used)]
#![doc = include_str!("../README.md")]

/// Custom error type.
pub mod error;

/// Character maps.
pub mod charmap;

/// Sanitizing and converting text.
pub mod convert;

/// Style catalog.
pub mod catalog;

/// Character counter.
pub mod counter;

/// Configuration.
pub mod options;

/// Console logging.
pub mod logger;

/// Offline asset cache.
pub mod offline;

/// Browser page.
pub mod web;

/// Widgets.
pub mod widgets;

// Re-export ratatui crate.
pub use ratatui;

// Re-export web_sys crate.
pub use web_sys;

pub use catalog::{Converter, RenderedStyle, StyleCatalog, StyleDefinition};
pub use charmap::{character_map, CharacterMap, CharacterMapRegistry, MapName};
pub use convert::{
    convert, convert_mixed, convert_mixed_default, convert_named, sanitize, MixedStyleSequence,
    Substitution,
};
pub use counter::{CharCounter, CounterLevel};
pub use error::Error;
pub use offline::{
    CacheBackend, CacheManifest, FetchOutcome, Registration, ServiceWorker, WorkerState,
};
pub use options::StylerOptions;
pub use web::{start_app, StylerApp};
pub use widgets::StyleGrid;
