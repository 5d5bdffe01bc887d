//! ## Conversion
//!
//! Every conversion walks its input one Unicode scalar value at a time and
//! replaces each character through a [`CharacterMap`]. Which map applies to
//! a position is decided by a [`Substitution`]:
//!
//! - [`Substitution::Single`] uses one map for every position.
//! - [`Substitution::Mixed`] cycles through a [`MixedStyleSequence`], picking
//!   the map at `position % len`.
//!
//! All functions here are pure and total. They never fail, allocate no
//! lookup structures, and produce byte-identical output for identical input.

use std::borrow::Cow;

use crate::charmap::{character_map, CharacterMap, MapName};

/// Text shown in previews while the input is empty.
pub const PLACEHOLDER_TEXT: &str = "Sample Text";

/// Invisible formatting characters that break per-character lookups.
const INVISIBLE: &[char] = &[
    '\u{180E}', // mongolian vowel separator
    '\u{200B}', // zero width space
    '\u{200C}', // zero width non-joiner
    '\u{200D}', // zero width joiner
    '\u{2060}', // word joiner
    '\u{2061}', // function application
    '\u{2062}', // invisible times
    '\u{2063}', // invisible separator
    '\u{2064}', // invisible plus
    '\u{FEFF}', // byte order mark
];

/// Removes zero-width and invisible formatting characters.
///
/// Everything else, including whitespace, is left untouched.
pub fn sanitize(text: &str) -> Cow<'_, str> {
    if text.contains(INVISIBLE) {
        Cow::Owned(text.chars().filter(|c| !INVISIBLE.contains(c)).collect())
    } else {
        Cow::Borrowed(text)
    }
}

/// Returns the text to preview for an already sanitized input.
///
/// An empty input is replaced by `placeholder`; the input itself is never
/// modified.
pub fn preview_text<'a>(sanitized: &'a str, placeholder: &'a str) -> &'a str {
    if sanitized.is_empty() {
        placeholder
    } else {
        sanitized
    }
}

/// An ordered, cyclic sequence of maps used by the mixed style.
#[derive(Debug, Clone, Copy)]
pub struct MixedStyleSequence<'a> {
    /// The maps to cycle through.
    maps: &'a [&'a CharacterMap],
}

impl<'a> MixedStyleSequence<'a> {
    /// Constructs a new [`MixedStyleSequence`].
    pub const fn new(maps: &'a [&'a CharacterMap]) -> Self {
        Self { maps }
    }

    /// Returns the map for the given code point position.
    ///
    /// An empty sequence has no map for any position.
    pub fn map_at(&self, position: usize) -> Option<&'a CharacterMap> {
        if self.maps.is_empty() {
            return None;
        }
        Some(self.maps[position % self.maps.len()])
    }

    /// Returns the number of maps in the cycle.
    pub fn len(&self) -> usize {
        self.maps.len()
    }

    /// Returns whether the cycle is empty.
    pub fn is_empty(&self) -> bool {
        self.maps.is_empty()
    }
}

impl MixedStyleSequence<'static> {
    /// The sequence used by the "Mixed" style.
    pub fn standard() -> Self {
        static NAMES: [MapName; 8] = [
            MapName::Bold,
            MapName::SerifItalic,
            MapName::Script,
            MapName::Fraktur,
            MapName::DoubleStruck,
            MapName::Monospace,
            MapName::SerifBold,
            MapName::Circled,
        ];
        static MAPS: std::sync::LazyLock<[&'static CharacterMap; 8]> =
            std::sync::LazyLock::new(|| NAMES.map(character_map));
        Self::new(&*MAPS)
    }
}

/// Character substitution strategy.
#[derive(Debug, Clone, Copy)]
pub enum Substitution<'a> {
    /// The same map for every position.
    Single {
        /// The map to apply.
        map: &'a CharacterMap,
        /// Upper-case the input before lookup.
        case_fold: bool,
    },
    /// A different map per position, round-robin.
    Mixed(MixedStyleSequence<'a>),
}

impl<'a> Substitution<'a> {
    /// Uses `map` for every position, folding case when the map declares
    /// itself uppercase-only.
    pub fn for_map(map: &'a CharacterMap) -> Self {
        Self::Single {
            map,
            case_fold: map.is_uppercase_only(),
        }
    }

    /// Applies the substitution to `text`.
    pub fn apply(&self, text: &str) -> String {
        match *self {
            Substitution::Single { map, case_fold } => {
                let folded;
                let input = if case_fold {
                    folded = text.to_uppercase();
                    folded.as_str()
                } else {
                    text
                };
                substitute(input, |_| Some(map))
            }
            Substitution::Mixed(sequence) => substitute(text, |position| sequence.map_at(position)),
        }
    }
}

/// Replaces each character through the map chosen for its position.
fn substitute<'m>(text: &str, mut select: impl FnMut(usize) -> Option<&'m CharacterMap>) -> String {
    let mut output = String::with_capacity(text.len() * 4);
    for (position, c) in text.chars().enumerate() {
        match select(position).and_then(|map| map.get(c)) {
            Some(styled) => output.push_str(styled),
            None => output.push(c),
        }
    }
    output
}

/// Converts `text` through a single map.
///
/// With `case_fold` set, the input is upper-cased before lookup so that
/// uppercase-only maps still resolve lowercase input.
pub fn convert(text: &str, map: &CharacterMap, case_fold: bool) -> String {
    Substitution::Single { map, case_fold }.apply(text)
}

/// Converts `text` through the registered map `name`.
pub fn convert_named(text: &str, name: MapName, case_fold: bool) -> String {
    convert(text, character_map(name), case_fold)
}

/// Converts `text` cycling through `sequence` by code point position.
pub fn convert_mixed(text: &str, sequence: &[&CharacterMap]) -> String {
    Substitution::Mixed(MixedStyleSequence::new(sequence)).apply(text)
}

/// Converts `text` with the standard mixed sequence.
pub fn convert_mixed_default(text: &str) -> String {
    Substitution::Mixed(MixedStyleSequence::standard()).apply(text)
}
