//! ## Character maps
//!
//! A [`CharacterMap`] is a partial function from a plain character to its
//! styled replacement. Most maps are derived from the
//! [Mathematical Alphanumeric Symbols] block, which lays every alphabet out
//! contiguously except for the letters that were already encoded in the
//! [Letterlike Symbols] block. Those holes are filled in explicitly.
//!
//! All maps live in the [`CharacterMapRegistry`], built once on first use
//! and shared by reference afterwards.
//!
//! [Mathematical Alphanumeric Symbols]: https://www.unicode.org/charts/PDF/U1D400.pdf
//! [Letterlike Symbols]: https://www.unicode.org/charts/PDF/U2100.pdf

use std::{collections::HashMap, fmt, ops::RangeInclusive, str::FromStr, sync::LazyLock};

use compact_str::CompactString;

use crate::error::Error;

/// An immutable mapping from a base character to its styled replacement.
///
/// Unmapped characters are not part of the map; converters pass them
/// through unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CharacterMap {
    /// Replacement for each mapped character.
    entries: HashMap<char, CompactString>,
    /// Whether the target block only defines capital glyphs.
    uppercase_only: bool,
}

impl CharacterMap {
    /// Constructs an empty [`CharacterMap`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Maps a single character to the given replacement.
    pub fn with(mut self, from: char, to: &str) -> Self {
        self.entries.insert(from, CompactString::from(to));
        self
    }

    /// Maps every character of `range` onto consecutive code points starting
    /// at `first`.
    pub fn with_range(mut self, range: RangeInclusive<char>, first: u32) -> Self {
        let start = *range.start() as u32;
        for from in range {
            if let Some(to) = char::from_u32(first + (from as u32 - start)) {
                self.entries.insert(from, single(to));
            }
        }
        self
    }

    /// Maps the characters of `from` pairwise onto the characters of `to`.
    pub fn with_chars(mut self, from: &str, to: &str) -> Self {
        for (from, to) in from.chars().zip(to.chars()) {
            self.entries.insert(from, single(to));
        }
        self
    }

    /// Declares that the map only covers capital letters.
    ///
    /// Converters upper-case their input before looking it up in such maps.
    pub fn uppercase_only(mut self) -> Self {
        self.uppercase_only = true;
        self
    }

    /// Returns whether the map only covers capital letters.
    pub fn is_uppercase_only(&self) -> bool {
        self.uppercase_only
    }

    /// Returns the replacement for `c`, if any.
    pub fn get(&self, c: char) -> Option<&str> {
        self.entries.get(&c).map(CompactString::as_str)
    }

    /// Returns whether `c` has a replacement.
    pub fn contains(&self, c: char) -> bool {
        self.entries.contains_key(&c)
    }

    /// Returns whether every replacement is exactly one character long.
    pub fn is_single_char(&self) -> bool {
        self.entries.values().all(|to| to.chars().count() == 1)
    }

    /// Returns the number of mapped characters.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether nothing is mapped.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn single(c: char) -> CompactString {
    std::iter::once(c).collect()
}

/// Names of the registered character maps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MapName {
    /// Sans-serif bold (𝗔𝗮𝟬).
    Bold,
    /// Serif bold (𝐀𝐚𝟎).
    SerifBold,
    /// Serif italic (𝐴𝑎).
    SerifItalic,
    /// Serif bold italic (𝑨𝒂).
    SerifBoldItalic,
    /// Script (𝒜𝒶).
    Script,
    /// Fraktur (𝔄𝔞).
    Fraktur,
    /// Circled letters and digits (Ⓐⓐ①).
    Bubble,
    /// Superscript (ᴬᵃ¹).
    Tiny,
    /// Monospace (𝙰𝚊𝟶).
    Monospace,
    /// Double-struck (𝔸𝕒𝟘).
    DoubleStruck,
    /// Negative circled capitals (🅐).
    Circled,
    /// Squared capitals (🄰).
    Squared,
    /// Fullwidth ASCII (Ａａ０).
    Fullwidth,
}

impl MapName {
    /// All map names, in registry order.
    pub const ALL: [MapName; 13] = [
        MapName::Bold,
        MapName::SerifBold,
        MapName::SerifItalic,
        MapName::SerifBoldItalic,
        MapName::Script,
        MapName::Fraktur,
        MapName::Bubble,
        MapName::Tiny,
        MapName::Monospace,
        MapName::DoubleStruck,
        MapName::Circled,
        MapName::Squared,
        MapName::Fullwidth,
    ];

    /// Returns the registry name.
    pub fn as_str(&self) -> &'static str {
        match self {
            MapName::Bold => "bold",
            MapName::SerifBold => "serifBold",
            MapName::SerifItalic => "serifItalic",
            MapName::SerifBoldItalic => "serifBoldItalic",
            MapName::Script => "script",
            MapName::Fraktur => "fraktur",
            MapName::Bubble => "bubble",
            MapName::Tiny => "tiny",
            MapName::Monospace => "monospace",
            MapName::DoubleStruck => "doubleStruck",
            MapName::Circled => "circled",
            MapName::Squared => "squared",
            MapName::Fullwidth => "fullwidth",
        }
    }

    /// Builds the table for this name.
    fn build(self) -> CharacterMap {
        let map = CharacterMap::new();
        match self {
            MapName::Bold => map
                .with_range('A'..='Z', 0x1D5D4)
                .with_range('a'..='z', 0x1D5EE)
                .with_range('0'..='9', 0x1D7EC),
            MapName::SerifBold => map
                .with_range('A'..='Z', 0x1D400)
                .with_range('a'..='z', 0x1D41A)
                .with_range('0'..='9', 0x1D7CE),
            MapName::SerifItalic => map
                .with_range('A'..='Z', 0x1D434)
                .with_range('a'..='z', 0x1D44E)
                .with('h', "ℎ"),
            MapName::SerifBoldItalic => map
                .with_range('A'..='Z', 0x1D468)
                .with_range('a'..='z', 0x1D482),
            MapName::Script => map
                .with_range('A'..='Z', 0x1D49C)
                .with_range('a'..='z', 0x1D4B6)
                .with_chars("BEFHILMRego", "ℬℰℱℋℐℒℳℛℯℊℴ"),
            MapName::Fraktur => map
                .with_range('A'..='Z', 0x1D504)
                .with_range('a'..='z', 0x1D51E)
                .with_chars("CHIRZ", "ℭℌℑℜℨ"),
            MapName::Bubble => map
                .with_range('A'..='Z', 0x24B6)
                .with_range('a'..='z', 0x24D0)
                .with_range('1'..='9', 0x2460)
                .with('0', "⓪"),
            MapName::Tiny => map
                .with_chars("ABCDEFGHIJKLMNOPRSTUVWXYZ", "ᴬᴮᶜᴰᴱᶠᴳᴴᴵᴶᴷᴸᴹᴺᴼᴾᴿˢᵀᵁⱽᵂˣʸᶻ")
                .with_chars("abcdefghijklmnoprstuvwxyz", "ᵃᵇᶜᵈᵉᶠᵍʰⁱʲᵏˡᵐⁿᵒᵖʳˢᵗᵘᵛʷˣʸᶻ")
                .with_chars("0123456789+-=()", "⁰¹²³⁴⁵⁶⁷⁸⁹⁺⁻⁼⁽⁾"),
            MapName::Monospace => map
                .with_range('A'..='Z', 0x1D670)
                .with_range('a'..='z', 0x1D68A)
                .with_range('0'..='9', 0x1D7F6),
            MapName::DoubleStruck => map
                .with_range('A'..='Z', 0x1D538)
                .with_range('a'..='z', 0x1D552)
                .with_range('0'..='9', 0x1D7D8)
                .with_chars("CHNPQRZ", "ℂℍℕℙℚℝℤ"),
            MapName::Circled => map.with_range('A'..='Z', 0x1F150).uppercase_only(),
            MapName::Squared => map.with_range('A'..='Z', 0x1F130).uppercase_only(),
            MapName::Fullwidth => map.with_range('!'..='~', 0xFF01),
        }
    }
}

impl fmt::Display for MapName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MapName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MapName::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| Error::UnknownCharacterMap(s.to_string()))
    }
}

/// The fixed set of named character maps.
#[derive(Debug)]
pub struct CharacterMapRegistry {
    /// Maps indexed by [`MapName`] discriminant.
    maps: Vec<CharacterMap>,
}

impl CharacterMapRegistry {
    /// Returns the process-wide registry, building it on first use.
    pub fn global() -> &'static Self {
        static REGISTRY: LazyLock<CharacterMapRegistry> = LazyLock::new(|| CharacterMapRegistry {
            maps: MapName::ALL.into_iter().map(MapName::build).collect(),
        });
        &REGISTRY
    }

    /// Returns the map registered under `name`.
    pub fn get(&self, name: MapName) -> &CharacterMap {
        &self.maps[name as usize]
    }

    /// Returns the map registered under the given string name.
    pub fn lookup(&self, name: &str) -> Result<&CharacterMap, Error> {
        Ok(self.get(name.parse()?))
    }

    /// Iterates over all maps in registry order.
    pub fn iter(&self) -> impl Iterator<Item = (MapName, &CharacterMap)> {
        MapName::ALL.into_iter().zip(self.maps.iter())
    }
}

/// Returns the registered map for `name`.
pub fn character_map(name: MapName) -> &'static CharacterMap {
    CharacterMapRegistry::global().get(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_lookup_by_string_name() {
        let registry = CharacterMapRegistry::global();
        let bold = registry.lookup("bold").expect("bold is registered");
        assert_eq!(bold.get('A'), Some("𝗔"));
        assert!(std::ptr::eq(bold, registry.get(MapName::Bold)));
        assert!(registry.lookup("Bold").is_err());
    }

    #[test]
    fn test_names_round_trip_through_from_str() {
        for name in MapName::ALL {
            assert_eq!(name.as_str().parse::<MapName>().ok(), Some(name));
        }
        assert!(matches!(
            "comic-sans".parse::<MapName>(),
            Err(Error::UnknownCharacterMap(name)) if name == "comic-sans"
        ));
    }

    #[test]
    fn test_contiguous_blocks() {
        let bold = character_map(MapName::SerifBold);
        assert_eq!(bold.get('A'), Some("𝐀"));
        assert_eq!(bold.get('z'), Some("𝐳"));
        assert_eq!(bold.get('7'), Some("𝟕"));
        assert_eq!(character_map(MapName::Monospace).get('a'), Some("𝚊"));
        assert_eq!(character_map(MapName::Fullwidth).get('~'), Some("～"));
        assert_eq!(character_map(MapName::Fullwidth).len(), 94);
    }

    #[test]
    fn test_letterlike_holes_are_filled() {
        assert_eq!(character_map(MapName::SerifItalic).get('h'), Some("ℎ"));
        assert_eq!(character_map(MapName::Script).get('B'), Some("ℬ"));
        assert_eq!(character_map(MapName::Script).get('o'), Some("ℴ"));
        assert_eq!(character_map(MapName::Script).get('a'), Some("𝒶"));
        assert_eq!(character_map(MapName::Fraktur).get('Z'), Some("ℨ"));
        assert_eq!(character_map(MapName::DoubleStruck).get('R'), Some("ℝ"));
        assert_eq!(character_map(MapName::DoubleStruck).get('S'), Some("𝕊"));
    }

    #[test]
    fn test_bubble_digits() {
        let bubble = character_map(MapName::Bubble);
        assert_eq!(bubble.get('0'), Some("⓪"));
        assert_eq!(bubble.get('1'), Some("①"));
        assert_eq!(bubble.get('9'), Some("⑨"));
    }

    #[test]
    fn test_tiny_skips_missing_superscripts() {
        let tiny = character_map(MapName::Tiny);
        assert_eq!(tiny.len(), 65);
        assert!(!tiny.contains('q'));
        assert!(!tiny.contains('Q'));
        assert_eq!(tiny.get('n'), Some("ⁿ"));
        assert_eq!(tiny.get('('), Some("⁽"));
    }

    #[test]
    fn test_uppercase_only_maps() {
        for (name, map) in CharacterMapRegistry::global().iter() {
            let expected = matches!(name, MapName::Circled | MapName::Squared);
            assert_eq!(map.is_uppercase_only(), expected, "{name}");
            if expected {
                assert!(!map.contains('a'));
                assert_eq!(map.len(), 26);
            }
        }
        assert_eq!(character_map(MapName::Squared).get('A'), Some("🄰"));
    }

    #[test]
    fn test_every_registered_map_is_single_char() {
        for (name, map) in CharacterMapRegistry::global().iter() {
            assert!(map.is_single_char(), "{name}");
        }
    }
}
