//! ## Style catalog
//!
//! The catalog is the ordered list of styles shown to the user. Each entry
//! pairs a display label with a [`Converter`]: the identity, one character
//! map, or the rotating mixed sequence. The order of the entries is the
//! display order, and every catalog carries an identity "Normal" entry.
//!
//! [`StyleCatalog::render`] is the whole pipeline for one input: sanitize,
//! substitute the placeholder when nothing is left, then convert once per
//! entry.

use crate::{
    charmap::{character_map, MapName},
    convert::{preview_text, sanitize, MixedStyleSequence, Substitution, PLACEHOLDER_TEXT},
};

/// How a style turns input text into output text.
#[derive(Debug, Clone, Copy)]
pub enum Converter {
    /// Returns the input unchanged.
    Identity,
    /// Substitutes characters through one or more maps.
    Substitute(Substitution<'static>),
}

impl Converter {
    /// Converts through the registered map `name`.
    ///
    /// Case folding follows the map's own declaration.
    pub fn map(name: MapName) -> Self {
        Self::Substitute(Substitution::for_map(character_map(name)))
    }

    /// Converts through the standard mixed sequence.
    pub fn mixed() -> Self {
        Self::Substitute(Substitution::Mixed(MixedStyleSequence::standard()))
    }

    /// Applies the converter to `text`.
    pub fn apply(&self, text: &str) -> String {
        match self {
            Converter::Identity => text.to_string(),
            Converter::Substitute(substitution) => substitution.apply(text),
        }
    }
}

/// A named style, as listed in the catalog.
#[derive(Debug, Clone, Copy)]
pub struct StyleDefinition {
    /// Display label.
    pub name: &'static str,
    /// The conversion to apply.
    pub converter: Converter,
}

impl StyleDefinition {
    /// Constructs a new [`StyleDefinition`].
    pub const fn new(name: &'static str, converter: Converter) -> Self {
        Self { name, converter }
    }
}

/// One converted output, ready to be displayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedStyle {
    /// Display label of the style.
    pub name: &'static str,
    /// The converted text.
    pub text: String,
}

/// Ordered list of styles.
///
/// The order of the entries is the display order.
#[derive(Debug, Clone)]
pub struct StyleCatalog {
    /// Catalog entries.
    styles: Vec<StyleDefinition>,
    /// Text previewed while the input is empty.
    placeholder: String,
}

impl Default for StyleCatalog {
    fn default() -> Self {
        Self::new(vec![
            StyleDefinition::new("Mixed", Converter::mixed()),
            StyleDefinition::new("Normal", Converter::Identity),
            StyleDefinition::new("Bold", Converter::map(MapName::Bold)),
            StyleDefinition::new("Bold (Serif)", Converter::map(MapName::SerifBold)),
            StyleDefinition::new("Italic", Converter::map(MapName::SerifItalic)),
            StyleDefinition::new("Bold Italic", Converter::map(MapName::SerifBoldItalic)),
            StyleDefinition::new("Script", Converter::map(MapName::Script)),
            StyleDefinition::new("Fraktur", Converter::map(MapName::Fraktur)),
            StyleDefinition::new("Bubble", Converter::map(MapName::Bubble)),
            StyleDefinition::new("Tiny Text (Superscript)", Converter::map(MapName::Tiny)),
            StyleDefinition::new("Monospace", Converter::map(MapName::Monospace)),
            StyleDefinition::new("Double-Struck", Converter::map(MapName::DoubleStruck)),
            StyleDefinition::new("Circled", Converter::map(MapName::Circled)),
            StyleDefinition::new("Squared", Converter::map(MapName::Squared)),
            StyleDefinition::new("Fullwidth", Converter::map(MapName::Fullwidth)),
        ])
    }
}

impl StyleCatalog {
    /// Constructs a new [`StyleCatalog`] from the given entries.
    ///
    /// An identity "Normal" entry is prepended if none is present.
    pub fn new(mut styles: Vec<StyleDefinition>) -> Self {
        let has_identity = styles
            .iter()
            .any(|style| matches!(style.converter, Converter::Identity));
        if !has_identity {
            styles.insert(0, StyleDefinition::new("Normal", Converter::Identity));
        }
        Self {
            styles,
            placeholder: PLACEHOLDER_TEXT.to_string(),
        }
    }

    /// Sets the text previewed while the input is empty.
    pub fn placeholder(mut self, placeholder: &str) -> Self {
        self.placeholder = placeholder.to_string();
        self
    }

    /// Returns the entries in display order.
    pub fn styles(&self) -> &[StyleDefinition] {
        &self.styles
    }

    /// Returns the entry with the given display label.
    pub fn find(&self, name: &str) -> Option<&StyleDefinition> {
        self.styles.iter().find(|style| style.name == name)
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.styles.len()
    }

    /// Returns whether the catalog is empty.
    ///
    /// Always false, a catalog carries at least its identity entry.
    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    /// Sanitizes `raw` and converts it through every style, in order.
    ///
    /// Empty input previews the placeholder text instead.
    pub fn render(&self, raw: &str) -> Vec<RenderedStyle> {
        let sanitized = sanitize(raw);
        let text = preview_text(&sanitized, &self.placeholder);
        self.styles
            .iter()
            .map(|style| RenderedStyle {
                name: style.name,
                text: style.converter.apply(text),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_order() {
        let names: Vec<_> = StyleCatalog::default().styles().iter().map(|s| s.name).collect();
        assert_eq!(
            names,
            [
                "Mixed",
                "Normal",
                "Bold",
                "Bold (Serif)",
                "Italic",
                "Bold Italic",
                "Script",
                "Fraktur",
                "Bubble",
                "Tiny Text (Superscript)",
                "Monospace",
                "Double-Struck",
                "Circled",
                "Squared",
                "Fullwidth",
            ]
        );
    }

    #[test]
    fn test_identity_entry_is_guaranteed() {
        let catalog = StyleCatalog::new(vec![StyleDefinition::new(
            "Bold",
            Converter::map(MapName::Bold),
        )]);
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.styles()[0].name, "Normal");
        assert_eq!(catalog.styles()[1].name, "Bold");
    }

    #[test]
    fn test_render_one_output_per_style() {
        let catalog = StyleCatalog::default();
        let rendered = catalog.render("Hi");
        assert_eq!(rendered.len(), catalog.len());
        assert_eq!(rendered[1], RenderedStyle { name: "Normal", text: "Hi".into() });
        assert_eq!(rendered[2].text, "𝗛𝗶");
        assert_eq!(rendered[13].text, "🄷🄸");
        assert_eq!(rendered[14].text, "Ｈｉ");
    }

    #[test]
    fn test_render_sanitizes_input() {
        let catalog = StyleCatalog::default();
        let rendered = catalog.render("H\u{200B}i");
        assert_eq!(rendered[1].text, "Hi");
    }

    #[test]
    fn test_render_previews_placeholder_for_empty_input() {
        let catalog = StyleCatalog::default();
        let normal = |raw: &str| catalog.render(raw)[1].text.clone();
        assert_eq!(normal(""), "Sample Text");
        assert_eq!(normal("\u{200D}\u{FEFF}"), "Sample Text");

        let custom = StyleCatalog::default().placeholder("Preview");
        assert_eq!(custom.render("")[1].text, "Preview");
    }

    #[test]
    fn test_find_by_name() {
        let catalog = StyleCatalog::default();
        let fraktur = catalog.find("Fraktur").expect("fraktur style");
        assert_eq!(fraktur.converter.apply("Z"), "ℨ");
        assert!(catalog.find("Wingdings").is_none());
    }
}
