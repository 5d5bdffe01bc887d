//! ## Configuration
//!
//! [`StylerOptions`] follows the usual builder shape: start from
//! [`StylerOptions::default`], override what differs, read back with the
//! `get_*` accessors.

use tracing::Level;

use crate::{convert::PLACEHOLDER_TEXT, counter::DEFAULT_CHAR_LIMIT};

/// Title shown above the input.
const DEFAULT_TITLE: &str = "0FluffStyle.";

/// How long the copy notification stays visible, in milliseconds.
const DEFAULT_TOAST_DURATION_MS: i32 = 3000;

/// Project page opened by the repository button.
const DEFAULT_REPOSITORY_URL: &str = "https://github.com/jayancobk/Stylish-Words";

/// Options for the [`StylerApp`](crate::web::StylerApp).
///
/// Element ids default to the ones used by the bundled `index.html`.
#[derive(Debug, Clone)]
pub struct StylerOptions {
    /// The text input element id.
    input_id: String,
    /// The clear button element id.
    clear_button_id: String,
    /// The element id the style cards are rendered into.
    grid_id: String,
    /// The character counter element id.
    counter_id: String,
    /// The toast element id.
    toast_id: String,
    /// The title element id.
    title_id: String,
    /// The repository button element id. The button is optional.
    repository_button_id: String,
    /// Page opened by the repository button.
    repository_url: String,
    /// Text previewed while the input is empty.
    placeholder: String,
    /// Title text, rendered in serif bold.
    title: String,
    /// Character counter display limit.
    char_limit: usize,
    /// How long the toast stays visible.
    toast_duration_ms: i32,
    /// Maximum level forwarded to the browser console.
    log_level: Level,
}

impl Default for StylerOptions {
    fn default() -> Self {
        Self {
            input_id: "textInput".into(),
            clear_button_id: "clearBtn".into(),
            grid_id: "fontGrid".into(),
            counter_id: "charCounter".into(),
            toast_id: "toast".into(),
            title_id: "appTitle".into(),
            repository_button_id: "githubButton".into(),
            repository_url: DEFAULT_REPOSITORY_URL.into(),
            placeholder: PLACEHOLDER_TEXT.into(),
            title: DEFAULT_TITLE.into(),
            char_limit: DEFAULT_CHAR_LIMIT,
            toast_duration_ms: DEFAULT_TOAST_DURATION_MS,
            log_level: Level::INFO,
        }
    }
}

impl StylerOptions {
    /// Constructs a new [`StylerOptions`].
    pub fn new() -> Self {
        Default::default()
    }

    /// Sets the text input element id.
    pub fn input_id(mut self, id: &str) -> Self {
        self.input_id = id.into();
        self
    }

    /// Sets the clear button element id.
    pub fn clear_button_id(mut self, id: &str) -> Self {
        self.clear_button_id = id.into();
        self
    }

    /// Sets the element id the style cards are rendered into.
    pub fn grid_id(mut self, id: &str) -> Self {
        self.grid_id = id.into();
        self
    }

    /// Sets the character counter element id.
    pub fn counter_id(mut self, id: &str) -> Self {
        self.counter_id = id.into();
        self
    }

    /// Sets the toast element id.
    pub fn toast_id(mut self, id: &str) -> Self {
        self.toast_id = id.into();
        self
    }

    /// Sets the title element id.
    pub fn title_id(mut self, id: &str) -> Self {
        self.title_id = id.into();
        self
    }

    /// Sets the repository button element id.
    pub fn repository_button_id(mut self, id: &str) -> Self {
        self.repository_button_id = id.into();
        self
    }

    /// Sets the page opened by the repository button.
    pub fn repository_url(mut self, url: &str) -> Self {
        self.repository_url = url.into();
        self
    }

    /// Sets the text previewed while the input is empty.
    pub fn placeholder(mut self, text: &str) -> Self {
        self.placeholder = text.into();
        self
    }

    /// Sets the title text.
    pub fn title(mut self, text: &str) -> Self {
        self.title = text.into();
        self
    }

    /// Sets the character counter display limit.
    ///
    /// # Panics
    ///
    /// Panics if `limit` is zero.
    pub fn char_limit(mut self, limit: usize) -> Self {
        if limit == 0 {
            panic!("Character limit must be greater than 0");
        }
        self.char_limit = limit;
        self
    }

    /// Sets how long the toast stays visible, in milliseconds.
    pub fn toast_duration_ms(mut self, duration: i32) -> Self {
        self.toast_duration_ms = duration;
        self
    }

    /// Sets the maximum level forwarded to the browser console.
    pub fn log_level(mut self, level: Level) -> Self {
        self.log_level = level;
        self
    }

    /// Returns the text input element id.
    pub fn get_input_id(&self) -> &str {
        &self.input_id
    }

    /// Returns the clear button element id.
    pub fn get_clear_button_id(&self) -> &str {
        &self.clear_button_id
    }

    /// Returns the grid element id.
    pub fn get_grid_id(&self) -> &str {
        &self.grid_id
    }

    /// Returns the character counter element id.
    pub fn get_counter_id(&self) -> &str {
        &self.counter_id
    }

    /// Returns the toast element id.
    pub fn get_toast_id(&self) -> &str {
        &self.toast_id
    }

    /// Returns the title element id.
    pub fn get_title_id(&self) -> &str {
        &self.title_id
    }

    /// Returns the placeholder text.
    pub fn get_placeholder(&self) -> &str {
        &self.placeholder
    }

    /// Returns the title text.
    pub fn get_title(&self) -> &str {
        &self.title
    }

    /// Returns the character counter display limit.
    pub fn get_char_limit(&self) -> usize {
        self.char_limit
    }

    /// Returns the repository button element id.
    pub fn get_repository_button_id(&self) -> &str {
        &self.repository_button_id
    }

    /// Returns the page opened by the repository button.
    pub fn get_repository_url(&self) -> &str {
        &self.repository_url
    }

    /// Returns the toast duration in milliseconds.
    pub fn get_toast_duration_ms(&self) -> i32 {
        self.toast_duration_ms
    }

    /// Returns the console log level.
    pub fn get_log_level(&self) -> Level {
        self.log_level
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_page_layout() {
        let options = StylerOptions::default();
        assert_eq!(options.get_input_id(), "textInput");
        assert_eq!(options.get_grid_id(), "fontGrid");
        assert_eq!(options.get_placeholder(), "Sample Text");
        assert_eq!(options.get_char_limit(), 280);
        assert_eq!(options.get_toast_duration_ms(), 3000);
        assert_eq!(options.get_repository_button_id(), "githubButton");
        assert_eq!(
            options.get_repository_url(),
            "https://github.com/jayancobk/Stylish-Words"
        );
    }

    #[test]
    fn test_repository_button_can_point_elsewhere() {
        let options = StylerOptions::new()
            .repository_button_id("sourceLink")
            .repository_url("https://example.org/fork");
        assert_eq!(options.get_repository_button_id(), "sourceLink");
        assert_eq!(options.get_repository_url(), "https://example.org/fork");
    }

    #[test]
    fn test_builder() {
        let options = StylerOptions::new()
            .grid_id("styles")
            .placeholder("Type here")
            .char_limit(500)
            .log_level(Level::DEBUG);
        assert_eq!(options.get_grid_id(), "styles");
        assert_eq!(options.get_placeholder(), "Type here");
        assert_eq!(options.get_char_limit(), 500);
        assert_eq!(options.get_log_level(), Level::DEBUG);
    }

    #[test]
    #[should_panic(expected = "Character limit must be greater than 0")]
    fn test_zero_char_limit_panics() {
        let _ = StylerOptions::new().char_limit(0);
    }
}
