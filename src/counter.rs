//! Character counter shown under the input. Display only, input is never
//! truncated.

/// Default display limit of the character counter.
pub const DEFAULT_CHAR_LIMIT: usize = 280;

/// How close the input is to the display limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterLevel {
    /// Well below the limit.
    Normal,
    /// At or above 90% of the limit.
    Warning,
    /// At or above the limit.
    Limit,
}

impl CounterLevel {
    /// All levels.
    pub const ALL: [CounterLevel; 3] = [
        CounterLevel::Normal,
        CounterLevel::Warning,
        CounterLevel::Limit,
    ];

    /// Returns the css class used to color the counter.
    pub fn css_class(&self) -> &'static str {
        match self {
            CounterLevel::Normal => "text-gray-400",
            CounterLevel::Warning => "text-yellow-500",
            CounterLevel::Limit => "text-red-500",
        }
    }
}

/// Character counter shown below the input.
///
/// The counter is informational only: input longer than the limit is still
/// converted in full.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharCounter {
    /// The display limit.
    limit: usize,
}

impl Default for CharCounter {
    fn default() -> Self {
        Self::new(DEFAULT_CHAR_LIMIT)
    }
}

impl CharCounter {
    /// Constructs a new [`CharCounter`].
    pub const fn new(limit: usize) -> Self {
        Self { limit }
    }

    /// Returns the display limit.
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Counts `text` the way a browser text field does, in UTF-16 code units.
    pub fn count(&self, text: &str) -> usize {
        text.encode_utf16().count()
    }

    /// Returns the counter label, e.g. `"12 / 280"`.
    pub fn label(&self, text: &str) -> String {
        format!("{} / {}", self.count(text), self.limit)
    }

    /// Returns the level for `text`.
    pub fn level(&self, text: &str) -> CounterLevel {
        let count = self.count(text);
        if count >= self.limit {
            CounterLevel::Limit
        } else if count * 10 >= self.limit * 9 {
            CounterLevel::Warning
        } else {
            CounterLevel::Normal
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levels() {
        let counter = CharCounter::default();
        assert_eq!(counter.level(""), CounterLevel::Normal);
        assert_eq!(counter.level(&"a".repeat(251)), CounterLevel::Normal);
        assert_eq!(counter.level(&"a".repeat(252)), CounterLevel::Warning);
        assert_eq!(counter.level(&"a".repeat(280)), CounterLevel::Limit);
        assert_eq!(counter.level(&"a".repeat(1000)), CounterLevel::Limit);
    }

    #[test]
    fn test_label_counts_utf16_units() {
        let counter = CharCounter::default();
        assert_eq!(counter.label("hello"), "5 / 280");
        assert_eq!(counter.label("🦀"), "2 / 280");
        assert_eq!(CharCounter::new(10).label("é"), "1 / 10");
    }
}
