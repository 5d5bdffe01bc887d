use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::Widget,
};
use unicode_width::UnicodeWidthStr;

use crate::catalog::RenderedStyle;

/// Drawn between the label and the preview.
const SEPARATOR: &str = " │ ";

/// Renders catalog output as a two-column list: style name, then preview.
///
/// The label column is as wide as the longest name, up to half of the area.
/// When a row is selected, the list scrolls to keep it visible.
///
/// ```
/// use fluffstyle::ratatui::{buffer::Buffer, layout::Rect, widgets::Widget};
/// use fluffstyle::{StyleCatalog, StyleGrid};
///
/// let styles = StyleCatalog::default().render("Hi");
/// let mut buffer = Buffer::empty(Rect::new(0, 0, 40, 4));
/// StyleGrid::new(&styles).select(Some(2)).render(buffer.area, &mut buffer);
/// ```
#[derive(Debug, Clone)]
pub struct StyleGrid<'a> {
    /// Rows to draw.
    styles: &'a [RenderedStyle],
    /// Highlighted row.
    selected: Option<usize>,
    /// Style of the label column.
    label_style: Style,
    /// Style patched over the selected row.
    highlight_style: Style,
}

impl<'a> StyleGrid<'a> {
    /// Constructs a new [`StyleGrid`].
    pub fn new(styles: &'a [RenderedStyle]) -> Self {
        Self {
            styles,
            selected: None,
            label_style: Style::default(),
            highlight_style: Style::new().add_modifier(Modifier::REVERSED),
        }
    }

    /// Sets the highlighted row.
    pub fn select(mut self, index: Option<usize>) -> Self {
        self.selected = index;
        self
    }

    /// Sets the style of the label column.
    pub fn label_style(mut self, style: Style) -> Self {
        self.label_style = style;
        self
    }

    /// Sets the style of the selected row.
    pub fn highlight_style(mut self, style: Style) -> Self {
        self.highlight_style = style;
        self
    }

    fn label_width(&self, area: Rect) -> u16 {
        let widest = self
            .styles
            .iter()
            .map(|style| style.name.width())
            .max()
            .unwrap_or(0);
        u16::try_from(widest).unwrap_or(u16::MAX).min(area.width / 2)
    }

    /// First visible row.
    fn offset(&self, height: u16) -> usize {
        let height = usize::from(height);
        match self.selected {
            Some(selected) if selected >= height => selected + 1 - height,
            _ => 0,
        }
    }
}

impl Widget for StyleGrid<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.is_empty() {
            return;
        }
        let label_width = self.label_width(area);
        let rows = self
            .styles
            .iter()
            .enumerate()
            .skip(self.offset(area.height))
            .take(usize::from(area.height));

        for (y, (index, style)) in (area.y..).zip(rows) {
            buf.set_stringn(
                area.x,
                y,
                style.name,
                usize::from(label_width),
                self.label_style,
            );
            let (x, _) = buf.set_stringn(
                area.x + label_width,
                y,
                SEPARATOR,
                usize::from(area.width - label_width),
                Style::default(),
            );
            buf.set_stringn(
                x,
                y,
                &style.text,
                usize::from(area.right().saturating_sub(x)),
                Style::default(),
            );
            if self.selected == Some(index) {
                buf.set_style(Rect::new(area.x, y, area.width, 1), self.highlight_style);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::StyleCatalog;

    fn row(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf[(x, y)].symbol())
            .collect()
    }

    fn render(styles: &[RenderedStyle], area: Rect, selected: Option<usize>) -> Buffer {
        let mut buf = Buffer::empty(area);
        StyleGrid::new(styles).select(selected).render(area, &mut buf);
        buf
    }

    #[test]
    fn test_rows_show_label_and_preview() {
        let styles = StyleCatalog::default().render("Hi");
        let buf = render(&styles, Rect::new(0, 0, 40, 3), None);

        assert!(row(&buf, 0).starts_with("Mixed "));
        assert!(row(&buf, 1).starts_with(&format!("{:<20} │ Hi", "Normal")));
        assert!(row(&buf, 2).starts_with(&format!("{:<20} │ ", "Bold")));
    }

    #[test]
    fn test_labels_are_truncated_to_half_the_width() {
        let styles = StyleCatalog::default().render("Hi");
        let buf = render(&styles, Rect::new(0, 0, 10, 4), None);

        assert_eq!(row(&buf, 1), "Norma │ Hi");
        assert!(row(&buf, 3).starts_with("Bold  │ "));
    }

    #[test]
    fn test_selected_row_is_highlighted_and_visible() {
        let styles = StyleCatalog::default().render("");
        let buf = render(&styles, Rect::new(0, 0, 40, 3), Some(10));

        // rows 8, 9 and 10 are visible
        assert!(row(&buf, 0).starts_with(styles[8].name));
        assert!(row(&buf, 2).starts_with(styles[10].name));
        assert!(buf[(0, 2)].modifier.contains(Modifier::REVERSED));
        assert!(!buf[(0, 1)].modifier.contains(Modifier::REVERSED));
    }

    #[test]
    fn test_empty_area_draws_nothing() {
        let styles = StyleCatalog::default().render("Hi");
        let buf = render(&styles, Rect::new(0, 0, 0, 0), Some(1));
        assert!(buf.content.is_empty());
    }
}
