use web_sys::{
    js_sys::Reflect,
    wasm_bindgen::{JsCast, JsValue},
    window, Document, Element, HtmlElement,
};

use crate::{
    catalog::RenderedStyle,
    counter::{CharCounter, CounterLevel},
    error::Error,
};

/// Class list of a style card.
const CARD_CLASS: &str = "relative bg-gray-800 p-6 rounded-lg shadow-md border border-gray-700 \
    transition-transform duration-300 hover:scale-105";

/// Class list of the converted text inside a card.
const PREVIEW_CLASS: &str = "font-preview-text";

/// Class list of the style name inside a card.
const NAME_CLASS: &str = "block text-sm text-gray-400 mt-4";

/// Class list of the copy button.
const COPY_BUTTON_CLASS: &str = "absolute top-4 right-4 bg-blue-600 text-white p-2 rounded-full \
    w-10 h-10 flex items-center justify-center hover:bg-blue-700 transition-all duration-200 \
    focus:outline-none focus:ring-2 focus:ring-blue-400";

/// Class list of the share button.
const SHARE_BUTTON_CLASS: &str = "absolute top-16 right-4 bg-gray-700 text-gray-300 p-2 \
    rounded-full w-10 h-10 flex items-center justify-center hover:bg-gray-600 transition-all \
    duration-200 focus:outline-none focus:ring-2 focus:ring-gray-500";

/// Copy icon.
const COPY_ICON: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" class="h-5 w-5" fill="none" viewBox="0 0 24 24" stroke="currentColor" stroke-width="2"><path stroke-linecap="round" stroke-linejoin="round" d="M8 16H6a2 2 0 01-2-2V6a2 2 0 012-2h8a2 2 0 012 2v2m-6 12h8a2 2 0 002-2v-8a2 2 0 00-2-2h-8a2 2 0 00-2 2v8a2 2 0 002 2z" /></svg>"#;

/// Share icon.
const SHARE_ICON: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" class="h-5 w-5" fill="none" viewBox="0 0 24 24" stroke="currentColor" stroke-width="2"><path stroke-linecap="round" stroke-linejoin="round" d="M8.684 13.342C8.886 12.938 9 12.482 9 12c0-.479-.114-.938-.316-1.342m0 2.684a3 3 0 110-2.684m0 2.684l6.632 3.316m-6.632-6.632L15.316 8.684m0 0a3 3 0 100-5.368 3 3 0 000 5.368zm0 5.368a3 3 0 100 5.368 3 3 0 000-5.368z" /></svg>"#;

/// Repository button icon.
const GITHUB_ICON: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="20" height="20" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2.5" stroke-linecap="round" stroke-linejoin="round"><path d="M9 19c-5 1.5-5-2.5-7-3m14 6v-3.87a3.37 3.37 0 0 0-.94-2.61c3.14-.35 6.44-1.54 6.44-7A5.44 5.44 0 0 0 20 4.77 5.07 5.07 0 0 0 19.91 3c0 0-1.03-.39-3.41 1.05A16.3 16.3 0 0 0 12 2.88 16.3 16.3 0 0 0 7.4 4.04c-2.38-1.44-3.41-1.05-3.41-1.05A5.07 5.07 0 0 0 3.91 4.77 5.44 5.44 0 0 0 4 9.47c0 5.42 3.3 6.61 6.44 7.37-.4.34-.78 1-1.15 2.06v4.31"></path></svg>"#;

/// Label of the repository button.
const REPOSITORY_LABEL: &str = "View on GitHub";

/// Attribute carrying the catalog index of a card.
const INDEX_ATTRIBUTE: &str = "data-style-index";

/// Attribute carrying the action of a card button.
const ACTION_ATTRIBUTE: &str = "data-action";

/// Class hiding an element.
const HIDDEN_CLASS: &str = "hidden";

/// What a click on a style card asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardAction {
    /// Copy the converted text.
    Copy,
    /// Share the converted text.
    Share,
}

impl CardAction {
    /// Returns the attribute value identifying this action.
    pub fn as_str(&self) -> &'static str {
        match self {
            CardAction::Copy => "copy",
            CardAction::Share => "share",
        }
    }

    /// Parses an action attribute value.
    pub fn from_attribute(value: &str) -> Option<Self> {
        match value {
            "copy" => Some(CardAction::Copy),
            "share" => Some(CardAction::Share),
            _ => None,
        }
    }
}

/// Returns the document of the current window.
pub(crate) fn document() -> Result<Document, Error> {
    window()
        .ok_or(Error::UnableToRetrieveWindow)?
        .document()
        .ok_or(Error::UnableToRetrieveDocument)
}

/// Returns the element with the given id.
pub(crate) fn element_by_id(document: &Document, id: &str) -> Result<Element, Error> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| Error::ElementNotFound(id.to_string()))
}

/// Creates an element with the given tag and class list.
fn create_element(document: &Document, tag: &str, class: &str) -> Result<Element, Error> {
    let element = document.create_element(tag)?;
    element.set_class_name(class);
    Ok(element)
}

/// Creates an icon button for a card.
fn create_button(
    document: &Document,
    class: &str,
    icon: &str,
    action: CardAction,
    title: &str,
) -> Result<Element, Error> {
    let button = create_element(document, "button", class)?;
    button.set_inner_html(icon);
    button.set_attribute(ACTION_ATTRIBUTE, action.as_str())?;
    button.set_attribute("title", title)?;
    button.set_attribute("type", "button")?;
    Ok(button)
}

/// Creates the card for one converted style.
fn create_card(document: &Document, index: usize, style: &RenderedStyle) -> Result<Element, Error> {
    let card = create_element(document, "div", CARD_CLASS)?;
    card.set_attribute(INDEX_ATTRIBUTE, &index.to_string())?;

    let preview = create_element(document, "p", PREVIEW_CLASS)?;
    preview.set_text_content(Some(&style.text));

    let name = create_element(document, "span", NAME_CLASS)?;
    name.set_text_content(Some(style.name));

    let copy = create_button(
        document,
        COPY_BUTTON_CLASS,
        COPY_ICON,
        CardAction::Copy,
        "Copy Text",
    )?;
    let share = create_button(
        document,
        SHARE_BUTTON_CLASS,
        SHARE_ICON,
        CardAction::Share,
        "Share Text",
    )?;

    card.append_child(&preview)?;
    card.append_child(&name)?;
    card.append_child(&copy)?;
    card.append_child(&share)?;
    Ok(card)
}

/// Replaces the content of `grid` with one card per style.
pub(crate) fn render_grid(
    document: &Document,
    grid: &Element,
    styles: &[RenderedStyle],
) -> Result<(), Error> {
    grid.set_inner_html("");
    for (index, style) in styles.iter().enumerate() {
        let card = create_card(document, index, style)?;
        grid.append_child(&card)?;
    }
    Ok(())
}

/// Resolves a click inside the grid to the card index and requested action.
///
/// Clicks on the card outside its buttons copy.
pub(crate) fn resolve_click(target: &Element) -> Result<Option<(usize, CardAction)>, Error> {
    let Some(card) = target.closest(&format!("[{INDEX_ATTRIBUTE}]"))? else {
        return Ok(None);
    };
    let Some(index) = card
        .get_attribute(INDEX_ATTRIBUTE)
        .and_then(|value| value.parse().ok())
    else {
        return Ok(None);
    };
    let action = target
        .closest(&format!("[{ACTION_ATTRIBUTE}]"))?
        .and_then(|button| button.get_attribute(ACTION_ATTRIBUTE))
        .and_then(|value| CardAction::from_attribute(&value))
        .unwrap_or(CardAction::Copy);
    Ok(Some((index, action)))
}

/// Updates the counter label and its level class.
pub(crate) fn update_counter(
    element: &Element,
    counter: &CharCounter,
    text: &str,
) -> Result<(), Error> {
    element.set_text_content(Some(&counter.label(text)));
    let classes = element.class_list();
    for level in CounterLevel::ALL {
        classes.remove_1(level.css_class())?;
    }
    classes.add_1(counter.level(text).css_class())?;
    Ok(())
}

/// Fills the repository button with its icon and label.
pub(crate) fn render_repository_button(button: &Element) {
    button.set_inner_html(&format!("{GITHUB_ICON} {REPOSITORY_LABEL}"));
}

/// Shows or hides an element through the `hidden` class.
pub(crate) fn set_hidden(element: &Element, hidden: bool) -> Result<(), Error> {
    element
        .class_list()
        .toggle_with_force(HIDDEN_CLASS, hidden)?;
    Ok(())
}

/// A text field, either an `<input>` or a `<textarea>`.
#[derive(Debug, Clone)]
pub(crate) struct InputField {
    /// The field element.
    element: HtmlElement,
}

impl InputField {
    /// Wraps the element with the given id.
    pub fn find(document: &Document, id: &str) -> Result<Self, Error> {
        let element = element_by_id(document, id)?
            .dyn_into::<HtmlElement>()
            .map_err(|_| Error::ElementNotFound(id.to_string()))?;
        Ok(Self { element })
    }

    /// Returns the element.
    pub fn element(&self) -> &HtmlElement {
        &self.element
    }

    /// Returns the current value.
    pub fn value(&self) -> String {
        Reflect::get(&self.element, &JsValue::from_str("value"))
            .ok()
            .and_then(|value| value.as_string())
            .unwrap_or_default()
    }

    /// Replaces the current value.
    pub fn set_value(&self, value: &str) -> Result<(), Error> {
        Reflect::set(
            &self.element,
            &JsValue::from_str("value"),
            &JsValue::from_str(value),
        )?;
        Ok(())
    }

    /// Focuses the field.
    pub fn focus(&self) -> Result<(), Error> {
        self.element.focus()?;
        Ok(())
    }
}


#[cfg(all(test, target_arch = "wasm32"))]
mod browser_tests {
    use wasm_bindgen_test::*;

    use super::*;
    use crate::catalog::StyleCatalog;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_render_grid_creates_one_card_per_style() {
        let document = document().expect("document");
        let grid = document.create_element("div").expect("grid");
        let styles = StyleCatalog::default().render("Hi");
        render_grid(&document, &grid, &styles).expect("render");

        assert_eq!(grid.child_element_count() as usize, styles.len());
        let first = grid.first_element_child().expect("card");
        assert_eq!(first.get_attribute(INDEX_ATTRIBUTE).as_deref(), Some("0"));
        let preview = first.first_element_child().expect("preview");
        assert_eq!(preview.text_content(), Some(styles[0].text.clone()));
    }

    #[wasm_bindgen_test]
    fn test_resolve_click_on_buttons_and_card() {
        let document = document().expect("document");
        let grid = document.create_element("div").expect("grid");
        let styles = StyleCatalog::default().render("Hi");
        render_grid(&document, &grid, &styles).expect("render");

        let card = grid.children().item(3).expect("card");
        let share = card
            .query_selector("[data-action=share]")
            .expect("query")
            .expect("share button");
        assert_eq!(resolve_click(&share).expect("resolve"), Some((3, CardAction::Share)));
        let preview = card.first_element_child().expect("preview");
        assert_eq!(resolve_click(&preview).expect("resolve"), Some((3, CardAction::Copy)));
        assert_eq!(resolve_click(&grid).expect("resolve"), None);
    }

    #[wasm_bindgen_test]
    fn test_repository_button_label() {
        let document = document().expect("document");
        let button = document.create_element("button").expect("button");
        render_repository_button(&button);
        assert_eq!(button.text_content().as_deref(), Some(" View on GitHub"));
        assert!(button.query_selector("svg").expect("query").is_some());
    }

    #[wasm_bindgen_test]
    fn test_counter_level_classes() {
        let document = document().expect("document");
        let element = document.create_element("span").expect("counter");
        let counter = CharCounter::new(10);
        update_counter(&element, &counter, "123456789").expect("update");
        assert_eq!(element.text_content().as_deref(), Some("9 / 10"));
        assert_eq!(element.class_name(), "text-yellow-500");
        update_counter(&element, &counter, "").expect("update");
        assert_eq!(element.class_name(), "text-gray-400");
    }
}
