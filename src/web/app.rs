use std::{cell::RefCell, rc::Rc};

use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Element, Event, HtmlElement};

use crate::{
    catalog::{RenderedStyle, StyleCatalog},
    charmap::MapName,
    convert::convert_named,
    counter::CharCounter,
    error::Error,
    logger,
    options::StylerOptions,
    web::{
        clipboard::{copy_to_clipboard, share_text, ShareOutcome, Toast},
        dom::{
            document, element_by_id, render_grid, render_repository_button, resolve_click,
            set_hidden, update_counter, CardAction, InputField,
        },
        event_callback::{EventCallback, CLICK_EVENT_TYPES, INPUT_EVENT_TYPES},
    },
};

/// Page elements and the state derived from the current input.
#[derive(Debug)]
struct StylerView {
    /// The text input.
    input: InputField,
    /// Button clearing the input.
    clear_button: Element,
    /// Container of the style cards.
    grid: Element,
    /// Character counter label.
    counter_element: Element,
    /// Styles to render.
    catalog: StyleCatalog,
    /// Character counter.
    counter: CharCounter,
    /// "Copied" notification.
    toast: Toast,
    /// Outputs currently displayed, indexed like the cards.
    outputs: RefCell<Vec<RenderedStyle>>,
}

impl StylerView {
    /// Re-renders everything that depends on the input value.
    fn refresh(&self) -> Result<(), Error> {
        let value = self.input.value();
        let outputs = self.catalog.render(&value);
        render_grid(&document()?, &self.grid, &outputs)?;
        *self.outputs.borrow_mut() = outputs;
        set_hidden(&self.clear_button, value.is_empty())?;
        update_counter(&self.counter_element, &self.counter, &value)?;
        Ok(())
    }

    /// Empties the input and puts the cursor back into it.
    fn clear(&self) -> Result<(), Error> {
        self.input.set_value("")?;
        self.input.focus()?;
        self.refresh()
    }

    /// Returns the displayed output of the card at `index`.
    fn output(&self, index: usize) -> Option<String> {
        self.outputs
            .borrow()
            .get(index)
            .map(|style| style.text.clone())
    }

    /// Handles a click anywhere inside the grid.
    fn on_grid_click(self: &Rc<Self>, event: &Event) -> Result<(), Error> {
        let Some(target) = event.target().and_then(|target| target.dyn_into::<Element>().ok())
        else {
            return Ok(());
        };
        let Some((index, action)) = resolve_click(&target)? else {
            return Ok(());
        };
        let Some(text) = self.output(index) else {
            tracing::warn!(index, "click on a stale card");
            return Ok(());
        };
        let view = Rc::clone(self);
        spawn_local(async move {
            let result = match action {
                CardAction::Copy => copy_to_clipboard(&text).await.and_then(|()| view.toast.show()),
                CardAction::Share => share_text(&text).await.map(|outcome| {
                    if outcome == ShareOutcome::Copied {
                        tracing::debug!("share unavailable, copied instead");
                    }
                }),
            };
            match result {
                Ok(()) => tracing::debug!(index, action = action.as_str(), "card action done"),
                Err(error) => {
                    tracing::error!(%error, action = action.as_str(), "card action failed")
                }
            }
        });
        Ok(())
    }
}

/// Opens `url` in a new tab.
fn open_in_new_tab(url: &str) -> Result<(), Error> {
    web_sys::window()
        .ok_or(Error::UnableToRetrieveWindow)?
        .open_with_url_and_target(url, "_blank")?;
    Ok(())
}

/// Logs a failed event handler instead of letting it escape into the browser.
fn report(result: Result<(), Error>, handler: &str) {
    if let Err(error) = result {
        tracing::error!(%error, handler, "event handler failed");
    }
}

/// The styler mounted on a page.
///
/// Listeners stay attached for as long as this value lives. Dropping it
/// detaches them.
#[wasm_bindgen]
#[derive(Debug)]
pub struct StylerApp {
    /// Shared view state.
    view: Rc<StylerView>,
    /// Attached listeners.
    _listeners: Vec<EventCallback<Event>>,
}

impl StylerApp {
    /// Mounts the styler on the elements named by `options`.
    ///
    /// Renders the title, the repository button (when the page has one) and
    /// the initial grid, then starts listening for input and clicks.
    pub fn mount(options: StylerOptions) -> Result<Self, Error> {
        let document = document()?;

        let title = element_by_id(&document, options.get_title_id())?;
        title.set_text_content(Some(&convert_named(
            options.get_title(),
            MapName::SerifBold,
            false,
        )));

        let toast = element_by_id(&document, options.get_toast_id())?
            .dyn_into::<HtmlElement>()
            .map_err(|_| Error::ElementNotFound(options.get_toast_id().to_string()))?;

        let view = Rc::new(StylerView {
            input: InputField::find(&document, options.get_input_id())?,
            clear_button: element_by_id(&document, options.get_clear_button_id())?,
            grid: element_by_id(&document, options.get_grid_id())?,
            counter_element: element_by_id(&document, options.get_counter_id())?,
            catalog: StyleCatalog::default().placeholder(options.get_placeholder()),
            counter: CharCounter::new(options.get_char_limit()),
            toast: Toast::new(toast, options.get_toast_duration_ms())?,
            outputs: RefCell::new(Vec::new()),
        });

        let mut listeners = vec![
            EventCallback::new(
                view.input.element().clone().into(),
                INPUT_EVENT_TYPES,
                {
                    let view = Rc::clone(&view);
                    move |_: Event| report(view.refresh(), "input")
                },
            )?,
            EventCallback::new(view.clear_button.clone().into(), CLICK_EVENT_TYPES, {
                let view = Rc::clone(&view);
                move |_: Event| report(view.clear(), "clear")
            })?,
            EventCallback::new(view.grid.clone().into(), CLICK_EVENT_TYPES, {
                let view = Rc::clone(&view);
                move |event: Event| report(view.on_grid_click(&event), "grid click")
            })?,
        ];

        if let Some(button) = document.get_element_by_id(options.get_repository_button_id()) {
            render_repository_button(&button);
            let url = options.get_repository_url().to_string();
            listeners.push(EventCallback::new(
                button.into(),
                CLICK_EVENT_TYPES,
                move |_: Event| report(open_in_new_tab(&url), "repository"),
            )?);
        }

        view.refresh()?;
        tracing::info!(styles = view.catalog.len(), "styler mounted");
        Ok(Self {
            view,
            _listeners: listeners,
        })
    }
}

#[wasm_bindgen]
impl StylerApp {
    /// Re-renders the grid from the current input value.
    pub fn refresh(&self) -> Result<(), JsValue> {
        Ok(self.view.refresh()?)
    }
}

/// Entry point for the page.
///
/// Installs the panic hook and console logger, then mounts the styler with
/// the default element ids. Keep the returned handle alive on the JavaScript
/// side.
#[wasm_bindgen(js_name = startApp)]
pub fn start_app() -> Result<StylerApp, JsValue> {
    std::panic::set_hook(Box::new(console_error_panic_hook::hook));
    let options = StylerOptions::default();
    if let Err(error) = logger::init(options.get_log_level()) {
        web_sys::console::warn_1(&error.into());
    }
    Ok(StylerApp::mount(options)?)
}
