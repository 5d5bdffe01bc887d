use std::{cell::Cell, rc::Rc};

use wasm_bindgen_futures::JsFuture;
use web_sys::{
    js_sys::{Function, Object, Promise, Reflect},
    wasm_bindgen::{prelude::Closure, JsCast, JsValue},
    window, Document, HtmlDocument, HtmlElement, HtmlTextAreaElement, Navigator, Window,
};

use crate::error::Error;

/// Title passed to the native share sheet.
const SHARE_TITLE: &str = "Stylish Words";

/// Message shown when sharing falls back to copying.
const SHARE_FALLBACK_MESSAGE: &str = "Share API not available. Text copied to clipboard instead!";

/// How a share request was fulfilled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareOutcome {
    /// The native share sheet was used.
    Shared,
    /// Sharing is unsupported; the text was copied instead.
    Copied,
}

fn window_and_navigator() -> Result<(Window, Navigator), Error> {
    let window = window().ok_or(Error::UnableToRetrieveWindow)?;
    let navigator = window.navigator();
    Ok((window, navigator))
}

/// Copies `text` to the clipboard.
///
/// Uses the asynchronous Clipboard API in secure contexts and falls back to
/// selecting a hidden text area and issuing the `copy` command elsewhere.
pub async fn copy_to_clipboard(text: &str) -> Result<(), Error> {
    let (window, navigator) = window_and_navigator()?;
    let has_clipboard = Reflect::has(&navigator, &JsValue::from_str("clipboard")).unwrap_or(false);
    if has_clipboard && window.is_secure_context() {
        JsFuture::from(navigator.clipboard().write_text(text)).await?;
        return Ok(());
    }
    tracing::debug!("clipboard API unavailable, using selection fallback");
    let document = window.document().ok_or(Error::UnableToRetrieveDocument)?;
    copy_with_selection(&document, text)
}

/// Copies `text` through an off-screen text area.
fn copy_with_selection(document: &Document, text: &str) -> Result<(), Error> {
    let body = document.body().ok_or(Error::UnableToRetrieveDocument)?;
    let textarea = document
        .create_element("textarea")?
        .dyn_into::<HtmlTextAreaElement>()
        .map_err(|_| Error::Js("unable to create textarea".into()))?;
    textarea.set_value(text);
    let style = textarea.style();
    style.set_property("position", "absolute")?;
    style.set_property("left", "-9999px")?;

    body.append_child(&textarea)?;
    textarea.select();
    let copied = document
        .dyn_ref::<HtmlDocument>()
        .ok_or(Error::UnableToRetrieveDocument)
        .and_then(|document| document.exec_command("copy").map_err(Error::from));
    body.remove_child(&textarea)?;

    if !copied? {
        return Err(Error::Js("copy command was rejected".into()));
    }
    Ok(())
}

/// Shares `text` through the native share sheet.
///
/// When the browser has no share sheet, the text is copied and the user is
/// told so with an alert.
pub async fn share_text(text: &str) -> Result<ShareOutcome, Error> {
    let (window, navigator) = window_and_navigator()?;
    let share = Reflect::get(&navigator, &JsValue::from_str("share"))?;
    if let Some(share) = share.dyn_ref::<Function>() {
        let data = Object::new();
        Reflect::set(&data, &JsValue::from_str("title"), &JsValue::from_str(SHARE_TITLE))?;
        Reflect::set(&data, &JsValue::from_str("text"), &JsValue::from_str(text))?;
        let pending = share.call1(&navigator, &data)?;
        JsFuture::from(Promise::resolve(&pending)).await?;
        return Ok(ShareOutcome::Shared);
    }
    copy_to_clipboard(text).await?;
    window.alert_with_message(SHARE_FALLBACK_MESSAGE)?;
    Ok(ShareOutcome::Copied)
}

/// Transient "copied" notification.
///
/// Showing the toast again while it is visible restarts its timer.
#[derive(Debug)]
pub struct Toast {
    /// The window owning the timer.
    window: Window,
    /// The toast element.
    element: HtmlElement,
    /// How long the toast stays visible.
    duration_ms: i32,
    /// Pending hide timer.
    timer: Rc<Cell<Option<i32>>>,
    /// Hides the toast when the timer fires.
    hide: Closure<dyn FnMut()>,
}

impl Toast {
    /// Constructs a new [`Toast`] for the given element.
    pub fn new(element: HtmlElement, duration_ms: i32) -> Result<Self, Error> {
        let window = window().ok_or(Error::UnableToRetrieveWindow)?;
        let timer = Rc::new(Cell::new(None));
        let hide = Closure::<dyn FnMut()>::new({
            let element = element.clone();
            let timer = Rc::clone(&timer);
            move || {
                timer.set(None);
                if let Err(error) = set_visible(&element, false) {
                    tracing::warn!(%error, "unable to hide toast");
                }
            }
        });
        Ok(Self {
            window,
            element,
            duration_ms,
            timer,
            hide,
        })
    }

    /// Shows the toast and schedules it to hide.
    pub fn show(&self) -> Result<(), Error> {
        if let Some(handle) = self.timer.take() {
            self.window.clear_timeout_with_handle(handle);
        }
        set_visible(&self.element, true)?;
        let handle = self.window.set_timeout_with_callback_and_timeout_and_arguments_0(
            self.hide.as_ref().unchecked_ref(),
            self.duration_ms,
        )?;
        self.timer.set(Some(handle));
        Ok(())
    }
}

impl Drop for Toast {
    fn drop(&mut self) {
        if let Some(handle) = self.timer.take() {
            self.window.clear_timeout_with_handle(handle);
        }
    }
}

fn set_visible(element: &HtmlElement, visible: bool) -> Result<(), Error> {
    let style = element.style();
    let (opacity, transform) = if visible {
        ("1", "translateY(0)")
    } else {
        ("0", "translateY(1rem)")
    };
    style.set_property("opacity", opacity)?;
    style.set_property("transform", transform)?;
    Ok(())
}
