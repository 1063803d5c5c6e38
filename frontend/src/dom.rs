//! Small DOM helpers shared by the page enhancements.

use gloo_utils::{document, window};
use shared::Size;
use wasm_bindgen::JsCast;
use web_sys::{Element, EventTarget, HtmlElement};

/// Elements whose own click behaviour must not be hijacked by row clicks.
pub const INTERACTIVE_SELECTOR: &str = "a, button, input, select, textarea, label, form";

pub fn element_from_target(target: Option<EventTarget>) -> Option<Element> {
    target.and_then(|t| t.dyn_into::<Element>().ok())
}

pub fn closest(element: &Element, selector: &str) -> Option<Element> {
    element.closest(selector).ok().flatten()
}

/// Attribute value with surrounding whitespace removed; blank counts as absent.
pub fn attr(element: &Element, name: &str) -> Option<String> {
    element
        .get_attribute(name)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub fn query_all(root: &Element, selector: &str) -> Vec<Element> {
    let mut found = Vec::new();
    if let Ok(list) = root.query_selector_all(selector) {
        for i in 0..list.length() {
            if let Some(el) = list.item(i).and_then(|n| n.dyn_into::<Element>().ok()) {
                found.push(el);
            }
        }
    }
    found
}

pub fn query_document(selector: &str) -> Vec<Element> {
    match document().document_element() {
        Some(root) => query_all(&root, selector),
        None => Vec::new(),
    }
}

pub fn set_visible(element: &Element, visible: bool) {
    if let Some(el) = element.dyn_ref::<HtmlElement>() {
        let style = el.style();
        let result = if visible {
            style.remove_property("display").map(|_| ())
        } else {
            style.set_property("display", "none")
        };
        if result.is_err() {
            log::debug!("Could not toggle visibility of <{}>", element.tag_name());
        }
    }
}

pub fn viewport_size() -> Size {
    let w = window();
    Size {
        width: w.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0),
        height: w.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0),
    }
}

/// Whether a form's `action` attribute posts to `action` (a path).
///
/// Compares whole paths so `/admin/user/remove/4` does not match a form for
/// user 42; a query string or an absolute origin on the attribute is ignored.
pub fn form_action_matches(attribute: &str, action: &str) -> bool {
    let path = attribute
        .split(|c| c == '?' || c == '#')
        .next()
        .unwrap_or_default()
        .trim();
    let path = match path.find("://") {
        Some(scheme_end) => {
            let rest = &path[scheme_end + 3..];
            rest.find('/').map(|i| &rest[i..]).unwrap_or("/")
        }
        None => path,
    };
    path.trim_end_matches('/') == action.trim_end_matches('/')
}
