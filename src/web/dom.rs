//! `web-sys` implementations of the core element traits.

use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement, Window};

use crate::alerts::Dismissible;
use crate::confirm::Prompt;
use crate::menu::{ActiveClass, Viewport};
use crate::validation::RequiredField;

/// All elements matching `selector` under `root`. An invalid selector
/// matches nothing.
pub fn query_all(root: &impl AsRef<Element>, selector: &str) -> Vec<Element> {
    collect(root.as_ref().query_selector_all(selector))
}

pub fn query_document(document: &Document, selector: &str) -> Vec<Element> {
    collect(document.query_selector_all(selector))
}

fn collect(list: Result<web_sys::NodeList, wasm_bindgen::JsValue>) -> Vec<Element> {
    let Ok(list) = list else {
        tracing::warn!("Invalid selector in configuration");
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

pub struct AlertBanner(pub HtmlElement);

impl Dismissible for AlertBanner {
    fn fade_out(&self) {
        let _ = self.0.style().set_property("opacity", "0");
    }

    fn detach(&self) {
        // Element.remove() on a detached node does nothing
        self.0.remove();
    }
}

pub struct FormControl(pub Element);

impl RequiredField for FormControl {
    fn value(&self) -> String {
        if let Some(input) = self.0.dyn_ref::<HtmlInputElement>() {
            input.value()
        } else if let Some(area) = self.0.dyn_ref::<HtmlTextAreaElement>() {
            area.value()
        } else if let Some(select) = self.0.dyn_ref::<HtmlSelectElement>() {
            select.value()
        } else {
            // Custom elements carrying `required` without a value property
            self.0.get_attribute("value").unwrap_or_default()
        }
    }

    fn set_border_color(&self, color: &str) {
        if let Some(el) = self.0.dyn_ref::<HtmlElement>() {
            let _ = el.style().set_property("border-color", color);
        }
    }
}

pub struct ClassToggle {
    pub element: Element,
    pub class: String,
}

impl ActiveClass for ClassToggle {
    fn is_active(&self) -> bool {
        self.element.class_list().contains(&self.class)
    }

    fn set_active(&self, active: bool) {
        let list = self.element.class_list();
        let _ = if active {
            list.add_1(&self.class)
        } else {
            list.remove_1(&self.class)
        };
    }
}

pub struct WindowViewport(pub Window);

impl Viewport for WindowViewport {
    fn width(&self) -> f64 {
        self.0
            .inner_width()
            .ok()
            .and_then(|w| w.as_f64())
            .unwrap_or(0.0)
    }
}

pub struct WindowPrompt(pub Window);

impl Prompt for WindowPrompt {
    fn confirm(&self, message: &str) -> bool {
        // A blocked dialog counts as "no"
        self.0.confirm_with_message(message).unwrap_or(false)
    }

    fn alert(&self, message: &str) {
        let _ = self.0.alert_with_message(message);
    }
}
