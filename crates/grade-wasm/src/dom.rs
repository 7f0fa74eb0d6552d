//! `PageDom` over the live document.

use crate::js_error_message;
use grade_core::{DomControl, DomEvent, InjectionError, InjectionResult, PageDom};
use tracing::warn;
use wasm_bindgen::JsCast;
use web_sys::{
    Document, Element, Event, EventInit, HtmlElement, HtmlInputElement, HtmlSelectElement,
    HtmlTextAreaElement,
};

pub struct WebDocument {
    document: Option<Document>,
}

impl WebDocument {
    pub fn current() -> Self {
        Self {
            document: web_sys::window().and_then(|w| w.document()),
        }
    }
}

impl PageDom for WebDocument {
    fn query_selector(&self, selector: &str) -> InjectionResult<Option<Box<dyn DomControl>>> {
        let Some(document) = &self.document else {
            return Ok(None);
        };

        match document.query_selector(selector) {
            Ok(found) => Ok(found.map(|el| Box::new(WebControl(el)) as Box<dyn DomControl>)),
            Err(e) => {
                // unsupported syntax in this browser counts as no match
                warn!(%selector, error = %js_error_message(&e), "Selector rejected");
                Ok(None)
            }
        }
    }
}

struct WebControl(Element);

fn bubbling_event(name: &str) -> InjectionResult<Event> {
    let init = EventInit::new();
    init.set_bubbles(true);
    Event::new_with_event_init_dict(name, &init)
        .map_err(|e| InjectionError::Dom(js_error_message(&e)))
}

impl DomControl for WebControl {
    fn set_value(&self, value: &str) -> InjectionResult<()> {
        if let Some(select) = self.0.dyn_ref::<HtmlSelectElement>() {
            select.set_value(value);
        } else if let Some(input) = self.0.dyn_ref::<HtmlInputElement>() {
            input.set_value(value);
        } else if let Some(textarea) = self.0.dyn_ref::<HtmlTextAreaElement>() {
            textarea.set_value(value);
        } else {
            self.0
                .set_attribute("value", value)
                .map_err(|e| InjectionError::Dom(js_error_message(&e)))?;
        }
        Ok(())
    }

    fn dispatch(&self, event: DomEvent) -> InjectionResult<()> {
        let event = bubbling_event(event.as_str())?;
        self.0
            .dispatch_event(&event)
            .map_err(|e| InjectionError::Dom(js_error_message(&e)))?;
        Ok(())
    }

    fn click(&self) -> InjectionResult<()> {
        match self.0.dyn_ref::<HtmlElement>() {
            Some(element) => element.click(),
            None => {
                let event = bubbling_event("click")?;
                self.0
                    .dispatch_event(&event)
                    .map_err(|e| InjectionError::Dom(js_error_message(&e)))?;
            }
        }
        Ok(())
    }
}
