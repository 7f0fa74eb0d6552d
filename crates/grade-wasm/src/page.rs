//! Notifications, navigation and timers on the real window.

use crate::js_error_message;
use async_trait::async_trait;
use grade_core::{CartUpdated, Delay, InjectionError, InjectionResult, Navigator, PageNotifier};
use js_sys::Promise;
use serde::Serialize;
use std::cell::Cell;
use std::time::Duration;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{CustomEvent, CustomEventInit, HtmlElement, Window};

/// Attribute set on the toast element while it is visible
pub const TOAST_VISIBLE_ATTR: &str = "data-visible";

thread_local! {
    // pending hide timer, so a new toast is not hidden early by the previous one
    static TOAST_TIMER: Cell<Option<i32>> = const { Cell::new(None) };
}

/// `setTimeout` delay in milliseconds, clamped to what the browser accepts
pub fn timeout_ms(duration: Duration) -> i32 {
    i32::try_from(duration.as_millis()).unwrap_or(i32::MAX)
}

fn window() -> InjectionResult<Window> {
    web_sys::window().ok_or_else(|| InjectionError::Navigation("no window".to_string()))
}

pub struct WebNotifier;

impl PageNotifier for WebNotifier {
    fn dispatch_cart_updated(&self, event_name: &str, detail: &CartUpdated) -> InjectionResult<()> {
        let window = window().map_err(|e| InjectionError::Notification(e.to_string()))?;

        let detail = detail
            .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
            .map_err(|e| InjectionError::Serialization(e.to_string()))?;

        let init = CustomEventInit::new();
        init.set_detail(&detail);
        let event = CustomEvent::new_with_event_init_dict(event_name, &init)
            .map_err(|e| InjectionError::Notification(js_error_message(&e)))?;

        window
            .dispatch_event(&event)
            .map_err(|e| InjectionError::Notification(js_error_message(&e)))?;
        Ok(())
    }

    fn show_toast(&self, selector: &str, message: &str, duration: Duration) -> InjectionResult<bool> {
        let Ok(window) = window() else {
            return Ok(false);
        };
        let Some(document) = window.document() else {
            return Ok(false);
        };
        let element = match document.query_selector(selector) {
            Ok(Some(el)) => el,
            _ => return Ok(false),
        };

        element.set_text_content(Some(message));
        element
            .set_attribute(TOAST_VISIBLE_ATTR, "true")
            .map_err(|e| InjectionError::Notification(js_error_message(&e)))?;
        if let Some(html) = element.dyn_ref::<HtmlElement>() {
            html.set_hidden(false);
        }

        if let Some(previous) = TOAST_TIMER.with(Cell::take) {
            window.clear_timeout_with_handle(previous);
        }

        let hide = Closure::once_into_js(move || {
            let _ = element.remove_attribute(TOAST_VISIBLE_ATTR);
            if let Some(html) = element.dyn_ref::<HtmlElement>() {
                html.set_hidden(true);
            }
            TOAST_TIMER.with(|timer| timer.set(None));
        });

        let handle = window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                hide.unchecked_ref(),
                timeout_ms(duration),
            )
            .map_err(|e| InjectionError::Notification(js_error_message(&e)))?;
        TOAST_TIMER.with(|timer| timer.set(Some(handle)));

        Ok(true)
    }
}

pub struct WebNavigator;

impl Navigator for WebNavigator {
    fn navigate(&self, url: &str) -> InjectionResult<()> {
        window()?
            .location()
            .set_href(url)
            .map_err(|e| InjectionError::Navigation(js_error_message(&e)))
    }
}

/// `setTimeout`-backed pause
pub struct TimeoutDelay;

#[async_trait(?Send)]
impl Delay for TimeoutDelay {
    async fn sleep(&self, duration: Duration) {
        let Some(window) = web_sys::window() else {
            return;
        };

        let ms = timeout_ms(duration);
        let promise = Promise::new(&mut |resolve, _reject| {
            if window
                .set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms)
                .is_err()
            {
                let _ = resolve.call0(&JsValue::NULL);
            }
        });
        let _ = JsFuture::from(promise).await;
    }
}
