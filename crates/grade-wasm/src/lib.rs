//! # grade-wasm
//!
//! WebAssembly bindings for the wholesale grid cart engine.
//!
//! This crate provides:
//! - `addToCartBulk`, the single entry point used by the grid UI
//! - `configure`, to override selectors, delays and endpoints per theme
//! - `web-sys` implementations of the `grade-core` page capabilities
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { addToCartBulk, configure } from 'grade-atacado-wasm';
//!
//! await init();
//!
//! configure({ toast_selector: '#grade-toast' });
//!
//! await addToCartBulk([
//!   { variantId: 101, quantity: 3 },
//!   { variantId: 102, quantity: 1 },
//! ]);
//!
//! window.addEventListener('grade-atacado:cart-updated', (e) => {
//!   console.log('Added', e.detail.totalQty);
//! });
//! ```
//!
//! ## Building
//!
//! ```bash
//! wasm-pack build crates/grade-wasm --target web
//! ```

pub mod dom;
pub mod host;
pub mod page;

use grade_core::{CartInjector, EngineConfig, PageHandles};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

pub use dom::WebDocument;
pub use host::WindowHostCart;
pub use page::{TimeoutDelay, WebNavigator, WebNotifier};

thread_local! {
    static CONFIG: RefCell<EngineConfig> = RefCell::new(EngineConfig::default());
}

/// Initialize the WASM module (called automatically)
#[wasm_bindgen(start)]
pub fn init() {
    // Set up panic hook for better error messages
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    tracing_wasm::set_as_global_default_with_config(
        tracing_wasm::WASMLayerConfigBuilder::new()
            .set_max_level(tracing::Level::INFO)
            .build(),
    );
}

/// Override engine settings from a plain object. Unset keys keep their
/// defaults. Throws if the resulting configuration is invalid.
#[wasm_bindgen]
pub fn configure(options: JsValue) -> Result<(), JsValue> {
    let config: EngineConfig = if options.is_undefined() || options.is_null() {
        EngineConfig::default()
    } else {
        serde_wasm_bindgen::from_value(options)
            .map_err(|e| JsValue::from_str(&format!("Invalid configuration: {}", e)))?
    };

    config
        .validate()
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

    CONFIG.with(|current| *current.borrow_mut() = config);
    Ok(())
}

/// Add every `{ variantId, quantity }` pair to the storefront cart.
///
/// Resolves with no value and never rejects. Invalid items are dropped,
/// and a non-array argument is ignored.
#[wasm_bindgen(js_name = addToCartBulk)]
pub async fn add_to_cart_bulk(items: JsValue) {
    let payload: serde_json::Value =
        serde_wasm_bindgen::from_value(items).unwrap_or(serde_json::Value::Null);

    let config = CONFIG.with(|current| current.borrow().clone());
    let injector = CartInjector::standard(config.clone(), page_handles(&config));
    injector.add_json(&payload).await;
}

/// Browser implementations of every page capability
pub fn page_handles(config: &EngineConfig) -> PageHandles {
    PageHandles {
        host_cart: Rc::new(WindowHostCart::from_config(config)),
        dom: Rc::new(WebDocument::current()),
        notifier: Rc::new(WebNotifier),
        navigator: Rc::new(WebNavigator),
        delay: Rc::new(TimeoutDelay),
    }
}

/// Best-effort text for a thrown JS value
pub(crate) fn js_error_message(value: &JsValue) -> String {
    if let Some(error) = value.dyn_ref::<js_sys::Error>() {
        return String::from(error.message());
    }
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}

/// Get library version
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
