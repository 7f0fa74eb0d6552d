//! Host cart object lookup (`window.LS.cart.add` by default).

use crate::js_error_message;
use async_trait::async_trait;
use grade_core::{host_api, EngineConfig, HostCartApi, HostCartItem, InjectionError, InjectionResult};
use js_sys::{Function, Promise, Reflect};
use serde::Serialize;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;

/// Host cart resolved from `window` on every use, since platform scripts
/// may install it after this module loads.
pub struct WindowHostCart {
    path: Vec<String>,
    method: String,
}

impl WindowHostCart {
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            path: config.host_cart_segments().map(String::from).collect(),
            method: config.host_cart_method.clone(),
        }
    }

    /// The cart object and its add method, if both exist
    fn resolve(&self) -> Option<(JsValue, Function)> {
        let mut target: JsValue = web_sys::window()?.into();
        for segment in &self.path {
            target = Reflect::get(&target, &JsValue::from_str(segment)).ok()?;
            if target.is_undefined() || target.is_null() {
                return None;
            }
        }

        let method = Reflect::get(&target, &JsValue::from_str(&self.method)).ok()?;
        let method = method.dyn_into::<Function>().ok()?;
        Some((target, method))
    }
}

#[async_trait(?Send)]
impl HostCartApi for WindowHostCart {
    fn is_available(&self) -> bool {
        self.resolve().is_some()
    }

    async fn add_item(&self, item: &HostCartItem) -> InjectionResult<()> {
        let (cart, add) = self
            .resolve()
            .ok_or_else(|| InjectionError::unavailable(host_api::STRATEGY_NAME))?;

        let payload = item
            .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
            .map_err(|e| InjectionError::Serialization(e.to_string()))?;

        let returned = add
            .call1(&cart, &payload)
            .map_err(|e| InjectionError::HostCall(js_error_message(&e)))?;

        // Promise, thenable or plain value: all settle the same way
        JsFuture::from(Promise::resolve(&returned))
            .await
            .map_err(|e| InjectionError::HostCall(js_error_message(&e)))?;

        Ok(())
    }
}
