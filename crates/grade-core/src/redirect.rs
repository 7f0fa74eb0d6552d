//! # Navigational Fallback
//!
//! Last resort: send the browser to the platform's cart-add endpoint with the
//! whole batch in the query string and let the platform finish the job.

use crate::error::InjectionResult;
use crate::item::ValidItems;
use crate::page::Navigator;
use std::rc::Rc;
use tracing::{info, instrument};
use url::form_urlencoded::byte_serialize;

pub const STRATEGY_NAME: &str = "redirect";

/// Build `<path>?items[]=<variantId>:<quantity>&...`, preserving batch order
pub fn cart_add_url(cart_add_path: &str, items: &ValidItems) -> String {
    let query = items
        .iter()
        .map(|item| {
            let variant: String = byte_serialize(item.variant_id.to_string().as_bytes()).collect();
            format!("items[]={}:{}", variant, item.quantity)
        })
        .collect::<Vec<_>>()
        .join("&");

    if query.is_empty() {
        return cart_add_path.to_string();
    }

    let separator = if cart_add_path.contains('?') { '&' } else { '?' };
    format!("{}{}{}", cart_add_path, separator, query)
}

/// Strategy C. Terminal: the page is gone once navigation succeeds.
pub struct RedirectFallback {
    navigator: Rc<dyn Navigator>,
    cart_add_path: String,
}

impl RedirectFallback {
    pub fn new(navigator: Rc<dyn Navigator>, cart_add_path: impl Into<String>) -> Self {
        Self {
            navigator,
            cart_add_path: cart_add_path.into(),
        }
    }

    /// Navigate to the cart-add endpoint, returning the URL used
    #[instrument(skip_all, fields(strategy = STRATEGY_NAME, items = items.len()))]
    pub fn redirect(&self, items: &ValidItems) -> InjectionResult<String> {
        let url = cart_add_url(&self.cart_add_path, items);
        info!(%url, "Falling back to cart-add navigation");
        self.navigator.navigate(&url)?;
        Ok(url)
    }
}
