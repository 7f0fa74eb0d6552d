//! # Host Cart API Strategy
//!
//! Adds items through the platform's own in-page cart object, one awaited
//! call per item with a fixed pause in between. The host's behaviour under
//! concurrent calls is unknown, so calls are never overlapped.

use crate::error::InjectionResult;
use crate::item::ValidItems;
use crate::page::{Delay, HostCartApi};
use crate::strategy::{CartStrategy, StrategyReport};
use async_trait::async_trait;
use std::rc::Rc;
use std::time::Duration;
use tracing::{debug, instrument, warn};

pub const STRATEGY_NAME: &str = "host_api";

/// Strategy A
pub struct HostApiStrategy {
    cart: Rc<dyn HostCartApi>,
    delay: Rc<dyn Delay>,
    item_delay: Duration,
}

impl HostApiStrategy {
    pub fn new(cart: Rc<dyn HostCartApi>, delay: Rc<dyn Delay>, item_delay: Duration) -> Self {
        Self {
            cart,
            delay,
            item_delay,
        }
    }
}

#[async_trait(?Send)]
impl CartStrategy for HostApiStrategy {
    #[instrument(skip_all, fields(strategy = STRATEGY_NAME, items = items.len()))]
    async fn inject(&self, items: &ValidItems) -> InjectionResult<StrategyReport> {
        if !self.cart.is_available() {
            debug!("Host cart object not present");
            return Ok(StrategyReport::unavailable());
        }

        let mut confirmed = 0;
        for (index, item) in items.iter().enumerate() {
            if index > 0 {
                self.delay.sleep(self.item_delay).await;
            }

            if let Err(e) = self.cart.add_item(&item.to_host_item()).await {
                // Earlier items stay in the real cart, nothing is rolled back
                warn!(
                    index,
                    variant_id = %item.variant_id,
                    confirmed,
                    error = %e,
                    "Host cart call failed, aborting strategy"
                );
                return Ok(StrategyReport::failed(confirmed));
            }

            confirmed += 1;
            debug!(variant_id = %item.variant_id, quantity = item.quantity, "Host cart accepted item");
        }

        Ok(StrategyReport::succeeded(confirmed))
    }

    fn name(&self) -> &'static str {
        STRATEGY_NAME
    }
}
