//! # Cart Injector
//!
//! Orchestrates the fallback chain for one batch:
//!
//! 1. filter the input down to valid items (empty batch: do nothing)
//! 2. try each registered strategy in order, stop at the first success
//! 3. on success, show the toast and dispatch the cart-updated event
//! 4. otherwise navigate to the cart-add endpoint
//!
//! Nothing escapes to the caller. Every failure ends up as a log line and an
//! `InjectionOutcome`.

use crate::config::EngineConfig;
use crate::dom::DomStrategy;
use crate::host_api::HostApiStrategy;
use crate::item::{CartUpdated, RawLineItem, ValidItems};
use crate::page::{Delay, HostCartApi, Navigator, PageDom, PageNotifier};
use crate::redirect::RedirectFallback;
use crate::strategy::{BoxedCartStrategy, StrategyReport, StrategyStatus};
use serde::Serialize;
use serde_json::Value;
use std::rc::Rc;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

/// How a batch was finally handled
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Resolution {
    /// Nothing valid to add
    Skipped,
    /// A strategy reported success
    Added { strategy: &'static str },
    /// Navigation to the cart-add endpoint was started
    Redirected { url: String },
    /// Every strategy failed and there was nowhere to navigate
    Exhausted,
}

/// Result of one `add_to_cart_bulk` call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InjectionOutcome {
    pub succeeded: bool,
    pub total_quantity: u64,
    pub items: ValidItems,
    pub resolution: Resolution,
}

impl InjectionOutcome {
    fn new(items: &ValidItems, resolution: Resolution) -> Self {
        Self {
            succeeded: matches!(resolution, Resolution::Added { .. }),
            total_quantity: items.total_quantity(),
            items: items.clone(),
            resolution,
        }
    }
}

/// Host page capabilities needed by the standard chain
#[derive(Clone)]
pub struct PageHandles {
    pub host_cart: Rc<dyn HostCartApi>,
    pub dom: Rc<dyn PageDom>,
    pub notifier: Rc<dyn PageNotifier>,
    pub navigator: Rc<dyn Navigator>,
    pub delay: Rc<dyn Delay>,
}

/// Runs strategies in priority order, then the navigational fallback
pub struct CartInjector {
    config: EngineConfig,
    strategies: Vec<BoxedCartStrategy>,
    fallback: RedirectFallback,
    notifier: Rc<dyn PageNotifier>,
}

impl CartInjector {
    /// Injector with no strategies yet. Only the redirect fallback runs
    /// until strategies are added.
    pub fn new(
        config: EngineConfig,
        notifier: Rc<dyn PageNotifier>,
        navigator: Rc<dyn Navigator>,
    ) -> Self {
        let fallback = RedirectFallback::new(navigator, config.cart_add_path.clone());
        Self {
            config,
            strategies: Vec::new(),
            fallback,
            notifier,
        }
    }

    /// Host API first, then DOM simulation, then redirect
    pub fn standard(config: EngineConfig, page: PageHandles) -> Self {
        let host = HostApiStrategy::new(
            page.host_cart,
            Rc::clone(&page.delay),
            config.timings.host_item_delay(),
        );
        let dom = DomStrategy::new(
            page.dom,
            page.delay,
            config.selectors.clone(),
            config.timings.clone(),
        );

        Self::new(config, page.notifier, page.navigator)
            .with_strategy(Rc::new(host))
            .with_strategy(Rc::new(dom))
    }

    /// Builder: append a strategy (lowest priority so far)
    pub fn with_strategy(mut self, strategy: BoxedCartStrategy) -> Self {
        self.strategies.push(strategy);
        self
    }

    /// Names of the registered strategies, in priority order
    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Add a batch of raw line items to the cart
    pub async fn add_to_cart_bulk(
        &self,
        items: impl IntoIterator<Item = RawLineItem>,
    ) -> InjectionOutcome {
        self.inject(ValidItems::from_raw(items)).await
    }

    /// Same as `add_to_cart_bulk`, for loosely typed page input
    pub async fn add_json(&self, payload: &Value) -> InjectionOutcome {
        self.inject(ValidItems::from_json(payload)).await
    }

    /// Run the fallback chain for an already validated batch
    pub async fn inject(&self, items: ValidItems) -> InjectionOutcome {
        if items.is_empty() {
            debug!("No valid line items, nothing to do");
            return InjectionOutcome::new(&items, Resolution::Skipped);
        }

        let span = info_span!(
            "add_to_cart_bulk",
            batch_id = %Uuid::new_v4(),
            items = items.len(),
            total_quantity = items.total_quantity()
        );
        self.run_chain(items).instrument(span).await
    }

    async fn run_chain(&self, items: ValidItems) -> InjectionOutcome {
        let mut pending = items.clone();

        for strategy in &self.strategies {
            let report = self.run_strategy(strategy, &pending).await;

            if report.is_success() {
                info!(strategy = strategy.name(), added = report.confirmed, "Items added to cart");
                self.complete(&items);
                return InjectionOutcome::new(
                    &items,
                    Resolution::Added {
                        strategy: strategy.name(),
                    },
                );
            }

            if self.config.skip_confirmed_on_fallback && report.confirmed > 0 {
                debug!(
                    strategy = strategy.name(),
                    confirmed = report.confirmed,
                    "Dropping confirmed items before fallback"
                );
                pending = pending.skip_leading(report.confirmed);
            }
        }

        match self.fallback.redirect(&pending) {
            Ok(url) => InjectionOutcome::new(&items, Resolution::Redirected { url }),
            Err(e) => {
                warn!(error = %e, kind = e.kind(), "Every cart strategy failed");
                InjectionOutcome::new(&items, Resolution::Exhausted)
            }
        }
    }

    /// Strategy boundary: errors become a plain failure
    async fn run_strategy(&self, strategy: &BoxedCartStrategy, items: &ValidItems) -> StrategyReport {
        match strategy.inject(items).await {
            Ok(report) => {
                if report.status == StrategyStatus::Unavailable {
                    debug!(strategy = strategy.name(), "Strategy unavailable, falling through");
                }
                report
            }
            Err(e) if e.is_expected() => {
                debug!(strategy = strategy.name(), reason = %e, "Strategy unavailable, falling through");
                StrategyReport::unavailable()
            }
            Err(e) => {
                warn!(strategy = strategy.name(), error = %e, kind = e.kind(), "Strategy failed");
                StrategyReport::failed(0)
            }
        }
    }

    /// Toast plus cart-updated event. Failures here never undo the add.
    fn complete(&self, items: &ValidItems) {
        let total = items.total_quantity();
        let message = self.config.toast_message(total);

        match self.notifier.show_toast(
            &self.config.toast_selector,
            &message,
            self.config.timings.toast_duration(),
        ) {
            Ok(true) => {}
            Ok(false) => debug!(selector = %self.config.toast_selector, "No toast element on page"),
            Err(e) => warn!(error = %e, "Could not show confirmation toast"),
        }

        let detail = CartUpdated::new(items);
        if let Err(e) = self
            .notifier
            .dispatch_cart_updated(&self.config.event_name, &detail)
        {
            warn!(error = %e, event = %self.config.event_name, "Could not dispatch cart event");
        }
    }
}
