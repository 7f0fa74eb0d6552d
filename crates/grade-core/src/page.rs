//! # Page Capabilities
//!
//! Narrow contracts for everything the engine touches on the host page.
//! The browser bindings implement them over `web-sys`, tests use fakes.
//!
//! ```text
//! ┌──────────────┐   HostCartApi   ┌───────────────────────────┐
//! │              │ ──────────────► │ window.LS.cart.add(...)   │
//! │              │   PageDom       ├───────────────────────────┤
//! │ CartInjector │ ──────────────► │ theme selects/inputs/btns │
//! │              │   PageNotifier  ├───────────────────────────┤
//! │              │ ──────────────► │ CustomEvent + toast       │
//! │              │   Navigator     ├───────────────────────────┤
//! │              │ ──────────────► │ location.href             │
//! └──────────────┘                 └───────────────────────────┘
//! ```
//!
//! The page runs on a single thread, so none of these are `Send`.

use crate::error::InjectionResult;
use crate::item::{CartUpdated, HostCartItem};
use async_trait::async_trait;
use std::time::Duration;

/// Platform-provided in-page cart integration
#[async_trait(?Send)]
pub trait HostCartApi {
    /// Whether the host cart object exists right now
    fn is_available(&self) -> bool;

    /// Add one item, resolving once the host has accepted it
    async fn add_item(&self, item: &HostCartItem) -> InjectionResult<()>;
}

/// Notification raised on a control after its value changes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DomEvent {
    Input,
    Change,
}

impl DomEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            DomEvent::Input => "input",
            DomEvent::Change => "change",
        }
    }
}

/// A theme-owned element located on the page
pub trait DomControl {
    fn set_value(&self, value: &str) -> InjectionResult<()>;

    fn dispatch(&self, event: DomEvent) -> InjectionResult<()>;

    /// Simulated user click
    fn click(&self) -> InjectionResult<()>;
}

/// Read/query access to the rendered document
pub trait PageDom {
    /// First element matching `selector`, or `None`
    fn query_selector(&self, selector: &str) -> InjectionResult<Option<Box<dyn DomControl>>>;
}

/// Outbound signals to the shopper and to other page scripts
pub trait PageNotifier {
    fn dispatch_cart_updated(&self, event_name: &str, detail: &CartUpdated) -> InjectionResult<()>;

    /// Show a transient message. Returns `false` when the page has no
    /// element matching `selector`.
    fn show_toast(&self, selector: &str, message: &str, duration: Duration) -> InjectionResult<bool>;
}

/// Full-page navigation
pub trait Navigator {
    /// Errors when there is no navigable context
    fn navigate(&self, url: &str) -> InjectionResult<()>;
}

/// Cooperative pause on the page's event loop
#[async_trait(?Send)]
pub trait Delay {
    async fn sleep(&self, duration: Duration);
}
