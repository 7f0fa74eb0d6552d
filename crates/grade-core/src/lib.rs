//! # grade-core
//!
//! Bulk add-to-cart engine for the wholesale variant grid.
//!
//! This crate provides:
//! - `LineItem` and `ValidItems` for validated variant/quantity batches
//! - `CartStrategy` trait with the host API and DOM simulation strategies
//! - `RedirectFallback` for the `/cart/add` navigation fallback
//! - `CartInjector`, which runs the chain and emits the confirmation
//! - Capability traits (`HostCartApi`, `PageDom`, ...) implemented by the
//!   browser bindings
//! - `InjectionError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use grade_core::{CartInjector, EngineConfig, PageHandles, RawLineItem};
//!
//! let injector = CartInjector::standard(EngineConfig::default(), page_handles);
//!
//! let outcome = injector
//!     .add_to_cart_bulk(vec![RawLineItem::new(101, 3), RawLineItem::new(102, 1)])
//!     .await;
//!
//! if outcome.succeeded {
//!     // toast shown, `grade-atacado:cart-updated` dispatched
//! }
//! ```

pub mod config;
pub mod dom;
pub mod engine;
pub mod error;
pub mod host_api;
pub mod item;
pub mod page;
pub mod redirect;
pub mod selectors;
pub mod strategy;

#[cfg(test)]
pub(crate) mod testing;

// Re-exports for convenience
pub use config::{EngineConfig, Timings};
pub use dom::DomStrategy;
pub use engine::{CartInjector, InjectionOutcome, PageHandles, Resolution};
pub use error::{InjectionError, InjectionResult};
pub use host_api::HostApiStrategy;
pub use item::{CartUpdated, HostCartItem, LineItem, RawLineItem, ValidItems, VariantId};
pub use page::{Delay, DomControl, DomEvent, HostCartApi, Navigator, PageDom, PageNotifier};
pub use redirect::{cart_add_url, RedirectFallback};
pub use selectors::{SelectorRole, SelectorTable};
pub use strategy::{BoxedCartStrategy, CartStrategy, StrategyReport, StrategyStatus};
