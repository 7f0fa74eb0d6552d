//! # Cart Strategy Trait
//!
//! Each way of getting line items into the platform cart implements
//! `CartStrategy`. The injector runs them in priority order and stops at the
//! first one that reports success.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    CartStrategy (trait)                     │
//! │  ├── inject()                                               │
//! │  └── name()                                                 │
//! └─────────────────────────────────────────────────────────────┘
//!                            ▲
//!               ┌────────────┴────────────┐
//!               │                         │
//!       ┌───────┴───────┐         ┌───────┴───────┐
//!       │HostApiStrategy│         │  DomStrategy  │ ──► RedirectFallback
//!       │      (A)      │         │      (B)      │          (C)
//!       └───────────────┘         └───────────────┘
//! ```

use crate::error::InjectionResult;
use crate::item::ValidItems;
use async_trait::async_trait;
use std::rc::Rc;

/// How a strategy attempt ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyStatus {
    Succeeded,
    Failed,
    /// The capability it needs is absent on this page
    Unavailable,
}

/// Result of one strategy attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrategyReport {
    pub status: StrategyStatus,
    /// Items confirmed added. For serialized strategies these are the leading
    /// items of the batch.
    pub confirmed: usize,
}

impl StrategyReport {
    pub fn succeeded(confirmed: usize) -> Self {
        Self {
            status: StrategyStatus::Succeeded,
            confirmed,
        }
    }

    pub fn failed(confirmed: usize) -> Self {
        Self {
            status: StrategyStatus::Failed,
            confirmed,
        }
    }

    pub fn unavailable() -> Self {
        Self {
            status: StrategyStatus::Unavailable,
            confirmed: 0,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == StrategyStatus::Succeeded
    }
}

/// One method of registering a batch with the platform cart.
///
/// Returning `Err` is a runtime failure. The injector logs it and moves on to
/// the next strategy, exactly as for `StrategyReport::failed`.
#[async_trait(?Send)]
pub trait CartStrategy {
    /// Attempt to add every item of the batch
    async fn inject(&self, items: &ValidItems) -> InjectionResult<StrategyReport>;

    /// Strategy name (for logging and outcomes)
    fn name(&self) -> &'static str;
}

/// Shared handle to a strategy (dynamic dispatch)
pub type BoxedCartStrategy = Rc<dyn CartStrategy>;
