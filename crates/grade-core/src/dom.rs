//! # DOM Simulation Strategy
//!
//! Drives the theme's own product form: pick the variant, type the quantity,
//! click add-to-cart. Success is operational, meaning a click was dispatched.
//! Nothing here can observe whether the theme actually updated the cart.

use crate::config::Timings;
use crate::error::InjectionResult;
use crate::item::{LineItem, ValidItems};
use crate::page::{Delay, DomControl, DomEvent, PageDom};
use crate::selectors::{SelectorRole, SelectorTable};
use crate::strategy::{CartStrategy, StrategyReport};
use async_trait::async_trait;
use std::rc::Rc;
use tracing::{debug, instrument, warn};

pub const STRATEGY_NAME: &str = "dom";

/// Strategy B
pub struct DomStrategy {
    dom: Rc<dyn PageDom>,
    delay: Rc<dyn Delay>,
    selectors: SelectorTable,
    timings: Timings,
}

impl DomStrategy {
    pub fn new(
        dom: Rc<dyn PageDom>,
        delay: Rc<dyn Delay>,
        selectors: SelectorTable,
        timings: Timings,
    ) -> Self {
        Self {
            dom,
            delay,
            selectors,
            timings,
        }
    }

    /// First control matching any candidate for `role`
    fn locate(&self, role: SelectorRole, item: &LineItem) -> InjectionResult<Option<Box<dyn DomControl>>> {
        for selector in self.selectors.resolve(role, &item.variant_id) {
            if let Some(control) = self.dom.query_selector(&selector)? {
                debug!(%role, %selector, "Control found");
                return Ok(Some(control));
            }
        }
        debug!(%role, variant_id = %item.variant_id, "No control found");
        Ok(None)
    }

    /// Run the three steps for one item. Returns whether an add was triggered.
    async fn add_one(&self, item: &LineItem) -> InjectionResult<bool> {
        if let Some(select) = self.locate(SelectorRole::VariantSelect, item)? {
            select.set_value(&item.variant_id.to_string())?;
            select.dispatch(DomEvent::Change)?;
            self.delay.sleep(self.timings.variant_settle()).await;
        }

        // looked up after the variant change, themes swap forms per variant
        if let Some(input) = self.locate(SelectorRole::QuantityInput, item)? {
            input.set_value(&item.quantity.to_string())?;
            input.dispatch(DomEvent::Input)?;
            input.dispatch(DomEvent::Change)?;
            self.delay.sleep(self.timings.quantity_settle()).await;
        }

        match self.locate(SelectorRole::AddButton, item)? {
            Some(button) => {
                button.click()?;
                self.delay.sleep(self.timings.dom_item_delay()).await;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait(?Send)]
impl CartStrategy for DomStrategy {
    #[instrument(skip_all, fields(strategy = STRATEGY_NAME, items = items.len()))]
    async fn inject(&self, items: &ValidItems) -> InjectionResult<StrategyReport> {
        let mut added = 0;
        for item in items {
            match self.add_one(item).await {
                Ok(true) => added += 1,
                Ok(false) => {
                    debug!(variant_id = %item.variant_id, "Add-to-cart control missing, item skipped");
                }
                Err(e) => {
                    warn!(variant_id = %item.variant_id, error = %e, kind = e.kind(), "DOM error, item skipped");
                }
            }
        }

        debug!(added, total = items.len(), "DOM injection finished");
        if added > 0 {
            Ok(StrategyReport::succeeded(added))
        } else {
            Ok(StrategyReport::failed(0))
        }
    }

    fn name(&self) -> &'static str {
        STRATEGY_NAME
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::StrategyStatus;
    use crate::testing::{ms, DomAction, FakeDom, RecordingDelay};

    fn simple_selectors() -> SelectorTable {
        SelectorTable::default()
            .with_candidates(
                SelectorRole::VariantSelect,
                vec!["#missing-select".into(), r#"select[name="variant_id"]"#.into()],
            )
            .with_candidates(SelectorRole::QuantityInput, vec![r#"input[name="quantity"]"#.into()])
            .with_candidates(
                SelectorRole::AddButton,
                vec![
                    r#"[data-variant-id="{variant_id}"] button"#.into(),
                    "#buy".into(),
                ],
            )
    }

    fn strategy(dom: &Rc<FakeDom>, delay: &Rc<RecordingDelay>) -> DomStrategy {
        DomStrategy::new(dom.clone(), delay.clone(), simple_selectors(), Timings::default())
    }

    fn batch() -> ValidItems {
        ValidItems::from(vec![
            LineItem::new(101u64, 3).unwrap(),
            LineItem::new(102u64, 1).unwrap(),
        ])
    }

    #[tokio::test]
    async fn test_full_form_sequence() {
        let dom = Rc::new(
            FakeDom::empty()
                .with_element(r#"select[name="variant_id"]"#)
                .with_element(r#"input[name="quantity"]"#)
                .with_element("#buy"),
        );
        let delay = Rc::new(RecordingDelay::default());
        let items = ValidItems::from(vec![LineItem::new(101u64, 3).unwrap()]);

        let report = strategy(&dom, &delay).inject(&items).await.unwrap();

        assert_eq!(report, StrategyReport::succeeded(1));
        assert_eq!(
            *dom.actions.borrow(),
            vec![
                DomAction::SetValue { selector: r#"select[name="variant_id"]"#.into(), value: "101".into() },
                DomAction::Dispatch { selector: r#"select[name="variant_id"]"#.into(), event: DomEvent::Change },
                DomAction::SetValue { selector: r#"input[name="quantity"]"#.into(), value: "3".into() },
                DomAction::Dispatch { selector: r#"input[name="quantity"]"#.into(), event: DomEvent::Input },
                DomAction::Dispatch { selector: r#"input[name="quantity"]"#.into(), event: DomEvent::Change },
                DomAction::Click { selector: "#buy".into() },
            ]
        );
        assert_eq!(*delay.sleeps.borrow(), vec![ms(300), ms(100), ms(300)]);
    }

    #[tokio::test]
    async fn test_candidates_tried_in_priority_order() {
        let dom = Rc::new(
            FakeDom::empty()
                .with_element(r#"[data-variant-id="101"] button"#)
                .with_element("#buy"),
        );
        let delay = Rc::new(RecordingDelay::default());
        let items = ValidItems::from(vec![LineItem::new(101u64, 1).unwrap()]);

        strategy(&dom, &delay).inject(&items).await.unwrap();

        assert_eq!(dom.clicks(), vec![r#"[data-variant-id="101"] button"#.to_string()]);
        let queries = dom.queries.borrow();
        assert_eq!(queries[0], "#missing-select");
        assert_eq!(queries[1], r#"select[name="variant_id"]"#);
    }

    #[tokio::test]
    async fn test_partial_success_is_success() {
        // only 102 has a per-variant button
        let selectors = simple_selectors().with_candidates(
            SelectorRole::AddButton,
            vec![r#"[data-variant-id="{variant_id}"] button"#.into()],
        );
        let dom = Rc::new(FakeDom::empty().with_element(r#"[data-variant-id="102"] button"#));
        let delay = Rc::new(RecordingDelay::default());
        let strategy = DomStrategy::new(dom.clone(), delay.clone(), selectors, Timings::default());

        let report = strategy.inject(&batch()).await.unwrap();

        assert_eq!(report, StrategyReport::succeeded(1));
        assert_eq!(dom.clicks().len(), 1);
    }

    #[tokio::test]
    async fn test_no_controls_is_failure() {
        let dom = Rc::new(FakeDom::empty());
        let delay = Rc::new(RecordingDelay::default());

        let report = strategy(&dom, &delay).inject(&batch()).await.unwrap();

        assert_eq!(report.status, StrategyStatus::Failed);
        assert!(dom.actions.borrow().is_empty());
        assert!(delay.sleeps.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_dom_error_on_every_item_is_failure() {
        let dom = Rc::new(FakeDom::empty().with_broken_element("#buy"));
        let delay = Rc::new(RecordingDelay::default());

        let report = strategy(&dom, &delay).inject(&batch()).await.unwrap();

        assert_eq!(report, StrategyReport::failed(0));
        assert!(dom.clicks().is_empty());
        // both items were attempted
        assert_eq!(dom.queries.borrow().iter().filter(|q| *q == "#buy").count(), 2);
    }

    #[tokio::test]
    async fn test_dom_error_does_not_abort_remaining_items() {
        let dom = Rc::new(
            FakeDom::empty()
                .with_broken_element(r#"[data-variant-id="101"] button"#)
                .with_element(r#"[data-variant-id="102"] button"#),
        );
        let delay = Rc::new(RecordingDelay::default());

        let report = strategy(&dom, &delay).inject(&batch()).await.unwrap();

        assert_eq!(report, StrategyReport::succeeded(1));
        assert_eq!(dom.clicks(), vec![r#"[data-variant-id="102"] button"#.to_string()]);
    }
}
