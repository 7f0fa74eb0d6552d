//! In-memory page fakes that record everything the engine does.

use crate::error::{InjectionError, InjectionResult};
use crate::item::{CartUpdated, HostCartItem};
use crate::page::{Delay, DomControl, DomEvent, HostCartApi, Navigator, PageDom, PageNotifier};
use async_trait::async_trait;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

pub struct FakeHostCart {
    available: bool,
    fail_on_call: Option<usize>,
    pub calls: RefCell<Vec<HostCartItem>>,
}

impl FakeHostCart {
    pub fn present() -> Self {
        Self {
            available: true,
            fail_on_call: None,
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn absent() -> Self {
        Self {
            available: false,
            ..Self::present()
        }
    }

    /// Throw on the zero-based `index`-th call
    pub fn failing_on(index: usize) -> Self {
        Self {
            fail_on_call: Some(index),
            ..Self::present()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }
}

#[async_trait(?Send)]
impl HostCartApi for FakeHostCart {
    fn is_available(&self) -> bool {
        self.available
    }

    async fn add_item(&self, item: &HostCartItem) -> InjectionResult<()> {
        let index = self.calls.borrow().len();
        self.calls.borrow_mut().push(item.clone());
        if self.fail_on_call == Some(index) {
            return Err(InjectionError::HostCall("422 variant out of stock".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomAction {
    SetValue { selector: String, value: String },
    Dispatch { selector: String, event: DomEvent },
    Click { selector: String },
}

struct FakeControl {
    selector: String,
    actions: Rc<RefCell<Vec<DomAction>>>,
    broken: bool,
}

impl DomControl for FakeControl {
    fn set_value(&self, value: &str) -> InjectionResult<()> {
        if self.broken {
            return Err(InjectionError::Dom("node is detached".into()));
        }
        self.actions.borrow_mut().push(DomAction::SetValue {
            selector: self.selector.clone(),
            value: value.to_string(),
        });
        Ok(())
    }

    fn dispatch(&self, event: DomEvent) -> InjectionResult<()> {
        self.actions.borrow_mut().push(DomAction::Dispatch {
            selector: self.selector.clone(),
            event,
        });
        Ok(())
    }

    fn click(&self) -> InjectionResult<()> {
        if self.broken {
            return Err(InjectionError::Dom("node is detached".into()));
        }
        self.actions.borrow_mut().push(DomAction::Click {
            selector: self.selector.clone(),
        });
        Ok(())
    }
}

/// Document whose elements are keyed by the exact selector that finds them
#[derive(Default)]
pub struct FakeDom {
    elements: HashMap<String, bool>,
    pub queries: RefCell<Vec<String>>,
    pub actions: Rc<RefCell<Vec<DomAction>>>,
}

impl FakeDom {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_element(mut self, selector: &str) -> Self {
        self.elements.insert(selector.to_string(), false);
        self
    }

    /// Element that throws on any mutation
    pub fn with_broken_element(mut self, selector: &str) -> Self {
        self.elements.insert(selector.to_string(), true);
        self
    }

    pub fn clicks(&self) -> Vec<String> {
        self.actions
            .borrow()
            .iter()
            .filter_map(|a| match a {
                DomAction::Click { selector } => Some(selector.clone()),
                _ => None,
            })
            .collect()
    }
}

impl PageDom for FakeDom {
    fn query_selector(&self, selector: &str) -> InjectionResult<Option<Box<dyn DomControl>>> {
        self.queries.borrow_mut().push(selector.to_string());
        Ok(self.elements.get(selector).map(|&broken| {
            Box::new(FakeControl {
                selector: selector.to_string(),
                actions: Rc::clone(&self.actions),
                broken,
            }) as Box<dyn DomControl>
        }))
    }
}

pub struct FakeNotifier {
    has_toast_element: bool,
    pub events: RefCell<Vec<(String, CartUpdated)>>,
    pub toasts: RefCell<Vec<(String, String, Duration)>>,
}

impl FakeNotifier {
    pub fn new() -> Self {
        Self {
            has_toast_element: true,
            events: RefCell::new(Vec::new()),
            toasts: RefCell::new(Vec::new()),
        }
    }

    pub fn without_toast_element() -> Self {
        Self {
            has_toast_element: false,
            ..Self::new()
        }
    }
}

impl PageNotifier for FakeNotifier {
    fn dispatch_cart_updated(&self, event_name: &str, detail: &CartUpdated) -> InjectionResult<()> {
        self.events
            .borrow_mut()
            .push((event_name.to_string(), detail.clone()));
        Ok(())
    }

    fn show_toast(&self, selector: &str, message: &str, duration: Duration) -> InjectionResult<bool> {
        if !self.has_toast_element {
            return Ok(false);
        }
        self.toasts
            .borrow_mut()
            .push((selector.to_string(), message.to_string(), duration));
        Ok(true)
    }
}

pub struct FakeNavigator {
    navigable: bool,
    pub urls: RefCell<Vec<String>>,
}

impl FakeNavigator {
    pub fn new() -> Self {
        Self {
            navigable: true,
            urls: RefCell::new(Vec::new()),
        }
    }

    /// Non-browser context: navigation always fails
    pub fn detached() -> Self {
        Self {
            navigable: false,
            ..Self::new()
        }
    }
}

impl Navigator for FakeNavigator {
    fn navigate(&self, url: &str) -> InjectionResult<()> {
        if !self.navigable {
            return Err(InjectionError::Navigation("no window".into()));
        }
        self.urls.borrow_mut().push(url.to_string());
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingDelay {
    pub sleeps: RefCell<Vec<Duration>>,
}

#[async_trait(?Send)]
impl Delay for RecordingDelay {
    async fn sleep(&self, duration: Duration) {
        self.sleeps.borrow_mut().push(duration);
    }
}

pub fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}
