//! # Engine Configuration
//!
//! Every knob has a default matching the stock storefront integration, so
//! `EngineConfig::default()` is a working setup. Overrides come from a TOML
//! document or, in the browser, from a plain JS object.

use crate::error::{InjectionError, InjectionResult};
use crate::selectors::{SelectorRole, SelectorTable};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Placeholder replaced with the total quantity in the toast message
pub const TOTAL_PLACEHOLDER: &str = "{total}";

/// Fixed pauses used to sequence with the host page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timings {
    /// Pause between consecutive host cart calls
    pub host_item_delay_ms: u64,
    /// Settle time after changing the variant control
    pub variant_settle_ms: u64,
    /// Settle time after changing the quantity input
    pub quantity_settle_ms: u64,
    /// Pause after each triggered add-to-cart click
    pub dom_item_delay_ms: u64,
    /// How long the confirmation toast stays visible
    pub toast_duration_ms: u64,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            host_item_delay_ms: 300,
            variant_settle_ms: 300,
            quantity_settle_ms: 100,
            dom_item_delay_ms: 300,
            toast_duration_ms: 3000,
        }
    }
}

impl Timings {
    pub fn host_item_delay(&self) -> Duration {
        Duration::from_millis(self.host_item_delay_ms)
    }

    pub fn variant_settle(&self) -> Duration {
        Duration::from_millis(self.variant_settle_ms)
    }

    pub fn quantity_settle(&self) -> Duration {
        Duration::from_millis(self.quantity_settle_ms)
    }

    pub fn dom_item_delay(&self) -> Duration {
        Duration::from_millis(self.dom_item_delay_ms)
    }

    pub fn toast_duration(&self) -> Duration {
        Duration::from_millis(self.toast_duration_ms)
    }
}

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub timings: Timings,

    pub selectors: SelectorTable,

    /// Platform endpoint used by the navigational fallback
    pub cart_add_path: String,

    /// Name of the page event dispatched after a successful add
    pub event_name: String,

    /// Element that receives the confirmation message, if the page has one
    pub toast_selector: String,

    /// Confirmation message, `{total}` is the summed quantity
    pub toast_template: String,

    /// Dotted path from `window` to the host cart object
    pub host_cart_path: String,

    /// Method on the host cart object that adds one item
    pub host_cart_method: String,

    /// Drop items the previous strategy confirmed before falling back.
    /// Off by default, which can re-add those items.
    pub skip_confirmed_on_fallback: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            timings: Timings::default(),
            selectors: SelectorTable::default(),
            cart_add_path: "/cart/add".to_string(),
            event_name: "grade-atacado:cart-updated".to_string(),
            toast_selector: "#grade-atacado-toast".to_string(),
            toast_template: "{total} produto(s) adicionado(s) ao carrinho!".to_string(),
            host_cart_path: "LS.cart".to_string(),
            host_cart_method: "add".to_string(),
            skip_confirmed_on_fallback: false,
        }
    }
}

impl EngineConfig {
    /// Load configuration from a TOML string, then validate it
    pub fn from_toml(toml_str: &str) -> InjectionResult<Self> {
        let config: EngineConfig = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the configuration is usable
    pub fn validate(&self) -> InjectionResult<()> {
        if !self.cart_add_path.starts_with('/') {
            return Err(InjectionError::Configuration(format!(
                "cart_add_path must be an absolute path, got {:?}",
                self.cart_add_path
            )));
        }

        if self.event_name.trim().is_empty() {
            return Err(InjectionError::Configuration(
                "event_name must not be empty".to_string(),
            ));
        }

        if !self.toast_template.contains(TOTAL_PLACEHOLDER) {
            return Err(InjectionError::Configuration(format!(
                "toast_template must contain {}",
                TOTAL_PLACEHOLDER
            )));
        }

        if self.host_cart_path.split('.').any(|segment| segment.trim().is_empty()) {
            return Err(InjectionError::Configuration(format!(
                "host_cart_path {:?} has an empty segment",
                self.host_cart_path
            )));
        }

        if self.host_cart_method.trim().is_empty() {
            return Err(InjectionError::Configuration(
                "host_cart_method must not be empty".to_string(),
            ));
        }

        for role in SelectorRole::ALL {
            let candidates = self.selectors.candidates(role);
            if candidates.is_empty() || candidates.iter().any(|s| s.trim().is_empty()) {
                return Err(InjectionError::Configuration(format!(
                    "selectors.{} must list at least one non-empty selector",
                    role
                )));
            }
        }

        Ok(())
    }

    /// Confirmation message for a given total quantity
    pub fn toast_message(&self, total_quantity: u64) -> String {
        self.toast_template
            .replace(TOTAL_PLACEHOLDER, &total_quantity.to_string())
    }

    /// Segments of `host_cart_path`
    pub fn host_cart_segments(&self) -> impl Iterator<Item = &str> {
        self.host_cart_path.split('.').map(str::trim)
    }

    /// Builder: set timings
    pub fn with_timings(mut self, timings: Timings) -> Self {
        self.timings = timings;
        self
    }

    /// Builder: set selector table
    pub fn with_selectors(mut self, selectors: SelectorTable) -> Self {
        self.selectors = selectors;
        self
    }

    /// Builder: opt in to dropping confirmed items before falling back
    pub fn with_skip_confirmed_on_fallback(mut self, enabled: bool) -> Self {
        self.skip_confirmed_on_fallback = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.timings.host_item_delay(), Duration::from_millis(300));
        assert_eq!(config.timings.quantity_settle(), Duration::from_millis(100));
        assert_eq!(config.timings.toast_duration(), Duration::from_millis(3000));
    }

    #[test]
    fn test_toast_message() {
        let config = EngineConfig::default();
        assert_eq!(config.toast_message(2), "2 produto(s) adicionado(s) ao carrinho!");
    }

    #[test]
    fn test_from_toml_overrides() {
        let config = EngineConfig::from_toml(
            r##"
            cart_add_path = "/carrinho/adicionar"
            skip_confirmed_on_fallback = true

            [timings]
            variant_settle_ms = 500

            [selectors]
            add_button = ["#buy"]
            "##,
        )
        .unwrap();

        assert_eq!(config.cart_add_path, "/carrinho/adicionar");
        assert!(config.skip_confirmed_on_fallback);
        assert_eq!(config.timings.variant_settle_ms, 500);
        assert_eq!(config.timings.quantity_settle_ms, 100);
        assert_eq!(config.selectors.add_button, vec!["#buy".to_string()]);
        assert!(!config.selectors.variant_select.is_empty());
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        assert!(EngineConfig::from_toml(r#"cart_add_path = "cart/add""#).is_err());
        assert!(EngineConfig::from_toml(r#"toast_template = "added!""#).is_err());
        assert!(EngineConfig::from_toml(r#"host_cart_path = "LS..cart""#).is_err());
        assert!(EngineConfig::from_toml("[selectors]\nquantity_input = []").is_err());
    }

    #[test]
    fn test_host_cart_segments() {
        let config = EngineConfig::default();
        assert_eq!(config.host_cart_segments().collect::<Vec<_>>(), vec!["LS", "cart"]);
    }
}
