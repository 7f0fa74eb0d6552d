//! # Line Item Types
//!
//! Variant/quantity pairs selected in the wholesale grid, and the validated
//! batch handed to every strategy.

use crate::error::{InjectionError, InjectionResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use tracing::debug;

/// Platform identifier of a product variant.
///
/// Storefronts hand these out either as numbers or as strings, and the host
/// cart expects them back in the same shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VariantId {
    Number(u64),
    Text(String),
}

impl VariantId {
    /// Parse a loosely typed JSON value coming from page scripts
    pub fn from_json(value: &Value) -> InjectionResult<Self> {
        match value {
            Value::Number(n) => {
                if let Some(id) = n.as_u64() {
                    return Ok(VariantId::Number(id));
                }
                // JS numbers arrive as f64 even when integral
                match n.as_f64() {
                    Some(f) if f.is_finite() && f >= 0.0 && f.fract() == 0.0 && f < u64::MAX as f64 => {
                        Ok(VariantId::Number(f as u64))
                    }
                    _ => Err(InjectionError::invalid_item(format!(
                        "variantId {} is not a non-negative integer",
                        n
                    ))),
                }
            }
            Value::String(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    Err(InjectionError::invalid_item("variantId is empty"))
                } else {
                    Ok(VariantId::Text(trimmed.to_string()))
                }
            }
            Value::Null => Err(InjectionError::invalid_item("variantId is missing")),
            other => Err(InjectionError::invalid_item(format!(
                "variantId has unsupported type: {}",
                other
            ))),
        }
    }
}

impl fmt::Display for VariantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VariantId::Number(id) => write!(f, "{}", id),
            VariantId::Text(id) => f.write_str(id),
        }
    }
}

impl From<u64> for VariantId {
    fn from(id: u64) -> Self {
        VariantId::Number(id)
    }
}

impl From<&str> for VariantId {
    fn from(id: &str) -> Self {
        VariantId::Text(id.to_string())
    }
}

/// Line item exactly as the grid UI sent it, before validation
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawLineItem {
    #[serde(default)]
    pub variant_id: Value,
    #[serde(default)]
    pub quantity: Value,
}

impl RawLineItem {
    pub fn new(variant_id: impl Into<Value>, quantity: impl Into<Value>) -> Self {
        Self {
            variant_id: variant_id.into(),
            quantity: quantity.into(),
        }
    }
}

/// A validated variant/quantity pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub variant_id: VariantId,
    pub quantity: u32,
}

impl LineItem {
    /// Create a line item, enforcing a present id and a positive quantity
    pub fn new(variant_id: impl Into<VariantId>, quantity: u32) -> InjectionResult<Self> {
        let variant_id = variant_id.into();
        if let VariantId::Text(ref id) = variant_id {
            if id.trim().is_empty() {
                return Err(InjectionError::invalid_item("variantId is empty"));
            }
        }
        if quantity == 0 {
            return Err(InjectionError::invalid_item("quantity must be > 0"));
        }
        Ok(Self {
            variant_id,
            quantity,
        })
    }

    /// Payload shape the host cart integration expects
    pub fn to_host_item(&self) -> HostCartItem {
        HostCartItem {
            variant_id: self.variant_id.clone(),
            quantity: self.quantity,
        }
    }
}

impl TryFrom<RawLineItem> for LineItem {
    type Error = InjectionError;

    fn try_from(raw: RawLineItem) -> Result<Self, Self::Error> {
        let variant_id = VariantId::from_json(&raw.variant_id)?;
        let quantity = parse_quantity(&raw.quantity)?;
        LineItem::new(variant_id, quantity)
    }
}

fn parse_quantity(value: &Value) -> InjectionResult<u32> {
    let f = match value {
        Value::Number(n) => n.as_f64(),
        Value::Null => return Err(InjectionError::invalid_item("quantity is missing")),
        _ => None,
    }
    .ok_or_else(|| InjectionError::invalid_item(format!("quantity {} is not a number", value)))?;

    if !f.is_finite() || f.fract() != 0.0 {
        return Err(InjectionError::invalid_item(format!(
            "quantity {} is not an integer",
            f
        )));
    }
    if f <= 0.0 {
        return Err(InjectionError::invalid_item("quantity must be > 0"));
    }
    if f > u32::MAX as f64 {
        return Err(InjectionError::invalid_item(format!(
            "quantity {} is out of range",
            f
        )));
    }
    Ok(f as u32)
}

/// Item as passed to the host cart: `{ variant_id, quantity }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HostCartItem {
    pub variant_id: VariantId,
    pub quantity: u32,
}

/// The filtered, order-preserving batch every strategy receives
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidItems {
    items: Vec<LineItem>,
}

impl ValidItems {
    /// Filter raw input, silently dropping anything that fails validation
    pub fn from_raw(raw: impl IntoIterator<Item = RawLineItem>) -> Self {
        let items = raw
            .into_iter()
            .enumerate()
            .filter_map(|(index, raw)| match LineItem::try_from(raw) {
                Ok(item) => Some(item),
                Err(e) => {
                    debug!(index, reason = %e, "Skipping line item");
                    None
                }
            })
            .collect();
        Self { items }
    }

    /// Decode a loosely typed JSON payload. Anything other than an array is
    /// treated as an empty batch.
    pub fn from_json(payload: &Value) -> Self {
        let Some(elements) = payload.as_array() else {
            debug!("Cart payload is not an array, ignoring");
            return Self::default();
        };

        let raw = elements.iter().enumerate().filter_map(|(index, element)| {
            match serde_json::from_value::<RawLineItem>(element.clone()) {
                Ok(raw) => Some(raw),
                Err(e) => {
                    debug!(index, reason = %e, "Skipping malformed line item");
                    None
                }
            }
        });
        Self::from_raw(raw.collect::<Vec<_>>())
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LineItem> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[LineItem] {
        &self.items
    }

    /// Sum of all quantities
    pub fn total_quantity(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    /// Batch without its first `count` items
    pub fn skip_leading(&self, count: usize) -> Self {
        Self {
            items: self.items.iter().skip(count).cloned().collect(),
        }
    }
}

impl From<Vec<LineItem>> for ValidItems {
    fn from(items: Vec<LineItem>) -> Self {
        Self { items }
    }
}

impl<'a> IntoIterator for &'a ValidItems {
    type Item = &'a LineItem;
    type IntoIter = std::slice::Iter<'a, LineItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Detail of the `grade-atacado:cart-updated` page event
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartUpdated {
    pub items: ValidItems,
    pub total_qty: u64,
}

impl CartUpdated {
    pub fn new(items: &ValidItems) -> Self {
        Self {
            items: items.clone(),
            total_qty: items.total_quantity(),
        }
    }
}
