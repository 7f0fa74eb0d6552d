//! # Selector Table
//!
//! Theme markup is not ours, so each control role is discovered by trying a
//! short list of CSS selectors in priority order. The first one that matches
//! wins.

use crate::item::VariantId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Placeholder substituted with the escaped variant identifier
pub const VARIANT_PLACEHOLDER: &str = "{variant_id}";

/// Role a theme control plays in the add-to-cart flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectorRole {
    VariantSelect,
    QuantityInput,
    AddButton,
}

impl SelectorRole {
    pub const ALL: [SelectorRole; 3] = [
        SelectorRole::VariantSelect,
        SelectorRole::QuantityInput,
        SelectorRole::AddButton,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SelectorRole::VariantSelect => "variant_select",
            SelectorRole::QuantityInput => "quantity_input",
            SelectorRole::AddButton => "add_button",
        }
    }
}

impl fmt::Display for SelectorRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered selector candidates per role
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorTable {
    pub variant_select: Vec<String>,
    pub quantity_input: Vec<String>,
    pub add_button: Vec<String>,
}

impl Default for SelectorTable {
    fn default() -> Self {
        Self {
            variant_select: to_strings(&[
                r#"[data-variant-id="{variant_id}"] select"#,
                r#"select[name="variant_id"]"#,
                r#"select[name="variation"]"#,
                r#"select[name="id"]"#,
                ".js-variation-select",
                r#"input[type="hidden"][name="variant_id"]"#,
            ]),
            quantity_input: to_strings(&[
                r#"[data-variant-id="{variant_id}"] input[name="quantity"]"#,
                r#"input[name="quantity"]"#,
                ".js-quantity-input",
                r#"input[type="number"][name*="quant"]"#,
            ]),
            add_button: to_strings(&[
                r#"[data-variant-id="{variant_id}"] [data-add-to-cart]"#,
                "[data-add-to-cart]",
                r#"button[name="add"]"#,
                ".js-addtocart",
                r#"input[type="submit"][name="add"]"#,
                "button.add-to-cart",
            ]),
        }
    }
}

fn to_strings(selectors: &[&str]) -> Vec<String> {
    selectors.iter().map(|s| s.to_string()).collect()
}

impl SelectorTable {
    /// Raw candidates for a role
    pub fn candidates(&self, role: SelectorRole) -> &[String] {
        match role {
            SelectorRole::VariantSelect => &self.variant_select,
            SelectorRole::QuantityInput => &self.quantity_input,
            SelectorRole::AddButton => &self.add_button,
        }
    }

    /// Builder: replace the candidates of one role
    pub fn with_candidates(mut self, role: SelectorRole, selectors: Vec<String>) -> Self {
        match role {
            SelectorRole::VariantSelect => self.variant_select = selectors,
            SelectorRole::QuantityInput => self.quantity_input = selectors,
            SelectorRole::AddButton => self.add_button = selectors,
        }
        self
    }

    /// Candidates for a role with the variant placeholder filled in,
    /// in lookup order
    pub fn resolve(&self, role: SelectorRole, variant_id: &VariantId) -> Vec<String> {
        let escaped = escape_attr_value(&variant_id.to_string());
        self.candidates(role)
            .iter()
            .map(|selector| selector.replace(VARIANT_PLACEHOLDER, &escaped))
            .collect()
    }
}

/// Escape a value for use inside a double-quoted CSS attribute selector
pub fn escape_attr_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '"' | '\\' => {
                out.push('\\');
                out.push(c);
            }
            '\n' => out.push_str("\\a "),
            c if c.is_control() => {}
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_substitutes_variant() {
        let table = SelectorTable::default()
            .with_candidates(
                SelectorRole::AddButton,
                vec![r#"[data-variant="{variant_id}"] button"#.into(), "button".into()],
            );

        let resolved = table.resolve(SelectorRole::AddButton, &VariantId::Number(42));
        assert_eq!(resolved, vec![r#"[data-variant="42"] button"#, "button"]);
    }

    #[test]
    fn test_escape_attr_value() {
        assert_eq!(escape_attr_value("plain-id"), "plain-id");
        assert_eq!(escape_attr_value(r#"a"b"#), r#"a\"b"#);
        assert_eq!(escape_attr_value(r"a\b"), r"a\\b");
    }

    #[test]
    fn test_default_table_has_all_roles() {
        let table = SelectorTable::default();
        for role in SelectorRole::ALL {
            assert!(!table.candidates(role).is_empty(), "{} has no candidates", role);
        }
    }
}
