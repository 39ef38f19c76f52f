//! Data models for orders and clients

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Sentinel: order placed without any client reference
pub const NO_CLIENT: &str = "null";

/// Sentinel: client record without a secondary phone number
pub const NO_ALT_NUMBER: &str = "0";

/// Client id reserved for the shop itself (walk-in / counter orders)
pub const SHOP_CLIENT_ID: &str = "0";

/// Portion size of an order line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SizeVariant {
    #[default]
    Normal,
    Large,
    Xl,
}

impl SizeVariant {
    /// Short label printed on the receipt
    pub fn label(&self) -> &'static str {
        match self {
            SizeVariant::Normal => "normal",
            SizeVariant::Large => "doble",
            SizeVariant::Xl => "triple",
        }
    }
}

/// Add-on the customer pays for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaidAddon {
    pub name: String,
    pub price: Decimal,
}

/// One line of an order: an item with optional add-ons
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLine {
    pub item_name: String,
    #[serde(default)]
    pub size: SizeVariant,
    pub price: Decimal,
    pub quantity: u32,
    #[serde(default)]
    pub free_addons: Vec<String>,
    #[serde(default)]
    pub paid_addons: Vec<PaidAddon>,
}

impl OrderLine {
    /// Line total. The unit price already includes paid add-ons; their
    /// own prices only appear on the add-on row of the receipt.
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }

    /// Extra receipt rows: one for free add-ons, one for paid add-ons
    pub fn addon_rows(&self) -> usize {
        usize::from(!self.free_addons.is_empty()) + usize::from(!self.paid_addons.is_empty())
    }
}

/// Incoming order as submitted by the counter terminal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderRequest {
    pub lines: Vec<OrderLine>,
    /// Client reference: "null" = none, "0" = the shop itself
    #[serde(default = "default_client_id")]
    pub client_id: String,
    #[serde(default)]
    pub delivery_fee: Decimal,
    /// Minutes until the order should be ready
    #[serde(default = "default_estimated_minutes")]
    pub estimated_minutes: u32,
    /// Phone number typed at the counter, shown when no client matches
    #[serde(default)]
    pub display_number: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

fn default_client_id() -> String {
    NO_CLIENT.to_string()
}

fn default_estimated_minutes() -> u32 {
    20
}

impl OrderRequest {
    /// Sum of all line totals, delivery not included
    pub fn total(&self) -> Decimal {
        self.lines.iter().map(|l| l.line_total()).sum()
    }
}

/// Order after numbering and client resolution, as persisted
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedOrder {
    /// Stable id: "{day_key}@{sequence}"
    pub id: String,
    pub day_key: String,
    pub sequence: u32,
    /// Unix timestamp in milliseconds
    pub created_at: i64,
    pub lines: Vec<OrderLine>,
    pub total: Decimal,
    pub delivery_fee: Decimal,
    /// Primary key of the resolved client, or the "null" sentinel
    pub client: String,
    /// Name snapshot: the resolved client's name, or the typed display
    /// name when no client matched
    pub client_name: Option<String>,
    pub client_address: Option<String>,
    /// Secondary phone of the resolved client ("0" = none)
    pub alt_number: Option<String>,
    pub display_number: Option<String>,
    pub estimated_minutes: u32,
    pub notes: Option<String>,
}

impl ResolvedOrder {
    pub fn total_with_delivery(&self) -> Decimal {
        self.total + self.delivery_fee
    }

    /// Order number as printed: zero-padded to three digits
    pub fn printed_number(&self) -> String {
        format!("{:03}", self.sequence)
    }
}

/// Client record, keyed by primary phone number
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Client {
    /// Primary phone number
    pub id: String,
    /// Secondary phone number, "0" when absent
    #[serde(default = "default_alt_number")]
    pub alt_number: String,
    pub name: String,
    #[serde(default)]
    pub address: String,
}

fn default_alt_number() -> String {
    NO_ALT_NUMBER.to_string()
}

impl Client {
    pub fn has_alt_number(&self) -> bool {
        self.alt_number != NO_ALT_NUMBER && !self.alt_number.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn line(price: &str, qty: u32) -> OrderLine {
        OrderLine {
            item_name: "Kebab".to_string(),
            size: SizeVariant::Normal,
            price: dec(price),
            quantity: qty,
            free_addons: vec![],
            paid_addons: vec![],
        }
    }

    #[test]
    fn test_line_total_ignores_paid_addon_prices() {
        // Unit price is already inclusive of paid add-ons
        let mut l = line("5.50", 2);
        l.paid_addons.push(PaidAddon {
            name: "Queso".to_string(),
            price: dec("1.00"),
        });
        assert_eq!(l.line_total(), dec("11.00"));
    }

    #[test]
    fn test_addon_rows_count_presence_not_items() {
        let mut l = line("5.50", 1);
        assert_eq!(l.addon_rows(), 0);
        l.free_addons.push("Ensalada".to_string());
        l.free_addons.push("Pepino".to_string());
        assert_eq!(l.addon_rows(), 1);
        l.paid_addons.push(PaidAddon {
            name: "Queso".to_string(),
            price: dec("1.00"),
        });
        assert_eq!(l.addon_rows(), 2);
    }

    #[test]
    fn test_request_total_sums_lines() {
        let req = OrderRequest {
            lines: vec![line("5.50", 1), line("4.00", 3)],
            client_id: NO_CLIENT.to_string(),
            delivery_fee: Decimal::ZERO,
            estimated_minutes: 20,
            display_number: None,
            display_name: None,
            notes: None,
        };
        assert_eq!(req.total(), dec("17.50"));
    }

    #[test]
    fn test_printed_number_zero_padded() {
        let order = ResolvedOrder {
            id: "28-8-2026@7".to_string(),
            day_key: "28-8-2026".to_string(),
            sequence: 7,
            created_at: 0,
            lines: vec![],
            total: Decimal::ZERO,
            delivery_fee: Decimal::ZERO,
            client: NO_CLIENT.to_string(),
            client_name: None,
            client_address: None,
            alt_number: None,
            display_number: None,
            estimated_minutes: 20,
            notes: None,
        };
        assert_eq!(order.printed_number(), "007");
    }

    #[test]
    fn test_size_variant_serde_lowercase() {
        let json = serde_json::to_string(&SizeVariant::Large).unwrap();
        assert_eq!(json, "\"large\"");
        let back: SizeVariant = serde_json::from_str("\"xl\"").unwrap();
        assert_eq!(back, SizeVariant::Xl);
    }
}
