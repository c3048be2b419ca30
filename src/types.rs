//! Ledger entities - strong typing for the on-chain data shapes

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Fixed timestamp pattern for order times and reference timestamps.
pub const TIME_PATTERN: &str = "%Y-%m-%d %H:%M:%S";

/// Settlement party account. Created only at ledger initialization,
/// mutated only by settlement. Balance has no enforced lower bound.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub name: String,
    pub balance: Decimal,
}

/// Listed commodity. Immutable after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Commodity {
    pub name: String,
    pub id: String,
    pub location: String,
    pub price: Decimal,
    #[serde(rename = "owner")]
    pub owner_id: String,
}

/// Order lifecycle status. Serialized as the localized display string
/// the ledger has always stored, so existing records decode unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    #[serde(rename = "新建")]
    New,
    #[serde(rename = "运送中")]
    Processing,
    #[serde(rename = "完成")]
    Done,
    #[serde(rename = "取消")]
    Canceled,
}

impl OrderStatus {
    /// Resolve a symbolic status code from an invocation argument.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "New" => Some(Self::New),
            "Processing" => Some(Self::Processing),
            "Done" => Some(Self::Done),
            "Canceled" => Some(Self::Canceled),
            _ => None,
        }
    }

    /// Localized display string, also the stored form.
    pub fn display(self) -> &'static str {
        match self {
            Self::New => "新建",
            Self::Processing => "运送中",
            Self::Done => "完成",
            Self::Canceled => "取消",
        }
    }

    /// Terminal states accept no further transitions.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Canceled)
    }

    /// Position in the one-way lifecycle; both terminal states share
    /// the final rank.
    pub(crate) fn rank(self) -> u8 {
        match self {
            Self::New => 0,
            Self::Processing => 1,
            Self::Done | Self::Canceled => 2,
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}

/// Order binding a buyer, a seller, and a commodity snapshot.
///
/// The commodity is copied by value at creation time; later changes to
/// the listed commodity never affect an open order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub commodity: Commodity,
    pub id: String,
    #[serde(rename = "orderTime")]
    pub order_time: NaiveDateTime,
    pub status: OrderStatus,
    #[serde(rename = "buyer")]
    pub buyer_id: String,
    #[serde(rename = "seller")]
    pub seller_id: String,
}

/// Parse a timestamp argument under the fixed pattern.
pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, TIME_PATTERN)
        .map_err(|e| Error::Format(format!("timestamp {raw:?}: {e}")))
}

/// Parse a price argument as a non-negative decimal.
pub fn parse_price(raw: &str) -> Result<Decimal> {
    let price: Decimal = raw
        .parse()
        .map_err(|e| Error::Format(format!("price {raw:?}: {e}")))?;
    if price.is_sign_negative() {
        return Err(Error::Format(format!("price {raw:?} is negative")));
    }
    Ok(price)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_resolve() {
        assert_eq!(OrderStatus::from_code("New"), Some(OrderStatus::New));
        assert_eq!(OrderStatus::from_code("Done"), Some(OrderStatus::Done));
        assert_eq!(OrderStatus::from_code("done"), None);
        assert_eq!(OrderStatus::from_code(""), None);
    }

    #[test]
    fn status_display_is_localized() {
        assert_eq!(OrderStatus::Done.display(), "完成");
        assert_eq!(OrderStatus::New.display(), "新建");
    }

    #[test]
    fn timestamp_pattern_is_strict() {
        assert!(parse_timestamp("2021-01-01 06:30:00").is_ok());
        assert!(parse_timestamp("2021-01-01T06:30:00").is_err());
        assert!(parse_timestamp("2021-01-01").is_err());
    }

    #[test]
    fn price_must_be_non_negative_decimal() {
        assert_eq!(parse_price("6.5").unwrap(), Decimal::new(65, 1));
        assert!(parse_price("-1").is_err());
        assert!(parse_price("abc").is_err());
    }

    #[test]
    fn order_json_uses_original_field_names() {
        let order = Order {
            commodity: Commodity {
                name: "国光".into(),
                id: "c1".into(),
                location: "中国".into(),
                price: Decimal::from(6),
                owner_id: "1".into(),
            },
            id: "o1".into(),
            order_time: parse_timestamp("2021-01-01 00:00:00").unwrap(),
            status: OrderStatus::New,
            buyer_id: "3".into(),
            seller_id: "1".into(),
        };
        let json: serde_json::Value = serde_json::to_value(&order).unwrap();
        assert_eq!(json["buyer"], "3");
        assert_eq!(json["seller"], "1");
        assert_eq!(json["status"], "新建");
        assert_eq!(json["commodity"]["owner"], "1");
    }
}
