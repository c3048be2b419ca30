//! Seed configuration - the records written at ledger initialization

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};

/// Records seeded into the world state when the ledger is initialized.
/// Accounts are never created afterward.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedConfig {
    pub accounts: Vec<SeedAccount>,
    pub commodities: Vec<SeedCommodity>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedAccount {
    pub id: String,
    pub name: String,
    pub balance: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedCommodity {
    pub name: String,
    pub id: String,
    pub location: String,
    pub price: Decimal,
    pub owner: String,
}

impl Default for SeedConfig {
    /// The fixed seed set: supplier, logistics and buyer accounts at
    /// balance 1000, plus three apple listings owned by the supplier.
    fn default() -> Self {
        let accounts = ["供货商", "物流商", "买家"]
            .into_iter()
            .enumerate()
            .map(|(i, name)| SeedAccount {
                id: (i + 1).to_string(),
                name: name.to_string(),
                balance: Decimal::from(1000),
            })
            .collect();

        let ids = [
            "88efd7ea-bec6-4994-8ed1-f3f7b6f8cac7",
            "36bf5c7f-4cf7-4926-b0f6-0c5c18515752",
            "d9ce807b-e308-11e8-a47c-3e1591a6f5bb",
        ];
        let commodities = ["国光", "红星", "红富士"]
            .into_iter()
            .enumerate()
            .map(|(i, name)| SeedCommodity {
                name: name.to_string(),
                id: ids[i].to_string(),
                location: "中国".to_string(),
                price: Decimal::from(6 + i as i64),
                owner: "1".to_string(),
            })
            .collect();

        Self {
            accounts,
            commodities,
        }
    }
}

impl SeedConfig {
    /// Load from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Validation(format!("failed to read config: {e}")))?;
        toml::from_str(&content)
            .map_err(|e| Error::Validation(format!("failed to parse config: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_seeds_match_the_fixed_ledger_setup() {
        let config = SeedConfig::default();
        assert_eq!(config.accounts.len(), 3);
        assert_eq!(config.accounts[0].id, "1");
        assert_eq!(config.accounts[2].name, "买家");
        assert!(config.accounts.iter().all(|a| a.balance == Decimal::from(1000)));

        assert_eq!(config.commodities.len(), 3);
        assert_eq!(config.commodities[0].price, Decimal::from(6));
        assert_eq!(config.commodities[2].price, Decimal::from(8));
        assert!(config.commodities.iter().all(|c| c.owner == "1"));
    }

    #[test]
    fn seeds_parse_from_toml() {
        let raw = r#"
            [[accounts]]
            id = "1"
            name = "供货商"
            balance = 500.0

            [[commodities]]
            name = "国光"
            id = "c1"
            location = "中国"
            price = 6.5
            owner = "1"
        "#;
        let config: SeedConfig = toml::from_str(raw).unwrap();
        assert_eq!(config.accounts.len(), 1);
        assert_eq!(config.accounts[0].balance, Decimal::from(500));
        assert_eq!(config.commodities[0].price, Decimal::new(65, 1));
    }
}
