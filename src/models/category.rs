use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Category assignment for a merchant, derived once and reused for
/// every later transaction from the same merchant
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MerchantCategory {
    /// Merchant this assignment belongs to
    pub merchant_id: String,

    /// Merchant category code (MCC)
    pub category_code: String,

    /// Human-readable category name
    pub category_name: String,

    /// Broad industry grouping
    pub industry: String,

    /// Risk tier assigned by the categorization rules
    pub risk_level: RiskLevel,
}

impl MerchantCategory {
    pub fn new(
        merchant_id: String,
        category_code: String,
        category_name: String,
        industry: String,
        risk_level: RiskLevel,
    ) -> Self {
        Self {
            merchant_id,
            category_code,
            category_name,
            industry,
            risk_level,
        }
    }
}

/// Risk tier ordered from least to most severe
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, EnumString, Display,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    /// Check if the tier warrants review before settlement
    pub fn is_elevated(&self) -> bool {
        matches!(self, RiskLevel::High | RiskLevel::Critical)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_risk_level_ordering() {
        assert!(RiskLevel::Low < RiskLevel::Medium);
        assert!(RiskLevel::Medium < RiskLevel::High);
        assert!(RiskLevel::High < RiskLevel::Critical);
    }

    #[test]
    fn test_risk_level_display_names() {
        assert_eq!(RiskLevel::Low.to_string(), "LOW");
        assert_eq!(RiskLevel::Critical.to_string(), "CRITICAL");
        assert!(RiskLevel::Critical.is_elevated());
        assert!(!RiskLevel::Medium.is_elevated());
    }

    #[test]
    fn test_category_serialization() {
        let category = MerchantCategory::new(
            "merch-1".to_string(),
            "5812".to_string(),
            "Restaurant".to_string(),
            "Food & Beverage".to_string(),
            RiskLevel::Low,
        );

        let json = serde_json::to_string(&category).unwrap();
        assert!(json.contains("\"LOW\""));

        let back: MerchantCategory = serde_json::from_str(&json).unwrap();
        assert_eq!(back, category);
    }
}
