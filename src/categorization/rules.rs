use crate::models::RiskLevel;

/// One keyword-based categorization rule
#[derive(Debug)]
pub struct CategoryRule {
    /// Keywords matched as case-insensitive substrings of the merchant name
    pub keywords: &'static [&'static str],
    pub category_code: &'static str,
    pub category_name: &'static str,
    pub industry: &'static str,
    pub risk_level: RiskLevel,
}

/// Ordered rule table. Rules are evaluated top to bottom and the first
/// match wins, so a name hitting several rules gets the earliest one.
pub static CATEGORY_RULES: &[CategoryRule] = &[
    CategoryRule {
        keywords: &["amazon", "ebay", "shop"],
        category_code: "5999",
        category_name: "E-Commerce",
        industry: "Retail",
        risk_level: RiskLevel::Low,
    },
    CategoryRule {
        keywords: &["restaurant", "cafe", "food"],
        category_code: "5812",
        category_name: "Restaurant",
        industry: "Food & Beverage",
        risk_level: RiskLevel::Low,
    },
    CategoryRule {
        keywords: &["gas", "fuel", "petrol"],
        category_code: "5541",
        category_name: "Gas Station",
        industry: "Automotive",
        risk_level: RiskLevel::Low,
    },
    CategoryRule {
        keywords: &["hotel", "inn", "resort"],
        category_code: "7011",
        category_name: "Hotel",
        industry: "Lodging",
        risk_level: RiskLevel::Medium,
    },
    CategoryRule {
        keywords: &["airline", "airways", "air"],
        category_code: "4511",
        category_name: "Airline",
        industry: "Transportation",
        risk_level: RiskLevel::Medium,
    },
    CategoryRule {
        keywords: &["casino", "gambling", "betting"],
        category_code: "7995",
        category_name: "Gambling",
        industry: "Entertainment",
        risk_level: RiskLevel::High,
    },
    CategoryRule {
        keywords: &["crypto", "bitcoin", "blockchain"],
        category_code: "6051",
        category_name: "Cryptocurrency",
        industry: "Financial Services",
        risk_level: RiskLevel::Critical,
    },
];

/// Synthesized bucket for names no rule matches
pub static DEFAULT_RULE: CategoryRule = CategoryRule {
    keywords: &[],
    category_code: "5999",
    category_name: "Miscellaneous",
    industry: "General Retail",
    risk_level: RiskLevel::Low,
};

/// Find the first rule matching the merchant name, falling back to the
/// default bucket. Total: every name maps to some rule.
pub fn match_rule(merchant_name: &str) -> &'static CategoryRule {
    let normalized = merchant_name.to_lowercase();
    CATEGORY_RULES
        .iter()
        .find(|rule| {
            rule.keywords
                .iter()
                .any(|keyword| normalized.contains(keyword))
        })
        .unwrap_or(&DEFAULT_RULE)
}
