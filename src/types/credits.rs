// src/types/credits.rs
//! Employer credit balance and how this month's usage is presented.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditsBalance {
    #[serde(default)]
    pub current_balance: i64,
    #[serde(default)]
    pub credits_used_this_month: i64,
    #[serde(default)]
    pub credits_limit: i64,
}

impl CreditsBalance {
    /// Share of the monthly limit already used, in percent. 0 when there is no limit.
    pub fn percentage_used(&self) -> f64 {
        if self.credits_limit > 0 {
            self.credits_used_this_month as f64 / self.credits_limit as f64 * 100.0
        } else {
            0.0
        }
    }

    pub fn usage_breakdown(&self) -> Vec<UsageSlice> {
        UsageCategory::ALL
            .into_iter()
            .map(|category| UsageSlice {
                category,
                credits: (self.credits_used_this_month as f64 * category.share()).floor() as i64,
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UsageCategory {
    JobPostings,
    PremiumFeatures,
    ApplicantContacts,
}

impl UsageCategory {
    pub const ALL: [UsageCategory; 3] = [
        UsageCategory::JobPostings,
        UsageCategory::PremiumFeatures,
        UsageCategory::ApplicantContacts,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            UsageCategory::JobPostings => "Job Postings",
            UsageCategory::PremiumFeatures => "Premium Features",
            UsageCategory::ApplicantContacts => "Applicant Contacts",
        }
    }

    fn share(&self) -> f64 {
        match self {
            UsageCategory::JobPostings => 0.55,
            UsageCategory::PremiumFeatures => 0.3,
            UsageCategory::ApplicantContacts => 0.15,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UsageSlice {
    pub category: UsageCategory,
    pub credits: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditTransaction {
    pub id: i64,
    /// `purchase` or `usage`.
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub details: Option<serde_json::Value>,
    #[serde(default)]
    pub amount: i64,
    #[serde(default)]
    pub timestamp: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentage_used() {
        let balance = CreditsBalance {
            current_balance: 80,
            credits_used_this_month: 50,
            credits_limit: 200,
        };
        assert_eq!(balance.percentage_used(), 25.0);

        let unlimited = CreditsBalance {
            credits_limit: 0,
            ..balance
        };
        assert_eq!(unlimited.percentage_used(), 0.0);
    }

    #[test]
    fn test_usage_breakdown_floors_each_share() {
        let balance = CreditsBalance {
            current_balance: 0,
            credits_used_this_month: 37,
            credits_limit: 200,
        };
        let credits: Vec<i64> = balance.usage_breakdown().iter().map(|s| s.credits).collect();
        // 20.35, 11.1, 5.55
        assert_eq!(credits, vec![20, 11, 5]);
    }

    #[test]
    fn test_deserialize_balance_and_transaction() {
        let balance: CreditsBalance = serde_json::from_str(
            r#"{"currentBalance": 100, "creditsUsedThisMonth": 12, "creditsLimit": 200}"#,
        )
        .unwrap();
        assert_eq!(balance.current_balance, 100);

        let tx: CreditTransaction = serde_json::from_str(
            r#"{"id": 1, "type": "usage", "description": "Job post", "details": null, "amount": -5, "timestamp": "2024-01-01T00:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(tx.kind, "usage");
        assert_eq!(tx.amount, -5);
    }
}
