use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Low up to 30 inclusive, medium up to 70 inclusive, high above.
    pub fn from_score(risk_score: f64) -> Self {
        if risk_score <= 30.0 {
            RiskLevel::Low
        } else if risk_score <= 70.0 {
            RiskLevel::Medium
        } else {
            RiskLevel::High
        }
    }

    /// Banner color.
    pub fn color_hex(&self) -> &'static str {
        match self {
            RiskLevel::Low => "#00cc00",
            RiskLevel::Medium => "#F5EDD0",
            RiskLevel::High => "#ff0000",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            RiskLevel::Low => "🟢",
            RiskLevel::Medium => "🟡",
            RiskLevel::High => "🔴",
        }
    }
}
