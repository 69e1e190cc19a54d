use serde::{Deserialize, Serialize};

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

/// A boolean condition over the patient record that adds to the base score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum RiskFactor {
    /// More than 10 days in hospital
    ExtendedStay,

    /// More than 70 lab procedures
    HeavyLabWork,

    /// More than 2 emergency visits
    FrequentEmergency,

    /// More than 1 inpatient visit
    PriorInpatient,

    /// Max glucose serum above 200
    ElevatedGlucose,

    /// HbA1c above 7
    ElevatedA1c,

    /// Any insulin prescription
    OnInsulin,
}

impl RiskFactor {
    /// All factors, in evaluation order
    pub const ALL: [RiskFactor; 7] = [
        RiskFactor::ExtendedStay,
        RiskFactor::HeavyLabWork,
        RiskFactor::FrequentEmergency,
        RiskFactor::PriorInpatient,
        RiskFactor::ElevatedGlucose,
        RiskFactor::ElevatedA1c,
        RiskFactor::OnInsulin,
    ];

    /// Human readable condition
    pub fn describe(&self) -> &'static str {
        match self {
            RiskFactor::ExtendedStay => "Days in hospital > 10",
            RiskFactor::HeavyLabWork => "Number of lab procedures > 70",
            RiskFactor::FrequentEmergency => "Number of emergency visits > 2",
            RiskFactor::PriorInpatient => "Number of inpatient visits > 1",
            RiskFactor::ElevatedGlucose => "Max glucose serum is >200 or >300",
            RiskFactor::ElevatedA1c => "A1C result is >7 or >8",
            RiskFactor::OnInsulin => "Insulin is not No",
        }
    }
}

/// Discrete risk category derived from the score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum RiskBand {
    /// score < 0.2
    VeryLow,

    /// 0.2 <= score < 0.4
    Low,

    /// 0.4 <= score < 0.6
    Medium,

    /// 0.6 <= score < 0.8
    High,

    /// score >= 0.8
    VeryHigh,
}

/// Binary clinical action flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    StandardCare,
    ConsiderIntervention,
}

/// Result of scoring a single patient record. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct RiskAssessment {
    /// Final score, clamped to [0, 1]
    pub score: f64,

    /// Risk band for `score`
    pub band: RiskBand,

    /// Recommendation for `score`
    pub recommendation: Recommendation,

    /// Fraction of risk factors present, before perturbation
    pub base_score: f64,

    /// Offset added to the base score
    pub perturbation: f64,

    /// Factors that evaluated true, in evaluation order
    pub triggered_factors: Vec<RiskFactor>,
}
