use crate::entities::{InsulinDosage, PatientRecord, Recommendation, RiskBand, RiskFactor};

/// Lower bound of the very high band
pub const VERY_HIGH_THRESHOLD: f64 = 0.8;
/// Lower bound of the high band
pub const HIGH_THRESHOLD: f64 = 0.6;
/// Lower bound of the medium band
pub const MEDIUM_THRESHOLD: f64 = 0.4;
/// Lower bound of the low band
pub const LOW_THRESHOLD: f64 = 0.2;

/// Score at or above which intervention is recommended.
/// Independent of the band thresholds.
pub const INTERVENTION_THRESHOLD: f64 = 0.439;

/// Check whether a single factor holds for the record
pub fn factor_applies(factor: RiskFactor, record: &PatientRecord) -> bool {
    match factor {
        RiskFactor::ExtendedStay => record.time_in_hospital > 10,
        RiskFactor::HeavyLabWork => record.num_lab_procedures > 70,
        RiskFactor::FrequentEmergency => record.number_emergency > 2,
        RiskFactor::PriorInpatient => record.number_inpatient > 1,
        RiskFactor::ElevatedGlucose => record.max_glu_serum.is_elevated(),
        RiskFactor::ElevatedA1c => record.a1c_result.is_elevated(),
        RiskFactor::OnInsulin => record.insulin != InsulinDosage::No,
    }
}

/// Evaluate all risk factors, returning those that hold
pub fn evaluate_risk_factors(record: &PatientRecord) -> Vec<RiskFactor> {
    RiskFactor::ALL
        .into_iter()
        .filter(|factor| factor_applies(*factor, record))
        .collect()
}

/// Unweighted fraction of factors present
pub fn base_score(triggered: usize) -> f64 {
    triggered as f64 / RiskFactor::ALL.len() as f64
}

/// Categorize a score into a risk band. Boundaries are closed on the lower side.
pub fn categorize_score(score: f64) -> RiskBand {
    if score >= VERY_HIGH_THRESHOLD {
        RiskBand::VeryHigh
    } else if score >= HIGH_THRESHOLD {
        RiskBand::High
    } else if score >= MEDIUM_THRESHOLD {
        RiskBand::Medium
    } else if score >= LOW_THRESHOLD {
        RiskBand::Low
    } else {
        RiskBand::VeryLow
    }
}

/// Recommend a course of action for a score
pub fn recommend(score: f64) -> Recommendation {
    if score >= INTERVENTION_THRESHOLD {
        Recommendation::ConsiderIntervention
    } else {
        Recommendation::StandardCare
    }
}
