//! Rule-based prediction for a single set of measurements.
//!
//! The rules are checked in order and the first one that matches decides the outcome, so a
//! patient matching several rules only ever gets the earliest.
use serde::Serialize;
use std::fmt;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub enum PredictedRisk {
    Hypertension,
    HeartDisease,
    PreCondition,
    HealthyRange,
    NeedsMonitoring,
}

impl PredictedRisk {
    pub fn label(self) -> &'static str {
        match self {
            PredictedRisk::Hypertension => "High Risk of Hypertension",
            PredictedRisk::HeartDisease => "High Risk of Heart Disease",
            PredictedRisk::PreCondition => "Moderate Risk - Pre-condition Stage",
            PredictedRisk::HealthyRange => "Low Risk - Healthy Range",
            PredictedRisk::NeedsMonitoring => "Needs Monitoring",
        }
    }

    pub fn recommendation(self) -> &'static str {
        match self {
            PredictedRisk::Hypertension => "Immediate medical consultation recommended",
            PredictedRisk::HeartDisease => "Cardiac evaluation suggested",
            PredictedRisk::PreCondition => "Lifestyle changes and regular monitoring needed",
            PredictedRisk::HealthyRange => "Maintain current lifestyle, annual check-ups",
            PredictedRisk::NeedsMonitoring => "Regular health check-ups every 6 months",
        }
    }
}

impl fmt::Display for PredictedRisk {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The inputs to a prediction along with its outcome.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct Prediction {
    pub age: i32,
    pub blood_pressure: i32,
    pub cholesterol: i32,
    pub risk: PredictedRisk,
}

/// Predict the most pressing risk from age, blood pressure and cholesterol.
///
/// This does not look at any loaded patient data.
pub fn predict(age: i32, blood_pressure: i32, cholesterol: i32) -> Prediction {
    let (bp, chol) = (blood_pressure, cholesterol);
    let risk = if bp > 160 || (bp > 140 && age > 55) {
        PredictedRisk::Hypertension
    } else if chol > 240 && age > 45 {
        PredictedRisk::HeartDisease
    } else if bp > 130 || chol > 200 {
        PredictedRisk::PreCondition
    } else if age < 30 && bp < 120 && chol < 180 {
        PredictedRisk::HealthyRange
    } else {
        PredictedRisk::NeedsMonitoring
    };
    Prediction {
        age,
        blood_pressure,
        cholesterol,
        risk,
    }
}

impl fmt::Display for Prediction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "=== DISEASE PREDICTION ===")?;
        writeln!(
            f,
            "Input: Age={}, BP={}, Cholesterol={}",
            self.age, self.blood_pressure, self.cholesterol
        )?;
        writeln!(f)?;
        writeln!(f, "Prediction: {}", self.risk)?;
        writeln!(f, "Recommendation: {}", self.risk.recommendation())
    }
}
