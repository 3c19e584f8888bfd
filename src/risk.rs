//! Heuristic risk scoring.
//!
//! Each patient gets a score from 0 to 10 built from their age, blood pressure, cholesterol and
//! whether they have a diagnosis at all. Scores are then banded into low, medium and high risk.
use crate::{util::percentage, Patient, Patients};
use serde::Serialize;
use std::fmt;

/// Scores above this are high risk.
pub const HIGH_RISK_THRESHOLD: u8 = 6;
/// Scores above this (and not above `HIGH_RISK_THRESHOLD`) are medium risk.
pub const MEDIUM_RISK_THRESHOLD: u8 = 3;
/// The number of high risk patients named in a risk report.
const HIGH_RISK_LISTED: usize = 5;

/// The risk score for a single patient.
pub fn risk_score(patient: &Patient) -> u8 {
    let mut score = 0;

    if patient.age > 60 {
        score += 2;
    } else if patient.age > 45 {
        score += 1;
    }

    if patient.blood_pressure > 140 {
        score += 3;
    } else if patient.blood_pressure > 130 {
        score += 2;
    }

    if patient.cholesterol > 200 {
        score += 3;
    } else if patient.cholesterol > 180 {
        score += 1;
    }

    if !patient.is_healthy() {
        score += 2;
    }

    score
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn from_score(score: u8) -> Self {
        if score > HIGH_RISK_THRESHOLD {
            RiskLevel::High
        } else if score > MEDIUM_RISK_THRESHOLD {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    pub fn of(patient: &Patient) -> Self {
        Self::from_score(risk_score(patient))
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RiskLevel::Low => f.write_str("LOW RISK"),
            RiskLevel::Medium => f.write_str("MEDIUM RISK"),
            RiskLevel::High => f.write_str("HIGH RISK"),
        }
    }
}

/// How many patients fall in each risk band.
#[derive(Debug, Clone, Serialize)]
pub struct RiskReport {
    pub total: usize,
    pub low: usize,
    pub medium: usize,
    pub high: usize,
    /// The first few high risk patients, in file order.
    pub high_risk_patients: Vec<Patient>,
}

impl RiskReport {
    /// `None` if there are no patients.
    pub fn from_patients(patients: &Patients) -> Option<Self> {
        if patients.is_empty() {
            return None;
        }
        let mut report = RiskReport {
            total: patients.len(),
            low: 0,
            medium: 0,
            high: 0,
            high_risk_patients: Vec::new(),
        };
        for pat in patients {
            match RiskLevel::of(pat) {
                RiskLevel::Low => report.low += 1,
                RiskLevel::Medium => report.medium += 1,
                RiskLevel::High => {
                    report.high += 1;
                    if report.high_risk_patients.len() < HIGH_RISK_LISTED {
                        report.high_risk_patients.push(pat.clone());
                    }
                }
            }
        }
        Some(report)
    }

    pub fn count(&self, level: RiskLevel) -> usize {
        match level {
            RiskLevel::Low => self.low,
            RiskLevel::Medium => self.medium,
            RiskLevel::High => self.high,
        }
    }
}

impl fmt::Display for RiskReport {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "=== RISK CLASSIFICATION ANALYSIS ===")?;
        writeln!(f, "Total Patients Analyzed: {}", self.total)?;
        writeln!(f)?;
        writeln!(f, "Risk Distribution:")?;
        for level in [RiskLevel::High, RiskLevel::Medium, RiskLevel::Low] {
            let count = self.count(level);
            writeln!(
                f,
                "  {}: {} patients ({}%)",
                level,
                count,
                percentage(count, self.total)
            )?;
        }
        writeln!(f)?;

        if !self.high_risk_patients.is_empty() {
            writeln!(f, "High Risk Patients (Need Immediate Attention):")?;
            for pat in &self.high_risk_patients {
                writeln!(
                    f,
                    "  - {} (Age: {}, BP: {}, Cholesterol: {})",
                    pat.name, pat.age, pat.blood_pressure, pat.cholesterol
                )?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::{risk_score, RiskLevel, RiskReport};
    use crate::{
        test_data::{patient, sample},
        Patients,
    };

    #[test]
    fn score_components() {
        assert_eq!(risk_score(&patient(1, "a", 20, 110, 150, "O+", "Healthy")), 0);
        assert_eq!(risk_score(&patient(1, "a", 46, 110, 150, "O+", "Healthy")), 1);
        assert_eq!(risk_score(&patient(1, "a", 61, 110, 150, "O+", "Healthy")), 2);
        assert_eq!(risk_score(&patient(1, "a", 20, 131, 150, "O+", "Healthy")), 2);
        assert_eq!(risk_score(&patient(1, "a", 20, 141, 150, "O+", "Healthy")), 3);
        assert_eq!(risk_score(&patient(1, "a", 20, 110, 181, "O+", "Healthy")), 1);
        assert_eq!(risk_score(&patient(1, "a", 20, 110, 201, "O+", "Healthy")), 3);
        assert_eq!(risk_score(&patient(1, "a", 20, 110, 150, "O+", "Flu")), 2);
        // the diagnosis match is exact
        assert_eq!(risk_score(&patient(1, "a", 20, 110, 150, "O+", "healthy")), 2);
    }

    #[test]
    fn score_bounds() {
        assert_eq!(risk_score(&patient(1, "a", 99, 999, 999, "O+", "Cancer")), 10);
        assert_eq!(risk_score(&patient(1, "a", -5, -5, -5, "O+", "Healthy")), 0);
        // thresholds are strict
        assert_eq!(risk_score(&patient(1, "a", 45, 130, 180, "O+", "Healthy")), 0);
        assert_eq!(risk_score(&patient(1, "a", 60, 140, 200, "O+", "Healthy")), 1 + 2 + 1);
    }

    #[test]
    fn banding() {
        assert_eq!(RiskLevel::from_score(0), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(3), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(4), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(6), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(7), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(10), RiskLevel::High);
    }

    #[test]
    fn report_agrees_with_high_risk_query() {
        let patients = sample();
        let report = RiskReport::from_patients(&patients).unwrap();
        assert_eq!(report.total, 9);
        assert_eq!(report.low + report.medium + report.high, report.total);
        assert_eq!(report.high, patients.high_risk_patients().len());
        assert_eq!((report.low, report.medium, report.high), (2, 1, 6));
    }

    #[test]
    fn report_lists_first_five() {
        let report = RiskReport::from_patients(&sample()).unwrap();
        let ids: Vec<_> = report
            .high_risk_patients
            .iter()
            .map(|p| p.patient_id)
            .collect();
        assert_eq!(ids, [2, 3, 5, 7, 9]);

        let text = report.to_string();
        assert!(text.starts_with("=== RISK CLASSIFICATION ANALYSIS ===\n"));
        assert!(text.contains("  HIGH RISK: 6 patients (66%)\n"));
        assert!(text.contains("  MEDIUM RISK: 1 patients (11%)\n"));
        assert!(text.contains("  LOW RISK: 2 patients (22%)\n"));
        assert!(text.contains("  - Bob Smith (Age: 67, BP: 165, Cholesterol: 245)\n"));
        assert!(!text.contains("Jack Young"));
    }

    #[test]
    fn no_high_risk_section_when_none() {
        let patients: Patients = [patient(1, "a", 20, 110, 150, "O+", "Healthy")]
            .into_iter()
            .collect();
        let text = RiskReport::from_patients(&patients).unwrap().to_string();
        assert!(!text.contains("High Risk Patients"));
        assert!(text.ends_with("(100%)\n\n"));
    }

    #[test]
    fn empty_store() {
        assert!(RiskReport::from_patients(&Patients::empty()).is_none());
    }
}
