use crate::{util::percentage, Patients, Range, RangeSet, RangeSetCounts, HEALTHY};
use once_cell::sync::Lazy;
use serde::Serialize;
use std::fmt;

/// `Under 30`, `30-44`, `45-59`, `60 and above`.
static AGE_GROUPS: Lazy<RangeSet<i32>> = Lazy::new(|| {
    RangeSet::new(vec![
        Range::new(None, Some(30)),
        Range::new(Some(30), Some(45)),
        Range::new(Some(45), Some(60)),
        Range::new(Some(60), None),
    ])
});

/// Co-occurrence counts over all patients.
#[derive(Debug, Clone, Serialize)]
pub struct PatternReport {
    /// Blood pressure over 140 and cholesterol over 200.
    pub high_bp_high_chol: usize,
    /// Of `high_bp_high_chol`, those with a diagnosis mentioning "Heart".
    pub high_bp_high_chol_heart: usize,
    pub diabetes_over_50: usize,
    pub healthy_under_30: usize,
    pub age_groups: RangeSetCounts<i32>,
}

impl PatternReport {
    /// `None` if there are no patients.
    pub fn from_patients(patients: &Patients) -> Option<Self> {
        if patients.is_empty() {
            return None;
        }
        let mut high_bp_high_chol = 0;
        let mut high_bp_high_chol_heart = 0;
        let mut diabetes_over_50 = 0;
        let mut healthy_under_30 = 0;

        for pat in patients {
            if pat.blood_pressure > 140 && pat.cholesterol > 200 {
                high_bp_high_chol += 1;
                if pat.diagnosis.contains("Heart") {
                    high_bp_high_chol_heart += 1;
                }
            }
            if pat.age > 50 && &*pat.diagnosis == "Diabetes" {
                diabetes_over_50 += 1;
            }
            if pat.age < 30 && &*pat.diagnosis == HEALTHY {
                healthy_under_30 += 1;
            }
        }

        Some(PatternReport {
            high_bp_high_chol,
            high_bp_high_chol_heart,
            diabetes_over_50,
            healthy_under_30,
            age_groups: AGE_GROUPS
                .clone()
                .bucket_values(patients.iter_ref().map(|pat| pat.age)),
        })
    }

    /// Percentage of the high blood pressure/high cholesterol group with heart-related issues.
    ///
    /// `None` if the group is empty.
    pub fn heart_percentage(&self) -> Option<usize> {
        if self.high_bp_high_chol == 0 {
            return None;
        }
        Some(percentage(
            self.high_bp_high_chol_heart,
            self.high_bp_high_chol,
        ))
    }
}

impl fmt::Display for PatternReport {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "=== PATTERN ANALYSIS ===")?;
        writeln!(f)?;
        writeln!(f, "Discovered Patterns:")?;
        writeln!(
            f,
            "1. Patients with High BP (>140) AND High Cholesterol (>200): {}",
            self.high_bp_high_chol
        )?;
        if let Some(pct) = self.heart_percentage() {
            writeln!(
                f,
                "   - Of these, {} have heart-related issues ({}%)",
                self.high_bp_high_chol_heart, pct
            )?;
        }
        writeln!(f)?;
        writeln!(f, "2. Diabetes Cases in Age > 50: {}", self.diabetes_over_50)?;
        writeln!(f, "3. Healthy Individuals Under 30: {}", self.healthy_under_30)?;
        writeln!(f)?;
        writeln!(f, "Age Group Analysis:")?;
        for (range, count) in self.age_groups.iter() {
            writeln!(f, "  {}: {} patients", range, count)?;
        }
        Ok(())
    }
}
