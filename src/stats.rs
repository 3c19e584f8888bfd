use crate::Patients;
use serde::Serialize;
use std::fmt;

/// Mean, minimum and maximum of one measurement.
///
/// The mean is rounded towards zero, so ages `[10, 11]` have a mean of 10.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct MetricSummary {
    pub mean: i32,
    pub min: i32,
    pub max: i32,
}

impl MetricSummary {
    /// `None` if there are no values.
    pub fn from_values(values: impl IntoIterator<Item = i32>) -> Option<Self> {
        let mut values = values.into_iter();
        let first = values.next()?;
        let (mut sum, mut count, mut min, mut max) = (i64::from(first), 1i64, first, first);
        for value in values {
            sum += i64::from(value);
            count += 1;
            min = min.min(value);
            max = max.max(value);
        }
        // the mean always lies between min and max, so it fits
        let mean = (sum / count) as i32;
        Some(MetricSummary { mean, min, max })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BasicStatistics {
    pub total: usize,
    pub age: MetricSummary,
    pub blood_pressure: MetricSummary,
    pub cholesterol: MetricSummary,
}

impl BasicStatistics {
    /// `None` if there are no patients.
    pub fn from_patients(patients: &Patients) -> Option<Self> {
        Some(BasicStatistics {
            total: patients.len(),
            age: MetricSummary::from_values(patients.iter_ref().map(|p| p.age))?,
            blood_pressure: MetricSummary::from_values(
                patients.iter_ref().map(|p| p.blood_pressure),
            )?,
            cholesterol: MetricSummary::from_values(patients.iter_ref().map(|p| p.cholesterol))?,
        })
    }
}

impl fmt::Display for BasicStatistics {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "=== MEDICAL DATA STATISTICS ===")?;
        writeln!(f, "Total Patients: {}", self.total)?;
        for (name, summary, unit) in [
            ("Age", &self.age, "years"),
            ("Blood Pressure", &self.blood_pressure, "mmHg"),
            ("Cholesterol", &self.cholesterol, "mg/dL"),
        ] {
            writeln!(f)?;
            writeln!(f, "{} Statistics:", name)?;
            writeln!(f, "  Average: {} {}", summary.mean, unit)?;
            writeln!(f, "  Range: {} - {}", summary.min, summary.max)?;
        }
        Ok(())
    }
}
