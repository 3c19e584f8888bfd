use crate::{util::percentage, ArcStr, Patients};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelCount {
    pub label: ArcStr,
    pub count: usize,
}

/// How often each diagnosis and blood group occurs.
///
/// Labels are listed in sorted order.
#[derive(Debug, Clone, Serialize)]
pub struct FrequencyReport {
    pub total: usize,
    pub diagnoses: Vec<LabelCount>,
    pub blood_groups: Vec<LabelCount>,
    /// The diagnosis with the most patients. Ties go to the label that sorts first.
    pub most_common_diagnosis: LabelCount,
}

impl FrequencyReport {
    /// `None` if there are no patients.
    pub fn from_patients(patients: &Patients) -> Option<Self> {
        let diagnoses: Vec<_> = patients
            .diagnosis_counts()
            .map(|(label, count)| LabelCount {
                label: label.clone(),
                count,
            })
            .collect();
        let blood_groups = patients
            .blood_group_counts()
            .map(|(label, count)| LabelCount {
                label: label.clone(),
                count,
            })
            .collect();

        // strictly greater, so the earliest of equal counts is kept
        let mut most_common: Option<&LabelCount> = None;
        for el in diagnoses.iter() {
            if most_common.map_or(true, |best| el.count > best.count) {
                most_common = Some(el);
            }
        }
        let most_common_diagnosis = most_common?.clone();

        Some(FrequencyReport {
            total: patients.len(),
            diagnoses,
            blood_groups,
            most_common_diagnosis,
        })
    }
}

impl fmt::Display for FrequencyReport {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "=== FREQUENCY ANALYSIS ===")?;
        writeln!(f)?;
        writeln!(f, "Diagnosis Distribution:")?;
        for el in &self.diagnoses {
            writeln!(
                f,
                "  {}: {} cases ({}%)",
                el.label,
                el.count,
                percentage(el.count, self.total)
            )?;
        }
        writeln!(f)?;
        writeln!(f, "Blood Group Distribution:")?;
        for el in &self.blood_groups {
            writeln!(
                f,
                "  {}: {} patients ({}%)",
                el.label,
                el.count,
                percentage(el.count, self.total)
            )?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "Most Common Diagnosis: {} ({} cases)",
            self.most_common_diagnosis.label, self.most_common_diagnosis.count
        )
    }
}

#[cfg(test)]
mod test {
    use super::FrequencyReport;
    use crate::{
        test_data::{patient, sample},
        util::percentage,
        Patients,
    };

    #[test]
    fn percentages_cover_everyone() {
        let report = FrequencyReport::from_patients(&sample()).unwrap();
        let counted: usize = report.diagnoses.iter().map(|el| el.count).sum();
        assert_eq!(counted, report.total);

        let pct: usize = report
            .diagnoses
            .iter()
            .map(|el| percentage(el.count, report.total))
            .sum();
        // each bucket loses less than 1% to truncation
        assert!(pct <= 100 && pct + report.diagnoses.len() > 100);
    }

    #[test]
    fn most_common_is_largest() {
        let report = FrequencyReport::from_patients(&sample()).unwrap();
        let max = report.diagnoses.iter().map(|el| el.count).max().unwrap();
        assert_eq!(report.most_common_diagnosis.count, max);
        assert_eq!(&*report.most_common_diagnosis.label, "Heart Disease");
    }

    #[test]
    fn sorted_labels_and_tie_break() {
        let patients: Patients = [
            patient(1, "a", 40, 120, 180, "O+", "Flu"),
            patient(2, "b", 40, 120, 180, "AB-", "Asthma"),
            patient(3, "c", 40, 120, 180, "O+", "Flu"),
            patient(4, "d", 40, 120, 180, "A+", "Asthma"),
            patient(5, "e", 40, 120, 180, "A+", "Healthy"),
        ]
        .into_iter()
        .collect();
        let report = FrequencyReport::from_patients(&patients).unwrap();
        let labels: Vec<_> = report.diagnoses.iter().map(|el| &*el.label).collect();
        assert_eq!(labels, ["Asthma", "Flu", "Healthy"]);
        let groups: Vec<_> = report.blood_groups.iter().map(|el| &*el.label).collect();
        assert_eq!(groups, ["A+", "AB-", "O+"]);

        assert_eq!(&*report.most_common_diagnosis.label, "Asthma");
        assert_eq!(report.most_common_diagnosis.count, 2);
    }

    #[test]
    fn text() {
        let text = FrequencyReport::from_patients(&sample()).unwrap().to_string();
        assert!(text.starts_with("=== FREQUENCY ANALYSIS ===\n\nDiagnosis Distribution:\n"));
        assert!(text.contains("  Heart Disease: 3 cases (33%)\n"));
        assert!(text.contains("\nBlood Group Distribution:\n"));
        assert!(text.contains("  A+: 2 patients (22%)\n"));
        assert!(text.ends_with("\nMost Common Diagnosis: Heart Disease (3 cases)\n"));
    }

    #[test]
    fn empty_store() {
        assert!(FrequencyReport::from_patients(&Patients::empty()).is_none());
    }
}
