use crate::{
    util, BasicStatistics, FrequencyReport, PatternReport, Patients, Result, RiskReport,
};
use chrono::{DateTime, Local};
use qu::ick_use::*;
use serde::Serialize;
use std::{
    fmt, fs,
    io::{self, prelude::*},
    path::Path,
};

/// Shown in place of a report when no patients are loaded.
pub const NO_DATA: &str = "No data loaded";

/// Every analysis over a set of patients, with the time it was generated.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub generated_at: DateTime<Local>,
    pub statistics: Option<BasicStatistics>,
    pub risk: Option<RiskReport>,
    pub patterns: Option<PatternReport>,
    pub frequency: Option<FrequencyReport>,
}

impl Report {
    pub fn new(patients: &Patients) -> Self {
        Self::generated_at(patients, Local::now())
    }

    pub fn generated_at(patients: &Patients, generated_at: DateTime<Local>) -> Self {
        Report {
            generated_at,
            statistics: BasicStatistics::from_patients(patients),
            risk: RiskReport::from_patients(patients),
            patterns: PatternReport::from_patients(patients),
            frequency: FrequencyReport::from_patients(patients),
        }
    }

    /// Write the report as text.
    ///
    /// An existing file is overwritten.
    pub fn save(&self, path: impl AsRef<Path>) -> Result {
        fn inner(this: &Report, path: &Path) -> Result {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).context("could not create parent")?;
            }
            if util::path_exists(path)? {
                event!(
                    Level::WARN,
                    "overwriting existing file at \"{}\"",
                    path.display()
                );
            }
            let mut out = io::BufWriter::new(fs::File::create(path)?);
            write!(out, "{}", this)?;
            out.flush()?;
            Ok(())
        }
        let path = path.as_ref();
        inner(self, path)
            .with_context(|| format!("unable to write report to \"{}\"", path.display()))?;
        event!(Level::INFO, "report written to \"{}\"", path.display());
        Ok(())
    }
}

/// Formats `Some(report)` as the report text, and `None` as `NO_DATA`.
pub(crate) fn or_no_data(report: Option<&impl fmt::Display>) -> String {
    match report {
        Some(report) => report.to_string(),
        None => NO_DATA.to_owned(),
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "MEDICAL DATA MINING REPORT")?;
        writeln!(
            f,
            "Generated on: {}",
            self.generated_at.format("%a %b %d %H:%M:%S %Z %Y")
        )?;
        writeln!(f, "{}", "=".repeat(50))?;
        writeln!(f)?;
        writeln!(f, "{}", or_no_data(self.statistics.as_ref()))?;
        writeln!(f, "{}", or_no_data(self.risk.as_ref()))?;
        writeln!(f, "{}", or_no_data(self.patterns.as_ref()))?;
        writeln!(f, "{}", or_no_data(self.frequency.as_ref()))
    }
}
