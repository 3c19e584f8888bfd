//! The handle front ends hold on to.
//!
//! `MedicalDataMiner` owns the currently loaded patients and answers every analysis as text.
//! Loading builds the new `Patients` before taking the lock, then swaps it in, so anything
//! holding a snapshot from `patients()` keeps seeing a complete store.
use crate::{
    predict,
    report::{or_no_data, NO_DATA},
    BasicStatistics, FrequencyReport, LoadError, PatternReport, Patients, Report, Result,
    RiskReport,
};
use parking_lot::RwLock;
use qu::ick_use::*;
use serde_json::json;
use std::{fmt, io, path::Path, sync::Arc};

#[derive(Debug, Default)]
pub struct MedicalDataMiner {
    patients: RwLock<Arc<Patients>>,
}

impl MedicalDataMiner {
    pub fn new() -> Self {
        Self::default()
    }

    /// The currently loaded patients.
    pub fn patients(&self) -> Arc<Patients> {
        self.patients.read().clone()
    }

    /// Replace the loaded patients with those in the file at `path`.
    ///
    /// On failure the miner is left with no patients.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<LoadSummary, LoadError> {
        let path = path.as_ref();
        let source = match path.file_name() {
            Some(name) => name.to_string_lossy().into_owned(),
            None => path.display().to_string(),
        };
        self.publish(source, Patients::load(path))
    }

    /// Like `load`, but reading from `reader`. `source` names the input in the summary.
    pub fn load_from_reader(
        &self,
        source: impl Into<String>,
        reader: impl io::Read,
    ) -> Result<LoadSummary, LoadError> {
        self.publish(source.into(), Patients::from_reader(reader))
    }

    fn publish(
        &self,
        source: String,
        loaded: Result<Patients, LoadError>,
    ) -> Result<LoadSummary, LoadError> {
        let (patients, result) = match loaded {
            Ok(patients) => {
                let summary = LoadSummary {
                    source,
                    total: patients.len(),
                };
                (patients, Ok(summary))
            }
            Err(error) => {
                event!(
                    Level::WARN,
                    "loading \"{}\" failed, clearing patient records",
                    source
                );
                (Patients::empty(), Err(error))
            }
        };
        *self.patients.write() = Arc::new(patients);
        result
    }

    pub fn calculate_basic_statistics(&self) -> String {
        or_no_data(BasicStatistics::from_patients(&self.patients()).as_ref())
    }

    pub fn perform_risk_analysis(&self) -> String {
        or_no_data(RiskReport::from_patients(&self.patients()).as_ref())
    }

    pub fn find_patterns(&self) -> String {
        or_no_data(PatternReport::from_patients(&self.patients()).as_ref())
    }

    pub fn analyze_frequency(&self) -> String {
        or_no_data(FrequencyReport::from_patients(&self.patients()).as_ref())
    }

    /// Doesn't depend on the loaded patients.
    pub fn predict_disease(&self, age: i32, blood_pressure: i32, cholesterol: i32) -> String {
        predict(age, blood_pressure, cholesterol).to_string()
    }

    /// Basic statistics followed by the risk analysis.
    pub fn quick_analysis(&self) -> String {
        let patients = self.patients();
        format!(
            "{}\n{}\n",
            or_no_data(BasicStatistics::from_patients(&patients).as_ref()),
            or_no_data(RiskReport::from_patients(&patients).as_ref())
        )
    }

    pub fn high_risk_patients(&self) -> Patients {
        self.patients().high_risk_patients()
    }

    /// Empty if no patient has this exact diagnosis.
    pub fn patients_by_diagnosis(&self, diagnosis: &str) -> Patients {
        self.patients().filter_by_diagnosis(diagnosis)
    }

    pub fn report(&self) -> Report {
        Report::new(&self.patients())
    }

    /// Write the full report to `path`. The loaded patients are not affected by failure.
    pub fn generate_report(&self, path: impl AsRef<Path>) -> Result {
        self.report().save(path)
    }
}

/// What was loaded, for showing to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadSummary {
    pub source: String,
    pub total: usize,
}

impl fmt::Display for LoadSummary {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Data loaded successfully from: {}", self.source)?;
        writeln!(f, "Total patients loaded: {}", self.total)
    }
}

/// The analyses a front end can ask for by name.
#[derive(Debug, Copy, Clone, PartialEq, Eq, clap::ValueEnum)]
pub enum Action {
    Statistics,
    Risk,
    Patterns,
    Frequency,
    /// Statistics and risk together.
    Quick,
    /// Everything, as written by `generate_report`.
    Report,
}

impl Action {
    pub fn run(self, miner: &MedicalDataMiner) -> String {
        match self {
            Action::Statistics => miner.calculate_basic_statistics(),
            Action::Risk => miner.perform_risk_analysis(),
            Action::Patterns => miner.find_patterns(),
            Action::Frequency => miner.analyze_frequency(),
            Action::Quick => miner.quick_analysis(),
            Action::Report => miner.report().to_string(),
        }
    }

    /// The same analysis as `run`, as JSON. Missing reports (no patients) are `null`.
    pub fn run_json(self, miner: &MedicalDataMiner) -> Result<String> {
        let patients = miner.patients();
        let value = match self {
            Action::Statistics => json!(BasicStatistics::from_patients(&patients)),
            Action::Risk => json!(RiskReport::from_patients(&patients)),
            Action::Patterns => json!(PatternReport::from_patients(&patients)),
            Action::Frequency => json!(FrequencyReport::from_patients(&patients)),
            Action::Quick => json!({
                "statistics": BasicStatistics::from_patients(&patients),
                "risk": RiskReport::from_patients(&patients),
            }),
            Action::Report => json!(Report::new(&patients)),
        };
        Ok(serde_json::to_string_pretty(&value)?)
    }
}

/// True if `text` is the placeholder returned when no patients are loaded.
pub fn is_no_data(text: &str) -> bool {
    text == NO_DATA
}
