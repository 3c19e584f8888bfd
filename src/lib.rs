pub mod config;
pub mod frequency;
pub mod miner;
pub mod patterns;
pub mod predict;
mod range;
pub mod report;
pub mod risk;
pub mod stats;
mod util;

pub use anyhow::{Context, Error};
use itertools::Either;
use qu::ick_use::*;
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    fs,
    io::{self, prelude::*},
    iter,
    ops::Deref,
    path::Path,
    sync::Arc,
};

pub use crate::{
    config::Config,
    frequency::FrequencyReport,
    miner::{Action, LoadSummary, MedicalDataMiner},
    patterns::PatternReport,
    predict::{predict, PredictedRisk, Prediction},
    range::{Range, RangeSet, RangeSetCounts},
    report::Report,
    risk::{risk_score, RiskLevel, RiskReport},
    stats::{BasicStatistics, MetricSummary},
    util::{percentage, ResultExt},
};

pub type ArcStr = Arc<str>;
pub type Result<T = (), E = anyhow::Error> = std::result::Result<T, E>;
pub type PatientId = i32;

/// Any failure while reading patient records. The context chain names the source and the line
/// that could not be parsed.
pub type LoadError = anyhow::Error;

/// The diagnosis recorded for patients with no condition.
pub const HEALTHY: &str = "Healthy";

/// Column names of the record file, in file order.
pub const HEADERS: [&str; 7] = [
    "id",
    "name",
    "age",
    "bloodPressure",
    "cholesterol",
    "bloodGroup",
    "diagnosis",
];

/// A row in the patient records file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patient {
    #[serde(rename = "id")]
    pub patient_id: PatientId,
    pub name: ArcStr,
    /// Years.
    pub age: i32,
    /// Systolic, mmHg.
    #[serde(rename = "bloodPressure")]
    pub blood_pressure: i32,
    /// mg/dL.
    pub cholesterol: i32,
    #[serde(rename = "bloodGroup")]
    pub blood_group: ArcStr,
    pub diagnosis: ArcStr,
}

impl Patient {
    pub fn is_healthy(&self) -> bool {
        &*self.diagnosis == HEALTHY
    }
}

/// The parsed list of patients, with pre-built indexes for the `diagnosis` and `blood_group`
/// fields.
///
/// The indexes are only ever built from the full record list, so the diagnosis buckets and the
/// blood group counts both sum to `len()`.
#[derive(Debug, Clone, Default)]
pub struct Patients {
    els: Arc<Vec<Patient>>,
    diagnosis_idx: BTreeMap<ArcStr, Vec<usize>>,
    blood_group_counts: BTreeMap<ArcStr, usize>,
}

impl Patients {
    /// Load patient records from a comma-separated file.
    ///
    /// The whole load fails if any record can't be parsed, there is no partial result.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        fn inner(path: &Path) -> Result<Patients> {
            let reader = io::BufReader::new(fs::File::open(path)?);
            Patients::from_reader(reader)
        }
        let path = path.as_ref();
        inner(path)
            .with_context(|| format!("unable to load patient records from \"{}\"", path.display()))
    }

    /// Parse patient records from any reader.
    ///
    /// The first line is a header and is discarded, whatever it contains. Fields are split on
    /// `,` with no quoting, so a comma inside a name shifts every later field. Lines that don't
    /// have exactly 7 fields are skipped, and are never checked for valid UTF-8.
    pub fn from_reader(reader: impl io::Read) -> Result<Self, LoadError> {
        let mut reader = io::BufReader::new(reader);
        let mut header = Vec::new();
        reader.read_until(b'\n', &mut header)?;

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .quoting(false)
            .from_reader(reader);

        let mut els = Vec::new();
        let mut skipped = 0usize;
        for record in reader.byte_records() {
            let record = record?;
            // the header line was consumed before the csv reader started counting
            let line = record.position().map(|pos| pos.line() + 1).unwrap_or_default();
            let len = field_count(&record);
            if len != HEADERS.len() {
                event!(
                    Level::DEBUG,
                    "skipping line {} with {} fields (expected {})",
                    line,
                    len,
                    HEADERS.len()
                );
                skipped += 1;
                continue;
            }
            // drop trailing empty fields, they don't count towards the field count
            let record: csv::ByteRecord = record.iter().take(len).collect();
            let patient: Patient = record
                .deserialize(None)
                .with_context(|| format!("invalid patient record on line {}", line))?;
            els.push(patient);
        }

        event!(
            Level::INFO,
            "loaded {} patient records ({} lines skipped)",
            els.len(),
            skipped
        );
        Ok(Self::new(els))
    }

    /// Save the records in the same format they are loaded from.
    pub fn save(&self, path: impl AsRef<Path>) -> Result {
        fn inner(this: &Patients, path: &Path) -> Result {
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
            this.save_to_writer(io::BufWriter::new(fs::File::create(path)?))
        }
        let path = path.as_ref();
        inner(self, path)
            .with_context(|| format!("unable to save patient records to \"{}\"", path.display()))
    }

    pub fn save_to_writer(&self, writer: impl io::Write) -> Result {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .quote_style(csv::QuoteStyle::Never)
            .from_writer(writer);
        writer.write_record(HEADERS)?;
        for el in self.els.iter() {
            writer.serialize(el)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// A store with no records.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn iter(&self) -> impl Iterator<Item = Patient> + '_ {
        self.els.iter().cloned()
    }

    pub fn iter_ref(&self) -> impl Iterator<Item = &Patient> + '_ {
        self.els.iter()
    }

    pub fn filter(&self, f: impl Fn(&Patient) -> bool) -> Self {
        Patients::new(self.iter().filter(f).collect())
    }

    /// Patients whose diagnosis is exactly `diagnosis`, in file order.
    ///
    /// Unknown diagnoses give an empty iterator.
    pub fn patients_by_diagnosis(
        &self,
        diagnosis: &str,
    ) -> impl Iterator<Item = &Patient> + Clone + '_ {
        let idxs = match self.diagnosis_idx.get(diagnosis) {
            Some(idxs) => idxs,
            None => return Either::Left(iter::empty()),
        };
        Either::Right(idxs.iter().map(|idx| {
            self.els
                .get(*idx)
                .expect("inconsistent diagnosis index")
        }))
    }

    /// Like `patients_by_diagnosis`, but collected into a new `Patients`.
    pub fn filter_by_diagnosis(&self, diagnosis: &str) -> Self {
        Patients::new(self.patients_by_diagnosis(diagnosis).cloned().collect())
    }

    /// Patients classed as high risk, in file order.
    pub fn high_risk_patients(&self) -> Self {
        self.filter(|pat| RiskLevel::of(pat) == RiskLevel::High)
    }

    /// Number of patients with each diagnosis, ordered by diagnosis.
    pub fn diagnosis_counts(&self) -> impl Iterator<Item = (&ArcStr, usize)> + '_ {
        self.diagnosis_idx
            .iter()
            .map(|(diagnosis, idxs)| (diagnosis, idxs.len()))
    }

    /// Number of patients with each blood group, ordered by blood group.
    pub fn blood_group_counts(&self) -> impl Iterator<Item = (&ArcStr, usize)> + '_ {
        self.blood_group_counts
            .iter()
            .map(|(group, count)| (group, *count))
    }

    pub fn term_table(&self) -> term_data_table::Table {
        use term_data_table::{Cell, Row, Table};
        let mut table = Table::new().with_row(
            Row::new()
                .with_cell(Cell::from("ID"))
                .with_cell(Cell::from("Name"))
                .with_cell(Cell::from("Age"))
                .with_cell(Cell::from("BP"))
                .with_cell(Cell::from("Cholesterol"))
                .with_cell(Cell::from("Blood Group"))
                .with_cell(Cell::from("Diagnosis")),
        );
        for pat in self.iter_ref() {
            table.add_row(
                Row::new()
                    .with_cell(Cell::from(pat.patient_id.to_string()))
                    .with_cell(Cell::from(pat.name.to_string()))
                    .with_cell(Cell::from(pat.age.to_string()))
                    .with_cell(Cell::from(pat.blood_pressure.to_string()))
                    .with_cell(Cell::from(pat.cholesterol.to_string()))
                    .with_cell(Cell::from(pat.blood_group.to_string()))
                    .with_cell(Cell::from(pat.diagnosis.to_string())),
            );
        }
        table
    }

    fn new(els: Vec<Patient>) -> Self {
        let mut this = Patients {
            els: Arc::new(els),
            diagnosis_idx: BTreeMap::new(),
            blood_group_counts: BTreeMap::new(),
        };
        this.rebuild_indexes();
        this
    }

    fn rebuild_indexes(&mut self) {
        self.diagnosis_idx.clear();
        self.blood_group_counts.clear();
        for (idx, el) in self.els.iter().enumerate() {
            self.diagnosis_idx
                .entry(el.diagnosis.clone())
                .or_insert_with(Vec::new)
                .push(idx);
            *self
                .blood_group_counts
                .entry(el.blood_group.clone())
                .or_insert(0) += 1;
        }
    }
}

impl Deref for Patients {
    type Target = [Patient];
    fn deref(&self) -> &Self::Target {
        &*self.els
    }
}

impl<'a> IntoIterator for &'a Patients {
    type IntoIter = <&'a [Patient] as IntoIterator>::IntoIter;
    type Item = &'a Patient;
    fn into_iter(self) -> Self::IntoIter {
        self.els.iter()
    }
}

impl FromIterator<Patient> for Patients {
    fn from_iter<T>(iter: T) -> Self
    where
        T: IntoIterator<Item = Patient>,
    {
        Self::new(iter.into_iter().collect())
    }
}

/// The number of fields in a record, ignoring trailing empty fields.
fn field_count(record: &csv::ByteRecord) -> usize {
    record
        .iter()
        .rposition(|field| !field.is_empty())
        .map_or(0, |idx| idx + 1)
}


#[cfg(test)]
mod test {
    use super::{test_data::sample, Patients, HEALTHY};

    #[test]
    fn load_skips_short_lines() {
        let patients = sample();
        assert_eq!(patients.len(), 9);
        let ids: Vec<_> = patients.iter_ref().map(|p| p.patient_id).collect();
        assert_eq!(ids, [1, 2, 3, 4, 5, 7, 8, 9, 10]);
        assert_eq!(&*patients[1].name, "Bob Smith");
        assert_eq!(patients[1].blood_pressure, 165);
    }

    #[test]
    fn load_fails_on_bad_number() {
        let input = "id,name,age,bloodPressure,cholesterol,bloodGroup,diagnosis\n\
                     1,Alice,25,115,170,A+,Healthy\n\
                     2,Bob,old,165,245,O+,Heart Disease\n";
        let err = Patients::from_reader(input.as_bytes()).unwrap_err();
        assert!(format!("{:#}", err).contains("line 3"));
    }

    #[test]
    fn first_line_always_discarded() {
        // a blank first line is the header, so the real header is parsed as a record
        let input = "\nid,name,age,bloodPressure,cholesterol,bloodGroup,diagnosis\n\
                     1,Alice,25,115,170,A+,Healthy\n";
        let err = Patients::from_reader(input.as_bytes()).unwrap_err();
        assert!(format!("{:#}", err).contains("line 2"));
    }

    #[test]
    fn invalid_utf8_in_skipped_line() {
        let mut input = b"header\n1,Alice,25,115,170,A+,Healthy\n".to_vec();
        input.extend_from_slice(b"2,B\xff\xfeb,25\n");
        input.extend_from_slice(b"\xff,\xfe\n3,Carol,40,120,180,O+,Healthy\n");
        let patients = Patients::from_reader(&input[..]).unwrap();
        let ids: Vec<_> = patients.iter_ref().map(|p| p.patient_id).collect();
        assert_eq!(ids, [1, 3]);
    }

    #[test]
    fn invalid_utf8_in_record() {
        let mut input = b"header\n".to_vec();
        input.extend_from_slice(b"1,B\xffb,25,115,170,A+,Healthy\n");
        assert!(Patients::from_reader(&input[..]).is_err());
    }

    #[test]
    fn header_only() {
        let input = "id,name,age,bloodPressure,cholesterol,bloodGroup,diagnosis\n";
        assert!(Patients::from_reader(input.as_bytes()).unwrap().is_empty());
        assert!(Patients::from_reader("".as_bytes()).unwrap().is_empty());
    }

    #[test]
    fn no_quoting() {
        let input = "header\n\
                     1,\"Smith, John\",40,120,180,A+,Healthy\n\
                     2,\"Doe\",40,120,180,A+,Healthy\n";
        let patients = Patients::from_reader(input.as_bytes()).unwrap();
        // the embedded comma makes 8 fields, and quotes are kept as-is
        assert_eq!(patients.len(), 1);
        assert_eq!(&*patients[0].name, "\"Doe\"");
    }

    #[test]
    fn trailing_empty_fields() {
        let input = "header\n\
                     1,Alice,25,115,170,A+,Healthy,\n\
                     2,Bob,25,115,170,A+,\n";
        let patients = Patients::from_reader(input.as_bytes()).unwrap();
        assert_eq!(patients.len(), 1);
        assert_eq!(&*patients[0].diagnosis, HEALTHY);
    }

    #[test]
    fn indexes_match_records() {
        let patients = sample();
        let by_diagnosis: usize = patients.diagnosis_counts().map(|(_, n)| n).sum();
        let by_blood_group: usize = patients.blood_group_counts().map(|(_, n)| n).sum();
        assert_eq!(by_diagnosis, patients.len());
        assert_eq!(by_blood_group, patients.len());

        let heart: Vec<_> = patients
            .patients_by_diagnosis("Heart Disease")
            .map(|p| p.patient_id)
            .collect();
        assert_eq!(heart, [2, 7, 10]);
    }

    #[test]
    fn unknown_diagnosis_is_empty() {
        let patients = sample();
        assert_eq!(patients.patients_by_diagnosis("Unknown").count(), 0);
        assert_eq!(patients.patients_by_diagnosis("heart disease").count(), 0);
        assert!(Patients::empty().filter_by_diagnosis("Unknown").is_empty());
    }

    #[test]
    fn high_risk_in_file_order() {
        let patients = sample();
        let ids: Vec<_> = patients
            .high_risk_patients()
            .iter_ref()
            .map(|p| p.patient_id)
            .collect();
        assert_eq!(ids, [2, 3, 5, 7, 9, 10]);
    }

    #[test]
    fn save_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("patients.csv");
        let patients = sample();
        patients.save(&path).unwrap();
        // saving again overwrites
        patients.save(&path).unwrap();
        assert_eq!(&*Patients::load(&path).unwrap(), &*patients);
    }

    #[test]
    fn save_and_reload() {
        let patients = sample();
        let mut out = Vec::new();
        patients.save_to_writer(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("id,name,age,bloodPressure,cholesterol,bloodGroup,diagnosis\n"));
        assert!(text.contains("\n2,Bob Smith,67,165,245,O+,Heart Disease\n"));

        let reloaded = Patients::from_reader(text.as_bytes()).unwrap();
        assert_eq!(&*reloaded, &*patients);
    }
}
