use clap::Parser;
use medical_data_miner::{Config, MedicalDataMiner, ResultExt};
use qu::ick_use::*;
use std::path::PathBuf;

#[derive(Parser)]
struct Opt {
    /// Patient records to show.
    input: PathBuf,
    /// Only show high risk patients.
    #[clap(long)]
    high_risk: bool,
    /// Only show patients with exactly this diagnosis.
    #[clap(short, long)]
    diagnosis: Option<String>,
    /// Also save the shown patients, in the input format.
    #[clap(long)]
    save: Option<PathBuf>,
    /// Config file to use in place of `medical_data_miner.toml`.
    #[clap(short, long)]
    config: Option<PathBuf>,
}

#[qu::ick]
pub fn main(opt: Opt) -> Result {
    let config = Config::load(opt.config.as_deref())?;
    let miner = MedicalDataMiner::new();
    miner.load(config.input_path(&opt.input)).print_error()?;

    let mut patients = (*miner.patients()).clone();
    let mut description = "all patients";
    if opt.high_risk {
        patients = patients.high_risk_patients();
        description = "high risk patients only";
    }
    if let Some(diagnosis) = &opt.diagnosis {
        patients = patients.filter_by_diagnosis(diagnosis);
        description = if opt.high_risk {
            "high risk patients with the given diagnosis"
        } else {
            "patients with the given diagnosis"
        };
    }

    println!("{}", patients.term_table());
    println!("Showing {} ({} records)", description, patients.len());

    if let Some(path) = &opt.save {
        patients.save(config.output_path(path))?;
    }
    Ok(())
}
