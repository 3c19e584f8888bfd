use clap::Parser;
use medical_data_miner::{Config, MedicalDataMiner, ResultExt};
use qu::ick_use::*;
use std::path::PathBuf;

#[derive(Parser)]
struct Opt {
    /// Patient records to report on.
    input: PathBuf,
    /// Where to write the report. Defaults to the configured report name.
    #[clap(short, long)]
    output: Option<PathBuf>,
    /// Config file to use in place of `medical_data_miner.toml`.
    #[clap(short, long)]
    config: Option<PathBuf>,
}

#[qu::ick]
pub fn main(opt: Opt) -> Result {
    let config = Config::load(opt.config.as_deref())?;
    let miner = MedicalDataMiner::new();
    print!(
        "{}",
        miner.load(config.input_path(&opt.input)).print_error()?
    );

    let output = config.report_path(opt.output.as_deref());
    miner.generate_report(&output).print_error()?;
    println!("Report saved to \"{}\"", output.display());
    Ok(())
}
