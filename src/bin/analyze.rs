use clap::Parser;
use medical_data_miner::{miner::is_no_data, Action, Config, MedicalDataMiner, ResultExt};
use qu::ick_use::*;
use std::path::PathBuf;

#[derive(Parser)]
struct Opt {
    /// Patient records to analyse (comma-separated, with a header line).
    input: PathBuf,
    /// The analysis to run.
    #[clap(value_enum, default_value_t = Action::Quick)]
    action: Action,
    /// Print the analysis as JSON instead of text.
    #[clap(long)]
    json: bool,
    /// Config file to use in place of `medical_data_miner.toml`.
    #[clap(short, long)]
    config: Option<PathBuf>,
}

#[qu::ick]
pub fn main(opt: Opt) -> Result {
    let config = Config::load(opt.config.as_deref())?;
    let miner = MedicalDataMiner::new();
    let summary = miner.load(config.input_path(&opt.input)).print_error()?;
    event!(Level::INFO, "{} patients loaded", summary.total);

    if opt.json {
        println!("{}", opt.action.run_json(&miner)?);
    } else {
        let text = opt.action.run(&miner);
        if is_no_data(&text) {
            event!(Level::WARN, "\"{}\" contains no patient records", summary.source);
        }
        print!("{}", text);
    }
    Ok(())
}
