use clap::Parser;
use medical_data_miner::predict;
use qu::ick_use::*;

#[derive(Parser)]
struct Opt {
    /// Age in years.
    age: i32,
    /// Systolic blood pressure in mmHg.
    blood_pressure: i32,
    /// Cholesterol in mg/dL.
    cholesterol: i32,
    /// Print the prediction as JSON instead of text.
    #[clap(long)]
    json: bool,
}

#[qu::ick]
pub fn main(opt: Opt) -> Result {
    let prediction = predict(opt.age, opt.blood_pressure, opt.cholesterol);
    if opt.json {
        println!("{}", serde_json::to_string_pretty(&prediction)?);
    } else {
        print!("{}", prediction);
    }
    Ok(())
}
