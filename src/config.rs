//! Where to find input files and where to put output.
//!
//! Settings are read from an optional TOML file:
//!
//! ```toml
//! data_dir = "data"
//! output_dir = "output"
//! report_name = "medical_report.txt"
//! ```
//!
//! Every key is optional.
use crate::{util, Result};
use qu::ick_use::*;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

/// The file read by `Config::load` when no path is given.
pub const DEFAULT_CONFIG_PATH: &str = "medical_data_miner.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Relative input paths are resolved against this directory.
    pub data_dir: PathBuf,
    /// Relative output paths are resolved against this directory.
    pub output_dir: PathBuf,
    /// File name used for reports when no output path is given.
    pub report_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_dir: PathBuf::from("."),
            output_dir: PathBuf::from("."),
            report_name: "medical_report.txt".into(),
        }
    }
}

impl Config {
    /// Load config from `path`, or from `DEFAULT_CONFIG_PATH` if `path` is `None`.
    ///
    /// It is an error for an explicitly given file to be missing, but a missing default file
    /// just gives the default config.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, required) = match path {
            Some(path) => (path, true),
            None => (Path::new(DEFAULT_CONFIG_PATH), false),
        };
        if !required && !util::path_exists(path)? {
            event!(Level::DEBUG, "no config file, using defaults");
            return Ok(Config::default());
        }

        fn inner(path: &Path) -> Result<Config> {
            let text = fs::read_to_string(path)?;
            Config::from_toml(&text)
        }
        inner(path).with_context(|| format!("loading config from \"{}\"", path.display()))
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Note: No protection from escaping the root directory.
    pub fn input_path(&self, input: &Path) -> PathBuf {
        self.data_dir.join(input)
    }

    /// Note: No protection from escaping the root directory.
    pub fn output_path(&self, output: &Path) -> PathBuf {
        self.output_dir.join(output)
    }

    /// `output`, or the configured report name, in the output directory.
    pub fn report_path(&self, output: Option<&Path>) -> PathBuf {
        match output {
            Some(output) => self.output_path(output),
            None => self.output_path(Path::new(&self.report_name)),
        }
    }
}
