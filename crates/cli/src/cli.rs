#![forbid(unsafe_code)]

use clap::{Args, Parser, Subcommand};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use prediction::{Field, FormInput};
use std::path::{Path, PathBuf};

/// evp: EV range predictor client
///
/// Sends vehicle parameters to the prediction service and shows the derived
/// range metrics, or runs the headless 3D scene viewer.
#[derive(Debug, Parser, Clone)]
#[command(about, long_about, version)]
pub struct Cli {
    /// Path to configuration file.
    #[arg(short, long, value_parser = validate_file)]
    pub conffile: Option<PathBuf>,

    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Request a range prediction.
    ///
    /// Omitted fields are sent as empty and fail validation.
    Predict(PredictArgs),

    /// Probe the service's health endpoint.
    Health,

    /// Describe the model behind the service.
    ModelInfo,

    /// Run the scene viewer until interrupted.
    ///
    /// SIGUSR1 toggles auto-rotation, SIGUSR2 logs the viewer state.
    Viewer {
        /// Scene file to show instead of the configured one.
        #[arg(short, long)]
        asset: Option<PathBuf>,
    },

    /// Print the effective configuration as TOML.
    DumpConfig,
}

#[derive(Debug, Args, Clone, Default)]
pub struct PredictArgs {
    #[arg(long)]
    pub county: Option<String>,
    #[arg(long)]
    pub city: Option<String>,
    #[arg(long)]
    pub model_year: Option<String>,
    #[arg(long)]
    pub make: Option<String>,
    #[arg(long)]
    pub model: Option<String>,
    #[arg(long)]
    pub ev_type: Option<String>,
    #[arg(long)]
    pub cafv_eligibility: Option<String>,
    #[arg(long)]
    pub electric_utility: Option<String>,
}

impl PredictArgs {
    pub fn to_form(&self) -> FormInput {
        [
            (Field::County, &self.county),
            (Field::City, &self.city),
            (Field::ModelYear, &self.model_year),
            (Field::Make, &self.make),
            (Field::Model, &self.model),
            (Field::EvType, &self.ev_type),
            (Field::CafvEligibility, &self.cafv_eligibility),
            (Field::ElectricUtility, &self.electric_utility),
        ]
        .into_iter()
        .map(|(field, value)| (field, value.clone().unwrap_or_default()))
        .collect()
    }
}

/// Check if the file exists.
#[inline(always)]
fn validate_file(file: &str) -> Result<PathBuf, String> {
    let path = Path::new(file);
    if path.exists() {
        Ok(path.to_owned())
    } else {
        Err(format!("File not found: {:?}", path))
    }
}
