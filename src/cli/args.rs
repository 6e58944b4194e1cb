//! Command-line argument parsing
//!
//! Provides clap-based CLI with subcommands and verbosity control.

use crate::types::{AgeInput, BinaryInput, PredictRequest};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Dengue risk prediction service with an AI health assistant
#[derive(Parser, Debug)]
#[command(name = "dengue-predictor")]
#[command(version)]
#[command(about = "Dengue risk prediction API, gateway and tools", long_about = None)]
pub struct Args {
    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbosity level: -q (quiet), default (normal), -v (verbose), -vv (very verbose)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Run the API server (single-process topology)
    Serve {
        /// Bind address, overrides [server] host
        #[arg(long)]
        host: Option<String>,

        /// Bind port, overrides [server] port
        #[arg(long)]
        port: Option<u16>,
    },

    /// Run the gateway in front of a backend API process
    Gateway {
        /// Listen port, overrides [gateway] port
        #[arg(long)]
        port: Option<u16>,

        /// Backend base URL, overrides [gateway] backend_url
        #[arg(long)]
        backend_url: Option<String>,
    },

    /// Score one patient offline and print the result as JSON
    Predict(PredictArgs),

    /// Load historical cases from a JSON file into the vector store
    Ingest {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Run deployment diagnostics
    Doctor,

    /// Display current configuration
    Config,
}

#[derive(clap::Args, Debug, Clone, PartialEq)]
pub struct PredictArgs {
    #[arg(long)]
    pub age: u32,

    /// 1 = male, 0 = female
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=1))]
    pub gender: u8,

    #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=1))]
    pub ns1: u8,

    #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=1))]
    pub igg: u8,

    #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=1))]
    pub igm: u8,

    #[arg(long)]
    pub area: String,

    #[arg(long)]
    pub district: String,

    #[arg(long)]
    pub area_type: String,

    #[arg(long)]
    pub house_type: String,
}

impl PredictArgs {
    pub fn to_request(&self) -> PredictRequest {
        let flag = |value: u8| Some(BinaryInput::Int(i64::from(value)));
        PredictRequest {
            age: Some(AgeInput::from(self.age)),
            gender: flag(self.gender),
            ns1: flag(self.ns1),
            igg: flag(self.igg),
            igm: flag(self.igm),
            area: Some(self.area.clone()),
            district: Some(self.district.clone()),
            area_type: Some(self.area_type.clone()),
            house_type: Some(self.house_type.clone()),
        }
    }
}

/// Verbosity level enum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
    VeryVerbose,
}

impl Args {
    /// Get verbosity level based on flags
    pub fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else {
            match self.verbose {
                0 => Verbosity::Normal,
                1 => Verbosity::Verbose,
                _ => Verbosity::VeryVerbose,
            }
        }
    }
}

impl Verbosity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verbosity::Quiet => "quiet",
            Verbosity::Normal => "normal",
            Verbosity::Verbose => "verbose",
            Verbosity::VeryVerbose => "very_verbose",
        }
    }
}
