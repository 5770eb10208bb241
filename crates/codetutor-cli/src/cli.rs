//! Command-line arguments

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "codetutor")]
#[command(about = "Classify and answer programming study questions", long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "codetutor.yaml", env = "CODETUTOR_CONFIG")]
    pub config: PathBuf,

    /// Inference API root (OpenAI-compatible)
    #[arg(long, env = "CODETUTOR_BASE_URL")]
    pub base_url: Option<String>,

    /// Model to request from the inference service
    #[arg(short, long, env = "CODETUTOR_MODEL")]
    pub model: Option<String>,

    /// Practice fixture directory
    #[arg(short, long, env = "CODETUTOR_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Classify a question and print the tutoring answer
    Ask {
        /// The student's question
        query: String,

        /// Disable caller-side retry of transient service errors
        #[arg(long)]
        no_retry: bool,
    },

    /// Print the active topic registry
    Topics,

    /// Run only the safety gate on a query
    Check {
        query: String,
    },

    /// Browse the practice problem set
    Problems {
        #[command(subcommand)]
        command: ProblemsCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum ProblemsCommand {
    /// List problem summaries
    List {
        /// Only show problems whose topic contains this text
        #[arg(short, long)]
        topic: Option<String>,
    },

    /// Show one problem's full statement
    Show {
        id: String,
    },

    /// Print the test scaffold for a problem in one language
    Scaffold {
        id: String,
        language: String,
    },
}
