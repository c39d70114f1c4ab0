use clap::{Parser, Subcommand};
use std::path::PathBuf;
use trackforged::plugins::PluginKind;

#[derive(Parser)]
#[command(name = "trackforged")]
#[command(author, version, about = "Track selection and faststart decisions for transcode pipelines")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a plugin against a file description and print its decision
    Decide {
        /// JSON file describing the media file
        #[arg(required = true)]
        input: PathBuf,

        /// Plugin to run (native-lang, keep-native, faststart)
        #[arg(short, long, default_value = "native-lang")]
        plugin: PluginKind,

        /// Input is the host's file object rather than a plugin input
        #[arg(long)]
        host_json: bool,

        /// Print only the host response envelope
        #[arg(long)]
        envelope: bool,
    },

    /// Probe a media file and print its track inventory and faststart status
    Probe {
        /// File to probe
        #[arg(required = true)]
        file: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Resolve the original language of a file name
    Resolve {
        /// File or release name as the library services know it
        #[arg(required = true)]
        name: String,
    },

    /// Check that required external tools are available
    CheckTools,

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },

    /// Display version information
    Version,
}
