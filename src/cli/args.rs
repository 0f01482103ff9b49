//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueEnum, ValueHint};

use crate::application::services::ExportFormat;
use crate::domain::State;

/// Track party invitees (students, their friends, teachers) and their invitation status
#[derive(Parser, Debug)]
#[command(name = "partyguests")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Directory searched for a local .partyguests.toml (default: cwd)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub dir: Option<PathBuf>,

    /// Override the data directory holding the stored guest list
    #[arg(long, global = true, value_hint = ValueHint::DirPath)]
    pub data_dir: Option<PathBuf>,

    /// Reject unknown fields in imported or stored documents
    #[arg(long, global = true)]
    pub strict: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show all students, friends and teachers
    List,

    /// Manage students
    Student {
        #[command(subcommand)]
        command: PersonCommands,
    },

    /// Manage a student's friends
    Friend {
        #[command(subcommand)]
        command: FriendCommands,
    },

    /// Manage teachers
    Teacher {
        #[command(subcommand)]
        command: PersonCommands,
    },

    /// Export the guest list to a timestamped file
    Export {
        /// Output format
        #[arg(value_enum)]
        format: FormatArg,
        /// Target directory (default: export.dir from config)
        #[arg(short, long, value_hint = ValueHint::DirPath)]
        dir: Option<PathBuf>,
        /// Print to stdout instead of writing a file
        #[arg(long, conflicts_with = "dir")]
        stdout: bool,
    },

    /// Replace the guest list with a JSON file
    Import {
        /// JSON file to import
        #[arg(value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,
    },

    /// Check a JSON file against the document shape without importing it
    Validate {
        /// JSON file to check
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Delete the stored guest list
    Reset,

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Subcommands shared by students and teachers
#[derive(Subcommand, Debug)]
pub enum PersonCommands {
    /// Append a new entry (defaults: "John Doe", PENDING)
    Add {
        #[arg(short, long)]
        name: Option<String>,
        /// PENDING, PAID or DELIVERED
        #[arg(short, long)]
        state: Option<State>,
    },

    /// Remove the entry at INDEX
    Remove { index: usize },

    /// Rename the entry at INDEX and/or change its state
    Set {
        index: usize,
        #[arg(short, long)]
        name: Option<String>,
        /// PENDING, PAID or DELIVERED
        #[arg(short, long)]
        state: Option<State>,
    },
}

#[derive(Subcommand, Debug)]
pub enum FriendCommands {
    /// Append a friend to the student at STUDENT
    Add {
        student: usize,
        #[arg(short, long)]
        name: Option<String>,
        /// PENDING, PAID or DELIVERED
        #[arg(short, long)]
        state: Option<State>,
    },

    /// Remove friend INDEX of the student at STUDENT
    Remove { student: usize, index: usize },

    /// Rename friend INDEX of the student at STUDENT and/or change its state
    Set {
        student: usize,
        index: usize,
        #[arg(short, long)]
        name: Option<String>,
        /// PENDING, PAID or DELIVERED
        #[arg(short, long)]
        state: Option<State>,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Create config template
    Init {
        /// Create global config
        #[arg(short, long)]
        global: bool,
    },

    /// Show config and data paths
    Path,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatArg {
    Json,
    Csv,
}

impl From<FormatArg> for ExportFormat {
    fn from(f: FormatArg) -> Self {
        match f {
            FormatArg::Json => ExportFormat::Json,
            FormatArg::Csv => ExportFormat::Csv,
        }
    }
}
