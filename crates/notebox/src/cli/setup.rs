use clap::{Parser, Subcommand};
use noteboxapp::model::MergeStrategy;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "notebox",
    bin_name = "notebox",
    version,
    disable_help_subcommand = true
)]
#[command(about = "Folders of markdown notes, with JSON export and import", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Data directory (defaults to $NOTEBOX_DATA, then the OS data dir)
    #[arg(long, global = true, help_heading = "Options")]
    pub data: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show all folders and files
    #[command(alias = "ls", display_order = 1)]
    Tree,

    /// Create a folder
    #[command(display_order = 2)]
    Mkdir {
        name: String,

        /// Parent folder id (default: root)
        #[arg(long, short)]
        parent: Option<String>,
    },

    /// Create a file
    #[command(alias = "n", display_order = 3)]
    New {
        name: String,

        /// Owning folder id (default: the active folder, else root)
        #[arg(long, short)]
        folder: Option<String>,

        /// Initial content
        #[arg(long, short)]
        content: Option<String>,
    },

    /// Replace a file's content (reads stdin when no content is given)
    #[command(display_order = 4)]
    Write { id: String, content: Option<String> },

    /// Print a file's content
    #[command(alias = "cat", display_order = 5)]
    Show { id: String },

    /// Rename a file, or a folder with --folder
    #[command(display_order = 10)]
    Rename {
        id: String,
        name: String,

        #[arg(long)]
        folder: bool,
    },

    /// Move a file, or a folder with --folder, into another folder
    #[command(display_order = 11)]
    Mv {
        id: String,
        dest: String,

        #[arg(long)]
        folder: bool,
    },

    /// Delete a file
    #[command(display_order = 12)]
    Rm { id: String },

    /// Delete a folder
    #[command(display_order = 13)]
    Rmdir {
        id: String,

        /// Also delete everything inside it
        #[arg(long, short)]
        recursive: bool,
    },

    /// Select the active file, or folder with --folder ("none" clears)
    #[command(display_order = 14)]
    Select {
        id: String,

        #[arg(long)]
        folder: bool,
    },

    /// Export everything as JSON (to stdout when no path is given)
    #[command(display_order = 20)]
    Export { path: Option<PathBuf> },

    /// Import a JSON export
    #[command(display_order = 21)]
    Import {
        path: PathBuf,

        /// overwrite, skip or duplicate (default from notebox.toml)
        #[arg(long, short, value_parser = parse_strategy)]
        strategy: Option<MergeStrategy>,
    },

    /// Check and repair store consistency
    #[command(display_order = 30)]
    Doctor,
}

fn parse_strategy(s: &str) -> Result<MergeStrategy, String> {
    s.parse()
}
