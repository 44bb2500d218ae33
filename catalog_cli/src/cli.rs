//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use catalog_core::grade::{GradePolicy, ModulusPolicy};
use catalog_core::CatalogSettings;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "catalog_cli", version, about = "Steel section catalog picker")]
pub struct Cli {
    /// Catalog folder (one CSV per series)
    #[arg(short = 'l', long, global = true)]
    pub library: Option<PathBuf>,

    /// Settings file (TOML). Defaults to `catalog.toml` if present.
    #[arg(short = 's', long, global = true)]
    pub settings: Option<PathBuf>,

    /// Number of filename characters that form a category
    #[arg(long, global = true)]
    pub prefix_len: Option<usize>,

    /// How the material grade is derived
    #[arg(long, value_enum, global = true)]
    pub grade_policy: Option<GradeArg>,

    /// How the elastic modulus is derived
    #[arg(long, value_enum, global = true)]
    pub modulus_policy: Option<ModulusArg>,

    /// Log more (repeat for trace output)
    #[arg(short = 'v', long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List section type categories.
    Types,
    /// List the series of a category.
    Series {
        category: String,
    },
    /// List the members of a series.
    Members {
        series: String,
    },
    /// Show the material summary and scaled properties of a member.
    Show {
        series: String,
        member: String,

        /// Print the derived properties as JSON
        #[arg(long)]
        json: bool,
    },
    /// Publish member properties as named variables.
    Publish {
        series: String,
        member: String,

        /// Property keys, comma separated (e.g. Ix,Zx,E)
        #[arg(short = 'p', long, value_delimiter = ',', required = true)]
        props: Vec<String>,

        /// Suffix appended to each variable name
        #[arg(long, default_value = "")]
        suffix: String,

        /// Namespace file to merge the bindings into
        #[arg(short = 'o', long)]
        out: Option<PathBuf>,
    },
    /// Pick a member through cascading menus (default).
    Interactive {
        /// Namespace file to merge published bindings into on exit
        #[arg(short = 'o', long)]
        out: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GradeArg {
    Series,
    Description,
}

/// Spelled the same as `modulus_policy` in the settings file
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModulusArg {
    Fixed,
    Table,
}

impl From<GradeArg> for GradePolicy {
    fn from(arg: GradeArg) -> Self {
        match arg {
            GradeArg::Series => GradePolicy::Series,
            GradeArg::Description => GradePolicy::Description,
        }
    }
}

impl From<ModulusArg> for ModulusPolicy {
    fn from(arg: ModulusArg) -> Self {
        match arg {
            ModulusArg::Fixed => ModulusPolicy::Fixed,
            ModulusArg::Table => ModulusPolicy::GradeTable,
        }
    }
}

impl Cli {
    /// Apply command-line overrides on top of file/default settings.
    pub fn apply_overrides(&self, mut settings: CatalogSettings) -> CatalogSettings {
        if let Some(library) = &self.library {
            settings.library_folder = library.clone();
        }
        if let Some(len) = self.prefix_len {
            settings.category_prefix_len = len;
        }
        if let Some(grade) = self.grade_policy {
            settings.grade_policy = grade.into();
        }
        if let Some(modulus) = self.modulus_policy {
            settings.modulus_policy = modulus.into();
        }
        settings
    }
}
