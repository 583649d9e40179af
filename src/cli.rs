//! Command-line interface definition using clap.
//!
//! This module defines [`Args`], the argument structure of the `threadpack`
//! binary, and the conversions from it into library configuration.
//!
//! ```rust
//! use clap::Parser;
//! use threadpack::cli::Args;
//! use threadpack::ExportFormat;
//!
//! let args = Args::parse_from(["threadpack", "messages.htm", "--csv", "--json", "--uid", "12345"]);
//! assert_eq!(args.formats(), vec![ExportFormat::Csv, ExportFormat::Json]);
//! assert_eq!(args.owner().uid(), Some("12345@facebook.com"));
//! ```

use std::path::PathBuf;

use clap::{ArgAction, Parser};

use crate::config::ArchiveConfig;
use crate::core::models::OutputEncoding;
use crate::error::Result;
use crate::format::ExportFormat;
use crate::identity::{OwnerIdentity, ReplacementNames};

/// Default directory for exported files.
pub const DEFAULT_OUTPUT_DIR: &str = "threadpack_out";

/// Rebuild conversations from a Facebook messages.htm archive.
#[derive(Parser, Debug, Clone)]
#[command(name = "threadpack")]
#[command(version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    threadpack messages.htm --csv
    threadpack messages.htm --text --json --dir exports
    threadpack messages.htm --stdout --uid 12345 --name \"Jane Doe\"
    threadpack messages.htm --csv --replace replace.ini --sanitize
    threadpack messages.htm --text --encoding windows-1251")]
pub struct Args {
    /// Path to messages.htm
    pub input: PathBuf,

    /// Directory for exports (created if missing)
    #[arg(short, long, default_value = DEFAULT_OUTPUT_DIR)]
    pub dir: PathBuf,

    /// Export to CSV
    #[arg(long)]
    pub csv: bool,

    /// Export to TXT
    #[arg(long, visible_alias = "txt")]
    pub text: bool,

    /// Export to JSON
    #[arg(long)]
    pub json: bool,

    /// Print threads to the console
    #[arg(long)]
    pub stdout: bool,

    /// Your Facebook UID (replaced by --name)
    #[arg(long)]
    pub uid: Option<String>,

    /// Your Facebook display name (also replaces UID and aliases)
    #[arg(long)]
    pub name: Option<String>,

    /// Another name that is also you (repeatable)
    #[arg(long = "alias", value_name = "NAME")]
    pub aliases: Vec<String>,

    /// File with replacement names, one `old name=new name` per line
    #[arg(long, value_name = "FILE")]
    pub replace: Option<PathBuf>,

    /// Strip invalid characters first (keeps a .bak of the archive)
    #[arg(long)]
    pub sanitize: bool,

    /// Skip messages whose timestamp cannot be parsed
    #[arg(long)]
    pub skip_invalid: bool,

    /// Encoding of exported files (any WHATWG label, e.g. latin1, cp1251)
    #[arg(long, value_name = "LABEL", default_value = "utf-8")]
    pub encoding: String,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    /// Returns the requested formats in a fixed order.
    pub fn formats(&self) -> Vec<ExportFormat> {
        [
            (self.csv, ExportFormat::Csv),
            (self.text, ExportFormat::Txt),
            (self.json, ExportFormat::Json),
            (self.stdout, ExportFormat::Stdout),
        ]
        .into_iter()
        .filter_map(|(on, format)| on.then_some(format))
        .collect()
    }

    /// Builds the owner identity from `--uid`, `--name` and `--alias`.
    pub fn owner(&self) -> OwnerIdentity {
        let mut owner = OwnerIdentity::new();
        if let Some(uid) = &self.uid {
            owner = owner.with_uid(uid);
        }
        if let Some(name) = &self.name {
            owner = owner.with_name(name);
        }
        for alias in &self.aliases {
            owner = owner.with_alias(alias);
        }
        owner
    }

    /// Builds the archive configuration, loading the replacement file if one
    /// was given.
    pub fn archive_config(&self) -> Result<ArchiveConfig> {
        let encoding = OutputEncoding::for_label(&self.encoding)?;
        let replacements = match &self.replace {
            Some(path) => ReplacementNames::load(path)?,
            None => ReplacementNames::new(),
        };
        Ok(ArchiveConfig::new()
            .with_owner(self.owner())
            .with_replacements(replacements)
            .with_sanitize(self.sanitize)
            .with_skip_invalid(self.skip_invalid)
            .with_encoding(encoding))
    }

    /// Log filter directive for the requested verbosity.
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }
}
