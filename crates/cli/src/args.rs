//! CLI argument definitions using clap.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use clubhouse_core::{EntityKind, Mode};

/// Validate a JSON record against a clubhouse entity schema
#[derive(Parser, Debug)]
#[command(name = "clubhouse-validate")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Entity schema to validate against
    #[arg(value_enum)]
    pub entity: EntityArg,

    /// Full creation or partial update semantics
    #[arg(long, value_enum, default_value_t = ModeArg::Create)]
    pub mode: ModeArg,

    /// JSON file holding one object; stdin when omitted or "-"
    pub input: Option<PathBuf>,

    /// Report keys the schema does not declare instead of ignoring them
    #[arg(long)]
    pub strict_keys: bool,

    /// Report blank collection items instead of dropping them
    #[arg(long)]
    pub strict_items: bool,

    /// Pretty-print the JSON output
    #[arg(long)]
    pub pretty: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EntityArg {
    User,
    Club,
    Event,
    Comment,
}

impl From<EntityArg> for EntityKind {
    fn from(arg: EntityArg) -> Self {
        match arg {
            EntityArg::User => EntityKind::User,
            EntityArg::Club => EntityKind::Club,
            EntityArg::Event => EntityKind::Event,
            EntityArg::Comment => EntityKind::Comment,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    Create,
    Update,
}

impl From<ModeArg> for Mode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Create => Mode::Create,
            ModeArg::Update => Mode::Update,
        }
    }
}

impl Cli {
    /// Whether input should come from stdin.
    pub fn reads_stdin(&self) -> bool {
        self.input
            .as_deref()
            .map_or(true, |path| path.as_os_str() == "-")
    }
}
