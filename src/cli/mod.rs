//! Subcommand definitions for chronoscope.
//!
//! Without a subcommand the interactive viewer starts. The query subcommands
//! print the same filtered view as plain text.

use chronoscope::record::Field;
use chronoscope::table::{column, SortDirection, SortKey};
use clap::{Args, Subcommand};
use std::path::PathBuf;

/// Available subcommands for chronoscope.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the filtered, sorted record table
    Table(QueryArgs),

    /// Print the filtered records clustered by year
    Timeline(QueryArgs),

    /// List tags with record counts and related tags
    Tags(TagsArgs),

    /// Config file commands
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Filters shared by the query subcommands.
#[derive(Args, Debug)]
pub struct QueryArgs {
    /// Events document ({ "events": [...] })
    #[arg(value_name = "EVENTS")]
    pub events: PathBuf,

    /// Free-text search (case-insensitive, accent-insensitive)
    #[arg(short = 's', long)]
    pub search: Option<String>,

    /// Restrict the search to visible columns
    #[arg(long)]
    pub visible_only: bool,

    /// Earliest year to include
    #[arg(long, allow_hyphen_values = true)]
    pub from: Option<String>,

    /// Latest year to include
    #[arg(long, allow_hyphen_values = true)]
    pub until: Option<String>,

    /// Only records carrying at least one of these tags (repeatable)
    #[arg(id = "tag", short = 't', long = "tag", value_name = "TAG")]
    pub tags: Vec<String>,

    /// Visible columns, comma separated (e.g. year,title,tags)
    #[arg(long, value_delimiter = ',', value_parser = parse_field)]
    pub columns: Option<Vec<Field>>,

    /// Sort keys, comma separated, highest precedence first (e.g. year:desc,title)
    #[arg(long, value_delimiter = ',', value_parser = parse_sort_key)]
    pub sort: Option<Vec<SortKey>>,
}

/// Arguments for the tags subcommand. Related tags come from the global
/// `--tags` document.
#[derive(Args, Debug)]
pub struct TagsArgs {
    /// Events document ({ "events": [...] })
    #[arg(value_name = "EVENTS")]
    pub events: PathBuf,
}

/// Config subcommand actions.
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Validate the config file
    Validate,
    /// Show effective configuration
    Show,
}

fn known_fields() -> String {
    Field::ALL
        .iter()
        .map(|f| f.name())
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn parse_field(name: &str) -> Result<Field, String> {
    Field::from_name(name.trim())
        .ok_or_else(|| format!("unknown column '{}' (expected one of: {})", name, known_fields()))
}

/// Parse `field` or `field:asc|desc`. A bare field sorts ascending.
pub fn parse_sort_key(spec: &str) -> Result<SortKey, String> {
    let (name, direction) = match spec.split_once(':') {
        Some((name, dir)) => {
            let direction = SortDirection::from_name(dir.trim())
                .ok_or_else(|| format!("unknown sort direction '{}' (expected asc or desc)", dir))?;
            (name, direction)
        }
        None => (spec, SortDirection::Ascending),
    };
    let field = parse_field(name)?;
    if !column(field).sortable {
        return Err(format!("column '{}' is not sortable", field.name()));
    }
    Ok(SortKey::new(field, direction))
}
