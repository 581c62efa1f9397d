//! Argument parsing and query execution for the `cadence` binary.

use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use cadence_engine::{
    parse_instant, Direction, EngineConfig, Occurrences, Recurrence, RecurrenceDef, Span,
    TimeReference,
};
use chrono::{DateTime, SecondsFormat, Utc};
use clap::Parser;

/// Evaluate a recurrence definition: next or previous occurrences, valid
/// spans, or a validity check.
///
/// The definition is JSON of the form
/// `{"recurrences": [{"h": [9], "dw": [2]}], "exceptions": [...]}`.
/// It is read from --definition, --inline, or standard input.
#[derive(Parser, Debug)]
#[command(name = "cadence", version, about)]
pub struct Cli {
    /// Path to a JSON recurrence definition.
    #[arg(long, short = 'd', conflicts_with = "inline")]
    pub definition: Option<PathBuf>,

    /// Recurrence definition given directly as JSON.
    #[arg(long, short = 'i')]
    pub inline: Option<String>,

    /// Time reference for calendar fields: "utc", "local", or an IANA zone.
    #[arg(long, default_value = "utc")]
    pub tz: TimeReference,

    /// Search start (RFC 3339). Defaults to now.
    #[arg(long, value_parser = parse_instant)]
    pub start: Option<DateTime<Utc>>,

    /// Search bound (RFC 3339), inclusive.
    #[arg(long, value_parser = parse_instant)]
    pub end: Option<DateTime<Utc>>,

    /// Number of occurrences or spans to return.
    #[arg(long, short = 'n', default_value_t = 1)]
    pub count: usize,

    /// Search backward from the start.
    #[arg(long)]
    pub prev: bool,

    /// Return valid spans instead of points.
    #[arg(long)]
    pub range: bool,

    /// Every occurrence between --start and --end.
    #[arg(long, conflicts_with_all = ["prev", "range", "count"])]
    pub all: bool,

    /// Only check whether this instant (RFC 3339) is an occurrence.
    #[arg(long, value_parser = parse_instant, conflicts_with_all = ["prev", "range", "all", "count"])]
    pub valid: Option<DateTime<Utc>>,

    /// Print results as JSON.
    #[arg(long)]
    pub json: bool,
}

/// What the command line asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Query {
    Valid(DateTime<Utc>),
    Points(Direction),
    Spans(Direction),
    All,
}

impl Cli {
    pub fn query(&self) -> Query {
        let dir = if self.prev {
            Direction::Prev
        } else {
            Direction::Next
        };
        match (self.valid, self.all, self.range) {
            (Some(at), _, _) => Query::Valid(at),
            (None, true, _) => Query::All,
            (None, false, true) => Query::Spans(dir),
            (None, false, false) => Query::Points(dir),
        }
    }

    /// The definition text from --definition, --inline, or `stdin`.
    fn definition_text(&self, mut stdin: impl Read) -> Result<String> {
        if let Some(path) = &self.definition {
            return std::fs::read_to_string(path)
                .with_context(|| format!("failed to read definition file: {}", path.display()));
        }
        if let Some(inline) = &self.inline {
            return Ok(inline.clone());
        }
        let mut text = String::new();
        stdin
            .read_to_string(&mut text)
            .context("failed to read definition from stdin")?;
        Ok(text)
    }
}

/// Result of a query, ready to print.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    Valid(bool),
    Points(Occurrences<DateTime<Utc>>),
    Spans(Occurrences<Span>),
}

fn instant_text(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn bound_text(at: &Option<DateTime<Utc>>) -> String {
    at.as_ref().map_or_else(|| "-".to_string(), instant_text)
}

impl Output {
    /// One line per result, `never` when there is none.
    pub fn to_text(&self) -> String {
        match self {
            Output::Valid(valid) => valid.to_string(),
            Output::Points(Occurrences::Never) | Output::Spans(Occurrences::Never) => {
                "never".to_string()
            }
            Output::Points(points) => points
                .clone()
                .into_vec()
                .iter()
                .map(instant_text)
                .collect::<Vec<_>>()
                .join("\n"),
            Output::Spans(spans) => spans
                .clone()
                .into_vec()
                .iter()
                .map(|span| format!("{}/{}", bound_text(&span.start), bound_text(&span.end)))
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        let json = match self {
            Output::Valid(valid) => serde_json::to_string_pretty(&serde_json::json!({ "valid": valid })),
            Output::Points(points) => serde_json::to_string_pretty(points),
            Output::Spans(spans) => serde_json::to_string_pretty(spans),
        };
        json.context("failed to serialize output")
    }
}

/// Parse, compile and evaluate.
pub fn run(cli: &Cli, stdin: impl Read) -> Result<String> {
    let text = cli.definition_text(stdin)?;
    let def = RecurrenceDef::from_json(&text).context("failed to parse recurrence definition")?;
    let recurrence = Recurrence::with_config(&def, EngineConfig::with_reference(cli.tz))
        .context("failed to compile recurrence definition")?;

    let query = cli.query();
    tracing::debug!(?query, reference = %cli.tz, "evaluating recurrence");

    let output = match query {
        Query::Valid(at) => Output::Valid(recurrence.is_valid(at)),
        Query::All => Output::Points(recurrence.all(cli.start, cli.end)),
        Query::Points(Direction::Next) => {
            Output::Points(recurrence.next(cli.count, cli.start, cli.end))
        }
        Query::Points(Direction::Prev) => {
            Output::Points(recurrence.prev(cli.count, cli.start, cli.end))
        }
        Query::Spans(Direction::Next) => {
            Output::Spans(recurrence.next_range(cli.count, cli.start, cli.end))
        }
        Query::Spans(Direction::Prev) => {
            Output::Spans(recurrence.prev_range(cli.count, cli.start, cli.end))
        }
    };

    if cli.json {
        output.to_json()
    } else {
        Ok(output.to_text())
    }
}
