//! `recurrent` command line tool.
//!
//! ```bash
//! # Print a rule back in normalized form
//! recurrent parse "RRULE:FREQ=WEEKLY;INTERVAL=2;WKST=SU;BYDAY=TU,TH"
//!
//! # Expand a rule from a local start time
//! recurrent expand "FREQ=DAILY;COUNT=10" --start 19970902T090000 --tzid America/New_York
//!
//! # Expand a window of an unbounded rule as JSON
//! recurrent expand "FREQ=DAILY" --start 19970902T090000 \
//!     --after 19971001T000000Z --before 19971101T000000Z --json
//! ```

use anyhow::Context as _;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use recurrent_core::config::{Settings, load_config};
use recurrent_rfc::rfc::rrule::expand::{
    ExpansionOptions, TimeZoneResolver, ZonedDateTime, convert_to_zoned, expand_rrule,
};
use recurrent_rfc::rfc::rrule::parse::{
    RRULE_PREFIX, parse_compact_datetime, parse_rrule, parse_until,
};
use tracing_subscriber::{
    EnvFilter, Registry, fmt, layer::SubscriberExt, reload, util::SubscriberInitExt,
};

type FilterHandle = reload::Handle<EnvFilter, Registry>;

/// Parse RFC 5545 recurrence rules and list their occurrences
#[derive(Debug, Parser)]
#[command(name = "recurrent", version, about)]
struct Cli {
    /// Log filter, overriding `logging.level` from configuration
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Parse a rule and print it back in normalized form
    Parse {
        /// Rule text, with or without the `RRULE:` prefix
        rule: String,
    },

    /// Expand a rule into occurrences
    Expand {
        /// Rule text, with or without the `RRULE:` prefix
        rule: String,

        /// First occurrence, `YYYYMMDDTHHMMSS` (local to --tzid) or `YYYYMMDDTHHMMSSZ`
        #[arg(long)]
        start: String,

        /// Timezone of the occurrences (defaults to `expansion.default_tzid`)
        #[arg(long)]
        tzid: Option<String>,

        /// Maximum number of occurrences (defaults to `expansion.max_instances`)
        #[arg(long)]
        limit: Option<usize>,

        /// Skip occurrences before this UTC time (`YYYYMMDDTHHMMSSZ`, inclusive)
        #[arg(long)]
        after: Option<String>,

        /// Stop at this UTC time (`YYYYMMDDTHHMMSSZ`, exclusive)
        #[arg(long)]
        before: Option<String>,

        /// Print a JSON array instead of one timestamp per line
        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter_handle = init_logging();
    let config = load_config()?;
    apply_log_level(
        &filter_handle,
        cli.log_level.as_deref().unwrap_or(&config.logging.level),
    );

    match cli.command {
        Commands::Parse { rule } => {
            let text = with_prefix(&rule);
            match parse_rrule(&text)? {
                Some(parsed) => println!("{RRULE_PREFIX}:{parsed}"),
                None => anyhow::bail!("not an RRULE line: {rule}"),
            }
        }
        Commands::Expand {
            rule,
            start,
            tzid,
            limit,
            after,
            before,
            json,
        } => {
            let tzid = tzid.as_deref().unwrap_or(&config.expansion.default_tzid);
            let start = resolve_start(&start, tzid)?;
            let options = build_options(&config, limit, after.as_deref(), before.as_deref())?;

            let occurrences = expand_rrule(&with_prefix(&rule), start, &options)?;
            let rendered: Vec<String> = occurrences.iter().map(DateTime::to_rfc3339).collect();

            if json {
                println!("{}", serde_json::to_string_pretty(&rendered)?);
            } else {
                for line in rendered {
                    println!("{line}");
                }
            }
        }
    }

    Ok(())
}

/// Installs the subscriber with a reloadable filter. Logs go to stderr.
fn init_logging() -> FilterHandle {
    let (filter_layer, filter_handle) = reload::Layer::new(EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_file(true)
                .with_line_number(true),
        )
        .init();

    filter_handle
}

fn apply_log_level(filter_handle: &FilterHandle, level: &str) {
    if let Ok(filter) = EnvFilter::try_new(level) {
        if let Err(e) = filter_handle.modify(|current| *current = filter) {
            tracing::warn!(error = %e, "Failed to update log filter");
        }
    } else {
        tracing::warn!(level, "Invalid log level, keeping warn");
    }
}

/// Accepts bare rule values (`FREQ=DAILY;...`) as well as full RRULE lines.
fn with_prefix(rule: &str) -> String {
    if rule.starts_with(RRULE_PREFIX) {
        rule.to_string()
    } else {
        format!("{RRULE_PREFIX}:{rule}")
    }
}

/// ## Summary
/// Reads the start timestamp. UTC values are converted into `tzid`; local
/// values are taken as wall-clock time in `tzid`.
///
/// ## Errors
/// Returns an error for malformed timestamps, unknown zones and local times
/// that fall into a DST gap.
fn resolve_start(start: &str, tzid: &str) -> anyhow::Result<ZonedDateTime> {
    let (naive, is_utc) =
        parse_compact_datetime(start, 1).with_context(|| format!("invalid --start {start:?}"))?;
    let mut resolver = TimeZoneResolver::new();

    if is_utc {
        let tz = resolver.resolve(tzid)?;
        Ok(naive.and_utc().with_timezone(&tz))
    } else {
        Ok(convert_to_zoned(naive, tzid, &mut resolver)?)
    }
}

fn build_options(
    config: &Settings,
    limit: Option<usize>,
    after: Option<&str>,
    before: Option<&str>,
) -> anyhow::Result<ExpansionOptions> {
    let mut options = ExpansionOptions::from(&config.expansion);

    if let Some(limit) = limit {
        options = options.with_max_instances(limit);
    }
    if let Some(after) = after {
        options = options.starting_at(utc_bound("--after", after)?);
    }
    if let Some(before) = before {
        options = options.ending_before(utc_bound("--before", before)?);
    }

    Ok(options)
}

fn utc_bound(flag: &str, value: &str) -> anyhow::Result<DateTime<Utc>> {
    parse_until(value, 1).with_context(|| format!("invalid {flag} {value:?}"))
}
