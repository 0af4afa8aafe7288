//! Argument parsing for the `enqueue` and `dequeue` binaries.
//!
//! Both tools take flag/value pairs. A help token is only honored as the
//! first argument; anywhere else it is an unknown option. Parsing finishes
//! before any queue work, so a bad invocation never touches the store.

use clap::Parser;

use crate::engine::{Count, DrainOptions, EnqueueOptions};
use crate::error::{Error, Result};

/// Exit status for a rejected command line (`-1` as an unsigned byte).
pub const INVALID_OPTIONS: u8 = 255;

pub const ENQUEUE_HELP: &str = "
Description:
\tinsert messages into the queue

Usage:
\tenqueue <message> [options]

Arguments:
\tmessage: message to be inserted into the queue

Options:
\t-t\ttag of the message
\t-n\tnumber of messages to be inserted (default 1)

Example:
\tenqueue \"My Message\" -t \"foo\" -n 3
";

pub const DEQUEUE_HELP: &str = "
Description:
\tdequeue messages from the queue

Usage:
\tdequeue [options]

Options:
\t-t\ttag of the message
\t-n\tnumber of messages to be dequeued (default -1, unbounded)
\t-j\ttrue|false keep journal (default false)

Example:
\tdequeue -t \"foo\" -n 3
";

/// Outcome of parsing a command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation<T> {
    /// Print usage and exit successfully.
    Help,
    Run(T),
}

/// Options following the message argument of `enqueue`.
#[derive(Parser, Debug)]
#[command(
    name = "enqueue",
    disable_help_flag = true,
    disable_version_flag = true,
    args_override_self = true
)]
struct EnqueueArgs {
    /// Tag of the message
    #[arg(short = 't', allow_hyphen_values = true)]
    tag: Option<String>,
    /// Number of copies to insert
    #[arg(short = 'n', default_value_t = 1, allow_hyphen_values = true)]
    count: u32,
}

#[derive(Parser, Debug)]
#[command(
    name = "dequeue",
    disable_help_flag = true,
    disable_version_flag = true,
    args_override_self = true
)]
struct DequeueArgs {
    /// Tag filter
    #[arg(short = 't', allow_hyphen_values = true)]
    tag: Option<String>,
    /// Messages to drain; -1 means until stopped
    #[arg(short = 'n', default_value = "-1", value_parser = parse_count, allow_hyphen_values = true)]
    count: Count,
    /// Journal finalized messages when "true"
    #[arg(short = 'j', value_parser = parse_flag, allow_hyphen_values = true)]
    journal: Option<bool>,
}

/// True for `-?`, `-h` and `--help`.
pub fn is_help_flag(token: &str) -> bool {
    matches!(token, "-?" | "-h" | "--help")
}

/// Parse the arguments of `enqueue` (program name excluded).
///
/// The first token is always the message text, even if it starts with `-`.
pub fn parse_enqueue<I, S>(args: I) -> Result<Invocation<EnqueueOptions>>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut args = args.into_iter().map(Into::into);
    let Some(message) = args.next() else {
        return Ok(Invocation::Help);
    };
    if is_help_flag(&message) {
        return Ok(Invocation::Help);
    }

    let args: Vec<String> = args.collect();
    check_pairs(&args, &["-t", "-n"])?;

    let parsed = EnqueueArgs::try_parse_from(std::iter::once("enqueue".to_string()).chain(args))
        .map_err(argument_error)?;

    let mut options = EnqueueOptions::new(message).count(parsed.count);
    options.tag = parsed.tag;
    Ok(Invocation::Run(options))
}

/// Parse the arguments of `dequeue` (program name excluded).
///
/// The returned options carry the default poll interval; callers override it
/// from configuration.
pub fn parse_dequeue<I, S>(args: I) -> Result<Invocation<DrainOptions>>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let args: Vec<String> = args.into_iter().map(Into::into).collect();
    if args.first().is_some_and(|t| is_help_flag(t)) {
        return Ok(Invocation::Help);
    }

    check_pairs(&args, &["-t", "-n", "-j"])?;

    let parsed = DequeueArgs::try_parse_from(std::iter::once("dequeue".to_string()).chain(args))
        .map_err(argument_error)?;

    Ok(Invocation::Run(DrainOptions {
        tag: parsed.tag,
        count: parsed.count,
        keep_journal: parsed.journal.unwrap_or(false),
        ..DrainOptions::default()
    }))
}

/// Options are strict `flag value` pairs: every even position must hold one
/// of `flags` verbatim, so attached forms such as `-n3` or `-t=foo` are
/// unknown options.
fn check_pairs(args: &[String], flags: &[&str]) -> Result<()> {
    for pair in args.chunks(2) {
        let flag = pair[0].as_str();
        if !flags.contains(&flag) {
            return Err(Error::Argument(format!("unrecognized option '{flag}'")));
        }
        if pair.len() < 2 {
            return Err(Error::Argument(format!("option '{flag}' requires a value")));
        }
    }
    Ok(())
}

fn parse_count(value: &str) -> std::result::Result<Count, String> {
    let n: i64 = value
        .parse()
        .map_err(|_| format!("invalid number of messages: {value}"))?;
    match n {
        -1 => Ok(Count::Unbounded),
        n if n >= 0 => Ok(Count::Bounded(n as u64)),
        n => Err(format!("number of messages must be -1 or >= 0, got {n}")),
    }
}

fn parse_flag(value: &str) -> std::result::Result<bool, String> {
    Ok(value.eq_ignore_ascii_case("true"))
}

fn argument_error(e: clap::Error) -> Error {
    let rendered = e.to_string();
    let first = rendered.lines().next().unwrap_or_default();
    Error::Argument(first.trim_start_matches("error: ").to_string())
}
