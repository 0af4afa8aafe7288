//! Command-line parsing for both binaries.

use dbqueue::cli::{Invocation, parse_dequeue, parse_enqueue};
use dbqueue::engine::{Count, DrainOptions, EnqueueOptions};
use dbqueue::error::Error;

fn enqueue_run(args: &[&str]) -> EnqueueOptions {
    match parse_enqueue(args.iter().copied()).unwrap() {
        Invocation::Run(options) => options,
        Invocation::Help => panic!("expected options, got help for {args:?}"),
    }
}

fn dequeue_run(args: &[&str]) -> DrainOptions {
    match parse_dequeue(args.iter().copied()).unwrap() {
        Invocation::Run(options) => options,
        Invocation::Help => panic!("expected options, got help for {args:?}"),
    }
}

// ---------------------------------------------------------------------------
// enqueue
// ---------------------------------------------------------------------------

#[test]
fn enqueue_without_arguments_shows_help() {
    let none: [&str; 0] = [];
    assert_eq!(parse_enqueue(none).unwrap(), Invocation::Help);
}

#[test]
fn enqueue_help_tokens() {
    for token in ["-?", "-h", "--help"] {
        assert_eq!(parse_enqueue([token]).unwrap(), Invocation::Help);
    }
}

#[test]
fn enqueue_message_only_uses_defaults() {
    let options = enqueue_run(&["My Message"]);
    assert_eq!(options, EnqueueOptions::new("My Message"));
    assert_eq!(options.count, 1);
    assert!(options.tag.is_none());
}

#[test]
fn enqueue_with_tag_and_count() {
    let options = enqueue_run(&["My Message", "-t", "foo", "-n", "3"]);
    assert_eq!(options.text, "My Message");
    assert_eq!(options.tag.as_deref(), Some("foo"));
    assert_eq!(options.count, 3);
}

#[test]
fn enqueue_last_occurrence_wins() {
    let options = enqueue_run(&["m", "-n", "2", "-n", "4", "-t", "a", "-t", "b"]);
    assert_eq!(options.count, 4);
    assert_eq!(options.tag.as_deref(), Some("b"));
}

#[test]
fn enqueue_message_may_start_with_dash() {
    let options = enqueue_run(&["-not-a-flag", "-n", "2"]);
    assert_eq!(options.text, "-not-a-flag");
    assert_eq!(options.count, 2);
}

#[test]
fn enqueue_tag_value_may_start_with_dash() {
    let options = enqueue_run(&["m", "-t", "-dashed"]);
    assert_eq!(options.tag.as_deref(), Some("-dashed"));
}

#[test]
fn enqueue_rejects_non_numeric_count() {
    let err = parse_enqueue(["hello", "-n", "xyz"]).unwrap_err();
    assert!(matches!(err, Error::Argument(_)));
}

#[test]
fn enqueue_rejects_negative_count() {
    assert!(matches!(
        parse_enqueue(["hello", "-n", "-3"]),
        Err(Error::Argument(_))
    ));
}

#[test]
fn enqueue_rejects_unknown_option_and_missing_value() {
    assert!(matches!(
        parse_enqueue(["hello", "-x", "1"]),
        Err(Error::Argument(_))
    ));
    assert!(matches!(
        parse_enqueue(["hello", "-t"]),
        Err(Error::Argument(_))
    ));
    assert!(matches!(
        parse_enqueue(["hello", "stray"]),
        Err(Error::Argument(_))
    ));
}

#[test]
fn enqueue_rejects_attached_values() {
    let cases: [&[&str]; 3] = [
        &["msg", "-n3", "-tfoo"],
        &["msg", "-t=bar", "-n", "1"],
        &["msg", "-n", "2", "-tfoo"],
    ];
    for args in cases {
        assert!(
            matches!(parse_enqueue(args.iter().copied()), Err(Error::Argument(_))),
            "accepted {args:?}"
        );
    }
}

#[test]
fn enqueue_rejects_long_option_names() {
    assert!(matches!(
        parse_enqueue(["msg", "--tag", "foo"]),
        Err(Error::Argument(_))
    ));
}

#[test]
fn enqueue_journal_flag_is_not_accepted() {
    assert!(matches!(
        parse_enqueue(["hello", "-j", "true"]),
        Err(Error::Argument(_))
    ));
}

// ---------------------------------------------------------------------------
// dequeue
// ---------------------------------------------------------------------------

#[test]
fn dequeue_without_arguments_drains_everything() {
    let none: [&str; 0] = [];
    let options = dequeue_run(&none);
    assert_eq!(options.count, Count::Unbounded);
    assert!(options.tag.is_none());
    assert!(!options.keep_journal);
    assert_eq!(options, DrainOptions::default());
}

#[test]
fn dequeue_help_tokens() {
    for token in ["-?", "-h", "--help"] {
        assert_eq!(parse_dequeue([token]).unwrap(), Invocation::Help);
    }
}

#[test]
fn dequeue_with_all_options() {
    let options = dequeue_run(&["-t", "foo", "-n", "3", "-j", "true"]);
    assert_eq!(options.tag.as_deref(), Some("foo"));
    assert_eq!(options.count, Count::Bounded(3));
    assert!(options.keep_journal);
}

#[test]
fn dequeue_count_sentinel_and_zero() {
    assert_eq!(dequeue_run(&["-n", "-1"]).count, Count::Unbounded);
    assert_eq!(dequeue_run(&["-n", "0"]).count, Count::Bounded(0));
}

#[test]
fn dequeue_rejects_other_negative_counts() {
    assert!(matches!(
        parse_dequeue(["-n", "-5"]),
        Err(Error::Argument(_))
    ));
}

#[test]
fn dequeue_journal_values() {
    assert!(dequeue_run(&["-j", "True"]).keep_journal);
    assert!(dequeue_run(&["-j", "TRUE"]).keep_journal);
    assert!(!dequeue_run(&["-j", "false"]).keep_journal);
    assert!(!dequeue_run(&["-j", "yes"]).keep_journal);
}

#[test]
fn dequeue_rejects_bad_input_as_a_whole() {
    // A valid tag before a bad count still fails the invocation.
    assert!(matches!(
        parse_dequeue(["-t", "foo", "-n", "many"]),
        Err(Error::Argument(_))
    ));
    assert!(matches!(parse_dequeue(["-q", "1"]), Err(Error::Argument(_))));
    assert!(matches!(parse_dequeue(["-n"]), Err(Error::Argument(_))));
}

#[test]
fn dequeue_rejects_attached_values() {
    for args in [
        vec!["-n2", "-t=bar"],
        vec!["-tfoo"],
        vec!["-jtrue"],
        vec!["-t", "foo", "-n5"],
    ] {
        assert!(
            matches!(parse_dequeue(args.clone()), Err(Error::Argument(_))),
            "accepted {args:?}"
        );
    }
}
