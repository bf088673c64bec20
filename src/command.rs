//! Registers option records with `clap`.

use crate::hint::{OptionShape, Primitive};
use crate::options::OptionRecord;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use serde_json::Value;

/// Argument id of the generated `--help` switch.
const HELP_ID: &str = "__help";

/// Build a command carrying one argument per record, plus a negation
/// switch for every flag that has secondary names.
///
/// Only `--help` is reserved, and only while no record claims it; `-h` and
/// a parameter named `help` stay available to the records.
pub fn build(name: &str, records: &[OptionRecord]) -> Command {
    let mut command = Command::new(name.to_string()).disable_help_flag(true);
    if !records.iter().any(|r| r.opts.iter().any(|opt| opt == "--help")) {
        command = command.arg(
            Arg::new(HELP_ID)
                .long("help")
                .action(ArgAction::Help)
                .help("Show this message and exit."),
        );
    }
    for record in records {
        command = command.arg(arg(record));
        if let Some(negation) = negation(record) {
            command = command.arg(negation);
        }
    }
    command
}

/// Value of a flag after parsing, honoring its `--no-` switch.
pub fn flag_value(matches: &ArgMatches, record: &OptionRecord) -> bool {
    if !record.secondary_opts.is_empty() && matches.get_flag(&negation_id(record)) {
        return false;
    }
    matches.get_flag(&record.name)
}

fn arg(record: &OptionRecord) -> Arg {
    let mut arg = with_switches(Arg::new(record.name.clone()), &record.opts);
    if let Some(ref help) = record.help {
        arg = arg.help(help.clone());
    }

    match record.shape {
        Some(OptionShape::Flag) => {
            arg = arg.action(ArgAction::SetTrue);
            if record.default == Some(Value::Bool(true)) {
                arg = arg.default_value("true");
            }
            if !record.secondary_opts.is_empty() {
                arg = arg.overrides_with(negation_id(record));
            }
            return arg;
        }
        Some(OptionShape::Scalar(p)) => {
            arg = with_parser(arg.action(ArgAction::Set), p);
        }
        Some(OptionShape::Multiple(p)) => {
            arg = with_parser(arg.action(ArgAction::Append), p);
        }
        Some(OptionShape::Tuple(ref items)) => {
            arg = arg
                .action(ArgAction::Set)
                .num_args(items.len())
                .value_names(items.iter().map(|p| p.name()));
            if let Some(&first) = items.first() {
                if items.iter().all(|&p| p == first) {
                    arg = with_parser(arg, first);
                }
            }
        }
        None => {
            arg = arg.action(ArgAction::Set);
        }
    }

    match record.default {
        Some(Value::Array(ref items)) => arg.default_values(items.iter().map(render_value)),
        Some(Value::Null) | None => arg.required(record.required),
        Some(ref value) => arg.default_value(render_value(value)),
    }
}

fn negation(record: &OptionRecord) -> Option<Arg> {
    if record.secondary_opts.is_empty() {
        return None;
    }
    let help = format!("Disable {}", record.opts.join("/"));
    Some(
        with_switches(Arg::new(negation_id(record)), &record.secondary_opts)
            .action(ArgAction::SetTrue)
            .help(help)
            .overrides_with(record.name.clone()),
    )
}

fn negation_id(record: &OptionRecord) -> String {
    format!("no-{}", record.name)
}

enum Switch<'a> {
    Long(&'a str),
    Short(char),
}

fn switch(opt: &str) -> Option<Switch<'_>> {
    if let Some(long) = opt.strip_prefix("--") {
        return Some(Switch::Long(long));
    }
    let rest = opt.strip_prefix('-')?;
    let mut chars = rest.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(Switch::Short(c)),
        // `-name`: clap has no multi-character short switches
        (Some(_), Some(_)) => Some(Switch::Long(rest)),
        _ => None,
    }
}

fn with_switches(mut arg: Arg, opts: &[String]) -> Arg {
    let mut has_long = false;
    let mut has_short = false;
    for opt in opts {
        match switch(opt) {
            Some(Switch::Long(long)) if has_long => arg = arg.visible_alias(long.to_string()),
            Some(Switch::Long(long)) => {
                arg = arg.long(long.to_string());
                has_long = true;
            }
            Some(Switch::Short(c)) if has_short => arg = arg.visible_short_alias(c),
            Some(Switch::Short(c)) => {
                arg = arg.short(c);
                has_short = true;
            }
            None => {}
        }
    }
    arg
}

fn with_parser(arg: Arg, primitive: Primitive) -> Arg {
    match primitive {
        Primitive::Str => arg.value_parser(value_parser!(String)),
        Primitive::Int => arg.value_parser(value_parser!(i64)),
        Primitive::Float => arg.value_parser(value_parser!(f64)),
        Primitive::Bool => arg.value_parser(value_parser!(bool)),
    }
}

fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(name: &str, shape: Option<OptionShape>) -> OptionRecord {
        OptionRecord {
            name: name.to_string(),
            opts: vec![format!("--{name}")],
            secondary_opts: Vec::new(),
            help: None,
            required: true,
            default: None,
            shape,
        }
    }

    fn parse(records: &[OptionRecord], argv: &[&str]) -> Result<ArgMatches, clap::Error> {
        build("test", records).try_get_matches_from(std::iter::once("test").chain(argv.iter().copied()))
    }

    #[test]
    fn scalar_values_are_typed() {
        let records = [record("count", Some(OptionShape::Scalar(Primitive::Int)))];
        let matches = parse(&records, &["--count", "3"]).unwrap();
        assert_eq!(matches.get_one::<i64>("count"), Some(&3));
        assert!(parse(&records, &["--count", "three"]).is_err());
    }

    #[test]
    fn required_options_must_be_given() {
        let records = [record("size", Some(OptionShape::Scalar(Primitive::Int)))];
        assert!(parse(&records, &[]).is_err());
    }

    #[test]
    fn defaults_apply_when_absent() {
        let mut symbol = record("symbol", Some(OptionShape::Scalar(Primitive::Str)));
        symbol.required = false;
        symbol.default = Some(json!("x"));
        let matches = parse(&[symbol], &[]).unwrap();
        assert_eq!(matches.get_one::<String>("symbol").map(String::as_str), Some("x"));
    }

    #[test]
    fn multiple_options_collect_every_occurrence() {
        let records = [record("x", Some(OptionShape::Multiple(Primitive::Int)))];
        let matches = parse(&records, &["--x", "1", "--x", "2"]).unwrap();
        let values: Vec<i64> = matches.get_many::<i64>("x").unwrap().copied().collect();
        assert_eq!(values, vec![1, 2]);
    }

    #[test]
    fn tuple_options_take_a_fixed_number_of_values() {
        let records = [record(
            "x",
            Some(OptionShape::Tuple(vec![Primitive::Int, Primitive::Str])),
        )];
        let matches = parse(&records, &["--x", "1", "a"]).unwrap();
        let values: Vec<&String> = matches.get_many::<String>("x").unwrap().collect();
        assert_eq!(values, vec!["1", "a"]);
        assert!(parse(&records, &["--x", "1"]).is_err());
    }

    #[test]
    fn flags_with_negation() {
        let mut e = record("e", Some(OptionShape::Flag));
        e.required = false;
        e.default = Some(json!(true));
        e.secondary_opts = vec!["--no-e".into()];
        let records = [e];

        let matches = parse(&records, &[]).unwrap();
        assert!(flag_value(&matches, &records[0]));
        let matches = parse(&records, &["--no-e"]).unwrap();
        assert!(!flag_value(&matches, &records[0]));
        let matches = parse(&records, &["--no-e", "--e"]).unwrap();
        assert!(flag_value(&matches, &records[0]));
    }

    #[test]
    fn short_and_single_dash_long_switches() {
        let mut d = record("d", Some(OptionShape::Scalar(Primitive::Str)));
        d.opts = vec!["-d".into(), "-test".into(), "--d".into()];
        let records = [d];
        for argv in [["-d", "v"], ["--test", "v"], ["--d", "v"]] {
            let matches = parse(&records, &argv).unwrap();
            assert_eq!(matches.get_one::<String>("d").map(String::as_str), Some("v"));
        }
    }

    #[test]
    fn short_h_belongs_to_the_records() {
        let mut host = record("host", Some(OptionShape::Scalar(Primitive::Str)));
        host.opts = vec!["-h".into(), "--host".into()];
        let records = [host];
        let matches = parse(&records, &["-h", "localhost"]).unwrap();
        assert_eq!(
            matches.get_one::<String>("host").map(String::as_str),
            Some("localhost")
        );

        let help = build("test", &records).render_help().to_string();
        assert!(help.contains("-h, --host <host>"), "{help}");
        assert!(help.contains("--help"), "{help}");
        let err = parse(&records, &["--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn parameter_named_help_takes_the_switch() {
        let records = [record("help", Some(OptionShape::Scalar(Primitive::Str)))];
        let help = build("test", &records).render_help().to_string();
        assert!(help.contains("--help <help>"), "{help}");

        let matches = parse(&records, &["--help", "topic"]).unwrap();
        assert_eq!(
            matches.get_one::<String>("help").map(String::as_str),
            Some("topic")
        );
    }

    #[test]
    fn help_lists_every_switch() {
        let mut b = record("b", Some(OptionShape::Scalar(Primitive::Int)));
        b.help = Some("This one should be added.".into());
        let mut e = record("e", Some(OptionShape::Flag));
        e.secondary_opts = vec!["--no-e".into()];
        let help = build("test", &[b, e]).render_help().to_string();
        assert!(help.contains("--b <b>"), "{help}");
        assert!(help.contains("This one should be added."), "{help}");
        assert!(help.contains("--no-e"), "{help}");
    }
}
