//! Argument parsing tests for the configurator CLI

use clap::Parser;
use configurator_cli::{Cli, Command};
use std::path::PathBuf;

#[test]
fn test_show_arguments() {
    let cli = Cli::try_parse_from([
        "configurator",
        "show",
        "--snapshot",
        "desk.json",
        "--select",
        "color=blue",
        "--select",
        "material=steel",
        "--json",
    ])
    .expect("parse arguments");

    let Command::Show { snapshot, output } = cli.command else {
        panic!("expected show command");
    };
    assert_eq!(snapshot, PathBuf::from("desk.json"));
    assert_eq!(output.selections, vec!["color=blue", "material=steel"]);
    assert!(output.json);
    assert!(!output.quote);
}

#[test]
fn test_fetch_arguments() {
    let cli = Cli::try_parse_from([
        "configurator",
        "fetch",
        "--public-id",
        "desk",
        "--api-url",
        "http://localhost:3000",
        "--quote",
        "--config",
        "configurator.toml",
    ])
    .expect("parse arguments");

    assert_eq!(cli.config, Some(PathBuf::from("configurator.toml")));
    let Command::Fetch {
        public_id,
        api_url,
        output,
    } = cli.command
    else {
        panic!("expected fetch command");
    };
    assert_eq!(public_id, "desk");
    assert_eq!(api_url.as_deref(), Some("http://localhost:3000"));
    assert!(output.quote);
    assert!(output.selections.is_empty());
}

#[test]
fn test_show_requires_snapshot() {
    assert!(Cli::try_parse_from(["configurator", "show"]).is_err());
}
