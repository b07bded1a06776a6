use crate::CLAP_STYLING;
use clap::{arg, command};
use holomap_client::client::DEFAULT_API_URL;
use url::Url;

pub(crate) fn command_argument_builder() -> clap::Command {
    clap::Command::new("holomap")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("holomap")
        .styles(CLAP_STYLING)
        .arg(arg!(-q --"quiet" "Suppress banner and non-essential output").required(false))
        .arg(
            arg!(--"api-url" <URL>)
                .required(false)
                .global(true)
                .help("Base URL of the catalog service")
                .value_parser(clap::value_parser!(Url))
                .default_value(DEFAULT_API_URL),
        )
        .arg(
            arg!(--"timeout" <SECONDS>)
                .required(false)
                .global(true)
                .help("Request timeout in seconds")
                .value_parser(clap::value_parser!(u64).range(1..))
                .default_value("10"),
        )
        .subcommand_required(false)
        .subcommand(
            command!("ui")
                .about("Opens the interactive catalog explorer")
                .arg(
                    arg!(--"page-size" <N>)
                        .required(false)
                        .help("Entries fetched per catalog page")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("10"),
                ),
        )
        .subcommand(
            command!("list")
                .about("Prints the people catalog, one page at a time until exhausted")
                .arg(
                    arg!(-p --"pages" <N>)
                        .required(false)
                        .help("Stop after this many pages (default: until the catalog ends)")
                        .value_parser(clap::value_parser!(u32)),
                )
                .arg(
                    arg!(--"page-size" <N>)
                        .required(false)
                        .help("Entries fetched per catalog page")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("10"),
                ),
        )
        .subcommand(
            command!("graph")
                .about("Builds the relationship graph of one person")
                .arg(
                    arg!(<ID>)
                        .required(true)
                        .help("Catalog id of the person")
                        .value_parser(clap::value_parser!(u32)),
                )
                .arg(
                    arg!(-f --"format" <FORMAT>)
                        .required(false)
                        .help("Report format: text, json, markdown, dot")
                        .value_parser(["text", "json", "markdown", "md", "dot", "graphviz"])
                        .default_value("text"),
                )
                .arg(
                    arg!(-o --"output" <PATH>)
                        .required(false)
                        .help("Save report to file (default: display to screen)"),
                ),
        )
}
