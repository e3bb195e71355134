use clap::{ArgAction, Parser};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "storedash",
    version,
    about = "store dashboard renderer for static JSON datasets",
    long_about = "Storedash renders dashboard pages (orders, customers, products, service requests) from static data/<name>.json datasets.\n\nExamples:\n  storedash -d ./site\n  storedash -d ./site -p orders.html -o orders.html\n  storedash -d https://example.com/dash/ -p 'order-detail.html?id=3' --of json\n\nTip: Use --config to persist settings and keep CLI invocations short."
)]
pub struct CliArgs {
    #[arg(
        short = 'v',
        long = "vb",
        visible_alias = "verbose",
        action = ArgAction::Count,
        help_heading = "Output",
        help = "Increase verbosity (-v, -vv)."
    )]
    pub verbose: u8,

    #[arg(
        short = 'q',
        long = "qt",
        visible_alias = "quiet",
        help_heading = "Output",
        help = "Only print warnings and errors."
    )]
    pub quiet: bool,

    #[arg(
        short = 'c',
        long = "clr",
        visible_alias = "color",
        help_heading = "Output",
        help = "Enable colored output (overrides --no-color)."
    )]
    pub color: bool,

    #[arg(
        long = "nc",
        visible_alias = "no-color",
        help_heading = "Output",
        help = "Disable colored output."
    )]
    pub no_color: bool,

    #[arg(
        short = 'o',
        long = "out",
        visible_alias = "output",
        value_name = "FILE",
        help_heading = "Output",
        help = "Write the rendered page to FILE instead of stdout."
    )]
    pub output: Option<String>,

    #[arg(
        long = "of",
        visible_alias = "output-format",
        value_name = "FORMAT",
        help_heading = "Output",
        help = "Output format: html, json, or text (inferred from --output when omitted)."
    )]
    pub output_format: Option<String>,

    #[arg(
        short = 'd',
        long = "ds",
        visible_aliases = ["data-source", "data-dir", "base-url"],
        value_name = "DIR|URL",
        help_heading = "Input",
        help = "Directory or http(s) base URL that contains data/<name>.json."
    )]
    pub data_source: Option<String>,

    #[arg(
        short = 'p',
        long = "pg",
        visible_alias = "page",
        value_name = "PAGE",
        help_heading = "Input",
        help = "Page to render, e.g. index.html, orders.html, order-detail.html?id=3."
    )]
    pub page: Option<String>,

    #[arg(
        long = "id",
        value_name = "ID",
        help_heading = "Input",
        help = "Shortcut for the id query parameter of the order detail page."
    )]
    pub id: Option<String>,

    #[arg(
        short = 'C',
        long = "cfg",
        visible_alias = "config",
        value_name = "FILE",
        help_heading = "Input",
        help = "Path to config file (defaults to ~/.storedash/config.yml)."
    )]
    pub config: Option<String>,

    #[arg(
        long = "init-config",
        help_heading = "Input",
        help = "Write a commented default config file and exit."
    )]
    pub init_config: bool,

    #[arg(
        long = "to",
        visible_alias = "timeout",
        value_name = "SECONDS",
        help_heading = "Performance",
        help = "HTTP timeout per dataset request."
    )]
    pub timeout: Option<u64>,

    #[arg(
        short = 'w',
        long = "wk",
        visible_alias = "workers",
        value_name = "N",
        help_heading = "Performance",
        help = "Runtime worker threads."
    )]
    pub workers: Option<usize>,
}
