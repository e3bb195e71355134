use std::collections::HashMap;
use std::time::Duration;

use clap::{error::ErrorKind, CommandFactory, Parser};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

use crate::cli::args::CliArgs;
use crate::cli::validation;
use crate::config::{self, ConfigFile};
use crate::join::DuplicateReport;
use crate::output::{self, OutputFormat};
use crate::render::{Page, RenderOutcome, Route};
use crate::runner::{Options, RenderResult, Runner};

fn print_banner() {
    const BANNER: &str = r#"
         __                      __           __
   _____/ /_____  ________  ____/ /___ ______/ /_
  / ___/ __/ __ \/ ___/ _ \/ __  / __ `/ ___/ __ \
 (__  ) /_/ /_/ / /  /  __/ /_/ / /_/ (__  ) / / /
/____/\__/\____/_/   \___/\__,_/\__,_/____/_/ /_/
"#;
    eprint!("{}", BANNER);
    eprintln!("       v{} - static dashboard renderer", env!("CARGO_PKG_VERSION"));
    eprintln!();
}

fn format_kv_line(label: &str, value: &str) {
    eprintln!(":: {:<10}: {}", label, value);
}

fn print_tagged(tag: &str, message: &str) {
    let tag = match tag {
        "ERR" => tag.bold().red(),
        "WRN" => tag.bold().yellow(),
        _ => tag.bold().blue(),
    };
    eprintln!("{}{}{} {}", "[".bold().white(), tag, "]".bold().white(), message);
}

pub fn print_error(message: &str) {
    print_tagged("ERR", message);
}

fn render_custom_help() -> String {
    let cmd = CliArgs::command();
    let mut out = String::new();

    if let Some(version) = cmd.get_version() {
        out.push_str(cmd.get_name());
        out.push(' ');
        out.push_str(version);
        out.push('\n');
    } else {
        out.push_str(cmd.get_name());
        out.push('\n');
    }

    if let Some(about) = cmd.get_about() {
        out.push_str(&about.to_string());
        out.push('\n');
    }

    if let Some(long_about) = cmd.get_long_about() {
        out.push('\n');
        out.push_str(&long_about.to_string());
        out.push('\n');
    }

    out.push('\n');
    out.push_str("Usage: ");
    out.push_str(cmd.get_name());
    out.push_str(" [OPTIONS]\n\n");

    let mut sections: Vec<(String, Vec<&clap::Arg>)> = Vec::new();
    let mut section_idx: HashMap<String, usize> = HashMap::new();

    for arg in cmd.get_arguments() {
        if arg.is_hide_set() {
            continue;
        }
        let heading = arg.get_help_heading().unwrap_or("Options").to_string();
        let idx = match section_idx.get(&heading).copied() {
            Some(i) => i,
            None => {
                sections.push((heading.clone(), Vec::new()));
                let i = sections.len() - 1;
                section_idx.insert(heading, i);
                i
            }
        };
        sections[idx].1.push(arg);
    }

    for (heading, args) in sections {
        out.push_str(&heading);
        out.push_str(":\n");

        for arg in args {
            let mut parts: Vec<String> = Vec::new();
            if let Some(short) = arg.get_short() {
                parts.push(format!("-{short}"));
            }
            if let Some(long) = arg.get_long() {
                parts.push(format!("--{long}"));
            }
            if let Some(aliases) = arg.get_visible_aliases() {
                for alias in aliases {
                    let rendered = format!("--{alias}");
                    if !parts.iter().any(|p| p == &rendered) {
                        parts.push(rendered);
                    }
                }
            }

            let mut flags = parts.join(", ");
            if arg.get_action().takes_values() {
                let value_name = arg
                    .get_value_names()
                    .and_then(|names| names.first())
                    .map(|name| name.as_str())
                    .unwrap_or("VALUE");
                flags.push_str(&format!(" <{value_name}>"));
            }

            out.push_str("  ");
            out.push_str(&flags);
            out.push('\n');

            if let Some(help) = arg.get_help() {
                let help = help.to_string();
                if !help.trim().is_empty() {
                    out.push_str("          ");
                    out.push_str(help.trim());
                    out.push('\n');
                }
            }
            out.push('\n');
        }
    }

    out
}

fn format_bool(value: bool) -> &'static str {
    if value {
        "on"
    } else {
        "off"
    }
}

#[derive(Clone, Debug)]
struct RunConfig {
    data_source: String,
    page: String,
    output: Option<String>,
    output_format: OutputFormat,
    timeout: u64,
    workers: usize,
    verbose: u8,
    quiet: bool,
    no_color: bool,
}

/// `--id` rewrites the page to the order detail route with that id.
fn apply_id_shortcut(page: String, id: Option<String>) -> Result<String, String> {
    let Some(id) = id else {
        return Ok(page);
    };
    let route = Route::parse(&page)?;
    if route.page != Page::OrderDetail && route.page != Page::Dashboard {
        return Err(format!("--id only applies to {}", Page::OrderDetail.file_name()));
    }
    Ok(format!("{}?id={}", Page::OrderDetail.file_name(), id.trim()))
}

fn build_run_config(args: CliArgs, cfg: ConfigFile) -> Result<RunConfig, String> {
    validation::validate(&args)?;

    let no_color = if args.color {
        false
    } else {
        args.no_color || cfg.no_color.unwrap_or(false)
    };
    let quiet = args.quiet || (args.verbose == 0 && cfg.quiet.unwrap_or(false));

    let data_source = args
        .data_source
        .or(cfg.data_source)
        .unwrap_or_else(|| "./".to_string());
    let data_source = if data_source.starts_with('~') {
        config::expand_tilde(&data_source).to_string_lossy().to_string()
    } else {
        data_source
    };

    let page = args
        .page
        .or(cfg.page)
        .unwrap_or_else(|| Page::Dashboard.file_name().to_string());
    let page = apply_id_shortcut(page, args.id)?;
    Route::parse(&page).map_err(|e| format!("invalid page '{page}': {e}"))?;

    let output = args.output.or(cfg.output).map(|p| {
        config::expand_tilde(&p).to_string_lossy().to_string()
    });
    let output_format_raw = args.output_format.or(cfg.output_format);
    let output_format = match output_format_raw.as_deref() {
        Some(raw) => OutputFormat::parse(raw)
            .ok_or_else(|| format!("invalid output format '{raw}', expected html, json, or text"))?,
        None => output
            .as_deref()
            .and_then(crate::output::infer_format_from_path)
            .unwrap_or(OutputFormat::Html),
    };

    let timeout = args.timeout.or(cfg.timeout).unwrap_or(10);
    validation::validate_timeout(timeout)?;
    let workers = args.workers.or(cfg.workers).unwrap_or(2).max(1);

    Ok(RunConfig {
        data_source,
        page,
        output,
        output_format,
        timeout,
        workers,
        verbose: args.verbose,
        quiet,
        no_color,
    })
}

fn report_duplicates(duplicates: &DuplicateReport) {
    for (dataset, keys) in duplicates.entries.iter() {
        let shown = keys
            .iter()
            .take(10)
            .map(|k| k.to_string())
            .collect::<Vec<_>>()
            .join(",");
        let more = if keys.len() > 10 {
            format!(" (+{} more)", keys.len() - 10)
        } else {
            String::new()
        };
        print_tagged(
            "WRN",
            &format!("duplicate keys in {dataset}.json, last record wins: {shown}{more}"),
        );
    }
}

fn report_outcome(run: &RunConfig, result: &RenderResult) {
    match &result.outcome {
        RenderOutcome::Skipped { page, reason } => {
            if !run.quiet {
                print_tagged("INF", &format!("{page} not rendered: {reason}"));
            }
        }
        RenderOutcome::Rendered {
            record_counts,
            duplicates,
            skipped,
            ..
        } => {
            if run.verbose > 0 {
                for (dataset, count) in record_counts.iter() {
                    format_kv_line("Loaded", &format!("{dataset} records={count}"));
                }
            }
            if run.verbose > 1 {
                for c in result.page.containers.iter() {
                    format_kv_line("Container", &format!("{} bytes={}", c.id, c.html.len()));
                }
                for id in skipped.iter() {
                    format_kv_line("Skipped", &format!("{id} is not a container of this page"));
                }
            }
            report_duplicates(duplicates);
        }
    }
}

async fn run_async(run: RunConfig) -> Result<(), String> {
    if run.no_color {
        colored::control::set_override(false);
    }
    if !run.quiet {
        print_banner();
    }

    let runner = Runner::new(Options {
        data_source: run.data_source.clone(),
        page: run.page.clone(),
        timeout_seconds: run.timeout,
    })
    .map_err(|e| e.to_string())?;

    if !run.quiet {
        format_kv_line("Source", &runner.loader().source().to_string());
        format_kv_line(
            "Page",
            &format!("{} title={}", runner.route(), runner.route().page.title()),
        );
        format_kv_line(
            "Output",
            &format!(
                "{} format={} color={}",
                run.output.as_deref().unwrap_or("stdout"),
                run.output_format.label(),
                format_bool(!run.no_color)
            ),
        );
    }

    let pb = ProgressBar::new(runner.route().page.datasets().len() as u64);
    if run.quiet {
        pb.set_draw_target(ProgressDrawTarget::hidden());
    } else {
        pb.set_draw_target(ProgressDrawTarget::stderr());
        pb.enable_steady_tick(Duration::from_millis(200));
    }
    pb.set_style(
        ProgressStyle::with_template(":: Loading  : [{pos}/{len}] :: Duration: [{elapsed_precise}]")
            .map_err(|e| format!("failed to build progress bar style: {e}"))?,
    );
    let runner = runner.with_progress(pb.clone());

    let result = runner.run().await;
    pb.finish_and_clear();
    let result = result.map_err(|e| e.to_string())?;

    report_outcome(&run, &result);

    let rendered = output::render(&result.page, run.output_format);
    match run.output.as_deref() {
        Some(path) => {
            let mut outfile = OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(path)
                .await
                .map_err(|e| format!("failed to open output file: {e}"))?;
            outfile
                .write_all(&rendered)
                .await
                .map_err(|e| format!("failed to write output file: {e}"))?;
        }
        None => {
            let mut stdout = tokio::io::stdout();
            stdout
                .write_all(&rendered)
                .await
                .map_err(|e| format!("failed to write to stdout: {e}"))?;
            stdout
                .flush()
                .await
                .map_err(|e| format!("failed to flush stdout: {e}"))?;
        }
    }

    if !run.quiet {
        eprintln!();
        eprintln!(
            ":: Completed :: {} containers in {}ms ::",
            result.page.containers.len(),
            result.elapsed.as_millis()
        );
    }

    Ok(())
}

fn init_config(path: Option<String>) -> Result<(), String> {
    let path = match path {
        Some(p) => config::expand_tilde(&p),
        None => config::default_config_path()
            .ok_or_else(|| "could not determine home directory for config".to_string())?,
    };
    if config::ensure_default_config_file(&path)? {
        format_kv_line("Config", &format!("written {}", path.display()));
    } else {
        format_kv_line("Config", &format!("exists {}", path.display()));
    }
    Ok(())
}

pub fn run_cli() -> Result<(), String> {
    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp => {
                print!("{}", render_custom_help());
                return Ok(());
            }
            ErrorKind::DisplayVersion => {
                let cmd = CliArgs::command();
                print!("{}", cmd.render_version());
                return Ok(());
            }
            _ => return Err(e.to_string()),
        },
    };

    if args.init_config {
        return init_config(args.config.clone());
    }

    let cfg = match args.config.as_ref() {
        Some(p) => config::load_config(&config::expand_tilde(p), false)?,
        None => match config::default_config_path() {
            Some(path) => config::load_config(&path, true)?,
            None => ConfigFile::default(),
        },
    };

    let run = build_run_config(args, cfg)?;

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .worker_threads(run.workers)
        .build()
        .map_err(|e| format!("failed to build runtime: {e}"))?;

    rt.block_on(run_async(run))?;
    Ok(())
}

#[cfg(test)]
mod cli_tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn defaults_render_dashboard_as_html() {
        let args = CliArgs::parse_from(["storedash"]);
        let run = build_run_config(args, ConfigFile::default()).unwrap();
        assert_eq!(run.page, "index.html");
        assert_eq!(run.data_source, "./");
        assert_eq!(run.output_format, OutputFormat::Html);
        assert_eq!(run.timeout, 10);
    }

    #[test]
    fn cli_overrides_config() {
        let args = CliArgs::parse_from(["storedash", "--page", "orders.html", "-o", "out.json"]);
        let cfg = ConfigFile {
            page: Some("customers.html".to_string()),
            data_source: Some("./site".to_string()),
            ..ConfigFile::default()
        };
        let run = build_run_config(args, cfg).unwrap();
        assert_eq!(run.page, "orders.html");
        assert_eq!(run.data_source, "./site");
        assert_eq!(run.output_format, OutputFormat::Json);
    }

    #[test]
    fn id_shortcut_targets_order_detail() {
        let args = CliArgs::parse_from(["storedash", "--id", "7"]);
        let run = build_run_config(args, ConfigFile::default()).unwrap();
        assert_eq!(run.page, "order-detail.html?id=7");

        let args = CliArgs::parse_from(["storedash", "--page", "products.html", "--id", "7"]);
        assert!(build_run_config(args, ConfigFile::default()).is_err());
    }

    #[test]
    fn rejects_bad_output_format_and_unknown_page() {
        let args = CliArgs::parse_from(["storedash", "--output-format", "xml"]);
        assert!(build_run_config(args, ConfigFile::default()).is_err());
        let args = CliArgs::parse_from(["storedash", "--page", "admin.html"]);
        assert!(build_run_config(args, ConfigFile::default()).is_err());
    }

    #[test]
    fn config_timeout_uses_cli_bounds() {
        let cfg = ConfigFile {
            timeout: Some(900),
            ..ConfigFile::default()
        };
        let err = build_run_config(CliArgs::parse_from(["storedash"]), cfg).unwrap_err();
        assert!(err.contains("timeout"), "{err}");

        let cfg = ConfigFile {
            timeout: Some(0),
            ..ConfigFile::default()
        };
        assert!(build_run_config(CliArgs::parse_from(["storedash"]), cfg).is_err());

        let cfg = ConfigFile {
            timeout: Some(600),
            ..ConfigFile::default()
        };
        let run = build_run_config(CliArgs::parse_from(["storedash"]), cfg).unwrap();
        assert_eq!(run.timeout, 600);
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        let args = CliArgs::parse_from(["storedash", "-q", "-v"]);
        assert!(build_run_config(args, ConfigFile::default()).is_err());
    }
}
