use crate::cli::args::CliArgs;

pub fn validate(args: &CliArgs) -> Result<(), String> {
    if args.quiet && args.verbose > 0 {
        return Err("--quiet and --verbose cannot be combined".to_string());
    }
    if let Some(timeout) = args.timeout {
        validate_timeout(timeout)?;
    }
    if let Some(workers) = args.workers {
        if workers == 0 {
            return Err("invalid workers, expected positive integer".to_string());
        }
    }
    if let Some(raw) = args.output_format.as_deref() {
        crate::output::OutputFormat::parse(raw)
            .ok_or_else(|| format!("invalid --output-format '{raw}', expected html, json, or text"))?;
    }
    if let Some(raw) = args.page.as_deref() {
        crate::render::Route::parse(raw).map_err(|e| format!("invalid --page '{raw}': {e}"))?;
    }
    if let Some(raw) = args.data_source.as_deref() {
        crate::loader::DataSource::parse(raw)
            .map_err(|e| format!("invalid --data-source '{raw}': {e}"))?;
    }
    Ok(())
}

pub fn validate_timeout(timeout: u64) -> Result<(), String> {
    if timeout == 0 || timeout > 600 {
        return Err(format!("invalid timeout {timeout}, expected 1-600 seconds"));
    }
    Ok(())
}
