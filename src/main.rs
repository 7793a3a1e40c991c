//! qcgrid - measurement grid engine command line

use std::io::{BufRead, Write};
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;

use qcgrid::cli::{CliArgs, Command};
use qcgrid::config::GridConfig;
use qcgrid::messages::{GridMsg, Msg};
use qcgrid::model::CellRef;
use qcgrid::payload::measurement_payload;
use qcgrid::render::{render_grid, tolerance_report};
use qcgrid::runtime::{
    AutoConfirm, Clipboard, FixedAqlService, GridRuntime, NoHaptics, Prompt, SystemClipboard,
};
use qcgrid::script::{load_script, ChartFile, ScriptRunner};

/// Asks on the terminal; anything but y/yes declines
struct StdinPrompt;

impl Prompt for StdinPrompt {
    fn confirm(&mut self, message: &str) -> bool {
        eprint!("{} [y/N] ", message);
        let _ = std::io::stderr().flush();
        let mut answer = String::new();
        match std::io::stdin().lock().read_line(&mut answer) {
            Ok(_) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"),
            Err(e) => {
                tracing::warn!("Failed to read confirmation: {}", e);
                false
            }
        }
    }
}

fn main() -> Result<()> {
    qcgrid::tracing::init();

    let args = CliArgs::parse();
    let config = args.load_config();

    match args.command {
        Command::Replay {
            chart,
            script,
            payload,
        } => replay(&chart, &script, payload, config),
        Command::Check { chart } => check(&chart, config),
        Command::Paste {
            chart,
            at,
            file,
            yes,
        } => paste(&chart, at, file.as_deref(), yes, config),
        Command::Payload { chart } => {
            let model = ChartFile::load(&chart)?.into_model(config)?;
            let json = measurement_payload(&model.chart, &model.tolerance);
            println!("{}", serde_json::to_string_pretty(&json)?);
            Ok(())
        }
    }
}

fn runtime_for(chart: &Path, prompt: Box<dyn Prompt>, config: GridConfig) -> Result<GridRuntime> {
    let file = ChartFile::load(chart)?;
    let service = FixedAqlService {
        limits: file.aql_limits,
    };
    let model = file.into_model(config)?;
    Ok(GridRuntime::new(
        model,
        prompt,
        Box::new(NoHaptics),
        Arc::new(service),
    ))
}

fn replay(chart: &Path, script: &Path, payload: bool, config: GridConfig) -> Result<()> {
    let events = load_script(script)?;
    let mut runtime = runtime_for(chart, Box::new(AutoConfirm(true)), config)?;

    ScriptRunner::default().run(&mut runtime, &events)?;

    print!("{}", render_grid(&runtime.model));
    print_notices(&runtime);

    if let Some(limits) = runtime.model.aql.limits {
        let tally = runtime.model.aql.tally;
        println!(
            "AQL: sample {} | critical {}/{} major {}/{} minor {}/{}",
            limits.sample_size,
            tally.critical,
            limits.max_allowed_critical,
            tally.major,
            limits.max_allowed_major,
            tally.minor,
            limits.max_allowed_minor
        );
    }
    if let Some(result) = runtime.model.aql.result() {
        println!("Result: {:?}", result);
    }

    if payload {
        let json = measurement_payload(&runtime.model.chart, &runtime.model.tolerance);
        println!("{}", serde_json::to_string_pretty(&json)?);
    }
    Ok(())
}

fn check(chart: &Path, config: GridConfig) -> Result<()> {
    let model = ChartFile::load(chart)?.into_model(config)?;
    let report = tolerance_report(&model);
    if report.is_empty() {
        println!("All {} row(s) within tolerance", model.chart.row_count());
    } else {
        for line in &report {
            println!("{}", line);
        }
    }
    Ok(())
}

fn paste(
    chart: &Path,
    at: CellRef,
    file: Option<&Path>,
    yes: bool,
    config: GridConfig,
) -> Result<()> {
    let text = match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => match SystemClipboard.read_text() {
            Some(text) => text,
            None => bail!("Clipboard is empty or unavailable; use --file"),
        },
    };

    let prompt: Box<dyn Prompt> = if yes {
        Box::new(AutoConfirm(true))
    } else {
        Box::new(StdinPrompt)
    };
    let mut runtime = runtime_for(chart, prompt, config)?;

    runtime.dispatch(Msg::Grid(GridMsg::Focus(at)));
    let outcome = runtime.dispatch(Msg::Grid(GridMsg::Paste { cell: at, text }));
    if !outcome.prevent_default {
        println!("Not a multi-cell block; nothing imported");
        return Ok(());
    }

    print!("{}", render_grid(&runtime.model));
    print_notices(&runtime);
    Ok(())
}

fn print_notices(runtime: &GridRuntime) {
    for notice in runtime.notices() {
        println!("{:?}: {}", notice.level, notice.message);
    }
}
