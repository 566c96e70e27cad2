use std::cell::RefCell;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::{Context, Result};
use chrono::Local;
use notify::event::{AccessKind, AccessMode, CreateKind, ModifyKind, RenameMode};
use notify::{EventKind, RecursiveMode, Watcher};
use riskdash_core::analytics::{AnalyticsProvider, MockAnalytics};
use riskdash_core::readers::FileFormat;
use riskdash_core::stats::statistics_from_rows;
use riskdash_core::{
    ActivityStatistics, FileSource, ParserConfig, RowRecord, StatsColumns, StatsSummary,
    UploadSurface,
};
use riskdash_reports::{HtmlFormatter, JsonFormatter, Reporter, StdOutFormatter};
use tracing::{info, warn};

use crate::{
    errors::CliError, parser::parse_config, writer::write_report, Args, Command, MockDataset,
    OutputFormat,
};

enum ReportSink {
    Stdout(StdOutFormatter),
    Json(JsonFormatter),
    Html(HtmlFormatter),
}

impl ReportSink {
    fn new(format: OutputFormat, preview_limit: usize) -> Self {
        let version = env!("CARGO_PKG_VERSION").to_string();
        match format {
            OutputFormat::Stdout => ReportSink::Stdout(StdOutFormatter::new(version, preview_limit)),
            OutputFormat::Json => ReportSink::Json(JsonFormatter::new(version, preview_limit)),
            OutputFormat::Html => ReportSink::Html(HtmlFormatter::new(preview_limit)),
        }
    }

    fn reporter(&mut self) -> &mut dyn Reporter {
        match self {
            ReportSink::Stdout(f) => f,
            ReportSink::Json(f) => f,
            ReportSink::Html(f) => f,
        }
    }

    /// Emit the collected JSON or HTML document, then start a fresh one
    fn finish(&mut self, output_file: Option<&str>) -> Result<()> {
        match self {
            ReportSink::Stdout(_) => {
                if output_file.is_some() {
                    warn!("--output-file is ignored for stdout output");
                }
            }
            ReportSink::Json(f) => {
                emit(&f.to_json()?, "json", output_file)?;
                f.clear();
            }
            ReportSink::Html(f) => {
                emit(&f.to_html(), "html", output_file)?;
                f.clear();
            }
        }
        Ok(())
    }
}

fn emit(body: &str, extension: &str, output_file: Option<&str>) -> Result<()> {
    match output_file {
        Some(base) => {
            let timestamp = Local::now().format("%Y%m%d-%H%M%S").to_string();
            let path = write_report(base, &timestamp, extension, body)?;
            info!(path = %path.display(), "report written");
        }
        None => println!("{}", body),
    }
    Ok(())
}

pub fn run(args: Args) -> Result<bool> {
    let config = parse_config(args.config.as_deref())?;
    let parser_config = config.parser_config()?;
    let preview_limit = config.preview_limit()?;
    let output_file = args.output_file.as_deref();

    if let Command::Mock { dataset, days } = args.command {
        let days = days.unwrap_or(config.mock.timeline_days);
        return run_mock(&MockAnalytics::new(), dataset, days, args.output, output_file);
    }

    let mut sink = ReportSink::new(args.output, preview_limit);
    sink.reporter().on_start();

    let passed = match args.command {
        Command::Preview { file } => run_preview(&file, parser_config, &mut sink)?,
        Command::Stats { file, from_json } => {
            run_stats(&file, from_json, parser_config, &config.columns, &mut sink)?
        }
        Command::Watch { dir } => {
            run_watch(&dir, parser_config, &config.columns, &mut sink, output_file)?
        }
        Command::Mock { .. } => true,
    };

    sink.finish(output_file)?;
    Ok(passed)
}

/// Upload one file through an [`UploadSurface`] and wait for the parse.
///
/// Parse failures go to the reporter and yield `None`.
fn load_rows(
    file: &str,
    parser_config: ParserConfig,
    reporter: &mut dyn Reporter,
) -> Option<Vec<RowRecord>> {
    let errors = Rc::new(RefCell::new(Vec::<String>::new()));
    let sink = Rc::clone(&errors);
    let mut surface = UploadSurface::new(parser_config)
        .with_error_callback(move |message| sink.borrow_mut().push(message.to_string()));

    reporter.on_loading(file);
    surface.select_files(vec![FileSource::from_path(file)]);
    surface.wait_idle();

    let failures = errors.take();
    if !failures.is_empty() {
        for message in &failures {
            reporter.on_error(message);
        }
        return None;
    }

    let rows = surface.into_rows();
    info!(file = %file, rows = rows.len(), "upload loaded");
    reporter.on_file_load(file, rows.len());
    Some(rows)
}

fn run_preview(file: &str, parser_config: ParserConfig, sink: &mut ReportSink) -> Result<bool> {
    let reporter = sink.reporter();
    match load_rows(file, parser_config, reporter) {
        Some(rows) => {
            reporter.on_preview(file, &rows);
            Ok(true)
        }
        None => Ok(false),
    }
}

fn run_stats(
    file: &str,
    from_json: bool,
    parser_config: ParserConfig,
    columns: &StatsColumns,
    sink: &mut ReportSink,
) -> Result<bool> {
    let reporter = sink.reporter();
    let statistics = if from_json {
        reporter.on_loading(file);
        let body = std::fs::read_to_string(file)
            .with_context(|| format!("Failed to read statistics file: {}", file))?;
        ActivityStatistics::from_json(&body)
            .with_context(|| format!("Failed to parse statistics file: {}", file))?
    } else {
        match load_rows(file, parser_config, reporter) {
            Some(rows) => statistics_from_rows(&rows, columns),
            None => return Ok(false),
        }
    };

    reporter.on_summary(file, &StatsSummary::from_statistics(&statistics));
    Ok(true)
}

fn run_mock(
    provider: &dyn AnalyticsProvider,
    dataset: MockDataset,
    days: usize,
    output: OutputFormat,
    output_file: Option<&str>,
) -> Result<bool> {
    match output {
        OutputFormat::Stdout => {
            let formatter =
                StdOutFormatter::new(env!("CARGO_PKG_VERSION").to_string(), 0);
            let table = match dataset {
                MockDataset::Risk => formatter.render_distribution(&provider.risk_distribution()),
                MockDataset::Breach => {
                    formatter.render_distribution(&provider.breach_distribution())
                }
                MockDataset::Weekly => formatter.render_weekly(&provider.user_weekly_activity()),
                MockDataset::Timeline => formatter.render_timeline(&provider.timeline(days)),
            };
            print!("{}", table);
        }
        OutputFormat::Json => {
            let body = match dataset {
                MockDataset::Risk => serde_json::to_string_pretty(&provider.risk_distribution()),
                MockDataset::Breach => {
                    serde_json::to_string_pretty(&provider.breach_distribution())
                }
                MockDataset::Weekly => {
                    serde_json::to_string_pretty(&provider.user_weekly_activity())
                }
                MockDataset::Timeline => serde_json::to_string_pretty(&provider.timeline(days)),
            }?;
            emit(&body, "json", output_file)?;
        }
        OutputFormat::Html => {
            return Err(CliError::UnsupportedOutput {
                command: "mock".to_string(),
                format: "html".to_string(),
            }
            .into());
        }
    }
    Ok(true)
}

/// Drop one file on the surface and report it as a standalone document.
fn report_drop(
    surface: &mut UploadSurface,
    errors: &RefCell<Vec<String>>,
    path: &Path,
    columns: &StatsColumns,
    sink: &mut ReportSink,
    output_file: Option<&str>,
) -> Result<()> {
    let name = path.display().to_string();
    surface.drop_files(vec![FileSource::from_path(path)]);
    surface.wait_idle();

    let reporter = sink.reporter();
    let failures = errors.take();
    if failures.is_empty() {
        let stats = statistics_from_rows(surface.rows(), columns);
        reporter.on_file_load(&name, surface.rows().len());
        reporter.on_preview(&name, surface.rows());
        reporter.on_summary(&name, &StatsSummary::from_statistics(&stats));
    } else {
        for message in &failures {
            reporter.on_error(message);
        }
    }

    if !matches!(sink, ReportSink::Stdout(_)) {
        sink.finish(output_file)?;
    }
    Ok(())
}

fn is_csv(path: &Path) -> bool {
    FileFormat::from_path(&path.to_string_lossy()).is_some()
}

/// Drop-folder mode. A new CSV file counts as a drag entering the surface,
/// the end of its write as the drop.
fn run_watch(
    dir: &str,
    parser_config: ParserConfig,
    columns: &StatsColumns,
    sink: &mut ReportSink,
    output_file: Option<&str>,
) -> Result<bool> {
    let dir_path = Path::new(dir);
    if !dir_path.is_dir() {
        return Err(CliError::NotADirectory {
            path: dir.to_string(),
        }
        .into());
    }

    let errors = Rc::new(RefCell::new(Vec::<String>::new()));
    let error_sink = Rc::clone(&errors);
    let mut surface = UploadSurface::new(parser_config)
        .with_error_callback(move |message| error_sink.borrow_mut().push(message.to_string()));

    let (tx, rx) = std::sync::mpsc::channel();
    let mut watcher = notify::recommended_watcher(tx)?;
    watcher
        .watch(dir_path, RecursiveMode::NonRecursive)
        .with_context(|| format!("Failed to watch directory: {}", dir))?;
    sink.reporter().on_waiting(dir);
    info!(dir = %dir, "watching drop folder");

    let mut entering: HashSet<PathBuf> = HashSet::new();

    for res in rx {
        let event = match res {
            Ok(event) => event,
            Err(e) => {
                warn!(error = %e, "watch error");
                continue;
            }
        };

        for path in event.paths.iter().filter(|p| is_csv(p)) {
            match event.kind {
                EventKind::Create(CreateKind::File) | EventKind::Create(CreateKind::Any) => {
                    if entering.insert(path.clone()) {
                        surface.drag_enter();
                    }
                }
                EventKind::Remove(_) => {
                    if entering.remove(path) && entering.is_empty() {
                        surface.drag_leave();
                    }
                }
                EventKind::Access(AccessKind::Close(AccessMode::Write))
                | EventKind::Modify(ModifyKind::Name(RenameMode::To)) => {
                    entering.remove(path);
                    report_drop(&mut surface, &errors, path, columns, sink, output_file)?;
                    sink.reporter().on_waiting(dir);
                }
                _ => {}
            }
        }
    }

    Ok(true)
}
