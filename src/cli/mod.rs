//! CLI module for Folio

mod args;

pub use args::{Args, Command};

use crate::analysis::Analyzer;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::logging;
use crate::output::{QuartoConfig, QuartoWriter};
use serde::Serialize;
use std::path::Path;
use std::process::ExitCode;

/// Config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "folio.toml";

/// Run the CLI application
pub fn run() -> ExitCode {
    let args = Args::parse_args();
    let verbose = matches!(args.command, Command::Build { verbose: true, .. });
    logging::init(verbose);

    match execute(args) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn execute(args: Args) -> Result<()> {
    match args.command {
        Command::Build {
            path,
            output,
            config,
            include,
            exclude,
            window,
            no_arrow_params,
            title,
            verbose,
        } => {
            let mut cfg = load_config(config.as_deref())?;
            cfg.merge_cli(output, exclude, window, no_arrow_params);
            if !include.is_empty() {
                cfg.analysis.include = include;
            }
            cfg.validate()?;

            if !path.exists() {
                return Err(Error::PathNotFound(path));
            }

            tracing::debug!(
                path = %path.display(),
                output = %cfg.output.directory.display(),
                window = cfg.linking.window_size,
                arrow_params_as_name = cfg.linking.arrow_params_as_name,
                include = ?cfg.analysis.include,
                exclude = ?cfg.analysis.exclude,
                "build settings"
            );

            let analyzer = Analyzer::new(cfg.clone())?.with_verbose(verbose);
            let analysis = analyzer.analyze(&path)?;

            println!(
                "Linked {} comments in {} files ({} documented constructs)",
                analysis.stats.comments, analysis.stats.files, analysis.stats.documented
            );

            if !analysis.parse_errors.is_empty() {
                println!("\nUnreadable files ({}):", analysis.parse_errors.len());
                for (path, err) in analysis.parse_errors.iter().take(5) {
                    println!("  {}: {}", path.display(), err);
                }
                if analysis.parse_errors.len() > 5 {
                    println!("  ... and {} more", analysis.parse_errors.len() - 5);
                }
            }

            let title = title.unwrap_or_else(|| book_title(&cfg, &analysis.root));
            let writer = QuartoWriter::new(QuartoConfig::from_config(&cfg, title))?;
            let report = writer.generate(&analysis)?;

            println!("{}", report.summary());
            println!("Book written to: {}", writer.output_dir().display());
            Ok(())
        }

        Command::Inspect {
            file,
            window,
            no_arrow_params,
            comments,
        } => {
            let mut cfg = load_config(None)?;
            cfg.merge_cli(None, vec![], window, no_arrow_params);

            if !file.exists() {
                return Err(Error::PathNotFound(file));
            }

            let analyzer = Analyzer::new(cfg)?;
            let linked = analyzer.link_file(&file)?;

            let records: Vec<InspectRecord> = linked
                .iter()
                .map(|(comment, construct)| InspectRecord {
                    line: comment.start_location.map(|l| l.line),
                    construct,
                    comment: comments.then_some(comment),
                })
                .collect();

            println!("{}", serde_json::to_string_pretty(&records)?);
            Ok(())
        }

        Command::Version => {
            println!("folio {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

/// One line of `folio inspect` output
#[derive(Debug, Serialize)]
struct InspectRecord<'a> {
    line: Option<usize>,
    construct: &'a crate::source::LinkedConstruct,
    #[serde(skip_serializing_if = "Option::is_none")]
    comment: Option<&'a crate::parser::Comment>,
}

/// Explicit config must load; the default file is optional
fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load(path),
        None => Ok(Config::load_or_default(Path::new(DEFAULT_CONFIG_FILE))),
    }
}

/// Configured project name, or the project directory's name
fn book_title(cfg: &Config, root: &Path) -> String {
    if cfg.project.name == "Untitled Project" || cfg.project.name.is_empty() {
        root.file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("Project")
            .to_string()
    } else {
        cfg.project.name.clone()
    }
}
