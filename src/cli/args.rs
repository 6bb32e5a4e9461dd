//! CLI argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Generate Quarto documentation books from JSDoc comments
#[derive(Parser, Debug)]
#[command(name = "folio")]
#[command(about = "Generate Quarto documentation books from JSDoc comments")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

impl Args {
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Extract comments from a project and write a Quarto book
    Build {
        /// Path to the project to document
        path: PathBuf,

        /// Output directory
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Config file path (defaults to ./folio.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Glob patterns to include (can be repeated)
        #[arg(long)]
        include: Vec<String>,

        /// Glob patterns to exclude (can be repeated)
        #[arg(long)]
        exclude: Vec<String>,

        /// Lines inspected after each comment
        #[arg(long)]
        window: Option<usize>,

        /// Name arrow functions by their declared identifier, not their parameter list
        #[arg(long)]
        no_arrow_params: bool,

        /// Book title (defaults to the project name or directory name)
        #[arg(long)]
        title: Option<String>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Print what each comment in a file links to, as JSON
    Inspect {
        /// Source file to inspect
        file: PathBuf,

        /// Lines inspected after each comment
        #[arg(long)]
        window: Option<usize>,

        /// Name arrow functions by their declared identifier, not their parameter list
        #[arg(long)]
        no_arrow_params: bool,

        /// Include the parsed comment in the output
        #[arg(long)]
        comments: bool,
    },

    /// Show version information
    Version,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_defaults() {
        let args = Args::try_parse_from(["folio", "build", "./src"]).unwrap();
        match args.command {
            Command::Build {
                path,
                output,
                window,
                include,
                no_arrow_params,
                ..
            } => {
                assert_eq!(path, PathBuf::from("./src"));
                assert_eq!(output, None);
                assert_eq!(window, None);
                assert!(include.is_empty());
                assert!(!no_arrow_params);
            }
            _ => panic!("Expected Build command"),
        }
    }

    #[test]
    fn test_build_with_options() {
        let args = Args::try_parse_from([
            "folio", "build", "./project",
            "--output", "/tmp/book",
            "--exclude", "test/**",
            "--include", "**/*.js",
            "--include", "**/*.ts",
            "--config", "custom.toml",
            "--window", "8",
            "--no-arrow-params",
            "--title", "My Book",
            "--verbose",
        ])
        .unwrap();

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
                assert_eq!(path, PathBuf::from("./project"));
                assert_eq!(output, Some(PathBuf::from("/tmp/book")));
                assert_eq!(exclude, vec!["test/**".to_string()]);
                assert_eq!(include, vec!["**/*.js".to_string(), "**/*.ts".to_string()]);
                assert_eq!(config, Some(PathBuf::from("custom.toml")));
                assert_eq!(window, Some(8));
                assert!(no_arrow_params);
                assert_eq!(title.as_deref(), Some("My Book"));
                assert!(verbose);
            }
            _ => panic!("Expected Build command"),
        }
    }

    #[test]
    fn test_inspect() {
        let args = Args::try_parse_from(["folio", "inspect", "lib/a.js", "--window", "3", "--comments"]).unwrap();
        match args.command {
            Command::Inspect {
                file,
                window,
                comments,
                no_arrow_params,
            } => {
                assert_eq!(file, PathBuf::from("lib/a.js"));
                assert_eq!(window, Some(3));
                assert!(comments);
                assert!(!no_arrow_params);
            }
            _ => panic!("Expected Inspect command"),
        }
    }

    #[test]
    fn test_version_command() {
        let args = Args::try_parse_from(["folio", "version"]).unwrap();
        assert!(matches!(args.command, Command::Version));
    }

    #[test]
    fn test_build_requires_path() {
        assert!(Args::try_parse_from(["folio", "build"]).is_err());
    }
}
