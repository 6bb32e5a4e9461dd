// Analysis module: discover sources, extract and link comments, group modules

pub mod modules;

pub use modules::*;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::parser::{Comment, CommentExtractor, JsVariant};
use crate::source::{ConstructLinker, LinkedConstruct, SourceFile};
use glob::Pattern;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Directories never worth descending into
const SKIPPED_DIRS: &[&str] = &["node_modules", ".git", ".hg", ".svn"];

/// Result of analyzing a project
#[derive(Debug, Serialize)]
pub struct AnalysisResult {
    /// Canonical project root
    pub root: PathBuf,
    /// Modules grouped for the book
    pub categories: Vec<Category>,
    /// Files that could not be read or parsed (path -> error message)
    pub parse_errors: BTreeMap<PathBuf, String>,
    pub stats: AnalysisStats,
}

/// Counts reported after an analysis
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct AnalysisStats {
    pub files: usize,
    pub comments: usize,
    /// Comments linked to a real construct
    pub documented: usize,
}

impl AnalysisStats {
    pub fn undocumented(&self) -> usize {
        self.comments - self.documented
    }
}

/// Include/exclude glob filter over root-relative paths
#[derive(Debug, Clone)]
struct PathFilter {
    include: Vec<Pattern>,
    exclude: Vec<Pattern>,
}

impl PathFilter {
    fn new(include: &[String], exclude: &[String]) -> Result<Self> {
        Ok(Self {
            include: compile_patterns(include)?,
            exclude: compile_patterns(exclude)?,
        })
    }

    fn accepts(&self, relative: &str) -> bool {
        self.include.iter().any(|p| p.matches(relative))
            && !self.exclude.iter().any(|p| p.matches(relative))
    }
}

/// `**/x` also matches `x` at the root
fn compile_patterns(patterns: &[String]) -> Result<Vec<Pattern>> {
    let mut compiled = Vec::with_capacity(patterns.len());
    for pattern in patterns {
        compiled.push(Pattern::new(pattern)?);
        if let Some(rest) = pattern.strip_prefix("**/") {
            compiled.push(Pattern::new(rest)?);
        }
    }
    Ok(compiled)
}

/// Main analyzer that orchestrates the documentation pipeline
pub struct Analyzer {
    config: Config,
    linker: ConstructLinker,
    filter: PathFilter,
    verbose: bool,
}

impl Analyzer {
    /// Create a new analyzer with the given configuration
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let linker = ConstructLinker::from_config(&config.linking)?;
        let filter = PathFilter::new(&config.analysis.include, &config.analysis.exclude)?;

        Ok(Self {
            config,
            linker,
            filter,
            verbose: false,
        })
    }

    /// Create analyzer with a progress bar
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn linker(&self) -> &ConstructLinker {
        &self.linker
    }

    /// Analyze the project at the given path
    pub fn analyze(&self, root: &Path) -> Result<AnalysisResult> {
        let root = root
            .canonicalize()
            .map_err(|_| Error::PathNotFound(root.to_path_buf()))?;

        let files = self.discover_files(&root)?;
        if files.is_empty() {
            return Err(Error::analysis(format!(
                "No source files found in {}",
                root.display()
            )));
        }
        tracing::info!(files = files.len(), root = %root.display(), "discovered source files");

        let progress = self.progress_bar(files.len());

        let outcomes: Vec<(PathBuf, Result<ModuleDoc>)> = files
            .par_iter()
            .map_init(CommentExtractor::new, |extractor, path| {
                if let Some(pb) = &progress {
                    pb.set_message(path.file_name().unwrap_or_default().to_string_lossy().to_string());
                    pb.inc(1);
                }
                let outcome = match extractor {
                    Ok(extractor) => self.document_file(extractor, path, &root),
                    Err(e) => Err(Error::parser(e.to_string())),
                };
                (path.clone(), outcome)
            })
            .collect();

        if let Some(pb) = progress {
            pb.finish_with_message("Linking complete");
        }

        let mut modules = Vec::new();
        let mut parse_errors = BTreeMap::new();
        let mut stats = AnalysisStats::default();

        for (path, outcome) in outcomes {
            match outcome {
                Ok(module) => {
                    stats.files += 1;
                    stats.comments += module.docs.len();
                    stats.documented += module.documented().count();
                    modules.push(module);
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "skipping file");
                    parse_errors.insert(path, e.to_string());
                }
            }
        }

        Ok(AnalysisResult {
            root,
            categories: group_modules(modules),
            parse_errors,
            stats,
        })
    }

    /// Extract and link every comment in a single file
    pub fn link_file(&self, path: &Path) -> Result<Vec<(Comment, LinkedConstruct)>> {
        let mut extractor = CommentExtractor::new()?;
        let file = SourceFile::open(path)?;
        let comments = extractor.extract_for_path(path, file.content())?;
        Ok(self.linker.link_all(&file, comments))
    }

    fn document_file(
        &self,
        extractor: &mut CommentExtractor,
        path: &Path,
        root: &Path,
    ) -> Result<ModuleDoc> {
        let file = SourceFile::open(path)?;
        let comments = extractor.extract_for_path(path, file.content())?;
        let linked = self.linker.link_all(&file, comments);
        let relative = path.strip_prefix(root).unwrap_or(path);

        tracing::debug!(path = %relative.display(), comments = linked.len(), "linked file");
        Ok(ModuleDoc::new(
            relative,
            linked,
            &self.config.analysis.default_category,
        ))
    }

    fn progress_bar(&self, len: usize) -> Option<ProgressBar> {
        if !self.verbose {
            return None;
        }
        let pb = ProgressBar::new(len as u64);
        if let Ok(style) =
            ProgressStyle::default_bar().template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        {
            pb.set_style(style.progress_chars("#>-"));
        }
        Some(pb)
    }

    /// Discover all matching source files under the root, sorted
    fn discover_files(&self, root: &Path) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();

        let walker = WalkDir::new(root)
            .follow_links(true)
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_skipped_dir(e));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!(error = %e, "cannot read directory entry");
                    continue;
                }
            };

            let path = entry.path();
            if !entry.file_type().is_file() || JsVariant::from_path(path).is_none() {
                continue;
            }

            if self.should_include(path, root) {
                files.push(path.to_path_buf());
            }
        }

        files.sort();
        Ok(files)
    }

    /// Check a path against the include and exclude patterns
    fn should_include(&self, path: &Path, root: &Path) -> bool {
        let relative = path.strip_prefix(root).unwrap_or(path);
        let relative: Vec<String> = relative
            .iter()
            .map(|s| s.to_string_lossy().to_string())
            .collect();
        self.filter.accepts(&relative.join("/"))
    }

    /// Get the file count for reporting
    pub fn file_count(&self, root: &Path) -> Result<usize> {
        self.discover_files(root).map(|f| f.len())
    }
}

fn is_skipped_dir(entry: &DirEntry) -> bool {
    entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .map_or(false, |name| SKIPPED_DIRS.contains(&name))
}
