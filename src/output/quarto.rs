// Quarto book writer
//
// Layout under the output directory:
//
//   index.md                              (only written when missing)
//   _quarto.yml
//   chapters/<category>/index.qmd
//   chapters/<category>/<sub>/index.qmd
//   chapters/<category>/<sub>/<module>.qmd
//
// Names that slugify alike get `-2`, `-3`, ... among their siblings.

use crate::analysis::{AnalysisResult, Category, ModuleDoc};
use crate::config::Config;
use crate::error::Result;
use crate::output::templates::{slugify, LinkView, SlugSet, TemplateEngine};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

const CHAPTERS_DIR: &str = "chapters";
const HOME_PAGE: &str = "index.md";
const INDEX_PAGE: &str = "index.qmd";
const QUARTO_FILE: &str = "_quarto.yml";

/// Configuration for book generation
#[derive(Debug, Clone)]
pub struct QuartoConfig {
    pub output_dir: PathBuf,
    pub title: String,
    pub author: Option<String>,
    pub description: Option<String>,
    pub theme: String,
}

impl Default for QuartoConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("docs"),
            title: "Project".to_string(),
            author: None,
            description: None,
            theme: "cosmo".to_string(),
        }
    }
}

impl QuartoConfig {
    pub fn from_config(config: &Config, title: String) -> Self {
        Self {
            output_dir: config.output.directory.clone(),
            title,
            author: config.project.author.clone(),
            description: config.project.description.clone(),
            theme: config.output.theme.clone(),
        }
    }
}

/// `_quarto.yml` contents
#[derive(Debug, Serialize, PartialEq)]
pub struct QuartoProjectFile {
    pub project: QuartoProject,
    pub book: QuartoBook,
    pub format: QuartoFormat,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct QuartoProject {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(rename = "output-dir")]
    pub output_dir: String,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct QuartoBook {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    pub chapters: Vec<Chapter>,
}

/// A book chapter: a single page or a part grouping pages
#[derive(Debug, Serialize, PartialEq)]
#[serde(untagged)]
pub enum Chapter {
    Page(String),
    Part { part: String, chapters: Vec<String> },
}

#[derive(Debug, Serialize, PartialEq)]
pub struct QuartoFormat {
    pub html: QuartoHtml,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct QuartoHtml {
    pub theme: String,
    pub toc: bool,
}

/// Writes a Quarto book from an analysis
pub struct QuartoWriter {
    config: QuartoConfig,
    template_engine: TemplateEngine,
}

impl QuartoWriter {
    pub fn new(config: QuartoConfig) -> Result<Self> {
        let template_engine = TemplateEngine::new()?;
        Ok(Self {
            config,
            template_engine,
        })
    }

    /// Write the whole book
    pub fn generate(&self, analysis: &AnalysisResult) -> Result<GenerationReport> {
        let mut report = GenerationReport::default();
        let chapters_root = self.config.output_dir.join(CHAPTERS_DIR);
        fs::create_dir_all(&chapters_root)?;
        tracing::info!(path = %chapters_root.display(), "documentation folder ready");

        let layout = BookLayout::new(&analysis.categories);
        for (category, paths) in analysis.categories.iter().zip(&layout.categories) {
            self.write_category(category, paths, &chapters_root, &mut report)?;
        }

        if self.write_home_page(analysis)? {
            report.pages_written += 1;
        }

        let chapters = layout.chapters();
        if chapters.len() == 1 {
            tracing::warn!("no chapters found for the Quarto book");
        }
        self.write_quarto_file(chapters)?;

        Ok(report)
    }

    fn write_category(
        &self,
        category: &Category,
        paths: &CategoryPaths,
        chapters_root: &Path,
        report: &mut GenerationReport,
    ) -> Result<()> {
        let category_dir = chapters_root.join(&paths.dir);
        fs::create_dir_all(&category_dir)?;

        let sections: Vec<LinkView> = category
            .sub_categories
            .iter()
            .zip(&paths.sub_categories)
            .map(|(sub, sub_paths)| LinkView {
                name: sub.name.clone(),
                href: format!("{}/{}", sub_paths.dir, INDEX_PAGE),
                description: String::new(),
            })
            .collect();
        let page = self
            .template_engine
            .render_section(&category.name, &[], &sections)?;
        fs::write(category_dir.join(INDEX_PAGE), page)?;
        report.pages_written += 1;
        tracing::debug!(path = %category_dir.display(), "category written");

        for (sub, sub_paths) in category.sub_categories.iter().zip(&paths.sub_categories) {
            let sub_dir = category_dir.join(&sub_paths.dir);
            fs::create_dir_all(&sub_dir)?;

            let links: Vec<LinkView> = sub
                .modules
                .iter()
                .zip(&sub_paths.modules)
                .map(|(m, file)| LinkView {
                    name: m.info.name.clone(),
                    href: file.clone(),
                    description: m.info.description.clone(),
                })
                .collect();
            let page = self.template_engine.render_section(&sub.name, &links, &[])?;
            fs::write(sub_dir.join(INDEX_PAGE), page)?;
            report.pages_written += 1;

            for (module, file) in sub.modules.iter().zip(&sub_paths.modules) {
                self.write_module(module, &sub_dir.join(file), report)?;
            }
        }

        Ok(())
    }

    fn write_module(
        &self,
        module: &ModuleDoc,
        path: &Path,
        report: &mut GenerationReport,
    ) -> Result<()> {
        for entry in module.docs.iter().filter(|d| !d.construct.is_documented()) {
            tracing::debug!(
                module = %module.info.name,
                line = entry.comment.start_location.map(|l| l.line),
                "comment does not document a construct; skipped"
            );
            report.entries_skipped += 1;
        }

        let page = self.template_engine.render_module(module)?;
        fs::write(path, page)?;
        tracing::info!(path = %path.display(), "documentation written");

        report.pages_written += 1;
        report.modules_written += 1;
        report.entries_written += module.documented().count();
        Ok(())
    }

    /// Landing page; an existing one is left untouched. Returns whether it was written.
    fn write_home_page(&self, analysis: &AnalysisResult) -> Result<bool> {
        let path = self.config.output_dir.join(HOME_PAGE);
        if path.exists() {
            tracing::debug!(path = %path.display(), "keeping existing home page");
            return Ok(false);
        }

        let page = self.template_engine.render_home(
            &self.config.title,
            self.config.description.as_deref(),
            &analysis.stats,
        )?;
        fs::write(&path, page)?;
        Ok(true)
    }

    fn write_quarto_file(&self, chapters: Vec<Chapter>) -> Result<()> {
        let file = QuartoProjectFile {
            project: QuartoProject {
                kind: "book".to_string(),
                output_dir: "_book".to_string(),
            },
            book: QuartoBook {
                title: self.config.title.clone(),
                author: self.config.author.clone(),
                chapters,
            },
            format: QuartoFormat {
                html: QuartoHtml {
                    theme: self.config.theme.clone(),
                    toc: true,
                },
            },
        };

        let path = self.config.output_dir.join(QUARTO_FILE);
        fs::write(&path, serde_yaml::to_string(&file)?)?;
        tracing::info!(path = %path.display(), "Quarto config generated");
        Ok(())
    }

    /// Get the output directory
    pub fn output_dir(&self) -> &Path {
        &self.config.output_dir
    }
}

/// Chapter list: the home page, then one part per category
pub fn book_chapters(categories: &[Category]) -> Vec<Chapter> {
    BookLayout::new(categories).chapters()
}

/// Directory and file names for every page of the book. Names are slugs made
/// unique among their siblings, so no two modules share a file.
#[derive(Debug)]
struct BookLayout {
    categories: Vec<CategoryPaths>,
}

#[derive(Debug)]
struct CategoryPaths {
    dir: String,
    sub_categories: Vec<SubCategoryPaths>,
}

#[derive(Debug)]
struct SubCategoryPaths {
    dir: String,
    /// One `.qmd` file name per module, in module order
    modules: Vec<String>,
}

impl BookLayout {
    fn new(categories: &[Category]) -> Self {
        let mut category_dirs = SlugSet::default();

        let categories = categories
            .iter()
            .map(|category| {
                let mut sub_dirs = SlugSet::default();
                CategoryPaths {
                    dir: category_dirs.claim(&dir_slug(&category.name)),
                    sub_categories: category
                        .sub_categories
                        .iter()
                        .map(|sub| {
                            let mut files = SlugSet::with_reserved(&["index"]);
                            SubCategoryPaths {
                                dir: sub_dirs.claim(&dir_slug(&sub.name)),
                                modules: sub
                                    .modules
                                    .iter()
                                    .map(|m| format!("{}.qmd", files.claim(&module_slug(m))))
                                    .collect(),
                            }
                        })
                        .collect(),
                }
            })
            .collect();

        Self { categories }
    }

    fn chapters(&self) -> Vec<Chapter> {
        let mut chapters = vec![Chapter::Page(HOME_PAGE.to_string())];

        for category in &self.categories {
            let category_path = format!("{}/{}", CHAPTERS_DIR, category.dir);
            let mut pages = Vec::new();

            for sub in &category.sub_categories {
                let sub_path = format!("{}/{}", category_path, sub.dir);
                pages.push(format!("{}/{}", sub_path, INDEX_PAGE));
                pages.extend(sub.modules.iter().map(|file| format!("{}/{}", sub_path, file)));
            }

            chapters.push(Chapter::Part {
                part: format!("{}/{}", category_path, INDEX_PAGE),
                chapters: pages,
            });
        }

        chapters
    }
}

fn dir_slug(name: &str) -> String {
    let slug = slugify(name);
    if slug.is_empty() {
        "untitled".to_string()
    } else {
        slug
    }
}

/// `index` belongs to the sub-category page
fn module_slug(module: &ModuleDoc) -> String {
    match slugify(&module.info.name).as_str() {
        "" => "module".to_string(),
        "index" => "index-module".to_string(),
        slug => slug.to_string(),
    }
}

/// Report of what was generated
#[derive(Debug, Default, PartialEq, Eq)]
pub struct GenerationReport {
    pub pages_written: usize,
    pub modules_written: usize,
    pub entries_written: usize,
    /// Comments with no linked construct
    pub entries_skipped: usize,
}

impl GenerationReport {
    pub fn summary(&self) -> String {
        format!(
            "Wrote {} pages for {} modules: {} documented constructs, {} comments skipped",
            self.pages_written, self.modules_written, self.entries_written, self.entries_skipped
        )
    }
}
