// Template engine for generating Quarto pages

use crate::analysis::{AnalysisStats, DocEntry, ModuleDoc};
use crate::error::Result;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use tera::{Context, Tera, Value};

/// Name shown for constructs whose kind is known but whose name is not
pub const ANONYMOUS: &str = "anonymous";

/// Template engine wrapping Tera with custom filters and templates
pub struct TemplateEngine {
    tera: Tera,
}

impl TemplateEngine {
    /// Create a new template engine with embedded templates
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        tera.add_raw_templates(vec![
            ("module.qmd", include_str!("../../templates/module.qmd.tera")),
            ("section.qmd", include_str!("../../templates/section.qmd.tera")),
            ("home.md", include_str!("../../templates/home.md.tera")),
        ])?;

        register_filters(&mut tera);
        Ok(Self { tera })
    }

    /// Render one module chapter
    pub fn render_module(&self, module: &ModuleDoc) -> Result<String> {
        let mut anchors = SlugSet::default();
        let entries: Vec<EntryView> = module
            .documented()
            .filter_map(|entry| EntryView::from_entry(entry, &mut anchors))
            .collect();

        let mut context = Context::new();
        context.insert("module", &module.info);
        context.insert("entries", &entries);

        Ok(self.tera.render("module.qmd", &context)?)
    }

    /// Render a category or sub-category index page
    pub fn render_section(
        &self,
        title: &str,
        modules: &[LinkView],
        sections: &[LinkView],
    ) -> Result<String> {
        let mut context = Context::new();
        context.insert("title", title);
        context.insert("modules", modules);
        context.insert("sections", sections);

        Ok(self.tera.render("section.qmd", &context)?)
    }

    /// Render the book's landing page
    pub fn render_home(
        &self,
        project_name: &str,
        description: Option<&str>,
        stats: &AnalysisStats,
    ) -> Result<String> {
        let mut context = Context::new();
        context.insert("project_name", project_name);
        context.insert("description", &description);
        context.insert("stats", stats);

        Ok(self.tera.render("home.md", &context)?)
    }
}

fn register_filters(tera: &mut Tera) {
    tera.register_filter("truncate_words", truncate_words);
    tera.register_filter("pluralize", pluralize);
    tera.register_filter("escape_yaml", escape_yaml);
}

/// Link to a page, for index listings
#[derive(Debug, Clone, Serialize)]
pub struct LinkView {
    pub name: String,
    pub href: String,
    pub description: String,
}

/// One documented construct as the module template sees it
#[derive(Debug, Serialize)]
pub struct EntryView {
    pub heading: String,
    pub description: String,
    pub params: Vec<ParamView>,
    pub returns: Vec<TypedView>,
    pub thrown_errors: Vec<TypedView>,
    pub link: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ParamView {
    pub name: String,
    pub type_expr: Option<String>,
    pub description: String,
}

#[derive(Debug, Serialize)]
pub struct TypedView {
    pub type_expr: String,
    pub description: String,
}

impl EntryView {
    /// `None` for entries that do not document a construct. Heading ids are
    /// claimed from `anchors`, which is shared by one page.
    pub fn from_entry(entry: &DocEntry, anchors: &mut SlugSet) -> Option<Self> {
        let info = entry.construct.construct()?;
        let name = info.name.as_deref().unwrap_or(ANONYMOUS);
        let anchor = anchors.claim(&slugify(&format!("{}-{}", info.kind, name)));
        let comment = &entry.comment;

        Some(Self {
            heading: format!("{} {} {{#{}}}", info.kind.title(), name, anchor),
            description: comment.description.clone(),
            params: comment
                .params
                .iter()
                .map(|p| ParamView {
                    name: p.name.clone(),
                    type_expr: p.type_expr.clone(),
                    description: p.description.clone(),
                })
                .collect(),
            returns: comment
                .returns
                .iter()
                .map(|r| TypedView {
                    type_expr: r.type_expr.clone().unwrap_or_else(|| "value".to_string()),
                    description: r.description.clone(),
                })
                .collect(),
            thrown_errors: comment
                .thrown_errors
                .iter()
                .map(|t| TypedView {
                    type_expr: t.type_expr.clone().unwrap_or_else(|| "Error".to_string()),
                    description: t.description.clone(),
                })
                .collect(),
            link: comment.link.clone(),
        })
    }
}

/// Truncate text to a number of words
fn truncate_words(value: &Value, args: &HashMap<String, Value>) -> tera::Result<Value> {
    let s = value.as_str().unwrap_or("");
    let max_words = args
        .get("count")
        .and_then(|v| v.as_u64())
        .unwrap_or(50) as usize;

    let words: Vec<&str> = s.split_whitespace().collect();
    if words.len() <= max_words {
        Ok(Value::String(s.to_string()))
    } else {
        let truncated: String = words[..max_words].join(" ");
        Ok(Value::String(format!("{}...", truncated)))
    }
}

/// Pluralize a word based on count
fn pluralize(value: &Value, args: &HashMap<String, Value>) -> tera::Result<Value> {
    let count = value.as_u64().unwrap_or(0);
    let singular = args
        .get("singular")
        .and_then(|v| v.as_str())
        .unwrap_or("item");
    let default_plural = format!("{}s", singular);
    let plural = args
        .get("plural")
        .and_then(|v| v.as_str())
        .unwrap_or(&default_plural);

    if count == 1 {
        Ok(Value::String(format!("{} {}", count, singular)))
    } else {
        Ok(Value::String(format!("{} {}", count, plural)))
    }
}

/// Escape text for a double-quoted YAML scalar in front matter
fn escape_yaml(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let s = value.as_str().unwrap_or("");
    Ok(Value::String(s.replace('\\', "\\\\").replace('"', "\\\"")))
}

/// Convert text to a file- and URL-friendly slug
pub fn slugify(s: &str) -> String {
    s.to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '-' })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// Hands out slugs that are unique within one scope: `util`, `util-2`, `util-3`
#[derive(Debug, Default)]
pub struct SlugSet {
    taken: HashSet<String>,
}

impl SlugSet {
    /// A scope where `reserved` are already in use
    pub fn with_reserved(reserved: &[&str]) -> Self {
        Self {
            taken: reserved.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// `base` if still free, else the first free `base-N`
    pub fn claim(&mut self, base: &str) -> String {
        if self.taken.insert(base.to_string()) {
            return base.to_string();
        }
        let mut n = 2;
        loop {
            let candidate = format!("{}-{}", base, n);
            if self.taken.insert(candidate.clone()) {
                return candidate;
            }
            n += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Comment;
    use crate::source::{ConstructInfo, ConstructKind, LineWindow, LinkedConstruct};
    use std::path::Path;

    fn entry(comment: &str, kind: ConstructKind, name: Option<&str>) -> DocEntry {
        DocEntry {
            comment: Comment::from_text(comment),
            construct: LinkedConstruct::Classified {
                info: ConstructInfo::new(kind, name.map(str::to_string)),
                window: LineWindow {
                    anchor: "*/".to_string(),
                    next_lines: vec![],
                },
            },
        }
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("function-a, b"), "function-a-b");
        assert_eq!(slugify("  spaced  out  "), "spaced-out");
        assert_eq!(slugify("CamelCase"), "camelcase");
    }

    #[test]
    fn test_escape_yaml() {
        let value = Value::String(r#"say "hi" \o/"#.to_string());
        let result = escape_yaml(&value, &HashMap::new()).unwrap();
        assert_eq!(result.as_str().unwrap(), r#"say \"hi\" \\o/"#);
    }

    #[test]
    fn test_truncate_words() {
        let value = Value::String("one two three four five".to_string());
        let mut args = HashMap::new();
        args.insert("count".to_string(), Value::Number(3.into()));

        let result = truncate_words(&value, &args).unwrap();
        assert_eq!(result.as_str().unwrap(), "one two three...");
    }

    #[test]
    fn test_pluralize() {
        let mut args = HashMap::new();
        args.insert("singular".to_string(), Value::String("module".to_string()));

        let one = pluralize(&Value::Number(1.into()), &args).unwrap();
        assert_eq!(one.as_str().unwrap(), "1 module");
        let many = pluralize(&Value::Number(0.into()), &args).unwrap();
        assert_eq!(many.as_str().unwrap(), "0 modules");
    }

    #[test]
    fn test_entry_view_anonymous_name() {
        let view = EntryView::from_entry(
            &entry("/** cb */", ConstructKind::Function, None),
            &mut SlugSet::default(),
        )
        .unwrap();
        assert_eq!(view.heading, "Function anonymous {#function-anonymous}");
    }

    #[test]
    fn test_entry_view_skips_undocumented() {
        let eof = DocEntry {
            comment: Comment::from_text("/** tail */"),
            construct: LinkedConstruct::EndOfFile,
        };
        let mut anchors = SlugSet::default();
        assert!(EntryView::from_entry(&eof, &mut anchors).is_none());
        assert!(EntryView::from_entry(&entry("/** x */", ConstructKind::Other, None), &mut anchors).is_none());
    }

    #[test]
    fn test_render_module() {
        let engine = TemplateEngine::new().unwrap();
        let module = ModuleDoc::new(
            Path::new("lib/math.js"),
            vec![(
                Comment::from_text(
                    "/**\n * Add numbers.\n * @param {number} a - left\n * @returns {number} sum\n * @throws overflow\n * @link https://example.com/add\n */",
                ),
                entry("/** */", ConstructKind::Function, Some("add")).construct,
            )],
            "general",
        );

        let page = engine.render_module(&module).unwrap();
        assert!(page.starts_with("---\ntitle: \"math\"\n---"));
        assert!(page.contains("## Function add {#function-add}"));
        assert!(page.contains("### Description\n\nAdd numbers."));
        assert!(page.contains("- **a** `number`: left"));
        assert!(page.contains("- **number**: sum"));
        assert!(page.contains("- **Error**: overflow"));
        assert!(page.contains("<https://example.com/add>"));
    }

    #[test]
    fn test_slug_set_claims_unique_slugs() {
        let mut slugs = SlugSet::with_reserved(&["index"]);
        assert_eq!(slugs.claim("util"), "util");
        assert_eq!(slugs.claim("util"), "util-2");
        assert_eq!(slugs.claim("util-2"), "util-2-2");
        assert_eq!(slugs.claim("util"), "util-3");
        assert_eq!(slugs.claim("index"), "index-2");
    }

    #[test]
    fn test_render_module_repeated_names_get_distinct_anchors() {
        let engine = TemplateEngine::new().unwrap();
        let module = ModuleDoc::new(
            Path::new("lib/handlers.js"),
            vec![
                (
                    Comment::from_text("/** First. */"),
                    entry("/** */", ConstructKind::Function, Some("handle")).construct,
                ),
                (
                    Comment::from_text("/** Second. */"),
                    entry("/** */", ConstructKind::Function, Some("handle")).construct,
                ),
            ],
            "general",
        );

        let page = engine.render_module(&module).unwrap();
        assert!(page.contains("## Function handle {#function-handle}"));
        assert!(page.contains("## Function handle {#function-handle-2}"));
    }

    #[test]
    fn test_render_section_lists_modules() {
        let engine = TemplateEngine::new().unwrap();
        let modules = vec![LinkView {
            name: "users".to_string(),
            href: "users.qmd".to_string(),
            description: "User endpoints.".to_string(),
        }];

        let page = engine.render_section("v1", &modules, &[]).unwrap();
        assert!(page.contains("title: \"v1\""));
        assert!(page.contains("1 module in this section"));
        assert!(page.contains("- [users](users.qmd): User endpoints."));
    }

    #[test]
    fn test_render_home() {
        let engine = TemplateEngine::new().unwrap();
        let stats = AnalysisStats {
            files: 2,
            comments: 4,
            documented: 3,
        };
        let page = engine.render_home("Billing", Some("Invoices."), &stats).unwrap();
        assert!(page.starts_with("# Billing"));
        assert!(page.contains("Invoices."));
        assert!(page.contains("2 files, 3 documented constructs."));
    }
}
