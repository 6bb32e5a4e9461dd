// Module documentation and category grouping
//
// Every source file becomes one module. Modules are grouped into categories
// and sub-categories, taken from `@category`/`@subcategory` tags on the
// module comment or, failing that, from the file's directory path.

use crate::parser::Comment;
use crate::source::LinkedConstruct;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// One documented comment and what it was linked to
#[derive(Debug, Clone, Serialize)]
pub struct DocEntry {
    pub comment: Comment,
    pub construct: LinkedConstruct,
}

/// Module-level information, from the `@module` comment when there is one
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ModuleInfo {
    pub name: String,
    pub description: String,
    /// Source path relative to the project root
    pub path: PathBuf,
    pub category: String,
    pub subcategory: String,
}

/// Documentation for one source file
#[derive(Debug, Clone, Serialize)]
pub struct ModuleDoc {
    pub info: ModuleInfo,
    pub docs: Vec<DocEntry>,
}

impl ModuleDoc {
    /// Build a module from a file's linked comments
    pub fn new(
        relative_path: &Path,
        linked: Vec<(Comment, LinkedConstruct)>,
        default_category: &str,
    ) -> Self {
        let module_index = linked
            .iter()
            .position(|(comment, _)| comment.tag("module").is_some());

        let module_comment = module_index.map(|i| &linked[i].0);
        let (dir_category, dir_subcategory) = directory_groups(relative_path);

        let name = module_comment
            .and_then(|c| c.module_name())
            .map(str::to_string)
            .unwrap_or_else(|| file_stem(relative_path));

        let category = module_comment
            .and_then(|c| c.tag("category"))
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .or(dir_category)
            .unwrap_or_else(|| default_category.to_string());

        let subcategory = module_comment
            .and_then(|c| c.tag("subcategory"))
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .or(dir_subcategory)
            .unwrap_or_else(|| default_category.to_string());

        let description = module_comment
            .map(|c| c.description.clone())
            .unwrap_or_default();

        let docs = linked
            .into_iter()
            .enumerate()
            .filter(|(i, _)| Some(*i) != module_index)
            .map(|(_, (comment, construct))| DocEntry { comment, construct })
            .collect();

        Self {
            info: ModuleInfo {
                name,
                description,
                path: relative_path.to_path_buf(),
                category,
                subcategory,
            },
            docs,
        }
    }

    /// Entries that document a real construct
    pub fn documented(&self) -> impl Iterator<Item = &DocEntry> {
        self.docs.iter().filter(|d| d.construct.is_documented())
    }
}

/// A sub-category: the second grouping level
#[derive(Debug, Clone, Serialize)]
pub struct SubCategory {
    pub name: String,
    pub modules: Vec<ModuleDoc>,
}

/// A category: the top grouping level, one part of the book
#[derive(Debug, Clone, Serialize)]
pub struct Category {
    pub name: String,
    pub sub_categories: Vec<SubCategory>,
}

impl Category {
    pub fn module_count(&self) -> usize {
        self.sub_categories.iter().map(|s| s.modules.len()).sum()
    }
}

/// Group modules by category and sub-category, sorted by name
pub fn group_modules(modules: Vec<ModuleDoc>) -> Vec<Category> {
    let mut tree: BTreeMap<String, BTreeMap<String, Vec<ModuleDoc>>> = BTreeMap::new();

    for module in modules {
        tree.entry(module.info.category.clone())
            .or_default()
            .entry(module.info.subcategory.clone())
            .or_default()
            .push(module);
    }

    tree.into_iter()
        .map(|(name, subs)| Category {
            name,
            sub_categories: subs
                .into_iter()
                .map(|(name, mut modules)| {
                    modules.sort_by(|a, b| a.info.name.cmp(&b.info.name));
                    SubCategory { name, modules }
                })
                .collect(),
        })
        .collect()
}

/// First and second directory below the root, if present
fn directory_groups(relative_path: &Path) -> (Option<String>, Option<String>) {
    let dirs: Vec<String> = relative_path
        .parent()
        .map(|p| {
            p.iter()
                .filter_map(|s| s.to_str())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    (dirs.first().cloned(), dirs.get(1).cloned())
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("unknown")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{ConstructInfo, ConstructKind, LineWindow};

    fn classified(kind: ConstructKind, name: &str) -> LinkedConstruct {
        LinkedConstruct::Classified {
            info: ConstructInfo::new(kind, Some(name.to_string())),
            window: LineWindow {
                anchor: "*/".to_string(),
                next_lines: vec![],
            },
        }
    }

    fn module_comment(text: &str) -> Comment {
        Comment::from_text(text)
    }

    #[test]
    fn test_module_from_tags() {
        let linked = vec![
            (
                module_comment("/** Billing helpers.\n * @module billing\n * @category finance\n * @subcategory invoices */"),
                LinkedConstruct::EndOfFile,
            ),
            (
                Comment::from_text("/** Charge. */"),
                classified(ConstructKind::Function, "charge"),
            ),
        ];

        let module = ModuleDoc::new(Path::new("src/lib/billing.js"), linked, "general");
        assert_eq!(module.info.name, "billing");
        assert_eq!(module.info.description, "Billing helpers.");
        assert_eq!(module.info.category, "finance");
        assert_eq!(module.info.subcategory, "invoices");
        // The module comment itself is not a doc entry
        assert_eq!(module.docs.len(), 1);
        assert_eq!(module.documented().count(), 1);
    }

    #[test]
    fn test_module_from_directories() {
        let linked = vec![(
            Comment::from_text("/** Helper. */"),
            classified(ConstructKind::Variable, "LIMIT"),
        )];
        let module = ModuleDoc::new(Path::new("api/handlers/users.js"), linked, "general");
        assert_eq!(module.info.name, "users");
        assert_eq!(module.info.category, "api");
        assert_eq!(module.info.subcategory, "handlers");
        assert_eq!(module.info.description, "");
    }

    #[test]
    fn test_module_defaults_for_root_file() {
        let module = ModuleDoc::new(Path::new("index.js"), vec![], "misc");
        assert_eq!(module.info.category, "misc");
        assert_eq!(module.info.subcategory, "misc");
    }

    #[test]
    fn test_undocumented_entries_kept_but_not_documented() {
        let linked = vec![
            (Comment::from_text("/** a */"), LinkedConstruct::Unlocated),
            (Comment::from_text("/** b */"), LinkedConstruct::EndOfFile),
        ];
        let module = ModuleDoc::new(Path::new("a.js"), linked, "general");
        assert_eq!(module.docs.len(), 2);
        assert_eq!(module.documented().count(), 0);
    }

    #[test]
    fn test_group_modules_sorted() {
        let modules = vec![
            ModuleDoc::new(Path::new("web/ui/zeta.js"), vec![], "general"),
            ModuleDoc::new(Path::new("api/v1/users.js"), vec![], "general"),
            ModuleDoc::new(Path::new("web/ui/alpha.js"), vec![], "general"),
            ModuleDoc::new(Path::new("web/core/main.js"), vec![], "general"),
        ];

        let categories = group_modules(modules);
        let names: Vec<&str> = categories.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["api", "web"]);

        let web = &categories[1];
        assert_eq!(web.module_count(), 3);
        assert_eq!(web.sub_categories[0].name, "core");
        let ui: Vec<&str> = web.sub_categories[1]
            .modules
            .iter()
            .map(|m| m.info.name.as_str())
            .collect();
        assert_eq!(ui, vec!["alpha", "zeta"]);
    }
}
