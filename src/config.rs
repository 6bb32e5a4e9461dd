use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default number of lines inspected after a comment
pub const DEFAULT_WINDOW_SIZE: usize = 5;

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub project: ProjectConfig,
    pub analysis: AnalysisConfig,
    pub linking: LinkingConfig,
    pub output: OutputConfig,
}

/// Project metadata, used for the book title page
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    pub name: String,
    pub author: Option<String>,
    pub description: Option<String>,
}

/// Source discovery and grouping settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub exclude: Vec<String>,
    pub include: Vec<String>,
    /// Category for files that sit directly in the project root
    pub default_category: String,
}

/// Comment-to-construct linking settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkingConfig {
    /// Number of lines after a comment that are inspected
    pub window_size: usize,
    /// Report an anonymous arrow's parameter list as the function name
    pub arrow_params_as_name: bool,
}

/// Output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub directory: PathBuf,
    pub theme: String,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            name: "Untitled Project".to_string(),
            author: None,
            description: None,
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            exclude: vec![
                "node_modules/**".to_string(),
                "dist/**".to_string(),
                "build/**".to_string(),
                "coverage/**".to_string(),
                "**/*.min.js".to_string(),
                "**/*.d.ts".to_string(),
                ".git/**".to_string(),
            ],
            include: vec![
                "**/*.js".to_string(),
                "**/*.mjs".to_string(),
                "**/*.cjs".to_string(),
                "**/*.ts".to_string(),
            ],
            default_category: "general".to_string(),
        }
    }
}

impl Default for LinkingConfig {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
            arrow_params_as_name: true,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("./docs"),
            theme: "cosmo".to_string(),
        }
    }
}

impl Config {
    /// Load config from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load config from file or return defaults
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                if path.exists() {
                    tracing::warn!(path = %path.display(), error = %e, "ignoring unusable config file");
                }
                Self::default()
            }
        }
    }

    /// Merge CLI arguments into config (CLI takes precedence)
    pub fn merge_cli(
        &mut self,
        output: Option<PathBuf>,
        exclude: Vec<String>,
        window: Option<usize>,
        no_arrow_params: bool,
    ) {
        if let Some(out) = output {
            self.output.directory = out;
        }

        if !exclude.is_empty() {
            self.analysis.exclude.extend(exclude);
        }

        if let Some(w) = window {
            self.linking.window_size = w;
        }

        if no_arrow_params {
            self.linking.arrow_params_as_name = false;
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.linking.window_size == 0 {
            return Err(Error::config_validation("window_size must be at least 1"));
        }

        if self.linking.window_size > 50 {
            return Err(Error::config_validation("window_size cannot exceed 50"));
        }

        if self.analysis.include.is_empty() {
            return Err(Error::config_validation("at least one include pattern required"));
        }

        if self.analysis.default_category.trim().is_empty() {
            return Err(Error::config_validation("default_category cannot be empty"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.project.name, "Untitled Project");
        assert_eq!(config.linking.window_size, 5);
        assert!(config.linking.arrow_params_as_name);
        assert_eq!(config.output.directory, PathBuf::from("./docs"));
        assert_eq!(config.analysis.default_category, "general");
    }

    #[test]
    fn test_load_valid_config() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[project]
name = "Billing Service"
author = "Platform Team"

[linking]
window_size = 8
arrow_params_as_name = false

[output]
directory = "book"
"#
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.project.name, "Billing Service");
        assert_eq!(config.project.author.as_deref(), Some("Platform Team"));
        assert_eq!(config.linking.window_size, 8);
        assert!(!config.linking.arrow_params_as_name);
        assert_eq!(config.output.directory, PathBuf::from("book"));
        // Untouched sections keep their defaults
        assert_eq!(config.output.theme, "cosmo");
    }

    #[test]
    fn test_load_missing_file() {
        let result = Config::load(Path::new("/nonexistent/folio.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = Config::load_or_default(Path::new("/nonexistent/folio.toml"));
        assert_eq!(config.linking.window_size, DEFAULT_WINDOW_SIZE);
    }

    #[test]
    fn test_load_rejects_invalid_window() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[linking]\nwindow_size = 0").unwrap();
        let result = Config::load(file.path());
        assert!(matches!(result, Err(Error::ConfigValidation(_))));
    }

    #[test]
    fn test_validation_window_too_large() {
        let mut config = Config::default();
        config.linking.window_size = 51;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_empty_include() {
        let mut config = Config::default();
        config.analysis.include.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_blank_default_category() {
        let mut config = Config::default();
        config.analysis.default_category = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_merge_cli_output() {
        let mut config = Config::default();
        config.merge_cli(Some(PathBuf::from("/custom/output")), vec![], None, false);
        assert_eq!(config.output.directory, PathBuf::from("/custom/output"));
    }

    #[test]
    fn test_merge_cli_exclude() {
        let mut config = Config::default();
        let initial_excludes = config.analysis.exclude.len();
        config.merge_cli(None, vec!["vendor/**".to_string()], None, false);
        assert_eq!(config.analysis.exclude.len(), initial_excludes + 1);
    }

    #[test]
    fn test_merge_cli_linking() {
        let mut config = Config::default();
        config.merge_cli(None, vec![], Some(3), true);
        assert_eq!(config.linking.window_size, 3);
        assert!(!config.linking.arrow_params_as_name);
    }

    #[test]
    fn test_linking_section_parsing() {
        let toml_str = r#"window_size = 7"#;
        let linking: LinkingConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(linking.window_size, 7);
        assert!(linking.arrow_params_as_name);
    }
}
