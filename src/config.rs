//! Filters deciding which children of the root a sort pass may move.
//!
//! A filtered-out child stays where it is and never reaches the sort log.
//! Rules only ever see the child's own name, since a pass never looks below
//! the root's direct children.
//!
//! ```toml
//! [filters]
//! enable_hidden_files = false
//!
//! [filters.exclude]
//! filenames = [".DS_Store", "Thumbs.db"]
//! patterns = ["*.part"]
//! extensions = ["tmp"]
//! regex = ["^~\\$"]
//!
//! [filters.include]
//! patterns = [".env*"]
//! ```

use glob::Pattern;
use regex::Regex;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// File name looked up in the working directory.
pub const LOCAL_CONFIG_FILENAME: &str = ".foldersortrc.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Could not read configuration {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("Invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid glob pattern '{pattern}': {source}")]
    Glob {
        pattern: String,
        source: glob::PatternError,
    },
    #[error("Invalid regex pattern '{pattern}': {source}")]
    Regex {
        pattern: String,
        source: regex::Error,
    },
}

/// A parsed configuration file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    pub filters: FilterSection,
}

/// The `[filters]` table.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FilterSection {
    /// Whether children whose name starts with "." are sorted.
    #[serde(rename = "enable_hidden_files")]
    pub sort_hidden: bool,
    pub exclude: ExcludeSection,
    /// Globs that win over every exclusion, hidden-file rule included.
    pub include: IncludeSection,
}

impl Default for FilterSection {
    fn default() -> Self {
        Self {
            sort_hidden: true,
            exclude: ExcludeSection::default(),
            include: IncludeSection::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ExcludeSection {
    /// Exact names.
    pub filenames: Vec<String>,
    /// Globs matched against the whole name.
    pub patterns: Vec<String>,
    /// Case-insensitive, with or without the leading dot.
    pub extensions: Vec<String>,
    pub regex: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct IncludeSection {
    pub patterns: Vec<String>,
}

impl FilterConfig {
    /// Loads `explicit` if given, else the first configuration file found in
    /// the working directory (`.foldersortrc.toml`) or under
    /// `~/.config/foldersort/config.toml`. With no file anywhere, every
    /// child is sorted.
    ///
    /// # Errors
    ///
    /// Fails if the chosen file is missing, unreadable or not valid TOML.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        match Self::discover() {
            Some(path) => Self::from_file(&path),
            None => Ok(Self::default()),
        }
    }

    fn discover() -> Option<PathBuf> {
        let local = PathBuf::from(LOCAL_CONFIG_FILENAME);
        let user = std::env::var_os("HOME").map(|home| {
            PathBuf::from(home)
                .join(".config")
                .join("foldersort")
                .join("config.toml")
        });
        std::iter::once(local).chain(user).find(|path| path.is_file())
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => ConfigError::NotFound(path.to_path_buf()),
            _ => ConfigError::Read {
                path: path.to_path_buf(),
                source,
            },
        })?;
        tracing::debug!(path = %path.display(), "loaded filter configuration");
        text.parse()
    }

    /// Compiles every pattern up front so the scan only does lookups.
    ///
    /// # Errors
    ///
    /// Fails on the first invalid glob or regex.
    pub fn compile(&self) -> Result<CompiledFilters, ConfigError> {
        let section = &self.filters;

        let mut excluded = Vec::new();
        for pattern in &section.exclude.patterns {
            excluded.push(NameRule::Glob(glob(pattern)?));
        }
        for pattern in &section.exclude.regex {
            let regex = Regex::new(pattern).map_err(|source| ConfigError::Regex {
                pattern: pattern.clone(),
                source,
            })?;
            excluded.push(NameRule::Regex(regex));
        }

        Ok(CompiledFilters {
            sort_hidden: section.sort_hidden,
            names: section.exclude.filenames.iter().cloned().collect(),
            extensions: section
                .exclude
                .extensions
                .iter()
                .map(|ext| ext.trim_start_matches('.').to_lowercase())
                .collect(),
            excluded,
            included: section
                .include
                .patterns
                .iter()
                .map(|pattern| glob(pattern))
                .collect::<Result<_, _>>()?,
        })
    }
}

impl FromStr for FilterConfig {
    type Err = ConfigError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Ok(toml::from_str(text)?)
    }
}

fn glob(pattern: &str) -> Result<Pattern, ConfigError> {
    Pattern::new(pattern).map_err(|source| ConfigError::Glob {
        pattern: pattern.to_string(),
        source,
    })
}

#[derive(Debug, Clone)]
enum NameRule {
    Glob(Pattern),
    Regex(Regex),
}

impl NameRule {
    fn matches(&self, name: &str) -> bool {
        match self {
            NameRule::Glob(pattern) => pattern.matches(name),
            NameRule::Regex(regex) => regex.is_match(name),
        }
    }
}

/// Ready-to-match filters. The default lets every child through.
#[derive(Debug, Clone)]
pub struct CompiledFilters {
    sort_hidden: bool,
    names: HashSet<String>,
    extensions: HashSet<String>,
    excluded: Vec<NameRule>,
    included: Vec<Pattern>,
}

impl Default for CompiledFilters {
    fn default() -> Self {
        Self {
            sort_hidden: true,
            names: HashSet::new(),
            extensions: HashSet::new(),
            excluded: Vec::new(),
            included: Vec::new(),
        }
    }
}

impl CompiledFilters {
    /// Whether the root child called `name` takes part in sorting.
    pub fn should_include(&self, name: &str) -> bool {
        if self.included.iter().any(|pattern| pattern.matches(name)) {
            return true;
        }
        if !self.sort_hidden && name.starts_with('.') {
            return false;
        }
        if self.names.contains(name) {
            return false;
        }
        if let Some(ext) = Path::new(name).extension()
            && self.extensions.contains(&ext.to_string_lossy().to_lowercase())
        {
            return false;
        }
        !self.excluded.iter().any(|rule| rule.matches(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn compiled(toml: &str) -> CompiledFilters {
        toml.parse::<FilterConfig>()
            .expect("parse failed")
            .compile()
            .expect("compile failed")
    }

    #[test]
    fn test_empty_file_sorts_everything() {
        let filters = compiled("");
        for name in [".gitignore", "photo.png", "MyProject", "Thumbs.db"] {
            assert!(filters.should_include(name), "{} should be sorted", name);
        }
        assert!(CompiledFilters::default().should_include(".DS_Store"));
    }

    #[test]
    fn test_hidden_files_can_be_left_alone() {
        let filters = compiled("[filters]\nenable_hidden_files = false\n");

        assert!(!filters.should_include(".DS_Store"));
        assert!(!filters.should_include(".config"));
        assert!(filters.should_include("visible.txt"));
    }

    #[test]
    fn test_exclusions() {
        let filters = compiled(
            r#"
[filters.exclude]
filenames = ["Thumbs.db"]
extensions = [".TMP", "part"]
patterns = ["backup-*"]
regex = ["^~\\$"]
"#,
        );

        assert!(!filters.should_include("Thumbs.db"));
        assert!(!filters.should_include("session.tmp"));
        assert!(!filters.should_include("SESSION.Tmp"));
        assert!(!filters.should_include("movie.mkv.part"));
        assert!(!filters.should_include("backup-2024"));
        assert!(!filters.should_include("~$report.docx"));

        assert!(filters.should_include("thumbs.db.txt"));
        assert!(filters.should_include("report.docx"));
        assert!(filters.should_include("my-backup-2024"));
    }

    #[test]
    fn test_include_wins_over_exclusions() {
        let filters = compiled(
            r#"
[filters]
enable_hidden_files = false

[filters.exclude]
extensions = ["log"]

[filters.include]
patterns = [".env*", "keep-*.log"]
"#,
        );

        assert!(filters.should_include(".env.local"));
        assert!(filters.should_include("keep-this.log"));
        assert!(!filters.should_include(".other"));
        assert!(!filters.should_include("drop-this.log"));
    }

    #[test]
    fn test_invalid_patterns_fail_compilation() {
        let bad_regex: FilterConfig = "[filters.exclude]\nregex = [\"(unclosed\"]\n"
            .parse()
            .unwrap();
        assert!(matches!(bad_regex.compile(), Err(ConfigError::Regex { .. })));

        let bad_glob: FilterConfig = "[filters.include]\npatterns = [\"[z-a\"]\n"
            .parse()
            .unwrap();
        assert!(matches!(bad_glob.compile(), Err(ConfigError::Glob { .. })));
    }

    #[test]
    fn test_malformed_toml() {
        let result = "[filters\nenable_hidden_files = ".parse::<FilterConfig>();
        assert!(matches!(result, Err(ConfigError::Parse(_))));

        let result = "[filters]\nenable_hidden_files = \"yes\"\n".parse::<FilterConfig>();
        assert!(result.is_err());
    }

    #[test]
    fn test_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[filters.exclude]\nfilenames = [\"desktop.ini\"]\n").unwrap();

        let config = FilterConfig::load(Some(&path)).expect("load failed");

        assert_eq!(config.filters.exclude.filenames, vec!["desktop.ini"]);
        assert!(config.filters.sort_hidden);
    }

    #[test]
    fn test_explicit_missing_file() {
        let result = FilterConfig::load(Some(Path::new("/non/existent/config.toml")));
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }
}
