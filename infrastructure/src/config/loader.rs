//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};

/// Directory name under the user's config dir
const APP_DIR: &str = "judge-panel";

/// Project-level file names, checked in order
const PROJECT_FILES: [&str; 2] = ["panel.toml", ".panel.toml"];

/// Prefix for environment overrides (`PANEL_DISPATCH__DEADLINE_SECONDS=30`)
const ENV_PREFIX: &str = "PANEL_";

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. `PANEL_*` environment variables
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./panel.toml` or `./.panel.toml`
    /// 4. Global: `$XDG_CONFIG_HOME/judge-panel/config.toml`
    /// 5. Default values
    pub fn load(config_path: Option<&Path>) -> Result<FileConfig, Box<figment::Error>> {
        if let Some(path) = config_path
            && !path.exists()
        {
            return Err(Box::new(figment::Error::from(format!(
                "config file not found: {}",
                path.display()
            ))));
        }

        Self::figment(
            Self::global_config_path().as_deref(),
            Self::project_config_path().as_deref(),
            config_path,
        )
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()
        .map_err(Box::new)
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    /// File sources merged over the defaults, lowest priority first
    fn figment(global: Option<&Path>, project: Option<&Path>, explicit: Option<&Path>) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        for path in [global, project, explicit].into_iter().flatten() {
            if path.exists() {
                figment = figment.merge(Toml::file(path));
            }
        }

        figment
    }

    /// Get the global config file path
    ///
    /// `$XDG_CONFIG_HOME/judge-panel/config.toml`, or the platform equivalent.
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(APP_DIR).join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    /// Describe the config file locations being used (for --show-config)
    pub fn describe_sources(explicit: Option<&Path>) -> String {
        let mut out = String::from("Configuration sources (in priority order):\n");
        out.push_str(&format!("  [ENV  ] {}* variables\n", ENV_PREFIX));

        if let Some(path) = explicit {
            let mark = if path.exists() { "FOUND" } else { "MISSING" };
            out.push_str(&format!("  [{}] --config: {}\n", mark, path.display()));
        }

        match Self::project_config_path() {
            Some(path) => out.push_str(&format!("  [FOUND] Project: {}\n", path.display())),
            None => out.push_str("  [     ] Project: ./panel.toml or ./.panel.toml\n"),
        }

        if let Some(path) = Self::global_config_path() {
            let mark = if path.exists() { "FOUND" } else { "     " };
            out.push_str(&format!("  [{}] Global:  {}\n", mark, path.display()));
        }

        out.push_str("  [     ] Default: built-in defaults\n");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, body: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn test_load_defaults() {
        let config = ConfigLoader::load_defaults();
        assert!(config.backends.is_empty());
        assert_eq!(config.dispatch.max_concurrency, 5);
    }

    #[test]
    fn test_global_config_path_returns_some() {
        let path = ConfigLoader::global_config_path();
        assert!(path.is_some());
        assert!(path.unwrap().to_string_lossy().contains(APP_DIR));
    }

    #[test]
    fn test_explicit_file_over_defaults() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "panel.toml",
            r#"
[dispatch]
deadline_seconds = 10

[[backends]]
identity = "gpt-5-mini"
"#,
        );

        let config: FileConfig = ConfigLoader::figment(None, None, Some(path.as_path()))
            .extract()
            .unwrap();
        assert_eq!(config.dispatch.deadline_seconds, 10);
        assert_eq!(config.dispatch.max_concurrency, 5);
        assert_eq!(config.backends.len(), 1);
        assert_eq!(config.judge.0.identity, "gpt-4o-mini");
    }

    #[test]
    fn test_later_sources_win() {
        let dir = TempDir::new().unwrap();
        let global = write(
            &dir,
            "global.toml",
            r#"
[dispatch]
max_concurrency = 2
deadline_seconds = 90

[judge]
identity = "global-judge"
"#,
        );
        let project = write(
            &dir,
            "project.toml",
            r#"
[dispatch]
deadline_seconds = 20
"#,
        );
        let explicit = write(
            &dir,
            "explicit.toml",
            r#"
[judge]
identity = "explicit-judge"
"#,
        );

        let config: FileConfig =
            ConfigLoader::figment(Some(global.as_path()), Some(project.as_path()), Some(explicit.as_path()))
                .extract()
                .unwrap();
        assert_eq!(config.dispatch.max_concurrency, 2);
        assert_eq!(config.dispatch.deadline_seconds, 20);
        assert_eq!(config.judge.0.identity, "explicit-judge");
    }

    #[test]
    fn test_missing_sources_are_skipped() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.toml");
        let config: FileConfig = ConfigLoader::figment(Some(missing.as_path()), None, None)
            .extract()
            .unwrap();
        assert!(config.backends.is_empty());
    }

    #[test]
    fn test_load_rejects_missing_explicit_path() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.toml");
        let err = ConfigLoader::load(Some(missing.as_path())).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "bad.toml", "[dispatch]\nmax_concurrency = \"many\"\n");
        let result: Result<FileConfig, _> = ConfigLoader::figment(None, None, Some(path.as_path())).extract();
        assert!(result.is_err());
    }
}
