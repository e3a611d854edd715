//! Run configuration resolution: file, then environment, then flags.

use crate::commands::{ColorArg, OverrideArgs};
use crate::error::{CliError, CliResult};
use std::path::Path;
use swagtest::{BackendKind, RunConfig, Target};

/// Color output choice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorChoice {
    /// Always use colors
    Always,
    /// Use colors when output is a terminal
    #[default]
    Auto,
    /// Never use colors
    Never,
}

impl ColorChoice {
    /// Should use colors based on output detection
    #[must_use]
    pub fn should_color(self) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => console::Term::stdout().features().colors_supported(),
        }
    }
}

impl From<ColorArg> for ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => Self::Auto,
            ColorArg::Always => Self::Always,
            ColorArg::Never => Self::Never,
        }
    }
}

/// Build the run configuration.
///
/// Later sources win: the YAML file (or defaults), then `CI` and
/// `SWAGTEST_*` variables read through `env`, then command-line flags.
pub fn resolve(
    file: Option<&Path>,
    overrides: &OverrideArgs,
    env: impl Fn(&str) -> Option<String>,
) -> CliResult<RunConfig> {
    let mut config = match file {
        Some(path) => RunConfig::from_file(path).map_err(|source| CliError::ConfigFile {
            path: path.to_path_buf(),
            source,
        })?,
        None => RunConfig::default(),
    };
    config.apply_env_from(env)?;
    apply_overrides(&mut config, overrides)?;
    config.validate()?;
    Ok(config)
}

fn apply_overrides(config: &mut RunConfig, overrides: &OverrideArgs) -> CliResult<()> {
    if overrides.ci {
        config.ci = true;
    }
    if let Some(url) = &overrides.base_url {
        config.base_url.clone_from(url);
    }
    if let Some(workers) = overrides.workers {
        config.workers = Some(workers);
    }
    if let Some(retries) = overrides.retries {
        config.retries = Some(retries);
    }
    if let Some(ms) = overrides.test_timeout_ms {
        config.test_timeout_ms = ms;
    }
    if let Some(dir) = &overrides.output_dir {
        config.output_dir.clone_from(dir);
    }
    if let Some(backend) = &overrides.backend {
        let backend = BackendKind::parse(backend)?;
        config.targets = vec![Target::for_backend(backend)];
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_sources() {
        let config = resolve(None, &OverrideArgs::default(), env(&[])).unwrap();
        assert_eq!(config.base_url, "https://www.saucedemo.com");
        assert_eq!(config.retries(), 0);
        assert_eq!(config.targets.len(), 1);
    }

    #[test]
    fn test_flags_beat_environment_beat_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("swagtest.yaml");
        std::fs::write(&path, "base_url: http://file.local\nretries: 1\nworkers: 4\n").unwrap();

        let overrides = OverrideArgs {
            workers: Some(2),
            ..OverrideArgs::default()
        };
        let config = resolve(
            Some(&path),
            &overrides,
            env(&[("SWAGTEST_BASE_URL", "http://env.local"), ("SWAGTEST_WORKERS", "8")]),
        )
        .unwrap();
        assert_eq!(config.base_url, "http://env.local");
        assert_eq!(config.workers(), 2);
        assert_eq!(config.retries(), 1);
    }

    #[test]
    fn test_ci_profile() {
        let config = resolve(None, &OverrideArgs::default(), env(&[("CI", "true")])).unwrap();
        assert_eq!(config.retries(), 2);
        assert_eq!(config.workers(), 1);

        let overrides = OverrideArgs {
            ci: true,
            retries: Some(0),
            ..OverrideArgs::default()
        };
        let config = resolve(None, &overrides, env(&[])).unwrap();
        assert_eq!(config.retries(), 0);
        assert_eq!(config.workers(), 1);
    }

    #[test]
    fn test_backend_flag_replaces_targets() {
        let overrides = OverrideArgs {
            backend: Some("chrome".to_string()),
            output_dir: Some(PathBuf::from("out")),
            ..OverrideArgs::default()
        };
        let config = resolve(None, &overrides, env(&[])).unwrap();
        assert_eq!(config.targets[0].backend, BackendKind::Chromium);
        assert_eq!(config.output_dir, PathBuf::from("out"));
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let zero_workers = OverrideArgs {
            workers: Some(0),
            ..OverrideArgs::default()
        };
        assert!(resolve(None, &zero_workers, env(&[])).is_err());

        let bad_backend = OverrideArgs {
            backend: Some("firefox".to_string()),
            ..OverrideArgs::default()
        };
        assert!(resolve(None, &bad_backend, env(&[])).is_err());
        assert!(resolve(None, &OverrideArgs::default(), env(&[("SWAGTEST_RETRIES", "lots")])).is_err());
    }

    #[test]
    fn test_missing_config_file_is_named() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.yaml");
        let err = resolve(Some(path.as_path()), &OverrideArgs::default(), env(&[])).unwrap_err();
        assert!(matches!(err, CliError::ConfigFile { path: ref p, .. } if *p == path));
        assert!(err.to_string().contains("absent.yaml"));
    }

    #[test]
    fn test_color_choice() {
        assert!(ColorChoice::from(ColorArg::Always).should_color());
        assert!(!ColorChoice::from(ColorArg::Never).should_color());
    }
}
