//! Run settings, merged from the optional TOML file and the command line

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use kubeskew_metrics::{DEFAULT_SITE, DatadogConfig};
use kubeskew_types::ZONE_LABEL;

use crate::Args;

/// Contents of the `--config` file
#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub kubeconfig: Option<PathBuf>,
    pub context: Option<String>,
    pub zone_label: Option<String>,
    pub metrics: MetricsFileConfig,
}

/// `[metrics]` table of the config file
#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct MetricsFileConfig {
    pub enabled: bool,
    pub site: Option<String>,
    pub api_key: Option<String>,
    pub app_key: Option<String>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

/// Effective settings for one run
#[derive(Debug)]
pub struct Settings {
    pub kubeconfig: Option<PathBuf>,
    pub context: Option<String>,
    pub zone_label: String,
    /// `Some` when metric submission is enabled
    pub metrics: Option<DatadogConfig>,
}

impl Settings {
    /// Load the config file named by `--config`, if any, and apply the CLI on top
    pub fn from_args(args: &Args) -> Result<Self> {
        let file = match &args.config {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };
        Self::resolve(args, file)
    }

    /// Command-line values take precedence over file values
    fn resolve(args: &Args, file: FileConfig) -> Result<Self> {
        let zone_label = args
            .zone_label
            .clone()
            .or(file.zone_label)
            .unwrap_or_else(|| ZONE_LABEL.to_string());

        if zone_label.is_empty() {
            bail!("Zone label must not be empty");
        }

        let metrics = if args.submit_metrics || file.metrics.enabled {
            let Some(api_key) = args.datadog_api_key.clone().or(file.metrics.api_key) else {
                bail!("Metric submission is enabled but no Datadog API key is set (DD_API_KEY)");
            };
            let site = args
                .datadog_site
                .clone()
                .or(file.metrics.site)
                .unwrap_or_else(|| DEFAULT_SITE.to_string());
            let app_key = args.datadog_app_key.clone().or(file.metrics.app_key);

            Some(DatadogConfig::for_site(&site, api_key).with_app_key(app_key))
        } else {
            None
        };

        Ok(Self {
            kubeconfig: args.kubeconfig.clone().or(file.kubeconfig),
            context: args.context.clone().or(file.context),
            zone_label,
            metrics,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn bare_args() -> Args {
        Args {
            kubeconfig: None,
            context: None,
            zone_label: None,
            submit_metrics: false,
            datadog_site: None,
            datadog_api_key: None,
            datadog_app_key: None,
            config: None,
        }
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::resolve(&bare_args(), FileConfig::default()).unwrap();
        assert_eq!(settings.zone_label, "topology.kubernetes.io/zone");
        assert!(settings.metrics.is_none());
        assert!(settings.kubeconfig.is_none());
        assert!(settings.context.is_none());
    }

    #[test]
    fn test_parse_file() {
        let file = FileConfig::parse(
            r#"
            context = "prod"
            zone_label = "topology.kubernetes.io/region"

            [metrics]
            enabled = true
            site = "datadoghq.eu"
            api_key = "file-key"
            "#,
        )
        .unwrap();

        assert_eq!(file.context.as_deref(), Some("prod"));
        assert!(file.metrics.enabled);
        assert_eq!(file.metrics.api_key.as_deref(), Some("file-key"));
        assert!(file.metrics.app_key.is_none());
    }

    #[test]
    fn test_unknown_keys_rejected() {
        assert!(FileConfig::parse("zone = \"a\"").is_err());
    }

    #[test]
    fn test_cli_overrides_file() {
        let mut args = bare_args();
        args.context = Some("staging".to_string());
        args.zone_label = Some("rack".to_string());

        let file = FileConfig {
            context: Some("prod".to_string()),
            zone_label: Some("topology.kubernetes.io/region".to_string()),
            kubeconfig: Some(PathBuf::from("/etc/kube/config")),
            ..Default::default()
        };

        let settings = Settings::resolve(&args, file).unwrap();
        assert_eq!(settings.context.as_deref(), Some("staging"));
        assert_eq!(settings.zone_label, "rack");
        assert_eq!(settings.kubeconfig, Some(PathBuf::from("/etc/kube/config")));
    }

    #[test]
    fn test_metrics_from_file() {
        let file = FileConfig {
            metrics: MetricsFileConfig {
                enabled: true,
                site: Some("datadoghq.eu".to_string()),
                api_key: Some("file-key".to_string()),
                app_key: Some("file-app".to_string()),
            },
            ..Default::default()
        };

        let metrics = Settings::resolve(&bare_args(), file).unwrap().metrics.unwrap();
        assert_eq!(metrics.base_url, "https://api.datadoghq.eu");
        assert_eq!(metrics.api_key, "file-key");
        assert_eq!(metrics.app_key.as_deref(), Some("file-app"));
    }

    #[test]
    fn test_metrics_flag_with_cli_key() {
        let mut args = bare_args();
        args.submit_metrics = true;
        args.datadog_api_key = Some("cli-key".to_string());

        let metrics = Settings::resolve(&args, FileConfig::default())
            .unwrap()
            .metrics
            .unwrap();
        assert_eq!(metrics.base_url, "https://api.datadoghq.com");
        assert_eq!(metrics.api_key, "cli-key");
    }

    #[test]
    fn test_metrics_without_api_key() {
        let mut args = bare_args();
        args.submit_metrics = true;

        let err = Settings::resolve(&args, FileConfig::default()).unwrap_err();
        assert!(err.to_string().contains("API key"));
    }

    #[test]
    fn test_load_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "zone_label = \"rack\"").unwrap();

        let mut args = bare_args();
        args.config = Some(file.path().to_path_buf());

        let settings = Settings::from_args(&args).unwrap();
        assert_eq!(settings.zone_label, "rack");
    }

    #[test]
    fn test_missing_config_file() {
        let mut args = bare_args();
        args.config = Some(PathBuf::from("/nonexistent/kubeskew.toml"));
        assert!(Settings::from_args(&args).is_err());
    }
}
