use std::borrow::Cow;
use std::path::PathBuf;

use anyhow::Context;

pub mod adapter_git;
pub mod adapter_github;
pub mod adapter_manifest;
pub mod domain;
pub mod error;
pub mod tracing;

pub use error::{Error, Result};

use domain::ReleaseReconciler;
use domain::entity::{AssetMapping, SyncReport};

fn maybe_env(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

fn with_env_or(name: &str, default_value: &'static str) -> Cow<'static, str> {
    std::env::var(name)
        .ok()
        .map(Cow::Owned)
        .unwrap_or(Cow::Borrowed(default_value))
}

fn with_env_as_or<T>(name: &str, default_value: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    <T as std::str::FromStr>::Err: std::error::Error + Send + Sync + 'static,
{
    let Ok(value) = std::env::var(name) else {
        return Ok(default_value);
    };
    value
        .parse::<T>()
        .with_context(|| format!("unable to parse value from {name:?}"))
}

/// Push build artifacts to a GitHub release.
///
/// GitHub credentials are read from `GITHUB_TOKEN`, or from `GITHUB_USER`
/// and `GITHUB_PASSWORD`.
#[derive(Clone, Debug, clap::Parser)]
#[command(name = "shipbot", version, about)]
pub struct Config {
    /// Tag to push as release.
    #[arg(long, env = "SHIPBOT_TAG", value_parser = clap::builder::NonEmptyStringValueParser::new())]
    pub tag: String,
    /// Commitish value that determines where the tag is created from.
    #[arg(long, env = "SHIPBOT_TARGET")]
    pub target: Option<String>,
    /// Manifest file listing the repository and its assets.
    #[arg(long, env = "SHIPBOT_CONFIG")]
    pub config: PathBuf,
    /// Directory in which the code was built, defaults to the current directory.
    #[arg(long, env = "SHIPBOT_BUILDDIR")]
    pub builddir: Option<PathBuf>,
    /// Log at debug level unless TRACING_LEVEL says otherwise.
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    pub fn build(self) -> Result<Application> {
        let manifest = adapter_manifest::load(&self.config)?;
        let build_dir = match self.builddir {
            Some(path) => path,
            None => std::env::current_dir()
                .map_err(|err| Error::config_with("error getting current directory", err))?,
        };
        let client = adapter_github::Config::from_env()?
            .build()
            .map_err(|err| Error::config_with("unable to build github client", err))?;
        let reconciler = ReleaseReconciler::new(
            client,
            adapter_git::SystemGit::new(build_dir),
            manifest.repository(),
        );
        Ok(Application {
            reconciler,
            tag: self.tag,
            target: self.target.filter(|value| !value.is_empty()),
            assets: manifest.assets,
        })
    }
}

/// A single release run, ready to go.
#[derive(Debug)]
pub struct Application {
    reconciler: ReleaseReconciler<adapter_github::Client, adapter_git::SystemGit>,
    tag: String,
    target: Option<String>,
    assets: Vec<AssetMapping>,
}

impl Application {
    pub async fn run(self) -> Result<SyncReport> {
        ::tracing::info!(
            repository = %self.reconciler.repository(),
            tag = %self.tag,
            assets = self.assets.len(),
            "starting release"
        );
        let report = self
            .reconciler
            .reconcile(&self.tag, self.target.as_deref(), &self.assets)
            .await?;
        ::tracing::info!(
            release.id = report.release.id,
            created = report.created,
            uploaded = report.uploaded,
            already_present = report.already_present,
            skipped = report.skipped,
            "release synchronized"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    #[test]
    fn should_parse_flags() {
        let config = super::Config::try_parse_from([
            "shipbot",
            "--tag",
            "v1.0.0",
            "--config",
            "release.yaml",
            "--builddir",
            "/src",
        ])
        .unwrap();
        assert_eq!(config.tag, "v1.0.0");
        assert_eq!(config.target, None);
        assert_eq!(config.config, std::path::PathBuf::from("release.yaml"));
        assert_eq!(config.builddir, Some(std::path::PathBuf::from("/src")));
    }

    #[test]
    fn should_require_tag_and_config() {
        assert!(super::Config::try_parse_from(["shipbot", "--config", "release.yaml"]).is_err());
        assert!(super::Config::try_parse_from(["shipbot", "--tag", "v1.0.0"]).is_err());
        assert!(
            super::Config::try_parse_from(["shipbot", "--tag", "", "--config", "release.yaml"])
                .is_err()
        );
    }

    #[test]
    fn should_report_unreadable_manifest_as_config_error() {
        let missing = temp_file::empty().path().with_extension("yaml");
        let config = super::Config {
            tag: "v1.0.0".into(),
            target: None,
            config: missing,
            builddir: None,
            verbose: false,
        };
        assert!(matches!(config.build(), Err(super::Error::Config { .. })));
    }
}
