use std::path::Path;

use crate::domain::entity::Manifest;
use crate::error::Error;

/// Read and parse the YAML manifest describing the release assets.
#[tracing::instrument(err(Debug))]
pub fn load(path: &Path) -> crate::error::Result<Manifest> {
    let content = std::fs::read_to_string(path)
        .map_err(|err| Error::config_with(format!("error reading config file {path:?}"), err))?;
    let manifest: Manifest = serde_yaml::from_str(&content)
        .map_err(|err| Error::config_with(format!("error parsing config file {path:?}"), err))?;
    if manifest.owner.is_empty() || manifest.repo.is_empty() {
        return Err(Error::config(format!(
            "owner and repo must not be empty in config file {path:?}"
        )));
    }
    tracing::debug!(
        owner = %manifest.owner,
        repo = %manifest.repo,
        assets = manifest.assets.len(),
        "manifest loaded"
    );
    Ok(manifest)
}

#[cfg(test)]
mod tests {
    use crate::error::Error;

    #[test]
    fn should_load_manifest_from_file() {
        let file = temp_file::with_contents(
            b"owner: o\nrepo: r\nassets:\n  - source: dist/bin\n    githubName: bin-linux-amd64\n    optional: false\n",
        );
        let manifest = super::load(file.path()).unwrap();
        assert_eq!(manifest.owner, "o");
        assert_eq!(manifest.repo, "r");
        assert_eq!(manifest.assets.len(), 1);
        assert_eq!(manifest.assets[0].github_name, "bin-linux-amd64");
    }

    #[test]
    fn should_fail_on_missing_file() {
        let path = temp_file::empty().path().with_extension("yaml");
        let err = super::load(&path).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn should_fail_on_invalid_yaml() {
        let file = temp_file::with_contents(b"owner: [o\n");
        let err = super::load(file.path()).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn should_reject_empty_repo() {
        let file = temp_file::with_contents(b"owner: o\nrepo: \"\"\n");
        let err = super::load(file.path()).unwrap_err();
        assert!(matches!(
            err,
            Error::Config { ref message, source: None } if message.starts_with("owner and repo must not be empty")
        ));
    }

    #[test]
    fn should_reject_missing_repo() {
        let file = temp_file::with_contents(b"owner: o\n");
        let err = super::load(file.path()).unwrap_err();
        assert!(matches!(err, Error::Config { source: Some(_), .. }));
    }
}
