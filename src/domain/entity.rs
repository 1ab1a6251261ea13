use std::collections::HashMap;
use std::path::PathBuf;

/// Content of the manifest file: which repository to publish to and which
/// local files end up as release assets.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
pub struct Manifest {
    pub owner: String,
    pub repo: String,
    #[serde(default)]
    pub assets: Vec<AssetMapping>,
}

impl Manifest {
    pub fn repository(&self) -> Repository {
        Repository::new(&self.owner, &self.repo)
    }
}

/// Maps a local file to the name it gets on the release.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetMapping {
    pub source: PathBuf,
    pub github_name: String,
    #[serde(default)]
    pub optional: bool,
}

/// Owner and name of a remote repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Repository {
    pub owner: String,
    pub name: String,
}

impl Repository {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }
}

impl std::fmt::Display for Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Release {
    pub id: u64,
    pub tag_name: String,
    pub target_commitish: String,
    pub name: Option<String>,
    pub draft: bool,
}

/// Payload used to create a release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRelease {
    pub tag_name: String,
    pub target_commitish: String,
    pub name: String,
    pub body: String,
    pub draft: bool,
}

impl NewRelease {
    /// Draft release named after its tag.
    pub fn draft(tag: &str, target_commitish: impl Into<String>) -> Self {
        Self {
            tag_name: tag.to_string(),
            target_commitish: target_commitish.into(),
            name: tag.to_string(),
            body: format!("Release {tag} (draft)"),
            draft: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseAsset {
    pub id: u64,
    pub name: String,
    pub size: u64,
}

/// Assets already attached to a release, indexed by name.
///
/// When the registry returns several assets with the same name, the last one wins.
#[derive(Debug, Clone, Default)]
pub struct ExistingAssets(HashMap<String, ReleaseAsset>);

impl ExistingAssets {
    pub fn get(&self, name: &str) -> Option<&ReleaseAsset> {
        self.0.get(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<ReleaseAsset> for ExistingAssets {
    fn from_iter<T: IntoIterator<Item = ReleaseAsset>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|asset| (asset.name.clone(), asset))
                .collect(),
        )
    }
}

/// What happened to a single asset mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetOutcome {
    SkippedOptional,
    AlreadyPresent,
    Uploaded,
}

/// Summary of a complete reconciliation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub release: Release,
    pub created: bool,
    pub uploaded: usize,
    pub already_present: usize,
    pub skipped: usize,
}

impl SyncReport {
    pub(crate) fn new(release: Release, created: bool) -> Self {
        Self {
            release,
            created,
            uploaded: 0,
            already_present: 0,
            skipped: 0,
        }
    }

    pub(crate) fn record(&mut self, outcome: AssetOutcome) {
        match outcome {
            AssetOutcome::SkippedOptional => self.skipped += 1,
            AssetOutcome::AlreadyPresent => self.already_present += 1,
            AssetOutcome::Uploaded => self.uploaded += 1,
        }
    }
}
