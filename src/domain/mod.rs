use crate::error::{Error, Result};

pub mod entity;
pub mod prelude;

use entity::{
    AssetMapping, AssetOutcome, ExistingAssets, NewRelease, Release, Repository, SyncReport,
};
use prelude::{CommitResolver, ReleaseRegistry};

/// Makes the remote release of a tag match the local build output.
///
/// The release is created as a draft when it doesn't exist yet, then every
/// mapped file missing from the release gets uploaded. Assets already on the
/// release are compared by size only and never replaced.
#[derive(Debug)]
pub struct ReleaseReconciler<RR, CR> {
    registry: RR,
    resolver: CR,
    repository: Repository,
}

impl<RR, CR> ReleaseReconciler<RR, CR>
where
    RR: ReleaseRegistry,
    CR: CommitResolver,
{
    pub fn new(registry: RR, resolver: CR, repository: Repository) -> Self {
        Self {
            registry,
            resolver,
            repository,
        }
    }

    pub fn repository(&self) -> &Repository {
        &self.repository
    }

    /// Ensure the release exists, then push every missing asset.
    pub async fn reconcile(
        &self,
        tag: &str,
        explicit_target: Option<&str>,
        mappings: &[AssetMapping],
    ) -> Result<SyncReport> {
        let (release, created) = self.find_or_create_release(tag, explicit_target).await?;
        let outcomes = self.sync_assets(&release, mappings).await?;
        let mut report = SyncReport::new(release, created);
        for outcome in outcomes {
            report.record(outcome);
        }
        Ok(report)
    }

    /// Find the release for `tag`, creating a draft one when missing.
    ///
    /// An empty `explicit_target` counts as missing, in which case the target
    /// commit is resolved from the tag.
    pub async fn ensure_release(&self, tag: &str, explicit_target: Option<&str>) -> Result<Release> {
        self.find_or_create_release(tag, explicit_target)
            .await
            .map(|(release, _)| release)
    }

    #[tracing::instrument(skip(self, explicit_target), fields(repository = %self.repository))]
    async fn find_or_create_release(
        &self,
        tag: &str,
        explicit_target: Option<&str>,
    ) -> Result<(Release, bool)> {
        tracing::info!("listing github releases");
        let releases = self
            .registry
            .list_releases(&self.repository)
            .await
            .map_err(|source| Error::Registry {
                operation: "listing releases",
                repository: self.repository.to_string(),
                source,
            })?;

        // several releases can share a tag, the last one is kept
        let found = releases
            .into_iter()
            .filter(|release| release.tag_name == tag)
            .inspect(|release| tracing::info!(release.id = release.id, "found release"))
            .last();
        if let Some(release) = found {
            return Ok((release, false));
        }

        let target = match explicit_target.filter(|value| !value.is_empty()) {
            Some(value) => value.to_string(),
            None => self
                .resolver
                .resolve_commit(tag)
                .await
                .map_err(|source| Error::Resolution {
                    tag: tag.to_string(),
                    source,
                })?,
        };
        tracing::info!(target_commitish = %target, "creating github release");

        let release = self
            .registry
            .create_release(&self.repository, &NewRelease::draft(tag, target))
            .await
            .map_err(|source| Error::Registry {
                operation: "creating release",
                repository: self.repository.to_string(),
                source,
            })?;
        tracing::info!(release.id = release.id, "release created");
        Ok((release, true))
    }

    /// Upload the missing assets of a release, stopping at the first failure.
    #[tracing::instrument(skip_all, fields(repository = %self.repository, tag = %release.tag_name))]
    pub async fn sync_assets(
        &self,
        release: &Release,
        mappings: &[AssetMapping],
    ) -> Result<Vec<AssetOutcome>> {
        tracing::info!("listing github release assets");
        let existing: ExistingAssets = self
            .registry
            .list_release_assets(&self.repository, release.id)
            .await
            .map_err(|source| Error::Registry {
                operation: "listing release assets",
                repository: self.repository.to_string(),
                source,
            })?
            .into_iter()
            .collect();
        tracing::debug!(count = existing.len(), "existing assets");

        let mut outcomes = Vec::with_capacity(mappings.len());
        for mapping in mappings {
            outcomes.push(self.sync_asset(release, mapping, &existing).await?);
        }
        Ok(outcomes)
    }

    /// Reconcile a single mapping against the assets already on the release.
    #[tracing::instrument(skip_all, fields(asset = %mapping.github_name))]
    pub async fn sync_asset(
        &self,
        release: &Release,
        mapping: &AssetMapping,
        existing: &ExistingAssets,
    ) -> Result<AssetOutcome> {
        let local_size = match tokio::fs::metadata(&mapping.source).await {
            Ok(metadata) => metadata.len(),
            Err(err) if mapping.optional => {
                tracing::info!(source = ?mapping.source, error = %err, "optional source missing, skipping");
                return Ok(AssetOutcome::SkippedOptional);
            }
            Err(source) => {
                return Err(Error::SourceNotFound {
                    name: mapping.github_name.clone(),
                    path: mapping.source.clone(),
                    source,
                });
            }
        };

        if let Some(remote) = existing.get(&mapping.github_name) {
            if remote.size != local_size {
                return Err(Error::AssetConflict {
                    name: mapping.github_name.clone(),
                    remote_size: remote.size,
                    local_size,
                });
            }
            tracing::info!(size = local_size, "asset sizes match, assuming the same");
            return Ok(AssetOutcome::AlreadyPresent);
        }

        let upload_error = |source: anyhow::Error| Error::Upload {
            name: mapping.github_name.clone(),
            path: mapping.source.clone(),
            source,
        };

        let file = tokio::fs::File::open(&mapping.source)
            .await
            .map_err(|err| upload_error(anyhow::Error::new(err).context("unable to open file")))?;
        let absolute = std::path::absolute(&mapping.source).unwrap_or_else(|err| {
            tracing::debug!(source = ?mapping.source, error = %err, "unable to get absolute path");
            mapping.source.clone()
        });
        tracing::info!(path = %absolute.display(), size = local_size, "uploading");

        let asset = self
            .registry
            .upload_release_asset(
                &self.repository,
                release.id,
                &mapping.github_name,
                file,
                local_size,
            )
            .await
            .map_err(upload_error)?;
        tracing::info!(asset.id = asset.id, asset.size = asset.size, "uploaded asset");
        Ok(AssetOutcome::Uploaded)
    }
}
