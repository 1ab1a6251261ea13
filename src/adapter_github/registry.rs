use crate::domain::entity::{NewRelease, Release, ReleaseAsset, Repository};

impl crate::domain::prelude::ReleaseRegistry for super::Client {
    #[tracing::instrument(skip_all, fields(repository = %repo), err(Debug))]
    async fn list_releases(&self, repo: &Repository) -> anyhow::Result<Vec<Release>> {
        let list = self.fetch_releases(repo).await?;
        Ok(list.into_iter().map(Release::from).collect())
    }

    #[tracing::instrument(skip_all, fields(repository = %repo, tag = %release.tag_name), err(Debug))]
    async fn create_release(&self, repo: &Repository, release: &NewRelease) -> anyhow::Result<Release> {
        self.post_release(repo, release).await.map(Release::from)
    }

    #[tracing::instrument(skip(self, repo), fields(repository = %repo), err(Debug))]
    async fn list_release_assets(
        &self,
        repo: &Repository,
        release_id: u64,
    ) -> anyhow::Result<Vec<ReleaseAsset>> {
        let list = self.fetch_release_assets(repo, release_id).await?;
        Ok(list.into_iter().map(ReleaseAsset::from).collect())
    }

    #[tracing::instrument(skip(self, repo, file), fields(repository = %repo), err(Debug))]
    async fn upload_release_asset(
        &self,
        repo: &Repository,
        release_id: u64,
        name: &str,
        file: tokio::fs::File,
        size: u64,
    ) -> anyhow::Result<ReleaseAsset> {
        self.post_release_asset(repo, release_id, name, file, size)
            .await
            .map(ReleaseAsset::from)
    }
}
