use super::entity::*;

/// Remote registry holding releases and their assets (e.g. GitHub Releases).
pub trait ReleaseRegistry: Send + Sync + 'static {
    /// List every release of the repository, drafts included.
    fn list_releases(
        &self,
        repo: &Repository,
    ) -> impl Future<Output = anyhow::Result<Vec<Release>>> + Send;

    /// Create a new release and return it with its assigned identifier.
    fn create_release(
        &self,
        repo: &Repository,
        release: &NewRelease,
    ) -> impl Future<Output = anyhow::Result<Release>> + Send;

    /// List every asset already attached to a release.
    fn list_release_assets(
        &self,
        repo: &Repository,
        release_id: u64,
    ) -> impl Future<Output = anyhow::Result<Vec<ReleaseAsset>>> + Send;

    /// Upload the content of `file` as a new asset named `name`.
    fn upload_release_asset(
        &self,
        repo: &Repository,
        release_id: u64,
        name: &str,
        file: tokio::fs::File,
        size: u64,
    ) -> impl Future<Output = anyhow::Result<ReleaseAsset>> + Send;
}

#[cfg(test)]
mockall::mock! {
    pub ReleaseRegistry {}

    impl ReleaseRegistry for ReleaseRegistry {
        fn list_releases(
            &self,
            repo: &Repository,
        ) -> impl Future<Output = anyhow::Result<Vec<Release>>> + Send;

        fn create_release(
            &self,
            repo: &Repository,
            release: &NewRelease,
        ) -> impl Future<Output = anyhow::Result<Release>> + Send;

        fn list_release_assets(
            &self,
            repo: &Repository,
            release_id: u64,
        ) -> impl Future<Output = anyhow::Result<Vec<ReleaseAsset>>> + Send;

        fn upload_release_asset(
            &self,
            repo: &Repository,
            release_id: u64,
            name: &str,
            file: tokio::fs::File,
            size: u64,
        ) -> impl Future<Output = anyhow::Result<ReleaseAsset>> + Send;
    }
}

/// Maps a tag to the full identifier of the commit it points to.
pub trait CommitResolver: Send + Sync + 'static {
    fn resolve_commit(&self, tag: &str) -> impl Future<Output = anyhow::Result<String>> + Send;
}

#[cfg(test)]
mockall::mock! {
    pub CommitResolver {}

    impl CommitResolver for CommitResolver {
        fn resolve_commit(&self, tag: &str) -> impl Future<Output = anyhow::Result<String>> + Send;
    }
}
