use anyhow::Context;
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE};

use crate::adapter_github::entity::Asset;
use crate::domain::entity::Repository;

impl crate::adapter_github::Client {
    pub(crate) async fn fetch_release_assets(
        &self,
        repo: &Repository,
        release_id: u64,
    ) -> anyhow::Result<Vec<Asset>> {
        let url = format!("{}/releases/{release_id}/assets", self.repo_url(repo));
        self.fetch_all(&url).await
    }

    /// Stream a file to the upload endpoint. The file is dropped once the
    /// request completes.
    pub(crate) async fn post_release_asset(
        &self,
        repo: &Repository,
        release_id: u64,
        name: &str,
        file: tokio::fs::File,
        size: u64,
    ) -> anyhow::Result<Asset> {
        let url = format!(
            "{}/repos/{}/{}/releases/{release_id}/assets",
            self.upload_url, repo.owner, repo.name
        );
        let body = reqwest::Body::wrap_stream(tokio_util::io::ReaderStream::new(file));
        let res = self
            .request(reqwest::Method::POST, &url)
            .query(&[("name", name)])
            .header(CONTENT_TYPE, "application/octet-stream")
            .header(CONTENT_LENGTH, size)
            .body(body)
            .send()
            .await
            .context("unable to upload")?;
        super::check_status(res)
            .await?
            .json()
            .await
            .context("unable to read response")
    }
}
