use anyhow::Context;

use crate::adapter_github::entity::{CreateRelease, Release};
use crate::domain::entity::{NewRelease, Repository};

impl crate::adapter_github::Client {
    pub(crate) async fn fetch_releases(&self, repo: &Repository) -> anyhow::Result<Vec<Release>> {
        let url = format!("{}/releases", self.repo_url(repo));
        self.fetch_all(&url).await
    }

    pub(crate) async fn post_release(
        &self,
        repo: &Repository,
        release: &NewRelease,
    ) -> anyhow::Result<Release> {
        let url = format!("{}/releases", self.repo_url(repo));
        let res = self
            .request(reqwest::Method::POST, &url)
            .json(&CreateRelease::from(release))
            .send()
            .await
            .context("unable to request")?;
        super::check_status(res)
            .await?
            .json()
            .await
            .context("unable to read response")
    }
}
