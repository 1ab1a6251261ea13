use anyhow::Context;
use serde::de::DeserializeOwned;

use crate::adapter_github::entity::Pagination;

mod assets;
mod releases;

const PAGE_SIZE: u32 = 100;

impl crate::adapter_github::Client {
    fn repo_url(&self, repo: &crate::domain::entity::Repository) -> String {
        format!("{}/repos/{}/{}", self.base_url, repo.owner, repo.name)
    }

    /// Walk every page of a listing endpoint until a short page comes back.
    async fn fetch_all<T: DeserializeOwned>(&self, url: &str) -> anyhow::Result<Vec<T>> {
        let mut result = Vec::new();
        let mut page_index = 0;
        loop {
            page_index += 1;
            let res = self
                .request(reqwest::Method::GET, url)
                .query(&Pagination::new(page_index, PAGE_SIZE))
                .send()
                .await
                .context("unable to request")?;
            let page: Vec<T> = check_status(res)
                .await?
                .json()
                .await
                .context("unable to read response")?;
            let has_more = page.len() >= PAGE_SIZE as usize;
            tracing::debug!(page = page_index, count = page.len(), "fetched page");
            result.extend(page);
            if !has_more {
                return Ok(result);
            }
        }
    }
}

/// Turn a non 2xx response into an error carrying the response body.
async fn check_status(res: reqwest::Response) -> anyhow::Result<reqwest::Response> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }
    let url = res.url().clone();
    let body = res.text().await.unwrap_or_default();
    anyhow::bail!("unexpected status {status} from {url}: {body}")
}
