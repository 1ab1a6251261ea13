//! Payloads of the GitHub REST API.
//!
//! Fields the API may omit are defaulted here so the domain never deals with
//! missing values.

use crate::domain::entity;

#[derive(Debug, serde::Deserialize)]
pub(crate) struct Asset {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub size: u64,
}

impl From<Asset> for entity::ReleaseAsset {
    fn from(value: Asset) -> Self {
        Self {
            id: value.id,
            name: value.name,
            size: value.size,
        }
    }
}

#[derive(Debug, serde::Deserialize)]
pub(crate) struct Release {
    pub id: u64,
    #[serde(default)]
    pub tag_name: String,
    #[serde(default)]
    pub target_commitish: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub draft: bool,
}

impl From<Release> for entity::Release {
    fn from(value: Release) -> Self {
        Self {
            id: value.id,
            tag_name: value.tag_name,
            target_commitish: value.target_commitish,
            name: value.name,
            draft: value.draft,
        }
    }
}

#[derive(Debug, serde::Serialize)]
pub(crate) struct CreateRelease<'a> {
    pub tag_name: &'a str,
    pub target_commitish: &'a str,
    pub name: &'a str,
    pub body: &'a str,
    pub draft: bool,
}

impl<'a> From<&'a entity::NewRelease> for CreateRelease<'a> {
    fn from(value: &'a entity::NewRelease) -> Self {
        Self {
            tag_name: &value.tag_name,
            target_commitish: &value.target_commitish,
            name: &value.name,
            body: &value.body,
            draft: value.draft,
        }
    }
}

#[derive(Clone, Copy, Debug, serde::Serialize)]
pub(crate) struct Pagination {
    pub per_page: u32,
    pub page: u32,
}

impl Pagination {
    pub fn new(page: u32, per_page: u32) -> Self {
        Self { per_page, page }
    }
}
