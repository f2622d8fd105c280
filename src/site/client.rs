use std::time::Duration;

use async_trait::async_trait;
use derive_more::Display;
#[cfg(test)]
use mockall::automock;
use reqwest::Client;
use serde::de::DeserializeOwned;
use url::Url;

use crate::entities::{
    about::AboutPayload,
    education::EducationRecord,
    envelope::{Envelope, Pagination},
    experience::ExperienceRecord,
    photo::PhotoRecord,
    project::{ProjectListQuery, ProjectPage, ProjectRecord},
    skill::SkillRecord,
};

/// Why a content fetch produced no data.
#[derive(Debug, Display, Clone, PartialEq)]
pub enum LoadError {
    #[display("Request failed: {_0}")]
    Transport(String),

    #[display("Unreadable response: {_0}")]
    Decode(String),

    #[display("{_0}")]
    Api(String),
}

/// Read access to the Content API.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ContentSource: Send + Sync {
    async fn fetch_skills(&self) -> Result<Vec<SkillRecord>, LoadError>;
    async fn fetch_education(&self) -> Result<Vec<EducationRecord>, LoadError>;
    async fn fetch_experience(&self) -> Result<Vec<ExperienceRecord>, LoadError>;
    async fn fetch_projects(&self, query: &ProjectListQuery) -> Result<ProjectPage, LoadError>;
    async fn fetch_about(&self) -> Result<AboutPayload, LoadError>;
    async fn fetch_gallery(&self) -> Result<Vec<PhotoRecord>, LoadError>;
}

/// Fetches envelopes over HTTP from a running Content API.
#[derive(Clone)]
pub struct HttpContentSource {
    client: Client,
    base_url: Url,
}

impl HttpContentSource {
    /// `base_url` is the API directory, e.g. `http://127.0.0.1:8080/php/`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, LoadError> {
        let mut base_url = base_url.to_string();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        let base_url = Url::parse(&base_url).map_err(|e| LoadError::Transport(e.to_string()))?;

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LoadError::Transport(e.to_string()))?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    async fn get_envelope<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&'static str, String)],
    ) -> Result<Envelope<T>, LoadError> {
        let url = self
            .base_url
            .join(endpoint)
            .map_err(|e| LoadError::Transport(e.to_string()))?;

        // Failures still carry an envelope, so the status code is not inspected.
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| LoadError::Transport(e.to_string()))?;

        let envelope: Envelope<T> = response
            .json()
            .await
            .map_err(|e| LoadError::Decode(e.to_string()))?;

        if !envelope.success {
            return Err(LoadError::Api(envelope.failure_message()));
        }
        Ok(envelope)
    }

    async fn get_data<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, LoadError> {
        self.get_envelope::<T>(endpoint, &[])
            .await?
            .data
            .ok_or_else(|| LoadError::Decode(format!("{endpoint} returned no data")))
    }
}

#[async_trait]
impl ContentSource for HttpContentSource {
    async fn fetch_skills(&self) -> Result<Vec<SkillRecord>, LoadError> {
        self.get_data("get_skills.php").await
    }

    async fn fetch_education(&self) -> Result<Vec<EducationRecord>, LoadError> {
        self.get_data("get_education.php").await
    }

    async fn fetch_experience(&self) -> Result<Vec<ExperienceRecord>, LoadError> {
        self.get_data("get_experience.php").await
    }

    async fn fetch_projects(&self, query: &ProjectListQuery) -> Result<ProjectPage, LoadError> {
        let envelope = self
            .get_envelope::<Vec<ProjectRecord>>("get_projects.php", &query.to_pairs())
            .await?;

        let data = envelope.data.unwrap_or_default();
        let pagination = envelope
            .pagination
            .unwrap_or_else(|| Pagination::new(data.len() as u64, data.len() as u32, 0));

        Ok(ProjectPage { data, pagination })
    }

    async fn fetch_about(&self) -> Result<AboutPayload, LoadError> {
        self.get_data("get_about.php").await
    }

    async fn fetch_gallery(&self) -> Result<Vec<PhotoRecord>, LoadError> {
        self.get_data("get_gallery.php").await
    }
}
