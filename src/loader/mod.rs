use std::path::{Path, PathBuf};
use std::time::Duration;

use futures::future::try_join_all;
use indicatif::ProgressBar;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::model::{Dataset, Datasets};

const USER_AGENT: &str = concat!("storedash/", env!("CARGO_PKG_VERSION"));

/// Where the `data/<name>.json` resources are read from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DataSource {
    Directory(PathBuf),
    Http(reqwest::Url),
}

impl DataSource {
    /// Accepts either an `http(s)://` base URL or a filesystem path.
    pub fn parse(value: &str) -> Result<Self, String> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err("data source is empty".to_string());
        }
        let lower = trimmed.to_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            let mut base = trimmed.to_string();
            if !base.ends_with('/') {
                base.push('/');
            }
            let url = reqwest::Url::parse(&base).map_err(|e| format!("invalid base URL: {e}"))?;
            return Ok(Self::Http(url));
        }
        Ok(Self::Directory(PathBuf::from(trimmed)))
    }
}

impl std::fmt::Display for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataSource::Directory(root) => write!(f, "{}", root.display()),
            DataSource::Http(base) => write!(f, "{base}"),
        }
    }
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {dataset}: {path}: {source}")]
    Read {
        dataset: Dataset,
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid URL for {dataset}: {message}")]
    Url { dataset: Dataset, message: String },

    #[error("failed to fetch {dataset}: {url}: {source}")]
    Http {
        dataset: Dataset,
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to fetch {dataset}: {url}: HTTP {status}")]
    Status {
        dataset: Dataset,
        url: String,
        status: u16,
    },

    #[error("failed to parse {dataset}: {source}")]
    Parse {
        dataset: Dataset,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to build HTTP client: {source}")]
    HttpClientBuild {
        #[source]
        source: reqwest::Error,
    },
}

#[derive(Clone, Debug)]
pub struct Loader {
    source: DataSource,
    client: reqwest::Client,
    progress: Option<ProgressBar>,
}

impl Loader {
    pub fn new(source: DataSource, timeout_seconds: u64) -> Result<Self, LoadError> {
        let client = build_client(timeout_seconds)?;
        Ok(Self {
            source,
            client,
            progress: None,
        })
    }

    /// Advance `pb` by one for every resource that finishes loading.
    pub fn with_progress(mut self, pb: ProgressBar) -> Self {
        self.progress = Some(pb);
        self
    }

    pub fn source(&self) -> &DataSource {
        &self.source
    }

    /// Fetches every requested dataset concurrently. Either all of them load
    /// and parse, or the first error is returned and nothing is kept.
    pub async fn load(&self, datasets: &[Dataset]) -> Result<Datasets, LoadError> {
        let mut wanted = datasets.to_vec();
        wanted.sort();
        wanted.dedup();

        let fetched = try_join_all(wanted.iter().map(|d| self.fetch_counted(*d))).await?;

        let mut out = Datasets::default();
        for (dataset, body) in fetched {
            match dataset {
                Dataset::Orders => out.orders = parse(dataset, &body)?,
                Dataset::OrderItems => out.order_items = parse(dataset, &body)?,
                Dataset::Payments => out.payments = parse(dataset, &body)?,
                Dataset::Deliveries => out.deliveries = parse(dataset, &body)?,
                Dataset::Customers => out.customers = parse(dataset, &body)?,
                Dataset::Products => out.products = parse(dataset, &body)?,
                Dataset::ServiceRequests => out.service_requests = parse(dataset, &body)?,
            }
        }
        Ok(out)
    }

    async fn fetch_counted(&self, dataset: Dataset) -> Result<(Dataset, Vec<u8>), LoadError> {
        let body = self.fetch(dataset).await?;
        if let Some(pb) = self.progress.as_ref() {
            pb.inc(1);
        }
        Ok((dataset, body))
    }

    async fn fetch(&self, dataset: Dataset) -> Result<Vec<u8>, LoadError> {
        match &self.source {
            DataSource::Directory(root) => read_file(root, dataset).await,
            DataSource::Http(base) => fetch_url(&self.client, base, dataset).await,
        }
    }
}

fn build_client(timeout_seconds: u64) -> Result<reqwest::Client, LoadError> {
    let mut headers = reqwest::header::HeaderMap::new();
    headers.insert(
        reqwest::header::USER_AGENT,
        reqwest::header::HeaderValue::from_static(USER_AGENT),
    );
    headers.insert(
        reqwest::header::ACCEPT,
        reqwest::header::HeaderValue::from_static("application/json"),
    );
    reqwest::Client::builder()
        .default_headers(headers)
        .timeout(Duration::from_secs(timeout_seconds.max(1)))
        .build()
        .map_err(|source| LoadError::HttpClientBuild { source })
}

async fn read_file(root: &Path, dataset: Dataset) -> Result<Vec<u8>, LoadError> {
    let path = root.join(dataset.relative_path());
    tokio::fs::read(&path)
        .await
        .map_err(|source| LoadError::Read {
            dataset,
            path: path.to_string_lossy().to_string(),
            source,
        })
}

async fn fetch_url(
    client: &reqwest::Client,
    base: &reqwest::Url,
    dataset: Dataset,
) -> Result<Vec<u8>, LoadError> {
    let url = base
        .join(&dataset.relative_path())
        .map_err(|e| LoadError::Url {
            dataset,
            message: e.to_string(),
        })?;
    let resp = client
        .get(url.clone())
        .send()
        .await
        .map_err(|source| LoadError::Http {
            dataset,
            url: url.to_string(),
            source,
        })?;
    let status = resp.status();
    if !status.is_success() {
        return Err(LoadError::Status {
            dataset,
            url: url.to_string(),
            status: status.as_u16(),
        });
    }
    let body = resp.bytes().await.map_err(|source| LoadError::Http {
        dataset,
        url: url.to_string(),
        source,
    })?;
    Ok(body.to_vec())
}

fn parse<T: DeserializeOwned>(dataset: Dataset, body: &[u8]) -> Result<Vec<T>, LoadError> {
    serde_json::from_slice(body).map_err(|source| LoadError::Parse { dataset, source })
}
