use std::time::Duration;

use indicatif::ProgressBar;
use thiserror::Error;
use tokio::time::Instant;

use crate::loader::{DataSource, LoadError, Loader};
use crate::output::RenderedPage;
use crate::render::{self, MemoryRenderer, RenderOutcome, Renderer, Route};

#[derive(Clone, Debug)]
pub struct Options {
    pub data_source: String,
    pub page: String,
    pub timeout_seconds: u64,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            data_source: "./".to_string(),
            page: "index.html".to_string(),
            timeout_seconds: 10,
        }
    }
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("invalid data source '{value}': {message}")]
    InvalidDataSource { value: String, message: String },

    #[error("unknown page: {message}")]
    UnknownPage { message: String },

    #[error("invalid timeout {value}, expected positive seconds")]
    InvalidTimeout { value: u64 },

    #[error(transparent)]
    Load(#[from] LoadError),
}

#[derive(Clone, Debug)]
pub struct RenderResult {
    pub elapsed: Duration,
    pub outcome: RenderOutcome,
    pub page: RenderedPage,
}

#[derive(Clone, Debug)]
pub struct Runner {
    route: Route,
    loader: Loader,
}

impl Runner {
    pub fn new(options: Options) -> Result<Self, RunnerError> {
        if options.timeout_seconds == 0 {
            return Err(RunnerError::InvalidTimeout {
                value: options.timeout_seconds,
            });
        }
        let source = DataSource::parse(&options.data_source).map_err(|message| {
            RunnerError::InvalidDataSource {
                value: options.data_source.clone(),
                message,
            }
        })?;
        let route =
            Route::parse(&options.page).map_err(|message| RunnerError::UnknownPage { message })?;
        let loader = Loader::new(source, options.timeout_seconds)?;
        Ok(Self { route, loader })
    }

    pub fn with_progress(mut self, pb: ProgressBar) -> Self {
        self.loader = self.loader.with_progress(pb);
        self
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn loader(&self) -> &Loader {
        &self.loader
    }

    /// Renders the configured route into any sink.
    pub async fn render_into<R: Renderer>(
        &self,
        renderer: &mut R,
    ) -> Result<RenderOutcome, RunnerError> {
        Ok(render::dispatch(&self.route, &self.loader, renderer).await?)
    }

    /// Renders the configured route and captures the containers.
    pub async fn run(&self) -> Result<RenderResult, RunnerError> {
        let started_at = Instant::now();
        let mut mem = MemoryRenderer::new();
        let outcome = self.render_into(&mut mem).await?;
        let page = RenderedPage::new(&self.route, mem);
        Ok(RenderResult {
            elapsed: started_at.elapsed(),
            outcome,
            page,
        })
    }
}
