pub mod report;

use serde::Serialize;

use crate::render::{MemoryRenderer, Page, Route};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    Html,
}

impl OutputFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "text" | "txt" => Some(Self::Text),
            "json" => Some(Self::Json),
            "html" | "htm" => Some(Self::Html),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Json => "json",
            Self::Html => "html",
        }
    }
}

pub fn infer_format_from_path(path: &str) -> Option<OutputFormat> {
    let lower = path.trim().to_lowercase();
    if lower.ends_with(".json") {
        return Some(OutputFormat::Json);
    }
    if lower.ends_with(".html") || lower.ends_with(".htm") {
        return Some(OutputFormat::Html);
    }
    if lower.ends_with(".txt") {
        return Some(OutputFormat::Text);
    }
    None
}

#[derive(Clone, Debug, Serialize)]
pub struct ContainerRecord {
    pub id: String,
    pub html: String,
}

/// Everything a page render produced, in container write order.
#[derive(Clone, Debug, Serialize)]
pub struct RenderedPage {
    pub page: String,
    pub route: String,
    pub title: String,
    pub containers: Vec<ContainerRecord>,
    #[serde(skip)]
    pub kind: Page,
}

impl RenderedPage {
    pub fn new(route: &Route, renderer: MemoryRenderer) -> Self {
        Self {
            page: route.page.file_name().to_string(),
            route: route.to_string(),
            title: route.page.title().to_string(),
            containers: renderer
                .into_entries()
                .into_iter()
                .map(|(id, html)| ContainerRecord { id, html })
                .collect(),
            kind: route.page,
        }
    }

    pub fn content(&self, id: &str) -> Option<&str> {
        self.containers
            .iter()
            .find(|c| c.id == id)
            .map(|c| c.html.as_str())
    }
}

pub fn render_text(page: &RenderedPage) -> Vec<u8> {
    let mut out = String::new();
    for c in page.containers.iter() {
        out.push_str(&c.id);
        out.push_str(":\n");
        out.push_str(&c.html);
        out.push_str("\n\n");
    }
    out.into_bytes()
}

pub fn render_json(page: &RenderedPage) -> Vec<u8> {
    let mut out = serde_json::to_vec_pretty(page).unwrap_or_else(|_| b"{}".to_vec());
    out.push(b'\n');
    out
}

pub fn render_html(page: &RenderedPage) -> Vec<u8> {
    report::render_html(page)
}

pub fn render(page: &RenderedPage, format: OutputFormat) -> Vec<u8> {
    match format {
        OutputFormat::Text => render_text(page),
        OutputFormat::Json => render_json(page),
        OutputFormat::Html => render_html(page),
    }
}
