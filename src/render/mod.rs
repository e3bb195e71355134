pub mod pages;

use std::fmt;

use crate::join::DuplicateReport;
use crate::loader::{LoadError, Loader};
use crate::model::{Dataset, Datasets};

/// One-way sink for rendered fragments, keyed by container id.
pub trait Renderer {
    fn set_content(&mut self, container: &str, html: String);
}

impl<R: Renderer + ?Sized> Renderer for &mut R {
    fn set_content(&mut self, container: &str, html: String) {
        (**self).set_content(container, html)
    }
}

/// Records every write in order. A later write to the same container
/// replaces the earlier content but keeps its position.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MemoryRenderer {
    writes: Vec<(String, String)>,
}

impl MemoryRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, container: &str) -> Option<&str> {
        self.writes
            .iter()
            .find(|(id, _)| id == container)
            .map(|(_, html)| html.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.writes.len()
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.writes.iter().map(|(id, html)| (id.as_str(), html.as_str()))
    }

    pub fn into_entries(self) -> Vec<(String, String)> {
        self.writes
    }
}

impl Renderer for MemoryRenderer {
    fn set_content(&mut self, container: &str, html: String) {
        match self.writes.iter_mut().find(|(id, _)| id == container) {
            Some(slot) => slot.1 = html,
            None => self.writes.push((container.to_string(), html)),
        }
    }
}

/// Forwards writes only for containers the page actually defines; anything
/// else is dropped without complaint.
#[derive(Debug)]
pub struct PageRenderer<R> {
    containers: &'static [&'static str],
    inner: R,
    skipped: Vec<String>,
}

impl<R: Renderer> PageRenderer<R> {
    pub fn new(page: Page, inner: R) -> Self {
        Self {
            containers: page.containers(),
            inner,
            skipped: Vec::new(),
        }
    }

    pub fn skipped(&self) -> &[String] {
        &self.skipped
    }
}

impl<R: Renderer> Renderer for PageRenderer<R> {
    fn set_content(&mut self, container: &str, html: String) {
        if self.containers.contains(&container) {
            self.inner.set_content(container, html);
        } else {
            self.skipped.push(container.to_string());
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Page {
    Dashboard,
    Orders,
    OrderDetail,
    Customers,
    Products,
    ServiceRequests,
}

impl Page {
    pub const ALL: [Page; 6] = [
        Page::Dashboard,
        Page::Orders,
        Page::OrderDetail,
        Page::Customers,
        Page::Products,
        Page::ServiceRequests,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            Page::Dashboard => "index.html",
            Page::Orders => "orders.html",
            Page::OrderDetail => "order-detail.html",
            Page::Customers => "customers.html",
            Page::Products => "products.html",
            Page::ServiceRequests => "service.html",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Page::Dashboard => "Dashboard",
            Page::Orders => "Orders",
            Page::OrderDetail => "Order Detail",
            Page::Customers => "Customers",
            Page::Products => "Products",
            Page::ServiceRequests => "Service Requests",
        }
    }

    pub fn from_file_name(name: &str) -> Option<Self> {
        let name = name.trim().trim_start_matches('/').to_lowercase();
        let stem = name.strip_suffix(".html").unwrap_or(&name);
        match stem {
            "" | "index" | "dashboard" => Some(Page::Dashboard),
            "orders" => Some(Page::Orders),
            "order-detail" | "order_detail" | "order" => Some(Page::OrderDetail),
            "customers" => Some(Page::Customers),
            "products" => Some(Page::Products),
            "service" | "services" | "service-requests" => Some(Page::ServiceRequests),
            _ => None,
        }
    }

    pub fn datasets(self) -> &'static [Dataset] {
        match self {
            Page::Dashboard => &[
                Dataset::Orders,
                Dataset::Customers,
                Dataset::Payments,
                Dataset::ServiceRequests,
            ],
            Page::Orders => &[Dataset::Orders, Dataset::Customers],
            Page::OrderDetail => &[
                Dataset::Orders,
                Dataset::Customers,
                Dataset::OrderItems,
                Dataset::Products,
                Dataset::Payments,
                Dataset::Deliveries,
            ],
            Page::Customers => &[Dataset::Customers, Dataset::Orders],
            Page::Products => &[
                Dataset::Products,
                Dataset::OrderItems,
                Dataset::ServiceRequests,
            ],
            Page::ServiceRequests => &[
                Dataset::ServiceRequests,
                Dataset::Customers,
                Dataset::Products,
            ],
        }
    }

    pub fn containers(self) -> &'static [&'static str] {
        match self {
            Page::Dashboard => &[
                pages::TOTAL_ORDERS,
                pages::TOTAL_REVENUE,
                pages::TOTAL_CUSTOMERS,
                pages::OPEN_REQUESTS,
                pages::STATUS_SUMMARY,
                pages::PAYMENT_SUMMARY,
                pages::RECENT_ORDERS,
            ],
            Page::Orders => &[pages::ORDERS_BODY],
            Page::OrderDetail => &[
                pages::ORDER_INFO,
                pages::ORDER_ITEMS,
                pages::PAYMENT_INFO,
                pages::DELIVERY_INFO,
            ],
            Page::Customers => &[pages::CUSTOMERS_BODY],
            Page::Products => &[pages::PRODUCTS_BODY],
            Page::ServiceRequests => &[pages::SERVICE_BODY],
        }
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

/// A page reference such as `order-detail.html?id=3`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Route {
    pub page: Page,
    pub query: Vec<(String, String)>,
}

impl Route {
    pub fn new(page: Page) -> Self {
        Self {
            page,
            query: Vec::new(),
        }
    }

    pub fn parse(value: &str) -> Result<Self, String> {
        let base = reqwest::Url::parse("http://storedash.local/")
            .map_err(|e| format!("invalid route base: {e}"))?;
        let url = base
            .join(value.trim())
            .map_err(|e| format!("invalid page '{value}': {e}"))?;
        let file = url
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .unwrap_or_default();
        let page =
            Page::from_file_name(file).ok_or_else(|| format!("unknown page '{}'", value.trim()))?;
        let query = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        Ok(Self { page, query })
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// The numeric `id` parameter; `None` when absent or not a number.
    pub fn id(&self) -> Option<u64> {
        self.param("id").and_then(|v| v.trim().parse::<u64>().ok())
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.page.file_name())?;
        for (i, (k, v)) in self.query.iter().enumerate() {
            let sep = if i == 0 { '?' } else { '&' };
            write!(f, "{sep}{k}={v}")?;
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum RenderOutcome {
    Rendered {
        page: Page,
        record_counts: Vec<(Dataset, usize)>,
        duplicates: DuplicateReport,
        /// Writes dropped because the page has no such container.
        skipped: Vec<String>,
    },
    Skipped {
        page: Page,
        reason: String,
    },
}

/// Checks whether a route can render at all, before any data is fetched.
pub fn precheck(route: &Route) -> Result<(), String> {
    match route.page {
        Page::OrderDetail if route.param("id").is_none() => Err("missing id parameter".to_string()),
        Page::OrderDetail if route.id().is_none() => Err(format!(
            "non-numeric id parameter '{}'",
            route.param("id").unwrap_or_default()
        )),
        _ => Ok(()),
    }
}

/// Renders already-loaded data for `route` into `renderer`.
pub fn render_loaded<R: Renderer>(
    route: &Route,
    data: &Datasets,
    renderer: &mut R,
) -> DuplicateReport {
    match route.page {
        Page::Dashboard => pages::render_dashboard(data, renderer),
        Page::Orders => pages::render_orders(data, renderer),
        Page::OrderDetail => match route.id() {
            Some(id) => pages::render_order_detail(data, id, renderer),
            None => DuplicateReport::default(),
        },
        Page::Customers => pages::render_customers(data, renderer),
        Page::Products => pages::render_products(data, renderer),
        Page::ServiceRequests => pages::render_service_requests(data, renderer),
    }
}

/// Router entry point: load what the page needs, then render it.
///
/// Nothing is written when the route is unusable or any dataset fails to
/// load.
pub async fn dispatch<R: Renderer>(
    route: &Route,
    loader: &Loader,
    renderer: &mut R,
) -> Result<RenderOutcome, LoadError> {
    if let Err(reason) = precheck(route) {
        return Ok(RenderOutcome::Skipped {
            page: route.page,
            reason,
        });
    }

    let data = loader.load(route.page.datasets()).await?;
    let mut page_renderer = PageRenderer::new(route.page, &mut *renderer);
    let duplicates = render_loaded(route, &data, &mut page_renderer);
    let skipped = page_renderer.skipped().to_vec();

    let record_counts = route
        .page
        .datasets()
        .iter()
        .map(|d| (*d, data.len_of(*d)))
        .collect();
    Ok(RenderOutcome::Rendered {
        page: route.page,
        record_counts,
        duplicates,
        skipped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn route_parses_page_and_id() {
        let route = Route::parse("order-detail.html?id=12").unwrap();
        assert_eq!(route.page, Page::OrderDetail);
        assert_eq!(route.id(), Some(12));
        assert_eq!(route.to_string(), "order-detail.html?id=12");
    }

    #[test]
    fn route_defaults_to_dashboard_and_rejects_unknown_pages() {
        assert_eq!(Route::parse("").unwrap().page, Page::Dashboard);
        assert_eq!(Route::parse("/index.html").unwrap().page, Page::Dashboard);
        assert_eq!(Route::parse("orders").unwrap().page, Page::Orders);
        assert!(Route::parse("admin.html").is_err());
    }

    #[test]
    fn non_numeric_id_is_none() {
        assert_eq!(Route::parse("order-detail.html?id=abc").unwrap().id(), None);
        assert_eq!(Route::parse("order-detail.html?id=-3").unwrap().id(), None);
        assert_eq!(Route::parse("order-detail.html").unwrap().id(), None);
    }

    #[test]
    fn precheck_only_gates_detail_page() {
        assert!(precheck(&Route::new(Page::Orders)).is_ok());
        assert!(precheck(&Route::new(Page::OrderDetail)).is_err());
        assert!(precheck(&Route::parse("order-detail.html?id=x").unwrap()).is_err());
        assert!(precheck(&Route::parse("order-detail.html?id=4").unwrap()).is_ok());
    }

    #[test]
    fn page_renderer_drops_unknown_containers() {
        let mut mem = MemoryRenderer::new();
        let mut page = PageRenderer::new(Page::Orders, &mut mem);
        page.set_content(pages::ORDERS_BODY, "<tr></tr>".to_string());
        page.set_content(pages::ORDER_INFO, "<p></p>".to_string());
        assert_eq!(page.skipped(), &[pages::ORDER_INFO.to_string()]);
        drop(page);
        assert_eq!(mem.len(), 1);
        assert_eq!(mem.get(pages::ORDERS_BODY), Some("<tr></tr>"));
    }

    #[test]
    fn memory_renderer_replaces_in_place() {
        let mut mem = MemoryRenderer::new();
        mem.set_content("a", "1".to_string());
        mem.set_content("b", "2".to_string());
        mem.set_content("a", "3".to_string());
        let entries: Vec<_> = mem.entries().collect();
        assert_eq!(entries, vec![("a", "3"), ("b", "2")]);
    }

    #[test]
    fn every_page_round_trips_through_its_file_name() {
        for page in Page::ALL {
            assert_eq!(Page::from_file_name(page.file_name()), Some(page));
        }
    }
}
