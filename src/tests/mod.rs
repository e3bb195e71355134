use std::path::PathBuf;

use tempfile::TempDir;

use crate::loader::{DataSource, LoadError, Loader};
use crate::model::Dataset;
use crate::render::pages;
use crate::render::{self, MemoryRenderer, Page, RenderOutcome, Route};
use crate::runner::{Options, Runner, RunnerError};

fn sample_root() -> String {
    env!("CARGO_MANIFEST_DIR").to_string()
}

/// Writes `data/<name>.json` files under a directory removed on drop.
fn fixture(files: &[(Dataset, &str)]) -> TempDir {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir(dir.path().join("data")).unwrap();
    for (dataset, body) in files {
        std::fs::write(dir.path().join(dataset.relative_path()), body).unwrap();
    }
    dir
}

fn root_of(dir: &TempDir) -> String {
    dir.path().to_string_lossy().to_string()
}

fn empty_except(overrides: &[(Dataset, &'static str)]) -> Vec<(Dataset, &'static str)> {
    Dataset::ALL
        .iter()
        .map(|d| {
            let body = overrides
                .iter()
                .find(|(o, _)| o == d)
                .map(|(_, b)| *b)
                .unwrap_or("[]");
            (*d, body)
        })
        .collect()
}

async fn render_page(root: &str, page: &str) -> (RenderOutcome, MemoryRenderer) {
    let runner = Runner::new(Options {
        data_source: root.to_string(),
        page: page.to_string(),
        ..Options::default()
    })
    .unwrap();
    let mut mem = MemoryRenderer::new();
    let outcome = runner.render_into(&mut mem).await.unwrap();
    (outcome, mem)
}

#[tokio::test]
async fn sample_data_renders_every_page() {
    for page in Page::ALL {
        let route = if page == Page::OrderDetail {
            "order-detail.html?id=1".to_string()
        } else {
            page.file_name().to_string()
        };
        let (outcome, mem) = render_page(&sample_root(), &route).await;
        match outcome {
            RenderOutcome::Rendered { skipped, .. } => assert!(skipped.is_empty(), "{route}"),
            other => panic!("{route} not rendered: {other:?}"),
        }
        for id in page.containers() {
            assert!(mem.get(id).is_some(), "{route} missing {id}");
        }
    }
}

#[tokio::test]
async fn unknown_customer_renders_placeholder_label() {
    let (_, mem) = render_page(&sample_root(), "orders.html").await;
    let body = mem.get(pages::ORDERS_BODY).unwrap();
    assert!(body.contains("<td>#999</td>"));
    assert!(body.contains("Can &amp; Ece &lt;Öztürk&gt;"));
    assert!(!body.contains("<Öztürk>"));
}

#[tokio::test]
async fn order_without_payment_or_delivery_uses_placeholders() {
    let (_, mem) = render_page(&sample_root(), "order-detail.html?id=3").await;
    assert!(mem.get(pages::PAYMENT_INFO).unwrap().contains(pages::NO_PAYMENT));
    assert!(mem.get(pages::DELIVERY_INFO).unwrap().contains(pages::NO_DELIVERY));
    assert!(mem
        .get(pages::ORDER_ITEMS)
        .unwrap()
        .contains("Philips HD9200 (ID 4)"));
}

#[tokio::test]
async fn end_to_end_payment_without_delivery() {
    let files = empty_except(&[
        (Dataset::Orders, r#"[{"OrderID":1,"CustomerID":5,"TotalAmount":100}]"#),
        (
            Dataset::Payments,
            r#"[{"OrderID":1,"Amount":100,"PaymentMethod":"Card"}]"#,
        ),
    ]);
    let dir = fixture(&files);
    let (outcome, mem) = render_page(&root_of(&dir), "order-detail.html?id=1").await;

    assert!(matches!(outcome, RenderOutcome::Rendered { .. }));
    assert!(mem
        .get(pages::PAYMENT_INFO)
        .unwrap()
        .contains("Card — ₺100,00"));
    assert!(mem
        .get(pages::DELIVERY_INFO)
        .unwrap()
        .contains("No delivery record"));
    assert!(mem.get(pages::ORDER_INFO).unwrap().contains("#5"));
}

#[tokio::test]
async fn missing_or_non_numeric_id_touches_nothing() {
    let loader = Loader::new(DataSource::Directory(PathBuf::from("/no/such/dir")), 5).unwrap();
    for page in ["order-detail.html", "order-detail.html?id=", "order-detail.html?id=abc"] {
        let route = Route::parse(page).unwrap();
        let mut mem = MemoryRenderer::new();
        let outcome = render::dispatch(&route, &loader, &mut mem).await.unwrap();
        assert!(matches!(outcome, RenderOutcome::Skipped { .. }), "{page}");
        assert!(mem.is_empty(), "{page}");
    }
}

#[tokio::test]
async fn one_failed_dataset_abandons_the_whole_page() {
    let dir = fixture(&[(Dataset::Orders, r#"[{"OrderID":1,"CustomerID":5}]"#)]);
    let runner = Runner::new(Options {
        data_source: root_of(&dir),
        page: "orders.html".to_string(),
        ..Options::default()
    })
    .unwrap();
    let mut mem = MemoryRenderer::new();
    let err = runner.render_into(&mut mem).await.unwrap_err();
    assert!(matches!(
        err,
        RunnerError::Load(LoadError::Read {
            dataset: Dataset::Customers,
            ..
        })
    ));
    assert!(mem.is_empty());
}

#[tokio::test]
async fn malformed_json_is_a_parse_error() {
    let dir = fixture(&[(Dataset::Customers, r#"{"CustomerID": 1}"#)]);
    let loader = Loader::new(DataSource::Directory(dir.path().to_path_buf()), 5).unwrap();
    let err = loader.load(&[Dataset::Customers]).await.unwrap_err();
    assert!(matches!(
        err,
        LoadError::Parse {
            dataset: Dataset::Customers,
            ..
        }
    ));
}

#[tokio::test]
async fn loader_only_fills_requested_datasets() {
    let loader = Loader::new(DataSource::Directory(PathBuf::from(sample_root())), 5).unwrap();
    let data = loader
        .load(&[Dataset::Customers, Dataset::Customers, Dataset::Products])
        .await
        .unwrap();
    assert_eq!(data.customers.len(), 4);
    assert_eq!(data.products.len(), 5);
    assert!(data.orders.is_empty());
}

#[tokio::test]
async fn duplicate_keys_reach_the_outcome() {
    let files = empty_except(&[
        (Dataset::Orders, r#"[{"OrderID":1,"CustomerID":5}]"#),
        (
            Dataset::Customers,
            r#"[{"CustomerID":5,"CustomerName":"Old"},{"CustomerID":5,"CustomerName":"New"}]"#,
        ),
    ]);
    let dir = fixture(&files);
    let (outcome, mem) = render_page(&root_of(&dir), "orders.html").await;
    match outcome {
        RenderOutcome::Rendered { duplicates, .. } => {
            assert_eq!(duplicates.entries, vec![("customers", vec![5])]);
        }
        other => panic!("unexpected outcome {other:?}"),
    }
    assert!(mem.get(pages::ORDERS_BODY).unwrap().contains("<td>New</td>"));
}

#[tokio::test]
async fn dashboard_counts_from_sample_data() {
    let (_, mem) = render_page(&sample_root(), "index.html").await;
    assert_eq!(mem.get(pages::TOTAL_ORDERS), Some("6"));
    assert_eq!(mem.get(pages::TOTAL_CUSTOMERS), Some("4"));
    assert_eq!(mem.get(pages::OPEN_REQUESTS), Some("2"));
    assert_eq!(mem.get(pages::TOTAL_REVENUE), Some("₺61.594,40"));
    let recent = mem.get(pages::RECENT_ORDERS).unwrap();
    let first = recent.find("order-detail.html?id=6").unwrap();
    let second = recent.find("order-detail.html?id=5").unwrap();
    assert!(first < second);
}

#[tokio::test]
async fn customers_page_lists_duplicate_key_once() {
    let files = empty_except(&[(
        Dataset::Customers,
        r#"[{"CustomerID":5,"CustomerName":"Old"},{"CustomerID":5,"CustomerName":"New"}]"#,
    )]);
    let dir = fixture(&files);
    let (outcome, mem) = render_page(&root_of(&dir), "customers.html").await;
    match outcome {
        RenderOutcome::Rendered { duplicates, .. } => {
            assert_eq!(duplicates.entries, vec![("customers", vec![5])]);
        }
        other => panic!("unexpected outcome {other:?}"),
    }
    let body = mem.get(pages::CUSTOMERS_BODY).unwrap();
    assert_eq!(body.matches("<tr>").count(), 1);
    assert!(body.contains("<td>New</td>"));

    let (_, mem) = render_page(&root_of(&dir), "index.html").await;
    assert_eq!(mem.get(pages::TOTAL_CUSTOMERS), Some("1"));
}

#[tokio::test]
async fn products_page_lists_duplicate_key_once() {
    let files = empty_except(&[(
        Dataset::Products,
        r#"[{"ProductID":3,"Brand":"Beko","Model":"A1"},{"ProductID":3,"Brand":"Beko","Model":"A2"}]"#,
    )]);
    let dir = fixture(&files);
    let (outcome, mem) = render_page(&root_of(&dir), "products.html").await;
    match outcome {
        RenderOutcome::Rendered { duplicates, .. } => {
            assert_eq!(duplicates.entries, vec![("products", vec![3])]);
        }
        other => panic!("unexpected outcome {other:?}"),
    }
    let body = mem.get(pages::PRODUCTS_BODY).unwrap();
    assert_eq!(body.matches("<tr>").count(), 1);
    assert!(body.contains("Beko A2 (ID 3)"));
    assert!(!body.contains("A1"));
}
