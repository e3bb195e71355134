use std::fmt;

use serde::Deserialize;
use serde::Serialize;

pub type OrderId = u64;
pub type CustomerId = u64;
pub type ProductId = u64;
pub type ServiceId = u64;

/// The static resources a page can ask for. Each one lives at `data/<name>.json`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Dataset {
    Orders,
    OrderItems,
    Payments,
    Deliveries,
    Customers,
    Products,
    ServiceRequests,
}

impl Dataset {
    pub const ALL: [Dataset; 7] = [
        Dataset::Orders,
        Dataset::OrderItems,
        Dataset::Payments,
        Dataset::Deliveries,
        Dataset::Customers,
        Dataset::Products,
        Dataset::ServiceRequests,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Dataset::Orders => "orders",
            Dataset::OrderItems => "order_items",
            Dataset::Payments => "payments",
            Dataset::Deliveries => "deliveries",
            Dataset::Customers => "customers",
            Dataset::Products => "products",
            Dataset::ServiceRequests => "service_requests",
        }
    }

    pub fn relative_path(self) -> String {
        format!("data/{}.json", self.name())
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Order {
    #[serde(rename = "OrderID")]
    pub order_id: OrderId,
    #[serde(rename = "CustomerID")]
    pub customer_id: CustomerId,
    #[serde(rename = "StoreID", default)]
    pub store_id: Option<u64>,
    #[serde(default)]
    pub order_date: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub total_amount: f64,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct OrderItem {
    #[serde(rename = "OrderID")]
    pub order_id: OrderId,
    #[serde(rename = "ProductID")]
    pub product_id: ProductId,
    #[serde(default)]
    pub quantity: u32,
    #[serde(default)]
    pub unit_price: f64,
}

impl OrderItem {
    pub fn line_total(&self) -> f64 {
        f64::from(self.quantity) * self.unit_price
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Payment {
    #[serde(rename = "OrderID")]
    pub order_id: OrderId,
    #[serde(default)]
    pub payment_method: String,
    #[serde(default)]
    pub amount: f64,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Delivery {
    #[serde(rename = "OrderID")]
    pub order_id: OrderId,
    #[serde(default)]
    pub shipping_company: String,
    #[serde(default)]
    pub tracking_number: String,
    #[serde(default)]
    pub status: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Customer {
    #[serde(rename = "CustomerID")]
    pub customer_id: CustomerId,
    #[serde(default)]
    pub customer_name: String,
    #[serde(default)]
    pub city: String,
}

/// Warranty periods show up both as month counts and as free text.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum WarrantyPeriod {
    Months(f64),
    Text(String),
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Product {
    #[serde(rename = "ProductID")]
    pub product_id: ProductId,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub warranty_period: Option<WarrantyPeriod>,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ServiceRequest {
    #[serde(rename = "ServiceID")]
    pub service_id: ServiceId,
    #[serde(rename = "CustomerID")]
    pub customer_id: CustomerId,
    #[serde(rename = "ProductID")]
    pub product_id: ProductId,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub request_date: String,
    #[serde(default)]
    pub issue_description: String,
}

impl ServiceRequest {
    pub fn is_open(&self) -> bool {
        let status = self.status.trim().to_lowercase();
        !matches!(status.as_str(), "closed" | "resolved" | "completed")
    }
}

/// Page-local copies of whatever datasets were requested. Datasets a page did
/// not ask for stay empty.
#[derive(Clone, Debug, Default)]
pub struct Datasets {
    pub orders: Vec<Order>,
    pub order_items: Vec<OrderItem>,
    pub payments: Vec<Payment>,
    pub deliveries: Vec<Delivery>,
    pub customers: Vec<Customer>,
    pub products: Vec<Product>,
    pub service_requests: Vec<ServiceRequest>,
}

impl Datasets {
    pub fn len_of(&self, dataset: Dataset) -> usize {
        match dataset {
            Dataset::Orders => self.orders.len(),
            Dataset::OrderItems => self.order_items.len(),
            Dataset::Payments => self.payments.len(),
            Dataset::Deliveries => self.deliveries.len(),
            Dataset::Customers => self.customers.len(),
            Dataset::Products => self.products.len(),
            Dataset::ServiceRequests => self.service_requests.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_reads_pascal_case_fields() {
        let raw = r#"{"OrderID":7,"CustomerID":3,"StoreID":2,"OrderDate":"2024-03-01","Status":"Shipped","TotalAmount":149.9}"#;
        let order: Order = serde_json::from_str(raw).unwrap();
        assert_eq!(order.order_id, 7);
        assert_eq!(order.customer_id, 3);
        assert_eq!(order.store_id, Some(2));
        assert_eq!(order.status, "Shipped");
        assert!((order.total_amount - 149.9).abs() < f64::EPSILON);
    }

    #[test]
    fn warranty_period_accepts_number_or_text() {
        let p: Product = serde_json::from_str(
            r#"{"ProductID":1,"Brand":"Arçelik","Model":"X1","WarrantyPeriod":24}"#,
        )
        .unwrap();
        assert_eq!(p.warranty_period, Some(WarrantyPeriod::Months(24.0)));

        let p: Product = serde_json::from_str(
            r#"{"ProductID":2,"Brand":"Vestel","Model":"V","WarrantyPeriod":"2 years"}"#,
        )
        .unwrap();
        assert_eq!(
            p.warranty_period,
            Some(WarrantyPeriod::Text("2 years".to_string()))
        );
    }

    #[test]
    fn closed_and_resolved_requests_are_not_open() {
        let mut req = ServiceRequest {
            service_id: 1,
            customer_id: 1,
            product_id: 1,
            status: "Open".to_string(),
            request_date: String::new(),
            issue_description: String::new(),
        };
        assert!(req.is_open());
        req.status = "resolved".to_string();
        assert!(!req.is_open());
        req.status = " Closed ".to_string();
        assert!(!req.is_open());
    }

    #[test]
    fn dataset_paths_are_relative_to_data_dir() {
        assert_eq!(Dataset::ServiceRequests.relative_path(), "data/service_requests.json");
    }
}
