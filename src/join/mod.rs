//! Resolves foreign keys between datasets into page view models.
//!
//! Every lookup here is optional: a reference that does not resolve turns
//! into a `#<id>` placeholder label, never an error.

use std::cmp::Ordering;

use itertools::Itertools;

use crate::format;
use crate::index::{count_by, group_by, sum_by, GroupMap, PrimaryIndex};
use crate::model::{
    Customer, CustomerId, Datasets, Delivery, Order, OrderId, OrderItem, Payment, Product,
    ProductId, ServiceRequest,
};

#[derive(Clone, Debug, PartialEq)]
pub struct OrderRow {
    pub order_id: OrderId,
    pub customer: String,
    pub order_date: String,
    pub status: String,
    pub total: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ItemLine {
    pub product: String,
    pub quantity: u32,
    pub unit_price: f64,
    pub line_total: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct OrderDetail {
    pub order: Order,
    pub customer: String,
    pub items: Vec<ItemLine>,
    pub payment: Option<Payment>,
    pub delivery: Option<Delivery>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CustomerRow {
    pub customer_id: CustomerId,
    pub name: String,
    pub city: String,
    pub order_count: usize,
    pub total_spent: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ProductRow {
    pub product_id: ProductId,
    pub label: String,
    pub warranty: String,
    pub units_sold: u64,
    pub service_requests: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ServiceRow {
    pub service_id: u64,
    pub customer: String,
    pub product: String,
    pub status: String,
    pub request_date: String,
    pub description: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DashboardSummary {
    pub total_orders: usize,
    pub total_revenue: f64,
    pub total_customers: usize,
    pub open_requests: usize,
    pub status_counts: Vec<(String, usize)>,
    pub payment_sums: Vec<(String, f64)>,
    pub recent_orders: Vec<OrderRow>,
}

/// Keys that were overwritten while indexing, grouped per dataset.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DuplicateReport {
    pub entries: Vec<(&'static str, Vec<u64>)>,
}

impl DuplicateReport {
    fn record(&mut self, dataset: &'static str, keys: &[u64]) {
        if !keys.is_empty() {
            self.entries.push((dataset, keys.to_vec()));
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub const RECENT_ORDERS: usize = 5;

fn customers_index(customers: &[Customer]) -> PrimaryIndex<'_, CustomerId, Customer> {
    PrimaryIndex::build(customers, |c| c.customer_id)
}

fn products_index(products: &[Product]) -> PrimaryIndex<'_, ProductId, Product> {
    PrimaryIndex::build(products, |p| p.product_id)
}

fn order_row(order: &Order, customers: &PrimaryIndex<'_, CustomerId, Customer>) -> OrderRow {
    OrderRow {
        order_id: order.order_id,
        customer: format::customer_name(customers.get(&order.customer_id), order.customer_id),
        order_date: order.order_date.clone(),
        status: order.status.clone(),
        total: order.total_amount,
    }
}

fn newest_first(a: &Order, b: &Order) -> Ordering {
    b.order_date
        .cmp(&a.order_date)
        .then_with(|| b.order_id.cmp(&a.order_id))
}

pub fn order_rows(data: &Datasets) -> (Vec<OrderRow>, DuplicateReport) {
    let customers = customers_index(&data.customers);
    let mut dupes = DuplicateReport::default();
    dupes.record("customers", customers.duplicate_keys());
    let rows = data
        .orders
        .iter()
        .map(|o| order_row(o, &customers))
        .collect();
    (rows, dupes)
}

/// Resolves one order and everything hanging off it. `None` when the order
/// itself is not in the data.
pub fn order_detail(
    data: &Datasets,
    order_id: OrderId,
) -> (Option<OrderDetail>, DuplicateReport) {
    let orders = PrimaryIndex::build(&data.orders, |o| o.order_id);
    let customers = customers_index(&data.customers);
    let products = products_index(&data.products);
    let payments = PrimaryIndex::build(&data.payments, |p| p.order_id);
    let deliveries = PrimaryIndex::build(&data.deliveries, |d| d.order_id);

    let mut dupes = DuplicateReport::default();
    dupes.record("orders", orders.duplicate_keys());
    dupes.record("customers", customers.duplicate_keys());
    dupes.record("products", products.duplicate_keys());
    dupes.record("payments", payments.duplicate_keys());
    dupes.record("deliveries", deliveries.duplicate_keys());

    let Some(order) = orders.get(&order_id) else {
        return (None, dupes);
    };

    let items = data
        .order_items
        .iter()
        .filter(|item| item.order_id == order_id)
        .map(|item| item_line(item, &products))
        .collect();

    let detail = OrderDetail {
        order: order.clone(),
        customer: format::customer_label(customers.get(&order.customer_id), order.customer_id),
        items,
        payment: payments.get(&order_id).cloned(),
        delivery: deliveries.get(&order_id).cloned(),
    };
    (Some(detail), dupes)
}

fn item_line(item: &OrderItem, products: &PrimaryIndex<'_, ProductId, Product>) -> ItemLine {
    ItemLine {
        product: format::product_label(products.get(&item.product_id), item.product_id),
        quantity: item.quantity,
        unit_price: item.unit_price,
        line_total: item.line_total(),
    }
}

pub fn customer_rows(data: &Datasets) -> (Vec<CustomerRow>, DuplicateReport) {
    let customers = customers_index(&data.customers);
    let mut dupes = DuplicateReport::default();
    dupes.record("customers", customers.duplicate_keys());

    let counts = count_by(&data.orders, |o| o.customer_id);
    let spent = sum_by(&data.orders, |o| o.customer_id, |o| o.total_amount);
    let rows = customers
        .records()
        .map(|c| CustomerRow {
            customer_id: c.customer_id,
            name: c.customer_name.clone(),
            city: c.city.clone(),
            order_count: counts.get(&c.customer_id).copied().unwrap_or(0),
            total_spent: spent.get(&c.customer_id).copied().unwrap_or(0.0),
        })
        .collect();
    (rows, dupes)
}

pub fn product_rows(data: &Datasets) -> (Vec<ProductRow>, DuplicateReport) {
    let products = products_index(&data.products);
    let mut dupes = DuplicateReport::default();
    dupes.record("products", products.duplicate_keys());

    let items_by_product: GroupMap<ProductId, Vec<&OrderItem>> =
        group_by(&data.order_items, |i| i.product_id);
    let requests = count_by(&data.service_requests, |r| r.product_id);
    let rows = products
        .records()
        .map(|p| ProductRow {
            product_id: p.product_id,
            label: format::product_label(Some(p), p.product_id),
            warranty: format::warranty_label(p.warranty_period.as_ref()),
            units_sold: items_by_product
                .get(&p.product_id)
                .map(|items| items.iter().map(|i| u64::from(i.quantity)).sum())
                .unwrap_or(0),
            service_requests: requests.get(&p.product_id).copied().unwrap_or(0),
        })
        .collect();
    (rows, dupes)
}

pub fn service_rows(data: &Datasets) -> (Vec<ServiceRow>, DuplicateReport) {
    let customers = customers_index(&data.customers);
    let products = products_index(&data.products);
    let mut dupes = DuplicateReport::default();
    dupes.record("customers", customers.duplicate_keys());
    dupes.record("products", products.duplicate_keys());
    let rows = data
        .service_requests
        .iter()
        .map(|r| service_row(r, &customers, &products))
        .collect();
    (rows, dupes)
}

fn service_row(
    req: &ServiceRequest,
    customers: &PrimaryIndex<'_, CustomerId, Customer>,
    products: &PrimaryIndex<'_, ProductId, Product>,
) -> ServiceRow {
    ServiceRow {
        service_id: req.service_id,
        customer: format::customer_name(customers.get(&req.customer_id), req.customer_id),
        product: format::product_label(products.get(&req.product_id), req.product_id),
        status: req.status.clone(),
        request_date: req.request_date.clone(),
        description: req.issue_description.clone(),
    }
}

pub fn dashboard_summary(data: &Datasets) -> (DashboardSummary, DuplicateReport) {
    let customers = customers_index(&data.customers);
    let mut dupes = DuplicateReport::default();
    dupes.record("customers", customers.duplicate_keys());

    let status_counts = count_by(&data.orders, |o| o.status.clone())
        .iter()
        .map(|(k, v)| (k.clone(), *v))
        .collect();
    let payment_sums = sum_by(&data.payments, |p| p.payment_method.clone(), |p| p.amount)
        .iter()
        .map(|(k, v)| (k.clone(), *v))
        .collect();
    let recent_orders = data
        .orders
        .iter()
        .sorted_by(|a, b| newest_first(a, b))
        .take(RECENT_ORDERS)
        .map(|o| order_row(o, &customers))
        .collect();

    let summary = DashboardSummary {
        total_orders: data.orders.len(),
        total_revenue: data.orders.iter().map(|o| o.total_amount).sum(),
        total_customers: customers.len(),
        open_requests: data.service_requests.iter().filter(|r| r.is_open()).count(),
        status_counts,
        payment_sums,
        recent_orders,
    };
    (summary, dupes)
}
