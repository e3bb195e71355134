//! HTML fragments for each page, written container by container.

use itertools::Itertools;

use super::{Page, Renderer};
use crate::format::{escape_html, format_currency, text_or_dash};
use crate::join::{self, DuplicateReport, OrderRow};
use crate::model::{Datasets, OrderId};

pub const TOTAL_ORDERS: &str = "totalOrders";
pub const TOTAL_REVENUE: &str = "totalRevenue";
pub const TOTAL_CUSTOMERS: &str = "totalCustomers";
pub const OPEN_REQUESTS: &str = "openRequests";
pub const STATUS_SUMMARY: &str = "statusSummary";
pub const PAYMENT_SUMMARY: &str = "paymentSummary";
pub const RECENT_ORDERS: &str = "recentOrders";
pub const ORDERS_BODY: &str = "ordersBody";
pub const ORDER_INFO: &str = "orderInfo";
pub const ORDER_ITEMS: &str = "orderItems";
pub const PAYMENT_INFO: &str = "paymentInfo";
pub const DELIVERY_INFO: &str = "deliveryInfo";
pub const CUSTOMERS_BODY: &str = "customersBody";
pub const PRODUCTS_BODY: &str = "productsBody";
pub const SERVICE_BODY: &str = "serviceBody";

pub const NO_PAYMENT: &str = "No payment record";
pub const NO_DELIVERY: &str = "No delivery record";

pub fn order_detail_href(order_id: OrderId) -> String {
    format!("{}?id={order_id}", Page::OrderDetail.file_name())
}

fn nav_attrs(href: &str) -> String {
    let href = escape_html(href);
    format!(r#"class="clickable" data-href="{href}" onclick="location.href='{href}'""#)
}

fn status_badge(status: &str) -> String {
    let slug: String = status
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '-' })
        .collect();
    format!(
        r#"<span class="status status-{}">{}</span>"#,
        escape_html(&slug),
        text_or_dash(status)
    )
}

fn empty_row(colspan: usize, message: &str) -> String {
    format!(
        r#"<tr><td colspan="{colspan}" class="empty">{}</td></tr>"#,
        escape_html(message)
    )
}

fn empty_note(message: &str) -> String {
    format!(r#"<p class="empty">{}</p>"#, escape_html(message))
}

fn table_body<T, F>(rows: &[T], colspan: usize, empty: &str, row: F) -> String
where
    F: Fn(&T) -> String,
{
    if rows.is_empty() {
        return empty_row(colspan, empty);
    }
    rows.iter().map(row).join("\n")
}

fn order_tr(row: &OrderRow) -> String {
    format!(
        "<tr {}><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
        nav_attrs(&order_detail_href(row.order_id)),
        row.order_id,
        escape_html(&row.customer),
        text_or_dash(&row.order_date),
        status_badge(&row.status),
        format_currency(row.total),
    )
}

pub fn render_orders<R: Renderer>(data: &Datasets, renderer: &mut R) -> DuplicateReport {
    let (rows, dupes) = join::order_rows(data);
    renderer.set_content(ORDERS_BODY, table_body(&rows, 5, "No orders found", order_tr));
    dupes
}

pub fn render_dashboard<R: Renderer>(data: &Datasets, renderer: &mut R) -> DuplicateReport {
    let (summary, dupes) = join::dashboard_summary(data);

    renderer.set_content(TOTAL_ORDERS, summary.total_orders.to_string());
    renderer.set_content(TOTAL_REVENUE, format_currency(summary.total_revenue));
    renderer.set_content(TOTAL_CUSTOMERS, summary.total_customers.to_string());
    renderer.set_content(OPEN_REQUESTS, summary.open_requests.to_string());

    let statuses = summary
        .status_counts
        .iter()
        .map(|(status, count)| {
            format!(
                "<li>{}<strong>{count}</strong></li>",
                status_badge(status)
            )
        })
        .join("\n");
    renderer.set_content(STATUS_SUMMARY, statuses);

    let payments = summary
        .payment_sums
        .iter()
        .map(|(method, sum)| {
            format!(
                "<li><span>{}</span><strong>{}</strong></li>",
                text_or_dash(method),
                format_currency(*sum)
            )
        })
        .join("\n");
    renderer.set_content(PAYMENT_SUMMARY, payments);

    let recent = if summary.recent_orders.is_empty() {
        "<li class=\"empty\">No orders yet</li>".to_string()
    } else {
        summary
            .recent_orders
            .iter()
            .map(|row| {
                format!(
                    "<li {}><span>#{}</span><span>{}</span><span>{}</span><strong>{}</strong></li>",
                    nav_attrs(&order_detail_href(row.order_id)),
                    row.order_id,
                    escape_html(&row.customer),
                    text_or_dash(&row.order_date),
                    format_currency(row.total),
                )
            })
            .join("\n")
    };
    renderer.set_content(RECENT_ORDERS, recent);

    dupes
}

pub fn render_order_detail<R: Renderer>(
    data: &Datasets,
    order_id: OrderId,
    renderer: &mut R,
) -> DuplicateReport {
    let (detail, dupes) = join::order_detail(data, order_id);
    let Some(detail) = detail else {
        renderer.set_content(ORDER_INFO, empty_note(&format!("Order #{order_id} not found")));
        return dupes;
    };

    let order = &detail.order;
    let store = order
        .store_id
        .map(|id| id.to_string())
        .unwrap_or_else(|| "-".to_string());
    let info = format!(
        "<dl>\n<dt>Order</dt><dd>#{}</dd>\n<dt>Customer</dt><dd>{}</dd>\n<dt>Store</dt><dd>{}</dd>\n<dt>Date</dt><dd>{}</dd>\n<dt>Status</dt><dd>{}</dd>\n<dt>Total</dt><dd>{}</dd>\n</dl>",
        order.order_id,
        escape_html(&detail.customer),
        store,
        text_or_dash(&order.order_date),
        status_badge(&order.status),
        format_currency(order.total_amount),
    );
    renderer.set_content(ORDER_INFO, info);

    let items = table_body(&detail.items, 4, "No items", |item| {
        format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape_html(&item.product),
            item.quantity,
            format_currency(item.unit_price),
            format_currency(item.line_total),
        )
    });
    renderer.set_content(ORDER_ITEMS, items);

    let payment = match detail.payment.as_ref() {
        Some(p) => format!(
            "<p>{} — {}</p>",
            text_or_dash(&p.payment_method),
            format_currency(p.amount)
        ),
        None => empty_note(NO_PAYMENT),
    };
    renderer.set_content(PAYMENT_INFO, payment);

    let delivery = match detail.delivery.as_ref() {
        Some(d) => format!(
            "<p>{} — {} ({})</p>",
            text_or_dash(&d.shipping_company),
            text_or_dash(&d.tracking_number),
            text_or_dash(&d.status)
        ),
        None => empty_note(NO_DELIVERY),
    };
    renderer.set_content(DELIVERY_INFO, delivery);

    dupes
}

pub fn render_customers<R: Renderer>(data: &Datasets, renderer: &mut R) -> DuplicateReport {
    let (rows, dupes) = join::customer_rows(data);
    let body = table_body(&rows, 5, "No customers found", |c| {
        format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            c.customer_id,
            text_or_dash(&c.name),
            text_or_dash(&c.city),
            c.order_count,
            format_currency(c.total_spent),
        )
    });
    renderer.set_content(CUSTOMERS_BODY, body);
    dupes
}

pub fn render_products<R: Renderer>(data: &Datasets, renderer: &mut R) -> DuplicateReport {
    let (rows, dupes) = join::product_rows(data);
    let body = table_body(&rows, 4, "No products found", |p| {
        format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape_html(&p.label),
            escape_html(&p.warranty),
            p.units_sold,
            p.service_requests,
        )
    });
    renderer.set_content(PRODUCTS_BODY, body);
    dupes
}

pub fn render_service_requests<R: Renderer>(data: &Datasets, renderer: &mut R) -> DuplicateReport {
    let (rows, dupes) = join::service_rows(data);
    let body = table_body(&rows, 6, "No service requests found", |r| {
        format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            r.service_id,
            escape_html(&r.customer),
            escape_html(&r.product),
            status_badge(&r.status),
            text_or_dash(&r.request_date),
            text_or_dash(&r.description),
        )
    });
    renderer.set_content(SERVICE_BODY, body);
    dupes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Customer, Delivery, Order, Payment, ServiceRequest};
    use crate::render::MemoryRenderer;

    fn one_order(customer_id: u64) -> Order {
        Order {
            order_id: 1,
            customer_id,
            store_id: Some(2),
            order_date: "2024-05-01".to_string(),
            status: "Shipped".to_string(),
            total_amount: 100.0,
        }
    }

    #[test]
    fn order_rows_link_to_detail_page() {
        let data = Datasets {
            orders: vec![one_order(5)],
            ..Datasets::default()
        };
        let mut mem = MemoryRenderer::new();
        render_orders(&data, &mut mem);
        let body = mem.get(ORDERS_BODY).unwrap();
        assert!(body.contains("location.href='order-detail.html?id=1'"));
        assert!(body.contains("<td>#5</td>"));
        assert!(body.contains("₺100,00"));
    }

    #[test]
    fn empty_orders_render_placeholder_row() {
        let mut mem = MemoryRenderer::new();
        render_orders(&Datasets::default(), &mut mem);
        assert!(mem.get(ORDERS_BODY).unwrap().contains("No orders found"));
    }

    #[test]
    fn order_detail_with_payment_and_delivery() {
        let data = Datasets {
            orders: vec![one_order(5)],
            customers: vec![Customer {
                customer_id: 5,
                customer_name: "Elif".to_string(),
                city: "Bursa".to_string(),
            }],
            payments: vec![Payment {
                order_id: 1,
                payment_method: "Cash".to_string(),
                amount: 100.0,
            }],
            deliveries: vec![Delivery {
                order_id: 1,
                shipping_company: "Aras".to_string(),
                tracking_number: "TR-9".to_string(),
                status: "Delivered".to_string(),
            }],
            ..Datasets::default()
        };
        let mut mem = MemoryRenderer::new();
        render_order_detail(&data, 1, &mut mem);
        assert!(mem.get(ORDER_INFO).unwrap().contains("Elif (Bursa)"));
        assert!(mem.get(ORDER_INFO).unwrap().contains("<dt>Store</dt><dd>2</dd>"));
        assert_eq!(mem.get(PAYMENT_INFO), Some("<p>Cash — ₺100,00</p>"));
        assert_eq!(mem.get(DELIVERY_INFO), Some("<p>Aras — TR-9 (Delivered)</p>"));
        assert!(mem.get(ORDER_ITEMS).unwrap().contains("No items"));
    }

    #[test]
    fn unknown_order_only_fills_order_info() {
        let mut mem = MemoryRenderer::new();
        render_order_detail(&Datasets::default(), 42, &mut mem);
        assert_eq!(mem.len(), 1);
        assert!(mem.get(ORDER_INFO).unwrap().contains("Order #42 not found"));
    }

    #[test]
    fn service_descriptions_are_escaped() {
        let data = Datasets {
            service_requests: vec![ServiceRequest {
                service_id: 3,
                customer_id: 8,
                product_id: 9,
                status: "Open".to_string(),
                request_date: "2024-06-02".to_string(),
                issue_description: "<script>alert('x')</script>".to_string(),
            }],
            ..Datasets::default()
        };
        let mut mem = MemoryRenderer::new();
        render_service_requests(&data, &mut mem);
        let body = mem.get(SERVICE_BODY).unwrap();
        assert!(!body.contains("<script>"));
        assert!(body.contains("&lt;script&gt;"));
        assert!(body.contains("<td>#8</td>"));
        assert!(body.contains("<td>#9</td>"));
    }

    #[test]
    fn dashboard_fills_every_counter() {
        let data = Datasets {
            orders: vec![one_order(5)],
            ..Datasets::default()
        };
        let mut mem = MemoryRenderer::new();
        render_dashboard(&data, &mut mem);
        for id in Page::Dashboard.containers() {
            assert!(mem.get(id).is_some(), "missing {id}");
        }
        assert_eq!(mem.get(TOTAL_ORDERS), Some("1"));
        assert_eq!(mem.get(TOTAL_REVENUE), Some("₺100,00"));
    }
}
