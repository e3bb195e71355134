use std::fmt::Display;

use crate::model::{Customer, Product, WarrantyPeriod};

pub const CURRENCY_SYMBOL: &str = "₺";

/// Formats an amount the way tr-TR renders Turkish lira: `₺1.234,50`.
pub fn format_currency(amount: f64) -> String {
    if !amount.is_finite() {
        return "-".to_string();
    }
    let fixed = format!("{:.2}", amount.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let negative = amount < 0.0 && fixed.bytes().any(|b| b.is_ascii_digit() && b != b'0');

    let mut out = String::with_capacity(fixed.len() + 8);
    if negative {
        out.push('-');
    }
    out.push_str(CURRENCY_SYMBOL);
    out.push_str(&group_thousands(int_part, '.'));
    out.push(',');
    out.push_str(frac_part);
    out
}

fn group_thousands(digits: &str, sep: char) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(sep);
        }
        out.push(ch);
    }
    out
}

pub fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Label used when a referenced entity is not in the loaded data.
pub fn placeholder<K: Display>(key: K) -> String {
    format!("#{key}")
}

// Labels below are plain text; callers escape them when interpolating.

pub fn customer_label(customer: Option<&Customer>, customer_id: u64) -> String {
    match customer {
        Some(c) if c.city.trim().is_empty() => c.customer_name.clone(),
        Some(c) => format!("{} ({})", c.customer_name, c.city),
        None => placeholder(customer_id),
    }
}

pub fn customer_name(customer: Option<&Customer>, customer_id: u64) -> String {
    match customer {
        Some(c) => c.customer_name.clone(),
        None => placeholder(customer_id),
    }
}

pub fn product_label(product: Option<&Product>, product_id: u64) -> String {
    match product {
        Some(p) => format!("{} {} (ID {})", p.brand, p.model, p.product_id),
        None => placeholder(product_id),
    }
}

pub fn warranty_label(period: Option<&WarrantyPeriod>) -> String {
    match period {
        Some(WarrantyPeriod::Months(m)) if m.fract() == 0.0 => format!("{m:.0} months"),
        Some(WarrantyPeriod::Months(m)) => format!("{m} months"),
        Some(WarrantyPeriod::Text(t)) if !t.trim().is_empty() => t.clone(),
        _ => "-".to_string(),
    }
}

/// Escaped text, or `-` for blank fields.
pub fn text_or_dash(value: &str) -> String {
    if value.trim().is_empty() {
        "-".to_string()
    } else {
        escape_html(value)
    }
}
