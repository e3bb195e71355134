use itertools::Itertools;

use super::RenderedPage;
use crate::format::escape_html;
use crate::render::pages;
use crate::render::Page;

const TH: &str =
    "px-6 py-5 text-[11px] font-display text-slate-900 dark:text-slate-200 uppercase tracking-widest";

fn slot<'a>(page: &'a RenderedPage, id: &str) -> &'a str {
    page.content(id).unwrap_or_default()
}

fn nav(current: Page) -> String {
    Page::ALL
        .iter()
        .filter(|p| **p != Page::OrderDetail)
        .map(|p| {
            let class = if *p == current {
                "text-primary font-bold"
            } else {
                "text-slate-500 dark:text-slate-400 hover:text-primary"
            };
            format!(
                r#"<a class="{class} text-sm transition-colors" href="{}">{}</a>"#,
                p.file_name(),
                p.title()
            )
        })
        .join("\n        ")
}

fn stat_card(page: &RenderedPage, id: &str, label: &str, icon: &str) -> String {
    format!(
        r#"<div class="bg-white dark:bg-slate-900 rounded-2xl border border-slate-200 dark:border-slate-800 p-6 shadow-sm">
          <div class="flex items-center gap-3 text-slate-500 dark:text-slate-400 text-xs font-bold uppercase tracking-widest">
            <span class="material-symbols-outlined text-[20px]">{icon}</span>{label}
          </div>
          <div id="{id}" class="mt-3 text-3xl font-display text-slate-900 dark:text-white">{}</div>
        </div>"#,
        slot(page, id)
    )
}

fn list_card(page: &RenderedPage, id: &str, label: &str) -> String {
    format!(
        r#"<div class="bg-white dark:bg-slate-900 rounded-2xl border border-slate-200 dark:border-slate-800 p-6 shadow-sm">
          <h3 class="text-slate-900 dark:text-white text-lg mb-4">{label}</h3>
          <ul id="{id}" class="flex flex-col gap-2 text-sm">{}</ul>
        </div>"#,
        slot(page, id)
    )
}

fn table(page: &RenderedPage, body_id: &str, headers: &[&str]) -> String {
    let head = headers
        .iter()
        .map(|h| format!(r#"<th class="{TH}">{h}</th>"#))
        .join("");
    format!(
        r#"<div class="bg-white dark:bg-slate-900 border border-slate-200 dark:border-slate-800 rounded-2xl overflow-hidden shadow-sm">
        <div class="overflow-x-auto">
          <table class="w-full text-left border-collapse">
            <thead>
              <tr class="bg-slate-50 dark:bg-slate-800/50 border-b border-slate-200 dark:border-slate-800">{head}</tr>
            </thead>
            <tbody id="{body_id}" class="divide-y divide-slate-100 dark:divide-slate-800">{}</tbody>
          </table>
        </div>
      </div>"#,
        slot(page, body_id)
    )
}

fn section(page: &RenderedPage, id: &str, label: &str) -> String {
    format!(
        r#"<div class="bg-white dark:bg-slate-900 rounded-2xl border border-slate-200 dark:border-slate-800 p-6 shadow-sm">
          <h3 class="text-slate-900 dark:text-white text-lg mb-4">{label}</h3>
          <div id="{id}" class="text-sm">{}</div>
        </div>"#,
        slot(page, id)
    )
}

fn body(page: &RenderedPage) -> String {
    match page.kind {
        Page::Dashboard => format!(
            r#"<div class="grid grid-cols-1 md:grid-cols-2 xl:grid-cols-4 gap-5 mb-8">
        {}
        {}
        {}
        {}
      </div>
      <div class="grid grid-cols-1 xl:grid-cols-3 gap-5">
        {}
        {}
        {}
      </div>"#,
            stat_card(page, pages::TOTAL_ORDERS, "Orders", "receipt_long"),
            stat_card(page, pages::TOTAL_REVENUE, "Revenue", "payments"),
            stat_card(page, pages::TOTAL_CUSTOMERS, "Customers", "group"),
            stat_card(page, pages::OPEN_REQUESTS, "Open requests", "build"),
            list_card(page, pages::STATUS_SUMMARY, "Orders by status"),
            list_card(page, pages::PAYMENT_SUMMARY, "Payments by method"),
            list_card(page, pages::RECENT_ORDERS, "Recent orders"),
        ),
        Page::Orders => table(
            page,
            pages::ORDERS_BODY,
            &["Order", "Customer", "Date", "Status", "Total"],
        ),
        Page::OrderDetail => format!(
            r#"<div class="grid grid-cols-1 xl:grid-cols-2 gap-5 mb-8">
        {}
        <div class="flex flex-col gap-5">
        {}
        {}
        </div>
      </div>
      {}"#,
            section(page, pages::ORDER_INFO, "Order"),
            section(page, pages::PAYMENT_INFO, "Payment"),
            section(page, pages::DELIVERY_INFO, "Delivery"),
            table(
                page,
                pages::ORDER_ITEMS,
                &["Product", "Quantity", "Unit price", "Line total"]
            ),
        ),
        Page::Customers => table(
            page,
            pages::CUSTOMERS_BODY,
            &["ID", "Name", "City", "Orders", "Total spent"],
        ),
        Page::Products => table(
            page,
            pages::PRODUCTS_BODY,
            &["Product", "Warranty", "Units sold", "Service requests"],
        ),
        Page::ServiceRequests => table(
            page,
            pages::SERVICE_BODY,
            &["ID", "Customer", "Product", "Status", "Date", "Issue"],
        ),
    }
}

pub fn render_html(page: &RenderedPage) -> Vec<u8> {
    let title = escape_html(&page.title);
    let html = format!(
        r####"<!DOCTYPE html>
<html lang="tr">
<head>
  <meta charset="utf-8"/>
  <meta content="width=device-width, initial-scale=1.0" name="viewport"/>
  <title>{title} · Storedash</title>
  <script src="https://cdn.tailwindcss.com?plugins=forms,container-queries"></script>
  <link href="https://fonts.googleapis.com/css2?family=Material+Symbols+Outlined:wght,FILL@100..700,0..1&amp;display=swap" rel="stylesheet"/>
  <link href="https://fonts.googleapis.com/css2?family=Montserrat:wght@700;800&amp;family=Inter:wght@400;500;600;700&amp;display=swap" rel="stylesheet"/>
  <script id="tailwind-config">
    tailwind.config = {{
      darkMode: "class",
      theme: {{
        extend: {{
          colors: {{
            "primary": "#135bec",
            "background-light": "#f8fafc",
            "background-dark": "#0f172a"
          }},
          fontFamily: {{
            "sans": ["Inter", "sans-serif"],
            "display": ["Montserrat", "sans-serif"]
          }}
        }}
      }}
    }};
  </script>
  <style type="text/tailwindcss">
    .material-symbols-outlined {{
      font-variation-settings: 'FILL' 0, 'wght' 400, 'GRAD' 0, 'opsz' 24;
    }}
    body {{
      font-family: 'Inter', sans-serif;
    }}
    h1, h2, h3 {{
      font-family: 'Montserrat', sans-serif;
      font-weight: 800;
      letter-spacing: -0.025em;
    }}
    td {{ @apply px-6 py-4 text-sm; }}
    .clickable {{ @apply cursor-pointer hover:bg-slate-50 dark:hover:bg-slate-800/50; }}
    .empty {{ @apply text-slate-400 italic; }}
    .status {{ @apply inline-flex px-2 py-1 rounded-lg text-xs font-bold bg-slate-100 dark:bg-slate-800; }}
    dl {{ @apply grid grid-cols-[8rem_1fr] gap-y-2; }}
    dt {{ @apply text-slate-500 dark:text-slate-400 font-bold; }}
  </style>
</head>
<body data-page="{page_file}" class="bg-background-light dark:bg-background-dark text-slate-900 dark:text-slate-100 min-h-screen transition-colors duration-200">
  <div class="layout-container flex h-full grow flex-col">
    <header class="flex items-center justify-between border-b border-slate-200 dark:border-slate-800 bg-white dark:bg-slate-900 px-8 py-4 sticky top-0 z-50">
      <div class="flex items-center gap-4">
        <div class="size-10 bg-primary rounded-xl flex items-center justify-center text-white shadow-lg shadow-primary/20">
          <span class="material-symbols-outlined text-[24px]">storefront</span>
        </div>
        <h2 class="text-slate-900 dark:text-white text-xl font-display uppercase tracking-tight">Storedash</h2>
      </div>
      <nav class="flex items-center gap-6">
        {nav}
      </nav>
      <button id="theme-toggle" class="flex size-10 cursor-pointer items-center justify-center overflow-hidden rounded-xl bg-slate-100 dark:bg-slate-800 text-slate-600 dark:text-white hover:bg-slate-200 dark:hover:bg-slate-700 transition-colors" type="button">
        <span id="theme-icon" class="material-symbols-outlined">light_mode</span>
      </button>
    </header>

    <main class="flex-1 max-w-[1440px] mx-auto w-full px-8 py-10">
      <h1 class="text-slate-900 dark:text-white text-5xl mb-10">{title}</h1>
      {body}
    </main>

    <footer class="mt-auto py-8 border-t border-slate-200 dark:border-slate-800 text-center">
      <p class="text-xs font-bold text-slate-400 dark:text-slate-500 uppercase tracking-widest">STOREDASH · {route}</p>
    </footer>
  </div>

  <script>
    (function() {{
      const htmlEl = document.documentElement;
      const themeIcon = document.getElementById('theme-icon');
      function setTheme(mode) {{
        if (mode === 'dark') {{
          htmlEl.classList.add('dark');
          themeIcon.textContent = 'dark_mode';
        }} else {{
          htmlEl.classList.remove('dark');
          themeIcon.textContent = 'light_mode';
        }}
        localStorage.setItem('sd-theme', mode);
      }}
      const storedTheme = localStorage.getItem('sd-theme');
      if (storedTheme === 'dark' || storedTheme === 'light') {{
        setTheme(storedTheme);
      }} else {{
        setTheme(window.matchMedia && window.matchMedia('(prefers-color-scheme: dark)').matches ? 'dark' : 'light');
      }}
      document.getElementById('theme-toggle').addEventListener('click', function() {{
        setTheme(htmlEl.classList.contains('dark') ? 'light' : 'dark');
      }});
    }})();
  </script>
</body>
</html>
"####,
        page_file = escape_html(&page.page),
        nav = nav(page.kind),
        body = body(page),
        route = escape_html(&page.route),
    );

    html.into_bytes()
}
