//! Read-only table rendering for the terminal and for a static HTML page.

use crate::config::PageConfig;
use crate::domain::model::{Datasets, Table, TableRecord};
use chrono::{DateTime, Utc};
use std::fmt::Write;

pub fn render_text(page: &PageConfig, datasets: &Datasets) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", page.title);
    let _ = writeln!(out, "{}", "=".repeat(page.title.chars().count()));
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", page.orders_caption);
    text_table(&mut out, &datasets.orders);
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", page.customers_caption);
    text_table(&mut out, &datasets.customers);
    out
}

fn text_table<T: TableRecord>(out: &mut String, table: &Table<T>) {
    let columns = table.columns();
    let mut widths: Vec<usize> = columns.iter().map(|c| c.chars().count()).collect();
    for row in table.rows() {
        for (width, cell) in widths.iter_mut().zip(row.cells()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |cells: Vec<&str>| {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
            .collect::<Vec<_>>()
            .join(" | ")
            .trim_end()
            .to_string()
    };

    let _ = writeln!(out, "{}", line(columns.to_vec()));
    let _ = writeln!(
        out,
        "{}",
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("-+-")
    );
    for row in table.rows() {
        let _ = writeln!(out, "{}", line(row.cells()));
    }
    if table.is_empty() {
        let _ = writeln!(out, "(no rows)");
    }
}

pub fn render_html(page: &PageConfig, datasets: &Datasets, generated_at: DateTime<Utc>) -> String {
    let mut out = String::new();
    let title = escape_html(&page.title);

    let _ = writeln!(out, "<!DOCTYPE html>");
    let _ = writeln!(out, "<html lang=\"en\">");
    let _ = writeln!(out, "<head>");
    let _ = writeln!(out, "<meta charset=\"utf-8\">");
    let _ = writeln!(out, "<title>{}</title>", title);
    let _ = writeln!(out, "<style>{}</style>", STYLE);
    let _ = writeln!(out, "</head>");
    let _ = writeln!(out, "<body>");
    let _ = writeln!(out, "<h1>{}</h1>", title);
    let _ = writeln!(out, "<p>{}</p>", escape_html(&page.orders_caption));
    html_table(&mut out, &datasets.orders);
    let _ = writeln!(out, "<p>{}</p>", escape_html(&page.customers_caption));
    html_table(&mut out, &datasets.customers);
    let _ = writeln!(
        out,
        "<footer>Generated {}</footer>",
        generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    let _ = writeln!(out, "</body>");
    let _ = writeln!(out, "</html>");
    out
}

const STYLE: &str = "body{font-family:sans-serif;margin:2rem}\
table{border-collapse:collapse;margin-bottom:2rem}\
th,td{border:1px solid #ccc;padding:4px 10px;text-align:left}\
th{background:#f4f4f4}footer{color:#888;font-size:small}";

fn html_table<T: TableRecord>(out: &mut String, table: &Table<T>) {
    let _ = writeln!(out, "<table data-relation=\"{}\">", table.relation());
    let _ = write!(out, "<thead><tr>");
    for column in table.columns() {
        let _ = write!(out, "<th>{}</th>", escape_html(column));
    }
    let _ = writeln!(out, "</tr></thead>");
    let _ = writeln!(out, "<tbody>");
    for row in table.rows() {
        let _ = write!(out, "<tr>");
        for cell in row.cells() {
            let _ = write!(out, "<td>{}</td>", escape_html(cell));
        }
        let _ = writeln!(out, "</tr>");
    }
    let _ = writeln!(out, "</tbody>");
    let _ = writeln!(out, "</table>");
}

pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
