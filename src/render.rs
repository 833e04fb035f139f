//! Response rendering for records.
//!
//! A record knows how to present itself as an htmx fragment or a table row;
//! [`RenderMode`] picks which of those (or plain JSON, or a whole page) a
//! deployment serves. Handlers never build markup themselves.

use axum::{
    Json,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::fmt::Write;

use crate::db::{Appointment, InventoryItem, Patient};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    Json,
    #[default]
    Fragment,
    Table,
    Page,
}

pub trait Render: Serialize {
    /// Heading used by full-page rendering.
    const TITLE: &'static str;
    /// Table column headers, matching the cells of [`Render::table_row`].
    const HEADERS: &'static [&'static str];

    fn fragment(&self) -> String;

    fn cells(&self) -> Vec<String>;

    fn table_row(&self) -> String {
        let mut row = String::from("<tr>");
        for cell in self.cells() {
            let _ = write!(row, "<td>{}</td>", escape_html(&cell));
        }
        row.push_str("</tr>");
        row
    }
}

impl Render for Patient {
    const TITLE: &'static str = "Patients";
    const HEADERS: &'static [&'static str] =
        &["ID", "Name", "Age", "Email", "Phone", "History"];

    fn fragment(&self) -> String {
        format!("<div>{} - {}</div>", escape_html(&self.name), self.age)
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.age.to_string(),
            self.email.clone(),
            self.phone.clone(),
            self.history.clone(),
        ]
    }
}

impl Render for Appointment {
    const TITLE: &'static str = "Appointments";
    const HEADERS: &'static [&'static str] =
        &["ID", "Patient ID", "Date", "Time", "Description"];

    fn fragment(&self) -> String {
        format!(
            "<div>Appointment: {} at {}</div>",
            escape_html(&self.date),
            escape_html(&self.time)
        )
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.patient_id.to_string(),
            self.date.clone(),
            self.time.clone(),
            self.description.clone(),
        ]
    }
}

impl Render for InventoryItem {
    const TITLE: &'static str = "Inventory";
    const HEADERS: &'static [&'static str] = &["ID", "Item Name", "Quantity"];

    fn fragment(&self) -> String {
        format!(
            "<div>{}: {}</div>",
            escape_html(&self.item_name),
            self.quantity
        )
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.item_name.clone(),
            self.quantity.to_string(),
        ]
    }
}

const PAGE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <title>{title}</title>
</head>
<body>
    <h1>{title}</h1>
    <table>
        <thead><tr>{headers}</tr></thead>
        <tbody>{rows}</tbody>
    </table>
</body>
</html>
"#;

/// Render a full list response.
pub fn render_list<R: Render>(mode: RenderMode, records: &[R]) -> Response {
    match mode {
        RenderMode::Json => Json(records).into_response(),
        RenderMode::Fragment => {
            Html(records.iter().map(R::fragment).collect::<String>()).into_response()
        }
        RenderMode::Table => {
            Html(records.iter().map(R::table_row).collect::<String>()).into_response()
        }
        RenderMode::Page => Html(render_page(records)).into_response(),
    }
}

/// Render a freshly created record with `201 Created`.
///
/// Page mode answers with a table row so the client can append it to the
/// table it already shows.
pub fn render_created<R: Render>(mode: RenderMode, record: &R) -> Response {
    let body = match mode {
        RenderMode::Json => return (StatusCode::CREATED, Json(record)).into_response(),
        RenderMode::Fragment => record.fragment(),
        RenderMode::Table | RenderMode::Page => record.table_row(),
    };
    (StatusCode::CREATED, Html(body)).into_response()
}

pub fn render_page<R: Render>(records: &[R]) -> String {
    let headers: String = R::HEADERS
        .iter()
        .map(|h| format!("<th>{}</th>", escape_html(h)))
        .collect();
    let rows: String = records.iter().map(R::table_row).collect();
    PAGE_TEMPLATE
        .replace("{title}", R::TITLE)
        .replace("{headers}", &headers)
        .replace("{rows}", &rows)
}

pub fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
