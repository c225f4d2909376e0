//! Server-rendered pages for the interactive surface.

use crate::app::{CafeForm, FormErrors};
use crate::domain::cafe::{Cafe, CafeField, FieldKind};
use crate::infra::ApiDocumentation;
use std::fmt::Write;

pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title}</title>\n</head>\n<body>\n\
         <nav><a href=\"/\">Cafes</a> | <a href=\"/add\">Add a cafe</a> | \
         <a href=\"/documentation\">API</a></nav>\n{body}\n</body>\n</html>\n",
        title = escape(title),
        body = body
    )
}

pub fn render_home(cafes: &[Cafe]) -> String {
    let mut body = String::from("<h1>Cafes</h1>\n<table>\n<tr>");
    for field in CafeField::ALL {
        let _ = write!(body, "<th>{}</th>", escape(field.display_name()));
    }
    body.push_str("</tr>\n");

    for cafe in cafes {
        body.push_str("<tr>");
        for field in CafeField::ALL {
            let text = escape(&cafe.field_text(field));
            if field.kind() == FieldKind::Url {
                let _ = write!(body, "<td><a href=\"{0}\">{0}</a></td>", text);
            } else {
                let _ = write!(body, "<td>{}</td>", text);
            }
        }
        body.push_str("</tr>\n");
    }
    body.push_str("</table>");
    layout("Cafes", &body)
}

fn input_for(field: CafeField, value: &str) -> String {
    let name = field.as_str();
    match field.kind() {
        FieldKind::Boolean => {
            let option = |literal: &str| {
                let selected = if value.eq_ignore_ascii_case(literal) { " selected" } else { "" };
                format!("<option value=\"{0}\"{1}>{0}</option>", literal, selected)
            };
            format!(
                "<select id=\"{name}\" name=\"{name}\"><option value=\"\"></option>{}{}</select>",
                option("True"),
                option("False"),
                name = name
            )
        }
        FieldKind::Price => format!(
            "<input id=\"{name}\" name=\"{name}\" type=\"number\" min=\"0\" step=\"0.01\" value=\"{value}\">",
            name = name,
            value = escape(value)
        ),
        FieldKind::Text | FieldKind::Url => format!(
            "<input id=\"{name}\" name=\"{name}\" type=\"text\" value=\"{value}\">",
            name = name,
            value = escape(value)
        ),
    }
}

fn form_label(field: CafeField) -> &'static str {
    match field {
        CafeField::Name => "Cafe Name",
        CafeField::MapUrl => "Map URL",
        CafeField::ImgUrl => "Image URL",
        CafeField::CoffeePrice => "Coffee Price (£)",
        CafeField::CanTakeCalls => "Can take calls",
        other => other.display_name(),
    }
}

pub fn render_add_form(form: &CafeForm, errors: &FormErrors) -> String {
    let mut body = String::from("<h1>Add a cafe</h1>\n<form method=\"post\" action=\"/add\">\n");
    for field in CafeField::ALL {
        let _ = write!(
            body,
            "<p><label for=\"{}\">{}</label> {}",
            field.as_str(),
            escape(form_label(field)),
            input_for(field, form.value(field).unwrap_or_default())
        );
        if let Some(message) = errors.get(field) {
            let _ = write!(body, " <span class=\"error\">{}</span>", escape(message));
        }
        body.push_str("</p>\n");
    }
    body.push_str("<p><button type=\"submit\">Add</button></p>\n</form>");
    layout("Add a cafe", &body)
}

pub fn render_documentation(doc: &ApiDocumentation) -> String {
    let mut body = String::from("<h1>API documentation</h1>\n");
    for endpoint in &doc.endpoints {
        let _ = write!(
            body,
            "<section>\n<h2><code>{} {}</code></h2>\n<p>{}</p>\n",
            escape(&endpoint.method),
            escape(&endpoint.path),
            escape(&endpoint.description)
        );
        if !endpoint.params.is_empty() {
            body.push_str("<table>\n<tr><th>Parameter</th><th>In</th><th>Required</th><th>Description</th></tr>\n");
            for param in &endpoint.params {
                let _ = writeln!(
                    body,
                    "<tr><td><code>{}</code></td><td>{}</td><td>{}</td><td>{}</td></tr>",
                    escape(&param.name),
                    escape(&param.location),
                    if param.required { "yes" } else { "no" },
                    escape(&param.description)
                );
            }
            body.push_str("</table>\n");
        }
        body.push_str("</section>\n");
    }
    body.push_str("<p>Interactive reference: <a href=\"/swagger-ui\">Swagger UI</a></p>");
    layout("API documentation", &body)
}
