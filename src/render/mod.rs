// src/render/mod.rs

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt::Write;

use crate::process::PackageRecord;

/// Identifier of the container element the cards land in.
pub static GRID_ID: &str = "sp-grid";

/// Shown in place of the grid whenever the load/map/render chain fails.
pub static FALLBACK_MESSAGE: &str =
    "Couldn't load sponsorship packages right now. Please Email: asteckel@pghtech.org";

static TAKEN_STATUS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)taken|sold\s*out|closed").expect("taken status pattern should be valid")
});

static BENEFIT_LABEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([^:]+):\s*(.*)$").expect("benefit label pattern should be valid")
});

/// Whether a status string marks the package as unavailable. Loose on
/// purpose: the sheet holds free text, so "Taken", "SOLD OUT", "sold   out"
/// and "Closed" all count.
pub fn is_taken(status: &str) -> bool {
    TAKEN_STATUS.is_match(status)
}

/// Escape text for interpolation into markup. Covers attribute values too,
/// so quotes are included.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Format a price cell as whole US dollars with thousands grouping, e.g.
/// "5000" -> "$5,000". Text that does not parse as a number passes through
/// untouched ("Contact for pricing").
pub fn format_usd(raw: &str) -> String {
    match raw.trim().parse::<f64>() {
        Ok(n) if n.is_finite() => {
            let units = n.abs().round() as i64;
            let digits = units.to_string();
            let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
            for (i, ch) in digits.chars().enumerate() {
                if i > 0 && (digits.len() - i) % 3 == 0 {
                    grouped.push(',');
                }
                grouped.push(ch);
            }
            let sign = if n < 0.0 { "-" } else { "" };
            format!("{}${}", sign, grouped)
        }
        _ => raw.to_string(),
    }
}

/// Render all cards, sorted ascending by rank. The sort is stable, so rows
/// sharing a rank keep their sheet order.
pub fn render_cards(items: &[PackageRecord]) -> String {
    let mut ordered: Vec<&PackageRecord> = items.iter().collect();
    ordered.sort_by_key(|it| it.sort);

    let mut html = String::new();
    for item in ordered {
        render_card(&mut html, item);
    }
    html
}

fn render_card(out: &mut String, it: &PackageRecord) {
    let taken = is_taken(&it.status);
    let status_class = if taken { "taken" } else { "available" };

    let _ = write!(
        out,
        concat!(
            "<article class=\"sp-card {cls}\">",
            "<div class=\"sp-header-row\">",
            "<span class=\"sp-status {cls}\">{status}</span>",
            "<h3 class=\"sp-title\">{name}</h3>",
            "</div>"
        ),
        cls = status_class,
        status = escape_html(&it.status),
        name = escape_html(&it.name),
    );

    // No empty paragraph when the sheet left the description blank.
    if !it.description.is_empty() {
        let _ = write!(
            out,
            "<p class=\"sp-desc\">{}</p>",
            escape_html(&it.description)
        );
    }

    let _ = write!(
        out,
        "<div><span class=\"sp-price\">{}</span></div>",
        escape_html(&format_usd(&it.price))
    );

    if !it.benefits.is_empty() {
        out.push_str("<ul class=\"sp-benefits\">");
        for benefit in &it.benefits {
            render_benefit(out, benefit);
        }
        out.push_str("</ul>");
    }

    out.push_str("<div class=\"sp-cta\">");
    if !taken {
        let _ = write!(
            out,
            "<a href=\"{}\">{}</a>",
            escape_html(&it.contact_href),
            escape_html(&it.contact_label)
        );
    }
    out.push_str("</div></article>");
}

/// "Label: rest" benefits get an emphasized label; anything else renders as
/// plain text.
fn render_benefit(out: &mut String, text: &str) {
    match BENEFIT_LABEL.captures(text) {
        Some(caps) => {
            let _ = write!(
                out,
                "<li><strong>{}:</strong> {}</li>",
                escape_html(&caps[1]),
                escape_html(&caps[2])
            );
        }
        None => {
            let _ = write!(out, "<li>{}</li>", escape_html(text));
        }
    }
}

/// Wrap card markup in the page shell. The grid section is the sole render
/// surface and is rebuilt wholesale on every run.
pub fn page(cards: &str) -> String {
    format!(
        concat!(
            "<!DOCTYPE html>\n",
            "<html lang=\"en\">\n",
            "<head><meta charset=\"utf-8\"><title>Sponsorship Packages</title></head>\n",
            "<body>\n",
            "<section id=\"{id}\">{cards}</section>\n",
            "</body>\n",
            "</html>\n"
        ),
        id = GRID_ID,
        cards = cards,
    )
}

/// The static apology page. Every failure kind looks the same to the reader.
pub fn fallback_page() -> String {
    page(&format!("<p>{}</p>", escape_html(FALLBACK_MESSAGE)))
}
