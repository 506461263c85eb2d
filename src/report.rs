//! Caller card rendering
//!
//! A card combines what is known about a number: the directory entry (if
//! any), call history stats and, for unknown callers, web results. It can
//! be rendered as terminal text, an HTML fragment or JSON.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::directory::CustomerProfile;
use crate::errors::Result;
use crate::highlight::{self, emphasis, escape};
use crate::search::SearchResult;
use crate::stats::CallStats;

/// Notes longer than this are cut with an ellipsis
const NOTE_MAX_CHARS: usize = 200;

#[derive(Debug, Clone, Serialize)]
pub struct CallerCard {
    /// The number as it was queried
    pub phone: String,
    pub customer: Option<CustomerProfile>,
    pub stats: CallStats,
    pub web_results: Vec<SearchResult>,
}

impl CallerCard {
    pub fn is_known(&self) -> bool {
        self.customer.is_some()
    }

    /// Short title for notifications
    pub fn title(&self) -> String {
        match &self.customer {
            Some(c) => c.business_name.clone(),
            None => format!("Unknown caller {}", self.phone),
        }
    }

    /// One-line summary: owed amount for customers, history counts for everyone
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();
        if let Some(c) = &self.customer {
            if !c.program.is_empty() {
                parts.push(c.program.clone());
            }
            parts.push(format!("Owes {}", euro(c.unpaid_total())));
        }
        parts.push(
            self.stats
                .ordered_directions()
                .iter()
                .map(|(d, s)| format!("{} {}", d, s.total))
                .collect::<Vec<_>>()
                .join(", "),
        );
        parts.join(" | ")
    }

    pub fn render_text(&self) -> String {
        let mut lines = Vec::new();
        match &self.customer {
            Some(c) => {
                let mut header = c.business_name.clone();
                if !c.program.is_empty() {
                    header.push_str(&format!(" ({})", c.program));
                }
                if !c.sector.is_empty() {
                    header.push_str(&format!(" [{}]", c.sector));
                }
                lines.push(format!("{} | Owes: {}", header, euro(c.unpaid_total())));

                let details = contact_details(c);
                if !details.is_empty() {
                    lines.push(details.join(" | "));
                }
                let note = short_note(&c.notes);
                if !note.is_empty() {
                    lines.push(format!("Note: {}", note));
                }
                if !c.tags.is_empty() {
                    let names: Vec<&str> = c.tags.iter().map(|t| t.name.as_str()).collect();
                    lines.push(format!("Tags: {}", names.join(", ")));
                }
                if !c.services.is_empty() {
                    lines.push("Services:".to_string());
                    lines.extend(c.services.iter().map(|s| {
                        format!(
                            "  {:<28} {:>12}  {:<10}  {}",
                            s.description,
                            euro(s.amount),
                            s.date,
                            if s.paid { "yes" } else { "no" }
                        )
                    }));
                }
                lines.push(format!("Unpaid total: {}", euro(c.unpaid_total())));
            }
            None => {
                lines.push(format!("Unknown caller  {}", self.phone));
                if !self.web_results.is_empty() {
                    lines.push("Web results:".to_string());
                    lines.extend(self.web_results.iter().map(|r| format!("  - {}", r.title)));
                }
            }
        }

        lines.push("Calls:".to_string());
        lines.extend(self.stats.ordered_directions().iter().map(|(direction, s)| {
            format!(
                "  {:<9} T {:>3}  W {:>3}  total {:>4}",
                format!("{}:", direction),
                s.today,
                s.week,
                s.total
            )
        }));
        if !self.stats.statuses.is_empty() {
            let statuses: Vec<String> = self
                .stats
                .statuses_by_count()
                .iter()
                .map(|(label, count)| format!("{} {}", label, count))
                .collect();
            lines.push(format!("Statuses: {}", statuses.join(", ")));
        }

        let mut out = lines.join("\n");
        out.push('\n');
        out
    }

    /// HTML fragment; web result titles get the number highlighted in `color`
    pub fn render_html(&self, color: &str) -> String {
        let mut out = String::from("<div class='caller-card'>");
        match &self.customer {
            Some(c) => {
                out.push_str(&format!("<h2>{}", escape(&c.business_name)));
                if !c.program.is_empty() {
                    out.push_str(&format!(" <small>( {} )</small>", escape(&c.program)));
                }
                if !c.sector.is_empty() {
                    out.push_str(&format!(" <small>[{}]</small>", escape(&c.sector)));
                }
                out.push_str(&format!(" | Owes: {}</h2>", escape(&euro(c.unpaid_total()))));

                let details = contact_details(c);
                if !details.is_empty() {
                    out.push_str(&format!("<p>{}</p>", escape(&details.join(" | "))));
                }
                let note = short_note(&c.notes);
                if !note.is_empty() {
                    out.push_str(&format!("<p><b>Note:</b> {}</p>", escape(&note)));
                }
                if !c.tags.is_empty() {
                    out.push_str("<div class='tags'>");
                    for t in &c.tags {
                        out.push_str(&format!(
                            "<span class='tag' style='background:{};'>{}</span>",
                            html_escape::encode_single_quoted_attribute(&t.color),
                            escape(&t.name)
                        ));
                    }
                    out.push_str("</div>");
                }
                if !c.services.is_empty() {
                    out.push_str(
                        "<table><thead><tr><th>job descr</th><th>euro amount</th>\
                         <th>date</th><th>paid</th></tr></thead><tbody>",
                    );
                    for s in &c.services {
                        out.push_str(&format!(
                            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                            escape(&s.description),
                            escape(&euro(s.amount)),
                            escape(&s.date),
                            if s.paid { "yes" } else { "no" }
                        ));
                    }
                    out.push_str("</tbody></table>");
                }
                out.push_str(&format!(
                    "<div class='unpaid'>Unpaid total: {}</div>",
                    escape(&euro(c.unpaid_total()))
                ));
            }
            None => {
                out.push_str(&format!(
                    "<span class='pill'>Unknown Caller</span> <b>{}</b>",
                    escape(&self.phone)
                ));
                if !self.web_results.is_empty() {
                    out.push_str("<div class='web'><b>Web results</b><ul>");
                    for r in &self.web_results {
                        let title = highlight::highlight(&r.title, &self.phone, emphasis(color));
                        out.push_str(&format!("<li>{}</li>", title));
                    }
                    out.push_str("</ul></div>");
                }
            }
        }

        out.push_str("<div class='stats'>");
        for (direction, s) in self.stats.ordered_directions() {
            out.push_str(&format!(
                "<div>{}: T {} W {}</div>",
                direction, s.today, s.week
            ));
        }
        out.push_str("</div></div>");
        out
    }

    pub fn render_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn contact_details(c: &CustomerProfile) -> Vec<String> {
    let mut details = Vec::new();
    let owner = c.owner_full();
    if !owner.is_empty() {
        details.push(format!("Owner: {}", owner));
    }
    if !c.vat.is_empty() {
        details.push(format!("VAT: {}", c.vat));
    }
    if !c.email.is_empty() {
        details.push(format!("Email: {}", c.email));
    }
    details
}

/// Plain-text note, cut to [`NOTE_MAX_CHARS`]
fn short_note(notes: &str) -> String {
    let plain = strip_html(notes);
    if plain.chars().count() > NOTE_MAX_CHARS {
        let cut: String = plain.chars().take(NOTE_MAX_CHARS).collect();
        format!("{}…", cut)
    } else {
        plain
    }
}

/// Remove tags, collapse whitespace and decode entities
pub fn strip_html(s: &str) -> String {
    static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<[^>]+>").expect("Valid tag regex"));
    static SPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("Valid whitespace regex"));

    if s.is_empty() {
        return String::new();
    }
    let no_tags = TAG.replace_all(s, " ");
    let collapsed = SPACE.replace_all(&no_tags, " ");
    html_escape::decode_html_entities(collapsed.trim()).into_owned()
}

/// Euro amount in Greek notation: `€1.234,50`
pub fn euro(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, c) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }
    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("{}€{},{:02}", sign, grouped, cents % 100)
}
