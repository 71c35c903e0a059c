// src/mail/compose.rs
//! Subject and bodies for the inbox notification.
//!
//! HTML uses the already entity-encoded `sanitized` values; plain text uses the
//! trimmed `raw` values so readers don't see `&amp;` in their mail client.

use chrono::{DateTime, TimeZone};

use super::OutboundMail;
use crate::config::FormSettings;
use crate::submission::{FormType, Submission};

/// `brand_story` -> `Brand story`.
pub fn humanize(value: &str) -> String {
    let spaced = value.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Collapse whitespace so user text can't stretch a header over several lines.
fn one_line(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn nl2br(value: &str) -> String {
    value.replace("\r\n", "\n").replace('\n', "<br>\n")
}

fn received_stamp<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.format("%B %-d, %Y, %-I:%M %P").to_string()
}

pub fn compose<Tz: TimeZone>(
    s: &Submission,
    settings: &FormSettings,
    received_at: &DateTime<Tz>,
) -> OutboundMail
where
    Tz::Offset: std::fmt::Display,
{
    let received = received_stamp(received_at);
    let (subject, heading, rows, text_rows) = match s.form_type {
        FormType::Writer => (
            format!(
                "{} - Script Submission: {}",
                settings.subject_prefix,
                one_line(&s.script_title.raw)
            ),
            "New Script Submission",
            vec![
                ("Writer Name", s.name.sanitized.clone()),
                ("Email Address", mailto(&s.email.sanitized)),
                ("Script Type", humanize(&s.script_type.sanitized)),
                ("Script Title", s.script_title.sanitized.clone()),
                ("Logline / Synopsis", nl2br(&s.logline.sanitized)),
            ],
            vec![
                ("Writer Name", s.name.raw.clone()),
                ("Email Address", s.email.raw.clone()),
                ("Script Type", humanize(&s.script_type.raw)),
                ("Script Title", s.script_title.raw.clone()),
                ("Logline / Synopsis", format!("\n{}", s.logline.raw)),
            ],
        ),
        FormType::Client => (
            format!(
                "{} - {}",
                settings.subject_prefix,
                one_line(&humanize(&s.project_type.raw))
            ),
            "New Project Request",
            vec![
                ("Client Name", s.name.sanitized.clone()),
                ("Email Address", mailto(&s.email.sanitized)),
                ("Project Type", humanize(&s.project_type.sanitized)),
                ("Project Description", nl2br(&s.description.sanitized)),
            ],
            vec![
                ("Client Name", s.name.raw.clone()),
                ("Email Address", s.email.raw.clone()),
                ("Project Type", humanize(&s.project_type.raw)),
                ("Project Description", format!("\n{}", s.description.raw)),
            ],
        ),
    };

    let html_body = render_html(settings, heading, &rows, &received);

    let mut text_body = format!("{heading} - {}\n\n", settings.site_name);
    for (label, value) in &text_rows {
        text_body.push_str(&format!("{label}: {value}\n"));
    }
    text_body.push_str(&format!(
        "\n---\nThis email was sent from the {} website form\nReceived on: {received}\n",
        settings.site_name
    ));

    OutboundMail {
        subject,
        text_body,
        html_body,
        reply_to_name: one_line(&s.name.raw),
        reply_to_email: s.email.raw.clone(),
    }
}

fn mailto(encoded_email: &str) -> String {
    format!("<a href=\"mailto:{encoded_email}\">{encoded_email}</a>")
}

fn render_html(
    settings: &FormSettings,
    heading: &str,
    rows: &[(&str, String)],
    received: &str,
) -> String {
    let site = html_escape::encode_text(&settings.site_name);
    let logo = settings
        .logo_url
        .as_deref()
        .map(|url| {
            format!(
                "<img src=\"{}\" alt=\"{site}\" style=\"height:70px;display:block;margin:0 auto;\">",
                html_escape::encode_double_quoted_attribute(url)
            )
        })
        .unwrap_or_default();

    let mut body = String::new();
    for (label, value) in rows {
        body.push_str(&format!(
            "<div class=\"field-row\"><span class=\"field-label\">{label}</span>\
             <div class=\"field-value\">{value}</div></div>\n"
        ));
    }

    format!(
        "<html><head><meta charset=\"utf-8\"><style>\
         body{{margin:0;background:#fdfbf7;font-family:Helvetica,Arial,sans-serif}}\
         .main{{background:#fff;margin:0 auto;max-width:600px;border-radius:8px}}\
         .header{{background:#2d8b84;padding:32px 0;text-align:center;color:#fff}}\
         .body{{padding:32px 40px}}\
         .field-row{{margin-bottom:20px;border-bottom:1px solid #f0f0f0;padding-bottom:12px}}\
         .field-label{{font-size:12px;color:#888;text-transform:uppercase;letter-spacing:1px}}\
         .field-value{{font-size:16px;color:#333;line-height:1.5}}\
         .footer{{background:#f5f1eb;padding:20px;text-align:center;color:#666;font-size:12px}}\
         </style></head><body><div class=\"main\">\
         <div class=\"header\">{logo}<h1>{heading}</h1></div>\
         <div class=\"body\">\n{body}</div>\
         <div class=\"footer\"><p><strong>{site}</strong></p><p>Received: {received}</p></div>\
         </div></body></html>"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::submission::ContactForm;
    use chrono::{TimeZone, Utc};

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 7, 14, 5, 0).unwrap()
    }

    fn settings() -> FormSettings {
        FormSettings {
            subject_prefix: "New Project Request - Studio".into(),
            site_name: "Studio".into(),
            ..FormSettings::default()
        }
    }

    #[test]
    fn humanize_project_types() {
        assert_eq!(humanize("brand_story"), "Brand story");
        assert_eq!(humanize("ghostwriting"), "Ghostwriting");
        assert_eq!(humanize(""), "");
    }

    #[test]
    fn client_mail() {
        let s = Submission::from(ContactForm {
            form_type: "client".into(),
            name: "Ngozi & Co".into(),
            email: "ngozi@example.com".into(),
            project_type: "brand_story".into(),
            description: "Line one\nLine <two>".into(),
            ..Default::default()
        });
        let m = compose(&s, &settings(), &at());
        assert_eq!(m.subject, "New Project Request - Studio - Brand story");
        assert!(m.html_body.contains("Ngozi &amp; Co"));
        assert!(m.html_body.contains("Line one<br>\nLine &lt;two&gt;"));
        assert!(!m.html_body.contains("<two>"));
        assert!(m.text_body.contains("Client Name: Ngozi & Co"));
        assert!(m.text_body.contains("Received on: March 7, 2025, 2:05 pm"));
        assert_eq!(m.reply_to_email, "ngozi@example.com");
    }

    #[test]
    fn writer_subject_is_single_line() {
        let s = Submission::from(ContactForm {
            form_type: "writer".into(),
            name: "Kwame".into(),
            email: "kwame@example.com".into(),
            script_type: "short_film".into(),
            script_title: "The\r\nLong   Road".into(),
            logline: "A courier crosses three borders in one night.".into(),
            ..Default::default()
        });
        let m = compose(&s, &settings(), &at());
        assert_eq!(
            m.subject,
            "New Project Request - Studio - Script Submission: The Long Road"
        );
        assert!(m.html_body.contains("Short film"));
        assert!(m.text_body.contains("Writer Name: Kwame"));
    }
}
