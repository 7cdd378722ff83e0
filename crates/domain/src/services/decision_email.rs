//! HTML rendering of decision emails sent to requesters.

use crate::models::{DecisionStatus, DecisionSubject, RequestKind};

const APPROVED_COLOR: &str = "#10b981";
const REJECTED_COLOR: &str = "#ef4444";

/// Subject line and HTML body of a decision email.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedEmail {
    pub subject: String,
    pub html: String,
}

/// Renders the email telling a requester how their request was decided.
///
/// `recipient_name` falls back to "User". Notes are included only when
/// present and non-blank. All interpolated values are HTML-escaped.
pub fn render_decision_email(
    subject: &DecisionSubject,
    status: DecisionStatus,
    recipient_name: Option<&str>,
    admin_notes: Option<&str>,
) -> RenderedEmail {
    let kind = subject.kind();
    let type_name = kind.display_name();
    let label = status.label();
    let color = match status {
        DecisionStatus::Approved => APPROVED_COLOR,
        DecisionStatus::Rejected => REJECTED_COLOR,
    };
    let name = recipient_name
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or("User");
    let notes = admin_notes.map(str::trim).filter(|n| !n.is_empty());

    let item_line = match subject {
        DecisionSubject::Rental {
            equipment_name,
            equipment_price,
        } => format!(
            "<p><strong>Equipment:</strong> {}</p>\n<p><strong>Price:</strong> ${}/day</p>",
            escape_html(equipment_name),
            equipment_price
        ),
        DecisionSubject::Provider { company_name } => format!(
            "<p><strong>Company:</strong> {}</p>",
            escape_html(company_name)
        ),
    };

    let notes_line = notes
        .map(|n| format!("<p><strong>Admin Notes:</strong> {}</p>", escape_html(n)))
        .unwrap_or_default();

    let closing = match (status, kind) {
        (DecisionStatus::Approved, RequestKind::Rental) => "Congratulations! You can now proceed with your equipment rental. Our team will contact you shortly with further details.",
        (DecisionStatus::Approved, RequestKind::Provider) => "Congratulations! Welcome to our provider network! You can now start listing your equipment.",
        (DecisionStatus::Rejected, _) if notes.is_some() => "Unfortunately, your request could not be approved at this time. Please review the admin notes above.",
        (DecisionStatus::Rejected, _) => "Unfortunately, your request could not be approved at this time. If you have any questions, please contact our support team.",
    };

    let html = format!(
        r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
<h1 style="color: {color};">Request {label}</h1>
<p>Dear {name},</p>
<p>Your {type_lower} request has been <strong>{status}</strong>.</p>
<div style="background-color: #f3f4f6; padding: 20px; border-radius: 8px; margin: 20px 0;">
<h3 style="margin-top: 0;">Request Details</h3>
<p><strong>Type:</strong> {type_name}</p>
{item_line}
<p><strong>Status:</strong> {status_upper}</p>
{notes_line}
</div>
<p>{closing}</p>
<p style="margin-top: 30px;">Best regards,<br>CropMate Team</p>
</div>"#,
        name = escape_html(name),
        type_lower = type_name.to_lowercase(),
        status_upper = status.to_string().to_uppercase(),
    );

    RenderedEmail {
        subject: format!("{} Request {}", type_name, label),
        html,
    }
}

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
