//! Chart Page
//!
//! GET / renders the holdings form and the chart inline. The text field is
//! the pending amount; the hidden `committed` field carries the amount in
//! effect before the submission, so a rejected entry keeps the previous
//! chart instead of falling back to the default.

use axum::{
    extract::{Query, State},
    response::Html,
};
use std::sync::Arc;

use crate::api::dto::PageParams;
use crate::api::state::AppState;
use crate::chart::render::escape_xml;
use crate::executor::ExecutorState;
use crate::input::{parse_amount, HoldingsInput};

/// GET /
pub async fn index(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PageParams>,
) -> Html<String> {
    let previous = params
        .committed
        .as_deref()
        .and_then(|c| parse_amount(c).ok())
        .unwrap_or_else(|| state.default_amount());

    let mut input = HoldingsInput::new(previous);
    let mut notice = None;
    if let Some(amount) = params.amount {
        input.set_pending(amount);
        if let Err(e) = input.confirm() {
            notice = Some(e.to_string());
        }
    }

    let series = state.series(input.committed()).await;
    let svg = state.renderer.render(&series);

    let banner = match state.executor_state() {
        ExecutorState::Queried(_) => None,
        ExecutorState::Failed { reason, .. } => {
            Some(format!("Price history unavailable: {}", reason))
        }
        _ => Some("Loading price history…".to_string()),
    };

    Html(page_html(&input, notice.as_deref(), banner.as_deref(), &svg))
}

fn page_html(input: &HoldingsInput, notice: Option<&str>, banner: Option<&str>, svg: &str) -> String {
    let mut html = String::with_capacity(svg.len() + 2048);

    html.push_str(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>Holdings</title>\n<style>\n\
         body{background:#17171a;color:#eee;font-family:sans-serif;margin:2rem}\n\
         form{margin-bottom:1rem}\n\
         .notice{color:#f6685e}\n\
         .banner{color:#858ca2}\n\
         svg{max-width:100%;height:auto}\n\
         </style>\n</head>\n<body>\n",
    );

    let committed = input.committed().to_string();
    html.push_str(&format!(
        "<form method=\"get\" action=\"/\">\n\
         <label for=\"amount\">Holdings amount</label>\n\
         <input id=\"amount\" name=\"amount\" type=\"text\" inputmode=\"decimal\" value=\"{pending}\" \
         oninput=\"this.form.confirm.disabled = !this.value || this.value === this.form.committed.value\">\n\
         <input name=\"committed\" type=\"hidden\" value=\"{committed}\">\n\
         <button name=\"confirm\" type=\"submit\"{disabled}>Update</button>\n\
         </form>\n",
        pending = escape_xml(input.pending()),
        committed = escape_xml(&committed),
        disabled = if input.can_confirm() { "" } else { " disabled" },
    ));

    if let Some(notice) = notice {
        html.push_str(&format!("<p class=\"notice\">{}</p>\n", escape_xml(notice)));
    }
    if let Some(banner) = banner {
        html.push_str(&format!("<p class=\"banner\">{}</p>\n", escape_xml(banner)));
    }

    html.push_str(svg);
    html.push_str("\n</body>\n</html>\n");
    html
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confirm_disabled_when_unchanged() {
        let input = HoldingsInput::new(0.5);
        let html = page_html(&input, None, None, "<svg></svg>");
        assert!(html.contains("value=\"0.5\""));
        assert!(html.contains(" disabled>Update"));
    }

    #[test]
    fn test_pending_text_is_escaped() {
        let mut input = HoldingsInput::default();
        input.set_pending("\"><script>");
        let html = page_html(&input, Some("bad"), None, "<svg></svg>");
        assert!(!html.contains("\"><script>"));
        assert!(html.contains("<p class=\"notice\">bad</p>"));
    }

    #[test]
    fn test_notice_and_banner_precede_chart() {
        let input = HoldingsInput::new(2.0);
        let html = page_html(&input, Some("Invalid amount"), Some("Loading & waiting"), "<svg></svg>");
        assert!(html.contains("<p class=\"notice\">Invalid amount</p>\n<p class=\"banner\">Loading &amp; waiting</p>\n<svg></svg>"));
        assert!(html.contains("<form method=\"get\" action=\"/\">"));
        assert!(html.ends_with("</body>\n</html>\n"));
    }
}
