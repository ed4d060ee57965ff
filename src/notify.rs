//! Emailing anomaly reports.
//!
//! Transport lives behind [`NotificationSink`]. Delivery problems are logged
//! and reported as `false`; they never abort a detection run.

use tracing::{info, warn};

use crate::error::Result;
use crate::explain::MAX_REPORTED_ANOMALIES;

/// An outgoing HTML email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email {
    pub subject: String,
    pub html: String,
    pub recipients: Vec<String>,
}

/// Delivers emails.
pub trait NotificationSink {
    fn deliver(&self, email: &Email) -> Result<()>;
}

/// Attempt delivery, returning whether it succeeded.
///
/// An empty recipient list is a failed delivery and the sink is not called.
pub fn notify(
    sink: &dyn NotificationSink,
    subject: &str,
    html: &str,
    recipients: &[String],
) -> bool {
    if recipients.is_empty() {
        warn!("no recipients; skipping notification");
        return false;
    }

    let email = Email {
        subject: subject.to_string(),
        html: html.to_string(),
        recipients: recipients.to_vec(),
    };
    match sink.deliver(&email) {
        Ok(()) => {
            info!(recipients = recipients.len(), "notification delivered");
            true
        }
        Err(e) => {
            warn!(error = %e, "notification delivery failed");
            false
        }
    }
}

/// Split a comma-separated recipient list, dropping empty entries.
pub fn parse_recipients(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// HTML body listing the first [`MAX_REPORTED_ANOMALIES`] anomalies.
pub fn build_anomaly_html(title: &str, anomalies: &[String]) -> String {
    let items: String = anomalies
        .iter()
        .take(MAX_REPORTED_ANOMALIES)
        .map(|a| format!("<li>{}</li>", escape_html(a)))
        .collect();
    format!(
        "<html><body>\n<h3>{}</h3>\n<ul>{items}</ul>\n</body></html>\n",
        escape_html(title)
    )
}

/// Append an explanation block below the anomaly list.
pub fn append_explanation(html: &str, explanation: &str) -> String {
    let block = format!(
        "<hr><pre style='white-space:pre-wrap'>{}</pre>",
        escape_html(explanation)
    );
    match html.rfind("</body>") {
        Some(pos) => format!("{}{block}\n{}", &html[..pos], &html[pos..]),
        None => format!("{html}{block}"),
    }
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::cell::RefCell;

    #[derive(Default)]
    struct Outbox {
        sent: RefCell<Vec<Email>>,
        fail: bool,
    }

    impl NotificationSink for Outbox {
        fn deliver(&self, email: &Email) -> Result<()> {
            if self.fail {
                return Err(Error::Other("connection refused".to_string()));
            }
            self.sent.borrow_mut().push(email.clone());
            Ok(())
        }
    }

    #[test]
    fn recipients_are_split_and_trimmed() {
        assert_eq!(
            parse_recipients(" a@x.io, ,b@y.io ,,"),
            vec!["a@x.io", "b@y.io"]
        );
        assert!(parse_recipients("").is_empty());
    }

    #[test]
    fn html_lists_first_twenty_escaped() {
        let anomalies: Vec<String> = (0..25).map(|i| format!("<err {i}>")).collect();
        let html = build_anomaly_html("Detected anomalies", &anomalies);
        assert_eq!(html.matches("<li>").count(), MAX_REPORTED_ANOMALIES);
        assert!(html.contains("<li>&lt;err 0&gt;</li>"));
        assert!(!html.contains("err 20"));
        assert!(html.contains("<h3>Detected anomalies</h3>"));
    }

    #[test]
    fn explanation_goes_inside_body() {
        let html = build_anomaly_html("t", &["x".to_string()]);
        let html = append_explanation(&html, "a < b");
        let hr = html.find("<hr>").unwrap();
        assert!(hr < html.find("</body>").unwrap());
        assert!(html.contains("a &lt; b"));
    }

    #[test]
    fn delivery_success_and_failure() {
        let ok = Outbox::default();
        let to = vec!["ops@example.com".to_string()];
        assert!(notify(&ok, "Log Anomalies", "<p/>", &to));
        assert_eq!(ok.sent.borrow()[0].recipients, to);
        assert_eq!(ok.sent.borrow()[0].subject, "Log Anomalies");

        let failing = Outbox {
            fail: true,
            ..Default::default()
        };
        assert!(!notify(&failing, "Log Anomalies", "<p/>", &to));
    }

    #[test]
    fn no_recipients_skips_sink() {
        let ok = Outbox::default();
        assert!(!notify(&ok, "s", "b", &[]));
        assert!(ok.sent.borrow().is_empty());
    }
}
