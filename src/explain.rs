//! Natural-language explanations of anomalies.
//!
//! The crate does not talk to a language model itself. Callers implement
//! [`Explainer`] over whatever client they use; [`explain_anomalies`] builds
//! the prompt and guarantees a displayable string whatever happens.

use tracing::warn;

use crate::error::Result;

/// Anomalies beyond this count are left out of prompts and reports.
pub const MAX_REPORTED_ANOMALIES: usize = 20;

const SYSTEM_INSTRUCTION: &str = "You explain operational incidents concisely.";

const USER_PREAMBLE: &str = "The following log messages were flagged as anomalous. \
Briefly describe the likely problem, possible causes, and what to check.";

/// Shown instead of an explanation when no explainer is configured.
pub const MISSING_CREDENTIALS_NOTICE: &str =
    "No explanation provider configured; set credentials to enable explanations.";

/// A chat-style prompt for an explanation provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplainPrompt {
    pub system: String,
    pub user: String,
}

impl ExplainPrompt {
    /// Build a prompt from the first [`MAX_REPORTED_ANOMALIES`] messages.
    pub fn from_anomalies(messages: &[String]) -> Self {
        let bullets: Vec<String> = messages
            .iter()
            .take(MAX_REPORTED_ANOMALIES)
            .map(|m| format!("- {m}"))
            .collect();
        Self {
            system: SYSTEM_INSTRUCTION.to_string(),
            user: format!("{USER_PREAMBLE}\n\n{}", bullets.join("\n")),
        }
    }
}

/// Produces an explanation for a prompt.
pub trait Explainer {
    fn explain(&self, prompt: &ExplainPrompt) -> Result<String>;
}

/// Explain `messages`, degrading to a labeled fallback string instead of failing.
pub fn explain_anomalies(explainer: Option<&dyn Explainer>, messages: &[String]) -> String {
    let Some(explainer) = explainer else {
        return MISSING_CREDENTIALS_NOTICE.to_string();
    };

    let prompt = ExplainPrompt::from_anomalies(messages);
    match explainer.explain(&prompt) {
        Ok(text) => text.trim().to_string(),
        Err(e) => {
            warn!(error = %e, "explanation provider failed");
            format!("explanation unavailable: {e}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::cell::RefCell;

    struct Recording {
        seen: RefCell<Vec<ExplainPrompt>>,
        reply: Result<String>,
    }

    impl Explainer for Recording {
        fn explain(&self, prompt: &ExplainPrompt) -> Result<String> {
            self.seen.borrow_mut().push(prompt.clone());
            match &self.reply {
                Ok(s) => Ok(s.clone()),
                Err(e) => Err(Error::Other(e.to_string())),
            }
        }
    }

    fn messages(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("anomaly {i}")).collect()
    }

    #[test]
    fn prompt_is_capped() {
        let p = ExplainPrompt::from_anomalies(&messages(30));
        assert!(p.user.contains("- anomaly 19"));
        assert!(!p.user.contains("- anomaly 20"));
        assert_eq!(p.user.matches("\n- ").count(), MAX_REPORTED_ANOMALIES);
    }

    #[test]
    fn missing_explainer_gives_notice() {
        assert_eq!(
            explain_anomalies(None, &messages(2)),
            MISSING_CREDENTIALS_NOTICE
        );
    }

    #[test]
    fn reply_is_trimmed() {
        let r = Recording {
            seen: RefCell::new(Vec::new()),
            reply: Ok("  disk is full \n".to_string()),
        };
        assert_eq!(explain_anomalies(Some(&r), &messages(3)), "disk is full");
        assert_eq!(r.seen.borrow().len(), 1);
        assert!(r.seen.borrow()[0].user.contains("- anomaly 2"));
    }

    #[test]
    fn failure_becomes_labeled_string() {
        let r = Recording {
            seen: RefCell::new(Vec::new()),
            reply: Err(Error::Other("rate limited".to_string())),
        };
        let out = explain_anomalies(Some(&r), &messages(1));
        assert_eq!(out, "explanation unavailable: rate limited");
    }
}
