use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// None of the answers a scorer looks for were given.
    UnspecifiedAnswer,
    /// The answers look like a data-entry slip.
    SuspiciousAnswer,
}

/// Non-fatal finding raised while scoring a model. The score it concerns
/// falls back to the documented partial credit (usually 0).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub model: String,
    pub criterion: String,
    pub kind: DiagnosticKind,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.kind {
            DiagnosticKind::UnspecifiedAnswer => "not specified",
            DiagnosticKind::SuspiciousAnswer => "check answer",
        };
        write!(f, "{} / {}: {} ({})", self.model, self.criterion, self.message, tag)
    }
}

/// Collects diagnostics for one model while its rules run.
#[derive(Debug)]
pub struct DiagnosticSink<'a> {
    model: &'a str,
    criterion: &'a str,
    out: &'a mut Vec<Diagnostic>,
}

impl<'a> DiagnosticSink<'a> {
    pub fn new(model: &'a str, criterion: &'a str, out: &'a mut Vec<Diagnostic>) -> Self {
        Self {
            model,
            criterion,
            out,
        }
    }

    pub fn unspecified(&mut self, message: impl Into<String>) {
        self.push(DiagnosticKind::UnspecifiedAnswer, message.into());
    }

    pub fn suspicious(&mut self, message: impl Into<String>) {
        self.push(DiagnosticKind::SuspiciousAnswer, message.into());
    }

    fn push(&mut self, kind: DiagnosticKind, message: String) {
        self.out.push(Diagnostic {
            model: self.model.to_string(),
            criterion: self.criterion.to_string(),
            kind,
            message,
        });
    }
}

/// Drop repeats of the same (model, criterion, kind, message), keeping the
/// first occurrence. A criterion shared by several groups is scored once per
/// group, but should only be reported once.
pub fn dedup(diagnostics: Vec<Diagnostic>) -> Vec<Diagnostic> {
    let mut seen = HashSet::new();
    diagnostics
        .into_iter()
        .filter(|d| {
            seen.insert((
                d.model.clone(),
                d.criterion.clone(),
                d.kind,
                d.message.clone(),
            ))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sink_tags_model_and_criterion() {
        let mut out = Vec::new();
        let mut sink = DiagnosticSink::new("oemof", "Heat", &mut out);
        sink.unspecified("heat representation not specified");
        sink.suspicious("other heat representation given");
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].model, "oemof");
        assert_eq!(out[0].criterion, "Heat");
        assert_eq!(out[0].kind, DiagnosticKind::UnspecifiedAnswer);
        assert_eq!(out[1].kind, DiagnosticKind::SuspiciousAnswer);
    }

    #[test]
    fn test_dedup_keeps_first() {
        let d = Diagnostic {
            model: "m".to_string(),
            criterion: "c".to_string(),
            kind: DiagnosticKind::UnspecifiedAnswer,
            message: "x".to_string(),
        };
        let mut other = d.clone();
        other.model = "n".to_string();
        let result = dedup(vec![d.clone(), other.clone(), d.clone()]);
        assert_eq!(result, vec![d, other]);
    }

    #[test]
    fn test_display() {
        let d = Diagnostic {
            model: "TIMES".to_string(),
            criterion: "Decision making".to_string(),
            kind: DiagnosticKind::UnspecifiedAnswer,
            message: "decision making not specified".to_string(),
        };
        assert_eq!(
            d.to_string(),
            "TIMES / Decision making: decision making not specified (not specified)"
        );
    }
}
