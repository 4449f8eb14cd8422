//! The diagnostics collaborator seam.
//!
//! Every stage raises problems through [`DiagSink`] at the point of detection.
//! Nothing here aggregates or deduplicates; each call site stands alone.

use lsp_types::{Diagnostic, DiagnosticRelatedInformation, DiagnosticSeverity, Location, Url};
use text_size::TextRange;

use crate::lines::LineIndex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diag {
	pub span: TextRange,
	pub severity: DiagnosticSeverity,
	pub message: String,
	pub related: Option<(TextRange, String)>,
}

impl Diag {
	#[must_use]
	pub fn error(span: TextRange, message: impl Into<String>) -> Self {
		Self {
			span,
			severity: DiagnosticSeverity::ERROR,
			message: message.into(),
			related: None,
		}
	}

	#[must_use]
	pub fn info(span: TextRange, message: impl Into<String>) -> Self {
		Self {
			span,
			severity: DiagnosticSeverity::INFORMATION,
			message: message.into(),
			related: None,
		}
	}

	#[must_use]
	pub fn with_related(mut self, span: TextRange, message: impl Into<String>) -> Self {
		self.related = Some((span, message.into()));
		self
	}

	#[must_use]
	pub fn to_lsp(&self, lndx: &LineIndex, uri: &Url) -> Diagnostic {
		Diagnostic {
			range: lndx.range_utf16(self.span),
			severity: Some(self.severity),
			code: None,
			code_description: None,
			source: Some("angells".to_string()),
			message: self.message.clone(),
			related_information: self.related.as_ref().map(|(span, msg)| {
				vec![DiagnosticRelatedInformation {
					location: Location {
						uri: uri.clone(),
						range: lndx.range_utf16(*span),
					},
					message: msg.clone(),
				}]
			}),
			tags: None,
			data: None,
		}
	}
}

/// Receives diagnostics as they are detected.
pub trait DiagSink {
	fn raise(&mut self, diag: Diag);
}

impl DiagSink for Vec<Diag> {
	fn raise(&mut self, diag: Diag) {
		self.push(diag);
	}
}

/// A sink that stops recording after a fixed number of diagnostics.
#[derive(Debug)]
pub struct Capped {
	pub diags: Vec<Diag>,
	limit: Option<usize>,
	dropped: usize,
}

impl Capped {
	#[must_use]
	pub fn new(limit: Option<usize>) -> Self {
		Self {
			diags: vec![],
			limit,
			dropped: 0,
		}
	}

	#[must_use]
	pub fn dropped(&self) -> usize {
		self.dropped
	}
}

impl DiagSink for Capped {
	fn raise(&mut self, diag: Diag) {
		if self.limit.is_some_and(|l| self.diags.len() >= l) {
			self.dropped += 1;
			return;
		}

		self.diags.push(diag);
	}
}
