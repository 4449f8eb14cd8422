//! The error type for fallible host-facing operations.
//!
//! Problems in user code never surface here; those are [`Diag`](crate::diag::Diag)s.

use crate::{lines::LineCol, ErrorBox};

#[derive(Debug)]
pub enum Error {
	/// A position supplied by the host does not fall inside the document.
	Position(LineCol),
	Process {
		source: Option<ErrorBox>,
		ctx: String,
	},
}

impl std::error::Error for Error {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		match self {
			Self::Process {
				source: Some(s), ..
			} => Some(s.as_ref()),
			Self::Process { source: None, .. } | Self::Position(_) => None,
		}
	}
}

impl std::fmt::Display for Error {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Position(lc) => write!(f, "invalid position {}:{}", lc.line + 1, lc.col + 1),
			Self::Process { source, ctx } => match source {
				Some(s) => {
					write!(f, "{ctx}: {s}")
				}
				None => {
					write!(f, "{ctx}")
				}
			},
		}
	}
}

impl From<serde_json::Error> for Error {
	fn from(value: serde_json::Error) -> Self {
		Self::Process {
			source: Some(Box::new(value)),
			ctx: "failed to decode configuration".to_string(),
		}
	}
}
