//! Process-level setup for hosts embedding the analysis core.

use tracing_subscriber::{
	fmt::writer::BoxMakeWriter, prelude::__tracing_subscriber_SubscriberExt,
	util::SubscriberInitExt,
};

/// Installs a stderr logger. Stdout is left alone since hosts commonly use it
/// as their RPC channel. Calling this more than once is harmless.
pub fn logging() {
	/// Like [`tracing_subscriber::fmt::time::Uptime`] but with
	/// hour/minute/second formatting for better clarity.
	#[derive(Debug, Clone, Copy, PartialEq, Eq)]
	struct Uptime(std::time::Instant);

	impl Default for Uptime {
		fn default() -> Self {
			Self(std::time::Instant::now())
		}
	}

	impl tracing_subscriber::fmt::time::FormatTime for Uptime {
		fn format_time(
			&self,
			w: &mut tracing_subscriber::fmt::format::Writer<'_>,
		) -> std::fmt::Result {
			let elapsed = self.0.elapsed();
			let hours = elapsed.as_secs() / 3600;
			let mins = (elapsed.as_secs() / 60) % 60;
			let secs = elapsed.as_secs() % 60;
			write!(w, "{hours:02}:{mins:02}:{secs:02}")
		}
	}

	let layer_stderr = tracing_subscriber::fmt::Layer::default()
		.with_timer(Uptime::default())
		.with_ansi(false)
		.with_writer(BoxMakeWriter::new(std::io::stderr));

	let _ = tracing_subscriber::registry().with(layer_stderr).try_init();
}
