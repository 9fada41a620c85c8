//! Side channel for user-visible failure reports.

use tracing::{error, warn};

/// Presentation details for an error notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ErrorToast<'a> {
	pub title: &'a str,
}

/// Fire-and-forget sink for failure notifications. Not part of result state.
pub trait Notifier: Send + Sync {
	fn add_error(&self, message: &str, toast: ErrorToast<'_>);

	fn add_warning(&self, message: &str);
}

/// Forwards notifications to the `tracing` subscriber.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
	fn add_error(&self, message: &str, toast: ErrorToast<'_>) {
		error!(title = toast.title, "{message}");
	}

	fn add_warning(&self, message: &str) {
		warn!("{message}");
	}
}
