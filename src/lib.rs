//! Cancellable streaming search subscriptions.
//!
//! A [`SearchHook`] owns the result state of one search consumer. It builds
//! referentially stable requests, issues them through a [`SearchClient`],
//! folds the streamed response events into [`ResultState`] and guarantees
//! that at most one search is live at any time. Superseded or cancelled
//! searches can never write to the state.

pub mod app_dirs;
pub mod error;
pub mod hook;
pub mod logging;
pub mod notify;
pub mod queries;
pub mod reducer;
pub mod request;
pub mod search;

#[cfg(test)]
mod testing;

pub use error::{CorpusError, SearchError};
pub use hook::SearchHook;
pub use lookout_stream::{AbortController, AbortSignal, ResponseEvent, ResponseStream};
pub use notify::{ErrorToast, LogNotifier, Notifier};
pub use reducer::{ResultState, SearchQuery};
pub use request::{Direction, DocValueField, RequestBuilder};
pub use search::{Corpus, LocalSearch, ScanTuning, SearchClient, SearchOptions};
