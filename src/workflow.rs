use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use lookout::queries::{
	FirstLastSeenQuery, FirstLastSeenRequest, RecentCasesQuery, RecentCasesRequest,
	RuleAlertsQuery, RuleAlertsRequest, TotalCountQuery, TotalCountRequest,
};
use lookout::search::SubscriptionStats;
use lookout::{
	Corpus, DocValueField, LogNotifier, LocalSearch, SearchClient, SearchHook, SearchQuery,
};
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::cli::QueryCommand;
use crate::settings::ResolvedConfig;

/// What one search run produced.
#[derive(Debug, Serialize)]
pub(crate) struct Report {
	pub(crate) query: &'static str,
	/// `false` when the timeout elapsed before a terminal response.
	pub(crate) settled: bool,
	pub(crate) state: Value,
	pub(crate) stats: SubscriptionStats,
}

/// Runs one query against the local backend and waits for it to settle.
pub(crate) struct SearchWorkflow {
	search: Arc<LocalSearch>,
	strategy: Option<String>,
	timeout: Duration,
}

impl SearchWorkflow {
	pub(crate) fn from_config(settings: &ResolvedConfig) -> Result<Self> {
		let corpus = match &settings.corpus {
			Some(path) => Corpus::from_path(path)?,
			None => Corpus::new(),
		};
		info!(documents = corpus.len(), "corpus loaded");

		let mut search = LocalSearch::spawn(corpus, settings.tuning.clone());
		if let Some(strategy) = &settings.strategy {
			search = search.with_strategy(strategy.clone());
		}

		Ok(Self {
			search: Arc::new(search),
			strategy: settings.strategy.clone(),
			timeout: settings.timeout,
		})
	}

	pub(crate) fn run(&self, command: &QueryCommand) -> Result<Report> {
		match command {
			QueryCommand::FirstLastSeen {
				field,
				value,
				indices,
				order,
				doc_value_fields,
			} => {
				let request = FirstLastSeenRequest::new(field.clone(), value.clone())
					.with_indices(indices.iter().cloned())
					.with_order((*order).into())
					.with_doc_value_fields(
						doc_value_fields.iter().cloned().map(DocValueField::new).collect(),
					);
				self.execute(FirstLastSeenQuery, request)
			}
			QueryCommand::TotalCount { indices, from, to } => {
				let mut request = TotalCountRequest::new(indices.iter().cloned());
				if let (Some(from), Some(to)) = (from, to) {
					request = request.within(*from, *to);
				}
				self.execute(TotalCountQuery, request)
			}
			QueryCommand::RuleAlerts { signal_index, size } => {
				let mut request = RuleAlertsRequest::new(signal_index.clone());
				request.size = *size;
				self.execute(RuleAlertsQuery, request)
			}
			QueryCommand::RecentCases { from, to } => {
				self.execute(RecentCasesQuery, RecentCasesRequest::for_range(*from, *to))
			}
		}
	}

	fn execute<Q>(&self, query: Q, request: Q::Request) -> Result<Report>
	where
		Q: SearchQuery,
		Q::Data: Serialize,
		LocalSearch: SearchClient<Q::Request, Q::Response>,
	{
		let client: Arc<dyn SearchClient<Q::Request, Q::Response>> = self.search.clone();
		let mut hook = SearchHook::new(query, client, Arc::new(LogNotifier));
		if let Some(strategy) = &self.strategy {
			hook = hook.with_strategy(strategy.clone());
		}

		hook.start(request);
		let settled = hook.wait(self.timeout);
		if !settled {
			warn!(query = Q::ID, timeout_ms = self.timeout.as_millis() as u64, "search timed out");
			hook.dispose();
		}

		Ok(Report {
			query: Q::ID,
			settled,
			state: serde_json::to_value(hook.state())?,
			stats: hook.stats(),
		})
	}
}
