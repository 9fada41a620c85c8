use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use tracing::{debug, trace};

use super::commands::SearchCommand;
use super::corpus::Corpus;

/// Launches the background search worker thread and returns its command channel.
pub(crate) fn spawn(mut corpus: Corpus) -> Sender<SearchCommand> {
	let (command_tx, command_rx) = mpsc::channel();

	thread::spawn(move || worker_loop(&mut corpus, command_rx));

	command_tx
}

fn worker_loop(corpus: &mut Corpus, command_rx: Receiver<SearchCommand>) {
	while let Ok(command) = command_rx.recv() {
		if !handle_command(corpus, command) {
			break;
		}
	}
	debug!("search worker stopped");
}

fn handle_command(corpus: &mut Corpus, command: SearchCommand) -> bool {
	match command {
		SearchCommand::Run(job) => {
			job.run(corpus);
			true
		}
		SearchCommand::Index { index, documents } => {
			trace!(%index, count = documents.len(), "indexing documents");
			corpus.insert(index, documents);
			true
		}
		SearchCommand::Shutdown => false,
	}
}
