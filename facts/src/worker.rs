//! Background worker for provider and tutor calls.
//!
//! The UI loop never awaits the network. It sends [`WorkerRequest`]s and
//! drains [`WorkerResponse`]s between frames. Each fact fetch runs in its own
//! task; the tutor conversation runs in one task per opened tutor view.

use std::sync::Arc;

use facts_core::{Fact, FactProvider, FactsConfig, FetchTicket, TutorSession};
use tokio::sync::mpsc;

/// Identifies one opened tutor view so late chunks from a closed one can be
/// told apart.
pub type TutorId = u64;

/// Request sent from the UI to the worker.
#[derive(Debug)]
pub enum WorkerRequest {
    /// Run a fetch for the feed.
    FetchFacts(FetchTicket),
    /// Start a tutor conversation and ask its opening question.
    OpenTutor { id: TutorId, topic: String },
    /// Follow-up question for the open tutor.
    AskTutor(String),
    /// Drop the open tutor conversation.
    CloseTutor,
    /// Shutdown the worker.
    Shutdown,
}

/// Response sent from the worker to the UI.
#[derive(Debug)]
pub enum WorkerResponse {
    /// A fetch finished. `facts` is empty when the provider failed.
    Facts { ticket: FetchTicket, facts: Vec<Fact> },
    /// Streaming tutor text.
    TutorChunk { id: TutorId, text: String },
    /// The tutor finished an answer.
    TutorComplete { id: TutorId },
    /// The tutor failed to answer.
    TutorError { id: TutorId, message: String },
}

/// Spawn the worker on the current runtime.
pub fn spawn_worker(
    provider: Arc<dyn FactProvider>,
    config: FactsConfig,
) -> (
    mpsc::Sender<WorkerRequest>,
    mpsc::UnboundedReceiver<WorkerResponse>,
) {
    let (request_tx, request_rx) = mpsc::channel(16);
    let (response_tx, response_rx) = mpsc::unbounded_channel();

    tokio::spawn(worker_loop(provider, config, request_rx, response_tx));

    (request_tx, response_rx)
}

async fn worker_loop(
    provider: Arc<dyn FactProvider>,
    config: FactsConfig,
    mut request_rx: mpsc::Receiver<WorkerRequest>,
    response_tx: mpsc::UnboundedSender<WorkerResponse>,
) {
    let mut tutor: Option<mpsc::UnboundedSender<String>> = None;

    loop {
        match request_rx.recv().await {
            Some(WorkerRequest::FetchFacts(ticket)) => {
                let provider = Arc::clone(&provider);
                let response_tx = response_tx.clone();
                tokio::spawn(async move {
                    tracing::debug!(mount = %ticket.mount, kind = ?ticket.kind, count = ticket.count, "fetch started");
                    let facts = provider.fetch_facts(ticket.count).await;
                    let _ = response_tx.send(WorkerResponse::Facts { ticket, facts });
                });
            }
            Some(WorkerRequest::OpenTutor { id, topic }) => {
                let (question_tx, question_rx) = mpsc::unbounded_channel();
                let session = TutorSession::new(topic, config.clone());
                tokio::spawn(tutor_loop(id, session, question_rx, response_tx.clone()));
                // Replacing the sender ends the previous conversation.
                tutor = Some(question_tx);
            }
            Some(WorkerRequest::AskTutor(question)) => match &tutor {
                Some(question_tx) if question_tx.send(question).is_ok() => {}
                _ => tracing::warn!("tutor question with no open tutor"),
            },
            Some(WorkerRequest::CloseTutor) => {
                tutor = None;
            }
            Some(WorkerRequest::Shutdown) | None => {
                break;
            }
        }
    }
}

/// Answer the opening question, then every follow-up until the UI closes
/// the tutor.
async fn tutor_loop(
    id: TutorId,
    mut session: TutorSession,
    mut questions: mpsc::UnboundedReceiver<String>,
    response_tx: mpsc::UnboundedSender<WorkerResponse>,
) {
    let mut question = Some(session.opening_question());

    loop {
        let current = match question.take() {
            Some(q) => q,
            None => match questions.recv().await {
                Some(q) => q,
                None => break,
            },
        };

        let chunks = response_tx.clone();
        let result = session
            .ask(&current, |text| {
                let _ = chunks.send(WorkerResponse::TutorChunk {
                    id,
                    text: text.to_string(),
                });
            })
            .await;

        let response = match result {
            Ok(_) => WorkerResponse::TutorComplete { id },
            Err(e) => {
                tracing::warn!(topic = %session.topic(), error = %e, "tutor failed");
                WorkerResponse::TutorError {
                    id,
                    message: e.to_string(),
                }
            }
        };
        if response_tx.send(response).is_err() {
            break;
        }
    }

    tracing::debug!(id, topic = %session.topic(), "tutor closed");
}

#[cfg(test)]
mod tests {
    use super::*;
    use facts_core::testing::{numbered_facts, MockFactProvider};
    use facts_core::Feed;

    #[tokio::test]
    async fn test_fetch_round_trip() {
        let provider = Arc::new(MockFactProvider::new(vec![numbered_facts("w", 3)]));
        let config = FactsConfig::new().with_initial_batch(3);
        let (request_tx, mut response_rx) = spawn_worker(provider.clone(), config.clone());

        let mut feed = Feed::new(&config);
        let ticket = feed.begin_initial_load().unwrap();
        request_tx
            .send(WorkerRequest::FetchFacts(ticket))
            .await
            .unwrap();

        match response_rx.recv().await {
            Some(WorkerResponse::Facts {
                ticket: returned,
                facts,
            }) => {
                assert_eq!(returned, ticket);
                assert_eq!(facts.len(), 3);
            }
            other => panic!("unexpected response: {other:?}"),
        }
        assert_eq!(provider.calls(), vec![3]);

        request_tx.send(WorkerRequest::Shutdown).await.unwrap();
    }
}
