use log::debug;
use parking_lot::Mutex;

use super::{AnalysisError, AnalysisRequest, AnalysisResponse, InfoCollector};
use crate::sync::CancelToken;

/// Handle for one submitted request.
///
/// The worker talking to the engine keeps the ticket, polls
/// [`Ticket::is_cancelled`] and hands the ticket back on completion.
#[derive(Clone, Debug)]
pub struct Ticket {
    id: u64,
    request: AnalysisRequest,
    token: CancelToken,
}

impl Ticket {
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    #[must_use]
    pub fn request(&self) -> &AnalysisRequest {
        &self.request
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Collector for this request's engine output
    #[must_use]
    pub fn collector(&self) -> InfoCollector {
        InfoCollector::new(self.request.side_to_move())
    }
}

#[derive(Debug, Default)]
struct SessionState {
    next_id: u64,
    pending: Option<(u64, CancelToken)>,
}

/// Single-slot analysis tracker for one game.
///
/// At most one request is current. Submitting a new one cancels the
/// previous token, and completions for anything but the current request
/// are rejected as stale.
#[derive(Debug, Default)]
pub struct AnalysisSession {
    state: Mutex<SessionState>,
}

impl AnalysisSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn submit(&self, request: AnalysisRequest) -> Ticket {
        let mut state = self.state.lock();
        if let Some((id, token)) = state.pending.take() {
            debug!("analysis request {id} superseded");
            token.cancel();
        }
        state.next_id += 1;
        let id = state.next_id;
        let token = CancelToken::new();
        state.pending = Some((id, token.clone()));
        debug!("analysis request {id} submitted for {}", request.fen());
        Ticket { id, request, token }
    }

    /// Accept the response for `ticket` if it is still the current request.
    pub fn complete(
        &self,
        ticket: &Ticket,
        response: AnalysisResponse,
    ) -> Result<AnalysisResponse, AnalysisError> {
        let mut state = self.state.lock();
        let current = matches!(state.pending, Some((id, _)) if id == ticket.id);
        if current && !ticket.is_cancelled() {
            state.pending = None;
            Ok(response)
        } else {
            debug!("dropping stale analysis result {}", ticket.id);
            Err(AnalysisError::Stale { id: ticket.id })
        }
    }

    /// Cancel the current request, if any.
    pub fn cancel(&self) {
        if let Some((id, token)) = self.state.lock().pending.take() {
            debug!("analysis request {id} cancelled");
            token.cancel();
        }
    }

    #[must_use]
    pub fn is_current(&self, ticket: &Ticket) -> bool {
        matches!(self.state.lock().pending, Some((id, _)) if id == ticket.id)
    }

    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.state.lock().pending.is_none()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::board::{Board, Move};

    fn response(uci: &str) -> AnalysisResponse {
        AnalysisResponse {
            best_move: Move::from_uci(uci).unwrap(),
            ponder: None,
            variations: Vec::new(),
        }
    }

    #[test]
    fn test_new_submission_supersedes_pending() {
        let session = AnalysisSession::new();
        let first = session.submit(AnalysisRequest::new(&Board::new()));
        let second = session.submit(AnalysisRequest::new(&Board::new()));

        assert!(first.is_cancelled());
        assert!(!second.is_cancelled());
        assert!(!session.is_current(&first));
        assert!(session.is_current(&second));

        assert_eq!(
            session.complete(&first, response("e2e4")),
            Err(AnalysisError::Stale { id: first.id() })
        );
        assert!(session.complete(&second, response("d2d4")).is_ok());
        assert!(session.is_idle());
    }

    #[test]
    fn test_completion_is_accepted_once() {
        let session = AnalysisSession::new();
        let ticket = session.submit(AnalysisRequest::new(&Board::new()));
        assert!(session.complete(&ticket, response("e2e4")).is_ok());
        assert!(session.complete(&ticket, response("e2e4")).is_err());
    }

    #[test]
    fn test_cancel_drops_result() {
        let session = AnalysisSession::new();
        let ticket = session.submit(AnalysisRequest::new(&Board::new()));
        session.cancel();
        assert!(ticket.is_cancelled());
        assert!(session.complete(&ticket, response("e2e4")).is_err());
    }

    #[test]
    fn test_worker_thread_completion() {
        let session = Arc::new(AnalysisSession::new());
        let ticket = session.submit(AnalysisRequest::new(&Board::new()));

        let worker = {
            let session = Arc::clone(&session);
            std::thread::spawn(move || {
                let mut collector = ticket.collector();
                collector.feed("info depth 10 score cp 25 pv e2e4 e7e5");
                let response = collector.feed("bestmove e2e4").unwrap();
                session.complete(&ticket, response)
            })
        };

        let response = worker.join().unwrap().unwrap();
        assert_eq!(response.best_move, Move::from_uci("e2e4").unwrap());
        assert!(session.is_idle());
    }
}
