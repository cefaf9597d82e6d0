//! Runs a [`SearchEngine`] on its own thread so the caller can keep handling input while the
//! engine thinks.

use std::{
    sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError},
    thread,
    time::{Duration, Instant},
};

use tracing::{debug, trace};

use crate::{
    config::SearchBudget,
    search::{SearchEngine, SearchError},
    Move,
};

/// Error that arises from talking to a [`SearchWorker`]
#[derive(Debug, thiserror::Error)]
pub enum WorkerError {
    /// the thread could not be started
    #[error("could not start search thread: {0}")]
    Spawn(#[from] std::io::Error),
    /// the thread is gone, most likely because the engine panicked
    #[error("search thread has stopped")]
    Disconnected,
    /// the engine failed to produce a move
    #[error(transparent)]
    Search(#[from] SearchError),
}

struct Request<P> {
    ticket: u64,
    position: P,
    budget: SearchBudget,
}

struct Reply {
    ticket: u64,
    result: Result<Move, SearchError>,
}

/// Owns a search engine on a background thread.
///
/// Every request gets a ticket. Only the reply to the latest request that hasn't been
/// [cancelled](SearchWorker::cancel) is ever handed out, anything else is dropped when it
/// arrives. Dropping the worker hangs up on the thread, which exits (and drops the engine) once
/// the search in progress, if any, returns.
pub struct SearchWorker<P> {
    requests: Sender<Request<P>>,
    replies: Receiver<Reply>,
    last_ticket: u64,
    pending: Option<u64>,
}

impl<P> std::fmt::Debug for SearchWorker<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchWorker")
            .field("last_ticket", &self.last_ticket)
            .field("pending", &self.pending)
            .finish_non_exhaustive()
    }
}

impl<P: Send + 'static> SearchWorker<P> {
    /// moves `engine` onto a new thread
    pub fn spawn<S>(mut engine: S) -> Result<Self, WorkerError>
    where
        S: SearchEngine<P> + Send + 'static,
    {
        let (request_in, request_out) = mpsc::channel::<Request<P>>();
        let (reply_in, reply_out) = mpsc::channel();

        thread::Builder::new()
            .name("search".into())
            .spawn(move || {
                for Request {
                    ticket,
                    position,
                    budget,
                } in request_out
                {
                    let start = Instant::now();
                    let result = engine.choose_move(&position, budget);
                    debug!(
                        ticket,
                        took = start.elapsed().as_millis() as f64 / 1000.0,
                        "search finished"
                    );
                    if reply_in.send(Reply { ticket, result }).is_err() {
                        break;
                    }
                }
                trace!("search thread exits");
            })?;

        Ok(SearchWorker {
            requests: request_in,
            replies: reply_out,
            last_ticket: 0,
            pending: None,
        })
    }

    /// Asks for a move in `position`. Supersedes any request still pending.
    pub fn request(&mut self, position: P, budget: SearchBudget) -> Result<(), WorkerError> {
        self.last_ticket += 1;
        let ticket = self.last_ticket;
        self.requests
            .send(Request {
                ticket,
                position,
                budget,
            })
            .map_err(|_| WorkerError::Disconnected)?;
        debug!(ticket, %budget, "search requested");
        self.pending = Some(ticket);
        Ok(())
    }

    /// whether a request is waiting for its reply
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Forgets the pending request. Its reply will be dropped when it comes in.
    pub fn cancel(&mut self) {
        if let Some(ticket) = self.pending.take() {
            debug!(ticket, "search cancelled");
        }
    }

    /// The reply to the pending request if it has arrived, without blocking.
    pub fn try_recv(&mut self) -> Result<Option<Move>, WorkerError> {
        loop {
            match self.replies.try_recv() {
                Ok(reply) => {
                    if let Some(mv) = self.accept(reply)? {
                        return Ok(Some(mv));
                    }
                }
                Err(TryRecvError::Empty) => return Ok(None),
                Err(TryRecvError::Disconnected) => return self.disconnected(),
            }
        }
    }

    /// Waits up to `timeout` for the reply to the pending request.
    pub fn recv_timeout(&mut self, timeout: Duration) -> Result<Option<Move>, WorkerError> {
        let deadline = Instant::now() + timeout;
        while self.pending.is_some() {
            let left = deadline.saturating_duration_since(Instant::now());
            match self.replies.recv_timeout(left) {
                Ok(reply) => {
                    if let Some(mv) = self.accept(reply)? {
                        return Ok(Some(mv));
                    }
                }
                Err(RecvTimeoutError::Timeout) => return Ok(None),
                Err(RecvTimeoutError::Disconnected) => return self.disconnected(),
            }
        }
        Ok(None)
    }

    /// `Some` if `reply` answers the pending request, `None` if it is stale
    fn accept(&mut self, reply: Reply) -> Result<Option<Move>, WorkerError> {
        if self.pending != Some(reply.ticket) {
            trace!(ticket = reply.ticket, "dropping stale reply");
            return Ok(None);
        }
        self.pending = None;
        Ok(Some(reply.result?))
    }

    fn disconnected(&mut self) -> Result<Option<Move>, WorkerError> {
        if self.pending.take().is_some() {
            Err(WorkerError::Disconnected)
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// answers every request with the same move after a fixed delay
    struct Slow {
        delay: Duration,
        reply: Move,
    }

    impl SearchEngine<u32> for Slow {
        fn choose_move(&mut self, _: &u32, _: SearchBudget) -> Result<Move, SearchError> {
            thread::sleep(self.delay);
            Ok(self.reply)
        }
    }

    /// echoes the position back as the destination square
    struct Echo;

    impl SearchEngine<u8> for Echo {
        fn choose_move(&mut self, position: &u8, _: SearchBudget) -> Result<Move, SearchError> {
            Ok(Move::new(crate::Square::new(0), crate::Square::new(*position)))
        }
    }

    struct Broken;

    impl SearchEngine<()> for Broken {
        fn choose_move(&mut self, _: &(), _: SearchBudget) -> Result<Move, SearchError> {
            Err(SearchError::NoMove)
        }
    }

    fn mv(s: &str) -> Move {
        s.parse().unwrap()
    }

    #[test]
    fn delivers_reply() {
        let mut worker = SearchWorker::spawn(Slow {
            delay: Duration::from_millis(1),
            reply: mv("e7e5"),
        })
        .unwrap();
        assert!(!worker.is_pending());

        worker.request(0, SearchBudget::default()).unwrap();
        assert!(worker.is_pending());
        let reply = worker.recv_timeout(Duration::from_secs(5)).unwrap();

        assert_eq!(reply, Some(mv("e7e5")));
        assert!(!worker.is_pending());
    }

    #[test]
    fn cancelled_reply_is_never_handed_out() {
        let mut worker = SearchWorker::spawn(Slow {
            delay: Duration::from_millis(20),
            reply: mv("e7e5"),
        })
        .unwrap();

        worker.request(0, SearchBudget::default()).unwrap();
        worker.cancel();
        thread::sleep(Duration::from_millis(100));

        assert_eq!(worker.try_recv().unwrap(), None);
        assert_eq!(worker.recv_timeout(Duration::from_millis(10)).unwrap(), None);
    }

    #[test]
    fn newer_request_supersedes_older() {
        let mut worker = SearchWorker::spawn(Echo).unwrap();

        worker.request(10, SearchBudget::default()).unwrap();
        worker.request(20, SearchBudget::default()).unwrap();
        let reply = worker.recv_timeout(Duration::from_secs(5)).unwrap();

        assert_eq!(reply.map(|mv| mv.to().index()), Some(20));
    }

    #[test]
    fn engine_errors_are_passed_on() {
        let mut worker = SearchWorker::spawn(Broken).unwrap();
        worker.request((), SearchBudget::default()).unwrap();

        let err = worker.recv_timeout(Duration::from_secs(5)).unwrap_err();
        assert!(matches!(err, WorkerError::Search(SearchError::NoMove)));
        assert!(!worker.is_pending());
    }
}
