// Drives a `Session` through the one asynchronous operation: calculate + insight.
// Single-threaded: state is shared with `Rc<RefCell<_>>` and never borrowed across an await.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::debug;

use crate::insight::InsightService;
use crate::session::Session;
use crate::types::Timestamp;

/// Shared handle to a session plus the insight service it reports to.
#[derive(Clone)]
pub struct SessionController {
    session: Rc<RefCell<Session>>,
    insight: Rc<InsightService>,
}

impl SessionController {
    pub fn new(session: Session, insight: InsightService) -> Self {
        SessionController {
            session: Rc::new(RefCell::new(session)),
            insight: Rc::new(insight),
        }
    }

    pub fn session(&self) -> &Rc<RefCell<Session>> {
        &self.session
    }

    /// Calculate, then fetch and apply the insight.
    ///
    /// Returns false when the result was NaN and nothing was recorded. Overlapping
    /// calls are allowed; only the newest call's insight is applied.
    pub async fn calculate(&self, now: Timestamp) -> bool {
        let ticket = match self.session.borrow_mut().calculate(now) {
            Some(ticket) => ticket,
            None => return false,
        };

        let text = self.insight.insight_for(&ticket.request).await;

        let applied = self
            .session
            .borrow_mut()
            .complete_insight(ticket.request_id, text);
        debug!(request = ticket.request_id.as_u64(), applied, "insight finished");
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InsightError;
    use crate::insight::{InsightSource, UnconfiguredSource, UNAVAILABLE_INSIGHT};
    use crate::types::{InsightRequest, ShapeKind};
    use async_trait::async_trait;
    use futures::channel::oneshot;
    use futures::executor::block_on;
    use futures::FutureExt;
    use std::collections::VecDeque;

    /// Each fetch waits on the next queued channel, so tests decide when
    /// (and in which order) responses land.
    struct Gated {
        pending: RefCell<VecDeque<oneshot::Receiver<String>>>,
    }

    #[async_trait(?Send)]
    impl InsightSource for Rc<Gated> {
        async fn fetch(&self, _request: &InsightRequest) -> Result<String, InsightError> {
            let gate = self
                .pending
                .borrow_mut()
                .pop_front()
                .ok_or_else(|| InsightError::Transport("no gate".to_string()))?;
            gate.await
                .map_err(|_| InsightError::Transport("gate dropped".to_string()))
        }
    }

    fn gated(count: usize) -> (Rc<Gated>, Vec<oneshot::Sender<String>>) {
        let mut senders = Vec::new();
        let mut receivers = VecDeque::new();
        for _ in 0..count {
            let (tx, rx) = oneshot::channel();
            senders.push(tx);
            receivers.push_back(rx);
        }
        let source = Rc::new(Gated {
            pending: RefCell::new(receivers),
        });
        (source, senders)
    }

    fn at(ms: u64) -> Timestamp {
        Timestamp::from_millis(ms)
    }

    #[test]
    fn calculate_shows_loading_until_insight_lands() {
        let (source, mut senders) = gated(1);
        let controller = SessionController::new(
            Session::new(ShapeKind::Square),
            InsightService::new(Rc::clone(&source)),
        );
        controller.session().borrow_mut().set_input("side", "4");

        let mut pending = Box::pin(controller.calculate(at(1)));
        assert!((&mut pending).now_or_never().is_none());
        {
            let session = controller.session().borrow();
            assert!(session.insight_loading());
            assert_eq!(session.last_result().map(|r| r.area), Some(16.0));
            assert_eq!(session.history().len(), 1);
        }

        senders.remove(0).send("Four equal sides.".to_string()).unwrap();
        assert_eq!((&mut pending).now_or_never(), Some(true));

        let session = controller.session().borrow();
        assert!(!session.insight_loading());
        assert_eq!(session.insight_text(), "Four equal sides.");
    }

    #[test]
    fn stale_response_landing_last_is_ignored() {
        let (source, mut senders) = gated(2);
        let controller = SessionController::new(
            Session::new(ShapeKind::Circle),
            InsightService::new(Rc::clone(&source)),
        );
        controller.session().borrow_mut().set_input("radius", "1");

        let mut first = Box::pin(controller.calculate(at(1)));
        let mut second = Box::pin(controller.calculate(at(2)));
        assert!((&mut first).now_or_never().is_none());
        assert!((&mut second).now_or_never().is_none());

        let first_tx = senders.remove(0);
        let second_tx = senders.remove(0);

        second_tx.send("second".to_string()).unwrap();
        assert_eq!((&mut second).now_or_never(), Some(true));
        first_tx.send("first".to_string()).unwrap();
        assert_eq!((&mut first).now_or_never(), Some(true));

        let session = controller.session().borrow();
        assert_eq!(session.insight_text(), "second");
        assert!(!session.insight_loading());
        assert_eq!(session.history().len(), 2);
    }

    #[test]
    fn nan_result_skips_insight() {
        let (source, _senders) = gated(1);
        let controller = SessionController::new(
            Session::new(ShapeKind::Rectangle),
            InsightService::new(Rc::clone(&source)),
        );
        {
            let mut session = controller.session().borrow_mut();
            session.set_input("length", "Infinity");
            session.set_input("width", "0");
        }

        assert!(!block_on(controller.calculate(at(1))));
        assert_eq!(source.pending.borrow().len(), 1);
        assert!(controller.session().borrow().history().is_empty());
    }

    #[test]
    fn failing_source_leaves_fallback_text() {
        let controller = SessionController::new(
            Session::new(ShapeKind::Triangle),
            InsightService::new(UnconfiguredSource),
        );
        {
            let mut session = controller.session().borrow_mut();
            let entries = [
                ("base", "6"),
                ("height", "4"),
                ("sideA", "5"),
                ("sideB", "5"),
                ("sideC", "6"),
            ];
            for (key, value) in entries {
                session.set_input(key, value);
            }
        }

        assert!(block_on(controller.calculate(at(1))));

        let session = controller.session().borrow();
        assert_eq!(session.insight_text(), UNAVAILABLE_INSIGHT);
        assert_eq!(session.last_result().map(|r| r.perimeter), Some(16.0));
    }
}
