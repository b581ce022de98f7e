use std::time::Duration;

use futures_util::future::{FutureExt, LocalBoxFuture};

use crate::errors::RequestError;
use crate::models::{ApiConfig, ChatRequest};
use crate::services::llm::ChatTransport;

pub const MIN_REQUEST_DELAY: Duration = Duration::from_millis(5000);
pub const MAX_ATTEMPTS: u32 = 3;
pub const BACKOFF_STEP: Duration = Duration::from_millis(1000);

/// Throttle and retry state for one conversation. The caller owns it and
/// hands it to every [`ChatPipeline::send_message`] call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RequestContext {
    /// Wall-clock ms when the previous send started dispatching.
    pub last_request_at: Option<f64>,
    pub min_delay: Duration,
    pub max_attempts: u32,
    pub backoff_step: Duration,
}

impl Default for RequestContext {
    fn default() -> Self {
        Self {
            last_request_at: None,
            min_delay: MIN_REQUEST_DELAY,
            max_attempts: MAX_ATTEMPTS,
            backoff_step: BACKOFF_STEP,
        }
    }
}

impl RequestContext {
    /// How long a send starting at `now` must wait before dispatching.
    pub fn wait_before_dispatch(&self, now: f64) -> Option<Duration> {
        let last = self.last_request_at?;
        let elapsed = (now - last).max(0.0);
        let min = self.min_delay.as_secs_f64() * 1000.0;
        (elapsed < min).then(|| Duration::from_secs_f64((min - elapsed) / 1000.0))
    }

    /// Linear backoff after the given failed attempt (1-based).
    pub fn backoff_after(&self, attempt: u32) -> Duration {
        self.backoff_step * attempt
    }
}

pub trait Timer {
    /// Milliseconds since the Unix epoch.
    fn now_ms(&self) -> f64;
    fn sleep(&self, duration: Duration) -> LocalBoxFuture<'_, ()>;
}

pub struct BrowserTimer;

impl Timer for BrowserTimer {
    fn now_ms(&self) -> f64 {
        js_sys::Date::now()
    }

    fn sleep(&self, duration: Duration) -> LocalBoxFuture<'_, ()> {
        gloo_timers::future::sleep(duration).boxed_local()
    }
}

pub struct ChatPipeline<T, C> {
    transport: T,
    timer: C,
    config: ApiConfig,
}

impl<T: ChatTransport, C: Timer> ChatPipeline<T, C> {
    pub fn new(transport: T, timer: C, config: ApiConfig) -> Self {
        Self {
            transport,
            timer,
            config,
        }
    }

    /// Send `text` as a single user turn and return the assistant reply.
    ///
    /// Waits out the throttle window first, then makes up to
    /// `ctx.max_attempts` attempts with linear backoff between them. The
    /// error of the last attempt is returned when all of them fail.
    pub async fn send_message(&self, ctx: &mut RequestContext, text: &str) -> Result<String, RequestError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(RequestError::EmptyMessage);
        }

        if let Some(wait) = ctx.wait_before_dispatch(self.timer.now_ms()) {
            log::debug!("throttling request for {} ms", wait.as_millis());
            self.timer.sleep(wait).await;
        }
        ctx.last_request_at = Some(self.timer.now_ms());

        let request = ChatRequest::new(&self.config, text);
        let max_attempts = ctx.max_attempts.max(1);
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.transport.complete(&request).await {
                Ok(reply) => return Ok(reply),
                Err(err) if attempt >= max_attempts => {
                    log::error!("chat request failed after {} attempts: {}", attempt, err);
                    return Err(err);
                }
                Err(err) => {
                    let backoff = ctx.backoff_after(attempt);
                    log::warn!(
                        "attempt {}/{} failed: {}; retrying in {} ms",
                        attempt,
                        max_attempts,
                        err,
                        backoff.as_millis()
                    );
                    self.timer.sleep(backoff).await;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use std::cell::{Cell, RefCell};
    use std::collections::VecDeque;
    use std::rc::Rc;

    /// Virtual clock: sleeping advances time instantly and is recorded.
    #[derive(Clone, Default)]
    struct FakeTimer {
        now: Rc<Cell<f64>>,
        sleeps: Rc<RefCell<Vec<Duration>>>,
    }

    impl FakeTimer {
        fn at(ms: f64) -> Self {
            let timer = Self::default();
            timer.now.set(ms);
            timer
        }

        fn advance(&self, ms: f64) {
            self.now.set(self.now.get() + ms);
        }
    }

    impl Timer for FakeTimer {
        fn now_ms(&self) -> f64 {
            self.now.get()
        }

        fn sleep(&self, duration: Duration) -> LocalBoxFuture<'_, ()> {
            self.sleeps.borrow_mut().push(duration);
            self.advance(duration.as_secs_f64() * 1000.0);
            futures::future::ready(()).boxed_local()
        }
    }

    /// Replays scripted outcomes and records when each dispatch happened.
    struct ScriptedTransport {
        outcomes: RefCell<VecDeque<Result<String, RequestError>>>,
        dispatched_at: RefCell<Vec<f64>>,
        requests: RefCell<Vec<ChatRequest>>,
        timer: FakeTimer,
    }

    impl ScriptedTransport {
        fn new(timer: &FakeTimer, outcomes: Vec<Result<String, RequestError>>) -> Self {
            Self {
                outcomes: RefCell::new(outcomes.into()),
                dispatched_at: RefCell::default(),
                requests: RefCell::default(),
                timer: timer.clone(),
            }
        }
    }

    impl ChatTransport for ScriptedTransport {
        fn complete<'a>(&'a self, request: &'a ChatRequest) -> LocalBoxFuture<'a, Result<String, RequestError>> {
            self.dispatched_at.borrow_mut().push(self.timer.now_ms());
            self.requests.borrow_mut().push(request.clone());
            let outcome = self
                .outcomes
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Err(RequestError::Network("script exhausted".into())));
            futures::future::ready(outcome).boxed_local()
        }
    }

    fn pipeline(timer: &FakeTimer, outcomes: Vec<Result<String, RequestError>>) -> ChatPipeline<ScriptedTransport, FakeTimer> {
        ChatPipeline::new(ScriptedTransport::new(timer, outcomes), timer.clone(), ApiConfig::default())
    }

    #[test]
    fn first_request_is_not_throttled() {
        let timer = FakeTimer::at(1_000_000.0);
        let pipeline = pipeline(&timer, vec![Ok("hello".into())]);
        let mut ctx = RequestContext::default();

        let reply = block_on(pipeline.send_message(&mut ctx, "  hi  ")).unwrap();

        assert_eq!(reply, "hello");
        assert!(timer.sleeps.borrow().is_empty());
        assert_eq!(ctx.last_request_at, Some(1_000_000.0));
        let requests = pipeline.transport.requests.borrow();
        assert_eq!(requests[0].messages[1].content, "hi");
    }

    #[test]
    fn second_call_within_delay_waits_for_window() {
        let timer = FakeTimer::at(50_000.0);
        let pipeline = pipeline(&timer, vec![Ok("one".into()), Ok("two".into())]);
        let mut ctx = RequestContext::default();

        block_on(pipeline.send_message(&mut ctx, "first")).unwrap();
        timer.advance(1_500.0);
        block_on(pipeline.send_message(&mut ctx, "second")).unwrap();

        let dispatched = pipeline.transport.dispatched_at.borrow();
        assert_eq!(dispatched.len(), 2);
        assert!(dispatched[1] - dispatched[0] >= 5_000.0);
        assert_eq!(*timer.sleeps.borrow(), vec![Duration::from_millis(3_500)]);
    }

    #[test]
    fn call_after_delay_is_not_throttled() {
        let timer = FakeTimer::at(0.0);
        let pipeline = pipeline(&timer, vec![Ok("one".into()), Ok("two".into())]);
        let mut ctx = RequestContext {
            last_request_at: Some(0.0),
            ..RequestContext::default()
        };
        timer.advance(6_000.0);

        block_on(pipeline.send_message(&mut ctx, "later")).unwrap();

        assert!(timer.sleeps.borrow().is_empty());
        assert_eq!(ctx.last_request_at, Some(6_000.0));
    }

    #[test]
    fn succeeds_on_third_attempt_after_two_backoffs() {
        let timer = FakeTimer::at(10_000.0);
        let pipeline = pipeline(
            &timer,
            vec![
                Err(RequestError::Network("offline".into())),
                Err(RequestError::Api {
                    status: 500,
                    message: "boom".into(),
                }),
                Ok("third time lucky".into()),
            ],
        );
        let mut ctx = RequestContext::default();

        let reply = block_on(pipeline.send_message(&mut ctx, "retry me")).unwrap();

        assert_eq!(reply, "third time lucky");
        assert_eq!(
            *timer.sleeps.borrow(),
            vec![Duration::from_millis(1_000), Duration::from_millis(2_000)]
        );
        assert_eq!(pipeline.transport.dispatched_at.borrow().len(), 3);
        // Stamped before the first attempt, not moved by retries.
        assert_eq!(ctx.last_request_at, Some(10_000.0));
    }

    #[test]
    fn exhausting_attempts_returns_last_error() {
        let timer = FakeTimer::at(0.0);
        let pipeline = pipeline(
            &timer,
            vec![
                Err(RequestError::Network("a".into())),
                Err(RequestError::Network("b".into())),
                Err(RequestError::Parse("c".into())),
                Ok("never reached".into()),
            ],
        );
        let mut ctx = RequestContext::default();

        let err = block_on(pipeline.send_message(&mut ctx, "doomed")).unwrap_err();

        assert_eq!(err, RequestError::Parse("c".into()));
        assert_eq!(pipeline.transport.dispatched_at.borrow().len(), 3);
        assert_eq!(timer.sleeps.borrow().len(), 2);
    }

    #[test]
    fn blank_text_is_rejected_without_dispatch() {
        let timer = FakeTimer::at(0.0);
        let pipeline = pipeline(&timer, vec![Ok("unused".into())]);
        let mut ctx = RequestContext::default();

        assert_eq!(
            block_on(pipeline.send_message(&mut ctx, " \n\t")),
            Err(RequestError::EmptyMessage)
        );
        assert!(pipeline.transport.dispatched_at.borrow().is_empty());
        assert_eq!(ctx.last_request_at, None);
    }

    #[test]
    fn wait_is_computed_from_last_dispatch() {
        let ctx = RequestContext {
            last_request_at: Some(1_000.0),
            ..RequestContext::default()
        };
        assert_eq!(ctx.wait_before_dispatch(1_000.0), Some(Duration::from_millis(5_000)));
        assert_eq!(ctx.wait_before_dispatch(4_000.0), Some(Duration::from_millis(2_000)));
        assert_eq!(ctx.wait_before_dispatch(6_000.0), None);
        assert_eq!(RequestContext::default().wait_before_dispatch(0.0), None);
    }
}
