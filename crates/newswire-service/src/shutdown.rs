use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::task::{Context, Poll};

use http::{Request, Response, StatusCode};
use http_body::Body;
use pin_project::pin_project;
use tokio::sync::Notify;
use tower::{Layer, Service};

struct Inner {
    shutting_down: AtomicBool,
    in_flight: AtomicUsize,
    drained: Notify,
}

/// Shared between the drain layer and the signal handler in `main`.
#[derive(Clone)]
pub struct ShutdownState {
    inner: Arc<Inner>,
}

impl Default for ShutdownState {
    fn default() -> Self {
        Self::new()
    }
}

impl ShutdownState {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                shutting_down: AtomicBool::new(false),
                in_flight: AtomicUsize::new(0),
                drained: Notify::new(),
            }),
        }
    }

    /// Stop accepting requests. Ones already running are left to finish.
    pub fn start_shutdown(&self) {
        self.inner.shutting_down.store(true, Ordering::SeqCst);
        self.inner.drained.notify_waiters();
    }

    pub fn is_shutting_down(&self) -> bool {
        self.inner.shutting_down.load(Ordering::SeqCst)
    }

    pub fn in_flight_count(&self) -> usize {
        self.inner.in_flight.load(Ordering::SeqCst)
    }

    /// Resolves once shutdown has started and no request is in flight.
    pub fn completed(&self) -> impl Future<Output = ()> + Send + 'static {
        let inner = Arc::clone(&self.inner);
        async move {
            loop {
                let notified = inner.drained.notified();
                tokio::pin!(notified);
                // register before checking so a wake between the check and
                // the await is not lost
                notified.as_mut().enable();

                if inner.shutting_down.load(Ordering::SeqCst)
                    && inner.in_flight.load(Ordering::SeqCst) == 0
                {
                    return;
                }
                notified.await;
            }
        }
    }

    fn enter(&self) -> InFlightGuard {
        self.inner.in_flight.fetch_add(1, Ordering::SeqCst);
        InFlightGuard {
            inner: Arc::clone(&self.inner),
        }
    }
}

/// Counts one request as in flight until dropped, including when the
/// request future is cancelled by an outer timeout.
struct InFlightGuard {
    inner: Arc<Inner>,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        if self.inner.in_flight.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.inner.drained.notify_waiters();
        }
    }
}

/// Tower layer that rejects new requests with 503 once shutdown starts.
#[derive(Clone)]
pub struct DrainLayer {
    state: ShutdownState,
}

impl DrainLayer {
    pub fn new(state: ShutdownState) -> Self {
        Self { state }
    }
}

impl<S> Layer<S> for DrainLayer {
    type Service = DrainService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        DrainService {
            inner,
            state: self.state.clone(),
        }
    }
}

#[derive(Clone)]
pub struct DrainService<S> {
    inner: S,
    state: ShutdownState,
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for DrainService<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>>,
    ResBody: Body + Default,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = DrainFuture<S::Future, ResBody, S::Error>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<ReqBody>) -> Self::Future {
        if self.state.is_shutting_down() {
            let mut response = Response::new(ResBody::default());
            *response.status_mut() = StatusCode::SERVICE_UNAVAILABLE;

            return DrainFuture {
                kind: Kind::Rejected(Some(Ok(response))),
            };
        }

        let guard = self.state.enter();
        DrainFuture {
            kind: Kind::Inner {
                future: self.inner.call(req),
                guard: Some(guard),
            },
        }
    }
}

#[pin_project]
pub struct DrainFuture<F, B, E> {
    #[pin]
    kind: Kind<F, B, E>,
}

#[pin_project(project = KindProj)]
enum Kind<F, B, E> {
    Inner {
        #[pin]
        future: F,
        guard: Option<InFlightGuard>,
    },
    Rejected(Option<Result<Response<B>, E>>),
}

impl<F, B, E> Future for DrainFuture<F, B, E>
where
    F: Future<Output = Result<Response<B>, E>>,
    B: Body,
{
    type Output = Result<Response<B>, E>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match self.project().kind.project() {
            KindProj::Inner { future, guard } => {
                let result = future.poll(cx);
                if result.is_ready() {
                    guard.take();
                }
                result
            }
            KindProj::Rejected(response) => Poll::Ready(
                response
                    .take()
                    .expect("DrainFuture polled after completion"),
            ),
        }
    }
}
