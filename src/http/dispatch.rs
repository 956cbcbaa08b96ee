//! Request dispatch.
//!
//! # Responsibilities
//! - Resolve the request path
//! - Run the case chain and the winning case's action
//! - Turn every failure into the error page
//!
//! # Design Decisions
//! - Exactly one place catches failures: here
//! - Panics in an action are caught too and reported like any failure
//! - Every outcome is a response; nothing reaches the transport as an error

use std::any::Any;
use std::net::SocketAddr;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;

use axum::http::Method;
use axum::response::Response;
use futures_util::FutureExt;

use crate::cases::CaseChain;
use crate::error::ServeError;
use crate::http::request::RequestContext;
use crate::http::response::send_error;
use crate::observability::metrics;
use crate::resource::Resolver;

/// Answers one request at a time against an immutable case chain.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    resolver: Resolver,
    chain: Arc<CaseChain>,
}

impl Dispatcher {
    pub fn new(resolver: Resolver, chain: Arc<CaseChain>) -> Self {
        Self { resolver, chain }
    }

    /// Answer a request for `path`.
    pub async fn dispatch(
        &self,
        method: Method,
        path: &str,
        client: SocketAddr,
        request_id: &str,
    ) -> Response {
        let start_time = Instant::now();
        let ctx = RequestContext::new(path, method, client, request_id);

        let full_path = match self.resolver.resolve(&ctx.path) {
            Ok(full_path) => full_path,
            Err(err) => return self.finish(&ctx, "resolver", Err(err), start_time),
        };
        let ctx = ctx.with_full_path(full_path);

        let (case, outcome) = self.run_chain(&ctx).await;
        self.finish(&ctx, case, outcome, start_time)
    }

    async fn run_chain(&self, ctx: &RequestContext) -> (&'static str, Result<Response, ServeError>) {
        let Some(case) = self.chain.select(ctx) else {
            return (
                "none",
                Err(ServeError::UnknownObject {
                    path: ctx.path.clone(),
                }),
            );
        };

        tracing::debug!(
            request_id = %ctx.request_id,
            path = %ctx.path,
            case = case.name(),
            "Case selected"
        );

        let outcome = match AssertUnwindSafe(case.act(ctx)).catch_unwind().await {
            Ok(outcome) => outcome,
            Err(panic) => Err(ServeError::Internal {
                path: ctx.path.clone(),
                detail: panic_detail(panic.as_ref()),
            }),
        };
        (case.name(), outcome)
    }

    fn finish(
        &self,
        ctx: &RequestContext,
        case: &'static str,
        outcome: Result<Response, ServeError>,
        start_time: Instant,
    ) -> Response {
        let response = match outcome {
            Ok(response) => response,
            Err(err) => {
                match &err {
                    ServeError::UnknownObject { .. } | ServeError::Internal { .. } => {
                        tracing::error!(
                            request_id = %ctx.request_id,
                            path = %ctx.path,
                            case,
                            error = %err,
                            "Request fell through classification"
                        );
                    }
                    ServeError::PathEscape { .. } => {
                        tracing::warn!(
                            request_id = %ctx.request_id,
                            client = %ctx.client,
                            path = %ctx.path,
                            "Rejected path outside served directory"
                        );
                    }
                    _ => {
                        tracing::info!(
                            request_id = %ctx.request_id,
                            path = %ctx.path,
                            case,
                            kind = err.kind(),
                            error = %err,
                            "Request failed"
                        );
                    }
                }
                send_error(&ctx.path, &err.to_string())
            }
        };

        metrics::record_request(case, response.status().as_u16(), start_time);
        response
    }
}

fn panic_detail(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cases::Case;
    use crate::config::{ScriptConfig, SiteConfig};
    use axum::http::{header, StatusCode};
    use futures_util::future::BoxFuture;
    use std::fs;
    use tempfile::TempDir;

    const CLIENT: &str = "127.0.0.1:50000";

    fn dispatcher_for(dir: &TempDir, chain: CaseChain) -> Dispatcher {
        Dispatcher::new(Resolver::new(dir.path()).unwrap(), Arc::new(chain))
    }

    fn standard_dispatcher(dir: &TempDir) -> Dispatcher {
        let resolver = Resolver::new(dir.path()).unwrap();
        let chain = CaseChain::standard(&resolver, &SiteConfig::default(), &ScriptConfig::default());
        Dispatcher::new(resolver, Arc::new(chain))
    }

    async fn get(dispatcher: &Dispatcher, path: &str) -> (StatusCode, String) {
        let response = dispatcher
            .dispatch(Method::GET, path, CLIENT.parse().unwrap(), "test")
            .await;
        let status = response.status();
        let declared: usize = response.headers()[header::CONTENT_LENGTH]
            .to_str()
            .unwrap()
            .parse()
            .unwrap();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(declared, body.len());
        (status, String::from_utf8_lossy(&body).into_owned())
    }

    #[tokio::test]
    async fn missing_path_is_404_naming_the_request_path() {
        let dir = TempDir::new().unwrap();
        let dispatcher = standard_dispatcher(&dir);

        let (status, body) = get(&dispatcher, "/no/such/page.html").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.contains("Error accessing /no/such/page.html"));
        assert!(body.contains("'/no/such/page.html' not found"));
    }

    #[tokio::test]
    async fn traversal_is_rejected_with_error_page() {
        let dir = TempDir::new().unwrap();
        let dispatcher = standard_dispatcher(&dir);

        let (status, body) = get(&dispatcher, "/../../etc/passwd").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.contains("is outside the served directory"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn index_symlinked_outside_root_is_not_served() {
        let outside = TempDir::new().unwrap();
        fs::write(outside.path().join("secret.txt"), "TOP-SECRET").unwrap();

        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("docs")).unwrap();
        std::os::unix::fs::symlink(
            outside.path().join("secret.txt"),
            dir.path().join("docs").join("index.html"),
        )
        .unwrap();
        std::os::unix::fs::symlink(outside.path().join("secret.txt"), dir.path().join("direct.html"))
            .unwrap();
        let dispatcher = standard_dispatcher(&dir);

        for path in ["/docs/", "/direct.html"] {
            let (status, body) = get(&dispatcher, path).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{path}");
            assert!(body.contains("is outside the served directory"), "{path}");
            assert!(!body.contains("TOP-SECRET"), "{path}");
        }
    }

    #[tokio::test]
    async fn file_removed_after_classification_yields_404() {
        let dir = TempDir::new().unwrap();
        let page = dir.path().join("page.html");
        fs::write(&page, "<p>here for now</p>").unwrap();

        let dispatcher = standard_dispatcher(&dir);
        let ctx = RequestContext::new("/page.html", Method::GET, CLIENT.parse().unwrap(), "race")
            .with_full_path(dispatcher.resolver.resolve("/page.html").unwrap());

        let case = dispatcher.chain.select(&ctx).unwrap();
        assert_eq!(case.name(), "existing_file");

        fs::remove_file(&page).unwrap();
        let outcome = case.act(&ctx).await;
        assert!(matches!(outcome, Err(ServeError::ReadFailure { .. })));

        let response = dispatcher.finish(&ctx, case.name(), outcome, Instant::now());
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[derive(Debug)]
    struct Exploding;

    impl Case for Exploding {
        fn name(&self) -> &'static str {
            "exploding"
        }

        fn test(&self, _ctx: &RequestContext) -> bool {
            true
        }

        fn act<'a>(&'a self, _ctx: &'a RequestContext) -> BoxFuture<'a, Result<Response, ServeError>> {
            futures_util::future::lazy(|_| -> Result<Response, ServeError> {
                panic!("responder blew up")
            })
            .boxed()
        }
    }

    #[tokio::test]
    async fn panicking_action_becomes_error_page() {
        let dir = TempDir::new().unwrap();
        let dispatcher = dispatcher_for(&dir, CaseChain::new(vec![Box::new(Exploding)]));

        let (status, body) = get(&dispatcher, "/boom").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.contains("'/boom' failed unexpectedly: responder blew up"));
    }

    #[tokio::test]
    async fn chain_without_catch_all_is_still_total() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.txt"), "a").unwrap();
        let dispatcher = dispatcher_for(&dir, CaseChain::new(Vec::new()));

        let (status, body) = get(&dispatcher, "/a.txt").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.contains("Unknown object '/a.txt'"));
    }
}
