use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use web_error_handler::{
    ErrorHandler, ErrorHandlerConfig, ErrorHandlerMiddleware, Handler, HandlerError,
    LoggingListener, Method, Middleware, Request, Response, Severity, TracingLogger, compose,
    diagnostics, error,
};

#[derive(Deserialize)]
struct Order {
    id: u64,
    coupon: Option<String>,
}

struct OrderHandler;

#[async_trait]
impl Handler for OrderHandler {
    async fn handle(&self, req: Request) -> Result<Response, HandlerError> {
        match req.path() {
            "/orders" => {
                let order: Order = serde_json::from_slice(req.body())?;
                if order.coupon.is_none() {
                    diagnostics::notice("order without coupon")?;
                }
                Ok(Response::text(201, format!("order {} created", order.id)))
            }
            "/legacy" => {
                diagnostics::deprecated("/legacy is going away")?;
                Ok(Response::text(200, "legacy ok"))
            }
            "/panic" => panic!("invariant broken"),
            other => Err(error::not_found(format!("no route for {other}"))),
        }
    }
}

/// Stamps every response, including generated error responses.
struct PoweredBy;

#[async_trait]
impl Middleware for PoweredBy {
    async fn handle(&self, req: Request, next: Arc<dyn Handler>) -> Result<Response, HandlerError> {
        let res = next.handle(req).await?;
        Ok(res.header("x-powered-by", "web_error_handler"))
    }
}

fn print(label: &str, res: &Response) {
    println!(
        "{label}: {} [{}] {}",
        res.status_code(),
        res.content_type().unwrap_or("-"),
        res.body_text()
    );
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    tracing::info!("running error handler demo");

    // Terminal shape: one fixed downstream handler
    let config = ErrorHandlerConfig::from_json_str(r#"{"malformed_quality": "discard"}"#)?
        .ignore(Severity::Deprecated);
    let app = ErrorHandler::with_config(Arc::new(OrderHandler), config);
    app.add_listener("log", LoggingListener::new(TracingLogger::new()));

    let requests = [
        ("created", Request::new(Method::POST, "/orders").with_body(r#"{"id": 7, "coupon": "SPRING"}"#)),
        (
            "bad json",
            Request::new(Method::POST, "/orders")
                .header("accept", "application/json")
                .with_body("{"),
        ),
        (
            "notice",
            Request::new(Method::POST, "/orders")
                .header("accept", "text/plain")
                .with_body(r#"{"id": 8}"#),
        ),
        ("deprecated", Request::new(Method::GET, "/legacy")),
        ("missing", Request::new(Method::GET, "/nope").header("accept", "application/xml")),
    ];
    for (label, req) in requests {
        print(label, &app.handle(req).await?);
    }

    // Chainable shape: recover inside a larger middleware chain
    let middlewares: Vec<Arc<dyn Middleware>> =
        vec![Arc::new(ErrorHandlerMiddleware::new()), Arc::new(PoweredBy)];
    let chain = compose(&middlewares, Arc::new(OrderHandler));
    let res = chain
        .handle(Request::new(Method::GET, "/panic").header("accept", "text/html;q=0.5, text/plain"))
        .await?;
    print("panic", &res);

    Ok(())
}
