use opentelemetry_semantic_conventions::attribute as semconv;
use reqwest::{Request, Response, StatusCode};
use reqwest_middleware::{Middleware, Next};
use tracing::Instrument;

/// `error.message` has no constant in the semantic conventions crate.
const ERROR_MESSAGE: &str = "error.message";

/// Wraps every GitHub call in a client span.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct TracingMiddleware;

/// Error class of a response, `None` when it succeeded.
fn error_type(status: StatusCode) -> Option<&'static str> {
    if status.is_server_error() {
        Some("server")
    } else if status.is_client_error() {
        Some("client")
    } else {
        None
    }
}

fn record_outcome(span: &tracing::Span, result: &reqwest_middleware::Result<Response>) {
    match result {
        Ok(res) => record_status(span, res.status()),
        Err(err) => record_error(span, err),
    }
}

fn record_status(span: &tracing::Span, status: StatusCode) {
    span.record(semconv::HTTP_RESPONSE_STATUS_CODE, status.as_u16());
    match error_type(status) {
        Some(kind) => {
            span.record(semconv::ERROR_TYPE, kind);
            span.record(semconv::OTEL_STATUS_CODE, "ERROR");
            if let Some(msg) = status.canonical_reason() {
                span.record(semconv::OTEL_STATUS_DESCRIPTION, msg);
            }
            tracing::warn!(parent: span, status = status.as_u16(), "request failed");
        }
        None => {
            span.record(semconv::OTEL_STATUS_CODE, "OK");
        }
    }
}

fn record_error(span: &tracing::Span, err: &reqwest_middleware::Error) {
    let kind = err.status().and_then(error_type).unwrap_or("client");
    let message = err.to_string();
    span.record(semconv::ERROR_TYPE, kind);
    span.record(semconv::OTEL_STATUS_CODE, "ERROR");
    span.record(semconv::OTEL_STATUS_DESCRIPTION, message.as_str());
    span.record(ERROR_MESSAGE, message.as_str());
    tracing::warn!(parent: span, error = %err, "request errored");
}

#[async_trait::async_trait]
impl Middleware for TracingMiddleware {
    async fn handle(
        &self,
        req: Request,
        extensions: &mut http::Extensions,
        next: Next<'_>,
    ) -> reqwest_middleware::Result<Response> {
        let span_name = format!("{} {}", req.method(), req.url().path());
        let span = tracing::info_span!(
            "http.client.request",
            error.type = tracing::field::Empty,
            error.message = tracing::field::Empty,
            http.request.method = %req.method(),
            http.response.status_code = tracing::field::Empty,
            otel.status_code = tracing::field::Empty,
            otel.status_description = tracing::field::Empty,
            peer.service = "github",
            resource.name = span_name,
            server.address = tracing::field::Empty,
            span.kind = "client",
            url.path = req.url().path(),
        );
        if let Some(host) = req.url().host_str() {
            span.record(semconv::SERVER_ADDRESS, host);
        }

        let result = next.run(req, extensions).instrument(span.clone()).await;
        record_outcome(&span, &result);
        result
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::{Arc, Mutex};

    use opentelemetry_semantic_conventions::attribute as semconv;
    use reqwest::StatusCode;
    use tracing_subscriber::layer::SubscriberExt;

    type Recorded = Arc<Mutex<BTreeMap<String, String>>>;

    /// Keeps every value recorded on a span after its creation.
    struct RecordLayer(Recorded);

    struct Visitor<'a>(&'a mut BTreeMap<String, String>);

    impl tracing::field::Visit for Visitor<'_> {
        fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
            self.0.insert(field.name().to_string(), value.to_string());
        }

        fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
            self.0.insert(field.name().to_string(), format!("{value:?}"));
        }
    }

    impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for RecordLayer {
        fn on_record(
            &self,
            _id: &tracing::span::Id,
            values: &tracing::span::Record<'_>,
            _ctx: tracing_subscriber::layer::Context<'_, S>,
        ) {
            let mut recorded = self.0.lock().unwrap();
            values.record(&mut Visitor(&mut recorded));
        }
    }

    fn with_span(f: impl FnOnce(&tracing::Span)) -> BTreeMap<String, String> {
        let recorded = Recorded::default();
        let subscriber = tracing_subscriber::registry().with(RecordLayer(recorded.clone()));
        tracing::subscriber::with_default(subscriber, || {
            let span = tracing::info_span!(
                "http.client.request",
                error.type = tracing::field::Empty,
                error.message = tracing::field::Empty,
                http.response.status_code = tracing::field::Empty,
                otel.status_code = tracing::field::Empty,
                otel.status_description = tracing::field::Empty,
            );
            f(&span);
        });
        let recorded = recorded.lock().unwrap().clone();
        recorded
    }

    #[test]
    fn should_classify_status() {
        assert_eq!(super::error_type(StatusCode::OK), None);
        assert_eq!(super::error_type(StatusCode::CREATED), None);
        assert_eq!(super::error_type(StatusCode::NOT_FOUND), Some("client"));
        assert_eq!(super::error_type(StatusCode::UNPROCESSABLE_ENTITY), Some("client"));
        assert_eq!(super::error_type(StatusCode::BAD_GATEWAY), Some("server"));
    }

    #[test]
    fn should_record_error_message_alongside_status_description() {
        let err = reqwest_middleware::Error::Middleware(anyhow::anyhow!("connection reset"));
        let recorded = with_span(|span| super::record_error(span, &err));

        assert_eq!(recorded.get(semconv::ERROR_TYPE).map(String::as_str), Some("client"));
        assert_eq!(recorded.get(semconv::OTEL_STATUS_CODE).map(String::as_str), Some("ERROR"));
        assert_eq!(
            recorded.get(super::ERROR_MESSAGE),
            recorded.get(semconv::OTEL_STATUS_DESCRIPTION),
        );
        assert!(recorded[super::ERROR_MESSAGE].contains("connection reset"));
    }

    #[test]
    fn should_record_failed_status() {
        let recorded = with_span(|span| super::record_status(span, StatusCode::BAD_GATEWAY));

        assert_eq!(recorded.get(semconv::ERROR_TYPE).map(String::as_str), Some("server"));
        assert_eq!(
            recorded.get(semconv::OTEL_STATUS_DESCRIPTION).map(String::as_str),
            Some("Bad Gateway")
        );
        assert!(!recorded.contains_key(super::ERROR_MESSAGE));
    }
}
