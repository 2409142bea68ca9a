//! Continues upstream traces from `traceparent` headers.

use opentelemetry::{Context, global, propagation::Extractor, trace::TraceContextExt as _};
use salvo::http::{HeaderMap, HeaderName};

/// Extracts a remote parent from the request headers, if the caller sent a valid one.
pub(super) fn extract_parent_context(headers: &HeaderMap) -> Option<Context> {
    global::get_text_map_propagator(|propagator| {
        // Start from an empty context so requests without trace headers become new roots.
        let context = propagator.extract_with_context(&Context::new(), &Headers(headers));

        context
            .span()
            .span_context()
            .is_valid()
            .then_some(context)
    })
}

struct Headers<'a>(&'a HeaderMap);

impl Extractor for Headers<'_> {
    fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(|value| value.to_str().ok())
    }

    fn keys(&self) -> Vec<&str> {
        self.0.keys().map(HeaderName::as_str).collect()
    }
}
