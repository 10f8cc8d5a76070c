//! Cross-origin access and browser hardening headers.

use actix_cors::Cors;
use actix_web::middleware::DefaultHeaders;

/// Any origin, method and header may call the API
pub fn cors() -> Cors {
    Cors::permissive()
}

/// Hardening headers added to every response that does not set its own
pub fn security_headers() -> DefaultHeaders {
    DefaultHeaders::new()
        .add((
            "content-security-policy",
            "default-src 'self';base-uri 'self';font-src 'self' https: data:;\
             form-action 'self';frame-ancestors 'self';img-src 'self' data:;\
             object-src 'none';script-src 'self';script-src-attr 'none';\
             style-src 'self' https: 'unsafe-inline';upgrade-insecure-requests",
        ))
        .add(("cross-origin-opener-policy", "same-origin"))
        .add(("cross-origin-resource-policy", "same-origin"))
        .add(("origin-agent-cluster", "?1"))
        .add(("referrer-policy", "no-referrer"))
        .add(("strict-transport-security", "max-age=31536000; includeSubDomains"))
        .add(("x-content-type-options", "nosniff"))
        .add(("x-dns-prefetch-control", "off"))
        .add(("x-download-options", "noopen"))
        .add(("x-frame-options", "SAMEORIGIN"))
        .add(("x-permitted-cross-domain-policies", "none"))
        .add(("x-xss-protection", "0"))
}
