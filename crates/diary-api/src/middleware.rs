//! diary/crates/diary-api/src/middleware.rs Middleware
//!
//! Custom middleware for security, logging, and traffic control.

use std::time::{Duration, Instant};

use actix_cors::Cors;
use actix_web::body::{EitherBody, MessageBody};
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::http::header::{self, HeaderMap};
use actix_web::middleware::{DefaultHeaders, Logger, Next};
use actix_web::{web, Error};
use dashmap::DashMap;
use diary_core::AppError;

use crate::error::ApiError;

pub const RATE_LIMIT_MESSAGE: &str = "Too many requests from this IP, please try again later.";

/// Past this many tracked clients, expired windows are swept on the next hit.
const SWEEP_THRESHOLD: usize = 10_000;

/// Access log in the "combined" shape:
/// remote-ip "request-line" status-code response-size "referrer" "user-agent"
pub fn standard_middleware() -> Logger {
    Logger::new(r#"%a "%r" %s %b "%{Referer}i" "%{User-Agent}i" %T"#)
}

/// CORS for the browser client. `origins` comes from the settings.
pub fn cors_policy(origins: &[String]) -> Cors {
    origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allowed_methods(vec!["GET", "POST", "DELETE"])
        .allowed_headers(vec![header::CONTENT_TYPE, header::AUTHORIZATION])
        .supports_credentials()
        .max_age(3600)
}

/// Conservative response headers for everything the server returns.
pub fn security_headers() -> DefaultHeaders {
    DefaultHeaders::new()
        .add((header::X_CONTENT_TYPE_OPTIONS, "nosniff"))
        .add((header::X_FRAME_OPTIONS, "SAMEORIGIN"))
        .add((header::REFERRER_POLICY, "no-referrer"))
        .add((header::X_DNS_PREFETCH_CONTROL, "off"))
        .add(("Cross-Origin-Opener-Policy", "same-origin"))
}

struct Window {
    started: Instant,
    count: u32,
}

/// Fixed-window request counter keyed by client address.
///
/// Requests past `max_requests` inside one window are refused, not queued.
pub struct RateLimiter {
    window: Duration,
    max_requests: u32,
    trust_proxy: bool,
    hits: DashMap<String, Window>,
}

impl RateLimiter {
    pub fn new(window: Duration, max_requests: u32) -> Self {
        Self {
            window,
            max_requests,
            trust_proxy: false,
            hits: DashMap::new(),
        }
    }

    /// Key clients by the hop the nearest proxy appended to `Forwarded` or
    /// `X-Forwarded-For` instead of the socket peer. Earlier hops come from
    /// the client and are ignored. Only safe behind a reverse proxy.
    pub fn trust_proxy(mut self, trust: bool) -> Self {
        self.trust_proxy = trust;
        self
    }

    /// Counts one request from `client`; `false` means it is over the limit.
    pub fn check(&self, client: &str) -> bool {
        self.check_at(client, Instant::now())
    }

    fn check_at(&self, client: &str, now: Instant) -> bool {
        if self.hits.len() > SWEEP_THRESHOLD {
            self.hits
                .retain(|_, w| now.duration_since(w.started) < self.window);
        }

        let mut slot = self.hits.entry(client.to_owned()).or_insert(Window {
            started: now,
            count: 0,
        });
        if now.duration_since(slot.started) >= self.window {
            slot.started = now;
            slot.count = 0;
        }
        slot.count = slot.count.saturating_add(1);
        slot.count <= self.max_requests
    }

    fn client_key(&self, req: &ServiceRequest) -> String {
        if self.trust_proxy {
            if let Some(hop) = nearest_forwarded_hop(req.headers()) {
                return hop;
            }
        }
        req.peer_addr()
            .map(|addr| addr.ip().to_string())
            .unwrap_or_else(|| "unknown".to_owned())
    }
}

/// The last `for=` of `Forwarded`, else the last `X-Forwarded-For` entry.
fn nearest_forwarded_hop(headers: &HeaderMap) -> Option<String> {
    let forwarded = headers
        .get_all(header::FORWARDED)
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .last()
        .and_then(|element| {
            element.split(';').find_map(|pair| {
                let (key, value) = pair.trim().split_once('=')?;
                key.eq_ignore_ascii_case("for")
                    .then(|| value.trim().trim_matches('"').to_owned())
            })
        });

    forwarded
        .or_else(|| {
            headers
                .get_all(header::X_FORWARDED_FOR)
                .filter_map(|value| value.to_str().ok())
                .flat_map(|value| value.split(','))
                .last()
                .map(|hop| hop.trim().to_owned())
        })
        .filter(|hop| !hop.is_empty())
}

/// `from_fn` middleware enforcing the registered [`RateLimiter`].
pub async fn rate_limit(
    req: ServiceRequest,
    next: Next<impl MessageBody>,
) -> Result<ServiceResponse<EitherBody<impl MessageBody>>, Error> {
    if let Some(limiter) = req.app_data::<web::Data<RateLimiter>>() {
        let client = limiter.client_key(&req);
        if !limiter.check(&client) {
            log::warn!("rate limit exceeded for {client}");
            let err = ApiError(AppError::RateLimitExceeded(RATE_LIMIT_MESSAGE.into()));
            return Ok(req.error_response(err).map_into_right_body());
        }
    }

    next.call(req).await.map(ServiceResponse::map_into_left_body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn allows_up_to_the_limit_then_refuses() {
        let limiter = RateLimiter::new(Duration::from_secs(60), 3);
        let now = Instant::now();

        assert!(limiter.check_at("10.0.0.1", now));
        assert!(limiter.check_at("10.0.0.1", now));
        assert!(limiter.check_at("10.0.0.1", now));
        assert!(!limiter.check_at("10.0.0.1", now));
    }

    #[test]
    fn clients_are_counted_separately() {
        let limiter = RateLimiter::new(Duration::from_secs(60), 1);
        let now = Instant::now();

        assert!(limiter.check_at("10.0.0.1", now));
        assert!(limiter.check_at("10.0.0.2", now));
        assert!(!limiter.check_at("10.0.0.1", now));
    }

    fn proxied(forwarded_for: &str) -> ServiceRequest {
        TestRequest::default()
            .peer_addr("10.0.0.9:4000".parse().unwrap())
            .insert_header((header::X_FORWARDED_FOR, forwarded_for))
            .to_srv_request()
    }

    #[test]
    fn trusted_proxy_key_is_the_hop_it_appended() {
        let limiter = RateLimiter::new(Duration::from_secs(60), 1).trust_proxy(true);

        assert_eq!(limiter.client_key(&proxied("1.2.3.1, 203.0.113.7")), "203.0.113.7");
        assert_eq!(limiter.client_key(&proxied("1.2.3.2, 203.0.113.7")), "203.0.113.7");
        assert_eq!(limiter.client_key(&proxied("203.0.113.8")), "203.0.113.8");
    }

    #[test]
    fn forwarded_header_uses_its_last_element() {
        let limiter = RateLimiter::new(Duration::from_secs(60), 1).trust_proxy(true);
        let req = TestRequest::default()
            .peer_addr("10.0.0.9:4000".parse().unwrap())
            .insert_header((
                header::FORWARDED,
                r#"for=1.2.3.4;proto=https, for="198.51.100.17";by=10.0.0.9"#,
            ))
            .to_srv_request();

        assert_eq!(limiter.client_key(&req), "198.51.100.17");
    }

    #[test]
    fn without_proxy_trust_headers_are_ignored() {
        let limiter = RateLimiter::new(Duration::from_secs(60), 1);
        assert_eq!(limiter.client_key(&proxied("1.2.3.1, 203.0.113.7")), "10.0.0.9");

        let trusting = RateLimiter::new(Duration::from_secs(60), 1).trust_proxy(true);
        let bare = TestRequest::default()
            .peer_addr("10.0.0.9:4000".parse().unwrap())
            .to_srv_request();
        assert_eq!(trusting.client_key(&bare), "10.0.0.9");
    }

    #[test]
    fn a_new_window_resets_the_count() {
        let limiter = RateLimiter::new(Duration::from_secs(60), 1);
        let start = Instant::now();

        assert!(limiter.check_at("10.0.0.1", start));
        assert!(!limiter.check_at("10.0.0.1", start + Duration::from_secs(59)));
        assert!(limiter.check_at("10.0.0.1", start + Duration::from_secs(60)));
    }
}
