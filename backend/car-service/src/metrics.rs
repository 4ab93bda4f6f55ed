use actix_web::{HttpResponse, Responder};
use prometheus::{Encoder, IntCounter, IntCounterVec, TextEncoder};

lazy_static::lazy_static! {
    pub static ref AUTH_LOGIN_TOTAL: IntCounterVec = prometheus::register_int_counter_vec!(
        "auth_login_total",
        "Login attempts by outcome",
        &["result"]
    ).unwrap();

    pub static ref AUTH_REGISTER_TOTAL: IntCounterVec = prometheus::register_int_counter_vec!(
        "auth_register_total",
        "Registration attempts by outcome",
        &["result"]
    ).unwrap();

    pub static ref AUTH_TOKEN_VALIDATION_TOTAL: IntCounterVec = prometheus::register_int_counter_vec!(
        "auth_token_validation_total",
        "Access token validations by outcome",
        &["result"]
    ).unwrap();

    pub static ref AUTH_REVOCATIONS_TOTAL: IntCounter = prometheus::register_int_counter!(
        "auth_revocations_total",
        "Access tokens revoked through logout"
    ).unwrap();
}

/// Handler that serialises Prometheus metrics in text format.
pub async fn metrics_handler() -> impl Responder {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();

    let mut buffer = Vec::new();
    match encoder.encode(&metric_families, &mut buffer) {
        Ok(_) => HttpResponse::Ok()
            .content_type(encoder.format_type())
            .body(buffer),
        Err(err) => HttpResponse::InternalServerError().body(err.to_string()),
    }
}

#[inline]
pub fn record_login(result: &str) {
    AUTH_LOGIN_TOTAL.with_label_values(&[result]).inc();
}

#[inline]
pub fn record_register(result: &str) {
    AUTH_REGISTER_TOTAL.with_label_values(&[result]).inc();
}

#[inline]
pub fn record_token_validation(result: &str) {
    AUTH_TOKEN_VALIDATION_TOTAL.with_label_values(&[result]).inc();
}

#[inline]
pub fn record_revocation() {
    AUTH_REVOCATIONS_TOTAL.inc();
}
