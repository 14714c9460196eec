use actix_cors::Cors;

/// Cards are embedded and shared from arbitrary origins, so any origin is
/// accepted; credentials are allowed for the dashboard.
pub fn create_cors() -> Cors {
    Cors::default()
        .allowed_origin_fn(|_, _req_head| true)
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        .allow_any_header()
        .supports_credentials()
        .max_age(3600)
}
