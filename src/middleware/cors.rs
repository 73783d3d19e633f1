//! CORS de la capa HTTP
//!
//! En desarrollo (o sin orígenes configurados) la capa es permisiva; con
//! CORS_ORIGINS declarado solo se aceptan esos orígenes. Los orígenes que no
//! son header values válidos se descartan.

use axum::http::{HeaderName, HeaderValue, Method};
use tower_http::cors::CorsLayer;

use crate::config::environment::EnvironmentConfig;

/// Capa CORS según el entorno de la aplicación
pub fn cors_middleware(config: &EnvironmentConfig) -> CorsLayer {
    if config.is_development() || config.cors_origins.is_empty() {
        return CorsLayer::very_permissive();
    }
    restricted_cors(&config.cors_origins)
}

fn restricted_cors(origins: &[String]) -> CorsLayer {
    let mut cors = CorsLayer::new();
    for origin in parse_origins(origins) {
        cors = cors.allow_origin(origin);
    }

    cors.allow_methods([
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::DELETE,
        Method::OPTIONS,
    ])
    .allow_headers([
        HeaderName::from_static("content-type"),
        HeaderName::from_static("accept"),
        HeaderName::from_static("origin"),
    ])
    .max_age(std::time::Duration::from_secs(3600))
}

fn parse_origins(origins: &[String]) -> Vec<HeaderValue> {
    origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_origins_are_discarded() {
        let origins = vec![
            "https://flota.example.com".to_string(),
            "no es un origen\n".to_string(),
        ];
        let parsed = parse_origins(&origins);
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0], "https://flota.example.com");
    }
}
