//! Cross-origin policy for the browser frontend.

use actix_cors::Cors;

/// Allows `GET`/`POST` from the listed origins only.
pub fn cors(origins: &[String]) -> Cors {
    origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allowed_methods(vec!["GET", "POST"])
        .allow_any_header()
        .max_age(3600)
}
