//! Alert header pairs attached to mutation and failure responses, e.g.
//! `X-gameRatingsApp-alert: A new gameRating is created with identifier …`.

use axum::http::{HeaderMap, HeaderName, HeaderValue};
use tracing::warn;

/// Entity name used in alert messages and failure payloads.
pub const ENTITY_NAME: &str = "gameRating";

/// Marker stored in error response extensions so the failure headers can be added
/// once the application name is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FailureAlert {
    pub entity_name: &'static str,
    pub error_key: &'static str,
}

/// Builds alert headers prefixed with the configured application name.
#[derive(Debug, Clone, Copy)]
pub struct Alerts<'a> {
    application_name: &'a str,
}

impl<'a> Alerts<'a> {
    pub fn new(application_name: &'a str) -> Self {
        Self { application_name }
    }

    pub fn entity_creation(&self, entity_name: &str, id: &str) -> HeaderMap {
        self.alert(
            &format!("A new {entity_name} is created with identifier {id}"),
            id,
        )
    }

    pub fn entity_update(&self, entity_name: &str, id: &str) -> HeaderMap {
        self.alert(
            &format!("A {entity_name} is updated with identifier {id}"),
            id,
        )
    }

    pub fn entity_deletion(&self, entity_name: &str, id: &str) -> HeaderMap {
        self.alert(
            &format!("A {entity_name} is deleted with identifier {id}"),
            id,
        )
    }

    pub fn failure(&self, alert: &FailureAlert) -> HeaderMap {
        let mut headers = HeaderMap::new();
        self.insert(
            &mut headers,
            "error",
            &format!("error.{}", alert.error_key),
        );
        self.insert(&mut headers, "params", alert.entity_name);
        headers
    }

    fn alert(&self, message: &str, param: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        self.insert(&mut headers, "alert", message);
        self.insert(&mut headers, "params", param);
        headers
    }

    fn insert(&self, headers: &mut HeaderMap, suffix: &str, value: &str) {
        let name = format!("X-{}-{}", self.application_name, suffix);
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(name), Ok(value)) => {
                headers.insert(name, value);
            }
            _ => warn!(header = %name, "skipping alert header that is not valid HTTP"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creation_alert_names_the_identifier() {
        let headers = Alerts::new("gameRatingsApp").entity_creation(ENTITY_NAME, "42");
        assert_eq!(
            headers["x-gameratingsapp-alert"],
            "A new gameRating is created with identifier 42"
        );
        assert_eq!(headers["x-gameratingsapp-params"], "42");
    }

    #[test]
    fn failure_alert_uses_error_key() {
        let headers = Alerts::new("gameRatingsApp").failure(&FailureAlert {
            entity_name: ENTITY_NAME,
            error_key: "idexists",
        });
        assert_eq!(headers["x-gameratingsapp-error"], "error.idexists");
        assert_eq!(headers["x-gameratingsapp-params"], "gameRating");
    }

    #[test]
    fn invalid_application_name_yields_no_headers() {
        let headers = Alerts::new("bad name").entity_deletion(ENTITY_NAME, "1");
        assert!(headers.is_empty());
    }
}
