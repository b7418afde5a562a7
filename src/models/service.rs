//! Registered service definition.
//!
//! The service object is an opaque codec to this system: only identity,
//! name, contacts, and the draft-only environment restriction are inspected.
//! Every other field round-trips untouched through `extra`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

/// A registered service definition as submitted by users.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RegisteredService {
    /// Assigned id; 0 means unassigned/new
    #[serde(default)]
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub contacts: Vec<ServiceContact>,
    /// Draft-only environment restriction, stripped on promotion
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environments: Option<Vec<String>>,
    /// All remaining service fields, preserved verbatim
    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub extra: Map<String, Value>,
}

/// A service contact. Only the email takes part in ownership checks.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ServiceContact {
    #[serde(default)]
    pub email: String,
    /// Remaining contact fields, preserved verbatim
    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub extra: Map<String, Value>,
}

impl RegisteredService {
    /// True when `email` case-insensitively matches one of the contacts.
    pub fn is_owner(&self, email: &str) -> bool {
        self.contacts.iter().any(|c| c.email.eq_ignore_ascii_case(email))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(json: &str) -> RegisteredService {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn ownership_is_case_insensitive() {
        let svc = service(r#"{"id": 42, "name": "app", "contacts": [{"email": "B@X.com"}]}"#);
        assert!(svc.is_owner("b@x.com"));
        assert!(!svc.is_owner("c@x.com"));
    }

    #[test]
    fn unknown_fields_round_trip() {
        let svc = service(
            r#"{"id": 1, "name": "app", "serviceId": "https://app.example.org/.*", "evaluationOrder": 10}"#,
        );
        let out = serde_json::to_value(&svc).unwrap();
        assert_eq!(out["serviceId"], "https://app.example.org/.*");
        assert_eq!(out["evaluationOrder"], 10);
    }

    #[test]
    fn missing_id_defaults_to_unassigned() {
        let svc = service(r#"{"name": "new app"}"#);
        assert_eq!(svc.id, 0);
    }
}
