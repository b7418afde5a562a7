//! Authenticated user profile and submitter identity.

use serde::{Deserialize, Serialize};

/// Profile of the authenticated principal, as asserted by the identity
/// provider. Read-only within this service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub family_name: String,
}

impl UserProfile {
    /// Display name used for commit signatures, `"<first> <family>"`.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.family_name)
    }
}

/// Identity recorded against a pending submission record.
///
/// Decoded from the stored `original_author` attribute. A record whose
/// attribute cannot be read decodes to the default (empty) identity, which
/// never matches any caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct SubmitterIdentity {
    pub email: String,
    pub first_name: String,
    pub family_name: String,
}

impl SubmitterIdentity {
    /// Encode as the raw attribute payload, `"<email>:<first> <family>"`.
    pub fn encode(profile: &UserProfile) -> String {
        format!(
            "{}:{} {}",
            profile.email, profile.first_name, profile.family_name
        )
    }

    /// Decode an attribute payload. Anything after the first `:` is the
    /// display name; the first space splits it into first/family name.
    /// Absent separators leave the remaining fields empty.
    pub fn decode(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.split_once(':') {
            Some((email, name)) => {
                let (first, family) = name.split_once(' ').unwrap_or((name, ""));
                Self {
                    email: email.to_string(),
                    first_name: first.to_string(),
                    family_name: family.to_string(),
                }
            }
            None => Self {
                email: trimmed.to_string(),
                ..Self::default()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> UserProfile {
        UserProfile {
            id: "alice".into(),
            email: "a@x.com".into(),
            first_name: "Alice".into(),
            family_name: "Adams".into(),
        }
    }

    #[test]
    fn encode_decode_round_trip() {
        let decoded = SubmitterIdentity::decode(&SubmitterIdentity::encode(&profile()));
        assert_eq!(decoded.email, "a@x.com");
        assert_eq!(decoded.first_name, "Alice");
        assert_eq!(decoded.family_name, "Adams");
    }

    #[test]
    fn decode_without_name_separator() {
        let decoded = SubmitterIdentity::decode("a@x.com:Alice");
        assert_eq!(decoded.email, "a@x.com");
        assert_eq!(decoded.first_name, "Alice");
        assert_eq!(decoded.family_name, "");
    }

    #[test]
    fn decode_garbage_never_panics() {
        let decoded = SubmitterIdentity::decode("");
        assert_eq!(decoded, SubmitterIdentity::default());
    }
}
