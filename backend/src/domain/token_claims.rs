//! Bearer token claims and the per-request authorisation context.
//!
//! Decoding reads the payload segment of a compact JWT without checking its
//! signature. Callers must run the token through a
//! [`TokenVerifier`](crate::domain::ports::TokenVerifier) first; the claims
//! are identity assertions only once that check has passed.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::Deserialize;
use thiserror::Error;

/// Group whose members may create hotel listings.
pub const ADMIN_GROUP: &str = "Admin";

/// Structural failures while decoding a token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenDecodeError {
    /// The token is not three dot-separated segments.
    #[error("token must contain three dot-separated segments")]
    Structure,
    /// The payload segment is not base64url.
    #[error("token payload is not valid base64url")]
    Encoding,
    /// The payload is not a JSON claims object.
    #[error("token payload is not a valid claims object: {message}")]
    Claims { message: String },
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum GroupsClaim {
    Many(Vec<String>),
    One(String),
}

#[derive(Debug, Deserialize)]
struct RawClaims {
    #[serde(default)]
    sub: Option<String>,
    #[serde(rename = "cognito:groups", default)]
    groups: Option<GroupsClaim>,
    #[serde(default)]
    exp: Option<i64>,
}

/// Claims read from a token payload.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TokenClaims {
    subject: Option<String>,
    groups: Vec<String>,
    expires_at: Option<i64>,
}

impl TokenClaims {
    /// Decode the payload segment of a compact token.
    ///
    /// `cognito:groups` may be an array, a single string, or absent.
    ///
    /// # Examples
    /// ```
    /// use base64::Engine as _;
    /// use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    /// use hotel_admin::domain::TokenClaims;
    ///
    /// let payload = URL_SAFE_NO_PAD.encode(r#"{"sub":"u1","cognito:groups":["Admin"]}"#);
    /// let claims = TokenClaims::decode(&format!("e30.{payload}.sig")).expect("decodes");
    /// assert_eq!(claims.subject(), Some("u1"));
    /// assert_eq!(claims.groups(), ["Admin"]);
    /// ```
    pub fn decode(token: &str) -> Result<Self, TokenDecodeError> {
        let mut segments = token.trim().split('.');
        let (Some(_header), Some(payload), Some(_signature), None) = (
            segments.next(),
            segments.next(),
            segments.next(),
            segments.next(),
        ) else {
            return Err(TokenDecodeError::Structure);
        };

        // Some issuers pad their segments; the URL-safe alphabet is still required.
        let bytes = URL_SAFE_NO_PAD
            .decode(payload.trim_end_matches('='))
            .map_err(|_| TokenDecodeError::Encoding)?;
        let raw: RawClaims =
            serde_json::from_slice(&bytes).map_err(|err| TokenDecodeError::Claims {
                message: err.to_string(),
            })?;

        let groups = match raw.groups {
            Some(GroupsClaim::Many(groups)) => groups,
            Some(GroupsClaim::One(group)) => vec![group],
            None => Vec::new(),
        };
        Ok(Self {
            subject: raw.sub.filter(|sub| !sub.trim().is_empty()),
            groups,
            expires_at: raw.exp,
        })
    }

    /// The `sub` claim, when present and non-blank.
    #[must_use]
    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref()
    }

    /// Groups listed in `cognito:groups`.
    #[must_use]
    pub fn groups(&self) -> &[String] {
        &self.groups
    }

    /// The `exp` claim as seconds since the Unix epoch.
    #[must_use]
    pub fn expires_at(&self) -> Option<i64> {
        self.expires_at
    }
}

/// Reasons an authorisation check fails.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthorizationError {
    /// The token carries no subject.
    #[error("token has no subject")]
    MissingSubject,
    /// The caller is not a member of the required group.
    #[error("caller is not a member of the {group} group")]
    MissingGroup { group: String },
    /// The submitted user identifier differs from the token subject.
    #[error("submitted userId does not match the token subject")]
    SubjectMismatch,
}

/// Request-scoped identity derived from verified claims.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationContext {
    subject: String,
    groups: Vec<String>,
}

impl AuthorizationContext {
    /// Build a context from claims, requiring a subject.
    pub fn from_claims(claims: TokenClaims) -> Result<Self, AuthorizationError> {
        let TokenClaims {
            subject, groups, ..
        } = claims;
        let subject = subject.ok_or(AuthorizationError::MissingSubject)?;
        Ok(Self { subject, groups })
    }

    /// Authenticated caller.
    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Whether the caller belongs to `group` (case-sensitive).
    #[must_use]
    pub fn is_member_of(&self, group: &str) -> bool {
        self.groups.iter().any(|candidate| candidate == group)
    }

    /// Fail unless the caller belongs to `group`.
    pub fn require_group(&self, group: &str) -> Result<(), AuthorizationError> {
        if self.is_member_of(group) {
            Ok(())
        } else {
            Err(AuthorizationError::MissingGroup {
                group: group.to_owned(),
            })
        }
    }

    /// Fail unless the submitted user identifier is the token subject.
    pub fn require_subject(&self, submitted: &str) -> Result<(), AuthorizationError> {
        if submitted == self.subject {
            Ok(())
        } else {
            Err(AuthorizationError::SubjectMismatch)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn token(payload: &str) -> String {
        format!("e30.{}.c2ln", URL_SAFE_NO_PAD.encode(payload))
    }

    #[rstest]
    #[case(r#"{"sub":"u1","cognito:groups":["Admin","Ops"]}"#, &["Admin", "Ops"])]
    #[case(r#"{"sub":"u1","cognito:groups":"Admin"}"#, &["Admin"])]
    #[case(r#"{"sub":"u1"}"#, &[])]
    fn decode_reads_groups_in_every_shape(#[case] payload: &str, #[case] expected: &[&str]) {
        let claims = TokenClaims::decode(&token(payload)).expect("decodes");
        assert_eq!(claims.groups(), expected);
        assert_eq!(claims.subject(), Some("u1"));
    }

    #[rstest]
    #[case("only-one-segment")]
    #[case("two.segments")]
    #[case("a.b.c.d")]
    fn decode_rejects_wrong_segment_count(#[case] raw: &str) {
        assert_eq!(TokenClaims::decode(raw), Err(TokenDecodeError::Structure));
    }

    #[rstest]
    fn decode_rejects_non_base64_payload() {
        assert_eq!(
            TokenClaims::decode("e30.***.sig"),
            Err(TokenDecodeError::Encoding)
        );
    }

    #[rstest]
    fn decode_rejects_non_object_payload() {
        let err = TokenClaims::decode(&token("[1,2]")).expect_err("array payload");
        assert!(matches!(err, TokenDecodeError::Claims { .. }));
    }

    #[rstest]
    fn decode_accepts_padded_payload() {
        let padded = base64::engine::general_purpose::URL_SAFE.encode(r#"{"sub":"u"}"#);
        let claims = TokenClaims::decode(&format!("e30.{padded}.sig")).expect("decodes");
        assert_eq!(claims.subject(), Some("u"));
    }

    #[rstest]
    fn blank_subject_is_treated_as_missing() {
        let claims = TokenClaims::decode(&token(r#"{"sub":"  "}"#)).expect("decodes");
        assert_eq!(
            AuthorizationContext::from_claims(claims),
            Err(AuthorizationError::MissingSubject)
        );
    }

    #[rstest]
    #[case(r#"{"sub":"u1","cognito:groups":["admin"]}"#)]
    #[case(r#"{"sub":"u1","cognito:groups":[]}"#)]
    #[case(r#"{"sub":"u1"}"#)]
    fn require_group_rejects_non_members(#[case] payload: &str) {
        let claims = TokenClaims::decode(&token(payload)).expect("decodes");
        let context = AuthorizationContext::from_claims(claims).expect("subject present");
        assert!(matches!(
            context.require_group(ADMIN_GROUP),
            Err(AuthorizationError::MissingGroup { .. })
        ));
    }

    #[rstest]
    fn require_subject_compares_exactly() {
        let claims = TokenClaims::decode(&token(r#"{"sub":"u1"}"#)).expect("decodes");
        let context = AuthorizationContext::from_claims(claims).expect("subject present");
        assert_eq!(context.require_subject("u1"), Ok(()));
        assert_eq!(
            context.require_subject("U1"),
            Err(AuthorizationError::SubjectMismatch)
        );
    }
}
