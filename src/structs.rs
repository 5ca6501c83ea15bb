use serde::{Deserialize, Serialize};

pub mod client;
pub mod session;
pub mod store;
pub mod tier;

/// Tier every session is given at login, whatever the server reports.
///
/// The server-side tier is ignored until payment integration exists. Changing
/// this constant is the single switch for trusting the server again.
pub const FORCED_TIER: u32 = 0;

/// The locally held identity of a logged-in user.
///
/// Serialized with the field names `username`, `apiKey` and `tier`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub username: String,
    /// Opaque credential issued at registration and handed back by login.
    #[serde(rename = "apiKey")]
    pub api_key: String,
    /// Service level. Tier 0 is the free baseline.
    pub tier: u32,
}

/// Body of `POST /login`.
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Body of `POST /register`.
#[derive(Debug, Clone, Serialize)]
pub struct Registration {
    pub username: String,
    pub password: String,
    pub email: String,
    #[serde(rename = "apiKey")]
    pub api_key: String,
}

/// Data returned by the server on a successful registration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegisterResponse {
    pub message: String,
}

/// Data returned by the server on a successful login.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LoginResponse {
    #[serde(rename = "apiKey")]
    pub api_key: String,
    /// Tier as reported by the server, in whatever shape it arrives.
    /// Only logged, never trusted, see [`FORCED_TIER`].
    #[serde(default)]
    pub tier: Option<serde_json::Value>,
}

/// Result of the purchase flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchaseResponse {
    pub message: String,
}

/// Error body sent by the server alongside a non-success status.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Success,
    Error,
}

/// Transient status line for the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub text: String,
    pub kind: MessageKind,
}

impl Message {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: MessageKind::Info,
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: MessageKind::Success,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: MessageKind::Error,
        }
    }
}

/// Which form the UI should show while nobody is logged in.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum View {
    #[default]
    Login,
    Register,
}

/// Pending form input.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Form {
    pub username: String,
    pub password: String,
    pub email: String,
    pub api_key: String,
}

impl Form {
    pub fn clear(&mut self) {
        *self = Form::default();
    }

    /// Credentials for a login, or `None` if username or password is empty.
    pub fn credentials(&self) -> Option<Credentials> {
        if self.username.is_empty() || self.password.is_empty() {
            return None;
        }

        Some(Credentials {
            username: self.username.clone(),
            password: self.password.clone(),
        })
    }

    /// Registration payload, or `None` if any of the four fields is empty.
    pub fn registration(&self) -> Option<Registration> {
        if self.username.is_empty()
            || self.password.is_empty()
            || self.email.is_empty()
            || self.api_key.is_empty()
        {
            return None;
        }

        Some(Registration {
            username: self.username.clone(),
            password: self.password.clone(),
            email: self.email.clone(),
            api_key: self.api_key.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_uses_camel_case_api_key() {
        let session = Session {
            username: "alice".into(),
            api_key: "abc".into(),
            tier: 0,
        };

        let json = serde_json::to_value(&session).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "username": "alice", "apiKey": "abc", "tier": 0 })
        );
    }

    #[test]
    fn login_response_tolerates_missing_tier() {
        let res: LoginResponse = serde_json::from_str(r#"{"apiKey":"abc"}"#).unwrap();
        assert_eq!(res.api_key, "abc");
        assert_eq!(res.tier, None);
    }

    #[test]
    fn login_response_accepts_any_tier_shape() {
        for body in [
            r#"{"apiKey":"abc","tier":null}"#,
            r#"{"apiKey":"abc","tier":-1}"#,
            r#"{"apiKey":"abc","tier":"pro"}"#,
            r#"{"apiKey":"abc","tier":2}"#,
        ] {
            let res: LoginResponse = serde_json::from_str(body).unwrap();
            assert_eq!(res.api_key, "abc");
        }
    }

    #[test]
    fn form_requires_every_registration_field() {
        let mut form = Form {
            username: "alice".into(),
            password: "pw123".into(),
            email: "alice@example.com".into(),
            api_key: String::new(),
        };
        assert!(form.registration().is_none());
        assert!(form.credentials().is_some());

        form.api_key = "gemini".into();
        let reg = form.registration().unwrap();
        assert_eq!(reg.api_key, "gemini");

        form.clear();
        assert_eq!(form, Form::default());
        assert!(form.credentials().is_none());
    }
}
