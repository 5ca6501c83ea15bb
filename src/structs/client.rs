use super::tier::tier_by_id;
use super::{
    Credentials, ErrorBody, LoginResponse, PurchaseResponse, RegisterResponse, Registration,
};
use crate::config::ClientOptions;
use crate::errors::AuthError;
use colorful::Color;
use colorful::Colorful;
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::thread;
use std::time::Duration;
use tracing::{debug, info, info_span, warn};

/// Calls the auth API makes on behalf of the auth screen.
///
/// `Client` is the HTTP implementation. Each call is one request with no retry.
pub trait AuthApi {
    fn register(&self, registration: &Registration) -> Result<RegisterResponse, AuthError>;
    fn login(&self, credentials: &Credentials) -> Result<LoginResponse, AuthError>;
    /// Buying a tier. Currently a stub that never reaches a server.
    fn purchase(&self, tier_id: u32, duration: &str) -> Result<PurchaseResponse, AuthError>;
}

/// StealthMate auth client. Used to interact with the StealthMate API.
#[derive(Debug)]
pub struct Client {
    /// Base URL of the API deployment.
    pub base_url: Url,
    /// Whether the client should print debug statements.
    pub debug: bool,
    /// Artificial latency of the purchase stub.
    pub purchase_delay: Duration,
    http: reqwest::blocking::Client,
}

impl Client {
    /// Creates a new client.
    pub fn new(options: ClientOptions) -> Result<Self, AuthError> {
        let base_url = Url::parse(&options.base_url).or(Err(AuthError::InvalidBaseUrl))?;

        if !matches!(base_url.scheme(), "http" | "https") || base_url.cannot_be_a_base() {
            return Err(AuthError::InvalidBaseUrl);
        }

        Ok(Self {
            base_url,
            debug: options.debug,
            purchase_delay: options.purchase_delay,
            http: reqwest::blocking::Client::new(),
        })
    }

    /// Creates a client configured from the environment.
    pub fn from_env() -> Result<Self, AuthError> {
        Self::new(ClientOptions::from_env())
    }

    fn status(&self, text: &str) {
        if !self.debug {
            return;
        }

        #[cfg(windows)]
        println!("[AUTH] {}", text);

        #[cfg(not(windows))]
        println!(
            "{} {}",
            "[AUTH]".gradient_with_color(Color::Cyan, Color::SpringGreen4),
            text
        );
    }

    /// Full URL for an endpoint under the base URL.
    pub fn endpoint(&self, path: &str) -> Result<Url, AuthError> {
        // Append a / to path if it does not start with one
        let path = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{}", path)
        };

        let base = self.base_url.as_str().trim_end_matches('/');

        Url::parse(&format!("{}{}", base, path)).or(Err(AuthError::InvalidBaseUrl))
    }

    /// POST a JSON body to an endpoint of the auth API.
    pub fn api_call<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, AuthError> {
        let url = self.endpoint(path)?;

        let span = info_span!("auth.request", http.method = "POST", url = %url);
        let _enter = span.enter();

        let response = match self.http.post(url).json(body).send() {
            Ok(response) => response,
            Err(err) => {
                warn!(error = %err, "request to auth API failed");
                return Err(AuthError::api(None));
            }
        };

        let status = response.status();
        debug!(status = status.as_u16(), "auth API responded");

        if !status.is_success() {
            // Bodies that are not `{ "error": ... }` fall back to the generic text
            let body = response.json::<ErrorBody>().unwrap_or_default();
            return Err(AuthError::api(body.error));
        }

        response.json::<T>().or(Err(AuthError::FailedToDecode))
    }
}

impl AuthApi for Client {
    fn register(&self, registration: &Registration) -> Result<RegisterResponse, AuthError> {
        self.status("Registering...");

        let result = self.api_call::<_, RegisterResponse>("register", registration);

        match &result {
            Ok(_) => {
                info!(username = %registration.username, "registered");
                self.status("Successfully registered.");
            }
            Err(err) => self.status(&format!("Failed to register: {}", err)),
        }

        result
    }

    fn login(&self, credentials: &Credentials) -> Result<LoginResponse, AuthError> {
        self.status("Logging in...");

        let result = self.api_call::<_, LoginResponse>("login", credentials);

        match &result {
            Ok(_) => {
                info!(username = %credentials.username, "logged in");

                #[cfg(windows)]
                self.status(&format!("Welcome, {}.", credentials.username));

                #[cfg(not(windows))]
                self.status(&format!(
                    "Welcome, {}.",
                    credentials
                        .username
                        .as_str()
                        .gradient_with_color(Color::SpringGreen4, Color::Cyan)
                ));
            }
            Err(err) => self.status(&format!("Failed to log in: {}", err)),
        }

        result
    }

    fn purchase(&self, tier_id: u32, duration: &str) -> Result<PurchaseResponse, AuthError> {
        // TODO: Send the purchase to the payment backend once it exists
        let name = tier_by_id(tier_id).map(|t| t.name).unwrap_or("this tier");
        debug!(tier_id, duration, "purchase requested while payments are disabled");

        thread::sleep(self.purchase_delay);

        Ok(PurchaseResponse {
            message: format!(
                "Upgrade to {} is currently disabled. Payment integration coming soon!",
                name
            ),
        })
    }
}
