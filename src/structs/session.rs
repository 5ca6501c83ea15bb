use super::client::{AuthApi, Client};
use super::store::{LocalStorage, SessionStore};
use super::tier::{tier_by_id, tier_name, upgrade_options, TierDetails};
use super::{Form, Message, Session, View, FORCED_TIER};
use crate::config::ClientOptions;
use crate::errors::AuthError;
use tracing::{debug, info, warn};

const LOGIN_FIELDS_MISSING: &str = "Please enter username and password.";
const REGISTER_FIELDS_MISSING: &str = "Please fill in all fields.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    Anonymous,
    Authenticating,
    Authenticated,
}

type LoginHook = Box<dyn FnMut(&Session)>;

/// Owns the current session and drives login, registration, purchase and logout.
///
/// The session only changes through [`AuthScreen::login`] and [`AuthScreen::logout`].
/// Every failure is surfaced once as an error [`Message`] and never retried.
pub struct AuthScreen<A: AuthApi, S: SessionStore> {
    api: A,
    store: S,
    state: AuthState,
    session: Option<Session>,
    busy: bool,
    message: Option<Message>,
    view: View,
    form: Form,
    on_login: Option<LoginHook>,
}

impl<A: AuthApi, S: SessionStore> AuthScreen<A, S> {
    /// Creates the screen, restoring a persisted session if one is stored.
    pub fn new(api: A, store: S) -> Self {
        let session = store.load();

        let state = match &session {
            Some(session) => {
                debug!(username = %session.username, "restored stored session");
                AuthState::Authenticated
            }
            None => AuthState::Anonymous,
        };

        Self {
            api,
            store,
            state,
            session,
            busy: false,
            message: None,
            view: View::default(),
            form: Form::default(),
            on_login: None,
        }
    }

    /// Called with the new session after every successful login.
    pub fn on_login(mut self, hook: impl FnMut(&Session) + 'static) -> Self {
        self.on_login = Some(Box::new(hook));
        self
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn state(&self) -> AuthState {
        self.state
    }

    /// True while a request is in flight.
    ///
    /// Transitions take `&mut self` and [`Client`] blocks, so with the HTTP
    /// client this is only ever observed as `false` between calls.
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn message(&self) -> Option<&Message> {
        self.message.as_ref()
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn form(&self) -> &Form {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut Form {
        &mut self.form
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Tier of the logged-in user, if any.
    pub fn current_tier(&self) -> Option<u32> {
        self.session.as_ref().map(|s| s.tier)
    }

    /// Display name of the logged-in user's tier.
    pub fn current_tier_name(&self) -> Option<&'static str> {
        self.current_tier().map(tier_name)
    }

    /// Tiers the logged-in user could upgrade to. Empty when nobody is logged in.
    pub fn upgrade_options(&self) -> Vec<&'static TierDetails> {
        match self.current_tier() {
            Some(tier) => upgrade_options(tier).collect(),
            None => Vec::new(),
        }
    }

    /// Toggles between the login and registration forms.
    pub fn switch_view(&mut self) {
        self.view = match self.view {
            View::Login => View::Register,
            View::Register => View::Login,
        };
        self.message = None;
    }

    fn begin(&mut self, text: &str) -> Result<(), AuthError> {
        if self.busy {
            return Err(AuthError::Busy);
        }

        self.busy = true;
        self.message = Some(Message::info(text));
        Ok(())
    }

    fn fail(&mut self, err: AuthError) -> AuthError {
        self.message = Some(Message::error(err.to_string()));
        err
    }

    /// Logs in with the username and password in the form.
    ///
    /// The tier reported by the server is replaced with [`FORCED_TIER`].
    /// Only allowed while anonymous; log out first to switch users.
    pub fn login(&mut self) -> Result<&Session, AuthError> {
        if self.state != AuthState::Anonymous {
            return Err(self.fail(AuthError::AlreadyLoggedIn));
        }

        let credentials = match self.form.credentials() {
            Some(credentials) => credentials,
            None => return Err(self.fail(AuthError::Validation(LOGIN_FIELDS_MISSING))),
        };

        self.begin("Logging in...")?;
        self.state = AuthState::Authenticating;

        let result = self
            .api
            .login(&credentials)
            .and_then(|res| {
                if let Some(tier) = &res.tier {
                    debug!(server_tier = %tier, "ignoring server-reported tier");
                }

                let session = Session {
                    username: credentials.username,
                    api_key: res.api_key,
                    tier: FORCED_TIER,
                };

                self.store.save(&session)?;
                Ok(session)
            });

        self.busy = false;

        match result {
            Ok(session) => {
                info!(username = %session.username, "session started");
                self.state = AuthState::Authenticated;
                self.message = Some(Message::success("Login successful!"));

                if let Some(hook) = self.on_login.as_mut() {
                    hook(&session);
                }

                Ok(&*self.session.insert(session))
            }
            Err(err) => {
                warn!(error = %err, "login failed");
                self.state = AuthState::Anonymous;
                Err(self.fail(err))
            }
        }
    }

    /// Registers the account described by the form.
    ///
    /// Never logs in: on success the form is cleared and the view switches to login.
    pub fn register(&mut self) -> Result<String, AuthError> {
        let registration = match self.form.registration() {
            Some(registration) => registration,
            None => return Err(self.fail(AuthError::Validation(REGISTER_FIELDS_MISSING))),
        };

        self.begin("Registering...")?;

        let result = self.api.register(&registration);

        self.busy = false;

        match result {
            Ok(res) => {
                info!(username = %registration.username, "account registered");
                self.message = Some(Message::success(res.message.clone()));
                self.form.clear();
                self.view = View::Login;
                Ok(res.message)
            }
            Err(err) => {
                warn!(error = %err, "registration failed");
                Err(self.fail(err))
            }
        }
    }

    /// Starts the purchase of a tier. Payments are disabled, so this only
    /// reports that after the stub's delay. The session is left untouched.
    pub fn purchase(&mut self, tier_id: u32) -> Result<String, AuthError> {
        let duration = tier_by_id(tier_id)
            .map(|t| t.duration_param())
            .unwrap_or_default();

        self.begin("Redirecting...")?;

        let result = self.api.purchase(tier_id, &duration);

        self.busy = false;

        match result {
            Ok(res) => {
                self.message = Some(Message::info(res.message.clone()));
                Ok(res.message)
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    /// Forgets the session locally and on disk. Safe to call when logged out.
    pub fn logout(&mut self) -> Result<(), AuthError> {
        if self.busy {
            return Err(AuthError::Busy);
        }

        self.store.clear()?;

        if let Some(session) = self.session.take() {
            info!(username = %session.username, "logged out");
        }

        self.state = AuthState::Anonymous;
        self.form.clear();
        self.message = None;
        Ok(())
    }
}

impl AuthScreen<Client, LocalStorage> {
    /// Screen wired to the HTTP client and on-disk storage described by `options`.
    pub fn open(options: ClientOptions) -> Result<Self, AuthError> {
        let store = LocalStorage::from_dir(options.storage_dir.as_deref())?;
        let client = Client::new(options)?;
        Ok(Self::new(client, store))
    }
}
