//! Application state management for userdeck.
//!
//! This module contains the core `App` struct that manages all application
//! state: the guarded screen selection, login form, directory page state,
//! search/filter state, pending edit/delete targets, and the channel used to
//! reconcile background API results into local state.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;
use chrono::Utc;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::api::{ApiClient, ApiError};
use crate::auth::{CredentialStore, Session, SessionData};
use crate::config::Config;
use crate::models::{filter_users, SearchField, User, UserUpdate};

// ============================================================================
// Constants
// ============================================================================

/// Buffer size for the background task message channel.
/// A handful of in-flight requests at most; 32 leaves ample headroom.
const CHANNEL_BUFFER_SIZE: usize = 32;

/// Maximum length for email input.
const MAX_EMAIL_LENGTH: usize = 64;

/// Maximum length for password input.
/// 128 chars accommodates password managers and passphrases.
const MAX_PASSWORD_LENGTH: usize = 128;

/// Maximum length for edit-form text fields.
const MAX_FIELD_LENGTH: usize = 64;

/// How long a success banner stays on screen before it self-clears.
const NOTICE_TTL: Duration = Duration::from_secs(3);

// ============================================================================
// UI State Types
// ============================================================================

/// Top-level screens. The directory is the protected one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Login,
    Directory,
}

/// Directory interaction mode (overlays and input capture)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Normal,
    Searching,
    Editing,
    ConfirmingDelete,
    ConfirmingQuit,
    ShowingHelp,
}

/// Login form focus state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginFocus {
    Email,
    Password,
    ShowPassword,
    Button,
}

impl LoginFocus {
    pub fn next(&self) -> Self {
        match self {
            LoginFocus::Email => LoginFocus::Password,
            LoginFocus::Password => LoginFocus::ShowPassword,
            LoginFocus::ShowPassword => LoginFocus::Button,
            LoginFocus::Button => LoginFocus::Email,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            LoginFocus::Email => LoginFocus::Button,
            LoginFocus::Password => LoginFocus::Email,
            LoginFocus::ShowPassword => LoginFocus::Password,
            LoginFocus::Button => LoginFocus::ShowPassword,
        }
    }
}

/// Login form state
#[derive(Debug)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub show_password: bool,
    pub focus: LoginFocus,
    pub error: Option<String>,
}

impl Default for LoginForm {
    fn default() -> Self {
        Self {
            email: String::new(),
            password: String::new(),
            show_password: false,
            focus: LoginFocus::Email,
            error: None,
        }
    }
}

/// Edit form focus state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditFocus {
    FirstName,
    LastName,
    Email,
}

impl EditFocus {
    pub fn next(&self) -> Self {
        match self {
            EditFocus::FirstName => EditFocus::LastName,
            EditFocus::LastName => EditFocus::Email,
            EditFocus::Email => EditFocus::FirstName,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            EditFocus::FirstName => EditFocus::Email,
            EditFocus::LastName => EditFocus::FirstName,
            EditFocus::Email => EditFocus::LastName,
        }
    }
}

/// The single pending edit target, pre-populated with the user's mutable fields
#[derive(Debug, Clone)]
pub struct EditForm {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub focus: EditFocus,
}

impl EditForm {
    fn for_user(user: &User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
            focus: EditFocus::FirstName,
        }
    }

    pub fn focused_field_mut(&mut self) -> &mut String {
        match self.focus {
            EditFocus::FirstName => &mut self.first_name,
            EditFocus::LastName => &mut self.last_name,
            EditFocus::Email => &mut self.email,
        }
    }
}

/// Kind of transient status banner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// A status banner. Success notices carry an expiry deadline and self-clear;
/// error notices stay until replaced or the view resets.
#[derive(Debug, Clone)]
pub struct Notice {
    pub text: String,
    pub kind: NoticeKind,
    expires_at: Option<Instant>,
}

impl Notice {
    fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: NoticeKind::Success,
            expires_at: Some(Instant::now() + NOTICE_TTL),
        }
    }

    fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: NoticeKind::Error,
            expires_at: None,
        }
    }

    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.map(|at| now >= at).unwrap_or(false)
    }
}

// ============================================================================
// Background Task Results
// ============================================================================

/// Result types from background API tasks.
///
/// Each variant is sent through an MPSC channel from a spawned request task
/// back to the main event loop, which reconciles it into local state.
#[derive(Debug)]
pub enum ApiEvent {
    /// A user-listing page arrived. `seq` identifies the request that asked
    /// for it; only the latest issued sequence number is applied.
    PageLoaded {
        seq: u64,
        users: Vec<User>,
        total_pages: u64,
    },
    /// A user-listing request failed
    PageFailed { seq: u64, message: String },
    /// An update request succeeded; merge the fields into the local record
    EditSaved { id: i64, fields: UserUpdate },
    /// An update request failed
    EditFailed { message: String },
    /// A delete request succeeded; drop the record locally
    DeleteDone { id: i64 },
    /// A delete request failed
    DeleteFailed { message: String },
}

// ============================================================================
// Main Application Struct
// ============================================================================

/// Main application state container
pub struct App {
    // Core services
    pub config: Config,
    pub session: Session,
    pub api: ApiClient,

    // Screen selection (read through the guard, see `screen()`)
    current_screen: Screen,
    pub mode: Mode,
    pub should_quit: bool,

    // Login form state
    pub login: LoginForm,

    // Directory page state
    pub users: Vec<User>,
    pub current_page: u64,
    pub total_pages: u64,
    pub loading: bool,
    pub fetch_error: Option<String>,

    // Search state (a pure view filter, never sent to the server)
    pub search_term: String,
    pub search_field: SearchField,
    pub selection: usize,

    // Pending mutation targets
    pub edit_form: Option<EditForm>,
    pub pending_delete: Option<User>,

    // Transient status banner
    pub notice: Option<Notice>,

    // Monotonic sequence number for page fetches; responses carrying an
    // older number are discarded
    fetch_seq: u64,

    // Background task channel
    events_rx: mpsc::Receiver<ApiEvent>,
    events_tx: mpsc::Sender<ApiEvent>,
}

impl App {
    /// Create a new application instance, loading config and any saved session
    pub async fn new() -> Result<Self> {
        let config = match Config::load() {
            Ok(c) => c,
            Err(e) => {
                warn!(error = %e, "Failed to load config, using defaults");
                Config::default()
            }
        };

        let store_dir = Config::store_dir().unwrap_or_else(|_| PathBuf::from("."));
        let mut session = Session::new(store_dir);
        match session.load() {
            Ok(found) => debug!(found, "Session store checked"),
            Err(e) => warn!(error = %e, "Failed to load session"),
        }

        let mut api = ApiClient::new(config.resolved_base_url())?;
        if let Some(token) = session.token() {
            api.set_token(token.to_string());
        }

        let mut app = Self::from_parts(config, session, api);

        // Pre-fill the login form from env vars, config, and the keychain
        let email = std::env::var("USERDECK_EMAIL")
            .ok()
            .or_else(|| app.config.last_email.clone())
            .unwrap_or_default();

        let password = std::env::var("USERDECK_PASSWORD")
            .ok()
            .or_else(|| {
                if email.is_empty() {
                    None
                } else {
                    CredentialStore::get_password(&email).ok()
                }
            })
            .unwrap_or_default();

        app.login.focus = if email.is_empty() {
            LoginFocus::Email
        } else {
            LoginFocus::Password
        };
        app.login.email = email;
        app.login.password = password;

        // Land on the directory when a session exists; the guard redirects
        // to the login screen otherwise
        app.navigate(Screen::Directory);

        Ok(app)
    }

    /// Assemble an application from already-constructed services
    pub fn from_parts(config: Config, session: Session, api: ApiClient) -> Self {
        let (tx, rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);

        Self {
            config,
            session,
            api,

            current_screen: Screen::Login,
            mode: Mode::Normal,
            should_quit: false,

            login: LoginForm::default(),

            users: Vec::new(),
            current_page: 1,
            total_pages: 1,
            loading: false,
            fetch_error: None,

            search_term: String::new(),
            search_field: SearchField::All,
            selection: 0,

            edit_form: None,
            pending_delete: None,

            notice: None,

            fetch_seq: 0,

            events_rx: rx,
            events_tx: tx,
        }
    }

    // =========================================================================
    // Navigation Guard
    // =========================================================================

    /// The screen to render right now. The directory only ever renders with
    /// a non-empty session token; without one this check redirects to the
    /// login screen. Called on every frame.
    pub fn screen(&self) -> Screen {
        match self.current_screen {
            Screen::Directory if !self.session.is_authenticated() => Screen::Login,
            screen => screen,
        }
    }

    /// Request a screen change. The same guard applies: navigating to the
    /// directory without a token lands on the login screen.
    pub fn navigate(&mut self, screen: Screen) {
        self.current_screen = match screen {
            Screen::Directory if !self.session.is_authenticated() => Screen::Login,
            screen => screen,
        };
        self.mode = Mode::Normal;
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    /// Attempt login with the credentials from the login form.
    /// Each submission is an independent attempt; failures surface as a
    /// banner on the login screen and never navigate.
    pub async fn submit_login(&mut self) {
        let email = self.login.email.trim().to_string();
        let password = self.login.password.clone();

        if email.is_empty() || password.is_empty() {
            self.login.error = Some("Email and password are required".to_string());
            return;
        }

        self.login.error = None;

        match self.api.login(&email, &password).await {
            Ok(token) => {
                self.session.update(SessionData {
                    token: token.clone(),
                    email: email.clone(),
                    created_at: Utc::now(),
                });
                if let Err(e) = self.session.save() {
                    warn!(error = %e, "Failed to save session");
                }
                self.api.set_token(token);

                if let Err(e) = CredentialStore::store(&email, &password) {
                    warn!(error = %e, "Failed to store credentials");
                }

                self.config.last_email = Some(email);
                if let Err(e) = self.config.save() {
                    warn!(error = %e, "Failed to save config");
                }

                info!("Login successful");
                self.reset_directory();
                self.navigate(Screen::Directory);
                self.fetch_page(1);
            }
            Err(e) => {
                error!(error = %e, "Login failed");
                self.login.error = Some(friendly_error(&e, "Login failed"));
            }
        }
    }

    /// Clear the session and return to the login screen
    pub fn logout(&mut self) {
        info!("Logging out");
        if let Err(e) = self.session.clear() {
            warn!(error = %e, "Failed to clear session file");
        }
        self.api.clear_token();
        self.reset_directory();
        self.login = LoginForm::default();
        self.login.email = self.config.last_email.clone().unwrap_or_default();
        self.login.focus = if self.login.email.is_empty() {
            LoginFocus::Email
        } else {
            LoginFocus::Password
        };
        self.navigate(Screen::Login);
    }

    /// Whether login input may grow the email field
    pub fn can_add_email_char(&self) -> bool {
        self.login.email.len() < MAX_EMAIL_LENGTH
    }

    /// Whether login input may grow the password field
    pub fn can_add_password_char(&self) -> bool {
        self.login.password.len() < MAX_PASSWORD_LENGTH
    }

    // =========================================================================
    // Directory: fetching and pagination
    // =========================================================================

    /// Issue a background fetch for one page of the user listing.
    /// Tags the request with a fresh sequence number so a slow response that
    /// arrives after a newer request is discarded instead of overwriting it.
    pub fn fetch_page(&mut self, page: u64) {
        self.fetch_seq += 1;
        let seq = self.fetch_seq;
        self.loading = true;

        let api = self.api.clone();
        let tx = self.events_tx.clone();

        tokio::spawn(async move {
            let event = match api.fetch_users(page).await {
                Ok(p) => ApiEvent::PageLoaded {
                    seq,
                    users: p.data,
                    total_pages: p.total_pages,
                },
                Err(e) => {
                    error!(error = %e, page, "Users fetch failed");
                    ApiEvent::PageFailed {
                        seq,
                        message: friendly_error(&e, "Failed to load users"),
                    }
                }
            };
            if tx.send(event).await.is_err() {
                error!("Failed to send fetch result - channel closed");
            }
        });
    }

    /// Change to the requested page. Out-of-range and same-page requests are
    /// ignored; an accepted request updates the page number and fetches it.
    pub fn change_page(&mut self, page: u64) {
        if page < 1 || page > self.total_pages || page == self.current_page {
            return;
        }
        self.current_page = page;
        self.fetch_page(page);
    }

    /// Re-fetch the current page
    pub fn refresh(&mut self) {
        self.fetch_page(self.current_page);
    }

    // =========================================================================
    // Directory: search and filtering
    // =========================================================================

    /// The visible slice of the last-fetched page: a pure function of the
    /// page, the search term, and the field criterion. Never fetches.
    pub fn visible_users(&self) -> Vec<&User> {
        filter_users(&self.users, self.search_term.trim(), self.search_field)
    }

    /// Cycle the search criterion to the next field
    pub fn cycle_search_field(&mut self) {
        self.search_field = self.search_field.next();
        self.clamp_selection();
    }

    pub fn clear_search(&mut self) {
        self.search_term.clear();
        self.clamp_selection();
    }

    fn clamp_selection(&mut self) {
        let len = self.visible_users().len();
        self.selection = self.selection.min(len.saturating_sub(1));
    }

    pub fn select_next(&mut self) {
        let len = self.visible_users().len();
        if len > 0 && self.selection + 1 < len {
            self.selection += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selection = self.selection.saturating_sub(1);
    }

    /// The currently highlighted user, if any
    pub fn selected_user(&self) -> Option<User> {
        self.visible_users()
            .get(self.selection)
            .map(|u| (*u).clone())
    }

    // =========================================================================
    // Directory: edit and delete
    // =========================================================================

    /// Open the edit form pre-populated with the user's mutable fields.
    /// Only one edit target exists at a time.
    pub fn begin_edit(&mut self, user: &User) {
        self.edit_form = Some(EditForm::for_user(user));
        self.mode = Mode::Editing;
    }

    pub fn cancel_edit(&mut self) {
        self.edit_form = None;
        self.mode = Mode::Normal;
    }

    /// Submit the edit form. The form closes unconditionally; only the
    /// success banner depends on the outcome, and a failed update is retried
    /// by reopening the form.
    pub fn submit_edit(&mut self) {
        let Some(form) = self.edit_form.take() else {
            return;
        };
        self.mode = Mode::Normal;

        let fields = UserUpdate {
            first_name: form.first_name.trim().to_string(),
            last_name: form.last_name.trim().to_string(),
            email: form.email.trim().to_string(),
        };
        let id = form.id;

        let api = self.api.clone();
        let tx = self.events_tx.clone();

        tokio::spawn(async move {
            let event = match api.update_user(id, &fields).await {
                Ok(()) => ApiEvent::EditSaved { id, fields },
                Err(e) => {
                    error!(error = %e, user_id = id, "User update failed");
                    ApiEvent::EditFailed {
                        message: friendly_error(&e, "Failed to update user"),
                    }
                }
            };
            if tx.send(event).await.is_err() {
                error!("Failed to send update result - channel closed");
            }
        });
    }

    /// Whether edit input may grow the focused field
    pub fn can_add_edit_char(&self) -> bool {
        self.edit_form
            .as_ref()
            .map(|f| {
                let len = match f.focus {
                    EditFocus::FirstName => f.first_name.len(),
                    EditFocus::LastName => f.last_name.len(),
                    EditFocus::Email => f.email.len(),
                };
                len < MAX_FIELD_LENGTH
            })
            .unwrap_or(false)
    }

    /// Stage a single record for deletion
    pub fn begin_delete(&mut self, user: &User) {
        self.pending_delete = Some(user.clone());
        self.mode = Mode::ConfirmingDelete;
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
        self.mode = Mode::Normal;
    }

    /// Send the delete request for the pending target. The target clears in
    /// both outcomes; a failed delete must be re-initiated.
    pub fn confirm_delete(&mut self) {
        let Some(user) = self.pending_delete.take() else {
            return;
        };
        self.mode = Mode::Normal;

        let api = self.api.clone();
        let tx = self.events_tx.clone();

        tokio::spawn(async move {
            let event = match api.delete_user(user.id).await {
                Ok(()) => ApiEvent::DeleteDone { id: user.id },
                Err(e) => {
                    error!(error = %e, user_id = user.id, "User delete failed");
                    ApiEvent::DeleteFailed {
                        message: friendly_error(&e, "Failed to delete user"),
                    }
                }
            };
            if tx.send(event).await.is_err() {
                error!("Failed to send delete result - channel closed");
            }
        });
    }

    // =========================================================================
    // Background event reconciliation
    // =========================================================================

    /// Drain and apply all pending background results
    pub fn drain_events(&mut self) {
        while let Ok(event) = self.events_rx.try_recv() {
            self.apply_event(event);
        }
    }

    /// Reconcile a single background result into local state
    fn apply_event(&mut self, event: ApiEvent) {
        match event {
            ApiEvent::PageLoaded {
                seq,
                users,
                total_pages,
            } => {
                if seq != self.fetch_seq {
                    debug!(seq, latest = self.fetch_seq, "Discarding stale page response");
                    return;
                }
                self.users = users;
                self.total_pages = total_pages.max(1);
                // A fresh page shows all of its records
                self.search_term.clear();
                self.search_field = SearchField::All;
                self.selection = 0;
                self.loading = false;
                self.fetch_error = None;
            }
            ApiEvent::PageFailed { seq, message } => {
                if seq != self.fetch_seq {
                    debug!(seq, latest = self.fetch_seq, "Discarding stale fetch error");
                    return;
                }
                // Previous list stays intact; only the banner changes
                self.loading = false;
                self.fetch_error = Some(message);
            }
            ApiEvent::EditSaved { id, fields } => {
                if let Some(user) = self.users.iter_mut().find(|u| u.id == id) {
                    user.first_name = fields.first_name;
                    user.last_name = fields.last_name;
                    user.email = fields.email;
                }
                self.set_notice(Notice::success("User updated"));
            }
            ApiEvent::EditFailed { message } => {
                self.set_notice(Notice::error(message));
            }
            ApiEvent::DeleteDone { id } => {
                self.users.retain(|u| u.id != id);
                self.clamp_selection();
                self.set_notice(Notice::success("User deleted"));
            }
            ApiEvent::DeleteFailed { message } => {
                self.set_notice(Notice::error(message));
            }
        }
    }

    // =========================================================================
    // Notices
    // =========================================================================

    /// Replace the current banner. A pending self-clear dies with the old
    /// banner; the new one carries its own deadline.
    fn set_notice(&mut self, notice: Notice) {
        self.notice = Some(notice);
    }

    /// Periodic housekeeping from the event loop: expire success banners
    pub fn tick(&mut self) {
        self.tick_at(Instant::now());
    }

    fn tick_at(&mut self, now: Instant) {
        if let Some(ref notice) = self.notice {
            if notice.is_expired(now) {
                self.notice = None;
            }
        }
    }

    fn reset_directory(&mut self) {
        self.users.clear();
        self.current_page = 1;
        self.total_pages = 1;
        self.loading = false;
        self.fetch_error = None;
        self.search_term.clear();
        self.search_field = SearchField::All;
        self.selection = 0;
        self.edit_form = None;
        self.pending_delete = None;
        self.notice = None;
    }
}

/// Map an operation error to a short human-readable banner message.
/// Server-provided messages win; transport problems get a network hint.
fn friendly_error(err: &anyhow::Error, fallback: &str) -> String {
    if let Some(api_err) = err.downcast_ref::<ApiError>() {
        return match api_err {
            ApiError::BadRequest(msg) => msg.clone(),
            ApiError::Unauthorized => "Session expired. Please log in again.".to_string(),
            other => format!("{}: {}", fallback, other),
        };
    }
    if let Some(req_err) = err.downcast_ref::<reqwest::Error>() {
        if req_err.is_timeout() {
            return "Connection timed out. Please try again.".to_string();
        }
        if req_err.is_connect() {
            return "Unable to connect to server. Check your internet connection.".to_string();
        }
    }
    fallback.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_app() -> App {
        let dir = tempfile::tempdir().expect("tempdir");
        let session = Session::new(dir.path().to_path_buf());
        let api = ApiClient::new("http://localhost:1").expect("client");
        App::from_parts(Config::default(), session, api)
    }

    fn authed_app() -> App {
        let mut app = test_app();
        app.session.update(SessionData {
            token: "QpwL5tke4Pnpja7X4".to_string(),
            email: "eve.holt@reqres.in".to_string(),
            created_at: Utc::now(),
        });
        app.navigate(Screen::Directory);
        app
    }

    fn page_users() -> Vec<User> {
        vec![
            User {
                id: 1,
                first_name: "George".to_string(),
                last_name: "Bluth".to_string(),
                email: "george.bluth@reqres.in".to_string(),
                avatar: String::new(),
            },
            User {
                id: 2,
                first_name: "Janet".to_string(),
                last_name: "Weaver".to_string(),
                email: "janet.weaver@reqres.in".to_string(),
                avatar: String::new(),
            },
        ]
    }

    fn load_page(app: &mut App, users: Vec<User>, total_pages: u64) {
        app.fetch_seq += 1;
        let seq = app.fetch_seq;
        app.apply_event(ApiEvent::PageLoaded {
            seq,
            users,
            total_pages,
        });
    }

    #[test]
    fn guard_redirects_directory_to_login_without_token() {
        let mut app = test_app();
        app.navigate(Screen::Directory);
        assert_eq!(app.screen(), Screen::Login);

        let app = authed_app();
        assert_eq!(app.screen(), Screen::Directory);
    }

    #[test]
    fn guard_reapplies_after_logout() {
        let mut app = authed_app();
        assert_eq!(app.screen(), Screen::Directory);

        app.logout();
        assert_eq!(app.screen(), Screen::Login);
        assert!(!app.session.is_authenticated());
        assert!(app.users.is_empty());
    }

    #[test]
    fn change_page_is_a_noop_outside_bounds() {
        let mut app = authed_app();
        load_page(&mut app, page_users(), 2);
        let seq_before = app.fetch_seq;

        app.change_page(0);
        app.change_page(3);
        assert_eq!(app.current_page, 1);
        assert_eq!(app.fetch_seq, seq_before, "no fetch may be issued");
    }

    #[test]
    fn change_page_is_a_noop_for_the_current_page() {
        let mut app = authed_app();
        load_page(&mut app, page_users(), 2);
        let seq_before = app.fetch_seq;

        app.change_page(1);
        assert_eq!(app.fetch_seq, seq_before);
    }

    #[tokio::test]
    async fn change_page_in_range_updates_page_and_fetches() {
        let mut app = authed_app();
        load_page(&mut app, page_users(), 2);
        let seq_before = app.fetch_seq;

        app.change_page(2);
        assert_eq!(app.current_page, 2);
        assert_eq!(app.fetch_seq, seq_before + 1);
        assert!(app.loading);
    }

    #[test]
    fn page_load_resets_filters_and_replaces_list() {
        let mut app = authed_app();
        app.search_term = "janet".to_string();
        app.search_field = SearchField::Email;

        load_page(&mut app, page_users(), 2);

        assert_eq!(app.users.len(), 2);
        assert_eq!(app.total_pages, 2);
        assert!(app.search_term.is_empty());
        assert_eq!(app.search_field, SearchField::All);
        assert!(!app.loading);
        assert!(app.fetch_error.is_none());
    }

    #[test]
    fn stale_page_response_is_discarded() {
        let mut app = authed_app();
        load_page(&mut app, page_users(), 2);

        // A newer request has since been issued
        app.fetch_seq += 1;

        app.apply_event(ApiEvent::PageLoaded {
            seq: app.fetch_seq - 1,
            users: vec![],
            total_pages: 9,
        });

        assert_eq!(app.users.len(), 2, "stale response must not overwrite state");
        assert_eq!(app.total_pages, 2);
    }

    #[test]
    fn fetch_failure_keeps_previous_list() {
        let mut app = authed_app();
        load_page(&mut app, page_users(), 2);

        app.fetch_seq += 1;
        let seq = app.fetch_seq;
        app.loading = true;
        app.apply_event(ApiEvent::PageFailed {
            seq,
            message: "Failed to load users".to_string(),
        });

        assert_eq!(app.users.len(), 2);
        assert!(!app.loading);
        assert_eq!(app.fetch_error.as_deref(), Some("Failed to load users"));
    }

    #[test]
    fn filtering_is_a_subset_of_the_fetched_page() {
        let mut app = authed_app();
        load_page(&mut app, page_users(), 2);

        app.search_term = "janet".to_string();
        let visible = app.visible_users();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, 2);

        app.search_term = "zzz".to_string();
        assert!(app.visible_users().is_empty());

        app.clear_search();
        assert_eq!(app.visible_users().len(), 2);
    }

    #[test]
    fn edit_success_merges_exactly_the_submitted_fields() {
        let mut app = authed_app();
        load_page(&mut app, page_users(), 2);

        let janet = app.users[1].clone();
        app.begin_edit(&janet);
        assert_eq!(app.mode, Mode::Editing);
        assert_eq!(
            app.edit_form.as_ref().map(|f| f.first_name.as_str()),
            Some("Janet")
        );

        app.apply_event(ApiEvent::EditSaved {
            id: 2,
            fields: UserUpdate {
                first_name: "Janet".to_string(),
                last_name: "Weaver".to_string(),
                email: "new@example.com".to_string(),
            },
        });

        assert_eq!(app.users[1].email, "new@example.com");
        assert_eq!(app.users[1].first_name, "Janet");
        // Other records untouched
        assert_eq!(app.users[0].email, "george.bluth@reqres.in");

        let notice = app.notice.as_ref().expect("success banner");
        assert_eq!(notice.kind, NoticeKind::Success);
    }

    #[test]
    fn edit_failure_shows_error_banner() {
        let mut app = authed_app();
        load_page(&mut app, page_users(), 2);

        app.apply_event(ApiEvent::EditFailed {
            message: "Failed to update user".to_string(),
        });

        let notice = app.notice.as_ref().expect("error banner");
        assert_eq!(notice.kind, NoticeKind::Error);
        // The record is unchanged
        assert_eq!(app.users[1].email, "janet.weaver@reqres.in");
    }

    #[test]
    fn cancel_edit_clears_the_single_target() {
        let mut app = authed_app();
        load_page(&mut app, page_users(), 2);

        let janet = app.users[1].clone();
        app.begin_edit(&janet);
        app.cancel_edit();
        assert!(app.edit_form.is_none());
        assert_eq!(app.mode, Mode::Normal);
    }

    #[test]
    fn delete_success_removes_exactly_one_record() {
        let mut app = authed_app();
        load_page(&mut app, page_users(), 2);

        let janet = app.users[1].clone();
        app.begin_delete(&janet);
        assert_eq!(app.mode, Mode::ConfirmingDelete);
        assert!(app.pending_delete.is_some());

        app.apply_event(ApiEvent::DeleteDone { id: 2 });

        assert_eq!(app.users.len(), 1);
        assert!(app.users.iter().all(|u| u.id != 2));
        let notice = app.notice.as_ref().expect("success banner");
        assert_eq!(notice.kind, NoticeKind::Success);
    }

    #[test]
    fn deleting_the_last_match_leaves_the_empty_state() {
        let mut app = authed_app();
        load_page(&mut app, page_users(), 2);

        app.search_term = "janet".to_string();
        assert_eq!(app.visible_users().len(), 1);

        app.apply_event(ApiEvent::DeleteDone { id: 2 });

        // Search term stays active and now matches nothing
        assert_eq!(app.search_term, "janet");
        assert!(app.visible_users().is_empty());
        assert_eq!(app.selection, 0);
    }

    #[test]
    fn cancel_delete_unstages_the_target() {
        let mut app = authed_app();
        load_page(&mut app, page_users(), 2);

        let janet = app.users[1].clone();
        app.begin_delete(&janet);
        app.cancel_delete();
        assert!(app.pending_delete.is_none());
        assert_eq!(app.mode, Mode::Normal);
        assert_eq!(app.users.len(), 2);
    }

    #[test]
    fn success_banner_expires_after_its_ttl() {
        let mut app = authed_app();
        app.apply_event(ApiEvent::EditSaved {
            id: 1,
            fields: UserUpdate {
                first_name: "George".to_string(),
                last_name: "Bluth".to_string(),
                email: "george.bluth@reqres.in".to_string(),
            },
        });
        assert!(app.notice.is_some());

        let now = Instant::now();
        app.tick_at(now + Duration::from_secs(1));
        assert!(app.notice.is_some(), "banner persists within the TTL");

        app.tick_at(now + NOTICE_TTL + Duration::from_millis(10));
        assert!(app.notice.is_none(), "banner self-clears after 3 seconds");
    }

    #[test]
    fn new_banner_replaces_the_pending_clear() {
        let mut app = authed_app();
        app.set_notice(Notice::success("first"));
        let first_deadline = app.notice.as_ref().and_then(|n| n.expires_at);

        app.set_notice(Notice::success("second"));
        let second_deadline = app.notice.as_ref().and_then(|n| n.expires_at);
        assert_eq!(app.notice.as_ref().map(|n| n.text.as_str()), Some("second"));
        assert!(second_deadline >= first_deadline);
    }

    #[test]
    fn error_banner_does_not_self_clear() {
        let mut app = authed_app();
        app.set_notice(Notice::error("Failed to delete user"));

        let now = Instant::now();
        app.tick_at(now + Duration::from_secs(60));
        assert!(app.notice.is_some());
    }

    #[test]
    fn selection_moves_within_the_visible_list() {
        let mut app = authed_app();
        load_page(&mut app, page_users(), 2);

        assert_eq!(app.selection, 0);
        app.select_next();
        assert_eq!(app.selection, 1);
        app.select_next();
        assert_eq!(app.selection, 1, "selection stops at the last row");
        app.select_prev();
        assert_eq!(app.selection, 0);
        app.select_prev();
        assert_eq!(app.selection, 0);
    }

    #[test]
    fn selected_user_respects_the_active_filter() {
        let mut app = authed_app();
        load_page(&mut app, page_users(), 2);

        app.search_term = "janet".to_string();
        app.clamp_selection();
        assert_eq!(app.selected_user().map(|u| u.id), Some(2));
    }
}
