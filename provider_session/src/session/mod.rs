mod config;
mod errors;
mod main;
mod types;

pub use config::{SESSION_COOKIE_MAX_AGE, SESSION_COOKIE_NAME};
pub use errors::SessionError;
pub use types::{
    KEY_PROVIDER, KEY_USER_EMAIL, KEY_USER_ID, KEY_WORKSPACE_ID, KEY_WORKSPACE_NAME, Session,
    SessionValues,
};

pub use main::{
    CSRF_HEADER, destroy_session, get_or_create_session, load_session, save_session,
    session_by_id, verify_csrf, verify_csrf_token,
};

pub(crate) use main::{
    delete_session_record, get_session_id_from_headers, issue_session_cookie, new_session,
};
