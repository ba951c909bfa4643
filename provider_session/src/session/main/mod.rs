mod cookie;
mod csrf;
mod session;

pub use csrf::{CSRF_HEADER, verify_csrf, verify_csrf_token};
pub use session::{
    destroy_session, get_or_create_session, load_session, save_session, session_by_id,
};

pub(crate) use cookie::{get_session_id_from_headers, issue_session_cookie};
pub(crate) use session::{delete_session_record, new_session};
