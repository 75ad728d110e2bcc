mod cookie;
mod csrf;
mod errors;
mod password;
mod token;

pub use cookie::{CookieSettings, SameSite, SessionCookie, cookie_value};
pub use csrf::{CSRF_HEADER_NAME, is_state_changing, verify_csrf_token};
pub use errors::SessionError;
pub use password::{hash_password, verify_password};
pub use token::{SessionClaims, SessionSigner};
