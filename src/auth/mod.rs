mod helpers;
mod middleware;
mod password;
mod token;

pub use helpers::issue_session;
pub use middleware::{AuthError, RequireUser};
pub use password::{
    MIN_PASSWORD_LEN, email_local_part, hash_password, normalize_email, validate_password,
    verify_password,
};
pub use token::{SessionToken, TOKEN_PREFIX};
