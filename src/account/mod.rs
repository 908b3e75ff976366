//! Account flows: sign in/out and password reset via an emailed link.

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod fake;
mod login;
mod reset;

pub use login::{AccountError, login, logout, restore_session, stored_session};
pub use reset::{
    INVALID_LINK_MESSAGE, MISSING_TOKEN_MESSAGE, PASSWORD_UPDATE_ERROR, PasswordInputError,
    PasswordResetError, RESET_SUCCESS_MESSAGE, ResetLinkParams, TOKEN_VALIDATION_ERROR,
    UNKNOWN_USER_MESSAGE, check_new_password, reset_password, validate_reset_link,
};
