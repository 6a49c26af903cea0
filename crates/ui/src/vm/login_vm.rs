use services::AuthError;
use stream_core::model::CredentialsError;

pub const CONFIRM_EMAIL_NOTICE: &str =
    "Account created. Check your email to confirm it, then sign in.";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum AuthMode {
    #[default]
    SignIn,
    SignUp,
}

impl AuthMode {
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::SignIn => Self::SignUp,
            Self::SignUp => Self::SignIn,
        }
    }

    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::SignIn => "Sign In",
            Self::SignUp => "Create your account",
        }
    }

    #[must_use]
    pub fn submit_label(self, busy: bool) -> &'static str {
        match (self, busy) {
            (Self::SignIn, false) => "Sign In",
            (Self::SignIn, true) => "Signing in...",
            (Self::SignUp, false) => "Sign Up",
            (Self::SignUp, true) => "Creating account...",
        }
    }

    #[must_use]
    pub fn switch_prompt(self) -> (&'static str, &'static str) {
        match self {
            Self::SignIn => ("New to CineStream?", "Sign up now"),
            Self::SignUp => ("Already have an account?", "Sign in"),
        }
    }
}

/// Message shown above the login form.
#[must_use]
pub fn auth_error_message(err: &AuthError) -> String {
    match err {
        AuthError::Credentials(CredentialsError::InvalidEmail) => {
            "Please enter a valid email address.".to_owned()
        }
        AuthError::Credentials(inner) => inner.to_string(),
        AuthError::AlreadyRegistered => {
            "An account with this email already exists. Try signing in.".to_owned()
        }
        AuthError::InvalidLogin(_) => "Incorrect email or password.".to_owned(),
        _ => "We couldn't reach the server. Please try again.".to_owned(),
    }
}
