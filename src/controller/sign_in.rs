//! Email/password sign-in form.

use crate::api::ApiError;
use crate::config::SecureString;
use crate::controller::SubmitError;
use crate::session::Session;
use crate::ui::fetch::{MutationIntent, MutationReducer, MutationState};
use crate::ui::mvi::Reducer;
use crate::ui::notice::Notice;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SignInField {
    #[default]
    Email,
    Password,
}

impl SignInField {
    pub fn toggle(self) -> Self {
        match self {
            SignInField::Email => SignInField::Password,
            SignInField::Password => SignInField::Email,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoginRequest {
    pub email: String,
    pub password: SecureString,
}

#[derive(Default)]
pub struct SignInController {
    email: String,
    password: String,
    focus: SignInField,
    state: MutationState,
}

impl SignInController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    /// Password length only; the text itself is never rendered.
    pub fn password_len(&self) -> usize {
        self.password.chars().count()
    }

    pub fn focus(&self) -> SignInField {
        self.focus
    }

    pub fn is_submitting(&self) -> bool {
        self.state.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.state.error.as_deref()
    }

    pub fn toggle_focus(&mut self) {
        self.focus = self.focus.toggle();
    }

    pub fn set_email(&mut self, email: impl Into<String>) {
        self.email = email.into();
    }

    pub fn set_password(&mut self, password: impl Into<String>) {
        self.password = password.into();
    }

    pub fn type_char(&mut self, c: char) {
        match self.focus {
            SignInField::Email => self.email.push(c),
            SignInField::Password => self.password.push(c),
        }
    }

    pub fn backspace(&mut self) {
        match self.focus {
            SignInField::Email => self.email.pop(),
            SignInField::Password => self.password.pop(),
        };
    }

    pub fn submit(&mut self) -> Result<LoginRequest, SubmitError> {
        if self.state.loading {
            return Err(SubmitError::InFlight);
        }
        let email = self.email.trim();
        if email.is_empty() {
            return Err(SubmitError::MissingField("Email"));
        }
        if self.password.is_empty() {
            return Err(SubmitError::MissingField("Password"));
        }
        let request = LoginRequest {
            email: email.to_string(),
            password: SecureString::new(self.password.clone()),
        };
        self.dispatch(MutationIntent::Request);
        Ok(request)
    }

    /// A successful login by a non-admin is treated as a failure.
    pub fn on_result(&mut self, result: Result<Session, ApiError>) -> Result<Session, Notice> {
        let outcome = match result {
            Ok(session) if session.user.is_admin() => Ok(session),
            Ok(session) => {
                tracing::warn!(user = %session.user.id, role = %session.user.role, "non-admin sign-in rejected");
                Err("You are not an admin.".to_string())
            }
            Err(err) => Err(err.user_message()),
        };
        match outcome {
            Ok(session) => {
                self.dispatch(MutationIntent::Success);
                self.password.clear();
                Ok(session)
            }
            Err(message) => {
                self.dispatch(MutationIntent::Fail {
                    message: message.clone(),
                });
                Err(Notice::error(message))
            }
        }
    }

    fn dispatch(&mut self, intent: MutationIntent) {
        self.state = MutationReducer::reduce(std::mem::take(&mut self.state), intent);
    }
}
