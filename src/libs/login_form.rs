/// State behind the login page.
///
/// Holds the two bound fields and whether the password is shown in plain
/// text. Nothing here validates or transforms what the user typed; the
/// visibility flag only affects how the page draws the password.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct LoginFormState {
    email: String,
    password: String,
    show_password: bool,
}

impl LoginFormState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn set_email<T: Into<String>>(&mut self, value: T) {
        self.email = value.into();
    }

    pub fn set_password<T: Into<String>>(&mut self, value: T) {
        self.password = value.into();
    }

    /// Flip password visibility. Calling it twice is a no-op.
    pub fn toggle_show(&mut self) {
        self.show_password = !self.show_password;
    }

    /// Whether the password should be drawn in plain text.
    pub fn is_password_visible(&self) -> bool {
        self.show_password
    }
}

// Keep credentials out of logs and panic reports.
impl std::fmt::Debug for LoginFormState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginFormState")
            .field("email_len", &self.email.chars().count())
            .field("password_len", &self.password.chars().count())
            .field("show_password", &self.show_password)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_hidden_and_empty() {
        let form = LoginFormState::new();
        assert!(!form.is_password_visible());
        assert_eq!(form.email(), "");
        assert_eq!(form.password(), "");
    }

    #[test]
    fn toggle_once_shows_password() {
        let mut form = LoginFormState::new();
        form.toggle_show();
        assert!(form.is_password_visible());
    }

    #[test]
    fn toggle_twice_restores_state() {
        for initial in [false, true] {
            let mut form = LoginFormState::new();
            if initial {
                form.toggle_show();
            }
            form.toggle_show();
            form.toggle_show();
            assert_eq!(form.is_password_visible(), initial);
        }
    }

    #[test]
    fn fields_read_back_exactly() {
        let mut form = LoginFormState::new();
        for value in ["", "a@b.c", "  spaced  ", "не email", "\u{1F600}\t"] {
            form.set_email(value);
            assert_eq!(form.email(), value);
            form.set_password(value);
            assert_eq!(form.password(), value);
        }
    }

    #[test]
    fn toggle_keeps_password() {
        let mut form = LoginFormState::new();
        form.set_password("abc123");
        form.toggle_show();
        assert_eq!(form.password(), "abc123");
        assert!(form.is_password_visible());
        form.toggle_show();
        assert_eq!(form.password(), "abc123");
    }

    #[test]
    fn debug_hides_values() {
        let mut form = LoginFormState::new();
        form.set_email("someone@example.com");
        form.set_password("hunter2");
        let out = format!("{:?}", form);
        assert!(!out.contains("hunter2"));
        assert!(!out.contains("someone@example.com"));
        assert!(out.contains("password_len: 7"));
    }
}
