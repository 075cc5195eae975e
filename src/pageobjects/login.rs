use super::registry::SelectorRegistry;
use crate::driver::Selector;
use crate::error::RegistryError;

/// Security plugin login form, plus the header shown once the app is loaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginPage {
    pub route: String,
    pub username_input: Selector,
    pub password_input: Selector,
    pub submit_button: Selector,
    pub app_header: Selector,
}

impl Default for LoginPage {
    fn default() -> Self {
        Self {
            route: "/app/wazuh".to_string(),
            username_input: Selector::css(r#"[data-test-subj="user-name"]"#),
            password_input: Selector::css(r#"[data-test-subj="password"]"#),
            submit_button: Selector::css(r#"[data-test-subj="submit"]"#),
            app_header: Selector::css(".euiHeader"),
        }
    }
}

impl LoginPage {
    pub fn registry(&self) -> Result<SelectorRegistry, RegistryError> {
        SelectorRegistry::builder()
            .entry("usernameInput", self.username_input.clone())
            .entry("passwordInput", self.password_input.clone())
            .entry("submitButton", self.submit_button.clone())
            .entry("appHeader", self.app_header.clone())
            .build()
    }
}
