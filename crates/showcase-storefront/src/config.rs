//! Suite configuration: credentials, selectors, expected messages.
//!
//! One canonical fixture schema, serialized as camelCase JSON. The
//! [`SuiteConfig::demo`] constructor carries the demo-storefront values
//! the suite runs against; a JSON file with the same shape can replace
//! them via [`SuiteConfig::from_file`].

use ingreso::IngresoResult;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Error shown when credentials match no stored account
pub const MSG_MISMATCH: &str =
    "Epic sadface: Username and password do not match any user in this service";

/// Error shown when the username field is empty
pub const MSG_USERNAME_REQUIRED: &str = "Epic sadface: Username is required";

/// Error shown when the password field is empty
pub const MSG_PASSWORD_REQUIRED: &str = "Epic sadface: Password is required";

/// Error shown for the locked-out account
pub const MSG_LOCKED_OUT: &str = "Epic sadface: Sorry, this user has been locked out.";

/// One account in the user roster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccount {
    /// Login name
    pub username: String,
    /// Password
    pub password: String,
    /// What this account exercises
    pub description: String,
}

impl UserAccount {
    fn new(username: &str, description: &str) -> Self {
        Self {
            username: username.to_string(),
            password: "secret_sauce".to_string(),
            description: description.to_string(),
        }
    }
}

/// The demo storefront's user roster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRoster {
    /// Plain working account
    pub standard: UserAccount,
    /// Account the backend refuses with the locked-out message
    pub locked_out: UserAccount,
    /// Account with known UI defects past login
    pub problem: UserAccount,
    /// Account whose login is artificially slow
    pub performance_glitch: UserAccount,
    /// Account that raises console errors past login
    pub error: UserAccount,
    /// Account with visual defects past login
    pub visual: UserAccount,
}

impl UserRoster {
    /// All roster accounts in a fixed order
    #[must_use]
    pub fn all(&self) -> [&UserAccount; 6] {
        [
            &self.standard,
            &self.locked_out,
            &self.problem,
            &self.performance_glitch,
            &self.error,
            &self.visual,
        ]
    }

    /// Find the roster account matching both fields exactly
    #[must_use]
    pub fn find(&self, username: &str, password: &str) -> Option<&UserAccount> {
        self.all()
            .into_iter()
            .find(|account| account.username == username && account.password == password)
    }
}

/// A credential pair the form must reject, with its expected message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectedAttempt {
    /// Submitted username
    pub username: String,
    /// Submitted password
    pub password: String,
    /// Exact error banner text expected
    pub error_message: String,
}

/// The rejected credential pairs the suite drives
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvalidCredentials {
    /// Unknown username, valid-looking password
    pub invalid_username: RejectedAttempt,
    /// Known username, wrong password
    pub invalid_password: RejectedAttempt,
    /// Empty username
    pub empty_username: RejectedAttempt,
    /// Empty password
    pub empty_password: RejectedAttempt,
    /// Both fields empty
    pub empty_both: RejectedAttempt,
}

/// Locators of the login page and its post-login marker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginSelectors {
    /// Username field
    pub username_input: String,
    /// Password field
    pub password_input: String,
    /// Submit button
    pub login_button: String,
    /// Error banner
    pub error_message: String,
    /// Post-login marker: the inventory listing
    pub inventory_list: String,
}

/// Selector groups, keyed by page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Selectors {
    /// Login page locators
    pub login_page: LoginSelectors,
}

/// Wait budgets in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timeouts {
    /// General interaction budget
    pub default: u64,
    /// Page-load budget
    pub page_load: u64,
}

/// Full fixture consumed by the suite
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuiteConfig {
    /// Login page URL
    pub base_url: String,
    /// User roster
    pub users: UserRoster,
    /// Rejected credential pairs with expected messages
    pub invalid_credentials: InvalidCredentials,
    /// Locators
    pub selectors: Selectors,
    /// Wait budgets
    pub timeouts: Timeouts,
}

impl SuiteConfig {
    /// The canonical demo-storefront fixture
    #[must_use]
    pub fn demo() -> Self {
        let rejected = |username: &str, password: &str, message: &str| RejectedAttempt {
            username: username.to_string(),
            password: password.to_string(),
            error_message: message.to_string(),
        };

        Self {
            base_url: "https://www.saucedemo.com/".to_string(),
            users: UserRoster {
                standard: UserAccount::new("standard_user", "Plain working account"),
                locked_out: UserAccount::new("locked_out_user", "Account locked by the backend"),
                problem: UserAccount::new("problem_user", "Account with UI defects past login"),
                performance_glitch: UserAccount::new(
                    "performance_glitch_user",
                    "Account with slow login",
                ),
                error: UserAccount::new("error_user", "Account raising console errors"),
                visual: UserAccount::new("visual_user", "Account with visual defects"),
            },
            invalid_credentials: InvalidCredentials {
                invalid_username: rejected("invalid_user", "secret_sauce", MSG_MISMATCH),
                invalid_password: rejected("standard_user", "wrong_password", MSG_MISMATCH),
                empty_username: rejected("", "secret_sauce", MSG_USERNAME_REQUIRED),
                empty_password: rejected("standard_user", "", MSG_PASSWORD_REQUIRED),
                empty_both: rejected("", "", MSG_USERNAME_REQUIRED),
            },
            selectors: Selectors {
                login_page: LoginSelectors {
                    username_input: "input#user-name".to_string(),
                    password_input: "input#password".to_string(),
                    login_button: "input#login-button".to_string(),
                    error_message: r#"h3[data-test="error"]"#.to_string(),
                    inventory_list: ".inventory_list".to_string(),
                },
            },
            timeouts: Timeouts {
                default: 10_000,
                page_load: 30_000,
            },
        }
    }

    /// URL of the post-login inventory page
    #[must_use]
    pub fn inventory_url(&self) -> String {
        format!("{}inventory.html", self.base_url)
    }

    /// Load a fixture from a JSON file.
    ///
    /// # Errors
    ///
    /// Propagates filesystem and deserialization failures.
    pub fn from_file(path: &Path) -> IngresoResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self::demo()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_fixture_values() {
        let config = SuiteConfig::demo();
        assert_eq!(config.base_url, "https://www.saucedemo.com/");
        assert_eq!(config.users.standard.username, "standard_user");
        assert_eq!(config.users.standard.password, "secret_sauce");
        assert_eq!(config.timeouts.default, 10_000);
        assert_eq!(config.timeouts.page_load, 30_000);
        assert_eq!(config.selectors.login_page.username_input, "input#user-name");
    }

    #[test]
    fn test_roster_find_is_exact_match() {
        let config = SuiteConfig::demo();
        assert!(config.users.find("standard_user", "secret_sauce").is_some());
        assert!(config.users.find("STANDARD_USER", "secret_sauce").is_none());
        assert!(config.users.find("standard_user", "SECRET_SAUCE").is_none());
        assert!(config.users.find("standard_user", "").is_none());
    }

    #[test]
    fn test_rejected_attempts_carry_exact_messages() {
        let config = SuiteConfig::demo();
        assert_eq!(
            config.invalid_credentials.invalid_username.error_message,
            MSG_MISMATCH
        );
        assert_eq!(
            config.invalid_credentials.empty_username.error_message,
            MSG_USERNAME_REQUIRED
        );
        assert_eq!(
            config.invalid_credentials.empty_password.error_message,
            MSG_PASSWORD_REQUIRED
        );
        // Empty both: the username check fires first.
        assert_eq!(
            config.invalid_credentials.empty_both.error_message,
            MSG_USERNAME_REQUIRED
        );
    }

    #[test]
    fn test_inventory_url() {
        let config = SuiteConfig::demo();
        assert_eq!(
            config.inventory_url(),
            "https://www.saucedemo.com/inventory.html"
        );
    }

    #[test]
    fn test_json_round_trip_uses_camel_case() {
        let config = SuiteConfig::demo();
        let json = serde_json::to_string_pretty(&config).unwrap();
        assert!(json.contains("\"baseUrl\""));
        assert!(json.contains("\"invalidCredentials\""));
        assert!(json.contains("\"lockedOut\""));
        assert!(json.contains("\"errorMessage\""));
        assert!(json.contains("\"pageLoad\""));

        let parsed: SuiteConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fixture.json");
        let json = serde_json::to_string(&SuiteConfig::demo()).unwrap();
        std::fs::write(&path, json).unwrap();

        let loaded = SuiteConfig::from_file(&path).unwrap();
        assert_eq!(loaded, SuiteConfig::demo());
    }

    #[test]
    fn test_from_file_rejects_wrong_shape() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fixture.json");
        std::fs::write(&path, r#"{"baseUrl": "https://example/login"}"#).unwrap();
        assert!(SuiteConfig::from_file(&path).is_err());
    }
}
