use crate::utils::error::{DashboardError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_STATEMENT_TIMEOUT_SECS: u64 = 60;

/// Everything the dashboard reads from its optional TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardSettings {
    pub page: PageConfig,
    pub mock: MockConfig,
    pub connection: Option<ConnectionConfig>,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    pub title: String,
    pub orders_caption: String,
    pub customers_caption: String,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            title: "Orders Dashboard".to_string(),
            orders_caption: "Here are the latest orders:".to_string(),
            customers_caption: "Here are the latest customers:".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MockConfig {
    /// Relative paths resolve against the working directory.
    pub data_dir: String,
    pub orders_file: String,
    pub customers_file: String,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            data_dir: "mock_data".to_string(),
            orders_file: "mock_data_orders.csv".to_string(),
            customers_file: "customers.csv".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TokenType {
    #[default]
    Oauth,
    KeypairJwt,
}

impl TokenType {
    /// Accepts the same names as the TOML file, ignoring case.
    pub fn parse(field: &str, value: &str) -> Result<Self> {
        if value.eq_ignore_ascii_case("OAUTH") {
            Ok(TokenType::Oauth)
        } else if value.eq_ignore_ascii_case("KEYPAIR_JWT") {
            Ok(TokenType::KeypairJwt)
        } else {
            Err(DashboardError::InvalidConfigValueError {
                field: field.to_string(),
                value: value.to_string(),
                reason: "Expected OAUTH or KEYPAIR_JWT".to_string(),
            })
        }
    }

    pub fn as_header_value(&self) -> &'static str {
        match self {
            TokenType::Oauth => "OAUTH",
            TokenType::KeypairJwt => "KEYPAIR_JWT",
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct ConnectionConfig {
    pub account_url: String,
    pub token: String,
    #[serde(default)]
    pub token_type: TokenType,
    pub database: Option<String>,
    pub schema: Option<String>,
    pub warehouse: Option<String>,
    pub role: Option<String>,
    pub timeout_seconds: Option<u64>,
}

// token 不可出現在日誌裡
impl std::fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("account_url", &self.account_url)
            .field("token", &"<redacted>")
            .field("token_type", &self.token_type)
            .field("database", &self.database)
            .field("schema", &self.schema)
            .field("warehouse", &self.warehouse)
            .field("role", &self.role)
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

impl ConnectionConfig {
    pub fn new(account_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            account_url: account_url.into(),
            token: token.into(),
            token_type: TokenType::default(),
            database: None,
            schema: None,
            warehouse: None,
            role: None,
            timeout_seconds: None,
        }
    }

    /// Reads `SNOWFLAKE_*` variables. Returns `Ok(None)` when the account URL is unset.
    pub fn from_env() -> Result<Option<Self>> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`from_env`](Self::from_env) over an arbitrary variable lookup.
    /// Values that are set but cannot be parsed are errors, never defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Option<Self>>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.is_empty());

        let Some(account_url) = var("SNOWFLAKE_ACCOUNT_URL") else {
            return Ok(None);
        };

        let token_type = match var("SNOWFLAKE_TOKEN_TYPE") {
            Some(value) => TokenType::parse("SNOWFLAKE_TOKEN_TYPE", &value)?,
            None => TokenType::default(),
        };

        let timeout_seconds = match var("SNOWFLAKE_TIMEOUT_SECONDS") {
            Some(value) => Some(value.trim().parse::<u64>().map_err(|e| {
                DashboardError::InvalidConfigValueError {
                    field: "SNOWFLAKE_TIMEOUT_SECONDS".to_string(),
                    value: value.clone(),
                    reason: format!("Expected a whole number of seconds: {}", e),
                }
            })?),
            None => None,
        };

        Ok(Some(Self {
            account_url,
            token: var("SNOWFLAKE_TOKEN").unwrap_or_default(),
            token_type,
            database: var("SNOWFLAKE_DATABASE"),
            schema: var("SNOWFLAKE_SCHEMA"),
            warehouse: var("SNOWFLAKE_WAREHOUSE"),
            role: var("SNOWFLAKE_ROLE"),
            timeout_seconds,
        }))
    }

    pub fn timeout_seconds(&self) -> u64 {
        self.timeout_seconds
            .unwrap_or(DEFAULT_STATEMENT_TIMEOUT_SECS)
    }
}

impl Validate for ConnectionConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("connection.account_url", &self.account_url)?;
        validation::validate_non_empty_string("connection.token", &self.token)?;

        if self.token.contains("${") {
            return Err(DashboardError::ConfigValidationError {
                field: "connection.token".to_string(),
                message: "token references an environment variable that is not set".to_string(),
            });
        }

        let identifiers = [
            ("connection.database", &self.database),
            ("connection.schema", &self.schema),
            ("connection.warehouse", &self.warehouse),
            ("connection.role", &self.role),
        ];
        for (field, value) in identifiers {
            if let Some(value) = value {
                validation::validate_identifier(field, value)?;
            }
        }

        // SQL API 上限為 7 天
        validation::validate_range("connection.timeout_seconds", self.timeout_seconds(), 1, 604_800)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub html_path: Option<String>,
}

impl DashboardSettings {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(DashboardError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| DashboardError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${SNOWFLAKE_TOKEN})，未設定的保留原文
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| DashboardError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// The connection from the file, falling back to `SNOWFLAKE_*` variables.
    pub fn resolve_connection(&self) -> Result<ConnectionConfig> {
        if let Some(connection) = &self.connection {
            return Ok(connection.clone());
        }

        ConnectionConfig::from_env()?.ok_or_else(|| DashboardError::MissingConfigError {
            field: "connection.account_url (or SNOWFLAKE_ACCOUNT_URL)".to_string(),
        })
    }
}

impl Validate for DashboardSettings {
    fn validate(&self) -> Result<()> {
        validation::validate_non_empty_string("page.title", &self.page.title)?;
        validation::validate_path("mock.data_dir", &self.mock.data_dir)?;
        validation::validate_path("mock.orders_file", &self.mock.orders_file)?;
        validation::validate_path("mock.customers_file", &self.mock.customers_file)?;

        if let Some(html_path) = &self.output.html_path {
            validation::validate_path("output.html_path", html_path)?;
        }

        // [connection] 只在 live 模式由 SqlApiSession::connect 驗證
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_match_mock_layout() {
        let settings = DashboardSettings::from_toml_str("").unwrap();
        assert_eq!(settings.mock.data_dir, "mock_data");
        assert_eq!(settings.mock.orders_file, "mock_data_orders.csv");
        assert_eq!(settings.mock.customers_file, "customers.csv");
        assert_eq!(settings.page.title, "Orders Dashboard");
        assert!(settings.connection.is_none());
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_parse_connection_section() {
        let settings = DashboardSettings::from_toml_str(
            r#"
[page]
title = "Sales"

[connection]
account_url = "https://acme.snowflakecomputing.com"
token = "abc"
token_type = "KEYPAIR_JWT"
database = "ANALYTICS"
schema = "PUBLIC"
timeout_seconds = 30
"#,
        )
        .unwrap();

        assert_eq!(settings.page.title, "Sales");
        assert_eq!(settings.page.orders_caption, "Here are the latest orders:");
        let connection = settings.connection.as_ref().unwrap();
        assert_eq!(connection.token_type, TokenType::KeypairJwt);
        assert_eq!(connection.timeout_seconds(), 30);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_env_substitution() {
        std::env::set_var("ORDERS_DASHBOARD_TEST_TOKEN", "secret-token");
        let settings = DashboardSettings::from_toml_str(
            r#"
[connection]
account_url = "https://acme.snowflakecomputing.com"
token = "${ORDERS_DASHBOARD_TEST_TOKEN}"
"#,
        )
        .unwrap();
        assert_eq!(settings.connection.unwrap().token, "secret-token");
    }

    #[test]
    fn test_unresolved_token_fails_connection_validation_only() {
        let settings = DashboardSettings::from_toml_str(
            r#"
[connection]
account_url = "https://acme.snowflakecomputing.com"
token = "${ORDERS_DASHBOARD_TEST_UNSET_VARIABLE}"
"#,
        )
        .unwrap();

        // mock 模式不應被 live 憑證擋下
        assert!(settings.validate().is_ok());
        assert!(matches!(
            settings.connection.as_ref().unwrap().validate(),
            Err(DashboardError::ConfigValidationError { .. })
        ));
    }

    #[test]
    fn test_bad_identifier_rejected() {
        let mut connection = ConnectionConfig::new("https://acme.snowflakecomputing.com", "t");
        connection.schema = Some("public; drop".to_string());
        assert!(connection.validate().is_err());
    }

    #[test]
    fn test_debug_redacts_token() {
        let connection = ConnectionConfig::new("https://acme.snowflakecomputing.com", "hunter2");
        let printed = format!("{:?}", connection);
        assert!(!printed.contains("hunter2"));
        assert!(printed.contains("<redacted>"));
    }

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_env_connection_absent_without_account_url() {
        let lookup = lookup_from(&[("SNOWFLAKE_TOKEN", "t")]);
        assert!(ConnectionConfig::from_lookup(lookup).unwrap().is_none());
    }

    #[test]
    fn test_env_connection_parses_values() {
        let lookup = lookup_from(&[
            ("SNOWFLAKE_ACCOUNT_URL", "https://acme.snowflakecomputing.com"),
            ("SNOWFLAKE_TOKEN", "t"),
            ("SNOWFLAKE_TOKEN_TYPE", "keypair_jwt"),
            ("SNOWFLAKE_TIMEOUT_SECONDS", "120"),
            ("SNOWFLAKE_ROLE", "REPORTING"),
        ]);
        let connection = ConnectionConfig::from_lookup(lookup).unwrap().unwrap();
        assert_eq!(connection.token_type, TokenType::KeypairJwt);
        assert_eq!(connection.timeout_seconds(), 120);
        assert_eq!(connection.role.as_deref(), Some("REPORTING"));
        assert!(connection.database.is_none());
    }

    #[test]
    fn test_env_bad_timeout_is_rejected() {
        let lookup = lookup_from(&[
            ("SNOWFLAKE_ACCOUNT_URL", "https://acme.snowflakecomputing.com"),
            ("SNOWFLAKE_TIMEOUT_SECONDS", "abc"),
        ]);
        match ConnectionConfig::from_lookup(lookup) {
            Err(DashboardError::InvalidConfigValueError { field, value, .. }) => {
                assert_eq!(field, "SNOWFLAKE_TIMEOUT_SECONDS");
                assert_eq!(value, "abc");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_env_unknown_token_type_is_rejected() {
        let lookup = lookup_from(&[
            ("SNOWFLAKE_ACCOUNT_URL", "https://acme.snowflakecomputing.com"),
            ("SNOWFLAKE_TOKEN_TYPE", "PASSWORD"),
        ]);
        match ConnectionConfig::from_lookup(lookup) {
            Err(DashboardError::InvalidConfigValueError { field, value, .. }) => {
                assert_eq!(field, "SNOWFLAKE_TOKEN_TYPE");
                assert_eq!(value, "PASSWORD");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_invalid_toml() {
        assert!(DashboardSettings::from_toml_str("[page\ntitle=").is_err());
    }
}
