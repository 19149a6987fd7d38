use crate::app::message::{MessageTemplate, DEFAULT_BUDGET, DEFAULT_SUBJECT};
use crate::utils::error::{Result, SantaError};
use crate::utils::validation::{
    validate_email, validate_non_empty_string, validate_range, validate_required_field, Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_SMTP_PORT: u16 = 587;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    pub smtp: SmtpConfig,
    #[serde(default)]
    pub message: MessageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmtpConfig {
    pub host: String,
    pub port: Option<u16>,
    pub login_account: String,
    pub sender_account: Option<String>,
    pub password: Option<String>,
    pub password_env: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessageConfig {
    pub subject: Option<String>,
    pub budget: Option<String>,
}

/// Where the SMTP password comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSource {
    Inline(String),
    Environment(String),
}

impl CredentialSource {
    pub fn resolve(&self) -> Result<String> {
        match self {
            CredentialSource::Inline(password) => Ok(password.clone()),
            CredentialSource::Environment(var) => {
                std::env::var(var).map_err(|_| SantaError::ConfigError {
                    message: format!("Environment variable {} is not set", var),
                })
            }
        }
    }
}

impl MailConfig {
    /// 從 TOML 檔案載入郵件設定
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(SantaError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析郵件設定
    pub fn from_toml_str(content: &str) -> Result<Self> {
        // 處理環境變數替換
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| SantaError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${SMTP_PASSWORD})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| SantaError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn host(&self) -> &str {
        &self.smtp.host
    }

    pub fn port(&self) -> u16 {
        self.smtp.port.unwrap_or(DEFAULT_SMTP_PORT)
    }

    pub fn login_account(&self) -> &str {
        &self.smtp.login_account
    }

    /// 未設定時沿用登入帳號
    pub fn sender_account(&self) -> &str {
        self.smtp
            .sender_account
            .as_deref()
            .unwrap_or(&self.smtp.login_account)
    }

    pub fn credential_source(&self) -> Result<CredentialSource> {
        match (&self.smtp.password, &self.smtp.password_env) {
            (Some(_), Some(_)) => Err(SantaError::ConfigValidationError {
                field: "smtp.password".to_string(),
                message: "Set either password or password_env, not both".to_string(),
            }),
            (Some(password), None) => {
                if password.contains("${") {
                    return Err(SantaError::ConfigValidationError {
                        field: "smtp.password".to_string(),
                        message: format!("Unresolved environment variable in '{}'", password),
                    });
                }
                Ok(CredentialSource::Inline(password.clone()))
            }
            (None, env) => {
                let var = validate_required_field("smtp.password_env", env)?;
                Ok(CredentialSource::Environment(var.clone()))
            }
        }
    }

    pub fn template(&self) -> MessageTemplate {
        MessageTemplate::new(
            self.message.subject.as_deref().unwrap_or(DEFAULT_SUBJECT),
            self.message.budget.as_deref().unwrap_or(DEFAULT_BUDGET),
        )
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validate_non_empty_string("smtp.host", &self.smtp.host)?;
        validate_range("smtp.port", self.port(), 1, u16::MAX)?;
        validate_email("smtp.login_account", self.login_account())?;
        validate_email("smtp.sender_account", self.sender_account())?;

        match self.credential_source()? {
            CredentialSource::Inline(_) => {}
            CredentialSource::Environment(var) => {
                validate_non_empty_string("smtp.password_env", &var)?;
            }
        }

        if let Some(subject) = &self.message.subject {
            validate_non_empty_string("message.subject", subject)?;
        }

        Ok(())
    }
}

impl Validate for MailConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
