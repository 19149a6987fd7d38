use thiserror::Error;

#[derive(Error, Debug)]
pub enum SantaError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("File '{path}' is not valid UTF-8")]
    EncodingError { path: String },

    #[error("Parse error in {source_name} line {line}: {reason} ('{content}')")]
    ParseError {
        source_name: String,
        line: usize,
        content: String,
        reason: String,
    },

    #[error("At least 2 participants are required, got {count}")]
    InsufficientParticipants { count: usize },

    #[error("Participant email '{email}' appears more than once")]
    DuplicateParticipant { email: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid email address: {0}")]
    AddressError(#[from] lettre::address::AddressError),

    #[error("Failed to build message: {0}")]
    MessageError(#[from] lettre::error::Error),

    #[error("SMTP server {host} refused the connection")]
    ConnectionRefused { host: String },

    #[error("SMTP transport error: {0}")]
    TransportError(#[from] lettre::transport::smtp::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Configuration,
    Notification,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl SantaError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            SantaError::EncodingError { .. }
            | SantaError::ParseError { .. }
            | SantaError::InsufficientParticipants { .. }
            | SantaError::DuplicateParticipant { .. } => ErrorCategory::Input,
            SantaError::ConfigError { .. }
            | SantaError::ConfigValidationError { .. }
            | SantaError::InvalidConfigValueError { .. }
            | SantaError::MissingConfigError { .. } => ErrorCategory::Configuration,
            SantaError::AddressError(_)
            | SantaError::MessageError(_)
            | SantaError::ConnectionRefused { .. }
            | SantaError::TransportError(_) => ErrorCategory::Notification,
            SantaError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input | ErrorCategory::Configuration => ErrorSeverity::High,
            // 部分郵件可能已寄出，重跑前需人工確認
            ErrorCategory::Notification => ErrorSeverity::Medium,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// 對應的行程結束碼
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            SantaError::ParseError { .. } => {
                "Each roster line must look like 'First Last, email'; history lines like 'A <a@x> -> B <b@x>'"
            }
            SantaError::EncodingError { .. } => "Save the file as UTF-8 and try again",
            SantaError::InsufficientParticipants { .. } => {
                "Add more participants or remove the leading '#' from excluded lines"
            }
            SantaError::DuplicateParticipant { .. } => {
                "Remove the duplicated line from the roster"
            }
            SantaError::ConfigError { .. }
            | SantaError::ConfigValidationError { .. }
            | SantaError::InvalidConfigValueError { .. }
            | SantaError::MissingConfigError { .. } => {
                "Check the mail settings file and the command line arguments"
            }
            SantaError::AddressError(_) => "Check the email addresses in the roster and settings",
            SantaError::MessageError(_) => "Check the message subject and sender settings",
            SantaError::ConnectionRefused { .. } => {
                "Check the SMTP host and port; no messages were sent"
            }
            SantaError::TransportError(_) => {
                "Check the SMTP host, port and credentials; some messages may already have been sent"
            }
            SantaError::IoError(_) => "Check that the files exist and are readable/writable",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Input => format!("Input problem: {}", self),
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Notification => format!("Could not send notifications: {}", self),
            ErrorCategory::System => format!("System error: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, SantaError>;
