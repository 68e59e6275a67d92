use std::fmt;

#[derive(Debug, Clone)]
pub enum ShortenerError {
    Conflict(String),
    NotFound(String),
    Validation(String),
    DatabaseConfig(String),
    DatabaseConnection(String),
    DatabaseOperation(String),
    FileOperation(String),
    Serialization(String),
}

impl ShortenerError {
    pub fn code(&self) -> &'static str {
        match self {
            ShortenerError::Conflict(_) => "E001",
            ShortenerError::NotFound(_) => "E002",
            ShortenerError::Validation(_) => "E003",
            ShortenerError::DatabaseConfig(_) => "E004",
            ShortenerError::DatabaseConnection(_) => "E005",
            ShortenerError::DatabaseOperation(_) => "E006",
            ShortenerError::FileOperation(_) => "E007",
            ShortenerError::Serialization(_) => "E008",
        }
    }

    pub fn error_type(&self) -> &'static str {
        match self {
            ShortenerError::Conflict(_) => "Conflict",
            ShortenerError::NotFound(_) => "Resource Not Found",
            ShortenerError::Validation(_) => "Validation Error",
            ShortenerError::DatabaseConfig(_) => "Database Configuration Error",
            ShortenerError::DatabaseConnection(_) => "Database Connection Error",
            ShortenerError::DatabaseOperation(_) => "Database Operation Error",
            ShortenerError::FileOperation(_) => "File Operation Error",
            ShortenerError::Serialization(_) => "Serialization Error",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ShortenerError::Conflict(msg) => msg,
            ShortenerError::NotFound(msg) => msg,
            ShortenerError::Validation(msg) => msg,
            ShortenerError::DatabaseConfig(msg) => msg,
            ShortenerError::DatabaseConnection(msg) => msg,
            ShortenerError::DatabaseOperation(msg) => msg,
            ShortenerError::FileOperation(msg) => msg,
            ShortenerError::Serialization(msg) => msg,
        }
    }

    /// Conflict is an expected outcome of `put`, not a failure; handlers
    /// translate it to 409 instead of logging it as an error.
    pub fn is_conflict(&self) -> bool {
        matches!(self, ShortenerError::Conflict(_))
    }
}

impl fmt::Display for ShortenerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.error_type(), self.message())
    }
}

impl std::error::Error for ShortenerError {}

impl ShortenerError {
    pub fn conflict<T: Into<String>>(msg: T) -> Self {
        ShortenerError::Conflict(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        ShortenerError::NotFound(msg.into())
    }

    pub fn validation<T: Into<String>>(msg: T) -> Self {
        ShortenerError::Validation(msg.into())
    }

    pub fn database_config<T: Into<String>>(msg: T) -> Self {
        ShortenerError::DatabaseConfig(msg.into())
    }

    pub fn database_connection<T: Into<String>>(msg: T) -> Self {
        ShortenerError::DatabaseConnection(msg.into())
    }

    pub fn database_operation<T: Into<String>>(msg: T) -> Self {
        ShortenerError::DatabaseOperation(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        ShortenerError::FileOperation(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        ShortenerError::Serialization(msg.into())
    }
}

impl From<sea_orm::DbErr> for ShortenerError {
    fn from(err: sea_orm::DbErr) -> Self {
        ShortenerError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for ShortenerError {
    fn from(err: std::io::Error) -> Self {
        ShortenerError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for ShortenerError {
    fn from(err: serde_json::Error) -> Self {
        ShortenerError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ShortenerError>;
