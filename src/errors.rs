use std::fmt;

#[derive(Debug, Clone)]
pub enum RoutemapError {
    DatabaseConfig(String),
    DatabaseConnection(String),
    DatabaseOperation(String),
    FileOperation(String),
    Validation(String),
    NotFound(String),
    Serialization(String),
    MalformedRecord(String),
    Render(String),
}

impl RoutemapError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            RoutemapError::DatabaseConfig(_) => "E001",
            RoutemapError::DatabaseConnection(_) => "E002",
            RoutemapError::DatabaseOperation(_) => "E003",
            RoutemapError::FileOperation(_) => "E004",
            RoutemapError::Validation(_) => "E005",
            RoutemapError::NotFound(_) => "E006",
            RoutemapError::Serialization(_) => "E007",
            RoutemapError::MalformedRecord(_) => "E008",
            RoutemapError::Render(_) => "E009",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            RoutemapError::DatabaseConfig(_) => "Database Configuration Error",
            RoutemapError::DatabaseConnection(_) => "Database Connection Error",
            RoutemapError::DatabaseOperation(_) => "Database Operation Error",
            RoutemapError::FileOperation(_) => "File Operation Error",
            RoutemapError::Validation(_) => "Validation Error",
            RoutemapError::NotFound(_) => "Resource Not Found",
            RoutemapError::Serialization(_) => "Serialization Error",
            RoutemapError::MalformedRecord(_) => "Malformed Record",
            RoutemapError::Render(_) => "Sitemap Render Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            RoutemapError::DatabaseConfig(msg)
            | RoutemapError::DatabaseConnection(msg)
            | RoutemapError::DatabaseOperation(msg)
            | RoutemapError::FileOperation(msg)
            | RoutemapError::Validation(msg)
            | RoutemapError::NotFound(msg)
            | RoutemapError::Serialization(msg)
            | RoutemapError::MalformedRecord(msg)
            | RoutemapError::Render(msg) => msg,
        }
    }

    /// 格式化为彩色输出（终端错误输出）
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出（用于 CLI 模式）
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for RoutemapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for RoutemapError {}

// 便捷的构造函数
impl RoutemapError {
    pub fn database_config<T: Into<String>>(msg: T) -> Self {
        RoutemapError::DatabaseConfig(msg.into())
    }

    pub fn database_connection<T: Into<String>>(msg: T) -> Self {
        RoutemapError::DatabaseConnection(msg.into())
    }

    pub fn database_operation<T: Into<String>>(msg: T) -> Self {
        RoutemapError::DatabaseOperation(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        RoutemapError::FileOperation(msg.into())
    }

    pub fn validation<T: Into<String>>(msg: T) -> Self {
        RoutemapError::Validation(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        RoutemapError::NotFound(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        RoutemapError::Serialization(msg.into())
    }

    pub fn malformed_record<T: Into<String>>(msg: T) -> Self {
        RoutemapError::MalformedRecord(msg.into())
    }

    pub fn render<T: Into<String>>(msg: T) -> Self {
        RoutemapError::Render(msg.into())
    }
}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for RoutemapError {
    fn from(err: sea_orm::DbErr) -> Self {
        RoutemapError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for RoutemapError {
    fn from(err: std::io::Error) -> Self {
        RoutemapError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for RoutemapError {
    fn from(err: serde_json::Error) -> Self {
        RoutemapError::Serialization(err.to_string())
    }
}

impl From<std::string::FromUtf8Error> for RoutemapError {
    fn from(err: std::string::FromUtf8Error) -> Self {
        RoutemapError::Render(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, RoutemapError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_unique() {
        let errors = [
            RoutemapError::database_config("x"),
            RoutemapError::database_connection("x"),
            RoutemapError::database_operation("x"),
            RoutemapError::file_operation("x"),
            RoutemapError::validation("x"),
            RoutemapError::not_found("x"),
            RoutemapError::serialization("x"),
            RoutemapError::malformed_record("x"),
            RoutemapError::render("x"),
        ];
        let codes: std::collections::HashSet<_> = errors.iter().map(|e| e.code()).collect();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn test_format_simple() {
        let err = RoutemapError::malformed_record("airport without IATA code");
        assert_eq!(
            err.format_simple(),
            "Malformed Record: airport without IATA code"
        );
        assert_eq!(err.to_string(), err.format_simple());
    }

    #[test]
    fn test_format_colored_carries_code_and_message() {
        let err = RoutemapError::not_found("routes 'MAA-BLR' not found");
        let text = err.format_colored();
        assert!(text.contains("E006"));
        assert!(text.contains("Resource Not Found"));
        assert!(text.contains("routes 'MAA-BLR' not found"));
    }

    #[test]
    fn test_from_db_err() {
        let err: RoutemapError = sea_orm::DbErr::Custom("boom".to_string()).into();
        assert_eq!(err.code(), "E003");
        assert!(err.message().contains("boom"));
    }
}
