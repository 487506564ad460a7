use thiserror::Error;

/// variable-diff 的错误类型定义
///
/// 扫描本身只会因配置问题失败；内容上的不规则（空 diff、无匹配的文件）
/// 都会得到空结果而不是错误。
#[derive(Error, Debug)]
pub enum VariableDiffError {
    #[error("Invalid match pattern for extension `{extension}`: `{pattern}`: {source}")]
    InvalidMatchPattern {
        extension: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Failed to build pattern for parser `{identity}`: {source}")]
    PatternBuild {
        identity: &'static str,
        #[source]
        source: regex::Error,
    },

    #[error("Diff parsing error at line {line}: {message}")]
    DiffParse { line: usize, message: String },

    #[error("File I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// 项目通用的 Result 类型别名
pub type Result<T> = std::result::Result<T, VariableDiffError>;
