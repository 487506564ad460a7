//! variable-diff-core - 特性开关变量使用差异分析核心库
//!
//! 扫描统一 diff，找出多种语言中新增和删除的特性开关变量调用点，
//! 输出按语言分组的结构化匹配记录。格式化和结果补充由调用方负责。

pub mod aggregate;
pub mod alias;
pub mod comment;
pub mod custom;
pub mod diff;
pub mod error;
pub mod options;
pub mod parser;
pub mod reconstruct;
pub mod scanner;

// 重新导出主要的公共 API
pub use aggregate::{Aggregator, Mode, ResultSet, VariableMatch};
pub use alias::AliasResolver;
pub use comment::strip_comments;
pub use custom::{CustomPatternSet, CustomPatterns};
pub use diff::{DiffFile, DiffHunk, DiffLine, DiffLineType, parse_diff};
pub use error::{Result, VariableDiffError};
pub use options::ParseOptions;
pub use parser::{CompiledParser, LanguageParser, ParserFactory, RawMatch};
pub use reconstruct::{LineReconstructor, LogicalLine};
pub use scanner::{ScanReport, ScanStats, Scanner, scan};
