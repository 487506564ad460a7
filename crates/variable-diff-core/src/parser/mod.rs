//! 多语言解析器模块
//!
//! 提供语言描述、内置语言表和通用的匹配驱动

pub mod common;
pub mod languages;
pub mod matcher;

// 重新导出核心类型
pub use common::{DEFAULT_CLIENT_NAMES, LanguageParser, ParserFactory, client_alternation};
pub use matcher::{CompiledParser, RawMatch};
