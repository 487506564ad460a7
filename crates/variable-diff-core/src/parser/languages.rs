//! 内置语言描述
//!
//! 各 SDK 的调用形式：
//! - 服务端 SDK（nodejs、python、ruby、golang、java、csharp、php）：`client.variable(user, "key", default)`
//! - 客户端 SDK（javascript、android、ios、dart）：`client.variable("key", default)` 或具名参数
//! - React hooks：`useVariableValue("key", default)`，没有接收者

use super::common::LanguageParser;

const C_STYLE_COMMENTS: &[&str] = &["//", "/*"];
const HASH_COMMENTS: &[&str] = &["#"];
const PHP_COMMENTS: &[&str] = &["//", "#", "/*"];

const JS_EXTENSIONS: &[&str] = &["js", "jsx", "mjs", "cjs", "ts", "tsx", "mts", "cts"];

const WORD_BOUNDARY: &str = r"\b";
const DOT: &str = r"\.";
const OPTIONAL_CHAIN: &str = r"(?:\?\.|\.)";

/// user 等位于 key 之前的单个参数（允许一个不嵌套的对象字面量）
const LEADING_ARGUMENT: &str = r"(?:\{[^{}]*\}|[^,(){}]+),\s*";

/// 默认值的第一个字符
const DEFAULT_VALUE: &str = r"[^\s,)]";

/// `VARIABLES.FOO` 形式的属性访问
const PROPERTY_ACCESS: &str = r"[A-Za-z_$][\w$]*(?:\.[A-Za-z_$][\w$]*)+";

/// `Variables::FOO` 形式的类常量
const CLASS_CONSTANT: &str = r"\\?[A-Za-z_][\w\\]*::[A-Za-z_]\w*";

pub(crate) const ALL_PARSERS: &[LanguageParser] = &[
    NODEJS, REACT, JAVASCRIPT, PYTHON, RUBY, GOLANG, JAVA, ANDROID, CSHARP, IOS, PHP, DART,
];

pub const NODEJS: LanguageParser = LanguageParser {
    identity: "nodejs",
    extensions: JS_EXTENSIONS,
    receiver_prefix: WORD_BOUNDARY,
    member_access: OPTIONAL_CHAIN,
    method_pattern: "variable(?:Value)?",
    positional_pattern: Some(LEADING_ARGUMENT),
    keyword_pattern: None,
    default_value_pattern: Some(DEFAULT_VALUE),
    comment_tokens: C_STYLE_COMMENTS,
    matches_client_name: true,
    fallback_pattern: Some(PROPERTY_ACCESS),
};

pub const REACT: LanguageParser = LanguageParser {
    identity: "react",
    extensions: JS_EXTENSIONS,
    receiver_prefix: WORD_BOUNDARY,
    member_access: "",
    method_pattern: "useVariable(?:Value)?",
    positional_pattern: Some(""),
    keyword_pattern: None,
    default_value_pattern: Some(DEFAULT_VALUE),
    comment_tokens: C_STYLE_COMMENTS,
    matches_client_name: false,
    fallback_pattern: Some(PROPERTY_ACCESS),
};

pub const JAVASCRIPT: LanguageParser = LanguageParser {
    identity: "javascript",
    extensions: JS_EXTENSIONS,
    receiver_prefix: WORD_BOUNDARY,
    member_access: OPTIONAL_CHAIN,
    method_pattern: "variable(?:Value)?",
    positional_pattern: Some(""),
    keyword_pattern: None,
    default_value_pattern: None,
    comment_tokens: C_STYLE_COMMENTS,
    matches_client_name: true,
    fallback_pattern: Some(PROPERTY_ACCESS),
};

pub const PYTHON: LanguageParser = LanguageParser {
    identity: "python",
    extensions: &["py"],
    receiver_prefix: WORD_BOUNDARY,
    member_access: DOT,
    method_pattern: "variable(?:_value)?",
    positional_pattern: Some(LEADING_ARGUMENT),
    keyword_pattern: Some(r"key\s*=\s*"),
    default_value_pattern: None,
    comment_tokens: HASH_COMMENTS,
    matches_client_name: true,
    fallback_pattern: Some(PROPERTY_ACCESS),
};

pub const RUBY: LanguageParser = LanguageParser {
    identity: "ruby",
    extensions: &["rb"],
    receiver_prefix: WORD_BOUNDARY,
    member_access: DOT,
    method_pattern: "variable(?:_value)?",
    positional_pattern: Some(LEADING_ARGUMENT),
    keyword_pattern: Some(r"key:\s*"),
    default_value_pattern: None,
    comment_tokens: HASH_COMMENTS,
    matches_client_name: true,
    fallback_pattern: None,
};

pub const GOLANG: LanguageParser = LanguageParser {
    identity: "golang",
    extensions: &["go"],
    receiver_prefix: WORD_BOUNDARY,
    member_access: DOT,
    method_pattern: "Variable(?:Value)?",
    // 可选的 ctx 参数在 user 之前
    positional_pattern: Some(r"(?:[^,(){}]+,\s*){1,2}"),
    keyword_pattern: None,
    default_value_pattern: Some(DEFAULT_VALUE),
    comment_tokens: C_STYLE_COMMENTS,
    matches_client_name: true,
    fallback_pattern: Some(PROPERTY_ACCESS),
};

pub const JAVA: LanguageParser = LanguageParser {
    identity: "java",
    extensions: &["java"],
    receiver_prefix: WORD_BOUNDARY,
    member_access: DOT,
    method_pattern: "variable(?:Value)?",
    positional_pattern: Some(LEADING_ARGUMENT),
    keyword_pattern: None,
    default_value_pattern: Some(DEFAULT_VALUE),
    comment_tokens: C_STYLE_COMMENTS,
    matches_client_name: true,
    fallback_pattern: Some(PROPERTY_ACCESS),
};

pub const ANDROID: LanguageParser = LanguageParser {
    identity: "android",
    extensions: &["java", "kt", "kts"],
    receiver_prefix: WORD_BOUNDARY,
    member_access: OPTIONAL_CHAIN,
    method_pattern: "variable(?:Value)?",
    positional_pattern: Some(""),
    keyword_pattern: Some(r"key\s*=\s*"),
    default_value_pattern: None,
    comment_tokens: C_STYLE_COMMENTS,
    matches_client_name: true,
    fallback_pattern: Some(PROPERTY_ACCESS),
};

pub const CSHARP: LanguageParser = LanguageParser {
    identity: "csharp",
    extensions: &["cs"],
    receiver_prefix: WORD_BOUNDARY,
    member_access: OPTIONAL_CHAIN,
    method_pattern: "Variable(?:Value)?(?:Async)?",
    positional_pattern: Some(LEADING_ARGUMENT),
    keyword_pattern: None,
    default_value_pattern: Some(DEFAULT_VALUE),
    comment_tokens: C_STYLE_COMMENTS,
    matches_client_name: true,
    fallback_pattern: Some(PROPERTY_ACCESS),
};

pub const IOS: LanguageParser = LanguageParser {
    identity: "ios",
    extensions: &["swift"],
    receiver_prefix: WORD_BOUNDARY,
    member_access: OPTIONAL_CHAIN,
    method_pattern: "variable(?:Value)?",
    positional_pattern: None,
    keyword_pattern: Some(r"key:\s*"),
    default_value_pattern: None,
    comment_tokens: C_STYLE_COMMENTS,
    matches_client_name: true,
    fallback_pattern: Some(PROPERTY_ACCESS),
};

pub const PHP: LanguageParser = LanguageParser {
    identity: "php",
    extensions: &["php"],
    // `$client->variable(...)` 或 `$this->client->variable(...)`
    receiver_prefix: r"(?:\$|->)",
    member_access: "->",
    method_pattern: "variable(?:Value)?",
    positional_pattern: Some(LEADING_ARGUMENT),
    keyword_pattern: None,
    default_value_pattern: None,
    comment_tokens: PHP_COMMENTS,
    matches_client_name: true,
    fallback_pattern: Some(CLASS_CONSTANT),
};

pub const DART: LanguageParser = LanguageParser {
    identity: "dart",
    extensions: &["dart"],
    receiver_prefix: WORD_BOUNDARY,
    member_access: OPTIONAL_CHAIN,
    method_pattern: "variable(?:Value)?",
    positional_pattern: Some(""),
    keyword_pattern: Some(r"key:\s*"),
    default_value_pattern: None,
    comment_tokens: C_STYLE_COMMENTS,
    matches_client_name: true,
    fallback_pattern: Some(PROPERTY_ACCESS),
};
