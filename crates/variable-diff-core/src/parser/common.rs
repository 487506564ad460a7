//! 通用解析器描述和工厂
//!
//! 每种语言只是一组正则片段和注释标记，由同一个匹配驱动（[`CompiledParser`]）使用。
//!
//! [`CompiledParser`]: super::matcher::CompiledParser

use super::languages::ALL_PARSERS;

/// 内置的客户端变量名，配置中的 `clientNames` 会追加到这里
pub const DEFAULT_CLIENT_NAMES: &[&str] = &[
    "dvcClient",
    "devcycleClient",
    "devCycleClient",
    "dvc_client",
    "devcycle_client",
    "client",
    "dvc",
];

/// 带引号的变量 key，引号不包含在捕获中
pub(crate) const NAME_CAPTURE: &str = r#"["'](?P<name>[^"'\r\n]+)["']"#;

/// 关键字参数之前可能出现的其他参数
pub(crate) const KEYWORD_LEAD: &str = r"(?:[^()]*?,\s*)?";

/// 没有默认值片段时，key 之后必须是参数分隔符或右括号
pub(crate) const ARGUMENT_END: &str = r"\s*[,)]";

/// key 在首位的调用中，后备 token 之后最多还有一个参数（默认值），然后调用闭合
pub(crate) const FINAL_ARGUMENT_END: &str =
    r#"\s*(?:,\s*(?:"[^"]*"|'[^']*'|\{[^{}]*\}|\[[^\[\]]*\]|[^,(){}\[\]]+))?\s*,?\s*\)"#;

/// 单一语言的调用点描述
///
/// 调用模式按以下顺序拼接：
/// `receiver_prefix + 客户端名 + member_access + method_pattern + "(" + 参数前缀 + key + 结束片段`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LanguageParser {
    /// 结果分组使用的标识
    pub identity: &'static str,
    /// 使用该解析器的文件扩展名
    pub extensions: &'static [&'static str],
    /// 接收者之前的片段，例如单词边界或 PHP 的 `$`
    pub receiver_prefix: &'static str,
    /// 接收者和方法之间的访问符，可包含可选链
    pub member_access: &'static str,
    pub method_pattern: &'static str,
    /// key 之前的位置参数；`Some("")` 表示 key 是第一个参数
    pub positional_pattern: Option<&'static str>,
    /// 具名参数形式，例如 `key: "name"`
    pub keyword_pattern: Option<&'static str>,
    /// key 之后必须出现的默认值开头，只用于界定语句结束
    pub default_value_pattern: Option<&'static str>,
    pub comment_tokens: &'static [&'static str],
    /// 调用前是否需要客户端接收者（hook 风格的调用不需要）
    pub matches_client_name: bool,
    /// 主模式失败时使用的后备 token 模式，命中的结果标记为 unknown
    pub fallback_pattern: Option<&'static str>,
}

impl LanguageParser {
    /// 构造调用起始模式，以左括号结束
    pub fn call_pattern(&self, client_alternation: &str) -> String {
        if self.matches_client_name {
            format!(
                r"{}(?:{})\s*{}\s*(?:{})\s*\(",
                self.receiver_prefix, client_alternation, self.member_access, self.method_pattern
            )
        } else {
            format!(r"{}(?:{})\s*\(", self.receiver_prefix, self.method_pattern)
        }
    }

    /// key 之前的参数片段：位置参数或具名参数
    pub fn argument_pattern(&self) -> String {
        match (self.positional_pattern, self.keyword_pattern) {
            (Some(positional), Some(keyword)) => {
                format!("(?:{positional}|{KEYWORD_LEAD}{keyword})")
            }
            (Some(positional), None) => positional.to_string(),
            (None, Some(keyword)) => format!("{KEYWORD_LEAD}{keyword}"),
            (None, None) => String::new(),
        }
    }

    /// 后备 token 之后的结束片段
    ///
    /// key 在首位且没有默认值片段时，`client.variable(req.user, "key", false)`
    /// 这样的服务端调用的第一个参数不能被当作后备 token。
    pub fn fallback_terminator_pattern(&self) -> String {
        if self.positional_pattern == Some("") && self.default_value_pattern.is_none() {
            FINAL_ARGUMENT_END.to_string()
        } else {
            self.terminator_pattern()
        }
    }

    /// key 之后的结束片段
    pub fn terminator_pattern(&self) -> String {
        match self.default_value_pattern {
            Some(default_value) => format!(r"\s*,\s*(?:{default_value})"),
            None => ARGUMENT_END.to_string(),
        }
    }
}

/// 解析器工厂
pub struct ParserFactory;

impl ParserFactory {
    /// 所有内置解析器，顺序即同一扩展名下的求值顺序
    pub fn all() -> &'static [LanguageParser] {
        ALL_PARSERS
    }

    /// 根据标识查找解析器
    pub fn find(identity: &str) -> Option<&'static LanguageParser> {
        ALL_PARSERS
            .iter()
            .find(|parser| parser.identity == identity)
    }

    /// 根据扩展名（小写，不含点）返回适用的解析器
    pub fn parsers_for_extension(extension: &str) -> Vec<&'static LanguageParser> {
        ALL_PARSERS
            .iter()
            .filter(|parser| parser.extensions.contains(&extension))
            .collect()
    }

    /// 是否有内置解析器支持该扩展名
    pub fn is_supported_extension(extension: &str) -> bool {
        ALL_PARSERS
            .iter()
            .any(|parser| parser.extensions.contains(&extension))
    }
}

/// 构造客户端名的正则分支：内置名在前，配置的名字转义后追加并去重
pub fn client_alternation(client_names: &[String]) -> String {
    let mut names: Vec<String> = DEFAULT_CLIENT_NAMES
        .iter()
        .map(|name| regex::escape(name))
        .collect();
    for name in client_names {
        let escaped = regex::escape(name);
        if !names.contains(&escaped) {
            names.push(escaped);
        }
    }
    names.join("|")
}
