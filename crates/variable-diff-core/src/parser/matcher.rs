//! 通用匹配驱动
//!
//! 把 [`LanguageParser`] 的片段编译成正则，并应用到一条逻辑行上。

use super::common::{LanguageParser, NAME_CAPTURE, client_alternation};
use crate::error::{Result, VariableDiffError};
use regex::Regex;

/// 从一条逻辑行中提取出的原始 token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawMatch {
    /// 未经别名解析的 key 或属性访问路径
    pub token: String,
    /// 是否来自后备模式
    pub is_unknown: bool,
}

/// 编译后的语言解析器
#[derive(Debug, Clone)]
pub struct CompiledParser {
    parser: &'static LanguageParser,
    opener: Regex,
    primary: Regex,
    fallback: Option<Regex>,
}

impl CompiledParser {
    /// 编译解析器，`client_names` 追加到内置接收者名之后
    pub fn new(parser: &'static LanguageParser, client_names: &[String]) -> Result<Self> {
        let call = parser.call_pattern(&client_alternation(client_names));
        let arguments = parser.argument_pattern();
        let terminator = parser.terminator_pattern();

        let build = |pattern: &str| {
            Regex::new(pattern).map_err(|source| VariableDiffError::PatternBuild {
                identity: parser.identity,
                source,
            })
        };

        let opener = build(&call)?;
        let primary = build(&format!(r"{call}\s*{arguments}{NAME_CAPTURE}{terminator}"))?;
        let fallback_terminator = parser.fallback_terminator_pattern();
        let fallback = parser
            .fallback_pattern
            .map(|token| {
                build(&format!(
                    r"{call}\s*{arguments}(?P<unknown>{token}){fallback_terminator}"
                ))
            })
            .transpose()?;

        Ok(Self {
            parser,
            opener,
            primary,
            fallback,
        })
    }

    /// 分组标识
    pub fn identity(&self) -> &'static str {
        self.parser.identity
    }

    pub fn descriptor(&self) -> &'static LanguageParser {
        self.parser
    }

    /// 对一条逻辑行求值
    ///
    /// 主模式的所有命中按从左到右的顺序返回；只有主模式完全没有命中时才尝试后备模式。
    pub fn find_matches(&self, line: &str) -> Vec<RawMatch> {
        let primary: Vec<RawMatch> = self
            .primary
            .captures_iter(line)
            .filter_map(|caps| caps.name("name"))
            .map(|name| RawMatch {
                token: name.as_str().to_string(),
                is_unknown: false,
            })
            .collect();

        if !primary.is_empty() {
            return primary;
        }

        let Some(fallback) = &self.fallback else {
            return primary;
        };

        fallback
            .captures_iter(line)
            .filter_map(|caps| caps.name("unknown"))
            .map(|token| RawMatch {
                token: token.as_str().to_string(),
                is_unknown: true,
            })
            .collect()
    }

    /// 行中每个调用点的 (起点, 左括号) 字节偏移
    pub fn call_sites<'a>(&'a self, line: &'a str) -> impl Iterator<Item = (usize, usize)> + 'a {
        self.opener
            .find_iter(line)
            .map(|found| (found.start(), found.end() - 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::languages::{JAVASCRIPT, NODEJS, PHP, PYTHON, REACT};
    use pretty_assertions::assert_eq;

    fn tokens(parser: &CompiledParser, line: &str) -> Vec<(String, bool)> {
        parser
            .find_matches(line)
            .into_iter()
            .map(|m| (m.token, m.is_unknown))
            .collect()
    }

    fn compile(parser: &'static LanguageParser) -> CompiledParser {
        CompiledParser::new(parser, &[]).expect("Built-in parser should compile")
    }

    #[test]
    fn test_single_and_double_quotes() {
        let parser = compile(&NODEJS);
        assert_eq!(
            tokens(&parser, r#"dvcClient.variable(user, "double", false)"#),
            vec![("double".to_string(), false)]
        );
        assert_eq!(
            tokens(&parser, "dvcClient.variableValue(user, 'single', 0)"),
            vec![("single".to_string(), false)]
        );
    }

    #[test]
    fn test_identifier_key_does_not_match() {
        let parser = compile(&NODEJS);
        assert!(tokens(&parser, "dvcClient.variable(user, someKey, false)").is_empty());
    }

    #[test]
    fn test_two_calls_on_one_line() {
        let parser = compile(&NODEJS);
        let line = r#"const a = dvcClient.variable(user, "first", false) && dvcClient.variable(user, "second", true)"#;
        assert_eq!(
            tokens(&parser, line),
            vec![("first".to_string(), false), ("second".to_string(), false)]
        );
    }

    #[test]
    fn test_optional_chaining_and_member_receiver() {
        let parser = compile(&NODEJS);
        assert_eq!(
            tokens(&parser, r#"this.dvcClient?.variable(user, "chained", false)"#),
            vec![("chained".to_string(), false)]
        );
        // 接收者必须是完整的标识符
        assert!(tokens(&parser, r#"httpclient.variable(user, "x", false)"#).is_empty());
    }

    #[test]
    fn test_custom_client_name() {
        let parser = compile(&NODEJS);
        let line = r#"flags.variable(user, "custom-client", false)"#;
        assert!(tokens(&parser, line).is_empty());

        let parser = CompiledParser::new(&NODEJS, &["flags".to_string()]).expect("compile");
        assert_eq!(
            tokens(&parser, line),
            vec![("custom-client".to_string(), false)]
        );
    }

    #[test]
    fn test_fallback_marks_unknown() {
        let parser = compile(&JAVASCRIPT);
        assert_eq!(
            tokens(&parser, "dvcClient.variable(VARIABLES.FOO, false)"),
            vec![("VARIABLES.FOO".to_string(), true)]
        );
    }

    /// 主模式命中时不再求值后备模式
    #[test]
    fn test_primary_before_fallback() {
        let parser = compile(&JAVASCRIPT);
        let line = r#"dvcClient.variable("known", false); dvcClient.variable(VARIABLES.FOO, false)"#;
        assert_eq!(tokens(&parser, line), vec![("known".to_string(), false)]);
    }

    #[test]
    fn test_hook_without_receiver() {
        let parser = compile(&REACT);
        assert_eq!(
            tokens(&parser, "const value = useVariableValue('hook-key', false)"),
            vec![("hook-key".to_string(), false)]
        );
        assert!(tokens(&parser, "myuseVariable('nope', false)").is_empty());
    }

    #[test]
    fn test_keyword_argument() {
        let parser = compile(&PYTHON);
        assert_eq!(
            tokens(
                &parser,
                r#"client.variable(user=user, key="py-key", default_value=False)"#
            ),
            vec![("py-key".to_string(), false)]
        );
        assert_eq!(
            tokens(&parser, r#"client.variable_value(user, "positional", False)"#),
            vec![("positional".to_string(), false)]
        );
    }

    #[test]
    fn test_php_receiver_and_class_constant() {
        let parser = compile(&PHP);
        assert_eq!(
            tokens(&parser, r#"$this->devcycleClient->variable($user, "php-key", false);"#),
            vec![("php-key".to_string(), false)]
        );
        assert_eq!(
            tokens(&parser, "$client->variableValue($user, Variables::FOO, false);"),
            vec![("Variables::FOO".to_string(), true)]
        );
    }

    #[test]
    fn test_call_sites() {
        let parser = compile(&NODEJS);
        let line = "a(dvcClient.variable(user, 'x', b(c)))";
        let sites: Vec<(usize, usize)> = parser.call_sites(line).collect();
        assert_eq!(sites, vec![(2, 2 + "dvcClient.variable".len())]);
    }
}
