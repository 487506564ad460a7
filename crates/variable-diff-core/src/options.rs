//! 扫描选项
//!
//! 选项由调用方（命令行参数和配置文件合并后）构造一次，不可变地传入扫描。

use crate::error::{Result, VariableDiffError};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// 扫描选项
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParseOptions {
    /// 额外的客户端变量名，例如 `["dvc", "dvcClient"]`
    pub client_names: Vec<String>,
    /// 扩展名到自定义正则列表的映射
    pub match_patterns: BTreeMap<String, Vec<String>>,
    /// 原始 token 到规范变量名的映射
    pub variable_aliases: HashMap<String, String>,
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.client_names.extend(names.into_iter().map(Into::into));
        self
    }

    /// 为扩展名追加一个自定义模式
    pub fn with_match_pattern(
        mut self,
        extension: impl Into<String>,
        pattern: impl Into<String>,
    ) -> Self {
        self.match_patterns
            .entry(extension.into())
            .or_default()
            .push(pattern.into());
        self
    }

    pub fn with_variable_alias(mut self, token: impl Into<String>, name: impl Into<String>) -> Self {
        self.variable_aliases.insert(token.into(), name.into());
        self
    }

    /// 用另一份选项覆盖：列表追加，映射中同名键以 `other` 为准
    pub fn merge(mut self, other: ParseOptions) -> Self {
        for name in other.client_names {
            if !self.client_names.contains(&name) {
                self.client_names.push(name);
            }
        }
        for (extension, patterns) in other.match_patterns {
            self.match_patterns
                .entry(extension)
                .or_default()
                .extend(patterns);
        }
        self.variable_aliases.extend(other.variable_aliases);
        self
    }

    /// 验证选项，正则的有效性在编译时检查
    pub fn validate(&self) -> Result<()> {
        if let Some(index) = self
            .client_names
            .iter()
            .position(|name| name.trim().is_empty())
        {
            return Err(VariableDiffError::ConfigError(format!(
                "client name at position {index} is empty"
            )));
        }

        if self
            .match_patterns
            .keys()
            .any(|extension| extension.trim().trim_start_matches('.').is_empty())
        {
            return Err(VariableDiffError::ConfigError(
                "match pattern extension cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_builder() {
        let options = ParseOptions::new()
            .with_client_names(["dvc", "flags"])
            .with_match_pattern("js", "a")
            .with_match_pattern("js", "b")
            .with_variable_alias("VARIABLES.FOO", "foo");

        assert_eq!(options.client_names, vec!["dvc", "flags"]);
        assert_eq!(options.match_patterns["js"], vec!["a", "b"]);
        assert_eq!(options.variable_aliases["VARIABLES.FOO"], "foo");
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_merge_appends_and_overrides() {
        let base = ParseOptions::new()
            .with_client_names(["dvc"])
            .with_match_pattern("py", "x")
            .with_variable_alias("A", "a");
        let overlay = ParseOptions::new()
            .with_client_names(["dvc", "other"])
            .with_match_pattern("py", "y")
            .with_variable_alias("A", "a2");

        let merged = base.merge(overlay);
        assert_eq!(merged.client_names, vec!["dvc", "other"]);
        assert_eq!(merged.match_patterns["py"], vec!["x", "y"]);
        assert_eq!(merged.variable_aliases["A"], "a2");
    }

    #[test]
    fn test_validate_rejects_empty_values() {
        let options = ParseOptions::new().with_client_names(["ok", " "]);
        assert!(matches!(
            options.validate(),
            Err(VariableDiffError::ConfigError(_))
        ));

        let options = ParseOptions::new().with_match_pattern(".", "x");
        assert!(options.validate().is_err());
    }

    #[test]
    fn test_deserialize_camel_case() {
        let options: ParseOptions = serde_json::from_str(
            r#"{
                "clientNames": ["dvc"],
                "matchPatterns": { "js": ["checkVariable\\(\\w*,\\s*([^,)]*)"] },
                "variableAliases": { "VARIABLES.FOO": "foo-flag" }
            }"#,
        )
        .expect("Options should deserialize");

        assert_eq!(options.client_names, vec!["dvc"]);
        assert_eq!(
            options.match_patterns["js"],
            vec![r"checkVariable\(\w*,\s*([^,)]*)"]
        );
        assert_eq!(options.variable_aliases["VARIABLES.FOO"], "foo-flag");

        let empty: ParseOptions = serde_json::from_str("{}").expect("Empty options");
        assert_eq!(empty, ParseOptions::default());
    }
}
