//! 自定义匹配模式
//!
//! 用户按文件扩展名提供的正则，独立于内置解析器求值，结果写入 `"custom <ext>"` 分组。

use crate::error::{Result, VariableDiffError};
use regex::Regex;
use std::collections::{BTreeMap, HashMap};

/// 某个扩展名下编译好的自定义模式
#[derive(Debug, Clone)]
pub struct CustomPatterns {
    group_key: String,
    /// 按配置顺序排列，每个模式独立求值
    regexes: Vec<Regex>,
}

/// 全部扩展名的自定义模式
#[derive(Debug, Clone, Default)]
pub struct CustomPatternSet {
    by_extension: HashMap<String, CustomPatterns>,
}

impl CustomPatternSet {
    /// 编译配置中的模式，任何一个无效都会立即失败
    pub fn compile(match_patterns: &BTreeMap<String, Vec<String>>) -> Result<Self> {
        // ".js" 和 "js" 视为同一个扩展名
        let mut merged: BTreeMap<String, Vec<&String>> = BTreeMap::new();
        for (extension, patterns) in match_patterns {
            merged
                .entry(normalize_extension(extension))
                .or_default()
                .extend(patterns.iter());
        }

        let mut by_extension = HashMap::new();
        for (extension, patterns) in merged {
            if patterns.is_empty() {
                continue;
            }

            let regexes = patterns
                .iter()
                .map(|pattern| {
                    Regex::new(pattern).map_err(|source| VariableDiffError::InvalidMatchPattern {
                        extension: extension.clone(),
                        pattern: pattern.to_string(),
                        source,
                    })
                })
                .collect::<Result<Vec<_>>>()?;

            by_extension.insert(
                extension.clone(),
                CustomPatterns {
                    group_key: format!("custom {extension}"),
                    regexes,
                },
            );
        }

        Ok(Self { by_extension })
    }

    pub fn for_extension(&self, extension: &str) -> Option<&CustomPatterns> {
        self.by_extension.get(extension)
    }

    pub fn is_empty(&self) -> bool {
        self.by_extension.is_empty()
    }
}

impl CustomPatterns {
    /// 结果分组键，例如 `"custom js"`
    pub fn group_key(&self) -> &str {
        &self.group_key
    }

    /// 从左到右提取变量名
    ///
    /// 每个模式独立扫描整行，取第一个参与匹配的捕获组；模式没有捕获组时取整个匹配。
    /// 结果按匹配起点排序，起点相同时按配置顺序。
    pub fn find_matches(&self, line: &str) -> Vec<String> {
        let mut found: Vec<(usize, usize, &str)> = Vec::new();
        for (index, regex) in self.regexes.iter().enumerate() {
            for caps in regex.captures_iter(line) {
                let Some(whole) = caps.get(0) else {
                    continue;
                };
                let token = caps.iter().skip(1).flatten().next().unwrap_or(whole);
                let name = clean_name(token.as_str());
                if !name.is_empty() {
                    found.push((whole.start(), index, name));
                }
            }
        }

        found.sort_by_key(|&(start, index, _)| (start, index));
        found
            .into_iter()
            .map(|(_, _, name)| name.to_string())
            .collect()
    }
}

/// 去掉前导点并转为小写
pub fn normalize_extension(extension: &str) -> String {
    extension.trim().trim_start_matches('.').to_ascii_lowercase()
}

/// 去掉空白和一对包围的引号
fn clean_name(raw: &str) -> &str {
    let trimmed = raw.trim();
    for quote in ['"', '\'', '`'] {
        if let Some(inner) = trimmed
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner.trim();
        }
    }
    trimmed
}
