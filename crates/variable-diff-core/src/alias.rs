//! 别名解析
//!
//! 原始 token（包括 `VARIABLES.FOO` 这样的对象路径）按完全相同的字符串查找别名表。

use std::collections::HashMap;

/// 变量别名表，与扩展名无关
#[derive(Debug, Clone, Default)]
pub struct AliasResolver {
    aliases: HashMap<String, String>,
}

impl AliasResolver {
    pub fn new(aliases: HashMap<String, String>) -> Self {
        Self { aliases }
    }

    /// 返回 `(变量名, 是否 unknown)`
    ///
    /// 命中别名时替换名字并清除 unknown 标记；未命中时原样返回。
    pub fn resolve(&self, token: &str, is_unknown: bool) -> (String, bool) {
        match self.aliases.get(token) {
            Some(alias) => (alias.clone(), false),
            None => (token.to_string(), is_unknown),
        }
    }
}
