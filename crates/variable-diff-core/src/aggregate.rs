//! 结果聚合模块
//!
//! 按分组键（语言标识或 `"custom <ext>"`）保存匹配记录，组内保持首次出现的顺序。
//! 不做跨组去重或排序。

use crate::diff::DiffLineType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 扫描结果：分组键到匹配记录列表
pub type ResultSet = BTreeMap<String, Vec<VariableMatch>>;

/// 变更方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Add,
    Remove,
}

impl Mode {
    /// 上下文行没有方向
    pub fn from_line_type(line_type: DiffLineType) -> Option<Self> {
        match line_type {
            DiffLineType::Added => Some(Mode::Add),
            DiffLineType::Removed => Some(Mode::Remove),
            DiffLineType::Context => None,
        }
    }
}

/// 一条变量使用记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableMatch {
    pub name: String,
    pub file_name: String,
    pub line: u32,
    pub mode: Mode,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_unknown: bool,
}

/// 单个文件按出现顺序产生的 (分组键, 记录)
pub type FileMatches = Vec<(String, VariableMatch)>;

/// 结果聚合器
#[derive(Debug, Default)]
pub struct Aggregator {
    results: ResultSet,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, group_key: &str, record: VariableMatch) {
        match self.results.get_mut(group_key) {
            Some(records) => records.push(record),
            None => {
                self.results.insert(group_key.to_string(), vec![record]);
            }
        }
    }

    /// 合并一个文件的部分结果，调用方按 diff 中的文件顺序调用
    pub fn extend(&mut self, file_matches: FileMatches) {
        for (group_key, record) in file_matches {
            self.push(&group_key, record);
        }
    }

    /// 记录总数
    pub fn len(&self) -> usize {
        self.results.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn into_results(self) -> ResultSet {
        self.results
    }
}
