//! Diff 模型模块
//!
//! 提供统一 diff（unified diff）的内存表示，以及把 `git diff` 文本解析为该表示的功能。
//! 扫描引擎只依赖这里的数据结构，不直接接触文件系统或 Git。

use crate::error::{Result, VariableDiffError};
use std::path::Path;

/// 单个文件的差异
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffFile {
    /// 源路径，新增文件为 `None`
    pub old_path: Option<String>,
    /// 目标路径，删除文件为 `None`
    pub new_path: Option<String>,
    pub hunks: Vec<DiffHunk>,
    pub is_binary: bool,
}

/// 差异块信息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffHunk {
    pub old_start: u32,
    pub old_lines: u32,
    pub new_start: u32,
    pub new_lines: u32,
    pub lines: Vec<DiffLine>,
}

/// 差异行信息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffLine {
    pub content: String,
    pub line_type: DiffLineType,
    pub old_line_number: Option<u32>,
    pub new_line_number: Option<u32>,
}

/// 差异行类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiffLineType {
    Context,
    Added,
    Removed,
}

impl DiffFile {
    /// 创建只有目标路径的文件差异
    pub fn new(new_path: impl Into<String>) -> Self {
        let path = new_path.into();
        Self {
            old_path: Some(path.clone()),
            new_path: Some(path),
            hunks: Vec::new(),
            is_binary: false,
        }
    }

    /// 追加一个差异块
    pub fn with_hunk(mut self, hunk: DiffHunk) -> Self {
        self.hunks.push(hunk);
        self
    }

    /// 目标文件的扩展名（小写，不含点）
    pub fn extension(&self) -> Option<String> {
        let path = self.new_path.as_deref()?;
        Path::new(path)
            .extension()?
            .to_str()
            .map(|ext| ext.to_ascii_lowercase())
    }
}

impl DiffHunk {
    /// 根据起始行号和行列表构造差异块，行数由行列表统计得出
    pub fn new(old_start: u32, new_start: u32, lines: Vec<DiffLine>) -> Self {
        let old_lines = lines
            .iter()
            .filter(|line| line.line_type != DiffLineType::Added)
            .count() as u32;
        let new_lines = lines
            .iter()
            .filter(|line| line.line_type != DiffLineType::Removed)
            .count() as u32;

        Self {
            old_start,
            old_lines,
            new_start,
            new_lines,
            lines,
        }
    }
}

impl DiffLine {
    pub fn added(content: impl Into<String>, new_line_number: u32) -> Self {
        Self {
            content: content.into(),
            line_type: DiffLineType::Added,
            old_line_number: None,
            new_line_number: Some(new_line_number),
        }
    }

    pub fn removed(content: impl Into<String>, old_line_number: u32) -> Self {
        Self {
            content: content.into(),
            line_type: DiffLineType::Removed,
            old_line_number: Some(old_line_number),
            new_line_number: None,
        }
    }

    pub fn context(content: impl Into<String>, old_line_number: u32, new_line_number: u32) -> Self {
        Self {
            content: content.into(),
            line_type: DiffLineType::Context,
            old_line_number: Some(old_line_number),
            new_line_number: Some(new_line_number),
        }
    }

    /// 报告用的行号：删除行取源行号，其余取目标行号
    pub fn line_number(&self) -> u32 {
        match self.line_type {
            DiffLineType::Removed => self.old_line_number.unwrap_or_default(),
            DiffLineType::Added | DiffLineType::Context => self
                .new_line_number
                .or(self.old_line_number)
                .unwrap_or_default(),
        }
    }
}

/// 解析统一 diff 文本
///
/// 同时支持 `git diff` 输出和只有 `---`/`+++` 头的普通统一 diff。
/// 差异块内容按块头中的行数消费，因此以 `--` 开头的删除行不会被误认为文件头。
pub fn parse_diff(input: &str) -> Result<Vec<DiffFile>> {
    let lines: Vec<&str> = input.lines().collect();
    let mut files = Vec::new();
    let mut current: Option<DiffFile> = None;
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];

        if let Some(rest) = line.strip_prefix("diff --git ") {
            files.extend(current.take());
            current = Some(file_from_git_header(rest));
            i += 1;
            continue;
        }

        if line.starts_with("--- ")
            && lines
                .get(i + 1)
                .is_some_and(|next| next.starts_with("+++ "))
        {
            let old_path = parse_header_path(&line[4..], "a/");
            let new_path = parse_header_path(&lines[i + 1][4..], "b/");

            // git diff 的 ---/+++ 头属于当前文件；普通 diff 中它标志着新文件开始
            let reuse_current = current.as_ref().is_some_and(|file| file.hunks.is_empty());
            if !reuse_current {
                files.extend(current.take());
            }
            let file = current.get_or_insert_with(DiffFile::default);
            file.old_path = old_path;
            file.new_path = new_path;

            i += 2;
            continue;
        }

        if line.starts_with("@@") {
            let Some(file) = current.as_mut() else {
                return Err(VariableDiffError::DiffParse {
                    line: i + 1,
                    message: "hunk found before any file header".to_string(),
                });
            };
            let (hunk, consumed) = parse_hunk(&lines, i)?;
            file.hunks.push(hunk);
            i += consumed;
            continue;
        }

        if let Some(file) = current.as_mut() {
            apply_metadata_line(file, line);
        }
        i += 1;
    }

    files.extend(current);
    Ok(files)
}

/// 处理 `diff --git` 与第一个差异块之间的元数据行
fn apply_metadata_line(file: &mut DiffFile, line: &str) {
    if line.starts_with("new file mode") {
        file.old_path = None;
    } else if line.starts_with("deleted file mode") {
        file.new_path = None;
    } else if let Some(path) = line.strip_prefix("rename from ") {
        file.old_path = Some(unquote(path).to_string());
    } else if let Some(path) = line.strip_prefix("rename to ") {
        file.new_path = Some(unquote(path).to_string());
    } else if (line.starts_with("Binary files ") && line.ends_with(" differ"))
        || line.starts_with("GIT binary patch")
    {
        file.is_binary = true;
    }
}

/// 从 "diff --git a/path b/path" 头中提取路径
fn file_from_git_header(rest: &str) -> DiffFile {
    let rest = rest.trim();
    let (old_path, new_path) = match rest.find(" b/") {
        Some(pos) => {
            let old = &rest[..pos];
            let new = &rest[pos + 1..];
            (
                old.strip_prefix("a/").unwrap_or(old).to_string(),
                new.strip_prefix("b/").unwrap_or(new).to_string(),
            )
        }
        // --no-prefix 等格式
        None => match rest.split_once(' ') {
            Some((old, new)) => (old.to_string(), new.to_string()),
            None => (rest.to_string(), rest.to_string()),
        },
    };

    DiffFile {
        old_path: Some(old_path),
        new_path: Some(new_path),
        hunks: Vec::new(),
        is_binary: false,
    }
}

/// 解析 ---/+++ 行中的路径，去掉时间戳和 a/、b/ 前缀
fn parse_header_path(raw: &str, prefix: &str) -> Option<String> {
    let path = raw.split('\t').next().unwrap_or(raw).trim_end();
    let path = unquote(path);
    if path == "/dev/null" {
        return None;
    }
    Some(path.strip_prefix(prefix).unwrap_or(path).to_string())
}

fn unquote(path: &str) -> &str {
    path.strip_prefix('"')
        .and_then(|p| p.strip_suffix('"'))
        .unwrap_or(path)
}

/// 解析一个以 @@ 行开始的差异块，返回差异块和消费的行数
fn parse_hunk(lines: &[&str], start: usize) -> Result<(DiffHunk, usize)> {
    let (old_start, old_lines, new_start, new_lines) = parse_hunk_header(lines[start])
        .ok_or_else(|| VariableDiffError::DiffParse {
            line: start + 1,
            message: format!("malformed hunk header: {}", lines[start]),
        })?;

    let mut old_remaining = old_lines;
    let mut new_remaining = new_lines;
    // 按 u64 计数，只有真正用到的行号才需要落在 u32 范围内
    let mut old_no = u64::from(old_start);
    let mut new_no = u64::from(new_start);
    let mut diff_lines = Vec::new();
    let mut i = start + 1;

    while i < lines.len() && (old_remaining > 0 || new_remaining > 0) {
        let line = lines[i];
        match line.chars().next() {
            Some('+') => {
                diff_lines.push(DiffLine::added(&line[1..], line_number(new_no, i)?));
                new_no += 1;
                new_remaining = new_remaining.saturating_sub(1);
            }
            Some('-') => {
                diff_lines.push(DiffLine::removed(&line[1..], line_number(old_no, i)?));
                old_no += 1;
                old_remaining = old_remaining.saturating_sub(1);
            }
            Some(' ') | None => {
                // 某些工具会去掉空上下文行行首的空格
                diff_lines.push(DiffLine::context(
                    line.get(1..).unwrap_or(""),
                    line_number(old_no, i)?,
                    line_number(new_no, i)?,
                ));
                old_no += 1;
                new_no += 1;
                old_remaining = old_remaining.saturating_sub(1);
                new_remaining = new_remaining.saturating_sub(1);
            }
            // "\ No newline at end of file"
            Some('\\') => {}
            // 截断的差异块
            Some(_) => break,
        }
        i += 1;
    }

    while i < lines.len() && lines[i].starts_with('\\') {
        i += 1;
    }

    let hunk = DiffHunk {
        old_start,
        old_lines,
        new_start,
        new_lines,
        lines: diff_lines,
    };
    Ok((hunk, i - start))
}

/// 把计数转换为行号，超出 u32 时报告所在的 diff 行
fn line_number(number: u64, index: usize) -> Result<u32> {
    u32::try_from(number).map_err(|_| VariableDiffError::DiffParse {
        line: index + 1,
        message: format!("line number {number} exceeds the supported range"),
    })
}

/// 解析差异块头："@@ -old_start[,old_count] +new_start[,new_count] @@[ context]"
fn parse_hunk_header(header: &str) -> Option<(u32, u32, u32, u32)> {
    let rest = header.strip_prefix("@@ ")?;
    let (ranges, _) = rest.split_once(" @@")?;
    let (old, new) = ranges.split_once(' ')?;
    let (old_start, old_lines) = parse_range(old.strip_prefix('-')?)?;
    let (new_start, new_lines) = parse_range(new.strip_prefix('+')?)?;
    Some((old_start, old_lines, new_start, new_lines))
}

fn parse_range(range: &str) -> Option<(u32, u32)> {
    match range.split_once(',') {
        Some((start, count)) => Some((start.parse().ok()?, count.parse().ok()?)),
        None => Some((range.parse().ok()?, 1)),
    }
}
