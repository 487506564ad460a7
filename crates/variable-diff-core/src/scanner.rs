//! 扫描驱动模块
//!
//! 对每个文件：逐行剥离注释 → 多行重建 → 内置解析器和自定义模式匹配 → 别名解析 → 聚合。
//! 文件之间没有数据依赖，使用 rayon 并发扫描，再按 diff 中的文件顺序合并。

use crate::aggregate::{Aggregator, FileMatches, Mode, ResultSet, VariableMatch};
use crate::alias::AliasResolver;
use crate::comment::strip_comments;
use crate::custom::{CustomPatternSet, CustomPatterns};
use crate::diff::DiffFile;
use crate::error::Result;
use crate::options::ParseOptions;
use crate::parser::{CompiledParser, ParserFactory};
use crate::reconstruct::{LineReconstructor, LogicalLine};
use rayon::prelude::*;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// 编译好的扫描器
///
/// 构造时编译所有内置解析器和自定义模式，之后可以对任意多个 diff 重复使用。
#[derive(Debug, Clone)]
pub struct Scanner {
    parsers_by_extension: HashMap<&'static str, Vec<CompiledParser>>,
    custom: CustomPatternSet,
    aliases: AliasResolver,
}

/// 扫描统计信息
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanStats {
    /// 实际扫描的文件数量
    pub files_scanned: u64,
    /// 跳过的文件数量（删除、二进制或不支持的扩展名）
    pub files_skipped: u64,
    /// 参与匹配的逻辑行数量
    pub logical_lines: u64,
    pub matches: u64,
    pub unknown_matches: u64,
    pub duration: Duration,
}

/// 带统计信息的扫描结果
#[derive(Debug, Clone)]
pub struct ScanReport {
    pub results: ResultSet,
    pub stats: ScanStats,
}

/// 单个文件的扫描结果
#[derive(Debug, Default)]
struct FileScan {
    matches: FileMatches,
    logical_lines: u64,
}

impl Scanner {
    /// 创建扫描器，无效的用户正则会立即返回错误
    pub fn new(options: &ParseOptions) -> Result<Self> {
        options.validate()?;

        let custom = CustomPatternSet::compile(&options.match_patterns)?;

        let mut parsers_by_extension: HashMap<&'static str, Vec<CompiledParser>> = HashMap::new();
        for parser in ParserFactory::all() {
            let compiled = CompiledParser::new(parser, &options.client_names)?;
            for &extension in parser.extensions {
                parsers_by_extension
                    .entry(extension)
                    .or_default()
                    .push(compiled.clone());
            }
        }

        debug!(
            "Scanner ready: {} built-in parsers, {} extra client names, custom patterns: {}",
            ParserFactory::all().len(),
            options.client_names.len(),
            !custom.is_empty()
        );

        Ok(Self {
            parsers_by_extension,
            custom,
            aliases: AliasResolver::new(options.variable_aliases.clone()),
        })
    }

    /// 扫描 diff 文件，返回分组结果
    pub fn scan(&self, files: &[DiffFile]) -> ResultSet {
        self.scan_with_stats(files).results
    }

    /// 扫描 diff 文件并收集统计信息
    pub fn scan_with_stats(&self, files: &[DiffFile]) -> ScanReport {
        let start = Instant::now();

        // collect 保持输入顺序，合并结果因此是确定的
        let scans: Vec<Option<FileScan>> =
            files.par_iter().map(|file| self.scan_file(file)).collect();

        let mut aggregator = Aggregator::new();
        let mut stats = ScanStats::default();
        for scan in scans {
            match scan {
                Some(scan) => {
                    stats.files_scanned += 1;
                    stats.logical_lines += scan.logical_lines;
                    stats.unknown_matches += scan
                        .matches
                        .iter()
                        .filter(|(_, record)| record.is_unknown)
                        .count() as u64;
                    aggregator.extend(scan.matches);
                }
                None => stats.files_skipped += 1,
            }
        }

        stats.matches = aggregator.len() as u64;
        stats.duration = start.elapsed();

        info!(
            "Scanned {} files ({} skipped), found {} variable usages ({} unknown) in {:?}",
            stats.files_scanned,
            stats.files_skipped,
            stats.matches,
            stats.unknown_matches,
            stats.duration
        );

        ScanReport {
            results: aggregator.into_results(),
            stats,
        }
    }

    /// 扫描单个文件，不适用的文件返回 `None`
    fn scan_file(&self, file: &DiffFile) -> Option<FileScan> {
        let Some(file_name) = file.new_path.as_deref() else {
            debug!("Skipping deleted file {:?}", file.old_path);
            return None;
        };
        if file.is_binary {
            debug!("Skipping binary file {}", file_name);
            return None;
        }

        let extension = file.extension().unwrap_or_default();
        let parsers = self
            .parsers_by_extension
            .get(extension.as_str())
            .map(Vec::as_slice)
            .unwrap_or_default();
        let custom = self.custom.for_extension(&extension);
        if parsers.is_empty() && custom.is_none() {
            debug!("No parser for {}, skipping", file_name);
            return None;
        }

        let comment_tokens = comment_tokens(parsers);
        let mut reconstructor = LineReconstructor::new(parsers);
        let mut scan = FileScan::default();

        for hunk in &file.hunks {
            for line in &hunk.lines {
                let stripped = strip_comments(&line.content, &comment_tokens);
                if let Some(logical) =
                    reconstructor.push(stripped, line.line_number(), line.line_type)
                {
                    self.match_logical_line(&logical, file_name, parsers, custom, &mut scan);
                }
            }
            reconstructor.finish();
        }

        debug!(
            "Scanned {}: {} logical lines, {} matches",
            file_name,
            scan.logical_lines,
            scan.matches.len()
        );
        Some(scan)
    }

    /// 对一条逻辑行运行内置解析器和自定义模式，上下文行不产生记录
    fn match_logical_line(
        &self,
        logical: &LogicalLine,
        file_name: &str,
        parsers: &[CompiledParser],
        custom: Option<&CustomPatterns>,
        scan: &mut FileScan,
    ) {
        let Some(mode) = Mode::from_line_type(logical.line_type) else {
            return;
        };
        scan.logical_lines += 1;

        let mut emit = |group_key: &str, token: &str, is_unknown: bool| {
            let (name, is_unknown) = self.aliases.resolve(token, is_unknown);
            if is_unknown {
                debug!(
                    "Unknown variable token {} at {}:{}",
                    name, file_name, logical.line_number
                );
            }
            scan.matches.push((
                group_key.to_string(),
                VariableMatch {
                    name,
                    file_name: file_name.to_string(),
                    line: logical.line_number,
                    mode,
                    is_unknown,
                },
            ));
        };

        for parser in parsers {
            for raw in parser.find_matches(&logical.text) {
                emit(parser.identity(), &raw.token, raw.is_unknown);
            }
        }

        if let Some(custom) = custom {
            for token in custom.find_matches(&logical.text) {
                emit(custom.group_key(), &token, false);
            }
        }
    }
}

/// 文件适用的所有解析器的注释标记并集，保持顺序
fn comment_tokens(parsers: &[CompiledParser]) -> Vec<&'static str> {
    let mut tokens = Vec::new();
    for parser in parsers {
        for &token in parser.descriptor().comment_tokens {
            if !tokens.contains(&token) {
                tokens.push(token);
            }
        }
    }
    tokens
}

/// 一次性扫描：编译选项并扫描 diff 文件
pub fn scan(files: &[DiffFile], options: &ParseOptions) -> Result<ResultSet> {
    Ok(Scanner::new(options)?.scan(files))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::{DiffHunk, DiffLine};
    use pretty_assertions::assert_eq;

    fn js_file(lines: Vec<DiffLine>) -> DiffFile {
        DiffFile::new("src/index.js").with_hunk(DiffHunk::new(1, 1, lines))
    }

    #[test]
    fn test_simple_case_add_and_remove() {
        let file = js_file(vec![
            DiffLine::removed(r#"dvcClient.variable(user, "simple-case", false)"#, 1),
            DiffLine::added(r#"dvcClient.variable(user, "simple-case", false)"#, 1),
        ]);

        let results = scan(&[file], &ParseOptions::default()).expect("scan");
        assert_eq!(results.keys().collect::<Vec<_>>(), vec!["nodejs"]);

        let modes: Vec<(u32, Mode)> = results["nodejs"].iter().map(|m| (m.line, m.mode)).collect();
        assert_eq!(modes, vec![(1, Mode::Remove), (1, Mode::Add)]);
    }

    #[test]
    fn test_stats_count_files_and_matches() {
        let files = vec![
            js_file(vec![DiffLine::added(
                "dvcClient.variable(user, VARIABLES.FOO, false)",
                3,
            )]),
            DiffFile::new("README.md").with_hunk(DiffHunk::new(
                1,
                1,
                vec![DiffLine::added("dvcClient.variable(user, 'x', false)", 1)],
            )),
        ];

        let scanner = Scanner::new(&ParseOptions::default()).expect("scanner");
        let report = scanner.scan_with_stats(&files);
        assert_eq!(report.stats.files_scanned, 1);
        assert_eq!(report.stats.files_skipped, 1);
        assert_eq!(report.stats.logical_lines, 1);
        assert_eq!(report.stats.matches, 1);
        assert_eq!(report.stats.unknown_matches, 1);
        assert!(report.results["nodejs"][0].is_unknown);
    }

    #[test]
    fn test_invalid_custom_pattern_fails_fast() {
        let options = ParseOptions::new().with_match_pattern("js", "(unclosed");
        assert!(Scanner::new(&options).is_err());
    }

    #[test]
    fn test_comment_tokens_union() {
        let scanner = Scanner::new(&ParseOptions::default()).expect("scanner");
        let tokens = comment_tokens(&scanner.parsers_by_extension["php"]);
        assert_eq!(tokens, vec!["//", "#", "/*"]);
        let tokens = comment_tokens(&scanner.parsers_by_extension["ts"]);
        assert_eq!(tokens, vec!["//", "/*"]);
    }
}
