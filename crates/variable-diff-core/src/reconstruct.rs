//! 多行语句重建模块
//!
//! 调用点在一行中打开但没有闭合时，继续累积后续同类型的 diff 行，直到括号平衡，
//! 得到一条逻辑行，行号取第一行的行号。重建从不跨越行类型的变化。

use crate::diff::DiffLineType;
use crate::parser::CompiledParser;
use tracing::debug;

/// 一条或多条同类型物理行拼接成的逻辑行
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicalLine {
    pub text: String,
    /// 第一条物理行的行号
    pub line_number: u32,
    pub line_type: DiffLineType,
}

#[derive(Debug)]
enum State {
    Idle,
    Accumulating {
        buffer: String,
        /// 未闭合调用的左括号在 buffer 中的偏移
        open_at: usize,
        line_number: u32,
        line_type: DiffLineType,
    },
}

/// 单个文件的重建状态机
#[derive(Debug)]
pub struct LineReconstructor<'a> {
    parsers: &'a [CompiledParser],
    state: State,
}

impl<'a> LineReconstructor<'a> {
    /// 用文件适用的解析器创建状态机，调用点的识别来自这些解析器
    pub fn new(parsers: &'a [CompiledParser]) -> Self {
        Self {
            parsers,
            state: State::Idle,
        }
    }

    /// 是否正在累积
    pub fn is_accumulating(&self) -> bool {
        matches!(self.state, State::Accumulating { .. })
    }

    /// 输入一行已剥离注释的内容（`None` 表示空行或整行注释）
    ///
    /// 返回完成的逻辑行。
    pub fn push(
        &mut self,
        stripped: Option<&str>,
        line_number: u32,
        line_type: DiffLineType,
    ) -> Option<LogicalLine> {
        if let State::Accumulating {
            buffer,
            open_at,
            line_number: first_line,
            line_type: buffered_type,
        } = &mut self.state
        {
            if *buffered_type == line_type {
                let piece = stripped?.trim();
                buffer.push(' ');
                buffer.push_str(piece);
                if !is_closed(buffer, *open_at) {
                    return None;
                }

                let logical = LogicalLine {
                    text: std::mem::take(buffer),
                    line_number: *first_line,
                    line_type,
                };
                // 闭合行上可能又打开了新的调用，从该调用点开始重新累积
                self.state = match self.first_unclosed_site(piece) {
                    Some((site_start, site_open)) => State::Accumulating {
                        buffer: piece[site_start..].to_string(),
                        open_at: site_open - site_start,
                        line_number,
                        line_type,
                    },
                    None => State::Idle,
                };
                return Some(logical);
            }

            debug!(
                "Discarding incomplete statement from line {} on change of line type",
                first_line
            );
            self.state = State::Idle;
        }

        let text = stripped?.trim();
        match self.first_unclosed_site(text) {
            Some((_, open_at)) => {
                self.state = State::Accumulating {
                    buffer: text.to_string(),
                    open_at,
                    line_number,
                    line_type,
                };
                None
            }
            None => Some(LogicalLine {
                text: text.to_string(),
                line_number,
                line_type,
            }),
        }
    }

    /// 差异块结束：丢弃未完成的语句
    pub fn finish(&mut self) {
        if let State::Accumulating { line_number, .. } = &self.state {
            debug!(
                "Discarding incomplete statement from line {} at end of hunk",
                line_number
            );
        }
        self.state = State::Idle;
    }

    /// 第一个在本行内没有闭合的调用点，返回 (起点, 左括号) 偏移
    fn first_unclosed_site(&self, text: &str) -> Option<(usize, usize)> {
        let mut sites: Vec<(usize, usize)> = self
            .parsers
            .iter()
            .flat_map(|parser| parser.call_sites(text))
            .collect();
        sites.sort_unstable_by_key(|&(_, open_at)| open_at);
        sites.dedup_by_key(|&mut (_, open_at)| open_at);

        sites
            .into_iter()
            .find(|&(_, open_at)| !is_closed(text, open_at))
    }
}

/// 从 `open_at` 处的左括号开始计数括号深度，字符串中的括号不计
fn is_closed(text: &str, open_at: usize) -> bool {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for ch in text[open_at..].chars() {
        if escaped {
            escaped = false;
            continue;
        }
        if ch == '\\' {
            escaped = true;
            continue;
        }
        if let Some(open) = quote {
            if ch == open {
                quote = None;
            }
            continue;
        }

        match ch {
            '"' | '\'' | '`' => quote = Some(ch),
            '(' => depth += 1,
            ')' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return true;
                }
            }
            _ => {}
        }
    }

    false
}
