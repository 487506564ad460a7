//! 注释剥离模块
//!
//! 按语言的注释起始标记截断一行。剥离是纯文本、逐行的：
//! 块注释标记与行注释标记同等对待，不跨行跟踪块注释状态。

const QUOTES: [char; 3] = ['"', '\'', '`'];

/// 去掉从第一个未转义、不在字符串字面量中的注释标记开始的后缀
///
/// 剩余内容为空（空行或整行注释）时返回 `None`。
pub fn strip_comments<'a>(line: &'a str, tokens: &[&str]) -> Option<&'a str> {
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut end = line.len();

    for (idx, ch) in line.char_indices() {
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

        let rest = &line[idx..];
        if tokens
            .iter()
            .any(|token| !token.is_empty() && rest.starts_with(token))
        {
            end = idx;
            break;
        }
        if QUOTES.contains(&ch) {
            quote = Some(ch);
        }
    }

    let stripped = line[..end].trim_end();
    if stripped.trim_start().is_empty() {
        None
    } else {
        Some(stripped)
    }
}
