//! `$n` 位置占位符

/// 获取占位符字符串
///
/// `index` 从 0 开始，生成的占位符从 `$1` 开始。
///
/// ```rust,ignore
/// assert_eq!(placeholder(0), "$1");
/// assert_eq!(placeholder(1), "$2");
/// ```
pub fn placeholder(index: usize) -> String {
    format!("${}", index + 1)
}

/// 生成 `count` 个连续占位符，从第 `start` 个参数（从 0 开始）开始，以 ", " 连接
pub fn placeholder_list(start: usize, count: usize) -> String {
    (start..start + count)
        .map(placeholder)
        .collect::<Vec<_>>()
        .join(", ")
}

/// 找出片段中引用的 `$n` 占位符编号（按出现顺序，可能重复）
///
/// 以下内容会被跳过：单引号字符串（含 `E'...'` 中的反斜杠转义）、双引号标识符、
/// `$tag$...$tag$` 字符串、`--` 行注释和 `/* */` 块注释。紧跟在标识符字符后的
/// `$`（例如 `col$1`）属于标识符本身，不计为占位符。
pub fn scan_placeholders(fragment: &str) -> Vec<usize> {
    let bytes = fragment.as_bytes();
    let mut found = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'\'' => {
                let escapes = i > 0
                    && matches!(bytes[i - 1], b'E' | b'e')
                    && (i < 2 || !is_ident_byte(bytes[i - 2]));
                i = skip_quoted(bytes, i + 1, b'\'', escapes);
            }
            b'"' => i = skip_quoted(bytes, i + 1, b'"', false),
            b'-' if bytes.get(i + 1) == Some(&b'-') => {
                i = bytes[i..]
                    .iter()
                    .position(|&b| b == b'\n')
                    .map_or(bytes.len(), |p| i + p + 1);
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                i = find(bytes, i + 2, b"*/").map_or(bytes.len(), |p| p + 2);
            }
            b'$' => {
                let start = i + 1;
                let mut end = start;
                while end < bytes.len() && bytes[end].is_ascii_digit() {
                    end += 1;
                }
                if end > start {
                    let part_of_ident = i > 0 && is_ident_byte(bytes[i - 1]);
                    let followed_by_ident = end < bytes.len() && is_ident_byte(bytes[end]);
                    if !part_of_ident && !followed_by_ident {
                        if let Ok(n) = fragment[start..end].parse::<usize>() {
                            found.push(n);
                        }
                    }
                    i = end;
                } else {
                    i = skip_dollar_quoted(bytes, i).unwrap_or(i + 1);
                }
            }
            _ => i += 1,
        }
    }

    found
}

/// 从引号内第一个字节开始，返回闭合引号之后的位置
fn skip_quoted(bytes: &[u8], mut i: usize, quote: u8, escapes: bool) -> usize {
    while i < bytes.len() {
        let b = bytes[i];
        if escapes && b == b'\\' {
            i += 2;
            continue;
        }
        i += 1;
        if b == quote {
            // 连续两个引号是转义，仍在字符串内
            if bytes.get(i) == Some(&quote) {
                i += 1;
                continue;
            }
            return i;
        }
    }
    bytes.len()
}

/// `$tag$...$tag$`（tag 可为空）：返回结束标记之后的位置，不是 dollar quote 时返回 None
fn skip_dollar_quoted(bytes: &[u8], i: usize) -> Option<usize> {
    if i > 0 && is_ident_byte(bytes[i - 1]) {
        return None;
    }
    let mut j = i + 1;
    while j < bytes.len() && (bytes[j].is_ascii_alphanumeric() || bytes[j] == b'_') {
        j += 1;
    }
    if bytes.get(j) != Some(&b'$') {
        return None;
    }
    let tag = &bytes[i..=j];
    Some(find(bytes, j + 1, tag).map_or(bytes.len(), |p| p + tag.len()))
}

fn find(bytes: &[u8], from: usize, needle: &[u8]) -> Option<usize> {
    bytes[from..]
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|p| from + p)
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$'
}
