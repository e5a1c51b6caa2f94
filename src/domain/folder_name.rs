//! 文件夹名清洗
//!
//! 把任意显示名称转换为可用作目录名的字符串。
//! 处理顺序固定：非法文件名字符 -> 符号过滤一 -> 空格过滤 -> 符号过滤二 -> 残余字符过滤

use once_cell::sync::Lazy;
use regex::Regex;

/// Windows 文件名中不允许出现的字符（另含 0x00-0x1F 控制字符）
const INVALID_FILE_NAME_CHARS: &[char] = &['"', '<', '>', '|', ':', '*', '?', '\\', '/'];

/// 第一轮过滤的符号（含全角变体）
const FIRST_PASS_SYMBOLS: &[char] = &[
    ' ', '[', ']', '^', '-', '_', '*', '×', '―', '(', ')', '（', '）', '$', '%', '~', '!', '@',
    '#', '…', '&', '￥', '—', '+', '=', '<', '>', '《', '》', '！', '?', '？', ':', '：', '•', '`',
    '·', '、', '。', '，', '；', ',', '.', ';', '"', '‘', '’', '“', '”',
];

/// 第二轮过滤的 ASCII 符号
const SECOND_PASS_SYMBOLS: &[char] = &[
    '~', '!', '@', '#', '$', '%', '^', '&', '*', '(', ')', '+', '=', '|', '\\', '}', ']', '{',
    '[', ':', ';', '<', ',', '>', '?', '/', '"',
];

/// 前几轮之后仍可能残留的常见符号
const LEFTOVER_SYMBOLS: &[char] = &[
    '©', '®', '™', '℠', '℗', '°', '±', '§', '¶', '¤', '¢', '£', '¥', '€', '¦', '¨', '¬', '¯', '´',
    '¸', '÷', '\'',
];

static FIRST_PASS: Lazy<Regex> = Lazy::new(|| symbol_class(FIRST_PASS_SYMBOLS, false));
static SECOND_PASS: Lazy<Regex> = Lazy::new(|| symbol_class(SECOND_PASS_SYMBOLS, true));

fn symbol_class(symbols: &[char], repeated: bool) -> Regex {
    let class: String = symbols
        .iter()
        .map(|c| regex::escape(&c.to_string()))
        .collect();
    let pattern = if repeated {
        format!("[{}]+", class)
    } else {
        format!("[{}]", class)
    };
    // 所有字符都经过转义，模式总是合法的
    Regex::new(&pattern).unwrap_or_else(|e| panic!("invalid symbol class {}: {}", pattern, e))
}

/// 把显示名称清洗为安全的文件夹名
///
/// 结果幂等：对结果再次清洗不会改变它。
pub fn correct_folder_name(name: &str) -> String {
    let name: String = name
        .chars()
        .filter(|c| !c.is_control() && !INVALID_FILE_NAME_CHARS.contains(c))
        .collect();

    let name = FIRST_PASS.replace_all(&name, "");
    let name = name.replace([' ', '\u{3000}'], "");
    let name = SECOND_PASS.replace_all(&name, "");

    name.chars()
        .filter(|c| !c.is_whitespace() && !LEFTOVER_SYMBOLS.contains(c))
        .collect()
}
