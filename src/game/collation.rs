//! 已猜数字列表的排序与拼接。
//!
//! 排序规则和列表格式在不同语言环境下各不相同，这里用 trait 隔开，
//! 默认实现固定为英文（"en"）的行为。

use std::cmp::Ordering;

/// 字符串比较规则。
pub trait Collator {
    fn compare(&self, left: &str, right: &str) -> Ordering;

    /// 稳定排序。
    fn sort(&self, items: &mut [String]) {
        items.sort_by(|left, right| self.compare(left, right));
    }
}

/// 列表拼接规则。
pub trait ListFormatter {
    fn format(&self, items: &[String]) -> String;
}

/// 数字感知、忽略标点与大小写的自然排序。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NaturalCollator;

#[derive(Debug, PartialEq, Eq)]
enum Chunk {
    Number(String),
    Text(char),
}

fn chunks(input: &str) -> Vec<Chunk> {
    let mut chunks = Vec::new();
    let mut digits = String::new();
    for ch in input.chars() {
        if ch.is_ascii_digit() {
            digits.push(ch);
            continue;
        }
        if !digits.is_empty() {
            chunks.push(Chunk::Number(strip_leading_zeros(&digits)));
            digits.clear();
        }
        if ch.is_alphanumeric() {
            chunks.extend(ch.to_lowercase().map(Chunk::Text));
        }
    }
    if !digits.is_empty() {
        chunks.push(Chunk::Number(strip_leading_zeros(&digits)));
    }
    chunks
}

fn strip_leading_zeros(digits: &str) -> String {
    let trimmed = digits.trim_start_matches('0');
    if trimmed.is_empty() {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

fn compare_chunk(left: &Chunk, right: &Chunk) -> Ordering {
    match (left, right) {
        (Chunk::Number(a), Chunk::Number(b)) => a.len().cmp(&b.len()).then_with(|| a.cmp(b)),
        (Chunk::Number(_), Chunk::Text(_)) => Ordering::Less,
        (Chunk::Text(_), Chunk::Number(_)) => Ordering::Greater,
        (Chunk::Text(a), Chunk::Text(b)) => a.cmp(b),
    }
}

impl Collator for NaturalCollator {
    fn compare(&self, left: &str, right: &str) -> Ordering {
        let left_chunks = chunks(left);
        let right_chunks = chunks(right);
        for (a, b) in left_chunks.iter().zip(right_chunks.iter()) {
            let ordering = compare_chunk(a, b);
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        left_chunks
            .len()
            .cmp(&right_chunks.len())
            .then_with(|| left.cmp(right))
    }
}

/// 英文长格式并列列表：`1`、`1 and 4`、`1, 4, and 7`。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnglishListFormatter;

impl ListFormatter for EnglishListFormatter {
    fn format(&self, items: &[String]) -> String {
        match items {
            [] => String::new(),
            [only] => only.clone(),
            [first, second] => format!("{first} and {second}"),
            [init @ .., last] => format!("{}, and {last}", init.join(", ")),
        }
    }
}

/// 数字加千位分隔符，例如 `1000` → `1,000`。
pub fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        grouped.push('-');
    }
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
