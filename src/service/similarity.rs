//! 字段相似度: 序列号 / HSN 精确比对，品名模糊比对
//!
//! 品名相似度 = 归一化 + 词排序后的 Levenshtein 比率，取值 [0, 1]。

use crate::models::FieldMatch;

/// 比对两个可选编码字段 (去首尾空白，忽略大小写)
///
/// 两侧都为空不算匹配信号。
pub fn compare_code(a: Option<&str>, b: Option<&str>) -> FieldMatch {
    let (Some(a), Some(b)) = (a, b) else {
        return FieldMatch::Absent;
    };

    let (a, b) = (a.trim(), b.trim());
    if a.is_empty() || b.is_empty() {
        return FieldMatch::Empty;
    }

    if a.to_lowercase() == b.to_lowercase() {
        FieldMatch::Match
    } else {
        FieldMatch::Mismatch
    }
}

/// 品名归一化: 小写，标点替换为空格，合并空白
pub fn normalize_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect::<String>()
        .to_lowercase();

    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// 词排序键，使词序不影响比对
fn token_sort_key(name: &str) -> String {
    let normalized = normalize_name(name);
    let mut tokens: Vec<&str> = normalized.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

/// 字符级编辑距离 (两行滚动 DP)
fn levenshtein(a: &[char], b: &[char]) -> usize {
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0usize; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j] + cost).min(prev[j + 1] + 1).min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// 品名相似度 [0, 1]，对称，归一化后相同返回 1.0
pub fn name_similarity(a: &str, b: &str) -> f64 {
    let a = token_sort_key(a);
    let b = token_sort_key(b);

    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    if a == b {
        return 1.0;
    }

    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let max_len = a.len().max(b.len());
    let distance = levenshtein(&a, &b);

    1.0 - distance as f64 / max_len as f64
}
