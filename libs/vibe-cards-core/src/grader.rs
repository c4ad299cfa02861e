//! Answer grading for typed-answer study.
//!
//! Similarity is the matching-blocks ratio `2 * M / (len(a) + len(b))`, where
//! `M` counts the elements covered by the blocks found by repeatedly taking the
//! longest common contiguous run and recursing on the pieces either side of it.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::hash::Hash;

/// Ratio above which a non-exact answer is close enough to earn partial credit.
pub const CLOSE_THRESHOLD: f64 = 0.7;

/// Three-way outcome of a typed answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Grade {
    Exact,
    Close,
    Wrong,
}

impl Grade {
    /// Binary pass/fail used for stats history. Close counts as a miss.
    pub fn is_correct(self) -> bool {
        matches!(self, Self::Exact)
    }
}

/// A run of equal elements: `a[a..a + size] == b[b..b + size]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchingBlock {
    pub a: usize,
    pub b: usize,
    pub size: usize,
}

/// Full grading result for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradeReport {
    pub grade: Grade,
    /// Similarity score between 0.0 and 1.0.
    pub similarity: f64,
    pub typed_normalized: String,
    pub expected_normalized: String,
    pub diff: Vec<DiffSegment>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DiffType {
    /// Text is the same in both strings.
    Same,
    /// Text was added (in expected but not typed).
    Added,
    /// Text was removed (in typed but not expected).
    Removed,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DiffSegment {
    pub text: String,
    pub diff_type: DiffType,
}

fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Grade a typed answer against the expected one.
pub fn grade(input: &str, expected: &str) -> Grade {
    let a: Vec<char> = normalize(input).chars().collect();
    let b: Vec<char> = normalize(expected).chars().collect();
    classify(matched_len(&a, &b), a.len() + b.len())
}

/// Grade and collect display details.
pub fn grade_report(input: &str, expected: &str) -> GradeReport {
    let typed_normalized = normalize(input);
    let expected_normalized = normalize(expected);

    let a: Vec<char> = typed_normalized.chars().collect();
    let b: Vec<char> = expected_normalized.chars().collect();
    let matched = matched_len(&a, &b);
    let total = a.len() + b.len();

    GradeReport {
        grade: classify(matched, total),
        similarity: ratio(matched, total),
        diff: word_diff(input, expected),
        typed_normalized,
        expected_normalized,
    }
}

/// Similarity ratio of two strings after trimming and case folding.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a: Vec<char> = normalize(a).chars().collect();
    let b: Vec<char> = normalize(b).chars().collect();
    ratio(matched_len(&a, &b), a.len() + b.len())
}

// Exact is decided on integer counts, not on the float ratio.
fn classify(matched: usize, total: usize) -> Grade {
    if 2 * matched == total {
        Grade::Exact
    } else if ratio(matched, total) > CLOSE_THRESHOLD {
        Grade::Close
    } else {
        Grade::Wrong
    }
}

fn ratio(matched: usize, total: usize) -> f64 {
    if total == 0 {
        return 1.0;
    }
    2.0 * matched as f64 / total as f64
}

fn matched_len<T: Eq + Hash>(a: &[T], b: &[T]) -> usize {
    matching_blocks(a, b).iter().map(|m| m.size).sum()
}

/// Non-overlapping matching blocks of `a` and `b`, sorted by position.
pub fn matching_blocks<T: Eq + Hash>(a: &[T], b: &[T]) -> Vec<MatchingBlock> {
    let mut b2j: HashMap<&T, Vec<usize>> = HashMap::new();
    for (j, item) in b.iter().enumerate() {
        b2j.entry(item).or_default().push(j);
    }

    let mut blocks = Vec::new();
    let mut pending = vec![(0, a.len(), 0, b.len())];

    while let Some((alo, ahi, blo, bhi)) = pending.pop() {
        let m = longest_match(a, &b2j, alo, ahi, blo, bhi);
        if m.size == 0 {
            continue;
        }
        if alo < m.a && blo < m.b {
            pending.push((alo, m.a, blo, m.b));
        }
        if m.a + m.size < ahi && m.b + m.size < bhi {
            pending.push((m.a + m.size, ahi, m.b + m.size, bhi));
        }
        blocks.push(m);
    }

    blocks.sort_by_key(|m| (m.a, m.b));
    blocks
}

/// Longest common run inside `a[alo..ahi]` and `b[blo..bhi]`.
/// Ties go to the earliest start in `a`, then the earliest in `b`.
fn longest_match<T: Eq + Hash>(
    a: &[T],
    b2j: &HashMap<&T, Vec<usize>>,
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> MatchingBlock {
    let mut best = MatchingBlock {
        a: alo,
        b: blo,
        size: 0,
    };
    // Length of the run ending at (i - 1, j), keyed by j.
    let mut run_len: HashMap<usize, usize> = HashMap::new();

    for (i, item) in a.iter().enumerate().take(ahi).skip(alo) {
        let mut next = HashMap::new();
        if let Some(positions) = b2j.get(item) {
            for &j in positions {
                if j < blo {
                    continue;
                }
                if j >= bhi {
                    break;
                }
                let k = j
                    .checked_sub(1)
                    .and_then(|prev| run_len.get(&prev))
                    .copied()
                    .unwrap_or(0)
                    + 1;
                next.insert(j, k);
                if k > best.size {
                    best = MatchingBlock {
                        a: i + 1 - k,
                        b: j + 1 - k,
                        size: k,
                    };
                }
            }
        }
        run_len = next;
    }

    best
}

/// Word-level diff between typed and expected answers, compared case-insensitively.
pub fn word_diff(typed: &str, expected: &str) -> Vec<DiffSegment> {
    let typed_words: Vec<&str> = typed.split_whitespace().collect();
    let expected_words: Vec<&str> = expected.split_whitespace().collect();
    let typed_keys: Vec<String> = typed_words.iter().map(|w| w.to_lowercase()).collect();
    let expected_keys: Vec<String> = expected_words.iter().map(|w| w.to_lowercase()).collect();

    let mut result = Vec::new();
    let mut push = |words: &[&str], diff_type: DiffType| {
        result.extend(words.iter().map(|w| DiffSegment {
            text: (*w).to_string(),
            diff_type,
        }));
    };

    let (mut i, mut j) = (0, 0);
    for block in matching_blocks(&typed_keys, &expected_keys) {
        push(&typed_words[i..block.a], DiffType::Removed);
        push(&expected_words[j..block.b], DiffType::Added);
        push(&typed_words[block.a..block.a + block.size], DiffType::Same);
        i = block.a + block.size;
        j = block.b + block.size;
    }
    push(&typed_words[i..], DiffType::Removed);
    push(&expected_words[j..], DiffType::Added);

    result
}
