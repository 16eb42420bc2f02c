//! Partial-ratio fuzzy similarity.
//!
//! The shorter string is slid across the longer one and each alignment is
//! scored with an indel ratio (`2 * lcs / (len_a + len_b)`). The best alignment
//! wins, so a string that is a prefix, suffix or infix of the other scores 100.

/// Partial-ratio similarity between two strings, case-insensitive, 0-100.
///
/// Returns 0 when either string is empty. Symmetric in its arguments.
pub fn partial_ratio(a: &str, b: &str) -> u8 {
    let a: Vec<char> = a.to_lowercase().chars().collect();
    let b: Vec<char> = b.to_lowercase().chars().collect();

    if a.is_empty() || b.is_empty() {
        return 0;
    }

    let best = if a.len() < b.len() {
        best_alignment(&a, &b)
    } else if b.len() < a.len() {
        best_alignment(&b, &a)
    } else {
        best_alignment(&a, &b).max(best_alignment(&b, &a))
    };

    (best * 100.0).round().clamp(0.0, 100.0) as u8
}

/// Best indel ratio of `short` against every window of `long`.
fn best_alignment(short: &[char], long: &[char]) -> f64 {
    let mut best = 0.0f64;
    for start in 0..long.len() {
        let end = (start + short.len()).min(long.len());
        let score = indel_ratio(short, &long[start..end]);
        if score > best {
            best = score;
            if best >= 0.995 {
                return 1.0;
            }
        }
    }
    best
}

/// Normalized indel similarity (0.0-1.0).
fn indel_ratio(a: &[char], b: &[char]) -> f64 {
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    2.0 * longest_common_subsequence(a, b) as f64 / total as f64
}

fn longest_common_subsequence(a: &[char], b: &[char]) -> usize {
    let mut previous = vec![0usize; b.len() + 1];
    let mut current = vec![0usize; b.len() + 1];

    for a_char in a {
        for (j, b_char) in b.iter().enumerate() {
            current[j + 1] = if a_char == b_char {
                previous[j] + 1
            } else {
                previous[j + 1].max(current[j])
            };
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[b.len()]
}
