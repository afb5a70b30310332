//! Fuzzy string similarity for ingredient categorisation

/// Length of the longest common subsequence of two char slices
fn lcs_len(a: &[char], b: &[char]) -> usize {
    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];

    for &ca in a {
        for (j, &cb) in b.iter().enumerate() {
            curr[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                curr[j].max(prev[j + 1])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

fn ratio_chars(a: &[char], b: &[char]) -> f64 {
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    2.0 * lcs_len(a, b) as f64 / total as f64
}

/// Similarity of two strings in 0..=100 (indel-distance ratio)
pub fn ratio(a: &str, b: &str) -> u8 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    (ratio_chars(&a, &b) * 100.0).round() as u8
}

/// Best similarity of the shorter string against any equally long window
/// of the longer one, in 0..=100.
pub fn partial_ratio(a: &str, b: &str) -> u8 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let (shorter, longer) = if a.len() <= b.len() { (&a, &b) } else { (&b, &a) };

    if shorter.is_empty() {
        return 0;
    }

    let mut best = 0.0f64;
    for window in longer.windows(shorter.len()) {
        let r = ratio_chars(shorter, window);
        if r > best {
            best = r;
        }
        if best >= 0.995 {
            return 100;
        }
    }

    (best * 100.0).round() as u8
}
