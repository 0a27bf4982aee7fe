/// Levenshtein edit distance over Unicode scalar values, using the two-row
/// O(min(m,n)) space algorithm.
pub fn levenshtein_distance(s1: &str, s2: &str) -> usize {
    let a: Vec<char> = s1.chars().collect();
    let b: Vec<char> = s2.chars().collect();

    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    // Shorter string drives the row width.
    let (long, short) = if a.len() >= b.len() { (&a, &b) } else { (&b, &a) };
    let n = short.len();

    let mut prev: Vec<usize> = (0..=n).collect();
    let mut curr = vec![0usize; n + 1];

    for (i, lc) in long.iter().enumerate() {
        curr[0] = i + 1;
        for (j, sc) in short.iter().enumerate() {
            let cost = usize::from(lc != sc);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[n]
}

/// Similarity ratio in 0..=100, rounded half up, from the edit distance
/// relative to the longer string. Empty input on either side scores 0.
pub fn similarity_ratio(s1: &str, s2: &str) -> u8 {
    let max_len = s1.chars().count().max(s2.chars().count());
    if s1.is_empty() || s2.is_empty() {
        return 0;
    }
    let same = max_len - levenshtein_distance(s1, s2);
    // round(100 * same / max_len) in integer arithmetic
    ((200 * same + max_len) / (2 * max_len)) as u8
}
