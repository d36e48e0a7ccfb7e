//! String problems: spaces (2), reverse (3), character positions (6),
//! substring (7) and most common matching character (10).
//!
//! Positions and lengths are counted in Unicode scalar values, except in
//! problem 10 which compares the two strings byte by byte.

/// Count ASCII spaces in the untrimmed line.
pub fn count_spaces(input: &str) -> String {
    let count = input.bytes().filter(|&b| b == b' ').count();
    format!("Number of spaces: {}", count)
}

/// Reverse the trimmed line by code point.
pub fn reverse(input: &str) -> String {
    input.trim().chars().rev().collect()
}

/// Indices at which the first character of `needle` occurs in `haystack`.
pub fn char_positions(haystack: &str, needle: &str) -> String {
    let target = match needle.trim().chars().next() {
        Some(c) => c,
        None => return "No character provided".to_string(),
    };

    haystack
        .trim()
        .chars()
        .enumerate()
        .filter(|&(_, c)| c == target)
        .map(|(i, _)| i.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Up to `len` characters of the trimmed string starting at `pos`.
pub fn substring(input: &str, pos: &str, len: &str) -> String {
    let (pos, len) = match (pos.trim().parse::<i64>(), len.trim().parse::<i64>()) {
        (Ok(pos), Ok(len)) => (pos, len),
        _ => return "Invalid position or length".to_string(),
    };

    let input = input.trim();
    let char_count = input.chars().count() as i64;
    if pos < 0 || pos >= char_count || len < 0 {
        return "Invalid parameters".to_string();
    }

    let take = len.min(char_count - pos);
    input.chars().skip(pos as usize).take(take as usize).collect()
}

/// Most frequent byte among the positions where both strings agree.
///
/// Ties go to the lowest byte value.
pub fn most_common_match(first: &str, second: &str) -> String {
    let first = first.trim().as_bytes();
    let second = second.trim().as_bytes();
    if first.is_empty() || second.is_empty() {
        return "Empty string(s)".to_string();
    }

    let mut counts = [0usize; 256];
    for (&a, &b) in first.iter().zip(second) {
        if a == b {
            counts[a as usize] += 1;
        }
    }

    let mut best: Option<(u8, usize)> = None;
    for (byte, &count) in counts.iter().enumerate() {
        if count > best.map_or(0, |(_, c)| c) {
            best = Some((byte as u8, count));
        }
    }

    match best {
        Some((byte, count)) => format!("Character: {}, Count: {}", char::from(byte), count),
        None => "No characters match".to_string(),
    }
}
