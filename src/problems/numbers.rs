//! Numeric problems: sum (1) and divisors (5).

/// Sum the integer tokens of a line. Tokens that do not parse as an
/// `i64` are skipped.
pub fn sum(input: &str) -> String {
    let total = input
        .split_whitespace()
        .filter_map(|token| token.parse::<i64>().ok())
        .fold(0i64, |acc, n| acc.wrapping_add(n));
    format!("Sum: {}", total)
}

/// List the divisors of `n` in ascending order.
///
/// Zero and negative numbers have no divisors in `1..=n` and give an
/// empty answer.
pub fn divisors(input: &str) -> String {
    let n: i64 = match input.trim().parse() {
        Ok(n) => n,
        Err(_) => return "Invalid number".to_string(),
    };
    if n <= 0 {
        return String::new();
    }

    // Walk up to sqrt(n) and pair each divisor with its cofactor.
    let mut low = Vec::new();
    let mut high = Vec::new();
    let mut i: i64 = 1;
    while i <= n / i {
        if n % i == 0 {
            low.push(i);
            if i != n / i {
                high.push(n / i);
            }
        }
        i += 1;
    }

    low.into_iter()
        .chain(high.into_iter().rev())
        .map(|d| d.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}
