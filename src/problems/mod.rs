//! Problem registry.
//!
//! Each problem is described by a static [`Descriptor`]: the identifier
//! the client sends, the fields the server must read after it, and the
//! solver that turns those fields into a one-line answer. Dispatch is a
//! table lookup, so the handler never needs to know about individual
//! problems.
//!
//! ## Problems
//! - `1`: sum of integers
//! - `2`: count spaces
//! - `3`: reverse string
//! - `4`: merge sorted token lists
//! - `5`: divisors
//! - `6`: character positions
//! - `7`: substring
//! - `8`: common tokens
//! - `9`: tokens only in the first list
//! - `10`: most common matching character

mod numbers;
mod text;
mod tokens;

pub use numbers::{divisors, sum};
pub use text::{char_positions, count_spaces, most_common_match, reverse, substring};
pub use tokens::{difference, intersection, merge_sorted};

/// Response for identifiers outside the registry
pub const INVALID_PROBLEM: &str = "Invalid problem number";

/// Shape of an input field, used to prompt for and check client input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Whitespace-separated integers
    Numbers,
    /// Whitespace-separated tokens in non-decreasing order
    SortedTokens,
    /// Free text
    Text,
    /// A single non-negative integer
    Number,
    /// A single character
    Char,
    /// A non-negative position or length
    Index,
}

/// One input line of a problem.
#[derive(Debug)]
pub struct Field {
    /// Short name used in logs and client prompts
    pub label: &'static str,
    pub kind: FieldKind,
}

/// Registry entry for one problem.
pub struct Descriptor {
    /// Identifier sent on the first line of a request
    pub id: &'static str,
    pub name: &'static str,
    /// Fields read after the identifier, in wire order
    pub fields: &'static [Field],
    solve: fn(&[&str]) -> String,
}

impl Descriptor {
    /// Number of lines to read after the identifier
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Run the solver.
    ///
    /// Missing fields are treated as empty lines, so a short slice yields
    /// whatever the solver answers for empty input rather than a panic.
    pub fn solve<S: AsRef<str>>(&self, fields: &[S]) -> String {
        let args: Vec<&str> = (0..self.fields.len())
            .map(|i| fields.get(i).map(|s| s.as_ref()).unwrap_or(""))
            .collect();
        (self.solve)(&args)
    }
}

impl std::fmt::Debug for Descriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Descriptor")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("fields", &self.fields)
            .finish()
    }
}

const fn field(label: &'static str, kind: FieldKind) -> Field {
    Field { label, kind }
}

static REGISTRY: [Descriptor; 10] = [
    Descriptor {
        id: "1",
        name: "sum of numbers",
        fields: &[field("numbers", FieldKind::Numbers)],
        solve: |f| sum(f[0]),
    },
    Descriptor {
        id: "2",
        name: "count spaces",
        fields: &[field("text", FieldKind::Text)],
        solve: |f| count_spaces(f[0]),
    },
    Descriptor {
        id: "3",
        name: "reverse string",
        fields: &[field("text", FieldKind::Text)],
        solve: |f| reverse(f[0]),
    },
    Descriptor {
        id: "4",
        name: "merge sorted sequences",
        fields: &[
            field("first", FieldKind::SortedTokens),
            field("second", FieldKind::SortedTokens),
        ],
        solve: |f| merge_sorted(f[0], f[1]),
    },
    Descriptor {
        id: "5",
        name: "divisors",
        fields: &[field("number", FieldKind::Number)],
        solve: |f| divisors(f[0]),
    },
    Descriptor {
        id: "6",
        name: "character positions",
        fields: &[field("string", FieldKind::Text), field("char", FieldKind::Char)],
        solve: |f| char_positions(f[0], f[1]),
    },
    Descriptor {
        id: "7",
        name: "substring",
        fields: &[
            field("string", FieldKind::Text),
            field("pos", FieldKind::Index),
            field("len", FieldKind::Index),
        ],
        solve: |f| substring(f[0], f[1], f[2]),
    },
    Descriptor {
        id: "8",
        name: "common elements",
        fields: &[field("arr1", FieldKind::Numbers), field("arr2", FieldKind::Numbers)],
        solve: |f| intersection(f[0], f[1]),
    },
    Descriptor {
        id: "9",
        name: "elements only in first",
        fields: &[field("arr1", FieldKind::Numbers), field("arr2", FieldKind::Numbers)],
        solve: |f| difference(f[0], f[1]),
    },
    Descriptor {
        id: "10",
        name: "most common matching character",
        fields: &[field("str1", FieldKind::Text), field("str2", FieldKind::Text)],
        solve: |f| most_common_match(f[0], f[1]),
    },
];

/// Look up a problem by its identifier.
///
/// The identifier is trimmed first, matching how it arrives off the wire.
pub fn lookup(id: &str) -> Option<&'static Descriptor> {
    let id = id.trim();
    REGISTRY.iter().find(|d| d.id == id)
}

/// All registered problems, in identifier order.
pub fn all() -> &'static [Descriptor] {
    &REGISTRY
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_counts() {
        let counts: Vec<(&str, usize)> = all().iter().map(|d| (d.id, d.field_count())).collect();
        assert_eq!(
            counts,
            vec![
                ("1", 1),
                ("2", 1),
                ("3", 1),
                ("4", 2),
                ("5", 1),
                ("6", 2),
                ("7", 3),
                ("8", 2),
                ("9", 2),
                ("10", 2),
            ]
        );
    }

    #[test]
    fn test_lookup() {
        assert_eq!(lookup("7").unwrap().name, "substring");
        assert_eq!(lookup(" 10\r").unwrap().id, "10");
        assert!(lookup("0").is_none());
        assert!(lookup("11").is_none());
        assert!(lookup("01").is_none());
        assert!(lookup("").is_none());
        assert!(lookup("sum").is_none());
    }

    #[test]
    fn test_dispatch() {
        let cases: [(&str, &[&str], &str); 10] = [
            ("1", &["3 4 5\n"], "Sum: 12"),
            ("2", &["a b c"], "Number of spaces: 2"),
            ("3", &["hello"], "olleh"),
            ("4", &["1 3 5", "2 4 6"], "1 2 3 4 5 6"),
            ("5", &["6"], "1 2 3 6"),
            ("6", &["banana", "a"], "1 3 5"),
            ("7", &["hello world", "6", "5"], "world"),
            ("8", &["1 2 3", "2 3 4"], "2 3"),
            ("9", &["1 2 3", "2 3 4"], "1"),
            ("10", &["abc", "abd"], "Character: a, Count: 1"),
        ];

        for (id, fields, expected) in cases {
            let descriptor = lookup(id).unwrap();
            assert_eq!(descriptor.solve(fields), expected, "problem {}", id);
        }
    }

    #[test]
    fn test_short_field_slice_does_not_panic() {
        let descriptor = lookup("7").unwrap();
        assert_eq!(descriptor.solve(&["hello"]), "Invalid position or length");

        let descriptor = lookup("10").unwrap();
        let none: [&str; 0] = [];
        assert_eq!(descriptor.solve(&none[..]), "Empty string(s)");
    }

    #[test]
    fn test_solvers_are_deterministic() {
        for descriptor in all() {
            let fields = vec!["b a c 2 1"; descriptor.field_count()];
            let first = descriptor.solve(&fields[..]);
            for _ in 0..5 {
                assert_eq!(descriptor.solve(&fields[..]), first);
            }
        }
    }
}
