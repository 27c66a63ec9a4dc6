//! Orderings the merge sort can be driven with. Each is a strict less-than
//! test, which is what [`Queue::sort_by`](crate::Queue::sort_by) expects.

use std::cmp::Ordering;

use clap::ValueEnum;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Order {
    #[default]
    Bytewise,
    Natural,
}

impl Order {
    pub fn less(self) -> fn(&str, &str) -> bool {
        match self {
            Order::Bytewise => bytewise,
            Order::Natural => natural,
        }
    }
}

/// Lexicographic comparison of the raw bytes.
pub fn bytewise(a: &str, b: &str) -> bool {
    a.as_bytes() < b.as_bytes()
}

/// Like [`bytewise`], except that runs of ASCII digits compare by their
/// numeric value, so `"file2"` sorts before `"file10"`.
pub fn natural(a: &str, b: &str) -> bool {
    natural_cmp(a, b) == Ordering::Less
}

pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    let (mut i, mut j) = (0, 0);

    while i < a.len() && j < b.len() {
        if a[i].is_ascii_digit() && b[j].is_ascii_digit() {
            let a_end = digits_end(a, i);
            let b_end = digits_end(b, j);
            match compare_numeric(&a[i..a_end], &b[j..b_end]) {
                Ordering::Equal => {
                    i = a_end;
                    j = b_end;
                }
                ordering => return ordering,
            }
        } else {
            match a[i].cmp(&b[j]) {
                Ordering::Equal => {
                    i += 1;
                    j += 1;
                }
                ordering => return ordering,
            }
        }
    }

    (a.len() - i).cmp(&(b.len() - j))
}

fn digits_end(bytes: &[u8], start: usize) -> usize {
    start
        + bytes[start..]
            .iter()
            .take_while(|byte| byte.is_ascii_digit())
            .count()
}

fn compare_numeric(a: &[u8], b: &[u8]) -> Ordering {
    let (a, b) = (trim_zeros(a), trim_zeros(b));
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

fn trim_zeros(digits: &[u8]) -> &[u8] {
    let zeros = digits.iter().take_while(|&&digit| digit == b'0').count();
    &digits[zeros..]
}
