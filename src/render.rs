//! 단위식을 사람이 읽는 문자열로 바꾼다.

use std::fmt;

use crate::relation::{Relation, UnitTerm};
use crate::units::prefix::prefix_label;

/// 항 하나를 `(1/)?<접두어><기호>(^<|지수|>)?` 형식으로 나타낸다.
///
/// `{m, -2, 2}` -> `cm^2`, `{s, 0, -1}` -> `1/s`
pub fn term_to_string(term: &UnitTerm) -> String {
    let mut out = String::new();
    if term.exponent < 0.0 {
        out.push_str("1/");
    }
    out.push_str(&prefix_label(term.log_prefix));
    out.push_str(&term.symbol);
    let magnitude = term.exponent.abs();
    if magnitude != 1.0 {
        out.push('^');
        out.push_str(&magnitude.to_string());
    }
    out
}

/// 항들을 `.`으로 이어 붙인다.
pub fn relation_to_string(units: &[UnitTerm]) -> String {
    units
        .iter()
        .map(term_to_string)
        .collect::<Vec<_>>()
        .join(".")
}

impl fmt::Display for UnitTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&term_to_string(self))
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.units().is_empty() {
            write!(f, "{}", self.coefficient())
        } else {
            write!(f, "{} {}", self.coefficient(), relation_to_string(self.units()))
        }
    }
}
