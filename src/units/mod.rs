//! 단위 기호에 붙는 접두어 테이블.

pub mod prefix;

pub use prefix::{
    closest_prefix, next_prefix, prefix_from_log, prefix_from_name, prefix_from_symbol,
    prefix_label, prefixes, previous_prefix, Prefix, UNIT_PREFIX,
};
