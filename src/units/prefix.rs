/// 10의 거듭제곱 접두어(SI prefix) 테이블.
///
/// `log10` 값은 테이블 안에서 유일하다. 기호로 찾든 지수로 찾든 결과는 하나뿐이다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Prefix {
    pub name: &'static str,
    pub symbol: &'static str,
    pub log10: i32,
}

impl Prefix {
    const fn new(name: &'static str, symbol: &'static str, log10: i32) -> Self {
        Self {
            name,
            symbol,
            log10,
        }
    }

    /// 접두어가 나타내는 배율(10^log10).
    pub fn factor(&self) -> f64 {
        10f64.powi(self.log10)
    }
}

/// 접두어 없음(배율 1)을 뜻하는 기호.
pub const UNIT_PREFIX: &str = "";

/// 지수 오름차순으로 정렬되어 있어야 한다. 이웃 탐색이 인덱스에 의존한다.
const PREFIXES: &[Prefix] = &[
    Prefix::new("quecto", "q", -30),
    Prefix::new("ronto", "r", -27),
    Prefix::new("yocto", "y", -24),
    Prefix::new("zepto", "z", -21),
    Prefix::new("atto", "a", -18),
    Prefix::new("femto", "f", -15),
    Prefix::new("pico", "p", -12),
    Prefix::new("nano", "n", -9),
    Prefix::new("micro", "µ", -6),
    Prefix::new("milli", "m", -3),
    Prefix::new("centi", "c", -2),
    Prefix::new("deci", "d", -1),
    Prefix::new("unit", UNIT_PREFIX, 0),
    Prefix::new("deca", "da", 1),
    Prefix::new("hecto", "h", 2),
    Prefix::new("kilo", "k", 3),
    Prefix::new("mega", "M", 6),
    Prefix::new("giga", "G", 9),
    Prefix::new("tera", "T", 12),
    Prefix::new("peta", "P", 15),
    Prefix::new("exa", "E", 18),
    Prefix::new("zetta", "Z", 21),
    Prefix::new("yotta", "Y", 24),
    Prefix::new("ronna", "R", 27),
    Prefix::new("quetta", "Q", 30),
];

/// 전체 접두어 목록(지수 오름차순).
pub fn prefixes() -> &'static [Prefix] {
    PREFIXES
}

/// 기호로 접두어를 찾는다. 대소문자를 구분하며 `u`는 `µ`의 별칭으로 받는다.
pub fn prefix_from_symbol(symbol: &str) -> Option<&'static Prefix> {
    let symbol = match symbol {
        "u" | "μ" => "µ",
        other => other,
    };
    PREFIXES.iter().find(|p| p.symbol == symbol)
}

/// 이름(`kilo`, `micro` 등)으로 접두어를 찾는다.
pub fn prefix_from_name(name: &str) -> Option<&'static Prefix> {
    PREFIXES.iter().find(|p| p.name.eq_ignore_ascii_case(name))
}

/// 지수로 접두어를 찾는다. 정수가 아닌 지수는 항상 `None`.
pub fn prefix_from_log(log10: f64) -> Option<&'static Prefix> {
    if log10.fract() != 0.0 {
        return None;
    }
    PREFIXES.iter().find(|p| f64::from(p.log10) == log10)
}

/// 표시용 접두어 문자열. 이름 있는 접두어가 없으면 `10^<log10>` 형식으로 만든다.
pub fn prefix_label(log10: f64) -> String {
    match prefix_from_log(log10) {
        Some(p) => p.symbol.to_string(),
        None => format!("10^{log10}"),
    }
}

/// 다음(더 큰) 접두어. 마지막 접두어 다음은 처음으로 돌아간다.
pub fn next_prefix(current: &Prefix) -> &'static Prefix {
    let idx = position(current);
    &PREFIXES[(idx + 1) % PREFIXES.len()]
}

/// 이전(더 작은) 접두어. 첫 접두어 이전은 마지막으로 돌아간다.
pub fn previous_prefix(current: &Prefix) -> &'static Prefix {
    let idx = position(current);
    &PREFIXES[(idx + PREFIXES.len() - 1) % PREFIXES.len()]
}

/// `log10` 이하인 접두어 중 가장 큰 것. 범위를 벗어나면 양 끝으로 클램프한다.
pub fn closest_prefix(log10: f64) -> &'static Prefix {
    PREFIXES
        .iter()
        .rev()
        .find(|p| f64::from(p.log10) <= log10)
        .unwrap_or(&PREFIXES[0])
}

fn position(current: &Prefix) -> usize {
    PREFIXES
        .iter()
        .position(|p| p.log10 == current.log10)
        .unwrap_or_else(|| {
            // 테이블 밖의 접두어는 배율 1 위치에서 이동한다.
            PREFIXES
                .iter()
                .position(|p| p.log10 == 0)
                .unwrap_or_default()
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_values_are_unique_and_sorted() {
        for win in PREFIXES.windows(2) {
            assert!(win[0].log10 < win[1].log10, "{} / {}", win[0].name, win[1].name);
        }
    }

    #[test]
    fn lookup_by_symbol_is_exact() {
        assert_eq!(prefix_from_symbol("k").map(|p| p.log10), Some(3));
        assert_eq!(prefix_from_symbol("da").map(|p| p.log10), Some(1));
        assert_eq!(prefix_from_symbol("").map(|p| p.log10), Some(0));
        assert_eq!(prefix_from_symbol("u").map(|p| p.name), Some("micro"));
        assert!(prefix_from_symbol("K").is_none());
        assert!(prefix_from_symbol("kilo").is_none());
    }

    #[test]
    fn label_falls_back_to_power_of_ten() {
        assert_eq!(prefix_label(-9.0), "n");
        assert_eq!(prefix_label(0.0), "");
        assert_eq!(prefix_label(5.0), "10^5");
        assert_eq!(prefix_label(1.5), "10^1.5");
    }

    #[test]
    fn navigation_wraps_around() {
        let kilo = prefix_from_symbol("k").unwrap();
        assert_eq!(next_prefix(kilo).symbol, "M");
        assert_eq!(previous_prefix(kilo).symbol, "h");
        let quetta = prefix_from_symbol("Q").unwrap();
        assert_eq!(next_prefix(quetta).symbol, "q");
        assert_eq!(previous_prefix(prefix_from_symbol("q").unwrap()).symbol, "Q");
    }

    #[test]
    fn closest_prefix_rounds_down() {
        assert_eq!(closest_prefix(4.0).symbol, "k");
        assert_eq!(closest_prefix(-4.0).symbol, "µ");
        assert_eq!(closest_prefix(0.5).symbol, "");
        assert_eq!(closest_prefix(99.0).symbol, "Q");
        assert_eq!(closest_prefix(-99.0).symbol, "q");
    }
}
