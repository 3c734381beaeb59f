use serde::{Deserialize, Serialize};

/// `mantissa × 10^exponent` 형태의 값.
///
/// `from_f64`로 만든 값은 과학적 표기법처럼 정규화되어 `1 <= |mantissa| < 10`이고,
/// 0은 `0 × 10^0`으로 둔다.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SiValue {
    pub mantissa: f64,
    pub exponent: i32,
}

impl SiValue {
    pub fn new(mantissa: f64, exponent: i32) -> Self {
        Self { mantissa, exponent }
    }

    pub fn from_f64(value: f64) -> Self {
        if value == 0.0 || !value.is_finite() {
            return Self::new(value, 0);
        }
        // log10 반올림 오차로 가수가 10이 되는 경우를 보정한다.
        let mut exponent = value.abs().log10().floor() as i32;
        let mut mantissa = scale_pow10(value, -exponent);
        if mantissa.abs() >= 10.0 {
            mantissa /= 10.0;
            exponent += 1;
        } else if mantissa.abs() < 1.0 {
            mantissa *= 10.0;
            exponent -= 1;
        }
        Self::new(mantissa, exponent)
    }

    pub fn to_f64(self) -> f64 {
        scale_pow10(self.mantissa, self.exponent)
    }
}

/// `value × 10^exponent`. 10의 거듭제곱을 두 번에 나눠 곱해 아주 작거나 큰
/// 지수(비정규 수 근처)에서도 중간값이 0이나 무한대가 되지 않게 한다.
fn scale_pow10(value: f64, exponent: i32) -> f64 {
    let half = exponent / 2;
    value * 10f64.powi(half) * 10f64.powi(exponent - half)
}

impl std::fmt::Display for SiValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.exponent == 0 {
            write!(f, "{}", self.mantissa)
        } else {
            write!(f, "{}e{}", self.mantissa, self.exponent)
        }
    }
}
