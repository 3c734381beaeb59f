//! 관계식 곱셈, 재배율, 차원 비교.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::relation::{Relation, UnitTerm};

/// 두 관계식을 곱한다.
///
/// 같은 기호의 항은 하나로 병합한다. 지수는 더하고, 접두어는 배율 기여
/// (`log_prefix × exponent`)를 더한 뒤 합친 지수로 나눠 지수 1당 값으로 되돌린다.
/// 합친 지수가 정확히 0이면 항을 없애고 남은 배율 기여를 계수에 곱한다.
/// 결과 항은 기호 순(같으면 지수 오름차순)으로 정렬된다.
///
/// `6 kg × 20 (mg)^-2 = 120 (ng)^-1`
pub fn multiply(lhs: &Relation, rhs: &Relation) -> Relation {
    // symbol -> (지수 합, 배율 기여 합)
    let mut merged: BTreeMap<&str, (f64, f64)> = BTreeMap::new();
    for term in lhs.units().iter().chain(rhs.units()) {
        let entry = merged.entry(term.symbol.as_str()).or_insert((0.0, 0.0));
        entry.0 += term.exponent;
        entry.1 += term.prefix_contribution();
    }

    let mut coefficient = lhs.coefficient() * rhs.coefficient();
    let mut units = Vec::with_capacity(merged.len());
    for (symbol, (exponent, contribution)) in merged {
        if exponent == 0.0 {
            coefficient *= 10f64.powf(contribution);
            continue;
        }
        units.push(UnitTerm::new(symbol, contribution / exponent, exponent));
    }
    units.sort_by(compare_terms);
    Relation::raw(coefficient, units)
}

/// 원래 단위의 접두어와 지수를 해석된 관계식에 적용한다.
///
/// 계수는 `coefficient^exponent × 10^(log_prefix × exponent)`가 되고,
/// 각 항은 지수에 `exponent`가 곱해진다. 항의 `log_prefix`는 지수 1당 값이므로
/// 그대로 둔다.
pub fn transform_relation(relation: &Relation, log_prefix: f64, exponent: f64) -> Relation {
    let coefficient =
        relation.coefficient().powf(exponent) * 10f64.powf(log_prefix * exponent);
    let units = relation
        .units()
        .iter()
        .map(|u| UnitTerm::new(u.symbol.clone(), u.log_prefix, u.exponent * exponent))
        .collect();
    Relation::raw(coefficient, units)
}

/// 역수 관계식. 모든 지수의 부호를 바꾼다.
pub fn invert(relation: &Relation) -> Relation {
    transform_relation(relation, 0.0, -1.0)
}

/// 이미 기본 단위로 해석된 두 관계식의 차원이 같은지 검사한다. 계수는 무시한다.
pub fn same_dimensions(lhs: &Relation, rhs: &Relation) -> bool {
    multiply(lhs, &invert(rhs)).is_dimensionless()
}

/// 관계식 전체 배율: `coefficient × 10^(Σ log_prefix × exponent)`.
pub fn scale_factor(relation: &Relation) -> f64 {
    let contribution: f64 = relation
        .units()
        .iter()
        .map(UnitTerm::prefix_contribution)
        .sum();
    relation.coefficient() * 10f64.powf(contribution)
}

fn compare_terms(a: &UnitTerm, b: &UnitTerm) -> Ordering {
    a.symbol
        .cmp(&b.symbol)
        .then_with(|| a.exponent.total_cmp(&b.exponent))
}
