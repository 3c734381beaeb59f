use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::conversion::{convert_value, ConversionError};
use crate::quantity::SiValue;
use crate::registry::DefinitionRegistry;
use crate::relation::Relation;

/// 성공한 변환 한 건.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionRecord {
    pub author: String,
    pub timestamp: DateTime<Utc>,
    pub initial_value: SiValue,
    pub initial_units: Relation,
    pub target_value: SiValue,
    pub target_units: Relation,
}

/// 메모리에만 보관하는 변환 기록. `limit`을 넘으면 가장 오래된 기록부터 버린다.
#[derive(Debug, Clone, Default)]
pub struct ConversionHistory {
    records: VecDeque<ConversionRecord>,
    /// 0이면 제한 없음
    limit: usize,
}

impl ConversionHistory {
    pub fn new(limit: usize) -> Self {
        Self {
            records: VecDeque::new(),
            limit,
        }
    }

    /// 값을 변환하고 성공하면 기록을 남긴다. 실패한 변환은 기록하지 않는다.
    pub fn convert_and_record(
        &mut self,
        registry: &DefinitionRegistry,
        author: &str,
        value: SiValue,
        src: &Relation,
        dst: &Relation,
    ) -> Result<SiValue, ConversionError> {
        let target = convert_value(registry, value, src, dst)?;
        self.push(ConversionRecord {
            author: author.to_string(),
            timestamp: Utc::now(),
            initial_value: value,
            initial_units: src.clone(),
            target_value: target,
            target_units: dst.clone(),
        });
        Ok(target)
    }

    pub fn push(&mut self, record: ConversionRecord) {
        self.records.push_back(record);
        if self.limit > 0 {
            while self.records.len() > self.limit {
                self.records.pop_front();
            }
        }
    }

    /// 오래된 순서로 기록을 돌려준다.
    pub fn records(&self) -> impl Iterator<Item = &ConversionRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }
}
