// ==========================================
// IPC 报价数量监控系统 - 报价宽表模型
// ==========================================
// 职责: QuotationRecord / QuotationTable（持久化宽表）
// 红线: (UF, Código, Descrição) 在表内唯一
// ==========================================

use crate::domain::types::Month;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// 全国汇总虚拟地区
pub const NATIONAL_REGION: &str = "BR";

// ==========================================
// RecordKey - 记录主键
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecordKey {
    /// 地区 (UF)
    pub region: String,
    /// 商品代码 (Código)
    pub code: String,
    /// 商品描述 (Descrição)
    pub description: String,
}

impl RecordKey {
    pub fn new(
        region: impl Into<String>,
        code: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            region: region.into(),
            code: code.into(),
            description: description.into(),
        }
    }

    /// 组合标签 "Código - Descrição"
    pub fn item_label(&self) -> String {
        item_label(&self.code, &self.description)
    }
}

/// 组合标签 "Código - Descrição"
pub fn item_label(code: &str, description: &str) -> String {
    format!("{} - {}", code, description)
}

// ==========================================
// QuotationRecord - 单行报价记录
// ==========================================
// values 只保存非空单元格; 缺失即为 null
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuotationRecord {
    pub key: RecordKey,
    pub values: BTreeMap<Month, f64>,
}

impl QuotationRecord {
    pub fn new(key: RecordKey) -> Self {
        Self {
            key,
            values: BTreeMap::new(),
        }
    }

    pub fn value(&self, month: Month) -> Option<f64> {
        self.values.get(&month).copied()
    }

    /// 写入单元格（None 表示清空）
    pub fn set_value(&mut self, month: Month, value: Option<f64>) {
        match value {
            Some(v) => {
                self.values.insert(month, v);
            }
            None => {
                self.values.remove(&month);
            }
        }
    }

    pub fn with_value(mut self, month: Month, value: f64) -> Self {
        self.values.insert(month, value);
        self
    }
}

// ==========================================
// QuotationTable - 报价宽表
// ==========================================
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuotationTable {
    months: BTreeSet<Month>,
    rows: Vec<QuotationRecord>,
    index: HashMap<RecordKey, usize>,
}

impl QuotationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// 以给定月份列创建空表
    pub fn with_months<I: IntoIterator<Item = Month>>(months: I) -> Self {
        Self {
            months: months.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn months(&self) -> &BTreeSet<Month> {
        &self.months
    }

    pub fn rows(&self) -> &[QuotationRecord] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<QuotationRecord> {
        self.rows
    }

    /// 表中没有任何记录行
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn has_month(&self, month: Month) -> bool {
        self.months.contains(&month)
    }

    /// 新增月份列（已存在则忽略）
    pub fn add_month(&mut self, month: Month) {
        self.months.insert(month);
    }

    /// 最近月份（最大日期的月份列）
    pub fn latest_month(&self) -> Option<Month> {
        self.months.iter().next_back().copied()
    }

    pub fn get(&self, key: &RecordKey) -> Option<&QuotationRecord> {
        self.index.get(key).map(|&idx| &self.rows[idx])
    }

    pub fn contains_key(&self, key: &RecordKey) -> bool {
        self.index.contains_key(key)
    }

    /// 追加记录
    ///
    /// # 返回
    /// - true: 已追加
    /// - false: 主键重复, 保留先到的记录
    pub fn push(&mut self, record: QuotationRecord) -> bool {
        if self.index.contains_key(&record.key) {
            return false;
        }
        self.months.extend(record.values.keys().copied());
        self.index.insert(record.key.clone(), self.rows.len());
        self.rows.push(record);
        true
    }

    /// 对每一行写入某个月份的值（供合并引擎使用）
    pub(crate) fn set_value(&mut self, row: usize, month: Month, value: Option<f64>) {
        self.months.insert(month);
        if let Some(record) = self.rows.get_mut(row) {
            record.set_value(month, value);
        }
    }

    /// 所有不同的地区（按字母序）
    pub fn regions(&self) -> BTreeSet<String> {
        self.rows.iter().map(|r| r.key.region.clone()).collect()
    }

    /// 所有不同的商品标签（按字母序）
    pub fn item_labels(&self) -> BTreeSet<String> {
        self.rows.iter().map(|r| r.key.item_label()).collect()
    }
}

impl FromIterator<QuotationRecord> for QuotationTable {
    fn from_iter<T: IntoIterator<Item = QuotationRecord>>(iter: T) -> Self {
        let mut table = QuotationTable::new();
        for record in iter {
            table.push(record);
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(month: u32, year: i32) -> Month {
        Month::new(year, month).unwrap()
    }

    #[test]
    fn test_push_rejects_duplicate_key() {
        let mut table = QuotationTable::new();
        let key = RecordKey::new("SP", "1001", "Arroz");
        assert!(table.push(QuotationRecord::new(key.clone()).with_value(m(1, 2024), 30.0)));
        assert!(!table.push(QuotationRecord::new(key.clone()).with_value(m(1, 2024), 99.0)));

        assert_eq!(table.len(), 1);
        assert_eq!(table.get(&key).unwrap().value(m(1, 2024)), Some(30.0));
    }

    #[test]
    fn test_push_registers_months() {
        let mut table = QuotationTable::with_months([m(1, 2024)]);
        table.push(QuotationRecord::new(RecordKey::new("RJ", "1", "Feijão")).with_value(m(3, 2024), 5.0));

        let months: Vec<_> = table.months().iter().copied().collect();
        assert_eq!(months, vec![m(1, 2024), m(3, 2024)]);
        assert_eq!(table.latest_month(), Some(m(3, 2024)));
    }

    #[test]
    fn test_item_label() {
        let key = RecordKey::new("SP", "1001", "Arroz");
        assert_eq!(key.item_label(), "1001 - Arroz");
    }
}
