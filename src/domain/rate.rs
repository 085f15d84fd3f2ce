// ==========================================
// 自发货运费核算系统 - 运费表
// ==========================================
// 职责: 收货州 → 每公斤运费 的只读映射
// 键口径: TRIM + UPPER
// ==========================================

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 默认每公斤运费（收货州不在运费表中时使用）
pub const DEFAULT_RATE_PER_KG: f64 = 60.0;

/// 运费表
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RateTable {
    rates: HashMap<String, f64>,
}

/// 费率解析结果
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedRate {
    pub rate_per_kg: f64,
    pub defaulted: bool,
}

impl RateTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// 由 (州, 费率) 列表构建；重复州以后出现者为准
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: AsRef<str>,
    {
        let mut table = Self::new();
        for (state, rate) in entries {
            table.insert(state.as_ref(), rate);
        }
        table
    }

    /// 写入一条费率；空州名或非正/非有限费率被忽略
    ///
    /// # 返回
    /// - true: 已写入
    /// - false: 被忽略
    pub fn insert(&mut self, state: &str, rate_per_kg: f64) -> bool {
        let key = normalize_state(state);
        if key.is_empty() || !rate_per_kg.is_finite() || rate_per_kg <= 0.0 {
            return false;
        }
        self.rates.insert(key, rate_per_kg);
        true
    }

    pub fn lookup(&self, state: &str) -> Option<f64> {
        self.rates.get(&normalize_state(state)).copied()
    }

    /// 查表，缺失时回落到 default_rate 并标记
    pub fn resolve(&self, state: &str, default_rate: f64) -> ResolvedRate {
        match self.lookup(state) {
            Some(rate_per_kg) => ResolvedRate {
                rate_per_kg,
                defaulted: false,
            },
            None => ResolvedRate {
                rate_per_kg: default_rate,
                defaulted: true,
            },
        }
    }

    /// 预览若干州的费率（缺失按默认费率）
    pub fn preview<'a>(&self, states: &[&'a str], default_rate: f64) -> Vec<(&'a str, f64)> {
        states
            .iter()
            .map(|s| (*s, self.resolve(s, default_rate).rate_per_kg))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

/// 州名标准化（TRIM + UPPER）
pub fn normalize_state(state: &str) -> String {
    state.trim().to_uppercase()
}
