use chrono::{DateTime, Utc};

use crate::constant::{Direction, FractalType};
use crate::utils::approx_eq_f64;

/// 标准化的K线输入。
#[derive(Debug, Clone)]
pub struct KBar {
    pub datetime: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    pub turnover: f64,
}

impl KBar {
    pub fn includes(&self, other: &Self) -> bool {
        self.high >= other.high && self.low <= other.low
    }

    pub(crate) fn into_marked(self) -> MarkedBar {
        MarkedBar {
            datetime: self.datetime,
            open: self.open,
            high: self.high,
            low: self.low,
            close: self.close,
            volume: self.volume,
            turnover: self.turnover,
            merged_high: self.high,
            merged_low: self.low,
            fractal_type: FractalType::None,
            is_tmp_top: false,
            is_tmp_bottom: false,
            top_power: None,
            bottom_power: None,
            slope: None,
        }
    }
}

pub fn is_including(a: &KBar, b: &KBar) -> bool {
    a.includes(b) || b.includes(a)
}

/// 按方向合并两根K线的高低点：上涨取高点，下跌取低点。
pub fn merge_range(
    direction: Direction,
    a_high: f64,
    a_low: f64,
    b_high: f64,
    b_low: f64,
) -> (f64, f64) {
    match direction {
        Direction::Up => (a_high.max(b_high), a_low.max(b_low)),
        Direction::Down => (a_high.min(b_high), a_low.min(b_low)),
    }
}

#[derive(Debug, Clone)]
pub struct MarkedBar {
    pub datetime: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    pub turnover: f64,
    pub merged_high: f64,
    pub merged_low: f64,
    pub fractal_type: FractalType,
    pub is_tmp_top: bool,
    pub is_tmp_bottom: bool,
    pub top_power: Option<f64>,
    pub bottom_power: Option<f64>,
    pub slope: Option<f64>,
}

impl MarkedBar {
    pub fn merged_mid(&self) -> f64 {
        (self.merged_high + self.merged_low) / 2.0
    }

    pub fn same_merged_range(&self, other: &Self) -> bool {
        approx_eq_f64(self.merged_high, other.merged_high)
            && approx_eq_f64(self.merged_low, other.merged_low)
    }
}

/// 左侧最近一根高低点区间不同的K线（同区间视为同一合并K线）。
pub(crate) fn prev_distinct(rows: &[MarkedBar], index: usize) -> Option<usize> {
    (0..index)
        .rev()
        .find(|&j| !rows[j].same_merged_range(&rows[index]))
}

pub(crate) fn next_distinct(rows: &[MarkedBar], index: usize) -> Option<usize> {
    ((index + 1)..rows.len()).find(|&j| !rows[j].same_merged_range(&rows[index]))
}
