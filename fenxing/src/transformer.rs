//! 缠论K线处理器实现。
//!
//! 负责：
//! - 头部窗口内确定种子分型与扫描方向；
//! - 按方向处理相邻K线的包含关系；
//! - 候选分型晋升（可选）、力度与斜率计算。

use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::bar::{merge_range, next_distinct, prev_distinct, KBar, MarkedBar};
use crate::constant::{Const, Direction, FactorError, FractalType, ScanMode};
use crate::metrics::{fill_slopes, fractal_power};
use crate::seed::{detect_seed, SeedFractal};
use crate::series::MarkedSeries;

#[derive(Debug, Clone)]
pub struct TransformConfig {
    pub bootstrap_window: usize,
    pub slope_window: usize,
    pub scan_mode: ScanMode,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            bootstrap_window: Const::BOOTSTRAP_WINDOW,
            slope_window: Const::DEFAULT_SLOPE_WINDOW,
            scan_mode: ScanMode::MergeOnly,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransformConfigPatch {
    pub bootstrap_window: Option<usize>,
    pub slope_window: Option<usize>,
    pub scan_mode: Option<ScanMode>,
}

impl TransformConfig {
    pub fn apply_patch(mut self, patch: TransformConfigPatch) -> Self {
        if let Some(v) = patch.bootstrap_window {
            self.bootstrap_window = v;
        }
        if let Some(v) = patch.slope_window {
            self.slope_window = v;
        }
        if let Some(v) = patch.scan_mode {
            self.scan_mode = v;
        }
        self
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, serde_yaml::Error> {
        let patch: TransformConfigPatch = serde_yaml::from_str(yaml)?;
        Ok(Self::default().apply_patch(patch))
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, Box<dyn std::error::Error>> {
        let raw = fs::read_to_string(path)?;
        let config = Self::from_yaml_str(&raw)?;
        Ok(config)
    }
}

/// 单标的全量重算的无状态处理器，每次调用独立构造。
pub struct FractalTransformer {
    config: TransformConfig,
}

impl Default for FractalTransformer {
    fn default() -> Self {
        Self::new(TransformConfig::default())
    }
}

impl FractalTransformer {
    pub fn new(config: TransformConfig) -> Self {
        assert!(config.bootstrap_window >= 2, "bootstrap_window must be >= 2");
        Self { config }
    }

    pub fn config(&self) -> &TransformConfig {
        &self.config
    }

    pub fn transform(&self, bars: Vec<KBar>) -> Result<MarkedSeries, FactorError> {
        validate(&bars)?;

        // 1. 种子分型与扫描起点
        let seed = detect_seed(&bars, self.config.bootstrap_window)?;
        let mut rows: Vec<MarkedBar> = bars.into_iter().map(KBar::into_marked).collect();
        rows[seed.finalized_index].fractal_type = seed.kind;
        debug!(
            start = seed.start_index,
            direction = ?seed.direction,
            "scan begins after seed fractal"
        );

        // 2. 处理包含关系。包含判断与合并取原始高低点：
        //    上一根的游标携带的是未改写的值，改写只落在 merged_* 上。
        let mut prev = seed.start_index - 1;
        for index in seed.start_index..rows.len() {
            let current = (rows[index].high, rows[index].low);
            let previous = (rows[prev].high, rows[prev].low);
            if including(current, previous) {
                let (high, low) =
                    merge_range(seed.direction, current.0, current.1, previous.0, previous.1);
                rows[index].merged_high = high;
                rows[index].merged_low = low;
                rows[prev].merged_high = high;
                rows[prev].merged_low = low;
            }
            prev = index;
        }

        // 3. 候选分型晋升（可选）
        if self.config.scan_mode == ScanMode::Promotion {
            promote(&mut rows, &seed);
        }

        // 4. 力度与斜率
        for index in 0..rows.len() {
            let kind = rows[index].fractal_type;
            if kind == FractalType::None {
                continue;
            }
            let power = fractal_power(&rows, index, kind);
            match kind {
                FractalType::Top => rows[index].top_power = power,
                FractalType::Bottom => rows[index].bottom_power = power,
                FractalType::None => {}
            }
        }
        fill_slopes(&mut rows, self.config.slope_window);

        Ok(MarkedSeries::new(rows))
    }
}

fn including(a: (f64, f64), b: (f64, f64)) -> bool {
    (a.0 >= b.0 && a.1 <= b.1) || (b.0 >= a.0 && b.1 <= a.1)
}

fn validate(bars: &[KBar]) -> Result<(), FactorError> {
    if bars.is_empty() {
        return Err(FactorError::EmptyInput);
    }
    for (index, bar) in bars.iter().enumerate() {
        if bar.high < bar.low {
            return Err(FactorError::InvertedRange(index));
        }
    }
    for index in 1..bars.len() {
        if bars[index].datetime <= bars[index - 1].datetime {
            return Err(FactorError::NonIncreasingDatetime(index));
        }
    }
    if bars.len() < 2 {
        return Err(FactorError::InsufficientData(bars.len()));
    }
    Ok(())
}

/// 候选分型晋升：
/// 同向候选保留更极端的一根，反向候选确认当前候选并换向。
/// 相邻的确认分型非法：确认要求候选与上一个确认分型之间、
/// 以及候选与反向候选之间，各至少隔一根连接K线。
fn promote(rows: &mut [MarkedBar], seed: &SeedFractal) {
    let mut direction = seed.direction;
    let mut last_confirmed = seed.finalized_index;
    let mut pending = seed.start_index;
    mark_candidate(rows, pending, direction);

    for index in (seed.start_index + 1)..rows.len() {
        let kind = candidate_kind(rows, index);
        if kind == FractalType::None {
            continue;
        }

        let expected = match direction {
            Direction::Up => FractalType::Top,
            Direction::Down => FractalType::Bottom,
        };

        if kind == expected {
            mark_candidate(rows, index, direction);
            let replace = match kind {
                FractalType::Top => rows[index].merged_high >= rows[pending].merged_high,
                FractalType::Bottom => rows[index].merged_low <= rows[pending].merged_low,
                FractalType::None => false,
            };
            if replace {
                pending = index;
            }
        } else if index > pending + 1 && pending >= last_confirmed + 2 {
            rows[pending].fractal_type = expected;
            last_confirmed = pending;
            direction = direction.opposite();
            pending = index;
            mark_candidate(rows, index, direction);
        }
    }
}

fn mark_candidate(rows: &mut [MarkedBar], index: usize, direction: Direction) {
    match direction {
        Direction::Up => rows[index].is_tmp_top = true,
        Direction::Down => rows[index].is_tmp_bottom = true,
    }
}

/// 合并链上的三K线规则：同区间的一串K线视为一根，取最后一根代表。
fn candidate_kind(rows: &[MarkedBar], index: usize) -> FractalType {
    if rows
        .get(index + 1)
        .is_some_and(|next| next.same_merged_range(&rows[index]))
    {
        return FractalType::None;
    }
    let Some(left) = prev_distinct(rows, index) else {
        return FractalType::None;
    };
    let Some(right) = next_distinct(rows, index) else {
        return FractalType::None;
    };

    let l = &rows[left];
    let m = &rows[index];
    let r = &rows[right];

    let is_top = m.merged_high >= l.merged_high
        && m.merged_high >= r.merged_high
        && m.merged_low >= l.merged_low
        && m.merged_low >= r.merged_low;
    if is_top {
        return FractalType::Top;
    }

    let is_bottom = m.merged_high <= l.merged_high
        && m.merged_high <= r.merged_high
        && m.merged_low <= l.merged_low
        && m.merged_low <= r.merged_low;
    if is_bottom {
        return FractalType::Bottom;
    }
    FractalType::None
}
