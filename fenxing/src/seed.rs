//! 种子分型检测。
//!
//! 在序列头部窗口内确定第一个分型与扫描方向，
//! 最高点/最低点同值时取靠后的一根。

use tracing::debug;

use crate::bar::KBar;
use crate::constant::{Direction, FactorError, FractalType};
use crate::utils::{last_max_index, last_min_index};

#[derive(Debug, Clone, Copy)]
pub(crate) struct SeedFractal {
    pub(crate) finalized_index: usize,
    pub(crate) kind: FractalType,
    pub(crate) start_index: usize,
    pub(crate) direction: Direction,
}

pub(crate) fn detect_seed(bars: &[KBar], window: usize) -> Result<SeedFractal, FactorError> {
    let window = window.min(bars.len());
    let highs: Vec<f64> = bars[..window].iter().map(|x| x.high).collect();
    let lows: Vec<f64> = bars[..window].iter().map(|x| x.low).collect();

    let top_index = last_max_index(&highs).ok_or(FactorError::EmptyInput)?;
    let bottom_index = last_min_index(&lows).ok_or(FactorError::EmptyInput)?;

    if top_index == bottom_index {
        return Err(FactorError::DegenerateSeed(top_index));
    }

    debug!(top_index, bottom_index, "bootstrap seed resolved");

    if top_index > bottom_index {
        Ok(SeedFractal {
            finalized_index: bottom_index,
            kind: FractalType::Bottom,
            start_index: top_index,
            direction: Direction::Up,
        })
    } else {
        Ok(SeedFractal {
            finalized_index: top_index,
            kind: FractalType::Top,
            start_index: bottom_index,
            direction: Direction::Down,
        })
    }
}
