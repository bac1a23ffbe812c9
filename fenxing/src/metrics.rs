//! 分型力度与斜率计算。

use crate::bar::{next_distinct, prev_distinct, MarkedBar};
use crate::constant::FractalType;

/// 力度：顶分型取合并高点到两侧连接K线低点中较低者的跌幅，
/// 底分型对称。与分型合并为同一区间的K线不算连接K线。
pub(crate) fn fractal_power(rows: &[MarkedBar], index: usize, kind: FractalType) -> Option<f64> {
    let left = prev_distinct(rows, index);
    let right = next_distinct(rows, index);

    match kind {
        FractalType::Top => {
            let low = match (left, right) {
                (Some(l), Some(r)) => rows[l].merged_low.min(rows[r].merged_low),
                (Some(l), None) => rows[l].merged_low,
                (None, Some(r)) => rows[r].merged_low,
                (None, None) => return None,
            };
            Some(rows[index].merged_high - low)
        }
        FractalType::Bottom => {
            let high = match (left, right) {
                (Some(l), Some(r)) => rows[l].merged_high.max(rows[r].merged_high),
                (Some(l), None) => rows[l].merged_high,
                (None, Some(r)) => rows[r].merged_high,
                (None, None) => return None,
            };
            Some(high - rows[index].merged_low)
        }
        FractalType::None => None,
    }
}

/// `slope_window` 为 0 时关闭斜率列，所有行保持 `None`。
pub(crate) fn fill_slopes(rows: &mut [MarkedBar], slope_window: usize) {
    if slope_window == 0 {
        return;
    }
    for index in slope_window..rows.len() {
        let mid_now = rows[index].merged_mid();
        let mid_then = rows[index - slope_window].merged_mid();
        rows[index].slope = Some((mid_now - mid_then) / slope_window as f64);
    }
}
