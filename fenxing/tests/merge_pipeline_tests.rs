use chrono::{Duration, Timelike, Utc};

use fenxing::{
    is_including, merge_range, Direction, FractalTransformer, FractalType, KBar, TransformConfig,
};

#[test]
fn output_preserves_length_order_and_passthrough_columns() {
    let input = sample_bars(90);
    let series = FractalTransformer::default().transform(input.clone()).unwrap();
    let rows = series.all_rows();

    assert_eq!(rows.len(), input.len());
    for (row, bar) in rows.iter().zip(&input) {
        assert_eq!(row.datetime, bar.datetime);
        assert_eq!(row.open, bar.open);
        assert_eq!(row.close, bar.close);
        assert_eq!(row.volume, bar.volume);
        assert_eq!(row.turnover, bar.turnover);
        // 原始高低点不被改写，改写只落在 merged_* 上
        assert_eq!(row.high, bar.high);
        assert_eq!(row.low, bar.low);
    }
}

#[test]
fn merged_range_ordering_holds_after_every_merge() {
    let input = sample_bars(150);
    let series = FractalTransformer::default().transform(input).unwrap();

    for row in series.rows() {
        assert!(
            row.merged_high >= row.merged_low,
            "merged range inverted at {}",
            row.datetime
        );
    }
}

#[test]
fn merges_follow_the_seed_direction_rule_for_the_whole_scan() {
    let input = sample_bars(150);
    let (start, direction) = expected_seed(&input);

    let series = FractalTransformer::default().transform(input.clone()).unwrap();
    let rows = series.all_rows();

    for index in start..input.len() {
        let including_prev = is_including(&input[index], &input[index - 1]);
        let overwritten_by_next = index + 1 < input.len()
            && is_including(&input[index + 1], &input[index]);

        if including_prev && !overwritten_by_next {
            let (high, low) = merge_range(
                direction,
                input[index].high,
                input[index].low,
                input[index - 1].high,
                input[index - 1].low,
            );
            assert_eq!(
                (rows[index].merged_high, rows[index].merged_low),
                (high, low),
                "merge at index {index} does not follow the seed direction"
            );
        }
        if !including_prev && !overwritten_by_next {
            assert_eq!(
                (rows[index].merged_high, rows[index].merged_low),
                (input[index].high, input[index].low),
                "untouched bar at index {index} must keep its original range"
            );
        }
    }
}

#[test]
fn bars_before_the_scan_window_keep_their_original_range() {
    let input = sample_bars(60);
    let (start, _) = expected_seed(&input);
    let series = FractalTransformer::default().transform(input.clone()).unwrap();
    let rows = series.all_rows();

    // 扫描从 start 开始，游标前伸到 start-1，再往前不应有改写
    for index in 0..start.saturating_sub(1) {
        assert_eq!(
            (rows[index].merged_high, rows[index].merged_low),
            (input[index].high, input[index].low)
        );
    }
}

#[test]
fn merge_only_scan_finalizes_nothing_beyond_the_seed() {
    let input = sample_bars(150);
    let series = FractalTransformer::default().transform(input).unwrap();

    let confirmed: Vec<usize> = series
        .rows()
        .iter()
        .enumerate()
        .filter(|(_, row)| row.fractal_type != FractalType::None)
        .map(|(index, _)| index)
        .collect();
    assert_eq!(confirmed.len(), 1);

    for row in series.rows() {
        assert!(!row.is_tmp_top);
        assert!(!row.is_tmp_bottom);
    }
}

#[test]
fn slope_column_fills_after_the_lookback_window() {
    let config = TransformConfig::default();
    let window = config.slope_window;
    let input = sample_bars(40);
    let series = FractalTransformer::new(config).transform(input).unwrap();
    let rows = series.rows();

    for (index, row) in rows.iter().enumerate() {
        if index < window {
            assert_eq!(row.slope, None);
        } else {
            assert!(row.slope.is_some());
        }
    }
}

/// 文档化的种子规则在测试侧重放：窗口极值同值取靠后一根。
fn expected_seed(bars: &[KBar]) -> (usize, Direction) {
    let window = bars.len().min(11);
    let mut top_index = 0usize;
    let mut bottom_index = 0usize;
    for index in 0..window {
        if bars[index].high >= bars[top_index].high {
            top_index = index;
        }
        if bars[index].low <= bars[bottom_index].low {
            bottom_index = index;
        }
    }
    assert_ne!(top_index, bottom_index, "fixture must not be degenerate");
    if top_index > bottom_index {
        (top_index, Direction::Up)
    } else {
        (bottom_index, Direction::Down)
    }
}

fn sample_bars(count: usize) -> Vec<KBar> {
    let base_dt = Utc::now()
        .with_second(0)
        .and_then(|x| x.with_nanosecond(0))
        .expect("valid dt");

    let cycle = [0.0_f64, 2.0, 3.5, 2.0, 0.0, -2.0, -3.5, -2.0];
    let mut bars = Vec::with_capacity(count);
    for i in 0..count {
        let drift = i as f64 * 0.05;
        let mid = 100.0 + drift + cycle[i % cycle.len()];
        let width = 0.9 + (i % 5) as f64 * 0.4;
        let volume = 100.0 + i as f64 * 1.5;

        bars.push(KBar {
            datetime: base_dt + Duration::minutes(i as i64 * 15),
            open: mid - width / 4.0,
            high: mid + width,
            low: mid - width,
            close: mid + width / 4.0,
            volume,
            turnover: volume * mid,
        });
    }
    bars
}
