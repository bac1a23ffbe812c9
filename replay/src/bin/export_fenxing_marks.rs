use std::fs;
use std::path::PathBuf;

use fenxing::{
    init_logging, load_kbar_inputs, FractalTransformer, FractalType, MarkedBar, ScanMode,
    TransformConfig,
};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct ExportPayload {
    symbol: String,
    scan_mode: String,
    candles: Vec<CandlePoint>,
    merged_candles: Vec<MergedCandlePoint>,
    fractal_marks: Vec<FractalMarker>,
    provisional_marks: Vec<FractalMarker>,
}

#[derive(Debug, Serialize)]
struct CandlePoint {
    time: i64,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
}

#[derive(Debug, Serialize)]
struct MergedCandlePoint {
    time: i64,
    high: f64,
    low: f64,
    slope: Option<f64>,
}

#[derive(Debug, Serialize)]
struct FractalMarker {
    time: i64,
    price: f64,
    kind: String,
    power: Option<f64>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 4 {
        eprintln!(
            "usage: cargo run -p replay --bin export_fenxing_marks -- <csv_path> <symbol> <scan_mode:merge_only|promotion> [output_json] [max_rows]"
        );
        std::process::exit(2);
    }

    let csv_path = PathBuf::from(&args[1]);
    let symbol = args[2].clone();
    let scan_mode = ScanMode::parse(&args[3])?;
    let output = if args.len() >= 5 {
        PathBuf::from(&args[4])
    } else {
        PathBuf::from(format!("fenxing-marks-{}.json", scan_mode.as_str()))
    };
    let max_rows = if args.len() >= 6 {
        Some(args[5].parse::<usize>()?)
    } else {
        None
    };

    let mut bars = load_kbar_inputs(&csv_path)?;
    if let Some(limit) = max_rows {
        bars.truncate(limit);
    }
    let ingested = bars.len();

    let transformer = FractalTransformer::new(TransformConfig {
        scan_mode,
        ..TransformConfig::default()
    });
    let series = transformer.transform(bars)?;

    let mut candles = Vec::new();
    let mut merged_candles = Vec::new();
    let mut fractal_marks = Vec::new();
    let mut provisional_marks = Vec::new();

    for row in series.rows() {
        let time = row.datetime.timestamp();
        candles.push(CandlePoint {
            time,
            open: row.open,
            high: row.high,
            low: row.low,
            close: row.close,
        });
        merged_candles.push(MergedCandlePoint {
            time,
            high: row.merged_high,
            low: row.merged_low,
            slope: row.slope,
        });

        match row.fractal_type {
            FractalType::Top => fractal_marks.push(FractalMarker {
                time,
                price: row.merged_high,
                kind: "Top".to_string(),
                power: row.top_power,
            }),
            FractalType::Bottom => fractal_marks.push(FractalMarker {
                time,
                price: row.merged_low,
                kind: "Bottom".to_string(),
                power: row.bottom_power,
            }),
            FractalType::None => {}
        }

        for mark in provisional_marks_for(row, time) {
            provisional_marks.push(mark);
        }
    }

    let payload = ExportPayload {
        symbol,
        scan_mode: scan_mode.as_str().to_string(),
        candles,
        merged_candles,
        fractal_marks,
        provisional_marks,
    };

    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(&output, serde_json::to_vec_pretty(&payload)?)?;

    let snapshot_dir = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    series.write_parquet_snapshot(&snapshot_dir, scan_mode.as_str())?;

    println!(
        "exported {} bars to {} (ingested={}, fractal={}, provisional={}, parquet under {})",
        payload.candles.len(),
        output.display(),
        ingested,
        payload.fractal_marks.len(),
        payload.provisional_marks.len(),
        snapshot_dir.display(),
    );

    Ok(())
}

fn provisional_marks_for(row: &MarkedBar, time: i64) -> Vec<FractalMarker> {
    let mut marks = Vec::new();
    if row.is_tmp_top {
        marks.push(FractalMarker {
            time,
            price: row.merged_high,
            kind: "Top".to_string(),
            power: None,
        });
    }
    if row.is_tmp_bottom {
        marks.push(FractalMarker {
            time,
            price: row.merged_low,
            kind: "Bottom".to_string(),
            power: None,
        });
    }
    marks
}
