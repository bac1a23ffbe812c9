use std::path::PathBuf;

use fenxing::{
    init_logging, load_kbar_inputs, FractalTransformer, FractalType, ScanMode, TransformConfig,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 3 {
        eprintln!(
            "usage: cargo run -q -p replay --bin audit_marks -- <csv_path> <scan_mode:merge_only|promotion> [max_rows] [config_yaml]"
        );
        std::process::exit(2);
    }

    let csv_path = PathBuf::from(&args[1]);
    let scan_mode = ScanMode::parse(&args[2])?;
    let max_rows = if args.len() >= 4 {
        args[3].parse::<usize>()?
    } else {
        usize::MAX
    };

    let mut bars = load_kbar_inputs(&csv_path)?;
    bars.truncate(max_rows);
    let input = bars.clone();

    // 配置文件只提供窗口参数，扫描模式以命令行为准
    let mut config = if args.len() >= 5 {
        TransformConfig::from_yaml_file(&args[4])?
    } else {
        TransformConfig::default()
    };
    config.scan_mode = scan_mode;

    let transformer = FractalTransformer::new(config);
    let slope_window = transformer.config().slope_window;
    let series = transformer.transform(bars)?;
    let rows = series.all_rows();

    let mut violations = Vec::<String>::new();

    if rows.len() != input.len() {
        violations.push(format!(
            "row count changed: in={}, out={}",
            input.len(),
            rows.len()
        ));
    }

    for (index, (row, bar)) in rows.iter().zip(&input).enumerate() {
        if row.datetime != bar.datetime {
            violations.push(format!("datetime rewritten at index {index}"));
        }
        if row.volume != bar.volume || row.turnover != bar.turnover {
            violations.push(format!("passthrough column rewritten at index {index}"));
        }
        if row.merged_high < row.merged_low {
            violations.push(format!("merged range inverted at index {index}"));
        }
        if slope_window > 0 && index >= slope_window && row.slope.is_none() {
            violations.push(format!("missing slope at index {index}"));
        }
        if slope_window == 0 && row.slope.is_some() {
            violations.push(format!("slope set at index {index} with the column disabled"));
        }
    }

    let confirmed: Vec<(usize, FractalType)> = rows
        .iter()
        .enumerate()
        .filter(|(_, row)| row.fractal_type != FractalType::None)
        .map(|(index, row)| (index, row.fractal_type))
        .collect();

    for pair in confirmed.windows(2) {
        if pair[0].1 == pair[1].1 {
            violations.push(format!(
                "confirmed fractals at {} and {} do not alternate",
                pair[0].0, pair[1].0
            ));
        }
        if pair[1].0 - pair[0].0 < 2 {
            violations.push(format!(
                "no connecting bar between confirmed fractals at {} and {}",
                pair[0].0, pair[1].0
            ));
        }
    }

    for (index, kind) in &confirmed {
        let power = match kind {
            FractalType::Top => rows[*index].top_power,
            FractalType::Bottom => rows[*index].bottom_power,
            FractalType::None => None,
        };
        if power.is_none() {
            violations.push(format!("confirmed fractal at {index} has no power"));
        }
    }

    match scan_mode {
        ScanMode::MergeOnly => {
            if confirmed.len() != 1 {
                violations.push(format!(
                    "merge_only run must confirm exactly the seed, got {}",
                    confirmed.len()
                ));
            }
            for (index, row) in rows.iter().enumerate() {
                if row.is_tmp_top || row.is_tmp_bottom {
                    violations.push(format!("provisional flag set at index {index}"));
                }
            }
        }
        ScanMode::Promotion => {
            // 种子之外的确认分型必须先成为候选
            for (index, kind) in confirmed.iter().skip(1) {
                let flagged = match kind {
                    FractalType::Top => rows[*index].is_tmp_top,
                    FractalType::Bottom => rows[*index].is_tmp_bottom,
                    FractalType::None => true,
                };
                if !flagged {
                    violations.push(format!(
                        "confirmed fractal at {index} was never a candidate"
                    ));
                }
            }
        }
    }

    if violations.is_empty() {
        println!(
            "audit ok: {} bars, {} confirmed fractals ({})",
            rows.len(),
            confirmed.len(),
            scan_mode.as_str()
        );
        Ok(())
    } else {
        for violation in &violations {
            eprintln!("VIOLATION: {violation}");
        }
        eprintln!("{} violations", violations.len());
        std::process::exit(1);
    }
}
