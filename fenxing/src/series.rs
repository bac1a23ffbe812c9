//! 标注序列与 dataframe cache 维护。

use std::fs::{create_dir_all, File};
use std::path::Path;

use polars::df;
use polars::prelude::{DataFrame, ParquetWriter};

use crate::bar::MarkedBar;
use crate::constant::{FactorError, FractalType};

/// 一次全量重算的输出：与输入等长、同序的标注K线。
#[derive(Debug)]
pub struct MarkedSeries {
    rows: Vec<MarkedBar>,
    df_cache: DataFrame,
}

impl MarkedSeries {
    pub(crate) fn new(rows: Vec<MarkedBar>) -> Self {
        let mut series = Self {
            rows,
            df_cache: DataFrame::default(),
        };
        series.rebuild_cache();
        series
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[MarkedBar] {
        &self.rows
    }

    pub fn all_rows(&self) -> Vec<MarkedBar> {
        self.rows.clone()
    }

    pub fn last_n(&self, n: usize) -> Vec<MarkedBar> {
        self.rows
            .iter()
            .rev()
            .take(n)
            .cloned()
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect::<Vec<_>>()
    }

    pub fn dataframe(&self) -> DataFrame {
        self.df_cache.clone()
    }

    pub fn write_parquet_snapshot(
        &self,
        output_dir: impl AsRef<Path>,
        label: &str,
    ) -> Result<(), FactorError> {
        let output_dir = output_dir.as_ref();
        create_dir_all(output_dir)?;

        let mut file = File::create(output_dir.join(format!("fenxing_{label}.parquet")))?;
        let mut df = self.dataframe();
        ParquetWriter::new(&mut file).finish(&mut df)?;
        Ok(())
    }

    fn rebuild_cache(&mut self) {
        let datetime: Vec<i64> = self
            .rows
            .iter()
            .map(|x| x.datetime.timestamp_millis())
            .collect();
        let open: Vec<f64> = self.rows.iter().map(|x| x.open).collect();
        let high: Vec<f64> = self.rows.iter().map(|x| x.high).collect();
        let low: Vec<f64> = self.rows.iter().map(|x| x.low).collect();
        let close: Vec<f64> = self.rows.iter().map(|x| x.close).collect();
        let volume: Vec<f64> = self.rows.iter().map(|x| x.volume).collect();
        let turnover: Vec<f64> = self.rows.iter().map(|x| x.turnover).collect();
        let merged_high: Vec<f64> = self.rows.iter().map(|x| x.merged_high).collect();
        let merged_low: Vec<f64> = self.rows.iter().map(|x| x.merged_low).collect();
        let fractal_type: Vec<i8> = self
            .rows
            .iter()
            .map(|x| match x.fractal_type {
                FractalType::Top => 1,
                FractalType::Bottom => -1,
                FractalType::None => 0,
            })
            .collect();
        let is_tmp_top: Vec<bool> = self.rows.iter().map(|x| x.is_tmp_top).collect();
        let is_tmp_bottom: Vec<bool> = self.rows.iter().map(|x| x.is_tmp_bottom).collect();
        let top_power: Vec<Option<f64>> = self.rows.iter().map(|x| x.top_power).collect();
        let bottom_power: Vec<Option<f64>> = self.rows.iter().map(|x| x.bottom_power).collect();
        let slope: Vec<Option<f64>> = self.rows.iter().map(|x| x.slope).collect();

        self.df_cache = df!(
            "datetime" => datetime,
            "open" => open,
            "high" => high,
            "low" => low,
            "close" => close,
            "volume" => volume,
            "turnover" => turnover,
            "merged_high" => merged_high,
            "merged_low" => merged_low,
            "fractal_type" => fractal_type,
            "is_tmp_top" => is_tmp_top,
            "is_tmp_bottom" => is_tmp_bottom,
            "top_power" => top_power,
            "bottom_power" => bottom_power,
            "slope" => slope
        )
        .expect("failed to rebuild marked series dataframe cache");
    }
}
