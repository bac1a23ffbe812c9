pub(crate) fn approx_eq_f64(a: f64, b: f64) -> bool {
    (a - b).abs() <= f64::EPSILON
}

/// 同值时取最后一个出现的位置。
pub(crate) fn last_max_index(values: &[f64]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (index, value) in values.iter().enumerate() {
        best = match best {
            None => Some(index),
            Some(prev) => {
                if *value >= values[prev] {
                    Some(index)
                } else {
                    Some(prev)
                }
            }
        };
    }
    best
}

pub(crate) fn last_min_index(values: &[f64]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (index, value) in values.iter().enumerate() {
        best = match best {
            None => Some(index),
            Some(prev) => {
                if *value <= values[prev] {
                    Some(index)
                } else {
                    Some(prev)
                }
            }
        };
    }
    best
}
