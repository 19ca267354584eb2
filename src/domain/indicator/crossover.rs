//! Crossover / crossunder transition signals between two indicator columns.
//!
//! CROSS_ABOVE(fast, slow)[i] = fast[i] > slow[i] && !(fast[i-1] > slow[i-1])
//! CROSS_BELOW(fast, slow)[i] = fast[i] < slow[i] && !(fast[i-1] < slow[i-1])
//!
//! A signal can only fire where both columns are defined at `i` and `i-1`;
//! every other position is false.

use crate::domain::indicator::{IndicatorColumn, SignalColumn};

pub fn crossover(fast: &IndicatorColumn, slow: &IndicatorColumn) -> SignalColumn {
    transitions(
        format!("CROSS_ABOVE({},{})", fast.indicator_type, slow.indicator_type),
        fast,
        slow,
        |f, s| f > s,
    )
}

pub fn crossunder(fast: &IndicatorColumn, slow: &IndicatorColumn) -> SignalColumn {
    transitions(
        format!("CROSS_BELOW({},{})", fast.indicator_type, slow.indicator_type),
        fast,
        slow,
        |f, s| f < s,
    )
}

fn transitions<F>(name: String, fast: &IndicatorColumn, slow: &IndicatorColumn, cond: F) -> SignalColumn
where
    F: Fn(f64, f64) -> bool,
{
    let len = fast.len().max(slow.len());
    let mut values = vec![false; len];

    for i in 1..len {
        let (Some(f_curr), Some(s_curr), Some(f_prev), Some(s_prev)) =
            (fast.get(i), slow.get(i), fast.get(i - 1), slow.get(i - 1))
        else {
            continue;
        };
        values[i] = cond(f_curr, s_curr) && !cond(f_prev, s_prev);
    }

    SignalColumn { name, values }
}
