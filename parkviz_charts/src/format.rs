// Copyright 2025 the Parkviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Number formatting for tick labels, legends and tooltips.

extern crate alloc;

use alloc::string::String;

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

/// Formats `v` with just enough decimals to distinguish ticks spaced `step` apart.
pub fn format_tick_with_step(v: f64, step: f64) -> String {
    let step = step.abs();
    let decimals = if !step.is_finite() || step == 0.0 || step >= 1.0 {
        0
    } else {
        let d = (-step.log10() - 1e-9).ceil().clamp(0.0, 12.0);
        #[allow(clippy::cast_possible_truncation, reason = "clamped to 0..=12")]
        {
            d as usize
        }
    };
    format_fixed(v, decimals)
}

/// Formats `v` with a fixed number of decimals. Negative zero prints as zero.
pub fn format_fixed(v: f64, decimals: usize) -> String {
    if !v.is_finite() {
        return alloc::format!("{v}");
    }
    let s = alloc::format!("{v:.decimals$}");
    if s.starts_with('-') && s[1..].chars().all(|c| c == '0' || c == '.') {
        return String::from(&s[1..]);
    }
    s
}

/// Formats a rate as dollars with two decimals (`$4.00`).
pub fn format_currency(v: f64) -> String {
    if !v.is_finite() {
        return String::from("N/A");
    }
    let body = format_fixed(v.abs(), 2);
    if v < 0.0 && body.chars().any(|c| c != '0' && c != '.') {
        alloc::format!("-${body}")
    } else {
        alloc::format!("${body}")
    }
}

const SI_PREFIXES: [&str; 17] = [
    "y", "z", "a", "f", "p", "n", "µ", "m", "", "k", "M", "G", "T", "P", "E", "Z", "Y",
];

/// Formats `v` with three significant digits and an SI prefix (`1.50M`, `820k`).
///
/// Trailing zeros are kept. Billions use `B` rather than the SI `G`.
pub fn format_si(v: f64) -> String {
    if !v.is_finite() {
        return alloc::format!("{v}");
    }
    if v == 0.0 {
        return String::from("0.00");
    }
    let exponent = v.abs().log10().floor();
    let mut group = (exponent / 3.0).floor().clamp(-8.0, 8.0);
    loop {
        let scaled = v / 10_f64.powi(group_exponent(group));
        let int_digits = if scaled.abs() >= 100.0 {
            3
        } else if scaled.abs() >= 10.0 {
            2
        } else {
            1
        };
        let decimals = 3_usize.saturating_sub(int_digits);
        let body = format_fixed(scaled, decimals);
        let rounded_up = body
            .trim_start_matches('-')
            .split('.')
            .next()
            .is_some_and(|int| int.len() > 3);
        if rounded_up && group < 8.0 {
            group += 1.0;
            continue;
        }
        #[allow(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            reason = "group is clamped to -8..=8"
        )]
        let prefix = SI_PREFIXES[(group + 8.0) as usize];
        let prefix = if prefix == "G" { "B" } else { prefix };
        return alloc::format!("{body}{prefix}");
    }
}

fn group_exponent(group: f64) -> i32 {
    #[allow(clippy::cast_possible_truncation, reason = "group is clamped to -8..=8")]
    {
        (group * 3.0) as i32
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn step_aware_decimals() {
        assert_eq!(format_tick_with_step(2.0, 1.0), "2");
        assert_eq!(format_tick_with_step(0.5, 0.5), "0.5");
        assert_eq!(format_tick_with_step(0.25, 0.05), "0.25");
        assert_eq!(format_tick_with_step(-0.0, 0.1), "0.0");
    }

    #[test]
    fn currency_has_two_decimals() {
        assert_eq!(format_currency(4.0), "$4.00");
        assert_eq!(format_currency(1.234), "$1.23");
        assert_eq!(format_currency(f64::NAN), "N/A");
    }

    #[test]
    fn si_keeps_three_significant_digits() {
        assert_eq!(format_si(1_500_000.0), "1.50M");
        assert_eq!(format_si(820_000.0), "820k");
        assert_eq!(format_si(1_400_000_000.0), "1.40B");
        assert_eq!(format_si(42.0), "42.0");
        assert_eq!(format_si(999_600.0), "1.00M");
        assert_eq!(format_si(0.0), "0.00");
    }
}
