const SUFFIXES: [&str; 11] = ["K", "M", "B", "T", "Qa", "Qi", "Sx", "Sp", "Oc", "No", "Dc"];

const SUFFIX_THRESHOLD: f64 = 1_000_000.0;

/// Renders an amount for display.
///
/// Magnitudes below one million use `precision` fixed decimals. Larger values
/// are scaled by powers of 1000 and suffixed (`1.50M`, `2.00B`, ...); past the
/// last suffix tier the value falls back to exponential notation.
pub fn format_amount(value: f64, precision: usize) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    if value.abs() < SUFFIX_THRESHOLD {
        return format!("{value:.precision$}");
    }

    let tier = (value.abs().log10() / 3.0).floor() as usize;
    match SUFFIXES.get(tier - 1) {
        Some(suffix) => {
            let scaled = value / 1000f64.powi(tier as i32);
            format!("{scaled:.precision$}{suffix}")
        }
        None => format!("{value:.precision$e}"),
    }
}
