//! Human-readable sizes, ratios and download file names.

use crate::encode::ExportFormat;

const SIZE_UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

/// Format a byte count with base-1024 units and at most two decimals,
/// trailing zeros dropped: `0 B`, `512 B`, `1.5 KB`, `2.25 MB`.
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 B".to_string();
    }

    let bytes = bytes as f64;
    let exponent = (bytes.ln() / 1024f64.ln()).floor() as usize;
    let exponent = exponent.min(SIZE_UNITS.len() - 1);
    let value = bytes / 1024f64.powi(exponent as i32);

    let fixed = format!("{:.2}", value);
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, SIZE_UNITS[exponent])
}

/// Greatest common divisor. `gcd(0, 0) == 0`.
pub fn gcd(a: u32, b: u32) -> u32 {
    let (mut a, mut b) = (a, b);
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Reduced `w:h` ratio, e.g. `1920x1080` gives `16:9`.
pub fn simplified_ratio(width: u32, height: u32) -> String {
    match gcd(width, height) {
        0 => "0:0".to_string(),
        d => format!("{}:{}", width / d, height / d),
    }
}

/// Drop the last `.ext` from a file name, if any.
///
/// Only the final component counts: an extension containing `/` or `.` is
/// not an extension.
pub fn strip_extension(name: &str) -> &str {
    match name.rfind('.') {
        Some(i) if i + 1 < name.len() && !name[i + 1..].contains('/') => &name[..i],
        _ => name,
    }
}

/// Download name for an export: `{base}_{suffix}.{ext}`.
///
/// ```text
/// export_file_name("holiday.png", "edited", ExportFormat::Jpeg) == "holiday_edited.jpeg"
/// ```
pub fn export_file_name(original: &str, suffix: &str, format: ExportFormat) -> String {
    format!(
        "{}_{}.{}",
        strip_extension(original),
        suffix,
        format.extension()
    )
}

/// Suffix for resized exports: `resized_{w}x{h}`.
pub fn resized_suffix(width: u32, height: u32) -> String {
    format!("resized_{}x{}", width, height)
}
