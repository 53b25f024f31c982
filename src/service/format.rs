//! Title and file size formatting for downloadable results.

/// Size units, base 1024. TB is the ceiling.
const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// Format a file result title as `"{title} ({TYPE} {size})"`.
///
/// Only surrounding whitespace is trimmed from the title; the file type is
/// ASCII-uppercased.
///
/// ```
/// use funnelback_search::service::format_file_title;
///
/// assert_eq!(
///     format_file_title(" test trimmed file  ", "pdf", 1_048_576),
///     "test trimmed file (PDF 1MB)"
/// );
/// ```
pub fn format_file_title(title: &str, file_type: &str, file_size_bytes: u64) -> String {
    format!(
        "{} ({} {})",
        title.trim(),
        file_type.to_ascii_uppercase(),
        format_file_size_string(file_size_bytes)
    )
}

/// Render a byte count in the largest unit it reaches, rounded to a whole
/// number with no space before the unit (`44040192` -> `"42MB"`).
///
/// Sizes of 1024 TB and above stay in TB.
pub fn format_file_size_string(file_size_bytes: u64) -> String {
    let index = unit_index(file_size_bytes);
    let scaled = file_size_bytes as f64 / 1024_f64.powi(index as i32);

    // f64::round rounds half away from zero
    format!("{}{}", scaled.round() as u64, UNITS[index])
}

/// floor(log1024(bytes)) clamped to the last unit, computed on integers so
/// exact powers of 1024 never land one unit low.
fn unit_index(bytes: u64) -> usize {
    let mut index = 0;
    let mut threshold: u64 = 1024;
    while index < UNITS.len() - 1 && bytes >= threshold {
        index += 1;
        threshold = threshold.saturating_mul(1024);
    }
    index
}
