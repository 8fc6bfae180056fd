use time::macros::format_description;
use time::OffsetDateTime;
use unicode_segmentation::UnicodeSegmentation;

pub const PREVIEW_CHARS: usize = 50;
const ELLIPSIS: &str = "...";

/// Card body: the first `limit` characters followed by an ellipsis. The
/// ellipsis is appended even when nothing was cut.
pub fn preview_text(text: &str, limit: usize) -> String {
    let mut preview: String = text.graphemes(true).take(limit).collect();
    preview.push_str(ELLIPSIS);
    preview
}

/// Long date such as `March 1st 2024, 3:04:05 pm`.
pub fn format_long_timestamp(dt: OffsetDateTime) -> String {
    let clock = dt
        .format(format_description!(
            "[hour repr:12 padding:none]:[minute]:[second] [period case:lower]"
        ))
        .unwrap_or_else(|_| dt.unix_timestamp().to_string());
    let day = dt.day();
    format!(
        "{} {}{} {}, {}",
        dt.month(),
        day,
        ordinal_suffix(day),
        dt.year(),
        clock
    )
}

fn ordinal_suffix(day: u8) -> &'static str {
    match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}
