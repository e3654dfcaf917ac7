//! Escaping and date formats used in rendered output.

use chrono::{DateTime, TimeZone, Utc};
use std::fmt::Display;

/// Escape `&`, `"`, `<` and `>` for HTML and XML text. Carriage returns and
/// line feeds are dropped so the result always stays on one line.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\r' | '\n' => {}
            _ => out.push(c),
        }
    }
    out
}

/// C `ctime` layout without the trailing newline: `Mon Nov 24 18:22:48 1986`.
pub fn ctime<Tz: TimeZone>(time: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    time.format("%a %b %e %H:%M:%S %Y").to_string()
}

/// RFC 822 date in GMT: `Wed, 02 Oct 2002 13:00:00 GMT`.
pub fn rfc822(time: &DateTime<Utc>) -> String {
    time.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}
