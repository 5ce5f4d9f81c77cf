use std::fmt::Display;

use colored::*;
use tracing::info;

pub const TOTAL_WIDTH: usize = 64;
pub const PRINT_TARGET: &str = "folio::print";

const KEY_WIDTH: usize = 12;
const PRIMARY: Color = Color::BrightGreen;
const SEPARATOR: Color = Color::BrightBlack;
const TEXT_DEFAULT: Color = Color::White;

pub trait WithDefaultColor {
    fn with_default(self, default_color: Color) -> ColoredString;
}

impl WithDefaultColor for &str {
    fn with_default(self, default_color: Color) -> ColoredString {
        self.color(default_color)
    }
}

impl WithDefaultColor for String {
    fn with_default(self, default_color: Color) -> ColoredString {
        self.color(default_color)
    }
}

impl WithDefaultColor for ColoredString {
    fn with_default(self, _default_color: Color) -> ColoredString {
        self
    }
}

/// Writes a line of program output through the log pipeline, unprefixed.
pub fn print(msg: &str) {
    info!(target: PRINT_TARGET, raw_msg = msg);
}

pub fn header(msg: &str) {
    let formatted: String = format!("⟦ {} ⟧", msg);
    let msg_len: usize = formatted.chars().count();

    let dash_count: usize = TOTAL_WIDTH.saturating_sub(msg_len);
    let left: usize = dash_count / 2;
    let right: usize = dash_count - left;

    let line: ColoredString = format!(
        "{}{}{}",
        "─".repeat(left),
        formatted.to_uppercase().bright_green(),
        "─".repeat(right)
    )
    .bright_black();

    print(&format!("{}", line));
}

pub fn aligned_line<V>(key: &str, value: V)
where
    V: Display + WithDefaultColor,
{
    let dots: String = ".".repeat((KEY_WIDTH + 1).saturating_sub(key.chars().count()));
    let colon: String = format!("{}{}", dots.color(SEPARATOR), ":".color(SEPARATOR));
    let value: ColoredString = value.with_default(TEXT_DEFAULT);
    print_status(format!("{}{} {}", key.color(PRIMARY), colon, value));
}

pub fn print_status<T: AsRef<str>>(msg: T) {
    let prefix: ColoredString = ">".color(SEPARATOR);
    let message: String = format!("{} {}", prefix, msg.as_ref().color(TEXT_DEFAULT));
    print(&message);
}
