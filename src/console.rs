//! Best-effort color console output
//!
//! A direct, unstructured diagnostic path that bypasses the channel system
//! entirely. Nothing here may crash the caller: formatting panics are
//! swallowed and write errors ignored.

use std::fmt::Debug;
use std::io::{self, Write};
use std::panic::{self, AssertUnwindSafe};

use chrono::Local;
use colored::Colorize;

/// Timestamp format for console lines
const CONSOLE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Print one green line per value, tagged with the call site.
///
/// Normally invoked through [`print_console!`](crate::print_console), which
/// supplies the call site and enclosing function.
pub fn print_values(file: &str, line: u32, function: &str, values: &[&dyn Debug]) {
    let _ = panic::catch_unwind(AssertUnwindSafe(|| {
        let mut out = String::new();
        for value in values {
            out.push_str(&format_line(file, line, function, *value));
            out.push('\n');
        }
        let stdout = io::stdout();
        let mut stdout = stdout.lock();
        let _ = stdout.write_all(out.as_bytes());
    }));
}

/// Debug-only variant: silent when the facility runs in production mode
pub fn print_values_debug(file: &str, line: u32, function: &str, values: &[&dyn Debug]) {
    if crate::facade::run_mode().is_production() {
        return;
    }
    print_values(file, line, function, values);
}

/// Report an internal logging failure on the console fallback path
pub(crate) fn report_failure(context: &str, error: &dyn std::error::Error) {
    print_values(
        file!(),
        line!(),
        "daylog",
        &[&format_args!("{context}: {error}")],
    );
}

/// `[{timestamp}][{file}:{line}] at {function}(): {value}`, in green
fn format_line(file: &str, line: u32, function: &str, value: &dyn Debug) -> String {
    let timestamp = Local::now().format(CONSOLE_TIME_FORMAT);
    let file = basename(file);
    format!("[{timestamp}][{file}:{line}] at {function}(): {value:?}")
        .green()
        .to_string()
}

fn basename(path: &str) -> &str {
    path.rsplit(|c| c == '/' || c == '\\')
        .next()
        .unwrap_or(path)
}

/// Expands to the path of the enclosing function.
#[macro_export]
macro_rules! function_path {
    () => {{
        fn f() {}
        fn type_name_of<T>(_: T) -> &'static str {
            ::std::any::type_name::<T>()
        }
        type_name_of(f).trim_end_matches("::f")
    }};
}

/// Print values directly to the console in green, tagged with the call site.
///
/// Bypasses the channel system; accepts any number of `Debug` values.
#[macro_export]
macro_rules! print_console {
    ($($value:expr),+ $(,)?) => {
        $crate::console::print_values(
            file!(),
            line!(),
            $crate::function_path!(),
            &[$(&$value as &dyn ::std::fmt::Debug),+],
        )
    };
}

/// Like [`print_console!`], but silent in production mode.
#[macro_export]
macro_rules! print_console_debug {
    ($($value:expr),+ $(,)?) => {
        $crate::console::print_values_debug(
            file!(),
            line!(),
            $crate::function_path!(),
            &[$(&$value as &dyn ::std::fmt::Debug),+],
        )
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_line_contains_call_site_and_value() {
        let line = format_line("src/console.rs", 42, "daylog::console::tests::f", &"hello");
        assert!(line.contains("[console.rs:42]"));
        assert!(line.contains("at daylog::console::tests::f():"));
        assert!(line.contains("\"hello\""));
    }

    #[test]
    fn test_basename_strips_directories() {
        assert_eq!(basename("src/console.rs"), "console.rs");
        assert_eq!(basename("a/b/c.rs"), "c.rs");
        assert_eq!(basename("windows\\path\\d.rs"), "d.rs");
        assert_eq!(basename("bare.rs"), "bare.rs");
    }

    #[test]
    fn test_function_path_names_enclosing_function() {
        let path = function_path!();
        assert!(path.contains("console::tests::test_function_path"));
        assert!(!path.ends_with("::f"));
    }

    #[test]
    fn test_print_console_accepts_mixed_values() {
        print_console!("status", 42, vec![1, 2, 3]);
        print_console_debug!("debug only");
    }
}
