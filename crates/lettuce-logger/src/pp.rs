//! Value-returning pretty-print facade
//!
//! [`pp`] logs a value at PRETTY severity together with the text of the
//! expression that produced it, then hands the value back. The label is
//! recovered at runtime from the caller's source line, which is a heuristic:
//! only the first line of the call is looked at, and any failure falls back to
//! the label `var`. The [`pp!`](crate::pp!) macro captures the label at compile
//! time instead.

use std::any::Any;
use std::borrow::Cow;
use std::fmt::Debug;
use std::panic::Location;
use std::sync::Arc;

use crate::logger::Logger;
use crate::logging::source::source_line;
use crate::logging::CallSite;
use crate::registry;

/// Label used when the call-site text cannot be recovered
pub const FALLBACK_LABEL: &str = "var";

/// Log `value` through the default logger and return it unchanged
///
/// Strings are logged as-is. Anything else is logged as
/// `<expression> = <debug repr>`, or with the representation on the following
/// lines when it spans several. Nothing is logged when no default logger is
/// installed.
///
/// `value` must be `'static` because strings are recognised at runtime, so
/// borrowed values such as `pp(&items)` or `pp(name.as_str())` do not compile.
/// Use [`pp!`](crate::pp!) for those.
///
/// # Example
///
/// ```no_run
/// use lettuce_logger::pp;
///
/// let total = pp(2 + 3) * 10;
/// assert_eq!(total, 50);
/// ```
#[track_caller]
pub fn pp<T: Debug + 'static>(value: T) -> T {
    if let Ok(logger) = registry::default_logger() {
        pretty_print(&logger, &value, "pp", Location::caller());
    }
    value
}

/// Like [`pp`], but logs through `logger`
#[track_caller]
pub fn pp_with<T: Debug + 'static>(logger: &Logger, value: T) -> T {
    pretty_print(logger, &value, "pp_with", Location::caller());
    value
}

fn pretty_print<T: Debug + 'static>(
    logger: &Logger,
    value: &T,
    callee: &str,
    location: &'static Location<'static>,
) {
    let call_site = CallSite::from_caller(location);
    let message = match as_text(value) {
        Some(text) => text.to_string(),
        None => {
            let line = source_line(location.file(), location.line());
            let label = expression_label(line.as_deref(), callee);
            render(&label, value)
        }
    };
    logger.pp_at(message, call_site);
}

/// Format a labelled value the way pretty records show it
pub fn render<T: Debug + ?Sized>(label: &str, value: &T) -> String {
    let repr = format!("{:?}", value);
    if repr.contains('\n') {
        format!("{} =\n{}", label, repr)
    } else {
        format!("{} = {}", label, repr)
    }
}

/// Extract the argument text of a call to `callee` from one source line
///
/// Finds the first `callee(` that is neither part of a longer identifier nor a
/// method call, and takes everything up to its matching `)` on the same line.
/// For `pp_with` the first argument (the logger) is dropped. Returns
/// [`FALLBACK_LABEL`] when the line is missing or the call does not close on it.
pub fn expression_label(line: Option<&str>, callee: &str) -> String {
    line.and_then(|line| call_arguments(line, callee))
        .map(|args| match callee {
            "pp_with" => split_top_level(args).1.unwrap_or_default(),
            _ => args,
        })
        .map(str::trim)
        .filter(|label| !label.is_empty())
        .unwrap_or(FALLBACK_LABEL)
        .to_string()
}

fn call_arguments<'a>(line: &'a str, callee: &str) -> Option<&'a str> {
    let pattern = format!("{}(", callee);
    let start = line
        .match_indices(&pattern)
        .find(|(index, _)| {
            !line[..*index]
                .chars()
                .next_back()
                .is_some_and(|c| c.is_alphanumeric() || c == '_' || c == '.')
        })
        .map(|(index, _)| index + pattern.len())?;

    let mut depth = 1usize;
    for (offset, c) in line[start..].char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&line[start..start + offset]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Split at the first comma outside any brackets
fn split_top_level(args: &str) -> (&str, Option<&str>) {
    let mut depth = 0i32;
    for (index, c) in args.char_indices() {
        match c {
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth -= 1,
            ',' if depth == 0 => return (&args[..index], Some(&args[index + 1..])),
            _ => {}
        }
    }
    (args, None)
}

fn as_text(value: &dyn Any) -> Option<&str> {
    if let Some(text) = value.downcast_ref::<&str>() {
        Some(text)
    } else if let Some(text) = value.downcast_ref::<String>() {
        Some(text)
    } else if let Some(text) = value.downcast_ref::<Cow<'static, str>>() {
        Some(text)
    } else if let Some(text) = value.downcast_ref::<Box<str>>() {
        Some(text)
    } else {
        value.downcast_ref::<Arc<str>>().map(|text| &**text)
    }
}

/// Support for the `pp!` macro; not public API
#[doc(hidden)]
pub mod __private {
    use std::fmt::Debug;

    /// Wraps a value so method resolution can prefer the text rendering
    pub struct Probe<'a, T: ?Sized>(pub &'a T);

    pub trait RenderText {
        fn render_pretty(&self, label: &str) -> String;
    }

    impl<T: AsRef<str> + ?Sized> RenderText for Probe<'_, T> {
        fn render_pretty(&self, _label: &str) -> String {
            self.0.as_ref().to_string()
        }
    }

    pub trait RenderDebug {
        fn render_pretty(&self, label: &str) -> String;
    }

    impl<T: Debug + ?Sized> RenderDebug for &Probe<'_, T> {
        fn render_pretty(&self, label: &str) -> String {
            super::render(label, self.0)
        }
    }
}

/// Log an expression at PRETTY severity and evaluate to its value
///
/// `pp!(expr)` uses the default logger, `pp!(logger => expr)` an explicit one.
/// The label is the expression text exactly as written, and the record is
/// attributed to the enclosing function. Unlike [`pp`](crate::pp()), borrowed
/// values work too.
///
/// ```no_run
/// use lettuce_logger::pp;
///
/// let items = vec![3, 1, 2];
/// let longest = pp!(&items).len();
/// ```
#[macro_export]
macro_rules! pp {
    ($logger:expr => $value:expr $(,)?) => {
        match $value {
            value => {
                {
                    #[allow(unused_imports)]
                    use $crate::__private::{RenderDebug as _, RenderText as _};
                    let message = (&$crate::__private::Probe(&value))
                        .render_pretty(::std::stringify!($value));
                    $logger.pp_at(message, $crate::call_site!());
                }
                value
            }
        }
    };
    ($value:expr $(,)?) => {
        match $crate::default_logger() {
            Ok(logger) => $crate::pp!(logger => $value),
            Err(_) => $value,
        }
    };
}
