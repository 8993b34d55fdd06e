//! Walk through the default logger, the pretty toggle and a named logger.
//!
//! Run with `cargo run --example sample_usage`; the log files end up under
//! the directory printed at the end.

use std::collections::BTreeMap;

use lettuce_logger::{get_log_dir, get_logger, hide_pretty, pp, show_pretty, LogResult, Project};

fn main() -> LogResult<()> {
    let table: BTreeMap<&str, Vec<i32>> = [
        ("a", vec![1, 2, 3]),
        ("b", vec![4, 5, 6]),
        ("c", vec![7, 8, 9]),
    ]
    .into_iter()
    .collect();

    pp("hello");
    hide_pretty()?;
    pp("dont show me");
    show_pretty()?;
    pp("show me");
    pp(table.clone());
    lettuce_logger::pp!(table.len());

    let mylog = get_logger("mylog", Project::Default)?;
    pp("hello");
    hide_pretty()?;
    pp("dont show me");
    show_pretty()?;
    pp("show me");
    mylog.info("done");

    println!("logs written to {}", get_log_dir()?.display());
    Ok(())
}
