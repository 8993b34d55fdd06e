//! The ordered collection of sinks attached to a logger

use std::path::Path;
use std::sync::Arc;

use super::console::ConsoleSink;
use super::file_sink::FileSink;
use super::traits::SharedSink;
use crate::error::LogResult;
use crate::level::Severity;
use crate::logger::LoggerOptions;

/// File name of the aggregate INFO sink
pub const ALL_INFO_FILE: &str = "all_info";
/// File name of the aggregate WARNING sink
pub const ALL_WARNING_FILE: &str = "all_warning";
/// File name of the aggregate PRETTY sink
pub const ALL_PP_FILE: &str = "all_pp";

/// Console sink plus the per-logger and aggregate file sinks, in emit order
#[derive(Clone)]
pub struct SinkSet {
    console: Arc<ConsoleSink>,
    sinks: Vec<SharedSink>,
}

impl std::fmt::Debug for SinkSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.sinks.iter().map(|sink| sink.name()))
            .finish()
    }
}

impl SinkSet {
    /// Build the standard layout for logger `name` under `dir`
    ///
    /// 1. console (no minimum)
    /// 2. `<name>.log` (DEBUG)
    /// 3. `all_info.log` (INFO)
    /// 4. `all_warning.log` (WARNING)
    /// 5. `all_pp.log` (PRETTY), when enabled in `options`
    pub fn build(
        name: &str,
        dir: &Path,
        options: &LoggerOptions,
        console: ConsoleSink,
    ) -> LogResult<Self> {
        let console = Arc::new(console);
        let mut sinks: Vec<SharedSink> = Vec::new();
        sinks.push(console.clone());

        let mut files = vec![
            (name, Severity::Debug),
            (ALL_INFO_FILE, Severity::Info),
            (ALL_WARNING_FILE, Severity::Warning),
        ];
        if options.pretty_aggregate_file {
            files.push((ALL_PP_FILE, Severity::Pretty));
        }

        for (file_name, minimum) in files {
            let path = dir.join(format!("{}.log", file_name));
            let sink = FileSink::open(file_name, path, minimum, options.rotation)?;
            sinks.push(Arc::new(sink));
        }

        Ok(Self { console, sinks })
    }

    pub fn console(&self) -> &ConsoleSink {
        &self.console
    }

    pub fn iter(&self) -> impl Iterator<Item = &SharedSink> {
        self.sinks.iter()
    }

    pub fn get(&self, name: &str) -> Option<&SharedSink> {
        self.sinks.iter().find(|sink| sink.name() == name)
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}
