use std::env;
use std::process;

use id3_reader::{load_many, LoadOptions};
use log::{LevelFilter, Log, Metadata, Record};

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

/// Writes every record to stderr so stdout only carries tag lines.
struct StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let module = record.module_path().unwrap_or_default();
            eprintln!("{} {}: {}", record.level(), module, record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

fn log_level() -> LevelFilter {
    env::var("ID3_READER_LOG")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(LevelFilter::Warn)
}

fn main() {
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(log_level());
    }

    let mut options = LoadOptions::default();
    let mut paths = Vec::new();

    for arg in env::args().skip(1) {
        match arg.as_str() {
            "--no-id3v1" => options = options.try_id3v1(false),
            _ => paths.push(arg),
        }
    }

    if paths.is_empty() {
        eprintln!("usage: id3-reader [--no-id3v1] FILES...");
        process::exit(1);
    }

    let mut failed = false;

    for (path, result) in paths.iter().zip(load_many(&paths, &options)) {
        match result {
            Ok(tag) => println!("{}", tag.summary_line()),
            Err(err) => {
                eprintln!("{}: {}", path, err);
                failed = true;
            }
        }
    }

    if failed {
        process::exit(1);
    }
}
