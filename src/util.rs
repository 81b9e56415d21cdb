use argparse::{ArgumentParser, Print, Store, StoreOption, StoreTrue};
use std::collections::HashMap;
use std::{io, mem, str};

use bytes::Bytes;
use libc::{getrusage, rusage, RUSAGE_SELF};

pub type FreqTable = HashMap<Bytes, u64>;

pub fn utf8(buf: &[u8]) -> Result<&str, io::Error> {
    str::from_utf8(buf)
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidData, "Unable to decode input as UTF8"))
}

fn rusage_self() -> rusage {
    let mut usage: rusage = unsafe { mem::zeroed() };
    unsafe {
        getrusage(RUSAGE_SELF, &mut usage);
    }
    usage
}

pub fn get_cputime_usecs() -> (u64, u64) {
    let usage = rusage_self();

    let u_secs = usage.ru_utime.tv_sec as u64;
    let u_usecs = usage.ru_utime.tv_usec as u64;
    let s_secs = usage.ru_stime.tv_sec as u64;
    let s_usecs = usage.ru_stime.tv_usec as u64;

    let u_time = (u_secs * 1_000_000) + u_usecs;
    let s_time = (s_secs * 1_000_000) + s_usecs;

    (u_time, s_time)
}

/// Peak resident set size of this process; ru_maxrss is reported in KiB.
pub fn max_rss_bytes() -> u64 {
    rusage_self().ru_maxrss as u64 * 1024
}

pub fn format_mem(bytes: u64) -> String {
    format!("{}MB", bytes / (1024 * 1024))
}

pub struct Config {
    pub input: Option<String>,
    pub output: Option<String>,
    pub threads: usize,
    pub top: usize,
    pub strategy: String,
    pub log_stream: String,
    pub verbose: bool,
}

pub fn parse_args(description: &str) -> Config {
    let mut conf: Config = Config {
        input: None,
        output: None,
        threads: 8,
        top: 100,
        strategy: "heap".to_string(),
        log_stream: "-".to_string(),
        verbose: false,
    };

    {
        // this block limits scope of borrows by ap.refer() method
        let mut ap = ArgumentParser::new();

        ap.set_description(description);
        ap.add_option(
            &["-V", "--version"],
            Print(env!("CARGO_PKG_VERSION").to_string()),
            "Show version",
        );

        ap.refer(&mut conf.input)
            .add_argument("input", StoreOption, "input file - default: stdin");

        ap.refer(&mut conf.output).add_argument(
            "output",
            StoreOption,
            "result file - default: stdout",
        );

        ap.refer(&mut conf.threads).add_option(
            &["-t", "--threads"],
            Store,
            "worker count - default: 8",
        );

        ap.refer(&mut conf.top).add_option(
            &["-k", "--top"],
            Store,
            "number of entries to report - default: 100",
        );

        ap.refer(&mut conf.strategy).add_option(
            &["-s", "--select"],
            Store,
            "selection strategy, \"heap\" or \"sort\" - default: heap",
        );

        ap.refer(&mut conf.log_stream).add_option(
            &["-l", "--log"],
            Store,
            "log file, also echoed to the terminal; \"-\" for terminal only - default: -",
        );

        ap.refer(&mut conf.verbose).add_option(
            &["-v", "--verbose"],
            StoreTrue,
            "log per-range progress",
        );

        ap.parse_args_or_exit();
    }

    return conf;
}
