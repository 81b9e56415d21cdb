use std::fs::File;
use std::io::{self, Read};
use std::process::exit;
use std::time::Instant;

use bytes::Bytes;
use log::{error, info, LevelFilter};

use url_count::count::{count_lines, count_record};
use url_count::emit::write_ranking;
use url_count::error::CountError;
use url_count::logging::set_logger_or_exit;
use url_count::top_k::{select_top_k, SelectStrategy};
use url_count::util::*;

/// Single-threaded baseline: same counting and selection semantics as
/// the parallel binary, no planner and no workers. Doubles as an oracle
/// when checking the parallel pipeline.
fn main() {
    let conf = parse_args("sequential URL frequency count");
    let log_level = if conf.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    set_logger_or_exit(&conf.log_stream, log_level);

    let (start_usr_time, start_sys_time) = get_cputime_usecs();
    let start_time = Instant::now();

    if let Err(err) = run(&conf) {
        error!("{}", err);
        exit(1);
    }

    let difference = start_time.elapsed();
    let (end_usr_time, end_sys_time) = get_cputime_usecs();
    let usr_time = (end_usr_time - start_usr_time) as f64 / 1_000_000.0;
    let sys_time = (end_sys_time - start_sys_time) as f64 / 1_000_000.0;
    info!(
        "walltime: {:?} (usr: {:.3}s sys: {:.3}s) rss: {}",
        difference,
        usr_time,
        sys_time,
        format_mem(max_rss_bytes())
    );
}

fn run(conf: &Config) -> Result<(), CountError> {
    let strategy: SelectStrategy = conf.strategy.parse().map_err(CountError::Config)?;

    let mut buffer = Vec::new();
    match &conf.input {
        Some(filename) => {
            File::open(filename)
                .and_then(|mut file| file.read_to_end(&mut buffer))
                .map_err(CountError::Input)?;
        }
        None => {
            io::stdin()
                .read_to_end(&mut buffer)
                .map_err(CountError::Input)?;
        }
    }
    let text = Bytes::from(buffer);
    info!("read {} bytes", text.len());

    let mut frequency = FreqTable::new();
    let tail_start = text.iter().rposition(|&b| b == b'\n').map_or(0, |i| i + 1);
    let mut records = count_lines(&mut frequency, &text.slice(..tail_start));
    // unterminated tail, if any
    if count_record(&mut frequency, text.slice(tail_start..)) {
        records += 1;
    }
    info!("counted {} records, {} distinct", records, frequency.len());

    let ranking = select_top_k(&frequency, conf.top, strategy);

    match &conf.output {
        Some(filename) => {
            let mut out = File::create(filename).map_err(CountError::Output)?;
            write_ranking(&mut out, &ranking).map_err(CountError::Output)?;
            info!("wrote {} entries to {}", ranking.len(), filename);
        }
        None => {
            let stdout = io::stdout();
            write_ranking(&mut stdout.lock(), &ranking).map_err(CountError::Output)?;
        }
    }

    Ok(())
}
