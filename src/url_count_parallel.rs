use std::fs::File;
use std::io;
use std::path::Path;
use std::process::exit;
use std::time::Instant;

use log::{error, info, LevelFilter};

use url_count::emit::write_ranking;
use url_count::error::CountError;
use url_count::logging::set_logger_or_exit;
use url_count::pipeline;
use url_count::top_k::SelectStrategy;
use url_count::util::*;

fn main() {
    let conf = parse_args("parallel URL frequency count");
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
    // chunked reads need a seekable file, stdin won't do here
    let input = conf
        .input
        .as_ref()
        .ok_or_else(|| CountError::Config("an input file is required".to_string()))?;
    let strategy: SelectStrategy = conf.strategy.parse().map_err(CountError::Config)?;

    let ranking = pipeline::run(Path::new(input), conf.threads, conf.top, strategy)?;

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
