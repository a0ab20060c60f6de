use std::io::{self, BufWriter, Error};
use std::path::PathBuf;
use std::process;

use structopt::StructOpt;

use log::error;

use nix::unistd::Pid;

use isolation_core::System;
use isolation_tester::Config;

/// Reports the isolation boundaries visible to this process.
#[derive(StructOpt)]
#[structopt(name = "isolation-tester")]
struct Opt {
    /// Root of the directory tree to walk
    #[structopt(short, long, default_value = "/")]
    root: PathBuf,

    /// How many levels below the root to list, negative lists nothing
    #[structopt(short, long, default_value = "0", allow_hyphen_values = true)]
    depth: i32,

    /// Process to inspect namespaces of [default: this process]
    #[structopt(short, long)]
    pid: Option<i32>,

    /// Where procfs is mounted
    #[structopt(long, default_value = "/proc")]
    proc_root: PathBuf,

    /// Process ids to print before summarising the rest
    #[structopt(long, default_value = "10")]
    max_processes: usize,
}

impl From<Opt> for Config {
    fn from(opt: Opt) -> Self {
        Config {
            root: opt.root,
            max_depth: opt.depth,
            target: opt.pid.map(Pid::from_raw),
            process_limit: opt.max_processes,
        }
    }
}

fn main() {
    let code = match run() {
        Ok(()) => exitcode::OK,
        Err(e) => {
            error!("cannot write the report: {}", e);
            exitcode::IOERR
        }
    };
    process::exit(code);
}

fn run() -> Result<(), Error> {
    let opt = Opt::from_args();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    eprintln!("Running Isolation Tester");

    let host = System::with_proc_root(&opt.proc_root);
    let config = Config::from(opt);

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    isolation_tester::run(&host, &config, &mut out)
}
