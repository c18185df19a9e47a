use clap::Parser;
use clap::error::ErrorKind;
use log::{error, info};
use std::path::PathBuf;
use std::process::ExitCode;

use pe_resource_dump::config::Config;
use pe_resource_dump::dump_worker::DumpWorker;
use pe_resource_dump::pipeline::fs_ops::ensure_dir;
use pe_resource_dump::resource::{PeResources, ResourceProvider};

/// Dump every resource of an EXE/DLL, rebuilding icons and cursors into ICO/CUR files.
#[derive(Parser, Debug)]
#[command(name = "pe-resource-dump", version)]
struct Cli {
    /// EXE or DLL file to read resources from
    executable: PathBuf,
    /// Directory the resources are written to
    output_dir: PathBuf,
    /// Worker threads (0 = one per core)
    #[arg(short = 'j', long = "threads", default_value_t = 0)]
    threads: usize,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::from(1),
            };
        }
    };
    let config = Config::new(cli.executable, cli.output_dir).with_threads(cli.threads);

    let resources = match PeResources::open(&config.exe_path) {
        Ok(resources) => resources,
        Err(e) => {
            error!("Opening PE file: {:#}", e);
            return ExitCode::from(1);
        }
    };
    if resources.is_empty() {
        error!("The EXE/DLL file does not have any resources");
        return ExitCode::from(2);
    }
    if let Err(e) = ensure_dir(&config.output_dir) {
        error!(
            "Cannot create directory '{}': {}",
            config.output_dir.display(),
            e
        );
        return ExitCode::from(1);
    }

    let summary = DumpWorker::new(&resources, config.thread_count).run(&config.output_dir);
    info!(
        "Wrote {} resources to {} ({} failed)",
        summary.written,
        config.output_dir.display(),
        summary.failed
    );
    ExitCode::SUCCESS
}
