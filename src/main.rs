use tracing_subscriber::EnvFilter;

fn init_logging(verbose: bool) {
    let default = if verbose { "firescrape=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    use clap::Parser;
    use std::error::Error;
    let argv = firescrape::cli::strip_script_args(std::env::args_os());
    let args = firescrape::cli::Args::parse_from(argv);
    init_logging(args.verbose);
    if let Err(e) = firescrape::cli::run(&args) {
        eprintln!("❌ Error: {}", e);
        if args.verbose {
            let mut source = e.source();
            while let Some(s) = source {
                eprintln!("  cause: {}", s);
                source = s.source();
            }
        }
        std::process::exit(e.exit_code());
    }
}
