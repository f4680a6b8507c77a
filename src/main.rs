use clap::Parser;
use lognet::infrastructure::{run, Args};

fn main() {
    let args = Args::parse();

    // RUST_LOG wins over -v
    env_logger::Builder::new()
        .filter_level(args.log_level())
        .parse_default_env()
        .init();

    if let Err(e) = run(&args) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
