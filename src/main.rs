use clap::Parser;
use geoip_nftset::config::Args;
use geoip_nftset::logging::init_logging;
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    // Do as little as possible in main.rs as it can't contain any tests
    dotenv::dotenv().ok();
    let args = Args::parse();
    init_logging(args.verbose)?;
    log::info!("#Start main()");

    geoip_nftset::run(&args).map_err(|e| {
        log::error!("{e}");
        e
    })
}
