use clap::Parser;
use std::error::Error;
use vpc_waste_audit::args::Args;
use vpc_waste_audit::config::AuditConfig;
use vpc_waste_audit::{logging, open_provider, run};

fn main() -> Result<(), Box<dyn Error>> {
    // Do as little as possible in main.rs as it can't contain any tests
    dotenv::dotenv().ok();
    let args = Args::parse();
    let config = AuditConfig::from_env(&args.region, args.verbosity())?;
    logging::init(config.verbosity)?;
    log::info!("#Start main() region={}", config.region);

    let api = open_provider(&config)?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run(args.command, &config, api.as_ref(), &mut out)
}
