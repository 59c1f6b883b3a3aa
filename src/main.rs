mod parse_args;

use std::process::ExitCode;

use kulgad::{
    strip_whitespace, ChannelSet, Error, Session, SessionConfig, WsTransport, MAX_CHANNEL,
};

use parse_args::AppArgs;

fn main() -> ExitCode {
    let args = match parse_args::parse_args() {
        Ok(args) => args,
        Err(e) => return fail(&e),
    };

    init_logger(args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => fail(&e),
    }
}

fn init_logger(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .format_target(false)
        .init();
}

fn run(args: &AppArgs) -> kulgad::Result<()> {
    let specs: Vec<String> = if args.allow_whitespace {
        args.specs.iter().map(|s| strip_whitespace(s)).collect()
    } else {
        args.specs.clone()
    };

    // Everything that can be rejected without the device is rejected here.
    let channels = ChannelSet::parse_many(&specs, MAX_CHANNEL)?;
    args.request.validate(&channels)?;
    log::debug!("channels: {}", channels);

    let transport = WsTransport::connect(&args.host, args.port)?;
    log::info!("Connected to {}:{}", args.host, args.port);

    let mut session = Session::new(transport, SessionConfig::default());
    let outcome = session.run(&channels, &args.request)?;
    if let Some(report) = outcome.report {
        println!("{}", report);
    }

    session.close()
}

fn fail(e: &Error) -> ExitCode {
    eprintln!("Error: {}", e);
    if matches!(e, Error::Usage { .. }) {
        eprint!("\n{}", parse_args::HELP);
    }
    ExitCode::FAILURE
}
