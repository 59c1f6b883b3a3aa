use std::ffi::OsString;

use kulgad::utils::parse_switch;
use kulgad::{Error, Request, DEFAULT_HOST, DEFAULT_PORT};

pub const HELP: &str = "\
kulgad-cli - switch and query relay channels on a kulgad controller

USAGE:
  kulgad-cli [OPTIONS] <set|get|on|off|CHANNELS>...

The device address is given with --host/--port only; a leading
positional host and port are not accepted.

Words and channels may appear in any order, e.g.
  kulgad-cli set 0-4,7,10-12 off
  kulgad-cli -s -on 10-20 -g
  kulgad-cli get all

COMMANDS:
  set, -s               Switch the given channels (needs on or off)
  get, -g               Read back the state of the given channels
  on, -on               Value for set: switch on
  off, -off             Value for set: switch off

CHANNELS:
  all | A | A-B | A,B,C and any mix of those, channels 0-255.
  Write them without spaces (1,2,3,7-9) unless -w is given.

OPTIONS:
  -h, --help                Prints help information
  --host <host>             Device host (default: localhost)
  --port <port>             Device port (default: 3001)
  --value <state>           Value for set: on/off, true/false or 1/0
  -w, --allow-whitespace    Strip whitespace from channel lists before parsing
  -v, --verbose             Show frames and connection details
";

#[derive(Debug)]
pub struct AppArgs {
    pub host: String,
    pub port: u16,
    pub request: Request,
    pub specs: Vec<String>,
    pub allow_whitespace: bool,
    pub verbose: bool,
}

pub fn parse_args() -> Result<AppArgs, Error> {
    let mut pargs = pico_args::Arguments::from_env();

    if pargs.contains(["-h", "--help"]) {
        print!("{}", HELP);
        std::process::exit(0);
    }

    from_arguments(pargs)
}

fn from_arguments(mut pargs: pico_args::Arguments) -> Result<AppArgs, Error> {
    let host: Option<String> = pargs.opt_value_from_str("--host").map_err(option_error)?;
    let port: Option<u16> = pargs.opt_value_from_str("--port").map_err(option_error)?;
    let value: Option<bool> = pargs
        .opt_value_from_fn("--value", |s| {
            parse_switch(s).ok_or("expected on/off, true/false or 1/0")
        })
        .map_err(option_error)?;
    let allow_whitespace = pargs.contains(["-w", "--allow-whitespace"]);
    let verbose = pargs.contains(["-v", "--verbose"]);

    let mut request = Request::default();
    if let Some(value) = value {
        set_value(&mut request, value)?;
    }
    let mut specs = Vec::new();

    for arg in pargs.finish() {
        let token = into_string(arg)?;
        match token.to_ascii_lowercase().as_str() {
            "set" | "-s" => request.set = true,
            "get" | "-g" => request.get = true,
            "on" | "-on" => set_value(&mut request, true)?,
            "off" | "-off" => set_value(&mut request, false)?,
            _ if token.starts_with('-') => {
                return Err(Error::usage(format!("unknown option '{}'", token)));
            }
            _ => specs.push(token),
        }
    }

    request.validate_phases()?;
    if specs.is_empty() {
        return Err(Error::usage(
            "no channels given, use e.g. 1,2,3 or 7-12 or all",
        ));
    }

    Ok(AppArgs {
        host: host.unwrap_or_else(|| DEFAULT_HOST.to_string()),
        port: port.unwrap_or(DEFAULT_PORT),
        request,
        specs,
        allow_whitespace,
        verbose,
    })
}

fn set_value(request: &mut Request, value: bool) -> Result<(), Error> {
    match request.value {
        Some(previous) if previous != value => {
            Err(Error::usage("conflicting values: both on and off given"))
        }
        _ => {
            request.value = Some(value);
            Ok(())
        }
    }
}

fn into_string(arg: OsString) -> Result<String, Error> {
    arg.into_string()
        .map_err(|arg| Error::usage(format!("argument is not valid UTF-8: {:?}", arg)))
}

fn option_error(e: pico_args::Error) -> Error {
    Error::usage(e.to_string())
}
