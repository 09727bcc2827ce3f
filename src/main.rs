use argh::FromArgs;
use log::LevelFilter;
use std::fs::File;
use std::io::{self, BufWriter, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use arith_codec::utils::log::init_logging;
use arith_codec::{CodecError, Result, compress, decompress};

#[derive(FromArgs)]
/// Compress an image into 2x2 block words, or decompress such a stream back
/// into a PPM. Output is written to standard output.
struct Args {
    /// compress the input image
    #[argh(switch, short = 'c')]
    compress: bool,

    /// decompress the input stream
    #[argh(switch, short = 'd')]
    decompress: bool,

    /// print debug diagnostics on standard error
    #[argh(switch, short = 'v')]
    verbose: bool,

    /// input file; standard input when omitted
    #[argh(positional)]
    input: Option<PathBuf>,
}

enum Mode {
    Compress,
    Decompress,
}

fn run(args: &Args) -> Result<()> {
    let mode = match (args.compress, args.decompress) {
        (true, false) => Mode::Compress,
        (false, true) => Mode::Decompress,
        _ => {
            return Err(CodecError::InvalidArg(
                "exactly one of -c or -d is required".into(),
            ));
        }
    };

    let input: Box<dyn Read> = match &args.input {
        Some(path) => Box::new(File::open(path)?),
        None => Box::new(io::stdin().lock()),
    };
    let output = BufWriter::new(io::stdout().lock());

    match mode {
        Mode::Compress => compress(input, output),
        Mode::Decompress => decompress(input, output),
    }
}

fn main() -> ExitCode {
    let args: Args = argh::from_env();

    let level = if args.verbose { LevelFilter::Debug } else { LevelFilter::Warn };
    if let Err(e) = init_logging(level) {
        eprintln!("arith40: {}", e);
    }

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("arith40: {}", e);
            ExitCode::FAILURE
        }
    }
}
