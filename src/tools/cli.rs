use std::{fmt::Display, fmt::Formatter};

use clap::Parser;
use log::{info, warn};

/// Archive name used when encoding without --output.
pub const DEFAULT_ARCHIVE: &str = "encrypted.huff";
/// Frequency counting threads used when --threads is not given.
pub const DEFAULT_THREADS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Encode or Decode
pub enum Mode {
    Encode,
    Decode,
}
impl Display for Mode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Command Line Interpretation - uses external CLAP crate.
#[derive(Parser, Debug)]
#[clap(
    version,
    about = "A byte oriented huffman file compressor",
    long_about = "
    Encodes a file into a self-describing .huff archive built from the byte frequencies
    of the whole file, or decodes such an archive back into the original file.

    Encoding writes encrypted.huff unless --output is given. Decoding recreates the file
    under the name stored in the archive unless --output is given."
)]
pub struct Args {
    /// Encode FILE into an archive
    #[clap(
        short = 'e',
        long = "encode",
        value_name = "FILE",
        conflicts_with = "decode",
        required_unless_present = "decode"
    )]
    encode: Option<String>,

    /// Decode the archive FILE.huff
    #[clap(short = 'd', long = "decode", value_name = "FILE.huff")]
    decode: Option<String>,

    /// Write to this path instead of the default
    #[clap(short = 'o', long = "output", value_name = "PATH")]
    output: Option<String>,

    /// Threads used to count byte frequencies
    #[clap(short = 't', long = "threads", default_value_t = DEFAULT_THREADS)]
    threads: usize,

    /// Sets verbosity. -v shows progress, -vvv is chatty
    #[clap(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only report errors
    #[clap(short = 'q', long = "quiet", conflicts_with = "verbose")]
    quiet: bool,
}

/// Define all user settable options to control program behavior
#[derive(Debug, Clone)]
pub struct HuffOpts {
    /// Encode/Decode
    pub op_mode: Mode,
    /// File to read: the plain file when encoding, the archive when decoding
    pub file: String,
    /// Optional override for the output path
    pub output: Option<String>,
    /// Threads used for the frequency count
    pub threads: usize,
}

impl HuffOpts {
    /// Options for encoding `file` into the default archive.
    pub fn encode(file: &str) -> Self {
        Self {
            op_mode: Mode::Encode,
            file: file.to_string(),
            output: None,
            threads: DEFAULT_THREADS,
        }
    }

    /// Options for decoding the archive `file` to the path it records.
    pub fn decode(file: &str) -> Self {
        Self {
            op_mode: Mode::Decode,
            file: file.to_string(),
            output: None,
            threads: DEFAULT_THREADS,
        }
    }

    /// Copy parsed arguments into our internal structure
    pub fn from_args(args: Args) -> Self {
        let (op_mode, file) = match (args.encode, args.decode) {
            (_, Some(file)) => (Mode::Decode, file),
            (Some(file), None) => (Mode::Encode, file),
            // clap enforces one of the two
            (None, None) => (Mode::Encode, String::new()),
        };
        if args.threads == 0 {
            warn!("A thread count of 0 is not usable, counting on 1 thread");
        }
        Self {
            op_mode,
            file,
            output: args.output,
            threads: args.threads.max(1),
        }
    }
}

/// Map -q / -v counts onto a log level.
pub fn log_level(args: &Args) -> log::LevelFilter {
    if args.quiet {
        return log::LevelFilter::Error;
    }
    match args.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    }
}

/// Parse the command line, set the log level and report what we are about to do.
pub fn huffopts_init() -> HuffOpts {
    let args = Args::parse();
    log::set_max_level(log_level(&args));
    let opts = HuffOpts::from_args(args);

    info!("---- Huff Initialization Start ----");
    info!("Verbosity set to {}", log::max_level());
    info!("Operational mode set to {}", opts.op_mode);
    info!("Getting input from the file {}", opts.file);
    if let Some(out) = &opts.output {
        info!("Sending output to {}", out)
    };
    if opts.op_mode == Mode::Encode {
        info!("Counting frequencies on {} threads", opts.threads)
    };
    info!("---- Huff Initialization End ----");
    opts
}
