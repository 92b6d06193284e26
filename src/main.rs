//Enable more cargo lint tests
#![warn(rust_2018_idioms)]
#![warn(clippy::disallowed_types)]

use huff::compression::compress::compress;
use huff::compression::decompress::decompress;
use huff::tools::cli::{huffopts_init, Mode};

use log::{error, info, LevelFilter};
use simplelog::{Config, TermLogger, TerminalMode};

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

fn main() {
    // Available log levels are Error, Warn, Info, Debug, Trace. The cli narrows this down.
    if let Err(e) = TermLogger::init(
        LevelFilter::Trace,
        Config::default(),
        TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    ) {
        eprintln!("Could not start logging: {}", e);
    }

    let options = huffopts_init();

    //----- Figure how what we need to do and go do it
    let result = match options.op_mode {
        Mode::Encode => compress(&options).map(|_| ()),
        Mode::Decode => decompress(&options).map(|_| ()),
    };

    if let Err(e) = result {
        error!("{}", e);
        std::process::exit(1);
    }
    info!("Done.");
}
