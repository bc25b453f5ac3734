use std::io::{self, IsTerminal, Write};
use std::process;

use anyhow::Context;
use bytes::{BufMut, BytesMut};
use clap::Parser;

use regenum::{Alphabets, Enumerator, Language, Mode};

// Flush once this much output is buffered, or after every line on a terminal.
const CHUNK: usize = 8 * 1024;

/// Print strings matching a regular expression, one per line.
#[derive(Parser, Debug)]
#[command(name = "regenum", version, about)]
struct Args {
    /// The pattern to enumerate.
    pattern: String,

    /// Print a few representative examples instead of every match.
    #[arg(short, long)]
    examples: bool,

    /// Stop after this many strings.
    #[arg(short = 'n', long)]
    limit: Option<usize>,

    /// Characters yielded for `.`.
    #[arg(long, value_name = "CHARS")]
    dot_yields: Option<String>,

    /// Characters sampled for negated classes and unrecognized escapes.
    #[arg(long, value_name = "CHARS")]
    generic_yields: Option<String>,

    /// Characters yielded for `\s`.
    #[arg(long, value_name = "CHARS")]
    space_yields: Option<String>,

    /// Characters yielded for `\w`.
    #[arg(long, value_name = "CHARS")]
    alnum_yields: Option<String>,

    /// Characters yielded for `\d`.
    #[arg(long, value_name = "CHARS")]
    digit_yields: Option<String>,
}

impl Args {
    fn mode(&self) -> Mode {
        if self.examples {
            Mode::Examples
        } else {
            Mode::Exhaustive
        }
    }

    fn alphabets(&self) -> Alphabets {
        let mut alphabets = match self.mode() {
            Mode::Exhaustive => Alphabets::exhaustive(),
            Mode::Examples => Alphabets::examples(),
        };
        let overrides = [
            (&self.dot_yields, &mut alphabets.dot),
            (&self.generic_yields, &mut alphabets.generic),
            (&self.space_yields, &mut alphabets.space),
            (&self.alnum_yields, &mut alphabets.alnum),
            (&self.digit_yields, &mut alphabets.digit),
        ];
        for (flag, set) in overrides {
            if let Some(chars) = flag {
                *set = chars.chars().collect();
            }
        }
        alphabets
    }
}

/// Bytes to buffer before writing out.
fn chunk_size(terminal: bool) -> usize {
    if terminal {
        1
    } else {
        CHUNK
    }
}

fn run(args: &Args) -> anyhow::Result<()> {
    let enumerator = Enumerator::new(args.mode(), args.alphabets());
    let language = Language::new(args.pattern.as_str(), enumerator)
        .with_context(|| format!("invalid pattern {:?}", args.pattern))?;

    let mut out = io::stdout().lock();
    let chunk = chunk_size(out.is_terminal());
    let mut buf = BytesMut::with_capacity(CHUNK);
    let strings = language.strings().take(args.limit.unwrap_or(usize::MAX));
    for s in strings {
        let s = match s {
            Ok(s) => s,
            Err(err) => {
                // Strings produced before the failure are still valid output.
                out.write_all(&buf)?;
                out.flush()?;
                return Err(err).with_context(|| format!("cannot enumerate {:?}", args.pattern));
            }
        };
        buf.put_slice(s.as_bytes());
        buf.put_u8(b'\n');
        if buf.len() >= chunk {
            out.write_all(&buf.split())?;
            out.flush()?;
        }
    }
    out.write_all(&buf)?;
    out.flush()?;
    Ok(())
}

// Usage: regenum [--examples] [-n <limit>] <pattern>
fn main() {
    env_logger::init();
    let args = Args::parse();

    if let Err(err) = run(&args) {
        // The reader went away; stopping early is fine.
        if let Some(io_err) = err.downcast_ref::<io::Error>() {
            if io_err.kind() == io::ErrorKind::BrokenPipe {
                process::exit(0);
            }
        }
        eprintln!("regenum: {err:#}");
        process::exit(1);
    }
}
