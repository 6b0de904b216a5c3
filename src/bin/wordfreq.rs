//! Count word frequencies from a file or stdin.
//!
//! Usage: `wordfreq [THREADS] [FILE]`
//!
//! `THREADS` defaults to the available hardware parallelism and `FILE` to
//! stdin. Output is one `word count` line per distinct word, in
//! lexicographic order, on stdout; timing diagnostics go to stderr.

use std::env;
use std::error::Error;
use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::num::NonZeroUsize;
use std::process;
use std::thread;

use memmap2::Mmap;
use wordtrie::{Stopwatch, WordTrie};

fn main() {
    if let Err(err) = run() {
        eprintln!("wordfreq: {err}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let mut args = env::args().skip(1);
    let workers = match args.next() {
        Some(raw) => raw
            .parse::<NonZeroUsize>()
            .map_err(|_| format!("invalid thread count {raw:?}"))?,
        None => thread::available_parallelism().unwrap_or(NonZeroUsize::MIN),
    };
    let path = args.next();

    let input = read_input(path.as_deref())?;
    let text = input.bytes();

    let trie = {
        let _watch = Stopwatch::start(format!(
            "{workers}-thread trie build over {} bytes",
            text.len()
        ));
        WordTrie::build(text, workers)
    };

    let stdout = io::stdout().lock();
    let mut out = BufWriter::with_capacity(64 * 1024, stdout);
    let mut failed: Option<io::Error> = None;
    trie.for_each_word(|word, count| {
        if failed.is_some() {
            return;
        }
        let written = out.write_all(word).and_then(|_| writeln!(out, " {count}"));
        if let Err(err) = written {
            failed = Some(err);
        }
    });
    if let Some(err) = failed {
        return Err(err.into());
    }
    out.flush()?;
    Ok(())
}

/// The input text, either mapped from a file or buffered from stdin.
enum Input {
    Mapped(Mmap),
    Buffered(Vec<u8>),
}

impl Input {
    fn bytes(&self) -> &[u8] {
        match self {
            Input::Mapped(map) => map,
            Input::Buffered(buf) => buf,
        }
    }
}

fn read_input(path: Option<&str>) -> Result<Input, Box<dyn Error>> {
    match path {
        Some(path) => {
            let file = File::open(path).map_err(|err| format!("{path}: {err}"))?;
            if file.metadata()?.len() == 0 {
                // Zero-length files cannot be mapped.
                return Ok(Input::Buffered(Vec::new()));
            }
            // SAFETY: the mapping is read-only and the input file must not
            // be truncated while the build reads it.
            let map = unsafe { Mmap::map(&file)? };
            Ok(Input::Mapped(map))
        }
        None => {
            let mut buf = Vec::new();
            io::stdin().lock().read_to_end(&mut buf)?;
            Ok(Input::Buffered(buf))
        }
    }
}
