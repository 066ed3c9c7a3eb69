use anyhow::Context;
use std::io::{BufRead, BufReader, BufWriter, Write};

/// Opens `input` for reading; `stdin` reads the standard input and files
/// ending in `.gz` are decompressed on the fly.
///
/// ```
/// use std::io::BufRead;
/// let reader = msu::reader("tests/msu/lengths.csv").unwrap();
/// assert_eq!(reader.lines().count(), 3);
///
/// let reader = msu::reader("tests/msu/blocks.csv.gz").unwrap();
/// assert_eq!(reader.lines().count(), 16);
///
/// assert!(msu::reader("tests/msu/missing.csv").is_err());
/// ```
pub fn reader(input: &str) -> anyhow::Result<Box<dyn BufRead>> {
    let reader: Box<dyn BufRead> = if input == "stdin" {
        Box::new(BufReader::new(std::io::stdin()))
    } else {
        let path = std::path::Path::new(input);
        let file = std::fs::File::open(path)
            .with_context(|| format!("could not open {}", path.display()))?;

        if path.extension() == Some(std::ffi::OsStr::new("gz")) {
            Box::new(BufReader::new(flate2::read::MultiGzDecoder::new(file)))
        } else {
            Box::new(BufReader::new(file))
        }
    };

    Ok(reader)
}

/// Opens `output` for writing; `stdout` writes to the standard output.
pub fn writer(output: &str) -> anyhow::Result<Box<dyn Write>> {
    let writer: Box<dyn Write> = if output == "stdout" {
        Box::new(BufWriter::new(std::io::stdout()))
    } else {
        let file = std::fs::File::create(output)
            .with_context(|| format!("could not create {}", output))?;
        Box::new(BufWriter::new(file))
    };

    Ok(writer)
}
