//! FASTA reading and writing, gzip-transparent on the read side

use flate2::read::GzDecoder;
use nom::{
    bytes::complete::{tag, take_till},
    character::complete::{line_ending, not_line_ending},
    combinator::{map, opt},
    sequence::preceded,
    IResult,
};
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;
use tethys_core::error::TethysError;

/// One parsed FASTA record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FastaRecord {
    pub id: String,
    pub description: Option<String>,
    pub sequence: Vec<u8>,
}

/// Parse a FASTA header line
fn parse_header(input: &[u8]) -> IResult<&[u8], (&str, Option<&str>)> {
    let (input, _) = tag(b">")(input)?;
    let (input, id) = map(
        take_till(|c: u8| c == b' ' || c == b'\t' || c == b'\n' || c == b'\r'),
        |s| std::str::from_utf8(s).unwrap_or(""),
    )(input)?;
    let (input, description) = opt(preceded(
        tag(b" "),
        map(not_line_ending, |s| std::str::from_utf8(s).unwrap_or("")),
    ))(input)?;
    let (input, _) = opt(line_ending)(input)?;
    Ok((input, (id, description)))
}

/// Collect sequence lines until the next header or EOF
fn parse_sequence(input: &[u8]) -> IResult<&[u8], Vec<u8>> {
    let mut sequence = Vec::new();
    let mut remaining = input;

    while !remaining.is_empty() && remaining[0] != b'>' {
        let (rest, line) =
            take_till::<_, _, nom::error::Error<_>>(|c: u8| c == b'\n' || c == b'\r')(remaining)?;
        let (rest, _) = opt(line_ending)(rest)?;

        for &c in line {
            if !c.is_ascii_whitespace() {
                sequence.push(c.to_ascii_uppercase());
            }
        }
        remaining = rest;
    }

    Ok((remaining, sequence))
}

/// Parse FASTA records from raw bytes
pub fn parse_fasta_from_bytes(data: &[u8]) -> Result<Vec<FastaRecord>, TethysError> {
    let mut records = Vec::new();
    let mut remaining = data;

    loop {
        // Skip blank lines between records
        while !remaining.is_empty() && remaining[0].is_ascii_whitespace() {
            remaining = &remaining[1..];
        }
        if remaining.is_empty() {
            break;
        }
        if remaining[0] != b'>' {
            return Err(TethysError::Parse(
                "FASTA record does not start with '>'".to_string(),
            ));
        }

        let (rest, (id, description)) = parse_header(remaining)
            .map_err(|_| TethysError::Parse("Failed to parse FASTA header".to_string()))?;
        if id.is_empty() {
            return Err(TethysError::Parse("Empty FASTA record id".to_string()));
        }
        let (rest, sequence) = parse_sequence(rest)
            .map_err(|_| TethysError::Parse(format!("Failed to parse sequence for '{}'", id)))?;

        records.push(FastaRecord {
            id: id.to_string(),
            description: description.map(|d| d.trim().to_string()).filter(|d| !d.is_empty()),
            sequence,
        });
        remaining = rest;
    }

    Ok(records)
}

/// Read a FASTA file, decompressing transparently when the path ends in `.gz`
pub fn read_fasta<P: AsRef<Path>>(path: P) -> Result<Vec<FastaRecord>, TethysError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| {
        TethysError::Io(std::io::Error::new(
            e.kind(),
            format!("{}: {}", path.display(), e),
        ))
    })?;

    let mut data = Vec::new();
    if path.extension().and_then(|e| e.to_str()) == Some("gz") {
        GzDecoder::new(file).read_to_end(&mut data)?;
    } else {
        let mut file = file;
        file.read_to_end(&mut data)?;
    }

    parse_fasta_from_bytes(&data)
}

/// Write records as FASTA, wrapping sequence lines at 60 columns
pub fn write_fasta<'a, P, I>(path: P, records: I) -> Result<usize, TethysError>
where
    P: AsRef<Path>,
    I: IntoIterator<Item = (&'a str, &'a [u8])>,
{
    let file = File::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);
    let mut written = 0usize;

    for (header, sequence) in records {
        writeln!(writer, ">{}", header)?;
        for chunk in sequence.chunks(60) {
            writer.write_all(chunk)?;
            writer.write_all(b"\n")?;
        }
        written += 1;
    }
    writer.flush()?;
    Ok(written)
}
