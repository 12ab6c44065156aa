use std::collections::HashMap;
use std::ffi::OsStr;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use anyhow::{Context, Result, bail};
use flate2::read::MultiGzDecoder;

///
/// Get a reader for either a gzip'd or non-gzip'd file.
///
/// # Arguments
///
/// - path: path to the file to read
///
pub fn get_dynamic_reader(path: &Path) -> Result<BufReader<Box<dyn Read>>> {
    let is_gzipped = path.extension() == Some(OsStr::new("gz"));
    let file = File::open(path).with_context(|| format!("Failed to open file: {:?}", path))?;
    let file: Box<dyn Read> = match is_gzipped {
        true => Box::new(MultiGzDecoder::new(file)),
        false => Box::new(file),
    };
    Ok(BufReader::new(file))
}

///
/// Load a multi-FASTA file fully into memory, keyed by the first word of
/// each `>` header. Line breaks inside a sequence are joined; case is kept
/// as written.
///
/// Used for the sequence-consistency checks around rebasing, which need
/// random access into whole chromosome sequences.
///
pub fn read_multi_fasta(path: &Path) -> Result<HashMap<String, String>> {
    let reader = get_dynamic_reader(path)?;

    let mut sequences: HashMap<String, String> = HashMap::new();
    let mut current_name: Option<String> = None;
    let mut current_seq = String::new();

    for line in reader.lines() {
        let line = line?;
        if let Some(header) = line.strip_prefix('>') {
            if let Some(name) = current_name.take() {
                sequences.insert(name, std::mem::take(&mut current_seq));
            }
            let name = header.split_whitespace().next().unwrap_or_default();
            if name.is_empty() {
                bail!("FASTA header with no sequence name in {:?}", path);
            }
            current_name = Some(name.to_string());
        } else if !line.trim().is_empty() {
            if current_name.is_none() {
                bail!("Sequence data before any FASTA header in {:?}", path);
            }
            current_seq.push_str(line.trim_end());
        }
    }
    if let Some(name) = current_name {
        sequences.insert(name, current_seq);
    }

    Ok(sequences)
}

///
/// Read a chromosome-length table: whitespace-separated integers, one per
/// chromosome, in the same order as the chromosomes first appear in the
/// inference VCF. Written out at infer time alongside the personalised
/// reference.
///
pub fn read_chrom_sizes(path: &Path) -> Result<Vec<u32>> {
    let mut contents = String::new();
    get_dynamic_reader(path)?.read_to_string(&mut contents)?;

    contents
        .split_whitespace()
        .map(|token| {
            token
                .parse::<u32>()
                .with_context(|| format!("Invalid chromosome length {} in {:?}", token, path))
        })
        .collect()
}
