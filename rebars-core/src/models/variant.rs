use std::fmt::{self, Display};
use std::fs::File;
use std::io::{BufRead, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::Result;
use flate2::Compression;
use flate2::write::GzEncoder;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::errors::RebaseError;
use crate::utils::get_dynamic_reader;

///
/// One variant call: a chromosome, a 1-based position, a REF sequence and
/// one or more ALT sequences.
///
/// Inference records additionally carry the allele the inference step
/// selected for the personalised reference (`genotype`); 0 means the REF
/// allele, `None` means no call, which is treated the same as REF.
/// Discovery records leave `genotype` unset.
///
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VariantRecord {
    pub chrom: String,
    pub pos: u32,
    pub reference: String,
    pub alts: Vec<String>,
    pub genotype: Option<usize>,
}

impl VariantRecord {
    pub fn new(
        chrom: impl Into<String>,
        pos: u32,
        reference: impl Into<String>,
        alts: &[&str],
    ) -> Self {
        VariantRecord {
            chrom: chrom.into(),
            pos,
            reference: reference.into(),
            alts: alts.iter().map(|alt| alt.to_string()).collect(),
            genotype: None,
        }
    }

    /// Attach the allele index selected at inference time.
    pub fn with_genotype(mut self, genotype: usize) -> Self {
        self.genotype = Some(genotype);
        self
    }

    /// The allele the inference step put into the personalised reference.
    /// A missing call counts as allele 0, the REF allele.
    pub fn picked_allele(&self) -> usize {
        self.genotype.unwrap_or(0)
    }

    /// Parse one VCF body line. Only CHROM, POS, REF, ALT and the GT field
    /// of the first sample (when FORMAT/sample columns are present) are
    /// retained; the remaining columns carry nothing the rebasing tools use.
    pub fn from_vcf_line(line: &str) -> Result<Self, RebaseError> {
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < 5 {
            return Err(RebaseError::MalformedRecord(format!(
                "expected at least 5 tab-separated fields, got {}: {}",
                fields.len(),
                line
            )));
        }

        let pos: u32 = fields[1].parse().map_err(|_| {
            RebaseError::MalformedRecord(format!("invalid POS {}: {}", fields[1], line))
        })?;

        let alts: Vec<String> = match fields[4] {
            "." => Vec::new(),
            alt_field => alt_field.split(',').map(|alt| alt.to_string()).collect(),
        };

        let genotype = if fields.len() >= 10 {
            parse_genotype(fields[8], fields[9], line)?
        } else {
            None
        };

        Ok(VariantRecord {
            chrom: fields[0].to_string(),
            pos,
            reference: fields[3].to_string(),
            alts,
            genotype,
        })
    }
}

/// Extract the first allele of the GT field from a FORMAT/sample column
/// pair. `./.` and a missing GT key both come back as `None`.
fn parse_genotype(format: &str, sample: &str, line: &str) -> Result<Option<usize>, RebaseError> {
    let Some(gt_index) = format.split(':').position(|key| key == "GT") else {
        return Ok(None);
    };
    let Some(gt) = sample.split(':').nth(gt_index) else {
        return Ok(None);
    };

    let first = gt
        .split(['/', '|'])
        .next()
        .unwrap_or(".");

    if first == "." {
        return Ok(None);
    }
    let allele = first.parse::<usize>().map_err(|_| {
        RebaseError::MalformedRecord(format!("invalid GT {}: {}", gt, line))
    })?;
    Ok(Some(allele))
}

impl Display for VariantRecord {
    /// Render the record as a VCF body line. Columns the models do not
    /// track are written as missing values. A selected allele is rendered
    /// as a haploid GT call (`GT` + a single allele index), the form the
    /// inference step emits for a haploid personalised reference.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let alts = if self.alts.is_empty() {
            ".".to_string()
        } else {
            self.alts.join(",")
        };
        write!(
            f,
            "{}\t{}\t.\t{}\t{}\t.\t.\t.",
            self.chrom, self.pos, self.reference, alts
        )?;
        if let Some(genotype) = self.genotype {
            write!(f, "\tGT\t{}", genotype)?;
        }
        Ok(())
    }
}

///
/// VariantSet struct, the representation of a VCF file: its body records
/// plus the header block, kept verbatim so it can serve as a template when
/// writing records back out.
///
#[derive(Clone, Debug)]
pub struct VariantSet {
    pub records: Vec<VariantRecord>,
    pub header: Option<String>,
    pub path: Option<PathBuf>,
}

pub struct VariantSetIterator<'a> {
    variant_set: &'a VariantSet,
    index: usize,
}

impl VariantSet {
    pub fn new(records: Vec<VariantRecord>) -> Self {
        VariantSet {
            records,
            header: None,
            path: None,
        }
    }

    /// Carry over the header block of another set, typically the file the
    /// records were discovered in, so output files keep its metadata.
    pub fn with_header_from(mut self, template: &VariantSet) -> Self {
        self.header = template.header.clone();
        self
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> VariantSetIterator<'_> {
        VariantSetIterator {
            variant_set: self,
            index: 0,
        }
    }

    ///
    /// Write the set as VCF text. A `.gz` extension switches on gzip
    /// compression. Sets without a header get a minimal one so the file
    /// stays parseable.
    ///
    pub fn to_vcf(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let file = File::create(path)?;
        let is_gzipped = path.extension() == Some(std::ffi::OsStr::new("gz"));
        let mut writer: Box<dyn Write> = match is_gzipped {
            true => Box::new(BufWriter::new(GzEncoder::new(file, Compression::default()))),
            false => Box::new(BufWriter::new(file)),
        };

        match &self.header {
            Some(header) => writeln!(writer, "{}", header)?,
            None => {
                writeln!(writer, "##fileformat=VCFv4.2")?;
                writeln!(writer, "#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO")?;
            }
        }
        for record in &self.records {
            writeln!(writer, "{}", record)?;
        }
        writer.flush()?;
        Ok(())
    }
}

impl TryFrom<&Path> for VariantSet {
    type Error = anyhow::Error;

    ///
    /// Create a new [VariantSet] from a VCF file, plain or gzipped.
    ///
    /// # Arguments:
    /// - value: path to the VCF file on disk.
    fn try_from(value: &Path) -> Result<Self> {
        let reader = get_dynamic_reader(value)?;

        let mut records: Vec<VariantRecord> = Vec::new();
        let mut header_lines: Vec<String> = Vec::new();

        for line in reader.lines() {
            let line = line?;
            if line.is_empty() {
                continue;
            }
            if line.starts_with('#') {
                header_lines.push(line);
                continue;
            }
            records.push(VariantRecord::from_vcf_line(&line)?);
        }

        let header = if header_lines.is_empty() {
            None
        } else {
            Some(header_lines.join("\n"))
        };

        Ok(VariantSet {
            records,
            header,
            path: Some(value.to_path_buf()),
        })
    }
}

impl TryFrom<PathBuf> for VariantSet {
    type Error = anyhow::Error;

    fn try_from(value: PathBuf) -> Result<Self> {
        VariantSet::try_from(value.as_path())
    }
}

impl TryFrom<&str> for VariantSet {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self> {
        VariantSet::try_from(Path::new(value))
    }
}

impl<'a> Iterator for VariantSetIterator<'a> {
    type Item = &'a VariantRecord;

    fn next(&mut self) -> Option<Self::Item> {
        let record = self.variant_set.records.get(self.index)?;
        self.index += 1;
        Some(record)
    }
}

impl Display for VariantSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VariantSet with {} records.", self.len())
    }
}
