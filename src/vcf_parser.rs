use crate::missing::INT32_MISSING;
use crate::types::{tag, GenotypeCall, HeaderInfo, Quality, ScalarType, SvRecord};
use anyhow::{Context, Result};
use rust_htslib::bcf::header::{HeaderRecord, HeaderView};
use rust_htslib::{bcf, bcf::Read};
use std::path::Path;

fn scalar_type(type_name: &str) -> ScalarType {
    match type_name {
        "Flag" => ScalarType::Flag,
        "Integer" => ScalarType::Integer,
        "Float" => ScalarType::Real,
        _ => ScalarType::Text,
    }
}

/// Probe the header for every tag the statistics use.
///
/// Site-level tags count as declared only through an INFO line and
/// per-sample tags only through a FORMAT line; the declared `Type` of that
/// line decides how values are read.
pub fn header_info(view: &HeaderView) -> HeaderInfo {
    let samples = view
        .samples()
        .iter()
        .map(|s| String::from_utf8_lossy(s).to_string())
        .collect();

    view.header_records()
        .into_iter()
        .filter_map(|record| match record {
            HeaderRecord::Info { values, .. } => Some((tag::INFO_TAGS, values)),
            HeaderRecord::Format { values, .. } => Some((tag::FORMAT_TAGS, values)),
            _ => None,
        })
        .fold(HeaderInfo::new(samples), |info, (known, values)| {
            let Some(&name) = values
                .get("ID")
                .and_then(|id| known.iter().find(|&&t| t == id.as_str()))
            else {
                return info;
            };
            let ty = values
                .get("Type")
                .map_or(ScalarType::Text, |t| scalar_type(t));
            info.declare(name, ty)
        })
}

fn info_int(
    header: &HeaderInfo,
    record: &bcf::Record,
    name: &str,
    idx: usize,
) -> Result<Option<i32>> {
    if header.scalar_type(name) != Some(ScalarType::Integer) {
        return Ok(None);
    }
    let values = record
        .info(name.as_bytes())
        .integer()
        .with_context(|| format!("Failed to read INFO/{}", name))?;
    Ok(values.and_then(|v| v.get(idx).copied()))
}

fn info_float(header: &HeaderInfo, record: &bcf::Record, name: &str) -> Result<Option<f32>> {
    if header.scalar_type(name) != Some(ScalarType::Real) {
        return Ok(None);
    }
    let values = record
        .info(name.as_bytes())
        .float()
        .with_context(|| format!("Failed to read INFO/{}", name))?;
    Ok(values.and_then(|v| v.first().copied()))
}

fn info_string(header: &HeaderInfo, record: &bcf::Record, name: &str) -> Result<Option<String>> {
    if header.scalar_type(name) != Some(ScalarType::Text) {
        return Ok(None);
    }
    let values = record
        .info(name.as_bytes())
        .string()
        .with_context(|| format!("Failed to read INFO/{}", name))?;
    Ok(values.and_then(|v| v.first().map(|s| String::from_utf8_lossy(s).to_string())))
}

fn info_flag(header: &HeaderInfo, record: &bcf::Record, name: &str) -> Result<bool> {
    if header.scalar_type(name) != Some(ScalarType::Flag) {
        return Ok(false);
    }
    record
        .info(name.as_bytes())
        .flag()
        .with_context(|| format!("Failed to read INFO/{}", name))
}

/// Per-sample integers; a field absent from this record reads as all missing.
fn format_ints(
    header: &HeaderInfo,
    record: &bcf::Record,
    name: &str,
    n: usize,
) -> Option<Vec<i32>> {
    if header.scalar_type(name) != Some(ScalarType::Integer) {
        return None;
    }
    let values = match record.format(name.as_bytes()).integer() {
        Ok(values) => values
            .iter()
            .map(|s| s.first().copied().unwrap_or(INT32_MISSING))
            .collect(),
        Err(_) => vec![INT32_MISSING; n],
    };
    Some(values)
}

/// Genotype quality in whichever encoding the header declares.
fn format_quality(header: &HeaderInfo, record: &bcf::Record, n: usize) -> Option<Vec<Quality>> {
    let key = tag::GQ.as_bytes();
    let qualities = match header.scalar_type(tag::GQ)? {
        ScalarType::Integer => match record.format(key).integer() {
            Ok(values) => values
                .iter()
                .map(|s| s.first().map_or(Quality::Absent, |&v| Quality::Integer(v)))
                .collect(),
            Err(_) => vec![Quality::Absent; n],
        },
        ScalarType::Real => match record.format(key).float() {
            Ok(values) => values
                .iter()
                .map(|s| s.first().map_or(Quality::Absent, |&v| Quality::Real(v)))
                .collect(),
            Err(_) => vec![Quality::Absent; n],
        },
        ScalarType::Flag | ScalarType::Text => vec![Quality::Absent; n],
    };
    Some(qualities)
}

fn decode_genotypes(record: &bcf::Record, n: usize) -> Result<Vec<GenotypeCall>> {
    if n == 0 {
        return Ok(Vec::new());
    }
    let genotypes = record.genotypes().context("No genotypes")?;
    (0..n)
        .map(|i| {
            let alleles: Vec<Option<u32>> = genotypes.get(i).iter().map(|a| a.index()).collect();
            match alleles[..] {
                [a, b] => Ok(GenotypeCall(a, b)),
                // A lone "." is a no-call for any ploidy
                [None] => Ok(GenotypeCall::no_call()),
                _ => anyhow::bail!(
                    "sample {}: expected a diploid genotype, found {} allele(s)",
                    i,
                    alleles.len()
                ),
            }
        })
        .collect()
}

/// Decode one record, reading only fields the header declares.
pub fn decode_record(header: &HeaderInfo, record: &bcf::Record) -> Result<SvRecord> {
    let rid = record.rid().context("No reference ID")?;
    let chrom = String::from_utf8_lossy(record.header().rid2name(rid)?).to_string();
    let pos = record.pos();
    let n = header.sample_count();

    let genotypes = decode_genotypes(record, n)
        .with_context(|| format!("Failed to read genotypes at {}:{}", chrom, pos + 1))?;

    Ok(SvRecord {
        id: String::from_utf8_lossy(&record.id()).to_string(),
        end: info_int(header, record, tag::END, 0)?.map(i64::from),
        ins_len: info_int(header, record, tag::INSLEN, 0)?,
        sv_type: info_string(header, record, tag::SVTYPE)?,
        ci: info_int(header, record, tag::CIPOS, 1)?,
        precise: info_flag(header, record, tag::PRECISE)?,
        fic: info_float(header, record, tag::FIC)?,
        rsq: info_float(header, record, tag::RSQ)?,
        hwe_pval: info_float(header, record, tag::HWE_PVAL)?,
        genotypes,
        gq: format_quality(header, record, n),
        rc: format_ints(header, record, tag::RC, n),
        rcl: format_ints(header, record, tag::RCL, n),
        rcr: format_ints(header, record, tag::RCR, n),
        dv: format_ints(header, record, tag::DV, n),
        dr: format_ints(header, record, tag::DR, n),
        rv: format_ints(header, record, tag::RV, n),
        rr: format_ints(header, record, tag::RR, n),
        chrom,
        pos,
    })
}

/// Forward-only reader yielding decoded SV records.
pub struct SvReader {
    reader: bcf::Reader,
    header: HeaderInfo,
}

impl SvReader {
    /// Open a VCF, VCF.gz or BCF file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let reader = bcf::Reader::from_path(path)
            .with_context(|| format!("Failed to open VCF file: {}", path.display()))?;
        let header = header_info(reader.header());
        Ok(Self { reader, header })
    }

    pub fn header(&self) -> &HeaderInfo {
        &self.header
    }

    pub fn records(&mut self) -> impl Iterator<Item = Result<SvRecord>> + '_ {
        let header = &self.header;
        self.reader.records().map(move |result| {
            let record = result.context("Failed to read VCF record")?;
            decode_record(header, &record)
        })
    }
}
