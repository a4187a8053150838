use crate::classify::{tally_genotypes, GenotypeTally};
use crate::missing::MissingValue;
use crate::statistics::{count_value, depth_ratio, median, support_ratio};
use crate::types::{HeaderInfo, Quality, SiteStats, SvRecord};
use anyhow::{Context, Result};

/// Per-class evidence gathered from one record's samples.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EvidenceVectors {
    pub gq_ref: Vec<f64>,
    pub gq_alt: Vec<f64>,
    pub ratio_ref: Vec<f64>,
    pub ratio_alt: Vec<f64>,
    pub rc_ratio_ref: Vec<f64>,
    pub rc_ratio_alt: Vec<f64>,
    pub rc_ref: Vec<f64>,
}

/// Quality contribution of one sample; missing or absent counts as zero.
fn quality_value(quality: Quality) -> f64 {
    match quality {
        Quality::Integer(v) if !v.is_missing() => v as f64,
        Quality::Real(v) if !v.is_missing() => v as f64,
        _ => 0.0,
    }
}

fn sample_count(field: &Option<Vec<i32>>, idx: usize) -> f64 {
    field
        .as_ref()
        .and_then(|values| values.get(idx))
        .map_or(f64::NAN, |&v| count_value(v))
}

/// Split-read support for precise calls, discordant pairs otherwise.
fn sample_support(record: &SvRecord, idx: usize) -> f64 {
    if record.precise {
        support_ratio(sample_count(&record.rv, idx), sample_count(&record.rr, idx))
    } else {
        support_ratio(sample_count(&record.dv, idx), sample_count(&record.dr, idx))
    }
}

fn sample_depth_ratio(record: &SvRecord, idx: usize) -> f64 {
    depth_ratio(
        sample_count(&record.rc, idx),
        sample_count(&record.rcl, idx),
        sample_count(&record.rcr, idx),
    )
}

impl EvidenceVectors {
    /// Collect evidence for the non-carrier and het-carrier samples in `tally`.
    /// Only fields present on the record are read.
    pub fn collect(record: &SvRecord, tally: &GenotypeTally) -> Self {
        let mut ev = EvidenceVectors::default();

        if let Some(gq) = &record.gq {
            let quality = |idx: usize| gq.get(idx).copied().map_or(0.0, quality_value);
            ev.gq_ref = tally.non_carriers.iter().map(|&i| quality(i)).collect();
            ev.gq_alt = tally.het_carriers.iter().map(|&i| quality(i)).collect();
        }

        if record.rc.is_some() {
            ev.rc_ref = tally
                .non_carriers
                .iter()
                .map(|&i| sample_count(&record.rc, i))
                .collect();
            ev.rc_ratio_ref = tally
                .non_carriers
                .iter()
                .map(|&i| sample_depth_ratio(record, i))
                .collect();
            ev.rc_ratio_alt = tally
                .het_carriers
                .iter()
                .map(|&i| sample_depth_ratio(record, i))
                .collect();
        }

        if record.dv.is_some() {
            ev.ratio_ref = tally
                .non_carriers
                .iter()
                .map(|&i| sample_support(record, i))
                .collect();
            ev.ratio_alt = tally
                .het_carriers
                .iter()
                .map(|&i| sample_support(record, i))
                .collect();
        }

        ev
    }
}

/// SV length: END - POS when END is set, else INSLEN for insertions, else 1.
pub fn sv_size(record: &SvRecord) -> i64 {
    if let Some(end) = record.end {
        return end - record.pos;
    }
    match (record.sv_type.as_deref(), record.ins_len) {
        (Some("INS"), Some(len)) if !len.is_missing() => len as i64,
        _ => 1,
    }
}

/// Compute the statistics row for one record.
pub fn aggregate_record(header: &HeaderInfo, record: &SvRecord) -> Result<SiteStats> {
    let tally = tally_genotypes(&record.genotypes)
        .with_context(|| format!("Invalid genotype at {}:{}", record.chrom, record.pos + 1))?;
    let ev = EvidenceVectors::collect(record, &tally);

    let singleton = tally
        .singleton()
        .map(|idx| {
            header
                .samples()
                .get(idx)
                .cloned()
                .with_context(|| format!("Sample index {} not in header", idx))
        })
        .transpose()?;

    let alt_rc = median(ev.rc_ratio_alt);
    let ref_rc = median(ev.rc_ratio_ref);

    Ok(SiteStats {
        chrom: record.chrom.clone(),
        start: record.pos + 1,
        end: record.end.unwrap_or(record.pos + 1),
        id: record.id.clone(),
        size: sv_size(record),
        ref_count: tally.ref_count,
        alt_count: tally.alt_count,
        alt_freq: tally.alt_freq(),
        singleton,
        missing_rate: tally.missing_rate(record.genotypes.len()),
        sv_type: record.sv_type.clone().filter(|s| !s.is_missing()),
        precise: record.precise,
        ci: record.ci.filter(|v| !v.is_missing()),
        ref_gq: median(ev.gq_ref),
        alt_gq: median(ev.gq_alt),
        rd_ratio: alt_rc / ref_rc,
        median_rc: median(ev.rc_ref),
        ref_ratio: median(ev.ratio_ref),
        alt_ratio: median(ev.ratio_alt),
        fic: site_real(record.fic),
        rsq: site_real(record.rsq),
        hwe_pval: site_real(record.hwe_pval),
    })
}

fn site_real(value: Option<f32>) -> Option<f64> {
    value.filter(|v| !v.is_missing()).map(f64::from)
}
