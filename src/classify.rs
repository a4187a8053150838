use crate::types::GenotypeCall;
use anyhow::Result;

/// Genotype class of one sample at a biallelic site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenotypeClass {
    /// At least one allele is a no-call
    Uncalled,
    /// 0/0
    NonCarrier,
    /// 0/1 or 1/0
    HetCarrier,
    /// 1/1: counted in the allele totals, excluded from evidence
    HomAlt,
}

/// Classify a single call. Alleles other than 0 and 1 are rejected.
pub fn classify_call(call: GenotypeCall) -> Result<GenotypeClass> {
    let (a, b) = match call {
        GenotypeCall(Some(a), Some(b)) => (a, b),
        _ => return Ok(GenotypeClass::Uncalled),
    };
    if a > 1 || b > 1 {
        anyhow::bail!("Unsupported allele index {} (only biallelic sites are handled)", a.max(b));
    }
    Ok(match a + b {
        0 => GenotypeClass::NonCarrier,
        1 => GenotypeClass::HetCarrier,
        _ => GenotypeClass::HomAlt,
    })
}

/// Allele counts and class membership accumulated over one record's samples.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenotypeTally {
    pub ref_count: u32,
    pub alt_count: u32,
    pub uncalled: u32,
    pub non_carriers: Vec<usize>,
    pub het_carriers: Vec<usize>,
}

impl GenotypeTally {
    /// Fold one sample's call into the tally.
    pub fn push(mut self, sample_idx: usize, call: GenotypeCall) -> Result<Self> {
        let class = classify_call(call)?;
        if class == GenotypeClass::Uncalled {
            self.uncalled += 1;
            return Ok(self);
        }

        // Both alleles are 0 or 1 past classify_call
        let alt_alleles = call.0.unwrap_or(0) + call.1.unwrap_or(0);
        self.alt_count += alt_alleles;
        self.ref_count += 2 - alt_alleles;

        match class {
            GenotypeClass::NonCarrier => self.non_carriers.push(sample_idx),
            GenotypeClass::HetCarrier => self.het_carriers.push(sample_idx),
            GenotypeClass::HomAlt | GenotypeClass::Uncalled => {}
        }
        Ok(self)
    }

    /// Sample index of the sole alt-allele carrier, if the site is a singleton.
    ///
    /// With an alt count of exactly one there is exactly one het carrier, so
    /// the last one seen is unique.
    pub fn singleton(&self) -> Option<usize> {
        if self.alt_count == 1 {
            self.het_carriers.last().copied()
        } else {
            None
        }
    }

    /// Alt allele frequency over called alleles
    /// AF = ALT / (REF + ALT)
    pub fn alt_freq(&self) -> f64 {
        self.alt_count as f64 / (self.ref_count + self.alt_count) as f64
    }

    /// Fraction of samples without a resolvable call
    pub fn missing_rate(&self, sample_count: usize) -> f64 {
        self.uncalled as f64 / sample_count as f64
    }
}

/// Classify every sample in header order.
pub fn tally_genotypes(calls: &[GenotypeCall]) -> Result<GenotypeTally> {
    calls
        .iter()
        .enumerate()
        .try_fold(GenotypeTally::default(), |tally, (idx, &call)| {
            tally
                .push(idx, call)
                .map_err(|e| e.context(format!("sample {}", idx)))
        })
}
