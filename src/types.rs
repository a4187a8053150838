use std::collections::BTreeMap;

/// Header tags the statistics depend on.
pub mod tag {
    pub const END: &str = "END";
    pub const INSLEN: &str = "INSLEN";
    pub const SVTYPE: &str = "SVTYPE";
    pub const CIPOS: &str = "CIPOS";
    pub const PRECISE: &str = "PRECISE";
    pub const IMPRECISE: &str = "IMPRECISE";
    pub const FIC: &str = "FIC";
    pub const RSQ: &str = "RSQ";
    pub const HWE_PVAL: &str = "HWEpval";
    pub const GQ: &str = "GQ";
    pub const RC: &str = "RC";
    pub const RCL: &str = "RCL";
    pub const RCR: &str = "RCR";
    pub const DV: &str = "DV";
    pub const DR: &str = "DR";
    pub const RV: &str = "RV";
    pub const RR: &str = "RR";

    /// Site-level tags, looked up among the INFO declarations.
    pub const INFO_TAGS: &[&str] = &[
        END, INSLEN, SVTYPE, CIPOS, PRECISE, IMPRECISE, FIC, RSQ, HWE_PVAL,
    ];

    /// Per-sample tags, looked up among the FORMAT declarations.
    pub const FORMAT_TAGS: &[&str] = &[GQ, RC, RCL, RCR, DV, DR, RV, RR];
}

/// Declared value type of a header annotation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarType {
    Flag,
    Integer,
    Real,
    Text,
}

/// Read-only view of the input header: declared annotations and sample names.
#[derive(Debug, Clone, Default)]
pub struct HeaderInfo {
    samples: Vec<String>,
    declared: BTreeMap<String, ScalarType>,
}

impl HeaderInfo {
    pub fn new(samples: Vec<String>) -> Self {
        Self {
            samples,
            declared: BTreeMap::new(),
        }
    }

    /// Add a declaration. Used while building the header view.
    pub fn declare(mut self, name: &str, ty: ScalarType) -> Self {
        self.declared.insert(name.to_string(), ty);
        self
    }

    pub fn is_declared(&self, name: &str) -> bool {
        self.declared.contains_key(name)
    }

    pub fn scalar_type(&self, name: &str) -> Option<ScalarType> {
        self.declared.get(name).copied()
    }

    pub fn samples(&self) -> &[String] {
        &self.samples
    }

    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }
}

/// A diploid genotype call; `None` is a no-call allele.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenotypeCall(pub Option<u32>, pub Option<u32>);

impl GenotypeCall {
    pub fn called(first: u32, second: u32) -> Self {
        Self(Some(first), Some(second))
    }

    pub fn no_call() -> Self {
        Self(None, None)
    }
}

/// Genotype quality in whichever encoding the header declares.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Quality {
    Integer(i32),
    Real(f32),
    Absent,
}

/// A decoded SV record. Optional fields are `None` when the header does not
/// declare them (or, for site-level values, when the record leaves them unset).
#[derive(Debug, Clone, Default)]
pub struct SvRecord {
    pub chrom: String,
    /// 0-based position
    pub pos: i64,
    pub id: String,
    pub end: Option<i64>,
    pub ins_len: Option<i32>,
    pub sv_type: Option<String>,
    /// Upper bound of CIPOS
    pub ci: Option<i32>,
    pub precise: bool,
    pub fic: Option<f32>,
    pub rsq: Option<f32>,
    pub hwe_pval: Option<f32>,

    pub genotypes: Vec<GenotypeCall>,
    pub gq: Option<Vec<Quality>>,
    pub rc: Option<Vec<i32>>,
    pub rcl: Option<Vec<i32>>,
    pub rcr: Option<Vec<i32>>,
    pub dv: Option<Vec<i32>>,
    pub dr: Option<Vec<i32>>,
    pub rv: Option<Vec<i32>>,
    pub rr: Option<Vec<i32>>,
}

/// Derived statistics for one record, ready to render.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SiteStats {
    pub chrom: String,
    /// 1-based start
    pub start: i64,
    pub end: i64,
    pub id: String,
    pub size: i64,
    pub ref_count: u32,
    pub alt_count: u32,
    pub alt_freq: f64,
    pub singleton: Option<String>,
    pub missing_rate: f64,
    pub sv_type: Option<String>,
    pub precise: bool,
    pub ci: Option<i32>,

    pub ref_gq: f64,
    pub alt_gq: f64,
    pub rd_ratio: f64,
    pub median_rc: f64,
    pub ref_ratio: f64,
    pub alt_ratio: f64,

    pub fic: Option<f64>,
    pub rsq: Option<f64>,
    pub hwe_pval: Option<f64>,
}
