use crate::types::{tag, HeaderInfo};

/// One output column. Each variant is bound to exactly one `SiteStats` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Chrom,
    Start,
    End,
    Id,
    Size,
    AltCount,
    AltFreq,
    Singleton,
    MissingRate,
    SvType,
    Precise,
    Ci,
    RefGq,
    AltGq,
    RdRatio,
    MedianRc,
    RefRatio,
    AltRatio,
    Fic,
    Rsq,
    HwePval,
}

impl Column {
    pub fn name(self) -> &'static str {
        match self {
            Column::Chrom => "chr",
            Column::Start => "start",
            Column::End => "end",
            Column::Id => "id",
            Column::Size => "size",
            Column::AltCount => "vac",
            Column::AltFreq => "vaf",
            Column::Singleton => "singleton",
            Column::MissingRate => "missingrate",
            Column::SvType => "svtype",
            Column::Precise => "precise",
            Column::Ci => "ci",
            Column::RefGq => "refgq",
            Column::AltGq => "altgq",
            Column::RdRatio => "rdratio",
            Column::MedianRc => "medianrc",
            Column::RefRatio => "refratio",
            Column::AltRatio => "altratio",
            Column::Fic => "fic",
            Column::Rsq => "rsq",
            Column::HwePval => "hwepval",
        }
    }
}

const BASE_COLUMNS: [Column; 9] = [
    Column::Chrom,
    Column::Start,
    Column::End,
    Column::Id,
    Column::Size,
    Column::AltCount,
    Column::AltFreq,
    Column::Singleton,
    Column::MissingRate,
];

/// Optional columns in output order, each with the header tag that enables it.
const GATED_COLUMNS: [(&str, &[Column]); 9] = [
    (tag::SVTYPE, &[Column::SvType]),
    (tag::IMPRECISE, &[Column::Precise]),
    (tag::CIPOS, &[Column::Ci]),
    (tag::GQ, &[Column::RefGq, Column::AltGq]),
    (tag::RC, &[Column::RdRatio, Column::MedianRc]),
    (tag::DV, &[Column::RefRatio, Column::AltRatio]),
    (tag::FIC, &[Column::Fic]),
    (tag::RSQ, &[Column::Rsq]),
    (tag::HWE_PVAL, &[Column::HwePval]),
];

/// Ordered output columns, fixed for the whole run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSchema {
    columns: Vec<Column>,
}

impl ColumnSchema {
    /// Build the schema from header declarations alone; record content never
    /// changes it.
    pub fn from_header(header: &HeaderInfo) -> Self {
        let mut columns = BASE_COLUMNS.to_vec();
        for (gate, gated) in GATED_COLUMNS {
            if header.is_declared(gate) {
                columns.extend_from_slice(gated);
            }
        }
        Self { columns }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.columns.iter().map(|c| c.name())
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn contains(&self, column: Column) -> bool {
        self.columns.contains(&column)
    }
}
