use crate::aggregate::aggregate_record;
use crate::schema::{Column, ColumnSchema};
use crate::types::{HeaderInfo, SiteStats, SvRecord};
use anyhow::Result;
use csv::{QuoteStyle, Writer, WriterBuilder};
use indicatif::ProgressBar;
use std::io;

const SIG_DIGITS: usize = 6;
const NA: &str = "NA";

/// Format a real the way C's `%g` does with six significant digits.
pub fn format_real(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    if value == 0.0 {
        return if value.is_sign_negative() { "-0" } else { "0" }.to_string();
    }

    let sci = format!("{:.*e}", SIG_DIGITS - 1, value);
    let Some((mantissa, exp)) = sci.split_once('e') else {
        return sci;
    };
    let exp: i32 = exp.parse().unwrap_or(0);

    if exp < -4 || exp >= SIG_DIGITS as i32 {
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", trim_fraction(mantissa), sign, exp.abs())
    } else {
        let decimals = (SIG_DIGITS as i32 - 1 - exp) as usize;
        trim_fraction(&format!("{:.*}", decimals, value)).to_string()
    }
}

fn trim_fraction(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

fn or_na<T>(value: Option<T>, f: impl FnOnce(T) -> String) -> String {
    value.map_or_else(|| NA.to_string(), f)
}

/// Render one cell of a row.
pub fn render_cell(column: Column, site: &SiteStats) -> String {
    match column {
        Column::Chrom => site.chrom.clone(),
        Column::Start => site.start.to_string(),
        Column::End => site.end.to_string(),
        Column::Id => site.id.clone(),
        Column::Size => site.size.to_string(),
        Column::AltCount => site.alt_count.to_string(),
        Column::AltFreq => format_real(site.alt_freq),
        Column::Singleton => or_na(site.singleton.clone(), |s| s),
        Column::MissingRate => format_real(site.missing_rate),
        Column::SvType => or_na(site.sv_type.clone(), |s| s),
        Column::Precise => u8::from(site.precise).to_string(),
        Column::Ci => or_na(site.ci, |v| v.to_string()),
        Column::RefGq => format_real(site.ref_gq),
        Column::AltGq => format_real(site.alt_gq),
        Column::RdRatio => format_real(site.rd_ratio),
        Column::MedianRc => format_real(site.median_rc),
        Column::RefRatio => format_real(site.ref_ratio),
        Column::AltRatio => format_real(site.alt_ratio),
        Column::Fic => or_na(site.fic, format_real),
        Column::Rsq => or_na(site.rsq, format_real),
        Column::HwePval => or_na(site.hwe_pval, format_real),
    }
}

/// Tab-separated site table: one header row, then one row per site.
pub struct SiteTableWriter<W: io::Write> {
    schema: ColumnSchema,
    wtr: Writer<W>,
}

impl<W: io::Write> SiteTableWriter<W> {
    /// Create the writer and emit the header row.
    pub fn new(schema: ColumnSchema, sink: W) -> Result<Self> {
        let mut wtr = WriterBuilder::new()
            .delimiter(b'\t')
            .quote_style(QuoteStyle::Never)
            .has_headers(false)
            .from_writer(sink);
        wtr.write_record(schema.names())?;
        Ok(Self { schema, wtr })
    }

    pub fn write_site(&mut self, site: &SiteStats) -> Result<()> {
        let row = self.schema.columns().iter().map(|&c| render_cell(c, site));
        self.wtr.write_record(row)?;
        Ok(())
    }

    /// Flush and hand back the sink.
    pub fn finish(self) -> Result<W> {
        self.wtr
            .into_inner()
            .map_err(|e| anyhow::anyhow!("Failed to flush site table: {}", e.error()))
    }
}

/// Summary of one pass over the input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub records: u64,
    pub singletons: u64,
}

/// Aggregate every record and write the table to `sink`.
pub fn write_site_table<I, W>(
    header: &HeaderInfo,
    records: I,
    sink: W,
    progress: Option<&ProgressBar>,
) -> Result<RunSummary>
where
    I: IntoIterator<Item = Result<SvRecord>>,
    W: io::Write,
{
    let mut writer = SiteTableWriter::new(ColumnSchema::from_header(header), sink)?;
    let mut summary = RunSummary::default();

    for record in records {
        let site = aggregate_record(header, &record?)?;
        writer.write_site(&site)?;

        summary.records += 1;
        if site.singleton.is_some() {
            summary.singletons += 1;
        }
        if let Some(pb) = progress {
            pb.inc(1);
        }
    }

    writer.finish()?;
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{tag, GenotypeCall, ScalarType};

    #[test]
    fn test_format_real() {
        assert_eq!(format_real(0.2), "0.2");
        assert_eq!(format_real(0.375), "0.375");
        assert_eq!(format_real(1.0 / 3.0), "0.333333");
        assert_eq!(format_real(2.0 / 3.0), "0.666667");
        assert_eq!(format_real(100.0), "100");
        assert_eq!(format_real(42.5), "42.5");
        assert_eq!(format_real(123456.0), "123456");
        assert_eq!(format_real(1234567.0), "1.23457e+06");
        assert_eq!(format_real(0.0001), "0.0001");
        assert_eq!(format_real(0.00001), "1e-05");
        assert_eq!(format_real(-2.5e-7), "-2.5e-07");
        assert_eq!(format_real(0.0), "0");
        assert_eq!(format_real(f64::NAN), "nan");
        assert_eq!(format_real(f64::INFINITY), "inf");
        assert_eq!(format_real(f64::NEG_INFINITY), "-inf");
    }

    #[test]
    fn test_format_real_rounding_carries_exponent() {
        assert_eq!(format_real(999999.7), "1e+06");
        assert_eq!(format_real(0.99999999), "1");
    }

    fn site() -> SiteStats {
        SiteStats {
            chrom: "chr2".to_string(),
            start: 1001,
            end: 1050,
            id: "DEL1".to_string(),
            size: 50,
            ref_count: 5,
            alt_count: 3,
            alt_freq: 0.375,
            singleton: None,
            missing_rate: 0.2,
            sv_type: Some("DEL".to_string()),
            precise: true,
            ci: Some(12),
            ref_gq: 40.0,
            alt_gq: 25.0,
            rd_ratio: 0.5,
            median_rc: 100.0,
            ref_ratio: 0.0,
            alt_ratio: 0.3,
            fic: Some(0.25),
            rsq: None,
            hwe_pval: Some(1.0),
        }
    }

    #[test]
    fn test_render_cells() {
        let site = site();
        assert_eq!(render_cell(Column::Singleton, &site), "NA");
        assert_eq!(render_cell(Column::Precise, &site), "1");
        assert_eq!(render_cell(Column::Ci, &site), "12");
        assert_eq!(render_cell(Column::AltFreq, &site), "0.375");
        assert_eq!(render_cell(Column::Rsq, &site), "NA");
        assert_eq!(render_cell(Column::AltCount, &site), "3");
    }

    #[test]
    fn test_rows_follow_schema_and_round_trip() {
        let header = HeaderInfo::default()
            .declare(tag::SVTYPE, ScalarType::Text)
            .declare(tag::IMPRECISE, ScalarType::Flag)
            .declare(tag::RSQ, ScalarType::Real);
        let schema = ColumnSchema::from_header(&header);
        let mut writer = SiteTableWriter::new(schema.clone(), Vec::new()).unwrap();
        writer.write_site(&site()).unwrap();
        let out = String::from_utf8(writer.finish().unwrap()).unwrap();

        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .from_reader(out.as_bytes());
        let names: Vec<String> = rdr.headers().unwrap().iter().map(String::from).collect();
        assert_eq!(names, schema.names().collect::<Vec<_>>());

        let rows: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 1);
        let expected: Vec<String> = schema
            .columns()
            .iter()
            .map(|&c| render_cell(c, &site()))
            .collect();
        assert_eq!(rows[0].iter().collect::<Vec<_>>(), expected);
        assert_eq!(
            rows[0].iter().collect::<Vec<_>>(),
            vec![
                "chr2", "1001", "1050", "DEL1", "50", "3", "0.375", "NA", "0.2", "DEL", "1",
                "NA"
            ]
        );
    }

    #[test]
    fn test_header_only_when_no_records() {
        let header = HeaderInfo::default();
        let mut out = Vec::new();
        let summary =
            write_site_table(&header, std::iter::empty::<Result<SvRecord>>(), &mut out, None)
                .unwrap();
        assert_eq!(summary.records, 0);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "chr\tstart\tend\tid\tsize\tvac\tvaf\tsingleton\tmissingrate\n"
        );
    }

    #[test]
    fn test_write_site_table_counts_singletons() {
        let header = HeaderInfo::new(vec!["A".to_string(), "B".to_string()]);
        let records = vec![
            Ok(SvRecord {
                chrom: "chr1".to_string(),
                pos: 9,
                id: ".".to_string(),
                genotypes: vec![GenotypeCall::called(0, 1), GenotypeCall::called(0, 0)],
                ..Default::default()
            }),
            Ok(SvRecord {
                chrom: "chr1".to_string(),
                pos: 19,
                id: ".".to_string(),
                genotypes: vec![GenotypeCall::called(1, 1), GenotypeCall::no_call()],
                ..Default::default()
            }),
        ];
        let mut out = Vec::new();
        let summary = write_site_table(&header, records, &mut out, None).unwrap();
        assert_eq!(summary, RunSummary { records: 2, singletons: 1 });

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[1], "chr1\t10\t10\t.\t1\t1\t0.25\tA\t0");
        assert_eq!(lines[2], "chr1\t20\t20\t.\t1\t2\t1\tNA\t0.5");
    }

    #[test]
    fn test_record_error_stops_the_run() {
        let header = HeaderInfo::new(vec!["A".to_string()]);
        let records = vec![Err(anyhow::anyhow!("truncated record"))];
        let result = write_site_table(&header, records, Vec::new(), None);
        assert!(result.is_err());
    }
}
