use std::io::Write;

use super::{banner, fixed};
use crate::data::model::{ScanSet, ScanType};
use crate::data::stats::response_time_stats;
use crate::error::ReportError;

// ---------------------------------------------------------------------------
// Comparative findings across the three scan depths
// ---------------------------------------------------------------------------

/// Mean response time and record count of one scan type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScanSummary {
    pub mean_response_ms: f64,
    pub records: usize,
}

/// Derived comparisons between shallow, medium and deep scans. Requires all
/// three to be loaded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Findings {
    pub shallow: ScanSummary,
    pub medium: ScanSummary,
    pub deep: ScanSummary,
}

impl Findings {
    pub fn from_datasets(datasets: &ScanSet) -> Result<Self, ReportError> {
        let summary = |scan_type: ScanType| -> Result<ScanSummary, ReportError> {
            let ds = datasets
                .get(&scan_type)
                .ok_or(ReportError::MissingScanType(scan_type))?;
            Ok(ScanSummary {
                mean_response_ms: response_time_stats(ds)?.mean,
                records: ds.len(),
            })
        };
        Ok(Self {
            shallow: summary(ScanType::Shallow)?,
            medium: summary(ScanType::Medium)?,
            deep: summary(ScanType::Deep)?,
        })
    }

    fn summary(&self, scan_type: ScanType) -> ScanSummary {
        match scan_type {
            ScanType::Shallow => self.shallow,
            ScanType::Medium => self.medium,
            ScanType::Deep => self.deep,
        }
    }

    /// How much slower `slower` is than `baseline`, in percent of `baseline`.
    pub fn slowdown_pct(&self, baseline: ScanType, slower: ScanType) -> Result<f64, ReportError> {
        let base = self.summary(baseline).mean_response_ms;
        let other = self.summary(slower).mean_response_ms;
        Ok(ratio(other - base, base, "relative slowdown")? * 100.0)
    }

    /// Deep mean response time as a multiple of shallow.
    pub fn deep_to_shallow_ratio(&self) -> Result<f64, ReportError> {
        ratio(
            self.deep.mean_response_ms,
            self.shallow.mean_response_ms,
            "deep to shallow time ratio",
        )
    }

    /// Records per millisecond of mean response time.
    pub fn efficiency(&self, scan_type: ScanType) -> Result<f64, ReportError> {
        let s = self.summary(scan_type);
        ratio(s.records as f64, s.mean_response_ms, "detection efficiency")
    }

    /// Records of `scan_type` as a percentage of the deep scan's.
    pub fn coverage_pct(&self, scan_type: ScanType) -> Result<f64, ReportError> {
        let found = self.summary(scan_type).records as f64;
        Ok(ratio(found, self.deep.records as f64, "coverage of deep scan")? * 100.0)
    }

    /// Records the deep scan finds beyond the shallow one. Negative when the
    /// shallow scan reports more.
    pub fn additional_deep_threats(&self) -> i64 {
        self.deep.records as i64 - self.shallow.records as i64
    }

    /// Time saved by a shallow scan, in percent of the deep scan's time.
    pub fn speed_gain(&self) -> Result<f64, ReportError> {
        let (shallow, deep) = (self.shallow.mean_response_ms, self.deep.mean_response_ms);
        Ok(ratio(deep - shallow, deep, "speed gain")? * 100.0)
    }

    /// Share of deep-scan threats the shallow scan misses, in percent.
    pub fn threat_loss(&self) -> Result<f64, ReportError> {
        Ok(100.0 - self.coverage_pct(ScanType::Shallow)?)
    }

    /// Speed gain per point of threat loss. Infinite when the shallow scan
    /// misses nothing; `NaN` when it is also no faster.
    pub fn cost_benefit(&self) -> Result<f64, ReportError> {
        Ok(self.speed_gain()? / self.threat_loss()?)
    }

    /// Write the key findings section block by block. A block that cannot be
    /// computed stops the output after the blocks before it.
    pub fn write_to<W: Write>(&self, out: &mut W) -> anyhow::Result<()> {
        let blocks: [fn(&Self) -> Result<String, ReportError>; 4] = [
            Self::speed_block,
            Self::efficiency_block,
            Self::coverage_block,
            Self::cost_benefit_block,
        ];

        out.write_all(banner("KEY FINDINGS FOR YOUR RESEARCH PAPER").as_bytes())?;
        for block in blocks {
            out.write_all(block(self)?.as_bytes())?;
        }
        out.flush()?;
        Ok(())
    }

    fn speed_block(&self) -> Result<String, ReportError> {
        use ScanType::{Deep, Medium, Shallow};
        Ok(format!(
            "\n1. SPEED IMPROVEMENTS:\n   \
             • Shallow vs Medium: {:.1}% slower\n   \
             • Shallow vs Deep:   {:.1}% slower\n   \
             • Medium vs Deep:    {:.1}% slower\n   \
             • Deep scan is {:.2}x slower than shallow scan\n",
            self.slowdown_pct(Shallow, Medium)?,
            self.slowdown_pct(Shallow, Deep)?,
            self.slowdown_pct(Medium, Deep)?,
            self.deep_to_shallow_ratio()?,
        ))
    }

    fn efficiency_block(&self) -> Result<String, ReportError> {
        let mut out = String::from("\n2. DETECTION EFFICIENCY:\n");
        for (scan_type, pad) in [(ScanType::Shallow, ""), (ScanType::Medium, " "), (ScanType::Deep, "   ")] {
            out.push_str(&format!(
                "   • {scan_type}:{pad} {:.2} detections/ms\n",
                self.efficiency(scan_type)?
            ));
        }
        Ok(out)
    }

    fn coverage_block(&self) -> Result<String, ReportError> {
        let shallow_pct = self.coverage_pct(ScanType::Shallow)?;
        Ok(format!(
            "\n3. DETECTION COVERAGE:\n   \
             • Shallow captures {shallow_pct:.1}% of threats found by deep scan\n   \
             • Medium captures {:.1}% of threats found by deep scan\n   \
             • Deep scan finds only {} additional threats ({:.1}% more)\n",
            self.coverage_pct(ScanType::Medium)?,
            self.additional_deep_threats(),
            100.0 - shallow_pct,
        ))
    }

    fn cost_benefit_block(&self) -> Result<String, ReportError> {
        Ok(format!(
            "\n4. COST-BENEFIT ANALYSIS:\n   \
             • Shallow scan is {:.1}% faster\n   \
             • but misses only {:.1}% of threats\n   \
             • Speed gain / Threat loss ratio: {}x favorable\n",
            self.speed_gain()?,
            self.threat_loss()?,
            fixed(self.cost_benefit()?, 2),
        ))
    }
}

fn ratio(numerator: f64, denominator: f64, what: &'static str) -> Result<f64, ReportError> {
    if denominator == 0.0 {
        return Err(ReportError::ZeroDenominator(what));
    }
    Ok(numerator / denominator)
}
