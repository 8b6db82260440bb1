use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::config::ReportConfig;
use crate::data::loader::{self, LoadOutcome};
use crate::data::model::ScanSet;
use crate::plot::detection::DetectionVsSpeed;
use crate::plot::file_paths::FilePathDistribution;
use crate::plot::latency::LatencyBreakdown;
use crate::plot::response_time::{ResponseTimeComparison, ResponseTimeDistribution};
use crate::report::findings::Findings;
use crate::report::{closing_manifest, summary};

// ---------------------------------------------------------------------------
// Report pipeline: load → aggregate → plot → print
// ---------------------------------------------------------------------------

pub struct ReportGenerator {
    pub config: ReportConfig,
}

impl ReportGenerator {
    pub fn new(config: ReportConfig) -> Self {
        Self { config }
    }

    /// Run the whole report, printing the console sections to stdout.
    pub fn run(&self) -> Result<()> {
        let datasets = self.load()?;
        self.render_charts(&datasets)?;
        print!("{}", self.summaries(&datasets)?);

        let mut stdout = io::stdout().lock();
        write_findings(&datasets, &mut stdout)?;
        stdout.write_all(closing_manifest().as_bytes())?;
        stdout.flush()?;
        Ok(())
    }

    fn load(&self) -> Result<ScanSet> {
        let LoadOutcome { datasets, skipped } = loader::load_all(&self.config.inputs)?;
        if !skipped.is_empty() {
            log::info!(
                "Continuing with {} of {} scan files",
                datasets.len(),
                self.config.inputs.len()
            );
        }
        Ok(datasets)
    }

    /// Produce the five charts in order and return the paths written.
    pub fn render_charts(&self, datasets: &ScanSet) -> Result<Vec<PathBuf>> {
        let config = &self.config;
        std::fs::create_dir_all(&config.output_dir)
            .with_context(|| format!("creating {}", config.output_dir.display()))?;
        let mut written = Vec::with_capacity(5);

        log::info!("--- ANALYSIS 1: Response Time Comparison ---");
        let comparison = ResponseTimeComparison::aggregate(datasets)?;
        for (scan_type, stats) in &comparison.bars {
            log::info!("{scan_type}: {:.2}ms (±{:.2}ms)", stats.mean, stats.std_dev);
        }
        written.push(saved(comparison.render(config)?));

        log::info!("--- ANALYSIS 2: Response Time Distribution ---");
        written.push(saved(ResponseTimeDistribution::aggregate(datasets)?.render(config)?));

        log::info!("--- ANALYSIS 3: Detection Rate vs Speed ---");
        written.push(saved(DetectionVsSpeed::aggregate(datasets)?.render(config)?));

        log::info!("--- ANALYSIS 4: File Path Analysis ---");
        written.push(saved(FilePathDistribution::aggregate(datasets).render(config)?));

        log::info!("--- ANALYSIS 5: Latency Component Breakdown ---");
        written.push(saved(LatencyBreakdown::aggregate(datasets)?.render(config)?));

        Ok(written)
    }

    /// Statistics and coverage sections.
    pub fn summaries(&self, datasets: &ScanSet) -> Result<String> {
        let mut out = summary::render_statistics(&summary::statistics_rows(datasets)?);
        out.push_str(&summary::render_coverage(&summary::coverage_rows(datasets)?));
        Ok(out)
    }
}

fn write_findings<W: Write>(datasets: &ScanSet, out: &mut W) -> Result<()> {
    Findings::from_datasets(datasets)
        .map_err(anyhow::Error::from)
        .and_then(|f| f.write_to(out))
        .context("computing key findings")
}

fn saved(path: PathBuf) -> PathBuf {
    log::info!("Saved: {}", path.display());
    path
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use super::*;
    use crate::config::{Theme, CHART_FILES};
    use crate::data::model::ScanType;
    use crate::error::{LoadError, ReportError};

    const HEADER: &str = "FilePath,RiskScore,DetectionLatencyMs,QuarantineLatencyMs,AnalysisLatencyMs,TotalResponseTimeMs\n";

    fn write_scan(dir: &Path, name: &str, base: f64, rows: usize) -> PathBuf {
        let mut body = String::from(HEADER);
        for i in 0..rows {
            let total = base + (i * 7 % 11) as f64;
            let risk = if i % 3 == 0 { 0.0 } else { 40.0 + i as f64 };
            body.push_str(&format!(
                "C:\\ProgramData\\Sandbox\\sample_{}.wsb,{risk},{},{},{},{total}\n",
                i % 4,
                total * 0.2,
                total * 0.3,
                total * 0.5,
            ));
        }
        let path = dir.join(name);
        fs::write(&path, body).unwrap();
        path
    }

    fn generator(dir: &Path, inputs: Vec<(ScanType, PathBuf)>) -> ReportGenerator {
        crate::plot::register_fonts().unwrap();
        ReportGenerator::new(ReportConfig {
            inputs,
            output_dir: dir.join("charts"),
            theme: Theme { dpi: 30, ..Theme::default() },
        })
    }

    /// Load and render without printing.
    fn run_quietly(report: &ReportGenerator) -> Result<ScanSet> {
        let datasets = report.load()?;
        report.render_charts(&datasets)?;
        Ok(datasets)
    }

    fn triad_inputs(dir: &Path) -> Vec<(ScanType, PathBuf)> {
        vec![
            (ScanType::Shallow, write_scan(dir, "shallow.csv", 100.0, 12)),
            (ScanType::Medium, write_scan(dir, "med.csv", 250.0, 12)),
            (ScanType::Deep, write_scan(dir, "deep.csv", 600.0, 12)),
        ]
    }

    #[test]
    fn writes_all_charts_and_overwrites_on_rerun() {
        let dir = tempfile::tempdir().unwrap();
        let report = generator(dir.path(), triad_inputs(dir.path()));

        let first = run_quietly(&report).unwrap();
        let written = report.render_charts(&first).unwrap();
        assert_eq!(written.len(), 5);
        for (path, name) in written.iter().zip(CHART_FILES) {
            assert!(path.ends_with(name));
        }

        let sizes = [(300, 180), (300, 180), (300, 180), (480, 150), (450, 150)];
        for (name, (w, h)) in CHART_FILES.iter().zip(sizes) {
            let img = image::open(dir.path().join("charts").join(name)).unwrap();
            assert_eq!((img.width(), img.height()), (w, h), "{name}");
        }

        let before: Vec<_> = CHART_FILES
            .iter()
            .map(|n| fs::read(dir.path().join("charts").join(n)).unwrap())
            .collect();
        report.render_charts(&first).unwrap();
        let after: Vec<_> = CHART_FILES
            .iter()
            .map(|n| fs::read(dir.path().join("charts").join(n)).unwrap())
            .collect();
        assert_eq!(before, after);
    }

    #[test]
    fn console_text_is_identical_across_runs() {
        let dir = tempfile::tempdir().unwrap();
        let report = generator(dir.path(), triad_inputs(dir.path()));

        let console = |datasets: &ScanSet| {
            let mut out = report.summaries(datasets).unwrap().into_bytes();
            write_findings(datasets, &mut out).unwrap();
            String::from_utf8(out).unwrap()
        };
        let first = console(&run_quietly(&report).unwrap());
        let second = console(&run_quietly(&report).unwrap());
        assert_eq!(first, second);
        assert!(first.contains("SCAN COVERAGE AND SPEED"));
        assert!(first.contains("4. COST-BENEFIT ANALYSIS:"));
    }

    #[test]
    fn equal_sized_scans_complete_the_report() {
        let dir = tempfile::tempdir().unwrap();
        let report = generator(dir.path(), triad_inputs(dir.path()));
        report.run().unwrap();

        let mut out = Vec::new();
        write_findings(&run_quietly(&report).unwrap(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("   • Speed gain / Threat loss ratio: infx favorable\n"));
    }

    #[test]
    fn no_inputs_fails_before_any_chart() {
        let dir = tempfile::tempdir().unwrap();
        let report = generator(
            dir.path(),
            vec![(ScanType::Shallow, dir.path().join("absent.csv"))],
        );

        let err = report.run().unwrap_err();
        assert!(matches!(err.downcast_ref::<LoadError>(), Some(LoadError::NoInputs)));
        assert!(!dir.path().join("charts").exists());
    }

    #[test]
    fn partial_inputs_still_chart_but_findings_need_all_three() {
        let dir = tempfile::tempdir().unwrap();
        let mut inputs = triad_inputs(dir.path());
        inputs[1].1 = dir.path().join("missing_med.csv");
        let report = generator(dir.path(), inputs);

        let err = report.run().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ReportError>(),
            Some(ReportError::MissingScanType(ScanType::Medium))
        ));
        for name in CHART_FILES {
            assert!(dir.path().join("charts").join(name).exists(), "{name}");
        }
    }
}
