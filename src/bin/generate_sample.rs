use std::fs;
use std::path::Path;

use serde::Serialize;

/// One synthetic scan result, written with the same headers real exports use.
#[derive(Serialize)]
struct Row {
    #[serde(rename = "TestId")]
    test_id: usize,
    #[serde(rename = "ScanType")]
    scan_type: &'static str,
    #[serde(rename = "FilePath")]
    file_path: String,
    #[serde(rename = "RiskScore")]
    risk_score: f64,
    #[serde(rename = "DetectionLatencyMs")]
    detection_latency_ms: f64,
    #[serde(rename = "QuarantineLatencyMs")]
    quarantine_latency_ms: f64,
    #[serde(rename = "AnalysisLatencyMs")]
    analysis_latency_ms: f64,
    #[serde(rename = "TotalResponseTimeMs")]
    total_response_time_ms: f64,
}

/// Per-depth knobs: mean component latencies (ms) and the chance a sample
/// is flagged.
struct Profile {
    label: &'static str,
    file: &'static str,
    detection_ms: f64,
    quarantine_ms: f64,
    analysis_ms: f64,
    detect_prob: f64,
}

const PROFILES: [Profile; 3] = [
    Profile {
        label: "Shallow",
        file: "100shallow.csv",
        detection_ms: 12.0,
        quarantine_ms: 18.0,
        analysis_ms: 25.0,
        detect_prob: 0.78,
    },
    Profile {
        label: "Medium",
        file: "100med.csv",
        detection_ms: 20.0,
        quarantine_ms: 30.0,
        analysis_ms: 85.0,
        detect_prob: 0.86,
    },
    Profile {
        label: "Deep",
        file: "100deep.csv",
        detection_ms: 35.0,
        quarantine_ms: 45.0,
        analysis_ms: 240.0,
        detect_prob: 0.93,
    },
];

const LOCATIONS: [&str; 10] = [
    r"C:\ProgramData\Sandbox\Downloads",
    r"C:\ProgramData\Sandbox\Temp",
    r"C:\ProgramData\Sandbox\Startup",
    r"C:\ProgramData\Sandbox\AppData\Roaming",
    r"C:\ProgramData\Sandbox\AppData\Local\Cache",
    r"C:\ProgramData\Sandbox\Documents",
    r"C:\ProgramData\Sandbox\Desktop",
    r"C:\ProgramData\Sandbox\Recycle",
    r"C:\Users\Public\Downloads",
    r"C:\Windows\Temp",
];

const ROWS: usize = 100;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    /// Skewed towards the front of the list so a few locations dominate.
    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        let u = self.next_f64();
        items[((u * u) * items.len() as f64) as usize]
    }
}

/// Latency around `mean` with 20% spread, kept positive.
fn latency(rng: &mut SimpleRng, mean: f64) -> f64 {
    let v = rng.gauss(mean, mean * 0.2).max(mean * 0.1);
    (v * 100.0).round() / 100.0
}

fn generate(profile: &Profile, rng: &mut SimpleRng) -> Vec<Row> {
    (0..ROWS)
        .map(|i| {
            let detection = latency(rng, profile.detection_ms);
            let quarantine = latency(rng, profile.quarantine_ms);
            let analysis = latency(rng, profile.analysis_ms);
            let risk_score = if rng.next_f64() < profile.detect_prob {
                (rng.gauss(72.0, 15.0).clamp(1.0, 100.0) * 10.0).round() / 10.0
            } else {
                0.0
            };
            Row {
                test_id: i + 1,
                scan_type: profile.label,
                file_path: format!("{}\\sample_{:03}.wsb", rng.pick(&LOCATIONS), i % 40),
                risk_score,
                detection_latency_ms: detection,
                quarantine_latency_ms: quarantine,
                analysis_latency_ms: analysis,
                total_response_time_ms: ((detection + quarantine + analysis) * 100.0).round() / 100.0,
            }
        })
        .collect()
}

fn main() {
    let out_dir = Path::new("dataset");
    fs::create_dir_all(out_dir).expect("Failed to create dataset directory");

    let mut rng = SimpleRng::new(42);
    for profile in &PROFILES {
        let rows = generate(profile, &mut rng);
        let path = out_dir.join(profile.file);

        let mut writer = csv::Writer::from_path(&path).expect("Failed to create output file");
        for row in &rows {
            writer.serialize(row).expect("Failed to write row");
        }
        writer.flush().expect("Failed to flush writer");

        let detected = rows.iter().filter(|r| r.risk_score > 0.0).count();
        println!(
            "Wrote {} {} scan rows ({detected} detected) to {}",
            rows.len(),
            profile.label,
            path.display()
        );
    }
}
