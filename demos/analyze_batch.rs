//! Batch analyzer for sample libraries
//!
//! Decodes and analyzes many files in parallel. Each rayon worker owns its
//! own `AudioDecoder`.
//!
//! Usage:
//!   cargo run --release --example analyze_batch -- [--jobs N] [--json] [--root DIR] [--config FILE] <files...>

use std::env;
use std::path::Path;
use std::time::Instant;

use rayon::prelude::*;
use sample_dna::io::decoder::AudioDecoder;
use sample_dna::{analyze_waveform, AnalysisConfig, ClassificationRecord};

/// Analysis only needs the head of long loops
const MAX_DECODE_SECONDS: f32 = 8.0;

fn default_jobs() -> usize {
    let n = std::thread::available_parallelism().map(|v| v.get()).unwrap_or(1);
    std::cmp::max(1, n.saturating_sub(1))
}

fn percentile(mut xs: Vec<f32>, p: f32) -> Option<f32> {
    if xs.is_empty() {
        return None;
    }
    xs.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let idx = ((xs.len() - 1) as f32 * p.clamp(0.0, 1.0)).round() as usize;
    Some(xs[idx.min(xs.len() - 1)])
}

/// Relative directory and file name used as tagging hints
fn path_hints(path: &str, root: Option<&str>) -> (String, String) {
    let file = Path::new(path);
    let rel = root
        .and_then(|r| file.strip_prefix(r).ok())
        .unwrap_or(file);
    let name = rel
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let dir = rel
        .parent()
        .map(|p| p.to_string_lossy().replace('\\', "/"))
        .unwrap_or_default();
    (dir, name)
}

struct ItemOut {
    path: String,
    record: Option<ClassificationRecord>,
    elapsed_ms: f32,
    error: Option<String>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut args: Vec<String> = env::args().skip(1).collect();

    let mut json = false;
    let mut jobs: Option<usize> = None;
    let mut root: Option<String> = None;
    let mut config = AnalysisConfig::default();
    let mut paths: Vec<String> = Vec::new();

    while let Some(a) = args.first().cloned() {
        args.remove(0);
        match a.as_str() {
            "--json" => json = true,
            "--jobs" => {
                let v = args
                    .first()
                    .ok_or("--jobs requires a value")?
                    .parse::<usize>()?;
                args.remove(0);
                jobs = Some(std::cmp::max(1, v));
            }
            "--root" => {
                root = Some(args.first().ok_or("--root requires a value")?.clone());
                args.remove(0);
            }
            "--config" => {
                let file = args.first().ok_or("--config requires a value")?.clone();
                args.remove(0);
                config = AnalysisConfig::from_json_str(&std::fs::read_to_string(file)?)?;
            }
            "--help" | "-h" => {
                eprintln!(
                    "Usage: analyze_batch [--jobs N] [--json] [--root DIR] [--config FILE] <file1> <file2> ...\n\
                     \n\
                     --jobs N       Parallel workers (default: CPU-1)\n\
                     --json         Emit one JSON record per line (JSONL)\n\
                     --root DIR     Library root; path hints are taken relative to it\n\
                     --config FILE  JSON analysis configuration\n"
                );
                return Ok(());
            }
            _ => paths.push(a),
        }
    }

    if paths.is_empty() {
        eprintln!("ERROR: Provide at least one audio file path. Use --help for usage.");
        std::process::exit(2);
    }

    let jobs = jobs.unwrap_or_else(default_jobs);
    eprintln!("Batch: {} files, jobs={}", paths.len(), jobs);

    let t0 = Instant::now();
    let pool = rayon::ThreadPoolBuilder::new().num_threads(jobs).build()?;

    let outs: Vec<ItemOut> = pool.install(|| {
        paths
            .par_iter()
            .map_init(
                || AudioDecoder::new().with_max_duration(MAX_DECODE_SECONDS),
                |decoder, path| {
                    let started = Instant::now();
                    let (dir, name) = path_hints(path, root.as_deref());
                    match decoder.decode_file(path) {
                        Ok(waveform) => {
                            let (_, record) = analyze_waveform(&waveform, &dir, &name, &config);
                            ItemOut {
                                path: path.clone(),
                                record: Some(record),
                                elapsed_ms: started.elapsed().as_secs_f32() * 1000.0,
                                error: None,
                            }
                        }
                        Err(e) => ItemOut {
                            path: path.clone(),
                            record: None,
                            elapsed_ms: 0.0,
                            error: Some(format!("decode failed: {e}")),
                        },
                    }
                },
            )
            .collect()
    });

    for (idx, o) in outs.iter().enumerate() {
        match (&o.record, json) {
            (Some(record), true) => {
                let line = serde_json::json!({ "file": o.path, "record": record });
                println!("{}", line);
            }
            (Some(record), false) => println!(
                "[{}/{}] {}: {} conf={} ({}) tags={}",
                idx + 1,
                outs.len(),
                o.path,
                record.category.map(|c| c.to_string()).unwrap_or_else(|| "-".to_string()),
                record.confidence_score,
                record.confidence_level.as_str(),
                record.all_tags().join(" ")
            ),
            (None, true) => {
                let line = serde_json::json!({
                    "file": o.path,
                    "error": o.error.as_deref().unwrap_or("unknown error"),
                });
                println!("{}", line);
            }
            (None, false) => println!(
                "[{}/{}] {}: ERROR: {}",
                idx + 1,
                outs.len(),
                o.path,
                o.error.as_deref().unwrap_or("unknown error")
            ),
        }
    }

    let ok_times: Vec<f32> = outs.iter().filter(|o| o.record.is_some()).map(|o| o.elapsed_ms).collect();
    let low = outs
        .iter()
        .filter_map(|o| o.record.as_ref())
        .filter(|r| r.is_low_confidence())
        .count();
    let wall_ms = t0.elapsed().as_secs_f64() * 1000.0;

    eprintln!(
        "Done: ok={}/{} low_confidence={} wall={:.0}ms",
        ok_times.len(),
        outs.len(),
        low,
        wall_ms
    );
    if !ok_times.is_empty() {
        let mean = ok_times.iter().sum::<f32>() / ok_times.len() as f32;
        let p50 = percentile(ok_times.clone(), 0.50).unwrap_or(mean);
        let p90 = percentile(ok_times.clone(), 0.90).unwrap_or(mean);
        eprintln!("per_file_ms: mean={:.2} p50={:.2} p90={:.2}", mean, p50, p90);
    }

    Ok(())
}
