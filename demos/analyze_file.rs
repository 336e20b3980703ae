//! Example: Analyze a single sample file
//!
//! Usage: `cargo run --example analyze_file -- <path/to/Sample.wav> [config.json]`

use std::env;
use std::path::Path;

use sample_dna::io::decoder::AudioDecoder;
use sample_dna::{analyze_waveform, AnalysisConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut args = env::args().skip(1);
    let path = match args.next() {
        Some(p) => p,
        None => {
            eprintln!("Usage: analyze_file <file> [config.json]");
            std::process::exit(2);
        }
    };

    let config = match args.next() {
        Some(config_path) => AnalysisConfig::from_json_str(&std::fs::read_to_string(config_path)?)?,
        None => AnalysisConfig::default(),
    };

    let file = Path::new(&path);
    let name = file.file_name().and_then(|n| n.to_str()).unwrap_or_default();
    let dir = file.parent().and_then(|p| p.to_str()).unwrap_or_default();

    let mut decoder = AudioDecoder::new();
    let waveform = decoder.decode_file(file)?;
    let (dna, record) = analyze_waveform(&waveform, dir, name, &config);

    println!("Analysis Results:");
    println!("  Duration: {:.2} s ({:?})", record.metadata.duration_seconds, record.metadata.sample_kind);
    println!(
        "  Pitch: {:.2} Hz (ratio: {:.2})",
        dna.peak_frequency, dna.pitch_confidence
    );
    println!("  Attack: {:.2} ms, Decay: {:.1} ms", dna.attack_ms, dna.decay_ms);
    println!(
        "  Brightness: {:.3} (ZCR {:.4}, ~{:.0} Hz)",
        dna.brightness, dna.zero_crossing_rate, dna.spectral_centroid
    );
    println!("  Category: {}", record.category.map(|c| c.to_string()).unwrap_or_else(|| "-".to_string()));
    if let Some(key) = record.musical_key {
        println!("  Key: {}", key.name());
    }
    println!("  Tags: {}", record.all_tags().join(" "));
    println!(
        "  Confidence: {} ({})",
        record.confidence_score,
        record.confidence_level.as_str()
    );
    if !record.metadata.flags.is_empty() {
        println!("  Flags: {:?}", record.metadata.flags);
    }

    Ok(())
}
