//! Randomized invariant checks over synthetic DNA profiles and waveforms

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sample_dna::analysis::confidence::score;
use sample_dna::analysis::fusion::classify;
use sample_dna::preprocessing::silence::{find_onset, trim_leading_silence};
use sample_dna::{analyze, tag_from_path, AnalysisConfig, Category, DnaProfile, SemanticTagResult};

const CASES: usize = 2000;

fn random_dna(rng: &mut StdRng) -> DnaProfile {
    let zcr: f32 = rng.random_range(0.0..0.6);
    let centroid = zcr * 22050.0;
    DnaProfile {
        peak_frequency: if rng.random_bool(0.3) { 0.0 } else { rng.random_range(20.0..1200.0) },
        spectral_centroid: centroid,
        brightness: (centroid / 12000.0).min(1.0),
        attack_ms: rng.random_range(0.1..100.0),
        decay_ms: rng.random_range(1.0..2000.0),
        zero_crossing_rate: zcr,
        pitch_confidence: rng.random_range(0.0..10.0),
    }
}

#[test]
fn test_locked_category_is_never_contradicted() {
    let config = AnalysisConfig::default();
    let mut rng = StdRng::seed_from_u64(0x5eed);

    let locked_paths = [
        ("Kicks", "Kick_01.wav"),
        ("Bass", "Sub_03.wav"),
        ("Snares", "Snare_Tight.wav"),
        ("Claps", "Clap_Room.wav"),
        ("Hats", "Closed_Hat.wav"),
        ("Cymbals", "Crash_Long.wav"),
        ("Vocals", "Vox_Chop_Am.wav"),
    ];

    for (path, name) in locked_paths {
        let semantic = tag_from_path(path, name, &config.dictionary);
        assert!(semantic.is_locked, "{} should lock", path);
        let locked = semantic.master_category.expect("locked category");

        for _ in 0..CASES {
            let dna = random_dna(&mut rng);
            let fusion = classify(&dna, &semantic, &config);
            assert_eq!(fusion.category, Some(locked));

            let other_categories: Vec<&str> = fusion
                .acoustic_tags
                .iter()
                .filter_map(|t| Category::from_tag(t))
                .filter(|c| *c != locked)
                .map(|c| c.tag())
                .collect();
            assert!(
                other_categories.is_empty(),
                "{:?} contradicted by {:?} for {:?}",
                locked,
                other_categories,
                dna
            );
        }
    }
}

#[test]
fn test_confidence_monotone_in_semantic_confidence() {
    let config = AnalysisConfig::default();
    let mut rng = StdRng::seed_from_u64(11);

    for _ in 0..CASES / 4 {
        let dna = random_dna(&mut rng);
        let category = Category::ALL[rng.random_range(0..Category::ALL.len())];
        let is_locked = rng.random_bool(0.5);

        let mut previous = 0u8;
        for confidence in (0..=100u8).step_by(5) {
            let semantic = SemanticTagResult {
                tags: vec![category.tag().to_string()],
                confidence,
                is_master_tag: true,
                is_locked,
                master_category: Some(category),
                musical_key: None,
            };
            let fusion = classify(&dna, &semantic, &config);
            let s = score(&dna, &semantic, &fusion, &config.zoning, &config.confidence);
            assert!(s <= 100);
            assert!(s >= previous, "score fell from {} to {} at {}", previous, s, confidence);
            previous = s;
        }
    }
}

#[test]
fn test_trim_is_idempotent() {
    let mut rng = StdRng::seed_from_u64(3);

    for _ in 0..CASES {
        let silence = rng.random_range(0..500);
        let len = rng.random_range(0..500);
        let threshold: f32 = rng.random_range(0.0..0.1);

        let mut samples = vec![0.0f32; silence];
        samples.extend((0..len).map(|_| rng.random_range(-1.0f32..1.0)));

        let trimmed = trim_leading_silence(&samples, threshold);
        assert_eq!(find_onset(trimmed, threshold), 0);
        assert_eq!(trim_leading_silence(trimmed, threshold), trimmed);
    }
}

#[test]
fn test_random_waveforms_never_violate_profile_invariants() {
    let config = AnalysisConfig::default();
    let mut rng = StdRng::seed_from_u64(99);

    for _ in 0..40 {
        let len = rng.random_range(0..20000);
        let gain: f32 = rng.random_range(0.0..1.0);
        let samples: Vec<f32> = (0..len).map(|_| gain * rng.random_range(-1.0f32..1.0)).collect();

        let (dna, record) = analyze(&samples, 44100, "Unsorted", "take.wav", &config);
        for value in [
            dna.peak_frequency,
            dna.spectral_centroid,
            dna.brightness,
            dna.attack_ms,
            dna.decay_ms,
            dna.zero_crossing_rate,
            dna.pitch_confidence,
        ] {
            assert!(value.is_finite() && value >= 0.0, "{:?}", dna);
        }
        assert!(dna.brightness <= 1.0 && dna.zero_crossing_rate <= 1.0);
        if !dna.is_silent() {
            assert!(dna.attack_ms > 0.0 && dna.decay_ms > 0.0);
        }
        assert!(record.confidence_score <= 100);
    }
}
