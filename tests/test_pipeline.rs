mod common;
use common::{ann, short_cfg, wave};
use stimwave::{run_session, Annotation, Classification, PipelineConfig};

#[test]
fn well_formed_session_produces_two_clean_protocols() {
    let annotations = vec![
        ann(0.0, "stim start"),
        ann(5.0, "stim end"),
        ann(20.0, "stim start"),
        ann(55.0, "stim end"),
    ];
    let out = run_session(&annotations, &[], None, &short_cfg()).unwrap();
    assert_eq!(out.pairs.len(), 2);
    assert!(out.omitted.is_empty());
    assert_eq!((out.pairs[0].start_onset, out.pairs[0].end_onset), (0.0, 5.0));
    assert_eq!((out.pairs[1].start_onset, out.pairs[1].end_onset), (20.0, 55.0));
    assert_eq!(out.protocols.len(), 2);
    assert_eq!(out.gaps, vec![15.0]);
}

#[test]
fn too_short_pair_goes_to_the_omission_log() {
    let annotations = vec![ann(0.0, "stim start"), ann(0.5, "stim end")];
    let out = run_session(&annotations, &[], None, &short_cfg()).unwrap();
    assert!(out.pairs.is_empty());
    assert_eq!(out.omitted.len(), 1);
    assert_eq!(out.omitted[0].reason, "invalid duration 0.5");
}

#[test]
fn leading_end_marker_is_omitted_and_pairing_recovers() {
    let annotations = vec![ann(0.0, "stim end"), ann(1.0, "stim start"), ann(4.0, "stim end")];
    let out = run_session(&annotations, &[], None, &short_cfg()).unwrap();
    assert_eq!(out.omitted.len(), 1);
    assert_eq!(out.omitted[0].reason, "unexpected event 'stim end'");
    assert_eq!(out.pairs.len(), 1);
    assert_eq!((out.pairs[0].start_onset, out.pairs[0].end_onset), (1.0, 4.0));
}

#[test]
fn close_protocols_share_a_clipped_boundary() {
    let annotations = vec![
        ann(0.0, "stim start"),
        ann(5.0, "stim end"),
        ann(6.0, "stim start"),
        ann(11.0, "stim end"),
    ];
    let out = run_session(&annotations, &[], None, &short_cfg()).unwrap();
    assert_eq!(out.overlaps.len(), 1);
    let boundary = out.protocols[0].post_stim.end;
    assert!(boundary > 5.0 && boundary < 6.0, "boundary {boundary} outside (5, 6)");
    assert_eq!(out.protocols[1].pre_stim.start, boundary);
    assert_eq!(out.overlaps[0].adjusted_post_end, boundary);
}

#[test]
fn wave_in_second_stim_is_never_post_stim_of_the_first() {
    let annotations = vec![
        ann(0.0, "stim start"),
        ann(5.0, "stim end"),
        ann(6.0, "stim start"),
        ann(11.0, "stim end"),
    ];
    let waves = vec![wave(7.0, "E032")];
    let out = run_session(&annotations, &waves, None, &short_cfg()).unwrap();
    assert_eq!(out.waves.len(), 1);
    assert_eq!(out.waves[0].classification, Classification::Stim);
    assert_eq!(out.waves[0].protocol_number, 2);
    assert_eq!(out.waves[0].name, "proto2_stim_sw1");
}

#[test]
fn every_annotation_is_accounted_for() {
    // A deliberately messy stream: stray end, replaced start, invalid
    // duration, dangling start, plus non-stim annotations in between.
    let annotations = vec![
        ann(0.0, "stim end"),
        ann(1.0, "boundary"),
        ann(2.0, "stim start"),
        ann(3.0, "stim start"),
        ann(8.0, "stim end"),
        ann(50.0, "stim start"),
        ann(200.0, "stim end"), // 150 s > max_duration
        ann(300.0, "stim start"),
    ];
    let out = run_session(&annotations, &[], None, &short_cfg()).unwrap();

    let stim_count =
        annotations.iter().filter(|a| a.description.starts_with("stim")).count();
    let in_pairs = out.pairs.len() * 2;
    let pair_omissions =
        out.omitted.iter().filter(|o| o.event_description.is_none()).count();
    let single_omissions = out.omitted.len() - pair_omissions;
    assert_eq!(in_pairs + 2 * pair_omissions + single_omissions, stim_count);
}

#[test]
fn duration_invariant_holds_for_all_cleaned_pairs() {
    let annotations = vec![
        ann(0.0, "stim start"),
        ann(1.0, "stim end"), // too short
        ann(10.0, "stim start"),
        ann(15.0, "stim end"),
        ann(100.0, "stim start"),
        ann(139.0, "stim end"),
    ];
    let cfg = short_cfg();
    let out = run_session(&annotations, &[], None, &cfg).unwrap();
    assert_eq!(out.pairs.len(), 2);
    for p in &out.pairs {
        let d = p.duration();
        assert!(cfg.min_duration <= d && d <= cfg.max_duration, "duration {d} out of bounds");
        assert!(p.end_onset > p.start_onset);
    }
}

#[test]
fn epochs_are_ordered_and_disjoint_across_protocols() {
    let annotations = vec![
        ann(5.0, "stim start"),
        ann(10.0, "stim end"),
        ann(14.0, "stim start"),
        ann(20.0, "stim end"),
        ann(60.0, "stim start"),
        ann(70.0, "stim end"),
    ];
    let out = run_session(&annotations, &[], Some(75.0), &short_cfg()).unwrap();
    assert_eq!(out.protocols.len(), 3);
    for p in &out.protocols {
        assert!(p.pre_stim.start <= p.pre_stim.end);
        assert_eq!(p.pre_stim.end, p.stim.start);
        assert!(p.stim.start < p.stim.end);
        assert_eq!(p.post_stim.start, p.stim.end);
        assert!(p.post_stim.start <= p.post_stim.end);
    }
    for pair in out.protocols.windows(2) {
        assert!(pair[0].post_stim.end <= pair[1].pre_stim.start);
    }
    // Post-stim window of the last protocol respects the recording end.
    assert!(out.protocols[2].post_stim.end <= 75.0);
}

#[test]
fn classification_totality_over_a_dense_wave_grid() {
    let annotations = vec![
        ann(20.0, "stim start"),
        ann(25.0, "stim end"),
        ann(40.0, "stim start"),
        ann(50.0, "stim end"),
    ];
    let waves: Vec<_> = (0..140).map(|i| wave(i as f64 * 0.5, "E032")).collect();
    let out = run_session(&annotations, &waves, None, &short_cfg()).unwrap();
    assert_eq!(out.waves.len() + out.dropped_waves, waves.len());
    for w in &out.waves {
        let p = &out.protocols[(w.protocol_number - 1) as usize];
        let t = w.wave.start;
        let inside = match w.classification {
            Classification::PreStim => p.pre_stim.start <= t && t < p.pre_stim.end,
            Classification::Stim => p.stim.start <= t && t <= p.stim.end,
            Classification::PostStim => p.post_stim.start < t && t <= p.post_stim.end,
        };
        assert!(inside, "{} at {t}s outside its {:?} epoch", w.name, w.classification);
    }
}

#[test]
fn rerun_on_same_input_is_byte_identical() {
    let annotations = vec![
        ann(0.0, "stim end"),
        ann(2.0, "stim start"),
        ann(8.0, "stim end"),
        ann(12.0, "stim start"),
        ann(20.0, "stim end"),
    ];
    let waves: Vec<_> = (0..30).map(|i| wave(i as f64, "E025")).collect();
    let cfg = short_cfg();

    let dir = tempfile::tempdir().unwrap();
    let mut files = Vec::new();
    for run in 0..2 {
        let out = run_session(&annotations, &waves, Some(40.0), &cfg).unwrap();
        let path = dir.path().join(format!("classified_{run}.csv"));
        stimwave::io::write_classified_waves(&path, &out.waves).unwrap();
        files.push(std::fs::read(&path).unwrap());
    }
    assert_eq!(files[0], files[1]);
}

#[test]
fn invalid_config_fails_before_any_processing() {
    let cfg = PipelineConfig { min_duration: 40.0, max_duration: 2.0, ..short_cfg() };
    let annotations = vec![ann(0.0, "stim start"), ann(5.0, "stim end")];
    assert!(run_session(&annotations, &[], None, &cfg).is_err());
}

#[test]
fn session_without_stim_markers_is_empty_but_valid() {
    let annotations: Vec<Annotation> =
        (0..5).map(|i| ann(i as f64 * 10.0, "eyes closed")).collect();
    let waves = vec![wave(12.0, "E032")];
    let out = run_session(&annotations, &waves, None, &short_cfg()).unwrap();
    assert!(out.pairs.is_empty() && out.protocols.is_empty() && out.waves.is_empty());
    assert_eq!(out.dropped_waves, 1);
}
