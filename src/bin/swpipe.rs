use anyhow::Result;
use clap::Parser;
use std::fs;
use std::path::PathBuf;

use stimwave::{
    io::{
        read_annotations, read_waves, write_classified_waves, write_cleaned_pairs,
        write_omitted_events, write_overlaps, write_protocols,
    },
    render_summary, run_session, standard_selections, OverlapPolicy, PipelineConfig,
};

#[derive(Parser)]
#[command(
    name = "swpipe",
    about = "Validate stim annotations, build protocol epochs, classify slow waves"
)]
struct Args {
    /// Annotation table (onset,duration,description)
    #[arg(long)]
    annotations: PathBuf,

    /// Detector wave summary table (YASA sw_detect columns)
    #[arg(long)]
    waves: PathBuf,

    /// Directory for the output tables
    #[arg(long)]
    output_dir: PathBuf,

    /// Minimum valid stim pair duration (s)
    #[arg(long, default_value_t = 170.0)]
    min_duration: f64,

    /// Maximum valid stim pair duration (s)
    #[arg(long, default_value_t = 220.0)]
    max_duration: f64,

    /// Pre-stim window length (s)
    #[arg(long, default_value_t = 180.0)]
    pre_window: f64,

    /// Post-stim window length (s)
    #[arg(long, default_value_t = 180.0)]
    post_window: f64,

    /// Overlap policy: midpoint-split | earlier-protocol-priority
    #[arg(long, default_value = "midpoint-split")]
    overlap_policy: OverlapPolicy,

    /// Recording length in seconds, to bound post-stim windows
    #[arg(long)]
    recording_length: Option<f64>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let cfg = PipelineConfig {
        min_duration: args.min_duration,
        max_duration: args.max_duration,
        pre_window: args.pre_window,
        post_window: args.post_window,
        overlap_policy: args.overlap_policy,
    };
    cfg.validate()?;

    let annotations = read_annotations(&args.annotations)?;
    let waves = read_waves(&args.waves)?;
    println!(
        "Loaded {} annotations, {} detected waves",
        annotations.len(),
        waves.len()
    );

    let out = run_session(&annotations, &waves, args.recording_length, &cfg)?;
    println!(
        "{} protocols, {} omissions, {}/{} waves classified",
        out.protocols.len(),
        out.omitted.len(),
        out.waves.len(),
        waves.len()
    );

    fs::create_dir_all(&args.output_dir)?;
    let dir = &args.output_dir;
    write_cleaned_pairs(&dir.join("cleaned_pairs.csv"), &out.pairs)?;
    write_omitted_events(&dir.join("omitted_events.csv"), &out.omitted)?;
    write_protocols(&dir.join("protocols.csv"), &out.protocols)?;
    write_overlaps(&dir.join("overlaps.csv"), &out.overlaps)?;
    write_classified_waves(&dir.join("classified_waves.csv"), &out.waves)?;

    for (name, selection) in standard_selections(&out.waves) {
        write_classified_waves(&dir.join(format!("{name}.csv")), &selection)?;
    }

    fs::write(dir.join("session_summary.txt"), render_summary(&out, &cfg))?;
    println!("Written → {}", dir.display());

    Ok(())
}
