//! CSV table I/O for the pipeline boundary.
//!
//! Readers: the recording's annotation export (`onset,duration,description`)
//! and the detector's wave summary table.  Writers: one CSV per output table,
//! column names matching the in-memory structs so downstream tooling can
//! consume them without a mapping layer.

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;

use crate::annot::Annotation;
use crate::classify::{ClassifiedWave, DetectedWave};
use crate::epochs::{OverlapRecord, Protocol};
use crate::pairing::{CleanedPair, OmittedEvent};

// ── Readers ───────────────────────────────────────────────────────────────

/// Load the annotation table from `path`.
pub fn read_annotations(path: &Path) -> Result<Vec<Annotation>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("opening annotation table {}", path.display()))?;
    let mut annotations = Vec::new();
    for record in reader.deserialize() {
        let annotation: Annotation =
            record.with_context(|| format!("parsing annotation row in {}", path.display()))?;
        annotations.push(annotation);
    }
    Ok(annotations)
}

/// Load the external detector's wave summary table from `path`.
pub fn read_waves(path: &Path) -> Result<Vec<DetectedWave>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("opening wave table {}", path.display()))?;
    let mut waves = Vec::new();
    for record in reader.deserialize() {
        let wave: DetectedWave =
            record.with_context(|| format!("parsing wave row in {}", path.display()))?;
        waves.push(wave);
    }
    Ok(waves)
}

// ── Writers ───────────────────────────────────────────────────────────────

fn write_table<S: Serialize>(path: &Path, rows: &[S]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush().with_context(|| format!("flushing {}", path.display()))?;
    Ok(())
}

/// Write the validated stimulation intervals.
pub fn write_cleaned_pairs(path: &Path, pairs: &[CleanedPair]) -> Result<()> {
    write_table(path, pairs)
}

/// Write the omission log.
pub fn write_omitted_events(path: &Path, omitted: &[OmittedEvent]) -> Result<()> {
    write_table(path, omitted)
}

/// Write the overlap-adjustment audit log.
pub fn write_overlaps(path: &Path, overlaps: &[OverlapRecord]) -> Result<()> {
    write_table(path, overlaps)
}

#[derive(Serialize)]
struct ProtocolRow {
    protocol: u32,
    pre_start: f64,
    pre_end: f64,
    stim_start: f64,
    stim_end: f64,
    post_start: f64,
    post_end: f64,
}

/// Write the protocol/epoch table, one row per protocol with all six epoch
/// boundaries.
pub fn write_protocols(path: &Path, protocols: &[Protocol]) -> Result<()> {
    let rows: Vec<ProtocolRow> = protocols
        .iter()
        .map(|p| ProtocolRow {
            protocol: p.number,
            pre_start: p.pre_stim.start,
            pre_end: p.pre_stim.end,
            stim_start: p.stim.start,
            stim_end: p.stim.end,
            post_start: p.post_stim.start,
            post_end: p.post_stim.end,
        })
        .collect();
    write_table(path, &rows)
}

/// Flat classified-wave row: the detector's columns verbatim, then the
/// classification columns this pipeline adds.
#[derive(Serialize)]
struct ClassifiedRow<'a> {
    #[serde(rename = "Start")]
    start: f64,
    #[serde(rename = "NegPeak")]
    neg_peak: f64,
    #[serde(rename = "MidCrossing")]
    mid_crossing: f64,
    #[serde(rename = "PosPeak")]
    pos_peak: f64,
    #[serde(rename = "End")]
    end: f64,
    #[serde(rename = "Duration")]
    duration: f64,
    #[serde(rename = "ValNegPeak")]
    val_neg_peak: f64,
    #[serde(rename = "ValPosPeak")]
    val_pos_peak: f64,
    #[serde(rename = "PTP")]
    ptp: f64,
    #[serde(rename = "Slope")]
    slope: f64,
    #[serde(rename = "Frequency")]
    frequency: f64,
    #[serde(rename = "Channel")]
    channel: &'a str,
    #[serde(rename = "IdxChannel")]
    idx_channel: u32,
    classification: &'a str,
    protocol_number: u32,
    name: &'a str,
}

impl<'a> From<&'a ClassifiedWave> for ClassifiedRow<'a> {
    fn from(w: &'a ClassifiedWave) -> Self {
        ClassifiedRow {
            start: w.wave.start,
            neg_peak: w.wave.neg_peak,
            mid_crossing: w.wave.mid_crossing,
            pos_peak: w.wave.pos_peak,
            end: w.wave.end,
            duration: w.wave.duration,
            val_neg_peak: w.wave.val_neg_peak,
            val_pos_peak: w.wave.val_pos_peak,
            ptp: w.wave.ptp,
            slope: w.wave.slope,
            frequency: w.wave.frequency,
            channel: &w.wave.channel,
            idx_channel: w.wave.idx_channel,
            classification: w.classification.label(),
            protocol_number: w.protocol_number,
            name: &w.name,
        }
    }
}

/// Write a classified-wave table (the full canonical table or a selection).
pub fn write_classified_waves(path: &Path, waves: &[ClassifiedWave]) -> Result<()> {
    let rows: Vec<ClassifiedRow> = waves.iter().map(ClassifiedRow::from).collect();
    write_table(path, &rows)
}
