use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use hashbrown::HashSet;
use log::{debug, info, warn};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::Error;
use crate::model::{Point3, RawSegment};
use crate::output::{DERIVED_META_FIELDS, DERIVED_SEGMENT_FIELDS};

/// Input record dropped before processing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRecord {
    /// Position of the record in the input list
    pub index: usize,
    pub id: Option<String>,
    pub reason: String,
}

/// Valid input records, the input metadata, and the records that were dropped
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadedSegments {
    pub meta: Map<String, Value>,
    pub segments: Vec<RawSegment>,
    pub skipped: Vec<SkippedRecord>,
}

impl LoadedSegments {
    pub fn from_segments(segments: Vec<RawSegment>) -> Self {
        Self {
            segments,
            ..Self::default()
        }
    }
}

#[derive(Debug, Deserialize)]
struct InputFile {
    #[serde(default)]
    meta: Map<String, Value>,
    segments: Vec<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SegmentRecordIn {
    id: String,
    #[serde(rename = "type")]
    road_type: String,
    points: Vec<Vec<f64>>,
    avg_speed_mph: f64,
    free_flow_speed_mph: f64,
    spawn_rates: Vec<f64>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

/// Read a road segments file.
///
/// # Errors
///
/// Fails if the file cannot be opened or is not a JSON object with a
/// `segments` array. Individual malformed records do not fail the read; they
/// are reported in [`LoadedSegments::skipped`].
pub fn read_segments(path: &Path) -> Result<LoadedSegments, Error> {
    info!("Reading {}", path.display());
    let file = File::open(path).map_err(|e| {
        std::io::Error::new(
            e.kind(),
            format!("Failed to open file '{}': {}", path.display(), e),
        )
    })?;
    let value: Value = serde_json::from_reader(BufReader::new(file))?;
    parse_segments(value)
}

/// Validate the records of an already parsed segments document
///
/// # Errors
///
/// Fails if the document does not have the expected top-level shape
pub fn parse_segments(document: Value) -> Result<LoadedSegments, Error> {
    let InputFile { mut meta, segments } = serde_json::from_value(document)?;
    let total = segments.len();
    for field in DERIVED_META_FIELDS {
        meta.remove(*field);
    }

    let mut seen: HashSet<String> = HashSet::with_capacity(total);
    let mut loaded = LoadedSegments {
        meta,
        segments: Vec::with_capacity(total),
        skipped: Vec::new(),
    };

    for (index, value) in segments.into_iter().enumerate() {
        let id = value.get("id").and_then(Value::as_str).map(str::to_string);

        let result = parse_record(value).and_then(|segment| {
            if seen.insert(segment.id.clone()) {
                Ok(segment)
            } else {
                Err(format!("duplicate segment id '{}'", segment.id))
            }
        });

        match result {
            Ok(segment) => loaded.segments.push(segment),
            Err(reason) => {
                warn!(
                    "Skipping segment #{index} ({}): {reason}",
                    id.as_deref().unwrap_or("<no id>")
                );
                loaded.skipped.push(SkippedRecord { index, id, reason });
            }
        }
    }

    info!(
        "Loaded {} segments ({} skipped)",
        loaded.segments.len(),
        loaded.skipped.len()
    );
    Ok(loaded)
}

fn parse_record(value: Value) -> Result<RawSegment, String> {
    let record: SegmentRecordIn = serde_json::from_value(value).map_err(|e| e.to_string())?;

    if record.points.len() < 2 {
        return Err(format!(
            "needs at least 2 points, has {}",
            record.points.len()
        ));
    }

    let points = record
        .points
        .iter()
        .map(|p| match p.as_slice() {
            &[x, y, z] if x.is_finite() && y.is_finite() && z.is_finite() => Ok([x, y, z]),
            _ => Err(format!("point {p:?} is not three finite coordinates")),
        })
        .collect::<Result<Vec<Point3>, String>>()?;

    if !record.avg_speed_mph.is_finite() {
        return Err("avgSpeedMph is not a finite number".to_string());
    }
    if !(record.free_flow_speed_mph.is_finite() && record.free_flow_speed_mph > 0.0) {
        return Err(format!(
            "freeFlowSpeedMph must be positive, got {}",
            record.free_flow_speed_mph
        ));
    }

    let mut extra = record.extra;
    for field in DERIVED_SEGMENT_FIELDS {
        if extra.remove(*field).is_some() {
            debug!("Dropping stale derived field '{field}' of {}", record.id);
        }
    }

    Ok(RawSegment {
        id: record.id,
        points,
        road_type: record.road_type,
        avg_speed_mph: record.avg_speed_mph,
        free_flow_speed_mph: record.free_flow_speed_mph,
        spawn_rates: record.spawn_rates,
        extra,
    })
}
