//! Swath geometry reader for Sentinel-1 product annotation documents.
//!
//! One annotation XML exists per polarization under `<product>/annotation/`.
//! The reader pulls the raster dimensions (`numberOfLines`,
//! `numberOfSamples`) and every `swathBounds` record of the swath merge
//! list, each tagged with the name of the swath it belongs to.
use std::fs;
use std::io::BufRead;
use std::path::{Path, PathBuf};

use quick_xml::Reader;
use quick_xml::events::Event;
use thiserror::Error;
use tracing::debug;

use crate::types::Polarization;

#[derive(Debug, Error)]
pub enum AnnotationError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("XML parse error: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("no {polarization} annotation file in {}", folder.display())]
    NoMatch {
        folder: PathBuf,
        polarization: Polarization,
    },
    #[error("{count} {polarization} annotation files in {}, expected exactly one", folder.display())]
    Ambiguous {
        folder: PathBuf,
        polarization: Polarization,
        count: usize,
    },
    #[error("missing field `{0}` in annotation")]
    MissingField(&'static str),
    #[error("cannot parse `{field}` value `{value}`")]
    Parse { field: &'static str, value: String },
}

/// Inclusive pixel bounds of one swath region
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwathBoundingBox {
    pub swath: String,
    pub first_azimuth_line: usize,
    pub last_azimuth_line: usize,
    pub first_range_sample: usize,
    pub last_range_sample: usize,
}

/// Raster dimensions plus all swath bounds of one annotation document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwathGeometry {
    pub lines: usize,
    pub samples: usize,
    pub bounds: Vec<SwathBoundingBox>,
}

impl SwathGeometry {
    /// All boxes recorded for `swath`; a swath may own several disjoint boxes
    pub fn boxes_for<'a>(&'a self, swath: &'a str) -> impl Iterator<Item = &'a SwathBoundingBox> {
        self.bounds.iter().filter(move |b| b.swath == swath)
    }
}

/// Locate the single annotation document of `polarization` inside
/// `<safe_folder>/annotation` (`s1*<pol>*.xml`, case-insensitive).
pub fn find_annotation_file(
    safe_folder: &Path,
    polarization: Polarization,
) -> Result<PathBuf, AnnotationError> {
    let folder = safe_folder.join("annotation");
    let no_match = || AnnotationError::NoMatch {
        folder: folder.clone(),
        polarization,
    };
    if !folder.is_dir() {
        return Err(no_match());
    }

    let pol = polarization.as_lower();
    let mut matches = Vec::new();
    for entry in fs::read_dir(&folder)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let name = match path.file_name() {
            Some(n) => n.to_string_lossy().to_lowercase(),
            None => continue,
        };
        if name.starts_with("s1") && name.ends_with(".xml") && name.contains(pol) {
            matches.push(path);
        }
    }

    match matches.len() {
        0 => Err(no_match()),
        1 => Ok(matches.remove(0)),
        count => Err(AnnotationError::Ambiguous {
            folder,
            polarization,
            count,
        }),
    }
}

/// Parse an annotation document from disk
pub fn read_swath_geometry(path: &Path) -> Result<SwathGeometry, AnnotationError> {
    debug!("Reading swath geometry from {:?}", path);
    let mut reader = Reader::from_file(path)?;
    parse_swath_geometry(&mut reader)
}

/// Parse an annotation document held in memory
pub fn parse_annotation_str(xml: &str) -> Result<SwathGeometry, AnnotationError> {
    let mut reader = Reader::from_reader(xml.as_bytes());
    parse_swath_geometry(&mut reader)
}

#[derive(Default)]
struct PendingBox {
    first_azimuth_line: Option<usize>,
    last_azimuth_line: Option<usize>,
    first_range_sample: Option<usize>,
    last_range_sample: Option<usize>,
}

fn parse_field(field: &'static str, txt: &str) -> Result<usize, AnnotationError> {
    txt.trim().parse().map_err(|_| AnnotationError::Parse {
        field,
        value: txt.to_string(),
    })
}

fn parse_swath_geometry<R: BufRead>(reader: &mut Reader<R>) -> Result<SwathGeometry, AnnotationError> {
    reader.trim_text(true);
    let mut buf = Vec::new();
    let mut path: Vec<String> = Vec::new();
    let mut lines = None;
    let mut samples = None;
    let mut current_swath: Option<String> = None;
    let mut pending: Option<PendingBox> = None;
    let mut bounds = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(ref e) => {
                let tag = String::from_utf8_lossy(e.local_name().as_ref()).to_string();
                match tag.as_str() {
                    "swathMerge" => current_swath = None,
                    "swathBounds" => pending = Some(PendingBox::default()),
                    _ => {}
                }
                path.push(tag);
            }
            Event::End(ref e) => {
                let tag = String::from_utf8_lossy(e.local_name().as_ref()).to_string();
                if tag == "swathBounds" {
                    if let (Some(p), Some(swath)) = (pending.take(), current_swath.as_ref()) {
                        bounds.push(SwathBoundingBox {
                            swath: swath.clone(),
                            first_azimuth_line: p
                                .first_azimuth_line
                                .ok_or(AnnotationError::MissingField("firstAzimuthLine"))?,
                            last_azimuth_line: p
                                .last_azimuth_line
                                .ok_or(AnnotationError::MissingField("lastAzimuthLine"))?,
                            first_range_sample: p
                                .first_range_sample
                                .ok_or(AnnotationError::MissingField("firstRangeSample"))?,
                            last_range_sample: p
                                .last_range_sample
                                .ok_or(AnnotationError::MissingField("lastRangeSample"))?,
                        });
                    }
                }
                path.pop();
            }
            Event::Text(e) => {
                let txt = e.unescape()?;
                let curr = path.last().map(String::as_str).unwrap_or("");
                let parent = path
                    .len()
                    .checked_sub(2)
                    .and_then(|i| path.get(i))
                    .map(String::as_str)
                    .unwrap_or("");
                match (curr, pending.as_mut()) {
                    ("numberOfLines", _) if lines.is_none() => {
                        lines = Some(parse_field("numberOfLines", &txt)?)
                    }
                    ("numberOfSamples", _) if samples.is_none() => {
                        samples = Some(parse_field("numberOfSamples", &txt)?)
                    }
                    ("swath", _) if parent == "swathMerge" => current_swath = Some(txt.to_string()),
                    ("firstAzimuthLine", Some(p)) => {
                        p.first_azimuth_line = Some(parse_field("firstAzimuthLine", &txt)?)
                    }
                    ("lastAzimuthLine", Some(p)) => {
                        p.last_azimuth_line = Some(parse_field("lastAzimuthLine", &txt)?)
                    }
                    ("firstRangeSample", Some(p)) => {
                        p.first_range_sample = Some(parse_field("firstRangeSample", &txt)?)
                    }
                    ("lastRangeSample", Some(p)) => {
                        p.last_range_sample = Some(parse_field("lastRangeSample", &txt)?)
                    }
                    _ => {}
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    let geometry = SwathGeometry {
        lines: lines.ok_or(AnnotationError::MissingField("numberOfLines"))?,
        samples: samples.ok_or(AnnotationError::MissingField("numberOfSamples"))?,
        bounds,
    };
    debug!(
        "annotation: {} lines x {} samples, {} swath bounds",
        geometry.lines,
        geometry.samples,
        geometry.bounds.len()
    );
    Ok(geometry)
}
