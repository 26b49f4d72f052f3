mod common;

use std::fs::{self, File};

use ndarray::array;
use tiff::decoder::{Decoder, DecodingResult};

use common::{EW_1SDH, IW_1SDV, SM_1SSH, Workspace, annotation_xml, make_safe};
use s1feat::core::processing::swath_mask::{build_swath_mask, compose_swath_mask, swath_names};
use s1feat::io::annotation::{find_annotation_file, parse_annotation_str};
use s1feat::{AcquisitionMode, ErrorKind, MaskFormat, Outcome, Polarization, RunOptions};

fn read_tiff_u8(path: &std::path::Path) -> (u32, u32, Vec<u8>) {
    let mut decoder = Decoder::new(File::open(path).unwrap()).unwrap();
    let (w, h) = decoder.dimensions().unwrap();
    match decoder.read_image().unwrap() {
        DecodingResult::U8(data) => (w, h, data),
        _ => panic!("expected an 8-bit TIFF"),
    }
}

#[test]
fn test_annotation_dimensions_and_bounds() {
    let xml = annotation_xml(
        5,
        8,
        &[("EW1", vec![(0, 1, 0, 3), (2, 4, 0, 2)]), ("EW2", vec![(0, 4, 4, 7)])],
    );
    let geometry = parse_annotation_str(&xml).unwrap();
    assert_eq!(geometry.lines, 5);
    assert_eq!(geometry.samples, 8);
    assert_eq!(geometry.bounds.len(), 3);

    // A swath may own several disjoint boxes
    let ew1: Vec<_> = geometry.boxes_for("EW1").collect();
    assert_eq!(ew1.len(), 2);
    assert_eq!(ew1[1].first_azimuth_line, 2);
    assert_eq!(ew1[1].last_range_sample, 2);
    assert_eq!(geometry.boxes_for("EW3").count(), 0);
}

#[test]
fn test_non_overlapping_swaths_carry_their_ordinal() {
    let xml = annotation_xml(3, 6, &[("EW1", vec![(0, 1, 0, 1)]), ("EW2", vec![(0, 1, 3, 4)])]);
    let geometry = parse_annotation_str(&xml).unwrap();
    let mask = build_swath_mask(&geometry, AcquisitionMode::Ew).unwrap();

    assert_eq!(
        mask,
        array![
            [1u8, 1, 0, 2, 2, 0],
            [1, 1, 0, 2, 2, 0],
            [0, 0, 0, 0, 0, 0],
        ]
    );
}

#[test]
fn test_overlapping_swaths_sum_their_ordinals() {
    let xml = annotation_xml(2, 5, &[("IW1", vec![(0, 1, 0, 2)]), ("IW2", vec![(0, 1, 2, 4)])]);
    let geometry = parse_annotation_str(&xml).unwrap();
    let mask = build_swath_mask(&geometry, AcquisitionMode::Iw).unwrap();

    // Column 2 is covered by IW1 and IW2: 1 + 2, not max(1, 2)
    assert_eq!(mask, array![[1u8, 1, 3, 2, 2], [1, 1, 3, 2, 2]]);
}

#[test]
fn test_range_end_is_clamped_to_raster_width() {
    let xml = annotation_xml(2, 4, &[("IW3", vec![(0, 0, 2, 99)])]);
    let geometry = parse_annotation_str(&xml).unwrap();
    let mask = compose_swath_mask(&geometry, swath_names(AcquisitionMode::Iw).unwrap());
    assert_eq!(mask, array![[0u8, 0, 3, 3], [0, 0, 0, 0]]);
}

#[test]
fn test_swath_names_per_mode() {
    assert_eq!(
        swath_names(AcquisitionMode::Ew).unwrap(),
        &["EW1", "EW2", "EW3", "EW4", "EW5"]
    );
    assert_eq!(swath_names(AcquisitionMode::Iw).unwrap(), &["IW1", "IW2", "IW3"]);
    assert_eq!(
        swath_names(AcquisitionMode::Sm).unwrap_err().kind(),
        ErrorKind::UnsupportedConfiguration
    );
}

#[test]
fn test_annotation_lookup_requires_exactly_one_match() {
    let ws = Workspace::new();
    let xml = annotation_xml(1, 1, &[]);
    let safe = make_safe(&ws.l1, EW_1SDH, &[("hh", xml.clone())]);

    assert!(find_annotation_file(&safe, Polarization::Hh).is_ok());

    let missing: s1feat::Error = find_annotation_file(&safe, Polarization::Hv).unwrap_err().into();
    assert_eq!(missing.kind(), ErrorKind::NotFound);

    fs::write(
        safe.join("annotation").join("s1b-ew-grd-hh-duplicate-002.xml"),
        &xml,
    )
    .unwrap();
    let ambiguous: s1feat::Error = find_annotation_file(&safe, Polarization::Hh).unwrap_err().into();
    assert_eq!(ambiguous.kind(), ErrorKind::InvalidInput);
}

#[test]
fn test_tiff_mask_written_and_rerun_is_bit_identical() {
    let ws = Workspace::new();
    let safe = ws.ew_product();
    let feat = ws.feature_dir(EW_1SDH);

    let first = ws.extractor(RunOptions::default());
    let outcome = first.extract_swath_mask(&safe, &feat, MaskFormat::Tiff).unwrap();
    let mask_path = feat.join("swath_mask.tif");
    assert_eq!(outcome, Outcome::Produced(vec![mask_path.clone()]));

    let (w, h, data) = read_tiff_u8(&mask_path);
    assert_eq!((w, h), (6, 4));
    assert_eq!(&data[..6], &[1, 1, 1, 2, 2, 2]);
    assert_eq!(first.engine().calls(), 0);

    // Without overwrite the existing mask is kept
    let skipped = first.extract_swath_mask(&safe, &feat, MaskFormat::Tiff).unwrap();
    assert_eq!(skipped, Outcome::Skipped);

    let rerun = ws.extractor(RunOptions {
        overwrite: true,
        dry_run: false,
    });
    rerun.extract_swath_mask(&safe, &feat, MaskFormat::Tiff).unwrap();
    let (_, _, again) = read_tiff_u8(&mask_path);
    assert_eq!(again, data);
}

#[test]
fn test_mask_uses_first_polarization_annotation() {
    let ws = Workspace::new();
    let vv = annotation_xml(1, 3, &[("IW1", vec![(0, 0, 0, 0)]), ("IW3", vec![(0, 0, 2, 2)])]);
    let vh = annotation_xml(1, 3, &[]);
    let safe = make_safe(&ws.l1, IW_1SDV, &[("vv", vv), ("vh", vh)]);
    let feat = ws.feature_dir(IW_1SDV);

    ws.extractor(RunOptions::default())
        .extract_swath_mask(&safe, &feat, MaskFormat::Tiff)
        .unwrap();
    let (_, _, data) = read_tiff_u8(&feat.join("swath_mask.tif"));
    assert_eq!(data, vec![1, 0, 3]);
}

#[test]
fn test_unsupported_mode_fails_before_writing() {
    let ws = Workspace::new();
    let safe = make_safe(&ws.l1, SM_1SSH, &[("hh", annotation_xml(2, 2, &[]))]);
    let feat = ws.feature_dir(SM_1SSH);

    let err = ws
        .extractor(RunOptions::default())
        .extract_swath_mask(&safe, &feat, MaskFormat::Envi)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedConfiguration);
    assert!(!feat.exists());
}

#[test]
fn test_dry_run_writes_nothing() {
    let ws = Workspace::new();
    let safe = ws.ew_product();
    let feat = ws.feature_dir(EW_1SDH);

    let outcome = ws
        .extractor(RunOptions {
            overwrite: false,
            dry_run: true,
        })
        .extract_swath_mask(&safe, &feat, MaskFormat::Tiff)
        .unwrap();
    assert_eq!(outcome, Outcome::DryRun);
    assert!(!feat.join("swath_mask.tif").exists());
}

#[test]
fn test_unbounded_box_end_is_clamped_without_overflow() {
    let xml = annotation_xml(2, 3, &[("EW2", vec![(1, usize::MAX, 0, usize::MAX)])]);
    let geometry = parse_annotation_str(&xml).unwrap();
    let mask = build_swath_mask(&geometry, AcquisitionMode::Ew).unwrap();
    assert_eq!(mask, array![[0u8, 0, 0], [2, 2, 2]]);
}
