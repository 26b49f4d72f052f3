#![allow(dead_code)]
//! Shared fixtures: synthetic SAFE folders, installed graph templates and an
//! in-process engine standing in for SNAP `gpt`.

use std::cell::{Cell, RefCell};
use std::fs;
use std::path::{Path, PathBuf};

use s1feat::{Engine, EngineConfig, EngineInvocation, FeatureExtractor, ProcessReport, RunOptions};

pub const EW_1SDH: &str = "S1A_EW_GRDM_1SDH_20230208T065619_20230208T065723_047141_05A7E5_F291";
pub const IW_1SDV: &str = "S1B_IW_GRDH_1SDV_20210115T171503_20210115T171528_025162_02FEA1_3C1A";
pub const SM_1SSH: &str = "S1A_SM_GRDH_1SSH_20220301T120000_20220301T120030_042100_050000_ABCD";

/// Every template the tests may select, relative to the graph root
pub const GRAPHS: &[&str] = &[
    "S1_EW_GRDM/S1_EW_GRDM_NR_Cal_XX.xml",
    "S1_EW_GRDM/S1_EW_GRDM_NR_Cal_dB_XX.xml",
    "S1_EW_GRDM/S1_EW_GRDM_NR_Cal_Spk_XX.xml",
    "S1_EW_GRDM/S1_EW_GRDM_NR_Cal_Spk_dB_XX.xml",
    "S1_IW_GRDM/S1_IW_GRDH_NR_Cal_XX.xml",
    "S1_IW_GRDM/S1_IW_GRDH_NR_Cal_dB_XX.xml",
    "S1_meta/S1_IA.xml",
    "S1_meta/S1_lat.xml",
    "S1_meta/S1_lon.xml",
];

/// One `<swathBounds>` record: (first az line, last az line, first rg sample, last rg sample)
pub type Bounds = (usize, usize, usize, usize);

/// Minimal annotation document with the fields the swath reader consumes
pub fn annotation_xml(lines: usize, samples: usize, swaths: &[(&str, Vec<Bounds>)]) -> String {
    let mut merges = String::new();
    for (name, boxes) in swaths {
        let mut list = String::new();
        for (fa, la, fr, lr) in boxes.iter() {
            list.push_str(&format!(
                "<swathBounds><firstAzimuthLine>{fa}</firstAzimuthLine>\
                 <firstRangeSample>{fr}</firstRangeSample>\
                 <lastAzimuthLine>{la}</lastAzimuthLine>\
                 <lastRangeSample>{lr}</lastRangeSample></swathBounds>"
            ));
        }
        merges.push_str(&format!(
            "<swathMerge><swath>{name}</swath>\
             <swathBoundsList count=\"{}\">{list}</swathBoundsList></swathMerge>",
            boxes.len()
        ));
    }
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<product>
  <adsHeader><swath>EW</swath><polarisation>HH</polarisation></adsHeader>
  <imageAnnotation>
    <imageInformation>
      <numberOfSamples>{samples}</numberOfSamples>
      <numberOfLines>{lines}</numberOfLines>
    </imageInformation>
  </imageAnnotation>
  <swathMerging>
    <swathMergeList count="{}">{merges}</swathMergeList>
  </swathMerging>
</product>"#,
        swaths.len()
    )
}

/// Create `<dir>/<basename>.SAFE` with one annotation file per given polarization
pub fn make_safe(dir: &Path, basename: &str, annotations: &[(&str, String)]) -> PathBuf {
    let safe = dir.join(format!("{basename}.SAFE"));
    let annotation = safe.join("annotation");
    fs::create_dir_all(&annotation).unwrap();
    fs::write(safe.join("manifest.safe"), "<manifest/>").unwrap();
    for (pol, xml) in annotations {
        let name = format!("s1a-ew-grd-{pol}-20230208t065619-20230208t065723-047141-05a7e5-001.xml");
        fs::write(annotation.join(name), xml).unwrap();
    }
    safe
}

pub fn install_graphs(root: &Path) {
    for rel in GRAPHS {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "<graph/>").unwrap();
    }
}

/// Engine double: records invocations and writes the staged band files the
/// real tool would produce
pub struct FakeEngine {
    exe: PathBuf,
    calls: Cell<usize>,
    invocations: RefCell<Vec<EngineInvocation>>,
    /// Exit code to report instead of success
    pub fail_with: Option<i32>,
    /// Whether successful runs write their staged outputs
    pub produce: bool,
}

impl FakeEngine {
    pub fn new(exe: PathBuf) -> Self {
        Self {
            exe,
            calls: Cell::new(0),
            invocations: RefCell::new(Vec::new()),
            fail_with: None,
            produce: true,
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }

    pub fn invocations(&self) -> Vec<EngineInvocation> {
        self.invocations.borrow().clone()
    }

    fn staged_stem(inv: &EngineInvocation) -> String {
        let template = inv.template.file_stem().unwrap().to_string_lossy().into_owned();
        match template.as_str() {
            "S1_IA" => "incAngle".to_string(),
            "S1_lat" => "lat".to_string(),
            "S1_lon" => "lon".to_string(),
            _ => {
                let pol = inv
                    .parameters
                    .iter()
                    .find(|(k, _)| k == "polarization")
                    .map(|(_, v)| v.clone())
                    .unwrap();
                let db = if template.contains("_dB") { "_dB" } else { "" };
                format!("Sigma0_{pol}{db}")
            }
        }
    }
}

impl Engine for FakeEngine {
    fn executable(&self) -> &Path {
        &self.exe
    }

    fn execute(&self, invocation: &EngineInvocation) -> std::io::Result<ProcessReport> {
        self.calls.set(self.calls.get() + 1);
        self.invocations.borrow_mut().push(invocation.clone());

        // The scratch workspace must exist while the engine runs
        assert!(invocation.output.parent().unwrap().is_dir());

        if let Some(code) = self.fail_with {
            // Partial output the invoker must clean up
            fs::create_dir_all(invocation.staged_data_dir())?;
            return Ok(ProcessReport {
                success: false,
                code: Some(code),
                stdout: String::new(),
                stderr: "Error: [NodeId: Read] cannot read product".to_string(),
            });
        }
        if self.produce {
            let data = invocation.staged_data_dir();
            fs::create_dir_all(&data)?;
            let stem = Self::staged_stem(invocation);
            fs::write(data.join(format!("{stem}.img")), stem.as_bytes())?;
            fs::write(data.join(format!("{stem}.hdr")), b"ENVI\n")?;
            fs::write(&invocation.output, b"<Dimap_Document/>")?;
        }
        Ok(ProcessReport {
            success: true,
            code: Some(0),
            ..ProcessReport::default()
        })
    }
}

/// Temporary workspace with graphs installed, a fake `gpt` on disk, an L1
/// folder and a feature root
pub struct Workspace {
    pub dir: tempfile::TempDir,
    pub gpt: PathBuf,
    pub graph_root: PathBuf,
    pub l1: PathBuf,
    pub features: PathBuf,
}

impl Workspace {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let gpt = dir.path().join("snap/bin/gpt");
        fs::create_dir_all(gpt.parent().unwrap()).unwrap();
        fs::write(&gpt, "#!/bin/sh\n").unwrap();
        let graph_root = dir.path().join("graphs");
        install_graphs(&graph_root);
        let l1 = dir.path().join("l1");
        fs::create_dir_all(&l1).unwrap();
        let features = dir.path().join("features");
        Self {
            dir,
            gpt,
            graph_root,
            l1,
            features,
        }
    }

    pub fn config(&self) -> EngineConfig {
        EngineConfig {
            gpt: self.gpt.clone(),
            graph_root: self.graph_root.clone(),
        }
    }

    pub fn engine(&self) -> FakeEngine {
        FakeEngine::new(self.gpt.clone())
    }

    pub fn extractor(&self, options: RunOptions) -> FeatureExtractor<FakeEngine> {
        FeatureExtractor::new(self.config(), self.engine(), options)
    }

    pub fn extractor_with(&self, engine: FakeEngine, options: RunOptions) -> FeatureExtractor<FakeEngine> {
        FeatureExtractor::new(self.config(), engine, options)
    }

    /// EW dual-pol product with two non-overlapping swaths on a 4x6 grid
    pub fn ew_product(&self) -> PathBuf {
        let xml = annotation_xml(4, 6, &[("EW1", vec![(0, 3, 0, 2)]), ("EW2", vec![(0, 3, 3, 5)])]);
        make_safe(&self.l1, EW_1SDH, &[("hh", xml.clone()), ("hv", xml)])
    }

    pub fn feature_dir(&self, basename: &str) -> PathBuf {
        self.features.join(basename)
    }
}
