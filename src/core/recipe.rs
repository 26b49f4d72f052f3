//! Recipe selection: maps a product identity and processing options to a SNAP
//! graph template plus the runtime parameters substituted into the engine
//! call. The registry is an explicit table; a missing entry is reported as
//! [`Error::Unsupported`].
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::core::identity::ProductIdentity;
use crate::core::params::IntensityRequest;
use crate::error::{Error, Result};
use crate::types::AcquisitionMode;

/// Structured registry key for intensity recipes
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecipeKey {
    pub mode: AcquisitionMode,
    pub product_type: String,
    pub speckle_filter: bool,
    pub db: bool,
}

impl RecipeKey {
    pub fn new(identity: &ProductIdentity, request: &IntensityRequest) -> Self {
        Self {
            mode: identity.mode,
            product_type: identity.product_type.clone(),
            speckle_filter: request.multilook.speckle_filter(),
            db: request.db,
        }
    }

    /// Canonical template name, e.g. `S1_EW_GRDM_NR_Cal_Spk_dB`
    pub fn template_name(&self) -> String {
        format!(
            "S1_{}_{}_NR_Cal{}{}",
            self.mode,
            self.product_type,
            if self.speckle_filter { "_Spk" } else { "" },
            if self.db { "_dB" } else { "" },
        )
    }
}

/// (mode, product type, speckle filter, dB) -> template path below the graph root
const INTENSITY_RECIPES: &[(AcquisitionMode, &str, bool, bool, &str)] = &[
    (AcquisitionMode::Ew, "GRDM", true, false, "S1_EW_GRDM/S1_EW_GRDM_NR_Cal_Spk_XX.xml"),
    (AcquisitionMode::Ew, "GRDM", true, true, "S1_EW_GRDM/S1_EW_GRDM_NR_Cal_Spk_dB_XX.xml"),
    (AcquisitionMode::Ew, "GRDM", false, false, "S1_EW_GRDM/S1_EW_GRDM_NR_Cal_XX.xml"),
    (AcquisitionMode::Ew, "GRDM", false, true, "S1_EW_GRDM/S1_EW_GRDM_NR_Cal_dB_XX.xml"),
    // EW GRDH graphs are installed alongside the GRDM ones
    (AcquisitionMode::Ew, "GRDH", true, false, "S1_EW_GRDM/S1_EW_GRDH_NR_Cal_Spk_XX.xml"),
    (AcquisitionMode::Ew, "GRDH", true, true, "S1_EW_GRDM/S1_EW_GRDH_NR_Cal_Spk_dB_XX.xml"),
    (AcquisitionMode::Ew, "GRDH", false, false, "S1_EW_GRDM/S1_EW_GRDH_NR_Cal_XX.xml"),
    (AcquisitionMode::Ew, "GRDH", false, true, "S1_EW_GRDM/S1_EW_GRDH_NR_Cal_dB_XX.xml"),
    (AcquisitionMode::Iw, "GRDH", true, false, "S1_IW_GRDM/S1_IW_GRDH_NR_Cal_Spk_XX.xml"),
    (AcquisitionMode::Iw, "GRDH", true, true, "S1_IW_GRDM/S1_IW_GRDH_NR_Cal_Spk_dB_XX.xml"),
    (AcquisitionMode::Iw, "GRDH", false, false, "S1_IW_GRDM/S1_IW_GRDH_NR_Cal_XX.xml"),
    (AcquisitionMode::Iw, "GRDH", false, true, "S1_IW_GRDM/S1_IW_GRDH_NR_Cal_dB_XX.xml"),
];

/// Look a key up in the intensity registry
pub fn lookup_intensity_template(key: &RecipeKey) -> Option<&'static str> {
    INTENSITY_RECIPES
        .iter()
        .find(|(mode, ptype, spk, db, _)| {
            *mode == key.mode
                && *ptype == key.product_type
                && *spk == key.speckle_filter
                && *db == key.db
        })
        .map(|entry| entry.4)
}

/// Geometry recipes that do not depend on product mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetaRecipe {
    IncidenceAngle,
    Latitude,
    Longitude,
}

impl MetaRecipe {
    fn template(&self) -> &'static str {
        match self {
            MetaRecipe::IncidenceAngle => "S1_meta/S1_IA.xml",
            MetaRecipe::Latitude => "S1_meta/S1_lat.xml",
            MetaRecipe::Longitude => "S1_meta/S1_lon.xml",
        }
    }

    /// Basename of the band the graph writes into its `.data` folder
    fn staged_stem(&self) -> &'static str {
        match self {
            MetaRecipe::IncidenceAngle => "incAngle",
            MetaRecipe::Latitude => "lat",
            MetaRecipe::Longitude => "lon",
        }
    }

    fn name(&self) -> &'static str {
        match self {
            MetaRecipe::IncidenceAngle => "S1_IA",
            MetaRecipe::Latitude => "S1_lat",
            MetaRecipe::Longitude => "S1_lon",
        }
    }
}

/// A resolved engine recipe, constructed per request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipe {
    pub name: String,
    pub template: PathBuf,
    /// `-P<name>=<value>` parameters, in invocation order
    pub parameters: Vec<(String, String)>,
    /// Basename of the `.img`/`.hdr` pair the engine stages
    pub staged_stem: String,
}

/// Artifact stem of an intensity request (`Sigma0_HH`, `Sigma0_HH_dB`)
pub fn intensity_stem(request: &IntensityRequest) -> String {
    format!(
        "Sigma0_{}{}",
        request.polarization,
        if request.db { "_dB" } else { "" }
    )
}

/// Select the intensity recipe for `identity`. Rejects polarizations the
/// product does not carry and combinations the registry does not enumerate.
pub fn select_intensity_recipe(
    identity: &ProductIdentity,
    request: &IntensityRequest,
    graph_root: &Path,
) -> Result<Recipe> {
    if !identity.has_polarization(request.polarization) {
        return Err(Error::invalid(format!(
            "product {} does not contain {} polarization",
            identity.polarization_code.as_str(),
            request.polarization
        )));
    }

    let key = RecipeKey::new(identity, request);
    let rel = lookup_intensity_template(&key).ok_or_else(|| {
        Error::Unsupported(format!(
            "no recipe registered for {} (mode {}, type {}, multilook {}, dB {})",
            key.template_name(),
            key.mode,
            key.product_type,
            request.multilook,
            request.db
        ))
    })?;
    debug!("selected recipe {} -> {}", key.template_name(), rel);

    let mut parameters = vec![(
        "polarization".to_string(),
        request.polarization.to_string(),
    )];
    if key.speckle_filter {
        parameters.push((
            "looks_rg".to_string(),
            request.multilook.range_looks().to_string(),
        ));
        parameters.push((
            "looks_az".to_string(),
            request.multilook.azimuth_looks().to_string(),
        ));
    }

    Ok(Recipe {
        name: key.template_name(),
        template: graph_root.join(rel),
        parameters,
        staged_stem: intensity_stem(request),
    })
}

pub fn meta_recipe(kind: MetaRecipe, graph_root: &Path) -> Recipe {
    Recipe {
        name: kind.name().to_string(),
        template: graph_root.join(kind.template()),
        parameters: Vec::new(),
        staged_stem: kind.staged_stem().to_string(),
    }
}
