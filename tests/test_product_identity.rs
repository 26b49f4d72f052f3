use std::collections::HashSet;
use std::path::Path;

use s1feat::{AcquisitionMode, IdentityError, Polarization, PolarizationCode, ProductIdentity};

const EW_1SDH: &str = "S1A_EW_GRDM_1SDH_20230208T065619_20230208T065723_047141_05A7E5_F291";

#[test]
fn test_dual_hh_code_resolves_to_hh_hv() {
    let id = ProductIdentity::from_basename(EW_1SDH).unwrap();
    assert_eq!(id.mode, AcquisitionMode::Ew);
    assert_eq!(id.product_type, "GRDM");
    assert_eq!(id.polarization_code, PolarizationCode::Sdh);

    let pols: HashSet<Polarization> = id.polarizations().iter().copied().collect();
    let expected: HashSet<Polarization> = [Polarization::Hv, Polarization::Hh].into_iter().collect();
    assert_eq!(pols, expected);
    assert_eq!(id.primary_polarization(), Polarization::Hh);
}

#[test]
fn test_polarization_code_table() {
    let cases = [
        ("1SSH", vec![Polarization::Hh]),
        ("1SDV", vec![Polarization::Vv, Polarization::Vh]),
        ("1SSV", vec![Polarization::Vv]),
    ];
    for (code, expected) in cases {
        let basename = format!("S1B_IW_GRDH_{code}_20210115T171503_20210115T171528_025162_02FEA1_3C1A");
        let id = ProductIdentity::from_basename(&basename).unwrap();
        assert_eq!(id.polarizations(), expected.as_slice(), "code {code}");
    }
}

#[test]
fn test_unknown_polarization_code_is_unresolved() {
    let err = ProductIdentity::from_basename(
        "S1A_EW_GRDM_1SXX_20230208T065619_20230208T065723_047141_05A7E5_F291",
    )
    .unwrap_err();
    assert_eq!(err, IdentityError::UnknownPolarizationCode("1SXX".to_string()));
}

#[test]
fn test_unknown_mode_is_unresolved() {
    let err = ProductIdentity::from_basename(
        "S1A_XX_GRDM_1SDH_20230208T065619_20230208T065723_047141_05A7E5_F291",
    )
    .unwrap_err();
    assert_eq!(err, IdentityError::UnknownMode("XX".to_string()));
}

#[test]
fn test_malformed_basenames() {
    assert!(matches!(
        ProductIdentity::from_basename("not_a_product"),
        Err(IdentityError::Malformed(_))
    ));
    assert!(matches!(
        ProductIdentity::from_basename("S1A_EW_GRDM_1SDH_yesterday_X"),
        Err(IdentityError::BadDateTime(_))
    ));
}

#[test]
fn test_identity_from_safe_folder_path() {
    let path = Path::new("/data/l1").join(format!("{EW_1SDH}.SAFE"));
    let id = ProductIdentity::from_path(&path).unwrap();
    assert_eq!(id.basename, EW_1SDH);
    assert_eq!(id.date(), "20230208");
    assert!(id.has_polarization(Polarization::Hv));
    assert!(!id.has_polarization(Polarization::Vv));
}

#[test]
fn test_unresolved_identity_is_invalid_input_for_callers() {
    let err: s1feat::Error = ProductIdentity::from_basename("garbage").unwrap_err().into();
    assert_eq!(err.kind(), s1feat::ErrorKind::InvalidInput);
}
