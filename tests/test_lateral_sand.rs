use pilesim::prelude::*;

// Lateral response of a driven W6x9 in uniform medium sand
//
// TEST GOAL
//
// This test verifies the lateral finite-difference solver on the seed
// scenario: uniform sand with N_spt = 15 (N60 = 9, φ ≈ 33.4° auto),
// 10 ft embedment, strong axis, no water table, H = 1500 lb and
// M = 6000 ft·lb at the ground line (4 ft lever arm).
//
// EXPECTATIONS
//
// * the solve converges
// * the ground-line deflection is a fraction of an inch
// * the maximum moment exceeds the applied ground moment and occurs a
//   few feet below grade
// * the reported p-y curves use the API sand branch (Auto resolution)

#[test]
fn test_lateral_sand() -> Result<(), PileError> {
    let mut layer = SoilLayer::new(0.0, 15.0, SoilType::Sand);
    layer.n_spt = Some(15.0);
    let profile = SoilProfile::new(vec![layer], None)?;

    // auto-derived friction angle
    let phi = profile.layers[0].friction_angle(&profile.spt);
    assert!((phi - 33.4).abs() < 0.1);

    let section = get_section("W6x9")?;
    let control = Control::new();
    let result = lateral_analysis(
        &profile,
        &section,
        10.0,
        BendingAxis::Strong,
        1500.0,
        6000.0,
        HeadCondition::Free,
        false,
        &control,
    )?;

    assert!(result.converged);
    assert!(result.iterations >= 1);

    // ground-line deflection in the expected band
    assert!(result.y_ground > 0.02, "y_ground = {}", result.y_ground);
    assert!(result.y_ground < 0.45, "y_ground = {}", result.y_ground);

    // the maximum moment exceeds the applied ground moment and occurs
    // below grade
    assert!(result.m_max.abs() > 6000.0, "m_max = {}", result.m_max);
    assert!(
        result.depth_m_max > 1.0 && result.depth_m_max < 6.0,
        "depth_m_max = {}",
        result.depth_m_max
    );

    // deflection reverses sign somewhere above the toe
    assert!(result.depth_zero_deflection < 10.0);

    // no NaN anywhere in the profiles
    for arrays in [
        &result.deflection,
        &result.moment,
        &result.shear,
        &result.slope,
        &result.soil_reaction,
    ] {
        for value in arrays.iter() {
            assert!(!value.is_nan());
        }
    }

    // Auto resolution picked the API sand branch
    assert!(!result.py_curves.is_empty());
    for sample in &result.py_curves {
        assert_eq!(sample.model, "API sand");
    }

    // DCR is reported against the strong-axis yield moment
    assert!(result.dcr > 0.0);
    assert!(result.dcr < 1.0);
    Ok(())
}
