use pilesim::prelude::*;

// Lateral response of a W6x9 in soft clay with a shallow water table
//
// TEST GOAL
//
// This test verifies the solver on the soft clay seed scenario:
// c_u = 400 psf over 15 ft, water table at 5 ft, H = 2000 lb applied
// with a 3 ft lever arm (M = 6000 ft·lb at the ground line).
//
// EXPECTATIONS
//
// * the Auto p-y resolution picks the Matlock branch
// * a DCR is reported
// * the soft clay deflects more than the medium sand scenario

#[test]
fn test_lateral_soft_clay() -> Result<(), PileError> {
    let mut clay = SoilLayer::new(0.0, 15.0, SoilType::Clay);
    clay.c_u = Some(400.0);
    let clay_profile = SoilProfile::new(vec![clay], Some(5.0))?;
    let section = get_section("W6x9")?;
    let control = Control::new();

    let lever_arm = 3.0;
    let h_load = 2000.0;
    let clay_result = lateral_analysis(
        &clay_profile,
        &section,
        15.0,
        BendingAxis::Strong,
        h_load,
        h_load * lever_arm,
        HeadCondition::Free,
        false,
        &control,
    )?;
    assert!(clay_result.converged);
    assert!(clay_result.dcr > 0.0);
    for sample in &clay_result.py_curves {
        assert_eq!(sample.model, "Matlock soft clay");
    }

    // the sand scenario under a smaller load deflects less
    let mut sand = SoilLayer::new(0.0, 15.0, SoilType::Sand);
    sand.n_spt = Some(15.0);
    let sand_profile = SoilProfile::new(vec![sand], None)?;
    let sand_result = lateral_analysis(
        &sand_profile,
        &section,
        10.0,
        BendingAxis::Strong,
        1500.0,
        6000.0,
        HeadCondition::Free,
        false,
        &control,
    )?;
    assert!(
        clay_result.y_ground > sand_result.y_ground,
        "clay = {}, sand = {}",
        clay_result.y_ground,
        sand_result.y_ground
    );

    // cyclic degradation increases the deflection in clay
    let cyclic_result = lateral_analysis(
        &clay_profile,
        &section,
        15.0,
        BendingAxis::Strong,
        h_load,
        6000.0,
        HeadCondition::Free,
        true,
        &control,
    )?;
    assert!(cyclic_result.y_ground >= clay_result.y_ground);
    Ok(())
}
