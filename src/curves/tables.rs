use crate::base::interp_table;

/// Returns the API RP 2A sand coefficients (C1, C2, C3) interpolated in φ
pub fn api_sand_coefficients(phi: f64) -> (f64, f64, f64) {
    const TABLE: [(f64, f64, f64, f64); 8] = [
        (25.0, 1.22, 2.88, 12.7),
        (28.0, 1.78, 3.29, 20.8),
        (30.0, 2.46, 3.81, 31.4),
        (32.0, 3.39, 4.47, 47.9),
        (34.0, 4.68, 5.30, 73.9),
        (36.0, 6.50, 6.37, 115.4),
        (38.0, 9.10, 7.78, 182.5),
        (40.0, 12.85, 9.64, 292.0),
    ];
    if phi <= TABLE[0].0 {
        return (TABLE[0].1, TABLE[0].2, TABLE[0].3);
    }
    let last = TABLE.len() - 1;
    if phi >= TABLE[last].0 {
        return (TABLE[last].1, TABLE[last].2, TABLE[last].3);
    }
    for i in 0..last {
        let a = TABLE[i];
        let b = TABLE[i + 1];
        if phi >= a.0 && phi <= b.0 {
            let f = (phi - a.0) / (b.0 - a.0);
            return (
                a.1 + f * (b.1 - a.1),
                a.2 + f * (b.2 - a.2),
                a.3 + f * (b.3 - a.3),
            );
        }
    }
    (TABLE[2].1, TABLE[2].2, TABLE[2].3)
}

/// Returns the initial modulus of subgrade reaction k (lb/in³) for sand
pub fn api_sand_k(phi: f64, submerged: bool) -> f64 {
    const DRY: [(f64, f64); 8] = [
        (25.0, 25.0),
        (28.0, 28.0),
        (30.0, 60.0),
        (32.0, 90.0),
        (34.0, 115.0),
        (36.0, 150.0),
        (38.0, 200.0),
        (40.0, 300.0),
    ];
    const SUBMERGED: [(f64, f64); 8] = [
        (25.0, 5.0),
        (28.0, 10.0),
        (30.0, 25.0),
        (32.0, 35.0),
        (34.0, 45.0),
        (36.0, 60.0),
        (38.0, 80.0),
        (40.0, 100.0),
    ];
    if submerged {
        interp_table(&SUBMERGED, phi)
    } else {
        interp_table(&DRY, phi)
    }
}

/// Returns the Reese (1974) sand wedge multiplier A interpolated in z/b
pub fn reese_sand_a(z_over_b: f64, cyclic: bool) -> f64 {
    const STATIC: [(f64, f64); 6] = [
        (0.0, 2.85),
        (1.0, 2.00),
        (2.0, 1.45),
        (3.0, 1.10),
        (4.0, 0.96),
        (5.0, 0.88),
    ];
    const CYCLIC: [(f64, f64); 6] = [
        (0.0, 0.75),
        (1.0, 0.70),
        (2.0, 0.62),
        (3.0, 0.58),
        (4.0, 0.56),
        (5.0, 0.55),
    ];
    if cyclic {
        interp_table(&CYCLIC, z_over_b)
    } else {
        interp_table(&STATIC, z_over_b)
    }
}

/// Returns the Reese (1974) sand intermediate multiplier B interpolated in z/b
pub fn reese_sand_b(z_over_b: f64, cyclic: bool) -> f64 {
    const STATIC: [(f64, f64); 6] = [
        (0.0, 2.20),
        (1.0, 1.45),
        (2.0, 1.10),
        (3.0, 0.85),
        (4.0, 0.75),
        (5.0, 0.50),
    ];
    const CYCLIC: [(f64, f64); 6] = [
        (0.0, 0.60),
        (1.0, 0.55),
        (2.0, 0.52),
        (3.0, 0.50),
        (4.0, 0.48),
        (5.0, 0.45),
    ];
    if cyclic {
        interp_table(&CYCLIC, z_over_b)
    } else {
        interp_table(&STATIC, z_over_b)
    }
}

/// Returns the Reese (1975) stiff-clay coefficient A_s interpolated in z/b
pub fn stiff_clay_a(z_over_b: f64) -> f64 {
    const TABLE: [(f64, f64); 6] = [
        (0.0, 0.20),
        (1.0, 0.35),
        (2.0, 0.50),
        (3.0, 0.58),
        (4.0, 0.60),
        (6.0, 0.60),
    ];
    interp_table(&TABLE, z_over_b)
}

/// Returns the Meyerhof bearing factor N_q for driven piles
pub fn meyerhof_nq(phi: f64) -> f64 {
    const TABLE: [(f64, f64); 9] = [
        (25.0, 12.5),
        (26.0, 14.5),
        (28.0, 21.0),
        (30.0, 30.0),
        (32.0, 44.0),
        (34.0, 65.0),
        (36.0, 100.0),
        (38.0, 150.0),
        (40.0, 225.0),
    ];
    interp_table(&TABLE, phi)
}

/// Returns the Meyerhof limiting end bearing (psf)
pub fn meyerhof_qb_limit(phi: f64) -> f64 {
    const TABLE: [(f64, f64); 8] = [
        (25.0, 50.0),
        (28.0, 75.0),
        (30.0, 100.0),
        (32.0, 125.0),
        (34.0, 175.0),
        (36.0, 250.0),
        (38.0, 350.0),
        (40.0, 500.0),
    ];
    interp_table(&TABLE, phi) * 2000.0 // tsf → psf
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
