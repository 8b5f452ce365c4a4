/// Defines the unit weight of water (pcf)
pub const GAMMA_WATER: f64 = 62.4;

/// Defines the atmospheric pressure (psf)
pub const P_ATMOSPHERIC: f64 = 2116.0;

/// Defines the Young's modulus of steel (psi)
pub const E_STEEL: f64 = 29_000_000.0;

/// Defines the standard gravity acceleration (in/s²)
pub const GRAVITY: f64 = 386.4;

/// Defines the default steel yield stress (ksi)
pub const DEFAULT_FY: f64 = 50.0;

/// Defines the default ASD factor of safety for compression
pub const DEFAULT_FS_COMPRESSION: f64 = 2.5;

/// Defines the default ASD factor of safety for tension
pub const DEFAULT_FS_TENSION: f64 = 3.0;

/// Defines the reduction on skin friction for tension capacity
pub const TENSION_FACTOR: f64 = 0.75;

/// Defines the floor on lateral displacement (in) guarding secant stiffness
pub const Y_FLOOR: f64 = 1e-6;

/// Defines the floor on effective vertical stress (psf)
pub const SIGMA_V_FLOOR: f64 = 1.0;

/// Defines the minimum center-to-center pile spacing (in) for groups
pub const MIN_GROUP_SPACING: f64 = 6.0;

/// Defines the number of inches per foot
pub const IN_PER_FT: f64 = 12.0;

/// Defines the conversion from tsf to psf
pub const TSF_TO_PSF: f64 = 2000.0;

/// Defines the conversion from kN/m to lb/in
pub const KN_M_TO_LB_IN: f64 = 5.7101;

/// Defines the conversion from psf to psi
#[inline]
pub fn psf_to_psi(sigma: f64) -> f64 {
    sigma / 144.0
}

/// Defines the conversion from pcf to lb/in³
#[inline]
pub fn pcf_to_pci(gamma: f64) -> f64 {
    gamma / 1728.0
}

/// Performs linear interpolation over a table of (x, y) pairs
///
/// The table must be sorted by x; values beyond the ends are clamped.
pub fn interp_table(table: &[(f64, f64)], x: f64) -> f64 {
    if x <= table[0].0 {
        return table[0].1;
    }
    let last = table.len() - 1;
    if x >= table[last].0 {
        return table[last].1;
    }
    for i in 0..last {
        let (x0, y0) = table[i];
        let (x1, y1) = table[i + 1];
        if x >= x0 && x <= x1 {
            return y0 + (y1 - y0) * (x - x0) / (x1 - x0);
        }
    }
    table[last].1
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::interp_table;
    use russell_lab::approx_eq;

    #[test]
    fn interp_table_works() {
        let table = [(25.0, 12.5), (30.0, 30.0), (40.0, 225.0)];
        assert_eq!(interp_table(&table, 20.0), 12.5);
        assert_eq!(interp_table(&table, 45.0), 225.0);
        approx_eq(interp_table(&table, 27.5), 21.25, 1e-14);
        approx_eq(interp_table(&table, 35.0), 127.5, 1e-14);
    }
}
