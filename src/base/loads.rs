use serde::{Deserialize, Serialize};

/// Holds the unfactored load components acting on a single pile
///
/// Vertical components are positive downward (compression), except
/// `wind_up` and `seismic_vertical`, which are magnitudes of the upward
/// (uplift) action where a combination calls for it.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct LoadInput {
    pub dead: f64,             // dead load (lb)
    pub live: f64,             // live load (lb)
    pub snow: f64,             // snow load (lb)
    pub wind_down: f64,        // wind downward component (lb)
    pub wind_up: f64,          // wind uplift magnitude (lb)
    pub wind_lateral: f64,     // wind lateral force (lb)
    pub wind_moment: f64,      // wind moment at ground (ft·lb)
    pub seismic_vertical: f64, // vertical seismic component magnitude (lb)
    pub seismic_lateral: f64,  // lateral seismic force (lb)
    pub seismic_moment: f64,   // seismic moment at ground (ft·lb)
    pub lever_arm: f64,        // height of lateral load above ground (ft)
}

impl LoadInput {
    /// Allocates a new instance with all components zero and a 4 ft lever arm
    pub fn new() -> Self {
        LoadInput {
            dead: 0.0,
            live: 0.0,
            snow: 0.0,
            wind_down: 0.0,
            wind_up: 0.0,
            wind_lateral: 0.0,
            wind_moment: 0.0,
            seismic_vertical: 0.0,
            seismic_lateral: 0.0,
            seismic_moment: 0.0,
            lever_arm: 4.0,
        }
    }
}

/// Holds one factored load case acting on a single pile
///
/// `v_comp` and `v_tens` are both reported non-negative; exactly one of
/// them is nonzero for a given case (the net vertical direction).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LoadCase {
    pub name: String,
    pub v_comp: f64,   // net vertical compression (lb, ≥ 0)
    pub v_tens: f64,   // net vertical tension (lb, ≥ 0)
    pub h_lat: f64,    // lateral force at ground (lb)
    pub m_ground: f64, // moment at ground (ft·lb)
}

impl LoadCase {
    fn from_net(name: &str, net_vertical: f64, h_lat: f64, m_ground: f64) -> Self {
        LoadCase {
            name: name.to_string(),
            v_comp: net_vertical.max(0.0),
            v_tens: (-net_vertical).max(0.0),
            h_lat,
            m_ground,
        }
    }
}

/// Generates the ASCE 7-22 §2.3 (LRFD) load combinations
pub fn lrfd_combinations(loads: &LoadInput) -> Vec<LoadCase> {
    let (d, l, s) = (loads.dead, loads.live, loads.snow);
    let (wd, wu, wh, wm) = (loads.wind_down, loads.wind_up, loads.wind_lateral, loads.wind_moment);
    let (ev, eh, em) = (loads.seismic_vertical, loads.seismic_lateral, loads.seismic_moment);
    let e = loads.lever_arm;

    let mut cases = vec![
        LoadCase::from_net("1.4D", 1.4 * d, 0.0, 0.0),
        LoadCase::from_net("1.2D+1.6L+0.5S", 1.2 * d + 1.6 * l + 0.5 * s, 0.0, 0.0),
        LoadCase::from_net("1.2D+1.6S+0.5W", 1.2 * d + 1.6 * s + 0.5 * wd, 0.5 * wh, 0.5 * (wm + wh * e)),
        LoadCase::from_net(
            "1.2D+1.0W(down)+L+0.5S",
            1.2 * d + wd + l + 0.5 * s,
            wh,
            wm + wh * e,
        ),
        LoadCase::from_net(
            "1.2D+1.0W(up)+L+0.5S",
            1.2 * d - wu + l + 0.5 * s,
            wh,
            wm + wh * e,
        ),
        LoadCase::from_net(
            "1.2D+1.0E(down)+L+0.2S",
            1.2 * d + ev + l + 0.2 * s,
            eh,
            em + eh * e,
        ),
        LoadCase::from_net(
            "1.2D+1.0E(up)+L+0.2S",
            1.2 * d - ev + l + 0.2 * s,
            eh,
            em + eh * e,
        ),
        LoadCase::from_net("0.9D+1.0W(down)", 0.9 * d + wd, wh, wm + wh * e),
        LoadCase::from_net("0.9D+1.0W", 0.9 * d - wu, wh, wm + wh * e),
        LoadCase::from_net("0.9D+1.0E", 0.9 * d - ev, eh, em + eh * e),
    ];
    for case in cases.iter_mut() {
        if case.v_tens > 0.0 {
            case.name.push_str(" (UPLIFT)");
        }
    }
    tag_governing(&mut cases);
    cases
}

/// Generates the ASCE 7-22 §2.4 (ASD) load combinations
pub fn asd_combinations(loads: &LoadInput) -> Vec<LoadCase> {
    let (d, l, s) = (loads.dead, loads.live, loads.snow);
    let (wd, wu, wh, wm) = (loads.wind_down, loads.wind_up, loads.wind_lateral, loads.wind_moment);
    let (ev, eh, em) = (loads.seismic_vertical, loads.seismic_lateral, loads.seismic_moment);
    let e = loads.lever_arm;

    let mut cases = vec![
        LoadCase::from_net("D", d, 0.0, 0.0),
        LoadCase::from_net("D+L", d + l, 0.0, 0.0),
        LoadCase::from_net("D+S", d + s, 0.0, 0.0),
        LoadCase::from_net("D+0.75(L+S)", d + 0.75 * (l + s), 0.0, 0.0),
        LoadCase::from_net("D+0.6W", d + 0.6 * wd, 0.6 * wh, 0.6 * (wm + wh * e)),
        LoadCase::from_net(
            "D+0.45W+0.75L+0.75S",
            d + 0.45 * wd + 0.75 * (l + s),
            0.45 * wh,
            0.45 * (wm + wh * e),
        ),
        LoadCase::from_net("0.6D+0.6W", 0.6 * d - 0.6 * wu, 0.6 * wh, 0.6 * (wm + wh * e)),
        LoadCase::from_net("D+0.7E", d + 0.7 * ev, 0.7 * eh, 0.7 * (em + eh * e)),
        LoadCase::from_net(
            "D+0.525E+0.75L+0.75S",
            d + 0.525 * ev + 0.75 * (l + s),
            0.525 * eh,
            0.525 * (em + eh * e),
        ),
        LoadCase::from_net("0.6D+0.7E", 0.6 * d - 0.7 * ev, 0.7 * eh, 0.7 * (em + eh * e)),
    ];
    for case in cases.iter_mut() {
        if case.v_tens > 0.0 {
            case.name.push_str(" (UPLIFT)");
        }
    }
    tag_governing(&mut cases);
    cases
}

/// Appends "(governs …)" suffixes to the maxima in each vertical direction
fn tag_governing(cases: &mut [LoadCase]) {
    let mut i_comp = None;
    let mut i_tens = None;
    let (mut max_comp, mut max_tens) = (0.0, 0.0);
    for (i, case) in cases.iter().enumerate() {
        if case.v_comp > max_comp {
            max_comp = case.v_comp;
            i_comp = Some(i);
        }
        if case.v_tens > max_tens {
            max_tens = case.v_tens;
            i_tens = Some(i);
        }
    }
    if let Some(i) = i_comp {
        cases[i].name.push_str(" (governs compression)");
    }
    if let Some(i) = i_tens {
        cases[i].name.push_str(" (governs uplift)");
    }
}

// --- environmental load helpers (ASCE 7) ---------------------------------

/// Returns the velocity pressure q_z (psf) from the basic wind speed (mph)
pub fn wind_velocity_pressure(v: f64, k_z: f64, k_zt: f64, k_d: f64, k_e: f64) -> f64 {
    0.00256 * k_z * k_zt * k_d * k_e * v * v
}

/// Returns the Exposure C velocity pressure coefficient K_z at height z (ft)
pub fn k_z_exposure_c(z_ft: f64) -> f64 {
    let z = z_ft.clamp(15.0, 500.0);
    let alpha = 9.5;
    let z_g = 900.0;
    2.01 * (z / z_g).powf(2.0 / alpha)
}

/// Returns the seismic response coefficient C_s with its code floor
pub fn seismic_response_coefficient(s_ds: f64, r: f64, i_e: f64) -> f64 {
    let c_s = s_ds / (r / i_e);
    let c_s_min = f64::max(0.044 * s_ds * i_e, 0.01);
    f64::max(c_s, c_s_min)
}

/// Returns the ground-mount snow load (psf) from the ground snow load p_g
pub fn snow_load(p_g: f64, c_e: f64, c_t: f64, i_s: f64) -> f64 {
    0.7 * c_e * c_t * i_s * p_g
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
