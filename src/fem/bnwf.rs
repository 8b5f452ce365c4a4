use super::banded::BandedMatrix;
use super::lateral::{post_process, LateralResult, SECANT_SEED_Y};
use super::springs::{displacement_residual, NodeSprings};
use crate::base::{BnwfConfig, BnwfMode, Control, HeadCondition, SolveStatus, GRAVITY, IN_PER_FT};
use crate::base::{pcf_to_pci, SteelSection};
use crate::soil::SoilProfile;
use crate::PileError;
use russell_lab::{mat_eigen, mat_inverse, Matrix, Vector};
use serde::{Deserialize, Serialize};

/// Holds the load-displacement history of a pushover analysis
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PushoverCurve {
    /// Applied load at each step (lb)
    pub load: Vec<f64>,

    /// Ground-line displacement at each step (in)
    pub displacement: Vec<f64>,
}

/// Holds the results of a BNWF analysis
///
/// The lateral block carries the same fields as the FDM solver; axial
/// displacements are positive downward and axial forces are positive in
/// compression (including pushover output).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BnwfResult {
    /// Lateral profiles and scalar results
    pub lateral: LateralResult,

    /// Axial displacement per node (in, positive down)
    pub deflection_axial: Vec<f64>,

    /// Axial force per node (lb, positive compression)
    pub axial_force: Vec<f64>,

    /// Mobilized shaft friction per node (lb/in)
    pub shaft_reaction: Vec<f64>,

    /// Mobilized tip reaction (lb)
    pub q_tip: f64,

    /// Ground-line axial displacement (in)
    pub u_ground: f64,

    /// 3×3 head stiffness matrix over {axial, lateral, rotation}
    pub k_head: [[f64; 3]; 3],

    /// Pushover history (pushover modes only)
    pub pushover: Option<PushoverCurve>,

    /// Lowest lateral eigenvalues λ = ω² (rad/s)², when requested
    pub eigenvalues: Option<Vec<f64>>,

    /// Critical axial load under P-Δ (lb), when determinable
    pub p_critical: Option<f64>,

    /// Final solve status
    pub status: SolveStatus,
}

impl BnwfResult {
    /// Serializes the result record as pretty JSON
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

/// Holds the raw displacement state of a converged (or best) static solve
struct StaticSolution {
    u: Vec<f64>,
    y: Vec<f64>,
    axial_force: Vec<f64>,
    iterations: usize,
    converged: bool,
    cancelled: bool,
}

/// Runs a BNWF analysis (static or pushover)
pub fn solve_bnwf(
    profile: &SoilProfile,
    section: &SteelSection,
    embedment: f64,
    v_axial: f64,
    h_lateral: f64,
    m_ground: f64,
    config: &BnwfConfig,
    control: &Control,
) -> Result<BnwfResult, PileError> {
    if let Some(msg) = config.validate() {
        return Err(PileError::InvalidInput(msg));
    }
    if let Some(msg) = control.validate() {
        return Err(PileError::InvalidInput(msg));
    }
    if embedment <= 0.0 {
        return Err(PileError::InvalidInput(format!(
            "embedment = {:?} is incorrect; it must be > 0.0",
            embedment
        )));
    }
    if embedment > profile.total_depth() {
        return Err(PileError::InvalidInput(format!(
            "embedment = {:?} exceeds the profile depth = {:?}",
            embedment,
            profile.total_depth()
        )));
    }
    let n_nodes = config.n_elements + 1;
    if n_nodes < 5 {
        return Err(PileError::DegenerateGeometry(
            "fewer than five nodes cannot support the lateral stencil".to_string(),
        ));
    }
    control.report_status(SolveStatus::Idle);

    let b = section.pile_width(config.bending_axis);
    let springs = NodeSprings::full(
        profile,
        b,
        section.perimeter(),
        section.tip_area(),
        embedment,
        n_nodes,
        config.cyclic,
        config.pile_type,
    )?;
    let dz = embedment * IN_PER_FT / config.n_elements as f64;

    match config.mode {
        BnwfMode::Static => {
            let solution = solve_static(
                &springs,
                section,
                embedment,
                v_axial,
                h_lateral,
                m_ground,
                config,
                control,
                config.include_p_delta,
            )?;
            assemble_result(
                profile, &springs, section, embedment, v_axial, h_lateral, m_ground, config, control,
                dz, solution, None,
            )
        }
        BnwfMode::PushoverLateral | BnwfMode::PushoverAxial => {
            let mut load_hist = Vec::with_capacity(config.pushover_steps);
            let mut disp_hist = Vec::with_capacity(config.pushover_steps);
            let mut last: Option<StaticSolution> = None;
            for step in 1..=config.pushover_steps {
                let mult = config.pushover_max_mult * step as f64 / config.pushover_steps as f64;
                let solution = solve_static(
                    &springs,
                    section,
                    embedment,
                    v_axial * mult,
                    h_lateral * mult,
                    m_ground * mult,
                    config,
                    control,
                    config.include_p_delta,
                )?;
                let converged = solution.converged;
                match config.mode {
                    BnwfMode::PushoverLateral => {
                        load_hist.push(h_lateral * mult);
                        disp_hist.push(solution.y[0]);
                    }
                    _ => {
                        load_hist.push(v_axial * mult);
                        disp_hist.push(solution.u[0]);
                    }
                }
                last = Some(solution);
                if !converged {
                    break;
                }
            }
            let solution = match last {
                Some(s) => s,
                None => solve_static(
                    &springs, section, embedment, v_axial, h_lateral, m_ground, config, control,
                    config.include_p_delta,
                )?,
            };
            assemble_result(
                profile, &springs, section, embedment, v_axial, h_lateral, m_ground, config, control,
                dz,
                solution,
                Some(PushoverCurve {
                    load: load_hist,
                    displacement: disp_hist,
                }),
            )
        }
    }
}

/// Solves the coupled axial/lateral static problem by secant iteration
fn solve_static(
    springs: &NodeSprings,
    section: &SteelSection,
    embedment: f64,
    v_axial: f64,
    h_lateral: f64,
    m_ground: f64,
    config: &BnwfConfig,
    control: &Control,
    include_p_delta: bool,
) -> Result<StaticSolution, PileError> {
    let n_nodes = springs.n_nodes();
    let dz = embedment * IN_PER_FT / (n_nodes - 1) as f64;
    let ea = section.axial_stiffness();
    let ei = section.bending_stiffness(config.bending_axis);
    let m_ground_in = m_ground * IN_PER_FT;

    // initial secants
    let mut k_py = vec![0.0; n_nodes];
    let mut k_tz = vec![0.0; n_nodes];
    let seed_y = vec![SECANT_SEED_Y; n_nodes];
    springs.lateral_secants(&seed_y, &mut k_py);
    springs.axial_secants(&seed_y, &mut k_tz);
    let mut k_qz = match &springs.qz {
        Some(qz) => qz.secant(SECANT_SEED_Y),
        None => 0.0,
    };

    let mut u = vec![0.0; n_nodes];
    let mut y = vec![0.0; n_nodes];
    let mut axial_force = vec![v_axial; n_nodes];
    let mut converged = false;
    let mut cancelled = false;
    let mut iterations = 0;
    let mut omega = 1.0;
    let mut residual_prev = f64::INFINITY;
    let mut axial_matrix = BandedMatrix::new(n_nodes, 1);
    let mut lateral_matrix = BandedMatrix::new(n_nodes, 3);
    let mut axial_rhs = Vector::new(n_nodes);
    let mut lateral_rhs = Vector::new(n_nodes);

    for iteration in 0..control.n_max_iterations {
        if control.cancelled() {
            cancelled = true;
            break;
        }

        // axial pass: bar elements plus t-z springs and the q-z tip spring
        control.report_status(SolveStatus::Assembling);
        axial_matrix.reset();
        for i in 0..n_nodes {
            axial_rhs[i] = 0.0;
        }
        let ka = ea / dz;
        for e in 0..n_nodes - 1 {
            axial_matrix.add(e, e, ka);
            axial_matrix.add(e, e + 1, -ka);
            axial_matrix.add(e + 1, e, -ka);
            axial_matrix.add(e + 1, e + 1, ka);
        }
        for i in 0..n_nodes {
            let trib = if i == 0 || i == n_nodes - 1 { dz / 2.0 } else { dz };
            axial_matrix.add(i, i, k_tz[i] * trib);
        }
        axial_matrix.add(n_nodes - 1, n_nodes - 1, k_qz);
        axial_rhs[0] = v_axial;
        control.report_status(SolveStatus::Solving);
        axial_matrix.solve_in_place(&mut axial_rhs)?;
        let u_new: Vec<f64> = axial_rhs.as_data().clone();

        // axial force per node (element force above the node)
        axial_force[0] = v_axial;
        for i in 1..n_nodes {
            axial_force[i] = ea * (u_new[i - 1] - u_new[i]) / dz;
        }

        // lateral pass: beam stencil, p-y springs, optional geometric term
        control.report_status(SolveStatus::Assembling);
        lateral_matrix.reset();
        for i in 0..n_nodes {
            lateral_rhs[i] = 0.0;
        }
        let c4 = ei / (dz * dz * dz * dz);
        let c3 = ei / (dz * dz * dz);
        let c2 = ei / (dz * dz);
        for i in 2..n_nodes - 2 {
            lateral_matrix.add(i, i - 2, c4);
            lateral_matrix.add(i, i - 1, -4.0 * c4);
            lateral_matrix.add(i, i, 6.0 * c4 + k_py[i]);
            lateral_matrix.add(i, i + 1, -4.0 * c4);
            lateral_matrix.add(i, i + 2, c4);
            if include_p_delta && iteration > 0 {
                let cg = axial_force[i] / (dz * dz);
                lateral_matrix.add(i, i - 1, cg);
                lateral_matrix.add(i, i, -2.0 * cg);
                lateral_matrix.add(i, i + 1, cg);
            }
        }
        lateral_matrix.put(0, 0, -c3);
        lateral_matrix.put(0, 1, 3.0 * c3);
        lateral_matrix.put(0, 2, -3.0 * c3);
        lateral_matrix.put(0, 3, c3);
        lateral_rhs[0] = h_lateral;
        match config.head_condition {
            HeadCondition::Free => {
                lateral_matrix.put(1, 0, c2);
                lateral_matrix.put(1, 1, -2.0 * c2);
                lateral_matrix.put(1, 2, c2);
                lateral_rhs[1] = m_ground_in;
            }
            HeadCondition::Fixed => {
                lateral_matrix.put(1, 0, 1.0);
                lateral_matrix.put(1, 1, -1.0);
                lateral_rhs[1] = 0.0;
            }
        }
        lateral_matrix.put(n_nodes - 2, n_nodes - 3, c2);
        lateral_matrix.put(n_nodes - 2, n_nodes - 2, -2.0 * c2);
        lateral_matrix.put(n_nodes - 2, n_nodes - 1, c2);
        lateral_matrix.put(n_nodes - 1, n_nodes - 4, -c3);
        lateral_matrix.put(n_nodes - 1, n_nodes - 3, 3.0 * c3);
        lateral_matrix.put(n_nodes - 1, n_nodes - 2, -3.0 * c3);
        lateral_matrix.put(n_nodes - 1, n_nodes - 1, c3);
        control.report_status(SolveStatus::Solving);
        lateral_matrix.solve_in_place(&mut lateral_rhs)?;
        let y_new: Vec<f64> = lateral_rhs.as_data().clone();

        // joint residual over both displacement fields
        let residual = f64::max(
            displacement_residual(&u_new, &u, control),
            displacement_residual(&y_new, &y, control),
        );
        if residual > residual_prev {
            omega = f64::max(control.relax_min, 0.8 * omega);
        }
        control.print_iteration(iteration, residual, omega);
        for i in 0..n_nodes {
            u[i] = omega * u_new[i] + (1.0 - omega) * u[i];
            y[i] = omega * y_new[i] + (1.0 - omega) * y[i];
        }
        iterations = iteration + 1;
        if residual < control.tol_rel_dy {
            converged = true;
            break;
        }
        residual_prev = residual;

        springs.lateral_secants(&y, &mut k_py);
        springs.axial_secants(&u, &mut k_tz);
        if let Some(qz) = &springs.qz {
            k_qz = qz.secant(u[n_nodes - 1]);
        }
    }

    Ok(StaticSolution {
        u,
        y,
        axial_force,
        iterations,
        converged,
        cancelled,
    })
}

/// Builds the full result record from a static solution
fn assemble_result(
    profile: &SoilProfile,
    springs: &NodeSprings,
    section: &SteelSection,
    embedment: f64,
    v_axial: f64,
    h_lateral: f64,
    m_ground: f64,
    config: &BnwfConfig,
    control: &Control,
    dz: f64,
    solution: StaticSolution,
    pushover: Option<PushoverCurve>,
) -> Result<BnwfResult, PileError> {
    let n_nodes = springs.n_nodes();
    let ei = section.bending_stiffness(config.bending_axis);
    let b = section.pile_width(config.bending_axis);

    let mut notes: Vec<String> = Vec::new();
    if solution.cancelled {
        notes.push("analysis cancelled by the caller".to_string());
    } else if !solution.converged {
        notes.push(format!(
            "did not converge within {} iterations",
            control.n_max_iterations
        ));
    }
    if config.include_p_delta {
        notes.push("P-Δ geometric stiffness included".to_string());
    }

    let lateral = post_process(
        profile,
        springs,
        &solution.y,
        dz,
        ei,
        section.yield_moment(config.bending_axis),
        embedment,
        b,
        h_lateral,
        m_ground,
        config.head_condition,
        config.cyclic,
        solution.iterations,
        solution.converged,
        notes,
    );

    let mut shaft_reaction = vec![0.0; n_nodes];
    for i in 0..n_nodes {
        if let Some(tz) = &springs.tz[i] {
            shaft_reaction[i] = tz.mobilized(solution.u[i]);
        }
    }
    let q_tip = match &springs.qz {
        Some(qz) => qz.mobilized(solution.u[n_nodes - 1]),
        None => 0.0,
    };

    let k_head = head_stiffness(springs, section, embedment, config, control)?;
    let p_critical = if config.include_p_delta && config.mode == BnwfMode::Static {
        estimate_buckling(springs, section, embedment, config, control)?
    } else {
        None
    };
    let eigenvalues = if config.run_modal {
        Some(lateral_eigenvalues(profile, springs, section, embedment, config)?)
    } else {
        None
    };

    let status = if solution.converged {
        SolveStatus::Converged
    } else {
        SolveStatus::NotConverged
    };
    control.report_status(status);
    let u_ground = solution.u[0];
    Ok(BnwfResult {
        lateral,
        deflection_axial: solution.u,
        axial_force: solution.axial_force,
        shaft_reaction,
        q_tip,
        u_ground,
        k_head,
        pushover,
        eigenvalues,
        p_critical,
        status,
    })
}

/// Recovers the 3×3 head stiffness by inverting the unit-load flexibility
fn head_stiffness(
    springs: &NodeSprings,
    section: &SteelSection,
    embedment: f64,
    config: &BnwfConfig,
    control: &Control,
) -> Result<[[f64; 3]; 3], PileError> {
    let n_nodes = springs.n_nodes();
    let dz = embedment * IN_PER_FT / (n_nodes - 1) as f64;
    let unit = 1000.0;
    let loads = [
        (unit, 0.0, 0.0),
        (0.0, unit, 0.0),
        (0.0, 0.0, unit), // ft·lb
    ];
    let mut flexibility = Matrix::new(3, 3);
    let mut quick = control.clone();
    quick.n_max_iterations = 50;
    quick.tol_rel_dy = 1e-4;
    for (col, (v, h, m)) in loads.iter().enumerate() {
        let solution = solve_static(springs, section, embedment, *v, *h, *m, config, &quick, false)?;
        let theta0 = (solution.y[1] - solution.y[0]) / dz;
        flexibility.set(0, col, solution.u[0] / unit);
        flexibility.set(1, col, solution.y[0] / unit);
        flexibility.set(2, col, theta0 / unit);
    }
    // symmetrize before inverting
    for i in 0..3 {
        for j in (i + 1)..3 {
            let avg = 0.5 * (flexibility.get(i, j) + flexibility.get(j, i));
            flexibility.set(i, j, avg);
            flexibility.set(j, i, avg);
        }
    }
    let mut stiffness = Matrix::new(3, 3);
    mat_inverse(&mut stiffness, &flexibility)
        .map_err(|_| PileError::Singular("cannot invert the head flexibility matrix".to_string()))?;
    let mut k_head = [[0.0; 3]; 3];
    for i in 0..3 {
        for j in 0..3 {
            k_head[i][j] = stiffness.get(i, j);
        }
    }
    Ok(k_head)
}

/// Estimates the critical axial load by bisection on loss of positive
/// definiteness of the lateral tangent system
fn estimate_buckling(
    springs: &NodeSprings,
    section: &SteelSection,
    embedment: f64,
    config: &BnwfConfig,
    _control: &Control,
) -> Result<Option<f64>, PileError> {
    let n_nodes = springs.n_nodes();
    let dz = embedment * IN_PER_FT / (n_nodes - 1) as f64;
    let ei = section.bending_stiffness(config.bending_axis);
    let l_in = embedment * IN_PER_FT;
    let p_euler = std::f64::consts::PI.powi(2) * ei / (2.0 * l_in).powi(2);

    // initial lateral stiffness for the tangent system
    let mut k_py = vec![0.0; n_nodes];
    let seed = vec![SECANT_SEED_Y; n_nodes];
    springs.lateral_secants(&seed, &mut k_py);

    // the boundary-condition rows contribute sign-indefinite pivots, so
    // instability is detected as growth of the negative-pivot count over
    // the unloaded system
    let negative_pivots = |p: f64| -> Result<usize, PileError> {
        let mut matrix = BandedMatrix::new(n_nodes, 3);
        let mut rhs = Vector::new(n_nodes);
        let c4 = ei / (dz * dz * dz * dz);
        let c3 = ei / (dz * dz * dz);
        let c2 = ei / (dz * dz);
        for i in 2..n_nodes - 2 {
            matrix.add(i, i - 2, c4);
            matrix.add(i, i - 1, -4.0 * c4);
            matrix.add(i, i, 6.0 * c4 + k_py[i]);
            matrix.add(i, i + 1, -4.0 * c4);
            matrix.add(i, i + 2, c4);
            let cg = p / (dz * dz);
            matrix.add(i, i - 1, cg);
            matrix.add(i, i, -2.0 * cg);
            matrix.add(i, i + 1, cg);
        }
        matrix.put(0, 0, -c3);
        matrix.put(0, 1, 3.0 * c3);
        matrix.put(0, 2, -3.0 * c3);
        matrix.put(0, 3, c3);
        match config.head_condition {
            HeadCondition::Free => {
                matrix.put(1, 0, c2);
                matrix.put(1, 1, -2.0 * c2);
                matrix.put(1, 2, c2);
            }
            HeadCondition::Fixed => {
                matrix.put(1, 0, 1.0);
                matrix.put(1, 1, -1.0);
            }
        }
        matrix.put(n_nodes - 2, n_nodes - 3, c2);
        matrix.put(n_nodes - 2, n_nodes - 2, -2.0 * c2);
        matrix.put(n_nodes - 2, n_nodes - 1, c2);
        matrix.put(n_nodes - 1, n_nodes - 4, -c3);
        matrix.put(n_nodes - 1, n_nodes - 3, 3.0 * c3);
        matrix.put(n_nodes - 1, n_nodes - 2, -3.0 * c3);
        matrix.put(n_nodes - 1, n_nodes - 1, c3);
        match matrix.solve_in_place(&mut rhs) {
            Ok(count) => Ok(count),
            Err(PileError::Singular(_)) => Ok(usize::MAX),
            Err(err) => Err(err),
        }
    };
    let baseline = negative_pivots(0.0)?;

    // bracket the instability by doubling from the Euler scale
    let mut hi = p_euler;
    let mut found = false;
    for _ in 0..30 {
        if negative_pivots(hi)? > baseline {
            found = true;
            break;
        }
        hi *= 2.0;
    }
    if !found {
        return Ok(None);
    }
    let mut lo = 0.0;
    for _ in 0..50 {
        let mid = 0.5 * (lo + hi);
        if negative_pivots(mid)? > baseline {
            hi = mid;
        } else {
            lo = mid;
        }
    }
    Ok(Some(0.5 * (lo + hi)))
}

/// Returns the lowest lateral eigenvalues λ = ω² of the initial tangent
///
/// The mass is lumped from the pile weight plus a b×b tributary soil
/// prism per node; the stiffness is the assembled lateral system with the
/// head and toe condition rows included, so the lowest modes are
/// approximate.
fn lateral_eigenvalues(
    profile: &SoilProfile,
    springs: &NodeSprings,
    section: &SteelSection,
    embedment: f64,
    config: &BnwfConfig,
) -> Result<Vec<f64>, PileError> {
    let n_nodes = springs.n_nodes();
    let dz = embedment * IN_PER_FT / (n_nodes - 1) as f64;
    let ei = section.bending_stiffness(config.bending_axis);
    let b = section.pile_width(config.bending_axis);

    let mut k_py = vec![0.0; n_nodes];
    let seed = vec![SECANT_SEED_Y; n_nodes];
    springs.lateral_secants(&seed, &mut k_py);

    // dense stiffness with the same rows as the static assembly
    let c4 = ei / (dz * dz * dz * dz);
    let c3 = ei / (dz * dz * dz);
    let c2 = ei / (dz * dz);
    let mut kk = Matrix::new(n_nodes, n_nodes);
    for i in 2..n_nodes - 2 {
        kk.set(i, i - 2, c4);
        kk.set(i, i - 1, -4.0 * c4);
        kk.set(i, i, 6.0 * c4 + k_py[i]);
        kk.set(i, i + 1, -4.0 * c4);
        kk.set(i, i + 2, c4);
    }
    kk.set(0, 0, -c3);
    kk.set(0, 1, 3.0 * c3);
    kk.set(0, 2, -3.0 * c3);
    kk.set(0, 3, c3);
    match config.head_condition {
        HeadCondition::Free => {
            kk.set(1, 0, c2);
            kk.set(1, 1, -2.0 * c2);
            kk.set(1, 2, c2);
        }
        HeadCondition::Fixed => {
            kk.set(1, 0, 1.0);
            kk.set(1, 1, -1.0);
        }
    }
    kk.set(n_nodes - 2, n_nodes - 3, c2);
    kk.set(n_nodes - 2, n_nodes - 2, -2.0 * c2);
    kk.set(n_nodes - 2, n_nodes - 1, c2);
    kk.set(n_nodes - 1, n_nodes - 4, -c3);
    kk.set(n_nodes - 1, n_nodes - 3, 3.0 * c3);
    kk.set(n_nodes - 1, n_nodes - 2, -3.0 * c3);
    kk.set(n_nodes - 1, n_nodes - 1, c3);

    // lumped mass: pile weight per tributary length plus a soil prism
    let weight_per_in = section.weight / IN_PER_FT;
    let mut a_mat = Matrix::new(n_nodes, n_nodes);
    for i in 0..n_nodes {
        let z_ft = i as f64 * dz / IN_PER_FT;
        let trib = if i == 0 || i == n_nodes - 1 { dz / 2.0 } else { dz };
        let gamma = profile.effective_unit_weight_at(z_ft);
        let soil_weight = pcf_to_pci(gamma) * b * b * trib;
        let mass = (weight_per_in * trib + soil_weight) / GRAVITY;
        for j in 0..n_nodes {
            a_mat.set(i, j, kk.get(i, j) / mass);
        }
    }

    let mut l_real = Vector::new(n_nodes);
    let mut l_imag = Vector::new(n_nodes);
    let mut v_real = Matrix::new(n_nodes, n_nodes);
    let mut v_imag = Matrix::new(n_nodes, n_nodes);
    mat_eigen(&mut l_real, &mut l_imag, &mut v_real, &mut v_imag, &mut a_mat)
        .map_err(|msg| PileError::Singular(msg.to_string()))?;

    let mut lambdas: Vec<f64> = Vec::new();
    for i in 0..n_nodes {
        if l_imag[i].abs() < 1e-6 * l_real[i].abs().max(1.0) && l_real[i] > 0.0 {
            lambdas.push(l_real[i]);
        }
    }
    lambdas.sort_by(|a, b| a.partial_cmp(b).unwrap());
    lambdas.truncate(config.n_modes);
    Ok(lambdas)
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
