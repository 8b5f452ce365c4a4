use super::{BendingAxis, DEFAULT_FY, E_STEEL};
use crate::PileError;
use serde::{Deserialize, Serialize};

/// Defines the cross-section family
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum SectionShape {
    /// Wide-flange (W) shape
    WideFlange,
    /// Channel (C) shape
    Channel,
    /// Round pipe
    Pipe,
}

/// Holds the geometry and stiffness properties of a steel pile section
///
/// Catalogue values follow the AISC shape tables. Derived quantities
/// (perimeter, tip area, EI, My, Mp) are computed on demand for the
/// selected bending axis.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SteelSection {
    pub name: String,
    pub shape: SectionShape,
    pub depth: f64,  // nominal depth d (in)
    pub width: f64,  // flange width b_f (in)
    pub area: f64,   // cross-sectional area (in²)
    pub weight: f64, // weight per length (plf)
    pub ix: f64,     // strong-axis moment of inertia (in⁴)
    pub iy: f64,     // weak-axis moment of inertia (in⁴)
    pub sx: f64,     // strong-axis elastic section modulus (in³)
    pub sy: f64,     // weak-axis elastic section modulus (in³)
    pub zx: f64,     // strong-axis plastic modulus (in³)
    pub zy: f64,     // weak-axis plastic modulus (in³)
    pub tf: f64,     // flange thickness (in)
    pub tw: f64,     // web thickness (in)
    pub fy: f64,     // yield stress (ksi)
}

impl SteelSection {
    /// Returns the exposed perimeter (in) for skin friction
    pub fn perimeter(&self) -> f64 {
        match self.shape {
            SectionShape::WideFlange => 2.0 * self.depth + 4.0 * self.width - 2.0 * self.tw,
            SectionShape::Channel => 2.0 * self.depth + 2.0 * self.width,
            SectionShape::Pipe => std::f64::consts::PI * self.depth,
        }
    }

    /// Returns the gross tip area (in²) for end bearing
    pub fn tip_area(&self) -> f64 {
        match self.shape {
            SectionShape::Pipe => std::f64::consts::PI / 4.0 * self.depth * self.depth,
            _ => self.depth * self.width,
        }
    }

    /// Returns the loaded pile width (in) facing the soil for the given axis
    pub fn pile_width(&self, axis: BendingAxis) -> f64 {
        match axis {
            BendingAxis::Strong => self.depth,
            BendingAxis::Weak => self.width,
        }
    }

    /// Returns the moment of inertia (in⁴) about the given axis
    pub fn moment_of_inertia(&self, axis: BendingAxis) -> f64 {
        match axis {
            BendingAxis::Strong => self.ix,
            BendingAxis::Weak => self.iy,
        }
    }

    /// Returns the flexural rigidity EI (lb·in²) about the given axis
    pub fn bending_stiffness(&self, axis: BendingAxis) -> f64 {
        E_STEEL * self.moment_of_inertia(axis)
    }

    /// Returns the axial rigidity EA (lb)
    pub fn axial_stiffness(&self) -> f64 {
        E_STEEL * self.area
    }

    /// Returns the yield moment M_y = F_y·S (in·lb) about the given axis
    pub fn yield_moment(&self, axis: BendingAxis) -> f64 {
        let s = match axis {
            BendingAxis::Strong => self.sx,
            BendingAxis::Weak => self.sy,
        };
        self.fy * 1000.0 * s
    }

    /// Returns the plastic moment M_p = F_y·Z (in·lb) about the given axis
    pub fn plastic_moment(&self, axis: BendingAxis) -> f64 {
        let z = match axis {
            BendingAxis::Strong => self.zx,
            BendingAxis::Weak => self.zy,
        };
        self.fy * 1000.0 * z
    }
}

/// Defines the buried-steel corrosion environment
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum CorrosionEnvironment {
    NonCorrosive,
    BuriedUndisturbed,
    BuriedDisturbed,
    Corrosive,
}

impl CorrosionEnvironment {
    /// Returns the section loss rate (mils per year, per exposed face)
    pub fn rate_mils_per_year(&self) -> f64 {
        match self {
            CorrosionEnvironment::NonCorrosive => 0.25,
            CorrosionEnvironment::BuriedUndisturbed => 0.5,
            CorrosionEnvironment::BuriedDisturbed => 1.0,
            CorrosionEnvironment::Corrosive => 2.0,
        }
    }
}

/// Defines the protective coating applied to the pile
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum Coating {
    None,
    Galvanized,
    Epoxy,
}

impl Coating {
    /// Returns the multiplier on the corrosion rate
    pub fn reduction_factor(&self) -> f64 {
        match self {
            Coating::None => 1.0,
            Coating::Galvanized => 0.5,
            Coating::Epoxy => 0.25,
        }
    }
}

/// Returns the thickness loss per exposed face (in) over the design life
pub fn corrosion_loss(design_life_years: f64, environment: CorrosionEnvironment, coating: Coating) -> f64 {
    environment.rate_mils_per_year() * coating.reduction_factor() * design_life_years / 1000.0
}

/// Returns a new section with plate thicknesses reduced by corrosion
///
/// Each plate loses `t_loss_per_face` from both faces. The reduced
/// properties are recomputed from two-flange-plus-web plate geometry,
/// so the corroded values are approximate relative to catalogue data.
pub fn corroded_section(nominal: &SteelSection, t_loss_per_face: f64) -> Result<SteelSection, PileError> {
    if t_loss_per_face < 0.0 {
        return Err(PileError::InvalidInput(format!(
            "thickness loss = {:?} is incorrect; it must be ≥ 0.0",
            t_loss_per_face
        )));
    }
    if nominal.shape == SectionShape::Pipe {
        // pipe: only the outer face is exposed
        let wall = nominal.area / (std::f64::consts::PI * nominal.depth); // thin-wall estimate
        let new_wall = wall - t_loss_per_face;
        if new_wall <= 0.0 {
            return Err(PileError::InvalidInput(
                "corrosion loss consumes the full pipe wall".to_string(),
            ));
        }
        return Ok(pipe_section(
            &format!("{} (corroded)", nominal.name),
            nominal.depth,
            new_wall,
            nominal.fy,
        ));
    }
    let tf = nominal.tf - 2.0 * t_loss_per_face;
    let tw = nominal.tw - 2.0 * t_loss_per_face;
    if tf <= 0.0 || tw <= 0.0 {
        return Err(PileError::InvalidInput(
            "corrosion loss consumes the full flange or web thickness".to_string(),
        ));
    }
    let d = nominal.depth - 2.0 * t_loss_per_face;
    let bf = nominal.width;
    let hw = d - 2.0 * tf; // clear web height
    let area = 2.0 * bf * tf + hw * tw;
    let ix = 2.0 * (bf * tf * tf * tf / 12.0 + bf * tf * ((d - tf) / 2.0).powi(2)) + tw * hw.powi(3) / 12.0;
    let sx = ix / (d / 2.0);
    let zx = bf * tf * (d - tf) + tw * (d / 2.0 - tf).powi(2);
    let (iy, sy, zy) = match nominal.shape {
        // channel weak-axis values keep the nominal ratios since the
        // shear-center offset is not recomputed here
        SectionShape::Channel => (
            nominal.iy * area / nominal.area,
            nominal.sy * area / nominal.area,
            nominal.zy * area / nominal.area,
        ),
        _ => (
            2.0 * tf * bf.powi(3) / 12.0 + hw * tw.powi(3) / 12.0,
            (2.0 * tf * bf.powi(3) / 12.0 + hw * tw.powi(3) / 12.0) / (bf / 2.0),
            tf * bf * bf / 2.0 + hw * tw * tw / 4.0,
        ),
    };
    Ok(SteelSection {
        name: format!("{} (corroded)", nominal.name),
        shape: nominal.shape,
        depth: d,
        width: bf,
        area,
        weight: nominal.weight * area / nominal.area,
        ix,
        iy,
        sx,
        sy,
        zx,
        zy,
        tf,
        tw,
        fy: nominal.fy,
    })
}

/// Builds a round pipe pile section from outer diameter and wall thickness
pub fn pipe_section(name: &str, od: f64, wall: f64, fy: f64) -> SteelSection {
    let id = od - 2.0 * wall;
    let area = std::f64::consts::PI / 4.0 * (od * od - id * id);
    let ii = std::f64::consts::PI / 64.0 * (od.powi(4) - id.powi(4));
    let ss = ii / (od / 2.0);
    let zz = (od.powi(3) - id.powi(3)) / 6.0;
    SteelSection {
        name: name.to_string(),
        shape: SectionShape::Pipe,
        depth: od,
        width: od,
        area,
        weight: area * 3.4, // steel at 490 pcf ≈ 3.4 plf per in²
        ix: ii,
        iy: ii,
        sx: ss,
        sy: ss,
        zx: zz,
        zy: zz,
        tf: wall,
        tw: wall,
        fy,
    }
}

/// Holds one row of the bundled catalogue
struct CatRow(&'static str, SectionShape, f64, f64, f64, f64, f64, f64, f64, f64, f64, f64, f64, f64);

#[rustfmt::skip]
const CATALOGUE: [CatRow; 11] = [
    //     name          shape                    d     b_f    A     w     Ix    Iy     Sx    Sy     Zx    Zy     tf     tw
    CatRow("W6x7",    SectionShape::WideFlange, 5.80, 3.94, 2.05,  7.00, 12.2, 1.41,  4.21, 0.716,  4.83, 1.12, 0.230, 0.170),
    CatRow("W6x8.5",  SectionShape::WideFlange, 5.83, 3.94, 2.52,  8.50, 14.9, 1.99,  5.10, 1.010,  5.73, 1.56, 0.195, 0.170),
    CatRow("W6x9",    SectionShape::WideFlange, 5.90, 3.94, 2.64,  9.00, 16.4, 1.83,  5.56, 0.929,  6.23, 1.44, 0.215, 0.170),
    CatRow("W6x12",   SectionShape::WideFlange, 6.03, 4.00, 3.55, 12.00, 22.1, 2.99,  7.31, 1.500,  8.30, 2.32, 0.280, 0.230),
    CatRow("W6x15",   SectionShape::WideFlange, 5.99, 5.99, 4.43, 15.00, 29.1, 9.32,  9.72, 3.110, 10.80, 4.75, 0.260, 0.230),
    CatRow("W8x10",   SectionShape::WideFlange, 7.89, 3.94, 2.96, 10.00, 30.8, 1.99,  7.81, 1.010,  8.87, 1.58, 0.205, 0.170),
    CatRow("W8x13",   SectionShape::WideFlange, 7.99, 4.00, 3.84, 13.00, 39.6, 2.73,  9.91, 1.370, 11.40, 2.13, 0.255, 0.230),
    CatRow("W8x15",   SectionShape::WideFlange, 8.11, 4.01, 4.44, 15.00, 48.0, 3.41, 11.80, 1.700, 13.60, 2.64, 0.315, 0.245),
    CatRow("W8x18",   SectionShape::WideFlange, 8.14, 5.25, 5.26, 18.00, 61.9, 7.97, 15.20, 3.040, 17.00, 4.66, 0.330, 0.230),
    CatRow("C4x5.4",  SectionShape::Channel,    4.00, 1.58, 1.59,  5.40, 3.85, 0.319, 1.93, 0.283,  2.35, 0.547, 0.296, 0.184),
    CatRow("C4x7.25", SectionShape::Channel,    4.00, 1.72, 2.13,  7.25, 4.59, 0.432, 2.29, 0.343,  2.88, 0.668, 0.296, 0.321),
];

/// Looks up a catalogue section by name (case-insensitive)
pub fn get_section(name: &str) -> Result<SteelSection, PileError> {
    for row in &CATALOGUE {
        if row.0.eq_ignore_ascii_case(name) {
            return Ok(SteelSection {
                name: row.0.to_string(),
                shape: row.1,
                depth: row.2,
                width: row.3,
                area: row.4,
                weight: row.5,
                ix: row.6,
                iy: row.7,
                sx: row.8,
                sy: row.9,
                zx: row.10,
                zy: row.11,
                tf: row.12,
                tw: row.13,
                fy: DEFAULT_FY,
            });
        }
    }
    Err(PileError::InvalidInput(format!("unknown section name: {}", name)))
}

/// Returns the sorted list of catalogue section names
pub fn list_sections() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = CATALOGUE.iter().map(|row| row.0).collect();
    names.sort();
    names
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::{corroded_section, corrosion_loss, get_section, list_sections, pipe_section};
    use super::{Coating, CorrosionEnvironment};
    use crate::base::BendingAxis;
    use russell_lab::approx_eq;

    #[test]
    fn lookup_works() {
        let section = get_section("W6x9").unwrap();
        assert_eq!(section.depth, 5.90);
        assert_eq!(section.ix, 16.4);
        assert_eq!(section.fy, 50.0);
        let section = get_section("w8x18").unwrap();
        assert_eq!(section.name, "W8x18");
        assert_eq!(
            get_section("W36x150").err(),
            Some(crate::PileError::InvalidInput(
                "unknown section name: W36x150".to_string()
            ))
        );
        assert_eq!(list_sections().len(), 11);
    }

    #[test]
    fn derived_properties_work() {
        let section = get_section("W6x9").unwrap();
        // perimeter = 2d + 4bf - 2tw
        approx_eq(section.perimeter(), 2.0 * 5.90 + 4.0 * 3.94 - 2.0 * 0.170, 1e-14);
        approx_eq(section.tip_area(), 5.90 * 3.94, 1e-14);
        approx_eq(section.bending_stiffness(BendingAxis::Strong), 29.0e6 * 16.4, 1e-9);
        approx_eq(section.yield_moment(BendingAxis::Strong), 50.0 * 1000.0 * 5.56, 1e-9);
        approx_eq(section.plastic_moment(BendingAxis::Weak), 50.0 * 1000.0 * 1.44, 1e-9);
        assert_eq!(section.pile_width(BendingAxis::Strong), 5.90);
        assert_eq!(section.pile_width(BendingAxis::Weak), 3.94);
    }

    #[test]
    fn corrosion_works() {
        // 35 years buried disturbed, no coating: 35 mils = 0.035 in per face
        let loss = corrosion_loss(35.0, CorrosionEnvironment::BuriedDisturbed, Coating::None);
        approx_eq(loss, 0.035, 1e-14);
        let loss_galv = corrosion_loss(35.0, CorrosionEnvironment::BuriedDisturbed, Coating::Galvanized);
        approx_eq(loss_galv, 0.0175, 1e-14);

        let nominal = get_section("W6x9").unwrap();
        let corroded = corroded_section(&nominal, loss).unwrap();
        assert!(corroded.area < nominal.area);
        assert!(corroded.ix < nominal.ix);
        assert!(corroded.sx < nominal.sx);
        assert!(corroded.zx < nominal.zx);
        approx_eq(corroded.tf, nominal.tf - 0.070, 1e-14);

        // consuming the full flange is an input error
        assert!(corroded_section(&nominal, 0.2).is_err());
        assert!(corroded_section(&nominal, -0.1).is_err());
    }

    #[test]
    fn pipe_section_works() {
        let pipe = pipe_section("P4", 4.5, 0.237, 50.0);
        approx_eq(pipe.area, 3.1740, 1e-3);
        approx_eq(pipe.ix, 7.2326, 1e-3);
        approx_eq(pipe.perimeter(), std::f64::consts::PI * 4.5, 1e-14);
        assert_eq!(pipe.ix, pipe.iy);
    }
}
