use crate::clamp;
use ndarray::prelude::*;
use ndrustfft::Complex;

/// A set of spatial-frequency pixel coordinates selected for
/// reconstruction, typically around one diffraction order. The set is
/// free-form; it need not be rectangular or contiguous.
#[derive(Clone, Debug)]
pub struct Region {
    points: Vec<(isize, isize)>,
}

impl Region {
    pub fn from_points(points: Vec<(isize, isize)>) -> Self {
        Self { points }
    }

    /// Axis-aligned `w x h` rectangle with top-left corner at `(x, y)`.
    pub fn rect(x: isize, y: isize, w: usize, h: usize) -> Self {
        let mut points = Vec::with_capacity(w * h);

        for dy in 0..h as isize {
            for dx in 0..w as isize {
                points.push((x + dx, y + dy));
            }
        }

        Self { points }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[(isize, isize)] {
        &self.points
    }

    /// Axis-aligned bounding box as `(min_x, min_y, max_x, max_y)`, or
    /// `None` for an empty region.
    pub fn bounding_box(&self) -> Option<(isize, isize, isize, isize)> {
        let (&(x, y), rest) = self.points.split_first()?;

        Some(rest.iter().fold((x, y, x, y), |bb, &(px, py)| {
            (bb.0.min(px), bb.1.min(py), bb.2.max(px), bb.3.max(py))
        }))
    }
}

impl std::str::FromStr for Region {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let i = s.find('x').ok_or("No x found separating width and height".to_string())?;
        let p1 = s[i + 1..].find('+').ok_or("No +offset found".to_string())? + i + 1;
        let p2 = s[p1 + 1..].find('+').ok_or("Only one +offset found".to_string())? + p1 + 1;

        let w: usize = s[..i].parse().map_err(|_| "Invalid width".to_string())?;
        let h: usize = s[i + 1..p1].parse().map_err(|_| "Invalid height".to_string())?;
        let x: isize = s[p1 + 1..p2].parse().map_err(|_| "Invalid x offset".to_string())?;
        let y: isize = s[p2 + 1..].parse().map_err(|_| "Invalid y offset".to_string())?;

        Ok(Self::rect(x, y, w, h))
    }
}

/// Zero every frequency outside `region` and translate the kept samples
/// so the region's bounding-box center lands on the field center.
///
/// An empty region yields an all-zero field of the same dimensions: "no
/// filter selected yet" is a valid state, not an error; callers can
/// distinguish it up front with [`Region::is_empty`]. Region coordinates
/// outside the field, and samples whose shifted position still falls
/// outside after clamping, are dropped silently.
pub fn apply(spectrum: ArrayView2<Complex<f64>>, region: &Region) -> Array2<Complex<f64>> {
    let (h, w) = spectrum.dim();
    let mut out = Array2::zeros((h, w));

    let (min_x, min_y, max_x, max_y) = match region.bounding_box() {
        Some(bb) => bb,
        None => return out,
    };

    let (cx, cy) = ((min_x + max_x) / 2, (min_y + max_y) / 2);
    let xp = (w / 2) as i64 - cx as i64;
    let yp = (h / 2) as i64 - cy as i64;

    // Keep the translated bounding box inside the field where it fits;
    // the clamp treats its inner range as 1-based
    let xp = clamp::nested(xp, 0, 0, w as i64 - 1, min_x as i64 + 1, max_x as i64 + 1);
    let yp = clamp::nested(yp, 0, 0, h as i64 - 1, min_y as i64 + 1, max_y as i64 + 1);

    for &(x, y) in region.points() {
        if x < 0 || y < 0 || x >= w as isize || y >= h as isize {
            continue;
        }

        let (sx, sy) = (x as i64 + xp, y as i64 + yp);

        if sx < 0 || sy < 0 || sx >= w as i64 || sy >= h as i64 {
            continue;
        }

        out[[sy as usize, sx as usize]] = spectrum[[y as usize, x as usize]];
    }

    out
}
