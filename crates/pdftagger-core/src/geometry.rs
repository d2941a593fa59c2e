/// Axis-aligned rectangle in PDF user space.
///
/// Coordinates follow the PDF convention (origin at the lower-left corner of
/// the page, y grows upward):
/// - `llx`, `lly`: lower-left corner
/// - `urx`, `ury`: upper-right corner
///
/// Deserialised rectangles go through [`Rect::new`], so stored corners may
/// be given in either order.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "RawRect"))]
pub struct Rect {
    pub llx: f64,
    pub lly: f64,
    pub urx: f64,
    pub ury: f64,
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawRect {
    llx: f64,
    lly: f64,
    urx: f64,
    ury: f64,
}

#[cfg(feature = "serde")]
impl From<RawRect> for Rect {
    fn from(raw: RawRect) -> Self {
        Rect::new(raw.llx, raw.lly, raw.urx, raw.ury)
    }
}

impl Rect {
    /// Create a rectangle from two opposite corners.
    ///
    /// Swapped corners are normalised so that `urx >= llx` and `ury >= lly`.
    pub fn new(llx: f64, lly: f64, urx: f64, ury: f64) -> Self {
        Self {
            llx: llx.min(urx),
            lly: lly.min(ury),
            urx: llx.max(urx),
            ury: lly.max(ury),
        }
    }

    /// Width of the rectangle.
    pub fn width(&self) -> f64 {
        self.urx - self.llx
    }

    /// Height of the rectangle.
    pub fn height(&self) -> f64 {
        self.ury - self.lly
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// Compute the union of two rectangles.
    pub fn union(&self, other: &Rect) -> Rect {
        Rect {
            llx: self.llx.min(other.llx),
            lly: self.lly.min(other.lly),
            urx: self.urx.max(other.urx),
            ury: self.ury.max(other.ury),
        }
    }

    /// Compute the intersection of two rectangles.
    ///
    /// Edges are inclusive: rectangles sharing only an edge intersect in a
    /// zero-area rectangle. Returns `None` when the rectangles are disjoint.
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let llx = self.llx.max(other.llx);
        let lly = self.lly.max(other.lly);
        let urx = self.urx.min(other.urx);
        let ury = self.ury.min(other.ury);
        if urx < llx || ury < lly {
            return None;
        }
        Some(Rect { llx, lly, urx, ury })
    }

    /// Fraction of this rectangle's area covered by `reference`.
    ///
    /// Returns 0.0 for a degenerate (zero-area) rectangle or when the two
    /// rectangles do not intersect.
    pub fn common_area_coef(&self, reference: &Rect) -> f64 {
        let area = self.area();
        if area <= 0.0 {
            return 0.0;
        }
        match self.intersection(reference) {
            Some(common) => common.area() / area,
            None => 0.0,
        }
    }

    /// Whether `reference` covers strictly more than `min_common` of this
    /// rectangle's area.
    pub fn is_almost_same_area(&self, reference: &Rect, min_common: f64) -> bool {
        self.common_area_coef(reference) > min_common
    }
}
