/// The inverse golden ratio: 1/φ = φ - 1.
const INV_PHI: f64 = 0.618_033_988_749_895;

/// Golden section search bracket.
///
/// Maintains the outer interval [left, right] and two interior points
/// positioned according to the golden ratio.
#[derive(Debug, Clone, Copy)]
pub(super) struct GoldenBracket {
    pub(super) left: f64,
    pub(super) right: f64,
    pub(super) inner_left: f64,
    pub(super) inner_right: f64,
}

impl GoldenBracket {
    /// Creates a bracket with interior points placed by the golden ratio.
    ///
    /// Reversed bounds are swapped.
    pub(super) fn new(bracket: [f64; 2]) -> Self {
        let [a, b] = bracket;
        let (left, right) = if a <= b { (a, b) } else { (b, a) };
        let width = right - left;
        Self {
            left,
            right,
            inner_left: left + (1.0 - INV_PHI) * width,
            inner_right: left + INV_PHI * width,
        }
    }

    fn width(&self) -> f64 {
        self.right - self.left
    }

    /// Keeps `[left, inner_right]`; the old `inner_left` becomes `inner_right`.
    pub(super) fn shrink_right(&mut self) {
        self.right = self.inner_right;
        self.inner_right = self.inner_left;
        self.inner_left = self.left + (1.0 - INV_PHI) * self.width();
    }

    /// Keeps `[inner_left, right]`; the old `inner_right` becomes `inner_left`.
    pub(super) fn shrink_left(&mut self) {
        self.left = self.inner_left;
        self.inner_left = self.inner_right;
        self.inner_right = self.left + INV_PHI * self.width();
    }

    /// Returns true once the interior points are within tolerance of each other.
    pub(super) fn is_converged(&self, x_abs_tol: f64, x_rel_tol: f64) -> bool {
        let gap = (self.inner_right - self.inner_left).abs();
        let mid = 0.5 * (self.inner_left + self.inner_right);
        gap <= x_abs_tol + x_rel_tol * mid.abs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn interior_points_divide_by_golden_ratio() {
        let bracket = GoldenBracket::new([0.04, 0.20]);
        let width = 0.16;

        assert_relative_eq!(bracket.inner_left, 0.04 + (1.0 - INV_PHI) * width);
        assert_relative_eq!(bracket.inner_right, 0.04 + INV_PHI * width);
    }

    #[test]
    fn reversed_bounds_are_swapped() {
        let bracket = GoldenBracket::new([-10.0, -40.0]);

        assert_relative_eq!(bracket.left, -40.0);
        assert_relative_eq!(bracket.right, -10.0);
    }

    #[test]
    fn shrinking_reuses_an_interior_point() {
        let mut bracket = GoldenBracket::new([0.0, 1.0]);
        let old_inner_left = bracket.inner_left;
        bracket.shrink_right();
        assert_relative_eq!(bracket.right, INV_PHI);
        assert_relative_eq!(bracket.inner_right, old_inner_left);

        let old_inner_right = bracket.inner_right;
        bracket.shrink_left();
        assert_relative_eq!(bracket.inner_left, old_inner_right);
        assert_relative_eq!(
            bracket.inner_right,
            bracket.left + INV_PHI * (bracket.right - bracket.left)
        );
    }

    #[test]
    fn zero_width_bracket_is_converged() {
        let bracket = GoldenBracket::new([0.1, 0.1]);
        assert!(bracket.is_converged(0.0, 0.0));
    }
}
