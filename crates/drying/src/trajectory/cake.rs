/// Dry-layer thickness over one run, the only integrated state.
///
/// Starts at zero and only grows, stopping exactly at the fill height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CakeState {
    length: f64,
    fill_height: f64,
}

/// How an integration step ended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Advance {
    /// The full step was taken.
    Stepped,
    /// The front reached the vial bottom `elapsed` hours into the step.
    Dried { elapsed: f64 },
}

impl CakeState {
    #[must_use]
    pub fn new(fill_height: f64) -> Self {
        Self {
            length: 0.0,
            fill_height,
        }
    }

    /// Dry-layer thickness [cm].
    #[must_use]
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Initial frozen height [cm].
    #[must_use]
    pub fn fill_height(&self) -> f64 {
        self.fill_height
    }

    #[must_use]
    pub fn dried_fraction(&self) -> f64 {
        (self.length / self.fill_height).clamp(0.0, 1.0)
    }

    #[must_use]
    pub fn is_dry(&self) -> bool {
        self.length >= self.fill_height
    }

    /// Explicit Euler step of the front at `rate` [cm/hr] over `dt` [hr].
    ///
    /// Negative rates are treated as zero.
    pub fn advance(&mut self, rate: f64, dt: f64) -> Advance {
        let rate = rate.max(0.0);
        let next = self.length + rate * dt;

        if rate > 0.0 && next >= self.fill_height {
            let elapsed = (self.fill_height - self.length) / rate;
            self.length = self.fill_height;
            Advance::Dried { elapsed }
        } else {
            self.length = next;
            Advance::Stepped
        }
    }
}
