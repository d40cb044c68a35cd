//! Planning for the blurred gradient lights drifting behind the page.
//!
//! Lights are absolutely positioned discs whose size depends on the viewport.
//! Each one wanders to a random position, opacity and duration per move;
//! the host applies the resulting CSS and schedules the next move.

use crate::{Error, RandomSource};

/// Viewport width or height below which lights use the small size.
pub const SMALL_VIEWPORT_PX: f64 = 640.0;
/// Viewport width below which lights use the medium size.
pub const MEDIUM_VIEWPORT_PX: f64 = 1024.0;
/// Minimum change in viewport width or height that re-plans positions.
pub const RESIZE_THRESHOLD_PX: f64 = 100.0;
/// Lights smaller than this are drawn more opaque.
const SMALL_LIGHT_PX: f64 = 200.0;
/// Light size at which move durations are unscaled.
const REFERENCE_LIGHT_PX: f64 = 240.0;

/// Two-stop radial gradient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Gradient {
    /// Center color.
    pub from: &'static str,
    /// Edge color.
    pub to: &'static str,
}

impl Gradient {
    const fn new(from: &'static str, to: &'static str) -> Self {
        Self { from, to }
    }

    /// CSS `background` value.
    pub fn to_css(&self) -> String {
        format!("radial-gradient(circle at center, {}, {})", self.from, self.to)
    }
}

/// Gradients sharing a hue family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GradientGroup {
    /// Hue family, e.g. `"pink-purple"`.
    pub name: &'static str,
    /// Members of the family.
    pub gradients: &'static [Gradient],
}

/// Built-in palette.
pub const GRADIENT_GROUPS: &[GradientGroup] = &[
    GradientGroup {
        name: "pink-purple",
        gradients: &[
            Gradient::new("#ff007f", "#8a2be2"),
            Gradient::new("#ff4db2", "#6a00ff"),
            Gradient::new("#ff00c8", "#4b00ff"),
            Gradient::new("#4400ff", "#9b00ff"),
            Gradient::new("#5a00ff", "#cc00ff"),
            Gradient::new("#3a00ff", "#b200ff"),
        ],
    },
    GradientGroup {
        name: "red-orange",
        gradients: &[
            Gradient::new("#ff1a1a", "#ff8c00"),
            Gradient::new("#ff6a00", "#ee0979"),
            Gradient::new("#ff2a00", "#ff5f33"),
        ],
    },
    GradientGroup {
        name: "yellow",
        gradients: &[
            Gradient::new("#ffe600", "#ff9900"),
            Gradient::new("#fff200", "#ff5f00"),
            Gradient::new("#ffed4a", "#ff8800"),
        ],
    },
    GradientGroup {
        name: "blue-turquoise",
        gradients: &[
            Gradient::new("#0047ff", "#00a2ff"),
            Gradient::new("#0060ff", "#0091ff"),
            Gradient::new("#003cff", "#00bbff"),
        ],
    },
    GradientGroup {
        name: "turquoise",
        gradients: &[
            Gradient::new("#00ffd5", "#008cff"),
            Gradient::new("#00ffea", "#00bcd4"),
            Gradient::new("#00ffe4", "#009cff"),
        ],
    },
    GradientGroup {
        name: "green",
        gradients: &[
            Gradient::new("#00ff6a", "#00b36b"),
            Gradient::new("#a8ff00", "#00c853"),
            Gradient::new("#66ff00", "#009e59"),
        ],
    },
    GradientGroup {
        name: "exotic",
        gradients: &[
            Gradient::new("#ff00ff", "#00ff00"),
            Gradient::new("#ffea00", "#00c8ff"),
            Gradient::new("#ff003c", "#00ffc8"),
            Gradient::new("#ff8c00", "#7600ff"),
            Gradient::new("#00ff95", "#ff005a"),
            Gradient::new("#39ff14", "#ff3131"),
            Gradient::new("#ffe600", "#7f00ff"),
            Gradient::new("#00ffea", "#ff6600"),
            Gradient::new("#00ff4c", "#ff00c8"),
            Gradient::new("#ff00d4", "#00eaff"),
            Gradient::new("#ff1a00", "#00eaff"),
            Gradient::new("#ffee00", "#ff00aa"),
        ],
    },
];

/// Light diameter in CSS pixels for a viewport.
pub fn light_size(viewport_width: f64, viewport_height: f64) -> f64 {
    if viewport_width < SMALL_VIEWPORT_PX || viewport_height < SMALL_VIEWPORT_PX {
        120.0
    } else if viewport_width < MEDIUM_VIEWPORT_PX {
        240.0
    } else {
        360.0
    }
}

/// CSS blur radius for a light of `size` pixels.
pub fn blur_radius(size: f64) -> f64 {
    size * 0.45
}

/// Random light count in `[4, 8)`, used when the host does not specify one.
pub fn default_count(rng: &mut impl RandomSource) -> usize {
    4 + rng.index(4)
}

/// CSS `transition` value for lights moving at `speed`.
pub fn transition_css(speed: f64) -> String {
    format!("transform {}s linear, opacity 2s ease", 9.0 / speed)
}

/// Picks `count` distinct gradients.
///
/// Groups are visited in random order taking one gradient from each, so the
/// first lights cover as many hue families as possible; remaining lights draw
/// uniformly from the gradients not yet used.
pub fn select_gradients(
    count: usize,
    groups: &[GradientGroup],
    rng: &mut impl RandomSource,
) -> Result<Vec<Gradient>, Error> {
    let available: usize = groups.iter().map(|g| g.gradients.len()).sum();
    if count > available {
        return Err(Error::not_enough_gradients(count, available));
    }

    let mut order: Vec<&GradientGroup> = groups.iter().collect();
    shuffle(&mut order, rng);

    let mut picked = Vec::with_capacity(count);
    for group in order.iter().filter(|g| !g.gradients.is_empty()) {
        if picked.len() >= count {
            break;
        }
        let gradient = group.gradients[rng.index(group.gradients.len())];
        if !picked.contains(&gradient) {
            picked.push(gradient);
        }
    }

    let mut rest: Vec<Gradient> = order
        .iter()
        .flat_map(|g| g.gradients.iter().copied())
        .filter(|g| !picked.contains(g))
        .collect();
    while picked.len() < count && !rest.is_empty() {
        picked.push(rest.swap_remove(rng.index(rest.len())));
    }

    Ok(picked)
}

fn shuffle<T>(items: &mut [T], rng: &mut impl RandomSource) {
    for i in (1..items.len()).rev() {
        items.swap(i, rng.index(i + 1));
    }
}

/// Top-left corner of a light inside its container.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Position {
    /// Left offset in CSS pixels.
    pub x: f64,
    /// Top offset in CSS pixels.
    pub y: f64,
}

impl Position {
    /// Random position keeping a light of `size` inside a `width` x `height`
    /// container; containers smaller than the light pin it to the origin.
    pub fn random(width: f64, height: f64, size: f64, rng: &mut impl RandomSource) -> Self {
        let x = rng.next_unit() * (width - size).max(0.0);
        let y = rng.next_unit() * (height - size).max(0.0);
        Self { x, y }
    }

    /// CSS `transform` value.
    pub fn transform_css(&self) -> String {
        format!("translate({}px, {}px)", self.x, self.y)
    }
}

/// One step of a light's wander.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(rename_all = "camelCase"))]
pub struct LightMove {
    /// Target position.
    pub position: Position,
    /// Target opacity.
    pub opacity: f64,
    /// Time until the next move.
    pub duration_ms: f64,
}

impl LightMove {
    /// Plans the next move of a light of `size` pixels at `speed`.
    pub fn plan(
        container: (f64, f64),
        size: f64,
        speed: f64,
        rng: &mut impl RandomSource,
    ) -> Self {
        let position = Position::random(container.0, container.1, size, rng);
        let (min, max) = if size < SMALL_LIGHT_PX { (0.5, 0.75) } else { (0.25, 0.45) };
        let opacity = rng.range(min, max);
        let duration_ms = rng.range(5000.0, 11000.0) * (size / REFERENCE_LIGHT_PX) / speed;
        Self { position, opacity, duration_ms }
    }
}

/// A placed light.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Light {
    /// Fill of the disc.
    pub gradient: Gradient,
    /// Initial position.
    pub position: Position,
}

/// Initial layout of all lights.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct LightsPlan {
    /// Diameter of every light in CSS pixels.
    pub size: f64,
    /// Blur radius in CSS pixels.
    pub blur: f64,
    /// One entry per light, each with a distinct gradient.
    pub lights: Vec<Light>,
}

impl LightsPlan {
    /// Plans `count` lights for a viewport and the container they move in.
    pub fn new(
        count: usize,
        viewport: (f64, f64),
        container: (f64, f64),
        rng: &mut impl RandomSource,
    ) -> Result<Self, Error> {
        let size = light_size(viewport.0, viewport.1);
        let gradients = select_gradients(count, GRADIENT_GROUPS, rng)?;

        let lights = gradients
            .into_iter()
            .map(|gradient| Light {
                gradient,
                position: Position::random(container.0, container.1, size, rng),
            })
            .collect();

        tracing::debug!(count, size, "planned gradient lights");
        Ok(Self { size, blur: blur_radius(size), lights })
    }

    /// Re-draws every position, keeping gradients. The light size follows
    /// the new viewport.
    pub fn replan_positions(
        &mut self,
        viewport: (f64, f64),
        container: (f64, f64),
        rng: &mut impl RandomSource,
    ) {
        self.size = light_size(viewport.0, viewport.1);
        self.blur = blur_radius(self.size);
        for light in &mut self.lights {
            light.position = Position::random(container.0, container.1, self.size, rng);
        }
    }
}

/// Filters viewport resizes down to the significant ones.
///
/// Mobile browsers resize the viewport as their toolbars collapse; those
/// small changes must not scatter the lights.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeGate {
    last: (f64, f64),
}

impl ResizeGate {
    /// Starts from the viewport size at mount time.
    pub fn new(width: f64, height: f64) -> Self {
        Self { last: (width, height) }
    }

    /// Returns true, and records the size, if either dimension moved by at
    /// least [`RESIZE_THRESHOLD_PX`] since the last accepted size.
    pub fn accept(&mut self, width: f64, height: f64) -> bool {
        let dw = (width - self.last.0).abs();
        let dh = (height - self.last.1).abs();
        if dw < RESIZE_THRESHOLD_PX && dh < RESIZE_THRESHOLD_PX {
            return false;
        }

        self.last = (width, height);
        true
    }
}

/// Validates a movement speed before it divides durations.
pub fn check_speed(speed: f64) -> Result<f64, Error> {
    if speed.is_finite() && speed > 0.0 {
        Ok(speed)
    } else {
        Err(Error::invalid_value("movement speed", speed))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::SequenceSource;

    #[test]
    fn test_light_size_tiers() {
        assert_eq!(light_size(400.0, 900.0), 120.0);
        assert_eq!(light_size(1400.0, 600.0), 120.0);
        assert_eq!(light_size(800.0, 900.0), 240.0);
        assert_eq!(light_size(1024.0, 768.0), 360.0);
        assert_eq!(blur_radius(240.0), 108.0);
    }

    #[test]
    fn test_select_covers_groups_first() {
        let mut rng = SequenceSource::new([0.3, 0.7, 0.1, 0.9, 0.5]);
        let picked = select_gradients(GRADIENT_GROUPS.len(), GRADIENT_GROUPS, &mut rng).unwrap();

        let groups: HashSet<&str> = picked
            .iter()
            .filter_map(|g| {
                GRADIENT_GROUPS
                    .iter()
                    .find(|group| group.gradients.contains(g))
                    .map(|group| group.name)
            })
            .collect();
        assert_eq!(groups.len(), GRADIENT_GROUPS.len());
    }

    #[test]
    fn test_select_unique_beyond_groups() {
        let total: usize = GRADIENT_GROUPS.iter().map(|g| g.gradients.len()).sum();
        // a constant source still terminates
        let mut rng = SequenceSource::new([0.0]);
        let picked = select_gradients(total, GRADIENT_GROUPS, &mut rng).unwrap();

        let unique: HashSet<Gradient> = picked.iter().copied().collect();
        assert_eq!(picked.len(), total);
        assert_eq!(unique.len(), total);
    }

    #[test]
    fn test_select_too_many() {
        let total: usize = GRADIENT_GROUPS.iter().map(|g| g.gradients.len()).sum();
        let mut rng = SequenceSource::new([0.5]);

        let err = select_gradients(total + 1, GRADIENT_GROUPS, &mut rng).unwrap_err();
        assert!(matches!(err, Error::Planning(_)));
    }

    #[test]
    fn test_position_bounds() {
        let mut rng = SequenceSource::new([0.999, 0.0]);
        let p = Position::random(1000.0, 800.0, 360.0, &mut rng);
        assert!(p.x < 640.0);
        assert_eq!(p.y, 0.0);

        // container smaller than the light
        let p = Position::random(100.0, 100.0, 360.0, &mut rng);
        assert_eq!(p, Position { x: 0.0, y: 0.0 });
        assert_eq!(p.transform_css(), "translate(0px, 0px)");
    }

    #[test]
    fn test_move_opacity_and_duration() {
        let mut rng = SequenceSource::new([0.5, 0.5, 0.0, 0.5]);

        let small = LightMove::plan((1000.0, 1000.0), 120.0, 1.0, &mut rng);
        assert_eq!(small.opacity, 0.5);
        assert_eq!(small.duration_ms, 4000.0);

        let large = LightMove::plan((1000.0, 1000.0), 360.0, 2.0, &mut rng);
        assert_eq!(large.opacity, 0.25);
        assert_eq!(large.duration_ms, 6000.0);
    }

    #[test]
    fn test_plan_and_replan() {
        let mut rng = SequenceSource::new([0.2, 0.4, 0.6, 0.8]);
        let mut plan = LightsPlan::new(5, (1280.0, 800.0), (1280.0, 800.0), &mut rng).unwrap();
        assert_eq!(plan.lights.len(), 5);
        assert_eq!(plan.size, 360.0);
        assert_eq!(plan.blur, 162.0);

        let gradients: Vec<Gradient> = plan.lights.iter().map(|l| l.gradient).collect();
        plan.replan_positions((500.0, 800.0), (500.0, 800.0), &mut rng);
        assert_eq!(plan.size, 120.0);
        assert!(plan.lights.iter().all(|l| l.position.x < 380.0));
        assert_eq!(plan.lights.iter().map(|l| l.gradient).collect::<Vec<_>>(), gradients);
    }

    #[test]
    fn test_resize_gate() {
        let mut gate = ResizeGate::new(1280.0, 800.0);

        assert!(!gate.accept(1280.0, 720.0));
        assert!(!gate.accept(1200.0, 801.0));
        assert!(gate.accept(1280.0, 700.0));
        // measured from the last accepted size
        assert!(!gate.accept(1280.0, 620.0));
        assert!(gate.accept(1180.0, 700.0));
    }

    #[test]
    fn test_defaults() {
        let mut rng = SequenceSource::new([0.99, 0.0]);
        assert_eq!(default_count(&mut rng), 7);
        assert_eq!(default_count(&mut rng), 4);
        assert_eq!(transition_css(2.0), "transform 4.5s linear, opacity 2s ease");
        assert!(check_speed(0.0).is_err());
        assert_eq!(check_speed(1.5), Ok(1.5));
    }
}
