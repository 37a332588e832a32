use kurbo::Point;
use rand::Rng;

use crate::core::Canvas;

/// One falling flake. Radius doubles as a cheap depth cue.
#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
pub struct Snowflake {
    pub pos: Point,
    pub radius: f64,
    pub speed: f64,
    pub drift: f64,
}

/// A bounded field of falling snow over a canvas.
///
/// Purely kinematic: each [`step`](Snowfield::step) moves every flake by its
/// own speed and drift, respawning flakes that fall off the bottom and
/// wrapping horizontal overflow to the opposite edge.
#[derive(Clone, Debug)]
pub struct Snowfield {
    canvas: Canvas,
    flakes: Vec<Snowflake>,
}

impl Snowfield {
    pub fn new(canvas: Canvas, count: usize, rng: &mut impl Rng) -> Self {
        let flakes = (0..count)
            .map(|_| Snowflake {
                pos: Point::new(
                    rng.random_range(0.0..canvas.width_f64()),
                    rng.random_range(0.0..canvas.height_f64()),
                ),
                radius: rng.random_range(1.0..4.0),
                speed: rng.random_range(0.5..1.5),
                drift: rng.random_range(-0.25..0.25),
            })
            .collect();
        Self { canvas, flakes }
    }

    pub fn flakes(&self) -> &[Snowflake] {
        &self.flakes
    }

    /// Advance the field by one frame.
    pub fn step(&mut self, rng: &mut impl Rng) {
        let (w, h) = (self.canvas.width_f64(), self.canvas.height_f64());
        for flake in &mut self.flakes {
            flake.pos.y += flake.speed;
            flake.pos.x += flake.drift;

            if flake.pos.y > h {
                flake.pos.y = -flake.radius;
                flake.pos.x = rng.random_range(0.0..w);
            }
            if flake.pos.x > w {
                flake.pos.x = 0.0;
            }
            if flake.pos.x < 0.0 {
                flake.pos.x = w;
            }
        }
    }

    /// Advance several frames at once; used to de-correlate the initial
    /// uniform scatter before a still render.
    pub fn settle(&mut self, frames: u32, rng: &mut impl Rng) {
        for _ in 0..frames {
            self.step(rng);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn field(seed: u64) -> Snowfield {
        let canvas = Canvas::new(200, 100).unwrap();
        let mut rng = StdRng::seed_from_u64(seed);
        Snowfield::new(canvas, 50, &mut rng)
    }

    #[test]
    fn new_field_scatters_inside_canvas() {
        let field = field(1);
        assert_eq!(field.flakes().len(), 50);
        for f in field.flakes() {
            assert!(f.pos.x >= 0.0 && f.pos.x < 200.0);
            assert!(f.pos.y >= 0.0 && f.pos.y < 100.0);
            assert!(f.radius >= 1.0 && f.radius < 4.0);
            assert!(f.speed >= 0.5 && f.speed < 1.5);
            assert!(f.drift >= -0.25 && f.drift < 0.25);
        }
    }

    #[test]
    fn flakes_fall_and_stay_bounded() {
        let mut field = field(2);
        let mut rng = StdRng::seed_from_u64(99);
        field.settle(500, &mut rng);
        for f in field.flakes() {
            assert!(f.pos.x >= 0.0 && f.pos.x <= 200.0);
            // Respawned flakes start just above the top edge.
            assert!(f.pos.y >= -4.0 && f.pos.y <= 100.0 + 1.5);
        }
    }

    #[test]
    fn step_moves_every_flake_down() {
        let mut field = field(3);
        let before: Vec<f64> = field.flakes().iter().map(|f| f.pos.y).collect();
        let mut rng = StdRng::seed_from_u64(7);
        field.step(&mut rng);
        for (f, y0) in field.flakes().iter().zip(before) {
            // Either fell by its speed or respawned above the top.
            assert!(f.pos.y > y0 || f.pos.y <= 0.0);
        }
    }
}
