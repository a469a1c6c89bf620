use glam::Vec3;
use rand::Rng;

use crate::core::geometry::heading::Heading;

/// A corner is never placed this close to the end anchor.
const END_SNAP_DISTANCE: f32 = 1e-3;

/// Multiple of the straight-line corner estimate after which a segment stops growing.
const STEP_BUDGET_FACTOR: usize = 4;

/// A corner placed by [`CornerInterpolator`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CornerPlacement {
    /// Position of the corner, jitter included.
    pub position: Vec3,

    /// Heading of the corner, facing the end of the segment.
    pub heading: Heading,

    /// New heading of the node placed before this corner, facing this corner.
    pub predecessor_heading: Heading,
}

/// Iterator of corners between two anchors.
///
/// Each corner is placed `spacing` away from the previously placed one, towards
/// `end`, then displaced at random by up to `jitter` along the forward and lateral
/// axes of its own frame. Placement stops once less than `spacing + jitter` is left
/// to `end`.
///
/// The caller must ensure `spacing > 0` and `0 <= jitter <= spacing`.
pub struct CornerInterpolator<'a, R>
where
    R: Rng,
{
    rng: &'a mut R,
    last: Vec3,
    end: Vec3,
    spacing: f32,
    jitter: f32,
    steps_left: usize,
}

impl<'a, R> CornerInterpolator<'a, R>
where
    R: Rng,
{
    pub fn new(start: Vec3, end: Vec3, spacing: f32, jitter: f32, rng: &'a mut R) -> Self {
        debug_assert!(spacing > 0.0);
        debug_assert!((0.0..=spacing).contains(&jitter));
        let estimate = (start.distance(end) / spacing).ceil();
        let steps_left = if estimate.is_finite() {
            estimate as usize * STEP_BUDGET_FACTOR + 1
        } else {
            0
        };
        Self {
            rng,
            last: start,
            end,
            spacing,
            jitter,
            steps_left,
        }
    }

    fn draw_offset(&mut self) -> Vec3 {
        if self.jitter <= 0.0 {
            return Vec3::ZERO;
        }
        let lateral = self.rng.gen_range(-self.jitter..=self.jitter);
        let forward = self.rng.gen_range(-self.jitter..=self.jitter);
        Vec3::new(lateral, 0.0, forward)
    }
}

impl<R> Iterator for CornerInterpolator<'_, R>
where
    R: Rng,
{
    type Item = CornerPlacement;

    fn next(&mut self) -> Option<Self::Item> {
        let remaining = self.last.distance(self.end);
        if self.steps_left == 0
            || remaining < self.spacing + self.jitter
            || remaining - self.spacing <= END_SNAP_DISTANCE
        {
            self.steps_left = 0;
            return None;
        }
        self.steps_left -= 1;

        // the denominator shrinks as corners are placed, which keeps the spacing even
        let unjittered = self.last.lerp(self.end, self.spacing / remaining);
        let heading = Heading::looking_at(unjittered, self.end);
        let position = unjittered + heading.to_world(self.draw_offset());
        let predecessor_heading = Heading::looking_at(self.last, position);

        self.last = position;
        Some(CornerPlacement {
            position,
            heading,
            predecessor_heading,
        })
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    #[test]
    fn test_even_spacing_without_jitter() {
        let mut rng = StdRng::seed_from_u64(0);
        let corners = CornerInterpolator::new(
            Vec3::ZERO,
            Vec3::new(100.0, 0.0, 0.0),
            10.0,
            0.0,
            &mut rng,
        )
        .collect::<Vec<_>>();

        assert_eq!(corners.len(), 9);
        corners.iter().enumerate().for_each(|(i, corner)| {
            let expected = Vec3::new(10.0 * (i + 1) as f32, 0.0, 0.0);
            assert!(corner.position.distance(expected) < 1e-3);
            assert!(corner.heading.forward().distance(Vec3::X) < 1e-5);
            assert!(corner.predecessor_heading.forward().distance(Vec3::X) < 1e-5);
        });
    }

    #[test]
    fn test_short_segment_has_no_corners() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut corners =
            CornerInterpolator::new(Vec3::ZERO, Vec3::new(0.0, 0.0, 12.0), 7.5, 5.5, &mut rng);
        assert!(corners.next().is_none());
        assert!(corners.next().is_none());
    }

    #[test]
    fn test_jittered_spacing_is_bounded() {
        let (spacing, jitter) = (8.0, 3.0);
        let start = Vec3::new(-40.0, 2.0, 10.0);
        let end = Vec3::new(160.0, 2.0, -35.0);
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let corners = CornerInterpolator::new(start, end, spacing, jitter, &mut rng)
                .collect::<Vec<_>>();
            assert!(!corners.is_empty());

            let mut previous = start;
            for corner in &corners {
                let direction = (end - previous).normalize();
                let along = (corner.position - previous).dot(direction);
                assert!(along >= spacing - jitter - 1e-3, "too close: {}", along);
                assert!(along <= spacing + jitter + 1e-3, "too far: {}", along);
                // corners stay on the horizontal plane of their frame
                assert!((corner.position.y - previous.y).abs() < 1e-3);
                previous = corner.position;
            }
            assert!(previous.distance(end) < spacing + jitter + 1e-3);
        }
    }

    #[test]
    fn test_predecessor_faces_new_corner() {
        let mut rng = StdRng::seed_from_u64(42);
        let start = Vec3::ZERO;
        let corners = CornerInterpolator::new(start, Vec3::new(0.0, 0.0, 80.0), 10.0, 4.0, &mut rng)
            .collect::<Vec<_>>();
        let mut previous = start;
        for corner in corners {
            let expected = (corner.position - previous).normalize();
            assert!(corner.predecessor_heading.forward().distance(expected) < 1e-4);
            previous = corner.position;
        }
    }

    #[test]
    fn test_same_seed_same_corners() {
        let run = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            CornerInterpolator::new(Vec3::ZERO, Vec3::new(50.0, 0.0, 50.0), 7.5, 5.5, &mut rng)
                .map(|corner| corner.position)
                .collect::<Vec<_>>()
        };
        assert_eq!(run(3), run(3));
    }

    #[test]
    fn test_jitter_equal_to_spacing_terminates() {
        let mut rng = StdRng::seed_from_u64(9);
        let count =
            CornerInterpolator::new(Vec3::ZERO, Vec3::new(300.0, 0.0, 0.0), 5.0, 5.0, &mut rng)
                .count();
        assert!(count <= (300.0_f32 / 5.0).ceil() as usize * STEP_BUDGET_FACTOR + 1);
    }
}
