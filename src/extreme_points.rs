//! # Extreme Point Enumeration
//!
//! The feasible region of one simplex group is the polygon
//!
//! ```text
//! { x in R^3 : lower[i] <= x[i] <= upper[i], x[0] + x[1] + x[2] = 1 }
//! ```
//!
//! Every vertex of this polygon pins two coordinates to bounds; on a refined
//! box it suffices to pin one coordinate low and another high and let the sum
//! constraint force the third. Trying all 6 orderings of `(0, 1, 2)` and
//! discarding duplicates yields the vertex set without any general LP
//! machinery. Duplicates appear when two bounds meet at a corner.
//!
//! | Bounds                         | Distinct points |
//! |--------------------------------|-----------------|
//! | Unit box (full triangle)       | 3               |
//! | All six constraints active     | 6 (hexagon)     |

use std::array;

use itertools::Itertools;
use num_rational::BigRational;
use num_traits::{One, Zero};
use rustc_hash::FxHashSet;

use crate::error::{Error, Result};
use crate::qxy_box::{GROUP_DIM, GroupBounds, QxyBox, SimplexGroup};

/// A point of one simplex group; its coordinates sum to 1.
pub type Point3 = [BigRational; GROUP_DIM];

impl GroupBounds {
    /// Distinct extreme points, sorted lexicographically.
    ///
    /// The bounds must already be refined; a forced coordinate that escapes
    /// its own bound is reported as [`Error::ExtremePointViolation`].
    pub fn extreme_points(&self) -> Result<Vec<Point3>> {
        let one = BigRational::one();
        let coords = self.group.coords();
        let mut points: FxHashSet<Point3> = FxHashSet::default();

        for perm in (0..GROUP_DIM).permutations(GROUP_DIM) {
            let (low, high, forced) = (perm[0], perm[1], perm[2]);
            let value = &one - &self.lower[low] - &self.upper[high];

            if value < self.lower[forced] || value > self.upper[forced] {
                return Err(Error::ExtremePointViolation {
                    coord: coords[forced],
                    pinned_lower: coords[low],
                    pinned_upper: coords[high],
                    value,
                    lower: self.lower[forced].clone(),
                    upper: self.upper[forced].clone(),
                });
            }

            let mut point: Point3 = array::from_fn(|_| BigRational::zero());
            point[low] = self.lower[low].clone();
            point[high] = self.upper[high].clone();
            point[forced] = value;
            points.insert(point);
        }

        Ok(points.into_iter().sorted().collect())
    }
}

impl QxyBox {
    /// Extreme points of one group of this box. See
    /// [`GroupBounds::extreme_points`].
    pub fn extreme_points(&self, group: SimplexGroup) -> Result<Vec<Point3>> {
        self.group_bounds(group).extreme_points()
    }
}
