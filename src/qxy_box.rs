//! # Box Refinement
//!
//! A [`QxyBox`] bounds six coordinates. Coordinates `a b c` (indices 0-2)
//! are the simplex group `Qx` and coordinates `d e f` (indices 3-5) are `Qy`;
//! each group sums to exactly 1. The feasible set of a box is therefore the
//! product of two box-constrained 2-simplices.
//!
//! ## Refinement
//!
//! For every coordinate `i` with group siblings `j` and `k`:
//!
//! ```text
//! lower[i] = max(lower[i], 1 - upper[j] - upper[k])
//! upper[i] = min(upper[i], 1 - lower[j] - lower[k])
//! ```
//!
//! All lower bounds are tightened against the *original* upper bounds, then
//! all upper bounds against the *tightened* lower bounds. One round yields the
//! exact projection of the feasible set onto each axis, so a second round is a
//! no-op.
//!
//! ## Splitting
//!
//! A split on coordinate `c` halves `[lower[c], upper[c]]` at its exact
//! midpoint. The midpoint of a refined box is interior to the projection of
//! the feasible polygon, so both children stay feasible after refinement.

use std::array;
use std::fmt;

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Zero};

use crate::error::{Error, Result};

/// Number of coordinates in a box.
pub const DIM: usize = 6;

/// Number of coordinates in one simplex group.
pub const GROUP_DIM: usize = 3;

// TYPE-SAFE INDICES

/// Index of one of the six box coordinates.
///
/// Directive files name coordinates by letter: `a`..`f` map to 0..5.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coord(usize);

impl Coord {
    /// All coordinates in index order.
    pub const ALL: [Self; DIM] = [Self(0), Self(1), Self(2), Self(3), Self(4), Self(5)];

    #[must_use]
    pub const fn new(index: usize) -> Option<Self> {
        if index < DIM { Some(Self(index)) } else { None }
    }

    /// Parse a directive letter `a`..`f`.
    #[must_use]
    pub const fn from_letter(letter: char) -> Option<Self> {
        match letter {
            'a'..='f' => Some(Self(letter as usize - 'a' as usize)),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }

    #[must_use]
    pub const fn letter(self) -> char {
        (b'a' + self.0 as u8) as char
    }

    #[must_use]
    pub const fn group(self) -> SimplexGroup {
        if self.0 < GROUP_DIM {
            SimplexGroup::Qx
        } else {
            SimplexGroup::Qy
        }
    }

    /// Position of this coordinate within its group (0, 1 or 2).
    #[inline]
    #[must_use]
    pub const fn slot(self) -> usize {
        self.0 % GROUP_DIM
    }

    /// The other two coordinates of the same group, in index order.
    #[must_use]
    pub const fn siblings(self) -> (Self, Self) {
        let base = self.0 - self.slot();
        match self.slot() {
            0 => (Self(base + 1), Self(base + 2)),
            1 => (Self(base), Self(base + 2)),
            _ => (Self(base), Self(base + 1)),
        }
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}[{}])", self.letter(), self.group(), self.slot())
    }
}

/// One of the two simplex groups.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SimplexGroup {
    Qx,
    Qy,
}

impl SimplexGroup {
    pub const ALL: [Self; 2] = [Self::Qx, Self::Qy];

    /// The three coordinates of the group, in index order.
    #[must_use]
    pub const fn coords(self) -> [Coord; GROUP_DIM] {
        match self {
            Self::Qx => [Coord(0), Coord(1), Coord(2)],
            Self::Qy => [Coord(3), Coord(4), Coord(5)],
        }
    }
}

impl fmt::Display for SimplexGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Qx => "Qx",
            Self::Qy => "Qy",
        })
    }
}

/// When a bound check failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoundPhase {
    /// The box was already broken when it came off the work stack.
    BeforeRefinement,
    /// Tightening emptied or inverted a bound.
    AfterRefinement,
}

impl fmt::Display for BoundPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::BeforeRefinement => "before refinement",
            Self::AfterRefinement => "after refinement",
        })
    }
}

/// Lower and upper bounds of one simplex group.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GroupBounds {
    pub group: SimplexGroup,
    pub lower: [BigRational; GROUP_DIM],
    pub upper: [BigRational; GROUP_DIM],
}

impl GroupBounds {
    #[must_use]
    pub const fn new(
        group: SimplexGroup,
        lower: [BigRational; GROUP_DIM],
        upper: [BigRational; GROUP_DIM],
    ) -> Self {
        Self {
            group,
            lower,
            upper,
        }
    }
}

// THE BOX

/// An axis-aligned box over the six coordinates.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QxyBox {
    lower: [BigRational; DIM],
    upper: [BigRational; DIM],
}

impl QxyBox {
    /// The root box: every coordinate in `[0, 1]`.
    #[must_use]
    pub fn unit() -> Self {
        Self {
            lower: array::from_fn(|_| BigRational::zero()),
            upper: array::from_fn(|_| BigRational::one()),
        }
    }

    /// Build a box from explicit bounds. No validation is performed.
    #[must_use]
    pub const fn from_bounds(lower: [BigRational; DIM], upper: [BigRational; DIM]) -> Self {
        Self { lower, upper }
    }

    #[inline]
    #[must_use]
    pub const fn lower(&self, coord: Coord) -> &BigRational {
        &self.lower[coord.0]
    }

    #[inline]
    #[must_use]
    pub const fn upper(&self, coord: Coord) -> &BigRational {
        &self.upper[coord.0]
    }

    /// Width `upper - lower` of one coordinate.
    #[must_use]
    pub fn width(&self, coord: Coord) -> BigRational {
        self.upper(coord) - self.lower(coord)
    }

    /// Check `0 <= lower[i] < upper[i] <= 1` for every coordinate.
    pub fn check_bounds(&self, phase: BoundPhase) -> Result<()> {
        let zero = BigRational::zero();
        let one = BigRational::one();

        let broken = Coord::ALL.into_iter().find(|&coord| {
            let (lower, upper) = (self.lower(coord), self.upper(coord));
            !(*lower >= zero && lower < upper && *upper <= one)
        });

        match broken {
            None => Ok(()),
            Some(coord) => Err(Error::InfeasibleBox {
                phase,
                coord,
                lower: self.lower(coord).clone(),
                upper: self.upper(coord).clone(),
                qxy_box: Box::new(self.clone()),
            }),
        }
    }

    /// Tighten every bound against the two sum-to-one constraints, then
    /// validate the result.
    pub fn refine(&mut self) -> Result<()> {
        let one = BigRational::one();

        let lower = array::from_fn(|i| {
            let (j, k) = Coord(i).siblings();
            let implied = &one - &self.upper[j.0] - &self.upper[k.0];
            self.lower[i].clone().max(implied)
        });
        self.lower = lower;

        let upper = array::from_fn(|i| {
            let (j, k) = Coord(i).siblings();
            let implied = &one - &self.lower[j.0] - &self.lower[k.0];
            self.upper[i].clone().min(implied)
        });
        self.upper = upper;

        self.check_bounds(BoundPhase::AfterRefinement)
    }

    /// Consuming form of [`refine`](Self::refine).
    pub fn refined(mut self) -> Result<Self> {
        self.refine()?;
        Ok(self)
    }

    /// Midpoint of one coordinate's interval.
    #[must_use]
    pub fn midpoint(&self, coord: Coord) -> BigRational {
        (self.lower(coord) + self.upper(coord)) / BigRational::from_integer(BigInt::from(2))
    }

    /// Halve the box along `coord`.
    ///
    /// Returns `(lower_half, upper_half)`: the first child has
    /// `upper[coord] = mid`, the second `lower[coord] = mid`.
    #[must_use]
    pub fn split(&self, coord: Coord) -> (Self, Self) {
        let mid = self.midpoint(coord);

        let mut lower_half = self.clone();
        lower_half.upper[coord.0] = mid.clone();

        let mut upper_half = self.clone();
        upper_half.lower[coord.0] = mid;

        (lower_half, upper_half)
    }

    /// Bounds of one simplex group.
    #[must_use]
    pub fn group_bounds(&self, group: SimplexGroup) -> GroupBounds {
        let coords = group.coords();
        GroupBounds::new(
            group,
            array::from_fn(|slot| self.lower(coords[slot]).clone()),
            array::from_fn(|slot| self.upper(coords[slot]).clone()),
        )
    }
}

impl fmt::Display for QxyBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (n, coord) in Coord::ALL.into_iter().enumerate() {
            if n > 0 {
                f.write_str(" x ")?;
            }
            write!(f, "[{}, {}]", self.lower(coord), self.upper(coord))?;
        }
        Ok(())
    }
}

// Tests

#[cfg(test)]
pub(crate) mod tests {
    use itertools::Itertools;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    use super::*;

    pub(crate) fn ratio(numer: i64, denom: i64) -> BigRational {
        BigRational::new(numer.into(), denom.into())
    }

    /// Walk `depth` random splits down from the refined unit box.
    pub(crate) fn random_refined_box(rng: &mut ChaCha8Rng, depth: usize) -> QxyBox {
        let mut current = QxyBox::unit().refined().unwrap();
        for _ in 0..depth {
            let coord = Coord::ALL[rng.random_range(0..DIM)];
            let (lower_half, upper_half) = current.split(coord);
            let child = if rng.random_bool(0.5) {
                lower_half
            } else {
                upper_half
            };
            current = child.refined().unwrap();
        }
        current
    }

    #[test]
    fn test_coord_letters() {
        for (index, letter) in "abcdef".chars().enumerate() {
            let coord = Coord::from_letter(letter).unwrap();
            assert_eq!(coord.index(), index);
            assert_eq!(coord.letter(), letter);
            assert_eq!(Coord::new(index), Some(coord));
        }
        assert_eq!(Coord::from_letter('g'), None);
        assert_eq!(Coord::from_letter('A'), None);
        assert_eq!(Coord::new(DIM), None);
    }

    #[test]
    fn test_coord_groups_and_siblings() {
        assert_eq!(Coord(1).group(), SimplexGroup::Qx);
        assert_eq!(Coord(4).group(), SimplexGroup::Qy);
        assert_eq!(Coord(0).siblings(), (Coord(1), Coord(2)));
        assert_eq!(Coord(4).siblings(), (Coord(3), Coord(5)));
        assert_eq!(Coord(5).siblings(), (Coord(3), Coord(4)));
        assert_eq!(Coord(4).to_string(), "e (Qy[1])");
    }

    #[test]
    fn test_unit_box_unchanged_by_refinement() {
        let mut unit = QxyBox::unit();
        unit.refine().unwrap();
        assert_eq!(unit, QxyBox::unit());
    }

    #[test]
    fn test_refinement_tightens_siblings() {
        // a >= 3/4 forces b, c <= 1/4
        let mut lower = array::from_fn(|_| BigRational::zero());
        lower[0] = ratio(3, 4);
        let mut qxy_box = QxyBox::from_bounds(lower, array::from_fn(|_| BigRational::one()));

        qxy_box.refine().unwrap();

        assert_eq!(*qxy_box.upper(Coord(1)), ratio(1, 4));
        assert_eq!(*qxy_box.upper(Coord(2)), ratio(1, 4));
        assert_eq!(*qxy_box.lower(Coord(0)), ratio(3, 4));
        // Qy untouched
        assert_eq!(*qxy_box.upper(Coord(3)), BigRational::one());
    }

    #[test]
    fn test_refinement_lower_pass_uses_original_upper() {
        // b, c <= 1/4 forces a >= 1/2; the upper pass then caps b, c by 1 - a.
        let mut upper = array::from_fn(|_| BigRational::one());
        upper[1] = ratio(1, 4);
        upper[2] = ratio(1, 4);
        let mut qxy_box = QxyBox::from_bounds(array::from_fn(|_| BigRational::zero()), upper);

        qxy_box.refine().unwrap();

        assert_eq!(*qxy_box.lower(Coord(0)), ratio(1, 2));
        assert_eq!(*qxy_box.upper(Coord(0)), BigRational::one());
        assert_eq!(*qxy_box.upper(Coord(1)), ratio(1, 4));
        assert_eq!(*qxy_box.lower(Coord(1)), BigRational::zero());
    }

    #[test]
    fn test_refinement_detects_infeasible_box() {
        // a, b >= 3/4 cannot sum with c to 1
        let mut lower = array::from_fn(|_| BigRational::zero());
        lower[0] = ratio(3, 4);
        lower[1] = ratio(3, 4);
        let mut qxy_box = QxyBox::from_bounds(lower, array::from_fn(|_| BigRational::one()));

        let err = qxy_box.refine().unwrap_err();
        assert!(matches!(
            err,
            Error::InfeasibleBox {
                phase: BoundPhase::AfterRefinement,
                ..
            }
        ));
    }

    #[test]
    fn test_check_bounds_rejects_degenerate_interval() {
        let mut lower = array::from_fn(|_| BigRational::zero());
        lower[3] = BigRational::one();
        let qxy_box = QxyBox::from_bounds(lower, array::from_fn(|_| BigRational::one()));

        match qxy_box.check_bounds(BoundPhase::BeforeRefinement) {
            Err(Error::InfeasibleBox {
                phase, coord, ..
            }) => {
                assert_eq!(phase, BoundPhase::BeforeRefinement);
                assert_eq!(coord, Coord(3));
            }
            other => panic!("expected infeasible box, got {other:?}"),
        }
    }

    #[test]
    fn test_check_bounds_rejects_out_of_unit_range() {
        let mut upper = array::from_fn(|_| BigRational::one());
        upper[2] = ratio(3, 2);
        let qxy_box = QxyBox::from_bounds(array::from_fn(|_| BigRational::zero()), upper);
        assert!(qxy_box.check_bounds(BoundPhase::BeforeRefinement).is_err());

        let mut lower = array::from_fn(|_| BigRational::zero());
        lower[5] = ratio(-1, 8);
        let qxy_box = QxyBox::from_bounds(lower, array::from_fn(|_| BigRational::one()));
        assert!(qxy_box.check_bounds(BoundPhase::BeforeRefinement).is_err());
    }

    #[test]
    fn test_split_halves_interval() {
        let parent = QxyBox::unit();
        let (lower_half, upper_half) = parent.split(Coord(4));

        assert_eq!(*lower_half.lower(Coord(4)), BigRational::zero());
        assert_eq!(*lower_half.upper(Coord(4)), ratio(1, 2));
        assert_eq!(*upper_half.lower(Coord(4)), ratio(1, 2));
        assert_eq!(*upper_half.upper(Coord(4)), BigRational::one());

        for coord in Coord::ALL.into_iter().filter(|&c| c != Coord(4)) {
            assert_eq!(lower_half.lower(coord), parent.lower(coord));
            assert_eq!(upper_half.upper(coord), parent.upper(coord));
        }
    }

    #[test]
    fn test_refinement_is_idempotent() {
        let mut rng = ChaCha8Rng::seed_from_u64(0x5eed);
        for depth in 0..40 {
            let once = random_refined_box(&mut rng, depth);
            let twice = once.clone().refined().unwrap();
            assert_eq!(once, twice, "depth {depth}");
        }
    }

    #[test]
    fn test_refined_boxes_satisfy_sum_invariant() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let one = BigRational::one();

        for _ in 0..50 {
            let depth = rng.random_range(0..30);
            let qxy_box = random_refined_box(&mut rng, depth);

            for group in SimplexGroup::ALL {
                for perm in group.coords().into_iter().permutations(GROUP_DIM) {
                    let (i, j, k) = (perm[0], perm[1], perm[2]);
                    let low = qxy_box.lower(i) + qxy_box.lower(j) + qxy_box.upper(k);
                    let high = qxy_box.upper(i) + qxy_box.upper(j) + qxy_box.lower(k);
                    assert!(low <= one, "{qxy_box}");
                    assert!(one <= high, "{qxy_box}");
                }
            }
        }
    }

    #[test]
    fn test_split_children_reconstruct_parent() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);

        for _ in 0..50 {
            let depth = rng.random_range(0..20);
            let parent = random_refined_box(&mut rng, depth);
            let coord = Coord::ALL[rng.random_range(0..DIM)];
            let (lower_half, upper_half) = parent.split(coord);

            assert_eq!(lower_half.lower(coord), parent.lower(coord));
            assert_eq!(lower_half.upper(coord), upper_half.lower(coord));
            assert_eq!(upper_half.upper(coord), parent.upper(coord));
            assert_eq!(
                lower_half.width(coord) + upper_half.width(coord),
                parent.width(coord)
            );

            // Midpoint of a refined box is interior, so both halves survive.
            assert!(lower_half.refined().is_ok());
            assert!(upper_half.refined().is_ok());
        }
    }

    #[test]
    fn test_group_bounds() {
        let (lower_half, _) = QxyBox::unit().split(Coord(3));
        let bounds = lower_half.group_bounds(SimplexGroup::Qy);

        assert_eq!(bounds.group, SimplexGroup::Qy);
        assert_eq!(bounds.upper[0], ratio(1, 2));
        assert_eq!(bounds.lower, array::from_fn(|_| BigRational::zero()));
    }
}
