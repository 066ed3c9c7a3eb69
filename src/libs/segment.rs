//! Circular Segment Decomposer.
//!
//! A [`Segment`] relates an interval on a circular axis of length `l1` to an
//! interval on a second circular axis of length `l2`. When either interval
//! runs over its axis origin, the segment is cut there into straight pieces
//! that keep the original slope, so that a renderer or a position calculation
//! never sees a wrapping interval.
//!
//! ```
//! # use msu::libs::segment::{decompose, Segment};
//! let seg = Segment::new(95.0, 5.0, 10.0, 20.0, true, 100, 100).unwrap();
//! let parts = decompose(&seg).unwrap();
//! assert_eq!(parts.len(), 2);
//! assert_eq!(parts[0].x(), (95.0, 100.0));
//! assert_eq!(parts[0].y(), (10.0, 15.0));
//! assert_eq!(parts[1].x(), (0.0, 5.0));
//! assert_eq!(parts[1].y(), (15.0, 20.0));
//! ```

use crate::libs::error::SegmentError;
use std::fmt;

/// Positions closer than this to an origin are snapped onto it
const SNAP: f64 = 1e-6;

/// A split piece may be split once more on the other axis, never deeper
const MAX_SPLITS: usize = 2;

fn reduce(v: f64, l: f64) -> f64 {
    let r = v.rem_euclid(l);
    if r < SNAP || l - r < SNAP {
        0.0
    } else {
        r
    }
}

fn span(s: f64, e: f64, l: f64) -> f64 {
    let d = (e - s).rem_euclid(l);
    if d == 0.0 {
        l
    } else {
        d
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub s1: f64,
    pub e1: f64,
    pub s2: f64,
    pub e2: f64,
    /// `true` when both axes run the same way
    pub orient: bool,
    pub l1: u64,
    pub l2: u64,
}

impl Segment {
    /// Endpoints are reduced modulo their axis length
    pub fn new(
        s1: f64,
        e1: f64,
        s2: f64,
        e2: f64,
        orient: bool,
        l1: u64,
        l2: u64,
    ) -> Result<Self, SegmentError> {
        if l1 == 0 || l2 == 0 {
            return Err(SegmentError::ZeroLength);
        }
        Ok(Self {
            s1,
            e1,
            s2,
            e2,
            orient,
            l1,
            l2,
        }
        .reduced())
    }

    fn reduced(mut self) -> Self {
        let (l1, l2) = (self.l1 as f64, self.l2 as f64);
        self.s1 = reduce(self.s1, l1);
        self.e1 = reduce(self.e1, l1);
        self.s2 = reduce(self.s2, l2);
        self.e2 = reduce(self.e2, l2);
        self
    }

    /// Ends sitting on the origin are the far end of the axis
    fn finished(mut self) -> Self {
        if self.e1 == 0.0 {
            self.e1 = self.l1 as f64;
        }
        if self.e2 == 0.0 {
            self.e2 = self.l2 as f64;
        }
        self
    }

    pub fn x(&self) -> (f64, f64) {
        (self.s1, self.e1)
    }

    /// Axis 2 in drawing order: swapped when the correspondence is inverted
    pub fn y(&self) -> (f64, f64) {
        if self.orient {
            (self.s2, self.e2)
        } else {
            (self.e2, self.s2)
        }
    }

    /// Span on axis 1; a start equal to its end is a full turn
    pub fn dx(&self) -> f64 {
        span(self.s1, self.e1, self.l1 as f64)
    }

    pub fn dy(&self) -> f64 {
        span(self.s2, self.e2, self.l2 as f64)
    }

    /// Slope, negative when inverted
    pub fn m(&self) -> Result<f64, SegmentError> {
        let dx = self.dx();
        if dx == 0.0 {
            return Err(SegmentError::DegenerateSegment {
                axis: 1,
                segment: self.to_string(),
            });
        }
        let m = self.dy() / dx;
        Ok(if self.orient { m } else { -m })
    }

    /// Crosses the axis 1 origin; ending on it does not count, a full turn away from it does
    pub fn x_runover(&self) -> bool {
        self.s1 >= self.e1 && self.e1 != 0.0
    }

    pub fn y_runover(&self) -> bool {
        self.s2 >= self.e2 && self.e2 != 0.0
    }

    /// Cuts the segment at the origin of axis 1
    pub fn split_x(&self) -> Result<[Segment; 2], SegmentError> {
        if !self.x_runover() {
            return Err(SegmentError::NoRunover {
                axis: 1,
                segment: self.to_string(),
            });
        }
        let m = self.m()?;

        let (mut sa, mut sb) = (*self, *self);
        sa.e1 = self.l1 as f64;
        sb.s1 = 0.0;
        if self.orient {
            sa.e2 = sa.s2 + (sa.e1 - sa.s1) * m;
            sb.s2 = sb.e2 - (sb.e1 - sb.s1) * m;
        } else {
            sa.s2 = sa.e2 + (sa.e1 - sa.s1) * m;
            sb.e2 = sb.s2 - (sb.e1 - sb.s1) * m;
        }

        Ok([sa.reduced(), sb.reduced()])
    }

    /// Cuts the segment at the origin of axis 2
    pub fn split_y(&self) -> Result<[Segment; 2], SegmentError> {
        if !self.y_runover() {
            return Err(SegmentError::NoRunover {
                axis: 2,
                segment: self.to_string(),
            });
        }
        let m = self.m()?;
        if m == 0.0 {
            return Err(SegmentError::DegenerateSegment {
                axis: 2,
                segment: self.to_string(),
            });
        }

        let (mut sa, mut sb) = (*self, *self);
        sa.e2 = self.l2 as f64;
        sb.s2 = 0.0;
        if self.orient {
            sa.e1 = sa.s1 + (sa.e2 - sa.s2) / m;
            sb.s1 = sb.e1 - (sb.e2 - sb.s2) / m;
        } else {
            sa.s1 = sa.e1 + (sa.e2 - sa.s2) / m;
            sb.e1 = sb.s1 - (sb.e2 - sb.s2) / m;
        }

        Ok([sa.reduced(), sb.reduced()])
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{} x {}-{} ({}) on {}x{}",
            self.s1,
            self.e1,
            self.s2,
            self.e2,
            if self.orient { "+" } else { "-" },
            self.l1,
            self.l2
        )
    }
}

/// Splits `seg` until no piece crosses an origin.
///
/// Pieces come out in the order they are found, first piece of each split first.
pub fn decompose(seg: &Segment) -> Result<Vec<Segment>, SegmentError> {
    let mut out = Vec::with_capacity(2);
    decompose_rec(*seg, 0, &mut out)?;
    Ok(out)
}

fn decompose_rec(seg: Segment, depth: usize, out: &mut Vec<Segment>) -> Result<(), SegmentError> {
    let parts = if seg.x_runover() {
        Some(seg.split_x()?)
    } else if seg.y_runover() {
        Some(seg.split_y()?)
    } else {
        None
    };

    match parts {
        None => out.push(seg.finished()),
        Some(_) if depth >= MAX_SPLITS => {
            return Err(SegmentError::RecursionDepth {
                depth: depth + 1,
                segment: seg.to_string(),
            });
        }
        Some([a, b]) => {
            decompose_rec(a, depth + 1, out)?;
            decompose_rec(b, depth + 1, out)?;
        }
    }
    Ok(())
}

//----------------------------
// PrivSegment
//----------------------------
/// An interval on a single circular axis, for blocks private to one genome
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PrivSegment {
    pub s: u64,
    pub e: u64,
    pub l: u64,
}

impl PrivSegment {
    pub fn new(s: u64, e: u64, l: u64) -> Result<Self, SegmentError> {
        if l == 0 {
            return Err(SegmentError::ZeroLength);
        }
        Ok(Self {
            s: s % l,
            e: e % l,
            l,
        })
    }

    pub fn x(&self) -> (u64, u64) {
        (self.s, self.e)
    }

    pub fn dx(&self) -> u64 {
        match (self.e + self.l - self.s) % self.l {
            0 => self.l,
            d => d,
        }
    }

    pub fn x_runover(&self) -> bool {
        self.s >= self.e && self.e != 0
    }

    pub fn split_x(&self) -> Result<[PrivSegment; 2], SegmentError> {
        if !self.x_runover() {
            return Err(SegmentError::NoRunover {
                axis: 1,
                segment: format!("{}-{} on {}", self.s, self.e, self.l),
            });
        }
        let sa = PrivSegment { e: 0, ..*self };
        let sb = PrivSegment { s: 0, ..*self };
        Ok([sa, sb])
    }
}

/// ```
/// # use msu::libs::segment::{decompose_private, PrivSegment};
/// let parts = decompose_private(&PrivSegment::new(90, 10, 100).unwrap()).unwrap();
/// let xs: Vec<(u64, u64)> = parts.iter().map(|p| p.x()).collect();
/// assert_eq!(xs, vec![(90, 100), (0, 10)]);
/// ```
pub fn decompose_private(seg: &PrivSegment) -> Result<Vec<PrivSegment>, SegmentError> {
    let pieces = if seg.x_runover() {
        seg.split_x()?.to_vec()
    } else {
        vec![*seg]
    };
    Ok(pieces
        .into_iter()
        .map(|mut p| {
            if p.e == 0 {
                p.e = p.l;
            }
            p
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn seg(s1: f64, e1: f64, s2: f64, e2: f64, orient: bool) -> Segment {
        Segment::new(s1, e1, s2, e2, orient, 100, 100).unwrap()
    }

    fn spans(parts: &[Segment]) -> Vec<(f64, f64, f64, f64)> {
        parts.iter().map(|p| (p.s1, p.e1, p.s2, p.e2)).collect()
    }

    #[test]
    fn wraps_over_x_origin() {
        let parts = decompose(&seg(95.0, 5.0, 10.0, 20.0, true)).unwrap();
        assert_eq!(
            spans(&parts),
            vec![(95.0, 100.0, 10.0, 15.0), (0.0, 5.0, 15.0, 20.0)]
        );
        for p in &parts {
            assert_relative_eq!(p.m().unwrap(), 1.0);
        }
    }

    #[test]
    fn plain_segment_is_unchanged() {
        let s = seg(10.0, 20.0, 30.0, 50.0, true);
        assert_eq!(decompose(&s).unwrap(), vec![s]);

        let s = seg(10.0, 20.0, 30.0, 50.0, false);
        assert_eq!(decompose(&s).unwrap(), vec![s]);
    }

    #[test]
    fn reduces_raw_endpoints() {
        let s = Segment::new(195.0, -95.0, 250.0, 60.0, true, 100, 200).unwrap();
        assert_eq!((s.s1, s.e1, s.s2, s.e2), (95.0, 5.0, 50.0, 60.0));
        assert!(s.x_runover());
        assert!(!s.y_runover());
        assert!(Segment::new(0.0, 1.0, 0.0, 1.0, true, 0, 10).is_err());
    }

    #[test]
    fn end_on_origin_is_not_runover() {
        let s = seg(90.0, 100.0, 40.0, 0.0, true);
        assert_eq!(s.e1, 0.0);
        assert!(!s.x_runover());
        assert!(!s.y_runover());
        assert_eq!(spans(&decompose(&s).unwrap()), vec![(90.0, 100.0, 40.0, 100.0)]);

        // a block covering the whole genome
        let s = seg(0.0, 0.0, 0.0, 0.0, true);
        assert_eq!(spans(&decompose(&s).unwrap()), vec![(0.0, 100.0, 0.0, 100.0)]);
    }

    #[test]
    fn wraps_over_both_origins() {
        let parts = decompose(&seg(95.0, 5.0, 97.0, 7.0, true)).unwrap();
        assert_eq!(parts.len(), 3);
        let expect = [
            (95.0, 98.0, 97.0, 100.0),
            (98.0, 100.0, 0.0, 2.0),
            (0.0, 5.0, 2.0, 7.0),
        ];
        for (p, e) in parts.iter().zip(expect.iter()) {
            assert_relative_eq!(p.s1, e.0, epsilon = 1e-9);
            assert_relative_eq!(p.e1, e.1, epsilon = 1e-9);
            assert_relative_eq!(p.s2, e.2, epsilon = 1e-9);
            assert_relative_eq!(p.e2, e.3, epsilon = 1e-9);
        }
    }

    #[test]
    fn inverted_wraps() {
        // x runs over, y descends 20 -> 10
        let parts = decompose(&seg(95.0, 5.0, 10.0, 20.0, false)).unwrap();
        assert_eq!(
            spans(&parts),
            vec![(95.0, 100.0, 15.0, 20.0), (0.0, 5.0, 10.0, 15.0)]
        );
        assert_eq!(parts[0].y(), (20.0, 15.0));
        assert_eq!(parts[1].y(), (15.0, 10.0));

        // y runs over, descends 5 -> 0 | 100 -> 95
        let parts = decompose(&seg(10.0, 20.0, 95.0, 5.0, false)).unwrap();
        assert_eq!(
            spans(&parts),
            vec![(15.0, 20.0, 95.0, 100.0), (10.0, 15.0, 0.0, 5.0)]
        );

        // both origins crossed at one point
        let parts = decompose(&seg(95.0, 5.0, 95.0, 5.0, false)).unwrap();
        assert_eq!(
            spans(&parts),
            vec![(95.0, 100.0, 0.0, 5.0), (0.0, 5.0, 95.0, 100.0)]
        );
    }

    #[test]
    fn full_turn_away_from_origin() {
        let s = seg(50.0, 50.0, 0.0, 0.0, true);
        assert_eq!(s.dx(), 100.0);
        assert_eq!(s.dy(), 100.0);
        assert!(s.x_runover());
        assert!(!s.y_runover());
        assert_eq!(
            spans(&decompose(&s).unwrap()),
            vec![(50.0, 100.0, 0.0, 50.0), (0.0, 50.0, 50.0, 100.0)]
        );

        // a full turn of axis 2 against 20 units of axis 1, descending
        let parts = decompose(&seg(10.0, 30.0, 60.0, 60.0, false)).unwrap();
        assert_eq!(
            spans(&parts),
            vec![(22.0, 30.0, 60.0, 100.0), (10.0, 22.0, 0.0, 60.0)]
        );
        assert_eq!(parts[0].y(), (100.0, 60.0));
        assert_eq!(parts[1].y(), (60.0, 0.0));
    }

    #[test]
    fn split_preconditions() {
        let s = seg(10.0, 20.0, 30.0, 40.0, true);
        assert!(matches!(s.split_x(), Err(SegmentError::NoRunover { axis: 1, .. })));
        assert!(matches!(s.split_y(), Err(SegmentError::NoRunover { axis: 2, .. })));

        // ending on the origin is not a crossing
        let s = seg(40.0, 0.0, 30.0, 40.0, true);
        assert!(matches!(s.split_x(), Err(SegmentError::NoRunover { axis: 1, .. })));
    }

    #[test]
    fn depth_is_bounded() {
        let s = seg(95.0, 5.0, 10.0, 20.0, true);
        let mut out = vec![];
        assert!(matches!(
            decompose_rec(s, MAX_SPLITS, &mut out),
            Err(SegmentError::RecursionDepth { .. })
        ));
        assert!(out.is_empty());
    }

    #[test]
    fn pieces_cover_the_span_with_the_same_slope() {
        let marks = [0.0, 30.0, 60.0, 90.0, 99.0];
        for &s1 in &marks {
            for &e1 in &marks {
                for &s2 in &marks {
                    for &e2 in &marks {
                        if s1 == e1 || s2 == e2 {
                            continue;
                        }
                        for orient in [true, false] {
                            let s = seg(s1, e1, s2, e2, orient);
                            let parts = decompose(&s).unwrap();
                            assert!(parts.len() <= 4, "{}", s);

                            let mut sum_x = 0.0;
                            let mut sum_y = 0.0;
                            for p in &parts {
                                assert!(p.s1 <= p.e1 && p.e1 <= 100.0, "{} -> {}", s, p);
                                assert!(p.s2 <= p.e2 && p.e2 <= 100.0, "{} -> {}", s, p);
                                let (px, py) = (p.e1 - p.s1, p.e2 - p.s2);
                                assert_relative_eq!(py, px * s.dy() / s.dx(), epsilon = 1e-6);
                                sum_x += px;
                                sum_y += py;
                            }
                            assert_relative_eq!(sum_x, s.dx(), epsilon = 1e-6);
                            assert_relative_eq!(sum_y, s.dy(), epsilon = 1e-6);
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn private_segments() {
        let p = PrivSegment::new(150, 30, 100).unwrap();
        assert_eq!(p.x(), (50, 30));
        assert_eq!(p.dx(), 80);
        assert!(p.x_runover());
        let parts = decompose_private(&p).unwrap();
        let xs: Vec<(u64, u64)> = parts.iter().map(|p| p.x()).collect();
        assert_eq!(xs, vec![(50, 100), (0, 30)]);

        let p = PrivSegment::new(50, 100, 100).unwrap();
        assert!(!p.x_runover());
        assert_eq!(decompose_private(&p).unwrap()[0].x(), (50, 100));
        assert!(p.split_x().is_err());

        // start == end covers the whole axis
        let p = PrivSegment::new(30, 30, 100).unwrap();
        assert_eq!(p.dx(), 100);
        let xs: Vec<(u64, u64)> = decompose_private(&p).unwrap().iter().map(|p| p.x()).collect();
        assert_eq!(xs, vec![(30, 100), (0, 30)]);

        let p = PrivSegment::new(0, 0, 100).unwrap();
        assert!(!p.x_runover());
        assert_eq!(decompose_private(&p).unwrap()[0].x(), (0, 100));
    }
}
