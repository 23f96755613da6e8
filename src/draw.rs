//! Drawing onto an [`Image`].
//!
//! Points outside the image are skipped. The `filled_*` shapes draw their
//! outline and then, on each row, paint between the leftmost and rightmost
//! pixels already holding the fill color. Any other pixel of that color
//! in a row widens the span, and concave shapes get filled up to their
//! outermost edges.
use crate::image::{Image, Sample};

/// A position on the image plane. May lie outside the image.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

impl<S: Sample> Image<S> {
    fn plot(&mut self, x: i64, y: i64, c: S) {
        if let (Ok(x), Ok(y)) = (u32::try_from(x), u32::try_from(y)) {
            if x < self.width && y < self.height {
                let i = self.index(x, y);
                self.buf[i] = c;
            }
        }
    }

    /// Paint between the outermost pixels of color `c` on every row.
    fn span_fill(&mut self, c: S) {
        for row in self.rows_mut() {
            if let (Some(l), Some(r)) = (
                row.iter().position(|&x| x == c),
                row.iter().rposition(|&x| x == c),
            ) {
                if r > l {
                    row[l + 1..r].fill(c);
                }
            }
        }
    }

    /// Bresenham line from `a` to `b`, both ends included.
    ///
    /// Colors are limited to [`Image::max`] per channel, like [`Image::set`].
    pub fn line(&mut self, a: Point, b: Point, c: S) {
        let c = self.clamp(c);
        self.segment((a.x.into(), a.y.into()), (b.x.into(), b.y.into()), c);
    }

    /// Step `k` of the line sits at `p0 + sp * k` on the major axis and at
    /// `q0 + sq * ceil((2 * dq * k - dp) / (2 * dp))` on the minor one, which
    /// is where the incremental error term puts it. Only steps whose major
    /// coordinate lands inside the image are visited.
    fn segment(&mut self, a: (i64, i64), b: (i64, i64), c: S) {
        let (dx, dy) = ((b.0 - a.0).abs(), (b.1 - a.1).abs());
        let sx = if b.0 < a.0 { -1 } else { 1 };
        let sy = if b.1 < a.1 { -1 } else { 1 };
        let x_major = dx > dy;
        let (p0, q0, dp, dq, sp, sq, limit) = if x_major {
            (a.0, a.1, dx, dy, sx, sy, self.width)
        } else {
            (a.1, a.0, dy, dx, sy, sx, self.height)
        };
        let limit = i64::from(limit);
        let (lo, hi) = if sp > 0 {
            (-p0, limit - 1 - p0)
        } else {
            (p0 - (limit - 1), p0)
        };
        for k in lo.max(0)..=hi.min(dp) {
            let m = if dp == 0 {
                0
            } else {
                let n = i128::from(dp) - 2 * i128::from(dq) * i128::from(k);
                -n.div_euclid(2 * i128::from(dp)) as i64
            };
            let (p, q) = (p0 + sp * k, q0 + sq * m);
            if x_major {
                self.plot(p, q, c);
            } else {
                self.plot(q, p, c);
            }
        }
    }

    /// Outline of the rectangle spanning `width` x `height` from `top_left`,
    /// clamped to the image.
    pub fn rectangle(&mut self, top_left: Point, width: i32, height: i32, c: S) {
        let c = self.clamp(c);
        let x = i64::from(top_left.x.max(0));
        let y = i64::from(top_left.y.max(0));
        let width = i64::from(width).min(i64::from(self.width) - x);
        let height = i64::from(height).min(i64::from(self.height) - y);
        let (tl, tr) = ((x, y), (x + width, y));
        let (br, bl) = ((x + width, y + height), (x, y + height));
        self.segment(tl, tr, c);
        self.segment(tr, br, c);
        self.segment(br, bl, c);
        self.segment(bl, tl, c);
    }

    /// [`Image::rectangle`], span filled.
    ///
    /// A rectangle larger than the image in both directions covers it entirely.
    pub fn filled_rectangle(&mut self, top_left: Point, width: i32, height: i32, c: S) {
        let c = self.clamp(c);
        self.rectangle(top_left, width, height, c);
        let (w, h) = (i64::from(self.width), i64::from(self.height));
        if i64::from(width) > w && i64::from(height) > h {
            self.buf.fill(c);
        } else {
            self.span_fill(c);
        }
    }

    /// Pixels strictly inside `radius` but less than 1 away from it,
    /// plus the four axis points at `radius - 1`.
    pub fn circle(&mut self, center: Point, radius: i32, c: S) {
        let c = self.clamp(c);
        let (cx, cy) = (i64::from(center.x), i64::from(center.y));
        let r = radius as f64;
        for row in 0..i64::from(self.height) {
            for col in 0..i64::from(self.width) {
                let d = ((col - cx) as f64).hypot((row - cy) as f64);
                if (d - r).abs() < 1.0 && d < r {
                    self.plot(col, row, c);
                }
            }
        }
        let k = i64::from(radius) - 1;
        self.plot(cx - k, cy, c);
        self.plot(cx + k, cy, c);
        self.plot(cx, cy + k, c);
        self.plot(cx, cy - k, c);
    }

    /// [`Image::circle`], span filled.
    pub fn filled_circle(&mut self, center: Point, radius: i32, c: S) {
        let c = self.clamp(c);
        self.circle(center, radius, c);
        self.span_fill(c);
    }

    pub fn triangle(&mut self, a: Point, b: Point, c: Point, color: S) {
        self.polygon(&[a, b, c], color);
    }

    /// [`Image::triangle`], span filled.
    pub fn filled_triangle(&mut self, a: Point, b: Point, c: Point, color: S) {
        let color = self.clamp(color);
        self.triangle(a, b, c, color);
        self.span_fill(color);
    }

    /// Closed outline through `points`; the last point joins the first.
    pub fn polygon(&mut self, points: &[Point], c: S) {
        let (Some(&first), Some(&last)) = (points.first(), points.last()) else {
            return;
        };
        for w in points.windows(2) {
            self.line(w[0], w[1], c);
        }
        self.line(last, first, c);
    }

    /// [`Image::polygon`], span filled. Concave polygons fill to their outer edges.
    pub fn filled_polygon(&mut self, points: &[Point], c: S) {
        let c = self.clamp(c);
        self.polygon(points, c);
        self.span_fill(c);
    }

    /// Sierpinski triangle of `depth` levels.
    ///
    /// The base runs from `start` to `start + (width, 0)` and the apex sits
    /// `√3·width/2` below it (increasing `y`); [`Image::flop`] the result
    /// for an upright triangle.
    pub fn sierpinski(&mut self, depth: u32, start: Point, width: i32, c: S) {
        let c = self.clamp(c);
        self.sierpinski_at(depth, (start.x.into(), start.y.into()), width.into(), c);
    }

    fn sierpinski_at(&mut self, depth: u32, a: (i64, i64), width: i64, c: S) {
        if depth == 0 {
            return;
        }
        let height = (3f64.sqrt() * width as f64 / 2.) as i64;
        let b = (a.0 + width, a.1);
        let apex = (a.0 + width / 2, a.1 + height);
        self.segment(a, b, c);
        self.segment(b, apex, c);
        self.segment(apex, a, c);

        let base_mid = ((a.0 + b.0) / 2, (a.1 + b.1) / 2);
        let side_mid = ((apex.0 + a.0) / 2, (apex.1 + a.1) / 2);
        self.sierpinski_at(depth - 1, a, width / 2, c);
        self.sierpinski_at(depth - 1, base_mid, width / 2, c);
        self.sierpinski_at(depth - 1, side_mid, width / 2, c);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Encoding, Rgb};

    const RED: Rgb = [255, 0, 0];

    fn canvas(w: u32, h: u32) -> Image<Rgb> {
        Image::new(w, h, 255, Encoding::Plain).unwrap()
    }

    fn painted<S: Sample>(x: &Image<S>, c: S) -> Vec<(u32, u32)> {
        (0..x.height())
            .flat_map(|y| (0..x.width()).map(move |x| (x, y)))
            .filter(|&(px, py)| x.at(px, py) == c)
            .collect()
    }

    /// Renders a bitmap as rows of `#` and `.`.
    fn ascii(x: &Image<bool>) -> Vec<String> {
        x.rows()
            .map(|r| r.iter().map(|&b| if b { '#' } else { '.' }).collect())
            .collect()
    }

    #[test]
    fn horizontal_line() {
        let mut x = canvas(5, 2);
        x.line(Point::new(0, 0), Point::new(3, 0), RED);
        assert_eq!(painted(&x, RED), [(0, 0), (1, 0), (2, 0), (3, 0)]);
    }

    #[test]
    fn lines_in_every_direction() {
        let mut x = Image::<bool>::new(4, 4, 1, Encoding::Plain).unwrap();
        x.line(Point::new(3, 3), Point::new(0, 0), true);
        assert_eq!(painted(&x, true), [(0, 0), (1, 1), (2, 2), (3, 3)]);

        let mut x = Image::<bool>::new(4, 4, 1, Encoding::Plain).unwrap();
        x.line(Point::new(1, 3), Point::new(1, 0), true);
        assert_eq!(painted(&x, true), [(1, 0), (1, 1), (1, 2), (1, 3)]);
    }

    #[test]
    fn clipped_line() {
        let mut x = Image::<u8>::new(3, 3, 9, Encoding::Plain).unwrap();
        x.line(Point::new(-5, 1), Point::new(10, 1), 9);
        assert_eq!(painted(&x, 9), [(0, 1), (1, 1), (2, 1)]);
    }

    /// Plain incremental Bresenham, plotting every step.
    fn stepped(w: u32, h: u32, a: (i64, i64), b: (i64, i64)) -> Image<bool> {
        let mut x = Image::<bool>::new(w, h, 1, Encoding::Plain).unwrap();
        let (dx, dy) = ((b.0 - a.0).abs(), (b.1 - a.1).abs());
        let sx = if b.0 < a.0 { -1 } else { 1 };
        let sy = if b.1 < a.1 { -1 } else { 1 };
        let (mut px, mut py) = a;
        if dx > dy {
            let mut d = 2 * dy - dx;
            for _ in 0..=dx {
                x.plot(px, py, true);
                if d > 0 {
                    py += sy;
                    d -= 2 * dx;
                }
                px += sx;
                d += 2 * dy;
            }
        } else {
            let mut d = 2 * dx - dy;
            for _ in 0..=dy {
                x.plot(px, py, true);
                if d > 0 {
                    px += sx;
                    d -= 2 * dy;
                }
                py += sy;
                d += 2 * dx;
            }
        }
        x
    }

    #[test]
    fn line_matches_stepping() {
        let ends: Vec<(i32, i32)> = (-3..9)
            .flat_map(|x| [(x, -2), (x, 0), (x, 3), (x, 7)])
            .collect();
        for &a in &ends {
            for &b in &ends {
                let mut x = Image::<bool>::new(6, 5, 1, Encoding::Plain).unwrap();
                x.line(a.into(), b.into(), true);
                let wide = |(x, y): (i32, i32)| (i64::from(x), i64::from(y));
                assert_eq!(x, stepped(6, 5, wide(a), wide(b)), "{a:?} -> {b:?}");
            }
        }
    }

    #[test]
    fn far_out_of_range_points() {
        let mut x = Image::<bool>::new(4, 4, 1, Encoding::Plain).unwrap();
        x.line(Point::new(i32::MIN, 0), Point::new(i32::MAX, 0), true);
        assert_eq!(ascii(&x), ["####", "....", "....", "...."]);
        x.line(Point::new(1, i32::MAX), Point::new(1, i32::MIN), true);
        assert_eq!(ascii(&x), ["####", ".#..", ".#..", ".#.."]);

        let mut x = Image::<bool>::new(4, 4, 1, Encoding::Plain).unwrap();
        x.line(Point::new(i32::MIN, i32::MIN), Point::new(i32::MAX, i32::MAX), true);
        x.circle(Point::new(i32::MIN, i32::MAX), i32::MIN, true);
        x.circle(Point::new(i32::MAX, 0), i32::MAX, true);
        x.filled_rectangle(Point::new(i32::MAX, i32::MAX), i32::MAX, i32::MIN, true);
        x.sierpinski(3, Point::new(i32::MAX, i32::MIN), i32::MAX, true);
        x.sierpinski(3, Point::new(i32::MIN, 0), i32::MIN, true);
        x.filled_triangle(
            Point::new(i32::MIN, i32::MIN),
            Point::new(i32::MAX, 0),
            Point::new(0, i32::MAX),
            true,
        );
    }

    #[test]
    fn colors_above_max_are_clamped() {
        let mut x = Image::<u8>::new(2, 1, 10, Encoding::Plain).unwrap();
        x.set(0, 0, 50);
        x.line(Point::new(1, 0), Point::new(1, 0), 200);
        assert_eq!(x.buffer(), [10, 10]);
        assert_eq!(x.encode(), b"P2\n2 1\n10\n10   10   \n");
        assert_eq!(Image::<u8>::decode(x.encode()).unwrap(), x);
        let mut y = x.clone();
        y.invert();
        y.invert();
        assert_eq!(y, x);

        let mut x = Image::<Rgb>::new(4, 4, 100, Encoding::Raw).unwrap();
        x.filled_rectangle(Point::new(0, 0), 2, 2, RED);
        assert_eq!(painted(&x, [100, 0, 0]).len(), 9);
        x.filled_circle(Point::new(3, 3), 2, [0, 255, 0]);
        x.sierpinski(2, Point::new(0, 0), 4, [0, 0, 101]);
        assert!(x.buffer().iter().flatten().all(|&c| c <= 100));
        assert_eq!(Image::<Rgb>::decode(x.encode()).unwrap(), x);
    }

    #[test]
    fn rectangle() {
        let mut x = Image::<bool>::new(5, 4, 1, Encoding::Plain).unwrap();
        x.rectangle(Point::new(0, 0), 3, 2, true);
        assert_eq!(ascii(&x), ["####.", "#..#.", "####.", "....."]);
        x.filled_rectangle(Point::new(0, 0), 3, 2, true);
        assert_eq!(ascii(&x), ["####.", "####.", "####.", "....."]);
    }

    #[test]
    fn rectangle_is_clamped() {
        let mut x = Image::<bool>::new(4, 3, 1, Encoding::Plain).unwrap();
        x.rectangle(Point::new(-2, 1), 10, 1, true);
        assert_eq!(ascii(&x), ["....", "####", "####"]);
    }

    #[test]
    fn oversized_filled_rectangle() {
        let mut x = canvas(3, 3);
        x.filled_rectangle(Point::new(1, 1), 10, 10, RED);
        assert!(x.buffer().iter().all(|&p| p == RED));
    }

    #[test]
    fn span_fill_overfills() {
        let mut x = Image::<bool>::new(6, 3, 1, Encoding::Plain).unwrap();
        x.set(5, 1, true);
        x.filled_rectangle(Point::new(0, 0), 2, 2, true);
        assert_eq!(ascii(&x), ["###...", "######", "###..."]);
    }

    #[test]
    fn circle() {
        let mut x = Image::<bool>::new(7, 7, 1, Encoding::Plain).unwrap();
        x.circle(Point::new(3, 3), 3, true);
        assert_eq!(
            ascii(&x),
            [
                ".......", //
                ".#####.",
                ".#...#.",
                ".#...#.",
                ".#...#.",
                ".#####.",
                ".......",
            ]
        );
        x.filled_circle(Point::new(3, 3), 3, true);
        assert_eq!(
            ascii(&x),
            [".......", ".#####.", ".#####.", ".#####.", ".#####.", ".#####.", "......."]
        );
    }

    #[test]
    fn circle_axis_points_clip() {
        let mut x = Image::<bool>::new(3, 3, 1, Encoding::Plain).unwrap();
        x.circle(Point::new(0, 0), 4, true);
        assert!(!x.at(0, 0));
    }

    #[test]
    fn triangle() {
        let mut x = Image::<bool>::new(5, 5, 1, Encoding::Plain).unwrap();
        x.filled_triangle(Point::new(0, 0), Point::new(4, 0), Point::new(0, 4), true);
        assert_eq!(ascii(&x), ["#####", "####.", "###..", "##...", "#...."]);
    }

    #[test]
    fn polygon() {
        let mut x = canvas(4, 4);
        let square = [(0, 0), (3, 0), (3, 3), (0, 3)].map(Point::from);
        x.polygon(&square, RED);
        assert_eq!(painted(&x, RED).len(), 12);
        x.filled_polygon(&square, RED);
        assert_eq!(painted(&x, RED).len(), 16);
        x.polygon(&[], RED);
    }

    #[test]
    fn sierpinski_base_case() {
        let mut x = canvas(8, 8);
        x.sierpinski(0, Point::new(0, 0), 8, RED);
        assert_eq!(x, canvas(8, 8));
    }

    #[test]
    fn sierpinski() {
        let mut x = Image::<bool>::new(9, 8, 1, Encoding::Plain).unwrap();
        x.sierpinski(1, Point::new(0, 0), 8, true);
        let mut one = x.clone();
        let mut two = Image::<bool>::new(9, 8, 1, Encoding::Plain).unwrap();
        two.sierpinski(2, Point::new(0, 0), 8, true);
        // depth 2 only adds to depth 1
        assert!(painted(&one, true).iter().all(|&(px, py)| two.at(px, py)));
        assert!(painted(&two, true).len() > painted(&one, true).len());
        one.triangle(Point::new(0, 0), Point::new(8, 0), Point::new(4, 6), true);
        assert_eq!(one, x);
    }
}
