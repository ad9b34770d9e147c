// THEORY:
// The overlay draws the chosen cut pattern for a human to look at. It replays
// the exact ray walk the optimizer scored (same angles, same flooring, same
// repeat skipping, same inclusive edge) but never stops at background: the line
// runs to the image border. The center itself is painted too.
//
// Output goes to an `OverlaySink`, which lets the caller decide what a "mark" is.
// `RgbImage` is the usual sink; marks on the edge column/row that has no backing
// pixel are dropped there.

use image::RgbImage;

use crate::core_modules::cut_optimizer::{GeometrySolution, validate_cuts};
use crate::core_modules::pixel::pixel::Pixel;
use crate::core_modules::ray::{Point, Ray, RayStep, RayVisitor, ray_angles};
use crate::error::CutError;

/// Something cut lines can be drawn on.
pub trait OverlaySink {
    fn mark(&mut self, point: Point, color: Pixel);
}

impl OverlaySink for RgbImage {
    fn mark(&mut self, point: Point, color: Pixel) {
        let (Ok(x), Ok(y)) = (u32::try_from(point.x), u32::try_from(point.y)) else {
            return;
        };
        if x < self.width() && y < self.height() {
            self.put_pixel(x, y, color.into());
        }
    }
}

/// Records every mark in order.
impl OverlaySink for Vec<Point> {
    fn mark(&mut self, point: Point, _color: Pixel) {
        self.push(point);
    }
}

struct Painter<'a, S: ?Sized> {
    sink: &'a mut S,
    color: Pixel,
}

impl<S> RayVisitor for Painter<'_, S>
where
    S: OverlaySink + ?Sized,
{
    fn visit(&mut self, point: Point) -> RayStep {
        self.sink.mark(point, self.color);
        RayStep::Continue
    }
}

/// Paints the cut pattern for `cuts` cuts rotated by `angle_offset` degrees.
///
/// Nothing is drawn when `cuts` is rejected.
#[allow(clippy::too_many_arguments)]
pub fn render_cut_overlay<S>(
    width: u32,
    height: u32,
    cuts: u32,
    angle_offset: u32,
    centroid: Point,
    radius: u32,
    color: Pixel,
    sink: &mut S,
) -> Result<(), CutError>
where
    S: OverlaySink + ?Sized,
{
    validate_cuts(cuts)?;
    let mut painter = Painter { sink, color };
    for angle in ray_angles(angle_offset, cuts) {
        Ray::new(centroid, angle, radius).walk(width, height, true, &mut painter);
    }
    Ok(())
}

/// Draws solutions with a fixed marker color.
#[derive(Debug, Clone, Copy)]
pub struct CutOverlayRenderer {
    marker: Pixel,
}

impl CutOverlayRenderer {
    pub fn new(marker: Pixel) -> Self {
        Self { marker }
    }

    pub fn render<S>(
        &self,
        width: u32,
        height: u32,
        solution: &GeometrySolution,
        sink: &mut S,
    ) -> Result<(), CutError>
    where
        S: OverlaySink + ?Sized,
    {
        render_cut_overlay(
            width,
            height,
            solution.cuts,
            solution.angle_offset,
            solution.centroid,
            solution.radius,
            self.marker,
            sink,
        )
    }
}
