use crate::error::Result;
use crate::geometry::curve::{Curve, SplineCurve};
use crate::math::{Point2, Vector2};
use crate::operations::query::PointAtArcLength;
use crate::solver::CycleOutput;
use crate::tessellation::{sample, TessellateCorridor, TessellationParams};

/// Outline of the marker car, nose along +X, in model units.
pub const CAR_MODEL: [(f64, f64); 3] = [(2.0, 0.0), (0.0, -1.0), (0.0, 1.0)];

/// An RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const GRASS: Self = Self::rgb(0, 55, 0);
    pub const ASPHALT: Self = Self::rgb(128, 128, 128);
    pub const PATH: Self = Self::rgb(255, 255, 255);
    pub const RACING_LINE: Self = Self::rgb(0, 0, 255);
    pub const NODE: Self = Self::rgb(255, 0, 0);
    pub const CAR: Self = Self::rgb(0, 0, 0);

    /// Creates a color from its channels.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// A primitive draw request for the host renderer.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Fill the whole frame.
    Clear(Color),
    /// Fill a convex polygon.
    FillPolygon { points: Vec<Point2>, color: Color },
    /// Stroke a line segment.
    Line { from: Point2, to: Point2, color: Color },
    /// Plot a single point.
    Point { at: Point2, color: Color },
}

/// Consumer of draw requests: a window, an image, or a recording.
pub trait RenderSink {
    /// Draws one primitive.
    fn draw(&mut self, command: &DrawCommand);
}

impl RenderSink for Vec<DrawCommand> {
    fn draw(&mut self, command: &DrawCommand) {
        self.push(command.clone());
    }
}

/// Sampling and sizing used by [`compose_frame`].
#[derive(Debug, Clone, Copy)]
pub struct FrameStyle {
    /// Parameter step for plotting the path and racing line.
    pub curve_step: f64,
    /// Corridor fill density.
    pub corridor: TessellationParams,
    /// Half the side of the square drawn at each control point.
    pub node_half_size: f64,
    /// Scale applied to [`CAR_MODEL`].
    pub car_scale: f64,
}

impl Default for FrameStyle {
    fn default() -> Self {
        Self {
            curve_step: 0.005,
            corridor: TessellationParams::default(),
            node_half_size: 1.0,
            car_scale: 3.0,
        }
    }
}

/// Builds the draw list for one frame: grass, track corridor, reference
/// path, racing line, control points, then the car at `marker_distance`
/// along the racing line.
///
/// # Errors
///
/// Returns an error if sampling or the marker lookup fails (for example a
/// non-positive `curve_step`).
pub fn compose_frame(
    reference: &SplineCurve,
    output: &CycleOutput,
    marker_distance: f64,
    style: &FrameStyle,
) -> Result<Vec<DrawCommand>> {
    let mut commands = vec![DrawCommand::Clear(Color::GRASS)];

    let corridor =
        TessellateCorridor::new(&output.left_boundary, &output.right_boundary, style.corridor)
            .execute()?;
    commands.extend(corridor.triangles().map(|tri| DrawCommand::FillPolygon {
        points: tri.to_vec(),
        color: Color::ASPHALT,
    }));

    for (curve, color) in [(reference, Color::PATH), (&output.racing_line, Color::RACING_LINE)] {
        let end = curve.domain().t_max;
        commands.extend(
            sample(curve, 0.0, end, style.curve_step)?.map(|at| DrawCommand::Point { at, color }),
        );
    }

    let h = style.node_half_size;
    commands.extend(reference.points().iter().map(|cp| DrawCommand::FillPolygon {
        points: vec![
            Point2::new(cp.x - h, cp.y - h),
            Point2::new(cp.x + h, cp.y - h),
            Point2::new(cp.x + h, cp.y + h),
            Point2::new(cp.x - h, cp.y + h),
        ],
        color: Color::NODE,
    }));

    let car = PointAtArcLength::new(marker_distance).execute(&output.racing_line)?;
    commands.extend(
        car_wireframe(car.point, car.heading(), style.car_scale)
            .into_iter()
            .map(|(from, to)| DrawCommand::Line {
                from,
                to,
                color: Color::CAR,
            }),
    );

    Ok(commands)
}

/// Edges of [`CAR_MODEL`] rotated by `heading`, scaled and moved to
/// `position`.
#[must_use]
pub fn car_wireframe(position: Point2, heading: f64, scale: f64) -> Vec<(Point2, Point2)> {
    let (sin, cos) = heading.sin_cos();
    let place = |(x, y): (f64, f64)| {
        let (x, y) = (x * scale, y * scale);
        position + Vector2::new(cos * x - sin * y, sin * x + cos * y)
    };
    let n = CAR_MODEL.len();
    (0..n)
        .map(|i| (place(CAR_MODEL[i]), place(CAR_MODEL[(i + 1) % n])))
        .collect()
}

/// Sends every command to `sink` in order.
pub fn render_frame<S: RenderSink + ?Sized>(sink: &mut S, commands: &[DrawCommand]) {
    for command in commands {
        sink.draw(command);
    }
}
