//! Raster rendering of a laid-out hall.
//!
//! One pixel is one centimetre. Draw order: podium, percussion, hidden
//! areas, guide arcs, shrunk stage outline, seats, legend text, scale bar.
//! Legend text uses the bundled DejaVu Sans (`assets/`).

use std::path::Path;

use anyhow::{Context, Result};
use image::{Rgba, RgbaImage};
use rusttype::{point as glyph_point, Font, Scale};
use seatplan::api::{
    legend_lines, ArcAngles, Category, Circle, Hall, Layout, Point, Polygon, PODIUM,
};
use seatplan::geom::{distance, point};

const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);
const PERCUSSION: Rgba<u8> = Rgba([240, 240, 240, 255]);
const HIDDEN: Rgba<u8> = Rgba([160, 160, 160, 255]);
const GUIDE: Rgba<u8> = Rgba([230, 200, 0, 255]);
const STAGE: Rgba<u8> = Rgba([120, 170, 220, 255]);

/// Scale bar offset from the legend anchor; the bar is one metre long.
const SCALE_OFFSET: f64 = 120.0;
const SCALE_LENGTH: f64 = 100.0;

static LEGEND_FONT: &[u8] = include_bytes!("../assets/DejaVuSans.ttf");
const LEGEND_PX: f32 = 20.0;
const LEGEND_LINE_HEIGHT: f64 = 22.0;

fn category_color(category: Category) -> Rgba<u8> {
    let rgb = match category {
        Category::Seat | Category::Reserved => [0, 0, 0],
        Category::BassClarinet => [90, 60, 150],
        Category::Bassoon => [140, 80, 40],
        Category::Clarinet => [60, 90, 200],
        Category::Euphonium => [200, 140, 0],
        Category::Flute => [120, 200, 220],
        Category::Horn => [230, 120, 30],
        Category::Oboe => [110, 160, 60],
        Category::Piccolo => [180, 220, 240],
        Category::Trombone => [200, 60, 60],
        Category::Saxophone => [220, 180, 60],
        Category::Trumpet => [240, 210, 0],
        Category::Tuba => [150, 30, 30],
        Category::Timpani => [100, 100, 100],
    };
    Rgba([rgb[0], rgb[1], rgb[2], 255])
}

struct Canvas {
    img: RgbaImage,
}

impl Canvas {
    fn new(width: u32, height: u32) -> Self {
        Self {
            img: RgbaImage::from_pixel(width.max(1), height.max(1), WHITE),
        }
    }

    fn put(&mut self, x: i64, y: i64, color: Rgba<u8>) {
        self.blend(x, y, color, 1.0);
    }

    /// Mix `color` over the pixel with weight `alpha` in `[0, 1]`.
    fn blend(&mut self, x: i64, y: i64, color: Rgba<u8>, alpha: f32) {
        let (w, h) = self.img.dimensions();
        if x < 0 || y < 0 || x as u32 >= w || y as u32 >= h {
            return;
        }
        let alpha = alpha.clamp(0.0, 1.0);
        let under = self.img.get_pixel_mut(x as u32, y as u32);
        for (dst, src) in under.0.iter_mut().zip(color.0).take(3) {
            *dst = (f32::from(*dst) * (1.0 - alpha) + f32::from(src) * alpha).round() as u8;
        }
        under.0[3] = 255;
    }

    /// One line of text with its top-left corner at `at`.
    fn text(&mut self, font: &Font<'_>, at: Point, line: &str, color: Rgba<u8>) {
        let scale = Scale::uniform(LEGEND_PX);
        let ascent = font.v_metrics(scale).ascent;
        let origin = glyph_point(at.x as f32, at.y as f32 + ascent);
        for glyph in font.layout(line, scale, origin) {
            let Some(bb) = glyph.pixel_bounding_box() else {
                continue;
            };
            glyph.draw(|gx, gy, coverage| {
                self.blend(
                    i64::from(bb.min.x) + i64::from(gx),
                    i64::from(bb.min.y) + i64::from(gy),
                    color,
                    coverage,
                );
            });
        }
    }

    /// Pixels whose centre lies within `[inner, outer]` of `center`.
    fn annulus(&mut self, center: Point, inner: f64, outer: f64, color: Rgba<u8>) {
        let x0 = (center.x - outer).floor() as i64;
        let x1 = (center.x + outer).ceil() as i64;
        let y0 = (center.y - outer).floor() as i64;
        let y1 = (center.y + outer).ceil() as i64;
        for y in y0..=y1 {
            for x in x0..=x1 {
                let d = distance(center, point(x as f64 + 0.5, y as f64 + 0.5));
                if d >= inner && d <= outer {
                    self.put(x, y, color);
                }
            }
        }
    }

    fn disk(&mut self, center: Point, radius: f64, color: Rgba<u8>) {
        self.annulus(center, 0.0, radius.max(0.5), color);
    }

    fn ring(&mut self, center: Point, radius: f64, width: f64, color: Rgba<u8>) {
        let half = width / 2.0;
        self.annulus(center, (radius - half).max(0.0), radius + half, color);
    }

    fn line(&mut self, a: Point, b: Point, width: f64, color: Rgba<u8>) {
        let steps = (distance(a, b) / 0.5).ceil().max(1.0) as usize;
        for i in 0..=steps {
            let t = i as f64 / steps as f64;
            self.disk(a + (b - a) * t, width / 2.0, color);
        }
    }

    fn polyline(&mut self, points: &[Point], width: f64, color: Rgba<u8>) {
        for pair in points.windows(2) {
            self.line(pair[0], pair[1], width, color);
        }
    }

    fn stroke_polygon(&mut self, poly: &Polygon, width: f64, color: Rgba<u8>) {
        for (a, b) in poly.edges() {
            self.line(a, b, width, color);
        }
    }

    /// Even-odd scanline fill sampled at pixel centres.
    fn fill_polygon(&mut self, poly: &Polygon, color: Rgba<u8>) {
        let Some((min, max)) = poly.bounding_box() else {
            return;
        };
        let (w, h) = self.img.dimensions();
        let y0 = min.y.floor().max(0.0) as u32;
        let y1 = (max.y.ceil().max(0.0) as u32).min(h);
        for y in y0..y1 {
            let sy = y as f64 + 0.5;
            let mut xs: Vec<f64> = poly
                .edges()
                .filter(|(a, b)| (a.y <= sy) != (b.y <= sy))
                .map(|(a, b)| a.x + (sy - a.y) * (b.x - a.x) / (b.y - a.y))
                .collect();
            xs.sort_by(|a, b| a.total_cmp(b));
            for span in xs.chunks_exact(2) {
                let from = (span[0] - 0.5).ceil().max(0.0) as u32;
                let to = ((span[1] - 0.5).floor() + 1.0).clamp(0.0, w as f64) as u32;
                for x in from..to {
                    self.img.put_pixel(x, y, color);
                }
            }
        }
    }

    fn arc(&mut self, circle: &Circle, arc: &ArcAngles, width: f64, color: Rgba<u8>) {
        // about two pixels per step
        let step = (2.0 / circle.radius.max(1.0)).to_degrees().min(1.0);
        let steps = (arc.span() / step).ceil().max(1.0) as usize;
        let points: Vec<Point> = (0..=steps)
            .map(|i| circle.point_at(arc.start + arc.span() * i as f64 / steps as f64))
            .collect();
        self.polyline(&points, width, color);
    }
}

/// Draw `layout` on a canvas the size of the stage extents.
pub fn draw(hall: &Hall, layout: &Layout) -> RgbaImage {
    let mut canvas = Canvas::new(
        hall.stage_extents.length.ceil() as u32,
        hall.stage_extents.width.ceil() as u32,
    );

    let podium_center = hall.center - point(0.0, PODIUM.width / 2.0);
    let (top_left, bottom_right) = PODIUM.corners_around(podium_center);
    let podium = Polygon::new(vec![
        top_left,
        point(bottom_right.x, top_left.y),
        bottom_right,
        point(top_left.x, bottom_right.y),
    ]);
    canvas.stroke_polygon(&podium, 2.0, BLACK);

    for area in &hall.percussion {
        let outline = area.outline();
        canvas.fill_polygon(&outline, PERCUSSION);
        canvas.stroke_polygon(&outline, 2.0, BLACK);
    }
    for area in &hall.hidden {
        canvas.fill_polygon(&area.outline(), HIDDEN);
    }

    for band in &layout.bands {
        for row in &band.rows {
            let circle = row.circle();
            for arc in &row.arcs {
                canvas.arc(&circle, arc, 2.0, GUIDE);
            }
        }
    }
    canvas.stroke_polygon(&layout.seating_stage, 1.0, STAGE);

    for seat in layout.seats() {
        match seat.category {
            Category::Seat => canvas.ring(seat.position, hall.seat_radius, 2.0, BLACK),
            Category::Reserved => {
                canvas.ring(seat.position, hall.seat_radius, 2.0, BLACK);
                let d = hall.seat_radius / std::f64::consts::SQRT_2;
                canvas.line(
                    seat.position + point(-d, -d),
                    seat.position + point(d, d),
                    2.0,
                    BLACK,
                );
                canvas.line(
                    seat.position + point(-d, d),
                    seat.position + point(d, -d),
                    2.0,
                    BLACK,
                );
            }
            other => {
                canvas.disk(seat.position, hall.seat_radius, category_color(other));
                canvas.ring(seat.position, hall.seat_radius, 2.0, BLACK);
            }
        }
    }

    match Font::try_from_bytes(LEGEND_FONT) {
        Some(font) => {
            for (k, line) in legend_lines(layout).iter().enumerate() {
                let at = hall.legend + point(0.0, LEGEND_LINE_HEIGHT * k as f64);
                canvas.text(&font, at, line, BLACK);
            }
        }
        None => tracing::warn!("legend font unreadable, legend text skipped"),
    }

    let bar = hall.legend + point(0.0, SCALE_OFFSET);
    canvas.line(bar, bar + point(SCALE_LENGTH, 0.0), 3.0, BLACK);
    for x in [0.0, SCALE_LENGTH] {
        canvas.line(bar + point(x, -8.0), bar + point(x, 8.0), 2.0, BLACK);
    }

    canvas.img
}

/// Write `img` as PNG, creating the parent directory.
pub fn save(img: &RgbaImage, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating output dir {}", parent.display()))?;
        }
    }
    img.save(path)
        .with_context(|| format!("writing {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use seatplan::api::{layout_hall, Area, Dimension};
    use seatplan::prelude::{BandSpec, RowSpec};
    use tempfile::tempdir;

    fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Polygon {
        Polygon::new(vec![
            point(x0, y0),
            point(x1, y0),
            point(x1, y1),
            point(x0, y1),
        ])
    }

    fn hall(bands: Vec<BandSpec>) -> Hall {
        let extents = Dimension::new(1580.0, 960.0);
        Hall {
            name: "Aula".into(),
            stage_extents: extents,
            stage: Polygon::rectangle(extents),
            bands,
            row_distancing: 150.0,
            first_band_offset: 250.0,
            center: point(790.0, 960.0),
            distancing: 150.0,
            seat_radius: 25.0,
            percussion: vec![Area::Polygon(rect(1300.0, 20.0, 1500.0, 200.0))],
            hidden: vec![Area::Polygon(rect(100.0, 300.0, 300.0, 400.0))],
            legend: point(10.0, 10.0),
        }
    }

    fn pixel(img: &RgbaImage, p: Point) -> Rgba<u8> {
        *img.get_pixel(p.x.floor() as u32, p.y.floor() as u32)
    }

    #[test]
    fn canvas_matches_stage_extents() {
        let h = hall(vec![BandSpec::Default]);
        let img = draw(&h, &layout_hall(&h).unwrap());
        assert_eq!(img.dimensions(), (1580, 960));
        assert_eq!(pixel(&img, point(5.0, 900.0)), WHITE);
    }

    #[test]
    fn areas_are_filled() {
        let h = hall(vec![BandSpec::Default]);
        let img = draw(&h, &layout_hall(&h).unwrap());
        assert_eq!(pixel(&img, point(1400.0, 110.0)), PERCUSSION);
        assert_eq!(pixel(&img, point(1300.5, 110.0)), BLACK);
        assert_eq!(pixel(&img, point(200.0, 350.0)), HIDDEN);
    }

    #[test]
    fn plain_seats_are_rings() {
        let h = hall(vec![BandSpec::Default]);
        let layout = layout_hall(&h).unwrap();
        assert!(layout.seat_count() > 0);
        let img = draw(&h, &layout);
        for seat in layout.seats() {
            assert_eq!(pixel(&img, seat.position + point(h.seat_radius, 0.0)), BLACK);
        }
    }

    #[test]
    fn instrument_seats_are_filled() {
        let row = RowSpec {
            angles: Some(vec![ArcAngles::new(240.0, 300.0)]),
            seats: Some(vec![Some(vec![Category::Tuba, Category::Reserved])]),
            radius: None,
            center: None,
        };
        let h = hall(vec![BandSpec::Rows(vec![row])]);
        let layout = layout_hall(&h).unwrap();
        let img = draw(&h, &layout);
        let tuba = layout
            .seats()
            .iter()
            .find(|s| s.category == Category::Tuba)
            .unwrap();
        assert_eq!(
            pixel(&img, tuba.position + point(0.0, 10.0)),
            category_color(Category::Tuba)
        );
        let reserved = layout
            .seats()
            .iter()
            .find(|s| s.category == Category::Reserved)
            .unwrap();
        assert_eq!(pixel(&img, reserved.position), BLACK);
    }

    #[test]
    fn scale_bar_is_one_metre() {
        let h = hall(vec![BandSpec::Default]);
        let img = draw(&h, &layout_hall(&h).unwrap());
        let bar = h.legend + point(0.0, SCALE_OFFSET);
        assert_eq!(pixel(&img, bar + point(50.0, 0.0)), BLACK);
        assert_eq!(pixel(&img, bar + point(SCALE_LENGTH + 10.0, 0.0)), WHITE);
    }

    #[test]
    fn legend_text_is_drawn_above_scale_bar() {
        let h = hall(vec![BandSpec::Default]);
        let layout = layout_hall(&h).unwrap();
        let img = draw(&h, &layout);
        let inked = |x0: u32, y0: u32, x1: u32, y1: u32| {
            (y0..y1)
                .flat_map(|y| (x0..x1).map(move |x| (x, y)))
                .filter(|&(x, y)| img.get_pixel(x, y).0[..3].iter().all(|&c| c < 128))
                .count()
        };
        let (lx, ly) = (h.legend.x as u32, h.legend.y as u32);
        // every legend line leaves ink in its own band
        for k in 0..legend_lines(&layout).len() as u32 {
            let top = ly + k * LEGEND_LINE_HEIGHT as u32;
            assert!(inked(lx, top, lx + 300, top + 22) > 20, "line {k} is blank");
        }
        // nothing to the right of the text block
        assert_eq!(inked(lx + 400, ly, lx + 600, ly + 100), 0);
    }

    #[test]
    fn save_writes_png() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("Aula.png");
        let h = hall(vec![BandSpec::Default]);
        save(&draw(&h, &layout_hall(&h).unwrap()), &path).unwrap();
        let back = image::open(&path).unwrap();
        assert_eq!((back.width(), back.height()), (1580, 960));
    }
}
