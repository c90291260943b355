//! Viewport of the world map used to pick the collection point's position.

use ecoleta_core::model::GeoPoint;
use ratatui::layout::Rect;

pub(crate) const MIN_ZOOM: u8 = 0;
pub(crate) const MAX_ZOOM: u8 = 18;

/// Fraction of the visible span one pan step moves.
const PAN_STEPS: f64 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Pan {
    North,
    South,
    West,
    East,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct MapView {
    /// Centre chosen by panning; `None` follows the device position.
    center: Option<GeoPoint>,
    zoom: u8,
}

impl MapView {
    pub(crate) fn new(zoom: u8) -> Self {
        Self {
            center: None,
            zoom: zoom.clamp(MIN_ZOOM, MAX_ZOOM),
        }
    }

    pub(crate) fn zoom(&self) -> u8 {
        self.zoom
    }

    pub(crate) fn center(&self, default_center: GeoPoint) -> GeoPoint {
        self.center.unwrap_or(default_center)
    }

    pub(crate) fn zoom_in(&mut self) {
        self.zoom = self.zoom.saturating_add(1).min(MAX_ZOOM);
    }

    pub(crate) fn zoom_out(&mut self) {
        self.zoom = self.zoom.saturating_sub(1).max(MIN_ZOOM);
    }

    /// Follow the device position again.
    pub(crate) fn recenter(&mut self) {
        self.center = None;
    }

    pub(crate) fn pan(&mut self, direction: Pan, default_center: GeoPoint) {
        let (lon_span, lat_span) = self.spans();
        let current = self.center(default_center);
        let (dlat, dlon) = match direction {
            Pan::North => (lat_span / PAN_STEPS, 0.0),
            Pan::South => (-lat_span / PAN_STEPS, 0.0),
            Pan::West => (0.0, -lon_span / PAN_STEPS),
            Pan::East => (0.0, lon_span / PAN_STEPS),
        };
        self.center = Some(normalize(GeoPoint::new(
            current.latitude + dlat,
            current.longitude + dlon,
        )));
    }

    /// Longitude and latitude extent of the viewport in degrees.
    pub(crate) fn spans(&self) -> (f64, f64) {
        let scale = f64::from(1_u32 << self.zoom);
        (360.0 / scale, 180.0 / scale)
    }

    /// `(x_bounds, y_bounds)` for a canvas: longitude then latitude.
    pub(crate) fn bounds(&self, default_center: GeoPoint) -> ([f64; 2], [f64; 2]) {
        let center = self.center(default_center);
        let (lon_span, lat_span) = self.spans();
        (
            [
                center.longitude - lon_span / 2.0,
                center.longitude + lon_span / 2.0,
            ],
            [
                center.latitude - lat_span / 2.0,
                center.latitude + lat_span / 2.0,
            ],
        )
    }

    /// Geographic point under a terminal cell, if the cell lies inside `canvas`.
    ///
    /// `canvas` is the drawable area, i.e. without the surrounding border.
    pub(crate) fn point_at(
        &self,
        canvas: Rect,
        column: u16,
        row: u16,
        default_center: GeoPoint,
    ) -> Option<GeoPoint> {
        if canvas.width == 0
            || canvas.height == 0
            || column < canvas.x
            || row < canvas.y
            || column >= canvas.x + canvas.width
            || row >= canvas.y + canvas.height
        {
            return None;
        }

        let ([west, east], [south, north]) = self.bounds(default_center);
        let x_ratio = (f64::from(column - canvas.x) + 0.5) / f64::from(canvas.width);
        let y_ratio = (f64::from(row - canvas.y) + 0.5) / f64::from(canvas.height);

        Some(normalize(GeoPoint::new(
            north - y_ratio * (north - south),
            west + x_ratio * (east - west),
        )))
    }
}

/// Clamp latitude to the poles and wrap longitude into `[-180, 180)`.
fn normalize(point: GeoPoint) -> GeoPoint {
    let latitude = point.latitude.clamp(-90.0, 90.0);
    let longitude = (point.longitude + 180.0).rem_euclid(360.0) - 180.0;
    GeoPoint::new(latitude, longitude)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAO_PAULO: GeoPoint = GeoPoint::new(-23.5, -46.6);

    fn close(left: GeoPoint, right: GeoPoint) -> bool {
        (left.latitude - right.latitude).abs() < 1e-9
            && (left.longitude - right.longitude).abs() < 1e-9
    }

    #[test]
    fn zoom_is_clamped() {
        let mut view = MapView::new(40);
        assert_eq!(view.zoom(), MAX_ZOOM);
        view.zoom_in();
        assert_eq!(view.zoom(), MAX_ZOOM);

        let mut view = MapView::new(0);
        view.zoom_out();
        assert_eq!(view.zoom(), MIN_ZOOM);
    }

    #[test]
    fn bounds_are_centred_on_the_default_until_panned() {
        let view = MapView::new(1);
        let ([west, east], [south, north]) = view.bounds(SAO_PAULO);

        assert!(close(
            GeoPoint::new(f64::midpoint(south, north), f64::midpoint(west, east)),
            SAO_PAULO
        ));
        assert!(((east - west) - 180.0).abs() < 1e-9);
        assert!(((north - south) - 90.0).abs() < 1e-9);
    }

    #[test]
    fn panning_detaches_from_the_default_and_recenter_restores_it() {
        let mut view = MapView::new(4);
        view.pan(Pan::North, SAO_PAULO);
        let panned = view.center(SAO_PAULO);
        assert!(panned.latitude > SAO_PAULO.latitude);
        assert!(close(view.center(GeoPoint::default()), panned));

        view.recenter();
        assert!(close(view.center(SAO_PAULO), SAO_PAULO));
    }

    #[test]
    fn middle_cell_maps_to_the_centre() {
        let view = MapView::new(3);
        let canvas = Rect::new(10, 5, 41, 21);

        let point = view
            .point_at(canvas, 30, 15, SAO_PAULO)
            .expect("inside the canvas");

        assert!(close(point, SAO_PAULO), "got {point:?}");
    }

    #[test]
    fn top_left_cell_is_north_west() {
        let view = MapView::new(2);
        let canvas = Rect::new(0, 0, 20, 10);

        let point = view
            .point_at(canvas, 0, 0, SAO_PAULO)
            .expect("inside the canvas");

        assert!(point.latitude > SAO_PAULO.latitude);
        assert!(point.longitude < SAO_PAULO.longitude);
    }

    #[test]
    fn cells_outside_the_canvas_are_ignored() {
        let view = MapView::new(2);
        let canvas = Rect::new(5, 5, 10, 10);

        assert_eq!(view.point_at(canvas, 4, 6, SAO_PAULO), None);
        assert_eq!(view.point_at(canvas, 15, 6, SAO_PAULO), None);
        assert_eq!(view.point_at(canvas, 6, 15, SAO_PAULO), None);
    }

    #[test]
    fn longitude_wraps_across_the_antimeridian() {
        let wrapped = normalize(GeoPoint::new(95.0, 190.0));
        assert!(close(wrapped, GeoPoint::new(90.0, -170.0)));
    }
}
