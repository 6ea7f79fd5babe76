//! World map canvas with vehicle and alert positions.

use crate::constants::DEFAULT_MAP_CENTER;
use crate::models::GeoPoint;
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols,
    text::Span,
    widgets::{
        canvas::{Canvas, Map, MapResolution, Points},
        Block, BorderType, Borders,
    },
    Frame,
};

/// Degrees shown around a lone point or the default centre
const MIN_SPAN: f64 = 2.0;

#[derive(Debug, Clone, PartialEq)]
pub struct MapMarker {
    pub point: GeoPoint,
    pub color: Color,
    pub label: Option<String>,
}

/// Longitude and latitude bounds framing `points` with some padding.
///
/// Without points the view is centred on the default location.
pub fn bounds(points: &[GeoPoint]) -> ([f64; 2], [f64; 2]) {
    let (lat_center, lon_center) = DEFAULT_MAP_CENTER;
    let Some(first) = points.first() else {
        return (
            [lon_center - MIN_SPAN, lon_center + MIN_SPAN],
            [lat_center - MIN_SPAN, lat_center + MIN_SPAN],
        );
    };

    let (mut min_lon, mut max_lon) = (first.longitude, first.longitude);
    let (mut min_lat, mut max_lat) = (first.latitude, first.latitude);
    for p in points {
        min_lon = min_lon.min(p.longitude);
        max_lon = max_lon.max(p.longitude);
        min_lat = min_lat.min(p.latitude);
        max_lat = max_lat.max(p.latitude);
    }

    let pad = |min: f64, max: f64| ((max - min) * 0.1).max(MIN_SPAN / 2.0);
    let lon_pad = pad(min_lon, max_lon);
    let lat_pad = pad(min_lat, max_lat);
    (
        [(min_lon - lon_pad).max(-180.0), (max_lon + lon_pad).min(180.0)],
        [(min_lat - lat_pad).max(-90.0), (max_lat + lat_pad).min(90.0)],
    )
}

pub fn render_map(f: &mut Frame, area: Rect, title: &str, markers: &[MapMarker]) {
    let points: Vec<GeoPoint> = markers.iter().map(|m| m.point).collect();
    let (x_bounds, y_bounds) = bounds(&points);

    let canvas = Canvas::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .title(format!(" {} ", title))
                .style(Style::default().fg(Color::Gray)),
        )
        .marker(symbols::Marker::Braille)
        .x_bounds(x_bounds)
        .y_bounds(y_bounds)
        .paint(|ctx| {
            ctx.draw(&Map {
                color: Color::DarkGray,
                resolution: MapResolution::High,
            });
            ctx.layer();
            for marker in markers {
                let coords = [(marker.point.longitude, marker.point.latitude)];
                ctx.draw(&Points {
                    coords: &coords,
                    color: marker.color,
                });
                if let Some(label) = &marker.label {
                    ctx.print(
                        marker.point.longitude,
                        marker.point.latitude,
                        Span::styled(label.clone(), Style::default().fg(marker.color)),
                    );
                }
            }
        });

    f.render_widget(canvas, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_map_is_centred_on_the_default_location() {
        let ([x0, x1], [y0, y1]) = bounds(&[]);
        assert!((x0 + x1) / 2.0 - DEFAULT_MAP_CENTER.1 < 1e-9);
        assert!((y0 + y1) / 2.0 - DEFAULT_MAP_CENTER.0 < 1e-9);
    }

    #[test]
    fn bounds_contain_every_point() {
        let points = [
            GeoPoint { latitude: -6.8, longitude: 39.2 },
            GeoPoint { latitude: -3.4, longitude: 36.7 },
        ];
        let ([x0, x1], [y0, y1]) = bounds(&points);
        for p in points {
            assert!(x0 < p.longitude && p.longitude < x1);
            assert!(y0 < p.latitude && p.latitude < y1);
        }
    }
}
