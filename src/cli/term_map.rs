//! Character-grid map widget: projects markers around the current view
//! centre so the filtered places can be eyeballed in a terminal.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use aasaan::map::{MapWidget, MarkerSpec};
use aasaan::models::GeoPoint;

/// Longitude span of the frame at zoom 0; halves per zoom step, matching
/// the usual web-map convention.
const WORLD_LON_SPAN: f64 = 360.0;

/// Terminal cells are roughly twice as tall as they are wide.
const CELL_ASPECT: f64 = 2.0;

struct State {
    cols: usize,
    rows: usize,
    center: GeoPoint,
    zoom: u8,
    markers: HashMap<usize, MarkerSpec>,
    next_handle: usize,
    destroyed: bool,
}

impl State {
    /// Grid cell for a point, or `None` when it falls outside the frame.
    fn project(&self, point: &GeoPoint) -> Option<(usize, usize)> {
        let lon_span = WORLD_LON_SPAN / f64::from(1u32 << self.zoom);
        let lat_span = lon_span * (self.rows as f64 * CELL_ASPECT) / self.cols as f64;

        let x = (point.lon - self.center.lon) / lon_span + 0.5;
        let y = (self.center.lat - point.lat) / lat_span + 0.5;
        if !(0.0..1.0).contains(&x) || !(0.0..1.0).contains(&y) {
            return None;
        }

        let col = ((x * self.cols as f64) as usize).min(self.cols - 1);
        let row = ((y * self.rows as f64) as usize).min(self.rows - 1);
        Some((row, col))
    }
}

/// Shared-handle widget: clones render the same surface, so the caller
/// can keep one handle while the sync engine drives the other.
#[derive(Clone)]
pub struct TerminalMap(Rc<RefCell<State>>);

impl TerminalMap {
    pub fn new(cols: usize, rows: usize) -> Self {
        Self(Rc::new(RefCell::new(State {
            cols,
            rows,
            center: GeoPoint { lat: 0.0, lon: 0.0 },
            zoom: 1,
            markers: HashMap::new(),
            next_handle: 0,
            destroyed: false,
        })))
    }

    /// Draw the current frame: header, bordered grid, legend.
    pub fn render(&self) -> String {
        let state = self.0.borrow();
        if state.destroyed {
            return String::new();
        }

        let mut grid = vec![vec![' '; state.cols]; state.rows];
        let mut visible = 0usize;
        for marker in state.markers.values() {
            if let Some((row, col)) = state.project(&marker.position) {
                grid[row][col] = glyph(marker.color);
                visible += 1;
            }
        }

        let mut out = String::new();
        out.push_str(&format!(
            "({:.4}, {:.4}) zoom {}  {} markers ({} in frame)\n",
            state.center.lat,
            state.center.lon,
            state.zoom,
            state.markers.len(),
            visible
        ));
        out.push('+');
        out.push_str(&"-".repeat(state.cols));
        out.push_str("+\n");
        for row in grid {
            out.push('|');
            out.extend(row);
            out.push_str("|\n");
        }
        out.push('+');
        out.push_str(&"-".repeat(state.cols));
        out.push_str("+\n");
        out.push_str("legend: # accessible  o partial  x not accessible  ? unknown\n");
        out
    }
}

impl MapWidget for TerminalMap {
    type Handle = usize;

    fn set_view(&mut self, center: GeoPoint, zoom: u8) {
        let mut state = self.0.borrow_mut();
        state.center = center;
        state.zoom = zoom;
    }

    fn add_marker(&mut self, spec: &MarkerSpec) -> usize {
        let mut state = self.0.borrow_mut();
        let handle = state.next_handle;
        state.next_handle += 1;
        state.markers.insert(handle, spec.clone());
        handle
    }

    fn remove_marker(&mut self, handle: usize) {
        self.0.borrow_mut().markers.remove(&handle);
    }

    fn fly_to(&mut self, center: GeoPoint, zoom: u8, _duration_secs: f64) {
        // No animation on a character grid; jump straight there.
        let mut state = self.0.borrow_mut();
        state.center = center;
        state.zoom = zoom;
    }

    fn destroy(&mut self) {
        let mut state = self.0.borrow_mut();
        state.markers.clear();
        state.destroyed = true;
    }
}

fn glyph(color: &str) -> char {
    match color {
        "#22c55e" => '#',
        "#eab308" => 'o',
        "#ef4444" => 'x',
        _ => '?',
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MUMBAI: GeoPoint = GeoPoint {
        lat: 19.0760,
        lon: 72.8777,
    };

    fn marker(id: &str, position: GeoPoint, color: &'static str) -> MarkerSpec {
        MarkerSpec {
            place_id: id.to_string(),
            position,
            color,
            title: id.to_string(),
        }
    }

    #[test]
    fn test_marker_at_the_centre_lands_mid_frame() {
        let mut map = TerminalMap::new(72, 24);
        map.set_view(MUMBAI, 12);
        map.add_marker(&marker("a", MUMBAI, "#9ca3af"));

        let rendered = map.render();
        let lines: Vec<&str> = rendered.lines().collect();
        // Header, top border, then the grid rows.
        let mid_row = lines[2 + 12];
        assert_eq!(mid_row.chars().nth(1 + 36), Some('?'));
    }

    #[test]
    fn test_markers_outside_the_frame_are_skipped() {
        let mut map = TerminalMap::new(72, 24);
        map.set_view(MUMBAI, 12);
        // Delhi is far outside a zoom-12 frame over Mumbai.
        map.add_marker(&marker("d", GeoPoint { lat: 28.6, lon: 77.2 }, "#22c55e"));

        let rendered = map.render();
        assert!(rendered.contains("1 markers (0 in frame)"));
        let lines: Vec<&str> = rendered.lines().collect();
        assert!(lines[2..26].iter().all(|row| !row.contains('#')));
    }

    #[test]
    fn test_fly_to_recenters_the_frame() {
        let mut map = TerminalMap::new(72, 24);
        map.set_view(MUMBAI, 12);
        map.fly_to(GeoPoint { lat: 19.0282, lon: 72.8387 }, 15, 0.5);

        let rendered = map.render();
        assert!(rendered.starts_with("(19.0282, 72.8387) zoom 15"));
    }

    #[test]
    fn test_destroyed_surface_renders_nothing() {
        let mut map = TerminalMap::new(72, 24);
        map.set_view(MUMBAI, 12);
        map.add_marker(&marker("a", MUMBAI, "#22c55e"));
        map.destroy();

        assert!(map.render().is_empty());
    }

    #[test]
    fn test_glyphs_follow_status_colors() {
        assert_eq!(glyph("#22c55e"), '#');
        assert_eq!(glyph("#eab308"), 'o');
        assert_eq!(glyph("#ef4444"), 'x');
        assert_eq!(glyph("#9ca3af"), '?');
        assert_eq!(glyph("anything-else"), '?');
    }
}
