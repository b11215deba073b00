//! Island layout - where each stage sits on the map.
//!
//! Positions are a pure function of the stage index, never stored.

use serde::{Deserialize, Serialize};

/// A 2-D point on the journey map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoatPosition {
    pub x: f64,
    pub y: f64,
}

/// Fixed zig-zag pattern the islands are laid out on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IslandLayout {
    /// Horizontal offset of each lane; islands cycle through the lanes.
    pub lane_offsets: Vec<f64>,
    /// Vertical distance between consecutive islands.
    pub spacing: f64,
    /// Vertical offset of the first island.
    pub top_padding: f64,
}

impl Default for IslandLayout {
    fn default() -> Self {
        Self {
            lane_offsets: vec![0.25, 0.65, 0.8, 0.4],
            spacing: 180.0,
            top_padding: 120.0,
        }
    }
}

impl IslandLayout {
    /// Position of the island at `index`.
    pub fn island_position(&self, index: usize) -> BoatPosition {
        let x = if self.lane_offsets.is_empty() {
            0.5
        } else {
            self.lane_offsets[index % self.lane_offsets.len()]
        };
        BoatPosition {
            x,
            y: self.top_padding + self.spacing * index as f64,
        }
    }

    /// Where the boat is drawn for a journey at `current_index`.
    ///
    /// `None` without stages; a finished journey docks at the last island.
    pub fn boat_position(&self, current_index: usize, stage_count: usize) -> Option<BoatPosition> {
        if stage_count == 0 {
            return None;
        }
        Some(self.island_position(current_index.min(stage_count - 1)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_layout_zig_zags_across_four_lanes() {
        let layout = IslandLayout::default();
        let xs: Vec<f64> = (0..5).map(|i| layout.island_position(i).x).collect();
        assert_eq!(xs, vec![0.25, 0.65, 0.8, 0.4, 0.25]);
        assert_eq!(layout.island_position(2).y, 120.0 + 360.0);
    }

    #[test]
    fn boat_is_absent_without_stages() {
        assert!(IslandLayout::default().boat_position(0, 0).is_none());
    }

    #[test]
    fn finished_journey_docks_at_last_island() {
        let layout = IslandLayout::default();
        assert_eq!(
            layout.boat_position(5, 5),
            Some(layout.island_position(4))
        );
    }

    #[test]
    fn empty_lanes_center_the_boat() {
        let layout = IslandLayout {
            lane_offsets: Vec::new(),
            spacing: 10.0,
            top_padding: 0.0,
        };
        assert_eq!(layout.island_position(3), BoatPosition { x: 0.5, y: 30.0 });
    }
}
