//! Histogram bar layout.
//!
//! Turns histogram bins into a list of drawing commands for a fixed-size
//! surface. The commands are executed by a thin adapter (a canvas in the
//! browser, a text chart in the terminal), so the normalization here can be
//! tested without any drawing backend.

/// A single drawing operation on a 2D surface with the origin at the top left.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Clear the given rectangle to transparent.
    Clear {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    /// Fill the given rectangle with a solid color.
    FillRect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        color: String,
    },
}

/// Normalized bar height for a bin; non-finite or negative values draw nothing.
fn bar_height(value: f64, max_value: f64, surface_height: f64) -> f64 {
    if !value.is_finite() || value <= 0.0 || max_value <= 0.0 {
        return 0.0;
    }
    value / max_value * surface_height
}

/// Lay out one bottom-anchored bar per bin, left to right, scaled so the
/// largest bin fills the full surface height.
///
/// The first command always clears the whole surface. An empty histogram
/// yields only the clear; an all-zero histogram yields zero-height bars.
pub fn layout_histogram(bins: &[f64], width: f64, height: f64, color: &str) -> Vec<DrawCommand> {
    let mut commands = Vec::with_capacity(bins.len() + 1);
    commands.push(DrawCommand::Clear {
        x: 0.0,
        y: 0.0,
        width,
        height,
    });

    if bins.is_empty() {
        return commands;
    }

    let max_value = bins
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(0.0_f64, f64::max);

    let bin_width = width / bins.len() as f64;

    for (i, &value) in bins.iter().enumerate() {
        let bar = bar_height(value, max_value, height);
        commands.push(DrawCommand::FillRect {
            x: i as f64 * bin_width,
            y: height - bar,
            width: bin_width,
            height: bar,
            color: color.to_string(),
        });
    }

    commands
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn bars(commands: &[DrawCommand]) -> Vec<(f64, f64, f64, f64)> {
        commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::FillRect {
                    x,
                    y,
                    width,
                    height,
                    ..
                } => Some((*x, *y, *width, *height)),
                DrawCommand::Clear { .. } => None,
            })
            .collect()
    }

    #[test]
    fn test_tallest_bin_fills_surface() {
        let commands = layout_histogram(&[10.0, 20.0, 5.0], 600.0, 400.0, "blue");
        assert_eq!(
            commands[0],
            DrawCommand::Clear {
                x: 0.0,
                y: 0.0,
                width: 600.0,
                height: 400.0
            }
        );

        let bars = bars(&commands);
        assert_eq!(bars.len(), 3);

        let expected_heights = [200.0, 400.0, 100.0];
        for (i, (x, y, w, h)) in bars.iter().enumerate() {
            assert_relative_eq!(*w, 200.0);
            assert_relative_eq!(*x, i as f64 * 200.0);
            assert_relative_eq!(*h, expected_heights[i]);
            assert_relative_eq!(*y + *h, 400.0);
        }
    }

    #[test]
    fn test_all_zero_bins_draw_empty_bars() {
        let commands = layout_histogram(&[0.0, 0.0, 0.0], 600.0, 400.0, "blue");
        let bars = bars(&commands);
        assert_eq!(bars.len(), 3);
        for (x, y, w, h) in bars {
            assert!(x.is_finite() && y.is_finite() && w.is_finite());
            assert_eq!(h, 0.0);
            assert_eq!(y, 400.0);
        }
    }

    #[test]
    fn test_empty_histogram_only_clears() {
        let commands = layout_histogram(&[], 600.0, 400.0, "blue");
        assert_eq!(commands.len(), 1);
        assert!(matches!(commands[0], DrawCommand::Clear { .. }));
    }

    #[test]
    fn test_negative_and_nan_bins_are_flat() {
        let commands = layout_histogram(&[-5.0, f64::NAN, 8.0, f64::INFINITY], 400.0, 100.0, "red");
        let heights: Vec<f64> = bars(&commands).iter().map(|b| b.3).collect();
        assert_eq!(heights, vec![0.0, 0.0, 100.0, 0.0]);
    }

    #[test]
    fn test_bars_use_given_color() {
        let commands = layout_histogram(&[1.0, 2.0], 10.0, 10.0, "#00aa00");
        for command in &commands[1..] {
            match command {
                DrawCommand::FillRect { color, .. } => assert_eq!(color, "#00aa00"),
                other => panic!("unexpected command {other:?}"),
            }
        }
    }
}
