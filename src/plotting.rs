use textplots::{Chart, Plot};

use crate::types::WaveformResult;

/// Determine the best scale and SI prefix for a given maximum value
fn determine_scale(max_value: f64) -> (f64, &'static str) {
    if max_value >= 1.0 {
        (1.0, "")
    } else if max_value >= 1e-3 {
        (1e3, "m")
    } else if max_value >= 1e-6 {
        (1e6, "μ")
    } else if max_value >= 1e-9 {
        (1e9, "n")
    } else {
        (1e12, "p")
    }
}

fn extent(values: &[f64]) -> (f64, f64) {
    let min = values.iter().fold(f64::INFINITY, |a, &b| a.min(b));
    let max = values.iter().fold(f64::NEG_INFINITY, |a, &b| a.max(b));
    (min, max)
}

/// Plot a captured waveform in the terminal, voltage against time.
///
/// Both axes are rescaled to a fitting SI prefix (ms, μs, mV ...).
///
/// # Arguments
/// * `waveform` - The decoded capture
/// * `title` - Optional title for the plot
/// * `width` - Optional plot width (default: 140)
/// * `height` - Optional plot height (default: 60)
///
/// # Examples
/// ```
/// use rigol_scope::{plot_waveform, WaveformResult};
///
/// let waveform = WaveformResult {
///     time: vec![0.0, 1e-3, 2e-3, 3e-3],
///     voltage: vec![0.0, 3.0, 0.0, 3.0],
/// };
/// plot_waveform(&waveform, Some("CH1"), None, None).unwrap();
/// ```
pub fn plot_waveform(
    waveform: &WaveformResult,
    title: Option<&str>,
    width: Option<usize>,
    height: Option<usize>,
) -> Result<(), Box<dyn std::error::Error>> {
    if waveform.is_empty() {
        return Err("Cannot plot empty waveform".into());
    }
    if waveform.time.len() != waveform.voltage.len() {
        return Err("Time and voltage series differ in length".into());
    }

    let width = width.unwrap_or(140);
    let height = height.unwrap_or(60);

    let (v_min, v_max) = extent(&waveform.voltage);
    let (t_min, t_max) = extent(&waveform.time);
    let (v_scale, v_unit) = determine_scale(v_max.abs().max(v_min.abs()));
    let (t_scale, t_unit) = determine_scale(t_max.abs().max(t_min.abs()));

    let frame: Vec<(f32, f32)> = waveform
        .time
        .iter()
        .zip(&waveform.voltage)
        .map(|(&t, &v)| ((t * t_scale) as f32, (v * v_scale) as f32))
        .collect();

    // textplots needs a non-empty x range
    let x_min = (t_min * t_scale) as f32;
    let mut x_max = (t_max * t_scale) as f32;
    if x_max <= x_min {
        x_max = x_min + 1.0;
    }

    println!("{}", title.unwrap_or("Waveform"));
    println!("X-axis: Time [{}s] | Y-axis: Voltage [{}V]", t_unit, v_unit);
    println!(
        "Range: {} samples | Voltage: {:.3} to {:.3} {}V",
        waveform.len(),
        v_min * v_scale,
        v_max * v_scale,
        v_unit
    );
    println!("{}", "─".repeat(width));

    Chart::new(width as u32, height as u32, x_min, x_max)
        .lineplot(&textplots::Shape::Lines(&frame))
        .nice();

    println!("Time [{}s] →", t_unit);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_determine_scale() {
        assert_eq!(determine_scale(5.0), (1.0, ""));
        assert_eq!(determine_scale(0.005), (1e3, "m"));
        assert_eq!(determine_scale(5e-6), (1e6, "μ"));
        assert_eq!(determine_scale(5e-9), (1e9, "n"));
        assert_eq!(determine_scale(5e-12), (1e12, "p"));
    }

    #[test]
    fn test_plot_waveform_basic() {
        let waveform = WaveformResult {
            time: vec![0.0, 0.001, 0.002, 0.003, 0.004],
            voltage: vec![0.0, 3.0, 3.0, 0.0, 0.0],
        };
        assert!(plot_waveform(&waveform, Some("Calibration"), None, None).is_ok());
    }

    #[test]
    fn test_plot_single_sample() {
        let waveform = WaveformResult {
            time: vec![0.0],
            voltage: vec![1.0],
        };
        assert!(plot_waveform(&waveform, None, Some(40), Some(20)).is_ok());
    }

    #[test]
    fn test_plot_empty_waveform() {
        assert!(plot_waveform(&WaveformResult::default(), None, None, None).is_err());
    }

    #[test]
    fn test_plot_mismatched_series() {
        let waveform = WaveformResult {
            time: vec![0.0],
            voltage: vec![1.0, 2.0],
        };
        assert!(plot_waveform(&waveform, None, None, None).is_err());
    }
}
