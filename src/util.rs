pub fn mean(samples: &[f64]) -> Option<f64> {
    if samples.is_empty() {
        return None;
    }

    Some(samples.iter().sum::<f64>() / samples.len() as f64)
}

pub fn std_dev(samples: &[f64]) -> Option<f64> {
    let avg = mean(samples)?;

    let variance = samples
        .iter()
        .map(|sample| {
            let diff = sample - avg;
            diff * diff
        })
        .sum::<f64>()
        / samples.len() as f64;

    Some(variance.sqrt())
}

/// Formats whole seconds as m:ss for the countdown readout.
pub fn format_clock(seconds: u64) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[300., 500., 700.]), Some(500.0));
        assert_eq!(mean(&[410., 650., 520., 480.]), Some(515.0));
    }

    #[test]
    fn test_mean_single_sample() {
        assert_eq!(mean(&[612.0]), Some(612.0));
    }

    #[test]
    fn test_mean_empty() {
        assert_eq!(mean(&[]), None);
    }

    #[test]
    fn test_std_dev() {
        assert_eq!(std_dev(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]), Some(2.0));
    }

    #[test]
    fn test_std_dev_identical_samples() {
        assert_eq!(std_dev(&[450.0, 450.0, 450.0]), Some(0.0));
    }

    #[test]
    fn test_std_dev_empty() {
        assert_eq!(std_dev(&[]), None);
    }

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(0), "0:00");
        assert_eq!(format_clock(9), "0:09");
        assert_eq!(format_clock(30), "0:30");
        assert_eq!(format_clock(61), "1:01");
        assert_eq!(format_clock(600), "10:00");
    }
}
