//! Text helpers shared by the renderer.

const SUFFIXES: [char; 6] = ['K', 'M', 'G', 'T', 'P', 'E'];

/// Formats a millisecond count as `HH:MM:SS`.
///
/// Hours keep widening past 99; nothing is clamped.
pub fn format_duration(ms: u64) -> String {
    let seconds = ms / 1000;
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let seconds = seconds % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

/// Formats a byte count with a binary suffix.
///
/// Below 1024 the value is a 3-wide integer (`"  0 B"`), above that a 6-wide
/// one-decimal figure followed by the suffix (`"   1.0 KB"`).
pub fn format_magnitude(bytes: u64) -> String {
    const UNIT: u64 = 1024;
    if bytes < UNIT {
        return format!("{:3} B", bytes);
    }

    let mut div = UNIT;
    let mut exp = 0;
    let mut n = bytes / UNIT;
    while n >= UNIT {
        div *= UNIT;
        exp += 1;
        n /= UNIT;
    }
    format!("{:6.1} {}B", bytes as f64 / div as f64, SUFFIXES[exp])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0), "00:00:00");
        assert_eq!(format_duration(999), "00:00:00");
        assert_eq!(format_duration(61_000), "00:01:01");
        assert_eq!(format_duration(3_723_000), "01:02:03");
        assert_eq!(format_duration(360_000_000), "100:00:00");
    }

    #[test]
    fn test_format_magnitude_small_values() {
        assert_eq!(format_magnitude(0), "  0 B");
        assert_eq!(format_magnitude(7), "  7 B");
        assert_eq!(format_magnitude(1023), "1023 B");
    }

    #[test]
    fn test_format_magnitude_suffixes() {
        assert_eq!(format_magnitude(1024), "   1.0 KB");
        assert_eq!(format_magnitude(2048), "   2.0 KB");
        assert_eq!(format_magnitude(1536), "   1.5 KB");
        assert_eq!(format_magnitude(1024 * 1024), "   1.0 MB");
        assert_eq!(format_magnitude(5 * 1024 * 1024 * 1024), "   5.0 GB");
        assert_eq!(format_magnitude(u64::MAX), "  16.0 EB");
    }
}
