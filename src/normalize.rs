//! Field normalization: raw cell text into typed values.
//!
//! Every failure path resolves to `None` (the "unknown" sentinel); nothing
//! here returns an error or panics on bad input.

/// Division labels that mark a bout as a women's division fight on ufcstats.
///
/// Closed-world heuristic tied to this source's naming convention:
/// strawweight/flyweight/bantamweight/featherweight are women-only *on this
/// site's result tables*, which is not true of the sport in general. Do not
/// reuse this list against other sources.
const WOMENS_MARKERS: [&str; 11] = [
    "women's",
    "women",
    "woman",
    "strawweight",
    "flyweight",
    "bantamweight",
    "featherweight",
    "wstraw",
    "wfly",
    "wbantam",
    "wfeather",
];

/// Convert a fight time ("MM:SS" or a bare number of seconds) to seconds.
///
/// Seconds past 59 are kept as written ("1:75" is 135); the source has no
/// such rows today but the format does not forbid them. Empty, "N/A" and
/// anything non-numeric all come back as `None`.
pub fn parse_duration(text: &str) -> Option<u32> {
    let text = text.trim();
    if text.is_empty() || text == "N/A" {
        return None;
    }
    match text.split_once(':') {
        Some((minutes, seconds)) => {
            let minutes: u32 = minutes.trim().parse().ok()?;
            let seconds: u32 = seconds.trim().parse().ok()?;
            Some(minutes * 60 + seconds)
        }
        None => text.parse().ok(),
    }
}

/// Whether a weight class label denotes a women's division bout.
///
/// Case-insensitive substring match against [`WOMENS_MARKERS`]. Empty or
/// "N/A" input is never a match.
pub fn is_womens_division(weight_class: &str) -> bool {
    let weight_class = weight_class.trim();
    if weight_class.is_empty() || weight_class == "N/A" {
        return false;
    }
    let lower = weight_class.to_lowercase();
    WOMENS_MARKERS.iter().any(|m| lower.contains(m))
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_mm_ss() {
        assert_eq!(parse_duration("2:30"), Some(150));
        assert_eq!(parse_duration("0:01"), Some(1));
        assert_eq!(parse_duration("5:00"), Some(300));
    }

    #[test]
    fn duration_bare_seconds() {
        assert_eq!(parse_duration("95"), Some(95));
        assert_eq!(parse_duration("0"), Some(0));
    }

    #[test]
    fn duration_no_modular_correction() {
        // Seconds may exceed 59; they are summed as written.
        assert_eq!(parse_duration("1:75"), Some(135));
    }

    #[test]
    fn duration_unknown_inputs() {
        assert_eq!(parse_duration(""), None);
        assert_eq!(parse_duration("N/A"), None);
        assert_eq!(parse_duration("abc"), None);
        assert_eq!(parse_duration("1:2:3"), None);
        assert_eq!(parse_duration("-1:30"), None);
        assert_eq!(parse_duration("2:xx"), None);
    }

    #[test]
    fn duration_trims_whitespace() {
        assert_eq!(parse_duration(" 2:30 "), Some(150));
    }

    #[test]
    fn womens_explicit_tokens() {
        assert!(is_womens_division("Women's Strawweight"));
        assert!(is_womens_division("WOMEN'S FLYWEIGHT"));
        assert!(is_womens_division("Woman Bantamweight"));
    }

    #[test]
    fn womens_source_convention_divisions() {
        // On this site these divisions only appear for women's bouts.
        assert!(is_womens_division("Flyweight"));
        assert!(is_womens_division("Strawweight"));
        assert!(is_womens_division("Bantamweight"));
        assert!(is_womens_division("Featherweight"));
        assert!(is_womens_division("WFly"));
    }

    #[test]
    fn mens_divisions() {
        assert!(!is_womens_division("Lightweight"));
        assert!(!is_womens_division("Welterweight"));
        assert!(!is_womens_division("Middleweight"));
        assert!(!is_womens_division("Heavyweight"));
    }

    #[test]
    fn womens_unknown_inputs() {
        assert!(!is_womens_division(""));
        assert!(!is_womens_division("N/A"));
    }
}
