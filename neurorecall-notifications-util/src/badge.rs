/// Unread count above which the badge collapses to "99+".
pub const BADGE_MAX: u64 = 99;

/// Badge text for the bell button.
///
/// Hidden entirely at zero, exact count up to [`BADGE_MAX`], capped beyond.
pub fn badge_label(unread_count: u64) -> Option<String> {
    match unread_count {
        0 => None,
        n if n > BADGE_MAX => Some(format!("{BADGE_MAX}+")),
        n => Some(n.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_hides_badge() {
        assert_eq!(badge_label(0), None);
    }

    #[test]
    fn test_small_counts_are_exact() {
        assert_eq!(badge_label(1).as_deref(), Some("1"));
        assert_eq!(badge_label(5).as_deref(), Some("5"));
        assert_eq!(badge_label(99).as_deref(), Some("99"));
    }

    #[test]
    fn test_counts_above_cap_collapse() {
        assert_eq!(badge_label(100).as_deref(), Some("99+"));
        assert_eq!(badge_label(150).as_deref(), Some("99+"));
        assert_eq!(badge_label(u64::MAX).as_deref(), Some("99+"));
    }
}
