/// Birth-year restriction applied to member rollups.
///
/// Birth dates are free text, so the year is the first four characters and
/// comparisons are textual.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BirthYearFilter {
    All,
    /// Born in exactly this year
    Year(i32),
    /// Born in or after this year
    SinceYear(i32),
}

impl BirthYearFilter {
    /// Build from query parameters. `year` wins over `since`; zero or
    /// negative means unset. A window reaching before year 1 is no filter.
    pub fn resolve(year: Option<i32>, since: Option<i32>, current_year: i32) -> Self {
        match (year.filter(|y| *y > 0), since.filter(|s| *s > 0)) {
            (Some(year), _) => BirthYearFilter::Year(year),
            (None, Some(since)) => current_year
                .checked_sub(since)
                .filter(|start| *start > 0)
                .map_or(BirthYearFilter::All, BirthYearFilter::SinceYear),
            (None, None) => BirthYearFilter::All,
        }
    }

    /// SQL comparison operator and bound value, or `None` when unfiltered
    pub fn condition(&self) -> Option<(&'static str, String)> {
        match self {
            BirthYearFilter::All => None,
            BirthYearFilter::Year(year) => Some(("=", format!("{:04}", year))),
            BirthYearFilter::SinceYear(year) => Some((">=", format!("{:04}", year))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve() {
        assert_eq!(BirthYearFilter::resolve(None, None, 2026), BirthYearFilter::All);
        assert_eq!(
            BirthYearFilter::resolve(Some(1990), None, 2026),
            BirthYearFilter::Year(1990)
        );
        assert_eq!(
            BirthYearFilter::resolve(None, Some(20), 2026),
            BirthYearFilter::SinceYear(2006)
        );
        assert_eq!(
            BirthYearFilter::resolve(Some(1990), Some(20), 2026),
            BirthYearFilter::Year(1990)
        );
        assert_eq!(
            BirthYearFilter::resolve(Some(0), Some(0), 2026),
            BirthYearFilter::All
        );
    }

    #[test]
    fn test_resolve_extreme_windows() {
        assert_eq!(
            BirthYearFilter::resolve(None, Some(i32::MIN), 2026),
            BirthYearFilter::All
        );
        assert_eq!(
            BirthYearFilter::resolve(None, Some(i32::MAX), 2026),
            BirthYearFilter::All
        );
        assert_eq!(
            BirthYearFilter::resolve(None, Some(-5), 2026),
            BirthYearFilter::All
        );
        assert_eq!(
            BirthYearFilter::resolve(None, Some(2026), 2026),
            BirthYearFilter::All
        );
        assert_eq!(
            BirthYearFilter::resolve(None, Some(2025), 2026),
            BirthYearFilter::SinceYear(1)
        );
        assert_eq!(
            BirthYearFilter::resolve(Some(-1990), None, 2026),
            BirthYearFilter::All
        );
    }

    #[test]
    fn test_condition() {
        assert_eq!(BirthYearFilter::All.condition(), None);
        assert_eq!(
            BirthYearFilter::Year(1990).condition(),
            Some(("=", "1990".to_string()))
        );
        assert_eq!(
            BirthYearFilter::SinceYear(2006).condition(),
            Some((">=", "2006".to_string()))
        );
    }
}
