/// The two flags the diagnostics surface is launched with.
/// Captured once at startup and never changed afterwards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LaunchParameters {
    /// Log the pages once and terminate instead of rendering.
    pub headless: bool,
    /// Repopulate the pages on a fixed interval while the view is active.
    pub auto_refresh: bool,
}

impl LaunchParameters {
    pub fn new(headless: bool, auto_refresh: bool) -> Self {
        Self {
            headless,
            auto_refresh,
        }
    }

    /// Build from loosely-typed values (environment variables, request
    /// payloads). Missing or unparseable values fall back to `false`.
    pub fn from_raw(headless: Option<&str>, auto_refresh: Option<&str>) -> Self {
        Self {
            headless: headless.map(parse_flag).unwrap_or(false),
            auto_refresh: auto_refresh.map(parse_flag).unwrap_or(false),
        }
    }

    /// Combine with another set of parameters; a flag is on if either has it.
    pub fn merge(self, other: LaunchParameters) -> Self {
        Self {
            headless: self.headless || other.headless,
            auto_refresh: self.auto_refresh || other.auto_refresh,
        }
    }
}

/// Lenient boolean parse: "1", "true", "yes", "on" (any case) are true,
/// everything else is false.
pub fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_interactive_without_refresh() {
        let p = LaunchParameters::default();
        assert!(!p.headless);
        assert!(!p.auto_refresh);
    }

    #[test]
    fn from_raw_missing_values() {
        assert_eq!(LaunchParameters::from_raw(None, None), LaunchParameters::default());
    }

    #[test]
    fn from_raw_malformed_values_default_to_false() {
        let p = LaunchParameters::from_raw(Some("maybe"), Some(""));
        assert_eq!(p, LaunchParameters::default());
    }

    #[test]
    fn from_raw_accepts_common_truthy_spellings() {
        for raw in ["1", "true", "TRUE", " yes ", "On"] {
            assert!(parse_flag(raw), "{raw:?} should parse as true");
        }
        let p = LaunchParameters::from_raw(Some("true"), Some("1"));
        assert!(p.headless);
        assert!(p.auto_refresh);
    }

    #[test]
    fn merge_is_flag_union() {
        let a = LaunchParameters::new(true, false);
        let b = LaunchParameters::new(false, true);
        assert_eq!(a.merge(b), LaunchParameters::new(true, true));
    }
}
