//! Mapping from WMO weather codes to display icon, label and colour theme.
//!
//! Code list: <https://open-meteo.com/en/docs#weathervariables>

use std::ops::RangeInclusive;

/// Icon/label pair for a single weather code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Condition {
    pub icon: &'static str,
    pub description: &'static str,
}

pub const FALLBACK_CONDITION: Condition = Condition {
    icon: "🌡️",
    description: "Unknown conditions",
};

/// Sorted by code; looked up with a binary search.
const CONDITIONS: &[(i32, Condition)] = &[
    (0, Condition { icon: "☀️", description: "Clear sky" }),
    (1, Condition { icon: "🌤️", description: "Mainly clear" }),
    (2, Condition { icon: "⛅", description: "Partly cloudy" }),
    (3, Condition { icon: "☁️", description: "Overcast" }),
    (45, Condition { icon: "🌫️", description: "Fog" }),
    (48, Condition { icon: "🌫️", description: "Depositing rime fog" }),
    (51, Condition { icon: "🌦️", description: "Light drizzle" }),
    (53, Condition { icon: "🌦️", description: "Moderate drizzle" }),
    (55, Condition { icon: "🌦️", description: "Dense drizzle" }),
    (56, Condition { icon: "🌧️", description: "Light freezing drizzle" }),
    (57, Condition { icon: "🌧️", description: "Dense freezing drizzle" }),
    (61, Condition { icon: "🌧️", description: "Slight rain" }),
    (63, Condition { icon: "🌧️", description: "Moderate rain" }),
    (65, Condition { icon: "🌧️", description: "Heavy rain" }),
    (66, Condition { icon: "🌧️", description: "Light freezing rain" }),
    (67, Condition { icon: "🌧️", description: "Heavy freezing rain" }),
    (71, Condition { icon: "🌨️", description: "Slight snow fall" }),
    (73, Condition { icon: "🌨️", description: "Moderate snow fall" }),
    (75, Condition { icon: "❄️", description: "Heavy snow fall" }),
    (77, Condition { icon: "🌨️", description: "Snow grains" }),
    (80, Condition { icon: "🌦️", description: "Slight rain showers" }),
    (81, Condition { icon: "🌦️", description: "Moderate rain showers" }),
    (82, Condition { icon: "⛈️", description: "Violent rain showers" }),
    (85, Condition { icon: "🌨️", description: "Slight snow showers" }),
    (86, Condition { icon: "❄️", description: "Heavy snow showers" }),
    (95, Condition { icon: "⛈️", description: "Thunderstorm" }),
    (96, Condition { icon: "⛈️", description: "Thunderstorm with slight hail" }),
    (99, Condition { icon: "⛈️", description: "Thunderstorm with heavy hail" }),
];

/// Icon and label for `code`; unknown codes get [`FALLBACK_CONDITION`].
pub fn describe(code: i32) -> Condition {
    CONDITIONS
        .binary_search_by_key(&code, |(c, _)| *c)
        .map(|idx| CONDITIONS[idx].1)
        .unwrap_or(FALLBACK_CONDITION)
}

/// Codes with a dedicated table entry, in ascending order.
pub fn known_codes() -> impl Iterator<Item = i32> {
    CONDITIONS.iter().map(|(c, _)| *c)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeOfDay {
    Day,
    Night,
}

/// Local hours `[DAY_START_HOUR, DAY_END_HOUR)` count as day.
pub const DAY_START_HOUR: u32 = 6;
pub const DAY_END_HOUR: u32 = 20;

impl TimeOfDay {
    pub fn from_hour(hour: u32) -> Self {
        if (DAY_START_HOUR..DAY_END_HOUR).contains(&hour) {
            TimeOfDay::Day
        } else {
            TimeOfDay::Night
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Clear,
    Cloudy,
    Rain,
    Snow,
    Showers,
    Storm,
}

/// Ordered and pairwise disjoint. Codes outside every range fall back to `Cloudy`.
const SEVERITY_BUCKETS: &[(RangeInclusive<i32>, Severity)] = &[
    (0..=1, Severity::Clear),
    (2..=48, Severity::Cloudy),
    (51..=67, Severity::Rain),
    (71..=77, Severity::Snow),
    (80..=86, Severity::Showers),
    (95..=99, Severity::Storm),
];

impl Severity {
    pub fn from_code(code: i32) -> Self {
        SEVERITY_BUCKETS
            .iter()
            .find(|(range, _)| range.contains(&code))
            .map(|(_, severity)| *severity)
            .unwrap_or(Severity::Cloudy)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Clear => "clear",
            Severity::Cloudy => "cloudy",
            Severity::Rain => "rain",
            Severity::Snow => "snow",
            Severity::Showers => "showers",
            Severity::Storm => "storm",
        }
    }
}

/// Background theme. Night is decided before the severity buckets are consulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GradientKey {
    Night,
    Day(Severity),
}

impl GradientKey {
    pub fn select(code: i32, hour: u32) -> Self {
        match TimeOfDay::from_hour(hour) {
            TimeOfDay::Night => GradientKey::Night,
            TimeOfDay::Day => GradientKey::Day(Severity::from_code(code)),
        }
    }

    pub fn time_of_day(&self) -> TimeOfDay {
        match self {
            GradientKey::Night => TimeOfDay::Night,
            GradientKey::Day(_) => TimeOfDay::Day,
        }
    }

    /// Start and end colour of the background gradient.
    pub fn stops(&self) -> (&'static str, &'static str) {
        match self {
            GradientKey::Night => ("#0f172a", "#312e81"),
            GradientKey::Day(Severity::Clear) => ("#38bdf8", "#facc15"),
            GradientKey::Day(Severity::Cloudy) => ("#94a3b8", "#cbd5e1"),
            GradientKey::Day(Severity::Rain) => ("#1e3a8a", "#64748b"),
            GradientKey::Day(Severity::Snow) => ("#e0f2fe", "#f8fafc"),
            GradientKey::Day(Severity::Showers) => ("#0369a1", "#7dd3fc"),
            GradientKey::Day(Severity::Storm) => ("#1f2937", "#581c87"),
        }
    }

    pub fn name(&self) -> String {
        match self {
            GradientKey::Night => "night".to_string(),
            GradientKey::Day(severity) => format!("day-{}", severity.as_str()),
        }
    }
}

/// Everything the front-end needs to draw a condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub icon: &'static str,
    pub description: &'static str,
    pub gradient: GradientKey,
}

pub fn classify(code: i32, hour: u32) -> Classification {
    let Condition { icon, description } = describe(code);
    Classification {
        icon,
        description,
        gradient: GradientKey::select(code, hour),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_sorted_and_unique() {
        let codes: Vec<i32> = known_codes().collect();
        assert!(codes.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(codes.len(), 28);
    }

    #[test]
    fn known_codes_have_documented_labels() {
        assert_eq!(describe(0), Condition { icon: "☀️", description: "Clear sky" });
        assert_eq!(describe(3).description, "Overcast");
        assert_eq!(describe(45).description, "Fog");
        assert_eq!(describe(65).description, "Heavy rain");
        assert_eq!(describe(75), Condition { icon: "❄️", description: "Heavy snow fall" });
        assert_eq!(describe(82).icon, "⛈️");
        assert_eq!(describe(99).description, "Thunderstorm with heavy hail");
    }

    #[test]
    fn every_known_code_is_not_the_fallback() {
        for code in known_codes() {
            assert_ne!(describe(code), FALLBACK_CONDITION, "code {code}");
        }
    }

    #[test]
    fn unknown_codes_fall_back() {
        for code in [-1, 4, 50, 68, 100, 1000, i32::MIN, i32::MAX] {
            assert_eq!(describe(code), FALLBACK_CONDITION, "code {code}");
        }
    }

    #[test]
    fn buckets_are_disjoint() {
        for (i, (a, _)) in SEVERITY_BUCKETS.iter().enumerate() {
            for (b, _) in &SEVERITY_BUCKETS[i + 1..] {
                assert!(a.end() < b.start(), "{a:?} overlaps {b:?}");
            }
        }
    }

    #[test]
    fn gradient_selection_is_total_and_unique() {
        for code in -5..=200 {
            for hour in 0..24 {
                let key = GradientKey::select(code, hour);
                let matching = SEVERITY_BUCKETS
                    .iter()
                    .filter(|(range, _)| range.contains(&code))
                    .count();
                assert!(matching <= 1, "code {code} in {matching} buckets");

                match TimeOfDay::from_hour(hour) {
                    TimeOfDay::Night => assert_eq!(key, GradientKey::Night),
                    TimeOfDay::Day => assert!(matches!(key, GradientKey::Day(_))),
                }
            }
        }
    }

    #[test]
    fn night_short_circuits_severity() {
        assert_eq!(GradientKey::select(95, 23), GradientKey::Night);
        assert_eq!(GradientKey::select(0, 0), GradientKey::Night);
        assert_eq!(GradientKey::select(0, 5), GradientKey::Night);
        assert_eq!(GradientKey::select(0, 20), GradientKey::Night);
    }

    #[test]
    fn day_uses_code_buckets() {
        assert_eq!(GradientKey::select(1, 12), GradientKey::Day(Severity::Clear));
        assert_eq!(GradientKey::select(48, 6), GradientKey::Day(Severity::Cloudy));
        assert_eq!(GradientKey::select(57, 9), GradientKey::Day(Severity::Rain));
        assert_eq!(GradientKey::select(77, 15), GradientKey::Day(Severity::Snow));
        assert_eq!(GradientKey::select(86, 18), GradientKey::Day(Severity::Showers));
        assert_eq!(GradientKey::select(96, 19), GradientKey::Day(Severity::Storm));
        assert_eq!(GradientKey::select(500, 12), GradientKey::Day(Severity::Cloudy));
    }

    #[test]
    fn classify_combines_label_and_gradient() {
        let c = classify(61, 14);
        assert_eq!(c.description, "Slight rain");
        assert_eq!(c.gradient.name(), "day-rain");
        assert_eq!(c.gradient.time_of_day(), TimeOfDay::Day);

        let unknown = classify(1234, 2);
        assert_eq!(unknown.icon, FALLBACK_CONDITION.icon);
        assert_eq!(unknown.gradient, GradientKey::Night);
    }
}
