use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Closed set of issue categories
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum ReportCategory {
    #[default]
    Waste,
    Pothole,
    Leak,
    Streetlight,
}

/// Icon and marker colour for a category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryDisplay {
    pub label: &'static str,
    pub icon: &'static str,
    pub marker_class: &'static str,
    pub color: &'static str,
}

impl ReportCategory {
    /// Form order
    #[cfg(test)]
    pub const ALL: [ReportCategory; 4] = [
        ReportCategory::Waste,
        ReportCategory::Pothole,
        ReportCategory::Leak,
        ReportCategory::Streetlight,
    ];

    pub fn display(&self) -> CategoryDisplay {
        match self {
            ReportCategory::Waste => CategoryDisplay {
                label: "Waste",
                icon: "trash-2",
                marker_class: "bg-amber-500",
                color: "#f59e0b",
            },
            ReportCategory::Pothole => CategoryDisplay {
                label: "Pothole",
                icon: "alert-circle",
                marker_class: "bg-red-500",
                color: "#ef4444",
            },
            ReportCategory::Leak => CategoryDisplay {
                label: "Leak",
                icon: "droplet",
                marker_class: "bg-blue-500",
                color: "#3b82f6",
            },
            ReportCategory::Streetlight => CategoryDisplay {
                label: "Streetlight",
                icon: "lamp-floor",
                marker_class: "bg-yellow-400",
                color: "#facc15",
            },
        }
    }
}

impl std::fmt::Display for ReportCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display().label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_default_category_is_first_in_form_order() {
        assert_eq!(ReportCategory::default(), ReportCategory::ALL[0]);
    }

    #[test]
    fn test_every_category_has_distinct_marker() {
        let classes: HashSet<_> = ReportCategory::ALL
            .iter()
            .map(|c| c.display().marker_class)
            .collect();
        assert_eq!(classes.len(), ReportCategory::ALL.len());
    }

    #[test]
    fn test_unknown_category_is_rejected_on_input() {
        assert!(serde_json::from_str::<ReportCategory>("\"Graffiti\"").is_err());
        assert_eq!(
            serde_json::from_str::<ReportCategory>("\"Pothole\"").unwrap(),
            ReportCategory::Pothole
        );
    }
}
