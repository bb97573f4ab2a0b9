// Maintenance Type Catalog
// Closed set of task types with their base recurrence frequency

use serde::{Deserialize, Serialize};

use crate::domain::vehicle::VehicleKind;

/// Maintenance task type (closed set, stored by its tag)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaintenanceType {
    CheckTirePressure,
    ReplaceTires,
    CleanAndLubricateChain,
    TightenMainScrewsAndBolts,
    CleanDrivetrain,
    LubricateCablesAndHousings,
    GreaseBottomBracket,
    ReplaceCablesAndHousings,
    BleedHydraulicBrakes,
    ServiceBearings,
    ReplaceChain,
    RunSoftwareAndBatteryDiagnostics,
    /// Catch-all for unrecognised tags. Frequency 0: never due.
    Unknown,
}

impl MaintenanceType {
    /// Every catalog entry, in declaration order
    pub const ALL: [MaintenanceType; 13] = [
        MaintenanceType::CheckTirePressure,
        MaintenanceType::ReplaceTires,
        MaintenanceType::CleanAndLubricateChain,
        MaintenanceType::TightenMainScrewsAndBolts,
        MaintenanceType::CleanDrivetrain,
        MaintenanceType::LubricateCablesAndHousings,
        MaintenanceType::GreaseBottomBracket,
        MaintenanceType::ReplaceCablesAndHousings,
        MaintenanceType::BleedHydraulicBrakes,
        MaintenanceType::ServiceBearings,
        MaintenanceType::ReplaceChain,
        MaintenanceType::RunSoftwareAndBatteryDiagnostics,
        MaintenanceType::Unknown,
    ];

    /// Stable tag used in storage and notification identifiers
    pub const fn tag(self) -> &'static str {
        match self {
            MaintenanceType::CheckTirePressure => "check_tire_pressure",
            MaintenanceType::ReplaceTires => "replace_tires",
            MaintenanceType::CleanAndLubricateChain => "clean_and_lubricate_chain",
            MaintenanceType::TightenMainScrewsAndBolts => "tighten_main_screws_and_bolts",
            MaintenanceType::CleanDrivetrain => "clean_drivetrain",
            MaintenanceType::LubricateCablesAndHousings => "lubricate_cables_and_housings",
            MaintenanceType::GreaseBottomBracket => "grease_bottom_bracket",
            MaintenanceType::ReplaceCablesAndHousings => "replace_cables_and_housings",
            MaintenanceType::BleedHydraulicBrakes => "bleed_hydraulic_brakes",
            MaintenanceType::ServiceBearings => "service_bearings",
            MaintenanceType::ReplaceChain => "replace_chain",
            MaintenanceType::RunSoftwareAndBatteryDiagnostics => {
                "run_software_and_battery_diagnostics"
            }
            MaintenanceType::Unknown => "unknown",
        }
    }

    /// Parse a stored tag. Unrecognised tags map to `Unknown`.
    pub fn from_tag(tag: &str) -> Self {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.tag() == tag)
            .unwrap_or(MaintenanceType::Unknown)
    }

    /// Base recurrence frequency in days (0 = never due)
    pub const fn base_frequency_days(self) -> u32 {
        match self {
            MaintenanceType::CheckTirePressure => 7,
            MaintenanceType::ReplaceTires => 180,
            MaintenanceType::CleanAndLubricateChain => 30,
            MaintenanceType::TightenMainScrewsAndBolts => 30,
            MaintenanceType::CleanDrivetrain => 90,
            MaintenanceType::LubricateCablesAndHousings => 180,
            MaintenanceType::GreaseBottomBracket => 180,
            MaintenanceType::ReplaceCablesAndHousings => 365,
            MaintenanceType::BleedHydraulicBrakes => 365,
            MaintenanceType::ServiceBearings => 365,
            MaintenanceType::ReplaceChain => 365,
            MaintenanceType::RunSoftwareAndBatteryDiagnostics => 365,
            MaintenanceType::Unknown => 0,
        }
    }

    /// Icon key for front-ends
    pub const fn icon_key(self) -> &'static str {
        match self {
            MaintenanceType::CheckTirePressure | MaintenanceType::ReplaceTires => "wheels",
            MaintenanceType::CleanAndLubricateChain | MaintenanceType::ReplaceChain => "chain",
            MaintenanceType::TightenMainScrewsAndBolts => "screw",
            MaintenanceType::CleanDrivetrain => "derailleur",
            MaintenanceType::LubricateCablesAndHousings
            | MaintenanceType::ReplaceCablesAndHousings => "cables",
            MaintenanceType::GreaseBottomBracket => "bracket",
            MaintenanceType::BleedHydraulicBrakes => "braking-system",
            MaintenanceType::ServiceBearings => "bearing",
            MaintenanceType::RunSoftwareAndBatteryDiagnostics => "battery",
            MaintenanceType::Unknown => "questionmark.circle",
        }
    }

    /// Human-readable name used in notification bodies
    pub const fn display_name(self) -> &'static str {
        match self {
            MaintenanceType::CheckTirePressure => "Check tire pressure",
            MaintenanceType::ReplaceTires => "Replace tires",
            MaintenanceType::CleanAndLubricateChain => "Clean and lubricate chain",
            MaintenanceType::TightenMainScrewsAndBolts => "Tighten main screws and bolts",
            MaintenanceType::CleanDrivetrain => "Clean drivetrain",
            MaintenanceType::LubricateCablesAndHousings => "Lubricate cables and housings",
            MaintenanceType::GreaseBottomBracket => "Grease bottom bracket",
            MaintenanceType::ReplaceCablesAndHousings => "Replace cables and housings",
            MaintenanceType::BleedHydraulicBrakes => "Bleed hydraulic brakes",
            MaintenanceType::ServiceBearings => "Service bearings",
            MaintenanceType::ReplaceChain => "Replace chain",
            MaintenanceType::RunSoftwareAndBatteryDiagnostics => {
                "Run software and battery diagnostics"
            }
            MaintenanceType::Unknown => "Unknown maintenance",
        }
    }

    /// Whether this type can ever become due
    pub const fn is_schedulable(self) -> bool {
        self.base_frequency_days() > 0
    }

    /// Whether this type makes sense for the given vehicle
    pub fn applies_to(self, vehicle: VehicleKind) -> bool {
        !(vehicle == VehicleKind::Manual
            && self == MaintenanceType::RunSoftwareAndBatteryDiagnostics)
    }

    /// Catalog entries a user can log for the given vehicle
    pub fn available_for(vehicle: VehicleKind) -> Vec<MaintenanceType> {
        Self::ALL
            .iter()
            .copied()
            .filter(|t| t.applies_to(vehicle))
            .collect()
    }
}

impl std::fmt::Display for MaintenanceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_round_trip_through_catalog() {
        for t in MaintenanceType::ALL {
            assert_eq!(MaintenanceType::from_tag(t.tag()), t);
        }
    }

    #[test]
    fn test_unrecognised_tag_falls_back_to_unknown() {
        assert_eq!(
            MaintenanceType::from_tag("wash_the_car"),
            MaintenanceType::Unknown
        );
        assert_eq!(MaintenanceType::Unknown.base_frequency_days(), 0);
        assert!(!MaintenanceType::Unknown.is_schedulable());
    }

    #[test]
    fn test_every_known_type_has_positive_frequency() {
        for t in MaintenanceType::ALL {
            if t != MaintenanceType::Unknown {
                assert!(t.base_frequency_days() > 0, "{} has no frequency", t);
            }
        }
    }

    #[test]
    fn test_tags_never_contain_identifier_separator() {
        for t in MaintenanceType::ALL {
            assert!(!t.tag().contains('-'));
        }
    }

    #[test]
    fn test_battery_diagnostics_not_available_for_manual_vehicle() {
        let manual = MaintenanceType::available_for(VehicleKind::Manual);
        assert!(!manual.contains(&MaintenanceType::RunSoftwareAndBatteryDiagnostics));
        assert_eq!(manual.len(), MaintenanceType::ALL.len() - 1);

        let electric = MaintenanceType::available_for(VehicleKind::Electric);
        assert!(electric.contains(&MaintenanceType::RunSoftwareAndBatteryDiagnostics));
    }

    #[test]
    fn test_serde_uses_tag() {
        let json = serde_json::to_string(&MaintenanceType::BleedHydraulicBrakes).unwrap();
        assert_eq!(json, "\"bleed_hydraulic_brakes\"");
    }
}
