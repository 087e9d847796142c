//! Built-in sample dataset.
//!
//! Shown in a view until its first successful fetch, so the dashboard is
//! usable (and demonstrable) without a backend.

use chrono::{DateTime, TimeZone, Utc};
use serde_json::json;
use targeting_core::types::*;

fn at(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, day, hour, 0, 0)
        .single()
        .unwrap_or_default()
}

fn gate(kind: GateKind, status: GateStatus, value: &str) -> DecisionGate {
    DecisionGate {
        kind,
        status,
        value: value.to_string(),
        classification: "UNCLASSIFIED // EXERCISE".to_string(),
    }
}

/// Sample decision gates
pub fn gates() -> Vec<DecisionGate> {
    vec![
        gate(GateKind::Roe, GateStatus::Green, "ROE 421 in force"),
        gate(GateKind::Cde, GateStatus::Yellow, "CAT II"),
        gate(GateKind::Weather, GateStatus::Green, "Ceiling 4500ft"),
        gate(GateKind::Deconfliction, GateStatus::Red, "ACA BRAVO active"),
    ]
}

fn target(
    id: &str,
    name: &str,
    lat: f64,
    lon: f64,
    category: &str,
    priority: u8,
    status: TargetStatus,
    phase: KillChainPhase,
) -> Target {
    Target {
        id: id.to_string(),
        name: name.to_string(),
        location: GeoPoint { lat, lon },
        category: category.to_string(),
        priority: PriorityTier::new(priority).unwrap_or_default(),
        status,
        phase,
    }
}

/// Sample targets
pub fn targets() -> Vec<Target> {
    vec![
        target("T-1001", "Bridge 4 (MSR TAMPA)", 34.512, 69.183, "Infrastructure", 1, TargetStatus::Nominated, KillChainPhase::Fix),
        target("T-1002", "Radar Site KILO", 34.601, 69.402, "Air Defence", 1, TargetStatus::Approved, KillChainPhase::Finish),
        target("T-1003", "Fuel Depot 7", 34.455, 69.021, "Logistics", 2, TargetStatus::Identified, KillChainPhase::Find),
        target("T-1004", "Command Post NORTH", 34.702, 69.288, "C2 Node", 1, TargetStatus::Engaged, KillChainPhase::Exploit),
        target("T-1005", "Relay Tower 12", 34.390, 69.110, "Communications", 3, TargetStatus::Assessed, KillChainPhase::Analyze),
        target("T-1006", "Vehicle Park EAST", 34.488, 69.377, "Maneuver", 4, TargetStatus::Rejected, KillChainPhase::Fix),
    ]
}

fn unit(
    id: &str,
    name: &str,
    parent: Option<&str>,
    affiliation: Affiliation,
    echelon: &str,
    readiness: u8,
    capabilities: &[&str],
) -> Unit {
    Unit {
        echelon: echelon.to_string(),
        readiness,
        capabilities: capabilities.iter().map(|c| c.to_string()).collect(),
        ..Unit::new(id, name, parent, affiliation)
    }
}

/// Sample order of battle, one blue and one red hierarchy
pub fn units() -> Vec<Unit> {
    use Affiliation::{Blue, Red};
    let mut units = vec![
        unit("1DIV", "1st Division", None, Blue, "DIV", 91, &["C2", "Fires"]),
        unit("1BDE", "1st Brigade", Some("1DIV"), Blue, "BDE", 86, &["Maneuver"]),
        unit("1-1BN", "1-1 Infantry Battalion", Some("1BDE"), Blue, "BN", 78, &["Infantry"]),
        unit("1-2BN", "1-2 Armor Battalion", Some("1BDE"), Blue, "BN", 64, &["Armor"]),
        unit("2BDE", "2nd Brigade", Some("1DIV"), Blue, "BDE", 55, &["Maneuver", "ISR"]),
        unit("DIVARTY", "Division Artillery", Some("1DIV"), Blue, "BDE", 88, &["Fires", "Counter-battery"]),
        unit("OPFOR-A", "Opposing Force Army", None, Red, "ARMY", 70, &["C2"]),
        unit("OPFOR-12", "12th Motor Rifle Division", Some("OPFOR-A"), Red, "DIV", 62, &["Mechanized"]),
        unit("OPFOR-AD", "Air Defence Regiment", Some("OPFOR-12"), Red, "REGT", 35, &["SAM", "Radar"]),
    ];
    if let Some(arty) = units.iter_mut().find(|u| u.id == "DIVARTY") {
        arty.caveats = vec!["Reduced ammunition basic load".to_string()];
        arty.restrictions = vec!["No fires within 2km of NFA ALPHA".to_string()];
    }
    units
}

/// Sample BDA reports
pub fn reports() -> Vec<BdaReport> {
    vec![
        BdaReport {
            id: "BDA-001".to_string(),
            target_id: "T-1004".to_string(),
            physical_damage: PhysicalDamage::Severe,
            functional_damage: FunctionalDamage::PartialFunctionalDamage,
            confidence: 75,
            recommendation: Recommendation::Reattack,
            analyst: "SGT Ortiz".to_string(),
            summary: "Roof collapse over eastern wing; antenna farm intact.".to_string(),
            version: 2,
            updated_at: at(4, 14),
        },
        BdaReport {
            id: "BDA-002".to_string(),
            target_id: "T-1005".to_string(),
            physical_damage: PhysicalDamage::Destroyed,
            functional_damage: FunctionalDamage::CompleteFunctionalDamage,
            confidence: 90,
            recommendation: Recommendation::NoFurtherAction,
            analyst: "CPT Nakamura".to_string(),
            summary: "Tower down, no emissions observed for 24h.".to_string(),
            version: 1,
            updated_at: at(5, 9),
        },
    ]
}

/// Sample version history for a report
pub fn history(report_id: &str) -> Vec<BdaVersion> {
    if report_id != "BDA-001" {
        return Vec::new();
    }
    vec![
        BdaVersion {
            version: 1,
            created_at: at(3, 18),
            data: json!({
                "physical_damage": "MD",
                "functional_damage": "UNK",
                "confidence": 40,
                "recommendation": "FURTHER_COLLECTION",
                "analyst": "SGT Ortiz",
                "imagery_source": "UAS FMV",
                "summary": "Partial roof damage. Assessment limited by smoke."
            }),
        },
        BdaVersion {
            version: 2,
            created_at: at(4, 14),
            data: json!({
                "physical_damage": "SD",
                "functional_damage": "PFD",
                "confidence": 75,
                "recommendation": "REATTACK",
                "analyst": "SGT Ortiz",
                "imagery_source": "EO satellite",
                "secondary_effects": "Fire in adjacent vehicle shed",
                "summary": "Roof collapse over eastern wing; antenna farm intact."
            }),
        },
    ]
}

/// Sample planning assumptions
pub fn assumptions() -> Vec<Assumption> {
    vec![
        Assumption {
            id: "A-01".to_string(),
            title: "Enemy will not reinforce across the river within 48h".to_string(),
            category: "Enemy".to_string(),
            status: AssumptionStatus::Valid,
            confidence: 70,
            owner: "J2".to_string(),
            last_reviewed: Some(at(4, 8)),
        },
        Assumption {
            id: "A-02".to_string(),
            title: "MSR TAMPA remains trafficable for resupply".to_string(),
            category: "Logistics".to_string(),
            status: AssumptionStatus::AtRisk,
            confidence: 45,
            owner: "J4".to_string(),
            last_reviewed: Some(at(5, 7)),
        },
        Assumption {
            id: "A-03".to_string(),
            title: "Civilian traffic clears the market district by 2200".to_string(),
            category: "Civil".to_string(),
            status: AssumptionStatus::Invalidated,
            confidence: 20,
            owner: "J9".to_string(),
            last_reviewed: None,
        },
    ]
}

/// Sample rules of engagement
pub fn roe_rules() -> Vec<RoeRule> {
    vec![
        RoeRule {
            id: "R-421".to_string(),
            code: "ROE 421".to_string(),
            title: "Engagement of hostile air defence".to_string(),
            description: "Hostile air defence emitters may be engaged on positive identification.".to_string(),
            status: RoeRuleStatus::Active,
        },
        RoeRule {
            id: "R-312".to_string(),
            code: "ROE 312".to_string(),
            title: "Dual-use infrastructure".to_string(),
            description: "Strikes on dual-use infrastructure require JTB approval and CDE CAT II or lower.".to_string(),
            status: RoeRuleStatus::Active,
        },
        RoeRule {
            id: "R-207".to_string(),
            code: "ROE 207".to_string(),
            title: "Cross-boundary fires".to_string(),
            description: "Fires across the corps boundary are suspended pending coordination.".to_string(),
            status: RoeRuleStatus::Suspended,
        },
    ]
}
