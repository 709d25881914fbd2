use serde::Serialize;

use crate::persona::{Panel, Persona};

/// Evaluation axes, in chart order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RadarAxis {
    Innovation,
    BusinessImpact,
    Risk,
    SocialImpact,
    FieldPracticality,
    LegalEthicalRisk,
}

impl RadarAxis {
    pub const ALL: [RadarAxis; 6] = [
        RadarAxis::Innovation,
        RadarAxis::BusinessImpact,
        RadarAxis::Risk,
        RadarAxis::SocialImpact,
        RadarAxis::FieldPracticality,
        RadarAxis::LegalEthicalRisk,
    ];

    pub fn label(self) -> &'static str {
        match self {
            RadarAxis::Innovation => "技術革新性",
            RadarAxis::BusinessImpact => "ビジネス影響",
            RadarAxis::Risk => "リスク度",
            RadarAxis::SocialImpact => "社会的影響",
            RadarAxis::FieldPracticality => "現場実用性",
            RadarAxis::LegalEthicalRisk => "倫理・法的問題",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RadarVector(pub [u8; 6]);

impl RadarVector {
    /// `clamp(round(score * weight), 1, 10)` per axis. Never asks the model.
    pub fn derive(score: i32, weights: [f64; 6]) -> Self {
        let mut out = [0u8; 6];
        for (slot, weight) in out.iter_mut().zip(weights) {
            let v = (f64::from(score) * weight).round().clamp(1.0, 10.0);
            *slot = v as u8;
        }
        RadarVector(out)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PersonaRadar {
    pub persona: Persona,
    pub vector: RadarVector,
}

pub fn derive_all(panel: &Panel) -> Vec<PersonaRadar> {
    panel
        .iter()
        .map(|(persona, verdict)| PersonaRadar {
            persona,
            vector: RadarVector::derive(verdict.score, persona.weights()),
        })
        .collect()
}

/// One Chart.js radar dataset.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RadarDataset {
    pub label: &'static str,
    pub data: RadarVector,
    pub border_color: &'static str,
    pub background_color: String,
    pub border_width: u8,
    pub point_background_color: &'static str,
    pub point_radius: u8,
}

pub fn chart_datasets(radar: &[PersonaRadar]) -> Vec<RadarDataset> {
    radar
        .iter()
        .map(|r| {
            let color = r.persona.color();
            RadarDataset {
                label: r.persona.display_name(),
                data: r.vector,
                border_color: color,
                background_color: format!("{color}22"),
                border_width: 2,
                point_background_color: color,
                point_radius: 3,
            }
        })
        .collect()
}

pub fn axis_labels() -> Vec<&'static str> {
    RadarAxis::ALL.iter().map(|a| a.label()).collect()
}
