use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::warn;

use crate::models::Side;

/// Score assigned to a persona the generator forgot to review.
pub const NEUTRAL_SCORE: i32 = 5;

/// The six jurors. The set is closed: anything the generator invents outside
/// of it is dropped rather than rendered as a seventh seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Persona {
    Ishibashi,
    Zero,
    Kokuji,
    Packet,
    Pure,
    Kitsu,
}

struct PersonaTraits {
    id: &'static str,
    name: &'static str,
    color: &'static str,
    emoji: &'static str,
    seat: Side,
    // innovation, business, risk, social, field, legal
    weights: [f64; 6],
    profile: &'static str,
}

const TABLE: [PersonaTraits; 6] = [
    PersonaTraits {
        id: "ishibashi",
        name: "石橋 叩",
        color: "#a1887f",
        emoji: "🧱",
        seat: Side::Left,
        weights: [0.5, 0.75, 2.0, 1.25, 1.75, 1.5],
        profile: "守旧派PM/50代。「昔はよかった」が口癖。新技術に懐疑的だが、現場視点では一理ある意見を言う。",
    },
    PersonaTraits {
        id: "zero",
        name: "コード・ゼロ",
        color: "#00d4ff",
        emoji: "💻",
        seat: Side::Right,
        weights: [1.3, 0.9, 0.25, 0.8, 1.0, 0.25],
        profile: "天才ハッカー/20代。技術オタク。「技術は止まらない」。石橋を老害と思っている。",
    },
    PersonaTraits {
        id: "kokuji",
        name: "黒字 策",
        color: "#ffd166",
        emoji: "💼",
        seat: Side::Right,
        weights: [1.0, 1.25, 0.6, 0.9, 0.75, 0.5],
        profile: "冷徹コンサル/30代。「金になるか？」が判断基準。市場・ROI視点。",
    },
    PersonaTraits {
        id: "packet",
        name: "パケット守",
        color: "#06d6a0",
        emoji: "📡",
        seat: Side::Left,
        weights: [1.0, 0.85, 1.2, 0.85, 0.7, 0.85],
        profile: "NW職人/40代。インフラ・現場実装の観点。「インフラが死んだら全部終わり」。",
    },
    PersonaTraits {
        id: "pure",
        name: "ピュア",
        color: "#c77dff",
        emoji: "🌱",
        seat: Side::Right,
        weights: [1.0, 0.85, 0.85, 1.15, 1.0, 1.0],
        profile: "新人社員/20代女性。直感的に反応。「怖い」「便利そう」。読者の素朴な疑問を代弁。",
    },
    PersonaTraits {
        id: "kitsu",
        name: "規律 正",
        color: "#4361ee",
        emoji: "⚖️",
        seat: Side::Left,
        weights: [0.8, 0.6, 2.0, 1.6, 0.6, 2.0],
        profile: "コンプラ担当/40代。法的リスクに敏感。「著作権」「情報漏洩」「GDPR/AI Act」。",
    },
];

impl Persona {
    pub const ALL: [Persona; 6] = [
        Persona::Ishibashi,
        Persona::Zero,
        Persona::Kokuji,
        Persona::Packet,
        Persona::Pure,
        Persona::Kitsu,
    ];

    fn traits(self) -> &'static PersonaTraits {
        &TABLE[self.index()]
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn id(self) -> &'static str {
        self.traits().id
    }

    pub fn from_id(id: &str) -> Option<Self> {
        let id = id.trim();
        Self::ALL.into_iter().find(|p| p.id() == id)
    }

    pub fn display_name(self) -> &'static str {
        self.traits().name
    }

    pub fn color(self) -> &'static str {
        self.traits().color
    }

    pub fn emoji(self) -> &'static str {
        self.traits().emoji
    }

    /// Declared seating in the roundtable. Cosmetic only.
    pub fn seat(self) -> Side {
        self.traits().seat
    }

    /// Radar weighting coefficients, in `RadarAxis::ALL` order.
    pub fn weights(self) -> [f64; 6] {
        self.traits().weights
    }

    pub fn profile(self) -> &'static str {
        self.traits().profile
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub score: i32,
    pub review: String,
}

impl Default for Verdict {
    fn default() -> Self {
        Self {
            score: NEUTRAL_SCORE,
            review: String::new(),
        }
    }
}

/// One verdict per persona, always complete.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Panel {
    verdicts: [Verdict; 6],
}

impl Panel {
    /// Builds a panel from id-keyed maps. Returns the panel together with the
    /// personas that had no score in `scores`; those are seated at the neutral
    /// score with an empty review.
    pub fn from_maps(
        scores: &HashMap<String, f64>,
        reviews: &HashMap<String, String>,
    ) -> (Self, Vec<Persona>) {
        for id in scores.keys().chain(reviews.keys()) {
            if Persona::from_id(id).is_none() {
                warn!("Ignoring unknown persona id in reviews - id={}", id);
            }
        }

        let mut panel = Panel::default();
        let mut missing = Vec::new();
        for persona in Persona::ALL {
            let mut verdict = Verdict::default();
            match scores.get(persona.id()) {
                Some(score) => verdict.score = score.round() as i32,
                None => missing.push(persona),
            }
            if let Some(review) = reviews.get(persona.id()) {
                verdict.review = review.trim().to_string();
            }
            panel.set(persona, verdict);
        }
        (panel, missing)
    }

    pub fn get(&self, persona: Persona) -> &Verdict {
        &self.verdicts[persona.index()]
    }

    pub fn set(&mut self, persona: Persona, verdict: Verdict) {
        self.verdicts[persona.index()] = verdict;
    }

    pub fn iter(&self) -> impl Iterator<Item = (Persona, &Verdict)> {
        Persona::ALL.into_iter().map(move |p| (p, self.get(p)))
    }

    /// Mean of the six scores, rounded to one decimal place.
    pub fn total_score(&self) -> f64 {
        let sum: f64 = self.verdicts.iter().map(|v| f64::from(v.score)).sum();
        let mean = sum / self.verdicts.len() as f64;
        (mean * 10.0).round() / 10.0
    }
}
