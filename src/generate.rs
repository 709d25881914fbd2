//! The three model-backed stages: pick a story, review it, stage a roundtable.

use tracing::{debug, info, warn};

use crate::error::GenerationError;
use crate::extract::parse_structured;
use crate::history::UsedTitles;
use crate::llm::Generator;
use crate::models::{NewsCandidate, Roundtable, RoundtableEntry, SelectedStory, Side, SourceLink};
use crate::out_models::{ReviewSheet, RoundtableScript, StoryDraft};
use crate::persona::{Panel, Persona};
use crate::prompts::{
    user_invent_story, user_reviews, user_roundtable, user_select_from_candidates,
    MAX_LISTED_CANDIDATES,
};
use crate::radar::{derive_all, PersonaRadar};

const FALLBACK_SOURCE_NAME: &str = "参考記事";

/// Picks a story from `candidates`, or asks the model to find one when the
/// feed came back empty.
pub async fn select_story<G: Generator>(
    generator: &G,
    candidates: &[NewsCandidate],
    used: &UsedTitles,
    today: &str,
) -> Result<SelectedStory, GenerationError> {
    if candidates.is_empty() {
        info!("No usable feed candidates - asking model to choose a story directly");
        let prompt = user_invent_story(today, used.recent(usize::MAX));
        let raw = generator.generate(&prompt).await?;
        let draft: StoryDraft = parse_structured(&raw)?;
        return story_from_draft(draft, None);
    }

    let listed = candidates.len().min(MAX_LISTED_CANDIDATES);
    debug!("Selecting from candidates - listed={}", listed);
    let prompt = user_select_from_candidates(today, candidates);
    let raw = generator.generate(&prompt).await?;
    let draft: StoryDraft = parse_structured(&raw)?;

    let index = match draft.selected_index {
        Some(i) if i >= 0 && (i as usize) < listed => i as usize,
        other => {
            warn!("Selected index out of range, using first candidate - index={:?}, listed={}", other, listed);
            0
        }
    };
    let chosen = &candidates[index];
    info!("Candidate selected - index={}, feed_title={}", index, chosen.title);
    story_from_draft(draft, Some(chosen))
}

fn story_from_draft(
    draft: StoryDraft,
    chosen: Option<&NewsCandidate>,
) -> Result<SelectedStory, GenerationError> {
    let title = draft.title.trim().to_string();
    if title.is_empty() {
        return Err(GenerationError::BlankField("title"));
    }
    let title_html = draft
        .title_html
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| title.clone());

    let sources = match chosen {
        Some(c) => {
            let name = [Some(c.source_name.clone()), draft.source_name]
                .into_iter()
                .flatten()
                .map(|s| s.trim().to_string())
                .find(|s| !s.is_empty())
                .unwrap_or_else(|| FALLBACK_SOURCE_NAME.to_string());
            vec![SourceLink::new(name, c.link.clone())]
        }
        None => {
            let listed: Vec<SourceLink> = draft
                .sources
                .into_iter()
                .filter(|s| !s.name.trim().is_empty() && !s.url.trim().is_empty())
                .collect();
            if listed.is_empty() {
                vec![SourceLink::new(
                    draft
                        .source_name
                        .filter(|s| !s.trim().is_empty())
                        .unwrap_or_else(|| FALLBACK_SOURCE_NAME.to_string()),
                    draft
                        .source_url
                        .filter(|s| !s.trim().is_empty())
                        .unwrap_or_else(|| "#".to_string()),
                )]
            } else {
                listed
            }
        }
    };

    Ok(SelectedStory {
        title,
        title_html,
        hero_lead: draft.hero_lead,
        overview: draft.overview,
        summary_items: draft.summary_items,
        tags: draft.tags,
        short_blurb: draft.news_summary_short,
        sources,
    })
}

#[derive(Debug, Clone)]
pub struct Reviews {
    pub panel: Panel,
    pub radar: Vec<PersonaRadar>,
}

/// One call for all six reviews; the radar is derived locally right after.
pub async fn review_story<G: Generator>(
    generator: &G,
    story: &SelectedStory,
    strict_panel: bool,
) -> Result<Reviews, GenerationError> {
    let raw = generator.generate(&user_reviews(story)).await?;
    let sheet: ReviewSheet = parse_structured(&raw)?;
    let (panel, missing) = Panel::from_maps(&sheet.scores, &sheet.reviews);

    if !missing.is_empty() {
        let ids: Vec<String> = missing.iter().map(|p| p.id().to_string()).collect();
        if strict_panel {
            return Err(GenerationError::IncompletePanel(ids));
        }
        warn!("Reviews missing personas, using neutral score - missing={}", ids.join(","));
    }

    let radar = derive_all(&panel);
    info!("Reviews generated - total_score={:.1}", panel.total_score());
    Ok(Reviews { panel, radar })
}

pub async fn hold_roundtable<G: Generator>(
    generator: &G,
    story: &SelectedStory,
    panel: &Panel,
) -> Result<Roundtable, GenerationError> {
    let raw = generator.generate(&user_roundtable(story, panel)).await?;
    let script: RoundtableScript = parse_structured(&raw)?;

    let mut entries = Vec::with_capacity(script.chat_log.len());
    for (id, side, utterance) in script.chat_log {
        let Some(persona) = Persona::from_id(&id) else {
            warn!("Dropping roundtable line from unknown speaker - id={}", id);
            continue;
        };
        let side = Side::parse(&side).unwrap_or_else(|| persona.seat());
        entries.push(RoundtableEntry {
            persona,
            side,
            utterance: utterance.trim().to_string(),
        });
    }

    if entries.len() < 16 {
        debug!("Roundtable shorter than requested - turns={}", entries.len());
    }
    info!("Roundtable generated - turns={}", entries.len());
    Ok(Roundtable {
        entries,
        quote: script.quote.trim().to_string(),
    })
}
