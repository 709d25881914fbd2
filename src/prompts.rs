use std::fmt::Write;

use crate::models::{NewsCandidate, SelectedStory, Side};
use crate::persona::{Panel, Persona};

pub const MAX_LISTED_CANDIDATES: usize = 15;
pub const EXCLUDED_TITLES_IN_FALLBACK: usize = 10;
pub const STANCE_EXCERPT_CHARS: usize = 100;

const STORY_FIELDS: &str = r#"  "title": "ニュースタイトル（日本語、30文字以内）",
  "title_html": "HTMLタイトル（キーワードを<span class=\"highlight\">タグで強調）",
  "hero_lead": "リード文（2〜3行、HTMLの<br>タグ使用可）",
  "overview": "ニュースの概要（200文字程度、平文）",
  "summary_items": [
    "要約1（1〜2文）",
    "要約2（1〜2文）",
    "要約3（1〜2文）"
  ],
  "tags": [
    ["tag-hot", "タグ名1"],
    ["tag-tech", "タグ名2"],
    ["tag-biz", "タグ名3"]
  ],
  "news_summary_short": "通知用の短い説明（50文字以内）","#;

pub fn user_select_from_candidates(today: &str, candidates: &[NewsCandidate]) -> String {
    let mut list = String::new();
    for (i, c) in candidates.iter().take(MAX_LISTED_CANDIDATES).enumerate() {
        let source = if c.source_name.is_empty() { "不明" } else { &c.source_name };
        let _ = writeln!(list, "[{i}] {} （{}）", c.title, source);
    }

    format!(r#"今日は{today}です。以下は直近のAI関連ニュース候補の一覧です。

{list}
この中から、日本のエンジニア・PMが関心を持ち、賛否が分かれる議論を呼びそうなニュースを1件だけ選び、記事用の情報を作成してください。

以下のJSON形式のみで回答してください（余計なテキスト不要）：
{{
  "selected_index": 選んだ候補の番号（整数）,
{fields}
}}"#, fields = STORY_FIELDS.trim_end_matches(','))
}

pub fn user_invent_story<'a>(today: &str, recent_titles: impl IntoIterator<Item = &'a str>) -> String {
    let mut excluded = String::new();
    for title in recent_titles.into_iter().take(EXCLUDED_TITLES_IN_FALLBACK) {
        let _ = writeln!(excluded, "- {title}");
    }
    if excluded.is_empty() {
        excluded.push_str("- （なし）\n");
    }

    format!(r#"今日（{today}）時点で最もホットなAI関連ニュースを1件選んでください。

条件：
- 直近1週間以内のニュース
- 日本のエンジニア・PMが関心を持つ話題（LLM、生成AI、AI規制、AI×ビジネス等）
- 議論を呼ぶ、賛否が分かれるトピックが望ましい
- 以下の既出ニュースとは別の話題にすること：
{excluded}
以下のJSON形式のみで回答してください（余計なテキスト不要）：
{{
{fields}
  "source_name": "情報源メディア名",
  "source_url": "情報源URL"
}}"#, fields = STORY_FIELDS)
}

pub fn user_reviews(story: &SelectedStory) -> String {
    let mut cast = String::new();
    let mut scores = String::new();
    let mut reviews = String::new();
    for (n, persona) in Persona::ALL.into_iter().enumerate() {
        let _ = writeln!(cast, "{}. {}（id: {}）: {}", n + 1, persona.display_name(), persona.id(), persona.profile());
        let _ = writeln!(scores, "    \"{}\": 点数(1-10),", persona.id());
        let _ = writeln!(reviews, "    \"{}\": \"{}のレビュー（350〜400文字、口語体）\",", persona.id(), persona.display_name());
    }
    let scores = scores.trim_end().trim_end_matches(',');
    let reviews = reviews.trim_end().trim_end_matches(',');

    format!(r#"あなたは「The Jury」というAIニュースレビューブログの編集AIです。
以下のAIニュースについて、6名のキャラクターそれぞれの視点でレビューを生成してください。

【ニュース】
タイトル: {title}
概要: {overview}
要約: {summary}

【キャラクター設定】
{cast}
【出力形式】
以下のJSON形式のみで回答してください：
{{
  "scores": {{
{scores}
  }},
  "reviews": {{
{reviews}
  }}
}}"#,
        title = story.title,
        overview = story.overview,
        summary = story.summary_items.join(" "),
    )
}

pub fn user_roundtable(story: &SelectedStory, panel: &Panel) -> String {
    let mut stances = String::new();
    let mut ids = Vec::new();
    let mut left = Vec::new();
    let mut right = Vec::new();
    for (persona, verdict) in panel.iter() {
        let _ = writeln!(
            stances,
            "- {}（{}点）: {}",
            persona.display_name(),
            verdict.score,
            truncate_chars(&verdict.review, STANCE_EXCERPT_CHARS)
        );
        ids.push(format!("{}={}", persona.id(), persona.display_name()));
        match persona.seat() {
            Side::Left => left.push(persona.display_name()),
            Side::Right => right.push(persona.display_name()),
        }
    }

    format!(r#"あなたは「The Jury」というAIニュースレビューブログの編集AIです。
以下のニュースについて、6名による激論座談会（チャット形式）と格言を生成してください。

【ニュース】{title}

【各キャラのレビュー要旨】（座談会での発言はこの立場・点数と矛盾しないこと）
{stances}
【ルール】
- 16ターン以上
- 意見の対立構造を作ること（特に「石橋 vs ゼロ」「黒字 vs 規律」）
- 石橋（老害）の意見は一見理不尽だが現場視点では一理ある内容にすること
- 最後はコンサル（黒字）かハッカー（ゼロ）が未来への示唆で強引に締めること
- 口語体で感情的に

【キャラID】{ids}

【出力形式】JSON形式のみで回答：
{{
  "chat_log": [
    ["キャラID", "left または right", "発言内容"],
    ...
  ],
  "quote": "本日の格言（読者の行動を促す一言、HTMLの<br>タグ使用可）"
}}

※ leftは左寄り（{left}）、rightは右寄り（{right}）"#,
        title = story.title,
        ids = ids.join(", "),
        left = left.join("・"),
        right = right.join("・"),
    )
}

/// First `max` characters, with an ellipsis when something was cut.
pub fn truncate_chars(s: &str, max: usize) -> String {
    let s = s.trim();
    match s.char_indices().nth(max) {
        Some((cut, _)) => format!("{}…", &s[..cut]),
        None => s.to_string(),
    }
}
