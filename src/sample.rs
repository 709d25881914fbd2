//! Vol.001, the hand-written launch issue. Everything here is fixed data; no
//! model call is involved in rendering it.

use crate::models::{Roundtable, RoundtableEntry, SelectedStory, Side, SourceLink, Tag, Volume};
use crate::persona::{Panel, Persona, Verdict};

pub const SAMPLE_VOLUME: Volume = Volume(1);
pub const SAMPLE_PUBLISH_DATE: &str = "2026年2月19日";

const SCORES: [i32; 6] = [4, 9, 8, 6, 7, 5];

const REVIEWS: [&str; 6] = [
    "また妙な新技術か。Seedance 2.0？名前だけ聞くとハイテクだが、実態は不安定な動画生成AIで、現場で使えるわけがない。著作権侵害の問題も含めて、まだ時期尚早だ。昔も「デジタル革命で映画は変わる」と騒いで、結局現場は混乱した。誰が責任取るんだ？",
    "Seedance 2.0のアーキテクチャ、マジでヤバい。Diffusion Transformerベースで時間軸の一貫性を保ちながら15秒の動画を生成できるって、昔のCGパイプラインが泣くレベル。著作権侵害問題？そんなのは技術の進化の副作用に過ぎない。これが本当のゲームチェンジャーだ。",
    "Seedance 2.0は単なる技術ではない。コンテンツ産業の覇権構造を根底から変えるゲームチェンジャーだ。映画制作コストがテキスト数行で代替可能になる世界のROIを考えてみろ。重要なのは誰が最初にコンテンツ供給プラットフォームの覇権を握るかだ。",
    "リアルタイム動画生成はネットワーク帯域とレイテンシの観点で非常に厳しい。15秒の動画生成でどれだけのGPUリソースとI/Oが必要か考えたことあるか？通信インフラの整備が追いつかない限り、現場での実用化は遠い話だ。インフラが死んだら全部終わりだ。",
    "Seedance 2.0ってすごく便利そうだけど、なんだか怖いですね…。好きな俳優さんやアニメのキャラクターが勝手に使われてるって聞くと、ちょっとモヤモヤします。え、私の仕事もなくなる？でも社内の資料作りとかには使えそう…。",
    "Seedance 2.0の無断キャラクター利用は明確な著作権侵害であり、法的リスクは極めて高い。EUのAI Actの観点からも、学習データの透明性開示義務に抵触する可能性が高い。日本では著作権法30条の4の適用範囲が問われる。ガバナンスが効かない技術は使ってはいけない。",
];

const CHAT_LOG: &[(Persona, Side, &str)] = &[
    (Persona::Ishibashi, Side::Left, "またこんな新技術か。Seedance 2.0？現場で使えるかって話だよ。著作権問題は深刻だし、安定もしていない。"),
    (Persona::Zero, Side::Right, "はあ？石橋さん、その考えは古すぎる。テキスト2行でトム・クルーズが動き出すんですよ？まだ手作業でCG合成やってるんですか？"),
    (Persona::Ishibashi, Side::Left, "技術だけじゃ飯は食えんよ。現場は安定第一。で、誰が著作権侵害の責任取るんだ？お前か？"),
    (Persona::Kokuji, Side::Right, "安定も大事だが、それ以上に市場を取ることが急務だ。ライセンス契約モデルを構築すれば、これは金になる。"),
    (Persona::Kitsu, Side::Left, "待て。無断利用は著作権侵害で訴訟リスクが高い。法的基盤が整わなければ、いくらROIが良くても企業は損失を被る。"),
    (Persona::Zero, Side::Right, "法は技術の進化に追いついていないだけ。技術は止まらない。イノベーションは混乱なしには語れない。"),
    (Persona::Packet, Side::Left, "リアルタイム動画生成は帯域とレイテンシで足を引っ張られる。クラウド依存ならオンプレ現場ではまともなSLAが出せないぞ。"),
    (Persona::Pure, Side::Right, "あの…便利そうだけど、勝手にキャラを使うのは怖いなあ…。え、私の仕事もなくなる？"),
    (Persona::Ishibashi, Side::Left, "ピュア君の言う通りだ。倫理も守れない技術は結局現場で嫌われる。焦る必要はない。"),
    (Persona::Kokuji, Side::Right, "CGの登場で映画産業は縮小しましたか？むしろ市場規模は拡大した。先行者利益を取るのが正解だ。"),
    (Persona::Kitsu, Side::Left, "黒字さん、無秩序な利用は業界全体の信用を失う。政府が動き始めたら、規制は一気に厳しくなるぞ。"),
    (Persona::Zero, Side::Right, "規律さんも石橋さんも古い頭だな。これを使いこなせる人間が次の時代を作る。"),
    (Persona::Packet, Side::Left, "自由度もいいが、インフラが追いつかないと宝の持ち腐れだ。遅延が許容範囲外だ。"),
    (Persona::Pure, Side::Right, "みんな意見が違って面白い…。とりあえず何か作ってみようかな…著作権的に大丈夫なやつで。"),
    (Persona::Kokuji, Side::Right, "まとめると、リスクはある。だが積極的に攻めない限り市場で負ける。未来は強者が作るんだ。"),
    (Persona::Zero, Side::Right, "そうだ。コードを書けばわかる。これは止められない革命だ。乗り遅れるな。"),
];

/// The launch issue's panel: scores 4, 9, 8, 6, 7, 5 (total 6.5).
pub fn sample_panel() -> Panel {
    let mut panel = Panel::default();
    for ((persona, score), review) in Persona::ALL.into_iter().zip(SCORES).zip(REVIEWS) {
        panel.set(
            persona,
            Verdict {
                score,
                review: review.to_string(),
            },
        );
    }
    panel
}

pub fn sample_story() -> SelectedStory {
    SelectedStory {
        title: "【衝撃】中国発AI「Seedance 2.0」がハリウッドを破壊する日".into(),
        title_html: r#"【衝撃】中国発AI「<span class="highlight">Seedance 2.0</span>」がハリウッドを破壊する日"#.into(),
        hero_lead: "ByteDanceが放った動画生成AIが、ハリウッドと日本のアニメ業界を同時に震撼させた。<br>テキスト2行でトム・クルーズが動き出す。これはもう、映画産業の終わりの始まりなのか？".into(),
        overview: "ByteDanceの動画生成AI「Seedance 2.0」が、俳優やアニメキャラクターを無断で再現した動画の拡散をきっかけに、ハリウッドと日本の業界団体から強い反発を受けている。".into(),
        summary_items: vec![
            "TikTok親会社ByteDanceが開発した動画生成AI「Seedance 2.0」が、テキスト指示だけで映画品質の動画を生成できるとして話題となった。".into(),
            "有名俳優やディズニーキャラクター、日本のアニメキャラを無断使用した動画がSNSに溢れ、ハリウッドの業界団体が強烈に反発。".into(),
            "大手スタジオが停止通告書を送付し、著作権・AI倫理をめぐる国際的な法的闘争へと発展しつつある。".into(),
        ],
        tags: vec![
            Tag { category: "tag-hot".into(), label: "衝撃".into() },
            Tag { category: "tag-copyright".into(), label: "著作権".into() },
            Tag { category: "tag-regulation".into(), label: "AI規制".into() },
        ],
        short_blurb: "ByteDance「Seedance 2.0」が著作権侵害問題でハリウッドを震撼。6名のAIキャラが辛口クロスレビュー。".into(),
        sources: vec![
            SourceLink::new("TechCrunch", "https://techcrunch.com/"),
            SourceLink::new("ITmedia AI+", "https://www.itmedia.co.jp/aiplus/"),
        ],
    }
}

pub fn sample_roundtable() -> Roundtable {
    Roundtable {
        entries: CHAT_LOG
            .iter()
            .map(|&(persona, side, utterance)| RoundtableEntry {
                persona,
                side,
                utterance: utterance.to_string(),
            })
            .collect(),
        quote: "「技術革新はリスクとチャンスの二刀流。<br>恐れず挑まなければ、未来は奪われる。」".into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn launch_panel_totals_six_point_five() {
        let panel = sample_panel();
        assert_eq!(panel.total_score(), 6.5);
        assert!(panel.iter().all(|(_, v)| !v.review.is_empty()));
    }

    #[test]
    fn launch_roundtable_has_sixteen_turns_from_every_persona() {
        let roundtable = sample_roundtable();
        assert_eq!(roundtable.entries.len(), 16);
        for persona in Persona::ALL {
            assert!(roundtable.entries.iter().any(|e| e.persona == persona));
        }
    }
}
