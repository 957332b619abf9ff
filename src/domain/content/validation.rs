//! 发布前校验
//!
//! 收集全部违规项后一起返回，而不是遇到第一个就停止。

use thiserror::Error;

use super::{Content, ContentBody};
use crate::domain::ordering::{duplicate_orders, sorted_by_order};

/// 单条违规
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Violation {
    /// 标题为空白
    #[error("标题不能为空")]
    MissingTitle,

    /// 没有任何音频（无平铺轨道，也无章节）
    #[error("至少需要一条音频")]
    NoAudio,

    /// 这些章节（按 order 升序）没有音频
    #[error("以下章节缺少音频: {}", .0.join(", "))]
    ChapterMissingAudio(Vec<String>),

    /// 多个章节使用了相同的 order
    #[error("章节 order 重复: {}", join_orders(.0))]
    DuplicateChapterOrder(Vec<u32>),

    /// 同一列表中多条轨道使用了相同的 order；chapter 为 None 表示平铺轨道
    #[error("{}轨道 order 重复: {}", chapter_label(.chapter), join_orders(.orders))]
    DuplicateTrackOrder {
        chapter: Option<String>,
        orders: Vec<u32>,
    },
}

fn join_orders(orders: &[u32]) -> String {
    orders
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn chapter_label(chapter: &Option<String>) -> String {
    chapter
        .as_ref()
        .map(|title| format!("章节 \"{}\" 的", title))
        .unwrap_or_default()
}

/// 校验失败：包含所有违规项
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", join_messages(.0))]
pub struct ValidationErrors(Vec<Violation>);

fn join_messages(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(Violation::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationErrors {
    pub fn violations(&self) -> &[Violation] {
        &self.0
    }

    pub fn contains(&self, violation: &Violation) -> bool {
        self.0.contains(violation)
    }
}

/// 校验内容是否可以发布
///
/// order 必须在各自列表内唯一，否则上传步骤无法唯一定位。
pub fn validate_for_publish(content: &Content) -> Result<(), ValidationErrors> {
    let mut violations = Vec::new();

    if content.title().trim().is_empty() {
        violations.push(Violation::MissingTitle);
    }

    match content.body() {
        ContentBody::Flat { tracks } if tracks.is_empty() => {
            violations.push(Violation::NoAudio);
        }
        ContentBody::Flat { tracks } => {
            let orders = duplicate_orders(tracks);
            if !orders.is_empty() {
                violations.push(Violation::DuplicateTrackOrder {
                    chapter: None,
                    orders,
                });
            }
        }
        ContentBody::Chaptered { chapters } if chapters.is_empty() => {
            violations.push(Violation::NoAudio);
        }
        ContentBody::Chaptered { chapters } => {
            let missing: Vec<String> = sorted_by_order(chapters)
                .into_iter()
                .filter(|chapter| !chapter.has_audio())
                .map(|chapter| chapter.title().to_string())
                .collect();
            if !missing.is_empty() {
                violations.push(Violation::ChapterMissingAudio(missing));
            }

            let orders = duplicate_orders(chapters);
            if !orders.is_empty() {
                violations.push(Violation::DuplicateChapterOrder(orders));
            }

            for chapter in sorted_by_order(chapters) {
                let orders = duplicate_orders(chapter.tracks());
                if !orders.is_empty() {
                    violations.push(Violation::DuplicateTrackOrder {
                        chapter: Some(chapter.title().to_string()),
                        orders,
                    });
                }
            }
        }
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(ValidationErrors(violations))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::content::{AudioTrack, Chapter, SourceLocator};

    fn track(name: &str) -> AudioTrack {
        AudioTrack::new(name, SourceLocator::from(name), 1)
    }

    #[test]
    fn test_valid_flat_content() {
        let content = Content::flat("标题", vec![track("a.mp3")]);
        assert!(validate_for_publish(&content).is_ok());
    }

    #[test]
    fn test_blank_title_and_no_audio_reported_together() {
        let content = Content::new("   ");
        let errors = validate_for_publish(&content).unwrap_err();
        assert_eq!(
            errors.violations(),
            &[Violation::MissingTitle, Violation::NoAudio]
        );
    }

    #[test]
    fn test_empty_flat_list_is_no_audio() {
        let content = Content::flat("标题", Vec::new());
        let errors = validate_for_publish(&content).unwrap_err();
        assert_eq!(errors.violations(), &[Violation::NoAudio]);
    }

    #[test]
    fn test_chapter_missing_audio_names_exact_chapter() {
        let first = Chapter::new("有音频")
            .unwrap()
            .with_tracks(vec![track("a.mp3")])
            .with_order(0);
        let second = Chapter::new("没音频").unwrap().with_order(1);
        let content = Content::chaptered("标题", vec![first, second]);

        let errors = validate_for_publish(&content).unwrap_err();
        assert_eq!(
            errors.violations(),
            &[Violation::ChapterMissingAudio(vec!["没音频".to_string()])]
        );
    }

    #[test]
    fn test_missing_chapters_listed_by_order() {
        let content = Content::chaptered(
            "标题",
            vec![
                Chapter::new("丙").unwrap().with_order(2),
                Chapter::new("甲").unwrap().with_order(0),
                Chapter::new("乙")
                    .unwrap()
                    .with_tracks(vec![track("a.mp3")])
                    .with_order(1),
            ],
        );

        let errors = validate_for_publish(&content).unwrap_err();
        assert!(errors.contains(&Violation::ChapterMissingAudio(vec![
            "甲".to_string(),
            "丙".to_string()
        ])));
    }

    #[test]
    fn test_default_chapter_orders_collide() {
        let content = Content::chaptered(
            "标题",
            vec![
                Chapter::new("A").unwrap().with_tracks(vec![track("a.mp3")]),
                Chapter::new("B").unwrap().with_tracks(vec![track("b.mp3")]),
            ],
        );

        let errors = validate_for_publish(&content).unwrap_err();
        assert_eq!(
            errors.violations(),
            &[Violation::DuplicateChapterOrder(vec![0])]
        );
    }

    #[test]
    fn test_duplicate_track_orders_reported_per_list() {
        let chapter = Chapter::new("一")
            .unwrap()
            .with_tracks(vec![track("a.mp3"), track("b.mp3")]);
        let content = Content::chaptered("标题", vec![chapter]);
        let errors = validate_for_publish(&content).unwrap_err();
        assert_eq!(
            errors.violations(),
            &[Violation::DuplicateTrackOrder {
                chapter: Some("一".to_string()),
                orders: vec![0],
            }]
        );

        let flat = Content::flat(
            "标题",
            vec![
                track("a.mp3").with_order(1),
                track("b.mp3").with_order(1),
                track("c.mp3"),
            ],
        );
        let errors = validate_for_publish(&flat).unwrap_err();
        assert_eq!(
            errors.violations(),
            &[Violation::DuplicateTrackOrder {
                chapter: None,
                orders: vec![1],
            }]
        );
        assert_eq!(errors.to_string(), "轨道 order 重复: 1");
    }

    #[test]
    fn test_messages_joined() {
        let errors = validate_for_publish(&Content::new(" ")).unwrap_err();
        assert_eq!(errors.to_string(), "标题不能为空; 至少需要一条音频");
    }
}
