//! 上传计划
//!
//! 把一个 Content 展开为确定的远端上传序列：
//! 图标 → 封面 → 按 order 遍历章节（章节图标 → 按 order 遍历轨道）；
//! 平铺模式下按 order 遍历轨道。容器创建不在计划内，它先于计划执行。

use serde::{Deserialize, Serialize};

use super::{AssetKind, AudioTrack, Content, ContentBody};
use crate::domain::ordering::{sorted_by_order, Ordered};

/// 一个上传步骤的标识：资源类型 + 所在章节/轨道的 order
///
/// 失败时据此精确定位需要重试的部分。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UploadStep {
    pub kind: AssetKind,
    pub chapter_order: Option<u32>,
    pub track_order: Option<u32>,
}

impl UploadStep {
    pub fn icon() -> Self {
        Self {
            kind: AssetKind::Icon,
            chapter_order: None,
            track_order: None,
        }
    }

    pub fn cover() -> Self {
        Self {
            kind: AssetKind::Cover,
            chapter_order: None,
            track_order: None,
        }
    }

    pub fn chapter_icon(chapter_order: u32) -> Self {
        Self {
            kind: AssetKind::ChapterIcon { chapter_order },
            chapter_order: Some(chapter_order),
            track_order: None,
        }
    }

    pub fn chapter_track(chapter_order: u32, track_order: u32) -> Self {
        Self {
            kind: AssetKind::Audio,
            chapter_order: Some(chapter_order),
            track_order: Some(track_order),
        }
    }

    pub fn track(track_order: u32) -> Self {
        Self {
            kind: AssetKind::Audio,
            chapter_order: None,
            track_order: Some(track_order),
        }
    }

    /// 是否在上传计划中排在 other 之前
    pub fn precedes(&self, other: &UploadStep) -> bool {
        self.sequence_key() < other.sequence_key()
    }

    /// 图标 → 封面 → 按章节（章节图标 → 轨道），平铺轨道视为第 0 章的轨道
    fn sequence_key(&self) -> (u8, u32, u8, u32) {
        match self.kind {
            AssetKind::Icon => (0, 0, 0, 0),
            AssetKind::Cover => (1, 0, 0, 0),
            _ => (
                2,
                self.chapter_order.unwrap_or(0),
                u8::from(self.track_order.is_some()),
                self.track_order.unwrap_or(0),
            ),
        }
    }
}

impl std::fmt::Display for UploadStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.chapter_order, self.track_order) {
            (Some(chapter), Some(track)) => write!(f, "chapter {} track {}", chapter, track),
            (None, Some(track)) => write!(f, "track {}", track),
            (Some(chapter), None) => write!(f, "chapter {} icon", chapter),
            (None, None) => write!(f, "{}", self.kind),
        }
    }
}

impl std::str::FromStr for UploadStep {
    type Err = String;

    /// 解析 Display 的输出，例如 "cover"、"track 2"、"chapter 1 icon"、"chapter 1 track 0"
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let words: Vec<&str> = text.split_whitespace().collect();
        let number = |word: &str| {
            word.parse::<u32>()
                .map_err(|_| format!("invalid order '{}' in step '{}'", word, text))
        };

        match words.as_slice() {
            ["icon"] => Ok(Self::icon()),
            ["cover"] => Ok(Self::cover()),
            ["track", track] => Ok(Self::track(number(*track)?)),
            ["chapter", chapter, "icon"] => Ok(Self::chapter_icon(number(*chapter)?)),
            ["chapter", chapter, "track", track] => {
                Ok(Self::chapter_track(number(*chapter)?, number(*track)?))
            }
            _ => Err(format!("unrecognized upload step '{}'", text)),
        }
    }
}

/// 待上传的数据来源
#[derive(Debug, Clone, Copy)]
pub enum AssetPayload<'a> {
    /// 内存中的图片字节
    Image(&'a [u8]),
    /// 上传时再读取的音频文件
    Track(&'a AudioTrack),
}

/// 计划中的一次上传
#[derive(Debug, Clone, Copy)]
pub struct PlannedUpload<'a> {
    pub step: UploadStep,
    pub payload: AssetPayload<'a>,
}

impl PlannedUpload<'_> {
    /// 上传时使用的文件名：图片为合成名，音频为原始文件名
    pub fn file_name(&self) -> String {
        match self.payload {
            AssetPayload::Track(track) => track.file_name().to_string(),
            AssetPayload::Image(_) => self
                .step
                .kind
                .synthesized_file_name()
                .unwrap_or_else(|| self.step.kind.as_str().to_string()),
        }
    }
}

/// 完整上传计划
#[derive(Debug, Clone)]
pub struct UploadPlan<'a> {
    uploads: Vec<PlannedUpload<'a>>,
}

impl<'a> UploadPlan<'a> {
    /// 为内容构建上传计划（空图片视为不存在）
    pub fn for_content(content: &'a Content) -> Self {
        let mut uploads = Vec::new();

        if let Some(icon) = non_empty(content.icon()) {
            uploads.push(PlannedUpload {
                step: UploadStep::icon(),
                payload: AssetPayload::Image(icon),
            });
        }

        if let Some(cover) = non_empty(content.cover()) {
            uploads.push(PlannedUpload {
                step: UploadStep::cover(),
                payload: AssetPayload::Image(cover),
            });
        }

        match content.body() {
            ContentBody::Chaptered { chapters } => {
                for chapter in sorted_by_order(chapters) {
                    if let Some(icon) = non_empty(chapter.icon()) {
                        uploads.push(PlannedUpload {
                            step: UploadStep::chapter_icon(chapter.order()),
                            payload: AssetPayload::Image(icon),
                        });
                    }
                    for track in sorted_by_order(chapter.tracks()) {
                        uploads.push(PlannedUpload {
                            step: UploadStep::chapter_track(chapter.order(), track.order()),
                            payload: AssetPayload::Track(track),
                        });
                    }
                }
            }
            ContentBody::Flat { tracks } => {
                for track in sorted_by_order(tracks) {
                    uploads.push(PlannedUpload {
                        step: UploadStep::track(track.order()),
                        payload: AssetPayload::Track(track),
                    });
                }
            }
        }

        Self { uploads }
    }

    pub fn uploads(&self) -> &[PlannedUpload<'a>] {
        &self.uploads
    }

    pub fn len(&self) -> usize {
        self.uploads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.uploads.is_empty()
    }

    /// 步骤在计划中的位置
    pub fn position(&self, step: &UploadStep) -> Option<usize> {
        self.uploads.iter().position(|u| &u.step == step)
    }

    /// 从指定步骤（含）开始的剩余计划
    pub fn remaining_from(&self, step: &UploadStep) -> Option<&[PlannedUpload<'a>]> {
        self.position(step).map(|index| &self.uploads[index..])
    }
}

fn non_empty(data: Option<&[u8]>) -> Option<&[u8]> {
    data.filter(|bytes| !bytes.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::content::{Chapter, SourceLocator};

    fn track(name: &str, order: u32) -> AudioTrack {
        AudioTrack::new(name, SourceLocator::from(name), 1).with_order(order)
    }

    fn steps(plan: &UploadPlan<'_>) -> Vec<UploadStep> {
        plan.uploads().iter().map(|u| u.step).collect()
    }

    fn audio_names(plan: &UploadPlan<'_>) -> Vec<String> {
        plan.uploads()
            .iter()
            .filter(|u| u.step.kind == AssetKind::Audio)
            .map(|u| u.file_name())
            .collect()
    }

    #[test]
    fn test_full_plan_order() {
        let mut first = Chapter::new("一")
            .unwrap()
            .with_tracks(vec![track("b.mp3", 1), track("a.mp3", 0)])
            .with_order(0);
        first.set_icon(Some(vec![1, 2, 3]));
        let second = Chapter::new("二")
            .unwrap()
            .with_tracks(vec![track("c.mp3", 0)])
            .with_order(1);

        let mut content = Content::chaptered("t", vec![second, first]);
        content.set_icon(Some(vec![9]));
        content.set_cover(Some(vec![8]));

        let plan = UploadPlan::for_content(&content);
        assert_eq!(
            steps(&plan),
            vec![
                UploadStep::icon(),
                UploadStep::cover(),
                UploadStep::chapter_icon(0),
                UploadStep::chapter_track(0, 0),
                UploadStep::chapter_track(0, 1),
                UploadStep::chapter_track(1, 0),
            ]
        );
        assert_eq!(plan.uploads()[2].file_name(), "chapter_0_icon.png");
        assert_eq!(audio_names(&plan), vec!["a.mp3", "b.mp3", "c.mp3"]);
    }

    #[test]
    fn test_empty_images_are_skipped() {
        let mut content = Content::flat("t", vec![track("a.mp3", 0)]);
        content.set_icon(Some(Vec::new()));
        content.set_cover(None);

        let plan = UploadPlan::for_content(&content);
        assert_eq!(steps(&plan), vec![UploadStep::track(0)]);
    }

    #[test]
    fn test_flat_and_single_chapter_upload_same_audio_sequence() {
        let tracks = vec![track("c.mp3", 2), track("a.mp3", 0), track("b.mp3", 1)];
        let flat = Content::flat("t", tracks.clone());
        let chaptered = Content::chaptered(
            "t",
            vec![Chapter::new("全部").unwrap().with_tracks(tracks)],
        );

        let flat_plan = UploadPlan::for_content(&flat);
        let chaptered_plan = UploadPlan::for_content(&chaptered);
        assert_eq!(audio_names(&flat_plan), audio_names(&chaptered_plan));
        assert_eq!(audio_names(&flat_plan), vec!["a.mp3", "b.mp3", "c.mp3"]);
    }

    #[test]
    fn test_remaining_from() {
        let content = Content::flat(
            "t",
            vec![track("a.mp3", 0), track("b.mp3", 1), track("c.mp3", 2)],
        );
        let plan = UploadPlan::for_content(&content);

        let rest = plan.remaining_from(&UploadStep::track(1)).unwrap();
        let names: Vec<String> = rest.iter().map(|u| u.file_name()).collect();
        assert_eq!(names, vec!["b.mp3", "c.mp3"]);
        assert!(plan.remaining_from(&UploadStep::track(7)).is_none());
    }

    #[test]
    fn test_step_display() {
        assert_eq!(UploadStep::chapter_track(1, 2).to_string(), "chapter 1 track 2");
        assert_eq!(UploadStep::track(4).to_string(), "track 4");
        assert_eq!(UploadStep::chapter_icon(3).to_string(), "chapter 3 icon");
        assert_eq!(UploadStep::cover().to_string(), "cover");
    }

    #[test]
    fn test_step_parses_its_display_form() {
        for step in [
            UploadStep::icon(),
            UploadStep::cover(),
            UploadStep::chapter_icon(3),
            UploadStep::chapter_track(1, 2),
            UploadStep::track(4),
        ] {
            assert_eq!(step.to_string().parse::<UploadStep>(), Ok(step));
        }
        assert!("chapter x icon".parse::<UploadStep>().is_err());
        assert!("audio".parse::<UploadStep>().is_err());
    }

    #[test]
    fn test_precedes_follows_plan_order() {
        let mut first = Chapter::new("一")
            .unwrap()
            .with_tracks(vec![track("a.mp3", 0), track("b.mp3", 1)])
            .with_order(0);
        first.set_icon(Some(vec![1]));
        let mut second = Chapter::new("二")
            .unwrap()
            .with_tracks(vec![track("c.mp3", 0)])
            .with_order(1);
        second.set_icon(Some(vec![2]));
        let mut content = Content::chaptered("t", vec![second, first]);
        content.set_icon(Some(vec![9]));
        content.set_cover(Some(vec![8]));

        let steps = steps(&UploadPlan::for_content(&content));
        for (i, earlier) in steps.iter().enumerate() {
            for later in &steps[i + 1..] {
                assert!(earlier.precedes(later), "{} before {}", earlier, later);
                assert!(!later.precedes(earlier));
            }
            assert!(!earlier.precedes(earlier));
        }
        assert!(UploadStep::cover().precedes(&UploadStep::track(0)));
    }
}
