//! 主题与分类
//!
//! 主题 id 在会话开始时解析为封闭枚举，未知 id 直接视为找不到主题。

use serde::{Deserialize, Serialize};

use crate::types::ActivityMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Topic {
    Tracing,
    Letters,
    SightWords,
    Spelling,
    Numbers,
    Food,
    Clothes,
    Toys,
    Weather,
    Seasons,
    BodyParts,
    Family,
    Feelings,
    Shapes,
    Colors,
}

impl Topic {
    pub const ALL: [Topic; 15] = [
        Topic::Tracing,
        Topic::Letters,
        Topic::SightWords,
        Topic::Spelling,
        Topic::Numbers,
        Topic::Food,
        Topic::Clothes,
        Topic::Toys,
        Topic::Weather,
        Topic::Seasons,
        Topic::BodyParts,
        Topic::Family,
        Topic::Feelings,
        Topic::Shapes,
        Topic::Colors,
    ];

    /// 按路由中的 id 解析 (区分大小写，与路由保持一致)
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|topic| topic.id() == id)
    }

    pub fn id(&self) -> &'static str {
        match self {
            Topic::Tracing => "tracing",
            Topic::Letters => "letters",
            Topic::SightWords => "sightWords",
            Topic::Spelling => "spelling",
            Topic::Numbers => "numbers",
            Topic::Food => "food",
            Topic::Clothes => "clothes",
            Topic::Toys => "toys",
            Topic::Weather => "weather",
            Topic::Seasons => "seasons",
            Topic::BodyParts => "bodyParts",
            Topic::Family => "family",
            Topic::Feelings => "feelings",
            Topic::Shapes => "shapes",
            Topic::Colors => "colors",
        }
    }

    /// 只有 spelling 主题走拼写模式
    pub fn mode(&self) -> ActivityMode {
        match self {
            Topic::Spelling => ActivityMode::Spelling,
            _ => ActivityMode::Recognition,
        }
    }

    pub fn group(&self) -> CategoryGroup {
        match self {
            Topic::Tracing | Topic::Letters | Topic::SightWords | Topic::Spelling => {
                CategoryGroup::LettersReading
            }
            Topic::Numbers => CategoryGroup::Numbers,
            Topic::Food
            | Topic::Clothes
            | Topic::Toys
            | Topic::Weather
            | Topic::Seasons
            | Topic::BodyParts => CategoryGroup::Everyday,
            Topic::Family | Topic::Feelings => CategoryGroup::People,
            Topic::Shapes | Topic::Colors => CategoryGroup::Art,
        }
    }
}

impl std::fmt::Display for Topic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

/// 仪表盘上的分类卡片
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CategoryGroup {
    LettersReading,
    Numbers,
    Everyday,
    People,
    Art,
}

impl CategoryGroup {
    pub const ALL: [CategoryGroup; 5] = [
        CategoryGroup::LettersReading,
        CategoryGroup::Numbers,
        CategoryGroup::Everyday,
        CategoryGroup::People,
        CategoryGroup::Art,
    ];

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|group| group.id() == id)
    }

    pub fn id(&self) -> &'static str {
        match self {
            CategoryGroup::LettersReading => "letters-reading",
            CategoryGroup::Numbers => "numbers",
            CategoryGroup::Everyday => "everyday",
            CategoryGroup::People => "people",
            CategoryGroup::Art => "art",
        }
    }

    /// 分类下的主题，按展示顺序
    pub fn topics(&self) -> Vec<Topic> {
        Topic::ALL
            .iter()
            .copied()
            .filter(|topic| topic.group() == *self)
            .collect()
    }
}
