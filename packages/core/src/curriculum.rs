//! 课程数据提供者
//!
//! 会话启动时拿到的是条目列表的快照，提供者之后修改自己的数据不会影响进行中的会话。

use std::collections::HashMap;

use crate::topic::Topic;
use crate::types::LearningItem;

pub trait CurriculumProvider: Send + Sync {
    /// 查找主题的有序条目；未收录的主题返回 None
    fn lookup(&self, topic: Topic) -> Option<Vec<LearningItem>>;
}

/// 内置课程表
#[derive(Debug, Clone)]
pub struct BuiltinCurriculum {
    topics: HashMap<Topic, Vec<LearningItem>>,
}

impl BuiltinCurriculum {
    pub fn new() -> Self {
        let topics = Topic::ALL
            .iter()
            .map(|topic| (*topic, builtin_items(*topic)))
            .collect();
        Self { topics }
    }

    /// 空课程表，用于测试或完全自定义的内容
    pub fn empty() -> Self {
        Self {
            topics: HashMap::new(),
        }
    }

    /// 替换 (或新增) 某个主题的条目
    pub fn with_topic(mut self, topic: Topic, items: Vec<LearningItem>) -> Self {
        self.topics.insert(topic, items);
        self
    }

    pub fn set_topic(&mut self, topic: Topic, items: Vec<LearningItem>) {
        self.topics.insert(topic, items);
    }
}

impl Default for BuiltinCurriculum {
    fn default() -> Self {
        Self::new()
    }
}

impl CurriculumProvider for BuiltinCurriculum {
    fn lookup(&self, topic: Topic) -> Option<Vec<LearningItem>> {
        self.topics.get(&topic).cloned()
    }
}

fn items(entries: &[(&str, &str)]) -> Vec<LearningItem> {
    entries
        .iter()
        .map(|(content, example)| LearningItem::with_example(*content, *example))
        .collect()
}

fn builtin_items(topic: Topic) -> Vec<LearningItem> {
    match topic {
        Topic::Tracing => items(&[
            ("A", "Apple 🍎"),
            ("B", "Ball ⚽"),
            ("C", "Cat 🐱"),
            ("D", "Dog 🐶"),
            ("E", "Egg 🥚"),
        ]),
        Topic::Letters => items(&[
            ("A", "A is for Apple 🍎"),
            ("B", "B is for Bear 🐻"),
            ("C", "C is for Cat 🐱"),
            ("D", "D is for Duck 🦆"),
            ("E", "E is for Elephant 🐘"),
            ("F", "F is for Fish 🐟"),
            ("G", "G is for Grapes 🍇"),
            ("H", "H is for Hat 🎩"),
        ]),
        Topic::SightWords => items(&[
            ("the", "the sun ☀️"),
            ("and", "you and me 🤝"),
            ("see", "I see you 👀"),
            ("go", "go go go 🚗"),
            ("is", "it is big 🐘"),
            ("we", "we play 🧸"),
        ]),
        Topic::Spelling => items(&[
            ("cat", "Meow 🐱"),
            ("dog", "Woof 🐶"),
            ("sun", "Hot and bright ☀️"),
            ("hat", "On my head 🧢"),
            ("bus", "Beep beep 🚌"),
            ("cup", "Drink from it 🥤"),
            ("pig", "Oink 🐷"),
            ("bed", "Time to sleep 🛏️"),
        ]),
        Topic::Numbers => items(&[
            ("1", "one ☝️"),
            ("2", "two ✌️"),
            ("3", "three 🍓🍓🍓"),
            ("4", "four 🍀"),
            ("5", "five 🖐️"),
            ("6", "six 🎲"),
            ("7", "seven 🌈"),
            ("8", "eight 🐙"),
            ("9", "nine 🎳"),
            ("10", "ten 🔟"),
        ]),
        Topic::Food => items(&[
            ("apple", "🍎"),
            ("banana", "🍌"),
            ("bread", "🍞"),
            ("milk", "🥛"),
            ("egg", "🥚"),
            ("cheese", "🧀"),
        ]),
        Topic::Clothes => items(&[
            ("shirt", "👕"),
            ("shoes", "👟"),
            ("hat", "👒"),
            ("socks", "🧦"),
            ("dress", "👗"),
            ("coat", "🧥"),
        ]),
        Topic::Toys => items(&[
            ("ball", "⚽"),
            ("doll", "🪆"),
            ("blocks", "🧱"),
            ("car", "🚗"),
            ("teddy bear", "🧸"),
            ("kite", "🪁"),
        ]),
        Topic::Weather => items(&[
            ("sunny", "☀️"),
            ("rainy", "🌧️"),
            ("cloudy", "☁️"),
            ("windy", "🌬️"),
            ("snowy", "❄️"),
        ]),
        Topic::Seasons => items(&[
            ("spring", "🌷"),
            ("summer", "🏖️"),
            ("autumn", "🍂"),
            ("winter", "⛄"),
        ]),
        Topic::BodyParts => items(&[
            ("head", "🙂"),
            ("hand", "✋"),
            ("nose", "👃"),
            ("eyes", "👀"),
            ("ears", "👂"),
            ("feet", "🦶"),
        ]),
        Topic::Family => items(&[
            ("mom", "👩"),
            ("dad", "👨"),
            ("sister", "👧"),
            ("brother", "👦"),
            ("grandma", "👵"),
            ("grandpa", "👴"),
            ("baby", "👶"),
        ]),
        Topic::Feelings => items(&[
            ("happy", "😊"),
            ("sad", "😢"),
            ("angry", "😠"),
            ("scared", "😨"),
            ("tired", "😴"),
            ("excited", "🤩"),
        ]),
        Topic::Shapes => items(&[
            ("circle", "⚪"),
            ("square", "🟥"),
            ("triangle", "🔺"),
            ("star", "⭐"),
            ("heart", "❤️"),
            ("rectangle", "▬"),
        ]),
        Topic::Colors => items(&[
            ("red", "🍎"),
            ("blue", "🫐"),
            ("green", "🥦"),
            ("yellow", "🍋"),
            ("orange", "🍊"),
            ("purple", "🍇"),
        ]),
    }
}
