use crate::model::LessonId;

/// One node on the unit map.
///
/// Node ids double as lesson ids: a node is unlocked when its id is at or
/// below the learner's `current_level`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelNode {
    pub id: u64,
    pub topic: &'static str,
    pub icon: &'static str,
}

/// The fixed demo course, in map order.
pub const LEVEL_NODES: &[LevelNode] = &[
    LevelNode { id: 1, topic: "Basics 1", icon: "🥚" },
    LevelNode { id: 2, topic: "Greetings", icon: "👋" },
    LevelNode { id: 3, topic: "Travel", icon: "✈️" },
    LevelNode { id: 4, topic: "Food", icon: "🥐" },
    LevelNode { id: 5, topic: "Family", icon: "👨‍👩‍👧" },
    LevelNode { id: 6, topic: "Shopping", icon: "🛍️" },
    LevelNode { id: 7, topic: "Activities", icon: "⚽" },
];

/// Topic used to request lesson content for the given lesson id.
///
/// Unknown ids fall back to a generic topic rather than failing.
#[must_use]
pub fn topic_for(id: LessonId) -> &'static str {
    LEVEL_NODES
        .iter()
        .find(|node| node.id == id.value())
        .map_or("Basics", |node| node.topic)
}
