//! One-line descriptions of the 16 types.

use crate::dimension::PersonalityType;

const FALLBACK: &str = "A unique personality type!";

const DESCRIPTIONS: [(&str, &str); 16] = [
    ("INTJ", "The Architect - Strategic, independent, and highly analytical. You see patterns others miss and plan for the future."),
    ("INTP", "The Logician - Innovative, curious, and philosophical. You love exploring abstract theories and solving complex problems."),
    ("ENTJ", "The Commander - Bold, decisive, and natural-born leaders. You excel at organizing people and resources efficiently."),
    ("ENTP", "The Debater - Quick-witted, clever, and innovative. You enjoy intellectual challenges and thinking outside the box."),
    ("INFJ", "The Advocate - Idealistic, organized, and insightful. You understand people deeply and work toward meaningful change."),
    ("INFP", "The Mediator - Empathetic, creative, and idealistic. You follow your values and seek authenticity in all you do."),
    ("ENFJ", "The Protagonist - Charismatic, inspiring, and altruistic. You naturally bring out the best in others."),
    ("ENFP", "The Campaigner - Enthusiastic, creative, and sociable. You see life as full of possibilities and connections."),
    ("ISTJ", "The Logistician - Practical, fact-minded, and reliable. You value tradition, order, and getting things done right."),
    ("ISFJ", "The Defender - Dedicated, warm, and protective. You care deeply about others and maintain harmony."),
    ("ESTJ", "The Executive - Organized, practical, and traditional. You excel at managing tasks and leading with clear standards."),
    ("ESFJ", "The Consul - Caring, social, and popular. You create warm, welcoming environments and help others feel valued."),
    ("ISTP", "The Virtuoso - Bold, practical, and experimental. You master tools and techniques through hands-on experience."),
    ("ISFP", "The Adventurer - Flexible, charming, and artistic. You live in the moment and appreciate beauty in all forms."),
    ("ESTP", "The Entrepreneur - Energetic, perceptive, and direct. You thrive on action and adapt quickly to any situation."),
    ("ESFP", "The Entertainer - Spontaneous, energetic, and enthusiastic. You bring excitement and joy wherever you go."),
];

pub fn describe(personality_type: &PersonalityType) -> &'static str {
    let label = personality_type.as_string();
    DESCRIPTIONS
        .iter()
        .find(|(t, _)| *t == label)
        .map(|(_, d)| *d)
        .unwrap_or(FALLBACK)
}
