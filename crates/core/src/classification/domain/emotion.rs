use std::fmt;

/// The closed emotion vocabulary the classifier is decoded into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Emotion {
    Surprise,
    Fear,
    Angry,
    Neutral,
    Sad,
    Disgust,
    Happy,
}

/// Upper bounds (exclusive) of the score bands, in order. Anything outside
/// `[0, 5.5)` falls through to `Happy`.
const BANDS: [(f32, Emotion); 6] = [
    (0.5, Emotion::Surprise),
    (1.5, Emotion::Fear),
    (2.5, Emotion::Angry),
    (3.5, Emotion::Neutral),
    (4.5, Emotion::Sad),
    (5.5, Emotion::Disgust),
];

impl Emotion {
    pub const ALL: [Emotion; 7] = [
        Emotion::Surprise,
        Emotion::Fear,
        Emotion::Angry,
        Emotion::Neutral,
        Emotion::Sad,
        Emotion::Disgust,
        Emotion::Happy,
    ];

    /// Decodes a regression score into an emotion.
    ///
    /// Total over `f32`: negative scores, scores at or above 5.5, and NaN
    /// all map to `Happy`.
    pub fn from_score(score: f32) -> Emotion {
        if score.is_nan() || score < 0.0 {
            return Emotion::Happy;
        }
        BANDS
            .iter()
            .find(|(upper, _)| score < *upper)
            .map(|&(_, emotion)| emotion)
            .unwrap_or(Emotion::Happy)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Emotion::Surprise => "Surprise",
            Emotion::Fear => "Fear",
            Emotion::Angry => "Angry",
            Emotion::Neutral => "Neutral",
            Emotion::Sad => "Sad",
            Emotion::Disgust => "Disgust",
            Emotion::Happy => "Happy",
        }
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
