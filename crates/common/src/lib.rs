use std::collections::HashMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// The twelve earthly branches in chart order. Plate layers and the
/// hidden-stem table are indexed by position in this array.
pub const BRANCHES: [&str; 12] = [
    "子", "丑", "寅", "卯", "辰", "巳", "午", "未", "申", "酉", "戌", "亥",
];

/// Sentinel used by the chart collaborator for an absent 丁马/天马 marker.
pub const ABSENT_MARKER: &str = "--";

/// Querent gender. Wire representation is the number 0 (female) or 1 (male).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    Female,
    Male,
}

impl Gender {
    /// Chinese label used in rendered output.
    pub fn label(self) -> &'static str {
        match self {
            Gender::Female => "女",
            Gender::Male => "男",
        }
    }
}

impl TryFrom<i64> for Gender {
    type Error = ();

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Gender::Female),
            1 => Ok(Gender::Male),
            _ => Err(()),
        }
    }
}

/// Calendar-derived attributes of the chart moment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DateInfo {
    /// Eight-character (八字) string for the moment.
    pub bazi: String,
    /// Void branches (时空) for the current cycle.
    pub kong: Vec<String>,
    /// Month general (月将).
    pub yuejiang: String,
    /// Decade cycle (旬).
    pub xun: String,
    /// Post horse (驿马).
    pub yima: String,
    /// Ding horse (丁马); [`ABSENT_MARKER`] when not present.
    pub dingma: String,
    /// Heaven horse (天马); [`ABSENT_MARKER`] when not present.
    pub tianma: String,
}

/// The heaven/earth plate layers, indexed by branch position 0–11.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plate {
    pub earth: [String; 12],
    pub heaven: [String; 12],
    pub generals: [String; 12],
}

/// One of the four lessons (四课).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lesson {
    pub text: String,
    pub general: String,
}

/// One of the three transmissions (三传).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transmission {
    pub branch: String,
    pub general: String,
    /// Six-relation (六亲) attribution.
    pub relation: String,
    /// Hidden stem (遁干) riding the transmission.
    pub hidden_stem: String,
}

/// The three transmissions plus the derived lesson-body classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transmissions {
    pub rows: [Transmission; 3],
    /// Classification of the chart body (课体).
    pub category: String,
}

/// Spirit annotations (神煞). Each field is present only when the spirit
/// lands in the chart; rendering preserves this declaration order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Spirits {
    pub ri_de: Option<String>,
    pub ri_lu: Option<String>,
    pub sheng_qi: Option<String>,
    pub si_qi: Option<String>,
    pub po_sui: Option<String>,
    pub sang_men: Option<String>,
    pub diao_ke: Option<String>,
}

impl Spirits {
    /// Present annotations as `(label, value)` pairs in fixed order.
    pub fn present(&self) -> Vec<(&'static str, &str)> {
        [
            ("日德", &self.ri_de),
            ("日禄", &self.ri_lu),
            ("生气", &self.sheng_qi),
            ("死气", &self.si_qi),
            ("破碎", &self.po_sui),
            ("丧门", &self.sang_men),
            ("吊客", &self.diao_ke),
        ]
        .into_iter()
        .filter_map(|(label, value)| value.as_deref().map(|v| (label, v)))
        .collect()
    }
}

/// Complete chart produced by the divination collaborator for one moment.
/// This is the exact field set the renderer consumes; the collaborator
/// validates it once at the boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartResult {
    pub date_info: DateInfo,
    pub plate: Plate,
    pub lessons: [Lesson; 4],
    pub transmissions: Transmissions,
    /// Hidden stems (遁干) keyed by branch name. A missing or empty entry
    /// renders as a blank cell.
    pub hidden_stems: HashMap<String, String>,
    pub spirits: Spirits,
}

/// Year-fate (年命) attributes for a birth date. All fields optional; the
/// renderer drops rows for absent ones.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct YearFate {
    pub year: Option<String>,
    pub gender: Option<String>,
    /// Current-cycle (流年) label.
    pub cycle: Option<String>,
}

/// Failure from the content-deployment collaborator. The kind is tagged at
/// the collaborator boundary; callers must not infer it from message text.
#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    #[error("storage backend failure: {message}")]
    Storage { message: String },

    #[error("{message}")]
    Other { message: String },
}

/// Failure from the divination collaborator.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct DivinationError {
    pub message: String,
}

impl DivinationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Deploys content to public storage and returns the URL it is served at.
#[async_trait::async_trait]
pub trait ContentStore: Send + Sync {
    async fn deploy(&self, content: &str, base_url: &str) -> Result<String, DeployError>;
}

/// Computes divination charts and year fates. Pure calendar math; calls are
/// synchronous and side-effect free.
pub trait DivinationEngine: Send + Sync {
    fn chart(&self, at: NaiveDateTime) -> Result<ChartResult, DivinationError>;

    fn year_fate(&self, birth: NaiveDateTime, gender: Gender) -> Result<YearFate, DivinationError>;
}
