use crate::day_id::DayId;
use crate::notify::Notice;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

/// Stored documents may hold `null` or a value of the wrong type where text is
/// expected. Such fields read as their default instead of failing the whole file.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).unwrap_or_default())
}

/// Drops day documents that are not objects at all, keeping the rest of the room.
fn lenient_days<'de, D>(deserializer: D) -> Result<BTreeMap<String, DayRecord>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: BTreeMap<String, serde_json::Value> = lenient(deserializer)?;
    Ok(raw
        .into_iter()
        .filter_map(|(key, value)| match DayRecord::deserialize(value) {
            Ok(record) => Some((key, record)),
            Err(err) => {
                warn!("dropping unreadable day document {key}: {err}");
                None
            }
        })
        .collect())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Husband,
    Wife,
}

impl Role {
    pub const ALL: [Role; 2] = [Role::Husband, Role::Wife];

    pub fn partner(self) -> Role {
        match self {
            Role::Husband => Role::Wife,
            Role::Wife => Role::Husband,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Role::Husband => "Husband",
            Role::Wife => "Wife",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Answers {
    #[serde(deserialize_with = "lenient")]
    pub q1: String,
    #[serde(deserialize_with = "lenient")]
    pub q2: String,
    #[serde(deserialize_with = "lenient")]
    pub q3: String,
    #[serde(deserialize_with = "lenient")]
    pub q4: String,
}

impl Answers {
    fn trimmed(self) -> Self {
        Self {
            q1: self.q1.trim().to_string(),
            q2: self.q2.trim().to_string(),
            q3: self.q3.trim().to_string(),
            q4: self.q4.trim().to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Mood {
    pub emoji: String,
    pub text: String,
}

/// One day document as the store keeps it. Field names follow the persisted layout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DayRecord {
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    pub day_id: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub husband_url: String,
    #[serde(deserialize_with = "lenient")]
    pub wife_url: String,
    #[serde(deserialize_with = "lenient")]
    pub husband_note: String,
    #[serde(deserialize_with = "lenient")]
    pub wife_note: String,
    #[serde(deserialize_with = "lenient")]
    pub husband_answers: Answers,
    #[serde(deserialize_with = "lenient")]
    pub wife_answers: Answers,
    #[serde(deserialize_with = "lenient", rename = "mood_husband_emoji")]
    pub mood_husband_emoji: String,
    #[serde(deserialize_with = "lenient", rename = "mood_husband_text")]
    pub mood_husband_text: String,
    #[serde(deserialize_with = "lenient", rename = "mood_wife_emoji")]
    pub mood_wife_emoji: String,
    #[serde(deserialize_with = "lenient", rename = "mood_wife_text")]
    pub mood_wife_text: String,
}

impl DayRecord {
    pub fn photo_url(&self, role: Role) -> &str {
        match role {
            Role::Husband => &self.husband_url,
            Role::Wife => &self.wife_url,
        }
    }

    pub fn has_photo(&self, role: Role) -> bool {
        !self.photo_url(role).trim().is_empty()
    }

    /// Both partners checked in.
    pub fn is_joint(&self) -> bool {
        self.has_photo(Role::Husband) && self.has_photo(Role::Wife)
    }

    pub fn photo_count(&self) -> u32 {
        Role::ALL.iter().filter(|role| self.has_photo(**role)).count() as u32
    }

    pub fn note(&self, role: Role) -> &str {
        match role {
            Role::Husband => &self.husband_note,
            Role::Wife => &self.wife_note,
        }
    }

    pub fn answers(&self, role: Role) -> &Answers {
        match role {
            Role::Husband => &self.husband_answers,
            Role::Wife => &self.wife_answers,
        }
    }

    pub fn mood(&self, role: Role) -> Mood {
        let (emoji, text) = match role {
            Role::Husband => (&self.mood_husband_emoji, &self.mood_husband_text),
            Role::Wife => (&self.mood_wife_emoji, &self.mood_wife_text),
        };
        Mood {
            emoji: emoji.clone(),
            text: text.clone(),
        }
    }

    /// Merges a partial write. Only `role`'s own fields are touched.
    pub fn apply(&mut self, role: Role, update: RoleUpdate) {
        let RoleUpdate {
            photo_url,
            note,
            answers,
            mood,
        } = update;

        let (url_field, note_field, answers_field, emoji_field, text_field) = match role {
            Role::Husband => (
                &mut self.husband_url,
                &mut self.husband_note,
                &mut self.husband_answers,
                &mut self.mood_husband_emoji,
                &mut self.mood_husband_text,
            ),
            Role::Wife => (
                &mut self.wife_url,
                &mut self.wife_note,
                &mut self.wife_answers,
                &mut self.mood_wife_emoji,
                &mut self.mood_wife_text,
            ),
        };

        if let Some(url) = photo_url {
            *url_field = url.trim().to_string();
        }
        if let Some(note) = note {
            *note_field = note;
        }
        if let Some(answers) = answers {
            *answers_field = answers.trimmed();
        }
        if let Some(mood) = mood {
            *emoji_field = mood.emoji;
            *text_field = mood.text;
        }
    }
}

/// A partial update to one partner's fields. Absent fields are left as they are.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleUpdate {
    pub photo_url: Option<String>,
    pub note: Option<String>,
    pub answers: Option<Answers>,
    pub mood: Option<Mood>,
}

impl RoleUpdate {
    pub fn is_empty(&self) -> bool {
        self.photo_url.is_none() && self.note.is_none() && self.answers.is_none() && self.mood.is_none()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Room {
    #[serde(default, deserialize_with = "lenient_days")]
    pub days: BTreeMap<String, DayRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppData {
    pub rooms: BTreeMap<String, Room>,
}

#[derive(Debug, Deserialize)]
pub struct CheckInRequest {
    pub role: Role,
    #[serde(flatten)]
    pub update: RoleUpdate,
}

#[derive(Debug, Deserialize)]
pub struct RangeQuery {
    pub start: String,
    pub end: String,
}

#[derive(Debug, Serialize)]
pub struct DayView {
    pub date: String,
    pub joint: bool,
    pub record: DayRecord,
}

impl DayView {
    pub fn new(date: &DayId, record: DayRecord) -> Self {
        Self {
            date: date.to_string(),
            joint: record.is_joint(),
            record,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CheckInResponse {
    pub day: DayView,
    pub notice: Option<Notice>,
}
