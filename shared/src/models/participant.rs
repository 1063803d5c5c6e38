use serde::{Deserialize, Serialize};
use std::fmt;
use crate::error::{Result, SharedError};

/// Opaque identifier of a participant row, as rendered by the server.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ParticipantId(String);

impl ParticipantId {
    pub fn new(raw: impl Into<String>) -> Result<Self> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(SharedError::InvalidParticipantId(
                "participant id cannot be empty".to_string(),
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Percent-encoded form used when the id is placed in a URL path.
    pub fn to_path_segment(&self) -> String {
        urlencoding::encode(&self.0).into_owned()
    }
}

impl TryFrom<String> for ParticipantId {
    type Error = SharedError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<ParticipantId> for String {
    fn from(id: ParticipantId) -> Self {
        id.0
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A participant as shown in an admin table row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    pub name: String,
    pub phone: Option<String>,
}

impl Participant {
    pub fn new(id: ParticipantId, name: impl Into<String>, phone: Option<String>) -> Self {
        let phone = phone
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty());
        Self {
            id,
            name: name.into().trim().to_string(),
            phone,
        }
    }

    /// Name used in prompts; rows without a rendered name fall back to the id.
    pub fn display_name(&self) -> String {
        if self.name.is_empty() {
            format!("participant #{}", self.id)
        } else {
            self.name.clone()
        }
    }
}

/// What a removal does on the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemovalKind {
    /// Unregister from the game/team, keep the account.
    Partial,
    /// Delete the account and its login credentials.
    Complete,
}

impl RemovalKind {
    pub fn confirmation_prompt(&self, participant: &Participant) -> String {
        let name = participant.display_name();
        match self {
            RemovalKind::Partial => format!(
                "Remove {} from their game? Their account will be kept.",
                name
            ),
            RemovalKind::Complete => match &participant.phone {
                Some(phone) => format!(
                    "Permanently delete {} ({})?\n\nThis removes the account and its login credentials. This cannot be undone.",
                    name, phone
                ),
                None => format!(
                    "Permanently delete {}?\n\nThis removes the account and its login credentials. This cannot be undone.",
                    name
                ),
            },
        }
    }
}

impl fmt::Display for RemovalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemovalKind::Partial => f.write_str("partial"),
            RemovalKind::Complete => f.write_str("complete"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_participant_id_rejects_blank() {
        assert!(ParticipantId::new("").is_err());
        assert!(ParticipantId::new("   ").is_err());
        assert_eq!(ParticipantId::new(" 42 ").unwrap().as_str(), "42");
    }

    #[test]
    fn test_participant_id_path_segment_is_encoded() {
        let id = ParticipantId::new("a/b c").unwrap();
        assert_eq!(id.to_path_segment(), "a%2Fb%20c");
    }

    #[test]
    fn test_participant_id_deserializes_through_validation() {
        let ok: ParticipantId = serde_json::from_str("\"17\"").unwrap();
        assert_eq!(ok.to_string(), "17");
        assert!(serde_json::from_str::<ParticipantId>("\"\"").is_err());
    }

    #[test]
    fn test_blank_phone_is_dropped() {
        let p = Participant::new(ParticipantId::new("1").unwrap(), " Asha ", Some("  ".into()));
        assert_eq!(p.name, "Asha");
        assert_eq!(p.phone, None);
    }

    #[test]
    fn test_complete_prompt_mentions_phone() {
        let p = Participant::new(
            ParticipantId::new("42").unwrap(),
            "Asha",
            Some("9990002222".into()),
        );
        let prompt = RemovalKind::Complete.confirmation_prompt(&p);
        assert!(prompt.contains("Asha"));
        assert!(prompt.contains("9990002222"));

        let partial = RemovalKind::Partial.confirmation_prompt(&p);
        assert!(partial.contains("Asha"));
        assert!(!partial.contains("9990002222"));
    }

    #[test]
    fn test_display_name_falls_back_to_id() {
        let p = Participant::new(ParticipantId::new("7").unwrap(), "", None);
        assert_eq!(p.display_name(), "participant #7");
    }
}
