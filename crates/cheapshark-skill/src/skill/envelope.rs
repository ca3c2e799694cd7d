use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{IntentRequest, SkillRequest, SpokenResponse};

const ENVELOPE_VERSION: &str = "1.0";

/// Voice-platform request body. Only the request type, intent name and slot
/// values are read; session and device context are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct RequestEnvelope {
    #[serde(default)]
    pub version: Option<String>,
    pub request: RequestBody,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RequestBody {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub intent: Option<IntentBody>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IntentBody {
    pub name: String,
    #[serde(default)]
    pub slots: BTreeMap<String, SlotBody>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SlotBody {
    #[serde(default)]
    pub value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EnvelopeError {
    #[error("IntentRequest carries no intent")]
    MissingIntent,
}

impl RequestEnvelope {
    pub fn into_request(self) -> Result<SkillRequest, EnvelopeError> {
        let RequestBody { kind, intent } = self.request;
        match kind.as_str() {
            "LaunchRequest" => Ok(SkillRequest::Launch),
            "SessionEndedRequest" => Ok(SkillRequest::SessionEnded),
            "IntentRequest" => {
                let intent = intent.ok_or(EnvelopeError::MissingIntent)?;
                let slots = intent
                    .slots
                    .into_iter()
                    .filter_map(|(name, slot)| slot.value.map(|value| (name, value)))
                    .collect();
                Ok(SkillRequest::Intent(IntentRequest {
                    name: intent.name,
                    slots,
                }))
            }
            _ => Ok(SkillRequest::Other(kind)),
        }
    }
}

/// Voice-platform response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResponseEnvelope {
    pub version: &'static str,
    pub response: ResponseBody,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_speech: Option<OutputSpeech>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reprompt: Option<Reprompt>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub should_end_session: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum OutputSpeech {
    PlainText { text: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reprompt {
    pub output_speech: OutputSpeech,
}

impl From<SpokenResponse> for ResponseEnvelope {
    fn from(value: SpokenResponse) -> Self {
        let SpokenResponse {
            speech,
            reprompt,
            should_end_session,
        } = value;

        Self {
            version: ENVELOPE_VERSION,
            response: ResponseBody {
                output_speech: speech.map(|text| OutputSpeech::PlainText { text }),
                reprompt: reprompt.map(|text| Reprompt {
                    output_speech: OutputSpeech::PlainText { text },
                }),
                should_end_session,
            },
        }
    }
}
