//! Outcome → Envelope
//!
//! 純粋関数です。Outcome の形と options だけで envelope が決まります。
//!
//! # 判定順
//! 1. payload なし → Message
//! 2. Paginated → Page
//! 3. Collection → Items
//! 4. それ以外 → Object（envelope 無効かつ error なしなら Bare）

use serde_json::Value;

use super::envelope::{
    Envelope, ErrorPayload, ItemsEnvelope, MessageEnvelope, ObjectEnvelope, PageEnvelope,
};
use super::options::ProjectionOptions;
use crate::domain::{CastError, Outcome, Payload};

pub fn project(outcome: &Outcome, options: &ProjectionOptions) -> Envelope {
    let error = outcome.error().map(ErrorPayload::from);

    match outcome.payload() {
        None | Some(Payload::Object(Value::Null)) => Envelope::Message(MessageEnvelope {
            message: outcome
                .message()
                .filter(|m| !m.is_empty())
                .map(str::to_owned),
            error,
        }),
        Some(Payload::Paginated(page)) => Envelope::Page(PageEnvelope {
            data: page.items.clone(),
            total_items: page.total_count,
            pages: page.page_count,
            error,
        }),
        Some(Payload::Collection(items)) => Envelope::Items(ItemsEnvelope {
            data: items.clone(),
            error,
        }),
        Some(Payload::Object(data)) if !options.use_object_envelope && error.is_none() => {
            Envelope::Bare(data.clone())
        }
        // a data-bearing error keeps its data under `error.data` as well
        Some(Payload::Object(data)) => Envelope::Object(ObjectEnvelope {
            data: data.clone(),
            error,
        }),
    }
}

/// Widen a typed outcome and project it.
pub fn project_reply<O>(reply: O, options: &ProjectionOptions) -> Result<Envelope, CastError>
where
    O: TryInto<Outcome>,
    O::Error: Into<CastError>,
{
    let outcome = reply.try_into().map_err(Into::into)?;
    Ok(project(&outcome, options))
}

/// Holds the options for a hosting boundary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResponseProjector {
    options: ProjectionOptions,
}

impl ResponseProjector {
    pub fn new(options: ProjectionOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ProjectionOptions {
        &self.options
    }

    pub fn project(&self, outcome: &Outcome) -> Envelope {
        project(outcome, &self.options)
    }

    /// Projected JSON body with the configured naming policy applied.
    pub fn render(&self, outcome: &Outcome) -> Value {
        self.project(outcome).to_json(self.options.naming)
    }
}
