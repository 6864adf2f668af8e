// direnv-bridge: direnv environment loader for host processes
//
// SPDX-FileCopyrightText: 2026 direnv-bridge contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Incremental decoding of `direnv export json` output.
//!
//! ```text
//! {"A":"1","B":null,"C":7}
//!     |       |       |
//!     v       v       v
//!  Set(A,1) Unset(B) skipped (forward compatibility)
//! ```
//!
//! The stream is a single JSON object; fields are visited in order and handed
//! to the sink as they parse. The sink can break out early; the rest of the
//! object is then skipped, not parsed into values.

use serde::de::{self, DeserializeSeed, Deserializer, MapAccess, Visitor};
use std::fmt;
use std::ops::ControlFlow;

use crate::error::DecodeError;

/// A single mutation event from the export stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvEvent {
    /// Assign `value` to the variable `name`.
    Set { name: String, value: String },
    /// Remove the variable `name` entirely.
    Unset { name: String },
}

impl EnvEvent {
    /// The variable name this event applies to.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Set { name, .. } | Self::Unset { name } => name,
        }
    }
}

/// Decodes an export stream, feeding each event to `sink` as it parses.
///
/// String fields emit [`EnvEvent::Set`], null fields emit [`EnvEvent::Unset`],
/// any other value token is silently skipped. An empty stream is a valid
/// "no changes" report. Events delivered before a malformed tail stay
/// delivered; the error covers only the abort of the remaining stream.
///
/// # Errors
///
/// Returns [`DecodeError::Malformed`] if the stream is not a single
/// well-formed JSON object.
pub fn decode_export<F>(bytes: &[u8], sink: F) -> Result<(), DecodeError>
where
    F: FnMut(EnvEvent) -> ControlFlow<()>,
{
    // direnv emits nothing at all when the environment is already loaded
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(());
    }

    let mut deserializer = serde_json::Deserializer::from_slice(bytes);
    deserializer.deserialize_map(ExportVisitor { sink })?;
    deserializer.end()?;
    Ok(())
}

struct ExportVisitor<F> {
    sink: F,
}

impl<'de, F> Visitor<'de> for ExportVisitor<F>
where
    F: FnMut(EnvEvent) -> ControlFlow<()>,
{
    type Value = ();

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a JSON object of variable assignments")
    }

    fn visit_map<A>(mut self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        while let Some(name) = map.next_key::<String>()? {
            let flow = match map.next_value_seed(AssignmentSeed { name })? {
                Some(event) => (self.sink)(event),
                None => ControlFlow::Continue(()),
            };
            if flow.is_break() {
                // consumer stopped; skim the remaining entries unparsed
                while map
                    .next_entry::<de::IgnoredAny, de::IgnoredAny>()?
                    .is_some()
                {}
                break;
            }
        }
        Ok(())
    }
}

/// Deserializes one field value into an event without building an
/// intermediate value tree.
struct AssignmentSeed {
    name: String,
}

impl<'de> DeserializeSeed<'de> for AssignmentSeed {
    type Value = Option<EnvEvent>;

    fn deserialize<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(AssignmentVisitor { name: self.name })
    }
}

struct AssignmentVisitor {
    name: String,
}

impl<'de> Visitor<'de> for AssignmentVisitor {
    type Value = Option<EnvEvent>;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a string, null, or ignorable value")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
        Ok(Some(EnvEvent::Set {
            name: self.name,
            value: value.to_string(),
        }))
    }

    fn visit_string<E: de::Error>(self, value: String) -> Result<Self::Value, E> {
        Ok(Some(EnvEvent::Set {
            name: self.name,
            value,
        }))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(Some(EnvEvent::Unset { name: self.name }))
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(Some(EnvEvent::Unset { name: self.name }))
    }

    // Anything else the tool might emit one day is skipped, not an error.

    fn visit_bool<E: de::Error>(self, _: bool) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_i64<E: de::Error>(self, _: i64) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_u64<E: de::Error>(self, _: u64) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_f64<E: de::Error>(self, _: f64) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: de::SeqAccess<'de>,
    {
        while seq.next_element::<de::IgnoredAny>()?.is_some() {}
        Ok(None)
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        while map
            .next_entry::<de::IgnoredAny, de::IgnoredAny>()?
            .is_some()
        {}
        Ok(None)
    }
}

#[cfg(test)]
mod tests;
