/*!
 * Media format negotiation for the overlay stage.
 *
 * Run during pipeline connection whenever the proposed output format
 * differs from the currently connected input format. The stage either
 * accepts the proposal outright, forces the upstream source to reconnect
 * with a downgraded format, or rejects the transform. The exchange is
 * synchronous and single-attempt: no retry loop, no intermediate formats.
 *
 * Which formats count as "high bit depth" versus "standard bit depth" is
 * deployment configuration, not compiled-in knowledge; the protocol only
 * tests membership in the two closed lists it is handed.
 */

use std::fmt;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::errors::NegotiationError;

/// Major type of a media stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaMajor {
    /// Video frames
    Video,
    /// Packaged subtitle data
    Subtitle,
    /// Raw timed text
    Text,
}

/// A concrete media format: major type plus an opaque subtype identifier.
///
/// Subtype identifiers are case-sensitive strings (`"NV12"`, `"P010"`, ...).
/// Equality is structural and exact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatDescriptor {
    /// Major stream type
    pub major: MediaMajor,
    /// Format identifier within the major type
    pub subtype: String,
}

impl FormatDescriptor {
    /// Convenience constructor for a video format
    pub fn video(subtype: impl Into<String>) -> Self {
        FormatDescriptor {
            major: MediaMajor::Video,
            subtype: subtype.into(),
        }
    }
}

impl fmt::Display for FormatDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let major = match self.major {
            MediaMajor::Video => "video",
            MediaMajor::Subtitle => "subtitle",
            MediaMajor::Text => "text",
        };
        write!(f, "{}/{}", major, self.subtype)
    }
}

/// The two closed, ordered format-class lists the protocol consults.
///
/// Order matters for `standard_depth`: it is the order fallback candidates
/// are offered in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatClasses {
    /// High-bit-depth video subtypes
    pub high_depth: Vec<String>,
    /// Standard-bit-depth video subtypes, in fallback offer order
    pub standard_depth: Vec<String>,
}

impl FormatClasses {
    /// Build classes from identifier lists
    pub fn new(high_depth: Vec<String>, standard_depth: Vec<String>) -> Self {
        FormatClasses {
            high_depth,
            standard_depth,
        }
    }

    /// Membership test against the high-bit-depth class
    pub fn is_high_depth(&self, format: &FormatDescriptor) -> bool {
        format.major == MediaMajor::Video && self.high_depth.iter().any(|s| *s == format.subtype)
    }

    /// Membership test against the standard-bit-depth class
    pub fn is_standard_depth(&self, format: &FormatDescriptor) -> bool {
        format.major == MediaMajor::Video
            && self.standard_depth.iter().any(|s| *s == format.subtype)
    }
}

/// Capability handle onto the upstream source pin.
///
/// The two-role pin hierarchy of the host pipeline collapses to this pair
/// of calls at the protocol level. Both calls block until the upstream side
/// answers; renegotiation is a rare, setup-time event.
pub trait UpstreamPin {
    /// Ask upstream whether it could produce `format` instead
    fn query_accept(&self, format: &FormatDescriptor) -> bool;

    /// Tell upstream to tear down and reconnect producing `format`
    fn reconnect(&mut self, format: &FormatDescriptor) -> bool;
}

/// State for one negotiation attempt. Constructed fresh per attempt.
#[derive(Debug, Clone)]
pub struct NegotiationContext {
    /// Format the upstream source currently delivers
    pub current_input: FormatDescriptor,
    /// Format the downstream consumer proposes to receive
    pub proposed_output: FormatDescriptor,
}

impl NegotiationContext {
    /// Create a context for one attempt
    pub fn new(current_input: FormatDescriptor, proposed_output: FormatDescriptor) -> Self {
        NegotiationContext {
            current_input,
            proposed_output,
        }
    }
}

/// The format negotiation state machine
#[derive(Debug, Clone)]
pub struct Negotiator {
    classes: FormatClasses,
}

impl Negotiator {
    /// Create a negotiator over the configured format classes
    pub fn new(classes: FormatClasses) -> Self {
        Negotiator { classes }
    }

    /// The class lists this negotiator consults
    pub fn classes(&self) -> &FormatClasses {
        &self.classes
    }

    /// Admission check for an input connection.
    ///
    /// Video is admitted when its subtype belongs to either class;
    /// subtitle and raw text majors are always admitted.
    pub fn accepts_input(&self, format: &FormatDescriptor) -> bool {
        match format.major {
            MediaMajor::Video => {
                self.classes.is_high_depth(format) || self.classes.is_standard_depth(format)
            }
            MediaMajor::Subtitle | MediaMajor::Text => true,
        }
    }

    /// Output formats this stage offers downstream, in offer order.
    ///
    /// A high-bit-depth input offers the input format first, then every
    /// standard-bit-depth identifier in class order, so a consumer that
    /// cannot take the original format can pick a downgrade target. Any
    /// other input offers only itself.
    pub fn output_candidates(&self, current_input: &FormatDescriptor) -> Vec<FormatDescriptor> {
        let mut candidates = vec![current_input.clone()];

        if self.classes.is_high_depth(current_input) {
            candidates.extend(
                self.classes
                    .standard_depth
                    .iter()
                    .map(|subtype| FormatDescriptor::video(subtype.clone())),
            );
        }

        candidates
    }

    /// Decide whether the proposed output format can be carried.
    ///
    /// Accepts immediately on exact equality. When the current input is
    /// high bit depth and the proposal is standard bit depth, asks upstream
    /// to accept the proposal and, if it does, forces a reconnect with it;
    /// a successful reconnect updates `ctx.current_input`. Every other
    /// combination is rejected.
    pub fn negotiate(
        &self,
        ctx: &mut NegotiationContext,
        pin: &mut dyn UpstreamPin,
    ) -> Result<(), NegotiationError> {
        if ctx.proposed_output == ctx.current_input {
            debug!("Proposed format {} matches input, accepting", ctx.proposed_output);
            return Ok(());
        }

        let rejected = NegotiationError::FormatNotAccepted {
            proposed: ctx.proposed_output.to_string(),
        };

        if !(self.classes.is_high_depth(&ctx.current_input)
            && self.classes.is_standard_depth(&ctx.proposed_output))
        {
            debug!(
                "No downgrade path from {} to {}, rejecting",
                ctx.current_input, ctx.proposed_output
            );
            return Err(rejected);
        }

        if !pin.query_accept(&ctx.proposed_output) {
            warn!(
                "Upstream refused downgrade to {}, rejecting transform",
                ctx.proposed_output
            );
            return Err(rejected);
        }

        if !pin.reconnect(&ctx.proposed_output) {
            warn!(
                "Upstream reconnect with {} failed, rejecting transform",
                ctx.proposed_output
            );
            return Err(rejected);
        }

        ctx.current_input = ctx.proposed_output.clone();
        info!("Upstream renegotiated to {}", ctx.current_input);

        Ok(())
    }
}
