/*!
 * Tests for the format negotiation protocol
 */

use subburn::errors::NegotiationError;
use subburn::negotiation::{
    FormatClasses, FormatDescriptor, MediaMajor, NegotiationContext, Negotiator,
};

use crate::common::mock_pins::MockPin;

fn classes() -> FormatClasses {
    FormatClasses::new(
        vec!["P010".to_string(), "P016".to_string()],
        vec!["NV12".to_string(), "YV12".to_string()],
    )
}

fn negotiator() -> Negotiator {
    Negotiator::new(classes())
}

/// Test immediate acceptance of an identical format
#[test]
fn test_negotiate_withEqualFormats_shouldAcceptWithoutUpstreamCalls() {
    let mut ctx = NegotiationContext::new(
        FormatDescriptor::video("NV12"),
        FormatDescriptor::video("NV12"),
    );
    let mut pin = MockPin::agreeable();

    negotiator().negotiate(&mut ctx, &mut pin).unwrap();

    assert!(pin.queried.borrow().is_empty());
    assert!(pin.reconnected.is_empty());
    assert_eq!(ctx.current_input, FormatDescriptor::video("NV12"));
}

/// Test the forced downgrade happy path
#[test]
fn test_negotiate_withDowngradeAndWillingUpstream_shouldReconnectAndAccept() {
    let mut ctx = NegotiationContext::new(
        FormatDescriptor::video("P010"),
        FormatDescriptor::video("NV12"),
    );
    let mut pin = MockPin::agreeable();

    negotiator().negotiate(&mut ctx, &mut pin).unwrap();

    // Upstream was asked about exactly the proposed format, then reconnected
    assert_eq!(*pin.queried.borrow(), vec![FormatDescriptor::video("NV12")]);
    assert_eq!(pin.reconnected, vec![FormatDescriptor::video("NV12")]);

    // Local input-format state follows the reconnect
    assert_eq!(ctx.current_input, FormatDescriptor::video("NV12"));
}

/// Test rejection when the upstream query refuses
#[test]
fn test_negotiate_withUpstreamRefusingQuery_shouldRejectWithoutReconnect() {
    let mut ctx = NegotiationContext::new(
        FormatDescriptor::video("P010"),
        FormatDescriptor::video("NV12"),
    );
    let mut pin = MockPin::answering(false, true);

    let err = negotiator().negotiate(&mut ctx, &mut pin).unwrap_err();

    assert!(matches!(err, NegotiationError::FormatNotAccepted { .. }));
    assert!(pin.reconnected.is_empty());
    assert_eq!(ctx.current_input, FormatDescriptor::video("P010"));
}

/// Test rejection when the reconnect fails after a positive query
#[test]
fn test_negotiate_withFailingReconnect_shouldRejectAndKeepInputFormat() {
    let mut ctx = NegotiationContext::new(
        FormatDescriptor::video("P010"),
        FormatDescriptor::video("NV12"),
    );
    let mut pin = MockPin::answering(true, false);

    let err = negotiator().negotiate(&mut ctx, &mut pin).unwrap_err();

    assert!(matches!(err, NegotiationError::FormatNotAccepted { .. }));
    assert_eq!(pin.reconnected, vec![FormatDescriptor::video("NV12")]);
    assert_eq!(ctx.current_input, FormatDescriptor::video("P010"));
}

/// Test that only high-to-standard transitions are downgrade-eligible
#[test]
fn test_negotiate_withIneligibleCombinations_shouldRejectImmediately() {
    let negotiator = negotiator();

    // Standard to standard, but unequal
    let mut ctx = NegotiationContext::new(
        FormatDescriptor::video("NV12"),
        FormatDescriptor::video("YV12"),
    );
    let mut pin = MockPin::agreeable();
    assert!(negotiator.negotiate(&mut ctx, &mut pin).is_err());

    // Standard to high (an upgrade) is never forced
    let mut ctx = NegotiationContext::new(
        FormatDescriptor::video("NV12"),
        FormatDescriptor::video("P010"),
    );
    assert!(negotiator.negotiate(&mut ctx, &mut pin).is_err());

    // Unknown subtype on either side
    let mut ctx = NegotiationContext::new(
        FormatDescriptor::video("P010"),
        FormatDescriptor::video("RGB24"),
    );
    assert!(negotiator.negotiate(&mut ctx, &mut pin).is_err());

    // No upstream call was ever made
    assert!(pin.queried.borrow().is_empty());
    assert!(pin.reconnected.is_empty());
}

/// Test that non-video majors cannot enter the downgrade path
#[test]
fn test_negotiate_withNonVideoMajor_shouldReject() {
    let mut ctx = NegotiationContext::new(
        FormatDescriptor {
            major: MediaMajor::Subtitle,
            subtype: "P010".to_string(),
        },
        FormatDescriptor::video("NV12"),
    );
    let mut pin = MockPin::agreeable();

    assert!(negotiator().negotiate(&mut ctx, &mut pin).is_err());
}

/// Test the admission check for input connections
#[test]
fn test_acceptsInput_withKnownVideoAndTextMajors_shouldAdmit() {
    let negotiator = negotiator();

    assert!(negotiator.accepts_input(&FormatDescriptor::video("P010")));
    assert!(negotiator.accepts_input(&FormatDescriptor::video("NV12")));
    assert!(!negotiator.accepts_input(&FormatDescriptor::video("RGB24")));

    let subtitle = FormatDescriptor {
        major: MediaMajor::Subtitle,
        subtype: "SRT".to_string(),
    };
    let text = FormatDescriptor {
        major: MediaMajor::Text,
        subtype: "UTF8".to_string(),
    };
    assert!(negotiator.accepts_input(&subtitle));
    assert!(negotiator.accepts_input(&text));
}

/// Test the output candidate enumeration for a high-depth input
#[test]
fn test_outputCandidates_withHighDepthInput_shouldOfferInputThenFallbacks() {
    let candidates = negotiator().output_candidates(&FormatDescriptor::video("P016"));

    let subtypes: Vec<&str> = candidates.iter().map(|f| f.subtype.as_str()).collect();
    assert_eq!(subtypes, vec!["P016", "NV12", "YV12"]);
}

/// Test the output candidate enumeration for a standard-depth input
#[test]
fn test_outputCandidates_withStandardDepthInput_shouldOfferOnlyInput() {
    let candidates = negotiator().output_candidates(&FormatDescriptor::video("YV12"));

    assert_eq!(candidates, vec![FormatDescriptor::video("YV12")]);
}

/// Test class membership is by identifier, not by position or case folding
#[test]
fn test_formatClasses_membership_shouldBeExactAndCaseSensitive() {
    let classes = classes();

    assert!(classes.is_high_depth(&FormatDescriptor::video("P010")));
    assert!(!classes.is_high_depth(&FormatDescriptor::video("p010")));
    assert!(!classes.is_standard_depth(&FormatDescriptor::video("P010")));

    // Major type matters: a subtitle stream named like a video subtype is
    // in neither class
    let odd = FormatDescriptor {
        major: MediaMajor::Subtitle,
        subtype: "NV12".to_string(),
    };
    assert!(!classes.is_standard_depth(&odd));
}
