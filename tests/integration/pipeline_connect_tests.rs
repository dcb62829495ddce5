/*!
 * Pipeline connection and renegotiation tests
 *
 * Walks the connection sequence a host pipeline would drive: admit the
 * input, enumerate output candidates for the downstream consumer, then run
 * the negotiation protocol when the consumer picks a downgraded format.
 */

use subburn::app_config::Config;
use subburn::negotiation::{FormatDescriptor, NegotiationContext, Negotiator};

use crate::common::mock_pins::MockPin;

/// Test the full forced-downgrade connection sequence
#[test]
fn test_pipelineConnect_withHighDepthSourceAndLimitedConsumer_shouldDowngrade() {
    let config = Config::default();
    let negotiator = Negotiator::new(config.format_classes());

    // Source connects with a high-bit-depth format
    let input = FormatDescriptor::video("P010");
    assert!(negotiator.accepts_input(&input));

    // Stage offers the input first, downgrades after
    let candidates = negotiator.output_candidates(&input);
    assert_eq!(candidates[0], input);
    assert!(candidates.len() > 1);

    // Consumer cannot take P010 and picks the first fallback
    let proposed = candidates[1].clone();
    assert_eq!(proposed, FormatDescriptor::video("NV12"));

    let mut ctx = NegotiationContext::new(input, proposed.clone());
    let mut pin = MockPin::agreeable();
    negotiator.negotiate(&mut ctx, &mut pin).unwrap();
    assert_eq!(ctx.current_input, proposed);

    // After the reconnect the stage only offers the downgraded format
    let candidates = negotiator.output_candidates(&ctx.current_input);
    assert_eq!(candidates, vec![proposed.clone()]);

    // A later reconnection with the same format is accepted trivially
    let mut ctx = NegotiationContext::new(ctx.current_input, proposed);
    let mut quiet_pin = MockPin::answering(false, false);
    negotiator.negotiate(&mut ctx, &mut quiet_pin).unwrap();
    assert!(quiet_pin.queried.borrow().is_empty());
}

/// Test that a stubborn upstream leaves the connection rejected
#[test]
fn test_pipelineConnect_withStubbornUpstream_shouldRejectTransform() {
    let config = Config::default();
    let negotiator = Negotiator::new(config.format_classes());

    let input = FormatDescriptor::video("P016");
    let proposed = FormatDescriptor::video("YV12");

    let mut ctx = NegotiationContext::new(input.clone(), proposed);
    let mut pin = MockPin::answering(false, false);

    assert!(negotiator.negotiate(&mut ctx, &mut pin).is_err());

    // The stage keeps its original input format and candidate list
    assert_eq!(ctx.current_input, input);
    let candidates = negotiator.output_candidates(&ctx.current_input);
    assert_eq!(candidates[0], input);
}

/// Test that custom configured classes drive the protocol
#[test]
fn test_pipelineConnect_withCustomClasses_shouldFollowConfiguredSets() {
    let mut config = Config::default();
    config.high_depth_formats = vec!["V210".to_string()];
    config.standard_depth_formats = vec!["UYVY".to_string()];
    config.validate().unwrap();

    let negotiator = Negotiator::new(config.format_classes());

    // The default class members mean nothing under this deployment
    assert!(!negotiator.accepts_input(&FormatDescriptor::video("P010")));
    assert!(negotiator.accepts_input(&FormatDescriptor::video("V210")));

    let mut ctx = NegotiationContext::new(
        FormatDescriptor::video("V210"),
        FormatDescriptor::video("UYVY"),
    );
    let mut pin = MockPin::agreeable();
    negotiator.negotiate(&mut ctx, &mut pin).unwrap();
    assert_eq!(ctx.current_input, FormatDescriptor::video("UYVY"));
}
