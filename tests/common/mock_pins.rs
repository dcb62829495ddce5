/*!
 * Mock upstream pins for negotiation tests
 */

use std::cell::RefCell;

use subburn::negotiation::{FormatDescriptor, UpstreamPin};

/// Scriptable upstream pin that records the calls made against it
pub struct MockPin {
    /// Answer to return from query_accept
    pub accept_answer: bool,
    /// Answer to return from reconnect
    pub reconnect_answer: bool,
    /// Formats passed to query_accept, in call order
    pub queried: RefCell<Vec<FormatDescriptor>>,
    /// Formats passed to reconnect, in call order
    pub reconnected: Vec<FormatDescriptor>,
}

impl MockPin {
    /// Pin that answers `accept` to queries and `reconnect` to reconnects
    pub fn answering(accept: bool, reconnect: bool) -> Self {
        MockPin {
            accept_answer: accept,
            reconnect_answer: reconnect,
            queried: RefCell::new(Vec::new()),
            reconnected: Vec::new(),
        }
    }

    /// Pin that agrees to everything
    pub fn agreeable() -> Self {
        Self::answering(true, true)
    }
}

impl UpstreamPin for MockPin {
    fn query_accept(&self, format: &FormatDescriptor) -> bool {
        self.queried.borrow_mut().push(format.clone());
        self.accept_answer
    }

    fn reconnect(&mut self, format: &FormatDescriptor) -> bool {
        self.reconnected.push(format.clone());
        self.reconnect_answer
    }
}
