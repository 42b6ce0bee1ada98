/// Ordered log of events emitted on the UI thread.
///
/// Events are kept in emission order for the bus's lifetime, which makes side effects
/// (renders, entity removals, cursor changes) directly assertable.
#[derive(Debug, Clone)]
pub struct EventBus<E> {
    events: Vec<E>,
}

impl<E> Default for EventBus<E> {
    fn default() -> Self {
        Self { events: Vec::new() }
    }
}

impl<E> EventBus<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, event: E) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[E] {
        &self.events
    }

    /// Number of recorded events matching `pred`.
    pub fn count(&self, pred: impl Fn(&E) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}
