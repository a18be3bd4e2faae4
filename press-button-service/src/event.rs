//! Classified press events and their handlers

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Enum representing the different press lengths reported by the classifier.
pub enum PressEvent {
    /// Released after at least `tiny` but less than `short`.
    Tiny,
    /// Released in the short range with no second press inside the double window.
    Short,
    /// Two short presses whose releases fall inside the double window.
    Double,
    /// Released in the long range.
    Long,
    /// Released after at least `super`.
    Super,
    /// Still held past `super`. Reported once per hold.
    Constant,
}

impl PressEvent {
    /// Number of event kinds.
    pub const COUNT: usize = 6;

    /// All event kinds, in order of increasing press length.
    pub const ALL: [PressEvent; Self::COUNT] = [
        PressEvent::Tiny,
        PressEvent::Short,
        PressEvent::Double,
        PressEvent::Long,
        PressEvent::Super,
        PressEvent::Constant,
    ];

    const fn index(self) -> usize {
        match self {
            PressEvent::Tiny => 0,
            PressEvent::Short => 1,
            PressEvent::Double => 2,
            PressEvent::Long => 3,
            PressEvent::Super => 4,
            PressEvent::Constant => 5,
        }
    }
}

/// Handler receiving every reported event.
pub type AnyHandler = fn(PressEvent);

/// Handler bound to a single event kind.
pub type EventHandler = fn();

/// Synchronous handler registry.
///
/// Handlers run inside [`Button::poll`](crate::Button::poll), in whatever context
/// the poll itself runs on. The catch-all handler runs first.
#[derive(Clone, Copy, Default)]
pub struct Handlers {
    any: Option<AnyHandler>,
    each: [Option<EventHandler>; PressEvent::COUNT],
}

impl Handlers {
    /// Creates an empty registry.
    pub const fn new() -> Self {
        Self {
            any: None,
            each: [None; PressEvent::COUNT],
        }
    }

    /// Sets the catch-all handler, replacing any previous one.
    pub fn on_any(&mut self, handler: AnyHandler) -> &mut Self {
        self.any = Some(handler);
        self
    }

    /// Sets the handler for one event kind, replacing any previous one.
    pub fn on(&mut self, event: PressEvent, handler: EventHandler) -> &mut Self {
        self.each[event.index()] = Some(handler);
        self
    }

    /// Removes the handler for one event kind.
    pub fn remove(&mut self, event: PressEvent) -> &mut Self {
        self.each[event.index()] = None;
        self
    }

    /// Removes every handler.
    pub fn clear(&mut self) {
        *self = Self::new();
    }

    /// Invokes the handlers registered for `event`.
    pub fn dispatch(&self, event: PressEvent) {
        if let Some(any) = self.any {
            any(event);
        }
        if let Some(handler) = self.each[event.index()] {
            handler();
        }
    }
}

impl core::fmt::Debug for Handlers {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Handlers")
            .field("any", &self.any.is_some())
            .field("each", &self.each.iter().filter(|h| h.is_some()).count())
            .finish()
    }
}

#[cfg(test)]
mod test {
    use core::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    static ANY_CALLS: AtomicUsize = AtomicUsize::new(0);
    static LONG_CALLS: AtomicUsize = AtomicUsize::new(0);
    static SHORT_CALLS: AtomicUsize = AtomicUsize::new(0);

    fn count_any(_: PressEvent) {
        ANY_CALLS.fetch_add(1, Ordering::SeqCst);
    }

    fn count_long() {
        LONG_CALLS.fetch_add(1, Ordering::SeqCst);
    }

    fn count_short() {
        SHORT_CALLS.fetch_add(1, Ordering::SeqCst);
    }

    #[test]
    fn indices_match_all() {
        for (i, event) in PressEvent::ALL.iter().enumerate() {
            assert_eq!(event.index(), i);
        }
    }

    #[test]
    fn dispatch_reaches_catch_all_and_category() {
        let mut handlers = Handlers::new();
        handlers.on_any(count_any).on(PressEvent::Long, count_long).on(PressEvent::Short, count_short);

        handlers.dispatch(PressEvent::Long);
        handlers.dispatch(PressEvent::Double);
        handlers.remove(PressEvent::Short);
        handlers.dispatch(PressEvent::Short);

        assert_eq!(ANY_CALLS.load(Ordering::SeqCst), 3);
        assert_eq!(LONG_CALLS.load(Ordering::SeqCst), 1);
        assert_eq!(SHORT_CALLS.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn empty_registry_is_a_no_op() {
        let mut handlers = Handlers::default();
        handlers.clear();
        for event in PressEvent::ALL {
            handlers.dispatch(event);
        }
    }
}
