//! Parameter automation: WebAudio-style value schedules.
//!
//! A curve is a time-ordered list of events. Each ramp event interpolates from
//! the previous event's value to its own value, ending at its own time.

/// A scheduled change of a parameter value.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Event {
    /// Jump to `value` at `time`.
    Set { time: f64, value: f64 },
    /// Reach `value` at `time`, linearly from the previous event.
    Linear { time: f64, value: f64 },
    /// Reach `value` at `time`, exponentially from the previous event.
    Exponential { time: f64, value: f64 },
}

impl Event {
    fn time(&self) -> f64 {
        match *self {
            Event::Set { time, .. }
            | Event::Linear { time, .. }
            | Event::Exponential { time, .. } => time,
        }
    }

    fn value(&self) -> f64 {
        match *self {
            Event::Set { value, .. }
            | Event::Linear { value, .. }
            | Event::Exponential { value, .. } => value,
        }
    }
}

/// A parameter whose value is a function of absolute time.
#[derive(Debug, Clone, PartialEq)]
pub struct AutomationCurve {
    default: f64,
    events: Vec<Event>,
}

impl AutomationCurve {
    pub fn new(default: f64) -> Self {
        AutomationCurve {
            default,
            events: Vec::new(),
        }
    }

    pub fn set_value_at_time(mut self, value: f64, time: f64) -> Self {
        self.insert(Event::Set { time, value });
        self
    }

    pub fn linear_ramp_to_value_at_time(mut self, value: f64, time: f64) -> Self {
        self.insert(Event::Linear { time, value });
        self
    }

    /// `value` must be non-zero; a ramp from or to zero (or across a sign
    /// change) holds the previous value until `time`, as WebAudio does.
    pub fn exponential_ramp_to_value_at_time(mut self, value: f64, time: f64) -> Self {
        self.insert(Event::Exponential { time, value });
        self
    }

    fn insert(&mut self, event: Event) {
        // Stable: events at equal times keep insertion order.
        let index = self.events.partition_point(|e| e.time() <= event.time());
        self.events.insert(index, event);
    }

    /// Time of the last scheduled event.
    pub fn end_time(&self) -> f64 {
        self.events.last().map_or(0.0, Event::time)
    }

    pub fn value_at(&self, t: f64) -> f64 {
        let next = self.events.partition_point(|e| e.time() <= t);
        let (start_time, start_value) = match next.checked_sub(1) {
            Some(i) => (self.events[i].time(), self.events[i].value()),
            None => (0.0, self.default),
        };
        let Some(event) = self.events.get(next) else {
            return start_value;
        };

        let progress = |end: f64| {
            if end > start_time {
                ((t - start_time) / (end - start_time)).clamp(0.0, 1.0)
            } else {
                1.0
            }
        };
        match *event {
            Event::Set { .. } => start_value,
            Event::Linear { time, value } => start_value + (value - start_value) * progress(time),
            Event::Exponential { time, value } => {
                if start_value == 0.0 || value == 0.0 || start_value.signum() != value.signum() {
                    start_value
                } else {
                    start_value * (value / start_value).powf(progress(time))
                }
            }
        }
    }
}
